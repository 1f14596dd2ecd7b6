use anchor_lang::prelude::*;
use ledger_harness::{
    helpers::{AssociatedTokenAccount, ProgramAccount, SignerAccount, TokenAccountInterface},
    InvokeContext,
};

use super::{check_mint, check_programs};
use crate::{events::EscrowMade, pda, Escrow, EscrowError, ESCROW_SEED, MAKE_DATA_LEN, VAULT_SEED};

pub struct Make {
    accounts: MakeAccounts,
    data: MakeData,
}

impl TryFrom<(&[AccountMeta], &[u8])> for Make {
    type Error = Error;

    fn try_from(value: (&[AccountMeta], &[u8])) -> Result<Self> {
        let accounts = MakeAccounts::try_from(value.0)?;
        let data = MakeData::try_from(value.1)?;

        Ok(Make { accounts, data })
    }
}

impl Make {
    pub const DISCRIMINATOR: u8 = 0;

    pub fn check(&mut self, ctx: &InvokeContext) -> Result<()> {
        let accounts = &self.accounts;

        // Check if the maker signed
        SignerAccount::check(ctx, &accounts.maker)?;
        check_programs(&accounts.system_program, &accounts.token_program)?;

        require_gt!(self.data.deposit, 0, EscrowError::InvalidAmount);
        require_gt!(self.data.receive, 0, EscrowError::InvalidAmount);

        check_mint(ctx, &accounts.mint_a, &accounts.token_program)?;
        check_mint(ctx, &accounts.mint_b, &accounts.token_program)?;

        // Check the escrow and vault addresses against their seeds
        let (escrow, escrow_bump) = pda::find_escrow_address(&accounts.maker, self.data.seed);
        require_keys_eq!(escrow, accounts.escrow, EscrowError::InvalidEscrowAddress);
        let vault_bump = pda::verify_vault_address(&accounts.escrow, &accounts.vault)?;

        // Both must still be vacant
        require!(
            ctx.get(&accounts.escrow)?.is_none(),
            EscrowError::EscrowAlreadyExists
        );
        require!(
            ctx.get(&accounts.vault)?.is_none(),
            EscrowError::VaultAlreadyExists
        );

        // The deposit must come from the maker's associated mint A account
        require!(
            ctx.get(&accounts.maker_ata_a)?.is_some(),
            EscrowError::InsufficientFunds
        );
        let maker_ata_a = AssociatedTokenAccount::check(
            ctx,
            &accounts.maker_ata_a,
            &accounts.maker,
            &accounts.mint_a,
            &accounts.token_program,
        )?;
        require_gte!(
            maker_ata_a.amount,
            self.data.deposit,
            EscrowError::InsufficientFunds
        );

        self.accounts.escrow_bump = [escrow_bump];
        self.accounts.vault_bump = [vault_bump];

        Ok(())
    }

    pub fn init(&self, ctx: &mut InvokeContext) -> Result<()> {
        let accounts = &self.accounts;
        let seed = self.data.seed.to_le_bytes();

        // Create the escrow record at its derived address
        ProgramAccount::init(
            ctx,
            &accounts.maker,
            &accounts.escrow,
            &[
                ESCROW_SEED,
                accounts.maker.as_ref(),
                &seed,
                &accounts.escrow_bump,
            ],
            Escrow::LEN,
            &crate::ID,
        )?;

        let record = Escrow {
            seed: self.data.seed,
            maker: accounts.maker,
            mint_a: accounts.mint_a,
            mint_b: accounts.mint_b,
            receive: self.data.receive,
            bump: accounts.escrow_bump[0],
        };
        record.store(&mut ctx.account_mut(&accounts.escrow)?.data)?;

        // The vault is held by the escrow record, not by the maker
        TokenAccountInterface::init(
            ctx,
            &accounts.vault,
            &accounts.mint_a,
            &accounts.maker,
            &accounts.escrow,
            &accounts.token_program,
            &[VAULT_SEED, accounts.escrow.as_ref(), &accounts.vault_bump],
        )
    }

    pub fn process(&mut self, ctx: &mut InvokeContext) -> Result<()> {
        self.check(ctx)?;
        self.init(ctx)?;

        msg!("Escrow opened, depositing {} of mint A", self.data.deposit);

        // Transfer the deposit from the maker's ATA to the vault
        let accounts = &self.accounts;
        TokenAccountInterface::transfer(
            ctx,
            &accounts.maker_ata_a,
            &accounts.mint_a,
            &accounts.vault,
            &accounts.maker,
            self.data.deposit,
            &[],
        )?;

        emit!(EscrowMade {
            escrow: accounts.escrow,
            maker: accounts.maker,
            seed: self.data.seed,
            mint_a: accounts.mint_a,
            mint_b: accounts.mint_b,
            deposit: self.data.deposit,
            receive: self.data.receive,
        });

        Ok(())
    }
}

pub struct MakeAccounts {
    pub maker: Pubkey,
    pub escrow: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub maker_ata_a: Pubkey,
    pub vault: Pubkey,
    pub system_program: Pubkey,
    pub token_program: Pubkey,
    pub escrow_bump: [u8; 1],
    pub vault_bump: [u8; 1],
}

impl TryFrom<&[AccountMeta]> for MakeAccounts {
    type Error = Error;

    fn try_from(accounts: &[AccountMeta]) -> Result<Self> {
        let [maker, escrow, mint_a, mint_b, maker_ata_a, vault, system_program, token_program, ..] =
            accounts
        else {
            return err!(EscrowError::NotEnoughAccountKeys);
        };

        Ok(MakeAccounts {
            maker: maker.pubkey,
            escrow: escrow.pubkey,
            mint_a: mint_a.pubkey,
            mint_b: mint_b.pubkey,
            maker_ata_a: maker_ata_a.pubkey,
            vault: vault.pubkey,
            system_program: system_program.pubkey,
            token_program: token_program.pubkey,
            escrow_bump: [0],
            vault_bump: [0],
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MakeData {
    pub seed: u64,
    pub deposit: u64,
    pub receive: u64,
}

impl MakeData {
    pub fn to_bytes(&self) -> [u8; MAKE_DATA_LEN] {
        let mut bytes = [0u8; MAKE_DATA_LEN];
        bytes[0..8].copy_from_slice(&self.seed.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.deposit.to_le_bytes());
        bytes[16..24].copy_from_slice(&self.receive.to_le_bytes());
        bytes
    }
}

impl TryFrom<&[u8]> for MakeData {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        let bytes: &[u8; MAKE_DATA_LEN] = value
            .try_into()
            .map_err(|_| error!(EscrowError::InvalidInstructionData))?;

        let [seed, deposit, receive] = [0, 8, 16].map(|start| {
            let mut word = [0u8; 8];
            word.copy_from_slice(&bytes[start..start + 8]);
            u64::from_le_bytes(word)
        });

        Ok(MakeData {
            seed,
            deposit,
            receive,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_data_is_three_le_words() {
        let data = MakeData {
            seed: 7,
            deposit: 1_000_000,
            receive: 500_000,
        };
        let bytes = data.to_bytes();

        assert_eq!(&bytes[0..8], &7u64.to_le_bytes());
        assert_eq!(&bytes[8..16], &1_000_000u64.to_le_bytes());
        assert_eq!(MakeData::try_from(&bytes[..]).unwrap(), data);
    }

    #[test]
    fn make_data_rejects_short_and_trailing_bytes() {
        let bytes = MakeData {
            seed: 1,
            deposit: 2,
            receive: 3,
        }
        .to_bytes();

        assert_eq!(
            MakeData::try_from(&bytes[..23]).unwrap_err(),
            Error::from(EscrowError::InvalidInstructionData)
        );

        let mut long = bytes.to_vec();
        long.push(0);
        assert_eq!(
            MakeData::try_from(long.as_slice()).unwrap_err(),
            Error::from(EscrowError::InvalidInstructionData)
        );
    }

    #[test]
    fn accounts_require_the_full_list() {
        let metas: Vec<AccountMeta> = (0..7)
            .map(|_| AccountMeta::new(Pubkey::new_unique(), false))
            .collect();

        assert_eq!(
            MakeAccounts::try_from(metas.as_slice()).err(),
            Some(Error::from(EscrowError::NotEnoughAccountKeys))
        );
    }
}
