use anchor_lang::prelude::*;
use ledger_harness::{
    helpers::{AssociatedTokenAccount, ProgramAccount, SignerAccount, TokenAccountInterface},
    InvokeContext,
};

use super::{check_mint, check_programs, load_escrow, load_vault};
use crate::{events::EscrowRefunded, Escrow, EscrowError, ESCROW_SEED};

pub struct Refund {
    accounts: RefundAccounts,
}

impl TryFrom<&[AccountMeta]> for Refund {
    type Error = Error;

    fn try_from(value: &[AccountMeta]) -> Result<Self> {
        let accounts = RefundAccounts::try_from(value)?;

        Ok(Refund { accounts })
    }
}

impl Refund {
    pub const DISCRIMINATOR: u8 = 2;

    pub fn check(&self, ctx: &InvokeContext) -> Result<Escrow> {
        let accounts = &self.accounts;

        // Check if the maker signed
        SignerAccount::check(ctx, &accounts.maker)?;
        check_programs(&accounts.system_program, &accounts.token_program)?;

        let escrow = load_escrow(ctx, &accounts.escrow)?;
        // Only the stored maker may cancel
        require_keys_eq!(escrow.maker, accounts.maker, EscrowError::InvalidMaker);
        require_keys_eq!(escrow.mint_a, accounts.mint_a, EscrowError::InvalidMintA);

        check_mint(ctx, &accounts.mint_a, &accounts.token_program)?;
        load_vault(ctx, &accounts.escrow, &accounts.vault, &accounts.mint_a)?;

        Ok(escrow)
    }

    pub fn init(&self, ctx: &mut InvokeContext) -> Result<()> {
        let accounts = &self.accounts;

        AssociatedTokenAccount::init_if_needed(
            ctx,
            &accounts.maker_ata_a,
            &accounts.mint_a,
            &accounts.maker,
            &accounts.maker,
            &accounts.token_program,
        )
    }

    pub fn process(&self, ctx: &mut InvokeContext) -> Result<()> {
        let escrow = self.check(ctx)?;
        self.init(ctx)?;

        let accounts = &self.accounts;
        // Return the whole vault to the maker's ATA
        let amount_a = TokenAccountInterface::check(ctx, &accounts.vault)?.amount;
        let seed = escrow.seed_bytes();
        let bump = escrow.bump_bytes();
        let signer_seeds: &[&[u8]] = &[ESCROW_SEED, escrow.maker.as_ref(), &seed, &bump];

        TokenAccountInterface::transfer(
            ctx,
            &accounts.vault,
            &accounts.mint_a,
            &accounts.maker_ata_a,
            &accounts.escrow,
            amount_a,
            signer_seeds,
        )?;

        msg!("Refunded {} of mint A, closing vault and escrow", amount_a);

        // Close the vault, then the record
        TokenAccountInterface::close(
            ctx,
            &accounts.vault,
            &accounts.maker,
            &accounts.escrow,
            signer_seeds,
        )?;
        ProgramAccount::close(ctx, &accounts.escrow, &accounts.maker)?;

        emit!(EscrowRefunded {
            escrow: accounts.escrow,
            maker: accounts.maker,
            amount_a,
        });

        Ok(())
    }
}

pub struct RefundAccounts {
    pub maker: Pubkey,
    pub escrow: Pubkey,
    pub mint_a: Pubkey,
    pub vault: Pubkey,
    pub maker_ata_a: Pubkey,
    pub system_program: Pubkey,
    pub token_program: Pubkey,
}

impl TryFrom<&[AccountMeta]> for RefundAccounts {
    type Error = Error;

    fn try_from(accounts: &[AccountMeta]) -> Result<Self> {
        let [maker, escrow, mint_a, vault, maker_ata_a, system_program, token_program, ..] =
            accounts
        else {
            return err!(EscrowError::NotEnoughAccountKeys);
        };

        Ok(RefundAccounts {
            maker: maker.pubkey,
            escrow: escrow.pubkey,
            mint_a: mint_a.pubkey,
            vault: vault.pubkey,
            maker_ata_a: maker_ata_a.pubkey,
            system_program: system_program.pubkey,
            token_program: token_program.pubkey,
        })
    }
}
