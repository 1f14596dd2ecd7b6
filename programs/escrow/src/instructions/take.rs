use anchor_lang::prelude::*;
use ledger_harness::{
    helpers::{AssociatedTokenAccount, ProgramAccount, SignerAccount, TokenAccountInterface},
    InvokeContext,
};

use super::{check_mint, check_programs, load_escrow, load_vault};
use crate::{events::EscrowTaken, Escrow, EscrowError, ESCROW_SEED};

pub struct Take {
    accounts: TakeAccounts,
}

impl TryFrom<&[AccountMeta]> for Take {
    type Error = Error;

    fn try_from(value: &[AccountMeta]) -> Result<Self> {
        let accounts = TakeAccounts::try_from(value)?;

        Ok(Take { accounts })
    }
}

impl Take {
    pub const DISCRIMINATOR: u8 = 1;

    /// Validates every account and returns the open record.
    pub fn check(&self, ctx: &InvokeContext) -> Result<Escrow> {
        let accounts = &self.accounts;

        // Check if the taker signed
        SignerAccount::check(ctx, &accounts.taker)?;
        check_programs(&accounts.system_program, &accounts.token_program)?;

        // Load the record and check it matches the accounts passed in
        let escrow = load_escrow(ctx, &accounts.escrow)?;
        require_keys_eq!(escrow.maker, accounts.maker, EscrowError::InvalidMaker);
        require_keys_eq!(escrow.mint_a, accounts.mint_a, EscrowError::InvalidMintA);
        require_keys_eq!(escrow.mint_b, accounts.mint_b, EscrowError::InvalidMintB);

        check_mint(ctx, &accounts.mint_a, &accounts.token_program)?;
        check_mint(ctx, &accounts.mint_b, &accounts.token_program)?;

        load_vault(ctx, &accounts.escrow, &accounts.vault, &accounts.mint_a)?;

        // The taker must hold enough mint B to pay the maker
        require!(
            ctx.get(&accounts.taker_ata_b)?.is_some(),
            EscrowError::InsufficientFunds
        );
        let taker_ata_b = TokenAccountInterface::check(ctx, &accounts.taker_ata_b)?;
        require_keys_eq!(taker_ata_b.mint, accounts.mint_b, EscrowError::InvalidMintB);
        require_gte!(
            taker_ata_b.amount,
            escrow.receive,
            EscrowError::InsufficientFunds
        );

        Ok(escrow)
    }

    /// Creates the taker's mint A account and the maker's mint B account
    /// when missing, both paid by the taker.
    pub fn init(&self, ctx: &mut InvokeContext) -> Result<()> {
        let accounts = &self.accounts;

        AssociatedTokenAccount::init_if_needed(
            ctx,
            &accounts.taker_ata_a,
            &accounts.mint_a,
            &accounts.taker,
            &accounts.taker,
            &accounts.token_program,
        )?;

        AssociatedTokenAccount::init_if_needed(
            ctx,
            &accounts.maker_ata_b,
            &accounts.mint_b,
            &accounts.taker,
            &accounts.maker,
            &accounts.token_program,
        )
    }

    pub fn process(&self, ctx: &mut InvokeContext) -> Result<()> {
        let escrow = self.check(ctx)?;
        self.init(ctx)?;

        let accounts = &self.accounts;

        // Transfer the tokens to the maker's ATA
        TokenAccountInterface::transfer(
            ctx,
            &accounts.taker_ata_b,
            &accounts.mint_b,
            &accounts.maker_ata_b,
            &accounts.taker,
            escrow.receive,
            &[],
        )?;

        // Release the whole vault to the taker, signed by the escrow record
        let amount_a = TokenAccountInterface::check(ctx, &accounts.vault)?.amount;
        let seed = escrow.seed_bytes();
        let bump = escrow.bump_bytes();
        let signer_seeds: &[&[u8]] = &[ESCROW_SEED, escrow.maker.as_ref(), &seed, &bump];

        TokenAccountInterface::transfer(
            ctx,
            &accounts.vault,
            &accounts.mint_a,
            &accounts.taker_ata_a,
            &accounts.escrow,
            amount_a,
            signer_seeds,
        )?;

        msg!("Swap settled, closing vault and escrow");

        // Close the vault and the record, rent goes back to the maker
        TokenAccountInterface::close(
            ctx,
            &accounts.vault,
            &accounts.maker,
            &accounts.escrow,
            signer_seeds,
        )?;
        ProgramAccount::close(ctx, &accounts.escrow, &accounts.maker)?;

        emit!(EscrowTaken {
            escrow: accounts.escrow,
            maker: accounts.maker,
            taker: accounts.taker,
            amount_a,
            amount_b: escrow.receive,
        });

        Ok(())
    }
}

pub struct TakeAccounts {
    pub taker: Pubkey,
    pub maker: Pubkey,
    pub escrow: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub vault: Pubkey,
    pub taker_ata_a: Pubkey,
    pub taker_ata_b: Pubkey,
    pub maker_ata_b: Pubkey,
    pub system_program: Pubkey,
    pub token_program: Pubkey,
}

impl TryFrom<&[AccountMeta]> for TakeAccounts {
    type Error = Error;

    fn try_from(accounts: &[AccountMeta]) -> Result<Self> {
        let [taker, maker, escrow, mint_a, mint_b, vault, taker_ata_a, taker_ata_b, maker_ata_b, system_program, token_program, ..] =
            accounts
        else {
            return err!(EscrowError::NotEnoughAccountKeys);
        };

        Ok(TakeAccounts {
            taker: taker.pubkey,
            maker: maker.pubkey,
            escrow: escrow.pubkey,
            mint_a: mint_a.pubkey,
            mint_b: mint_b.pubkey,
            vault: vault.pubkey,
            taker_ata_a: taker_ata_a.pubkey,
            taker_ata_b: taker_ata_b.pubkey,
            maker_ata_b: maker_ata_b.pubkey,
            system_program: system_program.pubkey,
            token_program: token_program.pubkey,
        })
    }
}
