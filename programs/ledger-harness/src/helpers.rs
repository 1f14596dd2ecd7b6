//! Account-role checks and actions shared by programs running on the ledger.

use anchor_lang::prelude::*;
use anchor_spl::token::spl_token::state::{Account as TokenAccount, Mint};

use crate::{system, token, InvokeContext, LedgerError};

pub struct SignerAccount;

impl SignerAccount {
    pub fn check(ctx: &InvokeContext, account: &Pubkey) -> Result<()> {
        require!(ctx.is_signer(account), LedgerError::MissingRequiredSignature);
        Ok(())
    }
}

pub struct ProgramAccount;

impl ProgramAccount {
    /// The account exists, belongs to `owner` and is exactly `len` bytes.
    pub fn check(ctx: &InvokeContext, account: &Pubkey, len: usize, owner: &Pubkey) -> Result<()> {
        let info = ctx.account(account)?;
        require!(info.is_owned_by(owner), LedgerError::InvalidAccountOwner);
        require_eq!(info.data.len(), len, LedgerError::InvalidAccountData);
        Ok(())
    }

    pub fn init(
        ctx: &mut InvokeContext,
        payer: &Pubkey,
        account: &Pubkey,
        signer_seeds: &[&[u8]],
        space: usize,
        owner: &Pubkey,
    ) -> Result<()> {
        system::create_account(ctx, payer, account, space, owner, &[signer_seeds])
    }

    pub fn close(ctx: &mut InvokeContext, account: &Pubkey, destination: &Pubkey) -> Result<()> {
        system::close_program_account(ctx, account, destination)
    }
}

pub struct MintInterface;

impl MintInterface {
    pub fn check(ctx: &InvokeContext, account: &Pubkey) -> Result<Mint> {
        token::unpack_mint(ctx.account(account)?)
    }
}

pub struct TokenAccountInterface;

impl TokenAccountInterface {
    pub fn check(ctx: &InvokeContext, account: &Pubkey) -> Result<TokenAccount> {
        token::unpack_token_account(ctx.account(account)?)
    }

    pub fn init(
        ctx: &mut InvokeContext,
        account: &Pubkey,
        mint: &Pubkey,
        payer: &Pubkey,
        owner: &Pubkey,
        token_program: &Pubkey,
        signer_seeds: &[&[u8]],
    ) -> Result<()> {
        token::create_token_account(ctx, payer, account, mint, owner, token_program, &[signer_seeds])
    }

    /// Checked transfer using the decimals recorded on `mint`.
    pub fn transfer(
        ctx: &mut InvokeContext,
        from: &Pubkey,
        mint: &Pubkey,
        to: &Pubkey,
        authority: &Pubkey,
        amount: u64,
        signer_seeds: &[&[u8]],
    ) -> Result<()> {
        let decimals = MintInterface::check(ctx, mint)?.decimals;
        token::transfer_checked(ctx, from, mint, to, authority, amount, decimals, &[signer_seeds])
    }

    pub fn close(
        ctx: &mut InvokeContext,
        account: &Pubkey,
        destination: &Pubkey,
        authority: &Pubkey,
        signer_seeds: &[&[u8]],
    ) -> Result<()> {
        token::close_account(ctx, account, destination, authority, &[signer_seeds])
    }
}

pub struct AssociatedTokenAccount;

impl AssociatedTokenAccount {
    /// `account` is the associated token account of `wallet` for `mint`.
    pub fn check(
        ctx: &InvokeContext,
        account: &Pubkey,
        wallet: &Pubkey,
        mint: &Pubkey,
        token_program: &Pubkey,
    ) -> Result<TokenAccount> {
        require_keys_eq!(
            *account,
            token::associated_token_address(wallet, mint, token_program),
            LedgerError::InvalidSeeds
        );

        let state = TokenAccountInterface::check(ctx, account)?;
        require_keys_eq!(state.owner, *wallet, LedgerError::OwnerMismatch);
        require_keys_eq!(state.mint, *mint, LedgerError::MintMismatch);

        Ok(state)
    }

    pub fn init_if_needed(
        ctx: &mut InvokeContext,
        account: &Pubkey,
        mint: &Pubkey,
        payer: &Pubkey,
        wallet: &Pubkey,
        token_program: &Pubkey,
    ) -> Result<()> {
        require_keys_eq!(
            *account,
            token::associated_token_address(wallet, mint, token_program),
            LedgerError::InvalidSeeds
        );

        token::create_associated_token_account_idempotent(ctx, payer, wallet, mint, token_program)
            .map(|_| ())
    }
}
