pub mod make;
pub mod refund;
pub mod take;

pub use make::*;
pub use refund::*;
pub use take::*;

use anchor_lang::prelude::*;
use anchor_spl::token::spl_token::state::Account as TokenAccount;
use ledger_harness::{
    helpers::{MintInterface, ProgramAccount, TokenAccountInterface},
    system, token, InvokeContext,
};

use crate::{pda, Escrow, EscrowError};

/// The system program slot and a supported token program slot.
pub(crate) fn check_programs(system_program: &Pubkey, token_program: &Pubkey) -> Result<()> {
    require_keys_eq!(
        *system_program,
        system::ID,
        EscrowError::InvalidSystemProgram
    );
    require!(
        token::is_token_program(token_program),
        EscrowError::InvalidTokenProgram
    );
    Ok(())
}

/// A valid mint administered by `token_program`.
pub(crate) fn check_mint(ctx: &InvokeContext, mint: &Pubkey, token_program: &Pubkey) -> Result<()> {
    MintInterface::check(ctx, mint)?;
    require_keys_eq!(
        ctx.account(mint)?.owner,
        *token_program,
        EscrowError::InvalidTokenProgram
    );
    Ok(())
}

/// Loads an open record and proves it lives at its derived address.
pub(crate) fn load_escrow(ctx: &InvokeContext, escrow: &Pubkey) -> Result<Escrow> {
    require!(ctx.get(escrow)?.is_some(), EscrowError::EscrowNotFound);
    ProgramAccount::check(ctx, escrow, Escrow::LEN, &crate::ID)?;

    let record = Escrow::load(&ctx.account(escrow)?.data)?;
    pda::verify_escrow_address(&record, escrow)?;

    Ok(record)
}

/// The record's vault: derived from the record, held by it, holding mint A.
pub(crate) fn load_vault(
    ctx: &InvokeContext,
    escrow: &Pubkey,
    vault: &Pubkey,
    mint_a: &Pubkey,
) -> Result<TokenAccount> {
    pda::verify_vault_address(escrow, vault)?;
    require!(ctx.get(vault)?.is_some(), EscrowError::VaultNotFound);

    let state = TokenAccountInterface::check(ctx, vault)?;
    require_keys_eq!(state.owner, *escrow, EscrowError::InvalidVaultAddress);
    require_keys_eq!(state.mint, *mint_a, EscrowError::InvalidMintA);

    Ok(state)
}
