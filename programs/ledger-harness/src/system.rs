use anchor_lang::prelude::*;
pub use anchor_lang::system_program::ID;

use crate::{InvokeContext, LedgerAccount, LedgerError};

/// Creates a rent-exempt account at `address`, funded by `payer`.
///
/// `payer` must sign the instruction. `address` must either sign or be a
/// program derived address of the executing program for one of
/// `signer_seeds`.
pub fn create_account(
    ctx: &mut InvokeContext,
    payer: &Pubkey,
    address: &Pubkey,
    space: usize,
    owner: &Pubkey,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    ctx.check_authority(payer, &[])?;
    ctx.check_authority(address, signer_seeds)?;

    allocate_funded(ctx, payer, address, space, owner)
}

/// Funds and allocates without checking who controls `address`.
pub(crate) fn allocate_funded(
    ctx: &mut InvokeContext,
    payer: &Pubkey,
    address: &Pubkey,
    space: usize,
    owner: &Pubkey,
) -> Result<()> {
    require!(
        ctx.get(address)?.is_none(),
        LedgerError::AccountAlreadyInUse
    );

    let lamports = ctx.rent().minimum_balance(space);
    let payer_account = ctx.account_mut(payer)?;
    require_keys_eq!(payer_account.owner, ID, LedgerError::InvalidAccountOwner);
    payer_account.lamports = payer_account
        .lamports
        .checked_sub(lamports)
        .ok_or_else(|| error!(LedgerError::InsufficientLamports))?;

    ctx.create(*address, LedgerAccount::new(lamports, space, owner))
}

/// Plain lamport transfer out of a system-owned account.
pub fn transfer(ctx: &mut InvokeContext, from: &Pubkey, to: &Pubkey, lamports: u64) -> Result<()> {
    ctx.check_authority(from, &[])?;
    require_keys_eq!(
        ctx.account(from)?.owner,
        ID,
        LedgerError::InvalidAccountOwner
    );

    ctx.transfer_lamports(from, to, lamports)
}

/// Closes an account owned by the executing program, sending its lamports
/// to `destination`.
pub fn close_program_account(
    ctx: &mut InvokeContext,
    account: &Pubkey,
    destination: &Pubkey,
) -> Result<()> {
    require_keys_neq!(*account, *destination, LedgerError::InvalidAccountData);

    let closing = ctx.account(account)?;
    require_keys_eq!(
        closing.owner,
        *ctx.program_id(),
        LedgerError::InvalidAccountOwner
    );
    let lamports = closing.lamports;

    ctx.transfer_lamports(account, destination, lamports)?;
    ctx.close(account)?;

    Ok(())
}
