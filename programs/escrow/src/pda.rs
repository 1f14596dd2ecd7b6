use anchor_lang::prelude::*;

use crate::{Escrow, EscrowError, ESCROW_SEED, VAULT_SEED};

pub fn find_escrow_address(maker: &Pubkey, seed: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[ESCROW_SEED, maker.as_ref(), &seed.to_le_bytes()],
        &crate::ID,
    )
}

pub fn find_vault_address(escrow: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VAULT_SEED, escrow.as_ref()], &crate::ID)
}

/// Re-derives the record address from its stored seed, maker and bump.
///
/// This binds the record to its maker: a record whose `maker` field was
/// not the one it was derived for cannot pass.
pub fn verify_escrow_address(escrow: &Escrow, address: &Pubkey) -> Result<()> {
    let derived = Pubkey::create_program_address(
        &[
            ESCROW_SEED,
            escrow.maker.as_ref(),
            &escrow.seed_bytes(),
            &escrow.bump_bytes(),
        ],
        &crate::ID,
    )
    .map_err(|_| error!(EscrowError::InvalidEscrowAddress))?;

    require_keys_eq!(derived, *address, EscrowError::InvalidEscrowAddress);
    Ok(())
}

/// The vault bump is not stored, so the canonical one is searched for.
pub fn verify_vault_address(escrow: &Pubkey, vault: &Pubkey) -> Result<u8> {
    let (derived, bump) = find_vault_address(escrow);
    require_keys_eq!(derived, *vault, EscrowError::InvalidVaultAddress);
    Ok(bump)
}
