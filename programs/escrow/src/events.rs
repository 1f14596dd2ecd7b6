use anchor_lang::prelude::borsh;
use anchor_lang::prelude::*;

#[event]
pub struct EscrowMade {
    pub escrow: Pubkey,
    pub maker: Pubkey,
    pub seed: u64,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub deposit: u64,
    pub receive: u64,
}

#[event]
pub struct EscrowTaken {
    pub escrow: Pubkey,
    pub maker: Pubkey,
    pub taker: Pubkey,
    /// Mint A released from the vault to the taker.
    pub amount_a: u64,
    /// Mint B paid by the taker to the maker.
    pub amount_b: u64,
}

#[event]
pub struct EscrowRefunded {
    pub escrow: Pubkey,
    pub maker: Pubkey,
    pub amount_a: u64,
}
