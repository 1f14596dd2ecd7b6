//! Instruction builders with the fixed account order each processor parses.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use ledger_harness::{system, token::associated_token_address};

use crate::{pda, Make, MakeData, Refund, Take};

pub fn escrow_address(maker: &Pubkey, seed: u64) -> Pubkey {
    pda::find_escrow_address(maker, seed).0
}

pub fn vault_address(escrow: &Pubkey) -> Pubkey {
    pda::find_vault_address(escrow).0
}

/// Opens an offer of `deposit` mint A for `receive` mint B. The maker's
/// mint A account is their associated token account.
pub fn make(
    maker: &Pubkey,
    mint_a: &Pubkey,
    mint_b: &Pubkey,
    token_program: &Pubkey,
    seed: u64,
    deposit: u64,
    receive: u64,
) -> Instruction {
    let escrow = escrow_address(maker, seed);

    let mut data = vec![Make::DISCRIMINATOR];
    data.extend_from_slice(
        &MakeData {
            seed,
            deposit,
            receive,
        }
        .to_bytes(),
    );

    Instruction {
        program_id: crate::ID,
        accounts: vec![
            AccountMeta::new(*maker, true),
            AccountMeta::new(escrow, false),
            AccountMeta::new_readonly(*mint_a, false),
            AccountMeta::new_readonly(*mint_b, false),
            AccountMeta::new(associated_token_address(maker, mint_a, token_program), false),
            AccountMeta::new(vault_address(&escrow), false),
            AccountMeta::new_readonly(system::ID, false),
            AccountMeta::new_readonly(*token_program, false),
        ],
        data,
    }
}

/// Accepts the offer at `maker`/`seed` from `taker`'s associated accounts.
pub fn take(
    taker: &Pubkey,
    maker: &Pubkey,
    mint_a: &Pubkey,
    mint_b: &Pubkey,
    token_program: &Pubkey,
    seed: u64,
) -> Instruction {
    let escrow = escrow_address(maker, seed);

    Instruction {
        program_id: crate::ID,
        accounts: vec![
            AccountMeta::new(*taker, true),
            AccountMeta::new(*maker, false),
            AccountMeta::new(escrow, false),
            AccountMeta::new_readonly(*mint_a, false),
            AccountMeta::new_readonly(*mint_b, false),
            AccountMeta::new(vault_address(&escrow), false),
            AccountMeta::new(associated_token_address(taker, mint_a, token_program), false),
            AccountMeta::new(associated_token_address(taker, mint_b, token_program), false),
            AccountMeta::new(associated_token_address(maker, mint_b, token_program), false),
            AccountMeta::new_readonly(system::ID, false),
            AccountMeta::new_readonly(*token_program, false),
        ],
        data: vec![Take::DISCRIMINATOR],
    }
}

/// Cancels the offer at `maker`/`seed`. `signer` is normally the maker;
/// any other signer is rejected by the program.
pub fn refund(
    signer: &Pubkey,
    maker: &Pubkey,
    mint_a: &Pubkey,
    token_program: &Pubkey,
    seed: u64,
) -> Instruction {
    let escrow = escrow_address(maker, seed);

    Instruction {
        program_id: crate::ID,
        accounts: vec![
            AccountMeta::new(*signer, true),
            AccountMeta::new(escrow, false),
            AccountMeta::new_readonly(*mint_a, false),
            AccountMeta::new(vault_address(&escrow), false),
            AccountMeta::new(associated_token_address(signer, mint_a, token_program), false),
            AccountMeta::new_readonly(system::ID, false),
            AccountMeta::new_readonly(*token_program, false),
        ],
        data: vec![Refund::DISCRIMINATOR],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_harness::token::TOKEN_PROGRAM_ID;

    #[test]
    fn make_encodes_discriminator_and_arguments() {
        let maker = Pubkey::new_unique();
        let ix = make(
            &maker,
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &TOKEN_PROGRAM_ID,
            7,
            1_000_000,
            500_000,
        );

        assert_eq!(ix.data.len(), 25);
        assert_eq!(ix.data[0], Make::DISCRIMINATOR);
        assert_eq!(&ix.data[1..9], &7u64.to_le_bytes());
        assert_eq!(&ix.data[9..17], &1_000_000u64.to_le_bytes());
        assert_eq!(&ix.data[17..25], &500_000u64.to_le_bytes());

        assert_eq!(ix.accounts.len(), 8);
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[1].pubkey, escrow_address(&maker, 7));
        assert_eq!(ix.accounts[5].pubkey, vault_address(&escrow_address(&maker, 7)));
        assert!(ix.accounts.iter().skip(1).all(|meta| !meta.is_signer));
    }

    #[test]
    fn take_and_refund_lists_match_processor_order() {
        let maker = Pubkey::new_unique();
        let taker = Pubkey::new_unique();
        let mint_a = Pubkey::new_unique();
        let mint_b = Pubkey::new_unique();

        let take_ix = take(&taker, &maker, &mint_a, &mint_b, &TOKEN_PROGRAM_ID, 3);
        assert_eq!(take_ix.data, vec![Take::DISCRIMINATOR]);
        assert_eq!(take_ix.accounts.len(), 11);
        assert_eq!(take_ix.accounts[1].pubkey, maker);
        assert_eq!(
            take_ix.accounts[8].pubkey,
            associated_token_address(&maker, &mint_b, &TOKEN_PROGRAM_ID)
        );

        let refund_ix = refund(&maker, &maker, &mint_a, &TOKEN_PROGRAM_ID, 3);
        assert_eq!(refund_ix.data, vec![Refund::DISCRIMINATOR]);
        assert_eq!(refund_ix.accounts.len(), 7);
        assert_eq!(refund_ix.accounts[1].pubkey, take_ix.accounts[2].pubkey);
    }
}
