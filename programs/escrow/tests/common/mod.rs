//! Shared fixture for the escrow integration tests.
#![allow(dead_code, unused_imports)]

pub use anchor_lang::prelude::*;
pub use anchor_lang::solana_program::instruction::Instruction;
use anchor_spl::token::spl_token::{
    solana_program::program_pack::Pack, state::Account as SplTokenAccount,
};
pub use escrow::{client, fault_kind, Escrow, EscrowError, FaultKind};
pub use ledger_harness::{
    token::{self, TOKEN_2022_PROGRAM_ID, TOKEN_PROGRAM_ID},
    AccountsDb, Bank, LedgerAccount, LedgerError, Transaction,
};

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
pub const DECIMALS: u8 = 6;

/// Seed and amounts of the reference offer: 1_000_000 A for 500_000 B.
pub const SEED: u64 = 7;
pub const DEPOSIT: u64 = 1_000_000;
pub const RECEIVE: u64 = 500_000;

pub struct TestContext {
    pub bank: Bank,
    pub token_program: Pubkey,
    pub mint_authority: Pubkey,
    pub maker: Pubkey,
    pub taker: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub maker_ata_a: Pubkey,
    pub taker_ata_b: Pubkey,
}

/// Token and lamport holdings of both parties at one point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Balances {
    pub maker_lamports: u64,
    pub taker_lamports: u64,
    pub maker_a: u64,
    pub maker_b: u64,
    pub taker_a: u64,
    pub taker_b: u64,
}

impl TestContext {
    /// Maker holds `DEPOSIT` of mint A, taker holds `RECEIVE` of mint B.
    pub fn new() -> Self {
        Self::with_token_program(TOKEN_PROGRAM_ID)
    }

    pub fn with_token_program(token_program: Pubkey) -> Self {
        Self::funded(token_program, DEPOSIT, RECEIVE)
    }

    pub fn funded(token_program: Pubkey, maker_a: u64, taker_b: u64) -> Self {
        let mut bank = Bank::new();
        bank.add_program(escrow::ID, escrow::process_instruction);

        let mint_authority = Pubkey::new_unique();
        let maker = Pubkey::new_unique();
        let taker = Pubkey::new_unique();
        bank.airdrop(&maker, 10 * LAMPORTS_PER_SOL).unwrap();
        bank.airdrop(&taker, 10 * LAMPORTS_PER_SOL).unwrap();

        let mint_a = bank
            .create_mint_with_program(&mint_authority, DECIMALS, &token_program)
            .unwrap();
        let mint_b = bank
            .create_mint_with_program(&mint_authority, DECIMALS, &token_program)
            .unwrap();

        let maker_ata_a = bank.create_associated_token_account(&maker, &mint_a).unwrap();
        let taker_ata_b = bank.create_associated_token_account(&taker, &mint_b).unwrap();
        bank.mint_to(&mint_a, &maker_ata_a, maker_a).unwrap();
        bank.mint_to(&mint_b, &taker_ata_b, taker_b).unwrap();

        Self {
            bank,
            token_program,
            mint_authority,
            maker,
            taker,
            mint_a,
            mint_b,
            maker_ata_a,
            taker_ata_b,
        }
    }

    pub fn ata(&self, wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
        token::associated_token_address(wallet, mint, &self.token_program)
    }

    pub fn escrow_address(&self, seed: u64) -> Pubkey {
        client::escrow_address(&self.maker, seed)
    }

    pub fn vault_address(&self, seed: u64) -> Pubkey {
        client::vault_address(&self.escrow_address(seed))
    }

    pub fn make_ix(&self, seed: u64, deposit: u64, receive: u64) -> Instruction {
        client::make(
            &self.maker,
            &self.mint_a,
            &self.mint_b,
            &self.token_program,
            seed,
            deposit,
            receive,
        )
    }

    pub fn take_ix(&self, seed: u64) -> Instruction {
        client::take(
            &self.taker,
            &self.maker,
            &self.mint_a,
            &self.mint_b,
            &self.token_program,
            seed,
        )
    }

    pub fn refund_ix(&self, signer: &Pubkey, seed: u64) -> Instruction {
        client::refund(signer, &self.maker, &self.mint_a, &self.token_program, seed)
    }

    pub fn make(&mut self, seed: u64, deposit: u64, receive: u64) -> Result<()> {
        let ix = self.make_ix(seed, deposit, receive);
        let maker = self.maker;
        self.bank.process_instruction(ix, &[&maker])
    }

    pub fn take(&mut self, seed: u64) -> Result<()> {
        let ix = self.take_ix(seed);
        let taker = self.taker;
        self.bank.process_instruction(ix, &[&taker])
    }

    pub fn refund(&mut self, seed: u64) -> Result<()> {
        let maker = self.maker;
        self.refund_as(&maker, seed)
    }

    pub fn refund_as(&mut self, signer: &Pubkey, seed: u64) -> Result<()> {
        let ix = self.refund_ix(signer, seed);
        self.bank.process_instruction(ix, &[signer])
    }

    /// The stored record, if one is open at `seed`.
    pub fn escrow(&self, seed: u64) -> Option<Escrow> {
        self.bank
            .get_account(&self.escrow_address(seed))
            .map(|account| Escrow::load(&account.data).unwrap())
    }

    /// Zero when the token account does not exist.
    pub fn token_balance(&self, address: &Pubkey) -> u64 {
        if self.bank.contains(address) {
            self.bank.token_balance(address).unwrap()
        } else {
            0
        }
    }

    pub fn balances(&self) -> Balances {
        Balances {
            maker_lamports: self.bank.lamports(&self.maker),
            taker_lamports: self.bank.lamports(&self.taker),
            maker_a: self.token_balance(&self.ata(&self.maker, &self.mint_a)),
            maker_b: self.token_balance(&self.ata(&self.maker, &self.mint_b)),
            taker_a: self.token_balance(&self.ata(&self.taker, &self.mint_a)),
            taker_b: self.token_balance(&self.ata(&self.taker, &self.mint_b)),
        }
    }

    pub fn token_account_rent(&self) -> u64 {
        self.bank
            .rent()
            .minimum_balance(SplTokenAccount::LEN)
    }

    pub fn escrow_rent(&self) -> u64 {
        self.bank.rent().minimum_balance(Escrow::LEN)
    }
}

/// Fails the test unless `result` is an error of the given class.
#[track_caller]
pub fn assert_fault(result: Result<()>, kind: FaultKind) {
    match result {
        Ok(()) => panic!("expected {kind:?}, operation succeeded"),
        Err(err) => assert_eq!(fault_kind(&err), Some(kind), "unexpected error: {err}"),
    }
}
