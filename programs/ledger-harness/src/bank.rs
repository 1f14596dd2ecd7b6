use std::collections::BTreeMap;

use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_spl::token::spl_token::state::{Account as TokenAccount, AccountState};

use crate::{system, token, AccountStore, AccountsDb, InvokeContext, LedgerAccount, LedgerError};

/// Entrypoint signature of a program registered with the [`Bank`].
pub type ProcessInstruction = fn(&mut InvokeContext, &[u8]) -> Result<()>;

/// Ordered instructions plus the identities that signed them.
#[derive(Clone, Debug, Default)]
pub struct Transaction {
    instructions: Vec<Instruction>,
    signers: Vec<Pubkey>,
}

impl Transaction {
    pub fn new(instructions: &[Instruction], signers: &[&Pubkey]) -> Self {
        Self {
            instructions: instructions.to_vec(),
            signers: signers.iter().map(|signer| **signer).collect(),
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn signers(&self) -> &[Pubkey] {
        &self.signers
    }
}

/// In-memory ledger executing transactions all-or-nothing.
///
/// Transactions run one at a time against a working copy of the accounts
/// which replaces the committed state only after every instruction
/// succeeded and the lamport supply is unchanged.
#[derive(Clone)]
pub struct Bank {
    accounts: AccountsDb,
    programs: BTreeMap<Pubkey, ProcessInstruction>,
    rent: Rent,
    transaction_count: u64,
}

impl Default for Bank {
    fn default() -> Self {
        Self::new()
    }
}

impl Bank {
    pub fn new() -> Self {
        Self::with_rent(Rent::default())
    }

    pub fn with_rent(rent: Rent) -> Self {
        Self {
            accounts: AccountsDb::new(),
            programs: BTreeMap::new(),
            rent,
            transaction_count: 0,
        }
    }

    pub fn add_program(&mut self, program_id: Pubkey, entrypoint: ProcessInstruction) {
        self.programs.insert(program_id, entrypoint);
    }

    pub fn process_transaction(&mut self, transaction: &Transaction) -> Result<()> {
        let mut working = self.accounts.clone();
        let supply = working
            .total_lamports()
            .ok_or_else(|| error!(LedgerError::Overflow))?;

        for (index, instruction) in transaction.instructions().iter().enumerate() {
            if let Err(err) = self.execute(&mut working, instruction, transaction.signers()) {
                msg!("Instruction {} failed, transaction rolled back", index);
                err.log();
                return Err(err);
            }
        }

        let supply_after = working
            .total_lamports()
            .ok_or_else(|| error!(LedgerError::Overflow))?;
        require_eq!(supply, supply_after, LedgerError::UnbalancedTransaction);

        self.accounts = working;
        self.transaction_count += 1;

        Ok(())
    }

    /// Runs one instruction as its own transaction.
    pub fn process_instruction(&mut self, instruction: Instruction, signers: &[&Pubkey]) -> Result<()> {
        self.process_transaction(&Transaction::new(&[instruction], signers))
    }

    fn execute(&self, store: &mut AccountsDb, instruction: &Instruction, signers: &[Pubkey]) -> Result<()> {
        let entrypoint = self
            .programs
            .get(&instruction.program_id)
            .ok_or_else(|| error!(LedgerError::UnknownProgram))?;

        for meta in instruction.accounts.iter().filter(|meta| meta.is_signer) {
            require!(
                signers.contains(&meta.pubkey),
                LedgerError::MissingRequiredSignature
            );
        }

        let mut ctx = InvokeContext::new(instruction.program_id, &instruction.accounts, store, &self.rent);
        entrypoint(&mut ctx, &instruction.data)
    }

    pub fn rent(&self) -> &Rent {
        &self.rent
    }

    pub fn transaction_count(&self) -> u64 {
        self.transaction_count
    }

    pub fn accounts(&self) -> &AccountsDb {
        &self.accounts
    }

    pub fn get_account(&self, address: &Pubkey) -> Option<&LedgerAccount> {
        self.accounts.get(address)
    }

    pub fn contains(&self, address: &Pubkey) -> bool {
        self.accounts.contains(address)
    }

    /// Zero for addresses that hold no account.
    pub fn lamports(&self, address: &Pubkey) -> u64 {
        self.get_account(address)
            .map(|account| account.lamports)
            .unwrap_or_default()
    }

    pub fn token_account(&self, address: &Pubkey) -> Result<TokenAccount> {
        let account = self
            .get_account(address)
            .ok_or_else(|| error!(LedgerError::AccountNotFound))?;
        token::unpack_token_account(account)
    }

    pub fn token_balance(&self, address: &Pubkey) -> Result<u64> {
        Ok(self.token_account(address)?.amount)
    }

    // Setup helpers below write the committed state directly and bypass
    // signature checks.

    pub fn set_account(&mut self, address: Pubkey, account: LedgerAccount) {
        self.accounts.set(address, account);
    }

    /// Credits `lamports`, creating a system account when the address is
    /// vacant.
    pub fn airdrop(&mut self, address: &Pubkey, lamports: u64) -> Result<()> {
        match self.accounts.get_mut(address) {
            Some(account) => {
                account.lamports = account
                    .lamports
                    .checked_add(lamports)
                    .ok_or_else(|| error!(LedgerError::Overflow))?;
            }
            None => self
                .accounts
                .set(*address, LedgerAccount::new(lamports, 0, &system::ID)),
        }

        Ok(())
    }

    pub fn create_mint(&mut self, authority: &Pubkey, decimals: u8) -> Result<Pubkey> {
        self.create_mint_with_program(authority, decimals, &token::TOKEN_PROGRAM_ID)
    }

    pub fn create_mint_with_program(
        &mut self,
        authority: &Pubkey,
        decimals: u8,
        token_program: &Pubkey,
    ) -> Result<Pubkey> {
        let mint = Pubkey::new_unique();
        let account = token::mint_account(&self.rent, decimals, Some(*authority), token_program)?;
        self.accounts.set(mint, account);

        Ok(mint)
    }

    /// Returns the existing associated account or creates an empty one.
    pub fn create_associated_token_account(&mut self, wallet: &Pubkey, mint: &Pubkey) -> Result<Pubkey> {
        let token_program = self
            .get_account(mint)
            .ok_or_else(|| error!(LedgerError::AccountNotFound))?
            .owner;
        let address = token::associated_token_address(wallet, mint, &token_program);

        if !self.contains(&address) {
            let account = token::token_account(&self.rent, mint, wallet, 0, &token_program)?;
            self.accounts.set(address, account);
        }

        Ok(address)
    }

    pub fn mint_to(&mut self, mint: &Pubkey, destination: &Pubkey, amount: u64) -> Result<()> {
        let mint_account = self
            .get_account(mint)
            .ok_or_else(|| error!(LedgerError::AccountNotFound))?;
        let mut mint_state = token::unpack_mint(mint_account)?;
        mint_state.supply = mint_state
            .supply
            .checked_add(amount)
            .ok_or_else(|| error!(LedgerError::Overflow))?;

        let mut holder = self.token_account(destination)?;
        require_keys_eq!(holder.mint, *mint, LedgerError::MintMismatch);
        holder.amount = holder
            .amount
            .checked_add(amount)
            .ok_or_else(|| error!(LedgerError::Overflow))?;

        let mut mint_account = mint_account.clone();
        token::pack_mint(&mut mint_account, mint_state)?;
        self.accounts.set(*mint, mint_account);

        let account = self
            .accounts
            .get_mut(destination)
            .ok_or_else(|| error!(LedgerError::AccountNotFound))?;
        token::pack_token_account(account, holder)
    }

    pub fn freeze_token_account(&mut self, address: &Pubkey) -> Result<()> {
        let mut state = self.token_account(address)?;
        state.state = AccountState::Frozen;

        let account = self
            .accounts
            .get_mut(address)
            .ok_or_else(|| error!(LedgerError::AccountNotFound))?;
        token::pack_token_account(account, state)
    }
}
