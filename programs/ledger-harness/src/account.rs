use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::LedgerError;

/// A single addressed record in the ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LedgerAccount {
    pub lamports: u64,
    pub owner: Pubkey,
    pub data: Vec<u8>,
}

impl LedgerAccount {
    pub fn new(lamports: u64, space: usize, owner: &Pubkey) -> Self {
        Self {
            lamports,
            owner: *owner,
            data: vec![0; space],
        }
    }

    pub fn is_owned_by(&self, program_id: &Pubkey) -> bool {
        self.owner == *program_id
    }
}

/// Address-keyed account storage the programs read and write through.
pub trait AccountStore {
    fn get(&self, address: &Pubkey) -> Option<&LedgerAccount>;

    fn get_mut(&mut self, address: &Pubkey) -> Option<&mut LedgerAccount>;

    /// Fails with `AccountAlreadyInUse` when the address is occupied.
    fn create(&mut self, address: Pubkey, account: LedgerAccount) -> Result<()>;

    /// Removes the account and hands it back. Fails with `AccountNotFound`.
    fn close(&mut self, address: &Pubkey) -> Result<LedgerAccount>;

    fn contains(&self, address: &Pubkey) -> bool {
        self.get(address).is_some()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountsDb {
    accounts: BTreeMap<Pubkey, LedgerAccount>,
}

impl AccountsDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites without any checks. Setup only.
    pub fn set(&mut self, address: Pubkey, account: LedgerAccount) {
        self.accounts.insert(address, account);
    }

    /// Sum of all lamports, `None` on overflow.
    pub fn total_lamports(&self) -> Option<u64> {
        self.accounts
            .values()
            .try_fold(0u64, |total, account| total.checked_add(account.lamports))
    }
}

impl AccountStore for AccountsDb {
    fn get(&self, address: &Pubkey) -> Option<&LedgerAccount> {
        self.accounts.get(address)
    }

    fn get_mut(&mut self, address: &Pubkey) -> Option<&mut LedgerAccount> {
        self.accounts.get_mut(address)
    }

    fn create(&mut self, address: Pubkey, account: LedgerAccount) -> Result<()> {
        require!(
            !self.accounts.contains_key(&address),
            LedgerError::AccountAlreadyInUse
        );
        self.accounts.insert(address, account);
        Ok(())
    }

    fn close(&mut self, address: &Pubkey) -> Result<LedgerAccount> {
        self.accounts
            .remove(address)
            .ok_or_else(|| error!(LedgerError::AccountNotFound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_refuses_occupied_address() {
        let mut db = AccountsDb::new();
        let address = Pubkey::new_unique();
        let owner = Pubkey::new_unique();

        db.create(address, LedgerAccount::new(10, 0, &owner)).unwrap();
        let err = db
            .create(address, LedgerAccount::new(99, 0, &owner))
            .unwrap_err();

        assert_eq!(err, Error::from(LedgerError::AccountAlreadyInUse));
        assert_eq!(db.get(&address).unwrap().lamports, 10);
    }

    #[test]
    fn close_removes_and_returns_account() {
        let mut db = AccountsDb::new();
        let address = Pubkey::new_unique();
        db.set(address, LedgerAccount::new(7, 3, &Pubkey::default()));

        let closed = db.close(&address).unwrap();
        assert_eq!(closed.lamports, 7);
        assert_eq!(closed.data, vec![0; 3]);
        assert!(!db.contains(&address));
        assert_eq!(
            db.close(&address).unwrap_err(),
            Error::from(LedgerError::AccountNotFound)
        );
    }

    #[test]
    fn total_lamports_detects_overflow() {
        let mut db = AccountsDb::new();
        db.set(Pubkey::new_unique(), LedgerAccount::new(u64::MAX, 0, &Pubkey::default()));
        assert_eq!(db.total_lamports(), Some(u64::MAX));
        db.set(Pubkey::new_unique(), LedgerAccount::new(1, 0, &Pubkey::default()));
        assert_eq!(db.total_lamports(), None);
    }
}
