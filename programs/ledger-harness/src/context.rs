use anchor_lang::prelude::*;

use crate::{AccountStore, LedgerAccount, LedgerError};

/// What a program sees while one instruction executes.
///
/// Every read or write goes through the instruction's account list: an
/// address that is not listed cannot be touched, and only accounts marked
/// writable can be mutated, created or closed.
pub struct InvokeContext<'a> {
    program_id: Pubkey,
    metas: &'a [AccountMeta],
    store: &'a mut dyn AccountStore,
    rent: &'a Rent,
}

impl<'a> InvokeContext<'a> {
    pub fn new(
        program_id: Pubkey,
        metas: &'a [AccountMeta],
        store: &'a mut dyn AccountStore,
        rent: &'a Rent,
    ) -> Self {
        Self {
            program_id,
            metas,
            store,
            rent,
        }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn rent(&self) -> &Rent {
        self.rent
    }

    pub fn metas(&self) -> &'a [AccountMeta] {
        self.metas
    }

    pub fn meta(&self, address: &Pubkey) -> Result<&'a AccountMeta> {
        self.metas
            .iter()
            .find(|meta| meta.pubkey == *address)
            .ok_or_else(|| error!(LedgerError::AccountNotInInstruction))
    }

    pub fn is_signer(&self, address: &Pubkey) -> bool {
        self.metas
            .iter()
            .any(|meta| meta.pubkey == *address && meta.is_signer)
    }

    /// `None` when the listed address holds no account.
    pub fn get(&self, address: &Pubkey) -> Result<Option<&LedgerAccount>> {
        self.meta(address)?;
        Ok(self.store.get(address))
    }

    pub fn account(&self, address: &Pubkey) -> Result<&LedgerAccount> {
        self.get(address)?
            .ok_or_else(|| error!(LedgerError::AccountNotFound))
    }

    pub fn account_mut(&mut self, address: &Pubkey) -> Result<&mut LedgerAccount> {
        self.require_writable(address)?;
        self.store
            .get_mut(address)
            .ok_or_else(|| error!(LedgerError::AccountNotFound))
    }

    pub fn create(&mut self, address: Pubkey, account: LedgerAccount) -> Result<()> {
        self.require_writable(&address)?;
        self.store.create(address, account)
    }

    pub fn close(&mut self, address: &Pubkey) -> Result<LedgerAccount> {
        self.require_writable(address)?;
        self.store.close(address)
    }

    /// Accepts a direct signer of the instruction, or an address derived
    /// from one of `signer_seeds` under the executing program.
    pub fn check_authority(&self, authority: &Pubkey, signer_seeds: &[&[&[u8]]]) -> Result<()> {
        if self.is_signer(authority) {
            return Ok(());
        }

        let derived = signer_seeds.iter().any(|seeds| {
            Pubkey::create_program_address(seeds, &self.program_id)
                .map(|address| address == *authority)
                .unwrap_or(false)
        });
        require!(derived, LedgerError::MissingRequiredSignature);

        Ok(())
    }

    /// Moves lamports between two listed, writable accounts.
    pub fn transfer_lamports(&mut self, from: &Pubkey, to: &Pubkey, lamports: u64) -> Result<()> {
        let from_balance = self
            .account(from)?
            .lamports
            .checked_sub(lamports)
            .ok_or_else(|| error!(LedgerError::InsufficientLamports))?;
        let to_balance = self
            .account(to)?
            .lamports
            .checked_add(lamports)
            .ok_or_else(|| error!(LedgerError::Overflow))?;

        if from == to {
            return Ok(());
        }

        self.account_mut(from)?.lamports = from_balance;
        self.account_mut(to)?.lamports = to_balance;

        Ok(())
    }

    fn require_writable(&self, address: &Pubkey) -> Result<()> {
        require!(self.meta(address)?.is_writable, LedgerError::ReadonlyAccount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AccountsDb;

    #[test]
    fn unlisted_and_readonly_accounts_are_guarded() {
        let listed = Pubkey::new_unique();
        let readonly = Pubkey::new_unique();
        let unlisted = Pubkey::new_unique();

        let mut db = AccountsDb::new();
        for address in [listed, readonly, unlisted] {
            db.set(address, LedgerAccount::new(5, 0, &Pubkey::default()));
        }

        let metas = [
            AccountMeta::new(listed, false),
            AccountMeta::new_readonly(readonly, false),
        ];
        let rent = Rent::default();
        let mut ctx = InvokeContext::new(Pubkey::new_unique(), &metas, &mut db, &rent);

        assert_eq!(ctx.account(&listed).unwrap().lamports, 5);
        assert_eq!(
            ctx.account(&unlisted).unwrap_err(),
            Error::from(LedgerError::AccountNotInInstruction)
        );
        assert_eq!(
            ctx.account_mut(&readonly).unwrap_err(),
            Error::from(LedgerError::ReadonlyAccount)
        );
        assert!(ctx.account_mut(&listed).is_ok());
    }

    #[test]
    fn program_derived_authority_needs_matching_seeds() {
        let program_id = Pubkey::new_unique();
        let (pda, bump) = Pubkey::find_program_address(&[b"authority"], &program_id);
        let metas = [AccountMeta::new_readonly(pda, false)];
        let mut db = AccountsDb::new();
        let rent = Rent::default();
        let ctx = InvokeContext::new(program_id, &metas, &mut db, &rent);

        let bump_seed = [bump];
        let good: &[&[u8]] = &[b"authority", &bump_seed];
        let wrong: &[&[u8]] = &[b"other", &bump_seed];

        assert!(ctx.check_authority(&pda, &[good]).is_ok());
        assert_eq!(
            ctx.check_authority(&pda, &[wrong]).unwrap_err(),
            Error::from(LedgerError::MissingRequiredSignature)
        );
        assert_eq!(
            ctx.check_authority(&pda, &[]).unwrap_err(),
            Error::from(LedgerError::MissingRequiredSignature)
        );
    }

    #[test]
    fn lamport_transfer_is_checked() {
        let from = Pubkey::new_unique();
        let to = Pubkey::new_unique();
        let mut db = AccountsDb::new();
        db.set(from, LedgerAccount::new(10, 0, &Pubkey::default()));
        db.set(to, LedgerAccount::new(u64::MAX - 5, 0, &Pubkey::default()));

        let metas = [AccountMeta::new(from, true), AccountMeta::new(to, false)];
        let rent = Rent::default();
        let mut ctx = InvokeContext::new(Pubkey::new_unique(), &metas, &mut db, &rent);

        assert_eq!(
            ctx.transfer_lamports(&from, &to, 11).unwrap_err(),
            Error::from(LedgerError::InsufficientLamports)
        );
        assert_eq!(
            ctx.transfer_lamports(&from, &to, 6).unwrap_err(),
            Error::from(LedgerError::Overflow)
        );
        ctx.transfer_lamports(&from, &to, 5).unwrap();
        assert_eq!(ctx.account(&from).unwrap().lamports, 5);
        assert_eq!(ctx.account(&to).unwrap().lamports, u64::MAX);
    }
}
