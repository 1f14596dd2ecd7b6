use anchor_lang::prelude::*;

#[error_code(offset = 9000)]
#[derive(PartialEq, Eq)]
pub enum LedgerError {
    #[msg("Account does not exist")]
    AccountNotFound,
    #[msg("Account address is already in use")]
    AccountAlreadyInUse,
    #[msg("Missing required signature")]
    MissingRequiredSignature,
    #[msg("Account is not part of the instruction")]
    AccountNotInInstruction,
    #[msg("Account is not writable")]
    ReadonlyAccount,
    #[msg("Insufficient lamports")]
    InsufficientLamports,
    #[msg("Insufficient token balance")]
    InsufficientTokenBalance,
    #[msg("Account is not owned by the expected program")]
    InvalidAccountOwner,
    #[msg("Invalid account data")]
    InvalidAccountData,
    #[msg("Token account mint mismatch")]
    MintMismatch,
    #[msg("Mint decimals mismatch")]
    MintDecimalsMismatch,
    #[msg("Token account owner mismatch")]
    OwnerMismatch,
    #[msg("Token account is frozen")]
    AccountFrozen,
    #[msg("Token account still holds a balance")]
    NonZeroTokenBalance,
    #[msg("Invalid program derived address seeds")]
    InvalidSeeds,
    #[msg("Unknown program")]
    UnknownProgram,
    #[msg("Transaction changed the total lamport supply")]
    UnbalancedTransaction,
    #[msg("Arithmetic overflow")]
    Overflow,
}

impl LedgerError {
    pub const ALL: [LedgerError; 18] = [
        LedgerError::AccountNotFound,
        LedgerError::AccountAlreadyInUse,
        LedgerError::MissingRequiredSignature,
        LedgerError::AccountNotInInstruction,
        LedgerError::ReadonlyAccount,
        LedgerError::InsufficientLamports,
        LedgerError::InsufficientTokenBalance,
        LedgerError::InvalidAccountOwner,
        LedgerError::InvalidAccountData,
        LedgerError::MintMismatch,
        LedgerError::MintDecimalsMismatch,
        LedgerError::OwnerMismatch,
        LedgerError::AccountFrozen,
        LedgerError::NonZeroTokenBalance,
        LedgerError::InvalidSeeds,
        LedgerError::UnknownProgram,
        LedgerError::UnbalancedTransaction,
        LedgerError::Overflow,
    ];

    /// Reverse of the `u32` conversion generated by `error_code`.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|e| u32::from(*e) == code)
    }
}

/// Error code carried by an Anchor error, if it is one.
pub fn error_code_number(err: &Error) -> Option<u32> {
    match err {
        Error::AnchorError(e) => Some(e.error_code_number),
        Error::ProgramError(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_and_start_at_offset() {
        assert_eq!(u32::from(LedgerError::AccountNotFound), 9000);
        for e in LedgerError::ALL {
            assert_eq!(LedgerError::from_code(e.into()), Some(e));
        }
        assert_eq!(LedgerError::from_code(6000), None);
    }

    #[test]
    fn anchor_errors_compare_by_code() {
        let raised: Error = error!(LedgerError::AccountFrozen);
        assert_eq!(raised, Error::from(LedgerError::AccountFrozen));
        assert_eq!(error_code_number(&raised), Some(9012));
    }
}
