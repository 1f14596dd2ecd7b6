use anchor_lang::prelude::*;
use ledger_harness::{error::error_code_number, LedgerError};

#[error_code]
#[derive(PartialEq, Eq)]
pub enum EscrowError {
    #[msg("Deposit and receive amounts must be greater than zero")]
    InvalidAmount,
    #[msg("Invalid instruction data")]
    InvalidInstructionData,
    #[msg("Not enough account keys")]
    NotEnoughAccountKeys,
    #[msg("Maker does not match the escrow")]
    InvalidMaker,
    #[msg("Mint A does not match the escrow")]
    InvalidMintA,
    #[msg("Mint B does not match the escrow")]
    InvalidMintB,
    #[msg("Escrow address does not match its seeds")]
    InvalidEscrowAddress,
    #[msg("Vault address does not match its seeds")]
    InvalidVaultAddress,
    #[msg("Unsupported token program")]
    InvalidTokenProgram,
    #[msg("Invalid system program")]
    InvalidSystemProgram,
    #[msg("Insufficient token balance")]
    InsufficientFunds,
    #[msg("Escrow does not exist")]
    EscrowNotFound,
    #[msg("Vault does not exist")]
    VaultNotFound,
    #[msg("Escrow already exists")]
    EscrowAlreadyExists,
    #[msg("Vault already exists")]
    VaultAlreadyExists,
    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,
    #[msg("Account is not owned by the expected program")]
    InvalidAccountOwner,
    #[msg("Invalid account data")]
    InvalidAccountData,
    #[msg("Instruction sent to the wrong program")]
    IncorrectProgramId,
}

/// Broad class of a failed operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultKind {
    /// Wrong signer, insufficient balance, mismatched identities or
    /// malformed input.
    PreconditionViolation,
    NotFound,
    AlreadyExists,
    ArithmeticFault,
}

impl EscrowError {
    pub const ALL: [EscrowError; 19] = [
        EscrowError::InvalidAmount,
        EscrowError::InvalidInstructionData,
        EscrowError::NotEnoughAccountKeys,
        EscrowError::InvalidMaker,
        EscrowError::InvalidMintA,
        EscrowError::InvalidMintB,
        EscrowError::InvalidEscrowAddress,
        EscrowError::InvalidVaultAddress,
        EscrowError::InvalidTokenProgram,
        EscrowError::InvalidSystemProgram,
        EscrowError::InsufficientFunds,
        EscrowError::EscrowNotFound,
        EscrowError::VaultNotFound,
        EscrowError::EscrowAlreadyExists,
        EscrowError::VaultAlreadyExists,
        EscrowError::ArithmeticOverflow,
        EscrowError::InvalidAccountOwner,
        EscrowError::InvalidAccountData,
        EscrowError::IncorrectProgramId,
    ];

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|e| u32::from(*e) == code)
    }

    pub fn kind(&self) -> FaultKind {
        match self {
            EscrowError::EscrowNotFound | EscrowError::VaultNotFound => FaultKind::NotFound,
            EscrowError::EscrowAlreadyExists | EscrowError::VaultAlreadyExists => {
                FaultKind::AlreadyExists
            }
            EscrowError::ArithmeticOverflow => FaultKind::ArithmeticFault,
            _ => FaultKind::PreconditionViolation,
        }
    }
}

fn ledger_fault_kind(err: LedgerError) -> FaultKind {
    match err {
        LedgerError::AccountNotFound => FaultKind::NotFound,
        LedgerError::AccountAlreadyInUse => FaultKind::AlreadyExists,
        LedgerError::Overflow => FaultKind::ArithmeticFault,
        _ => FaultKind::PreconditionViolation,
    }
}

/// Classifies an error raised by the escrow program or the ledger beneath
/// it. `None` for errors neither of them defines.
pub fn fault_kind(err: &Error) -> Option<FaultKind> {
    let code = error_code_number(err)?;

    EscrowError::from_code(code)
        .map(|e| e.kind())
        .or_else(|| LedgerError::from_code(code).map(ledger_fault_kind))
}
