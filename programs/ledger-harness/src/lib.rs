//! A small in-memory account-model ledger.
//!
//! Programs are plain functions over an [`InvokeContext`]; the [`Bank`]
//! runs them atomically against an [`AccountsDb`] together with the system
//! and token primitives they call into.

pub mod account;
pub mod bank;
pub mod context;
pub mod error;
pub mod helpers;
pub mod system;
pub mod token;

pub use account::{AccountStore, AccountsDb, LedgerAccount};
pub use bank::{Bank, ProcessInstruction, Transaction};
pub use context::InvokeContext;
pub use error::LedgerError;
