//! Error types for the ledger.

use crate::money::{Money, MoneyParseError};
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur during ledger operation.
///
/// Every ledger operation either applies fully or returns one of these
/// without having mutated any state.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Non-positive amount, empty or over-long required field
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown username, alias or handle
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Duplicate username, or alias bound to another account
    #[error("{entity} already in use: {key}")]
    Conflict { entity: &'static str, key: String },

    #[error("Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Money, available: Money },

    #[error("Insufficient credit: need {needed}, have {available}")]
    InsufficientCredit { needed: Money, available: Money },

    /// Account store or alias table full
    #[error("{resource} is full (capacity {capacity})")]
    Capacity {
        resource: &'static str,
        capacity: usize,
    },

    /// Bad credentials or wrong current password
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid command record
    #[error("Invalid command at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Missing input file argument
    #[error("Missing input file argument. Usage: pix-ledger <commands.csv> [--history] [--seed]")]
    MissingArgument,
}

impl LedgerError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    pub(crate) fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        LedgerError::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub(crate) fn conflict(entity: &'static str, key: impl Into<String>) -> Self {
        LedgerError::Conflict {
            entity,
            key: key.into(),
        }
    }
}

impl From<MoneyParseError> for LedgerError {
    fn from(err: MoneyParseError) -> Self {
        LedgerError::Validation(err.to_string())
    }
}
