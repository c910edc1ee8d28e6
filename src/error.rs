//! Errors raised by the ledger core.
//!
//! - [`InvalidConfiguration`] is fatal to a single derivation call.
//! - [`MalformedRecord`] is isolated to one record: the engine logs it,
//!   counts it and keeps going.
//!
//!  [`InvalidConfiguration`]: LedgerError::InvalidConfiguration
//!  [`MalformedRecord`]: LedgerError::MalformedRecord
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("malformed record `{id}`: {reason}")]
    MalformedRecord { id: String, reason: String },
}

impl LedgerError {
    pub(crate) fn malformed(id: &str, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}
