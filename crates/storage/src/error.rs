//! Store-level errors (§4.1, §7). The engine maps these onto the shared
//! [`iq_core::CoreError`] vocabulary rather than inventing its own.

use iq_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    /// A unique-index race (U1/U2) or a write-write race on the same
    /// company document. Retryable by the caller with fresh reads.
    #[error("transient conflict, retry with a fresh read")]
    Conflict,

    #[error("store unavailable: {0}")]
    TransientStoreError(String),

    #[error("operation timed out")]
    Timeout,
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => CoreError::NotFound(what),
            StoreError::Conflict => CoreError::Conflict,
            StoreError::TransientStoreError(msg) => CoreError::TransientStoreError(msg),
            StoreError::Timeout => CoreError::Timeout,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
