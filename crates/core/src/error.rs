//! The typed error vocabulary shared by every operation in §7 of the
//! coordination core's contract. Independent of any particular store or
//! transport — the engine, lifecycle, and room controller all return
//! this same enum so callers get one exhaustive match.

use crate::entry::EntryStatus;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Entity does not exist. Reported, not retried.
    #[error("not found: {0}")]
    NotFound(String),

    /// Requester role/room does not match required scope. Reported.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Target company is inactive. Reported.
    #[error("company is inactive")]
    CompanyInactive,

    /// (student, company) already has a non-terminal entry. Reported.
    #[error("student already has an active entry for this company")]
    DuplicateActive,

    /// Company already has an in-progress entry. Reported.
    #[error("company already has an in-progress entry")]
    AlreadyInProgress,

    /// Current state does not permit the requested transition. Carries the
    /// current state for diagnostics.
    #[error("illegal transition from state {current}")]
    IllegalTransition { current: EntryStatus },

    /// Reschedule attempted on an entry holding position 1. Reported.
    #[error("cannot reschedule the entry at the head of the queue")]
    AtHead,

    /// Transient store conflict (unique-index race or write-write race).
    /// Retried internally up to 3 times with backoff before surfacing.
    #[error("transient conflict, retry with a fresh read")]
    Conflict,

    /// Store unavailable or timed out after retry. Reported; caller may
    /// retry at its own rhythm.
    #[error("store unavailable: {0}")]
    TransientStoreError(String),

    /// Deadline exceeded during store I/O. No partial state is observable.
    #[error("operation timed out")]
    Timeout,
}

impl CoreError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn unauthorized(why: impl Into<String>) -> Self {
        Self::Unauthorized(why.into())
    }

    /// True for the one error kind the engine retries internally (§4.3
    /// retry discipline); everything else propagates unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Conflict)
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
