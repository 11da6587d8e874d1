#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! iq-core: entities, enumerations, and the pure priority-scoring
//! function shared by the queue and interview coordination core.
//!
//! This crate has no knowledge of persistence, transactions, or
//! concurrency — those live in `iq-storage` and `iq-engine`. Everything
//! here is a plain value type plus the §4.2 scorer.

pub mod macros;

pub mod clock;
pub mod company;
pub mod entry;
pub mod error;
pub mod id;
pub mod ids;
pub mod scorer;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use company::{Company, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};
#[cfg(any(test, feature = "test-support"))]
pub use company::CompanyBuilder;
pub use entry::{EntryStatus, OpportunityKind, QueueEntry, StudentCategory};
#[cfg(any(test, feature = "test-support"))]
pub use entry::QueueEntryBuilder;
pub use error::{CoreError, CoreResult};
pub use ids::{CompanyId, EntryId, OperatorId, StudentId};
pub use scorer::{priority_score, HIGHEST_PRIORITY_SCORE, PAUSED_JOIN_PENALTY};
