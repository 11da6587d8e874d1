#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! iq-engine: the operation dispatcher (§2) that turns the external
//! verbs in §4.3-§4.6 into `iq-storage` transactions.
//!
//! `Engine<S, C>` is generic over the store and clock so tests can swap
//! in `InMemoryStore`/`FakeClock` without touching call sites; production
//! wiring picks one concrete pair and monomorphizes.

pub mod actor;
pub mod lifecycle;
pub mod queue_engine;
pub mod retry;
pub mod room_controller;
pub mod sweeper;

pub use actor::{Actor, Operator};
pub use iq_core::{CoreError as EngineError, CoreResult as EngineResult};
pub use sweeper::SweepReport;

use iq_core::{Clock, Company, CompanyId, QueueEntry};
use iq_storage::Store;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A read-only view of a company's queue for external callers (§4.3
/// read path: never a write transaction, may observe stale positions
/// for at most one commit interval).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub company: Company,
    pub in_progress: Option<QueueEntry>,
    pub waiting: Vec<QueueEntry>,
}

pub struct Engine<S, C> {
    pub(crate) store: S,
    pub(crate) clock: C,
}

impl<S: Store, C: Clock> Engine<S, C> {
    /// Default per-operation deadline (§5). Operations that need a
    /// different budget pass their own via the `_with_deadline` variants.
    pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(5);

    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Snapshot read of one company's queue. Never opens a transaction.
    pub fn read_company_queue(&self, company_id: CompanyId) -> EngineResult<QueueSnapshot> {
        let company = self.store.read_company(&company_id)?;
        let in_progress = self.store.read_in_progress(&company_id);
        let waiting = self.store.read_waiting_queue(&company_id);
        Ok(QueueSnapshot { company, in_progress, waiting })
    }

    pub fn create_company(&self, company: Company) -> EngineResult<()> {
        self.store.create_company(company)?;
        Ok(())
    }
}
