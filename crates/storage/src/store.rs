//! The Store contract (§4.1, §6): `begin`/`commit`/`abort` sessions with
//! snapshot-isolated reads and unique-partial constraints (U1, U2)
//! enforced as hard invariants at commit time.
//!
//! Per the design notes (§9), cross-document atomicity is modeled as a
//! single-document-per-company representation: a [`Session`] is a
//! snapshot of one company's record plus every entry referencing it, and
//! the whole document commits-or-conflicts as one unit. This keeps
//! transactions scoped to a single company (§5: "no operation holds
//! resources across suspension that would starve other companies'
//! queues") and bounds their size by the company's queue length.

use crate::error::{StoreError, StoreResult};
use crate::state::MaterializedState;
use async_trait::async_trait;
use iq_core::{Company, CompanyId, EntryId, QueueEntry, StudentId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// A snapshot of one company's document, with writes staged until commit.
#[derive(Debug)]
pub struct Session {
    company_id: CompanyId,
    base_version: u64,
    company: Company,
    entries: Vec<QueueEntry>,
    company_write: Option<Company>,
    entry_writes: HashMap<EntryId, QueueEntry>,
}

impl Session {
    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    pub fn company(&self) -> &Company {
        self.company_write.as_ref().unwrap_or(&self.company)
    }

    /// All entries referencing this company as of the snapshot, reflecting
    /// any writes staged so far in this session.
    pub fn entries(&self) -> Vec<QueueEntry> {
        let mut merged: HashMap<EntryId, QueueEntry> =
            self.entries.iter().map(|e| (e.id, e.clone())).collect();
        for (id, e) in &self.entry_writes {
            merged.insert(*id, e.clone());
        }
        merged.into_values().collect()
    }

    pub fn entry(&self, id: &EntryId) -> Option<QueueEntry> {
        if let Some(e) = self.entry_writes.get(id) {
            return Some(e.clone());
        }
        self.entries.iter().find(|e| e.id == *id).cloned()
    }

    pub fn put_company(&mut self, company: Company) {
        self.company_write = Some(company);
    }

    pub fn put_entry(&mut self, entry: QueueEntry) {
        self.entry_writes.insert(entry.id, entry);
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Begin a session scoped to one company's document. Fails `NotFound`
    /// if the company does not exist.
    async fn begin(&self, company_id: CompanyId) -> StoreResult<Session>;

    /// Commit a session's staged writes. Fails `Conflict` if the
    /// company's version changed since the session began (U1/U2
    /// violations surface through the same path, since both are
    /// detected by re-validating the document before it's written).
    async fn commit(&self, session: Session) -> StoreResult<()>;

    /// Discard a session's staged writes without touching the store.
    fn abort(&self, _session: Session) {}

    /// Create a new company document. Admin-only in practice; the store
    /// itself does not enforce authorization (§1: auth is external).
    fn create_company(&self, company: Company) -> StoreResult<()>;

    // ── Snapshot reads (§5: "Read paths ... never take write
    // transactions; they use snapshot reads and may observe stale
    // positions for at most one commit interval.") ──

    fn read_company(&self, company_id: &CompanyId) -> StoreResult<Company>;

    fn read_entry(&self, entry_id: &EntryId) -> StoreResult<QueueEntry>;

    fn read_waiting_queue(&self, company_id: &CompanyId) -> Vec<QueueEntry>;

    fn read_in_progress(&self, company_id: &CompanyId) -> Option<QueueEntry>;

    fn find_active_entry(&self, student_id: &StudentId, company_id: &CompanyId) -> Option<QueueEntry>;

    fn active_company_ids(&self) -> Vec<CompanyId>;

    /// A full read-only snapshot, used by the Sweeper which needs to walk
    /// every company without holding a write transaction open.
    fn snapshot(&self) -> MaterializedState;

    /// Cancel an entry that references a company which no longer exists
    /// (§4.6 check 5). There is no document left to scope a `Session`
    /// to, so this writes the entry directly rather than through
    /// `begin`/`commit` — the one place the store bypasses the normal
    /// transaction path, used only by the Sweeper.
    fn force_cancel_orphan(&self, entry_id: &EntryId) -> StoreResult<()>;
}

/// The reference in-memory implementation: one `RwLock<MaterializedState>`
/// shared across sessions, with per-company optimistic-concurrency
/// versions (§9 design note, option (a)).
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<MaterializedState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a store pre-loaded with an existing state, e.g. when
    /// warm-starting from a snapshot taken by another process.
    pub fn from_state(state: MaterializedState) -> Self {
        Self { state: Arc::new(RwLock::new(state)) }
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn begin(&self, company_id: CompanyId) -> StoreResult<Session> {
        let guard = self.state.read();
        let company = guard
            .get_company(&company_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("company {company_id}")))?;
        let entries = guard.entries_for_company(&company_id);
        let base_version = guard.version_of(&company_id);
        Ok(Session {
            company_id,
            base_version,
            company,
            entries,
            company_write: None,
            entry_writes: HashMap::new(),
        })
    }

    async fn commit(&self, session: Session) -> StoreResult<()> {
        let mut guard = self.state.write();
        if guard.version_of(&session.company_id) != session.base_version {
            tracing::debug!(company_id = %session.company_id, "commit conflict: version advanced since begin");
            return Err(StoreError::Conflict);
        }

        // U2: at most one in-progress entry for the company, counting both
        // the surviving snapshot entries and this commit's writes.
        let mut merged = session.entries();
        for write in session.entry_writes.values() {
            if let Some(slot) = merged.iter_mut().find(|e| e.id == write.id) {
                *slot = write.clone();
            }
        }
        let in_progress_count = merged.iter().filter(|e| e.status == iq_core::EntryStatus::InProgress).count();
        if in_progress_count > 1 {
            tracing::debug!(company_id = %session.company_id, "commit conflict: would violate U2 (one in-progress entry)");
            return Err(StoreError::Conflict);
        }

        // U1: at most one active (student, company) pair.
        let mut seen_students = std::collections::HashSet::new();
        for e in merged.iter().filter(|e| e.status.is_active()) {
            if !seen_students.insert(e.student_id) {
                tracing::debug!(company_id = %session.company_id, student_id = %e.student_id, "commit conflict: would violate U1 (one active entry per student)");
                return Err(StoreError::Conflict);
            }
        }

        if let Some(company) = session.company_write {
            guard.insert_company(company);
        }
        for (_, entry) in session.entry_writes {
            guard.put_entry(entry);
        }
        guard.bump_version(&session.company_id);
        Ok(())
    }

    fn create_company(&self, company: Company) -> StoreResult<()> {
        self.state.write().insert_company(company);
        Ok(())
    }

    fn read_company(&self, company_id: &CompanyId) -> StoreResult<Company> {
        self.state
            .read()
            .get_company(company_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("company {company_id}")))
    }

    fn read_entry(&self, entry_id: &EntryId) -> StoreResult<QueueEntry> {
        self.state
            .read()
            .get_entry(entry_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("entry {entry_id}")))
    }

    fn read_waiting_queue(&self, company_id: &CompanyId) -> Vec<QueueEntry> {
        self.state.read().waiting_queue(company_id)
    }

    fn read_in_progress(&self, company_id: &CompanyId) -> Option<QueueEntry> {
        self.state.read().in_progress_entry_for(company_id)
    }

    fn find_active_entry(&self, student_id: &StudentId, company_id: &CompanyId) -> Option<QueueEntry> {
        self.state.read().active_entry_for(student_id, company_id)
    }

    fn active_company_ids(&self) -> Vec<CompanyId> {
        self.state.read().active_company_ids()
    }

    fn snapshot(&self) -> MaterializedState {
        self.state.read().clone()
    }

    fn force_cancel_orphan(&self, entry_id: &EntryId) -> StoreResult<()> {
        let mut guard = self.state.write();
        let mut entry = guard
            .get_entry(entry_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("entry {entry_id}")))?;
        entry.status = iq_core::EntryStatus::Cancelled;
        guard.put_entry(entry);
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
