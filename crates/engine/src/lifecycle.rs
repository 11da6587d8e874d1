//! Interview Lifecycle (§4.4): start/complete/forfeit/next, the state
//! machine that moves an entry from `waiting` to one of the terminal
//! statuses via `in_progress`.

use crate::actor::Operator;
use crate::queue_engine::recompute_positions;
use crate::retry::run_transactional;
use crate::Engine;
use iq_core::{Clock, CompanyId, CoreError, CoreResult, EntryId, EntryStatus};
use iq_storage::Store;

fn require_room_match(operator: &Operator, room: &str) -> CoreResult<()> {
    if operator.room != room {
        return Err(CoreError::unauthorized(format!(
            "operator assigned to room {} cannot act on room {room}",
            operator.room
        )));
    }
    Ok(())
}

impl<S: Store, C: Clock> Engine<S, C> {
    /// Operator convenience: forfeit the current in-progress entry (if
    /// any), then start the entry at position 1 (if any). Both state
    /// changes commit as one transaction. Fails `NotFound` if, after
    /// forfeiting, the queue is empty.
    pub async fn next(&self, company_id: CompanyId, operator: &Operator) -> CoreResult<EntryId> {
        let operator = operator.clone();
        run_transactional(Self::DEFAULT_DEADLINE, || {
            let operator = operator.clone();
            async move {
                let mut session = self.store.begin(company_id).await?;
                require_room_match(&operator, &session.company().room)?;

                let now = self.clock.now();
                if let Some(current_id) = session.company().current_entry_id {
                    if let Some(mut current) = session.entry(&current_id) {
                        current.status = EntryStatus::Passed;
                        current.passed_at = Some(now);
                        session.put_entry(current);
                    }
                }

                let head = session
                    .entries()
                    .into_iter()
                    .filter(|e| e.status == EntryStatus::Waiting)
                    .min_by(|a, b| a.sort_key().cmp(&b.sort_key()))
                    .ok_or_else(|| CoreError::not_found(format!("no waiting entries for company {company_id}")))?;
                let head_id = head.id;
                let mut head = head;
                head.status = EntryStatus::InProgress;
                head.started_at = Some(now);
                session.put_entry(head);
                recompute_positions(&mut session);

                let mut company = session.company().clone();
                company.current_entry_id = Some(head_id);
                session.put_company(company);

                self.store.commit(session).await?;
                tracing::info!(%head_id, room = %operator.room, "interview started via next");
                Ok(head_id)
            }
        })
        .await
    }

    /// Move a specific waiting entry to `in_progress`. Fails
    /// `IllegalTransition` if it isn't waiting and `AlreadyInProgress`
    /// if the company already has one running.
    pub async fn start(&self, entry_id: EntryId, operator: &Operator) -> CoreResult<()> {
        let operator = operator.clone();
        run_transactional(Self::DEFAULT_DEADLINE, || {
            let operator = operator.clone();
            async move {
                let probe = self.store.read_entry(&entry_id)?;
                let mut session = self.store.begin(probe.company_id).await?;
                require_room_match(&operator, &session.company().room)?;
                if session.company().has_in_progress() {
                    return Err(CoreError::AlreadyInProgress);
                }

                let mut entry = session
                    .entry(&entry_id)
                    .ok_or_else(|| CoreError::not_found(format!("entry {entry_id}")))?;
                if entry.status != EntryStatus::Waiting {
                    return Err(CoreError::IllegalTransition { current: entry.status });
                }
                entry.status = EntryStatus::InProgress;
                entry.started_at = Some(self.clock.now());
                session.put_entry(entry);
                recompute_positions(&mut session);

                let mut company = session.company().clone();
                company.current_entry_id = Some(entry_id);
                session.put_company(company);

                self.store.commit(session).await?;
                tracing::info!(%entry_id, room = %operator.room, "interview started");
                Ok(())
            }
        })
        .await
    }

    /// Finish an in-progress interview successfully.
    pub async fn complete(&self, entry_id: EntryId, operator: &Operator) -> CoreResult<()> {
        self.end_in_progress(entry_id, operator, EntryStatus::Completed).await
    }

    /// End an in-progress interview without completion (no-show, student
    /// withdraws mid-interview, operator cuts it short).
    pub async fn forfeit(&self, entry_id: EntryId, operator: &Operator) -> CoreResult<()> {
        self.end_in_progress(entry_id, operator, EntryStatus::Passed).await
    }

    async fn end_in_progress(&self, entry_id: EntryId, operator: &Operator, terminal: EntryStatus) -> CoreResult<()> {
        debug_assert!(matches!(terminal, EntryStatus::Completed | EntryStatus::Passed));
        let operator = operator.clone();
        run_transactional(Self::DEFAULT_DEADLINE, || {
            let operator = operator.clone();
            async move {
                let probe = self.store.read_entry(&entry_id)?;
                let mut session = self.store.begin(probe.company_id).await?;
                require_room_match(&operator, &session.company().room)?;

                let mut entry = session
                    .entry(&entry_id)
                    .ok_or_else(|| CoreError::not_found(format!("entry {entry_id}")))?;
                if entry.status != EntryStatus::InProgress {
                    return Err(CoreError::IllegalTransition { current: entry.status });
                }
                entry.status = terminal;
                let now = self.clock.now();
                match terminal {
                    EntryStatus::Completed => entry.completed_at = Some(now),
                    EntryStatus::Passed => entry.passed_at = Some(now),
                    _ => unreachable!("end_in_progress only ever sets Completed or Passed"),
                }
                session.put_entry(entry);

                let mut company = session.company().clone();
                if company.current_entry_id == Some(entry_id) {
                    company.current_entry_id = None;
                }
                session.put_company(company);

                self.store.commit(session).await?;
                tracing::info!(%entry_id, status = %terminal, "interview ended");
                Ok(())
            }
        })
        .await
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
