//! Room Controller (§4.5): the per-company, operator-scoped flags and
//! actions layered over the Queue Engine and Interview Lifecycle —
//! pause/resume, emergency mode, emergency call, and clearing a queue.

use crate::actor::Operator;
use crate::queue_engine::recompute_positions;
use crate::retry::run_transactional;
use crate::Engine;
use iq_core::{Clock, CompanyId, CoreError, CoreResult, EntryId, EntryStatus, HIGHEST_PRIORITY_SCORE};
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
    /// Pause new joins from scoring at the front of the line: entries
    /// that join while paused take the §4.2 paused-join penalty. Does
    /// not affect entries already queued.
    pub async fn pause(&self, company_id: CompanyId, operator: &Operator) -> CoreResult<()> {
        self.set_queue_paused(company_id, operator, true).await
    }

    pub async fn resume(&self, company_id: CompanyId, operator: &Operator) -> CoreResult<()> {
        self.set_queue_paused(company_id, operator, false).await
    }

    async fn set_queue_paused(&self, company_id: CompanyId, operator: &Operator, paused: bool) -> CoreResult<()> {
        let operator = operator.clone();
        run_transactional(Self::DEFAULT_DEADLINE, || {
            let operator = operator.clone();
            async move {
                let mut session = self.store.begin(company_id).await?;
                require_room_match(&operator, &session.company().room)?;
                let mut company = session.company().clone();
                company.queue_paused = paused;
                session.put_company(company);
                self.store.commit(session).await?;
                tracing::info!(%company_id, paused, "queue pause state changed");
                Ok(())
            }
        })
        .await
    }

    /// Toggle emergency mode. Enabling it also forfeits the current
    /// in-progress entry (if any) so the booth is freed instantly; a
    /// replacement is not auto-started. Disabling it is a plain flag
    /// flip.
    pub async fn set_emergency_mode(&self, company_id: CompanyId, operator: &Operator, enabled: bool) -> CoreResult<()> {
        let operator = operator.clone();
        run_transactional(Self::DEFAULT_DEADLINE, || {
            let operator = operator.clone();
            async move {
                let mut session = self.store.begin(company_id).await?;
                require_room_match(&operator, &session.company().room)?;

                let mut company = session.company().clone();
                company.emergency_mode = enabled;
                if enabled {
                    if let Some(current_id) = company.current_entry_id {
                        if let Some(mut current) = session.entry(&current_id) {
                            current.status = EntryStatus::Passed;
                            current.passed_at = Some(self.clock.now());
                            session.put_entry(current);
                        }
                        company.current_entry_id = None;
                    }
                }
                session.put_company(company);

                self.store.commit(session).await?;
                tracing::warn!(%company_id, enabled, "emergency mode changed");
                Ok(())
            }
        })
        .await
    }

    /// One-shot preemption: forfeits the current in-progress entry (if
    /// any), then starts the given entry regardless of its position.
    /// The preempted entry ends as `passed`, not returned to `waiting` —
    /// preemption is destructive to its slot. Sets the called entry's
    /// score to the highest tier so a later recompute, should it
    /// somehow return to waiting, still sorts it sensibly. Only
    /// permitted while `emergency_mode` is set.
    pub async fn emergency_call(&self, entry_id: EntryId, operator: &Operator) -> CoreResult<()> {
        let operator = operator.clone();
        run_transactional(Self::DEFAULT_DEADLINE, || {
            let operator = operator.clone();
            async move {
                let probe = self.store.read_entry(&entry_id)?;
                let mut session = self.store.begin(probe.company_id).await?;
                require_room_match(&operator, &session.company().room)?;
                if !session.company().emergency_mode {
                    return Err(CoreError::unauthorized("emergency call requires emergency mode to be enabled"));
                }

                let now = self.clock.now();
                let mut company = session.company().clone();
                if let Some(current_id) = company.current_entry_id {
                    if let Some(mut current) = session.entry(&current_id) {
                        current.status = EntryStatus::Passed;
                        current.passed_at = Some(now);
                        session.put_entry(current);
                    }
                    company.current_entry_id = None;
                }

                let mut entry = session
                    .entry(&entry_id)
                    .ok_or_else(|| CoreError::not_found(format!("entry {entry_id}")))?;
                if entry.status != EntryStatus::Waiting {
                    return Err(CoreError::IllegalTransition { current: entry.status });
                }
                entry.status = EntryStatus::InProgress;
                entry.started_at = Some(now);
                entry.priority_score = HIGHEST_PRIORITY_SCORE;
                session.put_entry(entry);
                recompute_positions(&mut session);

                company.current_entry_id = Some(entry_id);
                session.put_company(company);

                self.store.commit(session).await?;
                tracing::warn!(%entry_id, room = %operator.room, "emergency call bypassed queue order");
                Ok(())
            }
        })
        .await
    }

    /// Cancel every waiting entry for a company, e.g. when the company
    /// leaves early. Entries already `in_progress` are untouched.
    pub async fn clear_queue(&self, company_id: CompanyId, operator: &Operator) -> CoreResult<usize> {
        let operator = operator.clone();
        run_transactional(Self::DEFAULT_DEADLINE, || {
            let operator = operator.clone();
            async move {
                let mut session = self.store.begin(company_id).await?;
                require_room_match(&operator, &session.company().room)?;
                let now = self.clock.now();
                let mut cancelled = 0usize;
                for mut entry in session.entries() {
                    if entry.status == EntryStatus::Waiting {
                        entry.status = EntryStatus::Cancelled;
                        entry.cancelled_at = Some(now);
                        session.put_entry(entry);
                        cancelled += 1;
                    }
                }
                self.store.commit(session).await?;
                tracing::info!(%company_id, cancelled, "queue cleared");
                Ok(cancelled)
            }
        })
        .await
    }
}

#[cfg(test)]
#[path = "room_controller_tests.rs"]
mod tests;
