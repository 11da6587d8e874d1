//! Queue Engine (§4.3): join/leave/cancel/reschedule/reorder/
//! priority_override, plus the position-recomputation algorithm that
//! keeps `queue_position` dense and sorted after every mutation.

use crate::retry::run_transactional;
use crate::{Actor, Engine};
use iq_core::{
    CompanyId, CoreError, CoreResult, EntryId, EntryStatus, OpportunityKind, QueueEntry,
    StudentCategory, HIGHEST_PRIORITY_SCORE,
};
use iq_core::{priority_score, Clock};
use iq_storage::{Session, Store};
use std::collections::HashMap;

/// Re-sorts every waiting entry in the session by `sort_key()` and
/// assigns dense 1..N positions, writing back only entries whose
/// position actually changed. Returns the final position of every
/// waiting entry so callers don't need a second read.
pub(crate) fn recompute_positions(session: &mut Session) -> HashMap<EntryId, u32> {
    let mut waiting: Vec<QueueEntry> = session
        .entries()
        .into_iter()
        .filter(|e| e.status == EntryStatus::Waiting)
        .collect();
    waiting.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    let mut positions = HashMap::with_capacity(waiting.len());
    for (index, mut entry) in waiting.into_iter().enumerate() {
        let position = (index + 1) as u32;
        positions.insert(entry.id, position);
        if entry.queue_position != position {
            entry.queue_position = position;
            session.put_entry(entry);
        }
    }

    // A natural recomputation always restores score/position agreement,
    // so any admin reorder override in effect is now moot.
    if session.company().queue_position_override {
        let mut company = session.company().clone();
        company.queue_position_override = false;
        session.put_company(company);
    }
    positions
}

fn require_waiting(entry: &QueueEntry) -> CoreResult<()> {
    if entry.status != EntryStatus::Waiting {
        return Err(CoreError::IllegalTransition { current: entry.status });
    }
    Ok(())
}

fn require_self_or_admin(requester: &Actor, student_id: iq_core::StudentId) -> CoreResult<()> {
    match requester {
        Actor::Student(id) if *id == student_id => Ok(()),
        Actor::Admin => Ok(()),
        _ => Err(CoreError::unauthorized("requester is neither the entry's student nor an admin")),
    }
}

impl<S: Store, C: Clock> Engine<S, C> {
    /// Add a student to a company's queue. Fails `CompanyInactive` if the
    /// company is deactivated and `DuplicateActive` if the student
    /// already holds a non-terminal entry there (U1).
    pub async fn join(
        &self,
        student_id: iq_core::StudentId,
        company_id: CompanyId,
        category: StudentCategory,
        opportunity_kind: OpportunityKind,
    ) -> CoreResult<(EntryId, u32)> {
        run_transactional(Self::DEFAULT_DEADLINE, || async move {
            let mut session = self.store.begin(company_id).await?;
            if !session.company().active {
                return Err(CoreError::CompanyInactive);
            }
            if session
                .entries()
                .iter()
                .any(|e| e.student_id == student_id && e.status.is_active())
            {
                return Err(CoreError::DuplicateActive);
            }

            let paused = session.company().queue_paused;
            let score = priority_score(category, opportunity_kind, paused);
            let entry = QueueEntry::new(
                EntryId::new(),
                student_id,
                company_id,
                opportunity_kind,
                score,
                self.clock.now(),
            );
            let entry_id = entry.id;
            session.put_entry(entry);
            let positions = recompute_positions(&mut session);
            self.store.commit(session).await?;
            let position = positions.get(&entry_id).copied().unwrap_or(1);
            tracing::info!(%entry_id, %company_id, position, "student joined queue");
            Ok((entry_id, position))
        })
        .await
    }

    /// Withdraw a waiting entry. Callable by the entry's own student or
    /// an admin. Fails `IllegalTransition` if the entry isn't waiting —
    /// an in-progress entry is withdrawn through [`Engine::forfeit`]
    /// instead, via [`Engine::cancel`].
    pub async fn leave(&self, entry_id: EntryId, requester: Actor) -> CoreResult<()> {
        run_transactional(Self::DEFAULT_DEADLINE, || {
            let requester = requester.clone();
            async move {
                let probe = self.store.read_entry(&entry_id)?;
                require_self_or_admin(&requester, probe.student_id)?;
                require_waiting(&probe)?;

                let mut session = self.store.begin(probe.company_id).await?;
                let mut entry = session
                    .entry(&entry_id)
                    .ok_or_else(|| CoreError::not_found(format!("entry {entry_id}")))?;
                require_waiting(&entry)?;
                entry.status = EntryStatus::Cancelled;
                entry.cancelled_at = Some(self.clock.now());
                session.put_entry(entry);
                recompute_positions(&mut session);
                self.store.commit(session).await?;
                tracing::info!(%entry_id, "student left queue");
                Ok(())
            }
        })
        .await
    }

    /// Cancel an entry regardless of status: a waiting entry is withdrawn
    /// like [`Engine::leave`] (student or admin); an in-progress entry is
    /// forwarded to [`Engine::forfeit`] (operator only, room-scoped).
    /// `reason` is opaque to the Engine; callers pass it through to an
    /// audit log if one exists, and it is otherwise discarded.
    pub async fn cancel(&self, entry_id: EntryId, requester: Actor, reason: Option<&str>) -> CoreResult<()> {
        let probe = self.store.read_entry(&entry_id)?;
        if let Some(reason) = reason {
            tracing::info!(%entry_id, reason, "cancel requested with reason");
        }
        match probe.status {
            EntryStatus::Waiting => self.leave(entry_id, requester).await,
            EntryStatus::InProgress => {
                let operator = requester
                    .as_operator()
                    .ok_or_else(|| CoreError::unauthorized("cancelling an in-progress entry requires an operator"))?
                    .clone();
                self.forfeit(entry_id, &operator).await
            }
            other => Err(CoreError::IllegalTransition { current: other }),
        }
    }

    /// Send a waiting entry to the back of its queue. Fails `AtHead` if
    /// the entry already holds position 1 — the head of the queue cannot
    /// reschedule itself out from under an operator about to call it.
    pub async fn reschedule(&self, entry_id: EntryId, requester: Actor) -> CoreResult<u32> {
        run_transactional(Self::DEFAULT_DEADLINE, || {
            let requester = requester.clone();
            async move {
                let probe = self.store.read_entry(&entry_id)?;
                require_self_or_admin(&requester, probe.student_id)?;
                require_waiting(&probe)?;
                if probe.queue_position == 1 {
                    return Err(CoreError::AtHead);
                }

                let mut session = self.store.begin(probe.company_id).await?;
                let mut entry = session
                    .entry(&entry_id)
                    .ok_or_else(|| CoreError::not_found(format!("entry {entry_id}")))?;
                require_waiting(&entry)?;
                if entry.queue_position == 1 {
                    return Err(CoreError::AtHead);
                }
                entry.joined_at = self.clock.now();
                session.put_entry(entry);
                let positions = recompute_positions(&mut session);
                self.store.commit(session).await?;
                Ok(positions.get(&entry_id).copied().unwrap_or(1))
            }
        })
        .await
    }

    /// Admin-only: pin an entry to an explicit 1-based position, shifting
    /// everything between its old and new position by one. Positions no
    /// longer agree with score ordering (I5) after this — that's the
    /// intended effect, not drift — until the next natural recomputation
    /// restores it.
    pub async fn reorder(&self, company_id: CompanyId, entry_id: EntryId, new_position: u32, requester: Actor) -> CoreResult<()> {
        if !requester.is_admin() {
            return Err(CoreError::unauthorized("reorder requires an admin"));
        }
        run_transactional(Self::DEFAULT_DEADLINE, || async move {
            let mut session = self.store.begin(company_id).await?;
            let mut waiting: Vec<QueueEntry> = session
                .entries()
                .into_iter()
                .filter(|e| e.status == EntryStatus::Waiting)
                .collect();
            waiting.sort_by(|a, b| a.queue_position.cmp(&b.queue_position));

            let current_index = waiting
                .iter()
                .position(|e| e.id == entry_id)
                .ok_or_else(|| CoreError::not_found(format!("waiting entry {entry_id}")))?;
            let entry = waiting.remove(current_index);
            let target = (new_position.max(1) as usize - 1).min(waiting.len());
            waiting.insert(target, entry);

            for (index, mut e) in waiting.into_iter().enumerate() {
                let position = (index + 1) as u32;
                if e.queue_position != position {
                    e.queue_position = position;
                    session.put_entry(e);
                }
            }

            let mut company = session.company().clone();
            company.queue_position_override = true;
            session.put_company(company);

            self.store.commit(session).await?;
            Ok(())
        })
        .await
    }

    /// Admin/operator override: pin an entry to the highest priority
    /// tier (score 0) and re-sort the queue around it.
    pub async fn priority_override(&self, entry_id: EntryId, requester: Actor) -> CoreResult<()> {
        if !requester.is_admin() && requester.as_operator().is_none() {
            return Err(CoreError::unauthorized("priority override requires an admin or operator"));
        }
        run_transactional(Self::DEFAULT_DEADLINE, || async move {
            let probe = self.store.read_entry(&entry_id)?;
            require_waiting(&probe)?;
            let mut session = self.store.begin(probe.company_id).await?;
            let mut entry = session
                .entry(&entry_id)
                .ok_or_else(|| CoreError::not_found(format!("entry {entry_id}")))?;
            require_waiting(&entry)?;
            entry.priority_score = HIGHEST_PRIORITY_SCORE;
            session.put_entry(entry);
            recompute_positions(&mut session);
            self.store.commit(session).await?;
            Ok(())
        })
        .await
    }

    /// Re-derive `queue_position` for every waiting entry in a company
    /// from scratch. Idempotent; used by the Sweeper to repair drift and
    /// exposed directly for admin-triggered repair.
    pub async fn recompute(&self, company_id: CompanyId) -> CoreResult<()> {
        run_transactional(Self::DEFAULT_DEADLINE, || async move {
            let mut session = self.store.begin(company_id).await?;
            recompute_positions(&mut session);
            self.store.commit(session).await?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
#[path = "queue_engine_tests.rs"]
mod tests;
