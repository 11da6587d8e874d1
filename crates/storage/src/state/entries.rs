//! Pure helpers over the entry map. Kept free of `MaterializedState` so
//! they're trivial to unit test in isolation and reused by both read
//! paths and the Sweeper.

use iq_core::{Company, CompanyId, EntryId, EntryStatus, QueueEntry, StudentId};
use std::collections::HashMap;

pub fn for_company(entries: &HashMap<EntryId, QueueEntry>, company_id: &CompanyId) -> Vec<QueueEntry> {
    entries.values().filter(|e| e.company_id == *company_id).cloned().collect()
}

pub fn waiting_ordered(entries: &HashMap<EntryId, QueueEntry>, company_id: &CompanyId) -> Vec<QueueEntry> {
    let mut waiting: Vec<QueueEntry> = entries
        .values()
        .filter(|e| e.company_id == *company_id && e.status == EntryStatus::Waiting)
        .cloned()
        .collect();
    waiting.sort_by(|a, b| a.queue_position.cmp(&b.queue_position));
    waiting
}

pub fn active_for_student(
    entries: &HashMap<EntryId, QueueEntry>,
    student_id: &StudentId,
    company_id: &CompanyId,
) -> Option<QueueEntry> {
    entries
        .values()
        .find(|e| e.student_id == *student_id && e.company_id == *company_id && e.status.is_active())
        .cloned()
}

pub fn in_progress_for_company(entries: &HashMap<EntryId, QueueEntry>, company_id: &CompanyId) -> Option<QueueEntry> {
    entries
        .values()
        .find(|e| e.company_id == *company_id && e.status == EntryStatus::InProgress)
        .cloned()
}

pub fn all_in_progress(entries: &HashMap<EntryId, QueueEntry>, company_id: &CompanyId) -> Vec<QueueEntry> {
    entries
        .values()
        .filter(|e| e.company_id == *company_id && e.status == EntryStatus::InProgress)
        .cloned()
        .collect()
}

/// Groups of active entries sharing (student, company) — a U1 violation
/// that should be structurally impossible but which the Sweeper checks
/// for anyway (§4.6 check 4: historical drift, crashes mid-transaction,
/// manual data edits).
pub fn duplicate_active_groups(entries: &HashMap<EntryId, QueueEntry>, company_id: &CompanyId) -> Vec<Vec<QueueEntry>> {
    let mut by_student: HashMap<StudentId, Vec<QueueEntry>> = HashMap::new();
    for e in entries.values() {
        if e.company_id == *company_id && e.status.is_active() {
            by_student.entry(e.student_id).or_default().push(e.clone());
        }
    }
    by_student.into_values().filter(|group| group.len() > 1).collect()
}

pub fn orphaned(entries: &HashMap<EntryId, QueueEntry>, companies: &HashMap<CompanyId, Company>) -> Vec<QueueEntry> {
    entries.values().filter(|e| !companies.contains_key(&e.company_id)).cloned().collect()
}
