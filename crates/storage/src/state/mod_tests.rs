use super::*;
use chrono::{DateTime, Utc};
use iq_core::{Company, EntryId, OpportunityKind, QueueEntry, StudentId};

fn waiting_entry(company_id: CompanyId, position: u32) -> QueueEntry {
    let mut e = QueueEntry::new(
        EntryId::new(),
        StudentId::new(),
        company_id,
        OpportunityKind::InternshipLong,
        100,
        DateTime::<Utc>::UNIX_EPOCH,
    );
    e.queue_position = position;
    e
}

#[test]
fn insert_company_seeds_a_zero_version() {
    let mut state = MaterializedState::default();
    let company = Company::new(CompanyId::new(), "Acme", "room-1", 20);
    let id = company.id;
    state.insert_company(company);
    assert_eq!(state.version_of(&id), 0);
}

#[test]
fn bump_version_increments_monotonically() {
    let mut state = MaterializedState::default();
    let id = CompanyId::new();
    assert_eq!(state.bump_version(&id), 1);
    assert_eq!(state.bump_version(&id), 2);
}

#[test]
fn waiting_queue_reflects_only_waiting_entries() {
    let mut state = MaterializedState::default();
    let company = Company::new(CompanyId::new(), "Acme", "room-1", 20);
    let company_id = company.id;
    state.insert_company(company);

    let mut waiting = waiting_entry(company_id, 1);
    let mut done = waiting_entry(company_id, 0);
    done.status = iq_core::EntryStatus::Completed;
    waiting.queue_position = 1;
    state.put_entry(waiting.clone());
    state.put_entry(done);

    let queue = state.waiting_queue(&company_id);
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id, waiting.id);
}

#[test]
fn entries_for_missing_companies_flags_orphans() {
    let mut state = MaterializedState::default();
    let orphan_company = CompanyId::new();
    let orphan = waiting_entry(orphan_company, 1);
    state.put_entry(orphan.clone());

    let orphans = state.entries_for_missing_companies();
    assert_eq!(orphans, vec![orphan.id]);
}
