use super::*;
use crate::test_support::engine;
use iq_core::{Company, OpportunityKind, StudentCategory, StudentId};

async fn seeded(e: &Engine<iq_storage::InMemoryStore, iq_core::FakeClock>) -> (CompanyId, Operator) {
    let company = Company::builder().room("room-7").build();
    let id = company.id;
    e.create_company(company).unwrap();
    (id, Operator::new("room-7"))
}

#[tokio::test]
async fn next_calls_the_head_of_the_queue() {
    let e = engine();
    let (company_id, operator) = seeded(&e).await;
    let (entry_id, _) = e
        .join(StudentId::new(), company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap();

    let called = e.next(company_id, &operator).await.unwrap();
    assert_eq!(called, entry_id);

    let snapshot = e.read_company_queue(company_id).unwrap();
    assert_eq!(snapshot.in_progress.unwrap().id, entry_id);
    assert!(snapshot.waiting.is_empty());
}

#[tokio::test]
async fn next_fails_on_an_empty_queue() {
    let e = engine();
    let (company_id, operator) = seeded(&e).await;
    let err = e.next(company_id, &operator).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn next_forfeits_the_current_entry_before_calling_the_new_head() {
    let e = engine();
    let (company_id, operator) = seeded(&e).await;
    let (first, _) = e
        .join(StudentId::new(), company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap();
    let (second, _) = e
        .join(StudentId::new(), company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap();
    e.start(first, &operator).await.unwrap();

    let called = e.next(company_id, &operator).await.unwrap();
    assert_eq!(called, second);

    let first_entry = e.store().read_entry(&first).unwrap();
    assert_eq!(first_entry.status, iq_core::EntryStatus::Passed);
    let snapshot = e.read_company_queue(company_id).unwrap();
    assert_eq!(snapshot.in_progress.unwrap().id, second);
}

#[tokio::test]
async fn start_closes_the_position_gap_left_by_the_started_entry() {
    let e = engine();
    let (company_id, operator) = seeded(&e).await;
    let (head, _) = e
        .join(StudentId::new(), company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap();
    let (second, _) = e
        .join(StudentId::new(), company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap();
    let (third, _) = e
        .join(StudentId::new(), company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap();

    e.start(head, &operator).await.unwrap();

    let snapshot = e.read_company_queue(company_id).unwrap();
    assert_eq!(snapshot.waiting.len(), 2);
    let second_entry = snapshot.waiting.iter().find(|e| e.id == second).unwrap();
    let third_entry = snapshot.waiting.iter().find(|e| e.id == third).unwrap();
    assert_eq!(second_entry.queue_position, 1);
    assert_eq!(third_entry.queue_position, 2);
}

#[tokio::test]
async fn start_rejects_a_second_in_progress_entry() {
    let e = engine();
    let (company_id, operator) = seeded(&e).await;
    let (first, _) = e
        .join(StudentId::new(), company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap();
    let (second, _) = e
        .join(StudentId::new(), company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap();
    e.start(first, &operator).await.unwrap();
    let err = e.start(second, &operator).await.unwrap_err();
    assert_eq!(err, CoreError::AlreadyInProgress);
}

#[tokio::test]
async fn start_rejects_an_operator_assigned_to_a_different_room() {
    let e = engine();
    let (company_id, _) = seeded(&e).await;
    let (entry_id, _) = e
        .join(StudentId::new(), company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap();
    let wrong_room = Operator::new("room-99");
    let err = e.start(entry_id, &wrong_room).await.unwrap_err();
    assert!(matches!(err, CoreError::Unauthorized(_)));
}

#[tokio::test]
async fn complete_frees_the_room_for_the_next_entry() {
    let e = engine();
    let (company_id, operator) = seeded(&e).await;
    let (entry_id, _) = e
        .join(StudentId::new(), company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap();
    e.start(entry_id, &operator).await.unwrap();
    e.complete(entry_id, &operator).await.unwrap();

    let snapshot = e.read_company_queue(company_id).unwrap();
    assert!(snapshot.in_progress.is_none());
    assert!(!snapshot.company.has_in_progress());
}

#[tokio::test]
async fn forfeit_marks_the_entry_passed() {
    let e = engine();
    let (company_id, operator) = seeded(&e).await;
    let (entry_id, _) = e
        .join(StudentId::new(), company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap();
    e.start(entry_id, &operator).await.unwrap();
    e.forfeit(entry_id, &operator).await.unwrap();

    let entry = e.store().read_entry(&entry_id).unwrap();
    assert_eq!(entry.status, iq_core::EntryStatus::Passed);
    assert!(entry.passed_at.is_some());
}

#[tokio::test]
async fn complete_rejects_an_entry_that_is_not_in_progress() {
    let e = engine();
    let (company_id, operator) = seeded(&e).await;
    let (entry_id, _) = e
        .join(StudentId::new(), company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap();
    let err = e.complete(entry_id, &operator).await.unwrap_err();
    assert!(matches!(err, CoreError::IllegalTransition { .. }));
}
