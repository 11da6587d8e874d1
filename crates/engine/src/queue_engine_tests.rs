use super::*;
use crate::test_support::engine;
use iq_core::{Company, OpportunityKind, StudentCategory, StudentId};

async fn seeded_company(e: &Engine<iq_storage::InMemoryStore, iq_core::FakeClock>) -> CompanyId {
    let company = Company::builder().build();
    let id = company.id;
    e.create_company(company).unwrap();
    id
}

#[tokio::test]
async fn join_assigns_position_one_to_the_first_entrant() {
    let e = engine();
    let company_id = seeded_company(&e).await;
    let (_, position) = e
        .join(StudentId::new(), company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap();
    assert_eq!(position, 1);
}

#[tokio::test]
async fn join_orders_by_score_not_arrival() {
    let e = engine();
    let company_id = seeded_company(&e).await;
    let (external_id, _) = e
        .join(StudentId::new(), company_id, StudentCategory::External, OpportunityKind::Employment)
        .await
        .unwrap();
    let (committee_id, _) = e
        .join(StudentId::new(), company_id, StudentCategory::Committee, OpportunityKind::InternshipLong)
        .await
        .unwrap();

    let snapshot = e.read_company_queue(company_id).unwrap();
    assert_eq!(snapshot.waiting[0].id, committee_id);
    assert_eq!(snapshot.waiting[1].id, external_id);
}

#[tokio::test]
async fn join_rejects_a_second_active_entry_for_the_same_student() {
    let e = engine();
    let company_id = seeded_company(&e).await;
    let student = StudentId::new();
    e.join(student, company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap();
    let err = e
        .join(student, company_id, StudentCategory::Internal, OpportunityKind::Employment)
        .await
        .unwrap_err();
    assert_eq!(err, CoreError::DuplicateActive);
}

#[tokio::test]
async fn join_rejects_an_inactive_company() {
    let e = engine();
    let mut company = Company::builder().build();
    company.active = false;
    let company_id = company.id;
    e.create_company(company).unwrap();
    let err = e
        .join(StudentId::new(), company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap_err();
    assert_eq!(err, CoreError::CompanyInactive);
}

#[tokio::test]
async fn joining_while_paused_pushes_the_entry_behind_unpaused_arrivals() {
    let e = engine();
    let mut company = Company::builder().build();
    company.queue_paused = true;
    let company_id = company.id;
    e.create_company(company).unwrap();

    let (paused_entry, _) = e
        .join(StudentId::new(), company_id, StudentCategory::Committee, OpportunityKind::InternshipLong)
        .await
        .unwrap();

    let snapshot = e.read_company_queue(company_id).unwrap();
    assert_eq!(snapshot.waiting[0].id, paused_entry);
    assert!(snapshot.waiting[0].priority_score >= iq_core::PAUSED_JOIN_PENALTY);
}

#[tokio::test]
async fn leave_cancels_a_waiting_entry_and_closes_the_gap() {
    let e = engine();
    let company_id = seeded_company(&e).await;
    let student = StudentId::new();
    let (first, _) = e
        .join(student, company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap();
    let (second, _) = e
        .join(StudentId::new(), company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap();

    e.leave(first, Actor::Student(student)).await.unwrap();

    let snapshot = e.read_company_queue(company_id).unwrap();
    assert_eq!(snapshot.waiting.len(), 1);
    assert_eq!(snapshot.waiting[0].id, second);
    assert_eq!(snapshot.waiting[0].queue_position, 1);
}

#[tokio::test]
async fn leave_rejects_a_requester_who_is_neither_the_student_nor_an_admin() {
    let e = engine();
    let company_id = seeded_company(&e).await;
    let (entry_id, _) = e
        .join(StudentId::new(), company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap();
    let err = e.leave(entry_id, Actor::Student(StudentId::new())).await.unwrap_err();
    assert!(matches!(err, CoreError::Unauthorized(_)));
}

#[tokio::test]
async fn cancel_on_a_waiting_entry_behaves_like_leave() {
    let e = engine();
    let company_id = seeded_company(&e).await;
    let student = StudentId::new();
    let (entry_id, _) = e
        .join(student, company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap();
    e.cancel(entry_id, Actor::Student(student), Some("found another booth")).await.unwrap();
    let entry = e.store().read_entry(&entry_id).unwrap();
    assert_eq!(entry.status, iq_core::EntryStatus::Cancelled);
}

#[tokio::test]
async fn cancel_on_an_in_progress_entry_requires_an_operator() {
    let e = engine();
    let company_id = seeded_company(&e).await;
    let student = StudentId::new();
    let (entry_id, _) = e
        .join(student, company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap();
    let operator = crate::Operator::new("room-1");
    e.start(entry_id, &operator).await.unwrap();

    let err = e.cancel(entry_id, Actor::Student(student), None).await.unwrap_err();
    assert!(matches!(err, CoreError::Unauthorized(_)));

    e.cancel(entry_id, Actor::Operator(operator), None).await.unwrap();
    let entry = e.store().read_entry(&entry_id).unwrap();
    assert_eq!(entry.status, iq_core::EntryStatus::Passed);
}

#[tokio::test]
async fn reschedule_rejects_the_head_of_the_queue() {
    let e = engine();
    let company_id = seeded_company(&e).await;
    let student = StudentId::new();
    let (entry_id, position) = e
        .join(student, company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap();
    assert_eq!(position, 1);
    let err = e.reschedule(entry_id, Actor::Student(student)).await.unwrap_err();
    assert_eq!(err, CoreError::AtHead);
}

#[tokio::test]
async fn reschedule_moves_a_non_head_entry_to_the_back() {
    let e = engine();
    let company_id = seeded_company(&e).await;
    let student = StudentId::new();
    e.join(StudentId::new(), company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap();
    let (entry_id, _) = e
        .join(student, company_id, StudentCategory::Internal, OpportunityKind::InternshipLong)
        .await
        .unwrap();

    let new_position = e.reschedule(entry_id, Actor::Student(student)).await.unwrap();
    assert_eq!(new_position, 2);
}

#[tokio::test]
async fn priority_override_requires_admin_or_operator() {
    let e = engine();
    let company_id = seeded_company(&e).await;
    let student = StudentId::new();
    let (entry_id, _) = e
        .join(student, company_id, StudentCategory::External, OpportunityKind::Observation)
        .await
        .unwrap();
    let err = e.priority_override(entry_id, Actor::Student(student)).await.unwrap_err();
    assert!(matches!(err, CoreError::Unauthorized(_)));
}

#[tokio::test]
async fn priority_override_moves_the_entry_to_the_front() {
    let e = engine();
    let company_id = seeded_company(&e).await;
    e.join(StudentId::new(), company_id, StudentCategory::Committee, OpportunityKind::InternshipLong)
        .await
        .unwrap();
    let (entry_id, _) = e
        .join(StudentId::new(), company_id, StudentCategory::External, OpportunityKind::Observation)
        .await
        .unwrap();

    e.priority_override(entry_id, Actor::Admin).await.unwrap();
    let snapshot = e.read_company_queue(company_id).unwrap();
    assert_eq!(snapshot.waiting[0].id, entry_id);
}

#[tokio::test]
async fn reorder_moves_an_entry_to_an_explicit_position() {
    let e = engine();
    let company_id = seeded_company(&e).await;
    let (first, _) = e
        .join(StudentId::new(), company_id, StudentCategory::Committee, OpportunityKind::InternshipLong)
        .await
        .unwrap();
    let (second, _) = e
        .join(StudentId::new(), company_id, StudentCategory::Committee, OpportunityKind::InternshipLong)
        .await
        .unwrap();
    let (third, _) = e
        .join(StudentId::new(), company_id, StudentCategory::Committee, OpportunityKind::InternshipLong)
        .await
        .unwrap();

    e.reorder(company_id, third, 1, Actor::Admin).await.unwrap();
    let snapshot = e.read_company_queue(company_id).unwrap();
    assert_eq!(snapshot.waiting[0].id, third);
    assert_eq!(snapshot.waiting[1].id, first);
    assert_eq!(snapshot.waiting[2].id, second);
}

#[tokio::test]
async fn reorder_rejects_a_non_admin_requester() {
    let e = engine();
    let company_id = seeded_company(&e).await;
    let student = StudentId::new();
    let (entry_id, _) = e
        .join(student, company_id, StudentCategory::Committee, OpportunityKind::InternshipLong)
        .await
        .unwrap();
    let operator = crate::Operator::new("room-1");

    let err = e.reorder(company_id, entry_id, 1, Actor::Student(student)).await.unwrap_err();
    assert!(matches!(err, CoreError::Unauthorized(_)));

    let err = e.reorder(company_id, entry_id, 1, Actor::Operator(operator)).await.unwrap_err();
    assert!(matches!(err, CoreError::Unauthorized(_)));
}
