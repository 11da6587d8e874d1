//! Priority Scorer (§4.2): a pure function mapping
//! `(student_category, opportunity_kind, paused)` to an integer priority.
//! Lower scores are served sooner. Stateless — holds no state of its own
//! and is safe to call from any thread without synchronization.

use crate::entry::{OpportunityKind, StudentCategory};

/// Penalty applied when the company is queue-paused at join time.
pub const PAUSED_JOIN_PENALTY: i64 = 1000;

/// Score that guarantees an entry sorts first, used by priority overrides
/// and emergency calls.
pub const HIGHEST_PRIORITY_SCORE: i64 = 0;

fn category_base(category: StudentCategory) -> i64 {
    match category {
        StudentCategory::Committee => 0,
        StudentCategory::Internal => 100,
        StudentCategory::External => 200,
    }
}

fn opportunity_offset(kind: OpportunityKind) -> i64 {
    match kind {
        OpportunityKind::InternshipLong | OpportunityKind::InternshipShort => 0,
        OpportunityKind::Employment => 10,
        OpportunityKind::Observation => 20,
    }
}

/// Compute the priority score for a student joining (or being reordered
/// into) a company's queue.
///
/// Ties between equal scores are broken by `joined_at` ascending elsewhere
/// (§4.3's position-recomputation algorithm) — this function only ever
/// produces the score component.
pub fn priority_score(category: StudentCategory, kind: OpportunityKind, company_paused: bool) -> i64 {
    let mut score = category_base(category) + opportunity_offset(kind);
    if company_paused {
        score += PAUSED_JOIN_PENALTY;
    }
    score
}

#[cfg(test)]
#[path = "scorer_tests.rs"]
mod tests;
