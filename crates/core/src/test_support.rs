//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

/// Proptest strategies for core state machine types.
pub mod strategies {
    use crate::entry::{OpportunityKind, StudentCategory};
    use proptest::prelude::*;

    pub fn arb_student_category() -> impl Strategy<Value = StudentCategory> {
        prop_oneof![
            Just(StudentCategory::Committee),
            Just(StudentCategory::Internal),
            Just(StudentCategory::External),
        ]
    }

    pub fn arb_opportunity_kind() -> impl Strategy<Value = OpportunityKind> {
        prop_oneof![
            Just(OpportunityKind::InternshipShort),
            Just(OpportunityKind::InternshipLong),
            Just(OpportunityKind::Employment),
            Just(OpportunityKind::Observation),
        ]
    }
}
