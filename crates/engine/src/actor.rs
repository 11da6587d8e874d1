//! Who is driving an operation. Authorization is otherwise external
//! (§1: "authentication/session issuance" is out of scope) — the engine
//! only needs to know the shape of the caller to enforce the ownership
//! rules in §3 and §4.4's operator/room check.

use iq_core::StudentId;
use serde::{Deserialize, Serialize};

/// A committee member assigned to a single room for the duration of
/// their shift. `room` must match a [`iq_core::Company::room`] for the
/// operator to drive that company's lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub room: String,
}

impl Operator {
    pub fn new(room: impl Into<String>) -> Self {
        Self { room: room.into() }
    }
}

/// The caller of an operation, for the ownership checks in §3 and §4.4.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Student(StudentId),
    Operator(Operator),
    Admin,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        matches!(self, Actor::Admin)
    }

    pub fn as_student(&self) -> Option<StudentId> {
        match self {
            Actor::Student(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_operator(&self) -> Option<&Operator> {
        match self {
            Actor::Operator(op) => Some(op),
            _ => None,
        }
    }
}
