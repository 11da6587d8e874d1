//! Queue entry state machine and the enumerations that describe it.

use crate::ids::{CompanyId, EntryId, StudentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a queue entry.
///
/// ```text
/// waiting --start--> in_progress --complete--> completed (terminal)
///    |                   |
///    |                   +--forfeit--> passed (terminal)
///    |
///    +--cancel--> cancelled (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Waiting,
    InProgress,
    Completed,
    Passed,
    Cancelled,
}

impl EntryStatus {
    pub fn is_active(self) -> bool {
        matches!(self, EntryStatus::Waiting | EntryStatus::InProgress)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, EntryStatus::Completed | EntryStatus::Passed | EntryStatus::Cancelled)
    }
}

crate::simple_display! {
    EntryStatus {
        Waiting => "waiting",
        InProgress => "in_progress",
        Completed => "completed",
        Passed => "passed",
        Cancelled => "cancelled",
    }
}

/// What kind of slot the student is queueing for. Feeds the §4.2 scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityKind {
    InternshipShort,
    InternshipLong,
    Employment,
    Observation,
}

crate::simple_display! {
    OpportunityKind {
        InternshipShort => "internship_short",
        InternshipLong => "internship_long",
        Employment => "employment",
        Observation => "observation",
    }
}

/// Priority tier, derived from the student's user record. Never stored on
/// the entry itself — callers pass it in at join/reschedule time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentCategory {
    Committee,
    Internal,
    External,
}

crate::simple_display! {
    StudentCategory {
        Committee => "committee",
        Internal => "internal",
        External => "external",
    }
}

/// One queue record; the unit of lifecycle state.
///
/// `queue_position` is only meaningful while `status == Waiting`; other
/// statuses carry its last-known value but it is ignored (invariant I4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: EntryId,
    pub student_id: StudentId,
    pub company_id: CompanyId,
    pub status: EntryStatus,
    pub queue_position: u32,
    pub priority_score: i64,
    pub opportunity_kind: OpportunityKind,
    pub joined_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub passed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl QueueEntry {
    pub fn new(
        id: EntryId,
        student_id: StudentId,
        company_id: CompanyId,
        opportunity_kind: OpportunityKind,
        priority_score: i64,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            student_id,
            company_id,
            status: EntryStatus::Waiting,
            queue_position: 0,
            priority_score,
            opportunity_kind,
            joined_at,
            started_at: None,
            completed_at: None,
            passed_at: None,
            cancelled_at: None,
        }
    }

    /// Sort key used by the position-recomputation algorithm (§4.3): score
    /// ascending, then arrival ascending, then entry id ascending as a
    /// deterministic, cosmetic tiebreak that prevents cyclic rewrites
    /// when two entries share both score and timestamp.
    pub fn sort_key(&self) -> (i64, DateTime<Utc>, &str) {
        (self.priority_score, self.joined_at, self.id.as_str())
    }
}

crate::builder! {
    pub struct QueueEntryBuilder => QueueEntry {
        set {
            student_id: StudentId = StudentId::new(),
            company_id: CompanyId = CompanyId::new(),
            status: EntryStatus = EntryStatus::Waiting,
            queue_position: u32 = 0,
            priority_score: i64 = 100,
            opportunity_kind: OpportunityKind = OpportunityKind::InternshipLong,
            joined_at: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH,
        }
        option {
            started_at: DateTime<Utc> = None,
            completed_at: DateTime<Utc> = None,
            passed_at: DateTime<Utc> = None,
            cancelled_at: DateTime<Utc> = None,
        }
        computed {
            id: EntryId = EntryId::new(),
        }
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
