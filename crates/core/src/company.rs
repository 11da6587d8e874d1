//! Company (booth) entity.

use crate::ids::{CompanyId, EntryId};
use serde::{Deserialize, Serialize};

/// Minimum and maximum estimated interview duration, in minutes.
pub const MIN_DURATION_MINUTES: u32 = 5;
pub const MAX_DURATION_MINUTES: u32 = 120;

/// A booth in the forum. Created by admin, soft-deactivated (never
/// physically removed while entries reference it).
///
/// Ownership: the Room Controller exclusively mutates `queue_paused`,
/// `emergency_mode`, and `current_entry_id`. Everyone else reads freely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub room: String,
    pub est_duration_min: u32,
    pub active: bool,
    pub queue_paused: bool,
    pub emergency_mode: bool,
    pub current_entry_id: Option<EntryId>,
    /// Set by an admin `reorder` (§4.3), cleared by the next natural
    /// position recomputation. While set, score/position disagreement
    /// (I5) is an intentional operator override, not drift — the
    /// Consistency Sweeper leaves it alone.
    pub queue_position_override: bool,
}

impl Company {
    pub fn new(id: CompanyId, name: impl Into<String>, room: impl Into<String>, est_duration_min: u32) -> Self {
        Self {
            id,
            name: name.into(),
            room: room.into(),
            est_duration_min: est_duration_min.clamp(MIN_DURATION_MINUTES, MAX_DURATION_MINUTES),
            active: true,
            queue_paused: false,
            emergency_mode: false,
            current_entry_id: None,
            queue_position_override: false,
        }
    }

    pub fn has_in_progress(&self) -> bool {
        self.current_entry_id.is_some()
    }
}

crate::builder! {
    pub struct CompanyBuilder => Company {
        into {
            name: String = "Acme Corp",
            room: String = "room-1",
        }
        set {
            est_duration_min: u32 = 20,
            active: bool = true,
            queue_paused: bool = false,
            emergency_mode: bool = false,
            queue_position_override: bool = false,
        }
        option {
            current_entry_id: EntryId = None,
        }
        computed {
            id: CompanyId = CompanyId::new(),
        }
    }
}

#[cfg(test)]
#[path = "company_tests.rs"]
mod tests;
