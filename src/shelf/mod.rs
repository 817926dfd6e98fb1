//! Shelf State Machine
//!
//! Per-item mastery lifecycle: `active -> pending_followup -> archived`.
//!
//! - Incorrect answers reset the success counter and shelve the item for follow-up
//! - Correct answers inside T-max earn a full point, slower ones half a point
//! - Reaching the archive threshold archives the item
//!
//! `active` is never produced here; it only describes never-answered items.

use serde::{Deserialize, Serialize};

use crate::config::ShelfConfig;
use crate::sanitize::sanitize_success;
use crate::types::{ItemProgress, ItemStatus};

/// Result of one shelf transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelfTransition {
    pub status: ItemStatus,
    pub consecutive_success: f64,
}

impl ShelfConfig {
    pub fn transition(&self, consecutive_success: f64, is_correct: bool, is_fast: bool) -> ShelfTransition {
        if !is_correct {
            return ShelfTransition {
                status: ItemStatus::PendingFollowup,
                consecutive_success: 0.0,
            };
        }

        let increment = if is_fast {
            self.fast_increment
        } else {
            self.slow_increment
        };
        let next = sanitize_success(consecutive_success) + increment;

        let status = if next >= self.archive_threshold {
            ItemStatus::Archived
        } else {
            ItemStatus::PendingFollowup
        };

        ShelfTransition {
            status,
            consecutive_success: next,
        }
    }
}

/// Shelf transition with the canonical increments (1.0 / 0.5) and threshold (3.0)
pub fn calculate_shelf_status(consecutive_success: f64, is_correct: bool, is_fast: bool) -> ShelfTransition {
    ShelfConfig::default().transition(consecutive_success, is_correct, is_fast)
}

impl ItemProgress {
    /// Applies one answer and returns the new progress.
    ///
    /// `next_eligible_session` is carried over untouched; scheduling is the
    /// review module's job.
    pub fn after_answer(&self, is_correct: bool, is_fast: bool, config: &ShelfConfig) -> ItemProgress {
        let transition = config.transition(self.consecutive_success, is_correct, is_fast);
        let consecutive_fails = if is_correct {
            0
        } else {
            self.consecutive_fails.saturating_add(1)
        };

        ItemProgress {
            status: transition.status,
            consecutive_success: transition.consecutive_success,
            consecutive_fails,
            next_eligible_session: self.next_eligible_session,
        }
    }
}
