//! Review Session Scheduler
//!
//! Maps the success counter to a session gap:
//! `gap = table[clamp(floor(success) - 1, 0, len - 1)]`, so anything below 1
//! waits one session and anything from 5 up waits the full 20.

pub mod session;

use crate::config::ReviewConfig;
use crate::sanitize::sanitize_success;
use crate::types::ItemProgress;

pub use session::{SessionCounter, SessionTick};

const OVERDUE_PENALTY_WEEK_DAYS: i64 = 7;
const OVERDUE_PENALTY_PER_WEEK: i64 = 2;

impl ReviewConfig {
    pub fn gap_for(&self, consecutive_success: f64) -> i64 {
        let Some(&last) = self.session_gaps.last() else {
            return 1;
        };
        let index = sanitize_success(consecutive_success).floor() - 1.0;
        let max_index = (self.session_gaps.len() - 1) as f64;
        let index = index.clamp(0.0, max_index) as usize;
        self.session_gaps.get(index).copied().unwrap_or(last)
    }

    pub fn next_review_session(&self, current_session: i64, consecutive_success: f64) -> i64 {
        current_session.saturating_add(self.gap_for(consecutive_success))
    }
}

/// Next eligible session with the canonical gap table `[1, 2, 5, 10, 20]`
pub fn calculate_next_review_session(current_session: i64, consecutive_success: f64) -> i64 {
    ReviewConfig::default().next_review_session(current_session, consecutive_success)
}

/// An item without a scheduled session is always due
pub fn is_due(progress: &ItemProgress, current_session: i64) -> bool {
    progress
        .next_eligible_session
        .map_or(true, |next| next <= current_session)
}

/// Two points per full overdue week, never below zero
pub fn overdue_penalty(score: i64, overdue_days: i64) -> i64 {
    if overdue_days <= 0 {
        return score;
    }
    let penalty = (overdue_days / OVERDUE_PENALTY_WEEK_DAYS) * OVERDUE_PENALTY_PER_WEEK;
    (score - penalty).max(0)
}
