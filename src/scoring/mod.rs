//! Score Calculators
//!
//! - Simple response delta that drives a unit's mastery score
//! - Bloom-weighted, time-scaled score for analytics
//! - Session summaries and coverage-weighted mastery ([`summary`])

pub mod summary;

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::sanitize::{clamp_score, round_to_cents};
use crate::types::{CognitiveLevel, ResponseType};

pub use summary::{coverage_weighted_mastery, is_topic_refreshed, TestSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreChange {
    pub delta: i64,
    pub new_score: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedScore {
    pub base_delta: f64,
    pub bloom_coeff: f64,
    pub time_ratio: f64,
    pub final_score: f64,
}

impl ScoringConfig {
    /// Correct always earns the full points; a repeated miss overrides the
    /// first-time penalty. Repetition is keyed by question id only.
    pub fn response_delta(&self, response: ResponseType, is_repeated: bool) -> i64 {
        match response {
            ResponseType::Correct => self.points_correct,
            _ if is_repeated => -self.penalty_repeated,
            ResponseType::Incorrect => -self.penalty_incorrect_first,
            ResponseType::Blank => -self.penalty_blank_first,
        }
    }

    pub fn score_change(&self, response: ResponseType, current_score: i64, is_repeated: bool) -> ScoreChange {
        let delta = self.response_delta(response, is_repeated);
        ScoreChange {
            delta,
            new_score: clamp_score(current_score.saturating_add(delta)),
        }
    }

    pub fn bloom_coefficient(&self, level: CognitiveLevel) -> f64 {
        self.bloom_coefficients.get(level)
    }

    pub fn target_time_ms(&self, level: CognitiveLevel) -> f64 {
        self.target_times_ms.get(level)
    }

    /// `base * bloom(level) * clamp(target / actual)`, rounded to cents.
    pub fn advanced_score(&self, base_delta: f64, level: CognitiveLevel, time_spent_ms: u64) -> AdvancedScore {
        let bloom_coeff = self.bloom_coefficient(level);
        let actual_ms = time_spent_ms.max(self.min_actual_time_ms) as f64;
        let time_ratio = (self.target_time_ms(level) / actual_ms)
            .clamp(self.min_time_ratio, self.max_time_ratio);
        let base = if base_delta.is_finite() { base_delta } else { 0.0 };

        AdvancedScore {
            base_delta: base,
            bloom_coeff,
            time_ratio: round_to_cents(time_ratio),
            final_score: round_to_cents(base * bloom_coeff * time_ratio),
        }
    }
}

/// Unit mastery change for one response, canonical penalties
pub fn calculate_score_change(response: ResponseType, current_score: i64, is_repeated: bool) -> ScoreChange {
    ScoringConfig::default().score_change(response, current_score, is_repeated)
}

/// Bloom-weighted score, canonical coefficients and target times
pub fn calculate_advanced_score(base_delta: f64, level: CognitiveLevel, time_spent_ms: u64) -> AdvancedScore {
    ScoringConfig::default().advanced_score(base_delta, level, time_spent_ms)
}
