use serde::{Deserialize, Serialize};

use crate::sanitize::{round_half_up, sanitize_mastery};
use crate::types::TOPIC_REFRESH_COVERAGE;

const COVERAGE_WEIGHT: f64 = 40.0;
const SCORE_WEIGHT: f64 = 0.6;
const INCORRECT_CREDIT: f64 = 0.2;

/// Unit mastery blending coverage (40 points) with the average score (60%)
pub fn coverage_weighted_mastery(total_questions: usize, unique_solved: usize, average_score: f64) -> i64 {
    if total_questions == 0 {
        return 0;
    }
    let coverage = (unique_solved as f64 / total_questions as f64).min(1.0);
    let blended = coverage * COVERAGE_WEIGHT + sanitize_mastery(average_score) * SCORE_WEIGHT;
    round_half_up(blended) as i64
}

/// A unit is refreshed once 80% of its questions have been solved at least once
pub fn is_topic_refreshed(unique_solved: usize, total_questions: usize) -> bool {
    total_questions > 0 && unique_solved as f64 / total_questions as f64 >= TOPIC_REFRESH_COVERAGE
}

/// End-of-session report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    pub correct: u32,
    pub incorrect: u32,
    pub blank: u32,
    pub percentage: u32,
    /// Incorrect answers earn partial credit
    pub mastery_score: u32,
    pub pending_review: u32,
    /// `HH:MM:SS`
    pub total_time_formatted: String,
}

impl TestSummary {
    pub fn from_counts(correct: u32, incorrect: u32, blank: u32, elapsed_ms: u64) -> Self {
        let total = correct as u64 + incorrect as u64 + blank as u64;
        let (percentage, mastery_score) = if total == 0 {
            (0, 0)
        } else {
            let total = total as f64;
            let percentage = round_half_up(correct as f64 / total * 100.0);
            let weighted = correct as f64 + incorrect as f64 * INCORRECT_CREDIT;
            let mastery = round_half_up(weighted / total * 100.0);
            (percentage as u32, mastery as u32)
        };

        Self {
            correct,
            incorrect,
            blank,
            percentage,
            mastery_score,
            pending_review: incorrect.saturating_add(blank),
            total_time_formatted: format_duration(elapsed_ms),
        }
    }

    pub fn total(&self) -> u32 {
        self.correct
            .saturating_add(self.incorrect)
            .saturating_add(self.blank)
    }
}

fn format_duration(elapsed_ms: u64) -> String {
    let seconds = elapsed_ms / 1000;
    let hours = seconds / 3600;
    let minutes = (seconds / 60) % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds % 60)
}
