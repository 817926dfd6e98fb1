//! Time Threshold Calculator (T-max)
//!
//! Fair answer-time allowance for a question:
//!
//! ```text
//! reading    = chars / 780 * 60
//! complexity = (15 + concepts * 2) * multiplier(level)
//! T-max(ms)  = round((reading + complexity + 10) * 1000)
//! ```
//!
//! A correct answer at or under T-max counts as fast.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::TmaxConfig;
use crate::sanitize::non_negative_count;
use crate::types::{CognitiveLevel, SIMULATION_FAST_LIMIT_MS};

impl TmaxConfig {
    pub fn difficulty_multiplier(&self, level: CognitiveLevel) -> f64 {
        self.difficulty_multipliers.get(level)
    }

    pub fn tmax_ms(&self, char_count: usize, concept_count: usize, level: CognitiveLevel) -> u64 {
        let reading_seconds = (char_count as f64 / self.chars_per_minute) * 60.0;
        let complexity_seconds = (self.base_complexity_seconds
            + concept_count as f64 * self.seconds_per_concept)
            * self.difficulty_multiplier(level);
        let total_ms = (reading_seconds + complexity_seconds + self.buffer_seconds) * 1000.0;

        if !total_ms.is_finite() || total_ms <= 0.0 {
            return 0;
        }
        total_ms.round() as u64
    }

    pub fn tmax_for(&self, metrics: &QuestionMetrics) -> u64 {
        self.tmax_ms(metrics.char_count, metrics.concept_count, metrics.cognitive_level)
    }
}

/// T-max with the canonical constants
pub fn calculate_tmax(char_count: usize, concept_count: usize, level: CognitiveLevel) -> u64 {
    TmaxConfig::default().tmax_ms(char_count, concept_count, level)
}

/// Fast means at or under the limit
pub fn is_fast(elapsed_ms: u64, tmax_ms: u64) -> bool {
    elapsed_ms <= tmax_ms
}

/// Fast/slow limit for simulation items, which ignore T-max
pub fn simulation_fast_limit_ms() -> u64 {
    SIMULATION_FAST_LIMIT_MS
}

/// Character count of a stem plus all of its options, in Unicode scalar values
pub fn question_char_count<S: AsRef<str>>(question: &str, options: &[S]) -> usize {
    question.chars().count()
        + options
            .iter()
            .map(|o| o.as_ref().chars().count())
            .sum::<usize>()
}

/// Inputs of a single T-max evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionMetrics {
    pub char_count: usize,
    pub concept_count: usize,
    pub cognitive_level: CognitiveLevel,
}

impl QuestionMetrics {
    /// Builds metrics from untyped host values; negative counts become 0 and
    /// unknown levels fall back to knowledge.
    pub fn from_raw(char_count: i64, concept_count: i64, level: &str) -> Self {
        Self {
            char_count: non_negative_count(char_count),
            concept_count: non_negative_count(concept_count),
            cognitive_level: CognitiveLevel::parse_lenient(level),
        }
    }
}

/// Computes T-max for many questions in parallel, preserving input order
pub fn tmax_batch(config: &TmaxConfig, questions: &[QuestionMetrics]) -> Vec<u64> {
    questions.par_iter().map(|q| config.tmax_for(q)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_values() {
        assert_eq!(calculate_tmax(780, 0, CognitiveLevel::Knowledge), 85_000);
        assert_eq!(calculate_tmax(780, 0, CognitiveLevel::Application), 88_000);
        assert_eq!(calculate_tmax(780, 0, CognitiveLevel::Analysis), 92_500);
    }

    #[test]
    fn test_concepts_add_two_seconds_each() {
        // (15 + 3*2) * 1.0 + 10 = 31 s
        assert_eq!(calculate_tmax(0, 3, CognitiveLevel::Knowledge), 31_000);
    }

    #[test]
    fn test_fractional_reading_time_rounds() {
        // 100 chars -> 7.6923 s of reading
        assert_eq!(calculate_tmax(100, 0, CognitiveLevel::Knowledge), 32_692);
    }

    #[test]
    fn test_is_fast_boundary() {
        assert!(is_fast(85_000, 85_000));
        assert!(!is_fast(85_001, 85_000));
    }

    #[test]
    fn test_question_char_count_counts_scalars() {
        let options = ["evet", "hayır"];
        assert_eq!(question_char_count("Doğru mu?", &options), 9 + 4 + 5);
        assert_eq!(question_char_count::<&str>("", &[]), 0);
    }

    #[test]
    fn test_from_raw_sanitizes() {
        let m = QuestionMetrics::from_raw(-20, -1, "mystery");
        assert_eq!(m.char_count, 0);
        assert_eq!(m.concept_count, 0);
        assert_eq!(m.cognitive_level, CognitiveLevel::Knowledge);
    }

    #[test]
    fn test_batch_matches_single() {
        let config = TmaxConfig::default();
        let questions: Vec<QuestionMetrics> = (0..50)
            .map(|i| QuestionMetrics {
                char_count: i * 37,
                concept_count: i % 4,
                cognitive_level: CognitiveLevel::ALL[i % 3],
            })
            .collect();

        let batch = tmax_batch(&config, &questions);
        for (q, t) in questions.iter().zip(&batch) {
            assert_eq!(*t, config.tmax_for(q));
        }
    }
}
