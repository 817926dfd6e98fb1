use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AlgoError, Result};
use crate::types::*;

/// Environment variable holding the path of a JSON config document
pub const CONFIG_PATH_ENV: &str = "SHELF_SRS_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShelfConfig {
    pub fast_increment: f64,
    pub slow_increment: f64,
    pub archive_threshold: f64,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            fast_increment: FAST_SUCCESS_INCREMENT,
            slow_increment: SLOW_SUCCESS_INCREMENT,
            archive_threshold: ARCHIVE_THRESHOLD,
        }
    }
}

/// Per-level multipliers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LevelWeights {
    pub knowledge: f64,
    pub application: f64,
    pub analysis: f64,
}

impl LevelWeights {
    pub fn get(&self, level: CognitiveLevel) -> f64 {
        match level {
            CognitiveLevel::Knowledge => self.knowledge,
            CognitiveLevel::Application => self.application,
            CognitiveLevel::Analysis => self.analysis,
        }
    }

    fn all_positive(&self) -> bool {
        CognitiveLevel::ALL.iter().all(|&l| self.get(l) > 0.0)
    }
}

impl Default for LevelWeights {
    fn default() -> Self {
        Self {
            knowledge: 1.0,
            application: 1.0,
            analysis: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TmaxConfig {
    pub chars_per_minute: f64,
    pub base_complexity_seconds: f64,
    pub seconds_per_concept: f64,
    pub buffer_seconds: f64,
    pub difficulty_multipliers: LevelWeights,
}

impl Default for TmaxConfig {
    fn default() -> Self {
        Self {
            chars_per_minute: READING_CHARS_PER_MINUTE,
            base_complexity_seconds: BASE_COMPLEXITY_SECONDS,
            seconds_per_concept: SECONDS_PER_CONCEPT,
            buffer_seconds: BUFFER_SECONDS,
            difficulty_multipliers: LevelWeights {
                knowledge: 1.0,
                application: 1.2,
                analysis: 1.5,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringConfig {
    pub points_correct: i64,
    pub penalty_incorrect_first: i64,
    pub penalty_blank_first: i64,
    pub penalty_repeated: i64,
    pub bloom_coefficients: LevelWeights,
    /// Target answer time per level (ms)
    pub target_times_ms: LevelWeights,
    pub min_time_ratio: f64,
    pub max_time_ratio: f64,
    pub min_actual_time_ms: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            points_correct: POINTS_CORRECT,
            penalty_incorrect_first: PENALTY_INCORRECT_FIRST,
            penalty_blank_first: PENALTY_BLANK_FIRST,
            penalty_repeated: PENALTY_REPEATED,
            bloom_coefficients: LevelWeights {
                knowledge: 1.0,
                application: 1.3,
                analysis: 1.6,
            },
            target_times_ms: LevelWeights {
                knowledge: 20_000.0,
                application: 35_000.0,
                analysis: 50_000.0,
            },
            min_time_ratio: MIN_TIME_RATIO,
            max_time_ratio: MAX_TIME_RATIO,
            min_actual_time_ms: MIN_ACTUAL_TIME_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewConfig {
    pub session_gaps: Vec<i64>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            session_gaps: SESSION_GAPS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueueConfig {
    pub slot_count: usize,
    pub weak_unit_threshold: i64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            slot_count: DEFAULT_SLOT_COUNT,
            weak_unit_threshold: WEAK_UNIT_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuotaConfig {
    pub training: u32,
    pub archive: u32,
    pub simulation: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            training: DEFAULT_TRAINING_QUOTA,
            archive: DEFAULT_ARCHIVE_QUOTA,
            simulation: DEFAULT_SIMULATION_QUOTA,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChainConfig {
    pub self_threshold: f64,
    pub prerequisite_threshold: f64,
    pub in_progress_threshold: f64,
    pub days_per_chain: u32,
    /// Aging multiplier for concepts in a completed chain
    pub resilience_multiplier: f64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            self_threshold: CHAIN_SELF_THRESHOLD,
            prerequisite_threshold: CHAIN_PREREQUISITE_THRESHOLD,
            in_progress_threshold: IN_PROGRESS_THRESHOLD,
            days_per_chain: RESILIENCE_DAYS_PER_CHAIN,
            resilience_multiplier: RESILIENCE_AGING_MULTIPLIER,
        }
    }
}

/// Full parameter set of the scheduler.
///
/// `Default` reproduces the canonical constants; a JSON document only needs
/// to name the fields it overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchedulerConfig {
    pub shelf: ShelfConfig,
    pub tmax: TmaxConfig,
    pub scoring: ScoringConfig,
    pub review: ReviewConfig,
    pub queue: QueueConfig,
    pub quota: QuotaConfig,
    pub chain: ChainConfig,
}

impl SchedulerConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| AlgoError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Loads the document named by `SHELF_SRS_CONFIG`, or the defaults when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                tracing::info!(path = %path, "loading scheduler config");
                Self::from_path(path.trim())
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let shelf = &self.shelf;
        if shelf.fast_increment <= 0.0 || shelf.slow_increment <= 0.0 {
            return Err(invalid("shelf increments must be positive"));
        }
        if shelf.archive_threshold <= 0.0 {
            return Err(invalid("shelf.archiveThreshold must be positive"));
        }

        if self.tmax.chars_per_minute <= 0.0 {
            return Err(invalid("tmax.charsPerMinute must be positive"));
        }
        if !self.tmax.difficulty_multipliers.all_positive() {
            return Err(invalid("tmax.difficultyMultipliers must be positive"));
        }

        let scoring = &self.scoring;
        if scoring.min_time_ratio <= 0.0 || scoring.min_time_ratio > scoring.max_time_ratio {
            return Err(invalid("scoring time ratio bounds are inverted or non-positive"));
        }
        if !scoring.target_times_ms.all_positive() {
            return Err(invalid("scoring.targetTimesMs must be positive"));
        }
        if scoring.min_actual_time_ms == 0 {
            return Err(invalid("scoring.minActualTimeMs must be at least 1"));
        }

        if self.review.session_gaps.is_empty() {
            return Err(invalid("review.sessionGaps must not be empty"));
        }
        if self.review.session_gaps.iter().any(|&gap| gap < 1) {
            return Err(invalid("review.sessionGaps entries must be at least 1"));
        }

        if !(0..=100).contains(&self.queue.weak_unit_threshold) {
            return Err(invalid("queue.weakUnitThreshold must be within 0..=100"));
        }

        let chain = &self.chain;
        for (name, value) in [
            ("chain.selfThreshold", chain.self_threshold),
            ("chain.prerequisiteThreshold", chain.prerequisite_threshold),
            ("chain.inProgressThreshold", chain.in_progress_threshold),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(invalid(&format!("{name} must be within 0..=100")));
            }
        }

        if chain.resilience_multiplier < 1.0 {
            return Err(invalid("chain.resilienceMultiplier must be at least 1"));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> AlgoError {
    AlgoError::InvalidConfig(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SchedulerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config =
            SchedulerConfig::from_json_str(r#"{"queue":{"slotCount":10}}"#).unwrap();
        assert_eq!(config.queue.slot_count, 10);
        assert_eq!(config.queue.weak_unit_threshold, WEAK_UNIT_THRESHOLD);
        assert_eq!(config.review.session_gaps, vec![1, 2, 5, 10, 20]);
        assert_eq!(config.tmax.difficulty_multipliers.analysis, 1.5);
    }

    #[test]
    fn test_empty_gap_table_rejected() {
        let err = SchedulerConfig::from_json_str(r#"{"review":{"sessionGaps":[]}}"#).unwrap_err();
        assert!(matches!(err, AlgoError::InvalidConfig(_)));
    }

    #[test]
    fn test_inverted_ratio_bounds_rejected() {
        let err = SchedulerConfig::from_json_str(
            r#"{"scoring":{"minTimeRatio":3.0,"maxTimeRatio":2.0}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("time ratio"));
    }

    #[test]
    fn test_shrinking_resilience_multiplier_rejected() {
        let err = SchedulerConfig::from_json_str(r#"{"chain":{"resilienceMultiplier":0.8}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("resilienceMultiplier"));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = SchedulerConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, AlgoError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SchedulerConfig::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, AlgoError::ConfigIo { .. }));
    }
}
