//! Common Types and Constants
//!
//! Shared data structures used across all scheduling modules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AlgoError;

// ==================== Constants ====================

/// Success points awarded for a correct answer inside T-max
pub const FAST_SUCCESS_INCREMENT: f64 = 1.0;

/// Success points awarded for a correct answer slower than T-max
pub const SLOW_SUCCESS_INCREMENT: f64 = 0.5;

/// Success points at which an item is archived
pub const ARCHIVE_THRESHOLD: f64 = 3.0;

/// Reading rate used by T-max (characters per minute)
pub const READING_CHARS_PER_MINUTE: f64 = 780.0;

/// Base complexity allowance (seconds)
pub const BASE_COMPLEXITY_SECONDS: f64 = 15.0;

/// Extra complexity allowance per related concept (seconds)
pub const SECONDS_PER_CONCEPT: f64 = 2.0;

/// Fixed cognitive-switch buffer (seconds)
pub const BUFFER_SECONDS: f64 = 10.0;

/// Flat fast/slow limit for simulation items (ms)
pub const SIMULATION_FAST_LIMIT_MS: u64 = 30_000;

pub const POINTS_CORRECT: i64 = 10;
pub const PENALTY_INCORRECT_FIRST: i64 = 5;
pub const PENALTY_BLANK_FIRST: i64 = 2;
pub const PENALTY_REPEATED: i64 = 10;

pub const MIN_MASTERY_SCORE: i64 = 0;
pub const MAX_MASTERY_SCORE: i64 = 100;

/// Lower bound of the Bloom time ratio
pub const MIN_TIME_RATIO: f64 = 0.5;

/// Upper bound of the Bloom time ratio
pub const MAX_TIME_RATIO: f64 = 2.0;

/// Actual answer times are floored here before computing the time ratio (ms)
pub const MIN_ACTUAL_TIME_MS: u64 = 1_000;

/// Session gap table indexed by floor(consecutive_success) - 1
pub const SESSION_GAPS: [i64; 5] = [1, 2, 5, 10, 20];

/// Default review queue size
pub const DEFAULT_SLOT_COUNT: usize = 25;

/// Units below this mastery are preferred during archive backfill
pub const WEAK_UNIT_THRESHOLD: i64 = 70;

/// Coverage ratio at which a unit counts as freshly reviewed
pub const TOPIC_REFRESH_COVERAGE: f64 = 0.8;

pub const DEFAULT_TRAINING_QUOTA: u32 = 5;
pub const DEFAULT_ARCHIVE_QUOTA: u32 = 1;
pub const DEFAULT_SIMULATION_QUOTA: u32 = 1;

/// Self mastery needed for a concept to count as mastered
pub const CHAIN_SELF_THRESHOLD: f64 = 80.0;

/// Mastery every direct prerequisite needs for chain completion
pub const CHAIN_PREREQUISITE_THRESHOLD: f64 = 85.0;

/// Mastery at which a concept is shown as in progress
pub const IN_PROGRESS_THRESHOLD: f64 = 50.0;

/// Planning days gained per completed non-root chain
pub const RESILIENCE_DAYS_PER_CHAIN: u32 = 2;

/// Aging-duration multiplier for a concept inside a completed chain
pub const RESILIENCE_AGING_MULTIPLIER: f64 = 1.4;

// ==================== Enumerations ====================

/// Bloom taxonomy level of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CognitiveLevel {
    Knowledge,
    Application,
    Analysis,
}

impl CognitiveLevel {
    pub const ALL: [CognitiveLevel; 3] = [
        CognitiveLevel::Knowledge,
        CognitiveLevel::Application,
        CognitiveLevel::Analysis,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            CognitiveLevel::Knowledge => "knowledge",
            CognitiveLevel::Application => "application",
            CognitiveLevel::Analysis => "analysis",
        }
    }

    /// Parses host input, falling back to `Knowledge` for unknown strings.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| {
            tracing::warn!(value = raw, "unknown cognitive level, using knowledge");
            CognitiveLevel::Knowledge
        })
    }
}

impl FromStr for CognitiveLevel {
    type Err = AlgoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "knowledge" => Ok(CognitiveLevel::Knowledge),
            "application" => Ok(CognitiveLevel::Application),
            "analysis" => Ok(CognitiveLevel::Analysis),
            _ => Err(AlgoError::UnknownCognitiveLevel(s.to_string())),
        }
    }
}

impl fmt::Display for CognitiveLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a question is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageType {
    Training,
    Archive,
    Simulation,
}

impl UsageType {
    pub const fn as_str(self) -> &'static str {
        match self {
            UsageType::Training => "training",
            UsageType::Archive => "archive",
            UsageType::Simulation => "simulation",
        }
    }

    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| {
            tracing::warn!(value = raw, "unknown usage type, using training");
            UsageType::Training
        })
    }
}

impl FromStr for UsageType {
    type Err = AlgoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // legacy spellings are still present in older content rows
        match s.trim().to_lowercase().as_str() {
            "training" | "antrenman" => Ok(UsageType::Training),
            "archive" | "arsiv" => Ok(UsageType::Archive),
            "simulation" | "deneme" => Ok(UsageType::Simulation),
            _ => Err(AlgoError::UnknownUsageType(s.to_string())),
        }
    }
}

impl fmt::Display for UsageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shelf state of an item for one learner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Active,
    PendingFollowup,
    Archived,
}

impl ItemStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::PendingFollowup => "pending_followup",
            ItemStatus::Archived => "archived",
        }
    }

    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| {
            tracing::warn!(value = raw, "unknown item status, using active");
            ItemStatus::Active
        })
    }
}

impl FromStr for ItemStatus {
    type Err = AlgoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(ItemStatus::Active),
            "pending_followup" => Ok(ItemStatus::PendingFollowup),
            "archived" => Ok(ItemStatus::Archived),
            _ => Err(AlgoError::UnknownItemStatus(s.to_string())),
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a learner responded to a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Correct,
    Incorrect,
    Blank,
}

impl ResponseType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ResponseType::Correct => "correct",
            ResponseType::Incorrect => "incorrect",
            ResponseType::Blank => "blank",
        }
    }

    pub const fn is_correct(self) -> bool {
        matches!(self, ResponseType::Correct)
    }
}

impl FromStr for ResponseType {
    type Err = AlgoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "correct" => Ok(ResponseType::Correct),
            "incorrect" => Ok(ResponseType::Incorrect),
            "blank" => Ok(ResponseType::Blank),
            _ => Err(AlgoError::UnknownResponseType(s.to_string())),
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==================== Records ====================

/// A quiz question as the scheduler sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionItem {
    pub id: String,
    pub chunk_id: String,
    pub course_id: String,
    pub cognitive_level: CognitiveLevel,
    /// Set on remediation items generated after a wrong answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_question_id: Option<String>,
    pub usage_type: UsageType,
}

impl QuestionItem {
    pub fn is_followup(&self) -> bool {
        self.parent_question_id.is_some()
    }
}

/// Per-learner state of one item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemProgress {
    pub status: ItemStatus,
    /// Grows by 1.0 or 0.5, never rounded
    pub consecutive_success: f64,
    pub consecutive_fails: u32,
    pub next_eligible_session: Option<i64>,
}

impl ItemProgress {
    /// State of an item that has never been answered.
    pub const fn fresh() -> Self {
        Self {
            status: ItemStatus::Active,
            consecutive_success: 0.0,
            consecutive_fails: 0,
            next_eligible_session: None,
        }
    }
}

impl Default for ItemProgress {
    fn default() -> Self {
        Self::fresh()
    }
}

/// An item together with the learner's recorded state, if any
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedItem {
    pub item: QuestionItem,
    #[serde(default)]
    pub progress: Option<ItemProgress>,
}

impl TrackedItem {
    pub fn new(item: QuestionItem, progress: Option<ItemProgress>) -> Self {
        Self { item, progress }
    }

    pub fn status(&self) -> Option<ItemStatus> {
        self.progress.map(|p| p.status)
    }
}

/// Aggregate mastery of one content unit for one learner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMastery {
    pub chunk_id: String,
    /// Always within 0..=100
    pub mastery_score: i64,
    pub total_questions_seen: u32,
    pub last_reviewed_session: i64,
}

impl ChunkMastery {
    pub fn new(chunk_id: impl Into<String>) -> Self {
        Self {
            chunk_id: chunk_id.into(),
            mastery_score: 0,
            total_questions_seen: 0,
            last_reviewed_session: 0,
        }
    }
}
