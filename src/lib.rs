//! # shelf-srs - adaptive spaced-repetition scheduling core
//!
//! Pure Rust scheduling logic for a self-study quiz platform:
//!
//! - **Shelf State Machine** - per-question lifecycle `active -> pending_followup -> archived`
//! - **T-max** - fair answer-time allowance from text length, concepts and Bloom level
//! - **Scoring** - unit mastery deltas and Bloom-weighted, time-scaled scores
//! - **Review Scheduler** - session gap table and the per-course session counter
//! - **Review Queue** - waterfall queue over target unit, weaker units and archive backfill
//! - **Quota Allocator** - per usage type item totals for a unit
//! - **Mastery Chains** - prerequisite-gated completion and resilience bonus
//!
//! ## Design
//!
//! - **No I/O** - the host fetches state, calls in, and persists what comes back
//! - **Values in, values out** - no hidden mutation, safe to call from any thread
//! - **Clamp, don't fail** - malformed numbers are sanitized; only labels and config can error
//!
//! ## Module layout
//!
//! - [`shelf`] - shelf transitions
//! - [`timing`] - T-max
//! - [`scoring`] - simple and advanced scores, session summaries
//! - [`review`] - next review session, due checks, session counter
//! - [`queue`] - review queue builder
//! - [`quota`] - quota allocation and unit progress
//! - [`chain`] - mastery chain graph
//! - [`submission`] - full answer pipeline
//! - [`config`] - tunable parameters
//! - [`logging`] - tracing subscriber setup
//! - [`sanitize`] - input clamping
//! - [`types`] - shared types and constants
//!
//! ## Example
//!
//! ```rust
//! use shelf_srs::{calculate_shelf_status, calculate_tmax, CognitiveLevel, ItemStatus};
//!
//! let tmax = calculate_tmax(780, 0, CognitiveLevel::Analysis);
//! assert_eq!(tmax, 92_500);
//!
//! let step = calculate_shelf_status(2.5, true, 80_000 <= tmax);
//! assert_eq!(step.status, ItemStatus::Archived);
//! ```

// ============================================================================
// Module declarations
// ============================================================================

pub mod error;
pub mod types;
pub mod sanitize;
pub mod config;
pub mod logging;
pub mod shelf;
pub mod timing;
pub mod scoring;
pub mod review;
pub mod quota;
pub mod queue;
pub mod chain;
pub mod submission;

// ============================================================================
// Re-exports
// ============================================================================

/// Shared types and constants
pub use types::*;

pub use error::{AlgoError, Result};

pub use config::{
    ChainConfig, LevelWeights, QueueConfig, QuotaConfig, ReviewConfig, SchedulerConfig,
    ScoringConfig, ShelfConfig, TmaxConfig,
};

pub use logging::{init_tracing, FileLogGuard, LogConfig};

/// Shelf state machine
pub use shelf::{calculate_shelf_status, ShelfTransition};

/// T-max
pub use timing::{calculate_tmax, is_fast, question_char_count, tmax_batch, QuestionMetrics};

/// Score calculators
pub use scoring::{
    calculate_advanced_score, calculate_score_change, coverage_weighted_mastery,
    is_topic_refreshed, AdvancedScore, ScoreChange, TestSummary,
};

/// Review scheduling
pub use review::{
    calculate_next_review_session, is_due, overdue_penalty, SessionCounter, SessionTick,
};

/// Quotas
pub use quota::{
    allocate_quotas, is_training_complete, QuotaAllocation, SuggestedQuotas, TypeQuota,
    UnitProgress, UsageCounts, UsageProgress,
};

/// Review queue
pub use queue::{build_review_queue, QueueTier, ReviewItem, ReviewQueueBuilder};

/// Mastery chains
pub use chain::{
    calculate_resilience_bonus, evaluate_mastery_chains, ChainEdge, ChainNode, ChainSummary,
    ConceptDef, MasteryChainGraph, NodeStatus,
};

/// Answer pipeline
pub use submission::{
    process_answer, process_answers, AnswerContext, AnswerEvent, AnswerOutcome, AnswerProcessor,
};
