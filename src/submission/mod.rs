//! Answer Pipeline
//!
//! Runs one answer through T-max, the shelf machine, the session gap table
//! and both score calculators, returning the new per-item and per-unit
//! state. Nothing is mutated in place; the host persists the outcome.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;
use crate::scoring::{is_topic_refreshed, AdvancedScore, ScoreChange};
use crate::timing::{is_fast, simulation_fast_limit_ms};
use crate::types::{ChunkMastery, ItemProgress, QuestionItem, ResponseType, UsageType};

/// A single submitted answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEvent {
    pub item: QuestionItem,
    pub response: ResponseType,
    pub elapsed_ms: u64,
    /// Stem plus options, see [`crate::timing::question_char_count`]
    pub char_count: usize,
    pub concept_count: usize,
    /// Whether this exact question id has any earlier attempt by this learner
    pub previously_attempted: bool,
}

/// State read by the host before the answer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnswerContext {
    pub current_session: i64,
    pub progress: Option<ItemProgress>,
    pub mastery: Option<ChunkMastery>,
    /// Distinct questions of the unit solved before this answer
    pub unique_solved: usize,
    pub unit_question_count: usize,
}

/// State to persist after the answer, plus diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub progress: ItemProgress,
    pub mastery: ChunkMastery,
    pub score_change: ScoreChange,
    pub advanced_score: AdvancedScore,
    pub tmax_ms: u64,
    pub is_fast: bool,
    pub topic_refreshed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AnswerProcessor {
    config: SchedulerConfig,
}

impl AnswerProcessor {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn process(&self, event: &AnswerEvent, context: &AnswerContext) -> AnswerOutcome {
        let item = &event.item;
        let prior_progress = context.progress.unwrap_or_default();
        let prior_mastery = context
            .mastery
            .clone()
            .unwrap_or_else(|| ChunkMastery::new(item.chunk_id.clone()));

        if item.usage_type == UsageType::Simulation {
            return self.process_simulation(event, prior_progress, prior_mastery);
        }

        let level = item.cognitive_level;
        let is_correct = event.response.is_correct();
        let tmax_ms = self
            .config
            .tmax
            .tmax_ms(event.char_count, event.concept_count, level);
        let fast = is_fast(event.elapsed_ms, tmax_ms);

        let mut progress = prior_progress.after_answer(is_correct, fast, &self.config.shelf);
        progress.next_eligible_session = Some(
            self.config
                .review
                .next_review_session(context.current_session, progress.consecutive_success),
        );

        let score_change = self.config.scoring.score_change(
            event.response,
            prior_mastery.mastery_score,
            event.previously_attempted,
        );
        let mastery = ChunkMastery {
            chunk_id: prior_mastery.chunk_id,
            mastery_score: score_change.new_score,
            total_questions_seen: prior_mastery.total_questions_seen.saturating_add(1),
            last_reviewed_session: context.current_session,
        };

        let advanced_score =
            self.config
                .scoring
                .advanced_score(score_change.delta as f64, level, event.elapsed_ms);

        let solved_after = if event.previously_attempted {
            context.unique_solved
        } else {
            context.unique_solved.saturating_add(1)
        };
        let topic_refreshed = is_topic_refreshed(solved_after, context.unit_question_count);

        tracing::debug!(
            question_id = %item.id,
            response = %event.response,
            elapsed_ms = event.elapsed_ms,
            tmax_ms,
            is_fast = fast,
            status = %progress.status,
            consecutive_success = progress.consecutive_success,
            next_session = ?progress.next_eligible_session,
            mastery = mastery.mastery_score,
            "answer processed"
        );

        AnswerOutcome {
            progress,
            mastery,
            score_change,
            advanced_score,
            tmax_ms,
            is_fast: fast,
            topic_refreshed,
        }
    }

    /// Simulation answers are judged against the flat limit and leave all
    /// stored state as it was.
    fn process_simulation(
        &self,
        event: &AnswerEvent,
        progress: ItemProgress,
        mastery: ChunkMastery,
    ) -> AnswerOutcome {
        let tmax_ms = simulation_fast_limit_ms();
        let fast = is_fast(event.elapsed_ms, tmax_ms);
        let score_change = ScoreChange {
            delta: 0,
            new_score: mastery.mastery_score,
        };
        let advanced_score =
            self.config
                .scoring
                .advanced_score(0.0, event.item.cognitive_level, event.elapsed_ms);

        tracing::debug!(question_id = %event.item.id, is_fast = fast, "simulation answer, state unchanged");

        AnswerOutcome {
            progress,
            mastery,
            score_change,
            advanced_score,
            tmax_ms,
            is_fast: fast,
            topic_refreshed: false,
        }
    }

    /// Independent answers (different items) processed in parallel
    pub fn process_batch(&self, answers: &[(AnswerEvent, AnswerContext)]) -> Vec<AnswerOutcome> {
        answers
            .par_iter()
            .map(|(event, context)| self.process(event, context))
            .collect()
    }
}

/// Processes one answer with the canonical configuration
pub fn process_answer(event: &AnswerEvent, context: &AnswerContext) -> AnswerOutcome {
    AnswerProcessor::default().process(event, context)
}

pub fn process_answers(answers: &[(AnswerEvent, AnswerContext)]) -> Vec<AnswerOutcome> {
    AnswerProcessor::default().process_batch(answers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CognitiveLevel, ItemStatus};

    fn event(response: ResponseType, elapsed_ms: u64, usage: UsageType) -> AnswerEvent {
        AnswerEvent {
            item: QuestionItem {
                id: "q1".to_string(),
                chunk_id: "c1".to_string(),
                course_id: "k1".to_string(),
                cognitive_level: CognitiveLevel::Knowledge,
                parent_question_id: None,
                usage_type: usage,
            },
            response,
            elapsed_ms,
            char_count: 780,
            concept_count: 0,
            previously_attempted: false,
        }
    }

    fn context(session: i64) -> AnswerContext {
        AnswerContext {
            current_session: session,
            unit_question_count: 10,
            ..AnswerContext::default()
        }
    }

    #[test]
    fn test_first_fast_correct_answer() {
        let outcome = process_answer(&event(ResponseType::Correct, 40_000, UsageType::Training), &context(3));
        assert_eq!(outcome.tmax_ms, 85_000);
        assert!(outcome.is_fast);
        assert_eq!(outcome.progress.status, ItemStatus::PendingFollowup);
        assert_eq!(outcome.progress.consecutive_success, 1.0);
        assert_eq!(outcome.progress.next_eligible_session, Some(4));
        assert_eq!(outcome.mastery.mastery_score, 10);
        assert_eq!(outcome.mastery.total_questions_seen, 1);
        assert_eq!(outcome.mastery.last_reviewed_session, 3);
        assert_eq!(outcome.mastery.chunk_id, "c1");
    }

    #[test]
    fn test_slow_correct_earns_half() {
        let outcome = process_answer(&event(ResponseType::Correct, 90_000, UsageType::Training), &context(1));
        assert!(!outcome.is_fast);
        assert_eq!(outcome.progress.consecutive_success, 0.5);
        // 20000 / 90000 clamps to 0.5
        assert_eq!(outcome.advanced_score.final_score, 5.0);
    }

    #[test]
    fn test_incorrect_resets_and_penalizes() {
        let mut ctx = context(5);
        ctx.progress = Some(ItemProgress {
            status: ItemStatus::PendingFollowup,
            consecutive_success: 2.5,
            consecutive_fails: 0,
            next_eligible_session: Some(5),
        });
        ctx.mastery = Some(ChunkMastery {
            mastery_score: 40,
            ..ChunkMastery::new("c1")
        });
        let mut ev = event(ResponseType::Incorrect, 10_000, UsageType::Training);
        ev.previously_attempted = true;

        let outcome = process_answer(&ev, &ctx);
        assert_eq!(outcome.progress.consecutive_success, 0.0);
        assert_eq!(outcome.progress.consecutive_fails, 1);
        assert_eq!(outcome.progress.next_eligible_session, Some(6));
        assert_eq!(outcome.score_change.delta, -10);
        assert_eq!(outcome.mastery.mastery_score, 30);
    }

    #[test]
    fn test_simulation_leaves_state_untouched() {
        let mut ctx = context(2);
        ctx.mastery = Some(ChunkMastery {
            mastery_score: 55,
            ..ChunkMastery::new("c1")
        });
        let outcome = process_answer(&event(ResponseType::Incorrect, 31_000, UsageType::Simulation), &ctx);
        assert_eq!(outcome.tmax_ms, 30_000);
        assert!(!outcome.is_fast);
        assert_eq!(outcome.progress, ItemProgress::fresh());
        assert_eq!(outcome.mastery.mastery_score, 55);
        assert_eq!(outcome.score_change.delta, 0);
        assert!(!outcome.topic_refreshed);
    }

    #[test]
    fn test_topic_refresh_counts_this_answer() {
        let mut ctx = context(1);
        ctx.unique_solved = 7;
        let outcome = process_answer(&event(ResponseType::Blank, 5_000, UsageType::Training), &ctx);
        assert!(outcome.topic_refreshed);

        let mut ev = event(ResponseType::Blank, 5_000, UsageType::Training);
        ev.previously_attempted = true;
        let outcome = process_answer(&ev, &ctx);
        assert!(!outcome.topic_refreshed);
    }

    #[test]
    fn test_batch_preserves_order() {
        let answers: Vec<(AnswerEvent, AnswerContext)> = (0..20)
            .map(|i| {
                let response = if i % 2 == 0 { ResponseType::Correct } else { ResponseType::Incorrect };
                (event(response, 1_000, UsageType::Training), context(i))
            })
            .collect();
        let outcomes = process_answers(&answers);
        assert_eq!(outcomes.len(), 20);
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.mastery.last_reviewed_session, i as i64);
            assert_eq!(outcome.score_change.delta > 0, i % 2 == 0);
        }
    }
}
