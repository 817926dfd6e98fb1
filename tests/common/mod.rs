#![allow(dead_code)]

use shelf_srs::{
    AnswerContext, AnswerEvent, ChunkMastery, CognitiveLevel, ItemProgress, ItemStatus,
    QuestionItem, ResponseType, TrackedItem, UsageType,
};

pub const COURSE_ID: &str = "course-anatomy";

pub fn question(id: &str, unit: &str, usage: UsageType) -> QuestionItem {
    QuestionItem {
        id: id.to_string(),
        chunk_id: unit.to_string(),
        course_id: COURSE_ID.to_string(),
        cognitive_level: CognitiveLevel::Knowledge,
        parent_question_id: None,
        usage_type: usage,
    }
}

pub fn progress(status: ItemStatus, success: f64, next_session: Option<i64>) -> ItemProgress {
    ItemProgress {
        status,
        consecutive_success: success,
        consecutive_fails: 0,
        next_eligible_session: next_session,
    }
}

pub fn unseen(id: &str, unit: &str) -> TrackedItem {
    TrackedItem::new(question(id, unit, UsageType::Training), None)
}

pub fn active(id: &str, unit: &str) -> TrackedItem {
    TrackedItem::new(
        question(id, unit, UsageType::Training),
        Some(ItemProgress::fresh()),
    )
}

pub fn pending(id: &str, unit: &str, next_session: i64) -> TrackedItem {
    TrackedItem::new(
        question(id, unit, UsageType::Training),
        Some(progress(ItemStatus::PendingFollowup, 0.0, Some(next_session))),
    )
}

pub fn archived(id: &str, unit: &str) -> TrackedItem {
    TrackedItem::new(
        question(id, unit, UsageType::Training),
        Some(progress(ItemStatus::Archived, 3.0, Some(1))),
    )
}

pub fn mastery_row(unit: &str, score: i64, last_reviewed: i64) -> ChunkMastery {
    ChunkMastery {
        chunk_id: unit.to_string(),
        mastery_score: score,
        total_questions_seen: 0,
        last_reviewed_session: last_reviewed,
    }
}

/// Knowledge question of 780 characters and no concepts: T-max 85 000 ms
pub fn answer(id: &str, response: ResponseType, elapsed_ms: u64) -> AnswerEvent {
    AnswerEvent {
        item: question(id, "unit-1", UsageType::Training),
        response,
        elapsed_ms,
        char_count: 780,
        concept_count: 0,
        previously_attempted: false,
    }
}

pub fn context(session: i64) -> AnswerContext {
    AnswerContext {
        current_session: session,
        progress: None,
        mastery: None,
        unique_solved: 0,
        unit_question_count: 10,
    }
}
