//! Review Queue Builder
//!
//! Fills at most `slot_count` places for the next session, in strict order:
//!
//! 1. Target unit: due follow-up items, then active or unseen items
//! 2. Other units of the course, weakest mastery first
//! 3. Archived items, weak units first, then any unit
//!
//! Follow-up items sort ahead of fresh items inside a unit. Equal weights
//! keep fetch order. Simulation items never enter the queue.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::QueueConfig;
use crate::review::is_due;
use crate::types::{ChunkMastery, ItemStatus, TrackedItem, UsageType};

const WEIGHT_FOLLOWUP: u8 = 1;
const WEIGHT_FRESH: u8 = 2;
const WEIGHT_ARCHIVED: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueTier {
    Target,
    Sibling,
    ArchiveBackfill,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub question_id: String,
    pub chunk_id: String,
    /// `None` for items never answered
    pub status: Option<ItemStatus>,
    pub tier: QueueTier,
    /// Lower is pulled first
    pub priority: u8,
}

/// Queue assembly over one course's items and unit mastery rows
pub struct ReviewQueueBuilder<'a> {
    config: &'a QueueConfig,
    items: &'a [TrackedItem],
    mastery: &'a [ChunkMastery],
    by_unit: HashMap<&'a str, Vec<&'a TrackedItem>>,
    unit_mastery: HashMap<&'a str, &'a ChunkMastery>,
    unit_order: Vec<&'a str>,
}

impl<'a> ReviewQueueBuilder<'a> {
    pub fn new(config: &'a QueueConfig, items: &'a [TrackedItem], mastery: &'a [ChunkMastery]) -> Self {
        let mut by_unit: HashMap<&str, Vec<&TrackedItem>> = HashMap::new();
        let mut unit_order = Vec::new();
        let mut seen = HashSet::new();

        for tracked in items {
            let unit = tracked.item.chunk_id.as_str();
            if seen.insert(unit) {
                unit_order.push(unit);
            }
            by_unit.entry(unit).or_default().push(tracked);
        }
        let mut unit_mastery = HashMap::new();
        for row in mastery {
            let unit = row.chunk_id.as_str();
            if seen.insert(unit) {
                unit_order.push(unit);
            }
            unit_mastery.entry(unit).or_insert(row);
        }

        Self {
            config,
            items,
            mastery,
            by_unit,
            unit_mastery,
            unit_order,
        }
    }

    /// Most recently reviewed unit, if any unit has been reviewed
    pub fn frontier_unit(&self) -> Option<&'a str> {
        let mut best: Option<&ChunkMastery> = None;
        for row in self.mastery {
            if best.map_or(true, |b| row.last_reviewed_session > b.last_reviewed_session) {
                best = Some(row);
            }
        }
        best.map(|row| row.chunk_id.as_str())
    }

    /// `slot_count` of `None` uses the configured slot count.
    pub fn build(&self, target: Option<&str>, slot_count: Option<usize>, current_session: i64) -> Vec<ReviewItem> {
        let slot_count = slot_count.unwrap_or(self.config.slot_count);
        let mut queue: Vec<ReviewItem> = Vec::with_capacity(slot_count);
        let mut taken: HashSet<&str> = HashSet::new();

        let target = target.or_else(|| self.frontier_unit());

        // Step 1
        if let Some(unit) = target {
            self.pull_unit(unit, QueueTier::Target, slot_count, current_session, &mut queue, &mut taken);
            tracing::debug!(unit, filled = queue.len(), slot_count, "queue step 1 (target unit)");
        } else {
            tracing::debug!("queue step 1 skipped, no target or frontier unit");
        }

        // Step 2
        if queue.len() < slot_count {
            for unit in self.ranked_siblings(target) {
                if queue.len() >= slot_count {
                    break;
                }
                self.pull_unit(unit, QueueTier::Sibling, slot_count, current_session, &mut queue, &mut taken);
            }
            tracing::debug!(filled = queue.len(), slot_count, "queue step 2 (sibling units)");
        }

        // Step 3
        if queue.len() < slot_count {
            self.backfill_archived(slot_count, &mut queue, &mut taken);
            tracing::debug!(filled = queue.len(), slot_count, "queue step 3 (archive backfill)");
        }

        queue
    }

    fn mastery_of(&self, unit: &str) -> Option<&'a ChunkMastery> {
        self.unit_mastery.get(unit).copied()
    }

    /// Other units by ascending mastery, most recently reviewed first on ties
    fn ranked_siblings(&self, target: Option<&str>) -> Vec<&'a str> {
        let mut units: Vec<(&'a str, i64, Option<i64>)> = self
            .unit_order
            .iter()
            .copied()
            .filter(|unit| Some(*unit) != target)
            .map(|unit| {
                let row = self.mastery_of(unit);
                (
                    unit,
                    row.map_or(0, |r| r.mastery_score),
                    row.map(|r| r.last_reviewed_session),
                )
            })
            .collect();

        // stable: remaining ties keep first-seen order
        units.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| b.2.cmp(&a.2)));
        units.into_iter().map(|(unit, _, _)| unit).collect()
    }

    fn pull_unit(
        &self,
        unit: &str,
        tier: QueueTier,
        slot_count: usize,
        current_session: i64,
        queue: &mut Vec<ReviewItem>,
        taken: &mut HashSet<&'a str>,
    ) {
        let Some(members) = self.by_unit.get(unit) else {
            return;
        };

        let mut eligible: Vec<(u8, &TrackedItem)> = members
            .iter()
            .copied()
            .filter(|t| t.item.usage_type != UsageType::Simulation)
            .filter_map(|t| match t.progress {
                None => Some((WEIGHT_FRESH, t)),
                Some(p) => match p.status {
                    ItemStatus::Active => Some((WEIGHT_FRESH, t)),
                    ItemStatus::PendingFollowup if is_due(&p, current_session) => {
                        Some((WEIGHT_FOLLOWUP, t))
                    }
                    _ => None,
                },
            })
            .collect();
        eligible.sort_by_key(|(weight, _)| *weight);

        for (priority, tracked) in eligible {
            if queue.len() >= slot_count {
                break;
            }
            push_item(tracked, tier, priority, queue, taken);
        }
    }

    fn backfill_archived(&self, slot_count: usize, queue: &mut Vec<ReviewItem>, taken: &mut HashSet<&'a str>) {
        let archived: Vec<&TrackedItem> = self
            .items
            .iter()
            .filter(|t| t.item.usage_type != UsageType::Simulation)
            .filter(|t| t.status() == Some(ItemStatus::Archived))
            .collect();

        let mut weak: Vec<(i64, &TrackedItem)> = archived
            .iter()
            .copied()
            .filter_map(|t| {
                let score = self
                    .mastery_of(&t.item.chunk_id)
                    .map_or(0, |r| r.mastery_score);
                (score < self.config.weak_unit_threshold).then_some((score, t))
            })
            .collect();
        weak.sort_by_key(|(score, _)| *score);

        let ordered = weak.into_iter().map(|(_, t)| t).chain(archived);
        for tracked in ordered {
            if queue.len() >= slot_count {
                break;
            }
            push_item(tracked, QueueTier::ArchiveBackfill, WEIGHT_ARCHIVED, queue, taken);
        }
    }
}

fn push_item<'a>(
    tracked: &'a TrackedItem,
    tier: QueueTier,
    priority: u8,
    queue: &mut Vec<ReviewItem>,
    taken: &mut HashSet<&'a str>,
) {
    if !taken.insert(tracked.item.id.as_str()) {
        return;
    }
    queue.push(ReviewItem {
        question_id: tracked.item.id.clone(),
        chunk_id: tracked.item.chunk_id.clone(),
        status: tracked.status(),
        tier,
        priority,
    });
}

/// Builds a queue with the default weak-unit threshold
pub fn build_review_queue(
    items: &[TrackedItem],
    mastery: &[ChunkMastery],
    target: Option<&str>,
    slot_count: usize,
    current_session: i64,
) -> Vec<ReviewItem> {
    let config = QueueConfig::default();
    ReviewQueueBuilder::new(&config, items, mastery).build(target, Some(slot_count), current_session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CognitiveLevel, ItemProgress, QuestionItem};

    fn tracked(id: &str, unit: &str, status: Option<ItemStatus>) -> TrackedItem {
        let item = QuestionItem {
            id: id.to_string(),
            chunk_id: unit.to_string(),
            course_id: "course".to_string(),
            cognitive_level: CognitiveLevel::Knowledge,
            parent_question_id: None,
            usage_type: UsageType::Training,
        };
        let progress = status.map(|status| ItemProgress {
            status,
            consecutive_success: if status == ItemStatus::Archived { 3.0 } else { 0.0 },
            consecutive_fails: 0,
            next_eligible_session: Some(1),
        });
        TrackedItem::new(item, progress)
    }

    fn mastery(unit: &str, score: i64, last: i64) -> ChunkMastery {
        ChunkMastery {
            mastery_score: score,
            last_reviewed_session: last,
            ..ChunkMastery::new(unit)
        }
    }

    fn ids(queue: &[ReviewItem]) -> Vec<&str> {
        queue.iter().map(|r| r.question_id.as_str()).collect()
    }

    #[test]
    fn test_followups_before_fresh_in_target() {
        let items = vec![
            tracked("a", "u1", None),
            tracked("b", "u1", Some(ItemStatus::PendingFollowup)),
            tracked("c", "u1", Some(ItemStatus::Active)),
            tracked("d", "u1", Some(ItemStatus::PendingFollowup)),
        ];
        let queue = build_review_queue(&items, &[], Some("u1"), 10, 1);
        assert_eq!(ids(&queue), vec!["b", "d", "a", "c"]);
        assert!(queue.iter().all(|r| r.tier == QueueTier::Target));
        assert_eq!(queue[0].priority, 1);
        assert_eq!(queue[2].priority, 2);
    }

    #[test]
    fn test_followup_not_yet_due_is_skipped() {
        let mut item = tracked("b", "u1", Some(ItemStatus::PendingFollowup));
        if let Some(p) = item.progress.as_mut() {
            p.next_eligible_session = Some(9);
        }
        let items = vec![item, tracked("a", "u1", None)];
        let queue = build_review_queue(&items, &[], Some("u1"), 10, 3);
        assert_eq!(ids(&queue), vec!["a"]);
    }

    #[test]
    fn test_slot_count_caps_queue() {
        let items: Vec<TrackedItem> = (0..10).map(|i| tracked(&format!("q{i}"), "u1", None)).collect();
        let queue = build_review_queue(&items, &[], Some("u1"), 3, 1);
        assert_eq!(ids(&queue), vec!["q0", "q1", "q2"]);
    }

    #[test]
    fn test_configured_slot_count_used_when_none() {
        let items: Vec<TrackedItem> = (0..40).map(|i| tracked(&format!("q{i}"), "u1", None)).collect();

        let config = QueueConfig::default();
        let queue = ReviewQueueBuilder::new(&config, &items, &[]).build(Some("u1"), None, 1);
        assert_eq!(queue.len(), 25);

        let config = QueueConfig {
            slot_count: 4,
            ..QueueConfig::default()
        };
        let builder = ReviewQueueBuilder::new(&config, &items, &[]);
        assert_eq!(builder.build(Some("u1"), None, 1).len(), 4);
        assert_eq!(builder.build(Some("u1"), Some(6), 1).len(), 6);
    }

    #[test]
    fn test_siblings_weakest_first() {
        let items = vec![
            tracked("t1", "target", None),
            tracked("s1", "strong", None),
            tracked("w1", "weak", None),
            tracked("m1", "mid", None),
        ];
        let rows = vec![
            mastery("target", 40, 5),
            mastery("strong", 90, 1),
            mastery("weak", 10, 2),
            mastery("mid", 50, 3),
        ];
        let queue = build_review_queue(&items, &rows, Some("target"), 10, 1);
        assert_eq!(ids(&queue), vec!["t1", "w1", "m1", "s1"]);
        assert_eq!(queue[1].tier, QueueTier::Sibling);
    }

    #[test]
    fn test_sibling_tie_prefers_recently_reviewed() {
        let items = vec![tracked("x1", "x", None), tracked("y1", "y", None)];
        let rows = vec![mastery("x", 30, 1), mastery("y", 30, 4)];
        let queue = build_review_queue(&items, &rows, Some("none"), 10, 1);
        assert_eq!(ids(&queue), vec!["y1", "x1"]);
    }

    #[test]
    fn test_empty_target_degrades_to_siblings() {
        let items = vec![
            tracked("done", "u1", Some(ItemStatus::Archived)),
            tracked("other", "u2", None),
        ];
        let queue = build_review_queue(&items, &[], Some("u1"), 1, 1);
        assert_eq!(ids(&queue), vec!["other"]);
    }

    #[test]
    fn test_backfill_prefers_weak_units() {
        let items = vec![
            tracked("strong_a", "strong", Some(ItemStatus::Archived)),
            tracked("weak_a", "weak", Some(ItemStatus::Archived)),
            tracked("fresh", "target", None),
        ];
        let rows = vec![mastery("strong", 95, 1), mastery("weak", 20, 1)];
        let queue = build_review_queue(&items, &rows, Some("target"), 3, 1);
        assert_eq!(ids(&queue), vec!["fresh", "weak_a", "strong_a"]);
        assert_eq!(queue[1].tier, QueueTier::ArchiveBackfill);
        assert_eq!(queue[1].priority, 3);
    }

    #[test]
    fn test_frontier_unit_used_without_target() {
        let items = vec![tracked("old", "u_old", None), tracked("new", "u_new", None)];
        let rows = vec![mastery("u_old", 10, 2), mastery("u_new", 60, 7)];
        let queue = build_review_queue(&items, &rows, None, 10, 1);
        assert_eq!(queue[0].question_id, "new");
        assert_eq!(queue[0].tier, QueueTier::Target);
    }

    #[test]
    fn test_simulation_items_never_queued() {
        let mut sim = tracked("sim", "u1", None);
        sim.item.usage_type = UsageType::Simulation;
        let items = vec![sim, tracked("a", "u1", None)];
        let queue = build_review_queue(&items, &[], Some("u1"), 10, 1);
        assert_eq!(ids(&queue), vec!["a"]);
    }

    #[test]
    fn test_duplicate_ids_are_queued_once() {
        let items = vec![
            tracked("dup", "u1", Some(ItemStatus::Archived)),
            tracked("dup", "u2", Some(ItemStatus::Archived)),
        ];
        let queue = build_review_queue(&items, &[], None, 10, 1);
        assert_eq!(ids(&queue), vec!["dup"]);
    }
}
