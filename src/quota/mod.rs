//! Quota Allocator
//!
//! How many items of each usage type a unit should hold. The effective total
//! per type is `max(suggested or default quota, existing count)`, so a unit
//! never reports more solved items than its total.

use serde::{Deserialize, Serialize};

use crate::config::QuotaConfig;
use crate::types::{ItemStatus, QuestionItem, TrackedItem, UsageType};

/// Quotas proposed by the content generator; any of them may be missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SuggestedQuotas {
    #[serde(alias = "antrenman")]
    pub training: Option<u32>,
    #[serde(alias = "arsiv")]
    pub archive: Option<u32>,
    #[serde(alias = "deneme")]
    pub simulation: Option<u32>,
}

/// Item counts per usage type; follow-up items are counted apart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageCounts {
    pub training: u32,
    pub archive: u32,
    pub simulation: u32,
    pub followup: u32,
}

impl UsageCounts {
    pub fn tally<'a>(items: impl IntoIterator<Item = &'a QuestionItem>) -> Self {
        let mut counts = Self::default();
        for item in items {
            counts.add(item);
        }
        counts
    }

    /// Counts only the items the learner has answered at least once
    pub fn tally_solved(items: &[TrackedItem]) -> Self {
        Self::tally(
            items
                .iter()
                .filter(|t| t.progress.is_some())
                .map(|t| &t.item),
        )
    }

    fn add(&mut self, item: &QuestionItem) {
        let slot = if item.is_followup() {
            &mut self.followup
        } else {
            match item.usage_type {
                UsageType::Training => &mut self.training,
                UsageType::Archive => &mut self.archive,
                UsageType::Simulation => &mut self.simulation,
            }
        };
        *slot = slot.saturating_add(1);
    }

    pub fn get(&self, usage: UsageType) -> u32 {
        match usage {
            UsageType::Training => self.training,
            UsageType::Archive => self.archive,
            UsageType::Simulation => self.simulation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeQuota {
    pub quota: u32,
    pub existing: u32,
    pub total: u32,
}

impl TypeQuota {
    fn new(quota: u32, existing: u32) -> Self {
        Self {
            quota,
            existing,
            total: quota.max(existing),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaAllocation {
    pub training: TypeQuota,
    pub archive: TypeQuota,
    pub simulation: TypeQuota,
}

impl QuotaAllocation {
    pub fn get(&self, usage: UsageType) -> TypeQuota {
        match usage {
            UsageType::Training => self.training,
            UsageType::Archive => self.archive,
            UsageType::Simulation => self.simulation,
        }
    }

    pub fn grand_total(&self) -> u32 {
        self.training
            .total
            .saturating_add(self.archive.total)
            .saturating_add(self.simulation.total)
    }
}

impl QuotaConfig {
    /// Suggested quota where present, configured default otherwise
    pub fn resolve(&self, suggested: &SuggestedQuotas) -> QuotaConfig {
        QuotaConfig {
            training: suggested.training.unwrap_or(self.training),
            archive: suggested.archive.unwrap_or(self.archive),
            simulation: suggested.simulation.unwrap_or(self.simulation),
        }
    }

    pub fn allocate(&self, suggested: &SuggestedQuotas, existing: &UsageCounts) -> QuotaAllocation {
        let quota = self.resolve(suggested);
        QuotaAllocation {
            training: TypeQuota::new(quota.training, existing.training),
            archive: TypeQuota::new(quota.archive, existing.archive),
            simulation: TypeQuota::new(quota.simulation, existing.simulation),
        }
    }
}

/// Allocation with the default quotas (5 / 1 / 1)
pub fn allocate_quotas(suggested: &SuggestedQuotas, existing: &UsageCounts) -> QuotaAllocation {
    QuotaConfig::default().allocate(suggested, existing)
}

/// Complete once every existing training item has been solved
pub fn is_training_complete(existing_training: u32, solved_training: u32) -> bool {
    existing_training > 0 && solved_training >= existing_training
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageProgress {
    pub solved: u32,
    pub total: u32,
    /// Follow-up items have no quota
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota: Option<u32>,
    pub existing: u32,
}

impl UsageProgress {
    fn from_quota(solved: u32, quota: TypeQuota) -> Self {
        Self {
            solved,
            total: quota.total,
            quota: Some(quota.quota),
            existing: quota.existing,
        }
    }
}

/// Progress report of one content unit for one learner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitProgress {
    /// Every existing training item is solved. Compared against the existing
    /// count, not `training.total`, so 2/5 can be complete with two items.
    pub completed: bool,
    pub training: UsageProgress,
    pub archive: UsageProgress,
    pub simulation: UsageProgress,
    pub followup: UsageProgress,
    /// Archived items whose review session has come
    pub srs_due_count: u32,
}

impl UnitProgress {
    pub fn compute(
        config: &QuotaConfig,
        suggested: &SuggestedQuotas,
        items: &[TrackedItem],
        current_session: i64,
    ) -> Self {
        let existing = UsageCounts::tally(items.iter().map(|t| &t.item));
        let solved = UsageCounts::tally_solved(items);
        let allocation = config.allocate(suggested, &existing);

        let srs_due_count = items
            .iter()
            .filter_map(|t| t.progress)
            .filter(|p| p.status == ItemStatus::Archived)
            .filter(|p| p.next_eligible_session.is_some_and(|next| next <= current_session))
            .count();

        Self {
            completed: is_training_complete(existing.training, solved.training),
            training: UsageProgress::from_quota(solved.training, allocation.training),
            archive: UsageProgress::from_quota(solved.archive, allocation.archive),
            simulation: UsageProgress::from_quota(solved.simulation, allocation.simulation),
            followup: UsageProgress {
                solved: solved.followup,
                total: existing.followup,
                quota: None,
                existing: existing.followup,
            },
            srs_due_count: u32::try_from(srs_due_count).unwrap_or(u32::MAX),
        }
    }
}
