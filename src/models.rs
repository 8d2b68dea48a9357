use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Convert a decimal amount to whole cents, rounding half away from zero.
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

pub fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Derived progress of a plan. Serialized into the plan list as a cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressSnapshot {
    pub completed: f64,
    pub total: f64,
    /// Raw percentage; may exceed 100 through rounding.
    pub percentage: f64,
    pub completed_boxes: usize,
    pub total_boxes: usize,
}

impl ProgressSnapshot {
    /// Percentage clamped to 0..=100 for progress bars.
    pub fn display_percentage(&self) -> f64 {
        self.percentage.clamp(0.0, 100.0)
    }

    pub fn remaining(&self) -> f64 {
        from_cents((to_cents(self.total) - to_cents(self.completed)).max(0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub id: String,
    pub objective: f64,
    pub created_at: String,
    #[serde(default)]
    pub progress: ProgressSnapshot,
}

/// Indices of boxes the saver has deposited. Marking is one-way: there is no
/// way to remove an index once it is in the set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletedSet(BTreeSet<usize>);

impl CompletedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the index was not already marked.
    pub fn mark(&mut self, index: usize) -> bool {
        self.0.insert(index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<usize> for CompletedSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
