//! Per-person compartment snapshots for replay.

use ep_agent::Vaccination;
use ep_core::{Compartment, CompartmentCounts, Day};
use serde::{Deserialize, Serialize};

/// Every person's compartment at the start of `day`.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Checkpoint {
    pub day:          Day,
    pub compartments: Vec<Compartment>,
    pub counts:       CompartmentCounts,
    /// Dose records, indexed like `compartments`.  Failed doses leave the
    /// person in S, so the compartment alone does not capture them.
    #[serde(default)]
    pub vaccinations: Vec<Option<Vaccination>>,
}

/// Checkpoints ordered by day; at most one per day.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckpointStore {
    checkpoints: Vec<Checkpoint>,
}

impl CheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, replacing any checkpoint already taken on the same day.
    pub fn insert(&mut self, checkpoint: Checkpoint) {
        match self.checkpoints.binary_search_by_key(&checkpoint.day, |c| c.day) {
            Ok(i) => self.checkpoints[i] = checkpoint,
            Err(i) => self.checkpoints.insert(i, checkpoint),
        }
    }

    pub fn get(&self, day: Day) -> Option<&Checkpoint> {
        self.checkpoints
            .binary_search_by_key(&day, |c| c.day)
            .ok()
            .map(|i| &self.checkpoints[i])
    }

    pub fn days(&self) -> Vec<Day> {
        self.checkpoints.iter().map(|c| c.day).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> {
        self.checkpoints.iter()
    }

    pub fn latest(&self) -> Option<&Checkpoint> {
        self.checkpoints.last()
    }

    /// Drop checkpoints taken after `day`.
    pub(crate) fn truncate_after(&mut self, day: Day) {
        self.checkpoints.retain(|c| c.day <= day);
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}
