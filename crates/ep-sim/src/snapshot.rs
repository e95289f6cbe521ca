//! Whole-engine save and resume.
//!
//! A [`SimSnapshot`] holds every piece of mutable state: person records,
//! contact flags, interventions and trigger flags, the event queue, the
//! generator position, statistics, history, checkpoints and the infection
//! tree.  The graph itself is not stored; resume onto the same graph the
//! snapshot was taken from.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ep_agent::{HealthRecord, Population};
use ep_core::{Day, RngState, SimClock, SimConfig, SimRng};
use ep_disease::DiseaseParameters;
use ep_graph::ContactGraph;
use ep_intervention::{InterventionPlan, InterventionState};
use ep_schedule::EventQueue;
use serde::{Deserialize, Serialize};

use crate::{
    CheckpointStore, History, InfectionTree, RunStats, Sim, SimError, SimResult, SimStatus,
};

/// Format version written by [`Sim::snapshot`].
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub version:                u32,
    /// The next day to simulate.
    pub day:                    Day,
    pub config:                 SimConfig,
    pub disease:                DiseaseParameters,
    pub records:                Vec<HealthRecord>,
    pub active_contacts:        Vec<bool>,
    pub interventions:          InterventionState,
    pub plan:                   InterventionPlan,
    pub queue:                  EventQueue,
    pub rng:                    RngState,
    pub stats:                  RunStats,
    pub history:                History,
    pub checkpoints:            CheckpointStore,
    pub tree:                   InfectionTree,
    pub pending_new_infections: usize,
}

impl Sim {
    /// Capture the full mutable state.
    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            version:                SNAPSHOT_VERSION,
            day:                    self.clock.current_day,
            config:                 self.config.clone(),
            disease:                self.disease.clone(),
            records:                self.population.records().to_vec(),
            active_contacts:        self.graph.active_flags().to_vec(),
            interventions:          self.interventions.clone(),
            plan:                   self.plan.clone(),
            queue:                  self.queue.clone(),
            rng:                    self.rng.state(),
            stats:                  self.stats.clone(),
            history:                self.history.clone(),
            checkpoints:            self.checkpoints.clone(),
            tree:                   self.tree.clone(),
            pending_new_infections: self.pending_new_infections,
        }
    }

    /// Rebuild an engine from `snapshot` on top of `graph`.  Continuing the
    /// result produces the same days the original would have.
    ///
    /// # Errors
    ///
    /// - [`SimError::SnapshotVersion`] for an unsupported format version.
    /// - [`SimError::SnapshotMismatch`] if the record or contact counts do
    ///   not match `graph`.
    /// - Validation errors for the stored configuration or parameters.
    pub fn from_snapshot(mut graph: ContactGraph, snapshot: SimSnapshot) -> SimResult<Sim> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SimError::SnapshotVersion { found: snapshot.version, expected: SNAPSHOT_VERSION });
        }
        if snapshot.records.len() != graph.person_count() {
            return Err(SimError::SnapshotMismatch {
                expected: graph.person_count(),
                got:      snapshot.records.len(),
                what:     "records",
            });
        }
        if snapshot.active_contacts.len() != graph.contact_count() {
            return Err(SimError::SnapshotMismatch {
                expected: graph.contact_count(),
                got:      snapshot.active_contacts.len(),
                what:     "active_contacts",
            });
        }
        snapshot.config.validate()?;
        snapshot.disease.validate()?;
        graph.restore_active_flags(&snapshot.active_contacts)?;

        let population = Population::from_records(snapshot.records);
        population.check_partition()?;
        log::info!("resumed snapshot at {} with {} people", snapshot.day, population.len());

        Ok(Sim {
            config:        snapshot.config,
            disease:       snapshot.disease,
            clock:         SimClock::starting_at(snapshot.day),
            status:        SimStatus::Idle,
            graph,
            population,
            queue:         snapshot.queue,
            interventions: snapshot.interventions,
            plan:          snapshot.plan,
            rng:           SimRng::from_state(&snapshot.rng),
            history:       snapshot.history,
            checkpoints:   snapshot.checkpoints,
            stats:         snapshot.stats,
            tree:          snapshot.tree,
            pending_new_infections: snapshot.pending_new_infections,
        })
    }

    /// Write [`snapshot`](Sim::snapshot) as JSON.
    pub fn save_json(&self, path: &Path) -> SimResult<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, &self.snapshot())?;
        Ok(())
    }

    /// Read a JSON snapshot and resume it on `graph`.
    pub fn load_json(graph: ContactGraph, path: &Path) -> SimResult<Sim> {
        let reader = BufReader::new(File::open(path)?);
        let snapshot: SimSnapshot = serde_json::from_reader(reader)?;
        Sim::from_snapshot(graph, snapshot)
    }
}
