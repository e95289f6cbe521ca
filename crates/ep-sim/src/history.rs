//! Per-day records and the rolling R-effective estimate.

use ep_core::{CompartmentCounts, Day, InterventionKind};
use ep_intervention::ActiveIntervention;
use serde::{Deserialize, Serialize};

/// Everything recorded at the end of one simulated day.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct DailyRecord {
    pub day:            Day,
    pub counts:         CompartmentCounts,
    /// Infections since the previous record.  Seed infections count
    /// towards the first record after they were seeded.
    pub new_infections: usize,
    /// Active interventions, with their parameters, when the day was
    /// recorded.
    pub interventions:  Vec<ActiveIntervention>,
    /// Beds in use: Ih + Ic.
    pub hospital_beds:  usize,
    pub r_eff:          Option<f64>,
}

impl DailyRecord {
    /// Kinds of the active interventions, in canonical order.
    pub fn intervention_kinds(&self) -> Vec<InterventionKind> {
        self.interventions.iter().map(|a| a.intervention.kind()).collect()
    }
}

/// Append-only list of [`DailyRecord`]s, one per simulated day.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    records: Vec<DailyRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: DailyRecord) {
        debug_assert!(self.records.last().is_none_or(|r| r.day < record.day));
        self.records.push(record);
    }

    /// Drop every record for `day` and later.
    pub(crate) fn truncate_from(&mut self, day: Day) {
        self.records.retain(|r| r.day < day);
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&DailyRecord> {
        self.records.last()
    }

    pub fn get(&self, day: Day) -> Option<&DailyRecord> {
        self.records
            .binary_search_by_key(&day, |r| r.day)
            .ok()
            .map(|i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn new_infections(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.new_infections).collect()
    }

    /// Sum of new infections over the whole history.
    pub fn cumulative_infections(&self) -> usize {
        self.records.iter().map(|r| r.new_infections).sum()
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Ratio of mean new infections over the last `window` days to the mean
/// over the `window` days before that.
///
/// `None` until two full windows exist, when the recent window saw no
/// infections, or when the earlier window's mean is zero.
pub fn estimate_r_eff(new_infections: &[usize], window: usize) -> Option<f64> {
    if window == 0 || new_infections.len() < 2 * window {
        return None;
    }
    let n = new_infections.len();
    let recent: usize = new_infections[n - window..].iter().sum();
    let previous: usize = new_infections[n - 2 * window..n - window].iter().sum();
    if recent == 0 || previous == 0 {
        return None;
    }
    Some(recent as f64 / previous as f64)
}
