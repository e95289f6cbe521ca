//! Plain data row types written by output backends.

use ep_core::{Compartment, CompartmentCounts};
use ep_intervention::{ActiveIntervention, ApplyReport};
use ep_sim::{Checkpoint, DailyRecord, SummaryStats};

/// One day of the history, flattened.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRow {
    pub day:            u32,
    pub counts:         CompartmentCounts,
    pub new_infections: usize,
    pub hospital_beds:  usize,
    /// Empty when no estimate was available.
    pub r_eff:          Option<f64>,
    /// Active intervention names joined with `;`.
    pub interventions:  String,
    /// The same interventions with their parameters.
    pub active:         Vec<ActiveIntervention>,
}

impl From<&DailyRecord> for DailyRow {
    fn from(r: &DailyRecord) -> Self {
        Self {
            day:            r.day.0,
            counts:         r.counts,
            new_infections: r.new_infections,
            hospital_beds:  r.hospital_beds,
            r_eff:          r.r_eff,
            interventions:  r
                .intervention_kinds()
                .iter()
                .map(|k| k.name())
                .collect::<Vec<_>>()
                .join(";"),
            active:         r.interventions.clone(),
        }
    }
}

/// One person's compartment at a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeStateRow {
    pub day:         u32,
    pub person:      u32,
    pub compartment: Compartment,
}

impl NodeStateRow {
    pub fn from_checkpoint(cp: &Checkpoint) -> Vec<NodeStateRow> {
        cp.compartments
            .iter()
            .enumerate()
            .map(|(i, &compartment)| NodeStateRow { day: cp.day.0, person: i as u32, compartment })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterventionRow {
    pub day:              u32,
    pub intervention:     &'static str,
    pub people_affected:  usize,
    pub doses:            usize,
    pub vaccinated:       usize,
    pub contacts_changed: usize,
    pub events_scheduled: usize,
}

impl From<&ApplyReport> for InterventionRow {
    fn from(r: &ApplyReport) -> Self {
        Self {
            day:              r.day.0,
            intervention:     r.kind.name(),
            people_affected:  r.people_affected,
            doses:            r.doses,
            vaccinated:       r.vaccinated,
            contacts_changed: r.contacts_changed,
            events_scheduled: r.events_scheduled,
        }
    }
}

/// One `metric,value` line of the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub metric: &'static str,
    pub value:  String,
}

impl SummaryRow {
    pub fn from_summary(s: &SummaryStats) -> Vec<SummaryRow> {
        s.rows().into_iter().map(|(metric, value)| SummaryRow { metric, value }).collect()
    }
}

/// Header names for the compartment columns, in canonical order.
pub(crate) fn compartment_headers() -> impl Iterator<Item = &'static str> {
    Compartment::ALL.into_iter().map(Compartment::code)
}
