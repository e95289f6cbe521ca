//! `InterventionState` — the map of currently active interventions.

use std::collections::BTreeMap;

use ep_core::{Day, InterventionKind};
use ep_disease::{DistancingMeasure, Measures};
use serde::{Deserialize, Serialize};

use crate::Intervention;

/// Days a gradual reopening takes to bring mobility back to baseline.
pub const REOPEN_RAMP_DAYS: u32 = 14;

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ActiveIntervention {
    pub intervention: Intervention,
    pub since:        Day,
    /// Day of the scheduled `end_<name>` event, if any.
    pub ends_on:      Option<Day>,
}

/// Active interventions keyed by kind.  Interventions are additive: any
/// number of kinds may be active at once.  Applying a kind that is already
/// active replaces its entry.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterventionState {
    active: BTreeMap<InterventionKind, ActiveIntervention>,
}

impl InterventionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, kind: InterventionKind) -> bool {
        self.active.contains_key(&kind)
    }

    pub fn get(&self, kind: InterventionKind) -> Option<&ActiveIntervention> {
        self.active.get(&kind)
    }

    /// Active kinds in canonical order.
    pub fn kinds(&self) -> Vec<InterventionKind> {
        self.active.keys().copied().collect()
    }

    /// Copies of every active entry in canonical order.
    pub fn entries(&self) -> Vec<ActiveIntervention> {
        self.active.values().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (InterventionKind, &ActiveIntervention)> {
        self.active.iter().map(|(&k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub(crate) fn insert(&mut self, entry: ActiveIntervention) {
        self.active.insert(entry.intervention.kind(), entry);
    }

    /// Drop an entry without any side effects.  Use
    /// [`end`](InterventionState::end) to also undo contact changes.
    pub fn remove(&mut self, kind: InterventionKind) -> Option<ActiveIntervention> {
        self.active.remove(&kind)
    }

    /// The parts of the state the transmission model reads.
    /// `default_mask_efficacy` applies to mandates that do not name one.
    pub fn measures(&self, default_mask_efficacy: f64) -> Measures {
        let mut m = Measures::default();
        for entry in self.active.values() {
            match entry.intervention {
                Intervention::SocialDistancing(p) => {
                    m.distancing = Some(DistancingMeasure {
                        effectiveness: p.effectiveness,
                        compliance:    p.compliance,
                    });
                }
                Intervention::MaskMandate(p) => {
                    m.mask_efficacy = Some(p.efficacy.unwrap_or(default_mask_efficacy));
                }
                Intervention::TravelRestrictions(p) => m.travel_reduction = Some(p.reduction),
                Intervention::Hygiene(p) => m.hygiene = Some(p.improvement),
                Intervention::Ventilation(p) => m.ventilation = Some(p.improvement),
                _ => {}
            }
        }
        m
    }
}
