//! Event payloads.

use std::fmt;

use ep_core::{Day, InterventionKind, PersonId};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(tag = "action", content = "intervention", rename_all = "snake_case")]
pub enum EventAction {
    /// E → the infectious compartment of the person's symptom class.
    BecomeInfectious,
    /// Infectious → Ih.
    Hospitalize,
    Recover,
    Die,
    /// Set the isolation flag; the compartment is unchanged.
    Isolate,
    /// Remove an entry from the active-intervention map.
    EndIntervention(InterventionKind),
}

impl EventAction {
    /// Same-day ordering rank; lower pops first.
    pub fn rank(self) -> u8 {
        match self {
            EventAction::BecomeInfectious   => 0,
            EventAction::Hospitalize        => 1,
            EventAction::Recover
            | EventAction::Die              => 2,
            EventAction::Isolate            => 3,
            EventAction::EndIntervention(_) => 4,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, EventAction::Recover | EventAction::Die)
    }

    /// Whether the action acts on a single person.
    pub fn needs_target(self) -> bool {
        !matches!(self, EventAction::EndIntervention(_))
    }
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventAction::BecomeInfectious   => f.write_str("become_infectious"),
            EventAction::Hospitalize        => f.write_str("hospitalize"),
            EventAction::Recover            => f.write_str("recover"),
            EventAction::Die                => f.write_str("die"),
            EventAction::Isolate            => f.write_str("isolate"),
            EventAction::EndIntervention(k) => write!(f, "{}", k.end_event_name()),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub day:    Day,
    /// `None` for population-level events such as intervention expiry.
    pub target: Option<PersonId>,
    pub action: EventAction,
}

impl ScheduledEvent {
    pub fn person(day: Day, target: PersonId, action: EventAction) -> Self {
        Self { day, target: Some(target), action }
    }

    pub fn end_intervention(day: Day, kind: InterventionKind) -> Self {
        Self { day, target: None, action: EventAction::EndIntervention(kind) }
    }
}
