//! Intervention names.
//!
//! The kind is the key of the active-intervention map and the payload of
//! `end_<name>` events, so it lives here where both the scheduler and the
//! intervention engine can see it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::EpError;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionKind {
    Lockdown,
    SocialDistancing,
    MaskMandate,
    Vaccination,
    Testing,
    Isolation,
    TravelRestrictions,
    Hygiene,
    Ventilation,
    Reopen,
}

impl InterventionKind {
    pub const ALL: [InterventionKind; 10] = [
        InterventionKind::Lockdown,
        InterventionKind::SocialDistancing,
        InterventionKind::MaskMandate,
        InterventionKind::Vaccination,
        InterventionKind::Testing,
        InterventionKind::Isolation,
        InterventionKind::TravelRestrictions,
        InterventionKind::Hygiene,
        InterventionKind::Ventilation,
        InterventionKind::Reopen,
    ];

    /// Canonical command name, e.g. `"social_distancing"`.
    pub fn name(self) -> &'static str {
        match self {
            InterventionKind::Lockdown           => "lockdown",
            InterventionKind::SocialDistancing   => "social_distancing",
            InterventionKind::MaskMandate        => "mask_mandate",
            InterventionKind::Vaccination        => "vaccination",
            InterventionKind::Testing            => "testing",
            InterventionKind::Isolation          => "isolation",
            InterventionKind::TravelRestrictions => "travel_restrictions",
            InterventionKind::Hygiene            => "hygiene",
            InterventionKind::Ventilation        => "ventilation",
            InterventionKind::Reopen             => "reopen",
        }
    }

    /// Name of the event that ends this intervention, e.g. `"end_lockdown"`.
    pub fn end_event_name(self) -> String {
        format!("end_{}", self.name())
    }

    /// Parse an `end_<name>` event name.
    pub fn from_end_event(s: &str) -> Option<Self> {
        s.strip_prefix("end_").and_then(|n| n.parse().ok())
    }
}

impl fmt::Display for InterventionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InterventionKind {
    type Err = EpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        InterventionKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| EpError::UnknownIntervention(s.to_owned()))
    }
}
