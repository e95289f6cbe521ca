//! Contact (edge) attributes.

use std::fmt;
use std::str::FromStr;

use ep_core::PersonId;
use serde::{Deserialize, Serialize};

use crate::GraphError;

/// Where a contact happens.  Drives the per-type transmission multiplier.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    Household,
    Workplace,
    School,
    Hub,
    #[default]
    Random,
    Other,
}

impl ContactKind {
    /// Transmission multiplier for this contact type.
    pub fn transmission_factor(self) -> f64 {
        match self {
            ContactKind::Household => 2.0,
            ContactKind::Hub       => 1.8,
            ContactKind::School    => 1.5,
            ContactKind::Workplace => 1.2,
            ContactKind::Random    => 0.8,
            ContactKind::Other     => 1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ContactKind::Household => "household",
            ContactKind::Workplace => "workplace",
            ContactKind::School    => "school",
            ContactKind::Hub       => "hub",
            ContactKind::Random    => "random",
            ContactKind::Other     => "other",
        }
    }
}

impl fmt::Display for ContactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContactKind {
    type Err = GraphError;

    /// Unrecognised names map to `Other` so foreign graphs still load.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "household" => ContactKind::Household,
            "workplace" | "work" => ContactKind::Workplace,
            "school" => ContactKind::School,
            "hub" => ContactKind::Hub,
            "random" => ContactKind::Random,
            _ => ContactKind::Other,
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Setting {
    #[default]
    Indoor,
    Outdoor,
}

impl FromStr for Setting {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "indoor" => Ok(Setting::Indoor),
            "outdoor" => Ok(Setting::Outdoor),
            other => Err(GraphError::Parse(format!("unknown setting {other:?}"))),
        }
    }
}

/// Attributes supplied when adding a contact.
///
/// ```
/// use ep_graph::{ContactAttrs, ContactKind, Setting};
///
/// let attrs = ContactAttrs::new(ContactKind::Hub).with_weight(0.5).outdoor();
/// assert_eq!(attrs.setting, Setting::Outdoor);
/// ```
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ContactAttrs {
    pub kind:    ContactKind,
    pub weight:  f64,
    pub setting: Setting,
}

impl ContactAttrs {
    pub fn new(kind: ContactKind) -> Self {
        Self { kind, weight: 1.0, setting: Setting::Indoor }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn outdoor(mut self) -> Self {
        self.setting = Setting::Outdoor;
        self
    }
}

impl Default for ContactAttrs {
    fn default() -> Self {
        Self::new(ContactKind::Random)
    }
}

/// One undirected contact.  `a < b` always holds.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Contact {
    pub a:     PersonId,
    pub b:     PersonId,
    pub attrs: ContactAttrs,
}

impl Contact {
    /// The endpoint that is not `p`.
    #[inline]
    pub fn other(&self, p: PersonId) -> PersonId {
        if self.a == p { self.b } else { self.a }
    }
}
