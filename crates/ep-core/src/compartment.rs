//! Disease compartments and symptom classes.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::EpError;

// ── Compartment ──────────────────────────────────────────────────────────────

/// The disease state of one individual.  Every individual is in exactly one.
///
/// `I` is the generic infectious state; the engine always knows the symptom
/// class at infection time and uses the specific subtypes, but `I` is kept so
/// externally supplied snapshots using it remain representable.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[derive(Serialize, Deserialize)]
pub enum Compartment {
    #[default]
    S,
    E,
    I,
    Ia,
    Im,
    Is,
    Ih,
    Ic,
    R,
    D,
    V,
}

impl Compartment {
    pub const COUNT: usize = 11;

    /// All compartments in canonical (column) order.
    pub const ALL: [Compartment; Compartment::COUNT] = [
        Compartment::S,
        Compartment::E,
        Compartment::I,
        Compartment::Ia,
        Compartment::Im,
        Compartment::Is,
        Compartment::Ih,
        Compartment::Ic,
        Compartment::R,
        Compartment::D,
        Compartment::V,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short code, e.g. `"Ih"`.
    pub fn code(self) -> &'static str {
        match self {
            Compartment::S  => "S",
            Compartment::E  => "E",
            Compartment::I  => "I",
            Compartment::Ia => "Ia",
            Compartment::Im => "Im",
            Compartment::Is => "Is",
            Compartment::Ih => "Ih",
            Compartment::Ic => "Ic",
            Compartment::R  => "R",
            Compartment::D  => "D",
            Compartment::V  => "V",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Compartment::S  => "Susceptible",
            Compartment::E  => "Exposed",
            Compartment::I  => "Infectious",
            Compartment::Ia => "Asymptomatic",
            Compartment::Im => "Mild",
            Compartment::Is => "Severe",
            Compartment::Ih => "Hospitalized",
            Compartment::Ic => "Critical",
            Compartment::R  => "Recovered",
            Compartment::D  => "Deceased",
            Compartment::V  => "Vaccinated",
        }
    }

    /// Can infect others.
    #[inline]
    pub fn is_infectious(self) -> bool {
        matches!(
            self,
            Compartment::I
                | Compartment::Ia
                | Compartment::Im
                | Compartment::Is
                | Compartment::Ih
                | Compartment::Ic
        )
    }

    /// Exposed or infectious: an infection is in progress.
    #[inline]
    pub fn is_active_infection(self) -> bool {
        self == Compartment::E || self.is_infectious()
    }

    /// Symptomatic infectious states targeted by case isolation.
    #[inline]
    pub fn is_symptomatic(self) -> bool {
        matches!(self, Compartment::Im | Compartment::Is | Compartment::Ih)
    }

    /// Recovered and deceased never leave their compartment within one
    /// infection course.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Compartment::R | Compartment::D)
    }
}

impl fmt::Display for Compartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Compartment {
    type Err = EpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Compartment::ALL
            .iter()
            .copied()
            .find(|c| c.code() == s.trim() || c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EpError::Parse(format!("unknown compartment {s:?}")))
    }
}

// ── SymptomClass ─────────────────────────────────────────────────────────────

/// Severity class fixed when an infection course is sampled.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymptomClass {
    Asymptomatic,
    Mild,
    Severe,
    Critical,
}

impl SymptomClass {
    pub const ALL: [SymptomClass; 4] = [
        SymptomClass::Asymptomatic,
        SymptomClass::Mild,
        SymptomClass::Severe,
        SymptomClass::Critical,
    ];

    /// The compartment entered when the exposed period ends.
    pub fn infectious_compartment(self) -> Compartment {
        match self {
            SymptomClass::Asymptomatic => Compartment::Ia,
            SymptomClass::Mild         => Compartment::Im,
            SymptomClass::Severe       => Compartment::Is,
            SymptomClass::Critical     => Compartment::Ic,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SymptomClass::Asymptomatic => "asymptomatic",
            SymptomClass::Mild         => "mild",
            SymptomClass::Severe       => "severe",
            SymptomClass::Critical     => "critical",
        }
    }
}

impl fmt::Display for SymptomClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── CompartmentCounts ────────────────────────────────────────────────────────

/// Number of individuals per compartment, indexable by [`Compartment`].
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompartmentCounts(pub [usize; Compartment::COUNT]);

impl CompartmentCounts {
    /// Everyone accounted for.
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Sum over every infectious subtype.
    pub fn infectious(&self) -> usize {
        Compartment::ALL
            .iter()
            .filter(|c| c.is_infectious())
            .map(|&c| self[c])
            .sum()
    }

    /// Exposed plus infectious.
    pub fn active_infections(&self) -> usize {
        self[Compartment::E] + self.infectious()
    }

    /// Occupied hospital beds (hospitalised plus critical).
    pub fn hospital_beds(&self) -> usize {
        self[Compartment::Ih] + self[Compartment::Ic]
    }

    /// `(compartment, count)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Compartment, usize)> + '_ {
        Compartment::ALL.iter().map(|&c| (c, self[c]))
    }
}

impl Index<Compartment> for CompartmentCounts {
    type Output = usize;
    #[inline]
    fn index(&self, c: Compartment) -> &usize {
        &self.0[c.index()]
    }
}

impl IndexMut<Compartment> for CompartmentCounts {
    #[inline]
    fn index_mut(&mut self, c: Compartment) -> &mut usize {
        &mut self.0[c.index()]
    }
}
