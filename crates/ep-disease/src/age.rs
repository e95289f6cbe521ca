//! Age-stratified risk modifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ten-year age bands, with everyone 80 and over in the last band.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum AgeGroup {
    Age0To9,
    Age10To19,
    Age20To29,
    Age30To39,
    Age40To49,
    Age50To59,
    Age60To69,
    Age70To79,
    Age80Plus,
}

impl AgeGroup {
    pub const COUNT: usize = 9;

    pub const ALL: [AgeGroup; AgeGroup::COUNT] = [
        AgeGroup::Age0To9,
        AgeGroup::Age10To19,
        AgeGroup::Age20To29,
        AgeGroup::Age30To39,
        AgeGroup::Age40To49,
        AgeGroup::Age50To59,
        AgeGroup::Age60To69,
        AgeGroup::Age70To79,
        AgeGroup::Age80Plus,
    ];

    pub fn from_age(age: u8) -> Self {
        Self::ALL[(age / 10).min(8) as usize]
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Age0To9   => "0-9",
            AgeGroup::Age10To19 => "10-19",
            AgeGroup::Age20To29 => "20-29",
            AgeGroup::Age30To39 => "30-39",
            AgeGroup::Age40To49 => "40-49",
            AgeGroup::Age50To59 => "50-59",
            AgeGroup::Age60To69 => "60-69",
            AgeGroup::Age70To79 => "70-79",
            AgeGroup::Age80Plus => "80+",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Modifiers for one age band.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct AgeRisk {
    /// Shifts severity mass from mild/asymptomatic toward severe/critical.
    pub severity:        f64,
    pub hospitalization: f64,
    pub mortality:       f64,
    /// Direct multiplier on the probability of being infected.
    pub susceptibility:  f64,
}

const fn risk(severity: f64, hospitalization: f64, mortality: f64, susceptibility: f64) -> AgeRisk {
    AgeRisk { severity, hospitalization, mortality, susceptibility }
}

/// One [`AgeRisk`] per [`AgeGroup`], youngest first.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgeStratification(pub [AgeRisk; AgeGroup::COUNT]);

impl AgeStratification {
    #[inline]
    pub fn for_age(&self, age: u8) -> &AgeRisk {
        &self.0[AgeGroup::from_age(age).index()]
    }

    #[inline]
    pub fn group(&self, group: AgeGroup) -> &AgeRisk {
        &self.0[group.index()]
    }
}

impl Default for AgeStratification {
    fn default() -> Self {
        AgeStratification([
            risk(0.01, 0.005, 0.01, 0.5),
            risk(0.02, 0.01,  0.02, 0.7),
            risk(0.05, 0.02,  0.1,  0.9),
            risk(0.1,  0.03,  0.3,  0.9),
            risk(0.15, 0.05,  0.1,  0.9),
            risk(0.25, 0.08,  0.3,  0.9),
            risk(0.4,  0.15,  0.8,  0.9),
            risk(0.6,  0.25,  0.7,  0.9),
            risk(0.8,  0.35,  0.25, 0.9),
        ])
    }
}
