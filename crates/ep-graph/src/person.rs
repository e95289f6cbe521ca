//! Immutable per-person attributes.

use std::fmt;
use std::str::FromStr;

use ep_core::HouseholdId;
use serde::{Deserialize, Serialize};

use crate::{GraphError, GraphResult};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupation {
    Student,
    #[default]
    Worker,
    Unemployed,
    Retired,
    Essential,
}

impl Occupation {
    pub fn name(self) -> &'static str {
        match self {
            Occupation::Student    => "student",
            Occupation::Worker     => "worker",
            Occupation::Unemployed => "unemployed",
            Occupation::Retired    => "retired",
            Occupation::Essential  => "essential",
        }
    }
}

impl fmt::Display for Occupation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Occupation {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student"    => Ok(Occupation::Student),
            "worker"     => Ok(Occupation::Worker),
            "unemployed" => Ok(Occupation::Unemployed),
            "retired"    => Ok(Occupation::Retired),
            "essential"  => Ok(Occupation::Essential),
            other        => Err(GraphError::Parse(format!("unknown occupation {other:?}"))),
        }
    }
}

/// Demographic attributes of one individual.
///
/// `mobility`, `compliance` and `health_risk` are probabilities or scale
/// factors in [0, 1]; [`Demographics::validate`] enforces that.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub age:              u8,
    pub occupation:       Occupation,
    /// Baseline mobility; the engine's current mobility starts here.
    pub mobility:         f64,
    /// Probability of following a measure when asked.
    pub compliance:       f64,
    pub health_risk:      f64,
    pub essential_worker: bool,
    pub household:        HouseholdId,
}

impl Default for Demographics {
    fn default() -> Self {
        Self {
            age:              35,
            occupation:       Occupation::Worker,
            mobility:         0.5,
            compliance:       0.5,
            health_risk:      0.1,
            essential_worker: false,
            household:        HouseholdId::INVALID,
        }
    }
}

impl Demographics {
    /// Default attributes with the given age.
    pub fn with_age(age: u8) -> Self {
        Self { age, ..Self::default() }
    }

    pub fn validate(&self) -> GraphResult<()> {
        for (what, value) in [
            ("mobility", self.mobility),
            ("compliance", self.compliance),
            ("health_risk", self.health_risk),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GraphError::OutOfUnitRange { what, value });
            }
        }
        Ok(())
    }
}
