//! `DiseaseParameters` — the validated pathogen description.
//!
//! Construct via [`DiseaseParameters::default`] (COVID-19 wildtype), a
//! [`library`](crate::library) preset, or JSON through
//! [`DiseaseParameters::from_json_str`].  Every constructor that accepts
//! external input validates before returning, so an engine never sees
//! severity probabilities that do not sum to 1 or an out-of-range R0.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{AgeStratification, DiseaseError, DiseaseResult};

/// Tolerance on the severity-probability sum.
const SEVERITY_SUM_TOLERANCE: f64 = 0.01;

// ── PeriodDist ───────────────────────────────────────────────────────────────

/// Normal distribution of a period length in days.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct PeriodDist {
    pub mean: f64,
    pub std:  f64,
}

impl PeriodDist {
    pub const fn new(mean: f64, std: f64) -> Self {
        Self { mean, std }
    }

    fn validate(&self, what: &'static str) -> DiseaseResult<()> {
        if !(self.mean.is_finite() && self.mean > 0.0 && self.std.is_finite() && self.std >= 0.0) {
            return Err(DiseaseError::InvalidPeriod { what, mean: self.mean, std: self.std });
        }
        Ok(())
    }
}

// ── Vaccine ──────────────────────────────────────────────────────────────────

/// Shape of vaccine-efficacy waning after `waning_start_days`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaningCurve {
    /// Lost fraction after `d` waned days = `min(1, rate · d)`.
    Linear,
    /// Lost fraction after `d` waned days = `1 − (1 − rate)^d`.
    #[default]
    Exponential,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct VaccineProfile {
    /// Protection against infection.
    pub infection:         f64,
    /// Protection against severe disease and death.
    pub severity:          f64,
    /// Days after vaccination before efficacy starts to wane.
    pub waning_start_days: u32,
    /// Daily waning rate past `waning_start_days`.
    pub waning_rate:       f64,
    pub waning_curve:      WaningCurve,
    /// Immunity level set on a successful dose.
    pub initial_immunity:  f64,
}

impl Default for VaccineProfile {
    fn default() -> Self {
        Self {
            infection:         0.7,
            severity:          0.8,
            waning_start_days: 120,
            waning_rate:       0.003,
            waning_curve:      WaningCurve::Exponential,
            initial_immunity:  0.95,
        }
    }
}

// ── DiseaseParameters ────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DiseaseParameters {
    pub name:                  String,
    /// Basic reproduction number, in [0, 20].
    pub r0:                    f64,
    /// Mean days between successive infections in a chain.
    pub generation_time:       f64,
    pub incubation:            PeriodDist,
    pub infectious:            PeriodDist,

    pub p_asymptomatic:        f64,
    pub p_mild:                f64,
    pub p_severe:              f64,
    pub p_critical:            f64,

    /// Population-level rates.  Informational: per-case outcomes come from
    /// the age table and the severity class.
    pub hospitalization_rate:  f64,
    pub icu_rate:              f64,
    pub mortality_rate:        f64,

    pub age:                   AgeStratification,

    /// Mask efficacy used when a mask mandate does not name its own.
    pub mask_efficacy:         f64,

    pub vaccine:               VaccineProfile,

    /// Seasonal modulation amplitude in [0, 1]; 0 disables seasonality.
    pub seasonality_amplitude: f64,
    /// Day of year of peak transmission.
    pub seasonality_peak:      u32,
}

impl Default for DiseaseParameters {
    fn default() -> Self {
        Self {
            name:                  "COVID-19 (Wildtype)".into(),
            r0:                    2.5,
            generation_time:       5.2,
            incubation:            PeriodDist::new(5.2, 2.8),
            infectious:            PeriodDist::new(10.0, 3.0),
            p_asymptomatic:        0.4,
            p_mild:                0.4,
            p_severe:              0.15,
            p_critical:            0.05,
            hospitalization_rate:  0.15,
            icu_rate:              0.05,
            mortality_rate:        0.02,
            age:                   AgeStratification::default(),
            mask_efficacy:         0.3,
            vaccine:               VaccineProfile::default(),
            seasonality_amplitude: 0.0,
            seasonality_peak:      0,
        }
    }
}

impl DiseaseParameters {
    /// `(asymptomatic, mild, severe, critical)` base probabilities.
    pub fn severity_probabilities(&self) -> [f64; 4] {
        [self.p_asymptomatic, self.p_mild, self.p_severe, self.p_critical]
    }

    pub fn validate(&self) -> DiseaseResult<()> {
        if !(0.0..=20.0).contains(&self.r0) {
            return Err(DiseaseError::R0OutOfRange(self.r0));
        }
        self.incubation.validate("incubation")?;
        self.infectious.validate("infectious")?;

        let unit = |what: &str, value: f64| -> DiseaseResult<()> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(DiseaseError::ProbabilityOutOfRange { what: what.to_owned(), value })
            }
        };

        unit("p_asymptomatic", self.p_asymptomatic)?;
        unit("p_mild", self.p_mild)?;
        unit("p_severe", self.p_severe)?;
        unit("p_critical", self.p_critical)?;
        let sum: f64 = self.severity_probabilities().iter().sum();
        if (sum - 1.0).abs() > SEVERITY_SUM_TOLERANCE {
            return Err(DiseaseError::SeverityNotNormalised(sum));
        }

        unit("hospitalization_rate", self.hospitalization_rate)?;
        unit("icu_rate", self.icu_rate)?;
        unit("mortality_rate", self.mortality_rate)?;
        unit("mask_efficacy", self.mask_efficacy)?;
        unit("vaccine.infection", self.vaccine.infection)?;
        unit("vaccine.severity", self.vaccine.severity)?;
        unit("vaccine.waning_rate", self.vaccine.waning_rate)?;
        unit("vaccine.initial_immunity", self.vaccine.initial_immunity)?;
        unit("seasonality_amplitude", self.seasonality_amplitude)?;
        if self.seasonality_peak >= 365 {
            return Err(DiseaseError::SeasonalityPeak(self.seasonality_peak));
        }

        for group in crate::AgeGroup::ALL {
            let r = self.age.group(group);
            unit(&format!("age[{group}].severity"), r.severity)?;
            unit(&format!("age[{group}].hospitalization"), r.hospitalization)?;
            unit(&format!("age[{group}].mortality"), r.mortality)?;
            unit(&format!("age[{group}].susceptibility"), r.susceptibility)?;
        }
        Ok(())
    }

    /// Parse and validate a JSON document.  Missing fields take the
    /// wildtype defaults.
    pub fn from_json_str(json: &str) -> DiseaseResult<Self> {
        let params: DiseaseParameters = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_file(path: &Path) -> DiseaseResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Return a copy with a different R0, validated.
    pub fn with_r0(mut self, r0: f64) -> DiseaseResult<Self> {
        self.r0 = r0;
        self.validate()?;
        Ok(self)
    }
}
