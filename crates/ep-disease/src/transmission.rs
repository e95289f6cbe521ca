//! Per-contact transmission probability.
//!
//! ```text
//! p = base · age · mobility · contact · npi · mask · immunity · season
//!       · environment · symptoms          clamped to [0, 0.99]
//! ```
//!
//! Every factor is a standalone `pub fn` so it can be tested in isolation.
//! Only the distancing factor consumes randomness (two compliance rolls,
//! drawn only while distancing is active).

use ep_core::{Day, SimRng, SymptomClass};
use ep_graph::{ContactAttrs, ContactKind, Setting};

use crate::{immunity, DiseaseParameters};

/// Upper bound on any single-contact probability.
pub const MAX_PROBABILITY: f64 = 0.99;

const BASE_SCALE: f64 = 0.08;
const ISOLATION_FACTOR: f64 = 0.1;
const OUTDOOR_FACTOR: f64 = 0.2;
const ASYMPTOMATIC_FACTOR: f64 = 0.3;
const HYGIENE_WEIGHT: f64 = 0.5;

// ── Inputs ───────────────────────────────────────────────────────────────────

/// The transmission-relevant state of one side of a contact.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Party {
    pub age:           u8,
    pub compliance:    f64,
    pub mobility:      f64,
    pub degree:        usize,
    pub isolated:      bool,
    pub wears_mask:    bool,
    pub immunity:      f64,
    pub vaccinated_on: Option<Day>,
    pub symptoms:      Option<SymptomClass>,
}

/// One infector/susceptible pair over one contact on one day.
#[derive(Copy, Clone, Debug)]
pub struct Exposure {
    pub infector:    Party,
    pub susceptible: Party,
    pub contact:     ContactAttrs,
    pub day:         Day,
    /// `day` mapped onto the seasonal year.
    pub day_of_year: u32,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct DistancingMeasure {
    pub effectiveness: f64,
    pub compliance:    f64,
}

/// The parts of the active-intervention map the model reads.
/// `None` means the measure is not active.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Measures {
    pub distancing:       Option<DistancingMeasure>,
    pub travel_reduction: Option<f64>,
    /// Efficacy of an active mask mandate.
    pub mask_efficacy:    Option<f64>,
    pub ventilation:      Option<f64>,
    pub hygiene:          Option<f64>,
}

// ── Factors ──────────────────────────────────────────────────────────────────

/// R0 scaled down by the mean degree of the pair.
pub fn base_rate(r0: f64, degree_a: usize, degree_b: usize) -> f64 {
    let mean_degree = (degree_a + degree_b) as f64 / 2.0;
    r0 * (2.0 / (mean_degree + 2.0)) * BASE_SCALE
}

pub fn age_susceptibility(params: &DiseaseParameters, age: u8) -> f64 {
    params.age.for_age(age).susceptibility
}

pub fn mobility_factor(infector: f64, susceptible: f64) -> f64 {
    (infector + susceptible) / 2.0
}

pub fn contact_factor(contact: &ContactAttrs) -> f64 {
    contact.kind.transmission_factor() * contact.weight
}

/// Distancing, isolation and travel restriction.
pub fn npi_factor(exposure: &Exposure, measures: &Measures, rng: &mut SimRng) -> f64 {
    let mut factor = 1.0;
    if let Some(d) = measures.distancing {
        let infector_complies = rng.random::<f64>() < exposure.infector.compliance;
        let susceptible_complies = rng.random::<f64>() < exposure.susceptible.compliance;
        if infector_complies && susceptible_complies {
            factor *= 1.0 - d.effectiveness * d.compliance;
        }
    }
    if exposure.infector.isolated || exposure.susceptible.isolated {
        factor *= ISOLATION_FACTOR;
    }
    if let Some(reduction) = measures.travel_reduction {
        if exposure.contact.kind == ContactKind::Random {
            factor *= 1.0 - reduction;
        }
    }
    factor
}

/// Mask protection; 1 unless a mandate is active.
pub fn mask_factor(infector_masked: bool, susceptible_masked: bool, measures: &Measures) -> f64 {
    let Some(e) = measures.mask_efficacy else {
        return 1.0;
    };
    match (infector_masked, susceptible_masked) {
        (true, true) => (1.0 - e) * (1.0 - 0.7 * e),
        (true, false) | (false, true) => 1.0 - 0.3 * e,
        (false, false) => 1.0,
    }
}

/// `1 − max(immunity, waned vaccine efficacy)` for the susceptible party.
pub fn immunity_factor(params: &DiseaseParameters, susceptible: &Party, day: Day) -> f64 {
    let vaccine = susceptible
        .vaccinated_on
        .map(|on| immunity::vaccine_infection_efficacy(&params.vaccine, day.since(on)))
        .unwrap_or(0.0);
    (1.0 - susceptible.immunity.max(vaccine)).clamp(0.0, 1.0)
}

pub fn seasonality_factor(params: &DiseaseParameters, day_of_year: u32) -> f64 {
    if params.seasonality_amplitude == 0.0 {
        return 1.0;
    }
    let radians = 2.0 * std::f64::consts::PI
        * (day_of_year as f64 - params.seasonality_peak as f64)
        / 365.0;
    1.0 + params.seasonality_amplitude * radians.cos()
}

/// Ventilation, hygiene and the outdoor discount.
pub fn environment_factor(contact: &ContactAttrs, measures: &Measures) -> f64 {
    let mut factor = 1.0;
    if let Some(improvement) = measures.ventilation {
        factor *= 1.0 - improvement;
    }
    if let Some(improvement) = measures.hygiene {
        factor *= 1.0 - HYGIENE_WEIGHT * improvement;
    }
    if contact.setting == Setting::Outdoor {
        factor *= OUTDOOR_FACTOR;
    }
    factor
}

pub fn symptom_factor(infector_symptoms: Option<SymptomClass>) -> f64 {
    match infector_symptoms {
        Some(SymptomClass::Asymptomatic) => ASYMPTOMATIC_FACTOR,
        _ => 1.0,
    }
}

// ── Composition ──────────────────────────────────────────────────────────────

/// Probability that `exposure.infector` infects `exposure.susceptible`
/// today.  Always within `[0, MAX_PROBABILITY]`; NaN inputs yield 0.
pub fn probability(
    exposure: &Exposure,
    measures: &Measures,
    params:   &DiseaseParameters,
    rng:      &mut SimRng,
) -> f64 {
    let inf = &exposure.infector;
    let sus = &exposure.susceptible;

    let p = base_rate(params.r0, inf.degree, sus.degree)
        * age_susceptibility(params, sus.age)
        * mobility_factor(inf.mobility, sus.mobility)
        * contact_factor(&exposure.contact)
        * npi_factor(exposure, measures, rng)
        * mask_factor(inf.wears_mask, sus.wears_mask, measures)
        * immunity_factor(params, sus, exposure.day)
        * seasonality_factor(params, exposure.day_of_year)
        * environment_factor(&exposure.contact, measures)
        * symptom_factor(inf.symptoms);

    if p.is_nan() { 0.0 } else { p.clamp(0.0, MAX_PROBABILITY) }
}
