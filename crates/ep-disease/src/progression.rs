//! The progression sampler: everything about an infection that is decided at
//! the moment of infection.
//!
//! All day fields of a [`Course`] are offsets from the infection day.
//! Draw order is fixed (severity, incubation, infectious period,
//! hospitalisation, death) so a given RNG position always yields the same
//! course.

use ep_core::{SimRng, SymptomClass};
use serde::{Deserialize, Serialize};

use crate::DiseaseParameters;

const MIN_INCUBATION_DAYS: u32 = 1;
const MIN_INFECTIOUS_DAYS: u32 = 3;
const MAX_MORTALITY: f64 = 0.95;

// ── Course ───────────────────────────────────────────────────────────────────

/// How an infection ends.  A course carries exactly one.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerminalOutcome {
    Recover { day: u32 },
    Die { day: u32 },
}

impl TerminalOutcome {
    #[inline]
    pub fn day(self) -> u32 {
        match self {
            TerminalOutcome::Recover { day } | TerminalOutcome::Die { day } => day,
        }
    }

    #[inline]
    pub fn is_fatal(self) -> bool {
        matches!(self, TerminalOutcome::Die { .. })
    }

    fn with_day(self, day: u32) -> Self {
        match self {
            TerminalOutcome::Recover { .. } => TerminalOutcome::Recover { day },
            TerminalOutcome::Die { .. } => TerminalOutcome::Die { day },
        }
    }
}

/// The projected disease course of one infection.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Course {
    pub symptoms:        SymptomClass,
    /// Days from infection to becoming infectious.
    pub incubation_days: u32,
    pub infectious_days: u32,
    /// Day of hospital admission, if any.
    pub hospital_day:    Option<u32>,
    pub outcome:         TerminalOutcome,
}

impl Course {
    /// Terminal day used when a sampled one is unusable.
    #[inline]
    pub fn fallback_day(&self) -> u32 {
        self.incubation_days + self.infectious_days
    }

    /// Enforce course invariants.  Returns the repaired course and whether
    /// anything had to change.
    ///
    /// - The terminal day must come strictly after the incubation period,
    ///   otherwise it becomes [`fallback_day`](Self::fallback_day).
    /// - A hospital day must fall after incubation and no later than the
    ///   terminal day, otherwise the admission is dropped.
    pub fn sanitize(mut self) -> (Course, bool) {
        let mut repaired = false;
        if self.outcome.day() <= self.incubation_days {
            self.outcome = self.outcome.with_day(self.fallback_day());
            repaired = true;
        }
        if let Some(h) = self.hospital_day {
            if h <= self.incubation_days || h > self.outcome.day() {
                self.hospital_day = None;
                repaired = true;
            }
        }
        (self, repaired)
    }
}

// ── Sampler ──────────────────────────────────────────────────────────────────

/// Severity class probabilities after vaccine and age adjustment,
/// `(asymptomatic, mild, severe, critical)`, summing to 1.
pub fn adjusted_severity(
    params:     &DiseaseParameters,
    age:        u8,
    vaccinated: bool,
) -> [f64; 4] {
    let [mut asym, mut mild, mut severe, mut critical] = params.severity_probabilities();

    if vaccinated {
        let ve = params.vaccine.severity;
        critical = (critical * (1.0 - ve)).max(0.0);
        severe   = (severe * (1.0 - 0.7 * ve)).max(0.0);
        mild     = (mild * (1.0 - 0.3 * ve)).max(0.0);
        asym     = (1.0 - (critical + severe + mild)).clamp(0.0, 1.0);
    }

    let s = params.age.for_age(age).severity;
    critical = (critical * (1.0 + 2.0 * s)).min(1.0);
    severe   = (severe * (1.0 + s)).min(1.0);
    mild     = (mild * (1.0 - 0.3 * s)).max(0.0);
    asym     = (1.0 - (critical + severe + mild)).clamp(0.0, 1.0);

    let total = asym + mild + severe + critical;
    if total > 0.0 {
        [asym / total, mild / total, severe / total, critical / total]
    } else {
        [1.0, 0.0, 0.0, 0.0]
    }
}

/// Per-class `(incubation mean ×, infectious mean ×, hospitalisation ×,
/// mortality ×)` multipliers.
fn class_multipliers(class: SymptomClass) -> (f64, f64, f64, f64) {
    match class {
        SymptomClass::Asymptomatic => (0.8, 0.7, 0.0, 0.01),
        SymptomClass::Mild         => (1.0, 0.9, 0.01, 0.1),
        SymptomClass::Severe       => (0.9, 1.2, 0.7, 3.0),
        SymptomClass::Critical     => (0.8, 1.5, 0.9, 10.0),
    }
}

/// Truncate a sampled duration to whole days, floored at `min`.
fn whole_days(x: f64, min: u32) -> u32 {
    if !x.is_finite() || x < min as f64 {
        return min;
    }
    (x.trunc() as u32).max(min)
}

/// Sample the full course of a new infection.
pub fn sample_course(
    age:        u8,
    params:     &DiseaseParameters,
    vaccinated: bool,
    rng:        &mut SimRng,
) -> Course {
    let risk = params.age.for_age(age);

    // ── Severity class ────────────────────────────────────────────────────
    let probs = adjusted_severity(params, age, vaccinated);
    let u: f64 = rng.random();
    let mut cumulative = 0.0;
    let mut symptoms = SymptomClass::Critical;
    for (class, p) in SymptomClass::ALL.iter().zip(probs) {
        cumulative += p;
        if u < cumulative {
            symptoms = *class;
            break;
        }
    }
    let (inc_k, inf_k, hosp_k, mort_k) = class_multipliers(symptoms);

    // ── Durations ─────────────────────────────────────────────────────────
    let incubation_days = whole_days(
        rng.normal(params.incubation.mean * inc_k, params.incubation.std),
        MIN_INCUBATION_DAYS,
    );
    let infectious_days = whole_days(
        rng.normal(params.infectious.mean * inf_k, params.infectious.std),
        MIN_INFECTIOUS_DAYS,
    );

    // ── Hospitalisation (severe / critical only) ─────────────────────────
    let hospital_day = match symptoms {
        SymptomClass::Severe | SymptomClass::Critical
            if rng.gen_bool(hosp_k * risk.hospitalization) =>
        {
            Some(incubation_days + rng.gen_range(1..=3))
        }
        _ => None,
    };

    // ── Death ─────────────────────────────────────────────────────────────
    let mut mortality = risk.mortality * mort_k;
    if vaccinated {
        mortality *= 1.0 - 0.8 * params.vaccine.severity;
    }
    let mortality = mortality.clamp(0.0, MAX_MORTALITY);

    let outcome = if rng.gen_bool(mortality) {
        let day = match hospital_day {
            Some(h) => h + rng.gen_range(3..=14),
            None => incubation_days + rng.gen_range(infectious_days / 2..=infectious_days),
        };
        TerminalOutcome::Die { day }
    } else {
        TerminalOutcome::Recover { day: incubation_days + infectious_days }
    };

    let (course, repaired) = Course {
        symptoms,
        incubation_days,
        infectious_days,
        hospital_day,
        outcome,
    }
    .sanitize();
    if repaired {
        log::warn!("progression sampler produced an inconsistent course; repaired to {course:?}");
    }
    course
}
