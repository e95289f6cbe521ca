//! Immunity waning.

use crate::{VaccineProfile, WaningCurve};

/// Fraction of protection lost after `waned_days` days of waning.
pub fn waning_fraction(curve: WaningCurve, rate: f64, waned_days: u32) -> f64 {
    let d = waned_days as f64;
    match curve {
        WaningCurve::Linear => (rate * d).min(1.0),
        WaningCurve::Exponential => 1.0 - (1.0 - rate).powf(d),
    }
    .clamp(0.0, 1.0)
}

/// Vaccine protection against infection `days_since` days after the dose.
pub fn vaccine_infection_efficacy(vaccine: &VaccineProfile, days_since: u32) -> f64 {
    let waned = days_since.saturating_sub(vaccine.waning_start_days);
    vaccine.infection * (1.0 - waning_fraction(vaccine.waning_curve, vaccine.waning_rate, waned))
}

/// Immunity level of a vaccinated person `days_since` days after a
/// successful dose: flat at `initial_immunity`, then linear decay.
pub fn vaccine_immunity(vaccine: &VaccineProfile, days_since: u32) -> f64 {
    let waned = days_since.saturating_sub(vaccine.waning_start_days) as f64;
    (vaccine.initial_immunity - vaccine.waning_rate * waned).max(0.0)
}

/// One day of natural-immunity waning at `annual_rate` loss per year.
pub fn natural_waning_step(immunity: f64, annual_rate: f64) -> f64 {
    (immunity * (1.0 - annual_rate).powf(1.0 / 365.0)).clamp(0.0, 1.0)
}
