//! Named disease presets.

use crate::{DiseaseError, DiseaseParameters, DiseaseResult, PeriodDist};

/// Preset names accepted by [`preset`].
pub const PRESET_NAMES: [&str; 8] = [
    "covid19",
    "covid19_alpha",
    "covid19_delta",
    "covid19_omicron",
    "influenza",
    "measles",
    "ebola",
    "sars",
];

/// Look up a preset by name (see [`PRESET_NAMES`]).
pub fn preset(name: &str) -> DiseaseResult<DiseaseParameters> {
    match name.trim().to_ascii_lowercase().as_str() {
        "covid19" | "covid19_wildtype" | "wildtype" => Ok(covid19_variant("wildtype")),
        "covid19_alpha" | "alpha" => Ok(covid19_variant("alpha")),
        "covid19_delta" | "delta" => Ok(covid19_variant("delta")),
        "covid19_omicron" | "omicron" => Ok(covid19_variant("omicron")),
        "influenza" | "flu" => Ok(influenza()),
        "measles" => Ok(measles()),
        "ebola" => Ok(ebola()),
        "sars" => Ok(sars()),
        other => Err(DiseaseError::UnknownPreset(other.to_owned())),
    }
}

/// COVID-19 by variant; unknown variants fall back to wildtype.
pub fn covid19_variant(variant: &str) -> DiseaseParameters {
    let base = DiseaseParameters::default();
    match variant {
        "alpha" => DiseaseParameters {
            name:                 "COVID-19 (Alpha)".into(),
            r0:                   4.0,
            p_asymptomatic:       0.3,
            p_mild:               0.45,
            p_severe:             0.18,
            p_critical:           0.07,
            mortality_rate:       0.025,
            hospitalization_rate: 0.18,
            ..base
        },
        "delta" => DiseaseParameters {
            name:                 "COVID-19 (Delta)".into(),
            r0:                   5.0,
            p_asymptomatic:       0.25,
            p_mild:               0.45,
            p_severe:             0.22,
            p_critical:           0.08,
            mortality_rate:       0.03,
            hospitalization_rate: 0.22,
            ..base
        },
        "omicron" => DiseaseParameters {
            name:                 "COVID-19 (Omicron)".into(),
            r0:                   9.5,
            p_asymptomatic:       0.35,
            p_mild:               0.5,
            p_severe:             0.12,
            p_critical:           0.03,
            mortality_rate:       0.01,
            hospitalization_rate: 0.08,
            ..base
        },
        _ => base,
    }
}

pub fn influenza() -> DiseaseParameters {
    DiseaseParameters {
        name:                  "Influenza (Seasonal)".into(),
        r0:                    1.3,
        generation_time:       3.0,
        incubation:            PeriodDist::new(2.0, 0.5),
        infectious:            PeriodDist::new(5.0, 1.0),
        p_asymptomatic:        0.2,
        p_mild:                0.6,
        p_severe:              0.15,
        p_critical:            0.05,
        hospitalization_rate:  0.02,
        mortality_rate:        0.001,
        seasonality_amplitude: 0.3,
        seasonality_peak:      45,
        ..DiseaseParameters::default()
    }
}

pub fn measles() -> DiseaseParameters {
    DiseaseParameters {
        name:                 "Measles".into(),
        r0:                   15.0,
        generation_time:      12.0,
        incubation:           PeriodDist::new(10.0, 2.0),
        infectious:           PeriodDist::new(8.0, 1.0),
        p_asymptomatic:       0.05,
        p_mild:               0.1,
        p_severe:             0.5,
        p_critical:           0.35,
        hospitalization_rate: 0.3,
        mortality_rate:       0.002,
        mask_efficacy:        0.2,
        ..DiseaseParameters::default()
    }
}

pub fn ebola() -> DiseaseParameters {
    DiseaseParameters {
        name:                 "Ebola".into(),
        r0:                   1.8,
        generation_time:      15.0,
        incubation:           PeriodDist::new(10.0, 4.0),
        infectious:           PeriodDist::new(15.0, 5.0),
        p_asymptomatic:       0.01,
        p_mild:               0.1,
        p_severe:             0.4,
        p_critical:           0.49,
        hospitalization_rate: 0.7,
        mortality_rate:       0.5,
        mask_efficacy:        0.8,
        ..DiseaseParameters::default()
    }
}

pub fn sars() -> DiseaseParameters {
    DiseaseParameters {
        name:                 "SARS".into(),
        r0:                   3.0,
        p_asymptomatic:       0.01,
        p_mild:               0.09,
        p_severe:             0.4,
        p_critical:           0.5,
        mortality_rate:       0.095,
        hospitalization_rate: 0.9,
        ..DiseaseParameters::default()
    }
}
