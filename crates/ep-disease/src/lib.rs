//! `ep-disease` — everything that depends on the pathogen rather than on the
//! population.
//!
//! | Module             | Contents                                              |
//! |--------------------|-------------------------------------------------------|
//! | [`params`]         | `DiseaseParameters` (validated), vaccine profile      |
//! | [`age`]            | nine-band age stratification                          |
//! | [`library`]        | named presets (COVID-19 variants, influenza, …)       |
//! | [`progression`]    | `sample_course` → `Course` with one terminal outcome  |
//! | [`transmission`]   | per-contact infection probability, factor by factor   |
//! | [`immunity`]       | natural and vaccine-derived waning                    |
//!
//! The progression sampler and the transmission model are free functions over
//! plain data plus the engine's [`SimRng`](ep_core::SimRng); neither holds
//! state between calls.

pub mod age;
pub mod error;
pub mod immunity;
pub mod library;
pub mod params;
pub mod progression;
pub mod transmission;

#[cfg(test)]
mod tests;

pub use age::{AgeGroup, AgeRisk, AgeStratification};
pub use error::{DiseaseError, DiseaseResult};
pub use params::{DiseaseParameters, PeriodDist, VaccineProfile, WaningCurve};
pub use progression::{sample_course, Course, TerminalOutcome};
pub use transmission::{probability, DistancingMeasure, Exposure, Measures, Party};
