//! `ep-agent` — per-person mutable health state.
//!
//! # Layout
//!
//! | Type              | Role                                                   |
//! |-------------------|--------------------------------------------------------|
//! | [`HealthRecord`]  | fixed-schema record per person (compartment, immunity, |
//! |                   | flags, vaccination and infection metadata)             |
//! | [`StateRegistry`] | per-compartment member lists with O(1) move            |
//! | [`Population`]    | records + registry; the only place a compartment       |
//! |                   | changes, so the two can never disagree                 |
//!
//! Demographics are immutable and live in the contact graph; everything here
//! changes during a run.

pub mod error;
pub mod population;
pub mod record;
pub mod registry;


pub use error::{AgentError, AgentResult};
pub use population::Population;
pub use record::{HealthRecord, Infection, InfectionSource, Vaccination};
pub use registry::StateRegistry;
