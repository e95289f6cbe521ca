//! `ep-core` — foundational types for the `rust_epi` epidemic engine.
//!
//! This crate is a dependency of every other `ep-*` crate.  It has no `ep-*`
//! dependencies and only a handful of external ones (`rand` + `rand_chacha` +
//! `rand_distr` for randomness, `serde` for persistence, `thiserror`).
//!
//! # What lives here
//!
//! | Module            | Contents                                              |
//! |-------------------|-------------------------------------------------------|
//! | [`ids`]           | `PersonId`, `ContactId`, `HouseholdId`                |
//! | [`time`]          | `Day`, `SimClock`, `SimConfig`                        |
//! | [`rng`]           | `SimRng` (single seeded generator), `RngState`        |
//! | [`compartment`]   | `Compartment`, `SymptomClass`, `CompartmentCounts`    |
//! | [`intervention`]  | `InterventionKind` (names shared by events + engine)  |
//! | [`error`]         | `EpError`, `EpResult`                                 |

pub mod compartment;
pub mod error;
pub mod ids;
pub mod intervention;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use compartment::{Compartment, CompartmentCounts, SymptomClass};
pub use error::{EpError, EpResult};
pub use ids::{ContactId, HouseholdId, PersonId};
pub use intervention::InterventionKind;
pub use rng::{RngState, SimRng};
pub use time::{Day, SimClock, SimConfig};
