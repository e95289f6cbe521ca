//! `ep-sim` — the daily loop that drives an epidemic through a contact graph.
//!
//! # Daily loop
//!
//! ```text
//! for day in start..end:
//!   ⓪ Checkpoint    — every `checkpoint_interval` days, snapshot every
//!                      person's compartment as of the start of the day.
//!   ① Events        — pop due events: become infectious, hospitalize,
//!                      recover, die, isolate, end an intervention.
//!   ② Interventions — daily work of running interventions, then fire due
//!                      triggers from the plan in order.
//!   ③ Transmission  — every infectious person tries each active contact
//!                      with a susceptible neighbour; infections take
//!                      effect immediately.
//!   ④ Aging         — days-in-state += 1 for everyone.
//!   ⑤ Immunity      — natural and vaccine immunity wane.
//!   ⑥ Record        — append a DailyRecord; update running statistics.
//! ```
//!
//! Every random draw comes from the engine's single [`SimRng`], in an
//! order fixed by ascending person id.  Two engines built from the same
//! graph, parameters, plan and seed produce identical histories.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs [`run_ensemble`] members on Rayon's thread pool.  |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ep_disease::library;
//! use ep_intervention::Scenario;
//! use ep_sim::{NoopObserver, SeedMethod, SimBuilder};
//!
//! let mut sim = SimBuilder::new(graph, library::covid19_variant("delta"))
//!     .scenario(Scenario::RapidResponse)
//!     .seed(7)
//!     .build()?;
//! sim.seed_infections(10, &SeedMethod::Random);
//! let summary = sim.run_to_end(&mut NoopObserver);
//! println!("attack rate {:.1}%", summary.attack_rate * 100.0);
//! ```
//!
//! [`SimRng`]: ep_core::SimRng

pub mod builder;
pub mod checkpoint;
pub mod ensemble;
pub mod error;
pub mod history;
pub mod observer;
pub mod seeding;
pub mod sim;
pub mod snapshot;
pub mod stats;
pub mod tree;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use checkpoint::{Checkpoint, CheckpointStore};
pub use ensemble::{ensemble_seeds, run_ensemble};
pub use error::{SimError, SimResult};
pub use history::{DailyRecord, History};
pub use observer::{NoopObserver, SimObserver};
pub use seeding::SeedMethod;
pub use sim::{EventOutcome, InfectOutcome, Sim, SimStatus};
pub use snapshot::{SimSnapshot, SNAPSHOT_VERSION};
pub use stats::{RunStats, SummaryStats};
pub use tree::{InfectionTree, TreeNode};
