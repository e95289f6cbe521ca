//! `ep-output` — simulation output writers for rust_epi.
//!
//! | Writer        | Files created                                                       |
//! |---------------|---------------------------------------------------------------------|
//! | [`CsvWriter`] | `daily_history.csv`, `node_states.csv`, `interventions.csv`, `summary.csv` |
//! | [`json`]      | any path: history, infection trees, other serde values              |
//!
//! Writers implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `ep_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ep_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run_to_end(&mut obs);
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod json;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{DailyRow, InterventionRow, NodeStateRow, SummaryRow};
pub use writer::OutputWriter;
