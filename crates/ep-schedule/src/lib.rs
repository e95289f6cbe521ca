//! `ep-schedule` — the future-event queue that drives disease transitions.
//!
//! # Crate layout
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`event`]   | `EventAction`, `ScheduledEvent`                       |
//! | [`queue`]   | `EventQueue` (binary heap keyed by trigger day)       |
//! | [`error`]   | `ScheduleError`, `ScheduleResult<T>`                  |
//!
//! # Ordering
//!
//! Events pop in ascending `(day, rank, insertion)` order.  The rank puts
//! becoming infectious before hospitalisation, hospitalisation before the
//! terminal event, and person events before intervention expiries, so a
//! course whose events land on the same day still replays in causal order.

pub mod error;
pub mod event;
pub mod queue;


pub use error::{ScheduleError, ScheduleResult};
pub use event::{EventAction, ScheduledEvent};
pub use queue::EventQueue;
