//! Simulation observer trait for progress reporting and data collection.

use ep_core::Day;
use ep_intervention::ApplyReport;

use crate::{Checkpoint, DailyRecord, SummaryStats};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// daily loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u32 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_day_end(&mut self, record: &DailyRecord) {
///         if record.day.0 % self.interval == 0 {
///             println!("{}: {} infectious", record.day, record.counts.infectious());
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each day, before any processing.
    fn on_day_start(&mut self, _day: Day) {}

    /// Called when a checkpoint is taken.
    fn on_checkpoint(&mut self, _checkpoint: &Checkpoint) {}

    /// Called for every intervention applied, ended, or advanced during the
    /// day.
    fn on_intervention(&mut self, _report: &ApplyReport) {}

    /// Called once the day's record has been appended to the history.
    fn on_day_end(&mut self, _record: &DailyRecord) {}

    /// Called once when [`Sim::run_to_end`][crate::Sim::run_to_end] finishes.
    fn on_sim_end(&mut self, _summary: &SummaryStats) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
