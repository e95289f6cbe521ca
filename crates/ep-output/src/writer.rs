//! The `OutputWriter` trait implemented by output backends.

use crate::{DailyRow, InterventionRow, NodeStateRow, OutputResult, SummaryRow};

/// Trait implemented by output backends.
///
/// The observer never sees these errors directly; they are stored and
/// retrieved with [`SimOutputObserver::take_error`](crate::SimOutputObserver::take_error).
pub trait OutputWriter {
    /// Write one day of the history.
    fn write_daily(&mut self, row: &DailyRow) -> OutputResult<()>;

    /// Write every person's compartment at a checkpoint.
    fn write_node_states(&mut self, rows: &[NodeStateRow]) -> OutputResult<()>;

    /// Write one applied, advanced or ended intervention.
    fn write_intervention(&mut self, row: &InterventionRow) -> OutputResult<()>;

    /// Write the end-of-run summary.
    fn write_summary(&mut self, rows: &[SummaryRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
