//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use ep_intervention::ApplyReport;
use ep_sim::{Checkpoint, DailyRecord, SimObserver, SummaryStats};

use crate::row::{DailyRow, InterventionRow, NodeStateRow, SummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes daily records, checkpoint node states,
/// intervention reports and the summary to any [`OutputWriter`].
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After the run returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer.  Only needed after [`Sim::run`](ep_sim::Sim::run);
    /// `run_to_end` finishes the writer itself.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.writer.finish()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            log::warn!("output write failed: {e}");
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_checkpoint(&mut self, checkpoint: &Checkpoint) {
        let rows = NodeStateRow::from_checkpoint(checkpoint);
        if !rows.is_empty() {
            let result = self.writer.write_node_states(&rows);
            self.store_err(result);
        }
    }

    fn on_intervention(&mut self, report: &ApplyReport) {
        let result = self.writer.write_intervention(&InterventionRow::from(report));
        self.store_err(result);
    }

    fn on_day_end(&mut self, record: &DailyRecord) {
        let result = self.writer.write_daily(&DailyRow::from(record));
        self.store_err(result);
    }

    fn on_sim_end(&mut self, summary: &SummaryStats) {
        let result = self.writer.write_summary(&SummaryRow::from_summary(summary));
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
