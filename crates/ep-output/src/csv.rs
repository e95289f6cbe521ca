//! CSV output backend.
//!
//! Creates four files in the configured output directory:
//! - `daily_history.csv`: one row per day; active interventions as names
//!   and as a JSON array carrying their parameters
//! - `node_states.csv`: `day,person,compartment` per checkpoint
//! - `interventions.csv`: one row per intervention report
//! - `summary.csv`: `metric,value` at the end of the run

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::row::compartment_headers;
use crate::writer::OutputWriter;
use crate::{DailyRow, InterventionRow, NodeStateRow, OutputResult, SummaryRow};

pub struct CsvWriter {
    daily:         Writer<File>,
    node_states:   Writer<File>,
    interventions: Writer<File>,
    summary:       Writer<File>,
    finished:      bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the four CSV files, and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut daily = Writer::from_path(dir.join("daily_history.csv"))?;
        let mut header: Vec<&str> = vec!["day"];
        header.extend(compartment_headers());
        header.extend([
            "new_infections",
            "hospital_beds",
            "r_eff",
            "interventions",
            "intervention_params",
        ]);
        daily.write_record(&header)?;

        let mut node_states = Writer::from_path(dir.join("node_states.csv"))?;
        node_states.write_record(["day", "person", "compartment"])?;

        let mut interventions = Writer::from_path(dir.join("interventions.csv"))?;
        interventions.write_record([
            "day",
            "intervention",
            "people_affected",
            "doses",
            "vaccinated",
            "contacts_changed",
            "events_scheduled",
        ])?;

        let mut summary = Writer::from_path(dir.join("summary.csv"))?;
        summary.write_record(["metric", "value"])?;

        Ok(Self { daily, node_states, interventions, summary, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_daily(&mut self, row: &DailyRow) -> OutputResult<()> {
        let mut record: Vec<String> = Vec::with_capacity(16);
        record.push(row.day.to_string());
        record.extend(row.counts.0.iter().map(usize::to_string));
        record.push(row.new_infections.to_string());
        record.push(row.hospital_beds.to_string());
        record.push(row.r_eff.map(|r| format!("{r:.4}")).unwrap_or_default());
        record.push(row.interventions.clone());
        record.push(serde_json::to_string(&row.active)?);
        self.daily.write_record(&record)?;
        Ok(())
    }

    fn write_node_states(&mut self, rows: &[NodeStateRow]) -> OutputResult<()> {
        for row in rows {
            self.node_states.write_record(&[
                row.day.to_string(),
                row.person.to_string(),
                row.compartment.code().to_owned(),
            ])?;
        }
        Ok(())
    }

    fn write_intervention(&mut self, row: &InterventionRow) -> OutputResult<()> {
        self.interventions.write_record(&[
            row.day.to_string(),
            row.intervention.to_owned(),
            row.people_affected.to_string(),
            row.doses.to_string(),
            row.vaccinated.to_string(),
            row.contacts_changed.to_string(),
            row.events_scheduled.to_string(),
        ])?;
        Ok(())
    }

    fn write_summary(&mut self, rows: &[SummaryRow]) -> OutputResult<()> {
        for row in rows {
            self.summary.write_record([row.metric, row.value.as_str()])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.daily.flush()?;
        self.node_states.flush()?;
        self.interventions.flush()?;
        self.summary.flush()?;
        Ok(())
    }
}
