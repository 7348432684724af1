//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `transitions.csv`
//! - `statuses.csv`
//! - `passes.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;
use log::info;

use crate::writer::OutputWriter;
use crate::{OutputResult, PassRow, StatusRow, TransitionRow};

/// Writes the event stream to three CSV files.
pub struct CsvEventWriter {
    transitions: Writer<File>,
    statuses:    Writer<File>,
    passes:      Writer<File>,
    finished:    bool,
}

impl CsvEventWriter {
    /// Create the three CSV files in `dir` and write the header rows.
    /// Existing files are truncated.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut transitions = Writer::from_path(dir.join("transitions.csv"))?;
        transitions.write_record(["entity_id", "region_id", "kind", "at_ms", "dwell_ms"])?;

        let mut statuses = Writer::from_path(dir.join("statuses.csv"))?;
        statuses.write_record(["entity_id", "status", "at_ms"])?;

        let mut passes = Writer::from_path(dir.join("passes.csv"))?;
        passes.write_record([
            "tick",
            "at_ms",
            "evaluated",
            "skipped_offline",
            "unlocated",
            "events",
            "elapsed_us",
        ])?;

        info!("writing CSV output to {}", dir.display());
        Ok(Self { transitions, statuses, passes, finished: false })
    }
}

impl OutputWriter for CsvEventWriter {
    fn write_transition(&mut self, row: &TransitionRow) -> OutputResult<()> {
        self.transitions.write_record(&[
            row.entity_id.clone(),
            row.region_id.clone(),
            row.kind.to_owned(),
            row.at_ms.to_string(),
            row.dwell_ms.map(|d| d.to_string()).unwrap_or_default(),
        ])?;
        Ok(())
    }

    fn write_status(&mut self, row: &StatusRow) -> OutputResult<()> {
        self.statuses.write_record(&[
            row.entity_id.clone(),
            row.status.as_str().to_owned(),
            row.at_ms.to_string(),
        ])?;
        Ok(())
    }

    fn write_pass(&mut self, row: &PassRow) -> OutputResult<()> {
        self.passes.write_record(&[
            row.tick.to_string(),
            row.at_ms.to_string(),
            row.evaluated.to_string(),
            row.skipped_offline.to_string(),
            row.unlocated.to_string(),
            row.events.to_string(),
            row.elapsed_us.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.transitions.flush()?;
        self.statuses.flush()?;
        self.passes.flush()?;
        Ok(())
    }
}
