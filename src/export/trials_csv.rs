//! CSV export for trial runs
//!
//! Flattens per-trial records into a CSV table for offline analysis.

use std::path::Path;

use crate::{Result, ports::TrialRecord};

/// Exporter for per-trial CSV files
pub struct TrialCsvExporter;

impl TrialCsvExporter {
    /// Write one row per trial record, with a header row.
    ///
    /// # Returns
    /// Number of rows written
    pub fn export<P: AsRef<Path>>(records: &[TrialRecord], path: P) -> Result<usize> {
        let mut writer = csv::Writer::from_path(path)?;

        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        Ok(records.len())
    }
}
