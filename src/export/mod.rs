//! Export functionality for run artifacts

pub mod trials_csv;

pub use trials_csv::TrialCsvExporter;
