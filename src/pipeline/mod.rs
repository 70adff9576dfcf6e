//! Trial and evaluation pipeline abstractions
//!
//! This module provides composable pipelines for:
//! - Running drivers through batches of trials
//! - Collecting metrics and per-step observations
//! - Baseline drivers for comparison runs

pub mod baseline;
pub mod observers;
pub mod trials;

// Re-export baseline implementations (adapters)
pub use baseline::RandomDriver;
// Re-export observer implementations (adapters)
pub use observers::{
    JsonlObserver, MetricsObserver, MetricsSummary, Observation, ProgressObserver,
    StepObservation, TraceObserver,
};
pub use trials::{RunResult, TrialConfig, TrialPipeline};

pub use crate::ports::{Driver, Observer};
