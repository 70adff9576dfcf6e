//! Observer port - abstraction for trial observation and data collection
//!
//! This port defines the interface for observing trial events, allowing
//! composable data collection without coupling the trial loop to specific
//! output formats or metrics.

use super::driver::{StepReport, TrialRecord};
use crate::Result;

/// Observer trait for monitoring trial runs
///
/// Observers can be composed to collect different kinds of data during a
/// run. Examples include:
/// - Progress bars for user feedback
/// - JSONL export for analysis
/// - Metrics tracking for evaluation
/// - Per-step trace output for debugging
///
/// # Event Sequence
///
/// The observer methods are called in the following order:
/// 1. `on_run_start(total_trials)` - Once at the beginning
/// 2. For each trial:
///    - `on_trial_start(trial_num, deadline)`
///    - `on_step(trial_num, report)` - For each timestep
///    - `on_trial_end(trial_num, record)`
/// 3. `on_run_end()` - Once at the end
///
/// Every method has a default empty implementation, so observers override
/// only the events they care about.
pub trait Observer: Send {
    /// Called when a run starts, with the number of trials to come.
    fn on_run_start(&mut self, _total_trials: usize) -> Result<()> {
        Ok(())
    }

    /// Called when a trial starts, with its initial deadline.
    fn on_trial_start(&mut self, _trial_num: usize, _deadline: i32) -> Result<()> {
        Ok(())
    }

    /// Called after every timestep with the driver's step report.
    fn on_step(&mut self, _trial_num: usize, _report: &StepReport) -> Result<()> {
        Ok(())
    }

    /// Called when a trial ends, with its aggregated record.
    fn on_trial_end(&mut self, _trial_num: usize, _record: &TrialRecord) -> Result<()> {
        Ok(())
    }

    /// Called once when the run completes.
    ///
    /// Use this to finalize outputs, close files, or display summaries.
    fn on_run_end(&mut self) -> Result<()> {
        Ok(())
    }
}
