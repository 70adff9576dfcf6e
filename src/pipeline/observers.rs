//! Observer pattern for trial runs
//!
//! Observers allow composable data collection during a run without coupling
//! the trial loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::{Observer, StepReport, TrialRecord},
};

/// Observation of a single timestep during a trial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepObservation {
    /// Trial number
    pub trial_num: usize,
    /// Timestep within the trial
    pub t: usize,
    /// Deadline before the move
    pub deadline: i32,
    /// Sensed state
    pub state: String,
    /// Action taken
    pub action: String,
    /// Reward received
    pub reward: f64,
}

/// Complete observation of one trial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Trial number
    pub trial_num: usize,
    /// Whether the cab arrived in time
    pub success: bool,
    /// Deadline at the start of the trial
    pub initial_deadline: i32,
    /// Net reward over the trial
    pub net_reward: f64,
    /// Steps in the trial
    pub steps: Vec<StepObservation>,
    /// Total steps taken
    pub total_steps: usize,
}

/// Progress bar observer - Shows run progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    successes: usize,
    failures: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            successes: 0,
            failures: 0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_run_start(&mut self, total_trials: usize) -> Result<()> {
        let pb = ProgressBar::new(total_trials as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} trials (S:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_trial_end(&mut self, trial_num: usize, record: &TrialRecord) -> Result<()> {
        if record.success {
            self.successes += 1;
        } else {
            self.failures += 1;
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position((trial_num + 1) as u64);
            pb.set_message(format!("{} F:{}", self.successes, self.failures));
        }
        Ok(())
    }

    fn on_run_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("{} F:{}", self.successes, self.failures));
        }
        Ok(())
    }
}

/// Metrics observer - Tracks run metrics
pub struct MetricsObserver {
    successes: usize,
    failures: usize,
    total_trials: usize,
    total_penalties: usize,
    step_counts: Vec<usize>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            successes: 0,
            failures: 0,
            total_trials: 0,
            total_penalties: 0,
            step_counts: Vec::new(),
        }
    }

    /// Get current success rate
    pub fn success_rate(&self) -> f64 {
        if self.total_trials == 0 {
            0.0
        } else {
            self.successes as f64 / self.total_trials as f64
        }
    }

    /// Get penalties per move
    pub fn penalty_rate(&self) -> f64 {
        let total_steps: usize = self.step_counts.iter().sum();
        if total_steps == 0 {
            0.0
        } else {
            self.total_penalties as f64 / total_steps as f64
        }
    }

    /// Get average trial length
    pub fn avg_trial_length(&self) -> f64 {
        if self.step_counts.is_empty() {
            0.0
        } else {
            self.step_counts.iter().sum::<usize>() as f64 / self.step_counts.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_trials: self.total_trials,
            successes: self.successes,
            failures: self.failures,
            success_rate: self.success_rate(),
            total_penalties: self.total_penalties,
            penalty_rate: self.penalty_rate(),
            avg_trial_length: self.avg_trial_length(),
        }
    }
}

/// Summary of run metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_trials: usize,
    pub successes: usize,
    pub failures: usize,
    pub success_rate: f64,
    pub total_penalties: usize,
    pub penalty_rate: f64,
    pub avg_trial_length: f64,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_trial_end(&mut self, _trial_num: usize, record: &TrialRecord) -> Result<()> {
        self.total_trials += 1;
        if record.success {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
        self.total_penalties += record.penalties;
        self.step_counts.push(record.moves);
        Ok(())
    }
}

/// JSONL observer - Exports observations to JSON Lines format
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_trial_steps: Vec<StepObservation>,
    initial_deadline: i32,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self {
            writer,
            current_trial_steps: Vec::new(),
            initial_deadline: 0,
        })
    }
}

impl Observer for JsonlObserver {
    fn on_trial_start(&mut self, _trial_num: usize, deadline: i32) -> Result<()> {
        self.current_trial_steps.clear();
        self.initial_deadline = deadline;
        Ok(())
    }

    fn on_step(&mut self, trial_num: usize, report: &StepReport) -> Result<()> {
        self.current_trial_steps.push(StepObservation {
            trial_num,
            t: report.t,
            deadline: report.deadline,
            state: report.state.to_string(),
            action: report.action.to_string(),
            reward: report.reward,
        });
        Ok(())
    }

    fn on_trial_end(&mut self, trial_num: usize, record: &TrialRecord) -> Result<()> {
        let observation = Observation {
            trial_num,
            success: record.success,
            initial_deadline: self.initial_deadline,
            net_reward: record.net_reward,
            total_steps: self.current_trial_steps.len(),
            steps: self.current_trial_steps.clone(),
        };

        // Write as JSONL (one JSON object per line)
        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;

        Ok(())
    }
}

/// Trace observer - Prints every step, for watching a run unfold
pub struct TraceObserver;

impl TraceObserver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TraceObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for TraceObserver {
    fn on_trial_start(&mut self, trial_num: usize, deadline: i32) -> Result<()> {
        println!("Trial {trial_num}: deadline = {deadline}");
        Ok(())
    }

    fn on_step(&mut self, _trial_num: usize, report: &StepReport) -> Result<()> {
        println!(
            "  t = {}, deadline = {}, state = {}, action = {}, reward = {:.2}",
            report.t, report.deadline, report.state, report.action, report.reward
        );
        Ok(())
    }

    fn on_trial_end(&mut self, _trial_num: usize, record: &TrialRecord) -> Result<()> {
        if record.success {
            println!(
                "  Arrived with {} steps to spare, net reward {:.2}",
                record.deadline_remaining, record.net_reward
            );
        } else {
            println!("  Failed after {} moves", record.moves);
        }
        Ok(())
    }
}
