//! Trial pipeline for driving agents

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::{Driver, Environment, Observer, TrialRecord},
    world::{TrafficWorld, TrialStatus},
};

/// Run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialConfig {
    /// Number of trials to run
    pub trials: usize,

    /// Random seed
    pub seed: Option<u64>,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            trials: 100,
            seed: None,
        }
    }
}

/// Result of a trial run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Total trials run
    pub total_trials: usize,

    /// Trials that reached the destination in time
    pub successes: usize,

    /// Trials that did not
    pub failures: usize,

    /// Success rate
    pub success_rate: f64,

    /// Total moves across all trials
    pub total_moves: usize,

    /// Total penalized moves across all trials
    pub total_penalties: usize,

    /// Penalties per move
    pub penalty_rate: f64,

    /// Mean net reward per trial
    pub mean_net_reward: f64,

    /// Per-trial outcomes, in run order
    pub records: Vec<TrialRecord>,
}

impl RunResult {
    /// Aggregate per-trial records into a run summary
    pub fn new(records: Vec<TrialRecord>) -> Self {
        let total_trials = records.len();
        let successes = records.iter().filter(|r| r.success).count();
        let failures = total_trials - successes;
        let total_moves: usize = records.iter().map(|r| r.moves).sum();
        let total_penalties: usize = records.iter().map(|r| r.penalties).sum();

        let success_rate = if total_trials > 0 {
            successes as f64 / total_trials as f64
        } else {
            0.0
        };
        let penalty_rate = if total_moves > 0 {
            total_penalties as f64 / total_moves as f64
        } else {
            0.0
        };
        let mean_net_reward = if total_trials > 0 {
            records.iter().map(|r| r.net_reward).sum::<f64>() / total_trials as f64
        } else {
            0.0
        };

        Self {
            total_trials,
            successes,
            failures,
            success_rate,
            total_moves,
            total_penalties,
            penalty_rate,
            mean_net_reward,
            records,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Trial pipeline for a single driver in a single world
pub struct TrialPipeline {
    config: TrialConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrialPipeline {
    /// Create a new trial pipeline
    pub fn new(config: TrialConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Run the configured number of trials.
    ///
    /// Each trial starts with a fresh world layout and a fresh route, while
    /// the driver keeps whatever it has learned so far.
    pub fn run(&mut self, driver: &mut dyn Driver, world: &mut TrafficWorld) -> Result<RunResult> {
        if let Some(seed) = self.config.seed {
            driver.set_rng_seed(seed)?;
            world.reseed(seed.wrapping_add(1));
        }

        for observer in &mut self.observers {
            observer.on_run_start(self.config.trials)?;
        }

        let mut records = Vec::with_capacity(self.config.trials);
        for trial_num in 0..self.config.trials {
            let record = self.run_trial(trial_num, driver, world)?;

            for observer in &mut self.observers {
                observer.on_trial_end(trial_num, &record)?;
            }

            records.push(record);
        }

        for observer in &mut self.observers {
            observer.on_run_end()?;
        }

        Ok(RunResult::new(records))
    }

    fn run_trial(
        &mut self,
        trial_num: usize,
        driver: &mut dyn Driver,
        world: &mut TrafficWorld,
    ) -> Result<TrialRecord> {
        let destination = world.begin_trial();
        driver.reset(world, destination)?;

        let initial_deadline = world.initial_deadline();
        for observer in &mut self.observers {
            observer.on_trial_start(trial_num, initial_deadline)?;
        }

        let mut net_reward = 0.0;
        let mut t = 0;
        while world.status() == TrialStatus::Running {
            world.begin_step();
            let report = driver.update(world, t)?;
            net_reward += report.reward;

            for observer in &mut self.observers {
                observer.on_step(trial_num, &report)?;
            }

            t += 1;
        }

        let stats = driver.trial_stats();
        Ok(TrialRecord {
            trial: trial_num,
            success: world.status() == TrialStatus::Arrived,
            moves: stats.moves,
            penalties: stats.penalties,
            net_reward,
            initial_deadline,
            deadline_remaining: world.deadline(),
        })
    }
}
