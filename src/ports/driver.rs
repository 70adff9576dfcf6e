//! Driver port - abstraction over agents that can drive a trial
//!
//! This port defines the interface the trial pipeline drives, allowing the
//! same loop to run:
//! - The Q-learning agent
//! - The random baseline
//! - Frozen copies of trained agents during evaluation

use serde::{Deserialize, Serialize};

use super::environment::World;
use crate::{
    Result,
    q_learning::TrafficState,
    traffic::{Action, Intersection},
};

/// What one timestep produced, for observers and logs.
///
/// The deadline is the value read before acting; the reward is the
/// environment's response to the chosen action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub t: usize,
    pub deadline: i32,
    pub state: TrafficState,
    pub action: Action,
    pub reward: f64,
}

/// Per-trial move and penalty counters.
///
/// Maintained by drivers for reporting only; the counters never feed the
/// learning math.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialStats {
    pub moves: usize,
    pub penalties: usize,
}

/// Outcome of one completed trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub trial: usize,
    pub success: bool,
    pub moves: usize,
    pub penalties: usize,
    pub net_reward: f64,
    pub initial_deadline: i32,
    pub deadline_remaining: i32,
}

/// Driver trait - unified interface for agents behind the wheel
///
/// # Lifecycle
///
/// The trial pipeline calls, per trial:
/// 1. `reset(world, destination)` - once, right after the world begins the
///    trial
/// 2. `update(world, t)` - once per timestep until the world reports the
///    trial over
///
/// Anything learned persists across trials; only trial-scoped state (pending
/// transitions, counters) is cleared by `reset`.
///
/// # Examples
///
/// ```no_run
/// use smartcab::{
///     ports::Driver,
///     world::TrafficWorld,
/// };
///
/// fn first_step(driver: &mut dyn Driver, world: &mut TrafficWorld) -> smartcab::Result<()> {
///     let destination = world.begin_trial();
///     driver.reset(world, destination)?;
///     world.begin_step();
///     let report = driver.update(world, 0)?;
///     println!("reward on step 0: {}", report.reward);
///     Ok(())
/// }
/// ```
pub trait Driver: Send {
    /// Begin a new trial toward `destination`.
    ///
    /// Routes the planner via `route_to`, clears the pending transition and
    /// the trial counters. Learned values persist.
    fn reset(&mut self, world: &mut dyn World, destination: Intersection) -> Result<()>;

    /// Run one timestep: read the waypoint, sense, choose an action, execute
    /// it, and fold the reward into any learning the driver does.
    ///
    /// # Errors
    ///
    /// Returns an error on collaborator contract violations: a percept
    /// missing an expected channel, an empty valid-action set, or a missing
    /// waypoint mid-trial.
    fn update(&mut self, world: &mut dyn World, t: usize) -> Result<StepReport>;

    /// The driver's name, used in comparisons and reports.
    fn name(&self) -> &str;

    /// Move and penalty counters for the current trial.
    fn trial_stats(&self) -> TrialStats;

    /// Seed the driver's internal random number generator.
    ///
    /// Trial pipelines call this when supplied with a deterministic seed so
    /// runs are reproducible. Drivers without randomness can ignore it.
    ///
    /// # Default Implementation
    ///
    /// Does nothing and returns `Ok(())`.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }
}
