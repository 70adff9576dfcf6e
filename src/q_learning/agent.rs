//! The learning cab: epsilon-greedy Q-learning with a one-step update lag

use serde::{Deserialize, Serialize};

use super::{
    policy::{EpsilonGreedy, Selection},
    q_table::QTable,
    state::TrafficState,
};
use crate::{
    error::{Error, Result},
    ports::{Driver, StepReport, TrialStats, World},
    traffic::{Action, Intersection},
};

/// Hyperparameters for the learning agent.
///
/// The defaults are the tuned run configuration: a high learning rate with a
/// small discount, light exploration, and a flat zero prior over unseen
/// pairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub epsilon: f64,
    pub default_q: f64,
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.90,
            discount_factor: 0.10,
            epsilon: 0.05,
            default_q: 0.0,
            seed: None,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.learning_rate) {
            return Err(Error::InvalidConfiguration {
                message: format!("learning rate {} must be within [0, 1]", self.learning_rate),
            });
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "discount factor {} must be within [0, 1]",
                    self.discount_factor
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(Error::InvalidConfiguration {
                message: format!("epsilon {} must be within [0, 1]", self.epsilon),
            });
        }
        if !self.default_q.is_finite() {
            return Err(Error::InvalidConfiguration {
                message: format!("default Q {} must be finite", self.default_q),
            });
        }
        Ok(())
    }
}

/// A buffered (state, action, reward) awaiting its successor's estimate
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingTransition {
    state: TrafficState,
    action: Action,
    reward: f64,
}

/// Exportable snapshot of a learning agent, for persistence.
///
/// The live RNG state is not captured; the seed is, so a restored agent
/// restarts its stream deterministically when one was set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentState {
    pub q_table: QTable,
    pub epsilon: f64,
    pub rng_seed: Option<u64>,
}

/// The Q-learning cab driver.
///
/// Learning runs one step behind the wheel: each timestep's selection value
/// closes out the previous timestep's buffered transition, then the current
/// transition takes its place. The first step of a trial only buffers, and
/// the final transition of a trial is discarded by the next `reset`.
#[derive(Debug, Clone)]
pub struct LearningAgent {
    q_table: QTable,
    policy: EpsilonGreedy,
    pending: Option<PendingTransition>,
    moves: usize,
    penalties: usize,
    learning: bool,
}

impl LearningAgent {
    /// Create an agent from a validated configuration
    pub fn new(config: AgentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config_unchecked(config))
    }

    /// An agent with the default run configuration
    pub fn with_defaults() -> Self {
        Self::from_config_unchecked(AgentConfig::default())
    }

    fn from_config_unchecked(config: AgentConfig) -> Self {
        let mut policy = EpsilonGreedy::new(config.epsilon);
        if let Some(seed) = config.seed {
            policy.reseed(seed);
        }
        Self {
            q_table: QTable::new(
                config.learning_rate,
                config.discount_factor,
                config.default_q,
            ),
            policy,
            pending: None,
            moves: 0,
            penalties: 0,
            learning: true,
        }
    }

    /// Builder-style deterministic seeding
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.policy.reseed(seed);
        self
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn q_table_size(&self) -> usize {
        self.q_table.size()
    }

    pub fn epsilon(&self) -> f64 {
        self.policy.epsilon()
    }

    /// Override the exploration rate, e.g. for greedy evaluation
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.policy.set_epsilon(epsilon);
    }

    /// Enable or disable learning. While disabled, updates neither write to
    /// the table nor buffer transitions.
    pub fn set_learning(&mut self, enabled: bool) {
        self.learning = enabled;
    }

    pub fn is_learning(&self) -> bool {
        self.learning
    }

    pub fn moves(&self) -> usize {
        self.moves
    }

    pub fn penalties(&self) -> usize {
        self.penalties
    }

    /// The configuration this agent currently runs under
    pub fn config(&self) -> AgentConfig {
        AgentConfig {
            learning_rate: self.q_table.learning_rate(),
            discount_factor: self.q_table.discount_factor(),
            epsilon: self.policy.epsilon(),
            default_q: self.q_table.default_q(),
            seed: self.policy.seed(),
        }
    }

    /// Snapshot the learned state for persistence
    pub fn export_state(&self) -> AgentState {
        AgentState {
            q_table: self.q_table.clone(),
            epsilon: self.policy.epsilon(),
            rng_seed: self.policy.seed(),
        }
    }

    /// Rebuild an agent from a persisted snapshot
    pub fn from_state(state: AgentState) -> Self {
        let mut policy = EpsilonGreedy::new(state.epsilon);
        if let Some(seed) = state.rng_seed {
            policy.reseed(seed);
        }
        Self {
            q_table: state.q_table,
            policy,
            pending: None,
            moves: 0,
            penalties: 0,
            learning: true,
        }
    }
}

impl Driver for LearningAgent {
    /// Begin a new trial: route the planner, drop the pending transition,
    /// zero the counters. The Q-table carries over untouched.
    fn reset(&mut self, world: &mut dyn World, destination: Intersection) -> Result<()> {
        world.route_to(destination);
        self.pending = None;
        self.moves = 0;
        self.penalties = 0;
        Ok(())
    }

    fn update(&mut self, world: &mut dyn World, t: usize) -> Result<StepReport> {
        let waypoint = world.next_waypoint().ok_or(Error::NoWaypoint)?;
        let deadline = world.deadline();
        let percept = world.sense();
        let state = TrafficState::from_percept(&percept, waypoint)?;

        let Selection { action, value } =
            self.policy
                .select(&self.q_table, &state, world.valid_actions())?;
        let reward = world.act(action);

        if self.learning {
            // The current selection's estimate closes out the previous step.
            if let Some(prev) = self.pending.take() {
                self.q_table
                    .td_update(prev.state, prev.action, prev.reward, value);
            }
            self.pending = Some(PendingTransition {
                state,
                action,
                reward,
            });
        }

        self.moves += 1;
        if reward < 0.0 {
            self.penalties += 1;
        }

        Ok(StepReport {
            t,
            deadline,
            state,
            action,
            reward,
        })
    }

    fn name(&self) -> &str {
        "q-learning"
    }

    fn trial_stats(&self) -> TrialStats {
        TrialStats {
            moves: self.moves,
            penalties: self.penalties,
        }
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.policy.reseed(seed);
        Ok(())
    }
}
