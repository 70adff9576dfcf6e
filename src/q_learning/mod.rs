//! Tabular Q-learning for the driving task.
//!
//! The learner factors into four pieces: [`TrafficState`] encodes what the
//! cab senses, [`QTable`] stores action-value estimates, [`EpsilonGreedy`]
//! turns estimates into choices, and [`LearningAgent`] wires them into a
//! [`crate::ports::Driver`] with a one-step update lag.

pub mod agent;
pub mod policy;
pub mod q_table;
pub mod serialization;
pub mod state;

pub use agent::{AgentConfig, AgentState, LearningAgent};
pub use policy::{EpsilonGreedy, Selection};
pub use q_table::QTable;
pub use serialization::{SavedAgent, TrainingMetadata};
pub use state::TrafficState;
