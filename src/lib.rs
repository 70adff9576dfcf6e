//! Smartcab: a tabular Q-learning driving agent in a simulated grid city
//!
//! This crate provides:
//! - A grid-city traffic simulation with lights, dummy cabs, and deadlines
//! - A tabular Q-learning driving agent with epsilon-greedy exploration
//! - A trial pipeline with pluggable observers for progress and tracing
//! - Persistence and export tooling for trained agents and run artifacts

pub mod cli;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod traffic;
pub mod world;

pub use error::{Error, Result};
pub use ports::{
    Driver, Environment, Observer, RoutePlanner, StepReport, TrialRecord, TrialStats, World,
};
pub use q_learning::{AgentConfig, LearningAgent, QTable, TrafficState};
pub use traffic::{Action, LightPhase, Percept};
pub use world::{TrafficWorld, TrialStatus, WorldConfig};
