//! Ports (trait boundaries) for external dependencies.
//!
//! This module defines the interfaces between the learning core and the
//! world it drives in. Following hexagonal architecture, these traits are
//! owned by the domain and implemented by adapters such as the simulated
//! city or test stubs.

pub mod driver;
pub mod environment;
pub mod observer;
pub mod planner;

pub use driver::{Driver, StepReport, TrialRecord, TrialStats};
pub use environment::{Environment, World};
pub use observer::Observer;
pub use planner::RoutePlanner;
