//! Environment port - the world as the cab's sensors and actuators see it
//!
//! The learning core never touches the world directly; it consumes this
//! narrow surface. The reward returned by `act` is the only reward channel
//! in the system.

use super::planner::RoutePlanner;
use crate::traffic::{Action, Percept};

/// Environment trait - sensing and acting at the cab's current intersection
///
/// # Contract
///
/// * `sense` must be called at the start of every timestep; percepts go
///   stale as soon as other traffic moves.
/// * Every channel the state encoder expects is populated in the returned
///   percept. A partial percept is a contract violation the encoder reports
///   as an error.
/// * The action set is closed and unchanging within a run.
pub trait Environment {
    /// Sense the percept mapping at the cab's current intersection.
    fn sense(&self) -> Percept;

    /// Remaining steps before the trial deadline.
    ///
    /// Reporting only: the deadline never enters the learned state or the
    /// update math. May go negative when deadline enforcement is off.
    fn deadline(&self) -> i32;

    /// The fixed set of actions the cab may take on any timestep.
    fn valid_actions(&self) -> &[Action];

    /// Execute `action` and return the numeric reward for this timestep.
    ///
    /// The reward may embed rule-violation penalties and arrival bonuses;
    /// the driver treats it as opaque.
    fn act(&mut self, action: Action) -> f64;
}

/// Combined world view a driver operates against.
///
/// The simulated city implements both halves; test stubs can script them
/// independently.
pub trait World: Environment + RoutePlanner {}

impl<T: Environment + RoutePlanner + ?Sized> World for T {}
