//! Route planner port - turn-by-turn guidance toward the destination

use crate::traffic::{Intersection, Maneuver};

/// RoutePlanner trait - the navigation hint feeding the learned state
///
/// The planner proposes one maneuver at a time; it never commands the cab.
/// Whether to follow the waypoint is exactly what the agent learns.
pub trait RoutePlanner {
    /// Set the destination for the coming trial.
    ///
    /// Called once per trial, from the driver's `reset`.
    fn route_to(&mut self, destination: Intersection);

    /// The suggested maneuver toward the destination from the cab's current
    /// pose.
    ///
    /// Recomputed on every call; never cached by the consumer. Returns
    /// `None` once the cab stands at the destination, which a driver mid-step
    /// treats as a contract violation since the world ends the trial on
    /// arrival.
    fn next_waypoint(&self) -> Option<Maneuver>;
}
