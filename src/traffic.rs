//! Traffic vocabulary shared by the learning agent and the simulated city

pub mod grid;
pub mod percept;
pub mod rules;

pub use grid::{Axis, Grid, Heading, Intersection, Pose};
pub use percept::{Action, LightPhase, Maneuver, Percept, Reading, Sense};
pub use rules::permits;
