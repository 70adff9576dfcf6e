//! The simulated city: lit intersections, dummy traffic, errands, deadlines

pub mod dummy;
pub mod light;
pub mod planner;
pub mod sim;

pub use light::TrafficLight;
pub use sim::{
    DEADLINE_FACTOR, HARD_DEADLINE_FLOOR, REWARD_ARRIVAL, REWARD_IDLE, REWARD_OFF_ROUTE,
    REWARD_ON_ROUTE, REWARD_VIOLATION, TrafficWorld, TrialStatus, WorldConfig,
};
