//! The simulated city world the agent trains in

use std::collections::HashMap;

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::{dummy::DummyCab, light::TrafficLight, planner};
use crate::{
    error::{Error, Result},
    ports::{Environment, RoutePlanner},
    traffic::{self, Action, Grid, Intersection, LightPhase, Maneuver, Percept, Pose},
};

/// Reward for an action that violates right-of-way; the cab does not move.
pub const REWARD_VIOLATION: f64 = -1.0;
/// Reward for a legal move matching the waypoint.
pub const REWARD_ON_ROUTE: f64 = 2.0;
/// Reward for a legal move away from the route.
pub const REWARD_OFF_ROUTE: f64 = -0.5;
/// Reward for holding still.
pub const REWARD_IDLE: f64 = 0.0;
/// Bonus added on reaching the destination.
pub const REWARD_ARRIVAL: f64 = 10.0;

/// Deadline steps granted per city block of trip distance.
pub const DEADLINE_FACTOR: u32 = 5;
/// Floor that aborts a runaway trial when deadlines are not enforced.
pub const HARD_DEADLINE_FLOOR: i32 = -100;

/// Simulation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: u32,
    pub height: u32,
    pub dummies: usize,
    pub enforce_deadline: bool,
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 6,
            dummies: 3,
            enforce_deadline: true,
            seed: None,
        }
    }
}

/// Where the current trial stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialStatus {
    Running,
    /// The cab reached its destination
    Arrived,
    /// The enforced deadline ran out
    TimedOut,
    /// The hard floor cut off an unenforced trial
    Aborted,
}

impl TrialStatus {
    pub fn is_over(self) -> bool {
        !matches!(self, TrialStatus::Running)
    }
}

/// The simulated city: a wrapping grid of lit intersections, dummy traffic,
/// and one primary cab with an errand and a deadline.
///
/// Each timestep follows a fixed order: `begin_step` ticks the lights and
/// lets dummy traffic declare maneuvers, the primary cab senses those
/// declared intents and acts, then the dummies execute. What the cab sensed
/// is therefore exactly what the other traffic does during the step.
#[derive(Debug, Clone)]
pub struct TrafficWorld {
    grid: Grid,
    lights: HashMap<Intersection, TrafficLight>,
    dummies: Vec<DummyCab>,
    cab: Pose,
    destination: Intersection,
    route: Option<Intersection>,
    deadline: i32,
    initial_deadline: i32,
    status: TrialStatus,
    enforce_deadline: bool,
    rng: StdRng,
}

impl TrafficWorld {
    /// Build a world from `config`. No trial is active until `begin_trial`.
    pub fn new(config: WorldConfig) -> Result<Self> {
        let grid = Grid::new(config.width, config.height)?;
        // Every intersection gets a light, so the cell count must fit u32.
        match config.width.checked_mul(config.height) {
            None => {
                return Err(Error::InvalidConfiguration {
                    message: format!(
                        "grid {}x{} is too large to simulate",
                        config.width, config.height
                    ),
                });
            }
            Some(cells) if cells < 2 => {
                return Err(Error::InvalidConfiguration {
                    message: format!(
                        "grid {}x{} has nowhere to drive; need at least two intersections",
                        config.width, config.height
                    ),
                });
            }
            Some(_) => {}
        }

        let mut rng = build_rng(config.seed);
        let mut lights = HashMap::new();
        for x in 0..config.width {
            for y in 0..config.height {
                lights.insert(Intersection::new(x, y), TrafficLight::random(&mut rng));
            }
        }
        let dummies = (0..config.dummies)
            .map(|_| DummyCab::new(grid.random_pose(&mut rng)))
            .collect();
        let cab = grid.random_pose(&mut rng);

        Ok(Self {
            grid,
            lights,
            dummies,
            cab,
            destination: cab.at,
            route: None,
            deadline: 0,
            initial_deadline: 0,
            status: TrialStatus::Arrived,
            enforce_deadline: config.enforce_deadline,
            rng,
        })
    }

    /// Replace the world's random stream, for reproducible runs
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Start a new trial: fresh lights, relocated traffic, a new errand.
    ///
    /// Returns the destination the driver must route to. The deadline is
    /// proportional to the trip's city-block distance.
    pub fn begin_trial(&mut self) -> Intersection {
        for light in self.lights.values_mut() {
            *light = TrafficLight::random(&mut self.rng);
        }
        for dummy in &mut self.dummies {
            let pose = self.grid.random_pose(&mut self.rng);
            dummy.relocate(pose);
        }
        self.cab = self.grid.random_pose(&mut self.rng);

        let max_trip = (self.grid.width() - 1) + (self.grid.height() - 1);
        // The whole-grid span is unreachable from interior cells; cap the
        // trip floor at the farthest intersection from the drawn start.
        let reachable = self.cab.at.x.max(self.grid.width() - 1 - self.cab.at.x)
            + self.cab.at.y.max(self.grid.height() - 1 - self.cab.at.y);
        let min_trip = max_trip.min(4).max(1).min(reachable);
        let destination = loop {
            let candidate = self.grid.random_intersection(&mut self.rng);
            if self.cab.at.cityblock(candidate) >= min_trip {
                break candidate;
            }
        };

        self.destination = destination;
        self.route = None;
        self.initial_deadline = (self.cab.at.cityblock(destination) * DEADLINE_FACTOR) as i32;
        self.deadline = self.initial_deadline;
        self.status = TrialStatus::Running;
        destination
    }

    /// Advance to the top of a new timestep: lights tick and dummy traffic
    /// declares its maneuvers. Call before the driver's update.
    pub fn begin_step(&mut self) {
        for light in self.lights.values_mut() {
            light.tick();
        }
        for dummy in &mut self.dummies {
            let pose = dummy.pose();
            if let Some(light) = self.lights.get(&pose.at) {
                let phase = light.phase_for(pose.heading.axis());
                dummy.declare(phase, &mut self.rng);
            }
        }
    }

    pub fn status(&self) -> TrialStatus {
        self.status
    }

    pub fn cab(&self) -> Pose {
        self.cab
    }

    pub fn destination(&self) -> Intersection {
        self.destination
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn initial_deadline(&self) -> i32 {
        self.initial_deadline
    }

    pub fn enforces_deadline(&self) -> bool {
        self.enforce_deadline
    }

    fn light_phase_at_cab(&self) -> LightPhase {
        match self.lights.get(&self.cab.at) {
            Some(light) => light.phase_for(self.cab.heading.axis()),
            None => LightPhase::Red,
        }
    }

    /// Declared maneuvers of dummies sharing the cab's intersection, split
    /// into (oncoming, left, right) channels.
    ///
    /// A dummy facing the cab is oncoming. One whose heading equals the
    /// cab's right-turn heading is crossing from the cab's left; the mirror
    /// case crosses from the right. Dummies heading the same way are not
    /// reported.
    fn traffic_readings(&self) -> (Option<Maneuver>, Option<Maneuver>, Option<Maneuver>) {
        let mut oncoming = None;
        let mut left = None;
        let mut right = None;
        for dummy in &self.dummies {
            let pose = dummy.pose();
            if pose.at != self.cab.at {
                continue;
            }
            if pose.heading == self.cab.heading.reverse() {
                oncoming = dummy.intent();
            } else if pose.heading == self.cab.heading.right() {
                left = dummy.intent();
            } else if pose.heading == self.cab.heading.left() {
                right = dummy.intent();
            }
        }
        (oncoming, left, right)
    }
}

impl Environment for TrafficWorld {
    fn sense(&self) -> Percept {
        let (oncoming, left, right) = self.traffic_readings();
        Percept::new(self.light_phase_at_cab(), oncoming, left, right)
    }

    fn deadline(&self) -> i32 {
        self.deadline
    }

    fn valid_actions(&self) -> &[Action] {
        &Action::ALL
    }

    fn act(&mut self, action: Action) -> f64 {
        let (oncoming, left, _) = self.traffic_readings();
        let light = self.light_phase_at_cab();
        let waypoint = planner::waypoint(self.cab, self.destination);

        let mut reward;
        if !traffic::permits(light, oncoming, left, action) {
            reward = REWARD_VIOLATION;
        } else {
            match action.maneuver() {
                None => reward = REWARD_IDLE,
                Some(maneuver) => {
                    self.cab.heading = self.cab.heading.turned(maneuver);
                    self.cab.at = self.grid.advance(self.cab.at, self.cab.heading);
                    reward = if Some(maneuver) == waypoint {
                        REWARD_ON_ROUTE
                    } else {
                        REWARD_OFF_ROUTE
                    };
                }
            }
            if self.status == TrialStatus::Running && self.cab.at == self.destination {
                reward += REWARD_ARRIVAL;
                self.status = TrialStatus::Arrived;
            }
        }

        self.deadline -= 1;
        if self.status == TrialStatus::Running {
            if self.enforce_deadline && self.deadline <= 0 {
                self.status = TrialStatus::TimedOut;
            } else if !self.enforce_deadline && self.deadline <= HARD_DEADLINE_FLOOR {
                self.status = TrialStatus::Aborted;
            }
        }

        for dummy in &mut self.dummies {
            dummy.execute(&self.grid);
        }

        reward
    }
}

impl RoutePlanner for TrafficWorld {
    fn route_to(&mut self, destination: Intersection) {
        self.route = Some(destination);
    }

    fn next_waypoint(&self) -> Option<Maneuver> {
        let destination = self.route?;
        planner::waypoint(self.cab, destination)
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}
