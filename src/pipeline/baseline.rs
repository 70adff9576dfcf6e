//! Baseline drivers for comparison runs

use rand::{Rng, SeedableRng, random, rngs::StdRng};

use crate::{
    Error, Result,
    ports::{Driver, StepReport, TrialStats, World},
    q_learning::TrafficState,
    traffic::Intersection,
};

/// Random policy driver (baseline).
///
/// Picks uniformly among the valid actions at every step, immune to both
/// rewards and the waypoint. Useful as the floor any learner must beat.
pub struct RandomDriver {
    name: String,
    rng: StdRng,
    moves: usize,
    penalties: usize,
}

impl RandomDriver {
    /// Create a new random driver
    pub fn new(name: String) -> Self {
        Self {
            name,
            rng: StdRng::seed_from_u64(random()),
            moves: 0,
            penalties: 0,
        }
    }

    /// Create a new random driver with a deterministic seed
    pub fn with_seed(name: String, seed: u64) -> Self {
        Self {
            name,
            rng: StdRng::seed_from_u64(seed),
            moves: 0,
            penalties: 0,
        }
    }
}

impl Driver for RandomDriver {
    fn reset(&mut self, world: &mut dyn World, destination: Intersection) -> Result<()> {
        world.route_to(destination);
        self.moves = 0;
        self.penalties = 0;
        Ok(())
    }

    fn update(&mut self, world: &mut dyn World, t: usize) -> Result<StepReport> {
        let waypoint = world.next_waypoint().ok_or(Error::NoWaypoint)?;
        let deadline = world.deadline();
        let state = TrafficState::from_percept(&world.sense(), waypoint)?;

        let actions = world.valid_actions();
        if actions.is_empty() {
            return Err(Error::NoValidActions);
        }
        let action = actions[self.rng.random_range(0..actions.len())];
        let reward = world.act(action);

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
        &self.name
    }

    fn trial_stats(&self) -> TrialStats {
        TrialStats {
            moves: self.moves,
            penalties: self.penalties,
        }
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}
