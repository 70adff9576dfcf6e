//! Epsilon-greedy action selection with fair tie-breaking

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use super::{q_table::QTable, state::TrafficState};
use crate::{
    error::{Error, Result},
    traffic::Action,
};

/// An action choice together with the value estimate backing it.
///
/// Under exploitation the value is the tied maximum; under exploration it is
/// whatever the table currently holds for the random pick. Either way, the
/// next TD update bootstraps from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub action: Action,
    pub value: f64,
}

/// Epsilon-greedy policy over a Q-table.
///
/// With probability ε the decision ignores the table entirely and draws
/// uniformly from the valid actions. Otherwise every action tied at the
/// maximum value shares the choice uniformly; ties are collected, not
/// resolved by position.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    epsilon: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl EpsilonGreedy {
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    /// Builder-style deterministic seeding
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.reseed(seed);
        self
    }

    /// Replace the random stream with a seeded one
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    pub fn seed(&self) -> Option<u64> {
        self.rng_seed
    }

    /// Choose an action for `state` from `actions`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoValidActions` when `actions` is empty.
    pub fn select(
        &mut self,
        table: &QTable,
        state: &TrafficState,
        actions: &[Action],
    ) -> Result<Selection> {
        if actions.is_empty() {
            return Err(Error::NoValidActions);
        }

        if self.rng.random::<f64>() < self.epsilon {
            let action = actions
                .choose(&mut self.rng)
                .copied()
                .ok_or(Error::NoValidActions)?;
            return Ok(Selection {
                action,
                value: table.get(state, action),
            });
        }

        let best = actions
            .iter()
            .map(|&action| table.get(state, action))
            .fold(f64::NEG_INFINITY, f64::max);
        let ties: Vec<Action> = actions
            .iter()
            .copied()
            .filter(|&action| table.get(state, action) == best)
            .collect();
        let action = ties
            .choose(&mut self.rng)
            .copied()
            .ok_or(Error::NoValidActions)?;

        Ok(Selection {
            action,
            value: best,
        })
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::traffic::{LightPhase, Maneuver};

    fn situation() -> TrafficState {
        TrafficState {
            light: LightPhase::Green,
            oncoming: None,
            left: None,
            right: None,
            waypoint: Maneuver::Forward,
        }
    }

    #[test]
    fn empty_action_set_is_rejected() {
        let table = QTable::new(0.9, 0.1, 0.0);
        let mut policy = EpsilonGreedy::new(0.0).with_seed(1);
        let result = policy.select(&table, &situation(), &[]);
        assert!(matches!(result, Err(Error::NoValidActions)));
    }

    #[test]
    fn zero_epsilon_always_picks_an_argmax() {
        let mut table = QTable::new(0.9, 0.1, 0.0);
        let state = situation();
        table.set(state, Action::Forward, 3.0);
        table.set(state, Action::Left, 1.0);
        table.set(state, Action::Right, -2.0);

        let mut policy = EpsilonGreedy::new(0.0).with_seed(17);
        for _ in 0..200 {
            let selection = policy.select(&table, &state, &Action::ALL).unwrap();
            assert_eq!(selection.action, Action::Forward);
            assert_eq!(selection.value, 3.0);
        }
    }

    #[test]
    fn tied_maxima_share_the_choice_roughly_equally() {
        let mut table = QTable::new(0.9, 0.1, 0.0);
        let state = situation();
        table.set(state, Action::Idle, 1.0);
        table.set(state, Action::Right, 1.0);
        table.set(state, Action::Forward, 0.5);
        table.set(state, Action::Left, -1.0);

        let mut policy = EpsilonGreedy::new(0.0).with_seed(23);
        let mut counts: HashMap<Action, usize> = HashMap::new();
        for _ in 0..2000 {
            let selection = policy.select(&table, &state, &Action::ALL).unwrap();
            *counts.entry(selection.action).or_default() += 1;
            assert_eq!(selection.value, 1.0);
        }

        assert!(counts.get(&Action::Idle).copied().unwrap_or(0) > 800);
        assert!(counts.get(&Action::Right).copied().unwrap_or(0) > 800);
        assert_eq!(counts.get(&Action::Forward), None);
        assert_eq!(counts.get(&Action::Left), None);
    }

    #[test]
    fn full_exploration_ignores_the_values() {
        let mut table = QTable::new(0.9, 0.1, 0.0);
        let state = situation();
        // A value bad enough that exploitation would never touch it.
        table.set(state, Action::Left, -100.0);

        let mut policy = EpsilonGreedy::new(1.0).with_seed(31);
        let mut counts: HashMap<Action, usize> = HashMap::new();
        for _ in 0..2000 {
            let selection = policy.select(&table, &state, &Action::ALL).unwrap();
            *counts.entry(selection.action).or_default() += 1;
        }

        for action in Action::ALL {
            assert!(
                counts.get(&action).copied().unwrap_or(0) > 300,
                "action {action} was starved under full exploration"
            );
        }
    }

    #[test]
    fn exploration_still_reports_the_tables_estimate() {
        let mut table = QTable::new(0.9, 0.1, 0.0);
        let state = situation();
        table.set(state, Action::Idle, 0.1);
        table.set(state, Action::Forward, 0.2);
        table.set(state, Action::Left, 0.3);
        table.set(state, Action::Right, 0.4);

        let mut policy = EpsilonGreedy::new(1.0).with_seed(5);
        for _ in 0..50 {
            let selection = policy.select(&table, &state, &Action::ALL).unwrap();
            assert_eq!(selection.value, table.get(&state, selection.action));
        }
    }

    #[test]
    fn seeded_policies_reproduce_their_draws() {
        let table = QTable::new(0.9, 0.1, 0.0);
        let state = situation();
        let mut a = EpsilonGreedy::new(0.5).with_seed(99);
        let mut b = EpsilonGreedy::new(0.5).with_seed(99);

        for _ in 0..100 {
            let left = a.select(&table, &state, &Action::ALL).unwrap();
            let right = b.select(&table, &state, &Action::ALL).unwrap();
            assert_eq!(left.action, right.action);
        }
    }
}
