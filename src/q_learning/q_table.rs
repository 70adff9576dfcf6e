//! Q-table: the learned mapping from driving situations to action values

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::state::TrafficState;
use crate::traffic::Action;

/// Q-table mapping (state, action) pairs to value estimates.
///
/// Looking up an unseen pair yields the configured default without
/// inserting, so the table grows only when an update writes. Nothing ever
/// removes entries during an agent's lifetime; per-trial resets leave the
/// table untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QTable {
    /// Learned values: (state, action) -> Q
    q_values: HashMap<(TrafficState, Action), f64>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
    /// Value reported for unseen pairs
    default_q: f64,
}

impl QTable {
    /// Create an empty Q-table
    pub fn new(learning_rate: f64, discount_factor: f64, default_q: f64) -> Self {
        Self {
            q_values: HashMap::new(),
            learning_rate,
            discount_factor,
            default_q,
        }
    }

    /// Get the Q-value for a state-action pair, defaulting when unseen
    pub fn get(&self, state: &TrafficState, action: Action) -> f64 {
        *self
            .q_values
            .get(&(*state, action))
            .unwrap_or(&self.default_q)
    }

    /// Set the Q-value for a state-action pair
    pub fn set(&mut self, state: TrafficState, action: Action, value: f64) {
        self.q_values.insert((state, action), value);
    }

    /// Fold a completed transition into the table.
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ·V − Q(s,a)]
    ///
    /// `successor_value` is V: the estimate the policy reported while
    /// selecting the following step's action. The write may insert the pair.
    pub fn td_update(
        &mut self,
        state: TrafficState,
        action: Action,
        reward: f64,
        successor_value: f64,
    ) {
        let current_q = self.get(&state, action);
        let td_target = reward + self.discount_factor * successor_value;
        let td_error = td_target - current_q;
        let new_q = current_q + self.learning_rate * td_error;
        self.set(state, action, new_q);
    }

    /// Total number of Q-values stored
    pub fn size(&self) -> usize {
        self.q_values.len()
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    pub fn default_q(&self) -> f64 {
        self.default_q
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traffic::{LightPhase, Maneuver};

    fn situation(waypoint: Maneuver) -> TrafficState {
        TrafficState {
            light: LightPhase::Green,
            oncoming: None,
            left: None,
            right: None,
            waypoint,
        }
    }

    #[test]
    fn unseen_pairs_read_the_default_without_inserting() {
        let qtable = QTable::new(0.9, 0.1, 0.0);
        let state = situation(Maneuver::Forward);

        for action in Action::ALL {
            assert_eq!(qtable.get(&state, action), 0.0);
        }
        assert_eq!(qtable.size(), 0);
    }

    #[test]
    fn nonzero_default_applies_to_every_unseen_pair() {
        let qtable = QTable::new(0.9, 0.1, 0.5);
        assert_eq!(qtable.get(&situation(Maneuver::Left), Action::Idle), 0.5);
        assert_eq!(qtable.size(), 0);
    }

    #[test]
    fn set_then_get_roundtrips() {
        let mut qtable = QTable::new(0.9, 0.1, 0.0);
        let state = situation(Maneuver::Forward);

        qtable.set(state, Action::Left, 1.5);
        assert_eq!(qtable.get(&state, Action::Left), 1.5);
        assert_eq!(qtable.get(&state, Action::Right), 0.0);
        assert_eq!(qtable.size(), 1);
    }

    #[test]
    fn td_update_moves_toward_the_bootstrapped_target() {
        let mut qtable = QTable::new(0.5, 0.99, 0.0);
        let state = situation(Maneuver::Forward);

        qtable.td_update(state, Action::Forward, 0.0, 2.0);

        // Q = 0.0 + 0.5 * (0.0 + 0.99 * 2.0 - 0.0) = 0.99
        let updated_q = qtable.get(&state, Action::Forward);
        assert!((updated_q - 0.99).abs() < 1e-9);
    }

    #[test]
    fn td_update_matches_the_reference_numbers() {
        let mut qtable = QTable::new(0.9, 0.1, 0.0);
        let state = situation(Maneuver::Right);

        qtable.td_update(state, Action::Right, 5.0, 2.0);

        // Q = 0.0 + 0.9 * (5.0 + 0.1 * 2.0 - 0.0) = 4.68
        assert!((qtable.get(&state, Action::Right) - 4.68).abs() < 1e-9);
    }

    #[test]
    fn updates_start_from_the_default_estimate() {
        let mut qtable = QTable::new(0.5, 0.0, 1.0);
        let state = situation(Maneuver::Left);

        qtable.td_update(state, Action::Idle, 3.0, 0.0);

        // Q = 1.0 + 0.5 * (3.0 - 1.0) = 2.0
        assert!((qtable.get(&state, Action::Idle) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn size_never_shrinks_under_updates() {
        let mut qtable = QTable::new(0.9, 0.1, 0.0);
        let mut last = 0;
        for (i, waypoint) in [Maneuver::Forward, Maneuver::Left, Maneuver::Right]
            .into_iter()
            .cycle()
            .take(30)
            .enumerate()
        {
            qtable.td_update(
                situation(waypoint),
                Action::ALL[i % Action::ALL.len()],
                1.0,
                0.5,
            );
            assert!(qtable.size() >= last);
            last = qtable.size();
        }
    }
}
