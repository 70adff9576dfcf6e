//! State encoding: the sensed percept plus the navigation hint

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    traffic::{LightPhase, Maneuver, Percept, Sense},
};

/// The learned state: the cab's perceptible situation at an intersection
/// together with the planner's waypoint.
///
/// Plain data with structural equality and hashing, so identical situations
/// always land on the same Q-table row. Deadlines, coordinates, and history
/// deliberately stay out; the state space is the product of these five
/// categorical fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrafficState {
    pub light: LightPhase,
    pub oncoming: Option<Maneuver>,
    pub left: Option<Maneuver>,
    pub right: Option<Maneuver>,
    pub waypoint: Maneuver,
}

impl TrafficState {
    /// Encode this timestep's state from a sensed percept and the planner's
    /// waypoint, copied in verbatim.
    ///
    /// # Errors
    ///
    /// Fails only when the percept is missing an expected channel, which is
    /// an environment contract violation.
    pub fn from_percept(percept: &Percept, waypoint: Maneuver) -> Result<Self> {
        Ok(Self {
            light: percept.light()?,
            oncoming: percept.traffic(Sense::Oncoming)?,
            left: percept.traffic(Sense::Left)?,
            right: percept.traffic(Sense::Right)?,
            waypoint,
        })
    }
}

impl fmt::Display for TrafficState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn side(maneuver: Option<Maneuver>) -> String {
            match maneuver {
                Some(m) => m.to_string(),
                None => "none".to_string(),
            }
        }
        write!(
            f,
            "{{light: {}, oncoming: {}, left: {}, right: {}, waypoint: {}}}",
            self.light,
            side(self.oncoming),
            side(self.left),
            side(self.right),
            self.waypoint
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::traffic::Reading;

    #[test]
    fn encoding_copies_percept_fields_verbatim() {
        let percept = Percept::new(
            LightPhase::Red,
            Some(Maneuver::Left),
            None,
            Some(Maneuver::Forward),
        );
        let state = TrafficState::from_percept(&percept, Maneuver::Right).unwrap();

        assert_eq!(state.light, LightPhase::Red);
        assert_eq!(state.oncoming, Some(Maneuver::Left));
        assert_eq!(state.left, None);
        assert_eq!(state.right, Some(Maneuver::Forward));
        assert_eq!(state.waypoint, Maneuver::Right);
    }

    #[test]
    fn missing_channel_fails_the_encoding() {
        let mut percept = Percept::default();
        percept.insert(Sense::Light, Reading::Signal(LightPhase::Green));
        percept.insert(Sense::Oncoming, Reading::Traffic(None));
        // No left or right channel.

        let err = TrafficState::from_percept(&percept, Maneuver::Forward).unwrap_err();
        assert!(err.to_string().contains("left"));
    }

    #[test]
    fn identical_situations_are_structurally_equal() {
        let percept = Percept::new(LightPhase::Green, None, Some(Maneuver::Right), None);
        let a = TrafficState::from_percept(&percept, Maneuver::Forward).unwrap();
        let b = TrafficState::from_percept(&percept.clone(), Maneuver::Forward).unwrap();

        assert_eq!(a, b);
        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn display_is_compact_and_ordered() {
        let percept = Percept::new(LightPhase::Green, None, None, Some(Maneuver::Left));
        let state = TrafficState::from_percept(&percept, Maneuver::Forward).unwrap();
        assert_eq!(
            state.to_string(),
            "{light: green, oncoming: none, left: none, right: left, waypoint: forward}"
        );
    }
}
