//! Right-of-way rules shared by rewards and dummy traffic

use super::percept::{Action, LightPhase, Maneuver};

/// Whether `action` is permitted under US right-of-way rules, given the light
/// phase on the cab's approach and the declared maneuvers of oncoming and
/// left-side traffic.
///
/// Idle is always permitted. Forward requires green. A left turn requires
/// green and no oncoming traffic heading forward or turning right. A right
/// turn is permitted on green, and on red only while left-side traffic is not
/// heading forward.
pub fn permits(
    light: LightPhase,
    oncoming: Option<Maneuver>,
    left: Option<Maneuver>,
    action: Action,
) -> bool {
    match action {
        Action::Idle => true,
        Action::Forward => light == LightPhase::Green,
        Action::Left => {
            light == LightPhase::Green
                && !matches!(oncoming, Some(Maneuver::Forward | Maneuver::Right))
        }
        Action::Right => {
            light == LightPhase::Green || !matches!(left, Some(Maneuver::Forward))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_is_always_permitted() {
        for light in [LightPhase::Red, LightPhase::Green] {
            assert!(permits(light, Some(Maneuver::Forward), Some(Maneuver::Forward), Action::Idle));
        }
    }

    #[test]
    fn forward_requires_green() {
        assert!(permits(LightPhase::Green, None, None, Action::Forward));
        assert!(!permits(LightPhase::Red, None, None, Action::Forward));
    }

    #[test]
    fn left_turn_yields_to_oncoming_traffic() {
        assert!(permits(LightPhase::Green, None, None, Action::Left));
        assert!(permits(
            LightPhase::Green,
            Some(Maneuver::Left),
            None,
            Action::Left
        ));
        assert!(!permits(
            LightPhase::Green,
            Some(Maneuver::Forward),
            None,
            Action::Left
        ));
        assert!(!permits(
            LightPhase::Green,
            Some(Maneuver::Right),
            None,
            Action::Left
        ));
        assert!(!permits(LightPhase::Red, None, None, Action::Left));
    }

    #[test]
    fn right_on_red_yields_to_cross_traffic_from_the_left() {
        assert!(permits(LightPhase::Green, None, None, Action::Right));
        assert!(permits(LightPhase::Red, None, None, Action::Right));
        assert!(permits(
            LightPhase::Red,
            None,
            Some(Maneuver::Right),
            Action::Right
        ));
        assert!(!permits(
            LightPhase::Red,
            None,
            Some(Maneuver::Forward),
            Action::Right
        ));
        // On green the left-side check does not apply.
        assert!(permits(
            LightPhase::Green,
            None,
            Some(Maneuver::Forward),
            Action::Right
        ));
    }
}
