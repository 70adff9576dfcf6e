//! Waypoint heuristic: close the east-west gap first, then north-south

use crate::traffic::{Heading, Intersection, Maneuver, Pose};

/// The travel heading that closes the east-west gap, falling back to the
/// north-south gap. `None` at the destination.
fn heading_toward(at: Intersection, destination: Intersection) -> Option<Heading> {
    let dx = i64::from(destination.x) - i64::from(at.x);
    let dy = i64::from(destination.y) - i64::from(at.y);
    if dx > 0 {
        Some(Heading::East)
    } else if dx < 0 {
        Some(Heading::West)
    } else if dy > 0 {
        Some(Heading::South)
    } else if dy < 0 {
        Some(Heading::North)
    } else {
        None
    }
}

/// The maneuver that rotates the cab toward the destination.
///
/// A target directly behind the cab resolves to a right turn; the following
/// steps complete the U-turn. Distances deliberately ignore edge wrapping.
pub fn waypoint(pose: Pose, destination: Intersection) -> Option<Maneuver> {
    let target = heading_toward(pose.at, destination)?;
    if target == pose.heading {
        Some(Maneuver::Forward)
    } else if target == pose.heading.left() {
        Some(Maneuver::Left)
    } else if target == pose.heading.right() {
        Some(Maneuver::Right)
    } else {
        Some(Maneuver::Right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(x: u32, y: u32, heading: Heading) -> Pose {
        Pose::new(Intersection::new(x, y), heading)
    }

    #[test]
    fn no_waypoint_at_the_destination() {
        assert_eq!(waypoint(pose(3, 2, Heading::East), Intersection::new(3, 2)), None);
    }

    #[test]
    fn straight_ahead_when_already_facing_the_gap() {
        assert_eq!(
            waypoint(pose(1, 2, Heading::East), Intersection::new(5, 2)),
            Some(Maneuver::Forward)
        );
        assert_eq!(
            waypoint(pose(4, 4, Heading::North), Intersection::new(4, 1)),
            Some(Maneuver::Forward)
        );
    }

    #[test]
    fn turns_rotate_toward_the_target_heading() {
        // Needs to go south, currently facing east: south is a right turn.
        assert_eq!(
            waypoint(pose(2, 1, Heading::East), Intersection::new(2, 4)),
            Some(Maneuver::Right)
        );
        // Needs to go north, currently facing east: north is a left turn.
        assert_eq!(
            waypoint(pose(2, 4, Heading::East), Intersection::new(2, 1)),
            Some(Maneuver::Left)
        );
    }

    #[test]
    fn target_behind_resolves_to_a_right_turn() {
        assert_eq!(
            waypoint(pose(5, 2, Heading::East), Intersection::new(1, 2)),
            Some(Maneuver::Right)
        );
    }

    #[test]
    fn east_west_gap_takes_priority() {
        // Both gaps open; the waypoint closes the east-west gap first.
        assert_eq!(
            waypoint(pose(0, 0, Heading::East), Intersection::new(3, 4)),
            Some(Maneuver::Forward)
        );
    }
}
