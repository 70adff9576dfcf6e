//! Dummy traffic roaming the grid

use rand::{Rng, seq::IndexedRandom};

use crate::traffic::{self, Action, Grid, LightPhase, Maneuver, Pose};

/// A dummy cab: declares a legal maneuver at the top of a step, then
/// executes it after the primary cab has acted.
///
/// Dummies honor their own light but ignore each other, so their legality
/// check passes empty traffic channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DummyCab {
    pose: Pose,
    intent: Option<Maneuver>,
}

impl DummyCab {
    pub fn new(pose: Pose) -> Self {
        Self { pose, intent: None }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// The maneuver declared for the current step, if any
    pub fn intent(&self) -> Option<Maneuver> {
        self.intent
    }

    /// Choose this step's maneuver given the light on this dummy's approach
    pub fn declare(&mut self, light: LightPhase, rng: &mut impl Rng) {
        let options: Vec<Maneuver> = Maneuver::ALL
            .into_iter()
            .filter(|maneuver| {
                traffic::permits(light, None, None, Action::from_maneuver(*maneuver))
            })
            .collect();
        self.intent = options.choose(rng).copied();
    }

    /// Execute the declared maneuver: turn, then advance one block
    pub fn execute(&mut self, grid: &Grid) {
        if let Some(maneuver) = self.intent.take() {
            self.pose.heading = self.pose.heading.turned(maneuver);
            self.pose.at = grid.advance(self.pose.at, self.pose.heading);
        }
    }

    /// Drop the dummy somewhere else with no declared intent
    pub fn relocate(&mut self, pose: Pose) {
        self.pose = pose;
        self.intent = None;
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::traffic::{Heading, Intersection};

    #[test]
    fn red_light_leaves_only_right_turns() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut dummy = DummyCab::new(Pose::new(Intersection::new(0, 0), Heading::East));
        for _ in 0..20 {
            dummy.declare(LightPhase::Red, &mut rng);
            assert_eq!(dummy.intent(), Some(Maneuver::Right));
        }
    }

    #[test]
    fn green_light_allows_every_maneuver() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut dummy = DummyCab::new(Pose::new(Intersection::new(0, 0), Heading::East));
        let mut seen = std::collections::HashSet::new();
        for _ in 0..60 {
            dummy.declare(LightPhase::Green, &mut rng);
            if let Some(maneuver) = dummy.intent() {
                seen.insert(maneuver);
            }
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn execute_turns_then_advances() {
        let grid = Grid::new(8, 6).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mut dummy = DummyCab::new(Pose::new(Intersection::new(2, 2), Heading::East));

        // Force a known intent by declaring until the draw is a left turn.
        loop {
            dummy.declare(LightPhase::Green, &mut rng);
            if dummy.intent() == Some(Maneuver::Left) {
                break;
            }
        }
        dummy.execute(&grid);
        assert_eq!(dummy.pose().heading, Heading::North);
        assert_eq!(dummy.pose().at, Intersection::new(2, 1));
        assert_eq!(dummy.intent(), None);
    }
}
