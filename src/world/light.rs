//! Per-intersection traffic lights

use rand::Rng;

use crate::traffic::{Axis, LightPhase};

/// A traffic light alternating which road axis is open.
///
/// The light flips every `period` steps; phase and period are redrawn at
/// trial start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrafficLight {
    open: Axis,
    period: u32,
    ticks: u32,
}

impl TrafficLight {
    pub const MIN_PERIOD: u32 = 3;
    pub const MAX_PERIOD: u32 = 5;

    pub fn new(open: Axis, period: u32) -> Self {
        Self {
            open,
            period: period.max(1),
            ticks: 0,
        }
    }

    /// A light with a freshly drawn phase and period
    pub fn random(rng: &mut impl Rng) -> Self {
        let open = if rng.random_bool(0.5) {
            Axis::NorthSouth
        } else {
            Axis::EastWest
        };
        Self::new(open, rng.random_range(Self::MIN_PERIOD..=Self::MAX_PERIOD))
    }

    /// Advance one step, flipping the open axis when the period elapses
    pub fn tick(&mut self) {
        self.ticks += 1;
        if self.ticks >= self.period {
            self.open = self.open.other();
            self.ticks = 0;
        }
    }

    pub fn open_axis(&self) -> Axis {
        self.open
    }

    /// Phase seen by a cab approaching along `axis`
    pub fn phase_for(&self, axis: Axis) -> LightPhase {
        if axis == self.open {
            LightPhase::Green
        } else {
            LightPhase::Red
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_follows_the_open_axis() {
        let light = TrafficLight::new(Axis::EastWest, 3);
        assert_eq!(light.phase_for(Axis::EastWest), LightPhase::Green);
        assert_eq!(light.phase_for(Axis::NorthSouth), LightPhase::Red);
    }

    #[test]
    fn light_flips_when_the_period_elapses() {
        let mut light = TrafficLight::new(Axis::NorthSouth, 3);
        light.tick();
        light.tick();
        assert_eq!(light.open_axis(), Axis::NorthSouth);
        light.tick();
        assert_eq!(light.open_axis(), Axis::EastWest);
        light.tick();
        light.tick();
        light.tick();
        assert_eq!(light.open_axis(), Axis::NorthSouth);
    }

    #[test]
    fn zero_period_is_clamped() {
        let mut light = TrafficLight::new(Axis::EastWest, 0);
        light.tick();
        assert_eq!(light.open_axis(), Axis::NorthSouth);
    }
}
