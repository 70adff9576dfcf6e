//! Percepts: the named categorical signals a cab senses at an intersection

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A maneuver relative to the cab's current heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Maneuver {
    Forward,
    Left,
    Right,
}

impl Maneuver {
    pub const ALL: [Maneuver; 3] = [Maneuver::Forward, Maneuver::Left, Maneuver::Right];
}

impl fmt::Display for Maneuver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Maneuver::Forward => "forward",
            Maneuver::Left => "left",
            Maneuver::Right => "right",
        };
        write!(f, "{name}")
    }
}

/// One timestep's action: execute a maneuver or hold still.
///
/// The action set is closed and does not change within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Idle,
    Forward,
    Left,
    Right,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Idle, Action::Forward, Action::Left, Action::Right];

    /// The maneuver this action executes, if it moves the cab
    pub fn maneuver(self) -> Option<Maneuver> {
        match self {
            Action::Idle => None,
            Action::Forward => Some(Maneuver::Forward),
            Action::Left => Some(Maneuver::Left),
            Action::Right => Some(Maneuver::Right),
        }
    }

    pub fn from_maneuver(maneuver: Maneuver) -> Action {
        match maneuver {
            Maneuver::Forward => Action::Forward,
            Maneuver::Left => Action::Left,
            Maneuver::Right => Action::Right,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Idle => write!(f, "idle"),
            Action::Forward => write!(f, "forward"),
            Action::Left => write!(f, "left"),
            Action::Right => write!(f, "right"),
        }
    }
}

/// Traffic light phase as seen from the cab's approach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightPhase {
    Red,
    Green,
}

impl fmt::Display for LightPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightPhase::Red => write!(f, "red"),
            LightPhase::Green => write!(f, "green"),
        }
    }
}

/// Named sensor channel in a percept.
///
/// Ordering follows declaration order so percept maps iterate channels in a
/// stable, readable order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sense {
    Light,
    Oncoming,
    Left,
    Right,
}

impl Sense {
    pub const ALL: [Sense; 4] = [Sense::Light, Sense::Oncoming, Sense::Left, Sense::Right];
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sense::Light => "light",
            Sense::Oncoming => "oncoming",
            Sense::Left => "left",
            Sense::Right => "right",
        };
        write!(f, "{name}")
    }
}

/// A single sensed reading on one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reading {
    /// Light phase on the cab's approach
    Signal(LightPhase),
    /// Declared maneuver of a car approaching from this side, or clear
    Traffic(Option<Maneuver>),
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Signal(phase) => write!(f, "{phase}"),
            Reading::Traffic(Some(maneuver)) => write!(f, "{maneuver}"),
            Reading::Traffic(None) => write!(f, "none"),
        }
    }
}

/// The percept mapping returned by `Environment::sense`.
///
/// Every channel the state encoder expects must be present; a missing channel
/// is a contract violation surfaced as an error, not a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percept {
    readings: BTreeMap<Sense, Reading>,
}

impl Percept {
    /// Build a fully populated percept
    pub fn new(
        light: LightPhase,
        oncoming: Option<Maneuver>,
        left: Option<Maneuver>,
        right: Option<Maneuver>,
    ) -> Self {
        let mut percept = Percept::default();
        percept.insert(Sense::Light, Reading::Signal(light));
        percept.insert(Sense::Oncoming, Reading::Traffic(oncoming));
        percept.insert(Sense::Left, Reading::Traffic(left));
        percept.insert(Sense::Right, Reading::Traffic(right));
        percept
    }

    pub fn insert(&mut self, sense: Sense, reading: Reading) {
        self.readings.insert(sense, reading);
    }

    pub fn get(&self, sense: Sense) -> Option<Reading> {
        self.readings.get(&sense).copied()
    }

    /// The light phase channel
    pub fn light(&self) -> Result<LightPhase> {
        match self.readings.get(&Sense::Light) {
            Some(Reading::Signal(phase)) => Ok(*phase),
            Some(_) => Err(Error::MismatchedPercept {
                channel: Sense::Light.to_string(),
            }),
            None => Err(Error::MissingPercept {
                channel: Sense::Light.to_string(),
            }),
        }
    }

    /// The traffic channel for one side of the intersection
    pub fn traffic(&self, sense: Sense) -> Result<Option<Maneuver>> {
        match self.readings.get(&sense) {
            Some(Reading::Traffic(intent)) => Ok(*intent),
            Some(_) => Err(Error::MismatchedPercept {
                channel: sense.to_string(),
            }),
            None => Err(Error::MissingPercept {
                channel: sense.to_string(),
            }),
        }
    }
}

impl fmt::Display for Percept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (sense, reading)) in self.readings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{sense}: {reading}")?;
        }
        write!(f, "}}")
    }
}
