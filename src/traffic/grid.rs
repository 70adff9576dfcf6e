//! Grid geometry: headings, intersections, and the wrapping city grid

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::percept::Maneuver;
use crate::error::{Error, Result};

/// Compass heading of a cab.
///
/// Coordinates are screen-style: `x` grows east, `y` grows south, so North
/// decreases `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    /// Unit displacement of one step along this heading
    pub fn delta(self) -> (i64, i64) {
        match self {
            Heading::North => (0, -1),
            Heading::East => (1, 0),
            Heading::South => (0, 1),
            Heading::West => (-1, 0),
        }
    }

    pub fn reverse(self) -> Heading {
        match self {
            Heading::North => Heading::South,
            Heading::East => Heading::West,
            Heading::South => Heading::North,
            Heading::West => Heading::East,
        }
    }

    /// Heading after a left turn
    pub fn left(self) -> Heading {
        match self {
            Heading::North => Heading::West,
            Heading::East => Heading::North,
            Heading::South => Heading::East,
            Heading::West => Heading::South,
        }
    }

    /// Heading after a right turn
    pub fn right(self) -> Heading {
        match self {
            Heading::North => Heading::East,
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
        }
    }

    /// Heading after executing a maneuver from this heading
    pub fn turned(self, maneuver: Maneuver) -> Heading {
        match maneuver {
            Maneuver::Forward => self,
            Maneuver::Left => self.left(),
            Maneuver::Right => self.right(),
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Heading::North | Heading::South => Axis::NorthSouth,
            Heading::East | Heading::West => Axis::EastWest,
        }
    }

    /// Draw a heading uniformly at random
    pub fn random(rng: &mut impl Rng) -> Heading {
        match rng.random_range(0..4) {
            0 => Heading::North,
            1 => Heading::East,
            2 => Heading::South,
            _ => Heading::West,
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Heading::North => "north",
            Heading::East => "east",
            Heading::South => "south",
            Heading::West => "west",
        };
        write!(f, "{name}")
    }
}

/// The two road axes through an intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    NorthSouth,
    EastWest,
}

impl Axis {
    pub fn other(self) -> Axis {
        match self {
            Axis::NorthSouth => Axis::EastWest,
            Axis::EastWest => Axis::NorthSouth,
        }
    }
}

/// A grid intersection identified by its column and row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Intersection {
    pub x: u32,
    pub y: u32,
}

impl Intersection {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// City-block distance, ignoring edge wrapping
    pub fn cityblock(self, other: Intersection) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Intersection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Position and heading of a cab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pose {
    pub at: Intersection,
    pub heading: Heading,
}

impl Pose {
    pub fn new(at: Intersection, heading: Heading) -> Self {
        Self { at, heading }
    }
}

/// The city grid. Movement wraps at the edges; distances do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidGrid { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, at: Intersection) -> bool {
        at.x < self.width && at.y < self.height
    }

    /// One step along `heading`, wrapping across the grid edges
    pub fn advance(&self, at: Intersection, heading: Heading) -> Intersection {
        let (dx, dy) = heading.delta();
        let x = (i64::from(at.x) + dx).rem_euclid(i64::from(self.width)) as u32;
        let y = (i64::from(at.y) + dy).rem_euclid(i64::from(self.height)) as u32;
        Intersection::new(x, y)
    }

    pub fn random_intersection(&self, rng: &mut impl Rng) -> Intersection {
        Intersection::new(
            rng.random_range(0..self.width),
            rng.random_range(0..self.height),
        )
    }

    pub fn random_pose(&self, rng: &mut impl Rng) -> Pose {
        Pose::new(self.random_intersection(rng), Heading::random(rng))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn turn_table_is_consistent() {
        for heading in Heading::ALL {
            assert_eq!(heading.left().right(), heading);
            assert_eq!(heading.right().left(), heading);
            assert_eq!(heading.reverse().reverse(), heading);
            assert_eq!(heading.left().left(), heading.reverse());
            assert_eq!(heading.turned(Maneuver::Forward), heading);
        }
        assert_eq!(Heading::East.turned(Maneuver::Left), Heading::North);
        assert_eq!(Heading::East.turned(Maneuver::Right), Heading::South);
    }

    #[test]
    fn axes_partition_headings() {
        assert_eq!(Heading::North.axis(), Axis::NorthSouth);
        assert_eq!(Heading::South.axis(), Axis::NorthSouth);
        assert_eq!(Heading::East.axis(), Axis::EastWest);
        assert_eq!(Heading::West.axis(), Axis::EastWest);
        assert_eq!(Axis::NorthSouth.other(), Axis::EastWest);
    }

    #[test]
    fn advance_wraps_at_edges() {
        let grid = Grid::new(8, 6).unwrap();
        let origin = Intersection::new(0, 0);
        assert_eq!(
            grid.advance(origin, Heading::West),
            Intersection::new(7, 0)
        );
        assert_eq!(
            grid.advance(origin, Heading::North),
            Intersection::new(0, 5)
        );
        assert_eq!(
            grid.advance(Intersection::new(7, 5), Heading::East),
            Intersection::new(0, 5)
        );
        assert_eq!(
            grid.advance(Intersection::new(3, 2), Heading::South),
            Intersection::new(3, 3)
        );
    }

    #[test]
    fn cityblock_ignores_wrapping() {
        let a = Intersection::new(0, 0);
        let b = Intersection::new(7, 5);
        assert_eq!(a.cityblock(b), 12);
        assert_eq!(b.cityblock(a), 12);
        assert_eq!(a.cityblock(a), 0);
    }

    #[test]
    fn zero_sized_grid_is_rejected() {
        assert!(Grid::new(0, 6).is_err());
        assert!(Grid::new(8, 0).is_err());
    }

    #[test]
    fn random_intersections_stay_in_bounds() {
        let grid = Grid::new(4, 3).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(grid.contains(grid.random_intersection(&mut rng)));
        }
    }
}
