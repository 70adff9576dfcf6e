//! CLI command implementations

pub mod compare;
pub mod evaluate;
pub mod train;

use clap::Args;

use crate::world::WorldConfig;

/// World options shared by run commands
#[derive(Args, Debug, Clone)]
pub struct WorldArgs {
    /// Grid width in intersections
    #[arg(long, default_value_t = 8)]
    pub grid_width: u32,

    /// Grid height in intersections
    #[arg(long, default_value_t = 6)]
    pub grid_height: u32,

    /// Number of dummy cabs sharing the road
    #[arg(long, default_value_t = 3)]
    pub dummies: usize,

    /// Let trials run past the deadline instead of timing out
    #[arg(long, default_value_t = false)]
    pub no_enforce_deadline: bool,
}

impl WorldArgs {
    /// Build a world configuration, wiring in the run seed
    pub fn to_config(&self, seed: Option<u64>) -> WorldConfig {
        WorldConfig {
            width: self.grid_width,
            height: self.grid_height,
            dummies: self.dummies,
            enforce_deadline: !self.no_enforce_deadline,
            seed,
        }
    }
}

pub(super) fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}
