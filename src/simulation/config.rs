//! Construction-time parameters for the simulation
//!
//! Everything tunable is passed in explicitly; nothing reads global state.

use std::ops::RangeInclusive;

/// Default grid width in tiles
pub const DEFAULT_WIDTH: usize = 120;
/// Default grid height in tiles
pub const DEFAULT_HEIGHT: usize = 90;
/// Road spacing: interior rows and columns that are a multiple of this are road
pub const DEFAULT_BLOCK_LENGTH: usize = 24;
/// Default number of vehicles spawned at start
pub const DEFAULT_VEHICLES: usize = 31;

/// Shortest green phase in ticks
pub const GREEN_MIN_TICKS: u32 = 40;
/// Longest green phase in ticks
pub const GREEN_MAX_TICKS: u32 = 60;
/// Yellow phase length in ticks
pub const YELLOW_TICKS: u32 = 6;

/// How many random start tiles to try before giving up on a spawn
pub const SPAWN_ATTEMPTS: usize = 16;

/// Phase durations for every traffic light on a map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightTiming {
    /// Green duration is drawn from this range each time a pair turns green
    pub green: RangeInclusive<u32>,
    pub yellow: u32,
}

impl Default for LightTiming {
    fn default() -> Self {
        Self {
            green: GREEN_MIN_TICKS..=GREEN_MAX_TICKS,
            yellow: YELLOW_TICKS,
        }
    }
}

/// Parameters for building a [`SimWorld`](super::SimWorld)
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub width: usize,
    pub height: usize,
    pub block_length: usize,
    pub timing: LightTiming,
    /// Vehicles spawned when the world is created
    pub vehicles: usize,
    /// Spawn a replacement whenever a vehicle arrives
    pub respawn: bool,
    /// Seed for reproducible runs; `None` uses the thread RNG
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            block_length: DEFAULT_BLOCK_LENGTH,
            timing: LightTiming::default(),
            vehicles: DEFAULT_VEHICLES,
            respawn: false,
            seed: None,
        }
    }
}
