//! Grid traffic simulation
//!
//! This module contains the whole simulation: the city map, its traffic lights, the
//! greedy router and the vehicles that drive it. Everything runs headless and is
//! driven one tick at a time through [`SimWorld`].

mod config;
mod error;
mod intersection_graph;
mod map;
mod router;
mod stats;
mod tile;
mod traffic_light;
mod types;
mod vehicle;
mod vehicle_manager;
mod world;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use config::{
    LightTiming, SimConfig, DEFAULT_BLOCK_LENGTH, DEFAULT_HEIGHT, DEFAULT_VEHICLES,
    DEFAULT_WIDTH, GREEN_MAX_TICKS, GREEN_MIN_TICKS, SPAWN_ATTEMPTS, YELLOW_TICKS,
};
#[allow(unused_imports)]
pub use error::{CollisionFault, SimError, SimResult};
#[allow(unused_imports)]
pub use intersection_graph::IntersectionGraph;
#[allow(unused_imports)]
pub use map::Map;
#[allow(unused_imports)]
pub use router::{plan_route, route_length};
#[allow(unused_imports)]
pub use stats::{SimulationStats, TripReport};
#[allow(unused_imports)]
pub use tile::Tile;
#[allow(unused_imports)]
pub use traffic_light::{LightColor, TrafficLight};
#[allow(unused_imports)]
pub use types::{distance, Axis, Coord, Direction, SimId, VehicleId};
#[allow(unused_imports)]
pub use vehicle::{Vehicle, VehicleUpdateResult, DEFAULT_DIRECTION};
pub use world::{SimWorld, TickReport};
