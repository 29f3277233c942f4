//! Error types for the grid simulation
//!
//! Structural errors (bad coordinates, malformed ranges, routing dead ends) abort the
//! operation that raised them. Collision faults are data anomalies: callers receive
//! them as values and decide what to do, the simulation itself keeps running.

use std::fmt;

use super::types::{Coord, Direction, VehicleId};

/// A vehicle tried to enter a lane another vehicle already holds, or to leave a
/// lane it does not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionFault {
    /// Tile where the fault happened
    pub coord: Coord,
    /// Lane (direction of travel) involved
    pub direction: Direction,
    /// Vehicle whose move triggered the fault
    pub vehicle: VehicleId,
    /// Vehicle found in the lane, if any
    pub occupant: Option<VehicleId>,
}

impl fmt::Display for CollisionFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.occupant {
            Some(occupant) => write!(
                f,
                "{} collided with {} at {} (lane {:?})",
                self.vehicle, occupant, self.coord, self.direction
            ),
            None => write!(
                f,
                "{} does not hold lane {:?} at {}",
                self.vehicle, self.direction, self.coord
            ),
        }
    }
}

/// Errors raised by the simulation core
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A coordinate lies outside the grid.
    OutOfBounds {
        coord: Coord,
        width: usize,
        height: usize,
    },
    /// Two tiles are not joined by a straight, unbroken line of road.
    InvalidRange { from: Coord, to: Coord },
    /// The greedy router could not make forward progress.
    RoutingExhausted { start: Coord, destination: Coord },
    /// Two vehicles would share a lane.
    Collision(CollisionFault),
    /// Vehicles can only stand on road tiles.
    NotRoad(Coord),
    /// Random sampling was asked for a road tile on a map without road.
    NoRoadTiles,
    /// The tile is not an intersection, so it has no traffic light.
    NoLight(Coord),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::OutOfBounds {
                coord,
                width,
                height,
            } => write!(f, "Coordinate {coord} is outside the {width}x{height} grid"),
            SimError::InvalidRange { from, to } => {
                write!(f, "No straight road corridor from {from} to {to}")
            }
            SimError::RoutingExhausted { start, destination } => {
                write!(f, "Routing from {start} to {destination} made no progress")
            }
            SimError::Collision(fault) => write!(f, "Collision fault: {fault}"),
            SimError::NotRoad(coord) => write!(f, "Tile {coord} is not a road"),
            SimError::NoRoadTiles => write!(f, "Map has no road tiles"),
            SimError::NoLight(coord) => write!(f, "Tile {coord} has no traffic light"),
        }
    }
}

impl std::error::Error for SimError {}

impl From<CollisionFault> for SimError {
    fn from(fault: CollisionFault) -> Self {
        SimError::Collision(fault)
    }
}

pub type SimResult<T> = Result<T, SimError>;
