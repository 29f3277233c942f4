//! Vehicle movement logic for the grid simulation
//!
//! A vehicle follows its planned waypoints one tile at a time. Before every move it
//! checks the target tile: it must be road, its light (if any) must not be red for
//! the direction of travel, and no vehicle travelling the same way may hold it.

use std::collections::VecDeque;

use log::{debug, warn};

use super::error::{CollisionFault, SimError, SimResult};
use super::map::Map;
use super::router::{plan_route, route_length};
use super::traffic_light::LightColor;
use super::types::{Coord, Direction, VehicleId};

/// Direction a freshly spawned vehicle faces when it is already on its first target
pub const DEFAULT_DIRECTION: Direction = Direction::Right;

/// Result of a vehicle update indicating what the caller should do with it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleUpdateResult {
    /// Still en route
    Continue,
    /// Reached its destination; the caller removes it from the map
    Arrived,
    /// A move was rejected because the lane was already held
    Collision(CollisionFault),
}

/// Why a movement attempt did not happen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Blocked {
    RedLight(Coord),
    Occupied,
    NotRoad,
}

/// An autonomous vehicle
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleId,
    position: Coord,
    previous_position: Option<Coord>,
    direction: Direction,
    start: Coord,
    destination: Coord,
    /// Remaining waypoints; the front is the next target
    route: VecDeque<Coord>,
    reached_destination: bool,
    /// Ticks spent stopped in front of a red light without moving
    red_light_ticks: u32,
    /// Separate stops at red lights
    red_light_stops: u32,
    /// Tile whose light this vehicle is currently registered as waiting for
    waiting_at: Option<Coord>,
    /// Planned route length in tiles, fixed at creation
    route_tiles: usize,
    ticks_en_route: u32,
}

impl Vehicle {
    /// Plan a route from `start` to `destination` and place the vehicle on the map
    pub fn new(id: VehicleId, start: Coord, destination: Coord, map: &mut Map) -> SimResult<Self> {
        if !map.tile_at(start)?.is_road() {
            return Err(SimError::NotRoad(start));
        }
        if !map.tile_at(destination)?.is_road() {
            return Err(SimError::NotRoad(destination));
        }

        let route = plan_route(map, start, destination)?;
        let route_tiles = route_length(start, &route);

        let direction = route
            .iter()
            .find(|waypoint| **waypoint != start)
            .and_then(|waypoint| start.direction_to(waypoint))
            .unwrap_or(DEFAULT_DIRECTION);

        map.occupy(start, direction, id)?;
        debug!(
            "Spawned {} at {} heading {:?} to {} via {} waypoints",
            id,
            start,
            direction,
            destination,
            route.len()
        );

        Ok(Self {
            id,
            position: start,
            previous_position: None,
            direction,
            start,
            destination,
            route,
            reached_destination: false,
            red_light_ticks: 0,
            red_light_stops: 0,
            waiting_at: None,
            route_tiles,
            ticks_en_route: 0,
        })
    }

    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn previous_position(&self) -> Option<Coord> {
        self.previous_position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn destination(&self) -> Coord {
        self.destination
    }

    /// Waypoints not yet reached, next target first
    pub fn route(&self) -> &VecDeque<Coord> {
        &self.route
    }

    pub fn has_arrived(&self) -> bool {
        self.reached_destination
    }

    /// Cumulative ticks spent stopped at red lights
    pub fn red_light_ticks(&self) -> u32 {
        self.red_light_ticks
    }

    /// Number of distinct stops at red lights
    pub fn red_light_stops(&self) -> u32 {
        self.red_light_stops
    }

    pub fn route_tiles(&self) -> usize {
        self.route_tiles
    }

    pub fn ticks_en_route(&self) -> u32 {
        self.ticks_en_route
    }

    /// How many movement attempts this tick allows. A vehicle with traffic between
    /// it and its next waypoint gets a second attempt so queues close up.
    pub fn movement_attempts(&self, map: &Map) -> u8 {
        let Some(target) = self.route.iter().find(|waypoint| **waypoint != self.position) else {
            return 1;
        };
        let traffic_ahead = map
            .tiles_between(self.position, *target)
            .map(|tiles| {
                tiles
                    .iter()
                    .any(|tile| tile.occupants().any(|(_, id)| id != self.id))
            })
            .unwrap_or(false);
        if traffic_ahead {
            2
        } else {
            1
        }
    }

    /// Advance the vehicle by one tick
    pub fn update(&mut self, map: &mut Map) -> SimResult<VehicleUpdateResult> {
        if self.reached_destination {
            return Ok(VehicleUpdateResult::Arrived);
        }
        self.ticks_en_route += 1;

        let attempts = self.movement_attempts(map);
        let mut moved = false;

        for _ in 0..attempts {
            if self.route.front() == Some(&self.position) {
                self.route.pop_front();
            }

            if self.position == self.destination {
                self.reached_destination = true;
                return Ok(VehicleUpdateResult::Arrived);
            }

            let target = *self.route.front().ok_or(SimError::RoutingExhausted {
                start: self.start,
                destination: self.destination,
            })?;
            let direction = self
                .position
                .direction_to(&target)
                .ok_or(SimError::InvalidRange {
                    from: self.position,
                    to: target,
                })?;

            match self.check_move(map, direction) {
                Ok(next) => {
                    self.waiting_at = None;
                    if let Err(err) = self.execute_move(map, direction, next) {
                        return match err {
                            SimError::Collision(fault) => {
                                warn!("{}", fault);
                                Ok(VehicleUpdateResult::Collision(fault))
                            }
                            other => Err(other),
                        };
                    }
                    moved = true;
                    if self.reached_destination {
                        return Ok(VehicleUpdateResult::Arrived);
                    }
                }
                Err(Blocked::RedLight(light_at)) => {
                    // A vehicle that already moved this tick was not held up
                    if !moved {
                        self.red_light_ticks += 1;
                    }
                    if self.waiting_at != Some(light_at) {
                        self.waiting_at = Some(light_at);
                        self.red_light_stops += 1;
                        map.register_waiting(light_at, direction);
                    }
                    break;
                }
                Err(Blocked::Occupied) | Err(Blocked::NotRoad) => {
                    self.waiting_at = None;
                    break;
                }
            }
        }

        Ok(VehicleUpdateResult::Continue)
    }

    /// Decide whether the tile in `direction` can be entered
    fn check_move(&self, map: &Map, direction: Direction) -> Result<Coord, Blocked> {
        let tile = map
            .tile_in_direction(self.position, direction)
            .filter(|tile| tile.is_road())
            .ok_or(Blocked::NotRoad)?;

        if tile.light_facing(direction) == Some(LightColor::Red) {
            return Err(Blocked::RedLight(tile.coord()));
        }
        if tile.occupant(direction).is_some() {
            return Err(Blocked::Occupied);
        }
        Ok(tile.coord())
    }

    fn execute_move(&mut self, map: &mut Map, direction: Direction, next: Coord) -> SimResult<()> {
        map.move_occupant(self.id, (self.position, self.direction), (next, direction))?;
        self.previous_position = Some(self.position);
        self.position = next;
        self.direction = direction;
        if self.route.front() == Some(&self.position) {
            self.route.pop_front();
        }
        if self.position == self.destination {
            self.reached_destination = true;
        }
        Ok(())
    }
}
