//! Tiles of the city grid
//!
//! A road tile carries one lane per direction of travel. Vehicles heading the same way
//! queue behind each other; vehicles heading different ways can share the tile.

use super::error::{CollisionFault, SimError, SimResult};
use super::traffic_light::{LightColor, TrafficLight};
use super::types::{Coord, Direction, VehicleId};

/// One cell of the city grid
#[derive(Debug, Clone)]
pub struct Tile {
    coord: Coord,
    is_road: bool,
    /// Lane occupants, indexed by `Direction::index`
    lanes: [Option<VehicleId>; 4],
    /// Present iff the tile is an intersection
    light: Option<TrafficLight>,
}

impl Tile {
    pub fn new(coord: Coord, is_road: bool) -> Self {
        Self {
            coord,
            is_road,
            lanes: [None; 4],
            light: None,
        }
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn is_road(&self) -> bool {
        self.is_road
    }

    pub fn is_occupied(&self) -> bool {
        self.lanes.iter().any(Option::is_some)
    }

    /// Vehicle holding the lane for `direction`
    pub fn occupant(&self, direction: Direction) -> Option<VehicleId> {
        self.lanes[direction.index()]
    }

    /// All vehicles on this tile with the direction they travel
    pub fn occupants(&self) -> impl Iterator<Item = (Direction, VehicleId)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.occupant(direction).map(|id| (direction, id)))
    }

    pub fn light(&self) -> Option<&TrafficLight> {
        self.light.as_ref()
    }

    pub fn light_mut(&mut self) -> Option<&mut TrafficLight> {
        self.light.as_mut()
    }

    /// Colour facing a vehicle that enters this tile travelling in `direction`
    pub fn light_facing(&self, direction: Direction) -> Option<LightColor> {
        self.light
            .as_ref()
            .map(|light| light.light_for_direction_of_travel(direction))
    }

    pub(crate) fn install_light(&mut self, light: TrafficLight) {
        debug_assert!(self.is_road, "lights only belong on road tiles");
        self.light = Some(light);
    }

    /// Put `vehicle` into the lane for `direction`
    pub(crate) fn add_vehicle(&mut self, vehicle: VehicleId, direction: Direction) -> SimResult<()> {
        if !self.is_road {
            return Err(SimError::NotRoad(self.coord));
        }
        let lane = &mut self.lanes[direction.index()];
        if let Some(occupant) = *lane {
            return Err(CollisionFault {
                coord: self.coord,
                direction,
                vehicle,
                occupant: Some(occupant),
            }
            .into());
        }
        *lane = Some(vehicle);
        Ok(())
    }

    /// Take `vehicle` out of the lane for `direction`
    pub(crate) fn remove_vehicle(
        &mut self,
        vehicle: VehicleId,
        direction: Direction,
    ) -> SimResult<()> {
        let lane = &mut self.lanes[direction.index()];
        if *lane != Some(vehicle) {
            return Err(CollisionFault {
                coord: self.coord,
                direction,
                vehicle,
                occupant: *lane,
            }
            .into());
        }
        *lane = None;
        Ok(())
    }
}
