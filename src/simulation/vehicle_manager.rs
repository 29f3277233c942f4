//! Vehicle spawning and management for the grid simulation
//!
//! This module contains functions for spawning, despawning, and updating vehicles.
//! It separates vehicle bookkeeping from the main world coordination.

use anyhow::{Context, Result};
use log::error;
use std::collections::BTreeMap;

use super::error::SimResult;
use super::map::Map;
use super::types::{Coord, VehicleId};
use super::vehicle::{Vehicle, VehicleUpdateResult};

/// Spawn a vehicle at `start` heading for `destination`
///
/// # Arguments
/// * `vehicle_id` - The pre-generated vehicle ID
/// * `start` - The road tile the vehicle appears on
/// * `destination` - The road tile it drives to
/// * `map` - The map to route over and place the vehicle on
///
/// Returns the new vehicle if successful
pub fn spawn_vehicle(
    vehicle_id: VehicleId,
    start: Coord,
    destination: Coord,
    map: &mut Map,
) -> Result<Vehicle> {
    Vehicle::new(vehicle_id, start, destination, map)
        .with_context(|| format!("Failed to spawn {vehicle_id} from {start} to {destination}"))
}

/// Despawn a vehicle and free the tile it stands on
///
/// Returns the removed vehicle so the caller can report on its trip
pub fn despawn_vehicle(
    vehicle_id: VehicleId,
    vehicles: &mut BTreeMap<VehicleId, Vehicle>,
    map: &mut Map,
) -> Option<Vehicle> {
    let vehicle = vehicles.remove(&vehicle_id)?;
    if let Err(err) = map.vacate(vehicle.position(), vehicle.direction(), vehicle_id) {
        error!("Could not clear {} from the map: {}", vehicle_id, err);
    }
    Some(vehicle)
}

/// Update all vehicles in ascending id order
///
/// Returns a list of (vehicle_id, result) tuples for vehicles that need special
/// handling; vehicles that simply keep driving are left out
pub fn update_vehicles(
    vehicles: &mut BTreeMap<VehicleId, Vehicle>,
    map: &mut Map,
) -> Vec<(VehicleId, SimResult<VehicleUpdateResult>)> {
    let mut results = Vec::new();

    for (vehicle_id, vehicle) in vehicles.iter_mut() {
        match vehicle.update(map) {
            Ok(VehicleUpdateResult::Continue) => {}
            result => results.push((*vehicle_id, result)),
        }
    }

    results
}
