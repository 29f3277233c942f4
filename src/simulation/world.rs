//! Main simulation world that ties everything together
//!
//! The world owns the map, the vehicles and the random source, and advances them one
//! tick at a time: every traffic light first, then every vehicle in id order.

use anyhow::{bail, Context, Result};
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

use super::config::{SimConfig, SPAWN_ATTEMPTS};
use super::error::{CollisionFault, SimError, SimResult};
use super::intersection_graph::IntersectionGraph;
use super::map::Map;
use super::stats::{SimulationStats, TripReport};
use super::types::{Coord, SimId, VehicleId};
use super::vehicle::{Vehicle, VehicleUpdateResult};
use super::vehicle_manager;

/// What happened during one tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub tick: u64,
    pub arrivals: Vec<TripReport>,
    pub collisions: Vec<CollisionFault>,
    /// Vehicles removed because their update failed
    pub despawned_on_error: Vec<VehicleId>,
}

/// The main simulation world
pub struct SimWorld {
    pub map: Map,

    /// Intersection connectivity, used for trip reports and map checks
    pub graph: IntersectionGraph,

    /// All vehicles still on the map
    vehicles: BTreeMap<VehicleId, Vehicle>,

    pub stats: SimulationStats,

    config: SimConfig,

    /// Next ID to assign
    next_id: usize,

    /// Ticks run so far
    tick_count: u64,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl SimWorld {
    /// Create a world on a freshly generated map. Uses `config.seed` when set.
    pub fn new(config: SimConfig) -> Self {
        let mut rng = config.seed.map(StdRng::seed_from_u64);
        let map = match &mut rng {
            Some(rng) => Self::generate_map(&config, rng),
            None => Self::generate_map(&config, &mut rand::rng()),
        };
        Self::new_internal(map, config, rng)
    }

    /// Create a new SimWorld with a seeded RNG for reproducible simulations
    pub fn new_with_seed(mut config: SimConfig, seed: u64) -> Self {
        config.seed = Some(seed);
        Self::new(config)
    }

    /// Create a world on an existing map, e.g. one built with [`Map::from_rows`]
    pub fn from_map(map: Map, config: SimConfig) -> Self {
        let rng = config.seed.map(StdRng::seed_from_u64);
        Self::new_internal(map, config, rng)
    }

    fn generate_map(config: &SimConfig, rng: &mut impl rand::Rng) -> Map {
        Map::generate(
            config.width,
            config.height,
            config.block_length,
            &config.timing,
            rng,
        )
    }

    fn new_internal(map: Map, config: SimConfig, rng: Option<StdRng>) -> Self {
        let graph = IntersectionGraph::from_map(&map);
        if graph.component_count() > 1 {
            warn!(
                "Road network is split into {} disconnected parts; some trips cannot be routed",
                graph.component_count()
            );
        }

        let mut world = Self {
            map,
            graph,
            vehicles: BTreeMap::new(),
            stats: SimulationStats::default(),
            config,
            next_id: 0,
            tick_count: 0,
            rng,
        };

        for _ in 0..world.config.vehicles {
            if let Err(err) = world.spawn_vehicle() {
                warn!("Initial spawn failed: {:#}", err);
            }
        }
        world
    }

    fn random_road_tile(&mut self) -> SimResult<Coord> {
        match &mut self.rng {
            Some(rng) => self.map.random_road_tile(rng),
            None => self.map.random_road_tile(&mut rand::rng()),
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Vehicles on the map in id order
    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(&id)
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Spawn a vehicle between two random road tiles.
    ///
    /// A start whose lane is already taken, or a pair that cannot be routed, is
    /// redrawn a bounded number of times.
    pub fn spawn_vehicle(&mut self) -> Result<VehicleId> {
        for _ in 0..SPAWN_ATTEMPTS {
            let start = self.random_road_tile()?;
            let destination = self.random_road_tile()?;
            let id = VehicleId(SimId(self.next_id));

            match Vehicle::new(id, start, destination, &mut self.map) {
                Ok(vehicle) => {
                    self.next_id += 1;
                    self.vehicles.insert(id, vehicle);
                    self.stats.total_vehicles_spawned += 1;
                    return Ok(id);
                }
                Err(SimError::Collision(fault)) => {
                    debug!("Spawn rejected, start lane taken: {}", fault);
                }
                Err(err @ SimError::RoutingExhausted { .. }) => {
                    warn!("Spawn rejected: {}", err);
                }
                Err(err) => return Err(err).context("Failed to spawn vehicle"),
            }
        }
        bail!("No free start tile found after {} attempts", SPAWN_ATTEMPTS)
    }

    /// Spawn a vehicle with a fixed start and destination
    pub fn spawn_vehicle_at(&mut self, start: Coord, destination: Coord) -> Result<VehicleId> {
        let id = VehicleId(SimId(self.next_id));
        let vehicle = vehicle_manager::spawn_vehicle(id, start, destination, &mut self.map)?;
        self.next_id += 1;
        self.vehicles.insert(id, vehicle);
        self.stats.total_vehicles_spawned += 1;
        Ok(id)
    }

    /// Run one step of the simulation
    pub fn tick(&mut self) -> TickReport {
        self.tick_count += 1;
        self.stats.ticks = self.tick_count;

        match &mut self.rng {
            Some(rng) => self.map.update_traffic_lights(rng),
            None => self.map.update_traffic_lights(&mut rand::rng()),
        }

        let mut report = TickReport {
            tick: self.tick_count,
            ..TickReport::default()
        };

        let results = vehicle_manager::update_vehicles(&mut self.vehicles, &mut self.map);
        for (vehicle_id, result) in results {
            match result {
                Ok(VehicleUpdateResult::Continue) => {}
                Ok(VehicleUpdateResult::Arrived) => {
                    let Some(vehicle) =
                        vehicle_manager::despawn_vehicle(vehicle_id, &mut self.vehicles, &mut self.map)
                    else {
                        continue;
                    };
                    let trip = self.trip_report(&vehicle);
                    info!(
                        "{} arrived at {} after {} ticks, {} of them at red lights ({} stops)",
                        trip.vehicle,
                        trip.final_position,
                        trip.ticks_en_route,
                        trip.red_light_ticks,
                        trip.red_light_stops
                    );
                    self.stats.record_arrival(&trip);
                    report.arrivals.push(trip);
                }
                Ok(VehicleUpdateResult::Collision(fault)) => {
                    self.stats.collision_faults += 1;
                    report.collisions.push(fault);
                }
                Err(err) => {
                    error!("Despawning {}: {}", vehicle_id, err);
                    vehicle_manager::despawn_vehicle(vehicle_id, &mut self.vehicles, &mut self.map);
                    self.stats.vehicles_despawned += 1;
                    report.despawned_on_error.push(vehicle_id);
                }
            }
        }

        if self.config.respawn {
            for _ in 0..report.arrivals.len() + report.despawned_on_error.len() {
                if let Err(err) = self.spawn_vehicle() {
                    warn!("Respawn failed: {:#}", err);
                }
            }
        }

        report
    }

    fn trip_report(&self, vehicle: &Vehicle) -> TripReport {
        TripReport {
            vehicle: vehicle.id,
            start: vehicle.start(),
            destination: vehicle.destination(),
            final_position: vehicle.position(),
            ticks_en_route: vehicle.ticks_en_route(),
            red_light_ticks: vehicle.red_light_ticks(),
            red_light_stops: vehicle.red_light_stops(),
            route_tiles: vehicle.route_tiles(),
            optimal_tiles: self
                .graph
                .shortest_drive(&self.map, vehicle.start(), vehicle.destination()),
        }
    }

    /// Log the end-of-run statistics block
    pub fn log_final_stats(&self) {
        self.stats
            .log_summary(self.vehicles.len(), self.map.intersections().len());
    }

    /// Print a summary of the current simulation state
    pub fn print_summary(&self) {
        println!("=== Traffic Simulation Summary ===");
        println!("Tick: {}", self.tick_count);
        println!(
            "Map: {}x{}, road tiles: {}, intersections: {}, corridors: {}",
            self.map.width(),
            self.map.height(),
            self.map.road_tile_count(),
            self.graph.intersection_count(),
            self.graph.corridor_count()
        );
        println!(
            "Vehicles: {} active, {} spawned, {} arrived",
            self.vehicles.len(),
            self.stats.total_vehicles_spawned,
            self.stats.total_vehicles_arrived
        );

        if !self.vehicles.is_empty() {
            println!("--- Active Vehicles ---");
            for vehicle in self.vehicles.values() {
                println!(
                    "  {}: at {} heading {:?} to {}, {} waypoints left, red-light ticks={}",
                    vehicle.id,
                    vehicle.position(),
                    vehicle.direction(),
                    vehicle.destination(),
                    vehicle.route().len(),
                    vehicle.red_light_ticks()
                );
            }
        }
    }

    /// ASCII picture of the map with vehicles drawn on it
    pub fn render_ascii(&self) -> String {
        self.map.render_ascii()
    }

    /// Draw the map to stdout
    pub fn draw_map(&self) {
        print!("{}", self.render_ascii());
    }
}
