//! Running totals for a simulation and the end-of-run report

use log::info;

use super::types::{Coord, VehicleId};

/// Summary of one completed trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripReport {
    pub vehicle: VehicleId,
    pub start: Coord,
    pub destination: Coord,
    pub final_position: Coord,
    pub ticks_en_route: u32,
    pub red_light_ticks: u32,
    pub red_light_stops: u32,
    /// Length of the planned greedy route
    pub route_tiles: usize,
    /// Shortest drive over the intersection graph, if the graph connects the two ends
    pub optimal_tiles: Option<usize>,
}

/// Simulation statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationStats {
    pub ticks: u64,
    pub total_vehicles_spawned: u32,
    pub total_vehicles_arrived: u32,
    /// Vehicles removed because their update failed
    pub vehicles_despawned: u32,
    pub collision_faults: u32,
    pub total_red_light_ticks: u64,
}

impl SimulationStats {
    pub fn record_arrival(&mut self, trip: &TripReport) {
        self.total_vehicles_arrived += 1;
        self.total_red_light_ticks += u64::from(trip.red_light_ticks);
    }

    /// Share of spawned vehicles that arrived, in percent
    pub fn success_rate(&self) -> f32 {
        if self.total_vehicles_spawned > 0 {
            (self.total_vehicles_arrived as f32 / self.total_vehicles_spawned as f32) * 100.0
        } else {
            0.0
        }
    }

    /// Mean ticks an arrived vehicle spent stopped at red lights
    pub fn average_red_light_wait(&self) -> f32 {
        if self.total_vehicles_arrived > 0 {
            self.total_red_light_ticks as f32 / self.total_vehicles_arrived as f32
        } else {
            0.0
        }
    }

    /// Log the final report
    pub fn log_summary(&self, active_vehicles: usize, intersections: usize) {
        info!("=== SIMULATION COMPLETE ===");
        info!("Ticks: {}", self.ticks);
        info!("Total vehicles spawned: {}", self.total_vehicles_spawned);
        info!("Total vehicles arrived: {}", self.total_vehicles_arrived);
        info!("Active vehicles: {}", active_vehicles);
        info!("Total intersections: {}", intersections);
        info!("Collision faults: {}", self.collision_faults);
        info!("Average red-light wait: {:.1} ticks", self.average_red_light_wait());
        info!("Success rate: {:.1}%", self.success_rate());
    }
}
