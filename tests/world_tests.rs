//! World-level behaviour: spawning, ticking, reports and determinism

use gridlock::simulation::{
    Axis, Coord, Direction, LightTiming, Map, SimConfig, SimWorld, TrafficLight,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn small_config(vehicles: usize) -> SimConfig {
    SimConfig {
        width: 50,
        height: 50,
        vehicles,
        ..SimConfig::default()
    }
}

fn crossing_world(green_axis: Axis) -> SimWorld {
    let mut rng = StdRng::seed_from_u64(1);
    let timing = LightTiming::default();
    let mut map = Map::from_road_fn(
        25,
        25,
        |coord| coord.x == 12 || coord.y == 12,
        &timing,
        &mut rng,
    );
    map.set_light(Coord::new(12, 12), TrafficLight::new(green_axis, 1000, timing))
        .expect("crossing has a light");
    SimWorld::from_map(
        map,
        SimConfig {
            vehicles: 0,
            seed: Some(7),
            ..SimConfig::default()
        },
    )
}

#[test]
fn test_default_world_spawns_all_vehicles() {
    let world = SimWorld::new_with_seed(SimConfig::default(), 42);
    assert_eq!(world.vehicle_count(), 31);
    assert_eq!(world.stats.total_vehicles_spawned, 31);
    assert_eq!(world.map.width(), 120);
    assert_eq!(world.map.height(), 90);
    assert_eq!(world.graph.component_count(), 1);
    assert_eq!(
        world.graph.intersection_count(),
        world.map.intersections().len()
    );
}

#[test]
fn test_seeded_worlds_match() {
    let mut a = SimWorld::new_with_seed(small_config(10), 1234);
    let mut b = SimWorld::new_with_seed(small_config(10), 1234);

    for _ in 0..300 {
        let report_a = a.tick();
        let report_b = b.tick();
        assert_eq!(report_a.arrivals, report_b.arrivals);
    }

    let positions = |world: &SimWorld| -> Vec<(Coord, Coord)> {
        world
            .vehicles()
            .map(|vehicle| (vehicle.position(), vehicle.destination()))
            .collect()
    };
    assert_eq!(positions(&a), positions(&b));
    assert_eq!(a.stats, b.stats);
    assert_eq!(a.render_ascii(), b.render_ascii());
}

#[test]
fn test_vehicles_update_in_id_order() {
    let world = SimWorld::new_with_seed(small_config(10), 5);
    let ids: Vec<_> = world.vehicles().map(|vehicle| vehicle.id).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

#[test]
fn test_trip_reports() {
    let mut world = SimWorld::new_with_seed(small_config(12), 77);
    let mut arrivals = Vec::new();
    for _ in 0..1500 {
        let report = world.tick();
        assert!(report.collisions.is_empty());
        assert!(report.despawned_on_error.is_empty());
        arrivals.extend(report.arrivals);
    }

    assert_eq!(arrivals.len(), 12);
    assert_eq!(world.vehicle_count(), 0);
    assert_eq!(world.stats.total_vehicles_arrived, 12);
    assert!((world.stats.success_rate() - 100.0).abs() < f32::EPSILON);

    for trip in &arrivals {
        assert_eq!(trip.final_position, trip.destination);
        let optimal = trip.optimal_tiles.expect("grid is connected");
        assert!(optimal <= trip.route_tiles, "{:?}", trip);
    }

    let total_red: u64 = arrivals.iter().map(|trip| u64::from(trip.red_light_ticks)).sum();
    assert_eq!(world.stats.total_red_light_ticks, total_red);
}

#[test]
fn test_arrived_vehicle_leaves_map() {
    let mut world = crossing_world(Axis::Vertical);
    let id = world
        .spawn_vehicle_at(Coord::new(12, 0), Coord::new(12, 5))
        .expect("spawn on road");

    let mut arrived_at = None;
    for _ in 0..10 {
        let report = world.tick();
        if let Some(trip) = report.arrivals.first() {
            arrived_at = Some(report.tick);
            assert_eq!(trip.vehicle, id);
            assert_eq!(trip.ticks_en_route, 5);
            assert_eq!(trip.red_light_ticks, 0);
            assert_eq!(trip.optimal_tiles, Some(5));
        }
    }

    assert_eq!(arrived_at, Some(5));
    assert!(world.vehicle(id).is_none());
    assert!(world.map.tiles().all(|tile| !tile.is_occupied()));
}

#[test]
fn test_perpendicular_approach() {
    let mut world = crossing_world(Axis::Vertical);
    let vertical = world
        .spawn_vehicle_at(Coord::new(12, 10), Coord::new(12, 20))
        .expect("spawn on road");
    let horizontal = world
        .spawn_vehicle_at(Coord::new(10, 12), Coord::new(20, 12))
        .expect("spawn on road");

    for _ in 0..20 {
        world.tick();
    }

    assert!(world.vehicle(vertical).is_none());
    assert_eq!(world.stats.total_vehicles_arrived, 1);

    let waiting = world.vehicle(horizontal).expect("still waiting");
    assert_eq!(waiting.position(), Coord::new(11, 12));
    assert_eq!(waiting.red_light_stops(), 1);
    let light = world.map.light(Coord::new(12, 12)).expect("crossing has a light");
    assert_eq!(light.waiting_on(Axis::Horizontal), 1);
}

#[test]
fn test_spawn_at_rejects_bad_tiles() {
    let mut world = crossing_world(Axis::Vertical);
    assert!(world.spawn_vehicle_at(Coord::new(3, 3), Coord::new(12, 5)).is_err());
    assert!(world.spawn_vehicle_at(Coord::new(12, 0), Coord::new(99, 5)).is_err());

    world
        .spawn_vehicle_at(Coord::new(12, 0), Coord::new(12, 5))
        .expect("spawn on road");
    // Same lane on the same tile
    assert!(world.spawn_vehicle_at(Coord::new(12, 0), Coord::new(12, 8)).is_err());
    assert_eq!(world.vehicle_count(), 1);
    assert_eq!(world.stats.total_vehicles_spawned, 1);
}

#[test]
fn test_respawn_keeps_population() {
    let mut config = small_config(15);
    config.respawn = true;
    let mut world = SimWorld::new_with_seed(config, 9);

    let mut arrivals = 0;
    for _ in 0..600 {
        arrivals += world.tick().arrivals.len();
    }

    assert!(arrivals > 0);
    assert_eq!(world.vehicle_count(), 15);
    assert_eq!(world.stats.total_vehicles_spawned as usize, 15 + arrivals);
}

#[test]
fn test_render_shows_vehicles() {
    let mut world = crossing_world(Axis::Horizontal);
    world
        .spawn_vehicle_at(Coord::new(0, 12), Coord::new(20, 12))
        .expect("spawn on road");
    let rendered = world.render_ascii();
    let row: Vec<char> = rendered.lines().nth(12).expect("row 12").chars().collect();
    assert_eq!(row[0], '>');
    assert_eq!(row[12], '+');
    assert_eq!(row[13], '.');
    assert!(rendered.starts_with('#'));
}

#[test]
fn test_collision_is_reported_by_tick() {
    let mut world = crossing_world(Axis::Vertical);
    let start = Coord::new(12, 0);
    let id = world
        .spawn_vehicle_at(start, Coord::new(12, 5))
        .expect("spawn on road");
    world
        .map
        .vacate(start, Direction::Down, id)
        .expect("vehicle holds its lane");

    let report = world.tick();
    assert_eq!(report.collisions.len(), 1);
    assert_eq!(report.collisions[0].vehicle, id);
    assert!(report.arrivals.is_empty());
    assert!(report.despawned_on_error.is_empty());
    assert_eq!(world.stats.collision_faults, 1);

    let vehicle = world.vehicle(id).expect("vehicle stays in the world");
    assert_eq!(vehicle.position(), start);
}
