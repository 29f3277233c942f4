//! Greedy route planning over generated and hand-built maps

use std::collections::VecDeque;

use gridlock::simulation::{plan_route, route_length, Coord, LightTiming, Map, SimError};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn generated_map(width: usize, height: usize) -> Map {
    let mut rng = StdRng::seed_from_u64(3);
    Map::generate(width, height, 24, &LightTiming::default(), &mut rng)
}

fn route(coords: &[(usize, usize)]) -> VecDeque<Coord> {
    coords.iter().map(|(x, y)| Coord::new(*x, *y)).collect()
}

#[test]
fn test_route_across_blocks() {
    let map = generated_map(50, 50);
    let planned = plan_route(&map, Coord::new(24, 10), Coord::new(30, 48)).expect("routable");
    assert_eq!(planned, route(&[(24, 1), (24, 24), (24, 48), (30, 48)]));
    assert_eq!(route_length(Coord::new(24, 10), &planned), 9 + 23 + 24 + 6);
}

#[test]
fn test_destination_between_waypoints_is_appended() {
    let map = generated_map(50, 50);
    let planned = plan_route(&map, Coord::new(24, 10), Coord::new(24, 20)).expect("routable");
    // Nearest intersection first, then straight back to the destination
    assert_eq!(planned, route(&[(24, 24), (24, 20)]));
    assert_eq!(planned.back(), Some(&Coord::new(24, 20)));
}

#[test]
fn test_route_to_intersection() {
    let map = generated_map(50, 50);
    let planned = plan_route(&map, Coord::new(24, 10), Coord::new(48, 24)).expect("routable");
    assert_eq!(planned, route(&[(24, 1), (48, 1), (48, 24)]));
}

#[test]
fn test_route_from_intersection() {
    let map = generated_map(50, 50);
    let planned = plan_route(&map, Coord::new(24, 24), Coord::new(40, 48)).expect("routable");
    assert_eq!(planned.front(), Some(&Coord::new(24, 24)));
    assert_eq!(planned, route(&[(24, 24), (24, 48), (40, 48)]));
}

#[test]
fn test_route_to_self() {
    let map = generated_map(50, 50);
    let planned = plan_route(&map, Coord::new(30, 24), Coord::new(30, 24)).expect("routable");
    assert_eq!(planned, route(&[(30, 24)]));
}

#[test]
fn test_routes_follow_roads() {
    let map = generated_map(120, 90);
    let mut rng = StdRng::seed_from_u64(17);

    for _ in 0..300 {
        let start = map.random_road_tile(&mut rng).expect("road");
        let destination = map.random_road_tile(&mut rng).expect("road");
        let planned = plan_route(&map, start, destination)
            .unwrap_or_else(|err| panic!("{} -> {}: {}", start, destination, err));

        assert_eq!(planned.back(), Some(&destination));
        let mut previous = start;
        for waypoint in &planned {
            if *waypoint != previous {
                assert!(
                    map.tiles_between(previous, *waypoint).is_ok(),
                    "{} -> {} leaves the road",
                    previous,
                    waypoint
                );
            }
            previous = *waypoint;
        }
    }
}

#[test]
fn test_dead_end_corridor() {
    // One crossing at (2,2); every arm ends at the grid edge
    let mut rng = StdRng::seed_from_u64(1);
    let map = Map::from_rows(
        &["##.##", "##.##", ".....", "##.##", "##.##"],
        &LightTiming::default(),
        &mut rng,
    );
    let planned = plan_route(&map, Coord::new(2, 0), Coord::new(2, 4)).expect("routable");
    assert_eq!(planned, route(&[(2, 2), (2, 4)]));

    let planned = plan_route(&map, Coord::new(0, 2), Coord::new(2, 3)).expect("routable");
    assert_eq!(planned, route(&[(2, 2), (2, 3)]));
}

#[test]
fn test_unroutable_map() {
    let mut rng = StdRng::seed_from_u64(1);
    let map = Map::from_rows(&[".....", "#####", "....."], &LightTiming::default(), &mut rng);
    assert_eq!(
        plan_route(&map, Coord::new(0, 0), Coord::new(4, 2)),
        Err(SimError::RoutingExhausted {
            start: Coord::new(0, 0),
            destination: Coord::new(4, 2),
        })
    );
}

#[test]
fn test_route_out_of_bounds() {
    let map = generated_map(50, 50);
    assert!(matches!(
        plan_route(&map, Coord::new(24, 10), Coord::new(500, 3)),
        Err(SimError::OutOfBounds { .. })
    ));
}
