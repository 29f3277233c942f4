//! Greedy route planning
//!
//! The grid is perfectly rectilinear, so vehicles do not run a shortest-path search.
//! They hop from intersection to neighbouring intersection, always towards the
//! destination, and peel off as soon as the destination sits on the road segment
//! ahead of them.

use std::collections::VecDeque;

use log::debug;
use ordered_float::OrderedFloat;

use super::error::{SimError, SimResult};
use super::map::Map;
use super::types::{Coord, Direction};

/// Plan the waypoints a vehicle follows from `start` to `destination`.
///
/// The route starts with the nearest intersection (or `start` itself when it is one)
/// and always ends with `destination`. Consecutive waypoints share a row or column.
pub fn plan_route(map: &Map, start: Coord, destination: Coord) -> SimResult<VecDeque<Coord>> {
    map.tile_at(start)?;
    map.tile_at(destination)?;
    let exhausted = || SimError::RoutingExhausted { start, destination };

    if start == destination {
        return Ok(VecDeque::from([destination]));
    }

    let first = if map.is_intersection(start) {
        start
    } else {
        map.adjacent_intersections(start)
            .into_iter()
            .map(|tile| tile.coord())
            .min_by_key(|coord| OrderedFloat(start.distance(coord)))
            .ok_or_else(exhausted)?
    };

    let mut route = VecDeque::from([first]);
    let mut current = first;

    // Each iteration appends a waypoint never seen before, so the intersection count
    // bounds the loop.
    for _ in 0..=map.intersections().len() {
        if current == destination {
            debug!("Planned {} waypoints from {} to {}", route.len(), start, destination);
            return Ok(route);
        }

        let next = next_waypoint(map, current, destination).ok_or_else(exhausted)?;
        if route.contains(&next) {
            return Err(exhausted());
        }
        route.push_back(next);
        current = next;
    }

    if current == destination {
        Ok(route)
    } else {
        Err(exhausted())
    }
}

/// The waypoint after `current`: the destination if it lies on a segment leaving
/// `current`, otherwise the neighbouring intersection closest to it.
fn next_waypoint(map: &Map, current: Coord, destination: Coord) -> Option<Coord> {
    let neighbors: Vec<Coord> = map
        .adjacent_intersections(current)
        .into_iter()
        .map(|tile| tile.coord())
        .collect();

    if neighbors
        .iter()
        .any(|neighbor| strictly_between(current, destination, *neighbor))
    {
        return Some(destination);
    }

    // Dead-end corridors have no intersection to bracket the destination; the end of
    // the road stands in for one (inclusive, the destination may be the last tile).
    for direction in Direction::ALL {
        let has_neighbor = neighbors
            .iter()
            .any(|neighbor| current.direction_to(neighbor) == Some(direction));
        if has_neighbor || current.direction_to(&destination) != Some(direction) {
            continue;
        }
        let end = map.corridor_end(current, direction);
        if end == destination || strictly_between(current, destination, end) {
            return Some(destination);
        }
    }

    let mut closest: Option<(Coord, f32)> = None;
    for neighbor in neighbors {
        let remaining = neighbor.distance(&destination);
        if closest.map_or(true, |(_, best)| remaining < best) {
            closest = Some((neighbor, remaining));
        }
    }
    closest.map(|(coord, _)| coord)
}

/// Whether `point` lies strictly between `a` and `b` on the row or column all three
/// share.
fn strictly_between(a: Coord, point: Coord, b: Coord) -> bool {
    let within = |lo: usize, mid: usize, hi: usize| (lo < mid && mid < hi) || (hi < mid && mid < lo);
    if a.y == point.y && b.y == point.y {
        within(a.x, point.x, b.x)
    } else if a.x == point.x && b.x == point.x {
        within(a.y, point.y, b.y)
    } else {
        false
    }
}

/// Number of single-tile moves needed to drive `start` and then every waypoint in order
pub fn route_length(start: Coord, route: &VecDeque<Coord>) -> usize {
    route
        .iter()
        .fold((start, 0), |(previous, total), waypoint| {
            (*waypoint, total + previous.manhattan(waypoint))
        })
        .1
}
