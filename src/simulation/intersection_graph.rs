//! Intersection graph built from the map's adjacency
//!
//! Vehicles never route over this graph; the world uses it to check that the city is
//! connected and to measure how far a greedy route strays from the shortest one.

use petgraph::algo::{astar, connected_components};
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

use super::map::Map;
use super::types::Coord;

/// Undirected graph with one node per intersection and one edge per straight road
/// corridor joining two adjacent intersections
#[derive(Debug, Default)]
pub struct IntersectionGraph {
    /// Edge weight is the corridor length in tiles
    graph: UnGraph<Coord, usize>,

    /// Maps intersection coordinates to their node indices in the graph
    nodes: HashMap<Coord, NodeIndex>,
}

impl IntersectionGraph {
    pub fn from_map(map: &Map) -> Self {
        let mut graph = UnGraph::default();
        let mut nodes = HashMap::new();

        for coord in map.intersections() {
            nodes.insert(*coord, graph.add_node(*coord));
        }

        for coord in map.intersections() {
            let from = nodes[coord];
            for neighbor in map.adjacent_intersections(*coord) {
                let to = nodes[&neighbor.coord()];
                // Each corridor is seen from both ends; keep one edge
                if from < to {
                    graph.add_edge(from, to, coord.manhattan(&neighbor.coord()));
                }
            }
        }

        Self { graph, nodes }
    }

    /// Get number of intersections
    pub fn intersection_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get number of corridors between intersections
    pub fn corridor_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of disconnected pieces of the road network
    pub fn component_count(&self) -> usize {
        connected_components(&self.graph)
    }

    /// Length in tiles of the shortest drive between two intersections, using A*
    /// with the Manhattan distance as heuristic
    pub fn shortest_distance(&self, from: Coord, to: Coord) -> Option<usize> {
        let start = *self.nodes.get(&from)?;
        let goal = *self.nodes.get(&to)?;
        let (cost, _) = astar(
            &self.graph,
            start,
            |node| node == goal,
            |edge| *edge.weight(),
            |node| self.graph[node].manhattan(&to),
        )?;
        Some(cost)
    }

    /// Length in tiles of the shortest drive between two road tiles. Each end joins
    /// the graph through the intersections bracketing it; ends sharing a straight
    /// stretch of road are measured directly.
    pub fn shortest_drive(&self, map: &Map, from: Coord, to: Coord) -> Option<usize> {
        if from == to {
            return Some(0);
        }
        if map.tiles_between(from, to).is_ok() {
            return Some(from.manhattan(&to));
        }

        let entries = |coord: Coord| -> Vec<Coord> {
            if map.is_intersection(coord) {
                vec![coord]
            } else {
                map.adjacent_intersections(coord)
                    .into_iter()
                    .map(|tile| tile.coord())
                    .collect()
            }
        };

        let exits = entries(to);
        entries(from)
            .into_iter()
            .flat_map(|entry| exits.iter().map(move |exit| (entry, *exit)))
            .filter_map(|(entry, exit)| {
                let between = self.shortest_distance(entry, exit)?;
                Some(from.manhattan(&entry) + between + exit.manhattan(&to))
            })
            .min()
    }
}
