//! The city map: a fixed grid of tiles and the intersection topology derived from it
//!
//! The map owns every tile and every traffic light. Vehicles only hold coordinates
//! and go through the map for anything they need to read or change.

use ordered_float::OrderedFloat;
use rand::seq::IndexedRandom;
use rand::Rng;

use super::config::LightTiming;
use super::error::{SimError, SimResult};
use super::tile::Tile;
use super::traffic_light::TrafficLight;
use super::types::{distance, Coord, Direction, VehicleId};

/// The city grid
#[derive(Debug, Clone)]
pub struct Map {
    width: usize,
    height: usize,
    /// Row-major tiles
    tiles: Vec<Tile>,
    /// Intersection coordinates in row-major order, derived once at construction
    intersections: Vec<Coord>,
    road_tiles: usize,
}

impl Map {
    /// Generate a city of square blocks.
    ///
    /// The grid is ringed by non-road buffer tiles, then by a ring of road. Inside
    /// that, every row and column whose index is a multiple of `block_length` is road.
    pub fn generate(
        width: usize,
        height: usize,
        block_length: usize,
        timing: &LightTiming,
        rng: &mut impl Rng,
    ) -> Self {
        Self::from_road_fn(
            width,
            height,
            |coord| {
                let on_buffer =
                    coord.x == 0 || coord.y == 0 || coord.x + 1 == width || coord.y + 1 == height;
                let on_ring =
                    coord.x == 1 || coord.y == 1 || coord.x + 2 == width || coord.y + 2 == height;
                let on_grid = block_length > 0
                    && (coord.x % block_length == 0 || coord.y % block_length == 0);
                !on_buffer && (on_ring || on_grid)
            },
            timing,
            rng,
        )
    }

    /// Build a map from explicit rows. `.` and `+` are road, anything else is not.
    /// Short rows are padded with non-road tiles.
    pub fn from_rows(rows: &[&str], timing: &LightTiming, rng: &mut impl Rng) -> Self {
        let grid: Vec<Vec<char>> = rows.iter().map(|row| row.chars().collect()).collect();
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        Self::from_road_fn(
            width,
            grid.len(),
            |coord| matches!(grid[coord.y].get(coord.x), Some('.') | Some('+')),
            timing,
            rng,
        )
    }

    /// Build a map where `is_road` decides each tile, then derive intersections and
    /// give each one a light.
    pub fn from_road_fn(
        width: usize,
        height: usize,
        is_road: impl Fn(Coord) -> bool,
        timing: &LightTiming,
        rng: &mut impl Rng,
    ) -> Self {
        let mut tiles = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let coord = Coord::new(x, y);
                tiles.push(Tile::new(coord, is_road(coord)));
            }
        }

        let mut map = Self {
            width,
            height,
            road_tiles: tiles.iter().filter(|tile| tile.is_road()).count(),
            tiles,
            intersections: Vec::new(),
        };

        map.intersections = map
            .tiles
            .iter()
            .filter(|tile| tile.is_road())
            .map(Tile::coord)
            .filter(|coord| {
                let vertical = map.road_ahead(map.tile_up(*coord)) || map.road_ahead(map.tile_down(*coord));
                let horizontal =
                    map.road_ahead(map.tile_left(*coord)) || map.road_ahead(map.tile_right(*coord));
                vertical && horizontal
            })
            .collect();

        for index in 0..map.intersections.len() {
            let coord = map.intersections[index];
            let light = TrafficLight::with_random_green(timing.clone(), rng);
            if let Ok(tile) = map.tile_at_mut(coord) {
                tile.install_light(light);
            }
        }

        map
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn road_tile_count(&self) -> usize {
        self.road_tiles
    }

    /// All tiles in row-major order (used for rendering)
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        (coord.x < self.width && coord.y < self.height).then(|| coord.y * self.width + coord.x)
    }

    fn out_of_bounds(&self, coord: Coord) -> SimError {
        SimError::OutOfBounds {
            coord,
            width: self.width,
            height: self.height,
        }
    }

    /// The tile at `coord`
    pub fn tile_at(&self, coord: Coord) -> SimResult<&Tile> {
        self.index(coord)
            .map(|i| &self.tiles[i])
            .ok_or_else(|| self.out_of_bounds(coord))
    }

    fn tile_at_mut(&mut self, coord: Coord) -> SimResult<&mut Tile> {
        match self.index(coord) {
            Some(i) => Ok(&mut self.tiles[i]),
            None => Err(self.out_of_bounds(coord)),
        }
    }

    /// The tile next to `coord` in `direction`, or `None` at the grid edge
    pub fn tile_in_direction(&self, coord: Coord, direction: Direction) -> Option<&Tile> {
        self.index(coord)?;
        let next = coord.step(direction)?;
        self.index(next).map(|i| &self.tiles[i])
    }

    pub fn tile_up(&self, coord: Coord) -> Option<&Tile> {
        self.tile_in_direction(coord, Direction::Up)
    }

    pub fn tile_down(&self, coord: Coord) -> Option<&Tile> {
        self.tile_in_direction(coord, Direction::Down)
    }

    pub fn tile_left(&self, coord: Coord) -> Option<&Tile> {
        self.tile_in_direction(coord, Direction::Left)
    }

    pub fn tile_right(&self, coord: Coord) -> Option<&Tile> {
        self.tile_in_direction(coord, Direction::Right)
    }

    fn road_ahead(&self, tile: Option<&Tile>) -> bool {
        tile.is_some_and(Tile::is_road)
    }

    /// Whether `coord` is inside the grid and a road tile
    pub fn is_road_at(&self, coord: Coord) -> bool {
        self.road_ahead(self.tile_at(coord).ok())
    }

    /// Pick a random road tile: choose a row, resample while the row has no road,
    /// then choose a road tile in that row.
    pub fn random_road_tile(&self, rng: &mut impl Rng) -> SimResult<Coord> {
        if self.road_tiles == 0 {
            return Err(SimError::NoRoadTiles);
        }
        loop {
            let y = rng.random_range(0..self.height);
            let row: Vec<&Tile> = self.tiles[y * self.width..(y + 1) * self.width]
                .iter()
                .filter(|tile| tile.is_road())
                .collect();
            if let Some(tile) = row.choose(rng) {
                return Ok(tile.coord());
            }
        }
    }

    /// Road tiles with a road neighbour on both axes, in row-major order
    pub fn intersections(&self) -> &[Coord] {
        &self.intersections
    }

    pub fn is_intersection(&self, coord: Coord) -> bool {
        self.tile_at(coord)
            .map(|tile| tile.light().is_some())
            .unwrap_or(false)
    }

    /// Intersections a vehicle at `coord` can reach without passing another one.
    ///
    /// From an intersection this is the nearest connected intersection in each of the
    /// four directions. From anywhere else it is the nearest intersection on each side
    /// along the road the tile lies on. Results come in ascending distance; equal
    /// distances keep row-major order.
    pub fn adjacent_intersections(&self, coord: Coord) -> Vec<&Tile> {
        let directions: &[Direction] = if self.is_intersection(coord) {
            &Direction::ALL
        } else if self.road_ahead(self.tile_up(coord)) || self.road_ahead(self.tile_down(coord)) {
            &[Direction::Up, Direction::Down]
        } else {
            &[Direction::Left, Direction::Right]
        };

        let mut candidates: Vec<Coord> = self
            .intersections
            .iter()
            .copied()
            .filter(|candidate| *candidate != coord)
            .collect();
        candidates.sort_by_key(|candidate| OrderedFloat(distance(coord, *candidate)));

        let mut taken = [false; 4];
        let mut adjacent = Vec::with_capacity(directions.len());
        for candidate in candidates {
            let Some(direction) = coord.direction_to(&candidate) else {
                continue;
            };
            if !directions.contains(&direction) || taken[direction.index()] {
                continue;
            }
            if self.tiles_between(coord, candidate).is_err() {
                continue;
            }
            taken[direction.index()] = true;
            if let Ok(tile) = self.tile_at(candidate) {
                adjacent.push(tile);
            }
            if adjacent.len() == directions.len() {
                break;
            }
        }
        adjacent
    }

    /// The tiles from `from` (exclusive) to `to` (inclusive) along a straight road.
    ///
    /// Fails with `InvalidRange` unless the two coordinates share exactly one axis and
    /// every tile walked over is road.
    pub fn tiles_between(&self, from: Coord, to: Coord) -> SimResult<Vec<&Tile>> {
        self.tile_at(from)?;
        self.tile_at(to)?;
        let invalid = || SimError::InvalidRange { from, to };
        let direction = from.direction_to(&to).ok_or_else(invalid)?;

        let mut tiles = Vec::with_capacity(from.manhattan(&to));
        let mut current = from;
        while current != to {
            let tile = self
                .tile_in_direction(current, direction)
                .filter(|tile| tile.is_road())
                .ok_or_else(invalid)?;
            current = tile.coord();
            tiles.push(tile);
        }
        Ok(tiles)
    }

    /// The last road tile reached by driving straight from `coord` in `direction`
    pub fn corridor_end(&self, coord: Coord, direction: Direction) -> Coord {
        let mut current = coord;
        while let Some(next) = self
            .tile_in_direction(current, direction)
            .filter(|tile| tile.is_road())
        {
            current = next.coord();
        }
        current
    }

    /// Place a vehicle in the lane for `direction` on the tile at `coord`
    pub fn occupy(&mut self, coord: Coord, direction: Direction, vehicle: VehicleId) -> SimResult<()> {
        self.tile_at_mut(coord)?.add_vehicle(vehicle, direction)
    }

    /// Remove a vehicle from the lane for `direction` on the tile at `coord`
    pub fn vacate(&mut self, coord: Coord, direction: Direction, vehicle: VehicleId) -> SimResult<()> {
        self.tile_at_mut(coord)?.remove_vehicle(vehicle, direction)
    }

    /// Move a vehicle between lanes in one step. The target lane is claimed first;
    /// if either half fails nothing changes.
    pub fn move_occupant(
        &mut self,
        vehicle: VehicleId,
        from: (Coord, Direction),
        to: (Coord, Direction),
    ) -> SimResult<()> {
        self.occupy(to.0, to.1, vehicle)?;
        if let Err(err) = self.vacate(from.0, from.1, vehicle) {
            self.vacate(to.0, to.1, vehicle)?;
            return Err(err);
        }
        Ok(())
    }

    pub fn light(&self, coord: Coord) -> Option<&TrafficLight> {
        self.tile_at(coord).ok()?.light()
    }

    pub fn light_mut(&mut self, coord: Coord) -> Option<&mut TrafficLight> {
        self.tile_at_mut(coord).ok()?.light_mut()
    }

    /// Replace the light of an intersection. Used to stage scenarios.
    pub fn set_light(&mut self, coord: Coord, light: TrafficLight) -> SimResult<()> {
        match self.light_mut(coord) {
            Some(existing) => {
                *existing = light;
                Ok(())
            }
            None => Err(SimError::NoLight(coord)),
        }
    }

    /// Count a vehicle as waiting at the light on `coord`. Returns false when the
    /// tile has no light.
    pub fn register_waiting(&mut self, coord: Coord, direction: Direction) -> bool {
        match self.light_mut(coord) {
            Some(light) => {
                light.register_waiting(direction);
                true
            }
            None => false,
        }
    }

    /// Advance every traffic light by one tick
    pub fn update_traffic_lights(&mut self, rng: &mut impl Rng) {
        for light in self.tiles.iter_mut().filter_map(Tile::light_mut) {
            light.change_lights_possibly(rng);
        }
    }

    /// Render the map as text: `#` building, `.` road, `+` intersection, arrows for
    /// vehicles (by direction of travel) and `*` for tiles holding several vehicles.
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.tiles.chunks(self.width.max(1)) {
            for tile in row {
                let mut occupants = tile.occupants();
                let glyph = match (occupants.next(), occupants.next()) {
                    (Some(_), Some(_)) => '*',
                    (Some((direction, _)), None) => direction.glyph(),
                    _ if tile.light().is_some() => '+',
                    _ if tile.is_road() => '.',
                    _ => '#',
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}
