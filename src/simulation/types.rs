//! Core types for the grid simulation
//!
//! Coordinates, directions and identifiers shared by the map, lights and vehicles.

use std::fmt;

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimId(pub usize);

/// A wrapper type for vehicle IDs
///
/// Ordered so that the world can update vehicles in spawn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VehicleId(pub SimId);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vehicle #{}", self.0 .0)
    }
}

/// A tile coordinate on the city grid
///
/// `x` grows to the right and `y` grows downwards, so `Up` means a smaller `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to another coordinate
    pub fn distance(&self, other: &Coord) -> f32 {
        distance(*self, *other)
    }

    /// Number of single-tile steps between two coordinates on a rectilinear grid
    pub fn manhattan(&self, other: &Coord) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The neighbouring coordinate in `direction`, or `None` when that would
    /// underflow. Upper bounds are checked by the map.
    pub fn step(&self, direction: Direction) -> Option<Coord> {
        match direction {
            Direction::Up => self.y.checked_sub(1).map(|y| Coord::new(self.x, y)),
            Direction::Down => Some(Coord::new(self.x, self.y + 1)),
            Direction::Left => self.x.checked_sub(1).map(|x| Coord::new(x, self.y)),
            Direction::Right => Some(Coord::new(self.x + 1, self.y)),
        }
    }

    /// Direction of travel from `self` towards `target` when the two share a row
    /// or a column. Returns `None` for equal or unaligned coordinates.
    pub fn direction_to(&self, target: &Coord) -> Option<Direction> {
        if self.x == target.x && self.y != target.y {
            Some(if target.y < self.y {
                Direction::Up
            } else {
                Direction::Down
            })
        } else if self.y == target.y && self.x != target.x {
            Some(if target.x < self.x {
                Direction::Left
            } else {
                Direction::Right
            })
        } else {
            None
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Euclidean distance between two grid coordinates
pub fn distance(start: Coord, finish: Coord) -> f32 {
    let dx = finish.x as f32 - start.x as f32;
    let dy = finish.y as f32 - start.y as f32;
    (dx * dx + dy * dy).sqrt()
}

/// Direction of travel on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Stable index used for per-direction arrays (lanes, waiting counters)
    pub fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    /// Arrow glyph used by the terminal map
    pub fn glyph(self) -> char {
        match self {
            Direction::Up => '^',
            Direction::Down => 'v',
            Direction::Left => '<',
            Direction::Right => '>',
        }
    }
}

/// One of the two road axes; also names a traffic-light pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The up/down pair
    Vertical,
    /// The left/right pair
    Horizontal,
}

impl Axis {
    pub fn perpendicular(self) -> Axis {
        match self {
            Axis::Vertical => Axis::Horizontal,
            Axis::Horizontal => Axis::Vertical,
        }
    }

    /// The two directions of travel along this axis
    pub fn directions(self) -> [Direction; 2] {
        match self {
            Axis::Vertical => [Direction::Up, Direction::Down],
            Axis::Horizontal => [Direction::Left, Direction::Right],
        }
    }
}
