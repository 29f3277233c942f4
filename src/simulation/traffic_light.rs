//! Traffic light logic for the grid simulation
//!
//! Each intersection owns one light with four faces. Opposing faces always show the
//! same colour, so the light is really two coupled three-state machines: one for the
//! up/down pair and one for the left/right pair. Only one pair is ever non-red.

use log::debug;
use rand::Rng;

use super::config::LightTiming;
use super::types::{Axis, Direction};

/// Colour shown by one light face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightColor {
    Green,
    Yellow,
    Red,
}

impl LightColor {
    /// The colour that follows this one in the cycle
    pub fn next(self) -> LightColor {
        match self {
            LightColor::Green => LightColor::Yellow,
            LightColor::Yellow => LightColor::Red,
            LightColor::Red => LightColor::Green,
        }
    }
}

/// A traffic light at an intersection
///
/// Faces are named after the direction of travel they control: a vehicle heading
/// right looks at `right`.
#[derive(Debug, Clone)]
pub struct TrafficLight {
    up: LightColor,
    down: LightColor,
    left: LightColor,
    right: LightColor,
    /// Ticks until the up/down pair changes; `None` while red
    vertical_timer: Option<u32>,
    /// Ticks until the left/right pair changes; `None` while red
    horizontal_timer: Option<u32>,
    /// Vehicles waiting per direction of travel (indexed by `Direction::index`)
    waiting: [u32; 4],
    timing: LightTiming,
}

impl TrafficLight {
    /// Create a light whose `green_axis` pair is green for `green_ticks` and whose
    /// other pair is red.
    pub fn new(green_axis: Axis, green_ticks: u32, timing: LightTiming) -> Self {
        let mut light = Self {
            up: LightColor::Red,
            down: LightColor::Red,
            left: LightColor::Red,
            right: LightColor::Red,
            vertical_timer: None,
            horizontal_timer: None,
            waiting: [0; 4],
            timing,
        };
        light.set_pair(green_axis, LightColor::Green);
        *light.timer_mut(green_axis) = Some(green_ticks);
        light
    }

    /// Create a light with the up/down pair green for a random green duration
    pub fn with_random_green(timing: LightTiming, rng: &mut impl Rng) -> Self {
        let green_ticks = rng.random_range(timing.green.clone());
        Self::new(Axis::Vertical, green_ticks, timing)
    }

    /// The colour a vehicle travelling in `direction` must obey
    pub fn light_for_direction_of_travel(&self, direction: Direction) -> LightColor {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// The colour shown by a pair
    pub fn color(&self, axis: Axis) -> LightColor {
        match axis {
            Axis::Vertical => self.up,
            Axis::Horizontal => self.left,
        }
    }

    /// Ticks left before the pair changes, `None` while it waits on the other pair
    pub fn time_until_change(&self, axis: Axis) -> Option<u32> {
        match axis {
            Axis::Vertical => self.vertical_timer,
            Axis::Horizontal => self.horizontal_timer,
        }
    }

    /// Vehicles currently registered as waiting in `direction`
    pub fn waiting_vehicles(&self, direction: Direction) -> u32 {
        self.waiting[direction.index()]
    }

    /// Vehicles currently registered as waiting on either face of a pair
    pub fn waiting_on(&self, axis: Axis) -> u32 {
        axis.directions()
            .iter()
            .map(|direction| self.waiting_vehicles(*direction))
            .sum()
    }

    /// Record a vehicle stopping in front of this light. Vehicles call this once per
    /// stop, not once per tick.
    pub fn register_waiting(&mut self, direction: Direction) {
        self.waiting[direction.index()] += 1;
    }

    /// Advance the light by one tick.
    ///
    /// A running timer shrinks by one plus the number of vehicles queued on the
    /// perpendicular red pair, so busy cross streets get released sooner.
    pub fn change_lights_possibly(&mut self, rng: &mut impl Rng) {
        match self.vertical_timer {
            Some(0) => {
                self.advance(Axis::Vertical, rng);
                return;
            }
            Some(ticks) => {
                let step = 1 + self.waiting_on(Axis::Horizontal);
                self.vertical_timer = Some(ticks.saturating_sub(step));
            }
            None => {}
        }

        match self.horizontal_timer {
            Some(0) => self.advance(Axis::Horizontal, rng),
            Some(ticks) => {
                let step = 1 + self.waiting_on(Axis::Vertical);
                self.horizontal_timer = Some(ticks.saturating_sub(step));
            }
            None => {}
        }

        debug_assert_eq!(self.up, self.down);
        debug_assert_eq!(self.left, self.right);
    }

    /// Move `axis` to its next colour; turning red releases the other pair.
    fn advance(&mut self, axis: Axis, rng: &mut impl Rng) {
        let next = self.color(axis).next();
        self.set_pair(axis, next);

        if next == LightColor::Red {
            let other = axis.perpendicular();
            let released = self.color(other).next();
            self.set_pair(other, released);
            let released_ticks = self.duration(released, rng);
            *self.timer_mut(other) = released_ticks;
        }

        let ticks = self.duration(next, rng);
        *self.timer_mut(axis) = ticks;
        debug!("{:?} pair -> {:?}", axis, next);
    }

    fn duration(&self, color: LightColor, rng: &mut impl Rng) -> Option<u32> {
        match color {
            LightColor::Green => Some(rng.random_range(self.timing.green.clone())),
            LightColor::Yellow => Some(self.timing.yellow),
            // Red waits for the other pair to turn red
            LightColor::Red => None,
        }
    }

    fn set_pair(&mut self, axis: Axis, color: LightColor) {
        match axis {
            Axis::Vertical => {
                self.up = color;
                self.down = color;
            }
            Axis::Horizontal => {
                self.left = color;
                self.right = color;
            }
        }
        for direction in axis.directions() {
            self.waiting[direction.index()] = 0;
        }
    }

    fn timer_mut(&mut self, axis: Axis) -> &mut Option<u32> {
        match axis {
            Axis::Vertical => &mut self.vertical_timer,
            Axis::Horizontal => &mut self.horizontal_timer,
        }
    }
}
