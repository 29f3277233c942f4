//! Traffic light phase cycling

use gridlock::simulation::{Axis, Direction, LightColor, LightTiming, TrafficLight};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn fixed_timing() -> LightTiming {
    LightTiming {
        green: 10..=10,
        yellow: 3,
    }
}

#[test]
fn test_new_light_state() {
    let light = TrafficLight::new(Axis::Horizontal, 25, fixed_timing());
    assert_eq!(light.color(Axis::Horizontal), LightColor::Green);
    assert_eq!(light.color(Axis::Vertical), LightColor::Red);
    assert_eq!(light.light_for_direction_of_travel(Direction::Left), LightColor::Green);
    assert_eq!(light.light_for_direction_of_travel(Direction::Right), LightColor::Green);
    assert_eq!(light.light_for_direction_of_travel(Direction::Up), LightColor::Red);
    assert_eq!(light.time_until_change(Axis::Horizontal), Some(25));
    assert_eq!(light.time_until_change(Axis::Vertical), None);
}

#[test]
fn test_random_green_starts_vertical() {
    let mut rng = StdRng::seed_from_u64(5);
    let timing = LightTiming::default();
    let light = TrafficLight::with_random_green(timing.clone(), &mut rng);
    assert_eq!(light.color(Axis::Vertical), LightColor::Green);
    assert_eq!(light.color(Axis::Horizontal), LightColor::Red);
    let remaining = light.time_until_change(Axis::Vertical).expect("green has a timer");
    assert!(timing.green.contains(&remaining));
}

#[test]
fn test_full_cycle() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut light = TrafficLight::new(Axis::Vertical, 2, fixed_timing());

    // Timer runs 2 -> 1 -> 0, then the pair changes on the following tick
    light.change_lights_possibly(&mut rng);
    light.change_lights_possibly(&mut rng);
    assert_eq!(light.color(Axis::Vertical), LightColor::Green);
    assert_eq!(light.time_until_change(Axis::Vertical), Some(0));

    light.change_lights_possibly(&mut rng);
    assert_eq!(light.color(Axis::Vertical), LightColor::Yellow);
    assert_eq!(light.time_until_change(Axis::Vertical), Some(3));
    assert_eq!(light.color(Axis::Horizontal), LightColor::Red);

    for _ in 0..4 {
        light.change_lights_possibly(&mut rng);
    }
    assert_eq!(light.color(Axis::Vertical), LightColor::Red);
    assert_eq!(light.time_until_change(Axis::Vertical), None);
    assert_eq!(light.color(Axis::Horizontal), LightColor::Green);
    assert_eq!(light.time_until_change(Axis::Horizontal), Some(10));
}

#[test]
fn test_waiting_vehicles_shorten_green() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut light = TrafficLight::new(Axis::Vertical, 9, fixed_timing());
    light.register_waiting(Direction::Right);
    light.register_waiting(Direction::Left);
    assert_eq!(light.waiting_vehicles(Direction::Right), 1);
    assert_eq!(light.waiting_on(Axis::Horizontal), 2);

    light.change_lights_possibly(&mut rng);
    assert_eq!(light.time_until_change(Axis::Vertical), Some(6));
}

#[test]
fn test_waiting_resets_when_pair_changes() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut light = TrafficLight::new(Axis::Vertical, 0, fixed_timing());
    light.register_waiting(Direction::Right);

    let mut ticks = 0;
    while light.color(Axis::Horizontal) == LightColor::Red {
        light.change_lights_possibly(&mut rng);
        ticks += 1;
        assert!(ticks < 100, "horizontal pair never turned green");
    }
    assert_eq!(light.waiting_vehicles(Direction::Right), 0);
}

#[test]
fn test_pairs_stay_coupled() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut light = TrafficLight::with_random_green(LightTiming::default(), &mut rng);
    let mut saw_horizontal_green = false;
    let mut saw_vertical_yellow = false;

    for tick in 0..10_000 {
        if tick % 7 == 0 {
            light.register_waiting(Direction::Up);
        }
        light.change_lights_possibly(&mut rng);

        let up = light.light_for_direction_of_travel(Direction::Up);
        let down = light.light_for_direction_of_travel(Direction::Down);
        let left = light.light_for_direction_of_travel(Direction::Left);
        let right = light.light_for_direction_of_travel(Direction::Right);
        assert_eq!(up, down);
        assert_eq!(left, right);
        assert!(
            up == LightColor::Red || left == LightColor::Red,
            "both pairs open at tick {}",
            tick
        );

        saw_horizontal_green |= left == LightColor::Green;
        saw_vertical_yellow |= up == LightColor::Yellow;
    }

    assert!(saw_horizontal_green);
    assert!(saw_vertical_yellow);
}

#[test]
fn test_color_sequence() {
    assert_eq!(LightColor::Green.next(), LightColor::Yellow);
    assert_eq!(LightColor::Yellow.next(), LightColor::Red);
    assert_eq!(LightColor::Red.next(), LightColor::Green);
}
