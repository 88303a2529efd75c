//! Integration tests for the nearest-level search

use flashlight_ui::{RampProfile, SearchStrategy, nearest_level, nearest_level_with};

fn grid_point(floor: u8, ceil: u8, steps: u8, i: u16) -> u8 {
    (floor as u16 + i * (ceil - floor) as u16 / (steps as u16 - 1)) as u8
}

#[test]
fn continuous_ramp_is_a_clamp() {
    for floor in (0u8..=200).step_by(20) {
        for ceil in (floor..=255).step_by(17) {
            for target in -10i16..=300 {
                let expected = target.clamp(floor as i16, ceil as i16) as u8;
                assert_eq!(nearest_level(target, floor, ceil, 0), expected);
            }
        }
    }
}

#[test]
fn single_step_ramp_is_the_midpoint() {
    for target in [-5i16, 0, 1, 50, 149, 150, 400] {
        assert_eq!(nearest_level(target, 1, 150, 1), 75);
        assert_eq!(nearest_level(target, 10, 11, 1), 10);
    }
}

/// The firmware's linear scan, kept as literal as Rust allows.
fn firmware_scan(target: i16, floor: u8, ceil: u8, steps: u8) -> u8 {
    if steps == 1 {
        return ((ceil as u16 + floor as u16) >> 1) as u8;
    }
    if target >= ceil as i16 {
        return ceil;
    }
    if target <= floor as i16 {
        return floor;
    }
    if steps == 0 {
        return target as u8;
    }

    let ramp_range = ceil - floor;
    let step_radius = (ramp_range / (steps - 1)) >> 1;
    let mut guess = floor;
    for i in 0..steps {
        guess = (floor as u16 + (i as u16 * ramp_range as u16 / (steps as u16 - 1))) as u8;
        let mut diff = target - guess as i16;
        if diff < 0 {
            diff = -diff;
        }
        if diff <= step_radius as i16 {
            return guess;
        }
    }
    guess
}

#[test]
fn matches_the_firmware_scan() {
    for floor in (0u8..=60).step_by(3) {
        for ceil in floor..=255 {
            for steps in 0u8..=12 {
                for target in (floor as i16 - 1)..=(ceil as i16 + 1) {
                    let expected = firmware_scan(target, floor, ceil, steps);
                    for strategy in SearchStrategy::ALL {
                        assert_eq!(
                            nearest_level_with(strategy, target, floor, ceil, steps),
                            expected,
                            "{:?} target {} on {}..{} / {}",
                            strategy,
                            target,
                            floor,
                            ceil,
                            steps
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn default_simple_ramp_gap_midpoints() {
    // grid 25, 48, 72, 96, 120; radius 11
    assert_eq!(nearest_level(59, 25, 120, 5), 48);
    assert_eq!(nearest_level(60, 25, 120, 5), 120);
    assert_eq!(nearest_level(61, 25, 120, 5), 72);
    assert_eq!(nearest_level(84, 25, 120, 5), 120);
    assert_eq!(nearest_level(85, 25, 120, 5), 96);
}

#[test]
fn result_is_a_grid_point_near_the_target() {
    for floor in (0u8..=120).step_by(7) {
        for ceil in (floor..=255).step_by(11) {
            for steps in 2u8..=20 {
                let radius = ((ceil - floor) / (steps - 1)) as i16 >> 1;
                for target in floor as i16..=ceil as i16 {
                    let level = nearest_level(target, floor, ceil, steps);

                    let on_grid = (0..steps as u16).any(|i| grid_point(floor, ceil, steps, i) == level);
                    assert!(on_grid, "{} not on grid {}..{} / {}", level, floor, ceil, steps);

                    // gap midpoints fall through to the ceiling
                    let distance = (level as i16 - target).abs();
                    assert!(
                        distance <= radius || level == ceil,
                        "{} too far from {} on grid {}..{} / {}",
                        level,
                        target,
                        floor,
                        ceil,
                        steps
                    );
                }
            }
        }
    }
}

#[test]
fn out_of_range_targets_clamp_to_the_ends() {
    for strategy in SearchStrategy::ALL {
        assert_eq!(nearest_level_with(strategy, -100, 20, 120, 7), 20);
        assert_eq!(nearest_level_with(strategy, 20, 20, 120, 7), 20);
        assert_eq!(nearest_level_with(strategy, 120, 20, 120, 7), 120);
        assert_eq!(nearest_level_with(strategy, 1000, 20, 120, 7), 120);
    }
}

#[test]
fn strategies_agree_across_full_range_ramps() {
    for (floor, ceil) in [(1u8, 150u8), (0, 255), (20, 120), (1, 254), (100, 101)] {
        for steps in 0u8..=255 {
            for target in (floor as i16 - 2)..=(ceil as i16 + 2) {
                let reference = nearest_level(target, floor, ceil, steps);
                for strategy in SearchStrategy::ALL {
                    assert_eq!(
                        nearest_level_with(strategy, target, floor, ceil, steps),
                        reference,
                        "{:?} target {} on {}..{} / {}",
                        strategy,
                        target,
                        floor,
                        ceil,
                        steps
                    );
                }
            }
        }
    }
}

#[test]
fn two_tint_steps_snap_to_the_ends() {
    // tint ramp: floor 1, ceiling 254
    assert_eq!(nearest_level(100, 1, 254, 2), 1);
    assert_eq!(nearest_level(127, 1, 254, 2), 1);
    assert_eq!(nearest_level(128, 1, 254, 2), 254);
    assert_eq!(nearest_level(200, 1, 254, 2), 254);
}

#[test]
fn ramp_profile_steps_by_whole_grid_gaps() {
    let stepped = RampProfile::new(20, 120, 7);
    let mut level = stepped.floor;
    let mut seen = heapless::Vec::<u8, 8>::new();
    seen.push(level).unwrap();
    while level < stepped.ceil {
        level = stepped.nearest(level as i16 + stepped.step_size() as i16);
        seen.push(level).unwrap();
    }
    assert_eq!(seen.as_slice(), &[20, 36, 53, 70, 86, 103, 120]);
}
