//! Integration tests for the tint ramping layer

mod common;
use common::*;

use flashlight_ui::{Direction, Event, EventResult, RampStyle, Settings, StateId, TINT_MIDDLE};

fn light_with_tint(tint: u8) -> TestLight {
    light_with_settings(Settings {
        tint,
        ..Settings::default()
    })
}

#[test]
fn tint_is_applied_at_startup() {
    let light = light_with_tint(200);
    assert_eq!(light.driver().tint(), 200);
}

#[test]
fn four_hold_ramps_toward_high_end() {
    let mut light = light_with_tint(1);
    assert_eq!(light.tint_ramp_direction(), Direction::Down);

    hold_frames(&mut light, 4, 0..1);
    assert_eq!(light.tint_ramp_direction(), Direction::Up);
    assert_eq!(light.settings().tint, 2);

    hold_frames(&mut light, 4, 1..253);
    assert_eq!(light.settings().tint, 254);
    assert_eq!(light.driver().tint(), 254);
}

#[test]
fn holding_past_the_edge_reaches_the_boundary_once() {
    let mut light = light_with_tint(1);
    turn_on(&mut light, 60);
    light.driver_mut().clear_history();

    hold_frames(&mut light, 4, 0..317);
    assert_eq!(light.settings().tint, 254);
    assert!(light.driver().blipped());

    hold_frames(&mut light, 4, 317..318);
    assert_eq!(light.settings().tint, 255);

    hold_frames(&mut light, 4, 318..400);
    assert_eq!(light.settings().tint, 255);
    assert_eq!(light.driver().tint(), 255);
}

#[test]
fn hold_starting_at_the_edge_stalls_from_the_first_frame() {
    let mut light = light_with_tint(1);
    turn_on(&mut light, 60);
    hold(&mut light, 4, 260);
    assert_eq!(light.settings().tint, 254);
    light.driver_mut().clear_history();

    hold_frames(&mut light, 4, 0..1);
    assert!(light.driver().blipped());

    // one frame sooner than a gesture that has to reach the end first
    hold_frames(&mut light, 4, 1..64);
    assert_eq!(light.settings().tint, 254);
    hold_frames(&mut light, 4, 64..65);
    assert_eq!(light.settings().tint, 255);
}

#[test]
fn release_reverses_and_saves_position() {
    let mut light = new_light();
    hold(&mut light, 3, 10);
    assert_eq!(light.settings().tint, TINT_MIDDLE - 10);
    assert_eq!(light.tint_ramp_direction(), Direction::Up);
    assert_eq!(light.store().position_saves, 1);
    assert_eq!(
        light.store().last_position.map(|p| p.tint),
        Some(TINT_MIDDLE - 10)
    );

    hold(&mut light, 3, 4);
    assert_eq!(light.settings().tint, TINT_MIDDLE - 6);
    assert_eq!(light.tint_ramp_direction(), Direction::Down);
}

#[test]
fn four_hold_release_always_reverses() {
    let mut settings = Settings::default();
    settings.hold_style_pinned = true;
    let mut light = light_with_settings(settings);

    hold(&mut light, 4, 5);
    assert_eq!(light.tint_ramp_direction(), Direction::Down);

    hold(&mut light, 3, 5);
    assert_eq!(light.tint_ramp_direction(), Direction::Down);
    assert_eq!(light.settings().tint, TINT_MIDDLE);
}

#[test]
fn high_end_turns_a_three_hold_around() {
    let mut light = light_with_tint(254);
    hold_frames(&mut light, 3, 0..1);
    assert_eq!(light.tint_ramp_direction(), Direction::Down);
    assert_eq!(light.settings().tint, 253);
}

#[test]
fn five_clicks_toggle_neutral() {
    let mut light = light_with_tint(200);

    assert_eq!(click(&mut light, 5), EventResult::Handled);
    assert_eq!(light.settings().tint, TINT_MIDDLE);
    assert_eq!(light.driver().tint(), TINT_MIDDLE);

    click(&mut light, 5);
    assert_eq!(light.settings().tint, 200);
    assert_eq!(light.store().position_saves, 2);
}

#[test]
fn stale_hold_frames_are_ignored() {
    let mut light = new_light();
    // a hold that started as something else
    send(&mut light, Event::Hold(3), 5);
    assert_eq!(light.settings().tint, TINT_MIDDLE);
}

#[test]
fn stepped_tint_with_two_steps_toggles_ends() {
    let settings = Settings {
        tint_style: RampStyle::Stepped,
        ..Settings::default()
    };
    let mut light = light_with_settings(settings);

    hold_frames(&mut light, 3, 0..1);
    assert_eq!(light.settings().tint, 1);

    // stuck at the end: no change, no falling off the edge
    hold_frames(&mut light, 3, 1..100);
    assert_eq!(light.settings().tint, 1);
    send(&mut light, Event::HoldRelease(3), 0);

    hold_frames(&mut light, 3, 0..1);
    assert_eq!(light.settings().tint, 254);
}

#[test]
fn stepped_tint_moves_once_per_hold_timeout() {
    let settings = Settings {
        tint: 1,
        tint_style: RampStyle::Stepped,
        tint_steps: 5,
        ..Settings::default()
    };
    let mut light = light_with_settings(settings);

    hold_frames(&mut light, 4, 0..24);
    assert_eq!(light.settings().tint, 64);
    hold_frames(&mut light, 4, 24..25);
    assert_eq!(light.settings().tint, 127);
}

#[test]
fn tint_ramps_under_the_steady_state() {
    let mut light = new_light();
    turn_on(&mut light, 60);

    hold(&mut light, 3, 5);
    assert_eq!(light.settings().tint, TINT_MIDDLE - 5);
    assert_eq!(light.light().actual_level, 60);
    assert_eq!(light.current_state(), StateId::Steady);
}
