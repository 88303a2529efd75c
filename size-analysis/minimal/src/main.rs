#![no_std]
#![no_main]

use cortex_m_rt::entry;
use flashlight_ui::{
    Config, Controller, Event, LightDriver, SavedPosition, SearchStrategy, Settings,
    SettingsStore, nearest_level_with,
};
use panic_halt as _;

// ============================================================================
// Minimal Driver Implementation
// ============================================================================

/// Zero-size driver for measuring library overhead
pub struct MinimalDriver;

impl LightDriver for MinimalDriver {
    fn set_level(&mut self, level: u8) {
        core::hint::black_box(level);
    }

    fn delay_ms(&mut self, ms: u16) {
        core::hint::black_box(ms);
    }
}

// ============================================================================
// Minimal Store Implementation
// ============================================================================

pub struct MinimalStore;

impl SettingsStore for MinimalStore {
    fn save_config(&mut self, settings: &Settings) {
        core::hint::black_box(settings);
    }

    fn save_config_wl(&mut self, position: SavedPosition) {
        core::hint::black_box(position);
    }
}

// ============================================================================
// Test Gestures
// ============================================================================

// This function uses the library to prevent optimizer from removing code
#[inline(never)]
fn test_gestures() {
    let Ok(mut light) =
        Controller::<_, _, 4>::new(MinimalDriver, MinimalStore, Config::default())
    else {
        return;
    };

    // on, ramp, turbo, thermal, off
    let gestures = [
        (Event::Click(1), 0),
        (Event::Hold(1), 0),
        (Event::Hold(1), 1),
        (Event::HoldRelease(1), 0),
        (Event::Click(2), 0),
        (Event::TemperatureHigh, 10),
        (Event::Tick, 1),
        (Event::TemperatureLow, 10),
        (Event::Click(3), 0),
        (Event::Hold(3), 0),
        (Event::HoldRelease(3), 0),
        (Event::Hold(7), 0),
        (Event::Click(5), 0),
        (Event::Click(1), 0),
        (Event::Click(1), 0),
        (Event::Click(4), 0),
        (Event::Hold(4), 0),
        (Event::HoldRelease(4), 0),
    ];
    for (event, arg) in gestures {
        let _ = light.dispatch(event, arg);
    }
    core::hint::black_box(light.light());

    // every search strategy
    for strategy in SearchStrategy::ALL {
        let level = nearest_level_with(strategy, core::hint::black_box(60), 20, 120, 7);
        core::hint::black_box(level);
    }
}

#[entry]
fn main() -> ! {
    // Call test function to ensure all code is included
    test_gestures();

    // Halt - this is a size analysis binary, not meant to run
    loop {
        cortex_m::asm::nop();
    }
}
