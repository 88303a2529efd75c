//! Shared test infrastructure for flashlight-ui integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use flashlight_ui::{
    AuxMode, Config, Controller, Event, EventResult, Features, LightDriver, SavedPosition,
    Settings, SettingsStore, State,
};

// ============================================================================
// Mock Driver
// ============================================================================

/// Mock driver that records every output change
pub struct MockDriver {
    level: u8,
    tint: u8,
    level_history: heapless::Vec<u8, 1024>,
    pub delays: u32,
    pub indicator: Option<u8>,
    pub indicator_blinks: u32,
    pub aux: Option<(AuxMode, u16)>,
    pub aux_raw: Option<u8>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self {
            level: 0,
            tint: 0,
            level_history: heapless::Vec::new(),
            delays: 0,
            indicator: None,
            indicator_blinks: 0,
            aux: None,
            aux_raw: None,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn tint(&self) -> u8 {
        self.tint
    }

    pub fn level_history(&self) -> &[u8] {
        &self.level_history
    }

    pub fn clear_history(&mut self) {
        self.level_history.clear();
    }

    /// True if the output went dark and came back at least once.
    pub fn blipped(&self) -> bool {
        self.level_history
            .windows(2)
            .any(|pair| pair[0] == 0 && pair[1] != 0)
    }
}

impl LightDriver for MockDriver {
    fn set_level(&mut self, level: u8) {
        self.level = level;
        let _ = self.level_history.push(level);
    }

    fn delay_ms(&mut self, _ms: u16) {
        self.delays += 1;
    }

    fn set_tint(&mut self, tint: u8) {
        self.tint = tint;
    }

    fn indicator(&mut self, mode: u8) {
        self.indicator = Some(mode);
    }

    fn indicator_blink(&mut self, _arg: u16) {
        self.indicator_blinks += 1;
    }

    fn aux_update(&mut self, mode: AuxMode, arg: u16) {
        self.aux = Some((mode, arg));
    }

    fn aux_set_raw(&mut self, raw: u8) {
        self.aux_raw = Some(raw);
    }
}

// ============================================================================
// Mock Store
// ============================================================================

/// Mock settings store that counts and keeps the last write of each kind
pub struct MockStore {
    pub saves: u32,
    pub position_saves: u32,
    pub last_settings: Option<Settings>,
    pub last_position: Option<SavedPosition>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            saves: 0,
            position_saves: 0,
            last_settings: None,
            last_position: None,
        }
    }
}

impl SettingsStore for MockStore {
    fn save_config(&mut self, settings: &Settings) {
        self.saves += 1;
        self.last_settings = Some(settings.clone());
    }

    fn save_config_wl(&mut self, position: SavedPosition) {
        self.position_saves += 1;
        self.last_position = Some(position);
    }
}

// ============================================================================
// Controller Helpers
// ============================================================================

pub type TestLight = Controller<MockDriver, MockStore>;

/// A light with the default configuration, off
pub fn new_light() -> TestLight {
    Controller::new(MockDriver::new(), MockStore::new(), Config::default()).unwrap()
}

/// A light with the given features, off
pub fn light_with_features(features: Features) -> TestLight {
    let config = Config::builder().features(features).build().unwrap();
    Controller::new(MockDriver::new(), MockStore::new(), config).unwrap()
}

/// A light with the default configuration and the given settings, off
pub fn light_with_settings(settings: Settings) -> TestLight {
    Controller::with_settings(
        MockDriver::new(),
        MockStore::new(),
        Config::default(),
        settings,
    )
    .unwrap()
}

/// A light with a custom configuration, off
pub fn light_with_config(config: Config) -> TestLight {
    let settings = config.defaults().clone();
    Controller::with_settings(MockDriver::new(), MockStore::new(), config, settings).unwrap()
}

/// Features with gradual adjustment off, so thermal changes apply at once
pub fn immediate_thermal() -> Features {
    Features {
        gradual_adjustment: false,
        ..Features::default()
    }
}

/// Turns the light on at `level` in the steady state
pub fn turn_on(light: &mut TestLight, level: u8) {
    light.set_state(State::Steady, level as u16).unwrap();
}

pub fn send(light: &mut TestLight, event: Event, arg: u16) -> EventResult {
    light.dispatch(event, arg).unwrap()
}

pub fn click(light: &mut TestLight, clicks: u8) -> EventResult {
    send(light, Event::Click(clicks), 0)
}

/// Delivers hold frames `0..frames` for an N-click hold, without releasing
pub fn hold_frames(light: &mut TestLight, clicks: u8, frames: core::ops::Range<u16>) {
    for arg in frames {
        send(light, Event::Hold(clicks), arg);
    }
}

/// Holds for `frames` ticks, then releases
pub fn hold(light: &mut TestLight, clicks: u8, frames: u16) {
    hold_frames(light, clicks, 0..frames);
    send(light, Event::HoldRelease(clicks), 0);
}

/// Delivers `count` idle ticks, counting up from 1
pub fn idle(light: &mut TestLight, count: u16) {
    for arg in 1..=count {
        send(light, Event::Tick, arg);
    }
}
