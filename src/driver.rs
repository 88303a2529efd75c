//! Hardware and persistence seams.
//!
//! The controller never touches registers or storage itself. Implement
//! [`LightDriver`] for the emitter (and optional aux LEDs) and
//! [`SettingsStore`] for whatever non-volatile memory the device has.

use crate::settings::Settings;

/// Trait for abstracting the emitter driver.
///
/// Implement this for your PWM/current-control hardware. Only
/// [`set_level`](LightDriver::set_level) and [`delay_ms`](LightDriver::delay_ms)
/// are required; lights without tint control or aux LEDs can ignore the rest.
pub trait LightDriver {
    /// Sets the emitter to a ramp level, 0 meaning off.
    ///
    /// Handle any hardware errors internally - this method cannot fail.
    fn set_level(&mut self, level: u8);

    /// Busy-waits. Used for the short feedback pulses only.
    fn delay_ms(&mut self, ms: u16);

    /// Sets the channel mix for the given tint; 127 is neutral.
    fn set_tint(&mut self, _tint: u8) {}

    /// Sets the single-colour indicator LED: 0 off, 1 low, 2 high, 3 blinking.
    fn indicator(&mut self, _mode: u8) {}

    /// Advances a blinking indicator pattern during standby.
    fn indicator_blink(&mut self, _arg: u16) {}

    /// Renders an RGB aux LED mode. `arg` is a tick counter for animations.
    fn aux_update(&mut self, _mode: AuxMode, _arg: u16) {}

    /// Sets raw RGB aux LED channels, as packed by [`AuxMode::raw_color`].
    fn aux_set_raw(&mut self, _raw: u8) {}
}

/// Trait for abstracting the settings storage.
///
/// Two entry points mirror the two kinds of flash writes the UI makes: a full
/// settings flush after a deliberate configuration change, and a small
/// frequent write of the current position that survives a battery pull.
pub trait SettingsStore {
    /// Persists every setting.
    fn save_config(&mut self, settings: &Settings);

    /// Persists only the current brightness and tint position.
    fn save_config_wl(&mut self, position: SavedPosition);
}

/// The small, frequently written part of the persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SavedPosition {
    /// The automatic memorized level.
    pub level: u8,

    /// The current tint.
    pub tint: u8,
}

/// Number of RGB aux colours, including the animated ones past the palette.
pub const RGB_LED_NUM_COLORS: u8 = 10;

/// Fixed RGB aux palette as packed 2-bit channels: red bits 0-1, green bits
/// 2-3, blue bits 4-5. Colour indices past the palette are animated effects
/// rendered by the driver.
pub const RGB_LED_COLORS: [u8; 7] = [
    0b00_00_01, // red
    0b00_01_01, // yellow
    0b00_01_00, // green
    0b01_01_00, // cyan
    0b01_00_00, // blue
    0b01_00_01, // purple
    0b01_01_01, // white
];

/// First lockout pattern that lights the aux LED only while the button is down.
pub const RGB_LED_MOMENTARY_LOW: u8 = 4;

/// Packed RGB aux LED mode: high nibble pattern, low nibble colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AuxMode(pub u8);

impl AuxMode {
    /// Packs a pattern and colour.
    #[inline]
    pub const fn new(pattern: u8, color: u8) -> Self {
        AuxMode((pattern << 4) | (color & 0x0f))
    }

    /// Pattern: 0 off, 1 low, 2 high, 3 blinking, 4/5 momentary low/high.
    #[inline]
    pub const fn pattern(self) -> u8 {
        self.0 >> 4
    }

    /// Colour index.
    #[inline]
    pub const fn color(self) -> u8 {
        self.0 & 0x0f
    }

    /// True for the patterns that only light while the button is held.
    #[inline]
    pub const fn is_momentary(self) -> bool {
        let pattern = self.pattern();
        pattern == RGB_LED_MOMENTARY_LOW || pattern == RGB_LED_MOMENTARY_LOW + 1
    }

    /// Channel bits for a momentary pattern: the palette colour shifted up to
    /// the high-brightness bit for the "high" variant. Animated colours fall
    /// back to white.
    pub fn raw_color(self) -> u8 {
        let base = RGB_LED_COLORS
            .get(self.color() as usize)
            .copied()
            .unwrap_or(RGB_LED_COLORS[RGB_LED_COLORS.len() - 1]);
        base << self.pattern().saturating_sub(RGB_LED_MOMENTARY_LOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aux_mode_packs_nibbles() {
        let mode = AuxMode::new(5, 0);
        assert_eq!(mode.0, 0x50);
        assert_eq!(mode.pattern(), 5);
        assert_eq!(mode.color(), 0);
        assert!(mode.is_momentary());
        assert!(!AuxMode::new(3, 6).is_momentary());
    }

    #[test]
    fn momentary_high_shifts_channels() {
        assert_eq!(AuxMode::new(4, 0).raw_color(), 0b01);
        assert_eq!(AuxMode::new(5, 0).raw_color(), 0b10);
        assert_eq!(AuxMode::new(4, 9).raw_color(), 0b01_01_01);
    }
}
