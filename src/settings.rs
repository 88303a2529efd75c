//! User-adjustable settings.
//!
//! Everything here can be changed from the button UI and is handed to the
//! [`SettingsStore`](crate::SettingsStore) when it changes. Values restored
//! from a store should go through [`Settings::validate`] before use.

use crate::config::ConfigError;
use crate::driver::AuxMode;
use crate::level::nearest_level;

/// Brightness bounds and step count of one ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RampProfile {
    /// Lowest level reachable while ramping.
    pub floor: u8,

    /// Highest level reachable while ramping.
    pub ceil: u8,

    /// Number of discrete levels, or 0 for a continuous ramp.
    pub steps: u8,
}

impl RampProfile {
    /// Creates a ramp profile.
    pub const fn new(floor: u8, ceil: u8, steps: u8) -> Self {
        Self { floor, ceil, steps }
    }

    /// Quantizes `target` onto this ramp.
    #[inline]
    pub fn nearest(&self, target: i16) -> u8 {
        nearest_level(target, self.floor, self.ceil, self.steps)
    }

    /// Distance between neighbouring stepped levels, 1 for continuous ramps.
    /// Never 0: a grid with more steps than levels still ramps one level at
    /// a time.
    pub fn step_size(&self) -> u8 {
        if self.steps > 1 {
            ((self.ceil - self.floor) / (self.steps - 1)).max(1)
        } else {
            1
        }
    }

    /// True if `level` lies strictly between floor and ceiling.
    #[inline]
    pub fn contains_strictly(&self, level: u8) -> bool {
        level > self.floor && level < self.ceil
    }
}

/// Index into [`Settings::ramps`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RampSlot {
    /// The continuous ramp of the full UI.
    Smooth = 0,

    /// The stepped ramp of the full UI.
    Stepped = 1,

    /// The ramp used while the simple UI is active.
    Simple = 2,
}

/// Smooth or stepped, for brightness and for tint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RampStyle {
    /// Every integer level is allowed.
    #[default]
    Smooth,

    /// Only the levels of a fixed-count grid are allowed.
    Stepped,
}

impl RampStyle {
    /// The other style.
    #[inline]
    pub const fn toggled(self) -> Self {
        match self {
            RampStyle::Smooth => RampStyle::Stepped,
            RampStyle::Stepped => RampStyle::Smooth,
        }
    }

    /// 0 for smooth, 1 for stepped; multiplies a step count.
    #[inline]
    pub const fn multiplier(self) -> u8 {
        match self {
            RampStyle::Smooth => 0,
            RampStyle::Stepped => 1,
        }
    }

    /// True for [`RampStyle::Stepped`].
    #[inline]
    pub const fn is_stepped(self) -> bool {
        matches!(self, RampStyle::Stepped)
    }
}

/// Where a double click goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TurboStyle {
    /// To and from the ramp ceiling only.
    Ceiling,

    /// Always to and from the absolute maximum.
    AlwaysMax,

    /// To the ceiling, or to the absolute maximum when already at the ceiling.
    CeilingThenMax,
}

impl TurboStyle {
    /// Maps a click-count menu value: 0 ceiling, 1 maximum, 2 or more both.
    pub const fn from_value(value: u8) -> Self {
        match value {
            0 => TurboStyle::Ceiling,
            1 => TurboStyle::AlwaysMax,
            _ => TurboStyle::CeilingThenMax,
        }
    }

    /// The turbo level for a ramp ceiling and the current memorized level.
    pub const fn turbo_level(self, memorized: u8, ceil: u8, max_level: u8) -> u8 {
        match self {
            TurboStyle::Ceiling => ceil,
            TurboStyle::AlwaysMax => max_level,
            TurboStyle::CeilingThenMax => {
                if memorized < ceil {
                    ceil
                } else {
                    max_level
                }
            }
        }
    }
}

/// Neutral tint.
pub const TINT_MIDDLE: u8 = 127;

/// Lowest tint reachable by ramping (0 is past the edge).
pub const TINT_LOW: u8 = 1;

/// Highest tint reachable by ramping (255 is past the edge).
pub const TINT_HIGH: u8 = 254;

/// The persisted, user-adjustable settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Ramp profiles, indexed by [`RampSlot`]. The smooth profile's step
    /// count is always 0.
    pub ramps: [RampProfile; 3],

    /// Smooth or stepped brightness ramping.
    pub ramp_style: RampStyle,

    /// Smooth ramp slowdown: only every Nth hold tick moves the level.
    pub ramp_speed: u8,

    /// Double-click target in the full UI.
    pub turbo_style: TurboStyle,

    /// Double-click target in the simple UI.
    pub simple_turbo_style: TurboStyle,

    /// Hold always ramps up first (no reversing on a single-click hold).
    pub hold_style_pinned: bool,

    /// Manually saved level, or 0 for automatic memory.
    pub manual_memory: u8,

    /// Tint saved together with the manual memory level.
    pub manual_memory_tint: u8,

    /// Minutes off after which the manual memory replaces the automatic one.
    /// 0 means manual memory always wins.
    pub manual_memory_timer: u8,

    /// Leaving lockout with a hold stays at moon instead of ramping.
    pub dont_ramp_after_moon: bool,

    /// Tint position; 127 neutral, 1 and 254 the ramp ends.
    pub tint: u8,

    /// Smooth or stepped tint ramping.
    pub tint_style: RampStyle,

    /// Number of tint positions for stepped tint ramping.
    pub tint_steps: u8,

    /// Minutes off before locking automatically, 0 disables.
    pub autolock_time: u8,

    /// Indicator LED modes: bits 0-1 while off, bits 2-3 while locked.
    pub indicator_mode: u8,

    /// RGB aux LED mode while locked.
    pub rgb_lockout_mode: AuxMode,

    /// Restricts the UI to on/off, turbo and ramping.
    pub simple_ui_active: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ramps: [
                RampProfile::new(1, 120, 0),
                RampProfile::new(20, 120, 7),
                RampProfile::new(25, 120, 5),
            ],
            ramp_style: RampStyle::Smooth,
            ramp_speed: 1,
            turbo_style: TurboStyle::CeilingThenMax,
            simple_turbo_style: TurboStyle::Ceiling,
            hold_style_pinned: false,
            manual_memory: 0,
            manual_memory_tint: TINT_MIDDLE,
            manual_memory_timer: 0,
            dont_ramp_after_moon: false,
            tint: TINT_MIDDLE,
            tint_style: RampStyle::Smooth,
            tint_steps: 2,
            autolock_time: 0,
            indicator_mode: (2 << 2) | 1,
            rgb_lockout_mode: AuxMode::new(3, 6),
            simple_ui_active: false,
        }
    }
}

impl Settings {
    /// Returns a ramp profile.
    #[inline]
    pub fn ramp(&self, slot: RampSlot) -> RampProfile {
        self.ramps[slot as usize]
    }

    /// Returns a ramp profile for modification.
    #[inline]
    pub fn ramp_mut(&mut self, slot: RampSlot) -> &mut RampProfile {
        &mut self.ramps[slot as usize]
    }

    /// The profile slot selected by the current ramp style.
    #[inline]
    pub fn style_slot(&self) -> RampSlot {
        match self.ramp_style {
            RampStyle::Smooth => RampSlot::Smooth,
            RampStyle::Stepped => RampSlot::Stepped,
        }
    }

    /// Checks the settings against the device's maximum level.
    ///
    /// # Errors
    /// * `FloorAboveCeiling` - A ramp floor is above its ceiling
    /// * `ZeroLevel` - A ramp floor is 0 (off)
    /// * `LevelOutOfRange` - A ceiling or the manual memory exceeds `max_level`
    /// * `ZeroSteps` - A stepped ramp has no steps
    /// * `ZeroRampSpeed` - The smooth ramp speed divisor is 0
    /// * `InvalidTintSteps` - Tint steps outside `1..=254`
    pub fn validate(&self, max_level: u8) -> Result<(), ConfigError> {
        for (slot, ramp) in self.ramps.iter().enumerate() {
            if ramp.floor == 0 {
                return Err(ConfigError::ZeroLevel);
            }
            if ramp.floor > ramp.ceil {
                return Err(ConfigError::FloorAboveCeiling {
                    slot: slot as u8,
                    floor: ramp.floor,
                    ceil: ramp.ceil,
                });
            }
            if ramp.ceil > max_level {
                return Err(ConfigError::LevelOutOfRange {
                    level: ramp.ceil,
                    max: max_level,
                });
            }
            if slot != RampSlot::Smooth as usize && ramp.steps == 0 {
                return Err(ConfigError::ZeroSteps { slot: slot as u8 });
            }
        }

        if self.manual_memory > max_level {
            return Err(ConfigError::LevelOutOfRange {
                level: self.manual_memory,
                max: max_level,
            });
        }

        if self.ramp_speed == 0 {
            return Err(ConfigError::ZeroRampSpeed);
        }

        if self.tint_steps == 0 || self.tint_steps == u8::MAX {
            return Err(ConfigError::InvalidTintSteps(self.tint_steps));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Settings::default().validate(150), Ok(()));
    }

    #[test]
    fn validate_rejects_floor_above_ceiling() {
        let mut settings = Settings::default();
        settings.ramps[1] = RampProfile::new(100, 90, 7);
        assert!(matches!(
            settings.validate(150),
            Err(ConfigError::FloorAboveCeiling { slot: 1, .. })
        ));
    }

    #[test]
    fn validate_rejects_ceiling_above_max() {
        let settings = Settings::default();
        assert!(matches!(
            settings.validate(100),
            Err(ConfigError::LevelOutOfRange { level: 120, max: 100 })
        ));
    }

    #[test]
    fn validate_rejects_bad_tint_steps() {
        let mut settings = Settings::default();
        settings.tint_steps = 0;
        assert_eq!(settings.validate(150), Err(ConfigError::InvalidTintSteps(0)));
    }

    #[test]
    fn step_size_of_stepped_profile() {
        assert_eq!(RampProfile::new(20, 120, 7).step_size(), 16);
        assert_eq!(RampProfile::new(1, 120, 0).step_size(), 1);
        assert_eq!(RampProfile::new(1, 120, 1).step_size(), 1);
    }

    #[test]
    fn more_steps_than_levels_still_moves() {
        // points 10, 10, 11, 12, 13, 14, 15
        let dense = RampProfile::new(10, 15, 7);
        assert_eq!(dense.step_size(), 1);
        assert_eq!(dense.nearest(10 + dense.step_size() as i16), 11);
    }

    #[test]
    fn turbo_style_from_menu_value() {
        assert_eq!(TurboStyle::from_value(0), TurboStyle::Ceiling);
        assert_eq!(TurboStyle::from_value(1), TurboStyle::AlwaysMax);
        assert_eq!(TurboStyle::from_value(9), TurboStyle::CeilingThenMax);
        assert_eq!(TurboStyle::CeilingThenMax.turbo_level(50, 120, 150), 120);
        assert_eq!(TurboStyle::CeilingThenMax.turbo_level(120, 120, 150), 150);
    }
}
