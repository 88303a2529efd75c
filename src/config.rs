//! Device configuration.
//!
//! A [`Config`] describes one physical light: its level range, tick timing,
//! thermal limits, which UI features it offers, and the factory settings.
//! It is built once at startup with [`ConfigBuilder`], which validates it,
//! and never changes afterwards.

use crate::settings::Settings;

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A ramp floor is above its ceiling.
    FloorAboveCeiling {
        /// Ramp slot index.
        slot: u8,
        /// Offending floor.
        floor: u8,
        /// Offending ceiling.
        ceil: u8,
    },

    /// A level exceeds the device maximum.
    LevelOutOfRange {
        /// Offending level.
        level: u8,
        /// Device maximum.
        max: u8,
    },

    /// A level that must be lit is 0.
    ZeroLevel,

    /// A stepped ramp has no steps.
    ZeroSteps {
        /// Ramp slot index.
        slot: u8,
    },

    /// The smooth ramp speed divisor is 0.
    ZeroRampSpeed,

    /// Tint step count outside `1..=254`.
    InvalidTintSteps(u8),

    /// Thermal floor above the hard-drop level, or either above the maximum.
    ThermalOrder {
        /// Lowest level thermal regulation may step down to.
        min_stepdown: u8,
        /// Level a hard turbo drop lands on.
        faster_level: u8,
    },

    /// A timing constant that must be positive is 0.
    ZeroTiming(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::FloorAboveCeiling { slot, floor, ceil } => {
                write!(f, "ramp {} floor {} is above its ceiling {}", slot, floor, ceil)
            }
            ConfigError::LevelOutOfRange { level, max } => {
                write!(f, "level {} exceeds the maximum level {}", level, max)
            }
            ConfigError::ZeroLevel => {
                write!(f, "level must be at least 1")
            }
            ConfigError::ZeroSteps { slot } => {
                write!(f, "stepped ramp {} must have at least one step", slot)
            }
            ConfigError::ZeroRampSpeed => {
                write!(f, "ramp speed must be at least 1")
            }
            ConfigError::InvalidTintSteps(steps) => {
                write!(f, "tint steps {} outside 1-254", steps)
            }
            ConfigError::ThermalOrder {
                min_stepdown,
                faster_level,
            } => {
                write!(
                    f,
                    "thermal stepdown floor {} must not exceed hard drop level {}",
                    min_stepdown, faster_level
                )
            }
            ConfigError::ZeroTiming(name) => {
                write!(f, "timing constant {} must be non-zero", name)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Tick-based timing constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Awake ticks per second.
    pub ticks_per_second: u16,

    /// Ticks a press must last to count as a hold; also the stepped ramp pace.
    pub hold_timeout: u16,

    /// Idle ticks after which the ramp direction goes back to "up".
    pub auto_reverse_time: u16,

    /// Standby ticks per minute.
    pub sleep_ticks_per_minute: u16,

    /// Idle ticks after which a config prompt takes "no value".
    pub config_prompt_ticks: u16,

    /// Stalled hold ticks at a tint edge before tint falls off the edge.
    pub past_edge_ticks: u8,

    /// Length of a dark blip.
    pub blip_ms: u16,

    /// Length of a bright blink.
    pub blink_ms: u16,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            ticks_per_second: 62,
            hold_timeout: 24,
            auto_reverse_time: 41,
            sleep_ticks_per_minute: 120,
            config_prompt_ticks: 124,
            past_edge_ticks: 64,
            blip_ms: 12,
            blink_ms: 8,
        }
    }
}

/// Output limits used by thermal regulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ThermalLimits {
    /// Thermal regulation never steps down below this level.
    pub min_stepdown: u8,

    /// Above this level the light steps down faster; a hard turbo drop
    /// lands exactly here.
    pub faster_level: u8,
}

impl Default for ThermalLimits {
    fn default() -> Self {
        Self {
            min_stepdown: 65,
            faster_level: 130,
        }
    }
}

/// Which aux LEDs the light has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AuxLeds {
    /// No aux LEDs.
    #[default]
    None,

    /// A single-colour button indicator LED.
    Indicator,

    /// RGB aux LEDs. `momentary` adds the lockout patterns that light only
    /// while the button is held.
    Rgb {
        /// Momentary lockout patterns available.
        momentary: bool,
    },
}

/// Blips while hold-ramping through particular levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RampBlinks {
    /// Up to two fixed levels, e.g. where a power channel switches over.
    pub middle: [Option<u8>; 2],

    /// Blip on reaching the ramp ceiling.
    pub ceiling: bool,

    /// Blip on reaching the ramp floor.
    pub floor: bool,

    /// While smooth ramping, blip at every level of the stepped ramp.
    pub steps: bool,
}

/// Optional UI features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Features {
    /// Lockout state and the shortcuts into it.
    pub lockout: bool,

    /// Momentary low output while the button is held in lockout.
    pub moon_during_lockout: bool,

    /// Leaving lockout with 4H can keep ramping (per setting).
    pub ramp_after_moon_config: bool,

    /// Automatic lockout after some minutes off, and its menu.
    pub autolock: bool,

    /// Aux LED hardware.
    pub aux: AuxLeds,

    /// Standby ticks are delivered, so aux LEDs can animate while asleep.
    pub tick_during_standby: bool,

    /// Indicator mode rotation skips "low".
    pub indicator_skip_low: bool,

    /// Thermal regulation events are acted on.
    pub thermal_regulation: bool,

    /// Level changes from thermal regulation are paced over many ticks.
    pub gradual_adjustment: bool,

    /// At the absolute maximum, overheating drops straight to the faster level.
    pub hard_turbo_drop: bool,

    /// One click turns the light off on release, and a second press restores it.
    pub early_off: bool,

    /// Tint ramping layer under every state.
    pub tint_ramping: bool,

    /// The simple UI exists.
    pub simple_ui: bool,

    /// Smooth/stepped toggling stays available in the simple UI.
    pub simple_ui_ramp_toggle: bool,

    /// Ramp menu on 7H.
    pub ramp_config: bool,

    /// Smooth ramp speed is configurable (third ramp menu item).
    pub ramp_speed_config: bool,

    /// Turbo style is configurable.
    pub turbo_style_config: bool,

    /// Manual memory on 10C/10H.
    pub manual_memory: bool,

    /// Extra ramp options menu on 10H.
    pub ramp_extras_config: bool,

    /// Dimming shutoff timer on 5H.
    pub sunset_timer: bool,

    /// Ramp position is saved on every change so it survives a battery pull.
    pub start_at_memorized_level: bool,

    /// Smooth/stepped choice is saved with the settings.
    pub memorize_ramp_style: bool,

    /// Ramp blip points.
    pub ramp_blinks: RampBlinks,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            lockout: true,
            moon_during_lockout: true,
            ramp_after_moon_config: true,
            autolock: true,
            aux: AuxLeds::None,
            tick_during_standby: true,
            indicator_skip_low: false,
            thermal_regulation: true,
            gradual_adjustment: true,
            hard_turbo_drop: false,
            early_off: true,
            tint_ramping: true,
            simple_ui: true,
            simple_ui_ramp_toggle: false,
            ramp_config: true,
            ramp_speed_config: true,
            turbo_style_config: true,
            manual_memory: true,
            ramp_extras_config: true,
            sunset_timer: true,
            start_at_memorized_level: true,
            memorize_ramp_style: true,
            ramp_blinks: RampBlinks {
                middle: [None, None],
                ceiling: true,
                floor: false,
                steps: false,
            },
        }
    }
}

/// A validated device configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    max_level: u8,
    default_level: u8,
    timing: Timing,
    thermal: ThermalLimits,
    features: Features,
    defaults: Settings,
}

impl Config {
    /// Creates a new config builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Highest output level.
    #[inline]
    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    /// Level remembered before the user has chosen one.
    #[inline]
    pub fn default_level(&self) -> u8 {
        self.default_level
    }

    /// Tick timing.
    #[inline]
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Thermal limits.
    #[inline]
    pub fn thermal(&self) -> &ThermalLimits {
        &self.thermal
    }

    /// Enabled UI features.
    #[inline]
    pub fn features(&self) -> &Features {
        &self.features
    }

    /// Factory settings.
    #[inline]
    pub fn defaults(&self) -> &Settings {
        &self.defaults
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_level: 150,
            default_level: 50,
            timing: Timing::default(),
            thermal: ThermalLimits::default(),
            features: Features::default(),
            defaults: Settings::default(),
        }
    }
}

/// Builder for constructing a validated [`Config`].
#[derive(Debug)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Starts from the default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Sets the highest output level.
    pub fn max_level(mut self, level: u8) -> Self {
        self.config.max_level = level;
        self
    }

    /// Sets the level remembered before the user has chosen one.
    pub fn default_level(mut self, level: u8) -> Self {
        self.config.default_level = level;
        self
    }

    /// Sets tick timing.
    pub fn timing(mut self, timing: Timing) -> Self {
        self.config.timing = timing;
        self
    }

    /// Sets thermal limits.
    pub fn thermal(mut self, thermal: ThermalLimits) -> Self {
        self.config.thermal = thermal;
        self
    }

    /// Sets the enabled features.
    pub fn features(mut self, features: Features) -> Self {
        self.config.features = features;
        self
    }

    /// Sets the factory settings.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.config.defaults = settings;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    /// * `ZeroLevel` - `max_level` or `default_level` is 0
    /// * `LevelOutOfRange` - `default_level` exceeds `max_level`
    /// * `ThermalOrder` - thermal limits out of order or above `max_level`
    /// * `ZeroTiming` - a timing constant that divides or paces is 0
    /// * any error from [`Settings::validate`] on the factory settings
    pub fn build(self) -> Result<Config, ConfigError> {
        let config = self.config;

        if config.max_level == 0 || config.default_level == 0 {
            return Err(ConfigError::ZeroLevel);
        }
        if config.default_level > config.max_level {
            return Err(ConfigError::LevelOutOfRange {
                level: config.default_level,
                max: config.max_level,
            });
        }

        let thermal = config.thermal;
        if thermal.min_stepdown > thermal.faster_level || thermal.faster_level > config.max_level
        {
            return Err(ConfigError::ThermalOrder {
                min_stepdown: thermal.min_stepdown,
                faster_level: thermal.faster_level,
            });
        }

        let timing = config.timing;
        if timing.ticks_per_second == 0 {
            return Err(ConfigError::ZeroTiming("ticks_per_second"));
        }
        if timing.hold_timeout == 0 {
            return Err(ConfigError::ZeroTiming("hold_timeout"));
        }
        if timing.sleep_ticks_per_minute == 0 {
            return Err(ConfigError::ZeroTiming("sleep_ticks_per_minute"));
        }
        if timing.config_prompt_ticks == 0 {
            return Err(ConfigError::ZeroTiming("config_prompt_ticks"));
        }

        config.defaults.validate(config.max_level)?;

        Ok(config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
