#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Controller`**: Owns the lighting state and the state stack, and dispatches events
//! - **`Event`**: A semantic input event (clicks, holds, ticks, temperature status) plus a `u16` argument
//! - **`State`**: A state on the stack: `Off`, `Steady`, `Lockout`, the `TintRamp` layer, or a `Config` menu
//! - **`EventResult`**: Whether a state consumed an event or passed it down the stack
//! - **`LightDriver`**: Trait to implement for your emitter and aux LED hardware
//! - **`SettingsStore`**: Trait to implement for your non-volatile storage
//! - **`Config`**: Validated description of one light: level range, timing, thermal limits, features
//! - **`Settings`**: The user-adjustable values changed from the button UI
//! - **`nearest_level`**: Quantizes a brightness or tint request onto a stepped ramp
//!
//! All arithmetic is integer-only. Levels are `u8` ramp indices where 0 is off
//! and `Config::max_level` is the brightest; tint is a `u8` where 127 is neutral.

#[macro_use]
mod fmt;

mod context;
mod lockout;
mod off;
mod steady;
mod sunset;
mod tint;

pub mod config;
pub mod controller;
pub mod driver;
pub mod level;
pub mod menu;
pub mod settings;
pub mod stack;
pub mod types;

pub use config::{AuxLeds, Config, ConfigBuilder, ConfigError, Features, RampBlinks, ThermalLimits, Timing};
pub use context::LightState;
pub use controller::{Controller, ControllerError};
pub use driver::{AuxMode, LightDriver, SavedPosition, SettingsStore};
pub use level::{SearchStrategy, nearest_level, nearest_level_with};
pub use menu::{ConfigMenu, ConfigSession};
pub use settings::{RampProfile, RampSlot, RampStyle, Settings, TurboStyle, TINT_HIGH, TINT_LOW, TINT_MIDDLE};
pub use stack::{StackError, State, StateId, StateStack, Transition};
pub use sunset::SUNSET_TIMER_UNIT;
pub use types::{Direction, Event, EventResult, SequenceRewrite};
