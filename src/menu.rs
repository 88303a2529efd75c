//! Click-count configuration menus.
//!
//! A menu is a short list of numbered items. For each item the light blinks
//! the item number, then waits: N clicks enter the value N, and letting the
//! prompt time out enters 0. Each value goes straight to the menu's save
//! routine, so a menu abandoned halfway keeps the items already entered.
//! After the last item the settings are saved and the menu pops itself off
//! the stack.

use crate::context::Context;
use crate::driver::{LightDriver, SettingsStore};
use crate::settings::{RampSlot, TINT_HIGH, TINT_LOW, TurboStyle};
use crate::types::{Event, EventResult};

/// The available menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigMenu {
    /// Floor, ceiling and steps (or speed) of one ramp.
    Ramp(RampSlot),

    /// Floor, ceiling, steps and turbo style of the simple UI ramp.
    SimpleUi,

    /// Manual memory, memory timer, ramp after moon, turbo style, hold style.
    RampExtras,

    /// Minutes until automatic lockout.
    Autolock,

    /// Device-wide options: tint step count.
    Globals,
}

/// A menu in progress. Lives in its stack frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigSession {
    /// Which menu.
    pub menu: ConfigMenu,

    /// Current item, starting at 1. 0 before the menu is entered.
    pub step: u8,

    /// Ticks spent waiting on the current item.
    pub idle_ticks: u16,
}

impl ConfigSession {
    /// A session for `menu`, not yet entered.
    pub const fn new(menu: ConfigMenu) -> Self {
        Self {
            menu,
            step: 0,
            idle_ticks: 0,
        }
    }
}

impl ConfigMenu {
    /// Number of items, which depends on what the light supports.
    pub fn num_steps(self, features: &crate::config::Features) -> u8 {
        match self {
            ConfigMenu::Ramp(slot) => {
                if features.ramp_speed_config || slot != RampSlot::Smooth {
                    3
                } else {
                    2
                }
            }
            ConfigMenu::SimpleUi => {
                if features.turbo_style_config {
                    4
                } else {
                    3
                }
            }
            ConfigMenu::RampExtras => 5,
            ConfigMenu::Autolock | ConfigMenu::Globals => 1,
        }
    }
}

pub(crate) fn handle<D: LightDriver, S: SettingsStore>(
    session: &mut ConfigSession,
    ctx: &mut Context<D, S>,
    event: Event,
    _arg: u16,
) -> EventResult {
    match event {
        Event::Enter => {
            debug!("config menu {:?} entered", session.menu);
            ctx.set_level(0);
            session.step = 1;
            session.idle_ticks = 0;
            ctx.blink_num(session.step);
            EventResult::Handled
        }
        Event::Click(clicks) => {
            accept(session, ctx, clicks);
            EventResult::Handled
        }
        Event::Tick => {
            session.idle_ticks = session.idle_ticks.saturating_add(1);
            if session.idle_ticks >= ctx.config.timing().config_prompt_ticks {
                accept(session, ctx, 0);
            }
            EventResult::Handled
        }
        e if e.is_button() => {
            session.idle_ticks = 0;
            EventResult::Handled
        }
        Event::Leave | Event::Reenter | Event::SleepTick => EventResult::Handled,
        _ => EventResult::NotHandled,
    }
}

fn accept<D: LightDriver, S: SettingsStore>(
    session: &mut ConfigSession,
    ctx: &mut Context<D, S>,
    value: u8,
) {
    // A finished menu waits for its pop.
    if ctx.has_pending_transition() {
        return;
    }

    save(session.menu, session.step, value, ctx);

    let last = session.menu.num_steps(ctx.config.features());
    if session.step >= last {
        ctx.save_config();
        ctx.pop_state();
        return;
    }

    session.step += 1;
    session.idle_ticks = 0;
    ctx.blink_num(session.step);
}

fn save<D: LightDriver, S: SettingsStore>(
    menu: ConfigMenu,
    step: u8,
    value: u8,
    ctx: &mut Context<D, S>,
) {
    match menu {
        ConfigMenu::Ramp(slot) => save_ramp(slot, step, value, ctx),
        ConfigMenu::SimpleUi => {
            if step == 4 {
                ctx.settings.simple_turbo_style = TurboStyle::from_value(value);
            } else {
                save_ramp(RampSlot::Simple, step, value, ctx);
            }
        }
        ConfigMenu::RampExtras => save_ramp_extras(step, value, ctx),
        ConfigMenu::Autolock => ctx.settings.autolock_time = value,
        ConfigMenu::Globals => {
            if (TINT_LOW..=TINT_HIGH).contains(&value) {
                ctx.settings.tint_steps = value;
                ctx.settings.tint = ctx.nearest_tint_level(ctx.settings.tint as i16);
                ctx.apply_tint();
            } else {
                warn!("tint steps {} refused", value);
            }
        }
    }
}

fn save_ramp<D: LightDriver, S: SettingsStore>(
    slot: RampSlot,
    step: u8,
    value: u8,
    ctx: &mut Context<D, S>,
) {
    // 0 keeps the current value
    if value == 0 {
        return;
    }

    if step == 3 && slot == RampSlot::Smooth {
        ctx.settings.ramp_speed = value;
        return;
    }

    let max = ctx.config.max_level();
    let ramp = ctx.settings.ramp_mut(slot);
    match step {
        1 => {
            if value <= ramp.ceil {
                ramp.floor = value;
            } else {
                warn!("ramp floor {} above ceiling {}", value, ramp.ceil);
            }
        }
        2 => {
            // N clicks means max_level + 1 - N
            match (max as u16 + 1).checked_sub(value as u16) {
                Some(ceil) if ceil > 0 && ceil >= ramp.floor as u16 => ramp.ceil = ceil as u8,
                _ => warn!("ramp ceiling from {} clicks below floor {}", value, ramp.floor),
            }
        }
        3 => ramp.steps = value,
        _ => {}
    }
}

fn save_ramp_extras<D: LightDriver, S: SettingsStore>(
    step: u8,
    value: u8,
    ctx: &mut Context<D, S>,
) {
    let settings = &mut ctx.settings;
    match step {
        1 => {
            if value > 0 {
                settings.manual_memory = 0;
            }
        }
        2 => {
            // the expiry check counts sleep ticks in 16 bits
            let ticks = value as u32 * ctx.config.timing().sleep_ticks_per_minute as u32;
            if ticks <= u16::MAX as u32 {
                settings.manual_memory_timer = value;
            } else {
                warn!("manual memory timer {} min too long", value);
            }
        }
        3 => settings.dont_ramp_after_moon = value != 0,
        4 => settings.turbo_style = TurboStyle::from_value(value),
        5 => settings.hold_style_pinned = value != 0,
        _ => {}
    }
}
