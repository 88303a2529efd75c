//! Lockout: the light ignores most gestures until unlocked.
//!
//! While locked, holding the button gives a momentary moon, 4C/5C unlock,
//! and the light goes back to standby every time the button has been
//! released for a moment, so a pocketed light cannot drain the battery.

use crate::config::AuxLeds;
use crate::context::Context;
use crate::driver::{AuxMode, LightDriver, RGB_LED_NUM_COLORS, SettingsStore};
use crate::menu::{ConfigMenu, ConfigSession};
use crate::settings::RampSlot;
use crate::stack::State;
use crate::types::{Event, EventResult, SequenceRewrite};

pub(crate) fn handle<D: LightDriver, S: SettingsStore>(
    ctx: &mut Context<D, S>,
    event: Event,
    arg: u16,
) -> EventResult {
    let features = *ctx.config.features();

    // 4H: unlock at the floor, handled first so the moon below doesn't flicker
    match event {
        Event::Hold(4) => {
            unlock_hold(ctx, arg);
            return EventResult::Handled;
        }
        Event::HoldRelease(4) if features.ramp_after_moon_config => {
            // released before ramping started
            ctx.rewrite_sequence(SequenceRewrite::Reset);
            ctx.set_state(State::Steady, 1);
            return EventResult::Handled;
        }
        _ => {}
    }

    if features.moon_during_lockout {
        momentary_moon(ctx, event);
    }

    match event {
        Event::Enter | Event::Reenter => {
            ctx.aux_lockout(0);
            return EventResult::Handled;
        }
        Event::Tick => {
            // back to sleep soon after every press, even if the button keeps
            // getting bumped
            if arg > ctx.config.timing().hold_timeout {
                ctx.request_standby();
                ctx.aux_lockout(arg);
            }
            return EventResult::Handled;
        }
        Event::SleepTick if features.tick_during_standby => match features.aux {
            AuxLeds::None => {}
            AuxLeds::Indicator => {
                if ctx.settings.indicator_mode & 0b1100 == 0b1100 {
                    ctx.driver.indicator_blink(arg);
                }
                return EventResult::Handled;
            }
            AuxLeds::Rgb { .. } => {
                ctx.driver.aux_update(ctx.settings.rgb_lockout_mode, arg);
                return EventResult::Handled;
            }
        },
        // no tint ramping while locked
        Event::Hold(3) if features.tint_ramping => return EventResult::Handled,
        Event::Click(4) => {
            let level = match ctx.settings.manual_memory {
                0 => ctx.light.memorized_level,
                manual => manual,
            };
            ctx.set_state(State::Steady, level as u16);
            return EventResult::Handled;
        }
        Event::Click(5) => {
            ctx.set_state(State::Steady, ctx.config.max_level() as u16);
            return EventResult::Handled;
        }
        _ => {}
    }

    if ctx.simple_ui_active() {
        return EventResult::NotHandled;
    }

    match (event, features.aux) {
        (Event::Hold(10), _) if features.autolock => {
            let session = ConfigSession::new(ConfigMenu::Autolock);
            ctx.push_state(State::Config(session), 0);
            EventResult::Handled
        }
        (Event::Click(7), AuxLeds::Indicator) => {
            rotate_indicator_mode(ctx);
            EventResult::Handled
        }
        (Event::Click(7), AuxLeds::Rgb { momentary }) => {
            let mode = ctx.settings.rgb_lockout_mode;
            let patterns = if momentary { 6 } else { 4 };
            let mode = AuxMode::new((mode.pattern() + 1) % patterns, mode.color());
            ctx.settings.rgb_lockout_mode = mode;
            ctx.driver.aux_update(mode, 0);
            ctx.save_config();
            ctx.blink_once();
            EventResult::Handled
        }
        (Event::Hold(7), AuxLeds::Rgb { .. }) => {
            let mut mode = ctx.settings.rgb_lockout_mode;
            if arg & 0x3f == 0 {
                mode = AuxMode::new(mode.pattern(), (mode.color() + 1) % RGB_LED_NUM_COLORS);
                ctx.settings.rgb_lockout_mode = mode;
            }
            ctx.driver.aux_update(mode, arg);
            EventResult::Handled
        }
        (Event::HoldRelease(7), AuxLeds::Rgb { .. }) => {
            ctx.save_config();
            EventResult::Handled
        }
        _ => EventResult::NotHandled,
    }
}

fn unlock_hold<D: LightDriver, S: SettingsStore>(ctx: &mut Context<D, S>, arg: u16) {
    if arg == 0 {
        ctx.blip();
    }
    let moon = ctx.nearest_ramp_level(1);
    ctx.set_level(moon);

    if !ctx.config.features().ramp_after_moon_config || ctx.settings.dont_ramp_after_moon {
        ctx.rewrite_sequence(SequenceRewrite::Reset);
        ctx.set_state(State::Steady, 1);
    } else if arg >= ctx.config.timing().hold_timeout {
        // the rest of this hold ramps up from the floor
        ctx.rewrite_sequence(SequenceRewrite::ContinueAs(Event::Hold(1)));
        ctx.set_state(State::Steady, 1);
    }
}

fn momentary_moon<D: LightDriver, S: SettingsStore>(ctx: &mut Context<D, S>, event: Event) {
    let features = ctx.config.features();
    let aux_mode = ctx.settings.rgb_lockout_mode;
    let momentary_aux = matches!(features.aux, AuxLeds::Rgb { momentary: true })
        && aux_mode.is_momentary();

    if matches!(features.aux, AuxLeds::Rgb { .. }) && event == Event::Hold(7) {
        // keep the emitter dark while picking aux colours
        ctx.set_level(0);
    } else if event.is_button_down() {
        let a = ctx.settings.ramp(RampSlot::Smooth).floor;
        let b = ctx.settings.ramp(RampSlot::Stepped).floor;
        let (min_floor, max_floor) = (a.min(b), a.max(b));

        if event.clicks() == Some(2) {
            let level = match ctx.settings.manual_memory {
                0 if momentary_aux => min_floor,
                0 => max_floor,
                manual => manual,
            };
            ctx.set_level(level);
        } else if momentary_aux {
            ctx.driver.aux_set_raw(aux_mode.raw_color());
        } else {
            ctx.set_level(min_floor);
        }
    } else if event.is_button_up() {
        ctx.set_level(0);
    }
}

fn rotate_indicator_mode<D: LightDriver, S: SettingsStore>(ctx: &mut Context<D, S>) {
    let features = ctx.config.features();
    let current = ctx.settings.indicator_mode >> 2;
    let mut mode = if features.tick_during_standby {
        (current + 1) & 3
    } else {
        (current + 1) % 3
    };
    if features.indicator_skip_low && mode == 1 {
        mode += 1;
    }
    ctx.settings.indicator_mode = (mode << 2) | (ctx.settings.indicator_mode & 0x03);
    ctx.driver.indicator(mode);
    ctx.save_config();
}
