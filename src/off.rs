//! Off: waiting for a gesture.
//!
//! Only the entry points into the other states live here, plus the standby
//! timers that restore manual memory and lock the light automatically.

use crate::config::AuxLeds;
use crate::context::Context;
use crate::driver::{LightDriver, SettingsStore};
use crate::menu::{ConfigMenu, ConfigSession};
use crate::stack::State;
use crate::types::{Event, EventResult};

pub(crate) fn handle<D: LightDriver, S: SettingsStore>(
    ctx: &mut Context<D, S>,
    event: Event,
    arg: u16,
) -> EventResult {
    let features = *ctx.config.features();

    match event {
        Event::Enter | Event::Reenter => {
            ctx.set_level_and_therm_target(0);
            if features.aux == AuxLeds::Indicator {
                ctx.driver.indicator(ctx.settings.indicator_mode & 0x03);
            }
            return EventResult::Handled;
        }
        Event::Tick => {
            if arg > ctx.config.timing().hold_timeout {
                ctx.request_standby();
            }
            return EventResult::Handled;
        }
        Event::SleepTick => {
            sleep_tick(ctx, arg);
            return EventResult::Handled;
        }
        Event::Click(1) => {
            let settings = &mut ctx.settings;
            let level = if features.manual_memory
                && settings.manual_memory != 0
                && settings.manual_memory_timer == 0
            {
                settings.tint = settings.manual_memory_tint;
                settings.manual_memory
            } else {
                ctx.light.memorized_level
            };
            ctx.apply_tint();
            ctx.set_state(State::Steady, level as u16);
            return EventResult::Handled;
        }
        Event::Hold(1) => {
            if arg == 0 {
                let floor = ctx.active_ramp().floor;
                ctx.set_state(State::Steady, floor as u16);
            }
            return EventResult::Handled;
        }
        Event::Click(2) => {
            ctx.set_state(State::Steady, ctx.config.max_level() as u16);
            return EventResult::Handled;
        }
        Event::Click(4) if features.lockout => {
            ctx.set_state(State::Lockout, 0);
            return EventResult::Handled;
        }
        _ => {}
    }

    if !features.simple_ui {
        return advanced(ctx, event, arg);
    }

    if ctx.settings.simple_ui_active {
        // 10H leaves the simple UI
        if event == Event::Hold(10) {
            if arg == 0 {
                ctx.settings.simple_ui_active = false;
                info!("simple UI off");
                ctx.save_config();
                ctx.blink_once();
            }
            return EventResult::Handled;
        }
        return EventResult::NotHandled;
    }

    match event {
        Event::Click(10) => {
            ctx.settings.simple_ui_active = true;
            info!("simple UI on");
            ctx.save_config();
            ctx.blink_once();
            EventResult::Handled
        }
        Event::Hold(10) if features.ramp_config => {
            let session = ConfigSession::new(ConfigMenu::SimpleUi);
            ctx.push_state(State::Config(session), 0);
            EventResult::Handled
        }
        _ => advanced(ctx, event, arg),
    }
}

fn advanced<D: LightDriver, S: SettingsStore>(
    ctx: &mut Context<D, S>,
    event: Event,
    _arg: u16,
) -> EventResult {
    match event {
        Event::Hold(9) if ctx.config.features().tint_ramping => {
            let session = ConfigSession::new(ConfigMenu::Globals);
            ctx.push_state(State::Config(session), 0);
            EventResult::Handled
        }
        _ => EventResult::NotHandled,
    }
}

fn sleep_tick<D: LightDriver, S: SettingsStore>(ctx: &mut Context<D, S>, arg: u16) {
    let features = *ctx.config.features();
    let per_minute = ctx.config.timing().sleep_ticks_per_minute as u32;
    let asleep = arg as u32;

    let timer = ctx.settings.manual_memory_timer as u32;
    if features.manual_memory
        && ctx.settings.manual_memory != 0
        && timer != 0
        && asleep == timer * per_minute
    {
        debug!("manual memory timer expired");
        ctx.light.memorized_level = ctx.settings.manual_memory;
        ctx.settings.tint = ctx.settings.manual_memory_tint;
        ctx.apply_tint();
    }

    let autolock = ctx.settings.autolock_time as u32;
    if features.autolock && features.lockout && autolock != 0 && asleep == autolock * per_minute {
        debug!("autolock after {} min", autolock);
        ctx.set_state(State::Lockout, 0);
    }
}
