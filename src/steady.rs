//! Steady output with brightness ramping.
//!
//! The main operating state. Holding the button ramps the level, clicks jump
//! to turbo or toggle the ramp style, and thermal events from the
//! temperature monitor pull the output down and let it recover. Changes made
//! by thermal regulation and the sunset timer are paced over many ticks
//! when gradual adjustment is enabled.

use crate::context::Context;
use crate::driver::{LightDriver, SettingsStore};
use crate::menu::{ConfigMenu, ConfigSession};
use crate::settings::{RampProfile, RampStyle, TurboStyle};
use crate::stack::State;
use crate::sunset::SunsetTimer;
use crate::types::{Direction, Event, EventResult};

/// Runtime fields of the steady state that persist between events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct SteadyState {
    direction: Direction,
    level_before_off: u8,
    ticks_since_adjust: u16,
    sunset: SunsetTimer,
}

impl SteadyState {
    pub(crate) const fn new() -> Self {
        Self {
            direction: Direction::Up,
            level_before_off: 0,
            ticks_since_adjust: 0,
            sunset: SunsetTimer::new(),
        }
    }

    #[inline]
    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub(crate) fn sunset_minutes(&self) -> u8 {
        self.sunset.minutes()
    }

    pub(crate) fn handle<D: LightDriver, S: SettingsStore>(
        &mut self,
        ctx: &mut Context<D, S>,
        event: Event,
        arg: u16,
    ) -> EventResult {
        let features = *ctx.config.features();
        let ramp = ctx.active_ramp();

        if features.sunset_timer {
            if let Some(result) = self.sunset_event(ctx, event, arg) {
                return result;
            }
        }

        match event {
            Event::Enter | Event::Reenter => {
                let requested = if event == Event::Reenter {
                    ctx.light.memorized_level as u16
                } else {
                    arg
                };
                // moon and turbo are not memorized
                if let Ok(level) = u8::try_from(requested) {
                    if ramp.contains_strictly(level) {
                        ctx.light.memorized_level = level;
                    }
                }
                let level = ctx.nearest_ramp_level(requested.min(i16::MAX as u16) as i16);
                ctx.set_level_and_therm_target(level);
                self.direction = Direction::Up;
                return EventResult::Handled;
            }
            Event::Release(1) if features.early_off => {
                self.level_before_off = ctx.light.actual_level;
                ctx.set_level_and_therm_target(0);
                return EventResult::Handled;
            }
            // second press aborts the early off
            Event::Press(2) if features.early_off => {
                ctx.set_level_and_therm_target(self.level_before_off);
                return EventResult::Handled;
            }
            Event::Click(1) => {
                ctx.set_state(State::Off, 0);
                return EventResult::Handled;
            }
            Event::Click(2) => {
                let turbo = self.turbo_level(ctx, ramp.ceil);
                if ctx.light.actual_level < turbo {
                    ctx.set_level_and_therm_target(turbo);
                } else {
                    ctx.set_level_and_therm_target(ctx.light.memorized_level);
                }
                self.sunset.rebase(ctx.light.actual_level);
                return EventResult::Handled;
            }
            Event::Click(4) if features.lockout => {
                ctx.set_level(0);
                ctx.set_state(State::Lockout, 0);
                return EventResult::Handled;
            }
            Event::Hold(1) | Event::Hold(2) => {
                return self.ramp_hold(ctx, event, arg, ramp);
            }
            Event::HoldRelease(1) | Event::HoldRelease(2) => {
                if event == Event::HoldRelease(2) || !ctx.settings.hold_style_pinned {
                    self.direction = self.direction.reversed();
                }
                if features.start_at_memorized_level {
                    ctx.save_config_wl();
                }
                return EventResult::Handled;
            }
            Event::Tick => {
                self.tick(ctx, arg);
                return EventResult::Handled;
            }
            Event::TemperatureHigh if features.thermal_regulation => {
                self.temperature_high(ctx, arg);
                return EventResult::Handled;
            }
            Event::TemperatureLow if features.thermal_regulation => {
                self.temperature_low(ctx, arg);
                return EventResult::Handled;
            }
            Event::TemperatureOkay if features.thermal_regulation && features.gradual_adjustment => {
                let light = &mut ctx.light;
                if light.gradual_target > light.actual_level {
                    light.gradual_target = light.actual_level + 1;
                } else if light.gradual_target < light.actual_level {
                    light.gradual_target = light.actual_level - 1;
                }
                return EventResult::Handled;
            }
            _ => {}
        }

        // Everything below is blocked in the simple UI, except 3C if allowed.
        if ctx.simple_ui_active() && !features.simple_ui_ramp_toggle {
            return EventResult::NotHandled;
        }

        if event == Event::Click(3) {
            self.toggle_ramp_style(ctx);
            return EventResult::Handled;
        }

        if ctx.simple_ui_active() {
            return EventResult::NotHandled;
        }

        match event {
            // momentary turbo, when 3H is not taken by tint ramping
            Event::Hold(3) if !features.tint_ramping => {
                if arg == 0 {
                    let style = ctx.settings.turbo_style;
                    let level = if features.turbo_style_config && style != TurboStyle::Ceiling {
                        ctx.config.max_level()
                    } else {
                        self.turbo_level(ctx, ramp.ceil)
                    };
                    ctx.set_level_and_therm_target(level);
                }
                EventResult::Handled
            }
            Event::HoldRelease(3) if !features.tint_ramping => {
                ctx.set_level_and_therm_target(ctx.light.memorized_level);
                EventResult::Handled
            }
            Event::Hold(7) if features.ramp_config => {
                let menu = ConfigMenu::Ramp(ctx.settings.style_slot());
                ctx.push_state(State::Config(ConfigSession::new(menu)), 0);
                EventResult::Handled
            }
            Event::Click(10) if features.manual_memory => {
                ctx.settings.manual_memory = ctx.light.actual_level;
                ctx.settings.manual_memory_tint = ctx.settings.tint;
                ctx.save_config();
                ctx.blink_once();
                EventResult::Handled
            }
            Event::Hold(10) if features.manual_memory => {
                if features.ramp_extras_config {
                    let session = ConfigSession::new(ConfigMenu::RampExtras);
                    ctx.push_state(State::Config(session), 0);
                } else if arg == 0 {
                    ctx.settings.manual_memory = 0;
                    ctx.save_config();
                    ctx.blink_once();
                }
                EventResult::Handled
            }
            _ => EventResult::NotHandled,
        }
    }

    fn turbo_level<D: LightDriver, S: SettingsStore>(&self, ctx: &Context<D, S>, ceil: u8) -> u8 {
        let style = if !ctx.config.features().turbo_style_config {
            if ctx.simple_ui_active() {
                TurboStyle::Ceiling
            } else {
                TurboStyle::CeilingThenMax
            }
        } else if ctx.simple_ui_active() {
            ctx.settings.simple_turbo_style
        } else {
            ctx.settings.turbo_style
        };
        style.turbo_level(ctx.light.memorized_level, ceil, ctx.config.max_level())
    }

    /// Timer bookkeeping that runs before the regular handling of an event.
    /// Returns a result when the event is fully consumed here.
    fn sunset_event<D: LightDriver, S: SettingsStore>(
        &mut self,
        ctx: &mut Context<D, S>,
        event: Event,
        arg: u16,
    ) -> Option<EventResult> {
        let timing = *ctx.config.timing();
        match event {
            Event::Enter => self.sunset.reset(),
            Event::Tick => {
                let ticks_per_minute = timing.ticks_per_second.saturating_mul(60);
                if self.sunset.tick(ticks_per_minute) {
                    debug!("sunset timer expired");
                    ctx.set_state(State::Off, 0);
                    return Some(EventResult::Handled);
                }
            }
            Event::Hold(5) if !ctx.simple_ui_active() => {
                if self
                    .sunset
                    .hold(arg, timing.ticks_per_second, ctx.light.actual_level)
                {
                    ctx.blink_once();
                }
                return Some(EventResult::Handled);
            }
            Event::Hold(1) | Event::Hold(2) => self.sunset.extend_if_nearly_expired(),
            _ => {}
        }
        None
    }

    fn ramp_hold<D: LightDriver, S: SettingsStore>(
        &mut self,
        ctx: &mut Context<D, S>,
        event: Event,
        arg: u16,
        ramp: RampProfile,
    ) -> EventResult {
        let features = *ctx.config.features();
        let timing = *ctx.config.timing();
        let stepped = ctx.settings.ramp_style.is_stepped();

        // stepped ramps move once per hold timeout
        if stepped && arg % timing.hold_timeout != 0 {
            return EventResult::Handled;
        }
        let speed = if features.ramp_speed_config {
            ctx.settings.ramp_speed.max(1) as u32
        } else {
            1
        };
        if !stepped && arg as u32 % speed != 0 {
            return EventResult::Handled;
        }

        let actual = ctx.light.actual_level;
        let held = arg as u32;
        let tps = timing.ticks_per_second as u32;
        if arg == 0 {
            if event == Event::Hold(2) {
                self.direction = Direction::Down;
            } else if actual >= ramp.ceil {
                if !ctx.settings.hold_style_pinned {
                    self.direction = Direction::Down;
                } else if features.ramp_blinks.ceiling {
                    ctx.blip();
                }
            } else if actual <= ramp.floor {
                self.direction = Direction::Up;
            }
        } else if held > tps * 5 * speed && actual >= ramp.ceil {
            if self.direction == Direction::Up {
                warn!("button held at ceiling for {} ticks, ramping down", arg);
            }
            self.direction = Direction::Down;
        } else if features.lockout && held > tps * 10 * speed && actual <= ramp.floor {
            warn!("button held at floor for {} ticks, locking", arg);
            ctx.blink_once();
            ctx.set_state(State::Lockout, 0);
            return EventResult::Handled;
        }

        let step = self.direction.sign() * ramp.step_size() as i16;
        let next = ctx.nearest_ramp_level(actual as i16 + step);
        ctx.light.memorized_level = next;

        if next != actual {
            let blinks = features.ramp_blinks;
            let at_threshold = blinks.middle.contains(&Some(next))
                || (blinks.ceiling && next == ramp.ceil)
                || (blinks.floor && next == ramp.floor);
            let at_step = blinks.steps
                && !stepped
                && next == ctx.ramp_for_style(RampStyle::Stepped).nearest(actual as i16);
            if at_threshold || at_step {
                ctx.blip();
            }
        }

        ctx.set_level_and_therm_target(next);
        self.sunset.rebase(ctx.light.actual_level);
        EventResult::Handled
    }

    fn toggle_ramp_style<D: LightDriver, S: SettingsStore>(&mut self, ctx: &mut Context<D, S>) {
        let features = *ctx.config.features();
        ctx.settings.ramp_style = ctx.settings.ramp_style.toggled();
        debug!("ramp style now {:?}", ctx.settings.ramp_style);
        if features.memorize_ramp_style {
            ctx.save_config();
        }
        if features.start_at_memorized_level {
            ctx.save_config_wl();
        }
        ctx.blip();
        let level = ctx.nearest_ramp_level(ctx.light.actual_level as i16);
        ctx.light.memorized_level = level;
        ctx.set_level_and_therm_target(level);
        self.sunset.rebase(ctx.light.actual_level);
    }

    fn tick<D: LightDriver, S: SettingsStore>(&mut self, ctx: &mut Context<D, S>, arg: u16) {
        let features = *ctx.config.features();

        if arg == ctx.config.timing().auto_reverse_time {
            self.direction = Direction::Up;
        }

        if self.sunset.is_active() {
            let dimmed = self.sunset.dimmed_level();
            if features.gradual_adjustment {
                ctx.set_level_gradually(dimmed);
                ctx.light.target_level = dimmed;
            } else {
                ctx.set_level_and_therm_target(dimmed);
            }
        }

        if features.gradual_adjustment {
            self.pace_gradual(ctx);
        }
    }

    /// Moves one level toward the gradual target once enough ticks have
    /// passed. Large differences move fast, falling moves faster than
    /// rising, and falling from deep in turbo faster still.
    fn pace_gradual<D: LightDriver, S: SettingsStore>(&mut self, ctx: &mut Context<D, S>) {
        let features = ctx.config.features();
        let actual = ctx.light.actual_level;
        let mut diff = ctx.light.gradual_target as i16 - actual as i16;
        self.ticks_since_adjust = self.ticks_since_adjust.saturating_add(1);
        if diff == 0 {
            return;
        }

        let mut ticks_per_adjust: u16 = 256;
        if diff < 0 {
            if actual > ctx.config.thermal().faster_level {
                if features.hard_turbo_drop {
                    ticks_per_adjust >>= 2;
                }
                ticks_per_adjust >>= 2;
            }
        } else {
            ticks_per_adjust <<= 1;
        }
        while diff != 0 {
            ticks_per_adjust >>= 1;
            diff /= 2;
        }

        if self.ticks_since_adjust > ticks_per_adjust {
            ctx.gradual_tick();
            self.ticks_since_adjust = 0;
        }
    }

    fn temperature_high<D: LightDriver, S: SettingsStore>(
        &mut self,
        ctx: &mut Context<D, S>,
        arg: u16,
    ) {
        let features = *ctx.config.features();
        let thermal = *ctx.config.thermal();
        let max = ctx.config.max_level();
        let actual = ctx.light.actual_level;

        if features.hard_turbo_drop && actual == max {
            trace!("thermal: hard drop to {}", thermal.faster_level);
            if features.gradual_adjustment {
                ctx.set_level_gradually(thermal.faster_level);
                ctx.light.target_level = thermal.faster_level;
            } else {
                ctx.set_level_and_therm_target(thermal.faster_level);
            }
        } else if actual > thermal.min_stepdown {
            let stepdown = (actual as i32 - arg as i32)
                .clamp(thermal.min_stepdown as i32, max as i32) as u8;
            trace!("thermal: step down {} -> {}", actual, stepdown);
            if features.gradual_adjustment {
                ctx.set_level_gradually(stepdown);
            } else {
                ctx.set_level(stepdown);
            }
        }
    }

    fn temperature_low<D: LightDriver, S: SettingsStore>(
        &mut self,
        ctx: &mut Context<D, S>,
        arg: u16,
    ) {
        let features = *ctx.config.features();
        let min_stepdown = ctx.config.thermal().min_stepdown as u32;
        let actual = ctx.light.actual_level;
        let target = ctx.light.target_level;

        if actual >= target {
            return;
        }
        let stepup = (actual as u32 + arg as u32)
            .max(min_stepdown)
            .min(target as u32);
        trace!("thermal: step up {} -> {}", actual, stepup);
        if features.gradual_adjustment {
            ctx.set_level_gradually(stepup as u8);
        } else {
            ctx.set_level(stepup as u8);
        }
    }
}
