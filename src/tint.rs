//! Tint ramping layer.
//!
//! Lives at the bottom of the state stack and picks up the tint gestures the
//! active state leaves alone: 3H ramps the tint and reverses each time, 4H
//! always ramps toward 254, and 5C jumps to neutral and back.
//!
//! Holding past an end of the ramp for a while nudges the tint one more
//! unit onto the true boundary (0 or 255), which drivers use for special
//! channel modes.

use crate::context::Context;
use crate::driver::{LightDriver, SettingsStore};
use crate::settings::{RampStyle, TINT_HIGH, TINT_LOW, TINT_MIDDLE};
use crate::types::{Direction, Event, EventResult};

/// Runtime fields of the tint layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TintRamp {
    direction: Direction,
    /// Set by the first frame of a gesture; later frames without it are stale.
    active: bool,
    past_edge_counter: u8,
    /// Tint after the previous ramp frame, from this gesture or the last one.
    last_frame_tint: Option<u8>,
    before_neutral: u8,
}

impl Default for TintRamp {
    fn default() -> Self {
        Self::new()
    }
}

impl TintRamp {
    pub(crate) const fn new() -> Self {
        Self {
            direction: Direction::Down,
            active: false,
            past_edge_counter: 0,
            last_frame_tint: None,
            before_neutral: TINT_MIDDLE,
        }
    }

    #[inline]
    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn handle<D: LightDriver, S: SettingsStore>(
        &mut self,
        ctx: &mut Context<D, S>,
        event: Event,
        arg: u16,
    ) -> EventResult {
        match event {
            Event::Hold(3) | Event::Hold(4) => {
                self.ramp(ctx, event, arg);
                EventResult::Handled
            }
            Event::HoldRelease(3) | Event::HoldRelease(4) => {
                self.active = false;
                if event == Event::HoldRelease(4) || !ctx.settings.hold_style_pinned {
                    self.direction = self.direction.reversed();
                }
                ctx.save_config_wl();
                EventResult::Handled
            }
            Event::Click(5) => {
                if ctx.settings.tint != TINT_MIDDLE {
                    self.before_neutral = ctx.settings.tint;
                    ctx.settings.tint = TINT_MIDDLE;
                } else {
                    ctx.settings.tint = self.before_neutral;
                }
                debug!("tint toggled to {}", ctx.settings.tint);
                ctx.apply_tint();
                ctx.save_config_wl();
                EventResult::Handled
            }
            _ => EventResult::NotHandled,
        }
    }

    fn ramp<D: LightDriver, S: SettingsStore>(
        &mut self,
        ctx: &mut Context<D, S>,
        event: Event,
        arg: u16,
    ) {
        let tint = ctx.settings.tint;

        if arg == 0 {
            self.active = true;
            // last_frame_tint carries over, so a hold that starts pinned
            // at an end stalls from its first frame
            self.past_edge_counter = 0;
            if event == Event::Hold(4) {
                self.direction = Direction::Up;
            } else if tint >= TINT_HIGH {
                self.direction = Direction::Down;
            } else if tint <= TINT_LOW && !ctx.settings.hold_style_pinned {
                self.direction = Direction::Up;
            }
        }
        if !self.active {
            return;
        }

        let stepped = ctx.settings.tint_style == RampStyle::Stepped;
        let next = if stepped {
            if arg % ctx.config.timing().hold_timeout != 0 {
                return;
            }
            let span = (TINT_HIGH - TINT_LOW) as i16;
            let step = (span / (ctx.settings.tint_steps as i16 - 1).max(1)).max(1);
            ctx.nearest_tint_level(tint as i16 + self.direction.sign() * step)
        } else {
            match self.direction {
                Direction::Up if tint < TINT_HIGH => tint + 1,
                Direction::Down if tint > TINT_LOW => tint - 1,
                _ => tint,
            }
        };
        ctx.settings.tint = next;

        let past_edge_ticks = ctx.config.timing().past_edge_ticks;
        if !stepped && self.past_edge_counter == past_edge_ticks {
            // once per gesture
            self.past_edge_counter = self.past_edge_counter.saturating_add(1);
            ctx.settings.tint ^= 1;
            debug!("tint past the edge: {}", ctx.settings.tint);
            ctx.blip();
        } else if self.last_frame_tint == Some(next) || (stepped && next == tint) {
            if self.past_edge_counter == 0 {
                ctx.blip();
            }
            self.past_edge_counter = self.past_edge_counter.saturating_add(1);
        }

        self.last_frame_tint = Some(ctx.settings.tint);
        ctx.apply_tint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_ramping_down() {
        let tint = TintRamp::new();
        assert_eq!(tint.direction(), Direction::Down);
        assert!(!tint.active);
    }
}
