//! Shared lighting state and the output helpers every state uses.

use crate::config::Config;
use crate::driver::{LightDriver, SavedPosition, SettingsStore};
use crate::level::nearest_level;
use crate::settings::{RampProfile, RampSlot, RampStyle, Settings, TINT_HIGH, TINT_LOW};
use crate::stack::{State, Transition};
use crate::types::SequenceRewrite;

/// Pause between blinks when counting out a number.
const BLINK_GAP_MS: u16 = 100;

/// Output levels shared by all states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightState {
    /// Level the driver was last told to output.
    pub actual_level: u8,

    /// Level the user asked for; thermal regulation never goes above it.
    pub target_level: u8,

    /// Level a paced adjustment is heading for.
    pub gradual_target: u8,

    /// Last level the user settled on away from the ramp ends.
    pub memorized_level: u8,
}

impl LightState {
    pub(crate) const fn new(memorized_level: u8) -> Self {
        Self {
            actual_level: 0,
            target_level: 0,
            gradual_target: 0,
            memorized_level,
        }
    }
}

/// Everything a state handler may read or change besides its own fields.
pub(crate) struct Context<D: LightDriver, S: SettingsStore> {
    pub(crate) driver: D,
    pub(crate) store: S,
    pub(crate) config: Config,
    pub(crate) settings: Settings,
    pub(crate) light: LightState,
    pending: Option<Transition>,
    standby: bool,
    rewrite: Option<SequenceRewrite>,
}

impl<D: LightDriver, S: SettingsStore> Context<D, S> {
    pub(crate) fn new(driver: D, store: S, config: Config, settings: Settings) -> Self {
        let light = LightState::new(config.default_level());
        Self {
            driver,
            store,
            config,
            settings,
            light,
            pending: None,
            standby: false,
            rewrite: None,
        }
    }

    // ------------------------------------------------------------------
    // transitions
    // ------------------------------------------------------------------

    /// Records a stack change to apply once the current handler returns.
    /// Only the first request per event counts.
    pub(crate) fn request(&mut self, transition: Transition) {
        if let Some(pending) = self.pending {
            warn!(
                "ignoring transition {:?}, {:?} already requested",
                transition, pending
            );
            return;
        }
        self.pending = Some(transition);
    }

    pub(crate) fn set_state(&mut self, state: State, arg: u16) {
        self.request(Transition::Set(state, arg));
    }

    pub(crate) fn push_state(&mut self, state: State, arg: u16) {
        self.request(Transition::Push(state, arg));
    }

    pub(crate) fn pop_state(&mut self) {
        self.request(Transition::Pop);
    }

    pub(crate) fn take_transition(&mut self) -> Option<Transition> {
        self.pending.take()
    }

    pub(crate) fn has_pending_transition(&self) -> bool {
        self.pending.is_some()
    }

    // ------------------------------------------------------------------
    // requests to the input layer
    // ------------------------------------------------------------------

    pub(crate) fn request_standby(&mut self) {
        self.standby = true;
    }

    pub(crate) fn take_standby(&mut self) -> bool {
        core::mem::take(&mut self.standby)
    }

    pub(crate) fn rewrite_sequence(&mut self, rewrite: SequenceRewrite) {
        self.rewrite = Some(rewrite);
    }

    pub(crate) fn take_rewrite(&mut self) -> Option<SequenceRewrite> {
        self.rewrite.take()
    }

    // ------------------------------------------------------------------
    // output
    // ------------------------------------------------------------------

    /// Sets the output immediately, cancelling any paced adjustment.
    pub(crate) fn set_level(&mut self, level: u8) {
        let level = level.min(self.config.max_level());
        self.driver.set_level(level);
        self.light.actual_level = level;
        self.light.gradual_target = level;
    }

    /// Sets the output and makes it the level thermal regulation returns to.
    pub(crate) fn set_level_and_therm_target(&mut self, level: u8) {
        self.light.target_level = level.min(self.config.max_level());
        self.set_level(level);
    }

    /// Starts a paced adjustment toward `level`; see [`Context::gradual_tick`].
    pub(crate) fn set_level_gradually(&mut self, level: u8) {
        self.light.gradual_target = level.min(self.config.max_level());
    }

    /// Moves the output one level toward the paced adjustment's target.
    pub(crate) fn gradual_tick(&mut self) {
        let light = &mut self.light;
        if light.gradual_target < light.actual_level {
            light.actual_level -= 1;
        } else if light.gradual_target > light.actual_level {
            light.actual_level += 1;
        } else {
            return;
        }
        self.driver.set_level(light.actual_level);
    }

    /// Goes dark for a moment.
    pub(crate) fn blip(&mut self) {
        let level = self.light.actual_level;
        self.driver.set_level(0);
        self.driver.delay_ms(self.config.timing().blip_ms);
        self.driver.set_level(level);
    }

    /// Flashes brighter for a moment, or dark when already near the top.
    pub(crate) fn blink_once(&mut self) {
        let level = self.light.actual_level;
        let max = self.config.max_level();
        let bump = level as u16 + (max / 6) as u16;
        let bump = if bump > max as u16 { 0 } else { bump as u8 };
        self.driver.set_level(bump);
        self.driver.delay_ms(self.config.timing().blink_ms);
        self.driver.set_level(level);
    }

    /// Counts out `count` blinks.
    pub(crate) fn blink_num(&mut self, count: u8) {
        for i in 0..count {
            if i > 0 {
                self.driver.delay_ms(BLINK_GAP_MS);
            }
            self.blink_once();
        }
    }

    /// Pushes the current tint to the driver.
    pub(crate) fn apply_tint(&mut self) {
        self.driver.set_tint(self.settings.tint);
    }

    /// Refreshes the aux LEDs for the lockout pattern.
    pub(crate) fn aux_lockout(&mut self, arg: u16) {
        use crate::config::AuxLeds;
        match self.config.features().aux {
            AuxLeds::None => {}
            AuxLeds::Indicator => self.driver.indicator(self.settings.indicator_mode >> 2),
            AuxLeds::Rgb { .. } => self.driver.aux_update(self.settings.rgb_lockout_mode, arg),
        }
    }

    // ------------------------------------------------------------------
    // ramps
    // ------------------------------------------------------------------

    /// True if the simple UI exists on this light and is switched on.
    #[inline]
    pub(crate) fn simple_ui_active(&self) -> bool {
        self.config.features().simple_ui && self.settings.simple_ui_active
    }

    /// The ramp currently in use, with its effective step count
    /// (0 while smooth ramping).
    #[inline]
    pub(crate) fn active_ramp(&self) -> RampProfile {
        self.ramp_for_style(self.settings.ramp_style)
    }

    /// The ramp that would be in use with the given style.
    pub(crate) fn ramp_for_style(&self, style: RampStyle) -> RampProfile {
        let multiplier = style.multiplier();
        if self.simple_ui_active() {
            let simple = self.settings.ramp(RampSlot::Simple);
            RampProfile::new(simple.floor, simple.ceil, simple.steps * multiplier)
        } else {
            let slot = match style {
                RampStyle::Smooth => RampSlot::Smooth,
                RampStyle::Stepped => RampSlot::Stepped,
            };
            let bounds = self.settings.ramp(slot);
            let steps = self.settings.ramp(RampSlot::Stepped).steps * multiplier;
            RampProfile::new(bounds.floor, bounds.ceil, steps)
        }
    }

    /// Quantizes a level onto the active ramp.
    #[inline]
    pub(crate) fn nearest_ramp_level(&self, target: i16) -> u8 {
        self.active_ramp().nearest(target)
    }

    /// Quantizes a tint onto the tint ramp.
    #[inline]
    pub(crate) fn nearest_tint_level(&self, target: i16) -> u8 {
        let steps = self.settings.tint_steps * self.settings.tint_style.multiplier();
        nearest_level(target, TINT_LOW, TINT_HIGH, steps)
    }

    // ------------------------------------------------------------------
    // persistence
    // ------------------------------------------------------------------

    pub(crate) fn save_config(&mut self) {
        self.store.save_config(&self.settings);
    }

    pub(crate) fn save_config_wl(&mut self) {
        self.store.save_config_wl(SavedPosition {
            level: self.light.memorized_level,
            tint: self.settings.tint,
        });
    }
}
