//! The controller: owns the lighting state and dispatches events.
//!
//! Provides [`Controller`], which holds the driver, the settings store, the
//! state stack and the runtime fields of every state. The input layer feeds
//! it one event at a time with [`Controller::dispatch`]; because dispatch
//! takes `&mut self`, no event can be delivered while another one (or the
//! stack change it caused) is still being processed.

use crate::config::{Config, ConfigError};
use crate::context::{Context, LightState};
use crate::driver::{LightDriver, SavedPosition, SettingsStore};
use crate::settings::Settings;
use crate::stack::{StackError, State, StateId, StateStack, Transition};
use crate::steady::SteadyState;
use crate::tint::TintRamp;
use crate::types::{Direction, Event, EventResult, SequenceRewrite};
use crate::{lockout, menu, off};

/// Stack changes processed per event before giving up.
const MAX_TRANSITION_ROUNDS: usize = 8;

/// Errors that can occur during controller operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerError {
    /// A stack change did not fit or emptied the stack.
    Stack(StackError),

    /// Settings handed to the controller are invalid.
    Config(ConfigError),

    /// States kept requesting stack changes from their enter/leave handlers.
    TransitionLoop,
}

impl From<StackError> for ControllerError {
    fn from(error: StackError) -> Self {
        ControllerError::Stack(error)
    }
}

impl From<ConfigError> for ControllerError {
    fn from(error: ConfigError) -> Self {
        ControllerError::Config(error)
    }
}

impl core::fmt::Display for ControllerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ControllerError::Stack(error) => write!(f, "state stack: {}", error),
            ControllerError::Config(error) => write!(f, "invalid settings: {}", error),
            ControllerError::TransitionLoop => {
                write!(
                    f,
                    "more than {} state changes for one event",
                    MAX_TRANSITION_ROUNDS
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ControllerError {}

/// Runs the flashlight UI for one light.
///
/// # Type Parameters
/// * `D` - Emitter and aux LED driver
/// * `S` - Settings storage
/// * `DEPTH` - Maximum number of stacked states
pub struct Controller<D: LightDriver, S: SettingsStore, const DEPTH: usize = 8> {
    ctx: Context<D, S>,
    stack: StateStack<DEPTH>,
    steady: SteadyState,
    tint: TintRamp,
}

impl<D: LightDriver, S: SettingsStore, const DEPTH: usize> Controller<D, S, DEPTH> {
    /// Creates a controller with the factory settings from `config`, in the
    /// off state.
    ///
    /// # Errors
    /// * `Stack` - `DEPTH` is too small for the initial states
    pub fn new(driver: D, store: S, config: Config) -> Result<Self, ControllerError> {
        let settings = config.defaults().clone();
        Self::with_settings(driver, store, config, settings)
    }

    /// Creates a controller with previously saved settings, in the off state.
    ///
    /// # Errors
    /// * `Config` - the settings don't fit this light
    /// * `Stack` - `DEPTH` is too small for the initial states
    pub fn with_settings(
        driver: D,
        store: S,
        config: Config,
        settings: Settings,
    ) -> Result<Self, ControllerError> {
        settings.validate(config.max_level())?;

        let tint_ramping = config.features().tint_ramping;
        let mut controller = Self {
            ctx: Context::new(driver, store, config, settings),
            stack: StateStack::new(),
            steady: SteadyState::new(),
            tint: TintRamp::new(),
        };

        if tint_ramping {
            controller.stack.push(State::TintRamp)?;
        }
        controller.stack.push(State::Off)?;
        controller.ctx.apply_tint();
        controller.deliver_top(Event::Enter, 0);
        controller.settle()?;

        Ok(controller)
    }

    /// Restores the position saved by [`SettingsStore::save_config_wl`].
    /// A level outside the light's range is ignored.
    pub fn restore_position(&mut self, position: SavedPosition) {
        if position.level != 0 && position.level <= self.ctx.config.max_level() {
            self.ctx.light.memorized_level = position.level;
        }
        self.ctx.settings.tint = position.tint;
        self.ctx.apply_tint();
    }

    /// Delivers one event.
    ///
    /// The active state gets the event first; if it declines, the states
    /// below it are asked in turn. Any stack change the handling state
    /// requested is applied before this returns.
    ///
    /// # Errors
    /// * `Stack` - a requested stack change did not fit
    /// * `TransitionLoop` - states kept requesting changes
    pub fn dispatch(&mut self, event: Event, arg: u16) -> Result<EventResult, ControllerError> {
        let result = if event.is_lifecycle() {
            self.deliver_top(event, arg)
        } else {
            let mut result = EventResult::NotHandled;
            for index in (0..self.stack.len()).rev() {
                result = self.deliver(index, event, arg);
                if result.is_handled() {
                    break;
                }
            }
            result
        };

        self.settle()?;
        Ok(result)
    }

    /// Replaces the active state.
    ///
    /// # Errors
    /// See [`Controller::dispatch`].
    pub fn set_state(&mut self, state: State, arg: u16) -> Result<(), ControllerError> {
        self.ctx.request(Transition::Set(state, arg));
        self.settle()
    }

    /// Pushes a state on top of the active one.
    ///
    /// # Errors
    /// See [`Controller::dispatch`].
    pub fn push_state(&mut self, state: State, arg: u16) -> Result<(), ControllerError> {
        self.ctx.request(Transition::Push(state, arg));
        self.settle()
    }

    /// Pops the active state.
    ///
    /// # Errors
    /// See [`Controller::dispatch`].
    pub fn pop_state(&mut self) -> Result<(), ControllerError> {
        self.ctx.request(Transition::Pop);
        self.settle()
    }

    /// Returns the current output levels.
    #[inline]
    pub fn light(&self) -> &LightState {
        &self.ctx.light
    }

    /// Returns the current settings.
    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.ctx.settings
    }

    /// Returns the device configuration.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.ctx.config
    }

    /// Returns the active state.
    pub fn current_state(&self) -> StateId {
        self.stack.top().map_or(StateId::Off, State::id)
    }

    /// Returns the active state with its frame data.
    #[inline]
    pub fn top_state(&self) -> Option<&State> {
        self.stack.top()
    }

    /// Returns the number of stacked states.
    #[inline]
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns a reference to the driver.
    #[inline]
    pub fn driver(&self) -> &D {
        &self.ctx.driver
    }

    /// Returns a mutable reference to the driver.
    #[inline]
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.ctx.driver
    }

    /// Returns a reference to the settings store.
    #[inline]
    pub fn store(&self) -> &S {
        &self.ctx.store
    }

    /// Direction the next brightness hold will ramp.
    #[inline]
    pub fn ramp_direction(&self) -> Direction {
        self.steady.direction()
    }

    /// Direction the next tint hold will ramp.
    #[inline]
    pub fn tint_ramp_direction(&self) -> Direction {
        self.tint.direction()
    }

    /// Minutes left on the sunset timer, 0 when it is off.
    #[inline]
    pub fn sunset_minutes(&self) -> u8 {
        self.steady.sunset_minutes()
    }

    /// Returns true, once, if a state asked for the MCU to go to standby
    /// since the last call.
    #[inline]
    pub fn take_standby_request(&mut self) -> bool {
        self.ctx.take_standby()
    }

    /// Returns the rewrite, if any, a state asked the input layer to apply
    /// to the click sequence in progress.
    #[inline]
    pub fn take_sequence_rewrite(&mut self) -> Option<SequenceRewrite> {
        self.ctx.take_rewrite()
    }

    /// Consumes the controller and returns the driver and store.
    pub fn into_parts(self) -> (D, S) {
        (self.ctx.driver, self.ctx.store)
    }

    fn deliver_top(&mut self, event: Event, arg: u16) -> EventResult {
        match self.stack.len() {
            0 => EventResult::NotHandled,
            len => self.deliver(len - 1, event, arg),
        }
    }

    fn deliver(&mut self, index: usize, event: Event, arg: u16) -> EventResult {
        let Some(state) = self.stack.get_mut(index) else {
            return EventResult::NotHandled;
        };
        match state {
            State::Off => off::handle(&mut self.ctx, event, arg),
            State::Steady => self.steady.handle(&mut self.ctx, event, arg),
            State::Lockout => lockout::handle(&mut self.ctx, event, arg),
            State::TintRamp => self.tint.handle(&mut self.ctx, event, arg),
            State::Config(session) => menu::handle(session, &mut self.ctx, event, arg),
        }
    }

    /// Applies requested stack changes until none are left.
    fn settle(&mut self) -> Result<(), ControllerError> {
        let mut rounds = 0;
        while let Some(transition) = self.ctx.take_transition() {
            if rounds == MAX_TRANSITION_ROUNDS {
                warn!("dropping {:?} after {} state changes", transition, rounds);
                return Err(ControllerError::TransitionLoop);
            }
            rounds += 1;
            self.apply(transition)?;
        }
        Ok(())
    }

    fn apply(&mut self, transition: Transition) -> Result<(), ControllerError> {
        match transition {
            Transition::Set(state, arg) => {
                debug!("set state {:?} ({})", state.id(), arg);
                self.deliver_top(Event::Leave, 0);
                self.stack.replace_top(state)?;
                self.deliver_top(Event::Enter, arg);
            }
            Transition::Push(state, arg) => {
                debug!("push state {:?} ({})", state.id(), arg);
                self.stack.push(state)?;
                self.deliver_top(Event::Enter, arg);
            }
            Transition::Pop => {
                if self.stack.len() <= 1 {
                    return Err(StackError::Underflow.into());
                }
                debug!("pop state {:?}", self.current_state());
                self.deliver_top(Event::Leave, 0);
                self.stack.pop()?;
                self.deliver_top(Event::Reenter, 0);
            }
        }
        Ok(())
    }
}
