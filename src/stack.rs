//! The state stack.
//!
//! The top frame is the active state. Events the top state declines are
//! offered to the frames below it, so a state pushed on top of another
//! inherits everything it does not override, and a layer at the bottom
//! (tint ramping) sees every event nobody above wanted.

use crate::menu::ConfigSession;
use heapless::Vec;

/// A state on the stack, with any data that lives only as long as the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Light off, waiting for a gesture.
    Off,

    /// Steady output with brightness ramping.
    Steady,

    /// Locked: reduced gestures, momentary moon, eager standby.
    Lockout,

    /// Tint ramping layer, kept at the bottom of the stack.
    TintRamp,

    /// A click-count configuration menu.
    Config(ConfigSession),
}

impl State {
    /// The data-less identifier of this state.
    #[inline]
    pub fn id(&self) -> StateId {
        match self {
            State::Off => StateId::Off,
            State::Steady => StateId::Steady,
            State::Lockout => StateId::Lockout,
            State::TintRamp => StateId::TintRamp,
            State::Config(_) => StateId::Config,
        }
    }
}

/// Identifies a [`State`] without its frame data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StateId {
    /// See [`State::Off`].
    Off,
    /// See [`State::Steady`].
    Steady,
    /// See [`State::Lockout`].
    Lockout,
    /// See [`State::TintRamp`].
    TintRamp,
    /// See [`State::Config`].
    Config,
}

/// A stack change requested by a state handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    /// Replace the top state, entering the new one with `arg`.
    Set(State, u16),

    /// Push a state on top, entering it with `arg`. The current state
    /// gets `Reenter` when it pops.
    Push(State, u16),

    /// Pop the top state.
    Pop,
}

/// Errors from stack operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StackError {
    /// No room for another frame.
    Overflow {
        /// Stack capacity.
        capacity: usize,
    },

    /// The last frame cannot be popped.
    Underflow,
}

impl core::fmt::Display for StackError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StackError::Overflow { capacity } => {
                write!(f, "state stack is full ({} frames)", capacity)
            }
            StackError::Underflow => {
                write!(f, "cannot pop the last state")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StackError {}

/// Fixed-capacity stack of states.
#[derive(Debug, Clone)]
pub struct StateStack<const DEPTH: usize> {
    frames: Vec<State, DEPTH>,
}

impl<const DEPTH: usize> StateStack<DEPTH> {
    /// Creates an empty stack.
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Pushes a state.
    ///
    /// # Errors
    /// * `Overflow` - the stack already holds `DEPTH` frames
    pub fn push(&mut self, state: State) -> Result<(), StackError> {
        self.frames
            .push(state)
            .map_err(|_| StackError::Overflow { capacity: DEPTH })
    }

    /// Pops the top state, refusing to empty the stack.
    ///
    /// # Errors
    /// * `Underflow` - only one frame is left
    pub fn pop(&mut self) -> Result<State, StackError> {
        if self.frames.len() <= 1 {
            return Err(StackError::Underflow);
        }
        self.frames.pop().ok_or(StackError::Underflow)
    }

    /// Replaces the top state, returning the old one. Pushes onto an empty stack.
    ///
    /// # Errors
    /// * `Overflow` - the stack was empty and has no capacity
    pub fn replace_top(&mut self, state: State) -> Result<Option<State>, StackError> {
        match self.frames.last_mut() {
            Some(top) => Ok(Some(core::mem::replace(top, state))),
            None => self.push(state).map(|()| None),
        }
    }

    /// The active state.
    #[inline]
    pub fn top(&self) -> Option<&State> {
        self.frames.last()
    }

    /// Frame `index`, counting from the bottom.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut State> {
        self.frames.get_mut(index)
    }

    /// Frames from the top of the stack down.
    pub fn iter_from_top(&self) -> impl Iterator<Item = &State> {
        self.frames.iter().rev()
    }

    /// Number of frames.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if there are no frames.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// True if any frame is the given state.
    pub fn contains(&self, id: StateId) -> bool {
        self.frames.iter().any(|state| state.id() == id)
    }
}

impl<const DEPTH: usize> Default for StateStack<DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_past_capacity_overflows() {
        let mut stack = StateStack::<2>::new();
        stack.push(State::TintRamp).unwrap();
        stack.push(State::Off).unwrap();
        assert_eq!(
            stack.push(State::Steady),
            Err(StackError::Overflow { capacity: 2 })
        );
    }

    #[test]
    fn last_frame_cannot_be_popped() {
        let mut stack = StateStack::<4>::new();
        stack.push(State::Off).unwrap();
        stack.push(State::Steady).unwrap();
        assert_eq!(stack.pop(), Ok(State::Steady));
        assert_eq!(stack.pop(), Err(StackError::Underflow));
        assert_eq!(stack.top(), Some(&State::Off));
    }

    #[test]
    fn replace_top_keeps_frames_below() {
        let mut stack = StateStack::<4>::new();
        stack.push(State::TintRamp).unwrap();
        stack.push(State::Off).unwrap();
        assert_eq!(stack.replace_top(State::Lockout), Ok(Some(State::Off)));
        let ids: heapless::Vec<StateId, 4> = stack.iter_from_top().map(State::id).collect();
        assert_eq!(ids.as_slice(), &[StateId::Lockout, StateId::TintRamp]);
    }
}
