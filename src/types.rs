//! Core event and result types shared by every state.

/// A semantic input event, as produced by the button/timer input layer.
///
/// Every event is delivered together with a 16-bit `arg` whose meaning
/// depends on the variant: elapsed ticks for [`Event::Hold`] and
/// [`Event::Tick`], the error magnitude for the temperature events, the
/// requested level for [`Event::Enter`], and zero otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// The state just became the top of the stack.
    Enter,

    /// The state is the top of the stack again after a pushed state popped.
    Reenter,

    /// The state is about to stop being the top of the stack.
    Leave,

    /// Periodic tick while awake. `arg` is ticks since the last button activity.
    Tick,

    /// Periodic tick while in standby. `arg` is sleep ticks since standby began.
    SleepTick,

    /// Button went down for the Nth time in the current click sequence.
    Press(u8),

    /// Button came up after the Nth press, sequence not yet finished.
    Release(u8),

    /// The sequence finished: N clicks with no hold.
    Click(u8),

    /// Nth press is being held. Recurs every tick; `arg` counts ticks held.
    Hold(u8),

    /// Nth press was held and has now been released.
    HoldRelease(u8),

    /// Temperature above the limit; `arg` is how far above.
    TemperatureHigh,

    /// Temperature below the limit; `arg` is how far below.
    TemperatureLow,

    /// Temperature inside the target window.
    TemperatureOkay,
}

impl Event {
    /// Click count carried by button events.
    #[inline]
    pub const fn clicks(self) -> Option<u8> {
        match self {
            Event::Press(n)
            | Event::Release(n)
            | Event::Click(n)
            | Event::Hold(n)
            | Event::HoldRelease(n) => Some(n),
            _ => None,
        }
    }

    /// True for events emitted while the button is physically down.
    #[inline]
    pub const fn is_button_down(self) -> bool {
        matches!(self, Event::Press(_) | Event::Hold(_))
    }

    /// True for button events emitted while the button is up.
    #[inline]
    pub const fn is_button_up(self) -> bool {
        matches!(
            self,
            Event::Release(_) | Event::HoldRelease(_) | Event::Click(_)
        )
    }

    /// True for any event produced by the button.
    #[inline]
    pub const fn is_button(self) -> bool {
        self.clicks().is_some()
    }

    /// True for the stack notifications, which only ever go to one state.
    #[inline]
    pub const fn is_lifecycle(self) -> bool {
        matches!(self, Event::Enter | Event::Reenter | Event::Leave)
    }

    /// True for the three temperature status events.
    #[inline]
    pub const fn is_thermal(self) -> bool {
        matches!(
            self,
            Event::TemperatureHigh | Event::TemperatureLow | Event::TemperatureOkay
        )
    }
}

/// Outcome of offering an event to a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventResult {
    /// The state consumed the event.
    Handled,

    /// The state declined; the next state down the stack gets a chance.
    NotHandled,
}

impl EventResult {
    /// Returns true if the event was consumed.
    #[inline]
    pub const fn is_handled(self) -> bool {
        matches!(self, EventResult::Handled)
    }
}

/// Direction of a brightness or tint ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Brighter, or toward tint 254.
    #[default]
    Up,

    /// Dimmer, or toward tint 1.
    Down,
}

impl Direction {
    /// The opposite direction.
    #[inline]
    pub const fn reversed(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// `+1` for up, `-1` for down.
    #[inline]
    pub const fn sign(self) -> i16 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

/// How the caller's click-sequence accumulator should be rewritten after an
/// event, when a state hands the rest of a gesture to another state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceRewrite {
    /// Forget the sequence in progress so the new state sees nothing of it.
    Reset,

    /// Keep the physical hold going but report it as this event from now on.
    ContinueAs(Event),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_events_split_by_button_position() {
        assert!(Event::Press(2).is_button_down());
        assert!(Event::Hold(1).is_button_down());
        assert!(Event::Click(4).is_button_up());
        assert!(Event::HoldRelease(3).is_button_up());
        assert!(!Event::Tick.is_button_down());
        assert!(!Event::Tick.is_button_up());
        assert_eq!(Event::Hold(7).clicks(), Some(7));
        assert_eq!(Event::TemperatureLow.clicks(), None);
    }

    #[test]
    fn direction_reverses() {
        assert_eq!(Direction::Up.reversed(), Direction::Down);
        assert_eq!(Direction::Down.sign(), -1);
        assert_eq!(Direction::default(), Direction::Up);
    }
}
