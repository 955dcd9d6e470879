//! Timer Hardware Abstraction Layer.
//!
//! This module defines platform-independent traits for counter/PWM timers.

/// Counter behaviour when it reaches the top value.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TimerMode {
    /// Restart from zero after reaching top.
    #[default]
    Wrap = 0,
    /// Stop at top until reset or reloaded.
    Hold = 1,
}

impl From<bool> for TimerMode {
    fn from(hold: bool) -> Self {
        if hold { TimerMode::Hold } else { TimerMode::Wrap }
    }
}

/// Hardware PWM timer trait.
///
/// This trait represents a single up-counting timer with a programmable
/// period (top) and a PWM compare (duty).
pub trait PwmTimer {
    /// Error type for timer operations.
    type Error: core::fmt::Debug;

    /// Let the counter run.
    fn start(&mut self) -> Result<(), Self::Error>;

    /// Freeze the counter at its current value.
    fn stop(&mut self) -> Result<(), Self::Error>;

    /// Set the counter period.
    fn set_period(&mut self, top: u32) -> Result<(), Self::Error>;

    /// Set the PWM compare value. The output is high while the counter is
    /// below `duty`.
    fn set_duty(&mut self, duty: u32) -> Result<(), Self::Error>;

    /// Read the current counter value.
    fn counter(&self) -> u32;

    /// Check whether the counter reached top since the last check.
    ///
    /// On hardware the status register is read-to-clear.
    fn overflowed(&self) -> bool;

    /// Current PWM output level.
    fn pwm_high(&self) -> bool;
}
