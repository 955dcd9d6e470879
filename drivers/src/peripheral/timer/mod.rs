//! Timer/PWM peripheral driver.
//!
//! An up-counter with a prescaled tick, a programmable top (period) and a
//! PWM compare (duty). The four control flags share one config register,
//! see [`TimerControl`].
//!
//! # Example
//!
//! ```no_run
//! use periph_drivers::peripheral::timer::{Timer, TimerConfig};
//!
//! let mut timer = unsafe { Timer::at_default() };
//! let config = TimerConfig::new()
//!     .with_prescaler(4)
//!     .with_top(99)
//!     .with_duty(25)
//!     .with_pwm(true)
//!     .with_start(true);
//! timer.configure(0x3000, Some(&config));
//! ```

mod control;

pub use control::{IRQ_MASK_BIT, MODE_BIT, PWM_ENABLE_BIT, START_BIT, TimerControl};

use common::mmio::{RegisterBus, Volatile, word_offset};

use crate::hal::timer::{PwmTimer, TimerMode};
use crate::platform::DEFAULT_MAP;

/// Timer register map.
///
/// The discriminant is the word index from the timer base.
#[repr(usize)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerRegister {
    /// Packed control flags (R/W).
    Config = 0,
    /// Counter load on write, current count on read (R/W).
    Counter = 1,
    /// Any write resets the counter (W).
    CounterReset = 2,
    /// Counter period (R/W).
    Top = 3,
    /// PWM compare (R/W).
    Duty = 4,
    /// Overflow status (R).
    Status = 5,
    /// PWM output level (R).
    Pwm = 6,
    /// Tick divider (R/W).
    Prescaler = 7,
}

impl TimerRegister {
    pub const ALL: [TimerRegister; 8] = [
        TimerRegister::Config,
        TimerRegister::Counter,
        TimerRegister::CounterReset,
        TimerRegister::Top,
        TimerRegister::Duty,
        TimerRegister::Status,
        TimerRegister::Pwm,
        TimerRegister::Prescaler,
    ];

    /// Byte offset from the timer base.
    #[inline(always)]
    pub const fn offset(self) -> usize {
        word_offset(self as usize)
    }

    /// Register at byte `offset`, if any.
    pub const fn from_offset(offset: usize) -> Option<Self> {
        if offset & 0b11 != 0 {
            return None;
        }
        let index = offset >> 2;
        if index < Self::ALL.len() {
            Some(Self::ALL[index])
        } else {
            None
        }
    }
}

const _: () = {
    let mut i = 0;
    while i < TimerRegister::ALL.len() {
        assert!(TimerRegister::ALL[i] as usize == i);
        i += 1;
    }
};

/// Full timer setup applied by [`Timer::configure`].
///
/// The four flag fields are whole words; only their bit 0 reaches the
/// config register.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    /// 1 = counter runs.
    pub start: u32,
    /// 1 = hold at top, 0 = wrap.
    pub mode: u32,
    /// 1 = PWM output enabled.
    pub pwm_enable: u32,
    /// 1 = overflow interrupt enabled.
    pub irq_mask: u32,
    pub top: u32,
    pub duty: u32,
    pub prescaler: u32,
    /// Counter preload.
    pub initial_value: u32,
}

impl TimerConfig {
    pub const fn new() -> Self {
        Self {
            start: 0,
            mode: 0,
            pwm_enable: 0,
            irq_mask: 0,
            top: 0,
            duty: 0,
            prescaler: 0,
            initial_value: 0,
        }
    }

    pub const fn with_start(mut self, start: bool) -> Self {
        self.start = start as u32;
        self
    }

    pub const fn with_mode(mut self, mode: TimerMode) -> Self {
        self.mode = mode as u32;
        self
    }

    pub const fn with_pwm(mut self, enable: bool) -> Self {
        self.pwm_enable = enable as u32;
        self
    }

    pub const fn with_irq(mut self, enable: bool) -> Self {
        self.irq_mask = enable as u32;
        self
    }

    pub const fn with_top(mut self, top: u32) -> Self {
        self.top = top;
        self
    }

    pub const fn with_duty(mut self, duty: u32) -> Self {
        self.duty = duty;
        self
    }

    pub const fn with_prescaler(mut self, prescaler: u32) -> Self {
        self.prescaler = prescaler;
        self
    }

    pub const fn with_initial_value(mut self, value: u32) -> Self {
        self.initial_value = value;
        self
    }

    /// Flags packed as the config register expects them.
    pub const fn control(&self) -> TimerControl {
        TimerControl::encode(self.start, self.mode, self.pwm_enable, self.irq_mask)
    }

    pub const fn control_word(&self) -> u32 {
        self.control().word()
    }
}

/// Timer/PWM driver.
pub struct Timer<B: RegisterBus> {
    bus: B,
    base: usize,
}

impl Timer<Volatile> {
    /// Driver for the timer at the build's default timer base.
    ///
    /// # Safety
    ///
    /// [`DEFAULT_MAP`]'s timer block must be mapped device memory and no
    /// other driver instance may access it concurrently.
    pub const unsafe fn at_default() -> Self {
        Self::new(unsafe { Volatile::new() }, DEFAULT_MAP.timer_base)
    }
}

impl<B: RegisterBus> Timer<B> {
    /// Bind a driver to the register block at `base`. No register is touched.
    pub const fn new(bus: B, base: usize) -> Self {
        Self { bus, base }
    }

    /// Retarget the driver to `base` and, if `config` is given, program it.
    ///
    /// Write order is prescaler, top, duty, counter, then config. The tick
    /// domain must be settled before values counted in it are loaded, and
    /// the start bit must land after everything else.
    pub fn configure(&mut self, base: usize, config: Option<&TimerConfig>) {
        self.base = base;

        let Some(cfg) = config else {
            log::debug!("timer: base {:#x}, no configuration", base);
            return;
        };

        self.write_prescaler(cfg.prescaler);
        self.write_top(cfg.top);
        self.write_duty(cfg.duty);
        self.write_counter(cfg.initial_value);

        let control = cfg.control();
        self.write_config_reg(control.word());

        log::debug!(
            "timer: base {:#x}, prescaler {} top {} duty {} counter {} control {:?}",
            base,
            cfg.prescaler,
            cfg.top,
            cfg.duty,
            cfg.initial_value,
            control
        );
    }

    /// Current register block base.
    pub fn base(&self) -> usize {
        self.base
    }

    /// Give the bus back.
    pub fn release(self) -> B {
        self.bus
    }

    #[inline]
    fn read_reg(&self, reg: TimerRegister) -> u32 {
        self.bus.read32(self.base.wrapping_add(reg.offset()))
    }

    #[inline]
    fn write_reg(&mut self, reg: TimerRegister, value: u32) {
        self.bus.write32(self.base.wrapping_add(reg.offset()), value)
    }

    // ========================================================================
    // Writers
    // ========================================================================

    pub fn write_config_reg(&mut self, config_word: u32) {
        self.write_reg(TimerRegister::Config, config_word);
    }

    pub fn write_control(&mut self, control: TimerControl) {
        self.write_config_reg(control.word());
    }

    pub fn write_top(&mut self, top: u32) {
        self.write_reg(TimerRegister::Top, top);
    }

    pub fn write_duty(&mut self, duty: u32) {
        self.write_reg(TimerRegister::Duty, duty);
    }

    pub fn write_prescaler(&mut self, prescaler: u32) {
        self.write_reg(TimerRegister::Prescaler, prescaler);
    }

    /// Load the counter.
    pub fn write_counter(&mut self, value: u32) {
        self.write_reg(TimerRegister::Counter, value);
    }

    /// Pulse the counter reset register.
    pub fn reset_counter(&mut self) {
        log::trace!("timer: counter reset");
        self.write_reg(TimerRegister::CounterReset, 0);
    }

    // ========================================================================
    // Readers
    // ========================================================================

    pub fn read_counter(&self) -> u32 {
        self.read_reg(TimerRegister::Counter)
    }

    pub fn read_top(&self) -> u32 {
        self.read_reg(TimerRegister::Top)
    }

    pub fn read_duty(&self) -> u32 {
        self.read_reg(TimerRegister::Duty)
    }

    pub fn read_prescaler(&self) -> u32 {
        self.read_reg(TimerRegister::Prescaler)
    }

    pub fn read_config(&self) -> u32 {
        self.read_reg(TimerRegister::Config)
    }

    pub fn read_control(&self) -> TimerControl {
        TimerControl::from_word(self.read_config())
    }

    pub fn read_pwm(&self) -> u32 {
        self.read_reg(TimerRegister::Pwm)
    }

    /// Overflow status. The hardware clears it on read.
    pub fn read_status(&self) -> u32 {
        self.read_reg(TimerRegister::Status)
    }
}

// ============================================================================
// HAL Implementation
// ============================================================================

/// Timer errors (register operations are infallible).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimerError {}

impl<B: RegisterBus> PwmTimer for Timer<B> {
    type Error = TimerError;

    fn start(&mut self) -> Result<(), Self::Error> {
        let control = self.read_control();
        self.write_control(control | TimerControl::START);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        let control = self.read_control();
        self.write_control(control - TimerControl::START);
        Ok(())
    }

    fn set_period(&mut self, top: u32) -> Result<(), Self::Error> {
        self.write_top(top);
        Ok(())
    }

    fn set_duty(&mut self, duty: u32) -> Result<(), Self::Error> {
        self.write_duty(duty);
        Ok(())
    }

    fn counter(&self) -> u32 {
        self.read_counter()
    }

    fn overflowed(&self) -> bool {
        self.read_status() & 0x1 != 0
    }

    fn pwm_high(&self) -> bool {
        self.read_pwm() & 0x1 != 0
    }
}
