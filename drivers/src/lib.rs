//! GPIO and Timer/PWM register drivers.
//!
//! This crate provides a layered architecture for two memory-mapped
//! peripherals:
//!
//! # Module Organization
//!
//! - [`hal`]: Platform-independent trait definitions
//! - [`peripheral`]: The GPIO and Timer/PWM drivers
//! - [`platform`]: Default base addresses and their build-time overrides
//! - `sim`: Behavioural register doubles (`sim` feature, or in tests)
//!
//! # Testing
//!
//! Unit tests and `tests/register_contract.rs` run with a plain `cargo test`.
//! `tests/simulated_peripherals.rs` drives the behavioural doubles from
//! outside the crate and is only built with the `sim` feature:
//!
//! ```text
//! cargo test -p periph-drivers --features sim
//! ```
//!
//! # Design Principles
//!
//! 1. **One access per call**: every setter is one store, every getter one load
//! 2. **Injected bus**: drivers own a [`common::RegisterBus`] and a base address
//!    instead of reaching for a global
//! 3. **No validation**: masks and values go to hardware as given
//!
//! # Usage Example
//!
//! ```no_run
//! use periph_drivers::peripheral::gpio::{Gpio, GpioConfig};
//! use periph_drivers::peripheral::timer::{Timer, TimerConfig};
//!
//! let mut gpio = unsafe { Gpio::at_default() };
//! gpio.init(gpio.base(), Some(&GpioConfig::new(0xFF, 0, 0, 0)));
//! gpio.toggle_pins(0x1);
//!
//! let mut timer = unsafe { Timer::at_default() };
//! timer.configure(timer.base(), Some(&TimerConfig::new().with_top(999).with_start(true)));
//! ```

#![cfg_attr(not(test), no_std)]

pub mod hal;
pub mod peripheral;
pub mod platform;

cfg_if::cfg_if! {
    if #[cfg(any(test, feature = "sim"))] {
        extern crate alloc;

        pub mod sim;
    }
}

// Re-export commonly used types
pub use hal::gpio::{GpioInterrupts, GpioPort, PinLevel};
pub use hal::timer::{PwmTimer, TimerMode};
pub use peripheral::gpio::{Gpio, GpioConfig};
pub use peripheral::timer::{Timer, TimerConfig, TimerControl};
pub use platform::{DEFAULT_MAP, MemoryMap};
