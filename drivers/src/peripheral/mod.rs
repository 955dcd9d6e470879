//! Peripheral Drivers
//!
//! Each driver owns a [`common::RegisterBus`] and the base address of its
//! register block.
//!
//! # Available Peripherals
//!
//! - [`gpio`]: 32-bit GPIO port
//! - [`timer`]: Timer/PWM

pub mod gpio;
pub mod timer;
