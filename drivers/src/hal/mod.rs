//! Hardware Abstraction Layer (HAL) - Platform-Independent Traits
//!
//! This module defines generic traits for interacting with the GPIO and
//! timer peripherals. The drivers in [`crate::peripheral`] implement them,
//! so application code can be written against the traits alone.
//!
//! # Available Interfaces
//!
//! - [`gpio`]: General Purpose Input/Output control
//! - [`timer`]: Counter and PWM timers

pub mod gpio;
pub mod timer;
