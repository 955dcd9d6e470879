//! Shared register-access plumbing for the peripheral drivers.
//!
//! # Module Organization
//!
//! - [`mmio`]: The [`RegisterBus`] capability and the volatile backend
//! - `sim`: Recording in-memory bus (only with the `sim` feature or in tests)

#![cfg_attr(not(test), no_std)]

pub mod mmio;

cfg_if::cfg_if! {
    if #[cfg(any(test, feature = "sim"))] {
        extern crate alloc;

        pub mod sim;
        pub use sim::{Access, AccessKind, AccessLog, MemoryBus};
    }
}

pub use mmio::{RegisterBus, Volatile, word_offset};
