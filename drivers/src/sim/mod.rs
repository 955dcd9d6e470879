//! Behavioural register doubles.
//!
//! These model the hardware side of each peripheral closely enough for the
//! drivers to be tested on a host: write-only registers act on internal
//! state, read-to-clear registers clear, and the timer counts when clocked.
//! Every bus access is logged with a sequence number through
//! [`common::sim::AccessLog`].
//!
//! A shared reference (`&GpioSim`, `&TimerSim`) is the bus handed to a
//! driver, so tests keep access to the double while the driver uses it.

mod gpio;
mod timer;

pub use gpio::GpioSim;
pub use timer::TimerSim;

pub use common::sim::{Access, AccessKind, MemoryBus};

/// Byte offset of `addr` inside a block at `base`, if it falls after it.
fn block_offset(base: usize, addr: usize) -> Option<usize> {
    addr.checked_sub(base)
}
