//! GPIO (General Purpose Input/Output) Hardware Abstraction Layer.
//!
//! This module defines platform-independent traits for a 32-pin GPIO port
//! whose registers operate on whole-port masks.

/// Number of pins on one port.
pub const PORT_WIDTH: u8 = 32;

/// Pin logic level.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PinLevel {
    /// Logic low (0V or ground).
    Low,
    /// Logic high.
    High,
}

impl From<bool> for PinLevel {
    fn from(value: bool) -> Self {
        if value {
            PinLevel::High
        } else {
            PinLevel::Low
        }
    }
}

impl From<PinLevel> for bool {
    fn from(level: PinLevel) -> bool {
        matches!(level, PinLevel::High)
    }
}

/// Event detection configuration for GPIO pins.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EdgeDetect {
    /// Detect rising edge (low-to-high transition).
    Rising,
    /// Detect falling edge (high-to-low transition).
    Falling,
    /// Detect both rising and falling edges.
    Both,
}

/// GPIO errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GpioError {
    /// The pin index is not below [`PORT_WIDTH`].
    InvalidPin,
}

/// Single-bit mask selecting `pin`.
pub fn pin_mask(pin: u8) -> Result<u32, GpioError> {
    if pin < PORT_WIDTH {
        Ok(1 << pin)
    } else {
        Err(GpioError::InvalidPin)
    }
}

/// Mask-level GPIO port.
///
/// Implementors map each required method onto one register access. The
/// per-pin helpers are built on top of those and never read-modify-write
/// the output latch, since set/clear/toggle are applied by hardware.
pub trait GpioPort {
    /// Write the direction mask (1 = output, 0 = input).
    fn write_direction(&mut self, mask: u32);

    /// Load the whole output latch.
    fn write_output(&mut self, value: u32);

    /// Drive the selected pins high.
    fn set_mask(&mut self, mask: u32);

    /// Drive the selected pins low.
    fn clear_mask(&mut self, mask: u32);

    /// Invert the selected pins.
    fn toggle_mask(&mut self, mask: u32);

    /// Read back the output latch.
    fn output(&self) -> u32;

    /// Read the raw pin levels.
    fn pins(&self) -> u32;

    /// Set a pin to logic high.
    fn set_high(&mut self, pin: u8) -> Result<(), GpioError> {
        self.set_mask(pin_mask(pin)?);
        Ok(())
    }

    /// Set a pin to logic low.
    fn set_low(&mut self, pin: u8) -> Result<(), GpioError> {
        self.clear_mask(pin_mask(pin)?);
        Ok(())
    }

    /// Set the pin to a specific level.
    fn set_level(&mut self, pin: u8, level: PinLevel) -> Result<(), GpioError> {
        match level {
            PinLevel::High => self.set_high(pin),
            PinLevel::Low => self.set_low(pin),
        }
    }

    /// Toggle the output state of a pin.
    fn toggle_pin(&mut self, pin: u8) -> Result<(), GpioError> {
        self.toggle_mask(pin_mask(pin)?);
        Ok(())
    }

    /// Read the current logic level of a pin.
    fn read_pin(&self, pin: u8) -> Result<PinLevel, GpioError> {
        let mask = pin_mask(pin)?;
        Ok(PinLevel::from(self.pins() & mask != 0))
    }
}

/// Extension trait for GPIO ports that support edge-triggered interrupts.
pub trait GpioInterrupts: GpioPort {
    /// Enable edge detection for a pin and unmask its interrupt.
    fn enable_edge_detect(&mut self, pin: u8, edge: EdgeDetect) -> Result<(), GpioError>;

    /// Disable edge detection for a pin and mask its interrupt.
    fn disable_edge_detect(&mut self, pin: u8) -> Result<(), GpioError>;

    /// Take every latched event, one bit per pin.
    ///
    /// Status is read-to-clear, so this consumes the events of all pins at
    /// once. Callers interested in several pins must test the returned mask
    /// rather than call this once per pin.
    fn take_events(&self) -> u32;

    /// Take all latched events and report whether `pin` was among them.
    fn take_event(&self, pin: u8) -> Result<bool, GpioError> {
        let bit = pin_mask(pin)?;
        Ok(self.take_events() & bit != 0)
    }
}
