//! 32-bit GPIO port driver.
//!
//! The port exposes ten word-aligned registers. Output set, clear and
//! toggle are separate write-only registers that the hardware applies to
//! the output latch, so none of the driver's operations reads before it
//! writes.
//!
//! # Example
//!
//! ```no_run
//! use periph_drivers::peripheral::gpio::{Gpio, GpioConfig};
//!
//! let mut gpio = unsafe { Gpio::at_default() };
//! gpio.init(0x4000_0000, Some(&GpioConfig::new(0x0000_00FF, 0, 0, 0)));
//! gpio.set_pins(1 << 3);
//! ```

use common::mmio::{RegisterBus, Volatile, word_offset};

use crate::hal::gpio::{EdgeDetect, GpioError, GpioInterrupts, GpioPort, pin_mask};
use crate::platform::DEFAULT_MAP;

/// GPIO register map.
///
/// The discriminant is the word index from the port base.
#[repr(usize)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GpioRegister {
    /// Pin direction, 1 = output (R/W).
    Direction = 0,
    /// Output latch (R/W).
    OutputLoad = 1,
    /// Set latch bits (W).
    OutputSet = 2,
    /// Clear latch bits (W).
    OutputClear = 3,
    /// Invert latch bits (W).
    OutputToggle = 4,
    /// Interrupt enable per pin (R/W).
    IrqMask = 5,
    /// Rising-edge detect enable (R/W).
    RiseMask = 6,
    /// Falling-edge detect enable (R/W).
    FallMask = 7,
    /// Latched interrupt status (R), cleared by the read.
    IrqStatus = 8,
    /// Raw pin levels (R).
    Pins = 9,
}

impl GpioRegister {
    pub const ALL: [GpioRegister; 10] = [
        GpioRegister::Direction,
        GpioRegister::OutputLoad,
        GpioRegister::OutputSet,
        GpioRegister::OutputClear,
        GpioRegister::OutputToggle,
        GpioRegister::IrqMask,
        GpioRegister::RiseMask,
        GpioRegister::FallMask,
        GpioRegister::IrqStatus,
        GpioRegister::Pins,
    ];

    /// Byte offset from the port base.
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
    while i < GpioRegister::ALL.len() {
        assert!(GpioRegister::ALL[i] as usize == i);
        i += 1;
    }
};

/// Port configuration applied by [`Gpio::init`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GpioConfig {
    /// 1 = output, 0 = input.
    pub direction: u32,
    /// 1 = interrupt enabled.
    pub irq_mask: u32,
    /// 1 = rising edge detected.
    pub irq_rise_mask: u32,
    /// 1 = falling edge detected.
    pub irq_fall_mask: u32,
}

impl GpioConfig {
    pub const fn new(direction: u32, irq_mask: u32, irq_rise_mask: u32, irq_fall_mask: u32) -> Self {
        Self {
            direction,
            irq_mask,
            irq_rise_mask,
            irq_fall_mask,
        }
    }
}

/// GPIO port driver.
pub struct Gpio<B: RegisterBus> {
    bus: B,
    base: usize,
}

impl Gpio<Volatile> {
    /// Driver for the port at the build's default GPIO base.
    ///
    /// # Safety
    ///
    /// [`DEFAULT_MAP`]'s GPIO block must be mapped device memory and no other
    /// driver instance may access it concurrently.
    pub const unsafe fn at_default() -> Self {
        Self::new(unsafe { Volatile::new() }, DEFAULT_MAP.gpio_base)
    }
}

impl<B: RegisterBus> Gpio<B> {
    /// Bind a driver to the register block at `base`. No register is touched.
    pub const fn new(bus: B, base: usize) -> Self {
        Self { bus, base }
    }

    /// Retarget the driver to `base` and, if `config` is given, program
    /// direction, interrupt mask, rising mask and falling mask in that order.
    pub fn init(&mut self, base: usize, config: Option<&GpioConfig>) {
        self.base = base;

        let Some(cfg) = config else {
            log::debug!("gpio: base {:#x}, no configuration", base);
            return;
        };

        self.write_reg(GpioRegister::Direction, cfg.direction);
        self.write_reg(GpioRegister::IrqMask, cfg.irq_mask);
        self.write_reg(GpioRegister::RiseMask, cfg.irq_rise_mask);
        self.write_reg(GpioRegister::FallMask, cfg.irq_fall_mask);

        log::debug!(
            "gpio: base {:#x}, dir {:#010x} irq {:#010x} rise {:#010x} fall {:#010x}",
            base,
            cfg.direction,
            cfg.irq_mask,
            cfg.irq_rise_mask,
            cfg.irq_fall_mask
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
    fn read_reg(&self, reg: GpioRegister) -> u32 {
        self.bus.read32(self.base.wrapping_add(reg.offset()))
    }

    #[inline]
    fn write_reg(&mut self, reg: GpioRegister, value: u32) {
        self.bus.write32(self.base.wrapping_add(reg.offset()), value)
    }

    // ========================================================================
    // Direction and output
    // ========================================================================

    /// Set the direction of all pins: 1 = output, 0 = input.
    pub fn set_direction(&mut self, mask: u32) {
        self.write_reg(GpioRegister::Direction, mask);
    }

    /// Load the whole output latch with `value`.
    pub fn load_pins(&mut self, value: u32) {
        self.write_reg(GpioRegister::OutputLoad, value);
    }

    /// Set the selected latch bits to 1.
    pub fn set_pins(&mut self, mask: u32) {
        self.write_reg(GpioRegister::OutputSet, mask);
    }

    /// Clear the selected latch bits to 0.
    pub fn clear_pins(&mut self, mask: u32) {
        self.write_reg(GpioRegister::OutputClear, mask);
    }

    /// Invert the selected latch bits.
    pub fn toggle_pins(&mut self, mask: u32) {
        self.write_reg(GpioRegister::OutputToggle, mask);
    }

    // ========================================================================
    // Interrupt configuration
    // ========================================================================

    pub fn irq_set_mask(&mut self, mask: u32) {
        self.write_reg(GpioRegister::IrqMask, mask);
    }

    pub fn irq_set_rise_mask(&mut self, mask: u32) {
        self.write_reg(GpioRegister::RiseMask, mask);
    }

    pub fn irq_set_fall_mask(&mut self, mask: u32) {
        self.write_reg(GpioRegister::FallMask, mask);
    }

    // ========================================================================
    // Read-back
    // ========================================================================

    pub fn read_dir(&self) -> u32 {
        self.read_reg(GpioRegister::Direction)
    }

    /// Output latch as last loaded and modified by set/clear/toggle.
    pub fn read_output(&self) -> u32 {
        self.read_reg(GpioRegister::OutputLoad)
    }

    /// Raw pin levels.
    pub fn read_pins(&self) -> u32 {
        self.read_reg(GpioRegister::Pins)
    }

    pub fn read_irq_mask(&self) -> u32 {
        self.read_reg(GpioRegister::IrqMask)
    }

    pub fn read_irq_rise_mask(&self) -> u32 {
        self.read_reg(GpioRegister::RiseMask)
    }

    pub fn read_irq_fall_mask(&self) -> u32 {
        self.read_reg(GpioRegister::FallMask)
    }

    /// Latched interrupt status: 1 = active.
    ///
    /// The read clears every latched bit and drops the interrupt line.
    pub fn read_irq_status(&self) -> u32 {
        let status = self.read_reg(GpioRegister::IrqStatus);
        log::trace!("gpio: irq status {:#010x}", status);
        status
    }
}

// ============================================================================
// HAL Implementation
// ============================================================================

impl<B: RegisterBus> GpioPort for Gpio<B> {
    fn write_direction(&mut self, mask: u32) {
        self.set_direction(mask);
    }

    fn write_output(&mut self, value: u32) {
        self.load_pins(value);
    }

    fn set_mask(&mut self, mask: u32) {
        self.set_pins(mask);
    }

    fn clear_mask(&mut self, mask: u32) {
        self.clear_pins(mask);
    }

    fn toggle_mask(&mut self, mask: u32) {
        self.toggle_pins(mask);
    }

    fn output(&self) -> u32 {
        self.read_output()
    }

    fn pins(&self) -> u32 {
        self.read_pins()
    }
}

impl<B: RegisterBus> GpioInterrupts for Gpio<B> {
    fn enable_edge_detect(&mut self, pin: u8, edge: EdgeDetect) -> Result<(), GpioError> {
        let bit = pin_mask(pin)?;

        if matches!(edge, EdgeDetect::Rising | EdgeDetect::Both) {
            let rise = self.read_irq_rise_mask();
            self.irq_set_rise_mask(rise | bit);
        }
        if matches!(edge, EdgeDetect::Falling | EdgeDetect::Both) {
            let fall = self.read_irq_fall_mask();
            self.irq_set_fall_mask(fall | bit);
        }

        let mask = self.read_irq_mask();
        self.irq_set_mask(mask | bit);
        Ok(())
    }

    fn disable_edge_detect(&mut self, pin: u8) -> Result<(), GpioError> {
        let bit = pin_mask(pin)?;

        let mask = self.read_irq_mask();
        self.irq_set_mask(mask & !bit);
        let rise = self.read_irq_rise_mask();
        self.irq_set_rise_mask(rise & !bit);
        let fall = self.read_irq_fall_mask();
        self.irq_set_fall_mask(fall & !bit);
        Ok(())
    }

    fn take_events(&self) -> u32 {
        self.read_irq_status()
    }
}

#[cfg(test)]
mod tests;
