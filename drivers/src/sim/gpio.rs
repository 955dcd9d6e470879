use alloc::vec::Vec;
use common::mmio::RegisterBus;
use common::sim::{Access, AccessKind, AccessLog};
use spin::Mutex;

use super::block_offset;
use crate::peripheral::gpio::GpioRegister;

#[derive(Default)]
struct GpioState {
    direction: u32,
    latch: u32,
    irq_mask: u32,
    rise_mask: u32,
    fall_mask: u32,
    status: u32,
    inputs: u32,
    log: AccessLog,
}

impl GpioState {
    fn pins(&self) -> u32 {
        (self.latch & self.direction) | (self.inputs & !self.direction)
    }
}

/// GPIO port model.
///
/// - Set, clear and toggle act on the output latch and read as zero.
/// - Pins read the latch on outputs and the driven level on inputs.
/// - Edges on input pins, filtered by the rise/fall masks and gated by the
///   interrupt mask, latch into IRQ status.
/// - Reading IRQ status returns the latched bits and clears all of them.
///   Writes to it have no effect.
pub struct GpioSim {
    base: usize,
    state: Mutex<GpioState>,
}

impl GpioSim {
    pub fn new(base: usize) -> Self {
        Self {
            base,
            state: Mutex::new(GpioState::default()),
        }
    }

    pub fn base(&self) -> usize {
        self.base
    }

    /// Drive the external level of every pin.
    ///
    /// Only pins configured as inputs are observed, and only their
    /// transitions can latch interrupt status.
    pub fn drive_inputs(&self, levels: u32) {
        let mut state = self.state.lock();
        let inputs = !state.direction;
        let old = state.inputs & inputs;
        let new = levels & inputs;

        let rising = !old & new & state.rise_mask;
        let falling = old & !new & state.fall_mask;
        state.status |= (rising | falling) & state.irq_mask;
        state.inputs = levels;
    }

    /// Output latch as modified by load/set/clear/toggle.
    pub fn latch(&self) -> u32 {
        self.state.lock().latch
    }

    /// Latched interrupt status, without a logged access.
    pub fn status(&self) -> u32 {
        self.state.lock().status
    }

    /// Interrupt output line.
    pub fn irq_line(&self) -> bool {
        self.state.lock().status != 0
    }

    pub fn writes(&self) -> Vec<Access> {
        self.state.lock().log.writes()
    }

    pub fn reads(&self) -> Vec<Access> {
        self.state.lock().log.reads()
    }

    /// Registers written, oldest first. Writes outside the block are skipped.
    pub fn written_registers(&self) -> Vec<GpioRegister> {
        self.writes()
            .iter()
            .filter_map(|access| self.register_at(access.addr))
            .collect()
    }

    pub fn clear_log(&self) {
        self.state.lock().log.clear();
    }

    fn register_at(&self, addr: usize) -> Option<GpioRegister> {
        block_offset(self.base, addr).and_then(GpioRegister::from_offset)
    }
}

impl RegisterBus for &GpioSim {
    fn read32(&self, addr: usize) -> u32 {
        let reg = self.register_at(addr);
        let mut state = self.state.lock();

        let value = match reg {
            Some(GpioRegister::Direction) => state.direction,
            Some(GpioRegister::OutputLoad) => state.latch,
            Some(GpioRegister::OutputSet)
            | Some(GpioRegister::OutputClear)
            | Some(GpioRegister::OutputToggle) => 0,
            Some(GpioRegister::IrqMask) => state.irq_mask,
            Some(GpioRegister::RiseMask) => state.rise_mask,
            Some(GpioRegister::FallMask) => state.fall_mask,
            Some(GpioRegister::IrqStatus) => core::mem::take(&mut state.status),
            Some(GpioRegister::Pins) => state.pins(),
            None => 0,
        };

        state.log.record(AccessKind::Read, addr, value);
        value
    }

    fn write32(&mut self, addr: usize, value: u32) {
        let reg = self.register_at(addr);
        let mut state = self.state.lock();

        match reg {
            Some(GpioRegister::Direction) => state.direction = value,
            Some(GpioRegister::OutputLoad) => state.latch = value,
            Some(GpioRegister::OutputSet) => state.latch |= value,
            Some(GpioRegister::OutputClear) => state.latch &= !value,
            Some(GpioRegister::OutputToggle) => state.latch ^= value,
            Some(GpioRegister::IrqMask) => state.irq_mask = value,
            Some(GpioRegister::RiseMask) => state.rise_mask = value,
            Some(GpioRegister::FallMask) => state.fall_mask = value,
            Some(GpioRegister::IrqStatus) | Some(GpioRegister::Pins) | None => {}
        }

        state.log.record(AccessKind::Write, addr, value);
    }
}
