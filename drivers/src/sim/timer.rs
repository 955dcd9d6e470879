use alloc::vec::Vec;
use common::mmio::RegisterBus;
use common::sim::{Access, AccessKind, AccessLog};
use spin::Mutex;

use super::block_offset;
use crate::hal::timer::TimerMode;
use crate::peripheral::timer::{TimerControl, TimerRegister};

struct TimerState {
    control: TimerControl,
    counter: u32,
    top: u32,
    duty: u32,
    prescaler: u32,
    /// Input clocks seen since the last tick.
    divider: u32,
    overflow: bool,
    log: AccessLog,
}

impl TimerState {
    const fn reset() -> Self {
        Self {
            control: TimerControl::empty(),
            counter: 0,
            top: u32::MAX,
            duty: 0,
            prescaler: 0,
            divider: 0,
            overflow: false,
            log: AccessLog::new(),
        }
    }

    fn clock(&mut self) {
        if !self.control.start() {
            return;
        }
        if self.divider < self.prescaler {
            self.divider += 1;
            return;
        }
        self.divider = 0;
        self.tick();
    }

    /// The overflow comparator (`counter >= top`) is sampled on the tick.
    fn tick(&mut self) {
        if self.counter >= self.top {
            self.overflow = true;
            if self.control.mode() == TimerMode::Wrap {
                self.counter = 0;
            }
            return;
        }

        self.counter += 1;
    }

    fn pwm(&self) -> bool {
        self.control.pwm_enabled() && self.counter < self.duty
    }
}

/// Timer/PWM model.
///
/// - The counter advances once every `prescaler + 1` clocks while started.
/// - A tick that finds the counter at or above top latches overflow. Hold
///   mode then stays put, wrap mode returns to zero on that same tick.
/// - Counter reset zeroes the counter and the prescaler phase.
/// - Reading status returns the overflow latch and clears it.
/// - PWM reads 1 while enabled and the counter is below duty.
/// - The config register keeps only the four defined bits.
///
/// Top comes out of reset as `u32::MAX`.
pub struct TimerSim {
    base: usize,
    state: Mutex<TimerState>,
}

impl TimerSim {
    pub fn new(base: usize) -> Self {
        Self {
            base,
            state: Mutex::new(TimerState::reset()),
        }
    }

    pub fn base(&self) -> usize {
        self.base
    }

    /// Advance the model by `cycles` input clocks.
    pub fn clock(&self, cycles: u32) {
        let mut state = self.state.lock();
        for _ in 0..cycles {
            state.clock();
        }
    }

    /// Counter value, without a logged access.
    pub fn counter(&self) -> u32 {
        self.state.lock().counter
    }

    /// Interrupt output line: overflow latched with the interrupt enabled.
    pub fn irq_line(&self) -> bool {
        let state = self.state.lock();
        state.overflow && state.control.irq_enabled()
    }

    pub fn writes(&self) -> Vec<Access> {
        self.state.lock().log.writes()
    }

    pub fn reads(&self) -> Vec<Access> {
        self.state.lock().log.reads()
    }

    /// Registers written, oldest first. Writes outside the block are skipped.
    pub fn written_registers(&self) -> Vec<TimerRegister> {
        self.writes()
            .iter()
            .filter_map(|access| self.register_at(access.addr))
            .collect()
    }

    pub fn clear_log(&self) {
        self.state.lock().log.clear();
    }

    fn register_at(&self, addr: usize) -> Option<TimerRegister> {
        block_offset(self.base, addr).and_then(TimerRegister::from_offset)
    }
}

impl RegisterBus for &TimerSim {
    fn read32(&self, addr: usize) -> u32 {
        let reg = self.register_at(addr);
        let mut state = self.state.lock();

        let value = match reg {
            Some(TimerRegister::Config) => state.control.word(),
            Some(TimerRegister::Counter) => state.counter,
            Some(TimerRegister::Top) => state.top,
            Some(TimerRegister::Duty) => state.duty,
            Some(TimerRegister::Prescaler) => state.prescaler,
            Some(TimerRegister::Pwm) => state.pwm() as u32,
            Some(TimerRegister::Status) => {
                let overflow = state.overflow;
                state.overflow = false;
                overflow as u32
            }
            Some(TimerRegister::CounterReset) | None => 0,
        };

        state.log.record(AccessKind::Read, addr, value);
        value
    }

    fn write32(&mut self, addr: usize, value: u32) {
        let reg = self.register_at(addr);
        let mut state = self.state.lock();

        match reg {
            Some(TimerRegister::Config) => state.control = TimerControl::from_word(value),
            Some(TimerRegister::Counter) => state.counter = value,
            Some(TimerRegister::CounterReset) => {
                state.counter = 0;
                state.divider = 0;
            }
            Some(TimerRegister::Top) => state.top = value,
            Some(TimerRegister::Duty) => state.duty = value,
            Some(TimerRegister::Prescaler) => state.prescaler = value,
            Some(TimerRegister::Status) | Some(TimerRegister::Pwm) | None => {}
        }

        state.log.record(AccessKind::Write, addr, value);
    }
}
