//! Timer configuration register bits.

use bitflags::bitflags;

use crate::hal::timer::TimerMode;

pub const START_BIT: u32 = 0;
pub const MODE_BIT: u32 = 1;
pub const PWM_ENABLE_BIT: u32 = 2;
pub const IRQ_MASK_BIT: u32 = 3;

bitflags! {
    /// Config register word.
    ///
    /// | Bit | Flag |
    /// |-----|------|
    /// | 0 | `START` |
    /// | 1 | `MODE` (set = hold, clear = wrap) |
    /// | 2 | `PWM_ENABLE` |
    /// | 3 | `IRQ_MASK` (set = overflow interrupt enabled) |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TimerControl: u32 {
        const START = 1 << START_BIT;
        const MODE = 1 << MODE_BIT;
        const PWM_ENABLE = 1 << PWM_ENABLE_BIT;
        const IRQ_MASK = 1 << IRQ_MASK_BIT;
    }
}

impl TimerControl {
    /// Pack four flag fields into a control word.
    ///
    /// Only bit 0 of each argument is used; higher bits are discarded.
    pub const fn encode(start: u32, mode: u32, pwm_enable: u32, irq_mask: u32) -> Self {
        Self::from_bits_retain(
            ((start & 0x1) << START_BIT)
                | ((mode & 0x1) << MODE_BIT)
                | ((pwm_enable & 0x1) << PWM_ENABLE_BIT)
                | ((irq_mask & 0x1) << IRQ_MASK_BIT),
        )
    }

    /// Decode a register word. Bits above bit 3 are dropped.
    pub const fn from_word(word: u32) -> Self {
        Self::from_bits_truncate(word)
    }

    pub const fn word(self) -> u32 {
        self.bits()
    }

    pub const fn start(self) -> bool {
        self.bits() & Self::START.bits() != 0
    }

    pub const fn mode(self) -> TimerMode {
        if self.bits() & Self::MODE.bits() != 0 {
            TimerMode::Hold
        } else {
            TimerMode::Wrap
        }
    }

    pub const fn pwm_enabled(self) -> bool {
        self.bits() & Self::PWM_ENABLE.bits() != 0
    }

    pub const fn irq_enabled(self) -> bool {
        self.bits() & Self::IRQ_MASK.bits() != 0
    }

    /// Same flags with the mode bit set for `mode`.
    pub const fn with_mode(self, mode: TimerMode) -> Self {
        match mode {
            TimerMode::Hold => Self::from_bits_retain(self.bits() | Self::MODE.bits()),
            TimerMode::Wrap => Self::from_bits_retain(self.bits() & !Self::MODE.bits()),
        }
    }
}
