//! Memory-mapped register access.
//!
//! Drivers never dereference raw addresses themselves. Every load and store
//! goes through a [`RegisterBus`], so the same driver code runs against real
//! device memory ([`Volatile`]) or against an in-memory register file in
//! tests.

use core::ptr::{read_volatile, write_volatile};

/// Byte offset of the register at word `index` within a register block.
#[inline(always)]
pub const fn word_offset(index: usize) -> usize {
    index << 2
}

/// A 32-bit register bus.
///
/// Each call is exactly one access to `addr`. Implementations must not
/// cache, merge or reorder accesses.
pub trait RegisterBus {
    /// Load the 32-bit word at `addr`.
    fn read32(&self, addr: usize) -> u32;

    /// Store `value` to the 32-bit word at `addr`.
    fn write32(&mut self, addr: usize, value: u32);
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    #[inline]
    fn read32(&self, addr: usize) -> u32 {
        (**self).read32(addr)
    }

    #[inline]
    fn write32(&mut self, addr: usize, value: u32) {
        (**self).write32(addr, value)
    }
}

/// Production bus: every access is a single volatile load or store.
#[derive(Debug)]
pub struct Volatile {
    _private: (),
}

impl Volatile {
    /// Create the volatile bus.
    ///
    /// # Safety
    ///
    /// Every address later passed to [`RegisterBus::read32`] or
    /// [`RegisterBus::write32`] through this value must be a word-aligned
    /// location of mapped device memory, and the caller must serialise all
    /// access to each register block.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterBus for Volatile {
    #[inline(always)]
    fn read32(&self, addr: usize) -> u32 {
        // SAFETY: guaranteed by the contract of `Volatile::new`.
        unsafe { read_volatile(addr as *const u32) }
    }

    #[inline(always)]
    fn write32(&mut self, addr: usize, value: u32) {
        // SAFETY: guaranteed by the contract of `Volatile::new`.
        unsafe { write_volatile(addr as *mut u32, value) }
    }
}
