//! In-memory register file for host-side testing.
//!
//! [`MemoryBus`] behaves like plain RAM: words hold whatever was last
//! written and unwritten words read as zero. Every access is appended to an
//! [`AccessLog`] with a monotonically increasing sequence number, which is
//! what tests use to observe write ordering.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use spin::Mutex;

use crate::mmio::RegisterBus;

/// Direction of a recorded bus access.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

/// One recorded bus access.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Access {
    /// Position in the global access order, starting at 0.
    pub seq: u64,
    pub kind: AccessKind,
    /// Absolute address.
    pub addr: usize,
    /// Value written, or value returned by the read.
    pub value: u32,
}

/// Ordered record of bus accesses.
#[derive(Debug, Default)]
pub struct AccessLog {
    entries: Vec<Access>,
    next_seq: u64,
}

impl AccessLog {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    /// Append an access and return its sequence number.
    pub fn record(&mut self, kind: AccessKind, addr: usize, value: u32) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Access {
            seq,
            kind,
            addr,
            value,
        });
        seq
    }

    pub fn entries(&self) -> &[Access] {
        &self.entries
    }

    /// All writes, oldest first.
    pub fn writes(&self) -> Vec<Access> {
        self.of_kind(AccessKind::Write)
    }

    /// All reads, oldest first.
    pub fn reads(&self) -> Vec<Access> {
        self.of_kind(AccessKind::Read)
    }

    /// Forget recorded accesses. Sequence numbers keep increasing.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn of_kind(&self, kind: AccessKind) -> Vec<Access> {
        self.entries
            .iter()
            .filter(|access| access.kind == kind)
            .copied()
            .collect()
    }
}

struct MemoryState {
    words: BTreeMap<usize, u32>,
    log: AccessLog,
}

/// Plain-storage register file with an access log.
///
/// `&MemoryBus` implements [`RegisterBus`], so a test can hand a shared
/// reference to a driver and still inspect the bus afterwards.
pub struct MemoryBus {
    state: Mutex<MemoryState>,
}

impl MemoryBus {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                words: BTreeMap::new(),
                log: AccessLog::new(),
            }),
        }
    }

    /// Current content of `addr`, without recording an access.
    pub fn peek(&self, addr: usize) -> u32 {
        self.state.lock().words.get(&addr).copied().unwrap_or(0)
    }

    /// Preload `addr`, without recording an access.
    pub fn poke(&self, addr: usize, value: u32) {
        self.state.lock().words.insert(addr, value);
    }

    pub fn writes(&self) -> Vec<Access> {
        self.state.lock().log.writes()
    }

    pub fn reads(&self) -> Vec<Access> {
        self.state.lock().log.reads()
    }

    /// Writes that targeted `addr`, oldest first.
    pub fn writes_to(&self, addr: usize) -> Vec<Access> {
        self.writes()
            .into_iter()
            .filter(|access| access.addr == addr)
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.writes().len()
    }

    pub fn clear_log(&self) {
        self.state.lock().log.clear();
    }
}

impl Default for MemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for &MemoryBus {
    fn read32(&self, addr: usize) -> u32 {
        let mut state = self.state.lock();
        let value = state.words.get(&addr).copied().unwrap_or(0);
        state.log.record(AccessKind::Read, addr, value);
        value
    }

    fn write32(&mut self, addr: usize, value: u32) {
        let mut state = self.state.lock();
        state.words.insert(addr, value);
        state.log.record(AccessKind::Write, addr, value);
    }
}
