//! Default memory map.
//!
//! Base addresses can be overridden at build time through the
//! `PERIPH_GPIO_BASE` and `PERIPH_TIMER_BASE` environment variables, given
//! in decimal or `0x`-prefixed hex (underscores allowed). A value that does
//! not parse fails the build.
//!
//! ```text
//! PERIPH_GPIO_BASE=0x4001_0000 cargo build
//! ```

/// GPIO base when no override is given.
pub const GPIO_BASE_DEFAULT: usize = 0x4000_0000;

/// Timer base when no override is given.
pub const TIMER_BASE_DEFAULT: usize = 0x3000;

/// GPIO base address in effect for this build.
pub const GPIO_BASE: usize = base_or(option_env!("PERIPH_GPIO_BASE"), GPIO_BASE_DEFAULT);

/// Timer base address in effect for this build.
pub const TIMER_BASE: usize = base_or(option_env!("PERIPH_TIMER_BASE"), TIMER_BASE_DEFAULT);

/// Platform memory map information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryMap {
    /// Start of the GPIO register block
    pub gpio_base: usize,
    /// Start of the timer register block
    pub timer_base: usize,
}

/// Memory map built from [`GPIO_BASE`] and [`TIMER_BASE`].
pub const DEFAULT_MAP: MemoryMap = MemoryMap {
    gpio_base: GPIO_BASE,
    timer_base: TIMER_BASE,
};

const fn base_or(value: Option<&str>, default: usize) -> usize {
    match value {
        Some(text) => parse_address(text),
        None => default,
    }
}

/// Parse a decimal or `0x` hex address.
///
/// Only evaluated in constants, so malformed input fails the build rather
/// than panicking at run time.
pub(crate) const fn parse_address(text: &str) -> usize {
    let bytes = text.as_bytes();
    let (radix, mut i) = if bytes.len() > 2 && bytes[0] == b'0' && (bytes[1] | 0x20) == b'x' {
        (16, 2)
    } else {
        (10, 0)
    };

    if i == bytes.len() {
        panic!("empty base address");
    }

    let mut value: usize = 0;
    while i < bytes.len() {
        let byte = bytes[i];
        i += 1;

        let digit = match byte {
            b'_' => continue,
            b'0'..=b'9' => (byte - b'0') as usize,
            b'a'..=b'f' => (byte - b'a' + 10) as usize,
            b'A'..=b'F' => (byte - b'A' + 10) as usize,
            _ => panic!("invalid character in base address"),
        };
        if digit >= radix {
            panic!("invalid digit in base address");
        }

        value = match value.checked_mul(radix) {
            Some(v) => v,
            None => panic!("base address overflows usize"),
        };
        value = match value.checked_add(digit) {
            Some(v) => v,
            None => panic!("base address overflows usize"),
        };
    }

    value
}
