//! Build-time clock configuration.
//!
//! The `ClockConfig` trait fixes the CPU frequency and the timer prescale
//! divisor at compile time. Every derived constant (conversion strategy,
//! compare target, maximum span) is computed from these two values without
//! runtime overhead.

use crate::convert::Conversion;

/// Prescale divisors supported by the timer hardware.
///
/// The counter advances once every `divisor()` CPU cycles. Larger divisors
/// trade resolution for a longer span before the 16-bit counter wraps.
#[repr(u16)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Prescaler {
    /// CPU clock, undivided
    Div1 = 1,
    /// CPU clock / 8
    Div8 = 8,
    /// CPU clock / 64
    Div64 = 64,
    /// CPU clock / 256
    Div256 = 256,
    /// CPU clock / 1024
    Div1024 = 1024,
}

impl Prescaler {
    /// Every supported divisor, smallest first.
    pub const ALL: [Prescaler; 5] = [
        Prescaler::Div1,
        Prescaler::Div8,
        Prescaler::Div64,
        Prescaler::Div256,
        Prescaler::Div1024,
    ];

    /// Numeric divisor.
    pub const fn divisor(self) -> u32 {
        self as u32
    }

    /// Look up the variant for a numeric divisor.
    ///
    /// Returns `None` for divisors the hardware cannot be programmed with.
    pub const fn from_divisor(divisor: u32) -> Option<Self> {
        match divisor {
            1 => Some(Prescaler::Div1),
            8 => Some(Prescaler::Div8),
            64 => Some(Prescaler::Div64),
            256 => Some(Prescaler::Div256),
            1024 => Some(Prescaler::Div1024),
            _ => None,
        }
    }
}

/// Clock configuration trait.
///
/// Implementors supply `CPU_HZ` and `PRESCALER`; the remaining items are
/// provided. `CPU_HZ` must match the real hardware clock or every reading is
/// silently scaled wrong.
///
/// Use `#[derive(ClockConfig)]` to have the frequency and divisor checked when
/// the macro expands, or implement the trait by hand:
///
/// ```rust
/// use uptime_clock::config::{ClockConfig, Prescaler};
///
/// pub struct BoardClock;
///
/// impl ClockConfig for BoardClock {
///     const CPU_HZ: u32 = 8_000_000;
///     const PRESCALER: Prescaler = Prescaler::Div64;
/// }
///
/// assert_eq!(BoardClock::CONVERSION.compare_target(), 125);
/// ```
pub trait ClockConfig {
    /// CPU clock frequency in Hz (must be a whole number of MHz)
    const CPU_HZ: u32;

    /// Timer prescale divisor
    const PRESCALER: Prescaler;

    /// Conversion constants resolved from `CPU_HZ` and `PRESCALER`
    const CONVERSION: Conversion = Conversion::new(Self::CPU_HZ, Self::PRESCALER);

    /// Evaluating this constant fails compilation for an invalid configuration.
    const CHECK: () = match Self::CONVERSION.validate() {
        Ok(()) => (),
        Err(_) => panic!("invalid clock configuration"),
    };
}

/// Reference configuration: 16 MHz CPU, prescaler 64.
///
/// - 4 us per tick
/// - 250 ticks per millisecond (exact)
/// - 262140 us before the counter wraps
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ReferenceConfig;

impl ClockConfig for ReferenceConfig {
    const CPU_HZ: u32 = 16_000_000;
    const PRESCALER: Prescaler = Prescaler::Div64;
}

/// Fine-resolution configuration: 16 MHz CPU, prescaler 8.
///
/// - 2 ticks per microsecond
/// - 2000 ticks per millisecond (exact)
/// - 32767 us before the counter wraps
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FineConfig;

impl ClockConfig for FineConfig {
    const CPU_HZ: u32 = 16_000_000;
    const PRESCALER: Prescaler = Prescaler::Div8;
}
