//! Error types for checked timer operations.
//!
//! The fast timer API is infallible: misuse (reading before `init()`,
//! converting a duration longer than one counter wrap) produces an
//! out-of-range value rather than an error. The `try_*` and `checked_*`
//! variants report the same conditions through `TimerError` instead.

use core::fmt;

/// Timer error type.
///
/// Covers caller misuse detected at runtime and clock configurations that
/// cannot drive the timer correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// Operation requires `init()` to have been called first
    NotInitialized,

    /// Requested duration does not fit in one hardware counter wrap
    DurationOutOfRange {
        /// Requested duration in microseconds
        requested_us: u32,
        /// Longest duration representable before the counter wraps
        max_us: u32,
    },

    /// CPU frequency is zero or not a whole number of MHz
    UnsupportedClock {
        /// Configured CPU frequency in Hz
        cpu_hz: u32,
    },

    /// Prescale divisor and CPU MHz do not divide one another
    InconsistentPrescaler {
        /// Configured CPU frequency in MHz
        cpu_mhz: u32,
        /// Configured prescale divisor
        divisor: u32,
    },

    /// One millisecond does not fit the 16-bit compare register
    CompareTargetOutOfRange {
        /// Ticks in one millisecond for this configuration
        ticks: u32,
    },

    /// Floored compare period falls too far short of one millisecond
    PeriodTooShort {
        /// Actual compare period in microseconds
        period_us: u32,
    },
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::NotInitialized => write!(f, "Timer not initialized"),
            TimerError::DurationOutOfRange {
                requested_us,
                max_us,
            } => write!(
                f,
                "Duration {} us exceeds counter span of {} us",
                requested_us, max_us
            ),
            TimerError::UnsupportedClock { cpu_hz } => {
                write!(f, "Unsupported CPU clock {} Hz", cpu_hz)
            }
            TimerError::InconsistentPrescaler { cpu_mhz, divisor } => write!(
                f,
                "Prescaler {} inconsistent with {} MHz clock",
                divisor, cpu_mhz
            ),
            TimerError::CompareTargetOutOfRange { ticks } => {
                write!(f, "Compare target {} ticks out of range", ticks)
            }
            TimerError::PeriodTooShort { period_us } => {
                write!(f, "Compare period {} us too short for 1 ms", period_us)
            }
        }
    }
}
