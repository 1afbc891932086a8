//! Conversion between wall-clock units and hardware counter ticks.
//!
//! All arithmetic is integer-only and floors. The conversion strategy is
//! chosen once, when the `Conversion` is built:
//!
//! - divisor smaller than the CPU's MHz: the counter ticks several times per
//!   microsecond, so conversions scale by ticks-per-microsecond
//! - divisor equal to or larger than the CPU's MHz: each tick spans several
//!   microseconds, so conversions scale by microseconds-per-tick
//!
//! Scaling by the integer ratio in the right direction keeps the factor exact
//! instead of dividing a small numerator by a larger divisor.

use crate::config::Prescaler;
use crate::error::TimerError;

/// Largest value the 16-bit hardware counter holds.
pub const COUNTER_MAX: u32 = 0xFFFF;

/// Conversion strategy, selected once per configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Counter ticks per microsecond (small divisors)
    TicksPerMicro(u32),

    /// Microseconds per counter tick (large divisors)
    MicrosPerTick(u32),
}

/// Resolved conversion constants for one clock configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Conversion {
    cpu_hz: u32,
    prescaler: Prescaler,
    strategy: Strategy,
}

/// Shortest compare period accepted, in thousandths of a millisecond.
///
/// Flooring the compare target to whole ticks shortens each period; a
/// configuration that loses more than 4% runs the millisecond count visibly
/// fast.
pub const MIN_PERIOD_PER_MILLE: u64 = 960;

const fn div_or_zero(numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        0
    } else {
        numerator / denominator
    }
}

const fn saturate_u32(value: u64) -> u32 {
    if value > u32::MAX as u64 {
        u32::MAX
    } else {
        value as u32
    }
}

impl Conversion {
    /// Resolve conversion constants for a CPU frequency and prescaler.
    ///
    /// Never fails; call [`validate`](Self::validate) to check that the
    /// configuration is usable.
    pub const fn new(cpu_hz: u32, prescaler: Prescaler) -> Self {
        let cpu_mhz = cpu_hz / 1_000_000;
        let divisor = prescaler.divisor();

        let strategy = if divisor < cpu_mhz {
            Strategy::TicksPerMicro(cpu_mhz / divisor)
        } else {
            Strategy::MicrosPerTick(div_or_zero(divisor as u64, cpu_mhz as u64) as u32)
        };

        Self {
            cpu_hz,
            prescaler,
            strategy,
        }
    }

    /// Check that this configuration can drive a 1 ms compare interrupt.
    ///
    /// The clock must be a whole number of MHz, divisor and MHz must divide
    /// one another, the compare target must fit the 16-bit register, and the
    /// floored compare period must be at least
    /// [`MIN_PERIOD_PER_MILLE`] thousandths of a millisecond.
    pub const fn validate(&self) -> Result<(), TimerError> {
        if self.cpu_hz == 0 || self.cpu_hz % 1_000_000 != 0 {
            return Err(TimerError::UnsupportedClock {
                cpu_hz: self.cpu_hz,
            });
        }

        let cpu_mhz = self.cpu_mhz();
        let divisor = self.prescaler.divisor();
        let exact = match self.strategy {
            Strategy::TicksPerMicro(_) => cpu_mhz % divisor == 0,
            Strategy::MicrosPerTick(_) => divisor % cpu_mhz == 0,
        };
        if !exact {
            return Err(TimerError::InconsistentPrescaler { cpu_mhz, divisor });
        }

        let ticks = self.ms_to_ticks(1);
        if ticks == 0 || ticks > COUNTER_MAX {
            return Err(TimerError::CompareTargetOutOfRange { ticks });
        }

        // ticks * divisor / cpu_hz seconds against 0.96 ms, in integers
        let period = ticks as u64 * divisor as u64 * 1000;
        if period * 1000 < self.cpu_hz as u64 * MIN_PERIOD_PER_MILLE {
            return Err(TimerError::PeriodTooShort {
                period_us: self.period_us(),
            });
        }

        Ok(())
    }

    /// CPU frequency in Hz.
    pub const fn cpu_hz(&self) -> u32 {
        self.cpu_hz
    }

    /// CPU frequency in whole MHz.
    pub const fn cpu_mhz(&self) -> u32 {
        self.cpu_hz / 1_000_000
    }

    /// Prescale divisor.
    pub const fn prescaler(&self) -> Prescaler {
        self.prescaler
    }

    /// Selected conversion strategy.
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Longest span in microseconds the counter covers before wrapping.
    pub const fn max_us(&self) -> u32 {
        div_or_zero(
            COUNTER_MAX as u64 * self.prescaler.divisor() as u64,
            self.cpu_mhz() as u64,
        ) as u32
    }

    /// Counter ticks in one millisecond: the compare target.
    ///
    /// Floors when a millisecond is not a whole number of ticks
    /// (see [`is_exact_millisecond`](Self::is_exact_millisecond)).
    pub const fn compare_target(&self) -> u16 {
        self.ms_to_ticks(1) as u16
    }

    /// Length of one compare period in microseconds, floored.
    ///
    /// 1000 for exact configurations, 992 for 16 MHz / 256.
    pub const fn period_us(&self) -> u32 {
        div_or_zero(
            self.ms_to_ticks(1) as u64 * self.prescaler.divisor() as u64,
            self.cpu_mhz() as u64,
        ) as u32
    }

    /// Whether one millisecond is a whole number of ticks.
    ///
    /// At 16 MHz with prescaler 256 a millisecond is 62.5 ticks; the compare
    /// target floors to 62 and each interrupt period is 0.992 ms.
    pub const fn is_exact_millisecond(&self) -> bool {
        self.cpu_hz % (1000 * self.prescaler.divisor()) == 0
    }

    /// Microseconds to ticks, unchecked.
    ///
    /// Durations above [`max_us`](Self::max_us) do not fit the counter: the
    /// result is truncated modulo 2^16 and meaningless. Use
    /// [`checked_us_to_ticks`](Self::checked_us_to_ticks) to detect this.
    pub const fn us_to_ticks(&self, us: u32) -> u16 {
        let ticks = match self.strategy {
            Strategy::TicksPerMicro(n) => us as u64 * n as u64,
            Strategy::MicrosPerTick(n) => div_or_zero(us as u64, n as u64),
        };
        ticks as u16
    }

    /// Microseconds to ticks, rejecting durations longer than one counter wrap.
    pub const fn checked_us_to_ticks(&self, us: u32) -> Result<u16, TimerError> {
        let max_us = self.max_us();
        if us > max_us {
            return Err(TimerError::DurationOutOfRange {
                requested_us: us,
                max_us,
            });
        }
        Ok(self.us_to_ticks(us))
    }

    /// Milliseconds to ticks.
    ///
    /// The result may exceed the counter width; see
    /// [`checked_ms_to_ticks`](Self::checked_ms_to_ticks). Saturates at
    /// `u32::MAX`.
    pub const fn ms_to_ticks(&self, ms: u32) -> u32 {
        saturate_u32(self.ms_to_ticks_wide(ms))
    }

    /// Milliseconds to ticks, rejecting durations longer than one counter wrap.
    pub const fn checked_ms_to_ticks(&self, ms: u32) -> Result<u16, TimerError> {
        let ticks = self.ms_to_ticks_wide(ms);
        if ticks > COUNTER_MAX as u64 {
            return Err(TimerError::DurationOutOfRange {
                requested_us: ms.saturating_mul(1000),
                max_us: self.max_us(),
            });
        }
        Ok(ticks as u16)
    }

    /// Ticks to microseconds.
    pub const fn ticks_to_us(&self, ticks: u16) -> u32 {
        match self.strategy {
            Strategy::TicksPerMicro(n) => ticks as u32 / n,
            Strategy::MicrosPerTick(n) => ticks as u32 * n,
        }
    }

    /// Ticks to milliseconds.
    ///
    /// Saturates at `u32::MAX`, reachable only with large divisors on slow
    /// clocks.
    pub const fn ticks_to_ms(&self, ticks: u32) -> u32 {
        saturate_u32(div_or_zero(
            ticks as u64 * 1000 * self.prescaler.divisor() as u64,
            self.cpu_hz as u64,
        ))
    }

    // ms * cpu_hz stays below 2^64 for every u32 input
    const fn ms_to_ticks_wide(&self, ms: u32) -> u64 {
        div_or_zero(
            ms as u64 * self.cpu_hz as u64,
            1000 * self.prescaler.divisor() as u64,
        )
    }
}
