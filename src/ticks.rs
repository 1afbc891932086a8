//! Interrupt-driven millisecond accounting.
//!
//! A `TickCounter` is incremented once per compare-match interrupt and read
//! by foreground code. The count lives in a `critical_section::Mutex` so a
//! 32-bit read is never torn on targets whose loads are narrower than the
//! counter.
//!
//! The counter wraps silently at 2^32 milliseconds (about 49.7 days).

use core::cell::Cell;
use core::fmt;

use critical_section::Mutex;

use crate::convert::Conversion;

/// Elapsed-milliseconds counter shared between the compare-match interrupt
/// and foreground code.
pub struct TickCounter {
    millis: Mutex<Cell<u32>>,
}

impl TickCounter {
    /// Counter at zero.
    pub const fn new() -> Self {
        Self {
            millis: Mutex::new(Cell::new(0)),
        }
    }

    /// Record one elapsed millisecond.
    ///
    /// Call this, and nothing else, from the compare-match interrupt handler.
    #[inline]
    pub fn on_compare_match(&self) {
        critical_section::with(|cs| {
            let millis = self.millis.borrow(cs);
            millis.set(millis.get().wrapping_add(1));
        });
    }

    /// Milliseconds recorded so far.
    #[inline]
    pub fn get(&self) -> u32 {
        critical_section::with(|cs| self.millis.borrow(cs).get())
    }

    /// Read the count from inside a critical section the caller already holds.
    #[inline]
    pub fn get_in(&self, cs: critical_section::CriticalSection<'_>) -> u32 {
        self.millis.borrow(cs).get()
    }

    /// Back to zero. Only `SysTimer::init` restarts the count.
    pub(crate) fn reset(&self) {
        critical_section::with(|cs| self.millis.borrow(cs).set(0));
    }
}

impl fmt::Debug for TickCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickCounter")
            .field("millis", &self.get())
            .finish()
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Compose a microsecond timestamp from whole milliseconds and the
/// sub-millisecond counter value.
///
/// Wraps at 2^32 microseconds (about 71.6 minutes).
#[inline]
pub const fn compose_micros(millis: u32, counter: u16, conversion: &Conversion) -> u32 {
    millis
        .wrapping_mul(1000)
        .wrapping_add(conversion.ticks_to_us(counter))
}

/// Process-wide counter for firmware with a single system clock.
///
/// Hand it to `SysTimer::new` and route the compare-match vector to
/// [`on_compare_match`].
pub static SYSTEM_TICKS: TickCounter = TickCounter::new();

/// Compare-match callback for [`SYSTEM_TICKS`].
///
/// Register this with the platform's interrupt dispatch, e.g.
///
/// ```rust,ignore
/// #[avr_device::interrupt(atmega328p)]
/// fn TIMER1_COMPA() {
///     uptime_clock::ticks::on_compare_match();
/// }
/// ```
#[inline]
pub fn on_compare_match() {
    SYSTEM_TICKS.on_compare_match();
}

/// Milliseconds recorded by [`SYSTEM_TICKS`].
///
/// Needs no access to the timer peripheral, so any module can call it.
#[inline]
pub fn milliseconds_now() -> u32 {
    SYSTEM_TICKS.get()
}
