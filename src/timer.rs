//! System timer orchestration.
//!
//! `SysTimer` programs one `TimerPeripheral` as a free-running clock with a
//! one-millisecond compare interrupt, and combines the interrupt-driven
//! `TickCounter` with the live counter value to produce timestamps.
//!
//! # Lifecycle
//!
//! ```text
//! Stopped --init()--> Running
//! ```
//!
//! There is no way back to `Stopped`. `disable()` only stops interrupt
//! delivery: the millisecond count freezes while the hardware counter keeps
//! running, and a compare match that occurs while disabled is discarded by
//! the next `enable()`.
//!
//! # Read accuracy
//!
//! [`SysTimer::microseconds_now`] reads the millisecond count and then the
//! hardware counter with interrupts enabled between the two reads; only the
//! 32-bit load of the count itself is masked. If the compare match lands
//! between the two reads, the result can be up to one millisecond behind. This is the
//! accepted accuracy contract of the fast path. [`SysTimer::microseconds_now_exact`]
//! pays for a critical section instead and never goes backwards.

use core::marker::PhantomData;

use crate::config::ClockConfig;
use crate::convert::Conversion;
use crate::error::TimerError;
use crate::peripheral::TimerPeripheral;
use crate::ticks::{TickCounter, compose_micros};

/// Timer lifecycle state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimerState {
    /// Not yet initialized; the hardware counter is frozen at zero
    Stopped,

    /// Counter free-running, compare interrupt every millisecond
    Running,
}

/// Monotonic system clock over one 16-bit compare timer.
///
/// Generic over:
/// - `'a`: lifetime of the tick counter the interrupt handler increments
/// - `P`: timer peripheral binding
/// - `C`: build-time clock configuration
#[derive(Debug)]
pub struct SysTimer<'a, P: TimerPeripheral, C: ClockConfig> {
    peripheral: P,
    ticks: &'a TickCounter,
    state: TimerState,
    _config: PhantomData<C>,
}

impl<'a, P: TimerPeripheral, C: ClockConfig> SysTimer<'a, P, C> {
    /// Conversion constants for `C`.
    pub const CONVERSION: Conversion = C::CONVERSION;

    /// Take ownership of the peripheral without touching it.
    ///
    /// Fails to compile if `C` is not a valid configuration.
    pub fn new(peripheral: P, ticks: &'a TickCounter) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = C::CHECK;

        Self {
            peripheral,
            ticks,
            state: TimerState::Stopped,
            _config: PhantomData,
        }
    }

    /// Program the hardware and start the clock.
    ///
    /// Stops the counter, zeroes both the millisecond count and the hardware
    /// counter, sets the compare target to one millisecond, starts the
    /// counter with the configured prescaler and enables the compare
    /// interrupt.
    ///
    /// Must run once before any read. Later calls are ignored.
    pub fn init(&mut self) {
        if self.state == TimerState::Running {
            log::warn!("system timer already running, init ignored");
            return;
        }

        let target = Self::CONVERSION.compare_target();

        self.peripheral.stop_counter();
        self.ticks.reset();
        self.peripheral.set_compare_target(target);
        self.peripheral.reset_counter();
        self.peripheral.set_prescaler(C::PRESCALER);
        self.state = TimerState::Running;
        self.enable();

        log::debug!(
            "system timer running: {} Hz / {}, compare target {} ticks, span {} us",
            C::CPU_HZ,
            C::PRESCALER.divisor(),
            target,
            Self::CONVERSION.max_us()
        );
        if !Self::CONVERSION.is_exact_millisecond() {
            log::warn!("compare period is not exactly one millisecond");
        }
    }

    /// Clear pending compare flags and turn on the compare interrupt.
    ///
    /// Calling this before `init()` is a contract violation; it still writes
    /// the registers. Use [`try_enable`](Self::try_enable) to have it rejected.
    pub fn enable(&mut self) {
        if self.state == TimerState::Stopped {
            log::warn!("system timer enabled before init");
        }
        self.peripheral.clear_flags();
        self.peripheral.enable_interrupt();
        log::trace!("system timer interrupt enabled");
    }

    /// Clear pending compare flags and turn off the compare interrupt.
    ///
    /// The hardware counter keeps running; the millisecond count freezes.
    pub fn disable(&mut self) {
        self.peripheral.clear_flags();
        self.peripheral.disable_interrupt();
        log::trace!("system timer interrupt disabled");
    }

    /// Whether the compare interrupt is enabled, read from hardware.
    pub fn is_enabled(&self) -> bool {
        self.peripheral.is_interrupt_enabled()
    }

    /// `enable()`, rejected before `init()`.
    pub fn try_enable(&mut self) -> Result<(), TimerError> {
        self.ensure_running()?;
        self.enable();
        Ok(())
    }

    /// `disable()`, rejected before `init()`.
    pub fn try_disable(&mut self) -> Result<(), TimerError> {
        self.ensure_running()?;
        self.disable();
        Ok(())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Elapsed milliseconds since `init()`.
    ///
    /// Wraps silently at 2^32 ms.
    #[inline]
    pub fn milliseconds_now(&self) -> u32 {
        self.ticks.get()
    }

    /// Elapsed microseconds since `init()`, without a critical section around
    /// the composite read.
    ///
    /// The millisecond load is masked on its own; the compare interrupt can
    /// still fire between it and the counter read, leaving the result up to
    /// one millisecond behind. Wraps silently at 2^32 us.
    #[inline]
    pub fn microseconds_now(&self) -> u32 {
        let millis = self.ticks.get();
        let counter = self.peripheral.read_counter();
        compose_micros(millis, counter, &Self::CONVERSION)
    }

    /// Elapsed microseconds since `init()`, read inside a critical section.
    ///
    /// A compare match that has happened but not yet been serviced is counted
    /// here, so successive readings never go backwards. The interrupt state
    /// in force before the call is restored on return.
    pub fn microseconds_now_exact(&self) -> u32 {
        critical_section::with(|cs| {
            let mut millis = self.ticks.get_in(cs);
            let mut counter = self.peripheral.read_counter();

            if self.peripheral.is_interrupt_enabled() && self.peripheral.is_compare_pending() {
                // The counter wrapped after the last serviced interrupt; the
                // re-read is guaranteed to be post-wrap.
                millis = millis.wrapping_add(1);
                counter = self.peripheral.read_counter();
            }

            compose_micros(millis, counter, &Self::CONVERSION)
        })
    }

    /// `milliseconds_now()`, rejected before `init()`.
    pub fn try_milliseconds_now(&self) -> Result<u32, TimerError> {
        self.ensure_running()?;
        Ok(self.milliseconds_now())
    }

    /// `microseconds_now()`, rejected before `init()`.
    pub fn try_microseconds_now(&self) -> Result<u32, TimerError> {
        self.ensure_running()?;
        Ok(self.microseconds_now())
    }

    /// Microseconds elapsed since an earlier `microseconds_now()` reading.
    ///
    /// Correct across one 2^32 wrap of the reading.
    pub fn elapsed_micros_since(&self, start: u32) -> u32 {
        self.microseconds_now().wrapping_sub(start)
    }

    /// Milliseconds elapsed since an earlier `milliseconds_now()` reading.
    pub fn elapsed_millis_since(&self, start: u32) -> u32 {
        self.milliseconds_now().wrapping_sub(start)
    }

    /// Conversion constants for this clock.
    pub fn conversion(&self) -> Conversion {
        Self::CONVERSION
    }

    /// Tick counter the compare interrupt must increment.
    pub fn tick_counter(&self) -> &'a TickCounter {
        self.ticks
    }

    /// Borrow the peripheral.
    pub fn peripheral(&self) -> &P {
        &self.peripheral
    }

    /// Borrow the peripheral mutably.
    pub fn peripheral_mut(&mut self) -> &mut P {
        &mut self.peripheral
    }

    fn ensure_running(&self) -> Result<(), TimerError> {
        match self.state {
            TimerState::Running => Ok(()),
            TimerState::Stopped => Err(TimerError::NotInitialized),
        }
    }
}
