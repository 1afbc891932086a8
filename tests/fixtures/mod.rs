//! Test fixtures for uptime-clock testing.
//!
//! Provides:
//! - `MockTimer`: simulated 16-bit clear-on-compare timer implementing `TimerPeripheral`
//! - `CoarseConfig`: 16 MHz / 256 configuration with an inexact millisecond
//! - `VALID_CONFIGS`: every valid frequency/prescaler pair for common MCU clocks

#![allow(dead_code)]

use uptime_clock::config::{ClockConfig, Prescaler};
use uptime_clock::convert::Conversion;
use uptime_clock::TimerPeripheral;

// ============================================================================
// MockTimer - Simulated Hardware Timer
// ============================================================================

/// Simulated counter/compare unit.
///
/// The counter only advances when the test calls `tick()`. A compare match
/// resets the counter and sets the pending flag; the interrupt is dispatched
/// on the same tick when it is enabled and interrupts are not held off.
#[derive(Debug, Default)]
pub struct MockTimer {
    prescaler: Option<Prescaler>,
    period: u16,
    counter: u16,
    enabled: bool,
    pending: bool,
    held: bool,
    total_ticks: u64,
    stopped_on_reprogram: bool,
}

impl MockTimer {
    /// Create a stopped timer with all registers at reset values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the counter one tick.
    ///
    /// Returns `true` when the compare-match interrupt runs on this tick; the
    /// caller then plays the interrupt handler.
    pub fn tick(&mut self) -> bool {
        if self.prescaler.is_none() {
            return false;
        }

        self.total_ticks += 1;
        self.counter = self.counter.wrapping_add(1);
        if self.counter >= self.period {
            self.counter = 0;
            self.pending = true;
        }

        self.dispatch()
    }

    /// Hold off interrupt delivery (global interrupts masked).
    pub fn hold_interrupts(&mut self) {
        self.held = true;
    }

    /// Resume interrupt delivery.
    ///
    /// Returns `true` when a pending compare match is dispatched immediately.
    pub fn release_interrupts(&mut self) -> bool {
        self.held = false;
        self.dispatch()
    }

    /// Set the pending flag directly (match latched before enable).
    pub fn latch_compare(&mut self) {
        self.pending = true;
    }

    /// Prescaler programmed by `set_prescaler`, if any.
    pub fn prescaler(&self) -> Option<Prescaler> {
        self.prescaler
    }

    /// Programmed compare period.
    pub fn period(&self) -> u16 {
        self.period
    }

    /// Whether a compare match is waiting for the interrupt.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Whether every compare/counter write so far happened with the counter stopped.
    pub fn stopped_on_reprogram(&self) -> bool {
        self.stopped_on_reprogram
    }

    /// Start counting as if firmware had left the timer running.
    pub fn run_free(&mut self, prescaler: Prescaler, period: u16) {
        self.prescaler = Some(prescaler);
        self.period = period;
    }

    /// Ticks counted since the prescaler was set.
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    // Hardware clears the flag on vector entry.
    fn dispatch(&mut self) -> bool {
        if self.pending && self.enabled && !self.held {
            self.pending = false;
            true
        } else {
            false
        }
    }
}

impl TimerPeripheral for MockTimer {
    fn stop_counter(&mut self) {
        self.prescaler = None;
        self.stopped_on_reprogram = true;
    }

    fn set_prescaler(&mut self, prescaler: Prescaler) {
        self.prescaler = Some(prescaler);
    }

    fn set_compare_target(&mut self, ticks: u16) {
        self.stopped_on_reprogram &= self.prescaler.is_none();
        self.period = ticks;
    }

    fn reset_counter(&mut self) {
        self.stopped_on_reprogram &= self.prescaler.is_none();
        self.counter = 0;
    }

    fn read_counter(&self) -> u16 {
        self.counter
    }

    fn enable_interrupt(&mut self) {
        self.enabled = true;
    }

    fn disable_interrupt(&mut self) {
        self.enabled = false;
    }

    fn is_interrupt_enabled(&self) -> bool {
        self.enabled
    }

    fn clear_flags(&mut self) {
        self.pending = false;
    }

    fn is_compare_pending(&self) -> bool {
        self.pending
    }
}

// ============================================================================
// Configurations
// ============================================================================

/// 16 MHz / 256: 16 us per tick, 62 ticks (0.992 ms) per compare period.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CoarseConfig;

impl ClockConfig for CoarseConfig {
    const CPU_HZ: u32 = 16_000_000;
    const PRESCALER: Prescaler = Prescaler::Div256;
}

/// Common MCU clock frequencies in MHz.
pub const CLOCKS_MHZ: [u32; 9] = [1, 2, 4, 8, 12, 16, 20, 32, 48];

/// Every frequency/prescaler pair from `CLOCKS_MHZ` that validates.
pub fn valid_conversions() -> Vec<Conversion> {
    CLOCKS_MHZ
        .iter()
        .flat_map(|mhz| {
            Prescaler::ALL
                .iter()
                .map(move |p| Conversion::new(mhz * 1_000_000, *p))
        })
        .filter(|c| c.validate().is_ok())
        .collect()
}
