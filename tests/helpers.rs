//! Shared test helpers to reduce duplication across integration tests.

#![allow(dead_code)]

#[allow(clippy::duplicate_mod)]
#[path = "fixtures/mod.rs"]
pub mod fixtures;

use fixtures::MockTimer;
use uptime_clock::config::ClockConfig;
use uptime_clock::{SysTimer, TickCounter};

/// System timer over the simulated peripheral.
pub type TestTimer<'a, C> = SysTimer<'a, MockTimer, C>;

// ============================================================================
// Timer Creation Helpers
// ============================================================================

/// Create a timer that has not been initialized.
pub fn create_stopped_timer<C: ClockConfig>(ticks: &TickCounter) -> TestTimer<'_, C> {
    SysTimer::new(MockTimer::new(), ticks)
}

/// Create an initialized, running timer.
pub fn create_running_timer<C: ClockConfig>(ticks: &TickCounter) -> TestTimer<'_, C> {
    let mut timer = create_stopped_timer(ticks);
    timer.init();
    timer
}

// ============================================================================
// Simulation Helpers
// ============================================================================

/// Let `n` hardware ticks pass, running the interrupt handler on each dispatched match.
pub fn advance_ticks<C: ClockConfig>(timer: &mut TestTimer<'_, C>, n: u32) {
    for _ in 0..n {
        if timer.peripheral_mut().tick() {
            timer.tick_counter().on_compare_match();
        }
    }
}

/// Let `ms` compare periods pass.
pub fn advance_ms<C: ClockConfig>(timer: &mut TestTimer<'_, C>, ms: u32) {
    let period = C::CONVERSION.compare_target() as u32;
    advance_ticks(timer, ms * period);
}

/// Unmask interrupts, running the handler for a match that was held off.
pub fn release_interrupts<C: ClockConfig>(timer: &mut TestTimer<'_, C>) {
    if timer.peripheral_mut().release_interrupts() {
        timer.tick_counter().on_compare_match();
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the composed microsecond reading lies in `[ms * 1000, ms * 1000 + 1000)`.
pub fn assert_within_millisecond<C: ClockConfig>(timer: &TestTimer<'_, C>) {
    let ms = timer.milliseconds_now();
    let us = timer.microseconds_now();
    let floor = ms * 1000;
    assert!(
        us >= floor && us < floor + 1000,
        "microseconds_now() = {} outside [{}, {}) at ms = {}",
        us,
        floor,
        floor + 1000,
        ms
    );
}
