//! Timer peripheral abstraction for platform-agnostic clock accounting.
//!
//! The `TimerPeripheral` trait is the register-level contract between the
//! clock and one 16-bit counter/compare unit. Bind it once per target; the
//! conversion and tick accounting code never touches registers directly.

#[cfg(feature = "mmio")]
pub mod mmio;

#[cfg(feature = "mmio")]
pub use mmio::{MmioTimer, Timer16Registers};

use crate::config::Prescaler;

/// Platform-agnostic 16-bit counter/compare unit.
///
/// Implementations are direct register accesses and cannot fail. The counter
/// must run in clear-on-compare mode with the period set by
/// `set_compare_target`.
pub trait TimerPeripheral {
    /// Stop the counter and put the unit in clear-on-compare mode.
    ///
    /// Whatever mode the timer was left in, compare and counter writes that
    /// follow take effect immediately and the counter holds its value until
    /// `set_prescaler`.
    fn stop_counter(&mut self);

    /// Select the clock divisor and start the counter.
    ///
    /// The counter does not advance until this has been called.
    fn set_prescaler(&mut self, prescaler: Prescaler);

    /// Program the compare period.
    ///
    /// The counter then counts `0..ticks`: after reaching `ticks - 1` it
    /// resets to zero on the next tick and raises the compare-match flag.
    fn set_compare_target(&mut self, ticks: u16);

    /// Reset the counter to zero.
    fn reset_counter(&mut self);

    /// Instantaneous counter value.
    fn read_counter(&self) -> u16;

    /// Turn on the compare-match interrupt.
    fn enable_interrupt(&mut self);

    /// Turn off the compare-match interrupt.
    fn disable_interrupt(&mut self);

    /// Current state of the compare-match interrupt-enable bit.
    ///
    /// Must read the hardware bit, never a cached copy.
    fn is_interrupt_enabled(&self) -> bool;

    /// Clear all pending timer flags.
    fn clear_flags(&mut self);

    /// Whether a compare match has occurred that the interrupt has not yet serviced.
    fn is_compare_pending(&self) -> bool;
}
