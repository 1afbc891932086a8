//! # uptime-clock
//!
//! Monotonic "time since init" clock for microcontrollers, built on one
//! 16-bit counter/compare timer and a one-millisecond compare interrupt.
//!
//! **Key features:**
//! - **Build-time configuration** - CPU frequency and prescaler are trait constants,
//!   invalid combinations fail to compile
//! - **Integer-only conversion** - microseconds/milliseconds to ticks and back,
//!   strategy chosen once per configuration
//! - **Interrupt-safe accounting** - millisecond count shared with the interrupt
//!   through a critical-section mutex, no allocation, nothing blocks
//! - **Platform-agnostic hardware** - registers reached only through `TimerPeripheral`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use uptime_clock::{ClockConfig, SysTimer, ticks};
//!
//! #[derive(ClockConfig)]
//! #[clock(cpu_hz = 16_000_000, prescaler = 64)]
//! struct BoardClock;
//!
//! let mut clock: SysTimer<_, BoardClock> = SysTimer::new(peripheral, &ticks::SYSTEM_TICKS);
//! clock.init();
//!
//! let start = clock.microseconds_now();
//! // ...
//! let took = clock.elapsed_micros_since(start);
//! ```
//!
//! The compare-match interrupt handler calls [`ticks::on_compare_match`].
//!
//! ## Optional Features
//!
//! - `mmio` (default) - register binding for AVR-style 16-bit timers
//!
//! This library is `no_std` compatible. The final binary supplies the
//! `critical-section` implementation for its target.

#![no_std]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// Re-export derive macro (always available)
pub use uptime_clock_macros::ClockConfig;

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod convert;
pub mod error;
pub mod peripheral;
pub mod ticks;
pub mod timer;

// ============================================================================
// Re-exports - Public API
// ============================================================================

// Configuration
pub use config::{ClockConfig, FineConfig, Prescaler, ReferenceConfig};

// Conversion
pub use convert::{Conversion, Strategy};

// Error types
pub use error::TimerError;

// Hardware binding
pub use peripheral::TimerPeripheral;

#[cfg(feature = "mmio")]
pub use peripheral::{MmioTimer, Timer16Registers};

// Accounting and orchestration
pub use ticks::{SYSTEM_TICKS, TickCounter};
pub use timer::{SysTimer, TimerState};

// ============================================================================
// Library Metadata
// ============================================================================

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
