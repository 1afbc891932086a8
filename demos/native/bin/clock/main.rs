//! Host demo of the uptime clock over a simulated timer.
//!
//! A background thread plays the timer hardware: it derives the counter
//! value from real elapsed time and runs the compare-match handler once per
//! period while the interrupt is enabled.
//!
//! ```bash
//! RUST_LOG=debug cargo run --bin clock
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use uptime_clock::ticks::{self, SYSTEM_TICKS};
use uptime_clock::{ClockConfig, Prescaler, ReferenceConfig, SysTimer, TimerPeripheral};

// =============================================================================
// Simulated Hardware
// =============================================================================

#[derive(Debug, Default)]
struct Registers {
    started: AtomicBool,
    period: AtomicU16,
    counter: AtomicU16,
    enabled: AtomicBool,
    pending: AtomicBool,
    tick_ns: AtomicU64,
}

/// Foreground handle on the simulated registers.
#[derive(Debug, Clone)]
struct SimulatedTimer {
    regs: Arc<Registers>,
}

impl TimerPeripheral for SimulatedTimer {
    fn stop_counter(&mut self) {
        self.regs.started.store(false, Ordering::SeqCst);
    }

    fn set_prescaler(&mut self, prescaler: Prescaler) {
        let cpu_mhz = u64::from(ReferenceConfig::CPU_HZ / 1_000_000);
        let tick_ns = u64::from(prescaler.divisor()) * 1000 / cpu_mhz;
        self.regs.tick_ns.store(tick_ns, Ordering::SeqCst);
        self.regs.started.store(true, Ordering::SeqCst);
    }

    fn set_compare_target(&mut self, ticks: u16) {
        self.regs.period.store(ticks, Ordering::SeqCst);
    }

    fn reset_counter(&mut self) {
        self.regs.counter.store(0, Ordering::SeqCst);
    }

    fn read_counter(&self) -> u16 {
        self.regs.counter.load(Ordering::SeqCst)
    }

    fn enable_interrupt(&mut self) {
        self.regs.enabled.store(true, Ordering::SeqCst);
    }

    fn disable_interrupt(&mut self) {
        self.regs.enabled.store(false, Ordering::SeqCst);
    }

    fn is_interrupt_enabled(&self) -> bool {
        self.regs.enabled.load(Ordering::SeqCst)
    }

    fn clear_flags(&mut self) {
        self.regs.pending.store(false, Ordering::SeqCst);
    }

    fn is_compare_pending(&self) -> bool {
        self.regs.pending.load(Ordering::SeqCst)
    }
}

/// Run the counter from wall-clock time and dispatch compare matches.
fn spawn_hardware(regs: Arc<Registers>) {
    thread::spawn(move || {
        while !regs.started.load(Ordering::SeqCst) {
            thread::yield_now();
        }

        let start = Instant::now();
        let tick_ns = regs.tick_ns.load(Ordering::SeqCst);
        let period = u64::from(regs.period.load(Ordering::SeqCst));
        let mut matches_seen = 0u64;

        loop {
            let elapsed_ticks = start.elapsed().as_nanos() as u64 / tick_ns;
            let matches = elapsed_ticks / period;

            regs.counter
                .store((elapsed_ticks % period) as u16, Ordering::SeqCst);

            while matches_seen < matches {
                matches_seen += 1;
                regs.pending.store(true, Ordering::SeqCst);
                if regs.enabled.load(Ordering::SeqCst) {
                    regs.pending.store(false, Ordering::SeqCst);
                    ticks::on_compare_match();
                }
            }

            thread::sleep(Duration::from_micros(50));
        }
    });
}

// =============================================================================
// Main
// =============================================================================

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let regs = Arc::new(Registers::default());
    spawn_hardware(Arc::clone(&regs));

    let mut clock: SysTimer<'static, SimulatedTimer, ReferenceConfig> =
        SysTimer::new(SimulatedTimer { regs }, &SYSTEM_TICKS);
    clock.init();

    let conversion = clock.conversion();
    println!(
        "{} Hz / {}: {} ticks per ms, {} us per counter wrap",
        ReferenceConfig::CPU_HZ,
        ReferenceConfig::PRESCALER.divisor(),
        conversion.compare_target(),
        conversion.max_us()
    );

    let start = clock.microseconds_now();
    for _ in 0..5 {
        thread::sleep(Duration::from_millis(100));
        println!(
            "ms = {:>6}  us = {:>9}  exact us = {:>9}",
            clock.milliseconds_now(),
            clock.microseconds_now(),
            clock.microseconds_now_exact()
        );
    }
    println!("elapsed: {} us", clock.elapsed_micros_since(start));

    clock.disable();
    let frozen = clock.milliseconds_now();
    thread::sleep(Duration::from_millis(200));
    println!(
        "disabled for 200 ms: ms {} -> {} (enabled: {})",
        frozen,
        clock.milliseconds_now(),
        clock.is_enabled()
    );

    clock.enable();
    thread::sleep(Duration::from_millis(100));
    println!(
        "re-enabled for 100 ms: ms = {} (enabled: {})",
        clock.milliseconds_now(),
        clock.is_enabled()
    );
}
