#![no_std]
#![no_main]

use panic_halt as _;
use uptime_clock::ticks::{self, SYSTEM_TICKS};
use uptime_clock::{Prescaler, SysTimer, TimerPeripheral};

// Minimal clock configuration
#[derive(uptime_clock::ClockConfig)]
#[clock(cpu_hz = 16_000_000, prescaler = 64)]
struct Clock;

// Minimal TimerPeripheral implementation - measures only the clock logic
struct MinimalTimer;

impl TimerPeripheral for MinimalTimer {
    fn stop_counter(&mut self) {}

    fn set_prescaler(&mut self, _prescaler: Prescaler) {}

    fn set_compare_target(&mut self, _ticks: u16) {}

    fn reset_counter(&mut self) {}

    fn read_counter(&self) -> u16 {
        core::hint::black_box(0)
    }

    fn enable_interrupt(&mut self) {}

    fn disable_interrupt(&mut self) {}

    fn is_interrupt_enabled(&self) -> bool {
        core::hint::black_box(true)
    }

    fn clear_flags(&mut self) {}

    fn is_compare_pending(&self) -> bool {
        core::hint::black_box(false)
    }
}

// Entry point
#[cortex_m_rt::entry]
fn main() -> ! {
    let mut clock: SysTimer<'static, MinimalTimer, Clock> =
        SysTimer::new(MinimalTimer, &SYSTEM_TICKS);
    clock.init();

    // Use black_box to prevent optimizer from removing the read paths
    loop {
        core::hint::black_box(clock.milliseconds_now());
        core::hint::black_box(clock.microseconds_now());
        core::hint::black_box(clock.microseconds_now_exact());
        cortex_m::asm::nop();
    }
}

// Stand-in for the timer interrupt vector
#[cortex_m_rt::exception]
fn SysTick() {
    ticks::on_compare_match();
}

// Required: exception handler
#[cortex_m_rt::exception]
unsafe fn HardFault(_ef: &cortex_m_rt::ExceptionFrame) -> ! {
    loop {
        cortex_m::asm::nop();
    }
}
