//! Memory-mapped binding for AVR-style 16-bit timers.
//!
//! Targets the Timer1 layout of the ATmega family: two control registers,
//! a 16-bit counter and compare register accessed byte-wise through the
//! shared TEMP latch, an interrupt mask and a write-one-to-clear flag
//! register.

use core::ptr;

use super::TimerPeripheral;
use crate::config::Prescaler;

/// Clear Timer on Compare match mode (WGM12 in control register B)
const CTC_MODE: u8 = 1 << 3;

/// Output compare A interrupt enable (OCIE1A) / flag (OCF1A)
const COMPARE_A: u8 = 1 << 1;

/// Addresses of the registers one 16-bit timer uses.
///
/// `counter` and `compare_a` name the low byte; the high byte is the next
/// address.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Timer16Registers {
    /// Control register A (TCCRnA)
    pub control_a: usize,
    /// Control register B (TCCRnB)
    pub control_b: usize,
    /// Counter low byte (TCNTnL)
    pub counter: usize,
    /// Compare A low byte (OCRnAL)
    pub compare_a: usize,
    /// Interrupt mask (TIMSKn)
    pub interrupt_mask: usize,
    /// Interrupt flags (TIFRn)
    pub interrupt_flags: usize,
}

impl Timer16Registers {
    /// Timer1 on ATmega48/88/168/328 (data-space addresses).
    pub const ATMEGA328P_TIMER1: Self = Self {
        control_a: 0x80,
        control_b: 0x81,
        counter: 0x84,
        compare_a: 0x88,
        interrupt_mask: 0x6F,
        interrupt_flags: 0x36,
    };

    /// Shift every address by `base`.
    pub const fn offset(self, base: usize) -> Self {
        Self {
            control_a: self.control_a + base,
            control_b: self.control_b + base,
            counter: self.counter + base,
            compare_a: self.compare_a + base,
            interrupt_mask: self.interrupt_mask + base,
            interrupt_flags: self.interrupt_flags + base,
        }
    }
}

/// Clock-select bits (CSn2:0) for each divisor.
const fn clock_select(prescaler: Prescaler) -> u8 {
    match prescaler {
        Prescaler::Div1 => 0b001,
        Prescaler::Div8 => 0b010,
        Prescaler::Div64 => 0b011,
        Prescaler::Div256 => 0b100,
        Prescaler::Div1024 => 0b101,
    }
}

/// 16-bit timer driven through volatile register accesses.
#[derive(Debug)]
pub struct MmioTimer {
    regs: Timer16Registers,
}

impl MmioTimer {
    /// Bind to a register block.
    ///
    /// # Safety
    ///
    /// Every address in `regs` must be a valid timer register for the lifetime
    /// of the returned value, and nothing else may write those registers
    /// except the compare-match interrupt clearing its own flag.
    pub const unsafe fn new(regs: Timer16Registers) -> Self {
        Self { regs }
    }

    /// Register block this timer drives.
    pub const fn registers(&self) -> &Timer16Registers {
        &self.regs
    }

    fn read(&self, addr: usize) -> u8 {
        // SAFETY: address validity is the contract of `MmioTimer::new`.
        unsafe { ptr::read_volatile(addr as *const u8) }
    }

    fn write(&mut self, addr: usize, value: u8) {
        // SAFETY: address validity is the contract of `MmioTimer::new`.
        unsafe { ptr::write_volatile(addr as *mut u8, value) }
    }

    // Low byte first: reading it latches the high byte into TEMP.
    fn read16(&self, addr: usize) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr + 1) as u16;
        (hi << 8) | lo
    }

    // High byte first: it is held in TEMP until the low byte write commits both.
    fn write16(&mut self, addr: usize, value: u16) {
        self.write(addr + 1, (value >> 8) as u8);
        self.write(addr, value as u8);
    }
}

impl TimerPeripheral for MmioTimer {
    // No clock source selected; OCRnA is not double-buffered in CTC mode.
    fn stop_counter(&mut self) {
        self.write(self.regs.control_b, 0);
        self.write(self.regs.control_a, 0);
        self.write(self.regs.control_b, CTC_MODE);
    }

    fn set_prescaler(&mut self, prescaler: Prescaler) {
        self.write(self.regs.control_a, 0);
        self.write(self.regs.control_b, CTC_MODE | clock_select(prescaler));
    }

    // The counter clears on the tick after matching OCRnA, so the period is OCRnA + 1.
    fn set_compare_target(&mut self, ticks: u16) {
        self.write16(self.regs.compare_a, ticks.saturating_sub(1));
    }

    fn reset_counter(&mut self) {
        self.write16(self.regs.counter, 0);
    }

    fn read_counter(&self) -> u16 {
        self.read16(self.regs.counter)
    }

    fn enable_interrupt(&mut self) {
        let mask = self.read(self.regs.interrupt_mask);
        self.write(self.regs.interrupt_mask, mask | COMPARE_A);
    }

    fn disable_interrupt(&mut self) {
        let mask = self.read(self.regs.interrupt_mask);
        self.write(self.regs.interrupt_mask, mask & !COMPARE_A);
    }

    fn is_interrupt_enabled(&self) -> bool {
        self.read(self.regs.interrupt_mask) & COMPARE_A != 0
    }

    fn clear_flags(&mut self) {
        self.write(self.regs.interrupt_flags, 0xFF);
    }

    fn is_compare_pending(&self) -> bool {
        self.read(self.regs.interrupt_flags) & COMPARE_A != 0
    }
}
