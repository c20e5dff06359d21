use embedded_hal::delay::DelayNs;

use crate::serial::F_CPU;

/// Cycles burned by one iteration of the nop loop.
const CYCLES_PER_SPIN: u32 = 4;
const SPINS_PER_MS: u32 = F_CPU / 1000 / CYCLES_PER_SPIN;

/// Busy-wait delay (approximate, calibrated for 1MHz).
pub struct BusyDelay;

impl DelayNs for BusyDelay {
    fn delay_ns(&mut self, ns: u32) {
        // One cycle is 1000ns at 1MHz
        spin(ns / 1000 / CYCLES_PER_SPIN);
    }

    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            spin(SPINS_PER_MS);
        }
    }
}

#[inline(always)]
fn spin(iterations: u32) {
    for _ in 0..iterations {
        unsafe { core::arch::asm!("nop") };
    }
}
