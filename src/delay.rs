//! Busy-wait delay primitives
//!
//! Thin consumers of the delay counter inside [`TickCounter`]: each call
//! zeroes the counter and spins until the tick interrupt has advanced it
//! past the requested threshold. The whole polling context blocks for the
//! duration; only interrupts keep running.

use crate::config::{TICKS_PER_10US, TICKS_PER_MS, TICK_PERIOD_US};
use crate::tick::TickCounter;
use embedded_hal::blocking::delay::{DelayMs, DelayUs};

/// Blocking delay provider backed by the shared tick.
///
/// Delays share one counter, so they must not nest: starting a delay from
/// a timer callback while another delay is spinning restarts the first
/// one's countdown. There is no cancellation; a stalled tick source means
/// a delay never returns.
pub struct Delay<'a> {
    counter: &'a TickCounter,
}

impl<'a> Delay<'a> {
    pub const fn new(counter: &'a TickCounter) -> Self {
        Self { counter }
    }

    /// Block for `ms` milliseconds
    pub fn delay_ms(&mut self, ms: u32) {
        self.spin(ms.saturating_mul(TICKS_PER_MS));
    }

    /// Block for `n` multiples of 10 us
    pub fn delay_10us(&mut self, n: u32) {
        self.spin(n.saturating_mul(TICKS_PER_10US));
    }

    /// Block for `n` ticks of 5 us, the finest grain the tick rate allows
    pub fn delay_5us(&mut self, n: u32) {
        self.spin(n);
    }

    fn spin(&self, ticks: u32) {
        self.counter.restart_delay();
        while self.counter.delay_elapsed() < ticks {
            core::hint::spin_loop();
        }
    }
}

impl DelayMs<u32> for Delay<'_> {
    fn delay_ms(&mut self, ms: u32) {
        Delay::delay_ms(self, ms);
    }
}

impl DelayMs<u16> for Delay<'_> {
    fn delay_ms(&mut self, ms: u16) {
        Delay::delay_ms(self, ms as u32);
    }
}

impl DelayUs<u32> for Delay<'_> {
    fn delay_us(&mut self, us: u32) {
        // Round up to the tick period
        self.spin((us + TICK_PERIOD_US - 1) / TICK_PERIOD_US);
    }
}

impl DelayUs<u16> for Delay<'_> {
    fn delay_us(&mut self, us: u16) {
        DelayUs::<u32>::delay_us(self, us as u32);
    }
}
