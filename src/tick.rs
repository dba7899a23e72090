//! System tick bookkeeping
//!
//! One hardware interrupt owns the write side of the tick counters; the
//! cooperative polling context only ever reads copies. On a single core
//! with plain load/store that relationship needs no lock, so the counters
//! are relaxed atomics and the writer is a take-once handle.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Shared tick state: a monotonic system tick plus a free-running counter
/// backing the blocking delays.
///
/// Readers may live anywhere; the only writer is the [`TickSource`] handle
/// obtained through [`TickCounter::take_source`]. Both counters wrap at
/// `u32::MAX`.
pub struct TickCounter {
    ticks: AtomicU32,
    delay: AtomicU32,
    armed: AtomicBool,
}

impl TickCounter {
    /// Create a new counter, usable in a `static`
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU32::new(0),
            delay: AtomicU32::new(0),
            armed: AtomicBool::new(false),
        }
    }

    /// Hand out the exclusive write handle and arm the scheduler.
    ///
    /// Returns `None` on every call after the first. Call this once from
    /// the main context during bring-up, before the tick interrupt is
    /// enabled; the handle is what the interrupt handler ticks.
    pub fn take_source(&self) -> Option<TickSource<'_>> {
        if self.armed.load(Ordering::Relaxed) {
            None
        } else {
            self.armed.store(true, Ordering::Relaxed);
            Some(TickSource { counter: self })
        }
    }

    /// Current system tick count
    #[inline]
    pub fn now(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Whether the write handle has been taken
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Relaxed)
    }

    /// Ticks elapsed since the last delay restart
    #[inline]
    pub(crate) fn delay_elapsed(&self) -> u32 {
        self.delay.load(Ordering::Relaxed)
    }

    /// Restart the delay counter from zero
    #[inline]
    pub(crate) fn restart_delay(&self) {
        self.delay.store(0, Ordering::Relaxed);
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive write handle for a [`TickCounter`], held by the tick
/// interrupt. There is at most one per counter.
pub struct TickSource<'a> {
    counter: &'a TickCounter,
}

impl TickSource<'_> {
    /// Advance both counters by one tick.
    ///
    /// Call from the periodic tick interrupt, at [`crate::config::TICK_HZ`].
    /// Load/store is enough here: this handle is the sole writer.
    #[inline]
    pub fn tick(&mut self) {
        let ticks = self.counter.ticks.load(Ordering::Relaxed);
        self.counter.ticks.store(ticks.wrapping_add(1), Ordering::Relaxed);
        let delay = self.counter.delay.load(Ordering::Relaxed);
        self.counter.delay.store(delay.wrapping_add(1), Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_count_up_monotonically() {
        let counter = TickCounter::new();
        let mut source = counter.take_source().unwrap();

        assert_eq!(counter.now(), 0);
        for expected in 1..=5 {
            source.tick();
            assert_eq!(counter.now(), expected);
        }
    }

    #[test]
    fn tick_advances_both_counters() {
        let counter = TickCounter::new();
        let mut source = counter.take_source().unwrap();

        source.tick();
        source.tick();
        assert_eq!(counter.now(), 2);
        assert_eq!(counter.delay_elapsed(), 2);

        counter.restart_delay();
        assert_eq!(counter.delay_elapsed(), 0);
        assert_eq!(counter.now(), 2);

        source.tick();
        assert_eq!(counter.delay_elapsed(), 1);
        assert_eq!(counter.now(), 3);
    }

    #[test]
    fn source_can_only_be_taken_once() {
        let counter = TickCounter::new();
        assert!(!counter.is_armed());

        let first = counter.take_source();
        assert!(first.is_some());
        assert!(counter.is_armed());
        assert!(counter.take_source().is_none());

        // Dropping the handle does not disarm the counter
        drop(first);
        assert!(counter.is_armed());
        assert!(counter.take_source().is_none());
    }

    #[test]
    fn counter_wraps_at_u32_max() {
        let counter = TickCounter::new();
        let mut source = counter.take_source().unwrap();

        counter.ticks.store(u32::MAX, Ordering::Relaxed);
        source.tick();
        assert_eq!(counter.now(), 0);
    }
}
