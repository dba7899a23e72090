//! Cooperative software timer service for interrupt-driven MCUs
//!
//! A fixed pool of software timers counts down against a monotonic tick
//! incremented from a periodic interrupt. The polling loop drives expiry
//! through [`TimerPool::poll`], which checks exactly one slot per call so
//! each call stays O(1) whatever the pool size. Clock bring-up and the
//! tick interrupt itself stay outside the crate; wiring looks like:
//!
//! ```no_run
//! use swtimer::{config, TickCounter, TimerKind, TimerPool};
//!
//! static TICK: TickCounter = TickCounter::new();
//!
//! fn on_blink(_tick: u32, _count: u8) {
//!     // toggle a pin here
//! }
//!
//! // Bring-up: arm the counter, then have the tick interrupt call
//! // `source.tick()` at config::TICK_HZ.
//! let mut source = TICK.take_source().unwrap();
//!
//! let mut pool = TimerPool::<8>::new(&TICK);
//! let _blink = pool.create(on_blink, TimerKind::AutoReload, config::ms(500)).unwrap();
//! loop {
//!     pool.poll();
//!     // ... other cooperative work ...
//! }
//! ```

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod delay;
pub mod tick;
pub mod timer;

pub use delay::Delay;
pub use tick::{TickCounter, TickSource};
pub use timer::{
    Callback, SystemTimerPool, TimerError, TimerId, TimerKind, TimerPool, TimerState,
};
