//! Configuration constants for the timer service

/// Tick interrupt rate in Hz (one tick every 5 us)
pub const TICK_HZ: u32 = 200_000;

/// Tick period in microseconds
pub const TICK_PERIOD_US: u32 = 5;

/// Ticks per millisecond
pub const TICKS_PER_MS: u32 = TICK_HZ / 1_000;

/// Ticks per 10 us step
pub const TICKS_PER_10US: u32 = 2;

/// Number of slots in the system timer pool
pub const TIMER_POOL_SIZE: usize = 20;

/// Convert milliseconds to ticks, for timer periods
pub const fn ms(n: u32) -> u32 {
    n * TICKS_PER_MS
}

/// Convert multiples of 10 us to ticks, for timer periods
pub const fn ten_us(n: u32) -> u32 {
    n * TICKS_PER_10US
}
