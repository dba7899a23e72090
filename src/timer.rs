//! Software timer pool and cooperative expiry scan
//!
//! A fixed array of timer slots counts down against the shared system tick.
//! Slot indices double as timer identifiers: they are stable for the life
//! of a timer, never compacted, and reused only after deletion. Expiry is
//! checked by [`TimerPool::poll`], which visits exactly one slot per call.

use crate::config::TIMER_POOL_SIZE;
use crate::tick::TickCounter;
use ufmt::derive::uDebug;

/// Timer identifier: the index of the slot backing the timer
pub type TimerId = u16;

/// Expiry callback, invoked inline from [`TimerPool::poll`] with a snapshot
/// of the tick counter and an invocation count (currently always 1).
///
/// Callbacks must return quickly and must not call back into the pool that
/// fired them.
pub type Callback = fn(tick: u32, count: u8);

/// Timer behavior after a firing
#[derive(Clone, Copy, PartialEq, Eq, Debug, uDebug)]
pub enum TimerKind {
    /// Fire once, then stop
    OneShot,
    /// Fire, then push the deadline out by one period
    AutoReload,
    /// Reset value of an unused slot; rejected by [`TimerPool::create`]
    Undefined,
}

/// Timer slot state
#[derive(Clone, Copy, PartialEq, Eq, Debug, uDebug)]
pub enum TimerState {
    /// Slot is free and may be claimed by `create`
    Empty,
    /// Counting down towards the deadline
    Running,
    /// Not counting; `start` rearms it
    Stopped,
    /// Faulted at fire time; revive with `delete` + `create`, or
    /// `configure` + `start`
    Error,
}

/// Why a pool operation changed nothing
#[derive(Clone, Copy, PartialEq, Eq, Debug, uDebug)]
pub enum TimerError {
    /// Identifier is outside the pool
    InvalidId,
    /// Slot holds no timer
    SlotEmpty,
    /// Rejected at creation: undefined kind or zero period
    InvalidConfig,
    /// No empty slot left
    PoolExhausted,
    /// Slot is in the `Error` state
    Faulted,
}

#[derive(Clone, Copy)]
struct TimerSlot {
    callback: Option<Callback>,
    kind: TimerKind,
    period: u32,
    deadline: u32,
    state: TimerState,
}

impl TimerSlot {
    const EMPTY: Self = Self {
        callback: None,
        kind: TimerKind::Undefined,
        period: 0,
        deadline: 0,
        state: TimerState::Empty,
    };
}

/// Fixed-capacity pool of software timers.
///
/// All operations run in the cooperative polling context; nothing here is
/// safe to call from the tick interrupt. The pool reads time from the
/// [`TickCounter`] it was built around.
pub struct TimerPool<'a, const N: usize> {
    slots: [TimerSlot; N],
    cursor: usize,
    clock: &'a TickCounter,
}

/// Pool sized by [`TIMER_POOL_SIZE`]
pub type SystemTimerPool<'a> = TimerPool<'a, TIMER_POOL_SIZE>;

impl<'a, const N: usize> TimerPool<'a, N> {
    /// Create a pool of empty slots reading time from `clock`
    pub const fn new(clock: &'a TickCounter) -> Self {
        Self {
            slots: [TimerSlot::EMPTY; N],
            cursor: 0,
            clock,
        }
    }

    /// Number of slots in the pool
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Claim the first empty slot for a new running timer.
    ///
    /// The deadline is set to `now + period`, where `period` is in ticks
    /// (see [`crate::config::ms`]). An undefined kind or a zero period is
    /// rejected without consuming the slot the scan stopped at; later
    /// slots are not tried.
    pub fn create(
        &mut self,
        callback: Callback,
        kind: TimerKind,
        period: u32,
    ) -> Result<TimerId, TimerError> {
        let now = self.clock.now();
        for (id, slot) in self.slots.iter_mut().enumerate() {
            if slot.state != TimerState::Empty {
                continue;
            }
            if kind == TimerKind::Undefined || period == 0 {
                return Err(TimerError::InvalidConfig);
            }
            *slot = TimerSlot {
                callback: Some(callback),
                kind,
                period,
                deadline: now.wrapping_add(period),
                state: TimerState::Running,
            };
            return Ok(id as TimerId);
        }
        Err(TimerError::PoolExhausted)
    }

    /// Reconfigure a live timer in place.
    ///
    /// `None` keeps the current value, as do `Some(TimerKind::Undefined)`
    /// and `Some(0)` for the period. The deadline is left untouched: an
    /// in-flight timer finishes its current countdown before a new period
    /// takes effect (or call [`start`](Self::start) to rearm immediately).
    pub fn configure(
        &mut self,
        id: TimerId,
        callback: Option<Callback>,
        kind: Option<TimerKind>,
        period: Option<u32>,
    ) -> Result<(), TimerError> {
        let slot = self
            .slots
            .get_mut(id as usize)
            .ok_or(TimerError::InvalidId)?;
        if slot.state == TimerState::Empty {
            return Err(TimerError::SlotEmpty);
        }
        if let Some(callback) = callback {
            slot.callback = Some(callback);
        }
        if let Some(kind) = kind {
            if kind != TimerKind::Undefined {
                slot.kind = kind;
            }
        }
        if let Some(period) = period {
            if period != 0 {
                slot.period = period;
            }
        }
        Ok(())
    }

    /// Release a slot for reuse, whatever state it is in.
    ///
    /// The identifier may be handed out again by a later `create`.
    pub fn delete(&mut self, id: TimerId) -> Result<(), TimerError> {
        let slot = self
            .slots
            .get_mut(id as usize)
            .ok_or(TimerError::InvalidId)?;
        slot.state = TimerState::Empty;
        Ok(())
    }

    /// (Re)start a timer: deadline recomputed from the current tick.
    pub fn start(&mut self, id: TimerId) -> Result<(), TimerError> {
        let now = self.clock.now();
        let slot = self
            .slots
            .get_mut(id as usize)
            .ok_or(TimerError::InvalidId)?;
        if slot.state == TimerState::Empty {
            return Err(TimerError::SlotEmpty);
        }
        slot.deadline = now.wrapping_add(slot.period);
        slot.state = TimerState::Running;
        Ok(())
    }

    /// Halt a timer without releasing its slot. The stale deadline is
    /// recomputed by the next `start`.
    pub fn stop(&mut self, id: TimerId) -> Result<(), TimerError> {
        let slot = self
            .slots
            .get_mut(id as usize)
            .ok_or(TimerError::InvalidId)?;
        if slot.state == TimerState::Empty {
            return Err(TimerError::SlotEmpty);
        }
        slot.state = TimerState::Stopped;
        Ok(())
    }

    /// Current state of a slot.
    ///
    /// An out-of-range identifier reads as [`TimerState::Error`]; callers
    /// that need to tell a faulted timer from a bad handle must check the
    /// identifier against [`capacity`](Self::capacity) themselves.
    pub fn state(&self, id: TimerId) -> TimerState {
        match self.slots.get(id as usize) {
            Some(slot) => slot.state,
            None => TimerState::Error,
        }
    }

    /// Ticks left until a running timer is due; 0 for anything not running
    pub fn remaining(&self, id: TimerId) -> u32 {
        match self.slots.get(id as usize) {
            Some(slot) if slot.state == TimerState::Running => {
                slot.deadline.saturating_sub(self.clock.now())
            }
            _ => 0,
        }
    }

    /// Non-blocking wait for a one-shot timer to elapse.
    ///
    /// `WouldBlock` while the timer is running, `Ok` once it has stopped
    /// (a fired one-shot ends up `Stopped`, so a manually stopped timer
    /// also reads as elapsed). Empty or faulted slots and bad handles
    /// report the underlying [`TimerError`].
    pub fn wait(&self, id: TimerId) -> nb::Result<(), TimerError> {
        match self.slots.get(id as usize) {
            None => Err(nb::Error::Other(TimerError::InvalidId)),
            Some(slot) => match slot.state {
                TimerState::Running => Err(nb::Error::WouldBlock),
                TimerState::Stopped => Ok(()),
                TimerState::Empty => Err(nb::Error::Other(TimerError::SlotEmpty)),
                TimerState::Error => Err(nb::Error::Other(TimerError::Faulted)),
            },
        }
    }

    /// Run one step of the expiry scan.
    ///
    /// Examines the single slot under the cursor, fires it if due, then
    /// moves the cursor to the next slot. Each call is O(1) whatever the
    /// pool size, so the enclosing loop's worst-case latency does not grow
    /// with capacity; the price is that a full sweep takes N calls.
    ///
    /// A timer is fired at most once per visit. An auto-reload timer whose
    /// period is shorter than the time between visits to its slot skips
    /// the missed firings instead of bursting to catch up.
    ///
    /// Does nothing until the tick source has been armed with
    /// [`TickCounter::take_source`].
    pub fn poll(&mut self) {
        if !self.clock.is_armed() {
            return;
        }
        let tick = self.clock.now();
        let Some(slot) = self.slots.get_mut(self.cursor) else {
            return;
        };

        if slot.state == TimerState::Running && tick >= slot.deadline {
            match slot.callback {
                Some(callback) => callback(tick, 1),
                None => slot.state = TimerState::Error,
            }
            match slot.kind {
                TimerKind::OneShot => slot.state = TimerState::Stopped,
                // Reload from the old deadline, not from `tick`, so late
                // polls do not accumulate drift
                TimerKind::AutoReload => slot.deadline = slot.deadline.wrapping_add(slot.period),
                TimerKind::Undefined => slot.state = TimerState::Error,
            }
        }

        self.cursor += 1;
        if self.cursor >= N {
            self.cursor = 0;
        }
    }
}
