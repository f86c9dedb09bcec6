//! `Scheduler<E>`: the time-ordered event set and its run loop.
//!
//! # Ordering
//!
//! Events are keyed by `(due_time, seq)` in a `BTreeMap`, where `seq` is a
//! counter bumped on every insert.  Two events due at the same instant
//! therefore pop in the order they were scheduled.  Handlers rely on this:
//! a waiter woken by a release at time `t` is scheduled at `t` and runs
//! after the releasing handler finishes, seeing exactly the state it left.
//!
//! # Payload
//!
//! The scheduler is generic over the event payload `E`.  Continuations are
//! plain enum values interpreted by an [`EventHandler`]; nothing is boxed.

use std::collections::BTreeMap;

use tracing::trace;
use vc_core::{SimClock, SimTime};

use crate::{DesError, DesResult};

/// Handle returned by [`Scheduler::schedule_after`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct EventId {
    pub due: SimTime,
    pub seq: u64,
}

/// When [`Scheduler::run`] should stop.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum RunLimit {
    /// Execute events due strictly before this instant, then park the clock
    /// at it.  Events due at or after the limit stay queued.
    Until(SimTime),
    /// Execute until the event set is empty.
    Exhausted,
}

/// Counters reported when a run stops.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct RunStats {
    /// Events executed by this call to `run`.
    pub processed:  u64,
    /// Events still queued (abandoned if the caller does not resume).
    pub pending:    usize,
    pub final_time: SimTime,
}

/// Interprets events popped by [`Scheduler::run`].
///
/// The handler gets the scheduler back so it can schedule follow-up events.
/// It must not hold any borrow of the scheduler across calls.
pub trait EventHandler<E> {
    type Error: From<DesError>;

    fn handle(&mut self, scheduler: &mut Scheduler<E>, event: E) -> Result<(), Self::Error>;
}

/// Single-threaded cooperative event scheduler.
pub struct Scheduler<E> {
    clock:     SimClock,
    queue:     BTreeMap<(SimTime, u64), E>,
    next_seq:  u64,
    processed: u64,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            clock:     SimClock::new(),
            queue:     BTreeMap::new(),
            next_seq:  0,
            processed: 0,
        }
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Schedule `event` to run `delay` seconds from now.
    ///
    /// A zero delay is allowed and queues the event behind everything else
    /// already due now.
    pub fn schedule_after(&mut self, delay: f64, event: E) -> DesResult<EventId> {
        if delay.is_nan() || delay < 0.0 {
            return Err(DesError::NegativeDelay(delay));
        }
        let due = self.now() + delay;
        Ok(self.insert(due, event))
    }

    /// Schedule `event` at the absolute instant `at`, which must not be in
    /// the past.
    pub fn schedule_at(&mut self, at: SimTime, event: E) -> DesResult<EventId> {
        if at.0.is_nan() || at < self.now() {
            return Err(DesError::TimeReversal { now: self.now(), requested: at });
        }
        Ok(self.insert(at, event))
    }

    fn insert(&mut self, due: SimTime, event: E) -> EventId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((due, seq), event);
        EventId { due, seq }
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Due time of the earliest queued event, or `None` if empty.
    pub fn next_time(&self) -> Option<SimTime> {
        self.queue.keys().next().map(|&(t, _)| t)
    }

    /// Total events executed over the scheduler's lifetime.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Pop the next event within `limit`, advancing the clock to its due
    /// time.  Returns `None` when the set is empty or the next event lies at
    /// or beyond the limit.
    pub fn pop_next(&mut self, limit: RunLimit) -> Option<E> {
        let due = self.next_time()?;
        if let RunLimit::Until(end) = limit {
            if due >= end {
                return None;
            }
        }
        let ((due, seq), event) = self.queue.pop_first()?;
        // Inserts never go below `now`, so this cannot fail.
        let advanced = self.clock.advance_to(due);
        debug_assert!(advanced, "event {seq} due at {due} is behind the clock");
        self.processed += 1;
        trace!(seq, time = due.secs(), "pop event");
        Some(event)
    }

    /// Drive `handler` until `limit` is reached or no events remain.
    ///
    /// The first handler error stops the run and is returned as-is.  Events
    /// still queued when the run stops are left in place; callers that do
    /// not resume simply drop them.
    pub fn run<H>(&mut self, limit: RunLimit, handler: &mut H) -> Result<RunStats, H::Error>
    where
        H: EventHandler<E>,
    {
        let start = self.processed;
        while let Some(event) = self.pop_next(limit) {
            handler.handle(self, event)?;
        }
        if let RunLimit::Until(end) = limit {
            self.clock.advance_to(end);
        }
        Ok(RunStats {
            processed:  self.processed - start,
            pending:    self.queue.len(),
            final_time: self.now(),
        })
    }
}
