//! `ResourcePool<R>`: a fixed-capacity server pool with priority admission.
//!
//! # Admission rules
//!
//! - A request is granted on the spot when a unit is free.  Otherwise it
//!   waits, keyed by `(priority, seq)`: lower priority numbers first, FIFO
//!   within a priority class.
//! - Releasing a unit hands it straight to the best waiter.  The pool never
//!   preempts a unit that is already granted.
//! - `in_use` never exceeds `capacity`.
//!
//! The pool does not touch the scheduler.  Callers resume the requester by
//! scheduling an event at the current time, which keeps a woken process
//! behind the handler that released capacity.
//!
//! # Idle-time sampling
//!
//! Each request records `(capacity − in_use) × (now − previous request)`,
//! measured before the new request is admitted.  This is a sample taken at
//! request instants only, so it misses idle stretches that open and close
//! between two requests; it is not an exact time integral.

use std::collections::BTreeMap;

use tracing::trace;
use vc_core::SimTime;

use crate::{DesError, DesResult};

/// Proof of one granted unit.  Move-only: it is consumed by
/// [`ResourcePool::release`], so a unit cannot be returned twice.
#[derive(Debug, PartialEq, Eq)]
pub struct Grant {
    pool:   &'static str,
    serial: u64,
}

/// Result of [`ResourcePool::request`].
#[derive(Debug)]
pub enum Admission<R> {
    /// A unit was free; the requester holds it now.
    Granted { requester: R, grant: Grant },
    /// No unit was free; the requester is queued.
    Queued,
}

/// What a request produced, plus the idle-time sample taken at that instant.
#[derive(Debug)]
pub struct RequestOutcome<R> {
    pub admission: Admission<R>,
    pub idle_secs: f64,
}

struct Waiter<R> {
    requester:   R,
    enqueued_at: SimTime,
}

pub struct ResourcePool<R> {
    name:            &'static str,
    capacity:        u32,
    in_use:          u32,
    waiters:         BTreeMap<(i32, u64), Waiter<R>>,
    next_seq:        u64,
    last_request_at: SimTime,
    /// High-water mark of `in_use`.
    peak_in_use:     u32,
}

impl<R> ResourcePool<R> {
    /// Create a pool.  Capacity is fixed for the pool's lifetime and must be
    /// at least 1.
    pub fn new(name: &'static str, capacity: u32) -> DesResult<Self> {
        if capacity == 0 {
            return Err(DesError::ZeroCapacity(name));
        }
        Ok(Self {
            name,
            capacity,
            in_use:          0,
            waiters:         BTreeMap::new(),
            next_seq:        0,
            last_request_at: SimTime::ZERO,
            peak_in_use:     0,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn in_use(&self) -> u32 {
        self.in_use
    }

    pub fn peak_in_use(&self) -> u32 {
        self.peak_in_use
    }

    /// Number of queued requests.
    pub fn waiting(&self) -> usize {
        self.waiters.len()
    }

    pub fn is_saturated(&self) -> bool {
        self.in_use >= self.capacity
    }

    /// Ask for one unit at `priority` (lower is served first).
    pub fn request(&mut self, priority: i32, requester: R, now: SimTime) -> RequestOutcome<R> {
        let idle_units = f64::from(self.capacity - self.in_use);
        let idle_secs = idle_units * now.since(self.last_request_at).max(0.0);
        self.last_request_at = now;

        let seq = self.next_seq;
        self.next_seq += 1;

        let admission = if self.is_saturated() {
            self.waiters.insert((priority, seq), Waiter { requester, enqueued_at: now });
            Admission::Queued
        } else {
            Admission::Granted { requester, grant: self.issue(seq) }
        };
        RequestOutcome { admission, idle_secs }
    }

    /// Return a unit.  If anyone is waiting, the unit passes straight to the
    /// best waiter, who is returned together with its grant and the time it
    /// joined the line.
    pub fn release(&mut self, grant: Grant) -> DesResult<Option<(R, Grant, SimTime)>> {
        if grant.pool != self.name {
            return Err(DesError::ForeignGrant { issued_by: grant.pool, released_to: self.name });
        }
        self.in_use -= 1;
        trace!(pool = self.name, serial = grant.serial, in_use = self.in_use, "unit released");

        let Some(((_, seq), waiter)) = self.waiters.pop_first() else {
            return Ok(None);
        };
        let next = self.issue(seq);
        Ok(Some((waiter.requester, next, waiter.enqueued_at)))
    }

    fn issue(&mut self, serial: u64) -> Grant {
        self.in_use += 1;
        self.peak_in_use = self.peak_in_use.max(self.in_use);
        debug_assert!(self.in_use <= self.capacity);
        Grant { pool: self.name, serial }
    }
}
