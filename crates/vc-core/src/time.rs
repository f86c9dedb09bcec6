//! Simulation time model.
//!
//! # Design
//!
//! Time is a continuous number of simulated seconds since the clinic opened,
//! wrapped in [`SimTime`].  Service and inter-arrival durations are drawn
//! from continuous distributions, so an integer tick would have to round
//! every sample; floating-point seconds keep the sampled values exact.
//!
//! `SimTime` implements a total order (via `f64::total_cmp`) so it can key a
//! `BTreeMap`.  Constructors reject nothing; the scheduler is responsible for
//! never producing a NaN or a time before `now`.

use std::cmp::Ordering;
use std::fmt;

/// Seconds per simulated minute.  Service means are configured in minutes.
pub const SECS_PER_MINUTE: f64 = 60.0;

/// Convert a duration in minutes to seconds.
#[inline]
pub fn minutes_to_secs(minutes: f64) -> f64 {
    minutes * SECS_PER_MINUTE
}

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute simulated instant, in seconds since the start of the run.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    #[inline]
    pub fn secs(self) -> f64 {
        self.0
    }

    /// Seconds elapsed from `earlier` to `self`.  Negative if `earlier` is
    /// actually later.
    #[inline]
    pub fn since(self, earlier: SimTime) -> f64 {
        self.0 - earlier.0
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::ops::Add<f64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: f64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: SimTime) -> f64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.1}s", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The current simulated instant.  Only the scheduler advances it.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    now: SimTime,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Move the clock forward to `t`.  Returns `false` (and leaves the clock
    /// untouched) if `t` is earlier than the current time.
    #[inline]
    pub fn advance_to(&mut self, t: SimTime) -> bool {
        if t < self.now {
            return false;
        }
        self.now = t;
        true
    }

    /// Break elapsed time into (hour, minute, second) for log lines.
    pub fn elapsed_hms(&self) -> (u64, u32, u32) {
        let total = self.now.0.max(0.0) as u64;
        let hours = total / 3_600;
        let minutes = ((total % 3_600) / 60) as u32;
        let seconds = (total % 60) as u32;
        (hours, minutes, seconds)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.elapsed_hms();
        write!(f, "{} ({:02}:{:02}:{:02})", self.now, h, m, s)
    }
}
