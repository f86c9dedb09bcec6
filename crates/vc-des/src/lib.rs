//! `vc-des`: the discrete-event kernel.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`scheduler`] | `Scheduler<E>` (`BTreeMap<(SimTime, seq), E>`), `EventHandler`, `RunLimit` |
//! | [`pool`]      | `ResourcePool<R>`: capacity limiter with priority admission |
//! | [`error`]     | `DesError`, `DesResult<T>`                                 |
//!
//! # Execution model (summary)
//!
//! ```text
//! loop:
//!   pop earliest (due_time, seq) event      ← equal times pop in schedule order
//!   advance clock to due_time
//!   handler.handle(scheduler, event)        ← runs to completion, may schedule more
//! until the queue is empty or the next event is due at/after the limit
//! ```
//!
//! There is no preemption.  A process "suspends" by scheduling the event that
//! resumes it (a timed delay) or by queueing on a [`ResourcePool`] and being
//! rescheduled when capacity is handed to it.

pub mod error;
pub mod pool;
pub mod scheduler;


pub use error::{DesError, DesResult};
pub use pool::{Admission, Grant, RequestOutcome, ResourcePool};
pub use scheduler::{EventHandler, EventId, RunLimit, RunStats, Scheduler};
