//! `vc-clinic`: the vaccination clinic model.
//!
//! # Patient lifecycle
//!
//! ```text
//! walk-in arrives ──► queue ≥ balk threshold? ──yes──► Balked
//!                              │ no
//!                              ▼
//!                     InCheckInQueue ── receptionist granted ──► waited > deadline? ──yes──► RenegedCheckIn
//!                                                                         │ no
//!                                                              check-in service time
//!                                                                         ▼
//!                  InVaccinationQueue ── nurse granted ──► waited > deadline? ──yes──► RenegedVaccination
//!                                                                   │ no
//!                                                        vaccination service time
//!                                                                   ▼
//!                                                              Vaccinated
//! ```
//!
//! Appointment holders skip the balk check, jump to the front of the check-in
//! queue, and request the receptionist at priority −1 (ahead of walk-ins at
//! priority 0).  Waiting time is always measured from the original check-in
//! queue entry, and it is checked only when a resource is granted.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`patient`]  | `Patient`, `PatientKind`, `PatientState`, `Outcome`, `PatientTable` |
//! | [`arrivals`] | `ArrivalModel` (banded half-normal walk-in gaps, type draw) |
//! | [`process`]  | `ServiceTimes` and the event handler driving each patient   |
//! | [`metrics`]  | `Metrics` collector, `Action`, sample row types             |
//! | [`clinic`]   | `Clinic` (scheduler + state), [`run`] entry point           |
//! | [`result`]   | `RunResult`, `Summary`                                      |
//! | [`error`]    | `ClinicError`, `ClinicResult<T>`                            |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use vc_core::ClinicConfig;
//!
//! let config = ClinicConfig { receptionists: 1, nurses: 2, ..ClinicConfig::default() };
//! let result = vc_clinic::run(&config)?;
//! println!("vaccinated {}", result.summary.vaccinated);
//! ```

pub mod arrivals;
pub mod clinic;
pub mod error;
pub mod metrics;
pub mod patient;
pub mod process;
pub mod result;

#[cfg(test)]
mod tests;

pub use arrivals::ArrivalModel;
pub use clinic::{Clinic, run};
pub use error::{ClinicError, ClinicResult};
pub use metrics::{Action, EventRecord, IdleTimeSample, Metrics, QueueLengthSample, QueueName};
pub use patient::{Outcome, Patient, PatientKind, PatientState, PatientTable};
pub use process::ServiceTimes;
pub use result::{RunResult, Summary};

/// Name of the receptionist pool in idle-time samples.
pub const RECEPTIONIST_POOL: &str = "receptionist";

/// Name of the nurse pool in idle-time samples.
pub const NURSE_POOL: &str = "nurse";

/// Receptionist priority of appointment holders.
pub const APPOINTMENT_PRIORITY: i32 = -1;

/// Receptionist priority of walk-ins, and the only nurse priority.
pub const WALK_IN_PRIORITY: i32 = 0;
