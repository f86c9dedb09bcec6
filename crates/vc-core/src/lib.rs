//! `vc-core`: foundational types for the vaccine clinic simulator.
//!
//! This crate is a dependency of every other `vc-*` crate.  It intentionally
//! has no `vc-*` dependencies and minimal external ones (`rand`,
//! `rand_distr` and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `PatientKey` (dense index), `PatientId` (walk-in / appointment) |
//! | [`time`]    | `SimTime`, `SimClock`, minute/second helpers              |
//! | [`rng`]     | `SimRng` (single deterministic stream per run)            |
//! | [`config`]  | `ClinicConfig`, `FlowBand`, `PatientProfile`, validation  |
//! | [`error`]   | `VcError`, `VcResult`                                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types; required to load a `ClinicConfig` from JSON. |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ClinicConfig, FlowBand, FlowLevel, PatientProfile, RenegeRule};
pub use error::{VcError, VcResult};
pub use ids::{PatientId, PatientKey};
pub use rng::SimRng;
pub use time::{SimClock, SimTime, minutes_to_secs};
