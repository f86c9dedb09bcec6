//! `vc-output`: persistence for clinic run results.
//!
//! Two backends are provided:
//!
//! | Feature   | Backend     | Files created                                            |
//! |-----------|-------------|----------------------------------------------------------|
//! | *(none)*  | CSV         | `patients.csv`, `events.csv`, `queue_lengths.csv`,       |
//! |           |             | `idle_samples.csv`, `summaries.csv`                      |
//! | `sqlite`  | SQLite      | `output.db` with the same five tables                    |
//!
//! Both implement [`OutputWriter`].  [`write_run`] pushes one complete
//! [`RunResult`][vc_clinic::RunResult] through any writer.
//!
//! # Usage
//!
//! ```rust,ignore
//! use vc_output::{CsvWriter, OutputWriter, write_run};
//!
//! let result = vc_clinic::run(&config)?;
//! let mut writer = CsvWriter::new(Path::new("./output"))?;
//! write_run(&mut writer, &result, 0)?;
//! writer.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use row::{EventRow, IdleRow, PatientRow, QueueLengthRow, SummaryRow};
pub use writer::{OutputWriter, write_run};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
