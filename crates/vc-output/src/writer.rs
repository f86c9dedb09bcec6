//! The `OutputWriter` trait implemented by all backend writers.

use tracing::debug;
use vc_clinic::RunResult;

use crate::{EventRow, IdleRow, OutputResult, PatientRow, QueueLengthRow, SummaryRow};

/// Trait implemented by the CSV and SQLite writers.
pub trait OutputWriter {
    fn write_patients(&mut self, rows: &[PatientRow]) -> OutputResult<()>;

    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()>;

    fn write_queue_lengths(&mut self, rows: &[QueueLengthRow]) -> OutputResult<()>;

    fn write_idle_samples(&mut self, rows: &[IdleRow]) -> OutputResult<()>;

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Write every table of `result`, tagged with `run`.  Does not call
/// `finish`, so several runs can go to the same writer.
pub fn write_run<W: OutputWriter + ?Sized>(writer: &mut W, result: &RunResult, run: u32) -> OutputResult<()> {
    let patients: Vec<PatientRow> = result.patients.iter().map(|p| PatientRow::new(run, p)).collect();
    writer.write_patients(&patients)?;

    let events: Vec<EventRow> = result.metrics.events().iter().map(|e| EventRow::new(run, e)).collect();
    writer.write_events(&events)?;

    let queues: Vec<QueueLengthRow> =
        result.metrics.queue_lengths().iter().map(|s| QueueLengthRow::new(run, s)).collect();
    writer.write_queue_lengths(&queues)?;

    let idle: Vec<IdleRow> = result.metrics.idle_samples().iter().map(|s| IdleRow::new(run, s)).collect();
    writer.write_idle_samples(&idle)?;

    writer.write_summary(&SummaryRow::new(run, result))?;
    debug!(run, patients = patients.len(), events = events.len(), "run written");
    Ok(())
}
