//! CSV output backend.
//!
//! Creates five files in the configured output directory:
//! - `patients.csv`
//! - `events.csv`
//! - `queue_lengths.csv`
//! - `idle_samples.csv`
//! - `summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{EventRow, IdleRow, OutputResult, PatientRow, QueueLengthRow, SummaryRow};

pub const PATIENT_HEADERS: [&str; 9] = [
    "run", "patient_id", "patient_type", "balk_threshold", "renege_deadline_secs",
    "arrival_time", "checkin_time", "departure_time", "outcome",
];
pub const EVENT_HEADERS: [&str; 4] = ["run", "patient_id", "action", "time"];
pub const QUEUE_HEADERS: [&str; 4] = ["run", "time", "queue", "length"];
pub const IDLE_HEADERS: [&str; 4] = ["run", "resource", "time", "idle_secs"];
pub const SUMMARY_HEADERS: [&str; 11] = [
    "run", "receptionists", "nurses", "seed", "walk_ins", "appointments", "balked",
    "reneged_checkin", "reneged_vaccination", "vaccinated", "pending",
];

/// Writes run output to five CSV files.
pub struct CsvWriter {
    patients:  Writer<File>,
    events:    Writer<File>,
    queues:    Writer<File>,
    idle:      Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

fn open(dir: &Path, name: &str, headers: &[&str]) -> OutputResult<Writer<File>> {
    let mut w = Writer::from_path(dir.join(name))?;
    w.write_record(headers)?;
    Ok(w)
}

fn opt(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

impl CsvWriter {
    /// Open (or create) the five CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        Ok(Self {
            patients:  open(dir, "patients.csv", &PATIENT_HEADERS)?,
            events:    open(dir, "events.csv", &EVENT_HEADERS)?,
            queues:    open(dir, "queue_lengths.csv", &QUEUE_HEADERS)?,
            idle:      open(dir, "idle_samples.csv", &IDLE_HEADERS)?,
            summaries: open(dir, "summaries.csv", &SUMMARY_HEADERS)?,
            finished:  false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_patients(&mut self, rows: &[PatientRow]) -> OutputResult<()> {
        for row in rows {
            self.patients.write_record(&[
                row.run.to_string(),
                row.patient_id.clone(),
                row.patient_type.to_string(),
                row.balk_threshold.to_string(),
                row.renege_deadline_secs.to_string(),
                row.arrival_time.to_string(),
                opt(row.checkin_time),
                opt(row.departure_time),
                row.outcome.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record(&[
                row.run.to_string(),
                row.patient_id.clone(),
                row.action.to_string(),
                row.time.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_queue_lengths(&mut self, rows: &[QueueLengthRow]) -> OutputResult<()> {
        for row in rows {
            self.queues.write_record(&[
                row.run.to_string(),
                row.time.to_string(),
                row.queue.to_string(),
                row.length.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_idle_samples(&mut self, rows: &[IdleRow]) -> OutputResult<()> {
        for row in rows {
            self.idle.write_record(&[
                row.run.to_string(),
                row.resource.to_string(),
                row.time.to_string(),
                row.idle_secs.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.run.to_string(),
            row.receptionists.to_string(),
            row.nurses.to_string(),
            row.seed.to_string(),
            row.walk_ins.to_string(),
            row.appointments.to_string(),
            row.balked.to_string(),
            row.reneged_checkin.to_string(),
            row.reneged_vaccination.to_string(),
            row.vaccinated.to_string(),
            row.pending.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.patients.flush()?;
        self.events.flush()?;
        self.queues.flush()?;
        self.idle.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
