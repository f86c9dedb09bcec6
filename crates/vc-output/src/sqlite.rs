//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! five tables: `patients`, `events`, `queue_lengths`, `idle_samples` and
//! `summaries`.

use std::path::Path;

use rusqlite::{Connection, params};

use crate::writer::OutputWriter;
use crate::{EventRow, IdleRow, OutputResult, PatientRow, QueueLengthRow, SummaryRow};

/// Writes run output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    /// Tables left by an earlier writer are dropped, as `CsvWriter`
    /// truncates its files.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             DROP TABLE IF EXISTS patients;
             DROP TABLE IF EXISTS events;
             DROP TABLE IF EXISTS queue_lengths;
             DROP TABLE IF EXISTS idle_samples;
             DROP TABLE IF EXISTS summaries;
             CREATE TABLE patients (
                 run                  INTEGER NOT NULL,
                 patient_id           TEXT    NOT NULL,
                 patient_type         TEXT    NOT NULL,
                 balk_threshold       INTEGER NOT NULL,
                 renege_deadline_secs REAL    NOT NULL,
                 arrival_time         REAL    NOT NULL,
                 checkin_time         REAL,
                 departure_time       REAL,
                 outcome              TEXT    NOT NULL
             );
             CREATE TABLE events (
                 run        INTEGER NOT NULL,
                 patient_id TEXT    NOT NULL,
                 action     TEXT    NOT NULL,
                 time       REAL    NOT NULL
             );
             CREATE TABLE queue_lengths (
                 run    INTEGER NOT NULL,
                 time   REAL    NOT NULL,
                 queue  TEXT    NOT NULL,
                 length INTEGER NOT NULL
             );
             CREATE TABLE idle_samples (
                 run       INTEGER NOT NULL,
                 resource  TEXT    NOT NULL,
                 time      REAL    NOT NULL,
                 idle_secs REAL    NOT NULL
             );
             CREATE TABLE summaries (
                 run                 INTEGER PRIMARY KEY,
                 receptionists       INTEGER NOT NULL,
                 nurses              INTEGER NOT NULL,
                 seed                TEXT    NOT NULL,
                 walk_ins            INTEGER NOT NULL,
                 appointments        INTEGER NOT NULL,
                 balked              INTEGER NOT NULL,
                 reneged_checkin     INTEGER NOT NULL,
                 reneged_vaccination INTEGER NOT NULL,
                 vaccinated          INTEGER NOT NULL,
                 pending             INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_patients(&mut self, rows: &[PatientRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO patients \
                 (run, patient_id, patient_type, balk_threshold, renege_deadline_secs, \
                  arrival_time, checkin_time, departure_time, outcome) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.run,
                    row.patient_id,
                    row.patient_type,
                    // SQLite integers are signed; saturate "never balks" thresholds.
                    i64::try_from(row.balk_threshold).unwrap_or(i64::MAX),
                    row.renege_deadline_secs,
                    row.arrival_time,
                    row.checkin_time,
                    row.departure_time,
                    row.outcome,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO events (run, patient_id, action, time) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(params![row.run, row.patient_id, row.action, row.time])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_queue_lengths(&mut self, rows: &[QueueLengthRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO queue_lengths (run, time, queue, length) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(params![row.run, row.time, row.queue, row.length as i64])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_idle_samples(&mut self, rows: &[IdleRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO idle_samples (run, resource, time, idle_secs) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(params![row.run, row.resource, row.time, row.idle_secs])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO summaries \
             (run, receptionists, nurses, seed, walk_ins, appointments, balked, \
              reneged_checkin, reneged_vaccination, vaccinated, pending) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                row.run,
                row.receptionists,
                row.nurses,
                row.seed.to_string(),
                row.walk_ins as i64,
                row.appointments as i64,
                row.balked as i64,
                row.reneged_checkin as i64,
                row.reneged_vaccination as i64,
                row.vaccinated as i64,
                row.pending as i64,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
