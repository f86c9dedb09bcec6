//! Plain data row types written by output backends.
//!
//! Times are simulated seconds.  Every row carries the `run` index so
//! several runs (e.g. a staffing sweep) can share one set of files.

use vc_clinic::{EventRecord, IdleTimeSample, Patient, QueueLengthSample, RunResult};

/// One row of the final patient table.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRow {
    pub run:                  u32,
    pub patient_id:           String,
    pub patient_type:         &'static str,
    pub balk_threshold:       u64,
    pub renege_deadline_secs: f64,
    pub arrival_time:         f64,
    /// `None` for patients who balked.
    pub checkin_time:         Option<f64>,
    /// `None` while the patient was still inside at the horizon.
    pub departure_time:       Option<f64>,
    pub outcome:              &'static str,
}

impl PatientRow {
    pub fn new(run: u32, p: &Patient) -> Self {
        Self {
            run,
            patient_id:           p.id.to_string(),
            patient_type:         p.kind.label(),
            balk_threshold:       p.balk_threshold as u64,
            renege_deadline_secs: p.renege_deadline_secs,
            arrival_time:         p.arrival_time.secs(),
            checkin_time:         p.checkin_time.map(|t| t.secs()),
            departure_time:       p.departure_time.map(|t| t.secs()),
            outcome:              p.outcome().label(),
        }
    }
}

/// One line of the ordered event log.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub run:        u32,
    pub patient_id: String,
    pub action:     &'static str,
    pub time:       f64,
}

impl EventRow {
    pub fn new(run: u32, e: &EventRecord) -> Self {
        Self { run, patient_id: e.patient.to_string(), action: e.action.label(), time: e.time.secs() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueLengthRow {
    pub run:    u32,
    pub time:   f64,
    pub queue:  &'static str,
    pub length: u64,
}

impl QueueLengthRow {
    pub fn new(run: u32, s: &QueueLengthSample) -> Self {
        Self { run, time: s.time.secs(), queue: s.queue.label(), length: s.length as u64 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleRow {
    pub run:       u32,
    pub resource:  &'static str,
    pub time:      f64,
    pub idle_secs: f64,
}

impl IdleRow {
    pub fn new(run: u32, s: &IdleTimeSample) -> Self {
        Self { run, resource: s.resource, time: s.time.secs(), idle_secs: s.idle_secs }
    }
}

/// Summary counters of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRow {
    pub run:                 u32,
    pub receptionists:       u32,
    pub nurses:              u32,
    /// `u64::MAX` marks an unseeded run.
    pub seed:                u64,
    pub walk_ins:            u64,
    pub appointments:        u64,
    pub balked:              u64,
    pub reneged_checkin:     u64,
    pub reneged_vaccination: u64,
    pub vaccinated:          u64,
    pub pending:             u64,
}

impl SummaryRow {
    pub fn new(run: u32, r: &RunResult) -> Self {
        let s = r.summary;
        Self {
            run,
            receptionists:       r.receptionists,
            nurses:              r.nurses,
            seed:                r.seed.unwrap_or(u64::MAX),
            walk_ins:            s.walk_ins as u64,
            appointments:        s.appointments as u64,
            balked:              s.balked as u64,
            reneged_checkin:     s.reneged_checkin as u64,
            reneged_vaccination: s.reneged_vaccination as u64,
            vaccinated:          s.vaccinated as u64,
            pending:             s.pending as u64,
        }
    }
}
