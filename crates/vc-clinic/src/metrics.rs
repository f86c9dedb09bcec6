//! Metrics collector.
//!
//! `Metrics` only appends.  Sums, rates and percentages are left to the
//! reporting side, which reads the collected series after a run.

use std::fmt;

use vc_core::{PatientId, SimTime};

/// What happened to a patient at an instant.  One [`EventRecord`] per
/// lifecycle step.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    Arrived,
    Balked,
    JoinedCheckInQueue,
    CheckInStarted,
    RenegedCheckIn,
    JoinedVaccinationQueue,
    VaccinationStarted,
    RenegedVaccination,
    Vaccinated,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::Arrived                => "arrived",
            Action::Balked                 => "balked",
            Action::JoinedCheckInQueue     => "joined_checkin_queue",
            Action::CheckInStarted         => "checkin_started",
            Action::RenegedCheckIn         => "reneged_checkin",
            Action::JoinedVaccinationQueue => "joined_vaccination_queue",
            Action::VaccinationStarted     => "vaccination_started",
            Action::RenegedVaccination     => "reneged_vaccination",
            Action::Vaccinated             => "vaccinated",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum QueueName {
    CheckIn,
    Vaccination,
}

impl QueueName {
    pub fn label(self) -> &'static str {
        match self {
            QueueName::CheckIn     => "checkin",
            QueueName::Vaccination => "vaccination",
        }
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Rows ──────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct EventRecord {
    pub patient: PatientId,
    pub action:  Action,
    pub time:    SimTime,
}

/// Queue length right after a membership change.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct QueueLengthSample {
    pub time:   SimTime,
    pub queue:  QueueName,
    pub length: usize,
}

/// Idle units × seconds since the pool's previous request, taken when a
/// new request arrives.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct IdleTimeSample {
    pub resource:  &'static str,
    pub time:      SimTime,
    pub idle_secs: f64,
}

// ── Metrics ───────────────────────────────────────────────────────────────────

#[derive(Default, Debug)]
pub struct Metrics {
    events:        Vec<EventRecord>,
    queue_lengths: Vec<QueueLengthSample>,
    idle_samples:  Vec<IdleTimeSample>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self, patient: PatientId, action: Action, time: SimTime) {
        self.events.push(EventRecord { patient, action, time });
    }

    pub fn record_queue_length(&mut self, queue: QueueName, time: SimTime, length: usize) {
        self.queue_lengths.push(QueueLengthSample { time, queue, length });
    }

    pub fn record_idle_sample(&mut self, resource: &'static str, time: SimTime, idle_secs: f64) {
        self.idle_samples.push(IdleTimeSample { resource, time, idle_secs });
    }

    /// Ordered event log.
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn queue_lengths(&self) -> &[QueueLengthSample] {
        &self.queue_lengths
    }

    pub fn idle_samples(&self) -> &[IdleTimeSample] {
        &self.idle_samples
    }

    /// Samples of one queue, in time order.
    pub fn queue_series(&self, queue: QueueName) -> impl Iterator<Item = &QueueLengthSample> {
        self.queue_lengths.iter().filter(move |s| s.queue == queue)
    }

    /// Sum of the idle samples of one pool.
    pub fn total_idle(&self, resource: &str) -> f64 {
        self.idle_samples
            .iter()
            .filter(|s| s.resource == resource)
            .map(|s| s.idle_secs)
            .sum()
    }

    /// Every event of one patient, in order.
    pub fn events_for(&self, patient: PatientId) -> impl Iterator<Item = &EventRecord> {
        self.events.iter().filter(move |e| e.patient == patient)
    }
}
