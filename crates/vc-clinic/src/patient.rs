//! Patient records and the per-patient state machine.
//!
//! The [`PatientTable`] replaces a growing table that is scanned on every
//! lookup: records live in a `Vec` indexed by [`PatientKey`], with a side
//! index from the external [`PatientId`] for reporting lookups.

#[cfg(not(feature = "fx-hash"))]
use std::collections::HashMap;

#[cfg(feature = "fx-hash")]
use rustc_hash::FxHashMap as HashMap;

use vc_core::{ClinicConfig, PatientId, PatientKey, PatientProfile, SimTime};

use crate::{ClinicError, ClinicResult};

// ── Kinds, states, outcomes ───────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum PatientKind {
    Rushed,
    Relaxed,
    Scheduled,
}

impl PatientKind {
    pub fn label(self) -> &'static str {
        match self {
            PatientKind::Rushed    => "rushed",
            PatientKind::Relaxed   => "relaxed",
            PatientKind::Scheduled => "scheduled",
        }
    }

    /// The configured tolerances for this kind.
    pub fn profile(self, config: &ClinicConfig) -> PatientProfile {
        match self {
            PatientKind::Rushed    => config.rushed,
            PatientKind::Relaxed   => config.relaxed,
            PatientKind::Scheduled => config.scheduled,
        }
    }
}

/// Where a patient is in the lifecycle.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum PatientState {
    AwaitingCheckIn,
    InCheckInQueue,
    InVaccinationQueue,
    Balked,
    RenegedCheckIn,
    RenegedVaccination,
    Vaccinated,
}

impl PatientState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PatientState::Balked
                | PatientState::RenegedCheckIn
                | PatientState::RenegedVaccination
                | PatientState::Vaccinated
        )
    }

    /// Legal edges of the lifecycle graph.  Nothing leaves a terminal state.
    pub fn can_advance_to(self, next: PatientState) -> bool {
        use PatientState::*;
        matches!(
            (self, next),
            (AwaitingCheckIn, Balked)
                | (AwaitingCheckIn, InCheckInQueue)
                | (InCheckInQueue, RenegedCheckIn)
                | (InCheckInQueue, InVaccinationQueue)
                | (InVaccinationQueue, RenegedVaccination)
                | (InVaccinationQueue, Vaccinated)
        )
    }

    pub fn outcome(self) -> Outcome {
        match self {
            PatientState::AwaitingCheckIn
            | PatientState::InCheckInQueue
            | PatientState::InVaccinationQueue => Outcome::Pending,
            PatientState::Balked             => Outcome::Balked,
            PatientState::RenegedCheckIn     => Outcome::RenegedCheckIn,
            PatientState::RenegedVaccination => Outcome::RenegedVaccination,
            PatientState::Vaccinated         => Outcome::Vaccinated,
        }
    }
}

/// Final disposition reported to collaborators.  `Pending` means the
/// patient was still in the clinic when the horizon was reached.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Outcome {
    Pending,
    Balked,
    RenegedCheckIn,
    RenegedVaccination,
    Vaccinated,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Pending            => "pending",
            Outcome::Balked             => "balked",
            Outcome::RenegedCheckIn     => "reneged_checkin",
            Outcome::RenegedVaccination => "reneged_vaccination",
            Outcome::Vaccinated         => "vaccinated",
        }
    }
}

// ── Patient ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Patient {
    pub key:  PatientKey,
    pub id:   PatientId,
    pub kind: PatientKind,
    /// Check-in queue length at which this patient balks.
    pub balk_threshold: usize,
    /// Seconds of total wait tolerated, counted from check-in queue entry.
    pub renege_deadline_secs: f64,
    pub arrival_time: SimTime,
    /// Set when the patient joins the check-in queue; `None` for balkers.
    pub checkin_time: Option<SimTime>,
    /// Set when the patient reaches a terminal state.
    pub departure_time: Option<SimTime>,
    state: PatientState,
}

impl Patient {
    pub fn state(&self) -> PatientState {
        self.state
    }

    pub fn outcome(&self) -> Outcome {
        self.state.outcome()
    }

    /// Seconds since the original check-in queue entry.
    pub fn waited_secs(&self, now: SimTime) -> f64 {
        now.since(self.checkin_time.unwrap_or(self.arrival_time))
    }

    /// Has the patient already waited longer than it tolerates?
    pub fn past_deadline(&self, now: SimTime) -> bool {
        self.waited_secs(now) > self.renege_deadline_secs
    }

    /// Move along one lifecycle edge, stamping check-in and departure times.
    pub fn advance(&mut self, next: PatientState, now: SimTime) -> ClinicResult<()> {
        if !self.state.can_advance_to(next) {
            return Err(ClinicError::InvalidTransition {
                patient: self.id,
                from:    self.state,
                to:      next,
            });
        }
        if next == PatientState::InCheckInQueue {
            self.checkin_time = Some(now);
        }
        if next.is_terminal() {
            self.departure_time = Some(now);
        }
        self.state = next;
        Ok(())
    }
}

// ── PatientTable ──────────────────────────────────────────────────────────────

/// All patients of a run, in arrival order.
#[derive(Default)]
pub struct PatientTable {
    records: Vec<Patient>,
    by_id:   HashMap<PatientId, PatientKey>,
}

impl PatientTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record in `AwaitingCheckIn` and return its key.
    pub fn admit(
        &mut self,
        id:      PatientId,
        kind:    PatientKind,
        profile: PatientProfile,
        config:  &ClinicConfig,
        now:     SimTime,
    ) -> ClinicResult<PatientKey> {
        let key = PatientKey::try_from(self.records.len())
            .map_err(|_| ClinicError::TableFull(self.records.len()))?;
        self.records.push(Patient {
            key,
            id,
            kind,
            balk_threshold:       profile.balk_threshold,
            renege_deadline_secs: profile.renege_deadline_secs(config),
            arrival_time:         now,
            checkin_time:         None,
            departure_time:       None,
            state:                PatientState::AwaitingCheckIn,
        });
        self.by_id.insert(id, key);
        Ok(key)
    }

    pub fn get(&self, key: PatientKey) -> ClinicResult<&Patient> {
        self.records.get(key.index()).ok_or(ClinicError::MissingPatient(key))
    }

    pub fn get_mut(&mut self, key: PatientKey) -> ClinicResult<&mut Patient> {
        self.records.get_mut(key.index()).ok_or(ClinicError::MissingPatient(key))
    }

    /// Look a patient up by its external label.
    pub fn lookup(&self, id: &PatientId) -> Option<&Patient> {
        self.by_id.get(id).and_then(|k| self.records.get(k.index()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Patient> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
