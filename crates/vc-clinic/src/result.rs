//! Run output consumed by reporting collaborators.

use vc_core::{PatientId, SimTime};

use crate::{Metrics, Outcome, Patient, PatientTable};

/// Outcome counts for one run.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Summary {
    pub walk_ins:            usize,
    pub appointments:        usize,
    pub balked:              usize,
    pub reneged_checkin:     usize,
    pub reneged_vaccination: usize,
    pub vaccinated:          usize,
    /// Still inside the clinic when the horizon was reached.
    pub pending:             usize,
}

impl Summary {
    pub fn from_patients<'a>(patients: impl IntoIterator<Item = &'a Patient>) -> Self {
        let mut s = Summary::default();
        for p in patients {
            if p.id.is_appointment() {
                s.appointments += 1;
            } else {
                s.walk_ins += 1;
            }
            match p.outcome() {
                Outcome::Pending            => s.pending += 1,
                Outcome::Balked             => s.balked += 1,
                Outcome::RenegedCheckIn     => s.reneged_checkin += 1,
                Outcome::RenegedVaccination => s.reneged_vaccination += 1,
                Outcome::Vaccinated         => s.vaccinated += 1,
            }
        }
        s
    }

    pub fn total(&self) -> usize {
        self.walk_ins + self.appointments
    }

    pub fn reneged(&self) -> usize {
        self.reneged_checkin + self.reneged_vaccination
    }

    /// Share of finished patients who left unvaccinated.  `0.0` when nobody
    /// finished.
    pub fn abandonment_rate(&self) -> f64 {
        let finished = self.total() - self.pending;
        if finished == 0 {
            return 0.0;
        }
        (self.balked + self.reneged()) as f64 / finished as f64
    }
}

/// Everything a run produced.
pub struct RunResult {
    pub receptionists:    u32,
    pub nurses:           u32,
    pub seed:             Option<u64>,
    pub final_time:       SimTime,
    pub events_processed: u64,
    /// Scheduler events still queued at the horizon.
    pub events_abandoned: usize,
    pub peak_receptionists_in_use: u32,
    pub peak_nurses_in_use:        u32,
    /// One record per patient, in arrival order.
    pub patients:         PatientTable,
    pub metrics:          Metrics,
    pub summary:          Summary,
}

impl RunResult {
    pub fn patient(&self, id: &PatientId) -> Option<&Patient> {
        self.patients.lookup(id)
    }
}
