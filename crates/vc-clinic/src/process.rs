//! The patient lifecycle, written as an event handler.
//!
//! Every suspension point of a patient (waiting for a receptionist or a
//! nurse, consuming a service duration) and of the two arrival generators
//! is a [`ClinicEvent`].  Handling an event runs one uninterrupted step and
//! schedules whatever resumes the process next.
//!
//! Renege checks are eager-on-grant: a patient whose deadline expires while
//! queued is only noticed once a unit is granted to it.  The unit is then
//! handed straight back without serving the patient.

use std::collections::VecDeque;

use rand_distr::Normal;
use tracing::debug;
use vc_core::{ClinicConfig, PatientId, PatientKey, SimRng, SimTime, minutes_to_secs};
use vc_des::{Admission, EventHandler, Grant, ResourcePool, Scheduler};

use crate::arrivals::normal;
use crate::{
    APPOINTMENT_PRIORITY, Action, ArrivalModel, ClinicError, ClinicResult, Metrics, NURSE_POOL,
    PatientKind, PatientState, PatientTable, QueueName, RECEPTIONIST_POOL, WALK_IN_PRIORITY,
};

// ── Service times ─────────────────────────────────────────────────────────────

/// Half-normal check-in and vaccination durations.
pub struct ServiceTimes {
    checkin: Normal<f64>,
    vaccine: Normal<f64>,
}

impl ServiceTimes {
    pub fn from_config(config: &ClinicConfig) -> ClinicResult<Self> {
        Ok(Self {
            checkin: normal(config.mean_checkin_minutes, config.checkin_sd_minutes)?,
            vaccine: normal(config.mean_vaccine_minutes, config.vaccine_sd_minutes)?,
        })
    }

    pub fn checkin_secs(&self, rng: &mut SimRng) -> f64 {
        minutes_to_secs(rng.half_normal(&self.checkin))
    }

    pub fn vaccine_secs(&self, rng: &mut SimRng) -> f64 {
        minutes_to_secs(rng.half_normal(&self.vaccine))
    }
}

// ── Events ────────────────────────────────────────────────────────────────────

/// Continuations of the clinic's processes.
#[derive(Debug)]
pub(crate) enum ClinicEvent {
    /// The walk-in generator's delay elapsed: one walk-in arrives.
    WalkInArrival,
    /// The appointment generator fired.
    AppointmentArrival,
    /// A receptionist was handed to `patient`.
    CheckInGranted { patient: PatientKey, grant: Grant },
    /// `patient`'s check-in service time elapsed.
    CheckInDone { patient: PatientKey, grant: Grant },
    /// A nurse was handed to `patient`.
    VaccinationGranted { patient: PatientKey, grant: Grant },
    /// `patient`'s vaccination service time elapsed.
    VaccinationDone { patient: PatientKey, grant: Grant },
}

type Sched = Scheduler<ClinicEvent>;

// ── Clinic state ──────────────────────────────────────────────────────────────

/// Everything a handler step may mutate.  Owned by [`Clinic`][crate::Clinic]
/// next to the scheduler so the two can be borrowed separately.
pub(crate) struct ClinicState {
    pub config:            ClinicConfig,
    pub rng:               SimRng,
    pub arrivals:          ArrivalModel,
    pub service:           ServiceTimes,
    pub receptionists:     ResourcePool<PatientKey>,
    pub nurses:            ResourcePool<PatientKey>,
    pub checkin_queue:     VecDeque<PatientKey>,
    pub vaccination_queue: VecDeque<PatientKey>,
    pub patients:          PatientTable,
    pub metrics:           Metrics,
    walk_ins:              u32,
    appointments:          u32,
}

impl ClinicState {
    pub fn new(config: ClinicConfig) -> ClinicResult<Self> {
        config.validate()?;
        Ok(Self {
            rng:               SimRng::from_seed_opt(config.seed),
            arrivals:          ArrivalModel::from_config(&config)?,
            service:           ServiceTimes::from_config(&config)?,
            receptionists:     ResourcePool::new(RECEPTIONIST_POOL, config.receptionists)?,
            nurses:            ResourcePool::new(NURSE_POOL, config.nurses)?,
            checkin_queue:     VecDeque::new(),
            vaccination_queue: VecDeque::new(),
            patients:          PatientTable::new(),
            metrics:           Metrics::new(),
            walk_ins:          0,
            appointments:      0,
            config,
        })
    }

    fn horizon(&self) -> SimTime {
        SimTime(self.config.horizon_secs)
    }

    /// Start both generators.  The walk-in generator draws its first gap
    /// immediately; the appointment generator first fires one period in.
    pub fn start_generators(&mut self, sched: &mut Sched) -> ClinicResult<()> {
        self.schedule_next_walk_in(sched)?;
        if let Some(period) = self.config.appointment_interval_secs {
            if sched.now() + period < self.horizon() {
                sched.schedule_after(period, ClinicEvent::AppointmentArrival)?;
            }
        }
        Ok(())
    }

    fn schedule_next_walk_in(&mut self, sched: &mut Sched) -> ClinicResult<()> {
        let gap = self.arrivals.next_gap_secs(&self.config, sched.now(), &mut self.rng);
        if sched.now() + gap < self.horizon() {
            sched.schedule_after(gap, ClinicEvent::WalkInArrival)?;
        }
        Ok(())
    }

    // ── Bookkeeping helpers ───────────────────────────────────────────────

    fn log(&mut self, patient: PatientKey, action: Action, now: SimTime) -> ClinicResult<()> {
        let id = self.patients.get(patient)?.id;
        debug!(patient = %id, action = action.label(), time = now.secs(), "patient event");
        self.metrics.record_event(id, action, now);
        Ok(())
    }

    fn advance(&mut self, patient: PatientKey, next: PatientState, now: SimTime) -> ClinicResult<()> {
        self.patients.get_mut(patient)?.advance(next, now)
    }

    fn queue_mut(&mut self, queue: QueueName) -> &mut VecDeque<PatientKey> {
        match queue {
            QueueName::CheckIn     => &mut self.checkin_queue,
            QueueName::Vaccination => &mut self.vaccination_queue,
        }
    }

    fn sample_queue(&mut self, queue: QueueName, now: SimTime) {
        let length = self.queue_mut(queue).len();
        self.metrics.record_queue_length(queue, now, length);
    }

    fn enqueue(&mut self, queue: QueueName, patient: PatientKey, front: bool, now: SimTime) {
        let q = self.queue_mut(queue);
        if front {
            q.push_front(patient);
        } else {
            q.push_back(patient);
        }
        self.sample_queue(queue, now);
    }

    fn dequeue(&mut self, queue: QueueName, patient: PatientKey, now: SimTime) -> ClinicResult<()> {
        let q = self.queue_mut(queue);
        match q.iter().position(|&k| k == patient) {
            Some(pos) => {
                q.remove(pos);
            }
            None => {
                let id = self.patients.get(patient)?.id;
                return Err(ClinicError::NotQueued { patient: id, queue });
            }
        }
        self.sample_queue(queue, now);
        Ok(())
    }

    // ── Resource plumbing ─────────────────────────────────────────────────

    fn request_receptionist(&mut self, sched: &mut Sched, patient: PatientKey, priority: i32) -> ClinicResult<()> {
        let now = sched.now();
        let out = self.receptionists.request(priority, patient, now);
        self.metrics.record_idle_sample(RECEPTIONIST_POOL, now, out.idle_secs);
        if let Admission::Granted { requester, grant } = out.admission {
            sched.schedule_after(0.0, ClinicEvent::CheckInGranted { patient: requester, grant })?;
        }
        Ok(())
    }

    fn request_nurse(&mut self, sched: &mut Sched, patient: PatientKey) -> ClinicResult<()> {
        let now = sched.now();
        let out = self.nurses.request(WALK_IN_PRIORITY, patient, now);
        self.metrics.record_idle_sample(NURSE_POOL, now, out.idle_secs);
        if let Admission::Granted { requester, grant } = out.admission {
            sched.schedule_after(0.0, ClinicEvent::VaccinationGranted { patient: requester, grant })?;
        }
        Ok(())
    }

    fn release_receptionist(&mut self, sched: &mut Sched, grant: Grant) -> ClinicResult<()> {
        if let Some((next, grant, _)) = self.receptionists.release(grant)? {
            sched.schedule_after(0.0, ClinicEvent::CheckInGranted { patient: next, grant })?;
        }
        Ok(())
    }

    fn release_nurse(&mut self, sched: &mut Sched, grant: Grant) -> ClinicResult<()> {
        if let Some((next, grant, _)) = self.nurses.release(grant)? {
            sched.schedule_after(0.0, ClinicEvent::VaccinationGranted { patient: next, grant })?;
        }
        Ok(())
    }

    // ── Generators ────────────────────────────────────────────────────────

    fn on_walk_in(&mut self, sched: &mut Sched) -> ClinicResult<()> {
        let now = sched.now();
        let kind = self.arrivals.draw_kind(&mut self.rng);
        self.walk_ins += 1;
        let id = PatientId::WalkIn(self.walk_ins);
        let key = self.patients.admit(id, kind, kind.profile(&self.config), &self.config, now)?;
        self.log(key, Action::Arrived, now)?;

        let threshold = self.patients.get(key)?.balk_threshold;
        if self.checkin_queue.len() >= threshold {
            self.advance(key, PatientState::Balked, now)?;
            self.log(key, Action::Balked, now)?;
        } else {
            self.advance(key, PatientState::InCheckInQueue, now)?;
            self.enqueue(QueueName::CheckIn, key, false, now);
            self.log(key, Action::JoinedCheckInQueue, now)?;
            self.request_receptionist(sched, key, WALK_IN_PRIORITY)?;
        }

        self.schedule_next_walk_in(sched)
    }

    fn on_appointment(&mut self, sched: &mut Sched) -> ClinicResult<()> {
        let now = sched.now();
        let kind = PatientKind::Scheduled;
        self.appointments += 1;
        let id = PatientId::Appointment(self.appointments);
        let key = self.patients.admit(id, kind, kind.profile(&self.config), &self.config, now)?;
        self.log(key, Action::Arrived, now)?;

        // Appointment holders never balk and go to the front of the line.
        self.advance(key, PatientState::InCheckInQueue, now)?;
        self.enqueue(QueueName::CheckIn, key, true, now);
        self.log(key, Action::JoinedCheckInQueue, now)?;
        self.request_receptionist(sched, key, APPOINTMENT_PRIORITY)?;

        if let Some(period) = self.config.appointment_interval_secs {
            if now + period < self.horizon() {
                sched.schedule_after(period, ClinicEvent::AppointmentArrival)?;
            }
        }
        Ok(())
    }

    // ── Patient lifecycle ─────────────────────────────────────────────────

    fn on_checkin_granted(&mut self, sched: &mut Sched, patient: PatientKey, grant: Grant) -> ClinicResult<()> {
        let now = sched.now();
        // Drawn before the renege check so the random stream does not depend
        // on the outcome.
        let duration = self.service.checkin_secs(&mut self.rng);

        if self.patients.get(patient)?.past_deadline(now) {
            self.dequeue(QueueName::CheckIn, patient, now)?;
            self.advance(patient, PatientState::RenegedCheckIn, now)?;
            self.log(patient, Action::RenegedCheckIn, now)?;
            return self.release_receptionist(sched, grant);
        }

        self.log(patient, Action::CheckInStarted, now)?;
        sched.schedule_after(duration, ClinicEvent::CheckInDone { patient, grant })?;
        Ok(())
    }

    fn on_checkin_done(&mut self, sched: &mut Sched, patient: PatientKey, grant: Grant) -> ClinicResult<()> {
        let now = sched.now();
        self.dequeue(QueueName::CheckIn, patient, now)?;
        self.enqueue(QueueName::Vaccination, patient, false, now);
        self.advance(patient, PatientState::InVaccinationQueue, now)?;
        self.log(patient, Action::JoinedVaccinationQueue, now)?;
        self.request_nurse(sched, patient)?;
        self.release_receptionist(sched, grant)
    }

    fn on_vaccination_granted(&mut self, sched: &mut Sched, patient: PatientKey, grant: Grant) -> ClinicResult<()> {
        let now = sched.now();
        let duration = self.service.vaccine_secs(&mut self.rng);

        if self.patients.get(patient)?.past_deadline(now) {
            self.dequeue(QueueName::Vaccination, patient, now)?;
            self.advance(patient, PatientState::RenegedVaccination, now)?;
            self.log(patient, Action::RenegedVaccination, now)?;
            return self.release_nurse(sched, grant);
        }

        self.log(patient, Action::VaccinationStarted, now)?;
        sched.schedule_after(duration, ClinicEvent::VaccinationDone { patient, grant })?;
        Ok(())
    }

    fn on_vaccination_done(&mut self, sched: &mut Sched, patient: PatientKey, grant: Grant) -> ClinicResult<()> {
        let now = sched.now();
        self.dequeue(QueueName::Vaccination, patient, now)?;
        self.advance(patient, PatientState::Vaccinated, now)?;
        self.log(patient, Action::Vaccinated, now)?;
        self.release_nurse(sched, grant)
    }
}

impl EventHandler<ClinicEvent> for ClinicState {
    type Error = ClinicError;

    fn handle(&mut self, sched: &mut Sched, event: ClinicEvent) -> ClinicResult<()> {
        match event {
            ClinicEvent::WalkInArrival      => self.on_walk_in(sched),
            ClinicEvent::AppointmentArrival => self.on_appointment(sched),
            ClinicEvent::CheckInGranted { patient, grant } => {
                self.on_checkin_granted(sched, patient, grant)
            }
            ClinicEvent::CheckInDone { patient, grant } => {
                self.on_checkin_done(sched, patient, grant)
            }
            ClinicEvent::VaccinationGranted { patient, grant } => {
                self.on_vaccination_granted(sched, patient, grant)
            }
            ClinicEvent::VaccinationDone { patient, grant } => {
                self.on_vaccination_done(sched, patient, grant)
            }
        }
    }
}
