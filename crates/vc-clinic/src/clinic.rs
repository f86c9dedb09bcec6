//! The `Clinic` runner and the [`run`] entry point.

use tracing::info;
use vc_core::{ClinicConfig, SimTime};
use vc_des::{RunLimit, RunStats, Scheduler};

use crate::process::{ClinicEvent, ClinicState};
use crate::{ClinicResult, RunResult, Summary};

/// One clinic instance: the scheduler plus the state its events mutate.
///
/// A clinic runs once.  Build a new one (with a new config) per scenario.
pub struct Clinic {
    scheduler: Scheduler<ClinicEvent>,
    state:     ClinicState,
    stats:     Option<RunStats>,
}

impl Clinic {
    /// Validate `config`, build both resource pools and arm the arrival
    /// generators.  Configuration problems are reported here, before any
    /// simulated time passes.
    pub fn new(config: ClinicConfig) -> ClinicResult<Self> {
        let mut scheduler = Scheduler::new();
        let mut state = ClinicState::new(config)?;
        state.start_generators(&mut scheduler)?;
        Ok(Self { scheduler, state, stats: None })
    }

    pub fn config(&self) -> &ClinicConfig {
        &self.state.config
    }

    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    /// Run to the configured horizon.  Patients still inside the clinic at
    /// that instant are left as they are (outcome `Pending`).
    ///
    /// Calling `run` a second time is a no-op.
    pub fn run(&mut self) -> ClinicResult<RunStats> {
        if let Some(stats) = self.stats {
            return Ok(stats);
        }
        let cfg = &self.state.config;
        info!(
            receptionists = cfg.receptionists,
            nurses = cfg.nurses,
            horizon_secs = cfg.horizon_secs,
            seed = ?cfg.seed,
            "clinic run starting"
        );

        let limit = RunLimit::Until(SimTime(cfg.horizon_secs));
        let stats = self.scheduler.run(limit, &mut self.state)?;
        self.stats = Some(stats);

        let summary = Summary::from_patients(self.state.patients.iter());
        info!(
            clock = %self.scheduler.clock(),
            events = stats.processed,
            abandoned_events = stats.pending,
            walk_ins = summary.walk_ins,
            appointments = summary.appointments,
            balked = summary.balked,
            reneged_checkin = summary.reneged_checkin,
            reneged_vaccination = summary.reneged_vaccination,
            vaccinated = summary.vaccinated,
            pending = summary.pending,
            "clinic run finished"
        );
        Ok(stats)
    }

    /// Consume the clinic and package everything collaborators read.
    /// Runs first if [`run`][Self::run] has not been called.
    pub fn into_result(mut self) -> ClinicResult<RunResult> {
        let stats = self.run()?;
        let state = self.state;
        Ok(RunResult {
            summary:          Summary::from_patients(state.patients.iter()),
            receptionists:    state.config.receptionists,
            nurses:           state.config.nurses,
            seed:             state.config.seed,
            final_time:       stats.final_time,
            events_processed: stats.processed,
            events_abandoned: stats.pending,
            peak_receptionists_in_use: state.receptionists.peak_in_use(),
            peak_nurses_in_use:        state.nurses.peak_in_use(),
            patients:         state.patients,
            metrics:          state.metrics,
        })
    }
}

/// Build a clinic from `config`, run it to the horizon, and return the
/// collected output.  This is the entry point scenario sweeps call; it never
/// loops over staffing levels itself.
pub fn run(config: &ClinicConfig) -> ClinicResult<RunResult> {
    Clinic::new(config.clone())?.into_result()
}
