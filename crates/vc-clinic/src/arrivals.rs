//! Walk-in arrival sampling.
//!
//! Inter-arrival gaps are half-normal: the absolute value of a normal draw
//! whose mean and sd depend on the flow band in force when the gap is drawn.
//! Parameters are configured in minutes and returned in seconds.

use rand_distr::Normal;
use vc_core::{ClinicConfig, FlowLevel, SimRng, SimTime, minutes_to_secs};

use crate::{ClinicError, ClinicResult, PatientKind};

pub struct ArrivalModel {
    high:            Normal<f64>,
    low:             Normal<f64>,
    rushed_fraction: f64,
}

impl ArrivalModel {
    pub fn from_config(config: &ClinicConfig) -> ClinicResult<Self> {
        Ok(Self {
            high:            normal(config.high_flow_mean_minutes, config.high_flow_sd_minutes)?,
            low:             normal(config.low_flow_mean_minutes, config.low_flow_sd_minutes)?,
            rushed_fraction: config.rushed_fraction,
        })
    }

    /// Seconds until the next walk-in, drawn for the band in force at `now`.
    pub fn next_gap_secs(&self, config: &ClinicConfig, now: SimTime, rng: &mut SimRng) -> f64 {
        let dist = match config.flow_level_at(now.secs()) {
            FlowLevel::High => &self.high,
            FlowLevel::Low  => &self.low,
        };
        minutes_to_secs(rng.half_normal(dist))
    }

    /// Bernoulli draw of a walk-in's type.
    pub fn draw_kind(&self, rng: &mut SimRng) -> PatientKind {
        if rng.gen_bool(self.rushed_fraction) {
            PatientKind::Rushed
        } else {
            PatientKind::Relaxed
        }
    }
}

/// Build a normal distribution, mapping parameter errors into the crate error.
pub(crate) fn normal(mean: f64, sd: f64) -> ClinicResult<Normal<f64>> {
    Normal::new(mean, sd)
        .map_err(|e| ClinicError::Distribution(format!("normal({mean}, {sd}): {e}")))
}
