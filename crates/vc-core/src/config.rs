//! Run configuration.
//!
//! A [`ClinicConfig`] is an immutable value handed to the run entry point.
//! Every tunable of the model lives here; nothing is read from globals.
//!
//! # Defaults
//!
//! `ClinicConfig::default()` is the reference scenario: two receptionists,
//! one nurse, a quarter of walk-ins rushed, 1-minute check-ins, 3-minute
//! vaccinations and a two-hour horizon, seeded for reproducibility.

use crate::time::minutes_to_secs;
use crate::{VcError, VcResult};

// ── Arrival flow bands ────────────────────────────────────────────────────────

/// Walk-in intensity for one time-of-day band.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlowLevel {
    High,
    Low,
}

/// A band of the walk-in schedule, active from `start_secs` until the next
/// band starts (the last band runs to the end of the day).
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowBand {
    pub start_secs: f64,
    pub level:      FlowLevel,
}

impl FlowBand {
    pub const fn new(start_secs: f64, level: FlowLevel) -> Self {
        Self { start_secs, level }
    }
}

/// Six bands alternating rush and lull: opening rush, late morning, lunch,
/// afternoon, after-work, evening.
pub fn default_flow_bands() -> Vec<FlowBand> {
    const HOUR: f64 = 3_600.0;
    vec![
        FlowBand::new(0.0,        FlowLevel::High),
        FlowBand::new(1.0 * HOUR, FlowLevel::Low),
        FlowBand::new(3.0 * HOUR, FlowLevel::High),
        FlowBand::new(5.0 * HOUR, FlowLevel::Low),
        FlowBand::new(7.0 * HOUR, FlowLevel::High),
        FlowBand::new(9.0 * HOUR, FlowLevel::Low),
    ]
}

// ── Patient profiles ──────────────────────────────────────────────────────────

/// How long a patient tolerates waiting, measured from check-in queue entry.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenegeRule {
    /// `factor × (mean check-in + mean vaccine)` minutes.
    ServiceMultiple(f64),
    /// A fixed number of seconds.
    FixedSecs(f64),
}

/// Balking and reneging tolerances for one patient type.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatientProfile {
    /// Longest check-in queue the patient will join.  A queue of this length
    /// or longer makes the patient balk.
    pub balk_threshold: usize,
    pub renege:         RenegeRule,
}

impl PatientProfile {
    pub const RUSHED: PatientProfile = PatientProfile {
        balk_threshold: 5,
        renege:         RenegeRule::ServiceMultiple(5.0),
    };

    pub const RELAXED: PatientProfile = PatientProfile {
        balk_threshold: 15,
        renege:         RenegeRule::ServiceMultiple(15.0),
    };

    /// Appointment holders never balk; the threshold is recorded but unused.
    pub const SCHEDULED: PatientProfile = PatientProfile {
        balk_threshold: 20,
        renege:         RenegeRule::FixedSecs(1_800.0),
    };

    /// Resolve the renege deadline in seconds for the given config.
    pub fn renege_deadline_secs(&self, config: &ClinicConfig) -> f64 {
        match self.renege {
            RenegeRule::ServiceMultiple(k) => {
                k * minutes_to_secs(config.mean_checkin_minutes + config.mean_vaccine_minutes)
            }
            RenegeRule::FixedSecs(s) => s,
        }
    }
}

// ── ClinicConfig ──────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Typically built in code or loaded from JSON by the sweep driver (feature
/// `serde`) and passed by reference to the run entry point.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClinicConfig {
    /// Receptionist pool capacity.  Must be ≥ 1.
    pub receptionists: u32,

    /// Nurse pool capacity.  Must be ≥ 1.
    pub nurses: u32,

    /// Probability that a walk-in is rushed rather than relaxed, in [0, 1].
    pub rushed_fraction: f64,

    pub mean_checkin_minutes: f64,
    pub checkin_sd_minutes:   f64,
    pub mean_vaccine_minutes: f64,
    pub vaccine_sd_minutes:   f64,

    /// Period between appointment arrivals.  `None` disables appointments.
    pub appointment_interval_secs: Option<f64>,

    /// Mean / sd of the walk-in inter-arrival gap during high-flow bands.
    pub high_flow_mean_minutes: f64,
    pub high_flow_sd_minutes:   f64,

    /// Mean / sd of the walk-in inter-arrival gap during low-flow bands.
    pub low_flow_mean_minutes: f64,
    pub low_flow_sd_minutes:   f64,

    /// Time-of-day schedule of flow levels.  Must start at 0 and be strictly
    /// increasing.
    pub flow_bands: Vec<FlowBand>,

    pub rushed:    PatientProfile,
    pub relaxed:   PatientProfile,
    pub scheduled: PatientProfile,

    /// Simulated seconds to run.  Arrivals stop and in-flight patients are
    /// abandoned at this instant.
    pub horizon_secs: f64,

    /// Master RNG seed.  `None` seeds from OS entropy (not reproducible).
    pub seed: Option<u64>,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            receptionists:             2,
            nurses:                    1,
            rushed_fraction:           0.25,
            mean_checkin_minutes:      1.0,
            checkin_sd_minutes:        0.5,
            mean_vaccine_minutes:      3.0,
            vaccine_sd_minutes:        1.0,
            appointment_interval_secs: Some(600.0),
            high_flow_mean_minutes:    0.5,
            high_flow_sd_minutes:      0.25,
            low_flow_mean_minutes:     2.0,
            low_flow_sd_minutes:       1.0,
            flow_bands:                default_flow_bands(),
            rushed:                    PatientProfile::RUSHED,
            relaxed:                   PatientProfile::RELAXED,
            scheduled:                 PatientProfile::SCHEDULED,
            horizon_secs:              2.0 * 3_600.0,
            seed:                      Some(1111),
        }
    }
}

impl ClinicConfig {
    /// Copy of `self` with different staffing.  Used by scenario sweeps.
    pub fn with_staffing(&self, receptionists: u32, nurses: u32) -> Self {
        Self { receptionists, nurses, ..self.clone() }
    }

    /// Check every field before a run starts.  The first problem found is
    /// reported; nothing is clamped silently.
    pub fn validate(&self) -> VcResult<()> {
        if self.receptionists == 0 {
            return Err(VcError::Config("receptionist capacity must be at least 1".into()));
        }
        if self.nurses == 0 {
            return Err(VcError::Config("nurse capacity must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.rushed_fraction) {
            return Err(VcError::Config(format!(
                "rushed_fraction {} is outside [0, 1]",
                self.rushed_fraction
            )));
        }

        positive("mean_checkin_minutes", self.mean_checkin_minutes)?;
        positive("mean_vaccine_minutes", self.mean_vaccine_minutes)?;
        positive("high_flow_mean_minutes", self.high_flow_mean_minutes)?;
        positive("low_flow_mean_minutes", self.low_flow_mean_minutes)?;
        positive("horizon_secs", self.horizon_secs)?;
        non_negative("checkin_sd_minutes", self.checkin_sd_minutes)?;
        non_negative("vaccine_sd_minutes", self.vaccine_sd_minutes)?;
        non_negative("high_flow_sd_minutes", self.high_flow_sd_minutes)?;
        non_negative("low_flow_sd_minutes", self.low_flow_sd_minutes)?;

        if let Some(period) = self.appointment_interval_secs {
            positive("appointment_interval_secs", period)?;
        }

        for (name, profile) in [
            ("rushed", &self.rushed),
            ("relaxed", &self.relaxed),
            ("scheduled", &self.scheduled),
        ] {
            let deadline = profile.renege_deadline_secs(self);
            if deadline.is_nan() || deadline < 0.0 {
                return Err(VcError::Config(format!(
                    "{name} renege deadline {deadline} must be non-negative"
                )));
            }
        }

        self.validate_bands()
    }

    fn validate_bands(&self) -> VcResult<()> {
        let Some(first) = self.flow_bands.first() else {
            return Err(VcError::Config("flow_bands must not be empty".into()));
        };
        if first.start_secs != 0.0 {
            return Err(VcError::Config(format!(
                "first flow band must start at 0, got {}",
                first.start_secs
            )));
        }
        for pair in self.flow_bands.windows(2) {
            if !pair[0].start_secs.is_finite() || pair[1].start_secs <= pair[0].start_secs {
                return Err(VcError::Config(format!(
                    "flow band boundaries must be strictly increasing ({} then {})",
                    pair[0].start_secs, pair[1].start_secs
                )));
            }
        }
        Ok(())
    }

    /// The flow level in force at `secs` since opening.
    pub fn flow_level_at(&self, secs: f64) -> FlowLevel {
        self.flow_bands
            .iter()
            .take_while(|b| b.start_secs <= secs)
            .last()
            .map_or(FlowLevel::High, |b| b.level)
    }
}

fn positive(name: &str, v: f64) -> VcResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(VcError::Config(format!("{name} must be positive and finite, got {v}")))
    }
}

fn non_negative(name: &str, v: f64) -> VcResult<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(VcError::Config(format!("{name} must be non-negative and finite, got {v}")))
    }
}
