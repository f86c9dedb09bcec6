//! Unit tests for vc-core primitives.

#[cfg(test)]
mod ids {
    use crate::{PatientId, PatientKey};

    #[test]
    fn index_roundtrip() {
        let key = PatientKey(42);
        assert_eq!(key.index(), 42);
        assert_eq!(PatientKey::try_from(42usize).unwrap(), key);
    }

    #[test]
    fn display() {
        assert_eq!(PatientKey(7).to_string(), "PatientKey(7)");
        assert_eq!(PatientId::WalkIn(12).to_string(), "12");
        assert_eq!(PatientId::Appointment(3).to_string(), "appt-3");
    }

    #[test]
    fn walk_in_and_appointment_never_equal() {
        assert_ne!(PatientId::WalkIn(1), PatientId::Appointment(1));
        assert!(PatientId::Appointment(1).is_appointment());
        assert!(!PatientId::WalkIn(1).is_appointment());
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimTime, minutes_to_secs};

    #[test]
    fn ordering_is_total() {
        assert!(SimTime(1.0) < SimTime(2.0));
        assert_eq!(SimTime(3.5), SimTime(3.5));
        assert_eq!(SimTime(2.0).max(SimTime(1.0)), SimTime(2.0));
    }

    #[test]
    fn arithmetic() {
        assert_eq!(SimTime(10.0) + 5.0, SimTime(15.0));
        assert_eq!(SimTime(10.0) - SimTime(4.0), 6.0);
        assert_eq!(SimTime(10.0).since(SimTime(4.0)), 6.0);
        assert_eq!(minutes_to_secs(2.5), 150.0);
    }

    #[test]
    fn clock_refuses_to_go_backwards() {
        let mut clock = SimClock::new();
        assert!(clock.advance_to(SimTime(30.0)));
        assert!(!clock.advance_to(SimTime(10.0)));
        assert_eq!(clock.now(), SimTime(30.0));
        assert!(clock.advance_to(SimTime(30.0)), "equal time is allowed");
    }

    #[test]
    fn clock_display() {
        let mut clock = SimClock::new();
        clock.advance_to(SimTime(3_725.0));
        assert_eq!(clock.elapsed_hms(), (1, 2, 5));
        assert_eq!(clock.to_string(), "t=3725.0s (01:02:05)");
    }
}

#[cfg(test)]
mod rng {
    use rand_distr::Normal;

    use crate::SimRng;

    #[test]
    fn same_seed_same_stream() {
        let dist = Normal::new(1.0, 0.5).unwrap();
        let mut a = SimRng::new(9);
        let mut b = SimRng::new(9);
        for _ in 0..100 {
            assert_eq!(a.half_normal(&dist), b.half_normal(&dist));
        }
    }

    #[test]
    fn half_normal_never_negative() {
        // Mean 0 puts half the raw mass below zero.
        let dist = Normal::new(0.0, 1.0).unwrap();
        let mut rng = SimRng::new(1);
        assert!((0..10_000).all(|_| rng.half_normal(&dist) >= 0.0));
    }

    #[test]
    fn gen_bool_clamps() {
        let mut rng = SimRng::new(3);
        assert!(rng.gen_bool(1.5));
        assert!(!rng.gen_bool(-0.5));
    }

    #[test]
    fn replication_seeds_differ() {
        let s0 = SimRng::replication_seed(1111, 0);
        let s1 = SimRng::replication_seed(1111, 1);
        assert_eq!(s0, 1111);
        assert_ne!(s0, s1);
    }
}

#[cfg(test)]
mod config {
    use crate::{ClinicConfig, FlowBand, FlowLevel, PatientProfile, RenegeRule};

    #[test]
    fn default_is_valid() {
        ClinicConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_capacity_rejected() {
        let cfg = ClinicConfig { receptionists: 0, ..ClinicConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = ClinicConfig { nurses: 0, ..ClinicConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn bad_fraction_rejected() {
        let cfg = ClinicConfig { rushed_fraction: 1.2, ..ClinicConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn non_positive_horizon_rejected() {
        let cfg = ClinicConfig { horizon_secs: 0.0, ..ClinicConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn negative_rates_rejected() {
        let cfg = ClinicConfig { high_flow_mean_minutes: -1.0, ..ClinicConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = ClinicConfig { appointment_interval_secs: Some(0.0), ..ClinicConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn non_monotonic_bands_rejected() {
        let cfg = ClinicConfig {
            flow_bands: vec![
                FlowBand::new(0.0, FlowLevel::High),
                FlowBand::new(100.0, FlowLevel::Low),
                FlowBand::new(100.0, FlowLevel::High),
            ],
            ..ClinicConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn bands_must_start_at_zero() {
        let cfg = ClinicConfig {
            flow_bands: vec![FlowBand::new(10.0, FlowLevel::High)],
            ..ClinicConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn flow_level_lookup() {
        let cfg = ClinicConfig::default();
        assert_eq!(cfg.flow_level_at(0.0), FlowLevel::High);
        assert_eq!(cfg.flow_level_at(3_599.9), FlowLevel::High);
        assert_eq!(cfg.flow_level_at(3_600.0), FlowLevel::Low);
        assert_eq!(cfg.flow_level_at(4.0 * 3_600.0), FlowLevel::High);
        assert_eq!(cfg.flow_level_at(100.0 * 3_600.0), FlowLevel::Low);
    }

    #[test]
    fn renege_deadlines_follow_service_means() {
        let cfg = ClinicConfig::default(); // 1 + 3 minutes
        assert_eq!(PatientProfile::RUSHED.renege_deadline_secs(&cfg), 5.0 * 4.0 * 60.0);
        assert_eq!(PatientProfile::RELAXED.renege_deadline_secs(&cfg), 15.0 * 4.0 * 60.0);
        assert_eq!(PatientProfile::SCHEDULED.renege_deadline_secs(&cfg), 1_800.0);
    }

    #[test]
    fn infinite_tolerance_is_valid() {
        let cfg = ClinicConfig {
            relaxed: PatientProfile {
                balk_threshold: usize::MAX,
                renege:         RenegeRule::FixedSecs(f64::INFINITY),
            },
            ..ClinicConfig::default()
        };
        cfg.validate().unwrap();
    }

    #[test]
    fn with_staffing_keeps_other_fields() {
        let base = ClinicConfig::default();
        let cfg = base.with_staffing(3, 4);
        assert_eq!((cfg.receptionists, cfg.nurses), (3, 4));
        assert_eq!(cfg.seed, base.seed);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_config {
    use crate::ClinicConfig;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: ClinicConfig =
            serde_json::from_str(r#"{ "receptionists": 3, "seed": 7 }"#).unwrap();
        assert_eq!(cfg.receptionists, 3);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.nurses, ClinicConfig::default().nurses);
        cfg.validate().unwrap();
    }
}
