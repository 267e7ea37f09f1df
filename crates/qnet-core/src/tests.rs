//! Unit tests for qnet-core primitives.

#[cfg(test)]
mod ids {
    use crate::{LinkId, PersonId, VehicleId};

    #[test]
    fn index_roundtrip() {
        let id = PersonId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(PersonId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(PersonId(0) < PersonId(1));
        assert!(LinkId(100) > LinkId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(PersonId::INVALID.0, u32::MAX);
        assert_eq!(LinkId::INVALID.0, u32::MAX);
    }

    #[test]
    fn default_vehicle_mirrors_person() {
        assert_eq!(VehicleId::for_person(PersonId(9)), VehicleId(9));
    }

    #[test]
    fn display() {
        assert_eq!(PersonId(7).to_string(), "PersonId(7)");
    }
}

#[cfg(test)]
mod time {
    use crate::time::{Time, hms};

    #[test]
    fn hms_constructor() {
        assert_eq!(hms(7, 30, 0), Time(27_000));
        assert_eq!(hms(0, 0, 1), Time(1));
    }

    #[test]
    fn arithmetic() {
        let t = hms(8, 0, 0);
        assert_eq!(t.offset(60), hms(8, 1, 0));
        assert_eq!(t.offset(60) - t, 60);
        assert_eq!(t.offset(60).since(t), 60);
    }

    #[test]
    fn never_saturates() {
        assert_eq!(Time::NEVER.offset(1), Time::NEVER);
    }

    #[test]
    fn display() {
        assert_eq!(hms(6, 5, 4).to_string(), "06:05:04");
        assert_eq!(Time::NEVER.to_string(), "--:--:--");
    }
}

#[cfg(test)]
mod coord {
    use crate::Coord;

    #[test]
    fn euclidean_distance() {
        let a = Coord::new(0.0, 0.0);
        let b = Coord::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
    }

    #[test]
    fn midpoint() {
        let m = Coord::new(0.0, 0.0).midpoint(Coord::new(10.0, 4.0));
        assert_eq!(m, Coord::new(5.0, 2.0));
    }
}

#[cfg(test)]
mod config {
    use crate::{SimConfig, Time};

    #[test]
    fn default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_time_window() {
        let cfg = SimConfig {
            start_time: Time(100),
            end_time:   Time(50),
            ..SimConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_factors() {
        let cfg = SimConfig { flow_capacity_factor: 0.0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = SimConfig { storage_capacity_factor: 0.0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn flow_per_second_scales_by_factor_and_period() {
        let cfg = SimConfig {
            flow_capacity_factor: 0.5,
            capacity_period_secs: 3_600,
            ..SimConfig::default()
        };
        // 1800 veh/h at factor 0.5 → 0.25 veh/s.
        assert!((cfg.flow_per_second(1_800.0) - 0.25).abs() < 1e-12);
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        for _ in 0..16 {
            assert_eq!(a.random::<u64>(), b.random::<u64>());
        }
    }

    #[test]
    fn children_are_reproducible_and_independent() {
        let mut root1 = SimRng::new(7);
        let mut root2 = SimRng::new(7);
        let mut c1 = root1.child(1);
        let mut c2 = root2.child(1);
        assert_eq!(c1.random::<u64>(), c2.random::<u64>());

        let mut other = SimRng::new(7).child(2);
        // Different offsets should (overwhelmingly) diverge.
        let mut same = SimRng::new(7).child(1);
        assert_ne!(other.random::<u64>(), same.random::<u64>());
    }
}
