//! Property-based tests for the pendulum timing model

use std::f64::consts::{PI, TAU};

use pendulum_wave::Config;
use pendulum_wave::sim::{
    PendulumArc, Snapshot, display_angle, fold_angle, next_impact, velocity_for_arc,
};
use proptest::prelude::*;

fn valid_config() -> impl Strategy<Value = Config> {
    (1u32..200, 1.05f64..4.0, 0.5f64..5000.0).prop_map(|(n, multiplier, duration)| Config {
        number_of_arcs: n,
        cycle_multiplier: multiplier,
        duration,
        ..Default::default()
    })
}

proptest! {
    #[test]
    fn velocity_strictly_decreasing_and_positive(config in valid_config()) {
        // Small arc counts can round down to max_cycles == n
        let settings = config.validate(0.0);
        prop_assume!(settings.is_ok());
        let settings = settings.unwrap();

        let velocities: Vec<f64> = (0..settings.number_of_arcs)
            .map(|i| velocity_for_arc(i, &settings))
            .collect();
        for v in &velocities {
            prop_assert!(*v > 0.0);
            prop_assert!(v.is_finite());
        }
        for pair in velocities.windows(2) {
            prop_assert!(pair[0] > pair[1]);
        }
    }

    #[test]
    fn display_angle_stays_on_upper_half(elapsed in 0.0f64..1.0e6, velocity in 1.0e-3f64..100.0) {
        let angle = display_angle(elapsed, velocity);
        prop_assert!(angle >= PI);
        prop_assert!(angle <= TAU);
    }

    #[test]
    fn fold_is_idempotent(raw in PI..1.0e7f64) {
        let once = fold_angle(raw);
        prop_assert_eq!(fold_angle(once), once);
    }

    #[test]
    fn display_angle_is_pure(elapsed in 0.0f64..1.0e5, velocity in 1.0e-3f64..100.0) {
        prop_assert_eq!(display_angle(elapsed, velocity), display_angle(elapsed, velocity));
    }

    #[test]
    fn next_impact_strictly_later(from in 0.0f64..1.0e13, velocity in 1.0e-3f64..100.0) {
        prop_assert!(next_impact(from, velocity) > from);
    }

    #[test]
    fn rearm_is_monotonic(
        config in valid_config(),
        steps in proptest::collection::vec(0.0f64..5000.0, 1..50),
    ) {
        let settings = config.validate(1.0e12);
        prop_assume!(settings.is_ok());
        let settings = settings.unwrap();

        let mut arc = PendulumArc::new(settings.number_of_arcs - 1, &settings, None);
        let mut now = settings.start_time;
        for step in steps {
            now += step;
            let before = arc.next_impact_time;
            if now >= before {
                arc.rearm(now);
                prop_assert!(arc.next_impact_time > before);
                prop_assert_eq!(arc.last_impact_time, Some(before));
            }
        }
    }

    #[test]
    fn all_arcs_aligned_at_start(config in valid_config()) {
        let settings = config.validate(0.0);
        prop_assume!(settings.is_ok());
        let snapshot = Snapshot::new(settings.unwrap());
        let start = snapshot.settings.start_time;
        for arc in &snapshot.arcs {
            prop_assert_eq!(arc.angle_at(start, start), PI);
        }
    }
}
