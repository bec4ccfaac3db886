//! Property tests for the dead-zone and actuator invariants.

use jove_core::utils::{
    controllers::Engine,
    math::deadzone::{effective_power, EngineState},
    Publication, Rational,
};
use proptest::prelude::*;

proptest! {
    /// Anything strictly inside the dead-zone is a stopped engine.
    #[test]
    fn inside_dead_zone_is_stopped(
        calibration in 0.0f64..=1.0,
        fraction in -0.999f64..0.999,
    ) {
        let power = calibration * fraction;
        prop_assume!(power.abs() < calibration);
        let effective = effective_power(power, calibration);
        prop_assert_eq!(effective, 0.0);
        prop_assert_eq!(EngineState::of(effective), EngineState::Stopped);
    }

    /// At or beyond the threshold the requested power passes through bit for bit.
    #[test]
    fn outside_dead_zone_passes_through(
        calibration in 0.0f64..=1.0,
        power in -1.0f64..=1.0,
    ) {
        prop_assume!(power.abs() >= calibration);
        let effective = effective_power(power, calibration);
        prop_assert_eq!(effective.to_bits(), power.to_bits());

        let expected = if power > 0.0 {
            EngineState::Forward
        } else if power < 0.0 {
            EngineState::Reverse
        } else {
            EngineState::Stopped
        };
        prop_assert_eq!(EngineState::of(effective), expected);
    }

    /// Repeating the last power command never republishes the actuator or the state.
    #[test]
    fn repeated_power_command_is_suppressed(
        num in -1000i64..=1000,
        den in 1i64..=1000,
        calibration in 0i64..=100,
    ) {
        let mut engine = Engine::default();
        let mut out: Vec<Publication> = Vec::new();
        engine.on_calibration(Rational::new(calibration, 100), &mut out);
        engine.on_power(Rational::new(num, den), &mut out);
        out.clear();

        engine.on_power(Rational::new(num, den), &mut out);
        prop_assert_eq!(out, vec![Publication::PowerFeedback(Rational::new(num, den))]);
    }

    /// Published state always matches the sign of the effective power.
    #[test]
    fn state_tracks_effective_sign(
        commands in proptest::collection::vec((-100i64..=100, 0i64..=100), 1..50),
    ) {
        let mut engine = Engine::default();
        let mut out: Vec<Publication> = Vec::new();
        for (power, calibration) in commands {
            engine.on_calibration(Rational::new(calibration, 100), &mut out);
            engine.on_power(Rational::new(power, 100), &mut out);

            let effective = effective_power(engine.power().ratio(), engine.calibration().ratio());
            prop_assert_eq!(engine.state(), EngineState::of(effective));
        }
    }
}
