//! Engine behavior: power and calibration commands in, actuator and feedback out.
//!
//! The engine keeps the last requested power and calibration as received on the
//! wire. Every command re-runs the dead-zone arbitration; the actuator command
//! and the engine state are published only when they change. A resync request
//! replays the stored values without touching them.

use crate::utils::{
    config::TrainConfig,
    connection::{dispatcher::Publish, topics::Publication},
    controllers::actuator::{ActuatorCommand, ActuatorPort},
    math::{
        deadzone::{DeadZoneArbiter, EngineState},
        rational::Rational,
    },
};

/// Default calibration threshold (`30/100`).
pub const DEFAULT_CALIBRATION: Rational = Rational::new(30, 100);

pub struct Engine {
    port: ActuatorPort,
    power: Rational,
    calibration: Rational,
    arbiter: DeadZoneArbiter,
}

impl Engine {
    /// Create an engine driving `port`, starting stopped.
    ///
    /// The initial power is stored but not arbitrated; nothing is published
    /// until the first command arrives.
    pub fn new(
        port: ActuatorPort,
        power: Rational,
        calibration: Rational,
    ) -> Self {
        Self {
            port,
            power,
            calibration,
            arbiter: DeadZoneArbiter::new(),
        }
    }

    pub fn from_config(config: &TrainConfig) -> Self {
        Self::new(
            config.engine_port,
            config.engine_power,
            config.engine_calibration,
        )
    }

    pub fn port(&self) -> ActuatorPort {
        self.port
    }

    pub fn power(&self) -> Rational {
        self.power
    }

    pub fn calibration(&self) -> Rational {
        self.calibration
    }

    pub fn state(&self) -> EngineState {
        self.arbiter.state()
    }

    /// Replace the requested power, arbitrate, then echo the new power.
    pub fn on_power<P: Publish>(
        &mut self,
        power: Rational,
        out: &mut P,
    ) {
        tracing::debug!(%power, "engine power command");
        self.power = power;
        self.actuate(out);
        out.publish(Publication::PowerFeedback(self.power));
    }

    /// Replace the calibration threshold, arbitrate, then echo the new threshold.
    ///
    /// Out-of-range thresholds are kept as given.
    pub fn on_calibration<P: Publish>(
        &mut self,
        calibration: Rational,
        out: &mut P,
    ) {
        tracing::debug!(%calibration, "engine calibration command");
        self.calibration = calibration;
        self.actuate(out);
        out.publish(Publication::CalibrationFeedback(self.calibration));
    }

    /// Republish power, calibration and state as stored, with no arbitration.
    pub fn on_all_feedback<P: Publish>(
        &self,
        out: &mut P,
    ) {
        tracing::debug!("engine resync");
        out.publish(Publication::PowerFeedback(self.power));
        out.publish(Publication::CalibrationFeedback(self.calibration));
        out.publish(Publication::StateFeedback(self.arbiter.state()));
    }

    fn actuate<P: Publish>(
        &mut self,
        out: &mut P,
    ) {
        let outcome = self
            .arbiter
            .arbitrate(self.power.ratio(), self.calibration.ratio());

        if let Some(power) = outcome.actuator {
            out.publish(Publication::Actuator(ActuatorCommand {
                port: self.port,
                power,
            }));
        }
        if let Some(state) = outcome.state {
            tracing::info!(?state, "engine state changed");
            out.publish(Publication::StateFeedback(state));
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(ActuatorPort::A, Rational::default(), DEFAULT_CALIBRATION)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    fn actuator_powers(out: &[Publication]) -> Vec<f64> {
        out.iter()
            .filter_map(|p| match p {
                Publication::Actuator(cmd) => Some(cmd.power),
                _ => None,
            })
            .collect()
    }

    fn states(out: &[Publication]) -> Vec<EngineState> {
        out.iter()
            .filter_map(|p| match p {
                Publication::StateFeedback(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn power_sequence_through_dead_zone() {
        let mut engine = Engine::default();
        let mut out: Vec<Publication> = Vec::new();

        for num in [10, 25, 40, 40, -40] {
            engine.on_power(Rational::new(num, 100), &mut out);
        }

        assert_eq!(actuator_powers(&out), [0.40, -0.40]);
        assert_eq!(states(&out), [EngineState::Forward, EngineState::Reverse]);
        assert_eq!(engine.state(), EngineState::Reverse);
    }

    #[test]
    fn power_command_is_echoed() {
        let mut engine = Engine::default();
        let mut out: Vec<Publication> = Vec::new();
        engine.on_power(Rational::new(10, 100), &mut out);
        assert_eq!(out, [Publication::PowerFeedback(Rational::new(10, 100))]);
    }

    #[test]
    fn lowering_calibration_engages_stored_power() {
        let mut engine = Engine::default();
        let mut out: Vec<Publication> = Vec::new();
        engine.on_power(Rational::new(20, 100), &mut out);
        out.clear();

        engine.on_calibration(Rational::new(1, 10), &mut out);
        assert_eq!(
            out,
            [
                Publication::Actuator(ActuatorCommand {
                    port: ActuatorPort::A,
                    power: 0.2,
                }),
                Publication::StateFeedback(EngineState::Forward),
                Publication::CalibrationFeedback(Rational::new(1, 10)),
            ]
        );
    }

    #[test]
    fn raising_calibration_stops_the_engine() {
        let mut engine = Engine::new(ActuatorPort::B, Rational::default(), Rational::new(0, 1));
        let mut out: Vec<Publication> = Vec::new();
        engine.on_power(Rational::new(-1, 2), &mut out);
        out.clear();

        engine.on_calibration(Rational::new(3, 2), &mut out);
        assert_eq!(actuator_powers(&out), [0.0]);
        assert_eq!(states(&out), [EngineState::Stopped]);
    }

    #[test]
    fn resync_replays_without_recomputing() {
        let mut engine = Engine::default();
        let mut out: Vec<Publication> = Vec::new();
        engine.on_power(Rational::new(50, 100), &mut out);
        out.clear();

        engine.on_all_feedback(&mut out);
        engine.on_all_feedback(&mut out);
        let snapshot = [
            Publication::PowerFeedback(Rational::new(50, 100)),
            Publication::CalibrationFeedback(DEFAULT_CALIBRATION),
            Publication::StateFeedback(EngineState::Forward),
        ];
        assert_eq!(out[..3], snapshot);
        assert_eq!(out[3..], snapshot);
        assert_eq!(engine.power(), Rational::new(50, 100));
    }
}
