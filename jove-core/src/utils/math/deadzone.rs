//! Dead-zone arithmetic for engine power.
//!
//! A calibration threshold marks the smallest power magnitude that actually
//! moves the train. Anything below it is forced to zero, symmetrically for
//! forward and reverse commands.
//!
//! [`DeadZoneArbiter`] remembers what it last published so that the actuator
//! and the engine-state consumers only hear about transitions.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Apply the calibration dead-zone to a requested power.
///
/// Returns `0.0` when `|power| < calibration`, otherwise `power` unchanged.
pub fn effective_power(
    power: f64,
    calibration: f64,
) -> f64 {
    if libm::fabs(power) < calibration {
        0.0
    } else {
        power
    }
}

/// Motion sign of the effective power, published as `-1`, `0` or `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum EngineState {
    Reverse,
    #[default]
    Stopped,
    Forward,
}

impl EngineState {
    /// Sign of an effective power. Negative zero and NaN count as stopped.
    pub fn of(effective: f64) -> Self {
        match effective.partial_cmp(&0.0) {
            Some(Ordering::Greater) => EngineState::Forward,
            Some(Ordering::Less) => EngineState::Reverse,
            Some(Ordering::Equal) | None => EngineState::Stopped,
        }
    }

    pub fn as_i8(self) -> i8 {
        match self {
            EngineState::Reverse => -1,
            EngineState::Stopped => 0,
            EngineState::Forward => 1,
        }
    }
}

impl From<EngineState> for i8 {
    fn from(state: EngineState) -> Self {
        state.as_i8()
    }
}

/// Raised when an integer outside `{-1, 0, 1}` is read as an engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidEngineState(pub i8);

impl core::fmt::Display for InvalidEngineState {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "engine state must be -1, 0 or 1, got {}", self.0)
    }
}

impl TryFrom<i8> for EngineState {
    type Error = InvalidEngineState;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(EngineState::Reverse),
            0 => Ok(EngineState::Stopped),
            1 => Ok(EngineState::Forward),
            other => Err(InvalidEngineState(other)),
        }
    }
}

/// Outcome of one arbitration: each field is `Some` only when it must be published.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Arbitration {
    pub actuator: Option<f64>,
    pub state: Option<EngineState>,
}

/// Change detector over the dead-zone output.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeadZoneArbiter {
    actuator_power: f64,
    state: EngineState,
}

impl DeadZoneArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last effective power handed to the actuator.
    pub fn actuator_power(&self) -> f64 {
        self.actuator_power
    }

    /// Last published engine state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Recompute the effective power and sign, recording whichever changed.
    ///
    /// The actuator comparison is bit-exact (`to_bits`), not epsilon-based.
    pub fn arbitrate(
        &mut self,
        power: f64,
        calibration: f64,
    ) -> Arbitration {
        let effective = effective_power(power, calibration);
        let state = EngineState::of(effective);
        let mut outcome = Arbitration::default();

        if effective.to_bits() != self.actuator_power.to_bits() {
            self.actuator_power = effective;
            outcome.actuator = Some(effective);
        }
        if state != self.state {
            self.state = state;
            outcome.state = Some(state);
        }
        outcome
    }
}
