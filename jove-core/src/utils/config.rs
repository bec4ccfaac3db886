//! Vehicle configuration.
//!
//! Only the settings the engine core consumes live here. Every field has a
//! default, so a partial JSON document (or none at all) is a valid config.

use alloc::string::String;

use serde::{Deserialize, Serialize};

use crate::utils::{
    connection::topics::TopicScope,
    controllers::{actuator::ActuatorPort, engine::DEFAULT_CALIBRATION},
    math::rational::Rational,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Vehicle name; external topics are scoped under it.
    pub name: String,
    /// Actuator port the engine drives.
    pub engine_port: ActuatorPort,
    pub engine_power: Rational,
    pub engine_calibration: Rational,
}

impl TrainConfig {
    pub fn topic_scope(&self) -> TopicScope {
        TopicScope::new(&self.name)
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            name: String::from("thejoveexpress"),
            engine_port: ActuatorPort::A,
            engine_power: Rational::default(),
            engine_calibration: DEFAULT_CALIBRATION,
        }
    }
}
