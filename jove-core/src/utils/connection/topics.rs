//! Topic names and payload codec.
//!
//! External topics are scoped under the vehicle name
//! (`thejoveexpress/engine/power/control`); the internal actuator topic is not.
//! Ratio payloads are JSON `{"num": .., "den": ..}` objects, the engine state
//! is a bare integer and actuator commands are `{"port": "A", "power": 0.4}`.

use alloc::{format, string::String, vec::Vec};
use core::fmt;

use serde::de::DeserializeOwned;

use crate::utils::{
    controllers::actuator::ActuatorCommand,
    math::{deadzone::EngineState, rational::Rational},
};

/// Every topic the engine core subscribes or publishes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    EnginePowerControl,
    EngineCalibrationControl,
    AllFeedback,
    ActuatorPowerInternal,
    LifecycleShutdown,
    EnginePowerFeedback,
    EngineCalibrationFeedback,
    EngineStateFeedback,
}

impl Topic {
    pub const ALL: [Topic; 8] = [
        Topic::EnginePowerControl,
        Topic::EngineCalibrationControl,
        Topic::AllFeedback,
        Topic::ActuatorPowerInternal,
        Topic::LifecycleShutdown,
        Topic::EnginePowerFeedback,
        Topic::EngineCalibrationFeedback,
        Topic::EngineStateFeedback,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Topic::EnginePowerControl => "engine/power/control",
            Topic::EngineCalibrationControl => "engine/calibration/control",
            Topic::AllFeedback => "feedback",
            Topic::ActuatorPowerInternal => "actuator/power/internal",
            Topic::LifecycleShutdown => "lifecycle/control/shutdown",
            Topic::EnginePowerFeedback => "engine/power/feedback",
            Topic::EngineCalibrationFeedback => "engine/calibration/feedback",
            Topic::EngineStateFeedback => "engine/state/feedback",
        }
    }

    pub fn parse(name: &str) -> Option<Topic> {
        Topic::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Internal topics never leave the process and are not scoped.
    pub const fn is_internal(self) -> bool {
        matches!(self, Topic::ActuatorPowerInternal)
    }

    pub const fn is_inbound(self) -> bool {
        matches!(
            self,
            Topic::EnginePowerControl
                | Topic::EngineCalibrationControl
                | Topic::AllFeedback
                | Topic::ActuatorPowerInternal
                | Topic::LifecycleShutdown
        )
    }
}

impl fmt::Display for Topic {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inbound events handled by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Power(Rational),
    Calibration(Rational),
    /// Resync request: republish everything without recomputing.
    AllFeedback,
    Actuator(ActuatorCommand),
    Shutdown,
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Power(_) => Topic::EnginePowerControl,
            Event::Calibration(_) => Topic::EngineCalibrationControl,
            Event::AllFeedback => Topic::AllFeedback,
            Event::Actuator(_) => Topic::ActuatorPowerInternal,
            Event::Shutdown => Topic::LifecycleShutdown,
        }
    }
}

/// Outbound publications produced by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Publication {
    PowerFeedback(Rational),
    CalibrationFeedback(Rational),
    StateFeedback(EngineState),
    Actuator(ActuatorCommand),
}

impl Publication {
    pub fn topic(&self) -> Topic {
        match self {
            Publication::PowerFeedback(_) => Topic::EnginePowerFeedback,
            Publication::CalibrationFeedback(_) => Topic::EngineCalibrationFeedback,
            Publication::StateFeedback(_) => Topic::EngineStateFeedback,
            Publication::Actuator(_) => Topic::ActuatorPowerInternal,
        }
    }

    /// Encode the payload as JSON.
    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        let bytes = match self {
            Publication::PowerFeedback(r) | Publication::CalibrationFeedback(r) => {
                serde_json::to_vec(r)
            }
            Publication::StateFeedback(s) => serde_json::to_vec(s),
            Publication::Actuator(cmd) => serde_json::to_vec(cmd),
        };
        bytes.map_err(WireError::Payload)
    }
}

/// Errors raised on the transport boundary. These never reach the handlers.
#[derive(Debug)]
pub enum WireError {
    UnknownTopic(String),
    NotInbound(Topic),
    Payload(serde_json::Error),
}

impl fmt::Display for WireError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            WireError::UnknownTopic(name) => write!(f, "unknown topic `{}`", name),
            WireError::NotInbound(topic) => write!(f, "topic `{}` is publish-only", topic),
            WireError::Payload(e) => write!(f, "malformed payload: {}", e),
        }
    }
}

fn payload<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, WireError> {
    serde_json::from_slice(bytes).map_err(WireError::Payload)
}

/// Decode an inbound payload for an unscoped topic.
pub fn decode(
    topic: Topic,
    bytes: &[u8],
) -> Result<Event, WireError> {
    match topic {
        Topic::EnginePowerControl => Ok(Event::Power(payload(bytes)?)),
        Topic::EngineCalibrationControl => Ok(Event::Calibration(payload(bytes)?)),
        Topic::AllFeedback => Ok(Event::AllFeedback),
        Topic::ActuatorPowerInternal => Ok(Event::Actuator(payload(bytes)?)),
        Topic::LifecycleShutdown => Ok(Event::Shutdown),
        other => Err(WireError::NotInbound(other)),
    }
}

/// Maps topics to and from their vehicle-scoped names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicScope {
    prefix: String,
}

impl TopicScope {
    /// Scope external topics under `name`. An empty name disables scoping.
    pub fn new(name: &str) -> Self {
        Self {
            prefix: String::from(name.trim_matches('/')),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Full transport name of a topic.
    pub fn name(
        &self,
        topic: Topic,
    ) -> String {
        if topic.is_internal() || self.prefix.is_empty() {
            String::from(topic.as_str())
        } else {
            format!("{}/{}", self.prefix, topic.as_str())
        }
    }

    /// Resolve a full transport name back to a topic.
    pub fn resolve(
        &self,
        name: &str,
    ) -> Result<Topic, WireError> {
        let unscoped = if self.prefix.is_empty() {
            Some(name)
        } else {
            name.strip_prefix(self.prefix.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
        };

        unscoped
            .and_then(Topic::parse)
            .filter(|t| !t.is_internal())
            .or_else(|| Topic::parse(name).filter(|t| t.is_internal()))
            .ok_or_else(|| WireError::UnknownTopic(String::from(name)))
    }

    /// Resolve and decode one inbound message.
    pub fn decode(
        &self,
        name: &str,
        bytes: &[u8],
    ) -> Result<Event, WireError> {
        decode(self.resolve(name)?, bytes)
    }

    /// Encode one outbound publication as `(topic name, payload)`.
    pub fn encode(
        &self,
        publication: &Publication,
    ) -> Result<(String, Vec<u8>), WireError> {
        Ok((self.name(publication.topic()), publication.encode()?))
    }
}

impl Default for TopicScope {
    fn default() -> Self {
        Self::new("thejoveexpress")
    }
}
