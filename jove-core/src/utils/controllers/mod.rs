//! Module Exports
//!
//! This file exports the control components of the engine core.
//!
//! - `engine`: holds the requested power and calibration and arbitrates the
//!   dead-zone on every command.
//! - `actuator`: multiplexes two logical actuator ports onto one combined
//!   physical write.
//! - `pca9685`: drives the two actuator channels from a PCA9685 PWM controller.

pub mod actuator;
pub mod engine;
/// Module for driving H-bridge inputs through a PCA9685 over I2C.
pub mod pca9685;

pub use actuator::{ActuatorCommand, ActuatorMultiplexer, ActuatorPort, ChannelLevels, MotorDriver};
pub use engine::Engine;
