//! Utility re-exports and helper macros for the Jove Express engine core.
//!
//! This module re-exports the control components, the wire codec and the
//! dispatcher that ties them together:
//!
//! - `config`: vehicle configuration and its defaults
//! - `connection`: topic names, payload codec and the event dispatcher
//! - `controllers`: engine (power/calibration), actuator multiplexer and motor drivers
//! - `math`: ratio payloads and dead-zone arithmetic
//!
//! The `mk_static!` macro simplifies static initialization in no-std contexts.

pub mod config;
pub mod connection;
pub mod controllers;
pub mod math;

pub use config::TrainConfig;
pub use connection::{
    dispatcher::{Dispatcher, Publish},
    topics::{Event, Publication, Topic, TopicScope},
    EVENT_CHANNEL,
};
pub use controllers::{ActuatorMultiplexer, Engine, MotorDriver};
pub use math::{deadzone::EngineState, rational::Rational};

#[macro_export]
/// Initialize a no-std static cell and write the given value into it.
///
/// This macro creates a `static_cell::StaticCell` for type `$t` and initializes
/// it with `$val`, returning a mutable reference to the stored value.
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        STATIC_CELL.uninit().write($val)
    }};
}
