//! Module Exports
//!
//! This file exports the modules that connect the engine core to its
//! publish/subscribe transport.
//!
//! # Modules
//! - `topics`: topic names, vehicle scoping and the JSON payload codec.
//! - `dispatcher`: in-order, run-to-completion delivery of events to the
//!   engine and the actuator multiplexer.

pub mod dispatcher;
/// Module for topic names and payload encoding on the transport boundary.
pub mod topics;

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};

use topics::Event;

/// Channel used to feed inbound events (`Event` messages) to the dispatcher.
pub static EVENT_CHANNEL: Channel<CriticalSectionRawMutex, Event, 16> = Channel::new();
