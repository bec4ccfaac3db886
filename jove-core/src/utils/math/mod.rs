//! Math utilities for the Jove Express engine.
//!
//! This module provides the rational payload type carried on the wire and the
//! dead-zone arithmetic applied to power commands.

pub mod deadzone;
pub mod rational;
