//! Dual-channel actuator multiplexing.
//!
//! Two logical consumers share one motor driver that only exposes a combined
//! write of both channels. [`ActuatorMultiplexer`] keeps the last level written
//! to each channel, drops commands that would not change it, and otherwise
//! rewrites both channels at once so a change on one port never disturbs the
//! other.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Physical output channel of the shared motor driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActuatorPort {
    A,
    B,
}

impl fmt::Display for ActuatorPort {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            ActuatorPort::A => f.write_str("A"),
            ActuatorPort::B => f.write_str("B"),
        }
    }
}

/// Effective power requested for one port, as published on `actuator/power/internal`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActuatorCommand {
    pub port: ActuatorPort,
    pub power: f64,
}

/// A motor driver with a single combined two-channel write.
pub trait MotorDriver {
    type Error: fmt::Debug;

    /// Velocity level corresponding to a power ratio of `1.0`.
    fn max_velocity(&self) -> i32;

    /// Write both channel levels in one operation.
    fn set_power(
        &mut self,
        a: i32,
        b: i32,
    ) -> Result<(), Self::Error>;
}

/// Levels last passed to [`MotorDriver::set_power`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelLevels {
    pub a: i32,
    pub b: i32,
}

impl ChannelLevels {
    fn level_mut(
        &mut self,
        port: ActuatorPort,
    ) -> &mut i32 {
        match port {
            ActuatorPort::A => &mut self.a,
            ActuatorPort::B => &mut self.b,
        }
    }
}

pub struct ActuatorMultiplexer<D> {
    driver: D,
    levels: ChannelLevels,
    shut_down: bool,
}

impl<D: MotorDriver> ActuatorMultiplexer<D> {
    /// Wrap a driver. Both channels are assumed to start at `0`.
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            levels: ChannelLevels::default(),
            shut_down: false,
        }
    }

    pub fn levels(&self) -> ChannelLevels {
        self.levels
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Scale a power ratio to an integer driver level, truncating toward zero.
    pub fn scale(
        &self,
        power: f64,
    ) -> i32 {
        (power * self.driver.max_velocity() as f64) as i32
    }

    /// Apply one port's command.
    ///
    /// Returns `Ok(true)` when a physical write was issued and `Ok(false)` when
    /// the level was already current (or the multiplexer is shut down).
    /// Stored levels only change once the driver has accepted the write.
    pub fn on_actuator_command(
        &mut self,
        command: ActuatorCommand,
    ) -> Result<bool, D::Error> {
        if self.shut_down {
            tracing::warn!(port = %command.port, power = command.power, "actuator command after shutdown dropped");
            return Ok(false);
        }

        let ranged = self.scale(command.power);
        let mut next = self.levels;
        let level = next.level_mut(command.port);
        if *level == ranged {
            tracing::debug!(port = %command.port, ranged, "actuator level unchanged");
            return Ok(false);
        }
        *level = ranged;

        let ChannelLevels { a, b } = next;
        tracing::info!(a, b, "actuator write");
        self.driver.set_power(a, b)?;
        self.levels = next;
        Ok(true)
    }

    /// Stop both channels unconditionally.
    ///
    /// Every call writes `(0, 0)`, and no other write follows the first call.
    pub fn on_shutdown(&mut self) -> Result<(), D::Error> {
        self.shut_down = true;
        self.levels = ChannelLevels::default();
        tracing::info!("actuator shutdown, writing (0, 0)");
        self.driver.set_power(0, 0)
    }
}
