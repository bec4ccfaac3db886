//! PCA9685 motor driver for the two actuator channels.
//!
//! Each channel drives one H-bridge through a pair of PWM outputs: a phase
//! output selecting direction and an enable output carrying the duty cycle.
//! The multiplexer's combined write maps onto both pairs in a single call.

use core::fmt;

use embedded_hal::i2c::I2c;
use pwm_pca9685::{Channel, Error as PwmError, Pca9685};

use crate::utils::controllers::actuator::MotorDriver;

/// Full-scale duty of the PCA9685 (12-bit).
pub const MAX_DUTY: u16 = 4095;

/// Errors that can occur when driving motors through the PCA9685.
#[derive(Debug)]
pub enum DeviceError<E: fmt::Debug> {
    PwmError(PwmError<E>),
}

impl<E: fmt::Debug> fmt::Display for DeviceError<E> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            DeviceError::PwmError(e) => write!(f, "PCA9685 write failed: {:?}", e),
        }
    }
}

/// Two-channel motor driver on a PCA9685.
pub struct Pca9685Motors<I2C> {
    pub pwm: Pca9685<I2C>,
    /// `(phase, enable)` outputs for channel A and channel B.
    motor_channels: [(Channel, Channel); 2],
}

impl<I2C, E> Pca9685Motors<I2C>
where
    I2C: I2c<Error = E>,
    E: fmt::Debug,
{
    /// Wrap a PCA9685 wired with channel A on C6/C7 and channel B on C2/C3.
    pub fn new(pwm: Pca9685<I2C>) -> Self {
        Self::with_channels(pwm, [(Channel::C6, Channel::C7), (Channel::C2, Channel::C3)])
    }

    pub fn with_channels(
        pwm: Pca9685<I2C>,
        motor_channels: [(Channel, Channel); 2],
    ) -> Self {
        Pca9685Motors {
            pwm,
            motor_channels,
        }
    }

    /// Enable the chip and set the PWM prescale.
    pub fn configure(&mut self) -> Result<(), DeviceError<E>> {
        self.pwm.enable().map_err(DeviceError::PwmError)?;
        tracing::info!("PWM enabled");
        self.pwm.set_prescale(100).map_err(DeviceError::PwmError)?;
        tracing::info!("PWM prescale set to 60Hz");
        Ok(())
    }

    /// Release the underlying PCA9685.
    pub fn destroy(self) -> Pca9685<I2C> {
        self.pwm
    }

    fn drive(
        &mut self,
        (phase_channel, enable_channel): (Channel, Channel),
        level: i32,
    ) -> Result<(), DeviceError<E>> {
        let duty = level.unsigned_abs().min(MAX_DUTY as u32) as u16;
        let phase = if level >= 0 { 0 } else { MAX_DUTY };

        self.pwm
            .set_channel_on_off(phase_channel, 0, phase)
            .map_err(DeviceError::PwmError)?;
        self.pwm
            .set_channel_on_off(enable_channel, 0, duty)
            .map_err(DeviceError::PwmError)
    }
}

impl<I2C, E> MotorDriver for Pca9685Motors<I2C>
where
    I2C: I2c<Error = E>,
    E: fmt::Debug,
{
    type Error = DeviceError<E>;

    fn max_velocity(&self) -> i32 {
        MAX_DUTY as i32
    }

    fn set_power(
        &mut self,
        a: i32,
        b: i32,
    ) -> Result<(), Self::Error> {
        let [channel_a, channel_b] = self.motor_channels;
        self.drive(channel_a, a)?;
        self.drive(channel_b, b)
    }
}
