use core::cell::RefCell;

use embedded_hal_bus::i2c::RefCellDevice;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};
use jove_core::utils::{
    connection::dispatcher::Dispatcher,
    controllers::{
        pca9685::{Pca9685Motors, MAX_DUTY},
        ActuatorPort, Engine, MotorDriver,
    },
    Event, Publication, Rational,
};
use pwm_pca9685::{Address as PwmAddress, Pca9685};

/// Default I2C address for the PWM motor controller.
pub const PWM_ADDRESS: u8 = 0x55;

/// Create a write transaction for the given I2C address and data payload.
pub fn write(
    addr: u8,
    data: Vec<u8>,
) -> I2cTrans {
    I2cTrans::write(addr, data)
}

/// Auto-increment enable, issued before the first channel write.
fn auto_increment() -> I2cTrans {
    write(PWM_ADDRESS, vec![0x00, 0x31])
}

/// Channel write with `on = 0` and the given `off` count.
fn channel(
    register: u8,
    off: u16,
) -> I2cTrans {
    write(
        PWM_ADDRESS,
        vec![register, 0x00, 0x00, off as u8, (off >> 8) as u8],
    )
}

// Register addresses of the default wiring: A on C6/C7, B on C2/C3.
const A_PHASE: u8 = 0x1E;
const A_ENABLE: u8 = 0x22;
const B_PHASE: u8 = 0x0E;
const B_ENABLE: u8 = 0x12;

#[test]
fn test_configure_pwm() {
    // Expected transactions for enabling PWM and setting prescale (includes sleep handling)
    let expectations = [
        write(PWM_ADDRESS, vec![0x00, 0x01]),
        write(PWM_ADDRESS, vec![0x00, 0x11]),
        write(PWM_ADDRESS, vec![0xFE, 100]),
        write(PWM_ADDRESS, vec![0x00, 0x01]),
    ];

    let mock = I2cMock::new(&expectations);
    let i2c_bus = RefCell::new(mock);
    let pwm = Pca9685::new(RefCellDevice::new(&i2c_bus), PwmAddress::from(PWM_ADDRESS)).unwrap();
    let mut motors = Pca9685Motors::new(pwm);
    motors.configure().unwrap();
    i2c_bus.borrow_mut().done();
}

#[test]
fn test_set_power_zero() {
    let expectations = [
        auto_increment(),
        channel(A_PHASE, 0),
        channel(A_ENABLE, 0),
        channel(B_PHASE, 0),
        channel(B_ENABLE, 0),
    ];

    let mock = I2cMock::new(&expectations);
    let i2c_bus = RefCell::new(mock);
    let pwm = Pca9685::new(RefCellDevice::new(&i2c_bus), PwmAddress::from(PWM_ADDRESS)).unwrap();
    let mut motors = Pca9685Motors::new(pwm);
    motors.set_power(0, 0).unwrap();
    i2c_bus.borrow_mut().done();
}

#[test]
fn test_set_power_forward_and_reverse() {
    let expectations = [
        auto_increment(),
        channel(A_PHASE, 0),
        channel(A_ENABLE, 50),
        channel(B_PHASE, MAX_DUTY),
        channel(B_ENABLE, 20),
    ];

    let mock = I2cMock::new(&expectations);
    let i2c_bus = RefCell::new(mock);
    let pwm = Pca9685::new(RefCellDevice::new(&i2c_bus), PwmAddress::from(PWM_ADDRESS)).unwrap();
    let mut motors = Pca9685Motors::new(pwm);
    motors.set_power(50, -20).unwrap();
    // Releasing the chip hands it back without further bus traffic.
    let pwm = motors.destroy();
    drop(pwm);
    i2c_bus.borrow_mut().done();
}

#[test]
fn test_set_power_clamps_to_full_duty() {
    let expectations = [
        auto_increment(),
        channel(A_PHASE, MAX_DUTY),
        channel(A_ENABLE, MAX_DUTY),
        channel(B_PHASE, 0),
        channel(B_ENABLE, MAX_DUTY),
    ];

    let mock = I2cMock::new(&expectations);
    let i2c_bus = RefCell::new(mock);
    let pwm = Pca9685::new(RefCellDevice::new(&i2c_bus), PwmAddress::from(PWM_ADDRESS)).unwrap();
    let mut motors = Pca9685Motors::new(pwm);
    motors.set_power(i32::MIN, 10_000).unwrap();
    i2c_bus.borrow_mut().done();
}

/// Full engine path: a power command above the dead-zone reaches the PCA9685,
/// shutdown writes both channels back to zero.
#[test]
fn test_engine_drives_pca9685() {
    let expectations = [
        auto_increment(),
        // 0.5 * 4095 truncates to 2047 on channel A.
        channel(A_PHASE, 0),
        channel(A_ENABLE, 2047),
        channel(B_PHASE, 0),
        channel(B_ENABLE, 0),
        // shutdown
        channel(A_PHASE, 0),
        channel(A_ENABLE, 0),
        channel(B_PHASE, 0),
        channel(B_ENABLE, 0),
    ];

    let mock = I2cMock::new(&expectations);
    let i2c_bus = RefCell::new(mock);
    let pwm = Pca9685::new(RefCellDevice::new(&i2c_bus), PwmAddress::from(PWM_ADDRESS)).unwrap();
    let motors = Pca9685Motors::new(pwm);
    assert_eq!(motors.max_velocity(), 4095);

    let mut dispatcher = Dispatcher::new(Engine::default(), motors, Vec::<Publication>::new());
    dispatcher.dispatch(Event::Power(Rational::new(1, 2))).unwrap();
    // Same level again: suppressed, no I2C traffic.
    dispatcher.dispatch(Event::Power(Rational::new(2, 4))).unwrap();
    dispatcher.dispatch(Event::Shutdown).unwrap();

    assert_eq!(dispatcher.engine().port(), ActuatorPort::A);
    drop(dispatcher);
    i2c_bus.borrow_mut().done();
}
