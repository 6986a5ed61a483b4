//! Immediate start/stop/brake/set-speed behaviour

mod common;

use common::{config, Rig, IN1, IN2, PWM_RELOAD};
use drv8833::motor_hal::sim::{SimPwm, SimRampTimer};
use drv8833::motor_hal::{ChannelId, HalError};
use drv8833::{Direction, DriverConfig, DriverError, Drv8833, Phase, Speed};

#[test]
fn init_enables_and_zeroes_both_channels() {
    let rig = Rig::new();

    assert!(rig.pwm.is_enabled(IN1));
    assert!(rig.pwm.is_enabled(IN2));
    assert_eq!(rig.outputs(), (0, 0));
    assert_eq!(rig.driver.phase(), Phase::Idle);
    assert_eq!(rig.driver.speed(), Speed::ZERO);
}

#[test]
fn init_rejects_shared_channel() {
    let pwm = SimPwm::new(PWM_RELOAD);
    let timer = SimRampTimer::new();
    let cfg = DriverConfig::new(pwm.clone(), IN1, IN1, timer, common::APB1);

    assert_eq!(Drv8833::init(cfg).err(), Some(DriverError::ChannelConflict));
    assert!(!pwm.is_enabled(IN1));
}

#[test]
fn init_propagates_peripheral_failure() {
    let pwm = SimPwm::new(PWM_RELOAD);
    let timer = SimRampTimer::new();
    let cfg = DriverConfig::new(pwm, IN1, ChannelId(9), timer, common::APB1);

    assert_eq!(
        Drv8833::init(cfg).err(),
        Some(DriverError::Hal(HalError::InvalidParameter))
    );
}

#[test]
fn forward_drives_channel_a_only() {
    let mut rig = Rig::new();
    rig.driver.start(Direction::Forward, 40).unwrap();

    assert_eq!(rig.outputs(), (400, 0));
    assert_eq!(rig.driver.phase(), Phase::Running);
}

#[test]
fn reverse_drives_channel_b_only() {
    let mut rig = Rig::new();
    rig.driver.start(Direction::Reverse, 25).unwrap();

    assert_eq!(rig.outputs(), (0, 250));
}

#[test]
fn direction_change_zeroes_inactive_channel() {
    let mut rig = Rig::new();
    rig.driver.start(Direction::Forward, 60).unwrap();
    rig.driver.start(Direction::Reverse, 60).unwrap();

    assert_eq!(rig.outputs(), (0, 600));

    rig.driver.start(Direction::Forward, 10).unwrap();
    assert_eq!(rig.outputs(), (100, 0));
}

#[test]
fn speed_above_hundred_is_clamped() {
    let mut rig = Rig::new();
    rig.driver.start(Direction::Forward, 180).unwrap();
    assert_eq!(rig.driver.speed(), Speed::MAX);
    assert_eq!(rig.outputs(), (PWM_RELOAD, 0));

    rig.driver.set_speed(101).unwrap();
    assert_eq!(rig.driver.speed().percent(), 100);
}

#[test]
fn set_speed_while_stopped_is_ignored() {
    let mut rig = Rig::new();
    let writes = rig.pwm.compare_writes();

    rig.driver.set_speed(70).unwrap();

    assert_eq!(rig.pwm.compare_writes(), writes);
    assert_eq!(rig.outputs(), (0, 0));
    assert_eq!(rig.driver.speed(), Speed::ZERO);
}

#[test]
fn set_speed_while_running_updates_duty() {
    let mut rig = Rig::new();
    rig.driver.start(Direction::Reverse, 10).unwrap();
    rig.driver.set_speed(55).unwrap();

    assert_eq!(rig.outputs(), (0, 550));
}

#[test]
fn stop_coasts() {
    let mut rig = Rig::new();
    rig.driver.start(Direction::Forward, 80).unwrap();
    rig.driver.stop().unwrap();

    assert_eq!(rig.outputs(), (0, 0));
    assert!(!rig.driver.is_running());
    assert_eq!(rig.driver.speed(), Speed::ZERO);

    // stop from idle is harmless
    rig.driver.stop().unwrap();
    assert_eq!(rig.driver.phase(), Phase::Idle);
}

#[test]
fn brake_drives_both_channels_full() {
    for direction in [Direction::Forward, Direction::Reverse] {
        let mut rig = Rig::new();
        rig.driver.start(direction, 30).unwrap();
        rig.driver.brake().unwrap();

        assert_eq!(rig.outputs(), (PWM_RELOAD, PWM_RELOAD));
        assert_eq!(rig.driver.speed(), Speed::ZERO);
        assert!(!rig.driver.is_running());
    }
}

#[test]
fn set_speed_after_brake_is_ignored() {
    let mut rig = Rig::new();
    rig.driver.start(Direction::Forward, 30).unwrap();
    rig.driver.brake().unwrap();
    rig.driver.set_speed(50).unwrap();

    assert_eq!(rig.outputs(), (PWM_RELOAD, PWM_RELOAD));
}

#[test]
fn pwm_fault_is_reported() {
    let mut rig = Rig::new();
    rig.pwm.inject_fault(HalError::HardwareError);

    assert_eq!(
        rig.driver.start(Direction::Forward, 20),
        Err(DriverError::Hal(HalError::HardwareError))
    );
}

#[test]
fn destroy_releases_peripherals_stopped() {
    let mut rig = Rig::new();
    rig.driver.start(Direction::Forward, 90).unwrap();
    rig.driver.start_ramped(Direction::Forward, 10, 800).unwrap();

    let released = rig.driver.destroy();

    assert_eq!(rig.pwm.compare_value(IN1), 0);
    assert_eq!(rig.pwm.compare_value(IN2), 0);
    assert!(!rig.pwm.is_enabled(IN1));
    assert!(!rig.pwm.is_enabled(IN2));
    assert!(!rig.timer.is_running());
    assert_eq!(released.channel_a, IN1);
    assert_eq!(released.channel_b, IN2);

    // the released bindings can build a fresh driver
    let driver = Drv8833::init(released).unwrap();
    assert!(rig.pwm.is_enabled(IN1));
    assert_eq!(driver.phase(), Phase::Idle);
}

#[test]
fn config_reload_is_used() {
    let pwm = SimPwm::new(PWM_RELOAD);
    let timer = SimRampTimer::new();
    let mut driver = Drv8833::init(config(&pwm, &timer).with_ramp_reload(9_999)).unwrap();

    driver.start_ramped(Direction::Forward, 10, 1000).unwrap();
    assert_eq!(timer.reload_value(), 9_999);
}

#[test]
fn destroy_with_failing_ramp_timer_zeroes_outputs() {
    let mut rig = Rig::new();
    rig.driver.start_ramped(Direction::Forward, 60, 600).unwrap();
    for _ in 0..30 {
        rig.driver.on_ramp_tick().unwrap();
    }
    assert_eq!(rig.outputs(), (300, 0));

    rig.timer.inject_fault(HalError::HardwareError);
    rig.driver.destroy();

    assert_eq!(rig.pwm.compare_value(IN1), 0);
    assert_eq!(rig.pwm.compare_value(IN2), 0);
    assert!(!rig.pwm.is_enabled(IN1));
    assert!(!rig.pwm.is_enabled(IN2));
    // the teardown's second disarm went through
    assert!(!rig.timer.is_running());
}
