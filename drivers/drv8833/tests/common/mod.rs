#![allow(dead_code)]

use drv8833::motor_hal::sim::{SimPwm, SimRampTimer};
use drv8833::motor_hal::{ApbPrescaler, BusClock, ChannelId};
use drv8833::{DriverConfig, Drv8833};

pub const IN1: ChannelId = ChannelId(1);
pub const IN2: ChannelId = ChannelId(2);
pub const PWM_RELOAD: u32 = 1000;

/// 42 MHz APB1 divided by 2, so ramp timers run at 84 MHz
pub const APB1: BusClock = BusClock::new(42_000_000, ApbPrescaler::Div2);

pub type TestDriver = Drv8833<SimPwm, SimRampTimer, BusClock>;

pub struct Rig {
    pub driver: TestDriver,
    pub pwm: SimPwm,
    pub timer: SimRampTimer,
}

impl Rig {
    pub fn new() -> Self {
        let pwm = SimPwm::new(PWM_RELOAD);
        let timer = SimRampTimer::new();
        let driver = Drv8833::init(config(&pwm, &timer)).unwrap();
        Self { driver, pwm, timer }
    }

    pub fn outputs(&self) -> (u32, u32) {
        (self.pwm.compare_value(IN1), self.pwm.compare_value(IN2))
    }

    /// Feed ramp clock ticks until the timer is disarmed, returning how many fired
    pub fn run_ramp(&mut self) -> usize {
        let mut ticks = 0;
        while self.timer.is_running() {
            self.driver.on_ramp_tick().unwrap();
            ticks += 1;
            assert!(ticks <= 100, "ramp did not terminate");
        }
        ticks
    }
}

pub fn config(pwm: &SimPwm, timer: &SimRampTimer) -> DriverConfig<SimPwm, SimRampTimer, BusClock> {
    DriverConfig::new(pwm.clone(), IN1, IN2, timer.clone(), APB1)
}
