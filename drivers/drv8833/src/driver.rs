//! DRV8833 direct and ramped speed control

use log::{debug, trace, warn};
use motor_hal::{ChannelId, ClockSource, PwmTimer, RampTimer, TimerTiming};

use crate::config::DriverConfig;
use crate::error::DriverResult;
use crate::ramp::{timer_timing, RampPlan};
use crate::state::{MotorState, Phase};
use crate::types::{Direction, Speed};

/// Result of a ramp request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampStatus {
    /// Ramp clock programmed and running
    Armed { plan: RampPlan, timing: TimerTiming },
    /// Another ramp is in flight; the request was dropped
    AlreadyRamping,
    /// Target equals the current speed; nothing to do
    AtTarget,
}

/// Result of one ramp clock interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No ramp in flight
    Ignored,
    /// Speed advanced, ramp continues
    Stepped(Speed),
    /// Target reached, ramp clock disarmed
    Finished(Speed),
}

/// One motor on a DRV8833 bridge
///
/// Owns the PWM timer driving both bridge inputs, the ramp timer, and the
/// clock service used to derive ramp timing.
#[derive(Debug)]
pub struct Drv8833<P, R, C> {
    pwm: P,
    channel_a: ChannelId,
    channel_b: ChannelId,
    ramp_timer: R,
    clock: C,
    ramp_reload: u32,
    state: MotorState,
}

impl<P, R, C> Drv8833<P, R, C>
where
    P: PwmTimer,
    R: RampTimer,
    C: ClockSource,
{
    /// Bind the peripherals, enable both PWM channels and zero their outputs.
    pub fn init(config: DriverConfig<P, R, C>) -> DriverResult<Self> {
        config.validate()?;

        let DriverConfig {
            pwm,
            channel_a,
            channel_b,
            ramp_timer,
            clock,
            ramp_reload,
        } = config;

        let mut driver = Self {
            pwm,
            channel_a,
            channel_b,
            ramp_timer,
            clock,
            ramp_reload,
            state: MotorState::default(),
        };

        driver.pwm.start_channel(channel_a)?;
        driver.pwm.start_channel(channel_b)?;
        driver.pwm.set_compare(channel_a, 0)?;
        driver.pwm.set_compare(channel_b, 0)?;

        debug!(
            "drv8833 bound to {}/{}, pwm reload {}",
            channel_a,
            channel_b,
            driver.pwm.reload()
        );
        Ok(driver)
    }

    /// Stop the motor, disarm the ramp clock, disable both PWM channels and
    /// hand the peripherals back.
    ///
    /// Teardown is best effort: a failing step is logged and the remaining
    /// steps still run.
    pub fn destroy(mut self) -> DriverConfig<P, R, C> {
        if let Err(err) = self.stop() {
            warn!("drv8833 teardown: stop failed: {}", err);
        }
        if let Err(err) = self.ramp_timer.stop_interrupt() {
            warn!("drv8833 teardown: ramp timer stop failed: {}", err);
        }
        for channel in [self.channel_a, self.channel_b] {
            if let Err(err) = self.pwm.stop_channel(channel) {
                warn!("drv8833 teardown: {} stop failed: {}", channel, err);
            }
        }

        DriverConfig {
            pwm: self.pwm,
            channel_a: self.channel_a,
            channel_b: self.channel_b,
            ramp_timer: self.ramp_timer,
            clock: self.clock,
            ramp_reload: self.ramp_reload,
        }
    }

    /// Drive in `direction` at `speed` percent immediately.
    pub fn start(&mut self, direction: Direction, speed: u8) -> DriverResult<()> {
        self.state.direction = direction;
        self.state.running = true;
        self.set_speed(speed)
    }

    /// Change the duty cycle; ignored unless the motor is running.
    pub fn set_speed(&mut self, speed: u8) -> DriverResult<()> {
        if !self.state.running {
            return Ok(());
        }
        self.apply(Speed::new(speed))
    }

    /// Coast: both bridge inputs low.
    ///
    /// Every step runs even if an earlier one fails; the first error is
    /// returned.
    pub fn stop(&mut self) -> DriverResult<()> {
        self.halt(0)
    }

    /// Brake: both bridge inputs held at full duty.
    ///
    /// Every step runs even if an earlier one fails; the first error is
    /// returned.
    pub fn brake(&mut self) -> DriverResult<()> {
        let period = self.pwm.reload();
        self.halt(period)
    }

    /// Move from the current speed to `target_speed` over about
    /// `duration_ms`, one percent per ramp clock tick.
    ///
    /// The outputs are untouched until the first tick arrives through
    /// [`on_ramp_tick`](Self::on_ramp_tick).
    pub fn start_ramped(
        &mut self,
        direction: Direction,
        target_speed: u8,
        duration_ms: u32,
    ) -> DriverResult<RampStatus> {
        if self.state.ramping {
            debug!("ramp request dropped, ramp already in flight");
            return Ok(RampStatus::AlreadyRamping);
        }

        let target = Speed::new(target_speed);
        let plan = match RampPlan::new(self.state.speed, target, duration_ms) {
            Some(plan) => plan,
            None => return Ok(RampStatus::AtTarget),
        };

        let timer_clock_hz = self.clock.timer_clock_hz();
        let timing = timer_timing(
            timer_clock_hz,
            plan.interval_ms,
            self.ramp_reload,
            R::MAX_PRESCALER,
        );

        self.ramp_timer.stop_interrupt()?;
        self.ramp_timer.program(&timing)?;
        self.ramp_timer.start_interrupt()?;

        self.state.direction = direction;
        self.state.running = true;
        self.state.target_speed = target;
        self.state.step_sign = plan.step_sign;
        self.state.ramping = true;

        debug!(
            "ramp armed {} {}: {} at {}Hz",
            direction, plan, timing, timer_clock_hz
        );
        Ok(RampStatus::Armed { plan, timing })
    }

    /// Ramp clock interrupt handler body: advance one step towards the target.
    pub fn on_ramp_tick(&mut self) -> DriverResult<TickOutcome> {
        if !self.state.ramping {
            return Ok(TickOutcome::Ignored);
        }
        if !self.state.running {
            warn!("ramp tick while stopped, disarming ramp clock");
            self.cancel_ramp()?;
            return Ok(TickOutcome::Ignored);
        }

        self.apply(self.state.speed.stepped(self.state.step_sign))?;
        let speed = self.state.speed;

        if !self.state.at_target() {
            trace!("ramp step {}", speed);
            return Ok(TickOutcome::Stepped(speed));
        }

        self.state.ramping = false;
        if self.state.target_speed.is_zero() {
            self.state.running = false;
        }
        debug!("ramp finished at {}", speed);
        self.ramp_timer.stop_interrupt()?;
        Ok(TickOutcome::Finished(speed))
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn direction(&self) -> Direction {
        self.state.direction
    }

    pub fn speed(&self) -> Speed {
        self.state.speed
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn is_ramping(&self) -> bool {
        self.state.ramping
    }

    /// Ramp target; only meaningful while ramping
    pub fn target_speed(&self) -> Speed {
        self.state.target_speed
    }

    /// Clock service the ramp timing is derived from
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Write `speed` to the channel matching the direction and zero the other.
    fn apply(&mut self, speed: Speed) -> DriverResult<()> {
        self.state.speed = speed;
        let pulse = speed.duty(self.pwm.reload());

        let (active, inactive) = match self.state.direction {
            Direction::Forward => (self.channel_a, self.channel_b),
            Direction::Reverse => (self.channel_b, self.channel_a),
        };
        self.pwm.set_compare(inactive, 0)?;
        self.pwm.set_compare(active, pulse)?;
        Ok(())
    }

    /// Write `compare` to both legs, mark the motor stopped, then cancel any ramp.
    fn halt(&mut self, compare: u32) -> DriverResult<()> {
        let leg_a = self.pwm.set_compare(self.channel_a, compare);
        let leg_b = self.pwm.set_compare(self.channel_b, compare);
        self.state.running = false;
        self.state.speed = Speed::ZERO;
        let ramp = self.cancel_ramp();

        leg_a.and(leg_b)?;
        ramp
    }

    fn cancel_ramp(&mut self) -> DriverResult<()> {
        if self.state.ramping {
            self.state.ramping = false;
            self.ramp_timer.stop_interrupt()?;
            debug!("ramp cancelled at {}", self.state.speed);
        }
        Ok(())
    }
}
