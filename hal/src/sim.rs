//! Simulated peripherals for host builds
//!
//! Each simulated peripheral shares its register state behind an
//! `Arc<Mutex<_>>`; clones observe the same hardware. Hand one clone to the
//! driver and keep another to inspect what it programmed.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{HalError, HalResult};
use crate::pwm::{ChannelId, PwmTimer};
use crate::timer::RampTimer;

/// Number of output channels on a simulated PWM timer (1-based)
pub const SIM_PWM_CHANNELS: usize = 4;

fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicking test thread must not hide the register state from others.
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone, Copy, Default)]
struct SimChannel {
    enabled: bool,
    compare: u32,
}

#[derive(Debug, Default)]
struct SimPwmState {
    reload: u32,
    channels: [SimChannel; SIM_PWM_CHANNELS],
    compare_writes: usize,
    fault: Option<HalError>,
}

/// Simulated PWM timer with four channels numbered 1 to 4
#[derive(Debug, Clone)]
pub struct SimPwm {
    state: Arc<Mutex<SimPwmState>>,
}

impl SimPwm {
    /// Create a PWM timer already running with the given auto-reload value
    pub fn new(reload: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimPwmState {
                reload,
                ..SimPwmState::default()
            })),
        }
    }

    /// Whether output is enabled on a channel
    pub fn is_enabled(&self, channel: ChannelId) -> bool {
        index(channel)
            .map(|i| lock(&self.state).channels[i].enabled)
            .unwrap_or(false)
    }

    /// Compare value of a channel, 0 for unknown channels
    pub fn compare_value(&self, channel: ChannelId) -> u32 {
        index(channel)
            .map(|i| lock(&self.state).channels[i].compare)
            .unwrap_or(0)
    }

    /// Number of compare register writes so far
    pub fn compare_writes(&self) -> usize {
        lock(&self.state).compare_writes
    }

    /// Make the next mutating call fail with `error`
    pub fn inject_fault(&self, error: HalError) {
        lock(&self.state).fault = Some(error);
    }

    fn with_channel<F>(&mut self, channel: ChannelId, f: F) -> HalResult<()>
    where
        F: FnOnce(&mut SimChannel),
    {
        let i = index(channel)?;
        let mut state = lock(&self.state);
        if let Some(error) = state.fault.take() {
            return Err(error);
        }
        f(&mut state.channels[i]);
        Ok(())
    }
}

fn index(channel: ChannelId) -> HalResult<usize> {
    match channel.raw() as usize {
        n @ 1..=SIM_PWM_CHANNELS => Ok(n - 1),
        _ => Err(HalError::InvalidParameter),
    }
}

impl PwmTimer for SimPwm {
    fn start_channel(&mut self, channel: ChannelId) -> HalResult<()> {
        self.with_channel(channel, |ch| ch.enabled = true)
    }

    fn stop_channel(&mut self, channel: ChannelId) -> HalResult<()> {
        self.with_channel(channel, |ch| ch.enabled = false)
    }

    fn reload(&self) -> u32 {
        lock(&self.state).reload
    }

    fn set_compare(&mut self, channel: ChannelId, value: u32) -> HalResult<()> {
        self.with_channel(channel, |ch| ch.compare = value)?;
        lock(&self.state).compare_writes += 1;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct SimTimerState {
    reload: u32,
    prescaler: u32,
    counter: u32,
    running: bool,
    starts: usize,
    stops: usize,
    fault: Option<HalError>,
}

/// Simulated basic timer used as a ramp clock
#[derive(Debug, Clone, Default)]
pub struct SimRampTimer {
    state: Arc<Mutex<SimTimerState>>,
}

impl SimRampTimer {
    /// Create a stopped timer with zeroed registers
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the update interrupt is armed
    pub fn is_running(&self) -> bool {
        lock(&self.state).running
    }

    /// Programmed auto-reload value
    pub fn reload_value(&self) -> u32 {
        lock(&self.state).reload
    }

    /// Programmed prescaler value
    pub fn prescaler_value(&self) -> u32 {
        lock(&self.state).prescaler
    }

    /// Current counter value
    pub fn counter_value(&self) -> u32 {
        lock(&self.state).counter
    }

    /// Number of times the interrupt was armed
    pub fn start_count(&self) -> usize {
        lock(&self.state).starts
    }

    /// Number of times the interrupt was disarmed
    pub fn stop_count(&self) -> usize {
        lock(&self.state).stops
    }

    /// Make the next mutating call fail with `error`
    pub fn inject_fault(&self, error: HalError) {
        lock(&self.state).fault = Some(error);
    }

    fn modify<F>(&mut self, f: F) -> HalResult<()>
    where
        F: FnOnce(&mut SimTimerState),
    {
        let mut state = lock(&self.state);
        if let Some(error) = state.fault.take() {
            return Err(error);
        }
        f(&mut state);
        Ok(())
    }
}

impl RampTimer for SimRampTimer {
    fn start_interrupt(&mut self) -> HalResult<()> {
        self.modify(|s| {
            s.running = true;
            s.starts += 1;
        })
    }

    fn stop_interrupt(&mut self) -> HalResult<()> {
        self.modify(|s| {
            s.running = false;
            s.stops += 1;
        })
    }

    fn set_reload(&mut self, reload: u32) -> HalResult<()> {
        self.modify(|s| s.reload = reload)
    }

    fn set_prescaler(&mut self, prescaler: u32) -> HalResult<()> {
        if prescaler > Self::MAX_PRESCALER {
            return Err(HalError::InvalidParameter);
        }
        self.modify(|s| s.prescaler = prescaler)
    }

    fn set_counter(&mut self, value: u32) -> HalResult<()> {
        self.modify(|s| s.counter = value)
    }

    fn counter(&self) -> u32 {
        lock(&self.state).counter
    }
}
