//! Periodic interrupt timer abstraction

use core::fmt;

use crate::error::HalResult;

/// Reload/prescale pair programming a timer's update period
///
/// The update period is `(reload + 1) * (prescaler + 1)` input clock cycles.
/// `period_us` carries the requested period for timers that are programmed
/// by duration instead of register values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTiming {
    pub reload: u32,
    pub prescaler: u32,
    pub period_us: u64,
}

impl TimerTiming {
    /// Number of input clock cycles between two update events
    pub const fn cycles(&self) -> u64 {
        (self.reload as u64 + 1).saturating_mul(self.prescaler as u64 + 1)
    }

    /// Actual update period for a given timer input clock, in microseconds
    pub const fn actual_period_us(&self, timer_clock_hz: u32) -> u64 {
        if timer_clock_hz == 0 {
            return 0;
        }
        self.cycles().saturating_mul(1_000_000) / timer_clock_hz as u64
    }
}

impl fmt::Display for TimerTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arr={} psc={} ({}us)",
            self.reload, self.prescaler, self.period_us
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TimerTiming {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "arr={} psc={} ({}us)",
            self.reload,
            self.prescaler,
            self.period_us
        );
    }
}

/// Basic timer used as a periodic interrupt source
pub trait RampTimer {
    /// Largest value the prescaler register accepts
    const MAX_PRESCALER: u32 = 0xFFFF;

    /// Start counting with the update interrupt enabled (repeating)
    fn start_interrupt(&mut self) -> HalResult<()>;

    /// Stop counting and disable the update interrupt
    fn stop_interrupt(&mut self) -> HalResult<()>;

    /// Set auto-reload value
    fn set_reload(&mut self, reload: u32) -> HalResult<()>;

    /// Set prescaler divisor (input clock is divided by `prescaler + 1`)
    fn set_prescaler(&mut self, prescaler: u32) -> HalResult<()>;

    /// Set counter value
    fn set_counter(&mut self, value: u32) -> HalResult<()>;

    /// Get current counter value
    fn counter(&self) -> u32;

    /// Program the update period and reset the counter.
    ///
    /// Timers without reload/prescale registers override this and use
    /// `timing.period_us`.
    fn program(&mut self, timing: &TimerTiming) -> HalResult<()> {
        self.set_reload(timing.reload)?;
        self.set_prescaler(timing.prescaler)?;
        self.set_counter(0)
    }
}
