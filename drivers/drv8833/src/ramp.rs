//! Ramp planning and ramp-clock timing math

use core::fmt;

use log::warn;
use motor_hal::TimerTiming;

use crate::types::{Speed, StepSign};

/// Shortest tick interval a ramp will use
pub const MIN_INTERVAL_MS: u32 = 1;

/// A linear ramp of one percent per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampPlan {
    pub from: Speed,
    pub target: Speed,
    pub step_sign: StepSign,
    /// Ticks needed to reach the target
    pub step_count: u32,
    /// Tick period
    pub interval_ms: u32,
}

impl RampPlan {
    /// Plan a ramp from `current` to `target` over roughly `duration_ms`.
    ///
    /// Returns `None` when the (clamped) target equals the current speed.
    /// The interval is floored to whole milliseconds with a minimum of
    /// [`MIN_INTERVAL_MS`], so the ramp may run shorter or longer than
    /// requested.
    pub fn new(current: Speed, target: Speed, duration_ms: u32) -> Option<Self> {
        let diff = target.percent() as i16 - current.percent() as i16;
        let step_sign = StepSign::from_diff(diff)?;
        let step_count = diff.unsigned_abs() as u32;
        let interval_ms = (duration_ms / step_count).max(MIN_INTERVAL_MS);

        Some(Self {
            from: current,
            target,
            step_sign,
            step_count,
            interval_ms,
        })
    }

    /// Duration the ramp actually takes at its tick interval
    pub const fn nominal_duration_ms(&self) -> u64 {
        self.interval_ms as u64 * self.step_count as u64
    }
}

impl fmt::Display for RampPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} in {} steps of {}ms",
            self.from, self.target, self.step_count, self.interval_ms
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RampPlan {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "{} -> {} in {} steps of {}ms",
            self.from,
            self.target,
            self.step_count,
            self.interval_ms
        );
    }
}

/// Reload/prescaler for a ramp clock firing every `interval_ms`.
///
/// The reload is fixed and the prescaler is chosen so that
/// `(reload + 1) * (prescaler + 1)` timer cycles span the interval. A
/// prescaler outside `0..=max_prescaler` is saturated, which stretches or
/// shortens the tick.
pub fn timer_timing(
    timer_clock_hz: u32,
    interval_ms: u32,
    reload: u32,
    max_prescaler: u32,
) -> TimerTiming {
    let interval_ms = interval_ms.max(MIN_INTERVAL_MS) as u64;
    let cycles_per_tick = timer_clock_hz as u64 * interval_ms / 1000;
    let divisor = (cycles_per_tick / (reload as u64 + 1)).max(1);
    let prescaler = divisor - 1;

    let prescaler = if prescaler > max_prescaler as u64 {
        warn!(
            "ramp prescaler {} exceeds {} at {}Hz/{}ms, tick will run fast",
            prescaler, max_prescaler, timer_clock_hz, interval_ms
        );
        max_prescaler
    } else {
        prescaler as u32
    };

    TimerTiming {
        reload,
        prescaler,
        period_us: interval_ms * 1000,
    }
}
