//! Peripheral bindings supplied at init time

use motor_hal::ChannelId;

use crate::error::{DriverError, DriverResult};

/// Ramp timer auto-reload used when deriving the prescaler
pub const DEFAULT_RAMP_RELOAD: u32 = 999;

/// Driver configuration
///
/// All peripheral bindings are required. The PWM timer must already be
/// counting; the driver only starts and stops its output channels.
#[derive(Debug)]
pub struct DriverConfig<P, R, C> {
    /// PWM timer driving both bridge inputs
    pub pwm: P,
    /// Channel wired to the forward leg (IN1)
    pub channel_a: ChannelId,
    /// Channel wired to the reverse leg (IN2)
    pub channel_b: ChannelId,
    /// Timer used purely as the ramp interrupt source
    pub ramp_timer: R,
    /// Clock tree of the bus the ramp timer is on
    pub clock: C,
    /// Fixed auto-reload value for the ramp timer
    pub ramp_reload: u32,
}

impl<P, R, C> DriverConfig<P, R, C> {
    pub fn new(
        pwm: P,
        channel_a: ChannelId,
        channel_b: ChannelId,
        ramp_timer: R,
        clock: C,
    ) -> Self {
        Self {
            pwm,
            channel_a,
            channel_b,
            ramp_timer,
            clock,
            ramp_reload: DEFAULT_RAMP_RELOAD,
        }
    }

    /// Sets the ramp timer auto-reload value.
    ///
    /// A larger reload leaves a smaller prescaler, which matters for long
    /// tick intervals on fast timer clocks.
    pub fn with_ramp_reload(mut self, reload: u32) -> Self {
        self.ramp_reload = reload;
        self
    }

    /// Check the bindings are usable
    pub fn validate(&self) -> DriverResult<()> {
        if self.channel_a == self.channel_b {
            return Err(DriverError::ChannelConflict);
        }
        if self.ramp_reload == 0 {
            return Err(DriverError::InvalidReload);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(a: u8, b: u8) -> DriverConfig<(), (), ()> {
        DriverConfig::new((), ChannelId(a), ChannelId(b), (), ())
    }

    #[test]
    fn default_reload() {
        assert_eq!(config(1, 2).ramp_reload, DEFAULT_RAMP_RELOAD);
        assert!(config(1, 2).validate().is_ok());
    }

    #[test]
    fn rejects_shared_channel() {
        assert_eq!(config(3, 3).validate(), Err(DriverError::ChannelConflict));
    }

    #[test]
    fn rejects_zero_reload() {
        let cfg = config(1, 2).with_ramp_reload(0);
        assert_eq!(cfg.validate(), Err(DriverError::InvalidReload));
    }
}
