//! PWM timer abstraction

use core::fmt;

use crate::error::HalResult;

/// Output channel of a PWM timer
///
/// Identifiers are vendor-defined; on STM32 parts these are the timer
/// capture/compare channel numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelId(pub u8);

impl ChannelId {
    /// Create a channel identifier
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw channel number
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CH{}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ChannelId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "CH{}", self.0);
    }
}

/// Timer peripheral generating PWM on several output channels
///
/// The timer itself is expected to be configured and counting already; the
/// trait only covers per-channel output control. A compare value equal to
/// [`reload`](PwmTimer::reload) is 100% duty.
pub trait PwmTimer {
    /// Enable PWM output on a channel
    fn start_channel(&mut self, channel: ChannelId) -> HalResult<()>;

    /// Disable PWM output on a channel
    fn stop_channel(&mut self, channel: ChannelId) -> HalResult<()>;

    /// Get the configured auto-reload value (maximum count)
    fn reload(&self) -> u32;

    /// Set the compare value of a channel
    fn set_compare(&mut self, channel: ChannelId, value: u32) -> HalResult<()>;
}
