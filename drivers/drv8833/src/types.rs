//! Direction, speed and ramp step value types

use core::fmt;

/// Bridge direction: which leg carries the duty cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Duty on channel A, channel B held low
    #[default]
    Forward,
    /// Duty on channel B, channel A held low
    Reverse,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => write!(f, "forward"),
            Self::Reverse => write!(f, "reverse"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Direction {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Forward => defmt::write!(fmt, "Forward"),
            Self::Reverse => defmt::write!(fmt, "Reverse"),
        }
    }
}

/// Motor speed as a duty cycle percentage, always within `0..=100`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Speed(u8);

impl Speed {
    /// Stopped
    pub const ZERO: Self = Self(0);

    /// Full duty
    pub const MAX: Self = Self(100);

    /// Create a speed, clamping anything above 100 to 100
    pub const fn new(percent: u8) -> Self {
        if percent > Self::MAX.0 {
            Self::MAX
        } else {
            Self(percent)
        }
    }

    /// Get the raw percentage
    pub const fn percent(self) -> u8 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Compare value for this speed on a timer whose reload is `period`
    pub const fn duty(self, period: u32) -> u32 {
        (period as u64 * self.0 as u64 / 100) as u32
    }

    /// One percent further in the direction of `sign`, saturating at the bounds
    pub const fn stepped(self, sign: StepSign) -> Self {
        match sign {
            StepSign::Up => Self::new(self.0.saturating_add(1)),
            StepSign::Down => Self(self.0.saturating_sub(1)),
        }
    }
}

impl From<u8> for Speed {
    fn from(percent: u8) -> Self {
        Self::new(percent)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Speed {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}%", self.0);
    }
}

/// Direction of each ramp tick's speed adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepSign {
    #[default]
    Up,
    Down,
}

impl StepSign {
    /// Sign of a speed difference; `None` when there is nothing to do
    pub const fn from_diff(diff: i16) -> Option<Self> {
        if diff > 0 {
            Some(Self::Up)
        } else if diff < 0 {
            Some(Self::Down)
        } else {
            None
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StepSign {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Up => defmt::write!(fmt, "+1"),
            Self::Down => defmt::write!(fmt, "-1"),
        }
    }
}
