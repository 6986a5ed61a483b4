//! Driver error type

use core::fmt;

use motor_hal::HalError;

/// Result type used throughout the driver
pub type DriverResult<T> = Result<T, DriverError>;

/// Driver failures
///
/// Rejected or redundant commands are not errors; they return `Ok` with a
/// status describing what happened. Errors are reserved for invalid
/// configuration and peripheral failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// A peripheral operation failed
    Hal(HalError),
    /// Both bridge legs are mapped to the same PWM channel
    ChannelConflict,
    /// Ramp timer reload value of zero
    InvalidReload,
}

impl From<HalError> for DriverError {
    fn from(value: HalError) -> Self {
        Self::Hal(value)
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hal(err) => write!(f, "peripheral error: {err}"),
            Self::ChannelConflict => write!(f, "both bridge legs use the same PWM channel"),
            Self::InvalidReload => write!(f, "ramp timer reload must be non-zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Hal(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DriverError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Hal(err) => defmt::write!(fmt, "Hal({})", err),
            Self::ChannelConflict => defmt::write!(fmt, "ChannelConflict"),
            Self::InvalidReload => defmt::write!(fmt, "InvalidReload"),
        }
    }
}
