//! Hardware Abstraction Layer (HAL) for motor driver peripherals
//!
//! This crate provides vendor-agnostic traits for the peripherals a PWM
//! motor driver depends on: a PWM-capable timer, a periodic interrupt timer
//! used as a ramp clock, and the clock tree that feeds it.
//!
//! With the `std` feature enabled, [`sim`] provides simulated peripherals for
//! host-side tests and demos.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

pub mod error;
pub mod pwm;
pub mod timer;
pub mod clock;

#[cfg(feature = "std")]
pub mod sim;

// Re-export commonly used types
pub use clock::{ApbPrescaler, BusClock, ClockSource};
pub use error::{HalError, HalResult};
pub use pwm::{ChannelId, PwmTimer};
pub use timer::{RampTimer, TimerTiming};
