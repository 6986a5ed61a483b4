#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

//! # DRV8833
//!
//! Direction and speed control for one DC motor on a DRV8833 dual H-bridge.
//! The two bridge inputs are driven by two channels of a PWM timer; the
//! channel matching the current [`Direction`] carries the duty cycle and the
//! other is held at zero.
//!
//! Speed changes can be applied immediately ([`Drv8833::start`],
//! [`Drv8833::set_speed`]) or ramped ([`Drv8833::start_ramped`]). A ramp
//! reprograms a second timer as a periodic interrupt source, and each
//! interrupt moves the speed one percent towards the target through
//! [`Drv8833::on_ramp_tick`] until the target is reached.
//!
//! On target, keep the driver in a [`SharedDriver`] so foreground commands
//! and the interrupt handler are serialized by a critical section:
//!
//! ```ignore
//! static MOTOR: SharedDriver<Pwm, RampTim, Apb1> = SharedDriver::new();
//!
//! #[interrupt]
//! fn TIM6_DAC() {
//!     let _ = MOTOR.on_ramp_interrupt();
//! }
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod ramp;
pub mod shared;
pub mod state;
pub mod types;

pub use config::{DriverConfig, DEFAULT_RAMP_RELOAD};
pub use driver::{Drv8833, RampStatus, TickOutcome};
pub use error::{DriverError, DriverResult};
pub use ramp::RampPlan;
pub use shared::SharedDriver;
pub use state::{MotorState, Phase};
pub use types::{Direction, Speed, StepSign};

pub use motor_hal;
