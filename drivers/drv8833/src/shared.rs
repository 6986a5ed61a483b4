//! Interrupt-safe driver slot
//!
//! The ramp clock interrupt and foreground code both mutate the motor state.
//! [`SharedDriver`] keeps the driver in a `critical_section::Mutex`, so every
//! command and every tick runs with interrupts masked and cannot interleave.

use core::cell::RefCell;

use critical_section::Mutex;
use motor_hal::{ClockSource, PwmTimer, RampTimer};

use crate::config::DriverConfig;
use crate::driver::{Drv8833, TickOutcome};
use crate::error::DriverResult;

/// Static home for a [`Drv8833`] shared with its ramp interrupt
pub struct SharedDriver<P, R, C> {
    slot: Mutex<RefCell<Option<Drv8833<P, R, C>>>>,
}

impl<P, R, C> SharedDriver<P, R, C> {
    /// Create an empty slot, usable in a `static`
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(RefCell::new(None)),
        }
    }

    /// Whether a driver is installed
    pub fn is_installed(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow_ref(cs).is_some())
    }
}

impl<P, R, C> Default for SharedDriver<P, R, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, R, C> SharedDriver<P, R, C>
where
    P: PwmTimer,
    R: RampTimer,
    C: ClockSource,
{
    /// Put a driver into the slot, returning any previous one
    pub fn install(&self, driver: Drv8833<P, R, C>) -> Option<Drv8833<P, R, C>> {
        critical_section::with(|cs| self.slot.borrow_ref_mut(cs).replace(driver))
    }

    /// Initialize a driver from `config` and install it.
    ///
    /// A previously installed driver is torn down.
    pub fn init(&self, config: DriverConfig<P, R, C>) -> DriverResult<()> {
        let driver = Drv8833::init(config)?;
        if let Some(previous) = self.install(driver) {
            previous.destroy();
        }
        Ok(())
    }

    /// Remove the driver; later interrupts become no-ops
    pub fn take(&self) -> Option<Drv8833<P, R, C>> {
        critical_section::with(|cs| self.slot.borrow_ref_mut(cs).take())
    }

    /// Run `f` on the driver inside a critical section.
    ///
    /// Returns `None` when no driver is installed.
    pub fn with<F, T>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&mut Drv8833<P, R, C>) -> T,
    {
        critical_section::with(|cs| self.slot.borrow_ref_mut(cs).as_mut().map(f))
    }

    /// Entry point for the ramp clock interrupt vector
    pub fn on_ramp_interrupt(&self) -> DriverResult<TickOutcome> {
        self.with(|driver| driver.on_ramp_tick())
            .unwrap_or(Ok(TickOutcome::Ignored))
    }

    /// Tear down the installed driver and return its peripherals
    pub fn destroy(&self) -> Option<DriverConfig<P, R, C>> {
        self.take().map(Drv8833::destroy)
    }
}
