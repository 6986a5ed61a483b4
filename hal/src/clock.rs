//! Clock tree queries for timer peripherals

use core::fmt;

/// Bit offset of the APB1 prescaler field (PPRE1) in STM32F4 `RCC_CFGR`
pub const STM32F4_PPRE1_SHIFT: u32 = 10;

/// Bit offset of the APB2 prescaler field (PPRE2) in STM32F4 `RCC_CFGR`
pub const STM32F4_PPRE2_SHIFT: u32 = 13;

/// APB bus prescaler setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ApbPrescaler {
    Div1,
    Div2,
    Div4,
    Div8,
    Div16,
}

impl ApbPrescaler {
    /// Decode the 3-bit PPREx register field.
    ///
    /// Any value with the top bit clear means "not divided".
    pub const fn from_bits(bits: u32) -> Self {
        match bits & 0b111 {
            0b100 => Self::Div2,
            0b101 => Self::Div4,
            0b110 => Self::Div8,
            0b111 => Self::Div16,
            _ => Self::Div1,
        }
    }

    /// Decode the prescaler field located at `shift` in a clock
    /// configuration register value.
    pub const fn from_register(value: u32, shift: u32) -> Self {
        Self::from_bits(value >> shift)
    }

    /// Divisor applied to the bus clock
    pub const fn divisor(self) -> u32 {
        match self {
            Self::Div1 => 1,
            Self::Div2 => 2,
            Self::Div4 => 4,
            Self::Div8 => 8,
            Self::Div16 => 16,
        }
    }

    /// Whether the bus runs slower than the clock it is derived from
    pub const fn divides_down(self) -> bool {
        !matches!(self, Self::Div1)
    }
}

impl fmt::Display for ApbPrescaler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.divisor())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ApbPrescaler {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "/{}", self.divisor());
    }
}

/// Clock tree service for the bus a timer hangs off
pub trait ClockSource {
    /// Current peripheral bus clock in hertz
    fn peripheral_clock_hz(&self) -> u32;

    /// Whether the bus prescaler divides by more than one
    fn is_bus_divided_down(&self) -> bool;

    /// Input clock of timers on this bus.
    ///
    /// Timer kernels run at twice the bus clock whenever the bus prescaler
    /// is not 1.
    fn timer_clock_hz(&self) -> u32 {
        let pclk = self.peripheral_clock_hz();
        if self.is_bus_divided_down() {
            pclk.saturating_mul(2)
        } else {
            pclk
        }
    }
}

/// Bus clock snapshot: frequency plus prescaler setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusClock {
    pclk_hz: u32,
    prescaler: ApbPrescaler,
}

impl BusClock {
    /// Create a bus clock description
    pub const fn new(pclk_hz: u32, prescaler: ApbPrescaler) -> Self {
        Self { pclk_hz, prescaler }
    }

    /// Describe STM32F4 APB1 from its frequency and a raw `RCC_CFGR` value
    pub const fn stm32f4_apb1(pclk1_hz: u32, rcc_cfgr: u32) -> Self {
        Self::new(
            pclk1_hz,
            ApbPrescaler::from_register(rcc_cfgr, STM32F4_PPRE1_SHIFT),
        )
    }

    /// Bus prescaler setting
    pub const fn prescaler(&self) -> ApbPrescaler {
        self.prescaler
    }
}

impl ClockSource for BusClock {
    fn peripheral_clock_hz(&self) -> u32 {
        self.pclk_hz
    }

    fn is_bus_divided_down(&self) -> bool {
        self.prescaler.divides_down()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_ppre_field() {
        assert_eq!(ApbPrescaler::from_bits(0b000), ApbPrescaler::Div1);
        assert_eq!(ApbPrescaler::from_bits(0b011), ApbPrescaler::Div1);
        assert_eq!(ApbPrescaler::from_bits(0b100), ApbPrescaler::Div2);
        assert_eq!(ApbPrescaler::from_bits(0b101), ApbPrescaler::Div4);
        assert_eq!(ApbPrescaler::from_bits(0b111), ApbPrescaler::Div16);
    }

    #[test]
    fn decode_from_cfgr() {
        // PPRE1 = 0b101 (/4), PPRE2 = 0b100 (/2)
        let cfgr = (0b101 << STM32F4_PPRE1_SHIFT) | (0b100 << STM32F4_PPRE2_SHIFT);
        assert_eq!(
            ApbPrescaler::from_register(cfgr, STM32F4_PPRE1_SHIFT),
            ApbPrescaler::Div4
        );
        assert_eq!(
            ApbPrescaler::from_register(cfgr, STM32F4_PPRE2_SHIFT),
            ApbPrescaler::Div2
        );
    }

    #[test]
    fn timer_clock_doubles_when_divided() {
        let divided = BusClock::new(42_000_000, ApbPrescaler::Div4);
        assert_eq!(divided.timer_clock_hz(), 84_000_000);

        let undivided = BusClock::new(16_000_000, ApbPrescaler::Div1);
        assert_eq!(undivided.timer_clock_hz(), 16_000_000);
    }

    #[test]
    fn stm32f4_apb1_snapshot() {
        let clock = BusClock::stm32f4_apb1(42_000_000, 0b101 << STM32F4_PPRE1_SHIFT);
        assert!(clock.is_bus_divided_down());
        assert_eq!(clock.prescaler().divisor(), 4);
    }
}
