//! # Reset & Control Clock
//!
//! The firmware runs from the reset clock tree: the 8 MHz internal RC
//! oscillator (HSI) drives SYSCLK directly, without PLL, and every bus
//! prescaler divides by one. [`Clocks`] records those frequencies so the
//! drivers can derive baud-rate divisors and SysTick reload values from them.

use core::ops::Deref;

use crate::pac::{rcc, RCC};
use crate::time::Hertz;

mod enable;

/// Frequency of the internal RC oscillator
pub const HSI: u32 = 8_000_000; // Hz

/// Extension trait that constrains the `RCC` peripheral
pub trait RccExt {
    /// Constrains the `RCC` peripheral so it plays nicely with the other abstractions
    fn constrain(self) -> Rcc;
}

impl RccExt for RCC {
    fn constrain(self) -> Rcc {
        Rcc {
            rb: self,
            clocks: Clocks::default(),
        }
    }
}

/// Constrained RCC peripheral
///
/// Aquired by calling the [constrain](trait.RccExt.html#tymethod.constrain) method
/// on the `RCC` handle
///
/// ```rust,ignore
/// let dp = pac::Peripherals::take().unwrap();
/// let mut rcc = dp.RCC.constrain();
/// ```
pub struct Rcc {
    rb: RCC,
    pub clocks: Clocks,
}

impl Rcc {
    /// Enables the bus clock of peripheral `P`
    #[inline]
    pub fn enable<P: Enable>(&mut self) {
        P::enable(&self.rb);
    }

    /// Enables and resets peripheral `P`
    #[inline]
    pub fn enable_and_reset<P: Enable + Reset>(&mut self) {
        P::enable(&self.rb);
        P::reset(&self.rb);
    }

    /// Returns ownership of the `RCC` handle
    pub fn release(self) -> RCC {
        self.rb
    }
}

impl Deref for Rcc {
    type Target = rcc::RegisterBlock;
    fn deref(&self) -> &Self::Target {
        &self.rb
    }
}

/// Advanced Peripheral Bus 1 (APB1) registers
pub struct APB1 {
    _0: (),
}

impl APB1 {
    fn enr(rcc: &rcc::RegisterBlock) -> &crate::pac::Reg {
        &rcc.apb1enr
    }

    fn rstr(rcc: &rcc::RegisterBlock) -> &crate::pac::Reg {
        &rcc.apb1rstr
    }
}

/// Advanced Peripheral Bus 2 (APB2) registers
pub struct APB2 {
    _0: (),
}

impl APB2 {
    fn enr(rcc: &rcc::RegisterBlock) -> &crate::pac::Reg {
        &rcc.apb2enr
    }

    fn rstr(rcc: &rcc::RegisterBlock) -> &crate::pac::Reg {
        &rcc.apb2rstr
    }
}

/// Frozen clock frequencies
///
/// The existence of this value indicates that the clock configuration can no longer be changed
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clocks {
    hclk: Hertz,
    pclk1: Hertz,
    pclk2: Hertz,
    sysclk: Hertz,
}

impl Default for Clocks {
    /// Clock tree right after reset: HSI, no PLL, all prescalers /1
    fn default() -> Self {
        Self {
            hclk: Hertz::from_raw(HSI),
            pclk1: Hertz::from_raw(HSI),
            pclk2: Hertz::from_raw(HSI),
            sysclk: Hertz::from_raw(HSI),
        }
    }
}

impl Clocks {
    /// Returns the frequency of the AHB
    pub const fn hclk(&self) -> Hertz {
        self.hclk
    }

    /// Returns the frequency of the APB1
    pub const fn pclk1(&self) -> Hertz {
        self.pclk1
    }

    /// Returns the frequency of the APB2
    pub const fn pclk2(&self) -> Hertz {
        self.pclk2
    }

    /// Returns the system (core) frequency
    pub const fn sysclk(&self) -> Hertz {
        self.sysclk
    }
}

pub trait GetBusFreq {
    fn get_frequency(clocks: &Clocks) -> Hertz;
}

impl<T> GetBusFreq for T
where
    T: RccBus,
    T::Bus: GetBusFreq,
{
    fn get_frequency(clocks: &Clocks) -> Hertz {
        T::Bus::get_frequency(clocks)
    }
}

impl GetBusFreq for APB1 {
    fn get_frequency(clocks: &Clocks) -> Hertz {
        clocks.pclk1
    }
}

impl GetBusFreq for APB2 {
    fn get_frequency(clocks: &Clocks) -> Hertz {
        clocks.pclk2
    }
}

/// Bus associated to peripheral
pub trait RccBus {
    /// Bus type;
    type Bus;
}

/// Enable/disable peripheral
pub trait Enable: RccBus {
    fn enable(rcc: &rcc::RegisterBlock);
    fn disable(rcc: &rcc::RegisterBlock);
    fn is_enabled(rcc: &rcc::RegisterBlock) -> bool;
}

/// Reset peripheral
pub trait Reset: RccBus {
    fn reset(rcc: &rcc::RegisterBlock);
}
