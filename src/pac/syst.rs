//! SysTick: System Timer

use super::Reg;

#[repr(C)]
pub struct RegisterBlock {
    /// Control and Status
    pub csr: Reg,
    /// Reload Value
    pub rvr: Reg,
    /// Current Value
    pub cvr: Reg,
    /// Calibration Value
    pub calib: Reg,
}

const SYST_CSR_ENABLE: u32 = 1 << 0;
const SYST_CSR_TICKINT: u32 = 1 << 1;
const SYST_CSR_CLKSOURCE: u32 = 1 << 2;
const SYST_CSR_COUNTFLAG: u8 = 16;

/// The reload value is a 24 bit field
pub const SYST_RVR_MAX: u32 = 0x00FF_FFFF;

/// SysTick clock source
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SystClkSource {
    /// Core-provided clock
    Core,
    /// External reference clock (HCLK / 8)
    External,
}

impl RegisterBlock {
    /// Register block holding the power-on reset values
    pub const fn reset() -> Self {
        Self {
            csr: Reg::new(0),
            rvr: Reg::new(0),
            cvr: Reg::new(0),
            // 9 ms calibration value at 72 MHz / 8
            calib: Reg::new(0x0001_1940),
        }
    }

    /// Sets the reload value, truncated to 24 bits
    #[inline]
    pub fn set_reload(&self, value: u32) {
        self.rvr.write(value & SYST_RVR_MAX)
    }

    /// Clears the current value; any write does, and also clears COUNTFLAG
    #[inline]
    pub fn clear_current(&self) {
        self.cvr.write(0)
    }

    #[inline]
    pub fn set_clock_source(&self, clk_source: SystClkSource) {
        match clk_source {
            SystClkSource::External => self.csr.clear_bits(SYST_CSR_CLKSOURCE),
            SystClkSource::Core => self.csr.set_bits(SYST_CSR_CLKSOURCE),
        }
    }

    #[inline]
    pub fn enable_counter(&self) {
        self.csr.set_bits(SYST_CSR_ENABLE)
    }

    #[inline]
    pub fn disable_counter(&self) {
        self.csr.clear_bits(SYST_CSR_ENABLE)
    }

    #[inline]
    pub fn disable_interrupt(&self) {
        self.csr.clear_bits(SYST_CSR_TICKINT)
    }

    /// Checks if the counter wrapped (underflowed) since the last check
    ///
    /// Each wrap is reported once. Reading CSR clears COUNTFLAG on hardware;
    /// a RAM-backed block needs the explicit clear.
    #[inline]
    pub fn has_wrapped(&self) -> bool {
        let wrapped = self.csr.bit_is_set(SYST_CSR_COUNTFLAG);
        if wrapped {
            self.csr.clear_bits(1 << SYST_CSR_COUNTFLAG);
        }
        wrapped
    }
}
