//! Alternate function I/O registers

use super::Reg;

#[repr(C)]
pub struct RegisterBlock {
    /// 0x00 - Event control register
    pub evcr: Reg,
    /// 0x04 - AF remap and debug I/O configuration register
    pub mapr: Reg,
    /// 0x08..0x18 - External interrupt configuration registers 1-4
    pub exticr: [Reg; 4],
    _reserved: Reg,
    /// 0x1c - AF remap and debug I/O configuration register 2
    pub mapr2: Reg,
}

/// MAPR field offsets
pub mod mapr {
    pub const USART1_REMAP: u8 = 2;
    pub const USART2_REMAP: u8 = 3;
    /// Two bit field
    pub const USART3_REMAP: u8 = 4;
    /// Write-only three bit field
    pub const SWJ_CFG: u8 = 24;
}

impl RegisterBlock {
    /// Register block holding the power-on reset values
    pub const fn reset() -> Self {
        Self {
            evcr: Reg::new(0),
            mapr: Reg::new(0),
            exticr: [Reg::new(0), Reg::new(0), Reg::new(0), Reg::new(0)],
            _reserved: Reg::new(0),
            mapr2: Reg::new(0),
        }
    }
}
