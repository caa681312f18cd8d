//! Reset and clock control registers

use super::Reg;

#[repr(C)]
pub struct RegisterBlock {
    /// 0x00 - Clock control register
    pub cr: Reg,
    /// 0x04 - Clock configuration register
    pub cfgr: Reg,
    /// 0x08 - Clock interrupt register
    pub cir: Reg,
    /// 0x0c - APB2 peripheral reset register
    pub apb2rstr: Reg,
    /// 0x10 - APB1 peripheral reset register
    pub apb1rstr: Reg,
    /// 0x14 - AHB peripheral clock enable register
    pub ahbenr: Reg,
    /// 0x18 - APB2 peripheral clock enable register
    pub apb2enr: Reg,
    /// 0x1c - APB1 peripheral clock enable register
    pub apb1enr: Reg,
    /// 0x20 - Backup domain control register
    pub bdcr: Reg,
    /// 0x24 - Control/status register
    pub csr: Reg,
}

impl RegisterBlock {
    /// Register block holding the power-on reset values
    pub const fn reset() -> Self {
        Self {
            // HSION, HSIRDY, HSITRIM = 16
            cr: Reg::new(0x0000_0083),
            cfgr: Reg::new(0),
            cir: Reg::new(0),
            apb2rstr: Reg::new(0),
            apb1rstr: Reg::new(0),
            // SRAMEN, FLITFEN
            ahbenr: Reg::new(0x0000_0014),
            apb2enr: Reg::new(0),
            apb1enr: Reg::new(0),
            bdcr: Reg::new(0),
            csr: Reg::new(0x0C00_0000),
        }
    }
}
