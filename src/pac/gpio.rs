//! General purpose I/O port registers

use super::Reg;

#[repr(C)]
pub struct RegisterBlock {
    /// 0x00 - Port configuration register low (pins 0..=7)
    pub crl: Reg,
    /// 0x04 - Port configuration register high (pins 8..=15)
    pub crh: Reg,
    /// 0x08 - Port input data register
    pub idr: Reg,
    /// 0x0c - Port output data register
    pub odr: Reg,
    /// 0x10 - Port bit set/reset register
    pub bsrr: Reg,
    /// 0x14 - Port bit reset register
    pub brr: Reg,
    /// 0x18 - Port configuration lock register
    pub lckr: Reg,
}

impl RegisterBlock {
    /// Register block holding the power-on reset values (every pin a floating input)
    pub const fn reset() -> Self {
        Self {
            crl: Reg::new(0x4444_4444),
            crh: Reg::new(0x4444_4444),
            idr: Reg::new(0),
            odr: Reg::new(0),
            bsrr: Reg::new(0),
            brr: Reg::new(0),
            lckr: Reg::new(0),
        }
    }
}
