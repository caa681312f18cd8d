//! # Alternate Function I/Os
use crate::pac::{afio, AFIO};
use crate::rcc::Rcc;

pub trait AfioExt {
    fn constrain(self, rcc: &mut Rcc) -> Parts;
}

impl AfioExt for AFIO {
    fn constrain(self, rcc: &mut Rcc) -> Parts {
        rcc.enable_and_reset::<AFIO>();

        Parts {
            mapr: MAPR { afio: self.regs() },
        }
    }
}

/// HAL wrapper around the AFIO registers
///
/// Aquired by calling [constrain](trait.AfioExt.html#constrain) on the `AFIO` handle
///
/// ```rust,ignore
/// let p = pac::Peripherals::take().unwrap();
/// let mut rcc = p.RCC.constrain();
/// let mut afio = p.AFIO.constrain(&mut rcc);
/// ```
pub struct Parts {
    pub mapr: MAPR,
}

/// AF remap and debug I/O configuration register (MAPR)
///
/// Aquired through the [Parts](struct.Parts.html) struct.
pub struct MAPR {
    afio: &'static afio::RegisterBlock,
}

impl MAPR {
    /// Read-modify-write of MAPR
    ///
    /// `SWJ_CFG` is write-only and reads back as zero, so it is rewritten with the reset
    /// configuration (full SWJ) on every access.
    pub fn modify_mapr<F>(&mut self, mod_fn: F)
    where
        F: FnOnce(u32) -> u32,
    {
        const DEBUG_BITS: u32 = 0b000;
        self.afio.mapr.modify(|r| {
            (mod_fn(r) & !(0b111 << afio::mapr::SWJ_CFG)) | (DEBUG_BITS << afio::mapr::SWJ_CFG)
        });
    }

    /// Raw MAPR contents
    pub fn read(&self) -> u32 {
        self.afio.mapr.read()
    }
}

/// Peripherals whose pins can be moved by MAPR
pub trait Remap {
    /// Writes the remap field of the peripheral; `0` selects the default mapping
    fn remap(mapr: &mut MAPR, to: u8);
}

macro_rules! remap {
    ($($PER:ident: ($offset:path, $mask:literal),)+) => {
        $(
            impl Remap for crate::pac::$PER {
                fn remap(mapr: &mut MAPR, to: u8) {
                    mapr.modify_mapr(|r| {
                        (r & !($mask << $offset)) | ((u32::from(to) & $mask) << $offset)
                    });
                }
            }
        )+
    }
}

remap! {
    USART1: (afio::mapr::USART1_REMAP, 0b1),
    USART2: (afio::mapr::USART2_REMAP, 0b1),
    USART3: (afio::mapr::USART3_REMAP, 0b11),
}
