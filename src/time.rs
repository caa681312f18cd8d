//! Time units
//!
//! Frequencies and durations are the [`fugit`] types; this module re-exports
//! them under the names used throughout the crate and adds the baud-rate unit
//! [`Bps`].
//!
//! ```rust
//! use stm32f1_bare::time::{Hertz, RateExtU32, U32Ext};
//!
//! let sysclk: Hertz = 8.MHz();
//! let baud = 115_200.bps();
//!
//! assert_eq!(sysclk.raw(), 8_000_000);
//! assert_eq!(baud.0, 115_200);
//! ```

pub use fugit::{
    HertzU32 as Hertz, KilohertzU32 as KiloHertz, MegahertzU32 as MegaHertz,
    MicrosDurationU32 as MicroSeconds, MillisDurationU32 as MilliSeconds, RateExtU32,
};

/// Bits per second
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Bps(pub u32);

impl Bps {
    /// Bits per second as a plain number
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Extension trait that adds convenience methods to the `u32` type
pub trait U32Ext {
    /// Wrap in `Bps`
    fn bps(self) -> Bps;
}

impl U32Ext for u32 {
    fn bps(self) -> Bps {
        Bps(self)
    }
}
