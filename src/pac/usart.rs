//! Universal synchronous asynchronous receiver transmitter registers

use bitflags::bitflags;

use super::Reg;

#[repr(C)]
pub struct RegisterBlock {
    /// 0x00 - Status register
    pub sr: Reg,
    /// 0x04 - Data register
    pub dr: Reg,
    /// 0x08 - Baud rate register
    pub brr: Reg,
    /// 0x0c - Control register 1
    pub cr1: Reg,
    /// 0x10 - Control register 2
    pub cr2: Reg,
    /// 0x14 - Control register 3
    pub cr3: Reg,
    /// 0x18 - Guard time and prescaler register
    pub gtpr: Reg,
}

bitflags! {
    /// Status register (SR) flags
    pub struct Sr: u32 {
        /// Parity error
        const PE = 1 << 0;
        /// Framing error
        const FE = 1 << 1;
        /// Noise error
        const NE = 1 << 2;
        /// Overrun error
        const ORE = 1 << 3;
        /// Idle line detected
        const IDLE = 1 << 4;
        /// Read data register not empty
        const RXNE = 1 << 5;
        /// Transmission complete
        const TC = 1 << 6;
        /// Transmit data register empty
        const TXE = 1 << 7;
        /// LIN break detection
        const LBD = 1 << 8;
        /// CTS flag
        const CTS = 1 << 9;
    }
}

bitflags! {
    /// Control register 1 (CR1) bits
    pub struct Cr1: u32 {
        const SBK = 1 << 0;
        const RWU = 1 << 1;
        /// Receiver enable
        const RE = 1 << 2;
        /// Transmitter enable
        const TE = 1 << 3;
        const IDLEIE = 1 << 4;
        const RXNEIE = 1 << 5;
        const TCIE = 1 << 6;
        const TXEIE = 1 << 7;
        const PEIE = 1 << 8;
        /// Odd parity selection
        const PS = 1 << 9;
        /// Parity control enable
        const PCE = 1 << 10;
        const WAKE = 1 << 11;
        /// 9 bit word length
        const M = 1 << 12;
        /// USART enable
        const UE = 1 << 13;
    }
}

/// CR2 STOP field offset (two bits)
pub const CR2_STOP: u8 = 12;

impl Sr {
    /// Any of the receive error flags
    pub const ERRORS: Self = Self::from_bits_truncate(
        Self::PE.bits() | Self::FE.bits() | Self::NE.bits() | Self::ORE.bits(),
    );
}

impl RegisterBlock {
    /// Register block holding the power-on reset values
    pub const fn reset() -> Self {
        Self {
            sr: Reg::new(Sr::TXE.bits() | Sr::TC.bits()),
            dr: Reg::new(0),
            brr: Reg::new(0),
            cr1: Reg::new(0),
            cr2: Reg::new(0),
            cr3: Reg::new(0),
            gtpr: Reg::new(0),
        }
    }

    /// Snapshot of the status flags
    #[inline(always)]
    pub fn flags(&self) -> Sr {
        Sr::from_bits_truncate(self.sr.read())
    }
}
