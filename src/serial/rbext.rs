use crate::pac::usart::{self, Cr1, Sr};

use super::{config, Error};

/// Round-to-nearest divisor of `clock` for `baud`
///
/// `baud` must be non-zero; `clock + baud / 2` is not checked for overflow.
#[inline]
pub const fn baud_divisor(clock: u32, baud: u32) -> u32 {
    (clock + baud / 2) / baud
}

/// Register-level operations of a USART block
pub trait RBExt {
    /// Programs BRR with the divisor of `clock` for `baud`
    fn set_baud_rate(&self, clock: u32, baud: u32);
    /// Programs word length, parity and stop bits
    fn set_frame_format(&self, config: &config::Config);
    fn read_u16(&self) -> nb::Result<u16, Error>;
    fn write_u16(&self, word: u16) -> nb::Result<(), Error>;
    fn flush(&self) -> nb::Result<(), Error>;
    fn flags(&self) -> Sr;

    #[inline(always)]
    fn read_u8(&self) -> nb::Result<u8, Error> {
        // Delegate to u16 version, then truncate to 8 bits
        self.read_u16().map(|word16| word16 as u8)
    }

    #[inline(always)]
    fn write_u8(&self, word: u8) -> nb::Result<(), Error> {
        // Delegate to u16 version
        self.write_u16(u16::from(word))
    }

    fn bread_all_u8(&self, buffer: &mut [u8]) -> Result<(), Error> {
        for b in buffer.iter_mut() {
            *b = nb::block!(self.read_u8())?;
        }
        Ok(())
    }

    fn bwrite_all_u8(&self, buffer: &[u8]) -> Result<(), Error> {
        for &b in buffer {
            nb::block!(self.write_u8(b))?;
        }
        Ok(())
    }

    #[inline(always)]
    fn bflush(&self) -> Result<(), Error> {
        nb::block!(self.flush())
    }

    #[inline(always)]
    fn is_rx_not_empty(&self) -> bool {
        self.flags().contains(Sr::RXNE)
    }

    #[inline(always)]
    fn is_tx_empty(&self) -> bool {
        self.flags().contains(Sr::TXE)
    }
}

impl RBExt for usart::RegisterBlock {
    fn set_baud_rate(&self, clock: u32, baud: u32) {
        self.brr.write(baud_divisor(clock, baud));
    }

    fn set_frame_format(&self, config: &config::Config) {
        // Unlike most uart devices, the "word length" of this usart device refers to
        // the size of the data plus the parity bit. I.e. "word length"=8, parity=even
        // results in 7 bits of data. Therefore, in order to get 8 bits and one parity
        // bit, we need to set the "word" length to 9 when using parity bits.
        let mut cr1 = Cr1::empty();
        cr1.set(Cr1::M, config.wordlength == config::WordLength::Bits9);
        match config.parity {
            config::Parity::ParityNone => {}
            config::Parity::ParityEven => cr1.insert(Cr1::PCE),
            config::Parity::ParityOdd => cr1.insert(Cr1::PCE | Cr1::PS),
        }
        self.cr1
            .modify(|r| (r & !(Cr1::M | Cr1::PCE | Cr1::PS).bits()) | cr1.bits());

        self.cr2
            .write_field(usart::CR2_STOP, 0b11, config.stopbits.bits());
    }

    fn read_u16(&self) -> nb::Result<u16, Error> {
        let sr = self.flags();

        // A pending frame is returned even if it came with an error flag;
        // reading DR after SR clears those flags
        if sr.contains(Sr::RXNE) {
            // NOTE atomic read from stateless register
            return Ok((self.dr.read() & 0x1FF) as u16);
        }

        // An error without data still requires the dr to be read to clear
        if sr.intersects(Sr::ERRORS) {
            self.dr.read();
        }

        Err(if sr.contains(Sr::PE) {
            Error::Parity.into()
        } else if sr.contains(Sr::FE) {
            Error::FrameFormat.into()
        } else if sr.contains(Sr::NE) {
            Error::Noise.into()
        } else if sr.contains(Sr::ORE) {
            Error::Overrun.into()
        } else {
            nb::Error::WouldBlock
        })
    }

    fn write_u16(&self, word: u16) -> nb::Result<(), Error> {
        if self.flags().contains(Sr::TXE) {
            // NOTE atomic write to stateless register
            self.dr.write(u32::from(word) & 0x1FF);
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    fn flush(&self) -> nb::Result<(), Error> {
        if self.flags().contains(Sr::TC) {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    #[inline(always)]
    fn flags(&self) -> Sr {
        usart::RegisterBlock::flags(self)
    }
}
