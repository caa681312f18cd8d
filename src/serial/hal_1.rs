use super::*;

mod nb {
    use super::{Error, Instance, Rx, Serial, Tx};
    use embedded_hal_nb::serial::ErrorKind;
    use embedded_hal_nb::{serial, serial::ErrorType};

    impl embedded_hal_nb::serial::Error for Error {
        fn kind(&self) -> ErrorKind {
            match self {
                Error::Overrun => ErrorKind::Overrun,
                Error::FrameFormat => ErrorKind::FrameFormat,
                Error::Parity => ErrorKind::Parity,
                Error::Noise => ErrorKind::Noise,
            }
        }
    }

    impl<USART: Instance> ErrorType for Tx<USART> {
        type Error = Error;
    }

    impl<USART: Instance> ErrorType for Rx<USART> {
        type Error = Error;
    }

    impl<USART: Instance, PINS> ErrorType for Serial<USART, PINS> {
        type Error = Error;
    }

    impl<USART: Instance> serial::Write<u8> for Tx<USART> {
        fn write(&mut self, word: u8) -> nb::Result<(), Self::Error> {
            self.write_u8(word)
        }

        fn flush(&mut self) -> nb::Result<(), Self::Error> {
            self.flush()
        }
    }

    impl<USART: Instance> serial::Write<u16> for Tx<USART> {
        fn write(&mut self, word: u16) -> nb::Result<(), Self::Error> {
            self.write_u16(word)
        }

        fn flush(&mut self) -> nb::Result<(), Self::Error> {
            self.flush()
        }
    }

    impl<USART: Instance> serial::Read<u8> for Rx<USART> {
        fn read(&mut self) -> nb::Result<u8, Self::Error> {
            self.read()
        }
    }

    impl<USART: Instance> serial::Read<u16> for Rx<USART> {
        fn read(&mut self) -> nb::Result<u16, Self::Error> {
            self.read_u16()
        }
    }

    impl<USART: Instance, PINS> serial::Write<u8> for Serial<USART, PINS> {
        fn write(&mut self, word: u8) -> nb::Result<(), Self::Error> {
            self.tx.write_u8(word)
        }

        fn flush(&mut self) -> nb::Result<(), Self::Error> {
            self.tx.flush()
        }
    }

    impl<USART: Instance, PINS> serial::Read<u8> for Serial<USART, PINS> {
        fn read(&mut self) -> nb::Result<u8, Error> {
            self.rx.read()
        }
    }
}

mod io {
    use super::super::{Error, Instance, Rx, Serial, Tx};
    use embedded_io::{Read, Write};

    impl embedded_io::Error for Error {
        fn kind(&self) -> embedded_io::ErrorKind {
            match self {
                Error::Overrun => embedded_io::ErrorKind::OutOfMemory,
                Error::FrameFormat | Error::Parity | Error::Noise => {
                    embedded_io::ErrorKind::InvalidData
                }
            }
        }
    }

    impl<USART: Instance, PINS> embedded_io::ErrorType for Serial<USART, PINS> {
        type Error = Error;
    }

    impl<USART: Instance> embedded_io::ErrorType for Tx<USART> {
        type Error = Error;
    }

    impl<USART: Instance> embedded_io::ErrorType for Rx<USART> {
        type Error = Error;
    }

    impl<USART: Instance> Write for Tx<USART> {
        /// Blocks for the first byte, then queues as many more as fit without waiting
        fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
            let Some((first, rest)) = bytes.split_first() else {
                return Ok(0);
            };
            nb::block!(self.write_u8(*first))?;
            let mut i = 1;
            for byte in rest {
                match self.write_u8(*byte) {
                    Ok(()) => i += 1,
                    Err(nb::Error::WouldBlock) => break,
                    Err(nb::Error::Other(e)) => return Err(e),
                }
            }
            Ok(i)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.bflush()
        }
    }

    impl<USART: Instance> Read for Rx<USART> {
        /// Blocks for the first byte, then drains whatever else has already arrived
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let Some((first, rest)) = buf.split_first_mut() else {
                return Ok(0);
            };
            *first = nb::block!(self.read())?;
            let mut i = 1;
            for slot in rest {
                match self.read() {
                    Ok(b) => {
                        *slot = b;
                        i += 1;
                    }
                    Err(nb::Error::WouldBlock) => break,
                    Err(nb::Error::Other(e)) => return Err(e),
                }
            }
            Ok(i)
        }
    }

    impl<USART: Instance, PINS> Write for Serial<USART, PINS>
    where
        Tx<USART>: Write<Error = Error>,
    {
        fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
            self.tx.write(bytes)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Write::flush(&mut self.tx)
        }
    }

    impl<USART: Instance, PINS> Read for Serial<USART, PINS> {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            Read::read(&mut self.rx, buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use embedded_hal_nb::serial::{Error as _, ErrorKind};

    use super::Error;
    use crate::pac::{sim, usart, usart::Sr, USART1};
    use crate::serial::{Instance, Rx, Tx};

    fn channels() -> (Tx<USART1>, Rx<USART1>, &'static usart::RegisterBlock) {
        let rb = USART1::bind(sim(usart::RegisterBlock::reset())).registers();
        (Tx::new(rb), Rx::new(rb), rb)
    }

    #[test]
    fn error_kinds() {
        assert_eq!(Error::Overrun.kind(), ErrorKind::Overrun);
        assert_eq!(Error::Noise.kind(), ErrorKind::Noise);
        assert_eq!(
            embedded_io::Error::kind(&Error::Parity),
            embedded_io::ErrorKind::InvalidData
        );
    }

    #[test]
    fn io_write_reports_progress() {
        let (mut tx, _rx, rb) = channels();

        assert_eq!(embedded_io::Write::write(&mut tx, b""), Ok(0));
        // TXE stays set in simulation, so every byte is accepted
        assert_eq!(embedded_io::Write::write(&mut tx, b"ok"), Ok(2));
        assert_eq!(rb.dr.read(), u32::from(b'k'));
    }

    #[test]
    fn io_read_stops_when_the_receiver_runs_dry() {
        let (_tx, mut rx, rb) = channels();

        rb.dr.write(u32::from(b'z'));
        rb.sr.write(Sr::RXNE.bits());
        let mut buf = [0; 1];
        assert_eq!(embedded_io::Read::read(&mut rx, &mut buf), Ok(1));
        assert_eq!(buf, [b'z']);

        rb.sr.write(Sr::ORE.bits());
        assert_eq!(
            embedded_io::Read::read(&mut rx, &mut buf),
            Err(Error::Overrun)
        );
    }

    #[test]
    fn nb_traits_delegate() {
        let (mut tx, mut rx, rb) = channels();

        embedded_hal_nb::serial::Write::<u8>::write(&mut tx, b'q').unwrap();
        assert_eq!(rb.dr.read(), u32::from(b'q'));
        rb.sr.write(0);
        assert_eq!(
            embedded_hal_nb::serial::Read::<u8>::read(&mut rx),
            Err(nb::Error::WouldBlock)
        );
    }
}
