//! # Serial Communication (USART)
//!
//! This module contains the functions to utilize the USART (Universal
//! synchronous asynchronous receiver transmitter) in polling mode. Every
//! blocking operation spins on a status flag and has no timeout: with no peer
//! on the line, a read waits forever.
//!
//! ## Example usage:
//!
//! ```rust,ignore
//! let p = pac::Peripherals::take().unwrap();
//! let mut rcc = p.RCC.constrain();
//! let mut afio = p.AFIO.constrain(&mut rcc);
//! let mut gpioa = p.GPIOA.split(&mut rcc);
//!
//! // USART1 on Pins A9 and A10
//! let pin_tx = gpioa.pa9.into_alternate_push_pull(&mut gpioa.crh);
//! let pin_rx = gpioa.pa10.into_floating_input(&mut gpioa.crh);
//! // Create an interface struct for USART1 with 115200 Baud
//! let serial = p.USART1.serial(
//!     (pin_tx, pin_rx),
//!     &mut afio.mapr,
//!     Config::default().baudrate(115_200.bps()),
//!     &mut rcc,
//! );
//!
//! // separate into tx and rx channels
//! let (mut tx, mut rx) = serial.split();
//!
//! // Write 'R' to the USART
//! block!(tx.write_u8(b'R')).ok();
//! // Receive a byte from the USART and store it in "received"
//! let received = block!(rx.read()).unwrap();
//! ```

use core::marker::PhantomData;

use crate::afio::{Remap, MAPR};
use crate::gpio::{self, Alternate, Floating, Input, PushPull};
use crate::pac::{usart, USART1, USART2, USART3};
use crate::rcc::{Enable, GetBusFreq, Rcc, Reset};

pub mod config;
pub use config::Config;

mod hal_1;
mod rbext;
pub use rbext::{baud_divisor, RBExt};

/// Serial error
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The peripheral receive buffer was overrun.
    Overrun,
    /// Received data does not conform to the peripheral configuration.
    /// Can be caused by a misconfigured device on either end of the serial line.
    FrameFormat,
    /// Parity check failed.
    Parity,
    /// Serial line is too noisy to read valid data.
    Noise,
}

// USART REMAPPING, see RM0008 section 9.3.8
pub trait Pins<USART> {
    const REMAP: u8;
}

impl Pins<USART1> for (gpio::PA9<Alternate<PushPull>>, gpio::PA10<Input<Floating>>) {
    const REMAP: u8 = 0;
}

impl Pins<USART1> for (gpio::PB6<Alternate<PushPull>>, gpio::PB7<Input<Floating>>) {
    const REMAP: u8 = 1;
}

impl Pins<USART2> for (gpio::PA2<Alternate<PushPull>>, gpio::PA3<Input<Floating>>) {
    const REMAP: u8 = 0;
}

impl Pins<USART3> for (gpio::PB10<Alternate<PushPull>>, gpio::PB11<Input<Floating>>) {
    const REMAP: u8 = 0;
}

impl Pins<USART3> for (gpio::PC10<Alternate<PushPull>>, gpio::PC11<Input<Floating>>) {
    const REMAP: u8 = 1;
}

pub trait Instance: crate::Sealed + Enable + Reset + GetBusFreq + Remap {
    #[doc(hidden)]
    fn registers(&self) -> &'static usart::RegisterBlock;
}

macro_rules! inst {
    ($($USARTX:ident,)+) => {
        $(
            impl crate::Sealed for $USARTX {}
            impl Instance for $USARTX {
                #[inline(always)]
                fn registers(&self) -> &'static usart::RegisterBlock {
                    self.regs()
                }
            }
        )+
    };
}

inst! {
    USART1,
    USART2,
    USART3,
}

/// Serial abstraction
pub struct Serial<USART, PINS> {
    pub tx: Tx<USART>,
    pub rx: Rx<USART>,
    usart: USART,
    pins: PINS,
}

/// Serial transmitter
pub struct Tx<USART> {
    usart: &'static usart::RegisterBlock,
    _usart: PhantomData<USART>,
}

/// Serial receiver
pub struct Rx<USART> {
    usart: &'static usart::RegisterBlock,
    _usart: PhantomData<USART>,
}

pub trait SerialExt: Sized + Instance {
    fn serial<PINS: Pins<Self>>(
        self,
        pins: PINS,
        mapr: &mut MAPR,
        config: impl Into<Config>,
        rcc: &mut Rcc,
    ) -> Serial<Self, PINS>;
}

impl<USART: Instance> SerialExt for USART {
    fn serial<PINS: Pins<Self>>(
        self,
        pins: PINS,
        mapr: &mut MAPR,
        config: impl Into<Config>,
        rcc: &mut Rcc,
    ) -> Serial<Self, PINS> {
        Serial::new(self, pins, mapr, config, rcc)
    }
}

impl<USART: Instance, PINS: Pins<USART>> Serial<USART, PINS> {
    /// Configures the serial interface and creates the interface
    /// struct.
    ///
    /// The pins must already be in their alternate push-pull (TX) and floating
    /// input (RX) modes. The sequence is: clock on and reset, remap field to
    /// match `PINS`, baud-rate divisor from the bus clock, frame format, and
    /// finally the peripheral itself with transmitter and receiver enabled.
    pub fn new(
        usart: USART,
        pins: PINS,
        mapr: &mut MAPR,
        config: impl Into<Config>,
        rcc: &mut Rcc,
    ) -> Self {
        let config = config.into();

        // enable and reset USART
        rcc.enable_and_reset::<USART>();

        USART::remap(mapr, PINS::REMAP);

        let rb = usart.registers();
        let pclk = USART::get_frequency(&rcc.clocks);
        rb.set_baud_rate(pclk.raw(), config.baudrate.raw());
        rb.set_frame_format(&config);

        // UE: enable USART
        // TE: enable transceiver
        // RE: enable receiver
        rb.cr1
            .set_bits((usart::Cr1::UE | usart::Cr1::TE | usart::Cr1::RE).bits());

        Serial {
            tx: Tx::new(rb),
            rx: Rx::new(rb),
            usart,
            pins,
        }
    }
}

impl<USART: Instance, PINS> Serial<USART, PINS> {
    /// Separates the serial struct into separate channel objects for sending (Tx) and
    /// receiving (Rx)
    pub fn split(self) -> (Tx<USART>, Rx<USART>) {
        (self.tx, self.rx)
    }

    /// Disables the peripheral and returns ownership of the handle and the pins
    pub fn release(self) -> (USART, PINS) {
        self.usart.registers().cr1.write(0);
        (self.usart, self.pins)
    }

    /// Non-blocking read of a single byte
    #[inline(always)]
    pub fn read(&mut self) -> nb::Result<u8, Error> {
        self.rx.read()
    }
}

impl<USART> Tx<USART> {
    fn new(usart: &'static usart::RegisterBlock) -> Self {
        Self {
            usart,
            _usart: PhantomData,
        }
    }

    /// Writes `word` once the transmit data register is empty
    ///
    /// Returns `WouldBlock` without touching the data register while TXE is clear.
    #[inline(always)]
    pub fn write_u8(&mut self, word: u8) -> nb::Result<(), Error> {
        self.usart.write_u8(word)
    }

    #[inline(always)]
    pub fn write_u16(&mut self, word: u16) -> nb::Result<(), Error> {
        self.usart.write_u16(word)
    }

    /// Spins until every byte of `buffer` has been handed to the data register
    #[inline(always)]
    pub fn bwrite_all(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.usart.bwrite_all_u8(buffer)
    }

    /// Succeeds once the last frame has left the shift register
    #[inline(always)]
    pub fn flush(&mut self) -> nb::Result<(), Error> {
        self.usart.flush()
    }

    #[inline(always)]
    pub fn bflush(&mut self) -> Result<(), Error> {
        self.usart.bflush()
    }

    #[inline(always)]
    pub fn is_tx_empty(&self) -> bool {
        self.usart.is_tx_empty()
    }
}

impl<USART> Rx<USART> {
    fn new(usart: &'static usart::RegisterBlock) -> Self {
        Self {
            usart,
            _usart: PhantomData,
        }
    }

    /// Reads the data register once RXNE is set
    ///
    /// A received frame is returned even when an error flag was raised with it.
    /// Errors are only reported while no data is pending.
    #[inline(always)]
    pub fn read(&mut self) -> nb::Result<u8, Error> {
        self.usart.read_u8()
    }

    #[inline(always)]
    pub fn read_u16(&mut self) -> nb::Result<u16, Error> {
        self.usart.read_u16()
    }

    /// Spins until `buffer` is filled
    #[inline(always)]
    pub fn bread_all(&mut self, buffer: &mut [u8]) -> Result<(), Error> {
        self.usart.bread_all_u8(buffer)
    }

    #[inline(always)]
    pub fn is_rx_not_empty(&self) -> bool {
        self.usart.is_rx_not_empty()
    }
}

impl<USART> core::fmt::Write for Tx<USART> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.bwrite_all(s.as_bytes()).map_err(|_| core::fmt::Error)
    }
}

pub type Rx1 = Rx<USART1>;
pub type Tx1 = Tx<USART1>;
pub type Rx2 = Rx<USART2>;
pub type Tx2 = Tx<USART2>;
pub type Rx3 = Rx<USART3>;
pub type Tx3 = Tx<USART3>;

#[cfg(test)]
mod tests {
    use core::fmt::Write as _;

    use super::*;
    use crate::afio::AfioExt;
    use crate::gpio::{GpioExt, PA10, PA9};
    use crate::pac::{afio, gpio, rcc, sim, usart::Sr, AFIO, GPIOA, GPIOB, GPIOC, RCC};
    use crate::rcc::RccExt;
    use crate::time::U32Ext;

    struct Rig {
        rcc: Rcc,
        port: &'static gpio::RegisterBlock,
        afio: &'static afio::RegisterBlock,
        usart: &'static usart::RegisterBlock,
    }

    fn usart1(
        config: Config,
    ) -> (
        Serial<USART1, (PA9<Alternate<PushPull>>, PA10<Input<Floating>>)>,
        Rig,
    ) {
        let port = sim(gpio::RegisterBlock::reset());
        let afio_rb = sim(afio::RegisterBlock::reset());
        let usart_rb = sim(usart::RegisterBlock::reset());
        // stale remap from a previous run
        afio_rb.mapr.write(1 << 2);

        let mut rcc = RCC::bind(sim(rcc::RegisterBlock::reset())).constrain();
        let mut afio = AFIO::bind(afio_rb).constrain(&mut rcc);
        let mut gpioa = GPIOA::bind(port).split(&mut rcc);

        let tx = gpioa.pa9.into_alternate_push_pull(&mut gpioa.crh);
        let rx = gpioa.pa10.into_floating_input(&mut gpioa.crh);
        let serial = USART1::bind(usart_rb).serial((tx, rx), &mut afio.mapr, config, &mut rcc);

        (
            serial,
            Rig {
                rcc,
                port,
                afio: afio_rb,
                usart: usart_rb,
            },
        )
    }

    #[test]
    fn divisor_rounds_to_nearest() {
        assert_eq!(baud_divisor(8_000_000, 115_200), 69);
        assert_eq!(baud_divisor(8_000_000, 9_600), 833);
        assert_eq!(baud_divisor(72_000_000, 9_600), 7_500);
        // 312.5 rounds up
        assert_eq!(baud_divisor(36_000_000, 115_200), 313);
        assert_eq!(baud_divisor(115_200, 115_200), 1);
    }

    #[test]
    fn init_sequence() {
        let (_serial, rig) = usart1(Config::default());

        assert_eq!(rig.rcc.apb2enr.read(), (1 << 14) | (1 << 2) | 1);
        assert_eq!(rig.afio.mapr.read() & (1 << 2), 0);
        assert_eq!(rig.port.crh.read(), 0x4444_44B4);
        assert_eq!(rig.usart.brr.read(), 69);
        assert_eq!(
            rig.usart.cr1.read(),
            (usart::Cr1::UE | usart::Cr1::TE | usart::Cr1::RE).bits()
        );
        assert_eq!(rig.usart.cr2.read(), 0);
    }

    #[test]
    fn frame_format_is_programmed() {
        let (_serial, rig) = usart1(
            Config::default()
                .baudrate(9_600.bps())
                .parity_odd()
                .wordlength_8data()
                .stopbits(config::StopBits::STOP2),
        );

        let cr1 = usart::Cr1::from_bits_truncate(rig.usart.cr1.read());
        assert!(cr1.contains(usart::Cr1::M | usart::Cr1::PCE | usart::Cr1::PS));
        assert_eq!(rig.usart.cr2.read(), 0b10 << 12);
        assert_eq!(rig.usart.brr.read(), 833);
    }

    #[test]
    fn write_waits_for_txe() {
        let (serial, rig) = usart1(Config::default());
        let (mut tx, _rx) = serial.split();

        rig.usart.sr.write(0);
        rig.usart.dr.write(0);
        assert_eq!(tx.write_u8(b'x'), Err(nb::Error::WouldBlock));
        assert_eq!(rig.usart.dr.read(), 0);

        rig.usart.sr.write(Sr::TXE.bits());
        assert_eq!(tx.write_u8(b'x'), Ok(()));
        assert_eq!(rig.usart.dr.read(), u32::from(b'x'));
    }

    #[test]
    fn read_waits_for_rxne() {
        let (serial, rig) = usart1(Config::default());
        let (_tx, mut rx) = serial.split();

        rig.usart.sr.write(0);
        rig.usart.dr.write(0x41);
        assert_eq!(rx.read(), Err(nb::Error::WouldBlock));

        rig.usart.sr.write(Sr::RXNE.bits());
        assert_eq!(rx.read(), Ok(0x41));
        assert_eq!(nb::block!(rx.read()), Ok(0x41));
    }

    #[test]
    fn received_data_wins_over_line_errors() {
        let (serial, rig) = usart1(Config::default());
        let (_tx, mut rx) = serial.split();

        rig.usart.dr.write(u32::from(b'a'));
        rig.usart.sr.write((Sr::RXNE | Sr::ORE).bits());
        assert_eq!(nb::block!(rx.read()), Ok(b'a'));

        rig.usart.dr.write(u32::from(b'b'));
        rig.usart.sr.write((Sr::RXNE | Sr::NE).bits());
        assert_eq!(nb::block!(rx.read()), Ok(b'b'));

        rig.usart.dr.write(u32::from(b'c'));
        rig.usart.sr.write((Sr::RXNE | Sr::PE | Sr::FE).bits());
        assert!(rx.is_rx_not_empty());
        assert_eq!(rx.read(), Ok(b'c'));
    }

    #[test]
    fn errors_without_data_are_reported() {
        let (mut serial, rig) = usart1(Config::default());

        rig.usart.sr.write(Sr::ORE.bits());
        assert_eq!(serial.read(), Err(nb::Error::Other(Error::Overrun)));
        rig.usart.sr.write(Sr::FE.bits());
        assert_eq!(serial.read(), Err(nb::Error::Other(Error::FrameFormat)));
        rig.usart.sr.write(Sr::NE.bits());
        assert_eq!(serial.read(), Err(nb::Error::Other(Error::Noise)));
        rig.usart.sr.write(Sr::PE.bits());
        assert_eq!(serial.read(), Err(nb::Error::Other(Error::Parity)));
    }

    #[test]
    fn bread_all_fills_the_buffer() {
        let (serial, rig) = usart1(Config::default());
        let (mut tx, mut rx) = serial.split();

        rig.usart.dr.write(u32::from(b'z'));
        rig.usart.sr.write(Sr::RXNE.bits());
        let mut buf = [0; 3];
        rx.bread_all(&mut buf).unwrap();
        assert_eq!(buf, *b"zzz");

        rig.usart.sr.write(0);
        assert!(!tx.is_tx_empty());
        assert_eq!(rx.bread_all(&mut []), Ok(()));
        tx.bwrite_all(&[]).unwrap();
    }

    #[test]
    fn echo_round_trip() {
        let (serial, rig) = usart1(Config::default());
        let (mut tx, mut rx) = serial.split();

        rig.usart.dr.write(u32::from(b'k'));
        rig.usart.sr.write((Sr::RXNE | Sr::TXE).bits());
        let byte = nb::block!(rx.read()).unwrap();
        nb::block!(tx.write_u8(byte)).unwrap();
        assert_eq!(rig.usart.dr.read(), u32::from(b'k'));
    }

    #[test]
    fn fmt_write_and_flush() {
        let (serial, rig) = usart1(Config::default());
        let (mut tx, _rx) = serial.split();

        write!(tx, "hi").unwrap();
        assert_eq!(rig.usart.dr.read(), u32::from(b'i'));

        rig.usart.sr.write(Sr::TXE.bits());
        assert_eq!(tx.flush(), Err(nb::Error::WouldBlock));
        rig.usart.sr.write((Sr::TXE | Sr::TC).bits());
        assert_eq!(tx.bflush(), Ok(()));
    }

    #[test]
    fn release_disables_the_peripheral() {
        let (serial, rig) = usart1(Config::default());
        let (_usart, _pins) = serial.release();
        assert_eq!(rig.usart.cr1.read(), 0);
    }

    #[test]
    fn usart1_remapped_to_port_b() {
        let gpiob_rb = sim(gpio::RegisterBlock::reset());
        let afio_rb = sim(afio::RegisterBlock::reset());
        let usart_rb = sim(usart::RegisterBlock::reset());
        let mut rcc = RCC::bind(sim(rcc::RegisterBlock::reset())).constrain();
        let mut afio = AFIO::bind(afio_rb).constrain(&mut rcc);
        let mut gpiob = GPIOB::bind(gpiob_rb).split(&mut rcc);

        let tx = gpiob.pb6.into_alternate_push_pull(&mut gpiob.crl);
        let rx = gpiob.pb7.into_floating_input(&mut gpiob.crl);
        let _serial =
            USART1::bind(usart_rb).serial((tx, rx), &mut afio.mapr, 9_600.bps(), &mut rcc);

        assert_eq!(afio_rb.mapr.read(), 1 << 2);
        assert_eq!(gpiob_rb.crl.read(), 0x4B44_4444);
        assert_eq!(usart_rb.brr.read(), 833);
    }

    #[test]
    fn usart3_pin_mappings() {
        let afio_rb = sim(afio::RegisterBlock::reset());
        let mut rcc = RCC::bind(sim(rcc::RegisterBlock::reset())).constrain();
        let mut afio = AFIO::bind(afio_rb).constrain(&mut rcc);
        let mut gpiob = GPIOB::bind(sim(gpio::RegisterBlock::reset())).split(&mut rcc);
        let mut gpioc = GPIOC::bind(sim(gpio::RegisterBlock::reset())).split(&mut rcc);

        // partial remap onto PC10/PC11
        let tx = gpioc.pc10.into_alternate_push_pull(&mut gpioc.crh);
        let rx = gpioc.pc11.into_floating_input(&mut gpioc.crh);
        let serial = USART3::bind(sim(usart::RegisterBlock::reset())).serial(
            (tx, rx),
            &mut afio.mapr,
            Config::default(),
            &mut rcc,
        );
        assert_eq!(afio_rb.mapr.read(), 0b01 << 4);
        assert_eq!(rcc.apb1enr.read(), 1 << 18);

        // back to the default PB10/PB11
        let (usart3, _pins) = serial.release();
        let tx = gpiob.pb10.into_alternate_push_pull(&mut gpiob.crh);
        let rx = gpiob.pb11.into_floating_input(&mut gpiob.crh);
        let _serial = usart3.serial((tx, rx), &mut afio.mapr, Config::default(), &mut rcc);
        assert_eq!(afio_rb.mapr.read(), 0);
    }
}
