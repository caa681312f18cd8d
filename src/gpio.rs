//! # General Purpose I/Os
//!
//! The GPIO pins are organised into groups of 16 pins which can be accessed through the
//! `gpioa`, `gpiob`... modules. To get access to the pins, you first need to convert them into a
//! HAL designed struct from the `pac` handle using the [split](trait.GpioExt.html#tymethod.split)
//! function, which also turns on the port's clock.
//!
//! ```rust,ignore
//! let mut gpioa = dp.GPIOA.split(&mut rcc);
//! ```
//!
//! This gives you a struct containing two control registers `crl` and `crh`, and all the pins
//! `px0..px15`. Pins 0 to 7 are configured through `crl`, pins 8 to 15 through `crh`. For
//! example, to drive `pa5`, you would call
//!
//! ```rust,ignore
//! let mut led = gpioa.pa5.into_push_pull_output(&mut gpioa.crl);
//! led.toggle();
//! ```
//!
//! ## Modes
//!
//! Each pin owns a 4 bit field in its configuration register, `CNF[1:0]` followed by
//! `MODE[1:0]`. Changing the mode always clears the whole field before writing the new value,
//! the other pins' fields are left untouched.
//!
//! - **Alternate**: Pin mode required when the pin is driven by other peripherals
//! - Input
//!     - **PullUp**: Input connected to high with a weak pull up resistor
//!     - **PullDown**: Input connected to low with a weak pull down resistor
//!     - **Floating**: Input not pulled to high or low. This is the reset state
//! - Output
//!     - **PushPull**: Output which either drives the pin high or low
//!     - **OpenDrain**: Output which leaves the gate floating, or pulls it to ground
//! - **Analog**
//!
//! The debug pins (PA13, PA14, PA15, PB3, PB4) are handed out as floating inputs like every
//! other pin; reconfiguring them cuts off the debug probe.

use core::marker::PhantomData;

use crate::pac::{gpio::RegisterBlock, Reg};
use crate::rcc::Rcc;

mod hal_1;

/// Slew rates available for Output and relevant AlternateMode Pins
///
/// See Table 21 "Output MODE bits" in the reference
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IOPinSpeed {
    /// Slew at 10Mhz
    Mhz10 = 0b01, // (yes, this one is "less" then 2Mhz)
    /// Slew at 2Mhz
    Mhz2 = 0b10,
    /// Slew at 50Mhz
    Mhz50 = 0b11,
}

pub trait PinExt {
    type Mode;
    /// Return pin number
    fn pin_id(&self) -> u8;
    /// Return port letter
    fn port_id(&self) -> char;
}

/// Allow setting of the slew rate of an IO pin
///
/// Initially all output pins are set to the maximum slew rate
pub trait OutputSpeed<CR> {
    fn set_speed(&mut self, cr: &mut CR, speed: IOPinSpeed);
}

/// Extension trait to split a GPIO peripheral in independent pins and registers
pub trait GpioExt {
    /// The to split the GPIO into
    type Parts;

    /// Enables the port clock and splits the GPIO block into independent pins and registers
    fn split(self, rcc: &mut Rcc) -> Self::Parts;
}

/// Marker trait for active states.
pub trait Active {}

/// Input mode (type state)
pub struct Input<MODE> {
    _mode: PhantomData<MODE>,
}
impl<MODE> Active for Input<MODE> {}

/// Floating input (type state)
pub struct Floating;
/// Pulled down input (type state)
pub struct PullDown;
/// Pulled up input (type state)
pub struct PullUp;

/// Output mode (type state)
pub struct Output<MODE> {
    _mode: PhantomData<MODE>,
}
impl<MODE> Active for Output<MODE> {}

/// Push pull output (type state)
pub struct PushPull;
/// Open drain output (type state)
pub struct OpenDrain;

/// Analog mode (type state)
pub struct Analog;
impl Active for Analog {}

/// Alternate function
pub struct Alternate<MODE> {
    _mode: PhantomData<MODE>,
}
impl<MODE> Active for Alternate<MODE> {}

/// Digital output pin state
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PinState {
    High,
    Low,
}

impl From<bool> for PinState {
    fn from(high: bool) -> Self {
        if high {
            PinState::High
        } else {
            PinState::Low
        }
    }
}

mod sealed {
    /// Selects CRL or CRH
    pub trait CrSelect {
        fn reg(port: &super::RegisterBlock) -> &super::Reg;
    }

    pub trait PinMode {
        /// `CNF[1:0]`
        const CNF: u32;
        /// `MODE[1:0]`, `0b00` for inputs
        const MODE: u32;
        const BITS: u32 = (Self::CNF << 2) | Self::MODE;
    }
}
use sealed::{CrSelect, PinMode};

impl PinMode for Input<Floating> {
    const CNF: u32 = 0b01;
    const MODE: u32 = 0b00;
}
impl PinMode for Input<PullDown> {
    const CNF: u32 = 0b10;
    const MODE: u32 = 0b00;
}
impl PinMode for Input<PullUp> {
    const CNF: u32 = 0b10;
    const MODE: u32 = 0b00;
}
impl PinMode for Output<PushPull> {
    const CNF: u32 = 0b00;
    const MODE: u32 = IOPinSpeed::Mhz50 as u32;
}
impl PinMode for Output<OpenDrain> {
    const CNF: u32 = 0b01;
    const MODE: u32 = IOPinSpeed::Mhz50 as u32;
}
impl PinMode for Alternate<PushPull> {
    const CNF: u32 = 0b10;
    const MODE: u32 = IOPinSpeed::Mhz50 as u32;
}
impl PinMode for Alternate<OpenDrain> {
    const CNF: u32 = 0b11;
    const MODE: u32 = IOPinSpeed::Mhz50 as u32;
}
impl PinMode for Analog {
    const CNF: u32 = 0b00;
    const MODE: u32 = 0b00;
}

/// Port configuration register low (pins 0..=7)
pub struct CRL {
    _0: (),
}
/// Port configuration register high (pins 8..=15)
pub struct CRH {
    _0: (),
}

impl CrSelect for CRL {
    fn reg(port: &RegisterBlock) -> &Reg {
        &port.crl
    }
}
impl CrSelect for CRH {
    fn reg(port: &RegisterBlock) -> &Reg {
        &port.crh
    }
}

/// Opaque CR register
///
/// Holding `&mut Cr` serializes the read-modify-write of the configuration register shared by
/// eight pins.
pub struct Cr<CR, const P: char> {
    port: &'static RegisterBlock,
    _cr: PhantomData<CR>,
}

impl<CR: CrSelect, const P: char> Cr<CR, P> {
    const fn new(port: &'static RegisterBlock) -> Self {
        Self {
            port,
            _cr: PhantomData,
        }
    }

    #[inline(always)]
    fn cr(&mut self) -> &Reg {
        CR::reg(self.port)
    }

    /// Clears the 4 bit field of pin `n` then writes `bits` into it
    #[inline(always)]
    pub(crate) fn configure(&mut self, n: u8, bits: u32) {
        self.cr().write_field(4 * (n % 8), 0b1111, bits)
    }

    /// Raw 4 bit field of pin `n`
    pub fn field(&mut self, n: u8) -> u32 {
        self.cr().read_field(4 * (n % 8), 0b1111)
    }
}

/// Generic pin type
///
/// - `MODE` is one of the pin modes (see [Modes](crate::gpio#modes) section).
/// - `CR` represents high or low configuration register (`CRH` or `CRL`).
/// - `P` is port name: `A` for GPIOA, `B` for GPIOB, etc.
/// - `N` is pin number: from `0` to `15`.
pub struct Pin<MODE, CR, const P: char, const N: u8> {
    port: &'static RegisterBlock,
    _mode: PhantomData<(MODE, CR)>,
}

impl<MODE, CR, const P: char, const N: u8> Pin<MODE, CR, P, N> {
    const fn new(port: &'static RegisterBlock) -> Self {
        Self {
            port,
            _mode: PhantomData,
        }
    }

    const fn mask() -> u32 {
        1 << N
    }

    #[inline(always)]
    fn _set_state(&mut self, state: PinState) {
        match state {
            PinState::High => self._set_high(),
            PinState::Low => self._set_low(),
        }
    }

    #[inline(always)]
    fn _set_high(&mut self) {
        // NOTE atomic write to a stateless register
        self.port.bsrr.write(Self::mask())
    }

    #[inline(always)]
    fn _set_low(&mut self) {
        // NOTE atomic write to a stateless register
        self.port.bsrr.write(Self::mask() << 16)
    }

    #[inline(always)]
    fn _is_set_low(&self) -> bool {
        self.port.odr.read() & Self::mask() == 0
    }

    #[inline(always)]
    fn _is_low(&self) -> bool {
        self.port.idr.read() & Self::mask() == 0
    }
}

impl<MODE, CR, const P: char, const N: u8> PinExt for Pin<MODE, CR, P, N> {
    type Mode = MODE;

    #[inline(always)]
    fn pin_id(&self) -> u8 {
        N
    }

    #[inline(always)]
    fn port_id(&self) -> char {
        P
    }
}

impl<MODE, CR, const P: char, const N: u8> Pin<MODE, CR, P, N>
where
    MODE: Active,
    CR: CrSelect,
{
    #[inline(always)]
    fn into_mode<M: PinMode>(self, cr: &mut Cr<CR, P>) -> Pin<M, CR, P, N> {
        cr.configure(N, M::BITS);
        Pin::new(self.port)
    }

    /// Configures the pin to operate as an alternate function push-pull output
    /// pin.
    #[inline]
    pub fn into_alternate_push_pull(
        self,
        cr: &mut Cr<CR, P>,
    ) -> Pin<Alternate<PushPull>, CR, P, N> {
        self.into_mode(cr)
    }

    /// Configures the pin to operate as an alternate function open-drain output
    /// pin.
    #[inline]
    pub fn into_alternate_open_drain(
        self,
        cr: &mut Cr<CR, P>,
    ) -> Pin<Alternate<OpenDrain>, CR, P, N> {
        self.into_mode(cr)
    }

    /// Configures the pin to operate as a floating input pin
    #[inline]
    pub fn into_floating_input(self, cr: &mut Cr<CR, P>) -> Pin<Input<Floating>, CR, P, N> {
        self.into_mode(cr)
    }

    /// Configures the pin to operate as a pulled down input pin
    #[inline]
    pub fn into_pull_down_input(mut self, cr: &mut Cr<CR, P>) -> Pin<Input<PullDown>, CR, P, N> {
        // the output latch selects the pull direction
        self._set_low();
        self.into_mode(cr)
    }

    /// Configures the pin to operate as a pulled up input pin
    #[inline]
    pub fn into_pull_up_input(mut self, cr: &mut Cr<CR, P>) -> Pin<Input<PullUp>, CR, P, N> {
        self._set_high();
        self.into_mode(cr)
    }

    /// Configures the pin to operate as an open-drain output pin.
    /// Initial state will be low.
    #[inline]
    pub fn into_open_drain_output(self, cr: &mut Cr<CR, P>) -> Pin<Output<OpenDrain>, CR, P, N> {
        self.into_open_drain_output_with_state(cr, PinState::Low)
    }

    /// Configures the pin to operate as an open-drain output pin.
    /// `initial_state` specifies whether the pin should be initially high or low.
    #[inline]
    pub fn into_open_drain_output_with_state(
        mut self,
        cr: &mut Cr<CR, P>,
        initial_state: PinState,
    ) -> Pin<Output<OpenDrain>, CR, P, N> {
        self._set_state(initial_state);
        self.into_mode(cr)
    }

    /// Configures the pin to operate as an push-pull output pin.
    /// Initial state will be low.
    #[inline]
    pub fn into_push_pull_output(self, cr: &mut Cr<CR, P>) -> Pin<Output<PushPull>, CR, P, N> {
        self.into_push_pull_output_with_state(cr, PinState::Low)
    }

    /// Configures the pin to operate as an push-pull output pin.
    /// `initial_state` specifies whether the pin should be initially high or low.
    #[inline]
    pub fn into_push_pull_output_with_state(
        mut self,
        cr: &mut Cr<CR, P>,
        initial_state: PinState,
    ) -> Pin<Output<PushPull>, CR, P, N> {
        self._set_state(initial_state);
        self.into_mode(cr)
    }

    /// Configures the pin to operate as an analog input pin
    #[inline]
    pub fn into_analog(self, cr: &mut Cr<CR, P>) -> Pin<Analog, CR, P, N> {
        self.into_mode(cr)
    }
}

impl<MODE, CR: CrSelect, const P: char, const N: u8> OutputSpeed<Cr<CR, P>>
    for Pin<Output<MODE>, CR, P, N>
{
    fn set_speed(&mut self, cr: &mut Cr<CR, P>, speed: IOPinSpeed) {
        cr.cr().write_field(4 * (N % 8), 0b11, speed as u32);
    }
}

impl<CR: CrSelect, const P: char, const N: u8> OutputSpeed<Cr<CR, P>>
    for Pin<Alternate<PushPull>, CR, P, N>
{
    fn set_speed(&mut self, cr: &mut Cr<CR, P>, speed: IOPinSpeed) {
        cr.cr().write_field(4 * (N % 8), 0b11, speed as u32);
    }
}

impl<MODE, CR, const P: char, const N: u8> Pin<Output<MODE>, CR, P, N> {
    #[inline]
    pub fn set_high(&mut self) {
        self._set_high()
    }

    #[inline]
    pub fn set_low(&mut self) {
        self._set_low()
    }

    #[inline(always)]
    pub fn get_state(&self) -> PinState {
        if self._is_set_low() {
            PinState::Low
        } else {
            PinState::High
        }
    }

    #[inline(always)]
    pub fn set_state(&mut self, state: PinState) {
        self._set_state(state)
    }

    #[inline]
    pub fn is_set_high(&self) -> bool {
        !self._is_set_low()
    }

    #[inline]
    pub fn is_set_low(&self) -> bool {
        self._is_set_low()
    }

    /// Inverts the output latch with a read-modify-write of `ODR`
    #[inline]
    pub fn toggle(&mut self) {
        self.port.odr.modify(|r| r ^ Self::mask())
    }
}

impl<MODE, CR, const P: char, const N: u8> Pin<Input<MODE>, CR, P, N> {
    #[inline]
    pub fn is_high(&self) -> bool {
        !self._is_low()
    }

    #[inline]
    pub fn is_low(&self) -> bool {
        self._is_low()
    }
}

impl<CR, const P: char, const N: u8> Pin<Output<OpenDrain>, CR, P, N> {
    #[inline]
    pub fn is_high(&self) -> bool {
        !self._is_low()
    }

    #[inline]
    pub fn is_low(&self) -> bool {
        self._is_low()
    }
}

macro_rules! gpio {
    ($GPIOX:ident, $gpiox:ident, $port_id:literal, [
        $($PXi:ident: ($pxi:ident, $i:literal, $CR:ident),)+
    ]) => {
        /// GPIO
        pub mod $gpiox {
            use crate::pac::$GPIOX;
            use crate::rcc::Rcc;

            use super::{Cr, Floating, GpioExt, Input, Pin, CRH, CRL};

            /// GPIO parts
            pub struct Parts {
                /// Opaque CRL register
                pub crl: Cr<CRL, $port_id>,
                /// Opaque CRH register
                pub crh: Cr<CRH, $port_id>,
                $(
                    /// Pin
                    pub $pxi: $PXi,
                )+
            }

            $(
                pub type $PXi<MODE = Input<Floating>> = Pin<MODE, $CR, $port_id, $i>;
            )+

            impl GpioExt for $GPIOX {
                type Parts = Parts;

                fn split(self, rcc: &mut Rcc) -> Parts {
                    rcc.enable_and_reset::<$GPIOX>();

                    let port = self.regs();
                    Parts {
                        crl: Cr::new(port),
                        crh: Cr::new(port),
                        $(
                            $pxi: Pin::new(port),
                        )+
                    }
                }
            }
        }

        pub use $gpiox::{ $($PXi),+ };
    }
}

gpio!(GPIOA, gpioa, 'A', [
    PA0: (pa0, 0, CRL),
    PA1: (pa1, 1, CRL),
    PA2: (pa2, 2, CRL),
    PA3: (pa3, 3, CRL),
    PA4: (pa4, 4, CRL),
    PA5: (pa5, 5, CRL),
    PA6: (pa6, 6, CRL),
    PA7: (pa7, 7, CRL),
    PA8: (pa8, 8, CRH),
    PA9: (pa9, 9, CRH),
    PA10: (pa10, 10, CRH),
    PA11: (pa11, 11, CRH),
    PA12: (pa12, 12, CRH),
    PA13: (pa13, 13, CRH),
    PA14: (pa14, 14, CRH),
    PA15: (pa15, 15, CRH),
]);

gpio!(GPIOB, gpiob, 'B', [
    PB0: (pb0, 0, CRL),
    PB1: (pb1, 1, CRL),
    PB2: (pb2, 2, CRL),
    PB3: (pb3, 3, CRL),
    PB4: (pb4, 4, CRL),
    PB5: (pb5, 5, CRL),
    PB6: (pb6, 6, CRL),
    PB7: (pb7, 7, CRL),
    PB8: (pb8, 8, CRH),
    PB9: (pb9, 9, CRH),
    PB10: (pb10, 10, CRH),
    PB11: (pb11, 11, CRH),
    PB12: (pb12, 12, CRH),
    PB13: (pb13, 13, CRH),
    PB14: (pb14, 14, CRH),
    PB15: (pb15, 15, CRH),
]);

gpio!(GPIOC, gpioc, 'C', [
    PC0: (pc0, 0, CRL),
    PC1: (pc1, 1, CRL),
    PC2: (pc2, 2, CRL),
    PC3: (pc3, 3, CRL),
    PC4: (pc4, 4, CRL),
    PC5: (pc5, 5, CRL),
    PC6: (pc6, 6, CRL),
    PC7: (pc7, 7, CRL),
    PC8: (pc8, 8, CRH),
    PC9: (pc9, 9, CRH),
    PC10: (pc10, 10, CRH),
    PC11: (pc11, 11, CRH),
    PC12: (pc12, 12, CRH),
    PC13: (pc13, 13, CRH),
    PC14: (pc14, 14, CRH),
    PC15: (pc15, 15, CRH),
]);
