//! # Peripheral access
//!
//! Typed, volatile access to the memory-mapped registers used by this crate.
//!
//! Every peripheral is a `#[repr(C)]` register block laid out exactly as in the
//! reference manual (RM0008). A [`Periph`] handle owns one block at a fixed
//! address and dereferences to it, so drivers simply write
//! `usart.brr.write(69)`.
//!
//! The same handle type can be bound to a block living in RAM with
//! [`Periph::bind`], which is how the drivers are exercised off-target:
//!
//! ```rust
//! use stm32f1_bare::pac::{gpio, GPIOA};
//!
//! let block: &'static gpio::RegisterBlock = Box::leak(Box::new(gpio::RegisterBlock::reset()));
//! let gpioa = GPIOA::bind(block);
//! gpioa.odr.write(1 << 5);
//! assert_eq!(block.odr.read(), 1 << 5);
//! ```

use core::ops::Deref;

use vcell::VolatileCell;

pub mod afio;
pub mod gpio;
pub mod rcc;
pub mod syst;
pub mod usart;

/// A 32-bit read-write register
#[repr(transparent)]
pub struct Reg {
    value: VolatileCell<u32>,
}

impl Reg {
    /// Creates a register holding `bits`. Only meaningful for RAM-backed blocks.
    pub const fn new(bits: u32) -> Self {
        Self {
            value: VolatileCell::new(bits),
        }
    }

    /// Volatile load of the whole register
    #[inline(always)]
    pub fn read(&self) -> u32 {
        self.value.get()
    }

    /// Volatile store of the whole register
    #[inline(always)]
    pub fn write(&self, bits: u32) {
        self.value.set(bits)
    }

    /// Read-modify-write
    #[inline(always)]
    pub fn modify<F>(&self, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        self.write(f(self.read()))
    }

    #[inline(always)]
    pub fn set_bits(&self, mask: u32) {
        self.modify(|r| r | mask)
    }

    #[inline(always)]
    pub fn clear_bits(&self, mask: u32) {
        self.modify(|r| r & !mask)
    }

    #[inline(always)]
    pub fn bit_is_set(&self, bit: u8) -> bool {
        (self.read() >> bit) & 0x1 != 0
    }

    #[inline(always)]
    pub fn bit_is_clear(&self, bit: u8) -> bool {
        !self.bit_is_set(bit)
    }

    /// Replaces the field `mask << offset` with `value`, clearing it first so no
    /// stale bits survive. Bits outside the field are preserved.
    #[inline(always)]
    pub fn write_field(&self, offset: u8, mask: u32, value: u32) {
        self.modify(|r| (r & !(mask << offset)) | ((value & mask) << offset))
    }

    /// Extracts the field `mask << offset`
    #[inline(always)]
    pub fn read_field(&self, offset: u8, mask: u32) -> u32 {
        (self.read() >> offset) & mask
    }
}

/// Owned handle to the register block `RB` mapped at `ADDR`
pub struct Periph<RB: 'static, const ADDR: usize> {
    rb: &'static RB,
}

impl<RB, const ADDR: usize> Periph<RB, ADDR> {
    /// Pointer to the register block
    pub const PTR: *const RB = ADDR as *const RB;

    /// Returns a pointer to the register block
    #[inline(always)]
    pub const fn ptr() -> *const RB {
        Self::PTR
    }

    /// Creates a handle to the hardware block
    ///
    /// # Safety
    ///
    /// Only one handle per peripheral may be in use; the drivers rely on owning
    /// their registers for read-modify-write sequences.
    #[inline(always)]
    pub unsafe fn steal() -> Self {
        Self { rb: &*Self::PTR }
    }

    /// Binds the handle to an arbitrary register block, e.g. a RAM-backed one
    /// used for register-level simulation.
    pub fn bind(rb: &'static RB) -> Self {
        Self { rb }
    }

    /// The register block with the handle's lifetime erased
    #[inline(always)]
    pub(crate) fn regs(&self) -> &'static RB {
        self.rb
    }
}

impl<RB, const ADDR: usize> Deref for Periph<RB, ADDR> {
    type Target = RB;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.rb
    }
}

/// Reset and clock control
pub type RCC = Periph<rcc::RegisterBlock, 0x4002_1000>;
/// Alternate function I/O
pub type AFIO = Periph<afio::RegisterBlock, 0x4001_0000>;
/// General purpose I/O port A
pub type GPIOA = Periph<gpio::RegisterBlock, 0x4001_0800>;
/// General purpose I/O port B
pub type GPIOB = Periph<gpio::RegisterBlock, 0x4001_0C00>;
/// General purpose I/O port C
pub type GPIOC = Periph<gpio::RegisterBlock, 0x4001_1000>;
/// Universal synchronous asynchronous receiver transmitter 1
pub type USART1 = Periph<usart::RegisterBlock, 0x4001_3800>;
/// Universal synchronous asynchronous receiver transmitter 2
pub type USART2 = Periph<usart::RegisterBlock, 0x4000_4400>;
/// Universal synchronous asynchronous receiver transmitter 3
pub type USART3 = Periph<usart::RegisterBlock, 0x4000_4800>;
/// System timer (Cortex-M core peripheral)
pub type SYST = Periph<syst::RegisterBlock, 0xE000_E010>;

static mut TAKEN: bool = false;

/// All the peripherals used by this crate
#[allow(non_snake_case)]
pub struct Peripherals {
    pub RCC: RCC,
    pub AFIO: AFIO,
    pub GPIOA: GPIOA,
    pub GPIOB: GPIOB,
    pub GPIOC: GPIOC,
    pub USART1: USART1,
    pub USART2: USART2,
    pub USART3: USART3,
    pub SYST: SYST,
}

impl Peripherals {
    /// Returns all the peripherals *once*
    #[inline]
    pub fn take() -> Option<Self> {
        critical_section::with(|_| {
            if unsafe { TAKEN } {
                None
            } else {
                Some(unsafe { Peripherals::steal() })
            }
        })
    }

    /// Unchecked version of `Peripherals::take`
    ///
    /// # Safety
    ///
    /// Each of the returned peripherals must be used at most once.
    #[inline]
    pub unsafe fn steal() -> Self {
        TAKEN = true;

        Peripherals {
            RCC: RCC::steal(),
            AFIO: AFIO::steal(),
            GPIOA: GPIOA::steal(),
            GPIOB: GPIOB::steal(),
            GPIOC: GPIOC::steal(),
            USART1: USART1::steal(),
            USART2: USART2::steal(),
            USART3: USART3::steal(),
            SYST: SYST::steal(),
        }
    }
}

#[cfg(test)]
pub(crate) fn sim<RB>(block: RB) -> &'static RB {
    Box::leak(Box::new(block))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_field_clears_before_setting() {
        let r = Reg::new(0xFFFF_FFFF);
        r.write_field(20, 0xF, 0x2);
        assert_eq!(r.read(), 0xFF2F_FFFF);
        assert_eq!(r.read_field(20, 0xF), 0x2);
    }

    #[test]
    fn bit_helpers() {
        let r = Reg::new(0);
        r.set_bits(1 << 7);
        assert!(r.bit_is_set(7));
        assert!(r.bit_is_clear(6));
        r.clear_bits(1 << 7);
        assert_eq!(r.read(), 0);
    }

    #[test]
    fn register_offsets_match_reference_manual() {
        let rcc = rcc::RegisterBlock::reset();
        let base = &rcc as *const _ as usize;
        assert_eq!(&rcc.apb2enr as *const _ as usize - base, 0x18);
        assert_eq!(&rcc.apb1enr as *const _ as usize - base, 0x1C);

        let port = gpio::RegisterBlock::reset();
        let base = &port as *const _ as usize;
        assert_eq!(&port.crh as *const _ as usize - base, 0x04);
        assert_eq!(&port.odr as *const _ as usize - base, 0x0C);
        assert_eq!(&port.lckr as *const _ as usize - base, 0x18);

        let afio = afio::RegisterBlock::reset();
        let base = &afio as *const _ as usize;
        assert_eq!(&afio.mapr as *const _ as usize - base, 0x04);
        assert_eq!(&afio.mapr2 as *const _ as usize - base, 0x1C);

        let usart = usart::RegisterBlock::reset();
        let base = &usart as *const _ as usize;
        assert_eq!(&usart.brr as *const _ as usize - base, 0x08);
        assert_eq!(&usart.gtpr as *const _ as usize - base, 0x18);

        let syst = syst::RegisterBlock::reset();
        let base = &syst as *const _ as usize;
        assert_eq!(&syst.cvr as *const _ as usize - base, 0x08);
    }

    #[test]
    fn handles_point_at_fixed_addresses() {
        assert_eq!(RCC::ptr() as usize, 0x4002_1000);
        assert_eq!(GPIOA::ptr() as usize, 0x4001_0800);
        assert_eq!(USART1::ptr() as usize, 0x4001_3800);
        assert_eq!(SYST::ptr() as usize, 0xE000_E010);
    }

    #[test]
    fn peripherals_can_only_be_taken_once() {
        // Creating the handles does not touch the hardware
        assert!(Peripherals::take().is_some());
        assert!(Peripherals::take().is_none());
    }
}
