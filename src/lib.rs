//! # Bare-metal support for the STM32F103 (blue pill class boards)
//!
//! A small `no_std` layer over the STM32F1 registers used by the two firmware
//! programs in `src/bin`:
//!
//! - `blinky` toggles PA5 in a no-op spin loop;
//! - `serial_echo` blinks PA5 and echoes every byte received on USART1
//!   (PA9/PA10, 115 200 baud 8N1), pacing the loop with a SysTick delay.
//!
//! The drivers implement the [`embedded-hal`] 1.0, [`embedded-hal-nb`] and
//! [`embedded-io`] traits.
//!
//! [`embedded-hal`]: https://crates.io/crates/embedded-hal
//! [`embedded-hal-nb`]: https://crates.io/crates/embedded-hal-nb
//! [`embedded-io`]: https://crates.io/crates/embedded-io
//!
//! # Usage
//!
//! The firmware programs need the `rt` feature, which pulls in the
//! `cortex-m-rt` runtime, the `memory.x` linker script and `panic-halt`:
//!
//! ```console
//! $ cargo run --release --features rt --target thumbv7m-none-eabi --bin serial_echo
//! ```
//!
//! Without `rt` the library builds on the host, where every driver can be bound
//! to RAM-backed register blocks (see [`pac::Periph::bind`]).
//!
//! ## Usage example
//!
//! ```rust,ignore
//! #![no_std]
//! #![no_main]
//!
//! use panic_halt as _;
//!
//! use cortex_m_rt::entry;
//! use stm32f1_bare::{gpio::IOPinSpeed, pac, prelude::*};
//!
//! #[entry]
//! fn main() -> ! {
//!     let dp = pac::Peripherals::take().unwrap();
//!     let mut rcc = dp.RCC.constrain();
//!     let mut gpioa = dp.GPIOA.split(&mut rcc);
//!
//!     let mut led = gpioa.pa5.into_push_pull_output(&mut gpioa.crl);
//!     led.set_speed(&mut gpioa.crl, IOPinSpeed::Mhz2);
//!
//!     loop {
//!         led.toggle();
//!         for _ in 0..500_000 {
//!             cortex_m::asm::nop();
//!         }
//!     }
//! }
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod afio;
pub mod delay;
pub mod gpio;
pub mod pac;
pub mod prelude;
pub mod rcc;
pub mod serial;
pub mod time;

mod sealed {
    pub trait Sealed {}
}
pub(crate) use sealed::Sealed;
