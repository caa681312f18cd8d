//! Blinks an LED on PA5
//!
//! The pace comes from a no-op spin loop, not a calibrated timer: the blink
//! period depends on the core clock and the optimization level.

#![deny(unsafe_code)]
#![no_main]
#![no_std]

use panic_halt as _;

use cortex_m::asm;
use cortex_m_rt::entry;
use stm32f1_bare::{gpio::IOPinSpeed, pac, prelude::*};

/// No-op iterations between two toggles
const SPIN: u32 = 500_000;

#[entry]
fn main() -> ! {
    let dp = pac::Peripherals::take().unwrap();

    let mut rcc = dp.RCC.constrain();
    let mut gpioa = dp.GPIOA.split(&mut rcc);

    // 2 MHz push-pull output
    let mut led = gpioa.pa5.into_push_pull_output(&mut gpioa.crl);
    led.set_speed(&mut gpioa.crl, IOPinSpeed::Mhz2);

    loop {
        led.toggle();
        for _ in 0..SPIN {
            asm::nop();
        }
    }
}
