//! Blinks PA5 and echoes USART1
//!
//! Connect a USB-serial adapter to PA9 (TX) and PA10 (RX) at 115 200 baud,
//! 8N1. Every received byte is written straight back. The LED toggles once per
//! loop pass, so it only blinks while bytes keep arriving.

#![deny(unsafe_code)]
#![no_main]
#![no_std]

use panic_halt as _;

use cortex_m_rt::entry;
use nb::block;
use stm32f1_bare::{
    gpio::IOPinSpeed,
    pac,
    prelude::*,
    serial::{Config, Serial},
};

#[entry]
fn main() -> ! {
    let dp = pac::Peripherals::take().unwrap();

    let mut rcc = dp.RCC.constrain();
    let mut afio = dp.AFIO.constrain(&mut rcc);
    let mut gpioa = dp.GPIOA.split(&mut rcc);

    let mut led = gpioa.pa5.into_push_pull_output(&mut gpioa.crl);
    led.set_speed(&mut gpioa.crl, IOPinSpeed::Mhz2);

    // USART1
    let tx = gpioa.pa9.into_alternate_push_pull(&mut gpioa.crh);
    let rx = gpioa.pa10.into_floating_input(&mut gpioa.crh);

    let serial = Serial::new(
        dp.USART1,
        (tx, rx),
        &mut afio.mapr,
        Config::default().baudrate(115_200.bps()),
        &mut rcc,
    );
    let (mut tx, mut rx) = serial.split();

    let mut delay = dp.SYST.delay(&rcc.clocks);

    loop {
        led.toggle();
        delay.delay_ms(1);

        // a line error without data is skipped
        if let Ok(byte) = block!(rx.read()) {
            block!(tx.write_u8(byte)).ok();
        }
    }
}
