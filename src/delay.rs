//! Delays
//!
//! Busy-wait delays on the SysTick core timer. The timer counts down from the
//! reload value at the processor clock and raises COUNTFLAG each time it wraps;
//! every wait polls that flag and nothing else.

use crate::pac::syst::{SystClkSource, SYST_RVR_MAX};
use crate::pac::SYST;
use crate::rcc::Clocks;
use crate::time::Hertz;
use fugit::MicrosDurationU32;

/// SysTick as a delay provider
pub struct SysDelay {
    syst: SYST,
    clk: Hertz,
}

pub trait SysTimerExt: Sized {
    /// Creates a delay provider running from the core clock in `clocks`
    fn delay(self, clocks: &Clocks) -> SysDelay;
}

impl SysTimerExt for SYST {
    fn delay(self, clocks: &Clocks) -> SysDelay {
        SysDelay::new(self, clocks)
    }
}

impl SysDelay {
    pub fn new(syst: SYST, clocks: &Clocks) -> Self {
        syst.disable_interrupt();
        syst.disable_counter();
        Self {
            syst,
            clk: clocks.sysclk(),
        }
    }

    /// Waits `ms` milliseconds
    ///
    /// The reload value is programmed for one millisecond and the counter is
    /// started once; each millisecond is one observed wrap. `ms = 0` returns
    /// without polling.
    pub fn delay_ms(&mut self, ms: u32) {
        self.syst.set_reload(self.clk.raw() / 1_000 - 1);
        self.syst.clear_current();
        self.syst.set_clock_source(SystClkSource::Core);
        self.syst.enable_counter();

        for _ in 0..ms {
            while !self.syst.has_wrapped() {}
        }

        self.syst.disable_counter();
    }

    /// Waits `us` microseconds, in reload-sized chunks
    pub fn delay_us(&mut self, us: u32) {
        let mut total_rvr = u64::from(us) * u64::from(self.clk.raw() / 1_000_000);

        self.syst.set_clock_source(SystClkSource::Core);
        while total_rvr != 0 {
            let current_rvr = total_rvr.min(u64::from(SYST_RVR_MAX)) as u32;

            self.syst.set_reload(current_rvr);
            self.syst.clear_current();
            self.syst.enable_counter();

            // Update the tracking variable while we are waiting...
            total_rvr -= u64::from(current_rvr);

            while !self.syst.has_wrapped() {}

            self.syst.disable_counter();
        }
    }

    pub fn delay(&mut self, us: MicrosDurationU32) {
        self.delay_us(us.ticks())
    }

    /// Releases the SysTick resource
    pub fn release(self) -> SYST {
        self.syst.disable_counter();
        self.syst
    }
}

impl embedded_hal::delay::DelayNs for SysDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_us(ns.div_ceil(1_000))
    }

    fn delay_us(&mut self, us: u32) {
        self.delay_us(us)
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay_ms(ms)
    }
}

impl fugit_timer::Delay<1_000_000> for SysDelay {
    type Error = core::convert::Infallible;

    fn delay(&mut self, duration: MicrosDurationU32) -> Result<(), Self::Error> {
        self.delay(duration);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::pac::{sim, syst};

    const ENABLE: u32 = 1 << 0;
    const TICKINT: u32 = 1 << 1;
    const CLKSOURCE: u32 = 1 << 2;
    const COUNTFLAG: u32 = 1 << 16;

    /// Moves a handle to RAM-backed registers onto another thread
    struct OnThread<T>(T);

    // The test drives the block from one thread at a time, handing over
    // through COUNTFLAG, ENABLE and CVR
    unsafe impl<T> Send for OnThread<T> {}

    impl<T> OnThread<T> {
        fn into_inner(self) -> T {
            self.0
        }
    }

    fn delay(csr: u32) -> (SysDelay, &'static syst::RegisterBlock) {
        let rb = sim(syst::RegisterBlock::reset());
        rb.csr.write(csr);
        rb.cvr.write(1234);
        (SYST::bind(rb).delay(&Clocks::default()), rb)
    }

    fn wait_until(cond: impl Fn() -> bool) {
        while !cond() {
            thread::yield_now();
        }
    }

    /// One countdown to zero while `delay_ms` polls: waits for the counter to
    /// run with the previous wrap consumed, then raises COUNTFLAG
    fn wrap(rb: &syst::RegisterBlock) {
        wait_until(|| rb.csr.read() & (ENABLE | COUNTFLAG) == ENABLE);
        rb.csr.set_bits(COUNTFLAG);
    }

    /// One reload-sized chunk of `delay_us`: waits for the chunk to be armed
    /// (CVR cleared, then the counter enabled), reloads CVR and raises COUNTFLAG.
    /// Returns the reload value of the chunk.
    fn wrap_chunk(rb: &syst::RegisterBlock) -> u32 {
        wait_until(|| rb.cvr.read() == 0);
        wait_until(|| rb.csr.read() & (ENABLE | COUNTFLAG) == ENABLE);
        let reload = rb.rvr.read();
        rb.cvr.write(reload);
        rb.csr.set_bits(COUNTFLAG);
        reload
    }

    #[test]
    fn new_stops_the_counter_and_its_interrupt() {
        let (_delay, rb) = delay(ENABLE | TICKINT);
        assert_eq!(rb.csr.read(), 0);
    }

    #[test]
    fn millisecond_reload_at_8_mhz() {
        let (mut delay, rb) = delay(COUNTFLAG);
        delay.delay_ms(1);

        assert_eq!(rb.rvr.read(), 7_999);
        assert_eq!(rb.cvr.read(), 0);
        // the wrap was consumed and the counter stopped
        assert_eq!(rb.csr.read(), CLKSOURCE);
    }

    #[test]
    fn delay_ms_waits_for_exactly_n_wraps() {
        const N: u32 = 3;

        let (delay, rb) = delay(0);
        let delay = OnThread(delay);
        let waiting = thread::spawn(move || {
            let mut delay = delay.into_inner();
            delay.delay_ms(N);
            OnThread(delay)
        });

        for _ in 0..N - 1 {
            wrap(rb);
        }
        // the last raised wrap has been seen and the delay keeps polling
        wait_until(|| rb.csr.read() & COUNTFLAG == 0);
        thread::sleep(Duration::from_millis(50));
        assert!(!waiting.is_finished());
        assert_eq!(rb.csr.read() & ENABLE, ENABLE);

        wrap(rb);
        let _delay = waiting.join().unwrap().into_inner();
        assert_eq!(rb.csr.read(), CLKSOURCE);
    }

    #[test]
    fn zero_milliseconds_does_not_poll() {
        // with COUNTFLAG clear a single poll would spin forever
        let (mut delay, rb) = delay(0);
        delay.delay_ms(0);

        assert_eq!(rb.csr.read() & ENABLE, 0);
        assert_eq!(rb.rvr.read(), 7_999);
    }

    #[test]
    fn microseconds_fit_in_one_reload() {
        let (mut delay, rb) = delay(COUNTFLAG);
        delay.delay_us(100);
        assert_eq!(rb.rvr.read(), 800);
        assert_eq!(rb.csr.read(), CLKSOURCE);

        delay.delay_us(0);
        assert_eq!(rb.rvr.read(), 800);
    }

    #[test]
    fn long_waits_are_split_into_24_bit_chunks() {
        let (delay, rb) = delay(0);
        let delay = OnThread(delay);
        // 3 s at 8 MHz is 24_000_000 ticks: one full reload, then the remainder
        let waiting = thread::spawn(move || {
            let mut delay = delay.into_inner();
            delay.delay_us(3_000_000);
            OnThread(delay)
        });

        assert_eq!(wrap_chunk(rb), SYST_RVR_MAX);
        assert_eq!(wrap_chunk(rb), 24_000_000 - SYST_RVR_MAX);
        let _delay = waiting.join().unwrap().into_inner();

        assert_eq!(rb.csr.read() & (ENABLE | COUNTFLAG), 0);
    }

    #[test]
    fn trait_delays() {
        use embedded_hal::delay::DelayNs;

        let (mut delay, rb) = delay(COUNTFLAG);
        DelayNs::delay_ns(&mut delay, 1_500);
        assert_eq!(rb.rvr.read(), 16);

        rb.csr.set_bits(COUNTFLAG);
        fugit_timer::Delay::delay(&mut delay, MicrosDurationU32::from_ticks(3)).unwrap();
        assert_eq!(rb.rvr.read(), 24);

        let syst = delay.release();
        assert_eq!(syst.csr.read() & ENABLE, 0);
    }
}
