use super::*;

/// Data synchronization barrier; no-op off-target
#[inline(always)]
fn dsb() {
    #[cfg(target_arch = "arm")]
    cortex_m::asm::dsb();
    #[cfg(not(target_arch = "arm"))]
    core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::SeqCst);
}

macro_rules! bus_enable {
    ($PER:ident => $bit:literal) => {
        impl Enable for crate::pac::$PER {
            #[inline(always)]
            fn enable(rcc: &rcc::RegisterBlock) {
                Self::Bus::enr(rcc).set_bits(1 << $bit);
                // Stall the pipeline to work around erratum 2.1.13 (DM00037591)
                dsb();
            }
            #[inline(always)]
            fn disable(rcc: &rcc::RegisterBlock) {
                Self::Bus::enr(rcc).clear_bits(1 << $bit);
            }
            #[inline(always)]
            fn is_enabled(rcc: &rcc::RegisterBlock) -> bool {
                Self::Bus::enr(rcc).bit_is_set($bit)
            }
        }
    };
}

macro_rules! bus_reset {
    ($PER:ident => $bit:literal) => {
        impl Reset for crate::pac::$PER {
            #[inline(always)]
            fn reset(rcc: &rcc::RegisterBlock) {
                let rstr = Self::Bus::rstr(rcc);
                rstr.set_bits(1 << $bit);
                rstr.clear_bits(1 << $bit);
            }
        }
    };
}

macro_rules! bus {
    ($($PER:ident => ($busX:ty, $bit:literal),)+) => {
        $(
            impl RccBus for crate::pac::$PER {
                type Bus = $busX;
            }
            bus_enable!($PER => $bit);
            bus_reset!($PER => $bit);
        )+
    }
}

bus! {
    AFIO => (APB2, 0),
    GPIOA => (APB2, 2),
    GPIOB => (APB2, 3),
    GPIOC => (APB2, 4),
    USART1 => (APB2, 14),
    USART2 => (APB1, 17),
    USART3 => (APB1, 18),
}
