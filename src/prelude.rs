pub use crate::afio::AfioExt as _stm32_hal_afio_AfioExt;
pub use crate::delay::SysTimerExt as _stm32_hal_delay_SysTimerExt;
pub use crate::gpio::GpioExt as _stm32_hal_gpio_GpioExt;
pub use crate::gpio::OutputSpeed as _stm32_hal_gpio_OutputSpeed;
pub use crate::rcc::RccExt as _stm32_hal_rcc_RccExt;
pub use crate::serial::SerialExt as _stm32_hal_serial_SerialExt;
pub use crate::time::U32Ext as _stm32_hal_time_U32Ext;
pub use fugit::ExtU32 as _fugit_ExtU32;
pub use fugit::RateExtU32 as _fugit_RateExtU32;
