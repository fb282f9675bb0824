//! GPIO demos: polled button and EXTI button, both toggling the PC13 LED

pub mod interrupt;
pub mod polling;

pub use interrupt::GpioInterruptDemo;
pub use polling::GpioPolling;
