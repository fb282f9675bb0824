//! Hardware abstraction layer for the appfw peripheral demos
//!
//! Vendor-agnostic traits for the peripherals the demos exercise, plus the
//! small set of primitives used to hand data from interrupt handlers to the
//! superloop. A board crate implements the traits; the demos only ever see
//! the traits.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]

pub mod adc;
pub mod error;
pub mod flash;
pub mod gpio;
pub mod i2c;
pub mod interrupt;
pub mod irq;
pub mod rtc;
pub mod spi;
pub mod timer;
pub mod uart;
pub mod watchdog;

/// Millisecond/microsecond delays come straight from `embedded-hal`
pub use embedded_hal::delay::DelayNs;

// Re-export commonly used types
pub use error::{HalError, HalResult};
pub use interrupt::{Handler, Vector};
pub use irq::{IrqCell, IrqCounter, IrqFlag, IrqRing};
