//! I2C demos against a 24Cxx-style EEPROM at 0xA0

pub mod dma;
pub mod interrupt;
pub mod polling;

pub use dma::I2cDmaDemo;
pub use interrupt::I2cInterruptDemo;
pub use polling::I2cPolling;

use appfw_hal::i2c::{I2cAddress, I2cConfig, I2cMaster};
use appfw_hal::HalResult;

/// EEPROM write address 0xA0
pub const EEPROM: I2cAddress = I2cAddress::from_write_byte(0xA0);

/// EEPROM cell used by the single-byte demos
pub const TEST_REGISTER: u8 = 0x00;

fn init_bus<I: I2cMaster>(i2c: &mut I) -> HalResult<()> {
    i2c.configure(&I2cConfig::default())
}
