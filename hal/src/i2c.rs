//! I2C (Inter-Integrated Circuit) abstraction

use crate::error::HalResult;

/// I2C address (7-bit or 10-bit)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum I2cAddress {
    SevenBit(u8),
    TenBit(u16),
}

impl I2cAddress {
    /// Build from the 8-bit write address used in datasheets (e.g. 0xA0)
    pub const fn from_write_byte(byte: u8) -> Self {
        I2cAddress::SevenBit(byte >> 1)
    }
}

/// I2C speed mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum I2cSpeed {
    /// Standard mode (100 kHz)
    Standard,
    /// Fast mode (400 kHz)
    Fast,
}

/// I2C configuration
#[derive(Debug, Clone)]
pub struct I2cConfig {
    pub speed: I2cSpeed,
    /// Own address when addressed as a slave
    pub own_address: u8,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            speed: I2cSpeed::Standard,
            own_address: 0x30,
        }
    }
}

/// Completion reported by interrupt-driven transfers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum I2cEvent {
    /// Register write finished with STOP
    Written,
    /// Register read finished with the received byte
    Read(u8),
    /// Acknowledge failure; the driver already sent STOP
    Nack,
}

/// I2C master trait
pub trait I2cMaster {
    /// Configure I2C parameters
    fn configure(&mut self, config: &I2cConfig) -> HalResult<()>;

    /// Write data to slave
    fn write(&mut self, address: I2cAddress, data: &[u8]) -> HalResult<()>;

    /// Read data from slave
    fn read(&mut self, address: I2cAddress, buffer: &mut [u8]) -> HalResult<()>;

    /// Write then read (restart condition)
    fn write_read(
        &mut self,
        address: I2cAddress,
        write_data: &[u8],
        read_buffer: &mut [u8],
    ) -> HalResult<()>;

    /// Write one byte into a device register
    fn write_register(&mut self, address: I2cAddress, register: u8, value: u8) -> HalResult<()> {
        self.write(address, &[register, value])
    }

    /// Read one byte from a device register
    fn read_register(&mut self, address: I2cAddress, register: u8) -> HalResult<u8> {
        let mut value = [0u8];
        self.write_read(address, &[register], &mut value)?;
        Ok(value[0])
    }
}

/// Event/error interrupt driven single-register transfers
pub trait I2cInterrupt: I2cMaster {
    /// Generate START and run `register <- value` from the event interrupt
    fn start_write(
        &mut self,
        address: I2cAddress,
        register: u8,
        value: u8,
        on_event: fn(I2cEvent),
    ) -> HalResult<()>;

    /// Generate START and read `register` from the event interrupt
    fn start_read(&mut self, address: I2cAddress, register: u8, on_event: fn(I2cEvent))
        -> HalResult<()>;

    fn is_busy(&self) -> bool;
}

/// Block transfers moved by DMA
///
/// Both calls return once the DMA transfer-complete interrupt has fired and
/// STOP has been generated.
pub trait I2cDma: I2cMaster {
    fn write_dma(&mut self, address: I2cAddress, data: &[u8]) -> HalResult<()>;

    /// Write `register`, then read `buffer.len()` bytes by DMA
    fn read_dma(&mut self, address: I2cAddress, register: u8, buffer: &mut [u8]) -> HalResult<()>;
}
