//! SPI (Serial Peripheral Interface) abstraction

use crate::error::HalResult;

/// SPI mode (clock polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiMode {
    /// CPOL=0, CPHA=0
    Mode0,
    /// CPOL=0, CPHA=1
    Mode1,
    /// CPOL=1, CPHA=0
    Mode2,
    /// CPOL=1, CPHA=1
    Mode3,
}

/// SPI bit order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

/// SPI configuration
#[derive(Debug, Clone)]
pub struct SpiConfig {
    pub frequency: u32,
    pub mode: SpiMode,
    pub bit_order: BitOrder,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency: 1_000_000, // 1 MHz
            mode: SpiMode::Mode0,
            bit_order: BitOrder::MsbFirst,
        }
    }
}

/// Byte clocked out when only reading
pub const DUMMY_BYTE: u8 = 0xFF;

/// SPI master with a driver-controlled chip select line
pub trait SpiMaster {
    /// Configure SPI parameters
    fn configure(&mut self, config: &SpiConfig) -> HalResult<()>;

    /// Drive chip select low
    fn select(&mut self) -> HalResult<()>;

    /// Release chip select
    fn deselect(&mut self) -> HalResult<()>;

    /// Exchange one byte
    fn transfer_byte(&mut self, byte: u8) -> HalResult<u8>;

    /// Full-duplex transfer without touching chip select
    fn transfer(&mut self, tx_data: &[u8], rx_buffer: &mut [u8]) -> HalResult<()> {
        for (tx, rx) in tx_data.iter().zip(rx_buffer.iter_mut()) {
            *rx = self.transfer_byte(*tx)?;
        }
        Ok(())
    }

    /// Select, write every byte, deselect
    fn write(&mut self, data: &[u8]) -> HalResult<()> {
        self.select()?;
        let result: HalResult<()> = data
            .iter()
            .try_for_each(|&byte| self.transfer_byte(byte).map(|_| ()));
        self.deselect()?;
        result
    }

    /// Select, clock in `buffer.len()` bytes, deselect
    fn read(&mut self, buffer: &mut [u8]) -> HalResult<()> {
        self.select()?;
        let result: HalResult<()> = buffer.iter_mut().try_for_each(|slot| {
            *slot = self.transfer_byte(DUMMY_BYTE)?;
            Ok(())
        });
        self.deselect()?;
        result
    }

    /// Select, full-duplex transfer, deselect
    fn write_read(&mut self, tx_data: &[u8], rx_buffer: &mut [u8]) -> HalResult<()> {
        self.select()?;
        let result = self.transfer(tx_data, rx_buffer);
        self.deselect()?;
        result
    }
}

/// Interrupt-driven transfers (RXNE/TXE)
pub trait SpiInterrupt: SpiMaster {
    /// Select the device and start clocking `tx_data` out.
    ///
    /// Chip select is released when the last byte arrives and `on_complete`
    /// receives the bytes clocked in. Fails with `Busy` while a transfer is
    /// still running.
    fn start_transfer(&mut self, tx_data: &[u8], on_complete: fn(&[u8])) -> HalResult<()>;

    fn is_busy(&self) -> bool;
}

/// DMA transfers on paired RX/TX channels
pub trait SpiDma: SpiMaster {
    /// Like [`SpiInterrupt::start_transfer`] but moved by DMA
    fn start_dma_transfer(&mut self, tx_data: &[u8], on_complete: fn(&[u8])) -> HalResult<()>;

    fn is_dma_busy(&self) -> bool;
}
