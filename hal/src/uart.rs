//! UART (Universal Asynchronous Receiver/Transmitter) abstraction

use crate::error::{HalError, HalResult};
use crate::interrupt::Handler;

/// UART data bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Eight,
    Nine,
}

/// UART stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

/// UART parity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// UART flow control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
    None,
    RtsCts,
}

/// UART configuration
#[derive(Debug, Clone)]
pub struct UartConfig {
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    pub parity: Parity,
    pub flow_control: FlowControl,
}

impl UartConfig {
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115200,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::None,
            flow_control: FlowControl::None,
        }
    }
}

/// UART peripheral trait
///
/// Single-byte operations are non-blocking and report `WouldBlock` while the
/// data register is empty (RX) or still full (TX).
pub trait UartPort {
    /// Configure UART parameters and enable the peripheral
    fn configure(&mut self, config: &UartConfig) -> HalResult<()>;

    /// Read one byte if the receive register holds one
    fn read(&mut self) -> nb::Result<u8, HalError>;

    /// Write one byte if the transmit register is empty
    fn write(&mut self, byte: u8) -> nb::Result<(), HalError>;

    /// Wait for transmission complete
    fn flush(&mut self) -> nb::Result<(), HalError>;

    /// Write every byte, blocking on each
    fn write_all(&mut self, data: &[u8]) -> HalResult<()> {
        for &byte in data {
            nb::block!(self.write(byte))?;
        }
        nb::block!(self.flush())
    }
}

/// UART receive and transmit-empty interrupts
pub trait UartInterrupt: UartPort {
    /// Enable RXNE; `handler` receives each byte
    fn listen_rx(&mut self, handler: fn(u8)) -> HalResult<()>;

    /// Bind the TXE source.
    ///
    /// While enabled, `handler` is asked for the next byte each time the
    /// transmit register empties; returning `None` disables TXE again.
    fn listen_tx_empty(&mut self, handler: fn() -> Option<u8>) -> HalResult<()>;

    /// Enable TXE so the bound handler starts feeding bytes
    fn enable_tx_interrupt(&mut self) -> HalResult<()>;

    fn disable_interrupts(&mut self) -> HalResult<()>;
}

/// UART with DMA on both directions
///
/// The receive buffer is owned by the driver and filled circularly.
pub trait UartDma: UartPort {
    /// Start reception of up to `len` bytes into the DMA buffer
    fn start_rx_dma(&mut self, len: usize, on_complete: Handler) -> HalResult<()>;

    /// Bytes written by DMA since the last (re)start
    fn rx_dma_count(&self) -> usize;

    /// Byte at `index` in the DMA receive buffer
    fn rx_dma_byte(&self, index: usize) -> Option<u8>;

    /// Reload the receive counter so reception starts at index 0 again
    fn restart_rx_dma(&mut self) -> HalResult<()>;

    /// Start transmitting `data`; `on_complete` runs on transfer complete
    fn start_tx_dma(&mut self, data: &[u8], on_complete: Handler) -> HalResult<()>;
}
