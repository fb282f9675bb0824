//! I2C DMA: alternating 8-byte block write and block read

use appfw_core::Application;
use appfw_hal::i2c::I2cDma;
use appfw_hal::DelayNs;
use log::{info, warn};

use super::{init_bus, EEPROM, TEST_REGISTER};
use crate::hex::HexBytes;

/// Bytes per DMA transfer
pub const BUFFER_SIZE: usize = 8;

const PERIOD_MS: u32 = 2_000;

pub struct I2cDmaDemo<I, D> {
    i2c: I,
    delay: D,
    tx_buffer: [u8; BUFFER_SIZE],
    rx_buffer: [u8; BUFFER_SIZE],
    writing: bool,
}

impl<I: I2cDma, D: DelayNs> I2cDmaDemo<I, D> {
    pub fn new(i2c: I, delay: D) -> Self {
        Self {
            i2c,
            delay,
            tx_buffer: [0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77],
            rx_buffer: [0; BUFFER_SIZE],
            writing: true,
        }
    }

    pub fn tx_buffer(&self) -> &[u8; BUFFER_SIZE] {
        &self.tx_buffer
    }

    pub fn rx_buffer(&self) -> &[u8; BUFFER_SIZE] {
        &self.rx_buffer
    }

    fn write_block(&mut self) {
        info!("I2C DMA: Writing {} bytes", BUFFER_SIZE);
        match self.i2c.write_dma(EEPROM, &self.tx_buffer) {
            Ok(()) => info!("I2C DMA: Write successful"),
            Err(_) => info!("I2C DMA: Write failed"),
        }
    }

    fn read_block(&mut self) {
        info!("I2C DMA: Reading {} bytes", BUFFER_SIZE);
        match self.i2c.read_dma(EEPROM, TEST_REGISTER, &mut self.rx_buffer) {
            Ok(()) => info!("I2C DMA: Read successful - {}", HexBytes(&self.rx_buffer)),
            Err(_) => info!("I2C DMA: Read failed"),
        }
        for byte in self.tx_buffer.iter_mut() {
            *byte = byte.wrapping_add(1);
        }
    }
}

impl<I: I2cDma, D: DelayNs> Application for I2cDmaDemo<I, D> {
    fn setup(&mut self) {
        info!("I2C DMA Setup");
        if let Err(err) = init_bus(&mut self.i2c) {
            warn!("I2C DMA: init failed: {}", err);
        }
    }

    fn tick(&mut self) {
        if self.writing {
            self.write_block();
        } else {
            self.read_block();
        }
        self.writing = !self.writing;
        self.delay.delay_ms(PERIOD_MS);
    }
}
