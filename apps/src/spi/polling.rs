//! SPI Polling: write, read and full-duplex transfer of five bytes

use appfw_core::Application;
use appfw_hal::spi::SpiMaster;
use appfw_hal::{DelayNs, HalResult};
use log::{info, warn};

use super::init_bus;
use crate::hex::HexBytes;

const LEN: usize = 5;
const GAP_MS: u32 = 100;
const PERIOD_MS: u32 = 2_000;

pub struct SpiPolling<S, D> {
    spi: S,
    delay: D,
    test_data: [u8; LEN],
    rx_buffer: [u8; LEN],
    loop_counter: u32,
}

impl<S: SpiMaster, D: DelayNs> SpiPolling<S, D> {
    pub fn new(spi: S, delay: D) -> Self {
        Self {
            spi,
            delay,
            test_data: [0x01, 0x02, 0x03, 0x04, 0x05],
            rx_buffer: [0; LEN],
            loop_counter: 0,
        }
    }

    pub fn test_data(&self) -> &[u8; LEN] {
        &self.test_data
    }

    pub fn rx_buffer(&self) -> &[u8; LEN] {
        &self.rx_buffer
    }

    pub fn loop_counter(&self) -> u32 {
        self.loop_counter
    }

    fn exchange(&mut self) -> HalResult<()> {
        info!("SPI Polling: Writing data: {}", HexBytes(&self.test_data));
        self.spi.write(&self.test_data)?;
        self.delay.delay_ms(GAP_MS);

        self.spi.read(&mut self.rx_buffer)?;
        info!("SPI Polling: Reading data: {}", HexBytes(&self.rx_buffer));
        self.delay.delay_ms(GAP_MS);

        info!("SPI Polling: Write/Read simultaneously");
        self.spi.write_read(&self.test_data, &mut self.rx_buffer)?;
        info!("SPI Polling: Sent: {}", HexBytes(&self.test_data));
        info!("SPI Polling: Received: {}", HexBytes(&self.rx_buffer));
        Ok(())
    }
}

impl<S: SpiMaster, D: DelayNs> Application for SpiPolling<S, D> {
    fn setup(&mut self) {
        info!("SPI Polling Setup");
        match init_bus(&mut self.spi) {
            Ok(()) => info!("SPI Polling: SPI1 configured as master"),
            Err(err) => warn!("SPI Polling: init failed: {}", err),
        }
    }

    fn tick(&mut self) {
        info!("SPI Polling: Loop #{}", self.loop_counter);
        if let Err(err) = self.exchange() {
            warn!("SPI Polling: transfer failed: {}", err);
        }

        for byte in self.test_data.iter_mut() {
            *byte = byte.wrapping_add(1);
        }
        self.loop_counter = self.loop_counter.wrapping_add(1);
        self.delay.delay_ms(PERIOD_MS);
    }
}
