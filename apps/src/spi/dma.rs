//! SPI DMA: 16-byte DMA write, a pause of ten passes, DMA read

use appfw_core::Application;
use appfw_hal::spi::{SpiDma, DUMMY_BYTE};
use appfw_hal::{DelayNs, IrqFlag};
use log::{info, warn};

use super::{init_bus, RxBuffer, MAX_TRANSFER};
use crate::hex::HexBytes;

/// Passes between the end of a write and the following read
pub const READ_AFTER_PASSES: u32 = 10;

const PERIOD_MS: u32 = 100;

static DMA_COMPLETE: IrqFlag = IrqFlag::raised();
static RECEIVED: RxBuffer = RxBuffer::new();

/// DMA1 channel 2/3 transfer-complete handler
pub fn on_dma_complete(rx: &[u8]) {
    RECEIVED.store(rx);
    DMA_COMPLETE.set();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Next pass starts a write
    Write,
    /// Write started at pass `since`
    Written { since: u32 },
    /// Read in flight
    Reading,
}

pub struct SpiDmaDemo<S, D> {
    spi: S,
    delay: D,
    test_data: [u8; MAX_TRANSFER],
    loop_counter: u32,
    passes: u32,
    phase: Phase,
    last_rx: Option<[u8; MAX_TRANSFER]>,
}

impl<S: SpiDma, D: DelayNs> SpiDmaDemo<S, D> {
    pub fn new(spi: S, delay: D) -> Self {
        Self {
            spi,
            delay,
            test_data: [
                0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80, 0x90, 0xA0, 0xB0, 0xC0, 0xD0,
                0xE0, 0xF0, 0x00,
            ],
            loop_counter: 0,
            passes: 0,
            phase: Phase::Write,
            last_rx: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn loop_counter(&self) -> u32 {
        self.loop_counter
    }

    pub fn test_data(&self) -> &[u8; MAX_TRANSFER] {
        &self.test_data
    }

    pub fn last_rx(&self) -> Option<&[u8; MAX_TRANSFER]> {
        self.last_rx.as_ref()
    }

    fn start(&mut self, tx: &[u8; MAX_TRANSFER]) -> bool {
        DMA_COMPLETE.clear();
        match self.spi.start_dma_transfer(tx, on_dma_complete) {
            Ok(()) => true,
            Err(err) => {
                DMA_COMPLETE.set();
                warn!("SPI DMA: start failed: {}", err);
                false
            }
        }
    }

    fn advance(&mut self) {
        match self.phase {
            Phase::Write => {
                info!(
                    "SPI DMA: Loop #{} - Writing {} bytes",
                    self.loop_counter, MAX_TRANSFER
                );
                info!("SPI DMA: TX Data: {}", HexBytes(&self.test_data));
                let tx = self.test_data;
                if self.start(&tx) {
                    self.phase = Phase::Written { since: self.passes };
                }
            }
            Phase::Written { since } => {
                if self.passes.wrapping_sub(since) >= READ_AFTER_PASSES {
                    info!("SPI DMA: Reading {} bytes", MAX_TRANSFER);
                    if self.start(&[DUMMY_BYTE; MAX_TRANSFER]) {
                        self.phase = Phase::Reading;
                    }
                }
            }
            Phase::Reading => {
                let (bytes, _) = RECEIVED.load();
                info!("SPI DMA: RX Data: {}", HexBytes(&bytes));
                self.last_rx = Some(bytes);
                self.phase = Phase::Write;
                self.loop_counter = self.loop_counter.wrapping_add(1);
                for byte in self.test_data.iter_mut() {
                    *byte = byte.wrapping_add(1);
                }
            }
        }
    }
}

impl<S: SpiDma, D: DelayNs> Application for SpiDmaDemo<S, D> {
    fn setup(&mut self) {
        info!("SPI DMA Setup");
        DMA_COMPLETE.set();
        match init_bus(&mut self.spi) {
            Ok(()) => info!("SPI DMA: SPI1 configured as master with DMA"),
            Err(err) => warn!("SPI DMA: init failed: {}", err),
        }
    }

    fn tick(&mut self) {
        if DMA_COMPLETE.is_set() {
            self.advance();
        }
        self.passes = self.passes.wrapping_add(1);
        self.delay.delay_ms(PERIOD_MS);
    }
}
