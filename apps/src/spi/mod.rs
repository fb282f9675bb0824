//! SPI demos on SPI1 as master, PA4 chip select

pub mod dma;
pub mod interrupt;
pub mod polling;

pub use dma::SpiDmaDemo;
pub use interrupt::SpiInterruptDemo;
pub use polling::SpiPolling;

use appfw_hal::spi::{BitOrder, SpiConfig, SpiMaster, SpiMode};
use appfw_hal::{HalResult, IrqCell};

/// Largest transfer the interrupt and DMA demos queue
pub const MAX_TRANSFER: usize = 16;

fn init_bus<S: SpiMaster>(spi: &mut S) -> HalResult<()> {
    // 72 MHz / 16
    let config = SpiConfig {
        frequency: 4_500_000,
        mode: SpiMode::Mode0,
        bit_order: BitOrder::MsbFirst,
    };
    spi.configure(&config)?;
    spi.deselect()
}

/// Received bytes handed over by a completion handler
struct RxBuffer {
    bytes: IrqCell<[u8; MAX_TRANSFER]>,
    len: IrqCell<usize>,
}

impl RxBuffer {
    const fn new() -> Self {
        Self {
            bytes: IrqCell::new([0; MAX_TRANSFER]),
            len: IrqCell::new(0),
        }
    }

    fn store(&self, data: &[u8]) {
        let mut bytes = [0u8; MAX_TRANSFER];
        let len = data.len().min(MAX_TRANSFER);
        bytes[..len].copy_from_slice(&data[..len]);
        self.bytes.set(bytes);
        self.len.set(len);
    }

    fn load(&self) -> ([u8; MAX_TRANSFER], usize) {
        (self.bytes.get(), self.len.get())
    }
}
