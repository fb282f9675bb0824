//! ADC demos: polled, end-of-conversion interrupt, circular DMA

pub mod dma;
pub mod interrupt;
pub mod polling;

pub use dma::AdcDmaDemo;
pub use interrupt::AdcInterruptDemo;
pub use polling::AdcPolling;

use appfw_hal::adc::{AdcChannel, AdcConfig};
use appfw_hal::HalResult;

const SAMPLE_PERIOD_MS: u32 = 1_000;

fn init_channel<A: AdcChannel>(adc: &mut A, config: &AdcConfig) -> HalResult<()> {
    adc.configure(config)?;
    adc.calibrate()
}
