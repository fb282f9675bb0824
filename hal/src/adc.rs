//! ADC (Analog-to-Digital Converter) abstraction

use crate::error::HalResult;

/// ADC resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcResolution {
    Bits8,
    Bits10,
    Bits12,
    Bits16,
}

impl AdcResolution {
    pub const fn max_value(self) -> u16 {
        match self {
            AdcResolution::Bits8 => 0xFF,
            AdcResolution::Bits10 => 0x3FF,
            AdcResolution::Bits12 => 0xFFF,
            AdcResolution::Bits16 => 0xFFFF,
        }
    }
}

/// ADC reference voltage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcReference {
    /// Internal reference
    Internal,
    /// External reference on VREF pin
    External,
    /// VCC/VDD as reference
    Vcc,
}

/// Sample time in ADC clock cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleTime {
    Cycles1_5,
    Cycles7_5,
    Cycles13_5,
    Cycles28_5,
    Cycles41_5,
    Cycles55_5,
    Cycles71_5,
    Cycles239_5,
}

/// ADC configuration
#[derive(Debug, Clone)]
pub struct AdcConfig {
    pub resolution: AdcResolution,
    pub reference: AdcReference,
    pub sample_time: SampleTime,
    /// Restart conversion automatically after each one completes
    pub continuous: bool,
    /// Reference voltage in millivolts, used for `read_millivolts`
    pub reference_mv: u32,
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            resolution: AdcResolution::Bits12,
            reference: AdcReference::Vcc,
            sample_time: SampleTime::Cycles239_5,
            continuous: false,
            reference_mv: 3300,
        }
    }
}

/// Single regular ADC channel
pub trait AdcChannel {
    /// Configure the converter for this channel
    fn configure(&mut self, config: &AdcConfig) -> HalResult<()>;

    /// Run the reset and start calibration sequence
    fn calibrate(&mut self) -> HalResult<()>;

    /// Start one software-triggered conversion
    fn start_conversion(&mut self) -> HalResult<()>;

    /// End-of-conversion flag
    fn is_conversion_complete(&self) -> bool;

    /// Read the last converted value
    fn read_raw(&mut self) -> HalResult<u16>;

    /// Start a conversion and spin until it completes
    fn convert(&mut self) -> HalResult<u16> {
        self.start_conversion()?;
        while !self.is_conversion_complete() {
            core::hint::spin_loop();
        }
        self.read_raw()
    }

    /// Get channel number
    fn channel_number(&self) -> u8;
}

/// End-of-conversion interrupt
pub trait AdcInterrupt: AdcChannel {
    /// Enable the EOC interrupt; `handler` receives the converted value
    fn listen_end_of_conversion(&mut self, handler: fn(u16)) -> HalResult<()>;

    fn unlisten_end_of_conversion(&mut self) -> HalResult<()>;
}

/// Continuous conversion into a circular DMA buffer
pub trait AdcDma: AdcChannel {
    /// Start continuous conversion filling `samples` half-words circularly.
    ///
    /// `on_complete` runs from the transfer-complete interrupt with the
    /// whole buffer each time it wraps.
    fn start_circular(&mut self, samples: usize, on_complete: fn(&[u16])) -> HalResult<()>;

    fn stop_circular(&mut self) -> HalResult<()>;
}

/// Convert a raw reading to millivolts
pub fn to_millivolts(raw: u16, config: &AdcConfig) -> u32 {
    u32::from(raw) * config.reference_mv / u32::from(config.resolution.max_value())
}
