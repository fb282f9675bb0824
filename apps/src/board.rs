//! Board abstraction handed to the demo catalog

use appfw_hal::adc::{AdcDma, AdcInterrupt};
use appfw_hal::flash::Flash;
use appfw_hal::gpio::{GpioPinInterrupt, PinId};
use appfw_hal::i2c::{I2cDma, I2cInterrupt};
use appfw_hal::rtc::{BackupRegisters, Rtc};
use appfw_hal::spi::{SpiDma, SpiInterrupt};
use appfw_hal::timer::{PwmChannel, Timer};
use appfw_hal::uart::{UartDma, UartInterrupt};
use appfw_hal::watchdog::Watchdog;
use appfw_hal::DelayNs;

/// Source of peripheral handles.
///
/// Handles are lightweight proxies: asking twice for the same peripheral
/// (every GPIO demo wants PC13) yields two handles to the same hardware.
/// Only the selected demo ever touches its handles, so this never races.
pub trait Board {
    type Pin: GpioPinInterrupt;
    type Adc: AdcInterrupt + AdcDma;
    type I2c: I2cInterrupt + I2cDma;
    type Spi: SpiInterrupt + SpiDma;
    type Timer: Timer;
    type Pwm: PwmChannel;
    type Uart: UartInterrupt + UartDma;
    type Rtc: Rtc + BackupRegisters;
    type Flash: Flash;
    type Watchdog: Watchdog;
    type Delay: DelayNs;

    fn pin(&self, id: PinId) -> Self::Pin;

    /// ADC1 regular channel `channel` (PA0..PA7)
    fn adc(&self, channel: u8) -> Self::Adc;

    /// I2C1 on PB6/PB7
    fn i2c(&self) -> Self::I2c;

    /// SPI1 with PA4 as chip select
    fn spi(&self) -> Self::Spi;

    /// TIM2 general-purpose timer
    fn timer(&self) -> Self::Timer;

    /// TIM3 output compare channel `channel` (1 = PA6, 2 = PA7)
    fn pwm(&self, channel: u8) -> Self::Pwm;

    /// USART1 on PA9/PA10
    fn uart(&self) -> Self::Uart;

    fn rtc(&self) -> Self::Rtc;

    fn flash(&self) -> Self::Flash;

    fn watchdog(&self) -> Self::Watchdog;

    fn delay(&self) -> Self::Delay;
}
