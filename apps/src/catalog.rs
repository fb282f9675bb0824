//! The twenty demos in registration order

use appfw_core::AppContext;
use appfw_hal::gpio::pins;

use crate::adc::{AdcDmaDemo, AdcInterruptDemo, AdcPolling};
use crate::board::Board;
use crate::flash::FlashDemo;
use crate::gpio::{GpioInterruptDemo, GpioPolling};
use crate::hello::HelloWorld;
use crate::i2c::{I2cDmaDemo, I2cInterruptDemo, I2cPolling};
use crate::rtc::RtcDemo;
use crate::spi::{SpiDmaDemo, SpiInterruptDemo, SpiPolling};
use crate::timer::{TimerInterruptDemo, TimerPwm};
use crate::uart::{UartDmaDemo, UartInterruptDemo, UartPolling};
use crate::watchdog::WatchdogDemo;

/// Display names; the position is the index the demo is selected by
pub const APP_NAMES: [&str; 20] = [
    "Hello World",
    "ADC Polling",
    "ADC Interrupt",
    "ADC DMA",
    "GPIO Polling",
    "GPIO Interrupt",
    "I2C Polling",
    "I2C Interrupt",
    "I2C DMA",
    "SPI Polling",
    "SPI Interrupt",
    "SPI DMA",
    "Timer Interrupt",
    "Timer PWM",
    "UART Polling",
    "UART Interrupt",
    "UART DMA",
    "RTC",
    "Flash",
    "Watchdog",
];

/// Every demo, wired to one board
///
/// Constructing the catalog touches no hardware; peripherals are configured
/// by the selected demo's `setup`.
pub struct Catalog<B: Board> {
    pub hello: HelloWorld<B::Pin, B::Delay>,
    pub adc_polling: AdcPolling<B::Adc, B::Delay>,
    pub adc_interrupt: AdcInterruptDemo<B::Adc, B::Delay>,
    pub adc_dma: AdcDmaDemo<B::Adc, B::Delay>,
    pub gpio_polling: GpioPolling<B::Pin, B::Delay>,
    pub gpio_interrupt: GpioInterruptDemo<B::Pin, B::Delay>,
    pub i2c_polling: I2cPolling<B::I2c, B::Delay>,
    pub i2c_interrupt: I2cInterruptDemo<B::I2c, B::Delay>,
    pub i2c_dma: I2cDmaDemo<B::I2c, B::Delay>,
    pub spi_polling: SpiPolling<B::Spi, B::Delay>,
    pub spi_interrupt: SpiInterruptDemo<B::Spi, B::Delay>,
    pub spi_dma: SpiDmaDemo<B::Spi, B::Delay>,
    pub timer_interrupt: TimerInterruptDemo<B::Timer, B::Pin, B::Delay>,
    pub timer_pwm: TimerPwm<B::Pwm, B::Delay>,
    pub uart_polling: UartPolling<B::Uart, B::Delay>,
    pub uart_interrupt: UartInterruptDemo<B::Uart, B::Delay>,
    pub uart_dma: UartDmaDemo<B::Uart, B::Delay>,
    pub rtc: RtcDemo<B::Rtc, B::Delay>,
    pub flash: FlashDemo<B::Flash, B::Delay>,
    pub watchdog: WatchdogDemo<B::Watchdog, B::Pin, B::Delay>,
}

impl<B: Board> Catalog<B> {
    pub fn new(board: &B) -> Self {
        Self {
            hello: HelloWorld::new(board.pin(pins::PA1), board.pin(pins::PA2), board.delay()),
            adc_polling: AdcPolling::new(board.adc(0), board.delay()),
            adc_interrupt: AdcInterruptDemo::new(board.adc(1), board.delay()),
            adc_dma: AdcDmaDemo::new(board.adc(2), board.delay()),
            gpio_polling: GpioPolling::new(
                board.pin(pins::PA3),
                board.pin(pins::PC13),
                board.delay(),
            ),
            gpio_interrupt: GpioInterruptDemo::new(
                board.pin(pins::PA4),
                board.pin(pins::PC13),
                board.delay(),
            ),
            i2c_polling: I2cPolling::new(board.i2c(), board.delay()),
            i2c_interrupt: I2cInterruptDemo::new(board.i2c(), board.delay()),
            i2c_dma: I2cDmaDemo::new(board.i2c(), board.delay()),
            spi_polling: SpiPolling::new(board.spi(), board.delay()),
            spi_interrupt: SpiInterruptDemo::new(board.spi(), board.delay()),
            spi_dma: SpiDmaDemo::new(board.spi(), board.delay()),
            timer_interrupt: TimerInterruptDemo::new(
                board.timer(),
                board.pin(pins::PC13),
                board.delay(),
            ),
            timer_pwm: TimerPwm::new(board.pwm(1), board.pwm(2), board.delay()),
            uart_polling: UartPolling::new(board.uart(), board.delay()),
            uart_interrupt: UartInterruptDemo::new(board.uart(), board.delay()),
            uart_dma: UartDmaDemo::new(board.uart(), board.delay()),
            rtc: RtcDemo::new(board.rtc(), board.delay()),
            flash: FlashDemo::new(board.flash(), board.delay()),
            watchdog: WatchdogDemo::new(board.watchdog(), board.pin(pins::PC13), board.delay()),
        }
    }

    /// Register every demo under its [`APP_NAMES`] entry, in order
    pub fn register_all<'a, const N: usize>(&'a mut self, ctx: &mut AppContext<'a, N>)
    where
        B: 'a,
    {
        let Self {
            hello,
            adc_polling,
            adc_interrupt,
            adc_dma,
            gpio_polling,
            gpio_interrupt,
            i2c_polling,
            i2c_interrupt,
            i2c_dma,
            spi_polling,
            spi_interrupt,
            spi_dma,
            timer_interrupt,
            timer_pwm,
            uart_polling,
            uart_interrupt,
            uart_dma,
            rtc,
            flash,
            watchdog,
        } = self;

        ctx.register_app(APP_NAMES[0], hello);
        ctx.register_app(APP_NAMES[1], adc_polling);
        ctx.register_app(APP_NAMES[2], adc_interrupt);
        ctx.register_app(APP_NAMES[3], adc_dma);
        ctx.register_app(APP_NAMES[4], gpio_polling);
        ctx.register_app(APP_NAMES[5], gpio_interrupt);
        ctx.register_app(APP_NAMES[6], i2c_polling);
        ctx.register_app(APP_NAMES[7], i2c_interrupt);
        ctx.register_app(APP_NAMES[8], i2c_dma);
        ctx.register_app(APP_NAMES[9], spi_polling);
        ctx.register_app(APP_NAMES[10], spi_interrupt);
        ctx.register_app(APP_NAMES[11], spi_dma);
        ctx.register_app(APP_NAMES[12], timer_interrupt);
        ctx.register_app(APP_NAMES[13], timer_pwm);
        ctx.register_app(APP_NAMES[14], uart_polling);
        ctx.register_app(APP_NAMES[15], uart_interrupt);
        ctx.register_app(APP_NAMES[16], uart_dma);
        ctx.register_app(APP_NAMES[17], rtc);
        ctx.register_app(APP_NAMES[18], flash);
        ctx.register_app(APP_NAMES[19], watchdog);
    }
}
