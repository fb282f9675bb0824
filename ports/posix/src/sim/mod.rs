//! Simulated CH32V103 board
//!
//! One [`Simulation`] holds the state of every peripheral behind a mutex,
//! the interrupt vectors the demos bind their handlers to, and a virtual
//! clock. Peripheral handles handed out by [`SimBoard`] are thin proxies
//! onto that shared state, so two handles for PC13 drive the same LED.
//!
//! Time only moves through [`Simulation::advance_to`]: the [`Ticker`]
//! thread calls it in real time, or, with [`SimConfig::fast`], every delay
//! advances the clock instead of sleeping. Events that come due while the
//! clock moves (timer updates, RTC seconds, DMA rounds, scripted input,
//! watchdog expiry) are collected under the lock and their handlers run
//! after it is released.
//!
//! [`Ticker`]: crate::time::Ticker

mod adc;
mod bus;
mod delay;
mod gpio;
mod storage;
mod timer;
mod uart;

pub use adc::SimAdc;
pub use bus::{SimI2c, SimSpi, EEPROM_ADDRESS};
pub use delay::SimDelay;
pub use gpio::{SimPin, BUTTONS};
pub use storage::{SimFlash, SimWatchdog, FLASH_BASE, FLASH_SIZE};
pub use timer::{SimPwm, SimRtc, SimTimer, TIMER_CLOCK_HZ};
pub use uart::{SimUart, UART_SCRIPT};

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use appfw_apps::Board;
use appfw_hal::gpio::PinId;
use appfw_hal::i2c::I2cEvent;
use appfw_hal::{Handler, Vector};
use log::{error, info};

/// Simulation settings
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Delays advance the virtual clock instead of sleeping
    pub fast: bool,
    /// Interval between scripted presses of the PA3/PA4 buttons
    pub button_period: Duration,
    /// Interval between scripted lines arriving on USART1 RX
    pub uart_period: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fast: false,
            button_period: Duration::from_secs(3),
            uart_period: Duration::from_secs(4),
        }
    }
}

/// Something that came due while the clock moved
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    Exti(u8),
    TimerUpdate,
    RtcSecond,
    RtcAlarm,
    AdcRound(Vec<u16>),
    UartRx(u8),
    UartRxDmaComplete,
    WatchdogExpired,
}

/// Handler slots of the simulated vector table
pub(crate) struct Vectors {
    pub(crate) exti: [Vector<Handler>; 16],
    pub(crate) tim2_update: Vector<Handler>,
    pub(crate) rtc_second: Vector<Handler>,
    pub(crate) rtc_alarm: Vector<Handler>,
    pub(crate) adc_eoc: Vector<fn(u16)>,
    pub(crate) adc_dma: Vector<fn(&[u16])>,
    pub(crate) usart1_rx: Vector<fn(u8)>,
    pub(crate) usart1_txe: Vector<fn() -> Option<u8>>,
    pub(crate) usart1_rx_dma: Vector<Handler>,
    pub(crate) i2c1_event: Vector<fn(I2cEvent)>,
}

impl Vectors {
    fn new() -> Self {
        Self {
            exti: core::array::from_fn(|_| Vector::new()),
            tim2_update: Vector::new(),
            rtc_second: Vector::new(),
            rtc_alarm: Vector::new(),
            adc_eoc: Vector::new(),
            adc_dma: Vector::new(),
            usart1_rx: Vector::new(),
            usart1_txe: Vector::new(),
            usart1_rx_dma: Vector::new(),
            i2c1_event: Vector::new(),
        }
    }

    fn detach_all(&self) {
        self.exti.iter().for_each(Vector::detach);
        self.tim2_update.detach();
        self.rtc_second.detach();
        self.rtc_alarm.detach();
        self.adc_eoc.detach();
        self.adc_dma.detach();
        self.usart1_rx.detach();
        self.usart1_txe.detach();
        self.usart1_rx_dma.detach();
        self.i2c1_event.detach();
    }
}

/// Peripheral state guarded by the simulation mutex
#[derive(Default)]
pub(crate) struct SimState {
    pub(crate) pins: HashMap<PinId, gpio::PinState>,
    pub(crate) buttons: gpio::ButtonScript,
    pub(crate) adc: adc::AdcState,
    pub(crate) eeprom: bus::EepromState,
    pub(crate) spi: bus::SpiState,
    pub(crate) timer: timer::TimerState,
    pub(crate) pwm: [timer::PwmState; 2],
    pub(crate) rtc: timer::RtcState,
    pub(crate) uart: uart::UartState,
    pub(crate) flash: storage::FlashState,
    pub(crate) watchdog: Option<storage::WatchdogState>,
}

impl SimState {
    fn collect_due(&mut self, now_ms: u64, config: &SimConfig) -> Vec<Event> {
        let mut events = Vec::new();
        gpio::collect(self, now_ms, config, &mut events);
        adc::collect(self, now_ms, &mut events);
        timer::collect(self, now_ms, &mut events);
        uart::collect(self, now_ms, config, &mut events);
        storage::collect(self, now_ms, &mut events);
        events
    }

    /// System reset: the backup domain, the RTC and flash contents survive
    fn reset_volatile(&mut self) {
        self.pins.clear();
        self.adc = Default::default();
        self.eeprom.reset_bus();
        self.spi = Default::default();
        self.timer = Default::default();
        self.pwm = Default::default();
        self.rtc.reset_interrupts();
        self.uart.reset_port();
        self.flash.locked = true;
        self.watchdog = None;
    }
}

/// Shared simulated hardware
pub struct Simulation {
    config: SimConfig,
    now_us: AtomicU64,
    state: Mutex<SimState>,
    pub(crate) vectors: Vectors,
    reset_pending: AtomicBool,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            now_us: AtomicU64::new(0),
            state: Mutex::new(SimState::default()),
            vectors: Vectors::new(),
            reset_pending: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Virtual time since power-on
    pub fn now(&self) -> Duration {
        Duration::from_micros(self.now_us.load(Ordering::SeqCst))
    }

    pub(crate) fn now_ms(&self) -> u64 {
        self.now_us.load(Ordering::SeqCst) / 1_000
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, SimState> {
        // Poisoning is ignored; the state stays usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move the clock forward to `now` and run every handler that came due.
    /// Moving backwards is ignored.
    pub fn advance_to(&self, now: Duration) {
        let now_us = u64::try_from(now.as_micros()).unwrap_or(u64::MAX);
        let previous = self.now_us.fetch_max(now_us, Ordering::SeqCst);
        if now_us <= previous {
            return;
        }

        let events = self.lock().collect_due(now_us / 1_000, &self.config);
        for event in events {
            self.dispatch(event);
        }
    }

    /// Block for `duration` of simulated time
    pub fn wait(&self, duration: Duration) {
        if self.config.fast {
            self.advance_to(self.now() + duration);
        } else {
            thread::sleep(duration);
        }
    }

    /// A watchdog expiry has requested a system reset
    pub fn reset_pending(&self) -> bool {
        self.reset_pending.load(Ordering::SeqCst)
    }

    /// Perform the pending (or a forced) system reset
    pub fn reset(&self) {
        self.vectors.detach_all();
        self.lock().reset_volatile();
        self.reset_pending.store(false, Ordering::SeqCst);
        info!("System reset");
    }

    fn dispatch(&self, event: Event) {
        match event {
            Event::Exti(line) => {
                if let Some(vector) = self.vectors.exti.get(usize::from(line)) {
                    vector.fire();
                }
            }
            Event::TimerUpdate => {
                self.vectors.tim2_update.fire();
            }
            Event::RtcSecond => {
                self.vectors.rtc_second.fire();
            }
            Event::RtcAlarm => {
                self.vectors.rtc_alarm.fire();
            }
            Event::AdcRound(samples) => {
                if let Some(handler) = self.vectors.adc_dma.handler() {
                    handler(&samples);
                }
            }
            Event::UartRx(byte) => {
                if let Some(handler) = self.vectors.usart1_rx.handler() {
                    handler(byte);
                }
            }
            Event::UartRxDmaComplete => {
                self.vectors.usart1_rx_dma.fire();
            }
            Event::WatchdogExpired => {
                error!("IWDG: watchdog expired, resetting system");
                self.reset_pending.store(true, Ordering::SeqCst);
            }
        }
    }
}

/// Board whose peripherals are simulated on the host
#[derive(Clone)]
pub struct SimBoard {
    sim: Arc<Simulation>,
}

impl SimBoard {
    pub fn new(config: SimConfig) -> Self {
        Self {
            sim: Arc::new(Simulation::new(config)),
        }
    }

    pub fn simulation(&self) -> &Arc<Simulation> {
        &self.sim
    }
}

impl Board for SimBoard {
    type Pin = SimPin;
    type Adc = SimAdc;
    type I2c = SimI2c;
    type Spi = SimSpi;
    type Timer = SimTimer;
    type Pwm = SimPwm;
    type Uart = SimUart;
    type Rtc = SimRtc;
    type Flash = SimFlash;
    type Watchdog = SimWatchdog;
    type Delay = SimDelay;

    fn pin(&self, id: PinId) -> SimPin {
        SimPin::new(Arc::clone(&self.sim), id)
    }

    fn adc(&self, channel: u8) -> SimAdc {
        SimAdc::new(Arc::clone(&self.sim), channel)
    }

    fn i2c(&self) -> SimI2c {
        SimI2c::new(Arc::clone(&self.sim))
    }

    fn spi(&self) -> SimSpi {
        SimSpi::new(Arc::clone(&self.sim))
    }

    fn timer(&self) -> SimTimer {
        SimTimer::new(Arc::clone(&self.sim))
    }

    fn pwm(&self, channel: u8) -> SimPwm {
        SimPwm::new(Arc::clone(&self.sim), channel)
    }

    fn uart(&self) -> SimUart {
        SimUart::new(Arc::clone(&self.sim))
    }

    fn rtc(&self) -> SimRtc {
        SimRtc::new(Arc::clone(&self.sim))
    }

    fn flash(&self) -> SimFlash {
        SimFlash::new(Arc::clone(&self.sim))
    }

    fn watchdog(&self) -> SimWatchdog {
        SimWatchdog::new(Arc::clone(&self.sim))
    }

    fn delay(&self) -> SimDelay {
        SimDelay::new(Arc::clone(&self.sim))
    }
}
