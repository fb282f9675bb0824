//! Recording peripheral mocks for the demo tests
//!
//! Every mock shares its state with the test through an `Rc`, so the test
//! keeps a handle after moving the peripheral into a demo. Handlers bound by
//! a demo are stored and only run when the test fires them, except where a
//! driver would complete on its own (UART TX interrupt and TX DMA).

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use appfw_hal::adc::{AdcChannel, AdcConfig, AdcDma, AdcInterrupt};
use appfw_hal::flash::{Flash, ERASED_WORD};
use appfw_hal::gpio::{Edge, GpioPin, GpioPinInterrupt, Level, PinId, PinMode};
use appfw_hal::i2c::{I2cAddress, I2cConfig, I2cDma, I2cEvent, I2cInterrupt, I2cMaster};
use appfw_hal::rtc::{BackupRegisters, Rtc, RtcConfig};
use appfw_hal::spi::{SpiConfig, SpiDma, SpiInterrupt, SpiMaster};
use appfw_hal::timer::{PwmChannel, Timer, TimerConfig};
use appfw_hal::uart::{UartConfig, UartDma, UartInterrupt, UartPort};
use appfw_hal::watchdog::{Watchdog, WatchdogConfig};
use appfw_hal::{DelayNs, HalError, HalResult, Handler};
use appfw_apps::Board;

fn shared<T>(value: T) -> Rc<RefCell<T>> {
    Rc::new(RefCell::new(value))
}

// ---------------------------------------------------------------------------
// Delay

/// Records every millisecond delay instead of sleeping
#[derive(Clone, Default)]
pub struct MockDelay {
    pub calls: Rc<RefCell<Vec<u32>>>,
}

impl MockDelay {
    pub fn total_ms(&self) -> u32 {
        self.calls.borrow().iter().sum()
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.calls.borrow_mut().push(ms);
    }
}

// ---------------------------------------------------------------------------
// GPIO

pub struct PinState {
    pub id: PinId,
    pub mode: Option<PinMode>,
    pub level: Level,
    pub writes: Vec<Level>,
    pub handler: Option<(Edge, Handler)>,
    pub pending: bool,
}

#[derive(Clone)]
pub struct MockPin {
    pub state: Rc<RefCell<PinState>>,
}

impl MockPin {
    pub fn new(id: PinId) -> Self {
        Self {
            state: shared(PinState {
                id,
                mode: None,
                level: Level::High,
                writes: Vec::new(),
                handler: None,
                pending: false,
            }),
        }
    }

    /// Drive the pin from outside, as a button would
    pub fn drive(&self, level: Level) {
        self.state.borrow_mut().level = level;
    }

    pub fn level(&self) -> Level {
        self.state.borrow().level
    }

    pub fn mode(&self) -> Option<PinMode> {
        self.state.borrow().mode
    }

    /// Run the bound EXTI handler, if any
    pub fn fire(&self) -> bool {
        let handler = self.state.borrow().handler;
        match handler {
            Some((_, handler)) => {
                self.state.borrow_mut().pending = true;
                handler();
                true
            }
            None => false,
        }
    }
}

impl GpioPin for MockPin {
    fn set_mode(&mut self, mode: PinMode) -> HalResult<()> {
        self.state.borrow_mut().mode = Some(mode);
        Ok(())
    }

    fn read(&self) -> HalResult<Level> {
        Ok(self.state.borrow().level)
    }

    fn write(&mut self, level: Level) -> HalResult<()> {
        let mut state = self.state.borrow_mut();
        state.level = level;
        state.writes.push(level);
        Ok(())
    }

    fn id(&self) -> PinId {
        self.state.borrow().id
    }
}

impl GpioPinInterrupt for MockPin {
    fn enable_interrupt(&mut self, edge: Edge, handler: Handler) -> HalResult<()> {
        self.state.borrow_mut().handler = Some((edge, handler));
        Ok(())
    }

    fn disable_interrupt(&mut self) -> HalResult<()> {
        self.state.borrow_mut().handler = None;
        Ok(())
    }

    fn clear_interrupt(&mut self) -> HalResult<()> {
        self.state.borrow_mut().pending = false;
        Ok(())
    }

    fn is_interrupt_pending(&self) -> bool {
        self.state.borrow().pending
    }
}

// ---------------------------------------------------------------------------
// ADC

#[derive(Default)]
pub struct AdcState {
    pub channel: u8,
    pub config: Option<AdcConfig>,
    pub calibrated: bool,
    pub value: u16,
    pub ready: bool,
    pub eoc_handler: Option<fn(u16)>,
    pub dma: Option<(usize, fn(&[u16]))>,
}

#[derive(Clone, Default)]
pub struct MockAdc {
    pub state: Rc<RefCell<AdcState>>,
}

impl MockAdc {
    pub fn new(channel: u8) -> Self {
        let adc = Self::default();
        adc.state.borrow_mut().channel = channel;
        adc
    }

    pub fn set_value(&self, value: u16) {
        self.state.borrow_mut().value = value;
    }

    /// Complete one circular DMA round with `samples`
    pub fn complete_dma(&self, samples: &[u16]) -> bool {
        let dma = self.state.borrow().dma;
        match dma {
            Some((_, on_complete)) => {
                on_complete(samples);
                true
            }
            None => false,
        }
    }
}

impl AdcChannel for MockAdc {
    fn configure(&mut self, config: &AdcConfig) -> HalResult<()> {
        self.state.borrow_mut().config = Some(config.clone());
        Ok(())
    }

    fn calibrate(&mut self) -> HalResult<()> {
        self.state.borrow_mut().calibrated = true;
        Ok(())
    }

    fn start_conversion(&mut self) -> HalResult<()> {
        let (handler, value) = {
            let mut state = self.state.borrow_mut();
            state.ready = true;
            (state.eoc_handler, state.value)
        };
        // Conversion finishes immediately; EOC fires if listened for
        if let Some(handler) = handler {
            self.state.borrow_mut().ready = false;
            handler(value);
        }
        Ok(())
    }

    fn is_conversion_complete(&self) -> bool {
        self.state.borrow().ready
    }

    fn read_raw(&mut self) -> HalResult<u16> {
        let mut state = self.state.borrow_mut();
        state.ready = false;
        Ok(state.value)
    }

    fn channel_number(&self) -> u8 {
        self.state.borrow().channel
    }
}

impl AdcInterrupt for MockAdc {
    fn listen_end_of_conversion(&mut self, handler: fn(u16)) -> HalResult<()> {
        self.state.borrow_mut().eoc_handler = Some(handler);
        Ok(())
    }

    fn unlisten_end_of_conversion(&mut self) -> HalResult<()> {
        self.state.borrow_mut().eoc_handler = None;
        Ok(())
    }
}

impl AdcDma for MockAdc {
    fn start_circular(&mut self, samples: usize, on_complete: fn(&[u16])) -> HalResult<()> {
        self.state.borrow_mut().dma = Some((samples, on_complete));
        Ok(())
    }

    fn stop_circular(&mut self) -> HalResult<()> {
        self.state.borrow_mut().dma = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// I2C

/// 256-byte EEPROM behind the bus
pub struct I2cState {
    pub configured: bool,
    pub memory: [u8; 256],
    pub pointer: u8,
    /// XOR applied to every byte read back
    pub corrupt: u8,
    pub nack: bool,
    pub pending: Option<(fn(I2cEvent), I2cEvent)>,
    pub dma_writes: Vec<Vec<u8>>,
}

#[derive(Clone)]
pub struct MockI2c {
    pub state: Rc<RefCell<I2cState>>,
}

impl Default for MockI2c {
    fn default() -> Self {
        Self {
            state: shared(I2cState {
                configured: false,
                memory: [0xFF; 256],
                pointer: 0,
                corrupt: 0,
                nack: false,
                pending: None,
                dma_writes: Vec::new(),
            }),
        }
    }
}

impl MockI2c {
    pub fn cell(&self, register: u8) -> u8 {
        self.state.borrow().memory[register as usize]
    }

    /// Finish the transfer started through the interrupt interface
    pub fn complete(&self) -> Option<I2cEvent> {
        let pending = self.state.borrow_mut().pending.take();
        pending.map(|(on_event, event)| {
            on_event(event);
            event
        })
    }

    fn check(&self, address: I2cAddress) -> HalResult<()> {
        if self.state.borrow().nack || address != I2cAddress::SevenBit(0x50) {
            Err(HalError::Nack)
        } else {
            Ok(())
        }
    }

    fn store(&self, data: &[u8]) {
        let mut state = self.state.borrow_mut();
        if let Some((&register, values)) = data.split_first() {
            state.pointer = register;
            for &value in values {
                let at = state.pointer as usize;
                state.memory[at] = value;
                state.pointer = state.pointer.wrapping_add(1);
            }
        }
    }

    fn load(&self, buffer: &mut [u8]) {
        let mut state = self.state.borrow_mut();
        for slot in buffer.iter_mut() {
            *slot = state.memory[state.pointer as usize] ^ state.corrupt;
            state.pointer = state.pointer.wrapping_add(1);
        }
    }
}

impl I2cMaster for MockI2c {
    fn configure(&mut self, _config: &I2cConfig) -> HalResult<()> {
        self.state.borrow_mut().configured = true;
        Ok(())
    }

    fn write(&mut self, address: I2cAddress, data: &[u8]) -> HalResult<()> {
        self.check(address)?;
        self.store(data);
        Ok(())
    }

    fn read(&mut self, address: I2cAddress, buffer: &mut [u8]) -> HalResult<()> {
        self.check(address)?;
        self.load(buffer);
        Ok(())
    }

    fn write_read(
        &mut self,
        address: I2cAddress,
        write_data: &[u8],
        read_buffer: &mut [u8],
    ) -> HalResult<()> {
        self.write(address, write_data)?;
        self.read(address, read_buffer)
    }
}

impl I2cInterrupt for MockI2c {
    fn start_write(
        &mut self,
        address: I2cAddress,
        register: u8,
        value: u8,
        on_event: fn(I2cEvent),
    ) -> HalResult<()> {
        let event = match self.write_register(address, register, value) {
            Ok(()) => I2cEvent::Written,
            Err(_) => I2cEvent::Nack,
        };
        self.state.borrow_mut().pending = Some((on_event, event));
        Ok(())
    }

    fn start_read(
        &mut self,
        address: I2cAddress,
        register: u8,
        on_event: fn(I2cEvent),
    ) -> HalResult<()> {
        let event = match self.read_register(address, register) {
            Ok(value) => I2cEvent::Read(value),
            Err(_) => I2cEvent::Nack,
        };
        self.state.borrow_mut().pending = Some((on_event, event));
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.state.borrow().pending.is_some()
    }
}

impl I2cDma for MockI2c {
    fn write_dma(&mut self, address: I2cAddress, data: &[u8]) -> HalResult<()> {
        self.check(address)?;
        self.state.borrow_mut().dma_writes.push(data.to_vec());
        self.store(data);
        Ok(())
    }

    fn read_dma(&mut self, address: I2cAddress, register: u8, buffer: &mut [u8]) -> HalResult<()> {
        self.write_read(address, &[register], buffer)
    }
}

// ---------------------------------------------------------------------------
// SPI

/// Loopback slave: every byte clocked out comes straight back
#[derive(Default)]
pub struct SpiState {
    pub config: Option<SpiConfig>,
    pub selected: bool,
    pub selects: u32,
    pub sent: Vec<u8>,
    pub pending: Option<(fn(&[u8]), Vec<u8>)>,
}

#[derive(Clone, Default)]
pub struct MockSpi {
    pub state: Rc<RefCell<SpiState>>,
}

impl MockSpi {
    pub fn sent(&self) -> Vec<u8> {
        self.state.borrow().sent.clone()
    }

    /// Finish the queued interrupt or DMA transfer and release chip select
    pub fn complete(&self) -> bool {
        let pending = self.state.borrow_mut().pending.take();
        match pending {
            Some((on_complete, rx)) => {
                self.state.borrow_mut().selected = false;
                on_complete(&rx);
                true
            }
            None => false,
        }
    }

    fn queue(&mut self, tx: &[u8], on_complete: fn(&[u8])) -> HalResult<()> {
        let mut state = self.state.borrow_mut();
        if state.pending.is_some() {
            return Err(HalError::Busy);
        }
        state.selected = true;
        state.selects += 1;
        state.sent.extend_from_slice(tx);
        state.pending = Some((on_complete, tx.to_vec()));
        Ok(())
    }
}

impl SpiMaster for MockSpi {
    fn configure(&mut self, config: &SpiConfig) -> HalResult<()> {
        self.state.borrow_mut().config = Some(config.clone());
        Ok(())
    }

    fn select(&mut self) -> HalResult<()> {
        let mut state = self.state.borrow_mut();
        state.selected = true;
        state.selects += 1;
        Ok(())
    }

    fn deselect(&mut self) -> HalResult<()> {
        self.state.borrow_mut().selected = false;
        Ok(())
    }

    fn transfer_byte(&mut self, byte: u8) -> HalResult<u8> {
        self.state.borrow_mut().sent.push(byte);
        Ok(byte)
    }
}

impl SpiInterrupt for MockSpi {
    fn start_transfer(&mut self, tx_data: &[u8], on_complete: fn(&[u8])) -> HalResult<()> {
        self.queue(tx_data, on_complete)
    }

    fn is_busy(&self) -> bool {
        self.state.borrow().pending.is_some()
    }
}

impl SpiDma for MockSpi {
    fn start_dma_transfer(&mut self, tx_data: &[u8], on_complete: fn(&[u8])) -> HalResult<()> {
        self.queue(tx_data, on_complete)
    }

    fn is_dma_busy(&self) -> bool {
        self.state.borrow().pending.is_some()
    }
}

// ---------------------------------------------------------------------------
// Timer and PWM

#[derive(Default)]
pub struct TimerState {
    pub config: Option<TimerConfig>,
    pub running: bool,
    pub counter: u32,
    pub handler: Option<Handler>,
}

#[derive(Clone, Default)]
pub struct MockTimer {
    pub state: Rc<RefCell<TimerState>>,
}

impl MockTimer {
    /// Raise one update event
    pub fn fire(&self) -> bool {
        let (running, handler) = {
            let state = self.state.borrow();
            (state.running, state.handler)
        };
        match handler {
            Some(handler) if running => {
                handler();
                true
            }
            _ => false,
        }
    }
}

impl Timer for MockTimer {
    fn configure(&mut self, config: &TimerConfig) -> HalResult<()> {
        self.state.borrow_mut().config = Some(config.clone());
        Ok(())
    }

    fn start(&mut self) -> HalResult<()> {
        self.state.borrow_mut().running = true;
        Ok(())
    }

    fn stop(&mut self) -> HalResult<()> {
        self.state.borrow_mut().running = false;
        Ok(())
    }

    fn counter(&self) -> u32 {
        self.state.borrow().counter
    }

    fn listen(&mut self, handler: Handler) -> HalResult<()> {
        self.state.borrow_mut().handler = Some(handler);
        Ok(())
    }

    fn unlisten(&mut self) -> HalResult<()> {
        self.state.borrow_mut().handler = None;
        Ok(())
    }
}

#[derive(Default)]
pub struct PwmState {
    pub duty: u16,
    pub duties: Vec<u16>,
    pub frequency: u32,
    pub enabled: bool,
}

#[derive(Clone, Default)]
pub struct MockPwm {
    pub state: Rc<RefCell<PwmState>>,
}

impl PwmChannel for MockPwm {
    fn set_duty(&mut self, duty: u16) -> HalResult<()> {
        if duty > self.max_duty() {
            return Err(HalError::InvalidParameter);
        }
        let mut state = self.state.borrow_mut();
        state.duty = duty;
        state.duties.push(duty);
        Ok(())
    }

    fn duty(&self) -> u16 {
        self.state.borrow().duty
    }

    fn max_duty(&self) -> u16 {
        999
    }

    fn set_frequency(&mut self, freq_hz: u32) -> HalResult<()> {
        self.state.borrow_mut().frequency = freq_hz;
        Ok(())
    }

    fn enable(&mut self) -> HalResult<()> {
        self.state.borrow_mut().enabled = true;
        Ok(())
    }

    fn disable(&mut self) -> HalResult<()> {
        self.state.borrow_mut().enabled = false;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// UART

#[derive(Default)]
pub struct UartState {
    pub config: Option<UartConfig>,
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    pub rx_handler: Option<fn(u8)>,
    pub tx_handler: Option<fn() -> Option<u8>>,
    pub rx_dma: Option<(usize, Handler)>,
    pub rx_dma_buffer: Vec<u8>,
    pub tx_dma_transfers: u32,
}

#[derive(Clone, Default)]
pub struct MockUart {
    pub state: Rc<RefCell<UartState>>,
}

impl MockUart {
    /// Bytes arriving on RX: into the RXNE handler, the DMA buffer or the
    /// data register, whichever the demo set up
    pub fn receive(&self, bytes: &[u8]) {
        for &byte in bytes {
            let (handler, dma) = {
                let state = self.state.borrow();
                (state.rx_handler, state.rx_dma)
            };
            if let Some(handler) = handler {
                handler(byte);
            } else if let Some((len, on_complete)) = dma {
                let full = {
                    let mut state = self.state.borrow_mut();
                    if state.rx_dma_buffer.len() < len {
                        state.rx_dma_buffer.push(byte);
                    }
                    state.rx_dma_buffer.len() == len
                };
                if full {
                    on_complete();
                }
            } else {
                self.state.borrow_mut().rx.push_back(byte);
            }
        }
    }

    pub fn transmitted(&self) -> String {
        String::from_utf8_lossy(&self.state.borrow().tx).into_owned()
    }
}

impl UartPort for MockUart {
    fn configure(&mut self, config: &UartConfig) -> HalResult<()> {
        self.state.borrow_mut().config = Some(config.clone());
        Ok(())
    }

    fn read(&mut self) -> nb::Result<u8, HalError> {
        self.state
            .borrow_mut()
            .rx
            .pop_front()
            .ok_or(nb::Error::WouldBlock)
    }

    fn write(&mut self, byte: u8) -> nb::Result<(), HalError> {
        self.state.borrow_mut().tx.push(byte);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), HalError> {
        Ok(())
    }
}

impl UartInterrupt for MockUart {
    fn listen_rx(&mut self, handler: fn(u8)) -> HalResult<()> {
        self.state.borrow_mut().rx_handler = Some(handler);
        Ok(())
    }

    fn listen_tx_empty(&mut self, handler: fn() -> Option<u8>) -> HalResult<()> {
        self.state.borrow_mut().tx_handler = Some(handler);
        Ok(())
    }

    fn enable_tx_interrupt(&mut self) -> HalResult<()> {
        // TXE stays set until the handler runs dry
        let handler = self.state.borrow().tx_handler.ok_or(HalError::ConfigurationError)?;
        while let Some(byte) = handler() {
            self.state.borrow_mut().tx.push(byte);
        }
        Ok(())
    }

    fn disable_interrupts(&mut self) -> HalResult<()> {
        let mut state = self.state.borrow_mut();
        state.rx_handler = None;
        state.tx_handler = None;
        Ok(())
    }
}

impl UartDma for MockUart {
    fn start_rx_dma(&mut self, len: usize, on_complete: Handler) -> HalResult<()> {
        let mut state = self.state.borrow_mut();
        state.rx_dma = Some((len, on_complete));
        state.rx_dma_buffer.clear();
        Ok(())
    }

    fn rx_dma_count(&self) -> usize {
        self.state.borrow().rx_dma_buffer.len()
    }

    fn rx_dma_byte(&self, index: usize) -> Option<u8> {
        self.state.borrow().rx_dma_buffer.get(index).copied()
    }

    fn restart_rx_dma(&mut self) -> HalResult<()> {
        self.state.borrow_mut().rx_dma_buffer.clear();
        Ok(())
    }

    fn start_tx_dma(&mut self, data: &[u8], on_complete: Handler) -> HalResult<()> {
        {
            let mut state = self.state.borrow_mut();
            state.tx.extend_from_slice(data);
            state.tx_dma_transfers += 1;
        }
        on_complete();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RTC

#[derive(Default)]
pub struct RtcState {
    pub configured: u32,
    pub synced: u32,
    pub counter: u32,
    pub alarm: Option<u32>,
    pub backup: [u16; 11],
    pub access: bool,
    pub second_handler: Option<Handler>,
    pub alarm_handler: Option<Handler>,
}

#[derive(Clone, Default)]
pub struct MockRtc {
    pub state: Rc<RefCell<RtcState>>,
}

impl MockRtc {
    /// Let `seconds` pass, firing second and alarm interrupts as the counter moves
    pub fn advance(&self, seconds: u32) {
        for _ in 0..seconds {
            let (second, alarm) = {
                let mut state = self.state.borrow_mut();
                state.counter = state.counter.wrapping_add(1);
                let alarm = if state.alarm == Some(state.counter) {
                    state.alarm_handler
                } else {
                    None
                };
                (state.second_handler, alarm)
            };
            if let Some(handler) = second {
                handler();
            }
            if let Some(handler) = alarm {
                handler();
            }
        }
    }
}

impl Rtc for MockRtc {
    fn configure(&mut self, _config: &RtcConfig) -> HalResult<()> {
        self.state.borrow_mut().configured += 1;
        Ok(())
    }

    fn wait_for_sync(&mut self) -> HalResult<()> {
        self.state.borrow_mut().synced += 1;
        Ok(())
    }

    fn counter(&self) -> u32 {
        self.state.borrow().counter
    }

    fn set_counter(&mut self, seconds: u32) -> HalResult<()> {
        self.state.borrow_mut().counter = seconds;
        Ok(())
    }

    fn set_alarm(&mut self, seconds: u32) -> HalResult<()> {
        self.state.borrow_mut().alarm = Some(seconds);
        Ok(())
    }

    fn listen_second(&mut self, handler: Handler) -> HalResult<()> {
        self.state.borrow_mut().second_handler = Some(handler);
        Ok(())
    }

    fn listen_alarm(&mut self, handler: Handler) -> HalResult<()> {
        self.state.borrow_mut().alarm_handler = Some(handler);
        Ok(())
    }
}

impl BackupRegisters for MockRtc {
    fn enable_access(&mut self) -> HalResult<()> {
        self.state.borrow_mut().access = true;
        Ok(())
    }

    fn reset_domain(&mut self) -> HalResult<()> {
        let mut state = self.state.borrow_mut();
        state.backup = [0; 11];
        state.alarm = None;
        Ok(())
    }

    fn read_register(&self, index: u8) -> HalResult<u16> {
        self.state
            .borrow()
            .backup
            .get(index as usize)
            .copied()
            .ok_or(HalError::InvalidParameter)
    }

    fn write_register(&mut self, index: u8, value: u16) -> HalResult<()> {
        let mut state = self.state.borrow_mut();
        if !state.access {
            return Err(HalError::Locked);
        }
        let slot = state
            .backup
            .get_mut(index as usize)
            .ok_or(HalError::InvalidParameter)?;
        *slot = value;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Flash

pub const FLASH_BASE: u32 = 0x0800_0000;
pub const FLASH_SIZE: u32 = 128 * 1024;

pub struct FlashState {
    pub words: Vec<u32>,
    pub locked: bool,
    /// Bits that never program to zero
    pub stuck_high: u32,
    pub erases: u32,
}

#[derive(Clone)]
pub struct MockFlash {
    pub state: Rc<RefCell<FlashState>>,
}

impl Default for MockFlash {
    fn default() -> Self {
        Self {
            state: shared(FlashState {
                words: vec![0; (FLASH_SIZE / 4) as usize],
                locked: true,
                stuck_high: 0,
                erases: 0,
            }),
        }
    }
}

fn word_index(address: u32) -> HalResult<usize> {
    if address % 4 != 0 || !(FLASH_BASE..FLASH_BASE + FLASH_SIZE).contains(&address) {
        return Err(HalError::InvalidParameter);
    }
    Ok(((address - FLASH_BASE) / 4) as usize)
}

impl Flash for MockFlash {
    const PAGE_SIZE: u32 = 1024;

    fn unlock(&mut self) -> HalResult<()> {
        self.state.borrow_mut().locked = false;
        Ok(())
    }

    fn lock(&mut self) -> HalResult<()> {
        self.state.borrow_mut().locked = true;
        Ok(())
    }

    fn is_locked(&self) -> bool {
        self.state.borrow().locked
    }

    fn erase_page(&mut self, address: u32) -> HalResult<()> {
        let mut state = self.state.borrow_mut();
        if state.locked {
            return Err(HalError::Locked);
        }
        let first = word_index(address & !(Self::PAGE_SIZE - 1))?;
        let words = (Self::PAGE_SIZE / 4) as usize;
        state.words[first..first + words].fill(ERASED_WORD);
        state.erases += 1;
        Ok(())
    }

    fn program_word(&mut self, address: u32, word: u32) -> HalResult<()> {
        let index = word_index(address)?;
        let mut state = self.state.borrow_mut();
        if state.locked {
            return Err(HalError::Locked);
        }
        let stuck = state.stuck_high;
        state.words[index] &= word | stuck;
        Ok(())
    }

    fn read_word(&self, address: u32) -> HalResult<u32> {
        let index = word_index(address)?;
        Ok(self.state.borrow().words[index])
    }
}

// ---------------------------------------------------------------------------
// Watchdog

#[derive(Default)]
pub struct WatchdogState {
    pub started: Option<WatchdogConfig>,
    pub feeds: u32,
}

#[derive(Clone, Default)]
pub struct MockWatchdog {
    pub state: Rc<RefCell<WatchdogState>>,
}

impl Watchdog for MockWatchdog {
    fn start(&mut self, config: &WatchdogConfig) -> HalResult<()> {
        self.state.borrow_mut().started = Some(config.clone());
        Ok(())
    }

    fn feed(&mut self) -> HalResult<()> {
        let mut state = self.state.borrow_mut();
        if state.started.is_none() {
            return Err(HalError::ConfigurationError);
        }
        state.feeds += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Board

/// Board handing out fresh mocks; shares nothing between handles
#[derive(Default)]
pub struct MockBoard {
    pub delay: MockDelay,
}

impl Board for MockBoard {
    type Pin = MockPin;
    type Adc = MockAdc;
    type I2c = MockI2c;
    type Spi = MockSpi;
    type Timer = MockTimer;
    type Pwm = MockPwm;
    type Uart = MockUart;
    type Rtc = MockRtc;
    type Flash = MockFlash;
    type Watchdog = MockWatchdog;
    type Delay = MockDelay;

    fn pin(&self, id: PinId) -> MockPin {
        MockPin::new(id)
    }

    fn adc(&self, channel: u8) -> MockAdc {
        MockAdc::new(channel)
    }

    fn i2c(&self) -> MockI2c {
        MockI2c::default()
    }

    fn spi(&self) -> MockSpi {
        MockSpi::default()
    }

    fn timer(&self) -> MockTimer {
        MockTimer::default()
    }

    fn pwm(&self, _channel: u8) -> MockPwm {
        MockPwm::default()
    }

    fn uart(&self) -> MockUart {
        MockUart::default()
    }

    fn rtc(&self) -> MockRtc {
        MockRtc::default()
    }

    fn flash(&self) -> MockFlash {
        MockFlash::default()
    }

    fn watchdog(&self) -> MockWatchdog {
        MockWatchdog::default()
    }

    fn delay(&self) -> MockDelay {
        self.delay.clone()
    }
}
