//! USART1 with scripted input and transmitted lines going to the log

use std::collections::VecDeque;
use std::sync::Arc;

use appfw_hal::uart::{UartConfig, UartDma, UartInterrupt, UartPort};
use appfw_hal::{Handler, HalError, HalResult};
use log::{debug, info};

use super::{Event, SimConfig, SimState, Simulation};

/// Lines typed into USART1 RX, one per period, in rotation
pub const UART_SCRIPT: [&str; 3] = ["hello\r", "appfw on host\r", "ping\r"];

/// Receive register overrun limit for bytes nobody reads
const RX_QUEUE_LIMIT: usize = 256;

/// Longest transmitted line before it is logged anyway
const TX_LINE_LIMIT: usize = 128;

#[derive(Debug, Default)]
struct RxDma {
    len: usize,
    buffer: Vec<u8>,
}

#[derive(Debug, Default)]
pub(crate) struct UartState {
    config: Option<UartConfig>,
    rx: VecDeque<u8>,
    rx_irq: bool,
    rx_dma: Option<RxDma>,
    tx_line: Vec<u8>,
    transmitted: usize,
    next_line_ms: Option<u64>,
    script_index: usize,
}

impl UartState {
    pub(crate) fn reset_port(&mut self) {
        *self = Self {
            script_index: self.script_index,
            ..Self::default()
        };
    }

    /// Shift one byte out; completed lines are logged
    fn transmit(&mut self, byte: u8) {
        self.transmitted += 1;
        if byte == b'\r' || byte == b'\n' {
            self.flush_line();
        } else {
            self.tx_line.push(byte);
            if self.tx_line.len() >= TX_LINE_LIMIT {
                self.flush_line();
            }
        }
    }

    fn flush_line(&mut self) {
        if !self.tx_line.is_empty() {
            info!(target: "usart1", "TX {}", String::from_utf8_lossy(&self.tx_line));
            self.tx_line.clear();
        }
    }

    /// Route one received byte: RXNE interrupt, then RX DMA, then the data
    /// register for polling
    fn receive(&mut self, byte: u8, events: &mut Vec<Event>) {
        if self.rx_irq {
            events.push(Event::UartRx(byte));
        } else if let Some(dma) = self.rx_dma.as_mut() {
            if dma.buffer.len() < dma.len {
                dma.buffer.push(byte);
                if dma.buffer.len() == dma.len {
                    events.push(Event::UartRxDmaComplete);
                }
            }
        } else if self.rx.len() < RX_QUEUE_LIMIT {
            self.rx.push_back(byte);
        }
    }
}

pub(crate) fn collect(state: &mut SimState, now_ms: u64, config: &SimConfig, events: &mut Vec<Event>) {
    let uart = &mut state.uart;
    if uart.config.is_none() {
        return;
    }

    let period_ms = period_ms(config);
    match uart.next_line_ms {
        Some(next) if now_ms >= next => {}
        _ => return,
    }
    uart.next_line_ms = Some(now_ms + period_ms);

    let line = UART_SCRIPT[uart.script_index % UART_SCRIPT.len()];
    uart.script_index += 1;
    debug!("Script: USART1 RX {:?}", line);
    for byte in line.bytes() {
        uart.receive(byte, events);
    }
}

fn period_ms(config: &SimConfig) -> u64 {
    u64::try_from(config.uart_period.as_millis()).unwrap_or(u64::MAX)
}

/// Handle to USART1
pub struct SimUart {
    sim: Arc<Simulation>,
}

impl SimUart {
    pub(crate) fn new(sim: Arc<Simulation>) -> Self {
        Self { sim }
    }

    /// Bytes shifted out since the port was configured
    pub fn transmitted(&self) -> usize {
        self.sim.lock().uart.transmitted
    }

    fn configured(&self) -> HalResult<()> {
        match self.sim.lock().uart.config {
            Some(_) => Ok(()),
            None => Err(HalError::ConfigurationError),
        }
    }
}

impl UartPort for SimUart {
    fn configure(&mut self, config: &UartConfig) -> HalResult<()> {
        let first_line_ms = self.sim.now_ms() + period_ms(self.sim.config());
        let mut state = self.sim.lock();
        state.uart.reset_port();
        state.uart.config = Some(config.clone());
        state.uart.next_line_ms = Some(first_line_ms);
        debug!("USART1 configured, {} baud", config.baud_rate);
        Ok(())
    }

    fn read(&mut self) -> nb::Result<u8, HalError> {
        let mut state = self.sim.lock();
        if state.uart.config.is_none() {
            return Err(nb::Error::Other(HalError::ConfigurationError));
        }
        state.uart.rx.pop_front().ok_or(nb::Error::WouldBlock)
    }

    fn write(&mut self, byte: u8) -> nb::Result<(), HalError> {
        let mut state = self.sim.lock();
        if state.uart.config.is_none() {
            return Err(nb::Error::Other(HalError::ConfigurationError));
        }
        state.uart.transmit(byte);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), HalError> {
        Ok(())
    }
}

impl UartInterrupt for SimUart {
    fn listen_rx(&mut self, handler: fn(u8)) -> HalResult<()> {
        self.sim.vectors.usart1_rx.attach(handler);
        self.sim.lock().uart.rx_irq = true;
        Ok(())
    }

    fn listen_tx_empty(&mut self, handler: fn() -> Option<u8>) -> HalResult<()> {
        self.sim.vectors.usart1_txe.attach(handler);
        Ok(())
    }

    fn enable_tx_interrupt(&mut self) -> HalResult<()> {
        self.configured()?;
        let handler = self
            .sim
            .vectors
            .usart1_txe
            .handler()
            .ok_or(HalError::ConfigurationError)?;
        // The handler runs without the lock, like a real TXE interrupt
        while let Some(byte) = handler() {
            self.sim.lock().uart.transmit(byte);
        }
        Ok(())
    }

    fn disable_interrupts(&mut self) -> HalResult<()> {
        self.sim.vectors.usart1_rx.detach();
        self.sim.vectors.usart1_txe.detach();
        self.sim.lock().uart.rx_irq = false;
        Ok(())
    }
}

impl UartDma for SimUart {
    fn start_rx_dma(&mut self, len: usize, on_complete: Handler) -> HalResult<()> {
        if len == 0 {
            return Err(HalError::InvalidParameter);
        }
        self.configured()?;
        self.sim.vectors.usart1_rx_dma.attach(on_complete);
        self.sim.lock().uart.rx_dma = Some(RxDma {
            len,
            buffer: Vec::with_capacity(len),
        });
        Ok(())
    }

    fn rx_dma_count(&self) -> usize {
        self.sim
            .lock()
            .uart
            .rx_dma
            .as_ref()
            .map_or(0, |dma| dma.buffer.len())
    }

    fn rx_dma_byte(&self, index: usize) -> Option<u8> {
        self.sim
            .lock()
            .uart
            .rx_dma
            .as_ref()
            .and_then(|dma| dma.buffer.get(index).copied())
    }

    fn restart_rx_dma(&mut self) -> HalResult<()> {
        let mut state = self.sim.lock();
        let dma = state.uart.rx_dma.as_mut().ok_or(HalError::ConfigurationError)?;
        dma.buffer.clear();
        Ok(())
    }

    fn start_tx_dma(&mut self, data: &[u8], on_complete: Handler) -> HalResult<()> {
        {
            let mut state = self.sim.lock();
            if state.uart.config.is_none() {
                return Err(HalError::ConfigurationError);
            }
            data.iter().for_each(|&byte| state.uart.transmit(byte));
        }
        on_complete();
        Ok(())
    }
}
