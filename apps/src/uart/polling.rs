//! UART Polling: RXNE/TXE flags polled from the loop

use core::fmt::Write as _;

use appfw_core::Application;
use appfw_hal::uart::UartPort;
use appfw_hal::{DelayNs, HalError, HalResult};
use heapless::String;
use log::{info, warn};

use super::{as_text, init_port, LineAssembler, MessageSchedule, PASS_MS};

pub struct UartPolling<U, D> {
    uart: U,
    delay: D,
    assembler: LineAssembler,
    schedule: MessageSchedule,
    message_counter: u32,
}

impl<U: UartPort, D: DelayNs> UartPolling<U, D> {
    pub fn new(uart: U, delay: D) -> Self {
        Self {
            uart,
            delay,
            assembler: LineAssembler::new(),
            schedule: MessageSchedule::new(),
            message_counter: 0,
        }
    }

    pub fn message_counter(&self) -> u32 {
        self.message_counter
    }

    fn receive(&mut self) -> HalResult<()> {
        let byte = match self.uart.read() {
            Ok(byte) => byte,
            Err(nb::Error::WouldBlock) => return Ok(()),
            Err(nb::Error::Other(err)) => return Err(err),
        };

        nb::block!(self.uart.write(byte))?;
        if let Some(line) = self.assembler.feed(byte) {
            info!("UART Polling: Received: '{}'", as_text(&line));
            self.uart.write_all(b"Echo: ")?;
            self.uart.write_all(&line)?;
            self.uart.write_all(b"\r\n")?;
        }
        Ok(())
    }

    fn send_periodic(&mut self) -> HalResult<()> {
        let mut message: String<64> = String::new();
        write!(message, "UART Polling Message #{}\r\n", self.message_counter)
            .map_err(|_| HalError::InvalidParameter)?;
        self.uart.write_all(message.as_bytes())?;
        info!("UART Polling: Sent message #{}", self.message_counter);
        self.schedule.mark_sent(self.message_counter);
        Ok(())
    }
}

impl<U: UartPort, D: DelayNs> Application for UartPolling<U, D> {
    fn setup(&mut self) {
        info!("UART Polling Setup");
        match init_port(&mut self.uart) {
            Ok(()) => info!("UART Polling: USART1 configured at 9600 baud"),
            Err(err) => warn!("UART Polling: init failed: {}", err),
        }
    }

    fn tick(&mut self) {
        if let Err(err) = self.receive() {
            warn!("UART Polling: {}", err);
        }

        if self.schedule.is_due(self.message_counter) {
            if let Err(err) = self.send_periodic() {
                warn!("UART Polling: {}", err);
            }
        }

        self.message_counter = self.message_counter.wrapping_add(1);
        self.delay.delay_ms(PASS_MS);
    }
}
