//! I2C1 with a 24C02 EEPROM attached, and SPI1 with MISO tied to MOSI

use std::sync::Arc;

use appfw_hal::i2c::{I2cAddress, I2cConfig, I2cDma, I2cEvent, I2cInterrupt, I2cMaster};
use appfw_hal::spi::{SpiConfig, SpiDma, SpiInterrupt, SpiMaster};
use appfw_hal::{HalError, HalResult};
use log::{debug, trace};

use super::Simulation;

/// 24C02 at its default strap address
pub const EEPROM_ADDRESS: I2cAddress = I2cAddress::from_write_byte(0xA0);

const EEPROM_SIZE: usize = 256;

#[derive(Debug)]
pub(crate) struct EepromState {
    config: Option<I2cConfig>,
    memory: [u8; EEPROM_SIZE],
    pointer: u8,
}

impl Default for EepromState {
    fn default() -> Self {
        Self {
            config: None,
            memory: [0xFF; EEPROM_SIZE],
            pointer: 0,
        }
    }
}

impl EepromState {
    /// The bus master resets with the MCU; the EEPROM keeps its cells
    pub(crate) fn reset_bus(&mut self) {
        self.config = None;
        self.pointer = 0;
    }

    fn check(&self, address: I2cAddress) -> HalResult<()> {
        if self.config.is_none() {
            return Err(HalError::ConfigurationError);
        }
        if address != EEPROM_ADDRESS {
            return Err(HalError::Nack);
        }
        Ok(())
    }

    /// First byte sets the word address, the rest is stored from there on
    fn write(&mut self, address: I2cAddress, data: &[u8]) -> HalResult<()> {
        self.check(address)?;
        let Some((&word, payload)) = data.split_first() else {
            return Ok(());
        };
        self.pointer = word;
        for &byte in payload {
            self.memory[usize::from(self.pointer)] = byte;
            self.pointer = self.pointer.wrapping_add(1);
        }
        Ok(())
    }

    /// Sequential read from the current word address
    fn read(&mut self, address: I2cAddress, buffer: &mut [u8]) -> HalResult<()> {
        self.check(address)?;
        for slot in buffer.iter_mut() {
            *slot = self.memory[usize::from(self.pointer)];
            self.pointer = self.pointer.wrapping_add(1);
        }
        Ok(())
    }
}

/// Handle to I2C1
pub struct SimI2c {
    sim: Arc<Simulation>,
}

impl SimI2c {
    pub(crate) fn new(sim: Arc<Simulation>) -> Self {
        Self { sim }
    }

    /// Peek at an EEPROM cell without a bus transaction
    pub fn eeprom(&self, word: u8) -> u8 {
        self.sim.lock().eeprom.memory[usize::from(word)]
    }

    fn notify(&self, event: I2cEvent, on_event: fn(I2cEvent)) {
        self.sim.vectors.i2c1_event.attach(on_event);
        if let Some(handler) = self.sim.vectors.i2c1_event.handler() {
            handler(event);
        }
    }
}

impl I2cMaster for SimI2c {
    fn configure(&mut self, config: &I2cConfig) -> HalResult<()> {
        self.sim.lock().eeprom.config = Some(config.clone());
        debug!("I2C1 configured, {:?}", config.speed);
        Ok(())
    }

    fn write(&mut self, address: I2cAddress, data: &[u8]) -> HalResult<()> {
        trace!("I2C1 write {:?} {:02X?}", address, data);
        self.sim.lock().eeprom.write(address, data)
    }

    fn read(&mut self, address: I2cAddress, buffer: &mut [u8]) -> HalResult<()> {
        self.sim.lock().eeprom.read(address, buffer)
    }

    fn write_read(
        &mut self,
        address: I2cAddress,
        write_data: &[u8],
        read_buffer: &mut [u8],
    ) -> HalResult<()> {
        let mut state = self.sim.lock();
        state.eeprom.write(address, write_data)?;
        state.eeprom.read(address, read_buffer)
    }
}

impl I2cInterrupt for SimI2c {
    fn start_write(
        &mut self,
        address: I2cAddress,
        register: u8,
        value: u8,
        on_event: fn(I2cEvent),
    ) -> HalResult<()> {
        let event = match self.write_register(address, register, value) {
            Ok(()) => I2cEvent::Written,
            Err(HalError::Nack) => I2cEvent::Nack,
            Err(err) => return Err(err),
        };
        self.notify(event, on_event);
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
            Err(HalError::Nack) => I2cEvent::Nack,
            Err(err) => return Err(err),
        };
        self.notify(event, on_event);
        Ok(())
    }

    fn is_busy(&self) -> bool {
        false
    }
}

impl I2cDma for SimI2c {
    fn write_dma(&mut self, address: I2cAddress, data: &[u8]) -> HalResult<()> {
        self.write(address, data)
    }

    fn read_dma(&mut self, address: I2cAddress, register: u8, buffer: &mut [u8]) -> HalResult<()> {
        self.write_read(address, &[register], buffer)
    }
}

#[derive(Debug, Default)]
pub(crate) struct SpiState {
    config: Option<SpiConfig>,
    selected: bool,
    transfers: u32,
}

/// Handle to SPI1; chip select on PA4
pub struct SimSpi {
    sim: Arc<Simulation>,
}

impl SimSpi {
    pub(crate) fn new(sim: Arc<Simulation>) -> Self {
        Self { sim }
    }

    pub fn is_selected(&self) -> bool {
        self.sim.lock().spi.selected
    }

    /// Completed interrupt and DMA transfers
    pub fn transfers(&self) -> u32 {
        self.sim.lock().spi.transfers
    }

    /// Loop `tx_data` back with chip select held, then report it
    fn loop_back(&mut self, tx_data: &[u8], on_complete: fn(&[u8])) -> HalResult<()> {
        if tx_data.is_empty() {
            return Err(HalError::InvalidParameter);
        }
        let mut rx = vec![0u8; tx_data.len()];
        self.write_read(tx_data, &mut rx)?;
        self.sim.lock().spi.transfers += 1;
        on_complete(&rx);
        Ok(())
    }
}

impl SpiMaster for SimSpi {
    fn configure(&mut self, config: &SpiConfig) -> HalResult<()> {
        self.sim.lock().spi.config = Some(config.clone());
        debug!("SPI1 configured, {} Hz {:?}", config.frequency, config.mode);
        Ok(())
    }

    fn select(&mut self) -> HalResult<()> {
        self.sim.lock().spi.selected = true;
        Ok(())
    }

    fn deselect(&mut self) -> HalResult<()> {
        self.sim.lock().spi.selected = false;
        Ok(())
    }

    fn transfer_byte(&mut self, byte: u8) -> HalResult<u8> {
        if self.sim.lock().spi.config.is_none() {
            return Err(HalError::ConfigurationError);
        }
        Ok(byte)
    }
}

impl SpiInterrupt for SimSpi {
    fn start_transfer(&mut self, tx_data: &[u8], on_complete: fn(&[u8])) -> HalResult<()> {
        self.loop_back(tx_data, on_complete)
    }

    fn is_busy(&self) -> bool {
        false
    }
}

impl SpiDma for SimSpi {
    fn start_dma_transfer(&mut self, tx_data: &[u8], on_complete: fn(&[u8])) -> HalResult<()> {
        self.loop_back(tx_data, on_complete)
    }

    fn is_dma_busy(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimConfig;
    use std::sync::Mutex;

    static EVENTS: Mutex<Vec<I2cEvent>> = Mutex::new(Vec::new());
    static RECEIVED: Mutex<Vec<u8>> = Mutex::new(Vec::new());

    fn on_event(event: I2cEvent) {
        EVENTS.lock().unwrap().push(event);
    }

    fn on_complete(rx: &[u8]) {
        RECEIVED.lock().unwrap().extend_from_slice(rx);
    }

    fn sim() -> Arc<Simulation> {
        Arc::new(Simulation::new(SimConfig::default()))
    }

    #[test]
    fn eeprom_register_round_trip() {
        let sim = sim();
        let mut i2c = SimI2c::new(Arc::clone(&sim));
        assert_eq!(
            i2c.write_register(EEPROM_ADDRESS, 0, 1),
            Err(HalError::ConfigurationError)
        );

        i2c.configure(&I2cConfig::default()).unwrap();
        i2c.write_register(EEPROM_ADDRESS, 0x10, 0xAB).unwrap();
        assert_eq!(i2c.read_register(EEPROM_ADDRESS, 0x10).unwrap(), 0xAB);
        assert_eq!(i2c.read_register(EEPROM_ADDRESS, 0x11).unwrap(), 0xFF);
        assert_eq!(
            i2c.read_register(I2cAddress::SevenBit(0x51), 0),
            Err(HalError::Nack)
        );
    }

    #[test]
    fn block_transfer_wraps_at_end() {
        let sim = sim();
        let mut i2c = SimI2c::new(Arc::clone(&sim));
        i2c.configure(&I2cConfig::default()).unwrap();
        i2c.write_dma(EEPROM_ADDRESS, &[0xFE, 1, 2, 3]).unwrap();

        assert_eq!((i2c.eeprom(0xFE), i2c.eeprom(0xFF), i2c.eeprom(0)), (1, 2, 3));
        let mut buffer = [0u8; 3];
        i2c.read_dma(EEPROM_ADDRESS, 0xFE, &mut buffer).unwrap();
        assert_eq!(buffer, [1, 2, 3]);
    }

    #[test]
    fn interrupt_transfers_report_events() {
        let sim = sim();
        let mut i2c = SimI2c::new(Arc::clone(&sim));
        i2c.configure(&I2cConfig::default()).unwrap();

        i2c.start_write(EEPROM_ADDRESS, 3, 0x42, on_event).unwrap();
        i2c.start_read(EEPROM_ADDRESS, 3, on_event).unwrap();
        i2c.start_read(I2cAddress::SevenBit(0x20), 3, on_event).unwrap();
        assert_eq!(
            *EVENTS.lock().unwrap(),
            [I2cEvent::Written, I2cEvent::Read(0x42), I2cEvent::Nack]
        );
    }

    #[test]
    fn spi_loops_back_with_chip_select_released() {
        let sim = sim();
        let mut spi = SimSpi::new(Arc::clone(&sim));
        assert_eq!(spi.transfer_byte(1), Err(HalError::ConfigurationError));

        spi.configure(&SpiConfig::default()).unwrap();
        spi.start_transfer(&[1, 2, 3], on_complete).unwrap();
        spi.start_dma_transfer(&[4], on_complete).unwrap();

        assert_eq!(*RECEIVED.lock().unwrap(), [1, 2, 3, 4]);
        assert!(!spi.is_selected());
        assert_eq!(spi.transfers(), 2);
    }
}
