//! GPIO (General Purpose Input/Output) abstraction

use core::ops::Not;

use crate::error::HalResult;
use crate::interrupt::Handler;

/// GPIO pin modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// Analog input (ADC)
    Analog,
    /// Input (floating)
    Input,
    /// Input with pull-up resistor
    InputPullUp,
    /// Input with pull-down resistor
    InputPullDown,
    /// Output (push-pull)
    Output,
    /// Output (open-drain)
    OutputOpenDrain,
    /// Alternate function push-pull (SPI, UART TX, timer outputs)
    AlternatePushPull,
    /// Alternate function open-drain (I2C)
    AlternateOpenDrain,
}

/// GPIO pin levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Low level (0V)
    Low,
    /// High level (VCC)
    High,
}

impl Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Interrupt trigger edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Rising edge
    Rising,
    /// Falling edge
    Falling,
    /// Both edges
    Both,
}

/// GPIO port letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Port {
    A,
    B,
    C,
    D,
}

/// Port and pin number, e.g. PC13
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PinId {
    pub port: Port,
    pub pin: u8,
}

impl PinId {
    pub const fn new(port: Port, pin: u8) -> Self {
        Self { port, pin }
    }
}

impl core::fmt::Display for PinId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let port = match self.port {
            Port::A => 'A',
            Port::B => 'B',
            Port::C => 'C',
            Port::D => 'D',
        };
        write!(f, "P{}{}", port, self.pin)
    }
}

/// Pins used by the demos
pub mod pins {
    use super::{PinId, Port};

    pub const PA0: PinId = PinId::new(Port::A, 0);
    pub const PA1: PinId = PinId::new(Port::A, 1);
    pub const PA2: PinId = PinId::new(Port::A, 2);
    pub const PA3: PinId = PinId::new(Port::A, 3);
    pub const PA4: PinId = PinId::new(Port::A, 4);
    pub const PA6: PinId = PinId::new(Port::A, 6);
    pub const PA7: PinId = PinId::new(Port::A, 7);
    pub const PC13: PinId = PinId::new(Port::C, 13);
}

/// GPIO pin trait
pub trait GpioPin {
    /// Configure pin mode
    fn set_mode(&mut self, mode: PinMode) -> HalResult<()>;

    /// Read current level
    fn read(&self) -> HalResult<Level>;

    /// Write level (for output pins)
    fn write(&mut self, level: Level) -> HalResult<()>;

    fn set_high(&mut self) -> HalResult<()> {
        self.write(Level::High)
    }

    fn set_low(&mut self) -> HalResult<()> {
        self.write(Level::Low)
    }

    /// Toggle output
    fn toggle(&mut self) -> HalResult<()> {
        let current = self.read()?;
        self.write(!current)
    }

    /// Port and pin number
    fn id(&self) -> PinId;
}

/// GPIO pin with external interrupt (EXTI) support
pub trait GpioPinInterrupt: GpioPin {
    /// Route the pin's EXTI line to `handler` and enable it on `edge`
    fn enable_interrupt(&mut self, edge: Edge, handler: Handler) -> HalResult<()>;

    /// Disable interrupt
    fn disable_interrupt(&mut self) -> HalResult<()>;

    /// Clear pending interrupt
    fn clear_interrupt(&mut self) -> HalResult<()>;

    /// Check if interrupt is pending
    fn is_interrupt_pending(&self) -> bool;
}
