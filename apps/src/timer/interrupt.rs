//! Timer Interrupt: 1 Hz TIM2 update interrupt toggling the LED

use appfw_core::Application;
use appfw_hal::gpio::GpioPin;
use appfw_hal::timer::{Timer, TimerConfig};
use appfw_hal::{DelayNs, HalResult, IrqCell, IrqCounter};
use log::{info, warn};

use crate::led::{state_label, Led};

const POLL_MS: u32 = 100;

static UPDATES: IrqCounter = IrqCounter::new();
static LED_ON: IrqCell<bool> = IrqCell::new(false);

/// TIM2 update handler
pub fn on_update() {
    UPDATES.increment();
    LED_ON.update(|on| !on);
}

pub struct TimerInterruptDemo<T, P, D> {
    timer: T,
    led: Led<P>,
    delay: D,
    last_count: u32,
}

impl<T: Timer, P: GpioPin, D: DelayNs> TimerInterruptDemo<T, P, D> {
    pub fn new(timer: T, led: P, delay: D) -> Self {
        Self {
            timer,
            led: Led::new(led),
            delay,
            last_count: 0,
        }
    }

    pub fn led(&self) -> &Led<P> {
        &self.led
    }

    pub fn last_count(&self) -> u32 {
        self.last_count
    }

    fn init(&mut self) -> HalResult<()> {
        UPDATES.reset();
        LED_ON.set(false);
        self.led.init()?;
        self.timer.configure(&TimerConfig::default())?;
        self.timer.listen(on_update)?;
        self.timer.start()
    }
}

impl<T: Timer, P: GpioPin, D: DelayNs> Application for TimerInterruptDemo<T, P, D> {
    fn setup(&mut self) {
        info!("Timer Interrupt Setup");
        match self.init() {
            Ok(()) => info!("Timer Interrupt: Timer2 configured for 1Hz interrupt"),
            Err(err) => warn!("Timer Interrupt: init failed: {}", err),
        }
    }

    fn tick(&mut self) {
        let count = UPDATES.get();
        if count != self.last_count {
            let on = LED_ON.get();
            if let Err(err) = self.led.set(on) {
                warn!("Timer Interrupt: {}", err);
            }
            info!("Timer Interrupt: Count = {}, LED = {}", count, state_label(on));
            self.last_count = count;
        }

        self.delay.delay_ms(POLL_MS);
    }
}
