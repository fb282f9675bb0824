//! RTC: seconds counter from the LSE with second and alarm interrupts
//!
//! Backup register DR1 holds a marker once the RTC has been configured, so
//! a warm reset keeps the running clock instead of resetting it.

use appfw_core::Application;
use appfw_hal::rtc::{BackupRegisters, Rtc, RtcConfig, TimeOfDay};
use appfw_hal::{DelayNs, HalResult, IrqFlag};
use log::{info, warn};

/// Written to [`MARKER_REGISTER`] after first configuration
pub const CONFIGURED_MARKER: u16 = 0xA5A5;
pub const MARKER_REGISTER: u8 = 1;

/// First alarm, seconds after a fresh configuration
pub const FIRST_ALARM_S: u32 = 10;
/// Distance between later alarms
pub const ALARM_INTERVAL_S: u32 = 30;

const POLL_MS: u32 = 100;

static SECOND: IrqFlag = IrqFlag::new();
static ALARM: IrqFlag = IrqFlag::new();

/// RTC second interrupt handler
pub fn on_second() {
    SECOND.set();
}

/// RTC alarm interrupt handler
pub fn on_alarm() {
    ALARM.set();
}

pub struct RtcDemo<R, D> {
    rtc: R,
    delay: D,
    alarms: u32,
}

impl<R: Rtc + BackupRegisters, D: DelayNs> RtcDemo<R, D> {
    pub fn new(rtc: R, delay: D) -> Self {
        Self {
            rtc,
            delay,
            alarms: 0,
        }
    }

    /// Alarms handled since setup
    pub fn alarms(&self) -> u32 {
        self.alarms
    }

    pub fn rtc(&self) -> &R {
        &self.rtc
    }

    fn init(&mut self) -> HalResult<()> {
        SECOND.clear();
        ALARM.clear();
        self.rtc.enable_access()?;

        if self.rtc.read_register(MARKER_REGISTER)? != CONFIGURED_MARKER {
            info!("RTC: Configuring for first time");
            self.rtc.reset_domain()?;
            self.rtc.configure(&RtcConfig::default())?;
            self.rtc.listen_second(on_second)?;
            self.rtc.set_counter(0)?;
            self.rtc.set_alarm(FIRST_ALARM_S)?;
            self.rtc.listen_alarm(on_alarm)?;
            self.rtc.write_register(MARKER_REGISTER, CONFIGURED_MARKER)?;
            info!("RTC: Configuration complete");
        } else {
            info!("RTC: Already configured, waiting for sync");
            self.rtc.wait_for_sync()?;
            self.rtc.listen_second(on_second)?;
            self.rtc.listen_alarm(on_alarm)?;
        }
        Ok(())
    }

    fn handle_alarm(&mut self, now: u32) -> HalResult<()> {
        info!("RTC: ALARM! Time is {}", TimeOfDay::from_seconds(now));
        self.alarms += 1;
        self.rtc.set_alarm(now.wrapping_add(ALARM_INTERVAL_S))?;
        info!("RTC: Next alarm set for {} seconds", ALARM_INTERVAL_S);
        Ok(())
    }
}

impl<R: Rtc + BackupRegisters, D: DelayNs> Application for RtcDemo<R, D> {
    fn setup(&mut self) {
        info!("RTC Setup");
        if let Err(err) = self.init() {
            warn!("RTC: init failed: {}", err);
        }
        info!("RTC: Current time = {} seconds", self.rtc.counter());
    }

    fn tick(&mut self) {
        if SECOND.take() {
            let now = self.rtc.counter();
            info!(
                "RTC: {} ({} seconds since start)",
                TimeOfDay::from_seconds(now),
                now
            );
        }

        if ALARM.take() {
            let now = self.rtc.counter();
            if let Err(err) = self.handle_alarm(now) {
                warn!("RTC: {}", err);
            }
        }

        self.delay.delay_ms(POLL_MS);
    }
}
