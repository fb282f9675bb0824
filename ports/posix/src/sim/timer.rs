//! TIM2 time base, TIM3 PWM outputs and the RTC with its backup domain

use std::sync::Arc;

use appfw_hal::rtc::{BackupRegisters, Rtc, RtcConfig};
use appfw_hal::timer::{PwmChannel, Timer, TimerConfig, TimerMode};
use appfw_hal::{Handler, HalError, HalResult};
use log::{debug, trace};

use super::{Event, SimState, Simulation};

/// Timer kernel clock on the APB1 bus
pub const TIMER_CLOCK_HZ: u32 = 36_000_000;

/// TIM3 auto-reload: 1 kHz from 1 MHz
const PWM_MAX_DUTY: u16 = 999;

/// Backup data registers DR1..DR10
const BACKUP_REGISTERS: usize = 10;

/// Catch-up limit when the clock jumps several periods at once
const MAX_CATCH_UP: u32 = 16;

#[derive(Debug, Default)]
pub(crate) struct TimerState {
    config: Option<TimerConfig>,
    period_ms: u64,
    running: bool,
    last_update_ms: u64,
    next_update_ms: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PwmState {
    duty: u16,
    frequency_hz: u32,
    enabled: bool,
}

#[derive(Debug, Default)]
pub(crate) struct RtcState {
    running: bool,
    counter: u32,
    next_second_ms: u64,
    alarm: Option<u32>,
    second_irq: bool,
    alarm_irq: bool,
    access: bool,
    backup: [u16; BACKUP_REGISTERS],
}

impl RtcState {
    /// The RTC keeps counting through a system reset; only the interrupt
    /// enables and the backup write access are cleared
    pub(crate) fn reset_interrupts(&mut self) {
        self.second_irq = false;
        self.alarm_irq = false;
        self.access = false;
    }
}

pub(crate) fn collect(state: &mut SimState, now_ms: u64, events: &mut Vec<Event>) {
    let timer = &mut state.timer;
    let mut updates = 0;
    while timer.running && now_ms >= timer.next_update_ms && updates < MAX_CATCH_UP {
        updates += 1;
        timer.last_update_ms = timer.next_update_ms;
        timer.next_update_ms += timer.period_ms;
        events.push(Event::TimerUpdate);
        if matches!(timer.config.as_ref().map(|c| c.mode), Some(TimerMode::OneShot)) {
            timer.running = false;
        }
    }
    if timer.running && now_ms >= timer.next_update_ms {
        timer.next_update_ms = now_ms + timer.period_ms;
    }

    let rtc = &mut state.rtc;
    while rtc.running && now_ms >= rtc.next_second_ms {
        rtc.counter = rtc.counter.wrapping_add(1);
        rtc.next_second_ms += 1_000;
        if rtc.second_irq {
            events.push(Event::RtcSecond);
        }
        if rtc.alarm_irq && rtc.alarm == Some(rtc.counter) {
            events.push(Event::RtcAlarm);
        }
    }
}

/// Handle to TIM2
pub struct SimTimer {
    sim: Arc<Simulation>,
}

impl SimTimer {
    pub(crate) fn new(sim: Arc<Simulation>) -> Self {
        Self { sim }
    }
}

impl Timer for SimTimer {
    fn configure(&mut self, config: &TimerConfig) -> HalResult<()> {
        let period_ms = (config.period_us(TIMER_CLOCK_HZ) / 1_000).max(1);
        let mut state = self.sim.lock();
        state.timer.config = Some(config.clone());
        state.timer.period_ms = period_ms;
        debug!(
            "TIM2 configured, {} Hz update",
            config.update_hz(TIMER_CLOCK_HZ)
        );
        Ok(())
    }

    fn start(&mut self) -> HalResult<()> {
        let now_ms = self.sim.now_ms();
        let mut state = self.sim.lock();
        let timer = &mut state.timer;
        if timer.config.is_none() {
            return Err(HalError::ConfigurationError);
        }
        timer.running = true;
        timer.last_update_ms = now_ms;
        timer.next_update_ms = now_ms + timer.period_ms;
        Ok(())
    }

    fn stop(&mut self) -> HalResult<()> {
        self.sim.lock().timer.running = false;
        Ok(())
    }

    fn counter(&self) -> u32 {
        let now_ms = self.sim.now_ms();
        let state = self.sim.lock();
        let timer = &state.timer;
        match &timer.config {
            Some(config) if timer.running => {
                let elapsed = now_ms.saturating_sub(timer.last_update_ms).min(timer.period_ms);
                let ticks = elapsed * (u64::from(config.period) + 1) / timer.period_ms;
                u32::try_from(ticks).unwrap_or(u32::MAX)
            }
            _ => 0,
        }
    }

    fn listen(&mut self, handler: Handler) -> HalResult<()> {
        self.sim.vectors.tim2_update.attach(handler);
        Ok(())
    }

    fn unlisten(&mut self) -> HalResult<()> {
        self.sim.vectors.tim2_update.detach();
        Ok(())
    }
}

/// Handle to one TIM3 output compare channel
pub struct SimPwm {
    sim: Arc<Simulation>,
    channel: u8,
}

impl SimPwm {
    pub(crate) fn new(sim: Arc<Simulation>, channel: u8) -> Self {
        Self { sim, channel }
    }

    fn index(&self) -> HalResult<usize> {
        match self.channel {
            1 | 2 => Ok(usize::from(self.channel - 1)),
            _ => Err(HalError::InvalidParameter),
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut PwmState) -> T) -> HalResult<T> {
        let index = self.index()?;
        Ok(f(&mut self.sim.lock().pwm[index]))
    }

    pub fn is_enabled(&self) -> bool {
        self.with_state(|pwm| pwm.enabled).unwrap_or(false)
    }

    pub fn frequency(&self) -> u32 {
        self.with_state(|pwm| pwm.frequency_hz).unwrap_or(0)
    }
}

impl PwmChannel for SimPwm {
    fn set_duty(&mut self, duty: u16) -> HalResult<()> {
        if duty > PWM_MAX_DUTY {
            return Err(HalError::InvalidParameter);
        }
        self.with_state(|pwm| pwm.duty = duty)?;
        trace!("TIM3 CH{} duty {}", self.channel, duty);
        Ok(())
    }

    fn duty(&self) -> u16 {
        self.with_state(|pwm| pwm.duty).unwrap_or(0)
    }

    fn max_duty(&self) -> u16 {
        PWM_MAX_DUTY
    }

    fn set_frequency(&mut self, freq_hz: u32) -> HalResult<()> {
        if freq_hz == 0 {
            return Err(HalError::InvalidParameter);
        }
        self.with_state(|pwm| pwm.frequency_hz = freq_hz)
    }

    fn enable(&mut self) -> HalResult<()> {
        self.with_state(|pwm| pwm.enabled = true)
    }

    fn disable(&mut self) -> HalResult<()> {
        self.with_state(|pwm| pwm.enabled = false)
    }
}

/// Handle to the RTC and the backup domain
pub struct SimRtc {
    sim: Arc<Simulation>,
}

impl SimRtc {
    pub(crate) fn new(sim: Arc<Simulation>) -> Self {
        Self { sim }
    }
}

impl Rtc for SimRtc {
    fn configure(&mut self, config: &RtcConfig) -> HalResult<()> {
        if config.prescaler == 0 {
            return Err(HalError::InvalidParameter);
        }
        let now_ms = self.sim.now_ms();
        let mut state = self.sim.lock();
        state.rtc.running = true;
        state.rtc.counter = config.start_seconds;
        state.rtc.next_second_ms = now_ms + 1_000;
        debug!("RTC configured, prescaler {}", config.prescaler);
        Ok(())
    }

    fn wait_for_sync(&mut self) -> HalResult<()> {
        if self.sim.lock().rtc.running {
            Ok(())
        } else {
            Err(HalError::Timeout)
        }
    }

    fn counter(&self) -> u32 {
        self.sim.lock().rtc.counter
    }

    fn set_counter(&mut self, seconds: u32) -> HalResult<()> {
        self.sim.lock().rtc.counter = seconds;
        Ok(())
    }

    fn set_alarm(&mut self, seconds: u32) -> HalResult<()> {
        self.sim.lock().rtc.alarm = Some(seconds);
        Ok(())
    }

    fn listen_second(&mut self, handler: Handler) -> HalResult<()> {
        self.sim.vectors.rtc_second.attach(handler);
        self.sim.lock().rtc.second_irq = true;
        Ok(())
    }

    fn listen_alarm(&mut self, handler: Handler) -> HalResult<()> {
        self.sim.vectors.rtc_alarm.attach(handler);
        self.sim.lock().rtc.alarm_irq = true;
        Ok(())
    }
}

impl BackupRegisters for SimRtc {
    fn enable_access(&mut self) -> HalResult<()> {
        self.sim.lock().rtc.access = true;
        Ok(())
    }

    fn reset_domain(&mut self) -> HalResult<()> {
        let mut state = self.sim.lock();
        if !state.rtc.access {
            return Err(HalError::Locked);
        }
        state.rtc = RtcState {
            access: true,
            ..RtcState::default()
        };
        drop(state);
        self.sim.vectors.rtc_second.detach();
        self.sim.vectors.rtc_alarm.detach();
        Ok(())
    }

    fn read_register(&self, index: u8) -> HalResult<u16> {
        let slot = backup_slot(index)?;
        Ok(self.sim.lock().rtc.backup[slot])
    }

    fn write_register(&mut self, index: u8, value: u16) -> HalResult<()> {
        let slot = backup_slot(index)?;
        let mut state = self.sim.lock();
        if !state.rtc.access {
            return Err(HalError::Locked);
        }
        state.rtc.backup[slot] = value;
        Ok(())
    }
}

fn backup_slot(index: u8) -> HalResult<usize> {
    match usize::from(index) {
        slot @ 1..=BACKUP_REGISTERS => Ok(slot - 1),
        _ => Err(HalError::InvalidParameter),
    }
}
