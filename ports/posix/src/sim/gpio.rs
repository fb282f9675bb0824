//! GPIO pins and the scripted buttons

use std::collections::HashMap;
use std::sync::Arc;

use appfw_hal::gpio::{pins, Edge, GpioPin, GpioPinInterrupt, Level, PinId, PinMode};
use appfw_hal::{Handler, HalError, HalResult};
use log::{debug, trace};

use super::{Event, SimConfig, SimState, Simulation};

/// Buttons wired to ground on PA3 and PA4, pressed by the script
pub const BUTTONS: [PinId; 2] = [pins::PA3, pins::PA4];

/// How long a scripted press holds the line low
const PRESS_MS: u64 = 150;

#[derive(Debug, Clone, Copy)]
pub(crate) struct PinState {
    pub(crate) mode: Option<PinMode>,
    pub(crate) level: Level,
    pub(crate) edge: Option<Edge>,
    pub(crate) pending: bool,
}

impl Default for PinState {
    fn default() -> Self {
        // Pull-ups on the buttons, LEDs wired active low
        Self {
            mode: None,
            level: Level::High,
            edge: None,
            pending: false,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ButtonScript {
    next_press_ms: Option<u64>,
    release_ms: Option<u64>,
}

pub(crate) fn collect(state: &mut SimState, now_ms: u64, config: &SimConfig, events: &mut Vec<Event>) {
    let period_ms = u64::try_from(config.button_period.as_millis()).unwrap_or(u64::MAX);
    let SimState { pins, buttons, .. } = state;

    if let Some(release) = buttons.release_ms {
        if now_ms >= release {
            buttons.release_ms = None;
            for id in BUTTONS {
                drive_input(pins, id, Level::High, events);
            }
        }
        return;
    }

    let next = *buttons.next_press_ms.get_or_insert(period_ms);
    if now_ms >= next {
        debug!("Script: buttons pressed");
        buttons.release_ms = Some(now_ms + PRESS_MS);
        buttons.next_press_ms = Some(now_ms + period_ms);
        for id in BUTTONS {
            drive_input(pins, id, Level::Low, events);
        }
    }
}

/// Change an input from outside and raise its EXTI line on a matching edge
fn drive_input(
    pins: &mut HashMap<PinId, PinState>,
    id: PinId,
    level: Level,
    events: &mut Vec<Event>,
) {
    let pin = pins.entry(id).or_default();
    if pin.level == level {
        return;
    }
    pin.level = level;

    let triggered = matches!(
        (pin.edge, level),
        (Some(Edge::Falling | Edge::Both), Level::Low) | (Some(Edge::Rising | Edge::Both), Level::High)
    );
    if triggered {
        pin.pending = true;
        events.push(Event::Exti(id.pin));
    }
}

/// Handle to one simulated pin
pub struct SimPin {
    sim: Arc<Simulation>,
    id: PinId,
}

impl SimPin {
    pub(crate) fn new(sim: Arc<Simulation>, id: PinId) -> Self {
        Self { sim, id }
    }

    pub fn mode(&self) -> Option<PinMode> {
        self.sim.lock().pins.get(&self.id).and_then(|pin| pin.mode)
    }
}

impl GpioPin for SimPin {
    fn set_mode(&mut self, mode: PinMode) -> HalResult<()> {
        self.sim.lock().pins.entry(self.id).or_default().mode = Some(mode);
        trace!("{} mode {:?}", self.id, mode);
        Ok(())
    }

    fn read(&self) -> HalResult<Level> {
        Ok(self
            .sim
            .lock()
            .pins
            .get(&self.id)
            .map_or(Level::High, |pin| pin.level))
    }

    fn write(&mut self, level: Level) -> HalResult<()> {
        let mut state = self.sim.lock();
        let pin = state.pins.entry(self.id).or_default();
        match pin.mode {
            Some(PinMode::Output | PinMode::OutputOpenDrain) => {
                if pin.level != level {
                    debug!("{} -> {:?}", self.id, level);
                }
                pin.level = level;
                Ok(())
            }
            _ => Err(HalError::ConfigurationError),
        }
    }

    fn id(&self) -> PinId {
        self.id
    }
}

impl GpioPinInterrupt for SimPin {
    fn enable_interrupt(&mut self, edge: Edge, handler: Handler) -> HalResult<()> {
        let vector = self
            .sim
            .vectors
            .exti
            .get(usize::from(self.id.pin))
            .ok_or(HalError::InvalidParameter)?;
        vector.attach(handler);
        self.sim.lock().pins.entry(self.id).or_default().edge = Some(edge);
        Ok(())
    }

    fn disable_interrupt(&mut self) -> HalResult<()> {
        if let Some(vector) = self.sim.vectors.exti.get(usize::from(self.id.pin)) {
            vector.detach();
        }
        self.sim.lock().pins.entry(self.id).or_default().edge = None;
        Ok(())
    }

    fn clear_interrupt(&mut self) -> HalResult<()> {
        self.sim.lock().pins.entry(self.id).or_default().pending = false;
        Ok(())
    }

    fn is_interrupt_pending(&self) -> bool {
        self.sim
            .lock()
            .pins
            .get(&self.id)
            .is_some_and(|pin| pin.pending)
    }
}
