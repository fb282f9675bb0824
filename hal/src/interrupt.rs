//! Interrupt vector binding
//!
//! Demos do not own the vector table. Instead they hand a plain function to
//! the peripheral driver when they enable an interrupt source, and the
//! driver's real vector (or a simulated one) calls it. A [`Vector`] is the
//! slot a driver keeps that function in.

use core::cell::Cell;

use critical_section::Mutex;

/// Handler for events that carry no data
pub type Handler = fn();

/// Interrupt priority (0 = highest)
pub type InterruptPriority = u8;

/// Slot holding the handler bound to one interrupt source
///
/// `H` is the handler's function pointer type, e.g. `fn()` or `fn(u16)`.
pub struct Vector<H: Copy + Send> {
    slot: Mutex<Cell<Option<H>>>,
}

impl<H: Copy + Send> Vector<H> {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(None)),
        }
    }

    /// Bind `handler`, replacing any previous one
    pub fn attach(&self, handler: H) {
        critical_section::with(|cs| self.slot.borrow(cs).set(Some(handler)));
    }

    pub fn detach(&self) {
        critical_section::with(|cs| self.slot.borrow(cs).set(None));
    }

    /// Currently bound handler
    pub fn handler(&self) -> Option<H> {
        critical_section::with(|cs| self.slot.borrow(cs).get())
    }

    pub fn is_attached(&self) -> bool {
        self.handler().is_some()
    }
}

impl Vector<Handler> {
    /// Invoke the bound handler; returns `false` when none is bound
    pub fn fire(&self) -> bool {
        match self.handler() {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }
}

impl<H: Copy + Send> Default for Vector<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};

    static FIRED: AtomicU32 = AtomicU32::new(0);

    fn on_event() {
        FIRED.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn fire_runs_attached_handler() {
        let vector: Vector<Handler> = Vector::new();
        assert!(!vector.fire());

        vector.attach(on_event);
        assert!(vector.fire());
        assert_eq!(FIRED.load(Ordering::SeqCst), 1);

        vector.detach();
        assert!(!vector.is_attached());
    }

    #[test]
    fn value_handler_is_returned() {
        fn double(value: u16) -> u16 {
            value * 2
        }
        let vector: Vector<fn(u16) -> u16> = Vector::new();
        vector.attach(double);
        assert_eq!(vector.handler().map(|h| h(21)), Some(42));
    }
}
