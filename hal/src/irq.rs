//! Interrupt to main-loop handoff
//!
//! Each demo shares a little state with its interrupt handlers: a completion
//! flag, a counter, a last converted value, a byte queue. These types are
//! the single-producer/single-consumer channels for that, usable from a
//! `static` and safe against preemption by the handler.

use core::cell::{Cell, RefCell};
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use critical_section::Mutex;
use heapless::Deque;

/// Event flag set by a handler and consumed by the loop
pub struct IrqFlag(AtomicBool);

impl IrqFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Flag that starts out raised, e.g. "transfer complete" before any transfer
    pub const fn raised() -> Self {
        Self(AtomicBool::new(true))
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Read and clear in one step
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

impl Default for IrqFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Monotonic event counter
pub struct IrqCounter(AtomicU32);

impl IrqCounter {
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    /// Increment, returning the new count
    pub fn increment(&self) -> u32 {
        self.0.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
    }

    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::Release);
    }
}

impl Default for IrqCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Copyable value shared with a handler
pub struct IrqCell<T: Copy> {
    value: Mutex<Cell<T>>,
}

impl<T: Copy> IrqCell<T> {
    pub const fn new(value: T) -> Self {
        Self {
            value: Mutex::new(Cell::new(value)),
        }
    }

    pub fn get(&self) -> T {
        critical_section::with(|cs| self.value.borrow(cs).get())
    }

    pub fn set(&self, value: T) {
        critical_section::with(|cs| self.value.borrow(cs).set(value));
    }

    /// Store `value`, returning the previous one
    pub fn replace(&self, value: T) -> T {
        critical_section::with(|cs| self.value.borrow(cs).replace(value))
    }

    /// Apply `f` atomically with respect to handlers, returning the new value
    pub fn update<F: FnOnce(T) -> T>(&self, f: F) -> T {
        critical_section::with(|cs| {
            let cell = self.value.borrow(cs);
            let next = f(cell.get());
            cell.set(next);
            next
        })
    }
}

/// Bounded byte queue between a handler and the loop
///
/// A push into a full ring is dropped, the way a receive interrupt drops a
/// byte when the software buffer has no room.
pub struct IrqRing<const N: usize> {
    queue: Mutex<RefCell<Deque<u8, N>>>,
}

impl<const N: usize> IrqRing<N> {
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Append a byte; returns `false` if the ring was full
    pub fn push(&self, byte: u8) -> bool {
        critical_section::with(|cs| self.queue.borrow_ref_mut(cs).push_back(byte).is_ok())
    }

    pub fn pop(&self) -> Option<u8> {
        critical_section::with(|cs| self.queue.borrow_ref_mut(cs).pop_front())
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.queue.borrow_ref(cs).len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        critical_section::with(|cs| self.queue.borrow_ref(cs).is_full())
    }

    pub fn clear(&self) {
        critical_section::with(|cs| self.queue.borrow_ref_mut(cs).clear());
    }
}

impl<const N: usize> Default for IrqRing<N> {
    fn default() -> Self {
        Self::new()
    }
}
