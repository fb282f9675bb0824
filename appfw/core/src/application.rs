//! Application contract and registry descriptors

use core::fmt;

/// One selectable firmware behavior.
///
/// `setup` runs exactly once when the application becomes active, before the
/// first `tick`. `tick` performs one pass of work and is called again as soon
/// as it returns. Both must return in finite time: the dispatcher has no way
/// to interrupt an application that never comes back.
pub trait Application {
    /// Configure whatever the application needs
    fn setup(&mut self);

    /// Perform one iteration of the application's foreground loop
    fn tick(&mut self);
}

/// How a descriptor reaches its application code
pub enum AppEntry<'a> {
    /// Free functions, the shape produced by `register(name, setup, tick)`
    Functions { setup: fn(), tick: fn() },
    /// A borrowed application object
    Object(&'a mut dyn Application),
}

/// A registered name plus the entry points it dispatches to
pub struct AppDescriptor<'a> {
    name: &'static str,
    entry: AppEntry<'a>,
}

impl<'a> AppDescriptor<'a> {
    /// Descriptor backed by two plain functions
    pub const fn from_fns(name: &'static str, setup: fn(), tick: fn()) -> Self {
        Self {
            name,
            entry: AppEntry::Functions { setup, tick },
        }
    }

    /// Descriptor backed by an application object
    pub fn from_app(name: &'static str, app: &'a mut dyn Application) -> Self {
        Self {
            name,
            entry: AppEntry::Object(app),
        }
    }

    /// Display name used for listing
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Entry points of this descriptor
    pub fn entry(&self) -> &AppEntry<'a> {
        &self.entry
    }

    /// Invoke the setup entry point
    pub fn setup(&mut self) {
        match self.entry {
            AppEntry::Functions { setup, .. } => setup(),
            AppEntry::Object(ref mut app) => app.setup(),
        }
    }

    /// Invoke the loop entry point once
    pub fn tick(&mut self) {
        match self.entry {
            AppEntry::Functions { tick, .. } => tick(),
            AppEntry::Object(ref mut app) => app.tick(),
        }
    }
}

impl fmt::Debug for AppDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.entry {
            AppEntry::Functions { .. } => "fn",
            AppEntry::Object(_) => "object",
        };
        f.debug_struct("AppDescriptor")
            .field("name", &self.name)
            .field("entry", &kind)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AppDescriptor<'_> {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "AppDescriptor({=str})", self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static SETUPS: AtomicU32 = AtomicU32::new(0);
    static TICKS: AtomicU32 = AtomicU32::new(0);

    fn count_setup() {
        SETUPS.fetch_add(1, Ordering::SeqCst);
    }

    fn count_tick() {
        TICKS.fetch_add(1, Ordering::SeqCst);
    }

    struct Recorder {
        calls: Vec<&'static str>,
    }

    impl Application for Recorder {
        fn setup(&mut self) {
            self.calls.push("setup");
        }

        fn tick(&mut self) {
            self.calls.push("tick");
        }
    }

    #[test]
    fn function_descriptor_calls_through() {
        let mut desc = AppDescriptor::from_fns("fns", count_setup, count_tick);
        desc.setup();
        desc.tick();
        desc.tick();

        assert_eq!(SETUPS.load(Ordering::SeqCst), 1);
        assert_eq!(TICKS.load(Ordering::SeqCst), 2);
        assert_eq!(desc.name(), "fns");
    }

    #[test]
    fn object_descriptor_calls_through() {
        let mut app = Recorder { calls: Vec::new() };
        {
            let mut desc = AppDescriptor::from_app("obj", &mut app);
            desc.setup();
            desc.tick();
            assert!(matches!(desc.entry(), AppEntry::Object(_)));
        }
        assert_eq!(app.calls, ["setup", "tick"]);
    }

    #[test]
    fn debug_shows_entry_kind() {
        let desc = AppDescriptor::from_fns("dbg", count_setup, count_tick);
        let text = format!("{:?}", desc);
        assert!(text.contains("dbg"));
        assert!(text.contains("fn"));
    }
}
