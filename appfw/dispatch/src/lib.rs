#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]

//! # Superloop dispatcher
//!
//! Boots the application framework and then runs the selected application
//! forever: registration, listing and default selection happen once in
//! [`Dispatcher::boot`], the selected `setup` runs once, and afterwards its
//! `tick` is invoked back to back with no delay or yielding between passes.
//! Pacing is the application's own business.

use core::fmt;

use appfw_core::{AppContext, MAX_APPS};
use log::{debug, info, warn};

pub mod config;

pub use config::*;

/// Dispatcher lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Registration and selection still pending
    Init,
    /// Selection is fixed; the loop may run
    Running,
}

/// Superloop dispatcher owning the application context
pub struct Dispatcher<'a, const N: usize = MAX_APPS> {
    context: AppContext<'a, N>,
    config: DispatcherConfig,
    state: DispatchState,
    started: bool,
    iterations: u64,
}

impl<'a, const N: usize> Dispatcher<'a, N> {
    pub const fn new(config: DispatcherConfig) -> Self {
        Self {
            context: AppContext::new(),
            config,
            state: DispatchState::Init,
            started: false,
            iterations: 0,
        }
    }

    /// Run registration, print the listing and fix the selection.
    ///
    /// `register` is called exactly once with the empty context. The
    /// configured default index is applied through the regular selection
    /// rule, so an out-of-range default leaves application 0 selected.
    /// Writing to `console` is best effort.
    pub fn boot<F, W>(&mut self, register: F, console: &mut W)
    where
        F: FnOnce(&mut AppContext<'a, N>),
        W: fmt::Write,
    {
        if self.state != DispatchState::Init {
            warn!("Dispatcher already booted");
            return;
        }

        register(&mut self.context);

        self.context.select(0);
        if self.context.try_select(self.config.default_index).is_err() {
            warn!(
                "Default app {} not registered, keeping {}",
                self.config.default_index,
                self.context.current()
            );
        }

        if self.config.list_on_boot && self.context.list(console).is_err() {
            debug!("Console rejected app listing");
        }

        match self.context.current_app() {
            Some(app) => info!("Selected app {}: {}", self.context.current(), app.name()),
            None => warn!("No applications registered"),
        }

        self.state = DispatchState::Running;
    }

    /// Invoke the selected application's `setup`.
    ///
    /// Runs at most once per dispatcher and does nothing before boot or
    /// while the registry is empty.
    pub fn start(&mut self) {
        if self.state != DispatchState::Running || self.started {
            return;
        }
        self.started = true;

        if let Some(app) = self.context.current_app_mut() {
            debug!("Setting up {}", app.name());
            app.setup();
        }
    }

    /// One superloop pass.
    ///
    /// Returns `true` when the selected `tick` was invoked. With nothing
    /// registered the idle hook runs instead.
    pub fn step(&mut self) -> bool {
        if self.state != DispatchState::Running {
            return false;
        }
        if !self.started {
            self.start();
        }

        match self.context.current_app_mut() {
            Some(app) => {
                app.tick();
                self.iterations = self.iterations.wrapping_add(1);
                true
            }
            None => {
                if let Some(hook) = self.config.idle_hook {
                    hook();
                }
                false
            }
        }
    }

    /// Run `passes` superloop passes, returning how many invoked a tick
    pub fn run_for(&mut self, passes: u64) -> u64 {
        let mut ticks = 0;
        for _ in 0..passes {
            if self.step() {
                ticks += 1;
            }
        }
        ticks
    }

    /// Run the selected application forever
    pub fn run(&mut self) -> ! {
        self.start();
        loop {
            self.step();
        }
    }

    /// Shutdown hook, intentionally empty.
    ///
    /// Nothing is torn down; hosts that can stop the loop call this before
    /// leaving so the sequence mirrors a normal program exit.
    pub fn exit(&mut self) {
        debug!("Dispatcher exit after {} ticks", self.iterations);
    }

    /// Number of `tick` invocations so far
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Read-only view of the registry and selection
    pub fn context(&self) -> &AppContext<'a, N> {
        &self.context
    }
}

impl<const N: usize> Default for Dispatcher<'_, N> {
    fn default() -> Self {
        Self::new(DispatcherConfig::default())
    }
}

impl<const N: usize> fmt::Debug for Dispatcher<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("state", &self.state)
            .field("current", &self.context.current())
            .field("count", &self.context.count())
            .field("iterations", &self.iterations)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DispatchState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            DispatchState::Init => defmt::write!(fmt, "Init"),
            DispatchState::Running => defmt::write!(fmt, "Running"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for Dispatcher<'_, N> {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Dispatcher{{state: {}, current: {}, count: {}}}",
            self.state,
            self.context.current(),
            self.context.count()
        );
    }
}
