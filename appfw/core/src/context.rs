//! Runtime context owning the registry and the selection

use core::fmt;

use crate::{
    AppDescriptor, AppError, AppRegistry, AppResult, AppSelector, Application, MAX_APPS,
};

/// Registry plus selection state for one firmware image
///
/// The context is filled during start-up and only read afterwards. Whoever
/// owns it (normally the dispatcher) decides when the write phase ends by no
/// longer handing out `&mut` access.
pub struct AppContext<'a, const N: usize = MAX_APPS> {
    registry: AppRegistry<'a, N>,
    selector: AppSelector,
}

impl<'a, const N: usize> AppContext<'a, N> {
    pub const fn new() -> Self {
        Self {
            registry: AppRegistry::new(),
            selector: AppSelector::new(),
        }
    }

    /// Register a `setup`/`tick` function pair; silently dropped when full
    pub fn register(&mut self, name: &'static str, setup: fn(), tick: fn()) {
        self.registry.register(name, setup, tick);
    }

    /// Register an application object; silently dropped when full
    pub fn register_app(&mut self, name: &'static str, app: &'a mut dyn Application) {
        self.registry.register_app(name, app);
    }

    /// Select `index` if it is registered; otherwise keep the current selection
    pub fn select(&mut self, index: usize) {
        self.selector.select(index, self.registry.count());
    }

    /// Select `index`, reporting a rejected request
    pub fn try_select(&mut self, index: usize) -> AppResult<()> {
        self.selector.try_select(index, self.registry.count())
    }

    /// Currently selected index
    pub fn current(&self) -> usize {
        self.selector.current()
    }

    /// Descriptor of the current selection, `None` while nothing is registered
    pub fn current_app(&self) -> Option<&AppDescriptor<'a>> {
        self.registry.get(self.selector.current())
    }

    /// Mutable descriptor of the current selection
    pub fn current_app_mut(&mut self) -> Option<&mut AppDescriptor<'a>> {
        self.registry.get_mut(self.selector.current())
    }

    /// Like [`current_app`](Self::current_app) but as a `Result`
    pub fn try_current_app(&self) -> AppResult<&AppDescriptor<'a>> {
        self.current_app().ok_or(AppError::EmptyRegistry)
    }

    pub fn count(&self) -> usize {
        self.registry.count()
    }

    pub fn get(&self, index: usize) -> Option<&AppDescriptor<'a>> {
        self.registry.get(index)
    }

    pub fn registry(&self) -> &AppRegistry<'a, N> {
        &self.registry
    }

    /// Mutable registry access for callers building the image
    pub fn registry_mut(&mut self) -> &mut AppRegistry<'a, N> {
        &mut self.registry
    }

    /// Write the human-readable listing of all applications and the selection
    pub fn list<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(out, "Available apps:")?;
        self.registry.write_entries(out)?;
        match self.current_app() {
            Some(app) => writeln!(out, "Current app: {} ({})", self.current(), app.name()),
            None => writeln!(out, "Current app: none"),
        }
    }
}

impl<const N: usize> Default for AppContext<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for AppContext<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("registry", &self.registry)
            .field("current", &self.selector.current())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nop() {}

    #[test]
    fn listing_includes_current() {
        let mut ctx: AppContext<'_, 4> = AppContext::new();
        ctx.register("Hello World", nop, nop);
        ctx.register("ADC Polling", nop, nop);
        ctx.select(1);

        let mut out = String::new();
        ctx.list(&mut out).unwrap();
        assert_eq!(
            out,
            "Available apps:\n0: Hello World\n1: ADC Polling\nCurrent app: 1 (ADC Polling)\n"
        );
    }

    #[test]
    fn empty_listing_has_no_current() {
        let ctx: AppContext<'_, 4> = AppContext::new();
        let mut out = String::new();
        ctx.list(&mut out).unwrap();
        assert_eq!(out, "Available apps:\nCurrent app: none\n");
        assert!(ctx.current_app().is_none());
        assert_eq!(ctx.try_current_app().unwrap_err(), AppError::EmptyRegistry);
    }
}
