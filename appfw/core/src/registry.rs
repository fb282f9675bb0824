//! Ordered, capacity-bounded application registry

use core::fmt;

use heapless::Vec;

use crate::{AppDescriptor, AppError, AppResult, Application, MAX_APPS};

/// Registry of the applications available in this image
///
/// Insertion order is preserved and defines each application's index. Once
/// `N` applications are registered, further registrations are dropped; the
/// plain [`register`](Self::register) call does not report this, so an image
/// that registers too many applications is caught by comparing the expected
/// count against [`count`](Self::count).
pub struct AppRegistry<'a, const N: usize = MAX_APPS> {
    apps: Vec<AppDescriptor<'a>, N>,
}

impl<'a, const N: usize> AppRegistry<'a, N> {
    /// Create a new empty registry
    pub const fn new() -> Self {
        Self { apps: Vec::new() }
    }

    /// Register a descriptor, reporting where it landed
    pub fn try_insert(&mut self, descriptor: AppDescriptor<'a>) -> AppResult<usize> {
        let index = self.apps.len();
        match self.apps.push(descriptor) {
            Ok(()) => {
                log::debug!("registered app {}: {}", index, self.apps[index].name());
                Ok(index)
            }
            Err(dropped) => {
                log::warn!(
                    "app registry full ({} slots), dropping \"{}\"",
                    N,
                    dropped.name()
                );
                Err(AppError::RegistryFull)
            }
        }
    }

    /// Register a `setup`/`tick` function pair, reporting the assigned index
    pub fn try_register(&mut self, name: &'static str, setup: fn(), tick: fn()) -> AppResult<usize> {
        self.try_insert(AppDescriptor::from_fns(name, setup, tick))
    }

    /// Register an application object, reporting the assigned index
    pub fn try_register_app(
        &mut self,
        name: &'static str,
        app: &'a mut dyn Application,
    ) -> AppResult<usize> {
        self.try_insert(AppDescriptor::from_app(name, app))
    }

    /// Register a `setup`/`tick` function pair; silently dropped when full
    pub fn register(&mut self, name: &'static str, setup: fn(), tick: fn()) {
        let _ = self.try_register(name, setup, tick);
    }

    /// Register an application object; silently dropped when full
    pub fn register_app(&mut self, name: &'static str, app: &'a mut dyn Application) {
        let _ = self.try_register_app(name, app);
    }

    /// Number of registered applications
    pub fn count(&self) -> usize {
        self.apps.len()
    }

    /// Alias of [`count`](Self::count)
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.apps.is_full()
    }

    /// Maximum number of applications
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Descriptor at `index`, if registered
    pub fn get(&self, index: usize) -> Option<&AppDescriptor<'a>> {
        self.apps.get(index)
    }

    /// Mutable descriptor at `index`, if registered
    pub fn get_mut(&mut self, index: usize) -> Option<&mut AppDescriptor<'a>> {
        self.apps.get_mut(index)
    }

    /// Iterate over descriptors in index order
    pub fn iter(&self) -> impl Iterator<Item = &AppDescriptor<'a>> + '_ {
        self.apps.iter()
    }

    /// Write one `index: name` line per registered application
    pub fn write_entries<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        for (index, app) in self.apps.iter().enumerate() {
            writeln!(out, "{}: {}", index, app.name())?;
        }
        Ok(())
    }
}

impl<const N: usize> Default for AppRegistry<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for AppRegistry<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.apps.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nop() {}

    #[test]
    fn try_register_reports_indices() {
        let mut registry: AppRegistry<'_, 2> = AppRegistry::new();
        assert_eq!(registry.try_register("a", nop, nop), Ok(0));
        assert_eq!(registry.try_register("b", nop, nop), Ok(1));
        assert_eq!(
            registry.try_register("c", nop, nop),
            Err(AppError::RegistryFull)
        );
        assert!(registry.is_full());
    }

    #[test]
    fn entries_are_listed_in_order() {
        let mut registry: AppRegistry<'_, 4> = AppRegistry::new();
        registry.register("first", nop, nop);
        registry.register("second", nop, nop);

        let mut out = String::new();
        registry.write_entries(&mut out).unwrap();
        assert_eq!(out, "0: first\n1: second\n");
    }

    #[test]
    fn default_capacity_matches_max_apps() {
        let registry: AppRegistry<'_> = AppRegistry::default();
        assert_eq!(registry.capacity(), MAX_APPS);
        assert!(registry.is_empty());
    }
}
