use std::collections::HashMap;

use super::key_value::{KeyValueStore, StoreError};
use super::memory::MemoryStore;

/// Backend-agnostic store configuration.
///
/// `backend` must match the [`StoreFactory::backend_name`] of a registered
/// factory. `location` is passed through to that factory unchanged; its
/// meaning is entirely backend-specific.
///
/// | backend  | location examples             |
/// |----------|-------------------------------|
/// | `memory` | ignored                       |
/// | `toml`   | `quote-session.toml`          |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"toml"`).
    pub backend: String,
    /// Opaque value forwarded to the factory's `create` method.
    pub location: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: MemoryStoreFactory::BACKEND.to_string(),
            location: String::new(),
        }
    }
}

/// One implementation per store backend. Each backend exports a unit
/// struct implementing this trait, registered with a [`StoreRegistry`] at
/// startup.
pub trait StoreFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Open (or create) the store described by `config`.
    fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, StoreError>;
}

/// Factory for [`MemoryStore`]. The location is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryStoreFactory;

impl MemoryStoreFactory {
    pub const BACKEND: &'static str = "memory";
}

impl StoreFactory for MemoryStoreFactory {
    fn backend_name(&self) -> &'static str {
        Self::BACKEND
    }

    fn create(
        &self,
        _config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, StoreError> {
        Ok(Box::new(MemoryStore::new()))
    }
}

/// Registry of [`StoreFactory`] instances, keyed by backend name.
///
/// Typical lifetime:
/// 1. Create with `StoreRegistry::new()` (or `with_memory()`).
/// 2. Call `register` once per known backend.
/// 3. Call `create` whenever a session needs a store.
pub struct StoreRegistry {
    factories: HashMap<&'static str, Box<dyn StoreFactory>>,
}

impl StoreRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a registry with the in-memory backend already registered.
    pub fn with_memory() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(MemoryStoreFactory));
        registry
    }

    /// Register a backend factory.
    ///
    /// If a factory with the same [`StoreFactory::backend_name`] is already
    /// present it is silently replaced.
    pub fn register(
        &mut self,
        factory: Box<dyn StoreFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory that matches `config.backend` and return the
    /// store it produces.
    ///
    /// # Errors
    /// * [`StoreError::Configuration`] if no factory is registered for the
    ///   requested backend name.
    /// * Any error the chosen factory itself returns.
    pub fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, StoreError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                StoreError::Configuration(format!(
                    "unknown backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        factory.create(config)
    }
}

impl Default for StoreRegistry {
    fn default() -> Self {
        Self::new()
    }
}
