use std::path::PathBuf;

use quote_core::store::{KeyValueStore, StoreConfig, StoreError, StoreFactory};

use crate::store::{TomlFileStore, to_store_error};

/// File used when the configuration leaves the location empty.
const DEFAULT_STORE_FILE: &str = "quote-session.toml";

/// Resolve the store file for an empty location.
///
/// Resolution order:
/// 1. **`MOTOR_QUOTE_STORE`**, if set.
/// 2. **`./quote-session.toml`** in the current working directory.
fn default_store_path() -> PathBuf {
    if let Ok(path) = std::env::var("MOTOR_QUOTE_STORE") {
        return PathBuf::from(path);
    }
    PathBuf::from(DEFAULT_STORE_FILE)
}

/// [`StoreFactory`] for TOML files.
///
/// Register this with a [`quote_core::store::StoreRegistry`] to make the
/// `"toml"` backend available:
///
/// ```rust,no_run
/// use quote_core::store::StoreRegistry;
/// use quote_store_file::TomlStoreFactory;
///
/// let mut registry = StoreRegistry::with_memory();
/// registry.register(Box::new(TomlStoreFactory));
/// ```
pub struct TomlStoreFactory;

impl TomlStoreFactory {
    pub const BACKEND: &'static str = "toml";
}

impl StoreFactory for TomlStoreFactory {
    fn backend_name(&self) -> &'static str {
        Self::BACKEND
    }

    /// Open the file named by `config.location`, creating it on first save.
    fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, StoreError> {
        let path = if config.location.trim().is_empty() {
            default_store_path()
        } else {
            PathBuf::from(&config.location)
        };

        let store = TomlFileStore::open(path).map_err(to_store_error)?;
        Ok(Box::new(store))
    }
}
