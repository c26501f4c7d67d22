use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// String key-value store backing wizard state.
///
/// Reads and writes are infallible so that progress tracking never fails;
/// backends that persist elsewhere buffer changes and write them out in
/// [`flush`](KeyValueStore::flush).
pub trait KeyValueStore {
    fn get(
        &self,
        key: &str,
    ) -> Option<String>;

    fn set(
        &mut self,
        key: &str,
        value: &str,
    );

    fn remove(
        &mut self,
        key: &str,
    );

    /// Persist buffered changes. In-memory stores have nothing to do.
    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(
        &self,
        key: &str,
    ) -> Option<String> {
        (**self).get(key)
    }

    fn set(
        &mut self,
        key: &str,
        value: &str,
    ) {
        (**self).set(key, value)
    }

    fn remove(
        &mut self,
        key: &str,
    ) {
        (**self).remove(key)
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        (**self).flush()
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get(
        &self,
        key: &str,
    ) -> Option<String> {
        (**self).get(key)
    }

    fn set(
        &mut self,
        key: &str,
        value: &str,
    ) {
        (**self).set(key, value)
    }

    fn remove(
        &mut self,
        key: &str,
    ) {
        (**self).remove(key)
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        (**self).flush()
    }
}
