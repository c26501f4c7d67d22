use std::collections::BTreeMap;

use super::key_value::KeyValueStore;

/// Process-local store. Contents are lost when it is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }
}

impl KeyValueStore for MemoryStore {
    fn get(
        &self,
        key: &str,
    ) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(
        &mut self,
        key: &str,
        value: &str,
    ) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(
        &mut self,
        key: &str,
    ) {
        self.entries.remove(key);
    }
}
