use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quote_core::store::{KeyValueStore, StoreError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// On-disk layout:
///
/// ```toml
/// [entries]
/// "quote_progress.vehicle_details" = "100"
/// vehicleDetails = '{"vehicleType":"truck", ...}'
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// Key-value store kept in a TOML file, one file per quote session.
///
/// The file is read once on [`open`](Self::open). Changes stay in memory
/// until [`save`](Self::save) (or [`KeyValueStore::flush`]) writes the whole
/// file back.
pub struct TomlFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    dirty: bool,
}

impl TomlFileStore {
    /// Loads `path`, or starts empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read store file '{}'", path.display()))?;
            let file: StoreFile = toml::from_str(&text)
                .with_context(|| format!("Failed to parse store file '{}'", path.display()))?;
            file.entries
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), keys = entries.len(), "store file opened");

        Ok(Self {
            path,
            entries,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether there are changes not yet written to disk.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Writes the current entries to disk, replacing the file.
    ///
    /// The contents go to a sibling temporary file first and are renamed
    /// into place, so an interrupted save leaves the previous file intact.
    pub fn save(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
        }

        let file = StoreFile {
            entries: self.entries.clone(),
        };
        let text = toml::to_string_pretty(&file).context("Failed to serialize store entries")?;

        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, text)
            .with_context(|| format!("Failed to write '{}'", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace '{}'", self.path.display()))?;

        self.dirty = false;
        debug!(path = %self.path.display(), keys = self.entries.len(), "store file saved");
        Ok(())
    }
}

/// Maps a store-file failure to [`StoreError`]: TOML encoding problems are
/// serialization errors, anything else is I/O.
pub(crate) fn to_store_error(error: anyhow::Error) -> StoreError {
    let message = format!("{error:#}");
    if error.downcast_ref::<toml::de::Error>().is_some()
        || error.downcast_ref::<toml::ser::Error>().is_some()
    {
        StoreError::Serialization(message)
    } else {
        StoreError::Io(message)
    }
}

impl KeyValueStore for TomlFileStore {
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
        self.dirty = true;
    }

    fn remove(
        &mut self,
        key: &str,
    ) {
        if self.entries.remove(key).is_some() {
            self.dirty = true;
        }
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        self.save().map_err(to_store_error)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quote_core::calculations::ProgressModel;
    use quote_core::Step;
    use tempfile::TempDir;

    use super::*;

    fn store_path(dir: &TempDir) -> PathBuf {
        dir.path().join("session.toml")
    }

    #[test]
    fn open_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();

        let store = TomlFileStore::open(store_path(&dir)).unwrap();

        assert_eq!(store.get("anything"), None);
        assert!(!store.is_dirty());
        assert!(!store_path(&dir).exists());
    }

    #[test]
    fn changes_survive_save_and_reopen() {
        let dir = TempDir::new().unwrap();
        let mut store = TomlFileStore::open(store_path(&dir)).unwrap();
        store.set("quote_progress.download", "50");
        store.set("vehicleDetails", r#"{"make":"kia"}"#);
        assert!(store.is_dirty());

        store.save().unwrap();
        let reopened = TomlFileStore::open(store_path(&dir)).unwrap();

        assert_eq!(reopened.get("quote_progress.download"), Some("50".to_string()));
        assert_eq!(reopened.get("vehicleDetails"), Some(r#"{"make":"kia"}"#.to_string()));
    }

    #[test]
    fn unsaved_changes_are_not_on_disk() {
        let dir = TempDir::new().unwrap();
        let mut store = TomlFileStore::open(store_path(&dir)).unwrap();
        store.set("k", "v");

        let reopened = TomlFileStore::open(store_path(&dir)).unwrap();

        assert_eq!(reopened.get("k"), None);
    }

    #[test]
    fn removing_missing_key_keeps_store_clean() {
        let dir = TempDir::new().unwrap();
        let mut store = TomlFileStore::open(store_path(&dir)).unwrap();

        store.remove("nothing");

        assert!(!store.is_dirty());
    }

    #[test]
    fn flush_writes_only_when_dirty() {
        let dir = TempDir::new().unwrap();
        let mut store = TomlFileStore::open(store_path(&dir)).unwrap();

        store.flush().unwrap();
        assert!(!store_path(&dir).exists());

        store.set("k", "v");
        store.flush().unwrap();
        assert!(store_path(&dir).exists());
        assert!(!store.is_dirty());
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("sessions").join("abc.toml");
        let mut store = TomlFileStore::open(&nested).unwrap();
        store.set("k", "v");

        store.save().unwrap();

        assert!(nested.exists());
    }

    #[test]
    fn malformed_file_fails_to_open() {
        let dir = TempDir::new().unwrap();
        fs::write(store_path(&dir), "entries = 42").unwrap();

        let err = TomlFileStore::open(store_path(&dir)).err().expect("open should fail");

        assert!(format!("{err:#}").contains("Failed to parse store file"));
    }

    #[test]
    fn toml_failures_map_to_serialization_error() {
        let dir = TempDir::new().unwrap();
        fs::write(store_path(&dir), "[entries\n").unwrap();

        let err = TomlFileStore::open(store_path(&dir)).err().expect("open should fail");

        assert!(matches!(to_store_error(err), StoreError::Serialization(_)));
    }

    #[test]
    fn write_failures_map_to_io_error() {
        let dir = TempDir::new().unwrap();
        // The target path is an existing directory, so the rename fails.
        let target = dir.path().join("taken");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();
        let mut store = TomlFileStore {
            path: target,
            entries: BTreeMap::new(),
            dirty: true,
        };

        let err = store.flush().unwrap_err();

        assert!(matches!(err, StoreError::Io(_)));
        assert!(store.is_dirty());
    }

    #[test]
    fn hand_edited_progress_is_tolerated() {
        let dir = TempDir::new().unwrap();
        fs::write(
            store_path(&dir),
            "[entries]\n\"quote_progress.vehicle_details\" = \"lots\"\n\"quote_progress.driver_details\" = \"100\"\n",
        )
        .unwrap();

        let progress = ProgressModel::new(TomlFileStore::open(store_path(&dir)).unwrap());

        assert_eq!(progress.step_progress(Step::VehicleDetails), 0);
        assert_eq!(progress.overall_progress(), 25);
    }
}
