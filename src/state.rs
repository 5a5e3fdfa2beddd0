//! Persisted registry state.
//!
//! Two slots survive between runs:
//! - the on-disk identity (file name) of the default profile
//! - the list of favorite profile locations
//!
//! [`YamlStateStore`] keeps them in `state.yaml`; [`MemoryStateStore`] keeps
//! them in memory and can be shared between registries in tests.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ConfigError;

/// Contents of the state file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateData {
    /// File name of the default profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,

    /// Locations of favorite profiles. `None` until first written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_profiles: Option<Vec<String>>,
}

/// Storage for the default-profile and favorites slots
pub trait StateStore {
    fn default_profile(&self) -> Option<String>;

    /// Record the default profile's identity; `None` clears the slot
    fn set_default_profile(&mut self, identity: Option<&str>) -> Result<(), ConfigError>;

    /// The favorites list, or `None` if it was never written
    fn favorites(&self) -> Option<Vec<String>>;

    /// Replace the favorites list
    fn set_favorites(&mut self, locations: &[String]) -> Result<(), ConfigError>;
}

/// State kept in a YAML file, rewritten on every change
#[derive(Debug)]
pub struct YamlStateStore {
    path: PathBuf,
    data: StateData,
}

impl YamlStateStore {
    /// Open the state file at `path`.
    ///
    /// A missing or empty file yields empty state. A corrupt file is logged
    /// and treated as empty; it is overwritten on the next change.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match Self::read(&path) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("Failed to read state file {:?}: {}", path, e);
                StateData::default()
            }
        };
        Self { path, data }
    }

    fn read(path: &Path) -> Result<StateData, ConfigError> {
        if !path.exists() {
            return Ok(StateData::default());
        }
        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(StateData::default());
        }
        Ok(serde_yaml_ng::from_str(&contents)?)
    }

    fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml_ng::to_string(&self.data)?;

        // Atomic save: write to temp file then rename
        let temp_path = self.path.with_extension("yaml.tmp");
        std::fs::write(&temp_path, &yaml)?;
        std::fs::rename(&temp_path, &self.path)?;

        log::debug!("Saved registry state to {:?}", self.path);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for YamlStateStore {
    fn default_profile(&self) -> Option<String> {
        self.data.default_profile.clone()
    }

    fn set_default_profile(&mut self, identity: Option<&str>) -> Result<(), ConfigError> {
        self.data.default_profile = identity.map(str::to_string);
        self.save()
    }

    fn favorites(&self) -> Option<Vec<String>> {
        self.data.favorite_profiles.clone()
    }

    fn set_favorites(&mut self, locations: &[String]) -> Result<(), ConfigError> {
        self.data.favorite_profiles = Some(locations.to_vec());
        self.save()
    }
}

/// In-memory state; clones share the same slots
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    data: Arc<Mutex<StateData>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current slots
    pub fn snapshot(&self) -> StateData {
        self.data.lock().clone()
    }
}

impl StateStore for MemoryStateStore {
    fn default_profile(&self) -> Option<String> {
        self.data.lock().default_profile.clone()
    }

    fn set_default_profile(&mut self, identity: Option<&str>) -> Result<(), ConfigError> {
        self.data.lock().default_profile = identity.map(str::to_string);
        Ok(())
    }

    fn favorites(&self) -> Option<Vec<String>> {
        self.data.lock().favorite_profiles.clone()
    }

    fn set_favorites(&mut self, locations: &[String]) -> Result<(), ConfigError> {
        self.data.lock().favorite_profiles = Some(locations.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty_state() {
        let temp = tempdir().unwrap();
        let store = YamlStateStore::open(temp.path().join("state.yaml"));
        assert_eq!(store.default_profile(), None);
        assert_eq!(store.favorites(), None);
    }

    #[test]
    fn test_yaml_store_persists_across_reopen() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("state.yaml");

        let mut store = YamlStateStore::open(&path);
        store.set_default_profile(Some("Work.profile")).unwrap();
        store
            .set_favorites(&["/p/a.profile".to_string(), "/p/b.profile".to_string()])
            .unwrap();

        let reopened = YamlStateStore::open(&path);
        assert_eq!(reopened.default_profile().as_deref(), Some("Work.profile"));
        assert_eq!(
            reopened.favorites(),
            Some(vec!["/p/a.profile".to_string(), "/p/b.profile".to_string()])
        );
    }

    #[test]
    fn test_corrupt_file_is_replaced_on_write() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("state.yaml");
        std::fs::write(&path, "favorite_profiles: [[[").unwrap();

        let mut store = YamlStateStore::open(&path);
        assert_eq!(store.favorites(), None);

        store.set_favorites(&[]).unwrap();
        assert_eq!(YamlStateStore::open(&path).favorites(), Some(Vec::new()));
    }

    #[test]
    fn test_memory_store_clones_share_state() {
        let mut store = MemoryStateStore::new();
        let observer = store.clone();

        store.set_default_profile(Some("a.profile")).unwrap();
        assert_eq!(observer.default_profile().as_deref(), Some("a.profile"));

        store.set_default_profile(None).unwrap();
        assert_eq!(observer.snapshot(), StateData::default());
    }
}
