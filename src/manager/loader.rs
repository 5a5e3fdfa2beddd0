//! Loading profiles into the registry.
//!
//! The default profile is loaded eagerly when the registry is built; every
//! other profile is loaded on demand by [`SessionManager::load_all_profiles`]
//! or when a favorite refers to a location that is not registered yet.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::SessionManager;
use crate::profile::{
    DesktopProfileReader, NativeProfileReader, Profile, ProfileFormat, ProfileReader, Property,
};

impl SessionManager {
    /// Readers for every supported format, over the configured search dirs
    fn readers(&self) -> Vec<Box<dyn ProfileReader>> {
        let dirs = self.config.resolved_profile_dirs();
        vec![
            Box::new(DesktopProfileReader::new(dirs.clone())),
            Box::new(NativeProfileReader::new(dirs)),
        ]
    }

    fn reader_for(&self, path: &Path) -> Box<dyn ProfileReader> {
        let dirs = self.config.resolved_profile_dirs();
        match ProfileFormat::from_path(path) {
            ProfileFormat::Desktop => Box::new(DesktopProfileReader::new(dirs)),
            ProfileFormat::Native => Box::new(NativeProfileReader::new(dirs)),
        }
    }

    /// Load the profile stored at `path` and register it.
    ///
    /// Returns the new key, or `None` if a profile from `path` is already
    /// registered or the file could not be read. A new profile inherits from
    /// the current default profile.
    pub fn load_profile(&mut self, path: impl AsRef<Path>) -> Option<String> {
        let path = path.as_ref();
        let location = path.to_string_lossy().into_owned();

        if self
            .profiles
            .values()
            .any(|p| p.path().as_deref() == Some(location.as_str()))
        {
            log::debug!("Profile {:?} is already loaded", path);
            return None;
        }

        let reader = self.reader_for(path);
        let profile = Profile::new(self.default_profile().as_ref());
        profile.set_property(Property::Path, location);

        if let Err(e) = reader.read_profile(path, &profile) {
            log::warn!("Could not load profile from {:?}: {}", path, e);
            return None;
        }

        Some(self.add_profile(Arc::new(profile)))
    }

    /// Load every profile the readers can find. Only the first call does any work.
    pub fn load_all_profiles(&mut self) {
        if self.loaded_all_profiles {
            return;
        }

        let paths: Vec<PathBuf> = self
            .readers()
            .iter()
            .flat_map(|reader| reader.find_profiles())
            .collect();
        log::debug!("Found {} profile files", paths.len());

        let loaded = paths
            .iter()
            .filter(|path| self.load_profile(path).is_some())
            .count();
        log::info!("Loaded {} profiles", loaded);

        self.loaded_all_profiles = true;
    }

    /// Load the remembered default profile, if its file can be found.
    ///
    /// Uses the state's default slot, falling back to the configured default
    /// file name. When nothing loads, the current default is kept.
    pub(super) fn load_default_profile(&mut self) {
        let identity = self
            .state
            .default_profile()
            .unwrap_or_else(|| self.config.default_profile.clone());
        if identity.is_empty() {
            return;
        }

        let Some(path) = self.locate_profile(&identity) else {
            log::debug!("Default profile {:?} not found", identity);
            return;
        };

        if let Some(key) = self.load_profile(&path) {
            log::info!("Loaded default profile {:?}", path);
            self.default_key = key;
        }
    }

    /// Resolve a profile file name or path against the search directories
    fn locate_profile(&self, identity: &str) -> Option<PathBuf> {
        let candidate = Path::new(identity);
        if candidate.is_absolute() {
            return candidate.exists().then(|| candidate.to_path_buf());
        }
        self.config
            .resolved_profile_dirs()
            .into_iter()
            .map(|dir| dir.join(candidate))
            .find(|path| path.is_file())
    }
}
