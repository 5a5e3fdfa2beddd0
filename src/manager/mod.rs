//! Profile registry and session tracking.
//!
//! [`SessionManager`] owns every loaded profile, keyed by a generated string,
//! and keeps three invariants while profiles come and go:
//!
//! - whenever any profile is registered, the default key names a live entry
//! - the favorite set only holds keys of registered profiles
//! - a session appears at most once in the live-session list
//!
//! Sessions are created here, bound to a profile (see [`binder`]) and
//! rebound whenever that profile is edited through [`SessionManager::change_profile`].
//!
//! ## Sub-modules
//!
//! - [`loader`]: loading profiles from readers, with deduplication by location
//! - [`binder`]: pushing resolved profile properties onto sessions
//! - [`favorites`]: the favorite set and its persistence by location
//! - [`events`]: change notifications for listeners

pub mod binder;
pub mod events;
pub mod favorites;
pub mod loader;

use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};

use crate::config::Config;
use crate::profile::{
    NativeProfileWriter, Profile, ProfileRef, ProfileWriter, Property, PropertyValue,
};
use crate::session::{Session, SessionId, SessionRef};
use crate::state::{StateStore, YamlStateStore};

pub use binder::ApplyMode;
pub use events::{EventBus, ProfileEvent};

/// Key prefix for profiles that have no source location
const UNSAVED_KEY_PREFIX: &str = "unsaved";

/// Registry of profiles and the sessions created from them
pub struct SessionManager {
    config: Config,
    /// All registered profiles by key
    profiles: BTreeMap<String, ProfileRef>,
    default_key: String,
    /// Key of the built-in fallback profile
    fallback_key: String,
    /// Counter appended to keys; never reused within one registry
    next_key: u64,
    favorites: BTreeSet<String>,
    favorites_loaded: bool,
    loaded_all_profiles: bool,
    /// Live sessions in creation order
    sessions: Vec<SessionRef>,
    terminated_tx: Sender<SessionId>,
    terminated_rx: Receiver<SessionId>,
    state: Box<dyn StateStore>,
    writer: Box<dyn ProfileWriter>,
    events: EventBus,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("profiles", &self.profiles.keys().collect::<Vec<_>>())
            .field("default_key", &self.default_key)
            .field("favorites", &self.favorites)
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Create a registry that keeps its state in the configured state file
    pub fn new(config: Config) -> Self {
        let state = YamlStateStore::open(config.resolved_state_file());
        Self::with_state(config, Box::new(state))
    }

    /// Create a registry over an explicit state store.
    ///
    /// Registers the hidden fallback profile, then tries to load the
    /// remembered default profile from the search directories.
    pub fn with_state(config: Config, state: Box<dyn StateStore>) -> Self {
        let writer = NativeProfileWriter::new(config.resolved_save_dir());
        let (terminated_tx, terminated_rx) = channel();

        let mut manager = Self {
            config,
            profiles: BTreeMap::new(),
            default_key: String::new(),
            fallback_key: String::new(),
            next_key: 0,
            favorites: BTreeSet::new(),
            favorites_loaded: false,
            loaded_all_profiles: false,
            sessions: Vec::new(),
            terminated_tx,
            terminated_rx,
            state,
            writer: Box::new(writer),
            events: EventBus::new(),
        };

        manager.fallback_key = manager.add_profile(Arc::new(Profile::fallback()));
        manager.load_default_profile();

        debug_assert!(!manager.profiles.is_empty());
        debug_assert!(manager.profiles.contains_key(&manager.default_key));
        manager
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Listen for profile added/removed/changed and favorite events
    pub fn subscribe(&mut self) -> Receiver<ProfileEvent> {
        self.events.subscribe()
    }

    /// Register `profile` under a newly generated key and return the key.
    ///
    /// The key combines the profile's location with a registry-wide counter
    /// that only grows, so a deleted profile's key is never handed out again.
    /// The first profile registered becomes the default.
    pub fn add_profile(&mut self, profile: ProfileRef) -> String {
        let key = self.generate_key(&profile);

        if self.default_key.is_empty() {
            self.default_key = key.clone();
        }

        log::debug!("Registered profile {:?} as {}", profile.name(), key);
        self.profiles.insert(key.clone(), profile);
        self.events.emit(ProfileEvent::Added(key.clone()));
        key
    }

    fn generate_key(&mut self, profile: &Profile) -> String {
        let identity = profile
            .path()
            .unwrap_or_else(|| UNSAVED_KEY_PREFIX.to_string());
        loop {
            let key = format!("{identity}#{}", self.next_key);
            self.next_key += 1;
            if !self.profiles.contains_key(&key) {
                return key;
            }
        }
    }

    /// Look up a profile. An empty key yields the default profile.
    pub fn profile(&self, key: &str) -> Option<ProfileRef> {
        if key.is_empty() {
            return self.default_profile();
        }
        self.profiles.get(key).cloned()
    }

    pub fn default_profile(&self) -> Option<ProfileRef> {
        self.profiles.get(&self.default_key).cloned()
    }

    pub fn default_profile_key(&self) -> &str {
        &self.default_key
    }

    /// Key of the built-in fallback profile
    pub fn fallback_profile_key(&self) -> &str {
        &self.fallback_key
    }

    /// All registered keys, sorted
    pub fn available_profiles(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    /// Key under which `profile` is registered (identity, not equality)
    pub fn key_of(&self, profile: &ProfileRef) -> Option<String> {
        self.profiles
            .iter()
            .find(|(_, p)| Arc::ptr_eq(p, profile))
            .map(|(key, _)| key.clone())
    }

    /// Remove a profile and, best-effort, its backing file.
    ///
    /// The key is unmarked as favorite first. If it was the default, the
    /// default moves to the first remaining visible profile (or the first
    /// remaining one). Profiles that inherited from it are re-parented to
    /// the fallback profile. The fallback profile itself cannot be deleted.
    pub fn delete_profile(&mut self, key: &str) {
        if key == self.fallback_key {
            log::warn!("The fallback profile cannot be deleted");
            return;
        }

        let profile = self.profiles.get(key).cloned();

        self.set_favorite(key, false);

        let was_default = profile.is_some() && key == self.default_key;

        if let Some(profile) = profile {
            if let Some(path) = profile.path() {
                let path = Path::new(&path);
                if path.exists()
                    && let Err(e) = std::fs::remove_file(path)
                {
                    log::warn!(
                        "Could not delete profile file {:?}: {}. \
                         The file is most likely in a read-only directory.",
                        path,
                        e
                    );
                }
            }

            self.profiles.remove(key);

            let fallback = self.profiles.get(&self.fallback_key).cloned();
            for other in self.profiles.values() {
                if other
                    .parent()
                    .is_some_and(|parent| Arc::ptr_eq(&parent, &profile))
                {
                    other.set_parent(fallback.as_ref());
                }
            }
            log::debug!("Deleted profile {:?} ({})", profile.name(), key);
        }

        if was_default {
            let replacement = self
                .profiles
                .iter()
                .find(|(_, p)| !p.is_hidden())
                .or_else(|| self.profiles.iter().next())
                .map(|(k, _)| k.clone());
            match replacement {
                Some(replacement) => self.set_default_profile(&replacement),
                None => self.default_key.clear(),
            }
        }

        self.events.emit(ProfileEvent::Removed(key.to_string()));
    }

    /// Make `key` the default profile and remember its file name.
    ///
    /// `key` must name a registered profile.
    pub fn set_default_profile(&mut self, key: &str) {
        debug_assert!(
            self.profiles.contains_key(key),
            "set_default_profile: unknown key {key:?}"
        );
        let Some(profile) = self.profiles.get(key).cloned() else {
            log::error!("Cannot make unknown profile {:?} the default", key);
            return;
        };

        self.default_key = key.to_string();

        let identity = profile.path().and_then(|path| {
            Path::new(&path)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        });
        log::debug!("Setting default profile to {:?}", identity);

        if let Err(e) = self.state.set_default_profile(identity.as_deref()) {
            log::warn!("Failed to save default profile: {}", e);
        }
    }

    /// Apply `updates` to the profile stored under `key`.
    ///
    /// Only the named properties change. Every live session bound to `key`
    /// then receives the properties set on the profile, listeners are told,
    /// and the profile is written back to its location (or a new one).
    pub fn change_profile(
        &mut self,
        key: &str,
        updates: impl IntoIterator<Item = (Property, PropertyValue)>,
    ) {
        let profile = if key.is_empty() {
            None
        } else {
            self.profiles.get(key).cloned()
        };
        let Some(profile) = profile else {
            log::warn!("Profile for key {:?} not found.", key);
            return;
        };

        log::debug!("Profile about to change: {}", profile.name());
        for (property, value) in updates {
            profile.set_property(property, value);
        }
        log::debug!("Profile changed: {}", profile.name());

        self.apply_profile(key, ApplyMode::ModifiedOnly);

        self.events.emit(ProfileEvent::Changed(key.to_string()));

        if key == self.fallback_key {
            log::debug!("Fallback profile changed in memory only");
            return;
        }

        match profile.path() {
            Some(path) => {
                log::debug!("Profile saved to existing path: {}", path);
                self.save_profile(Some(Path::new(&path)), &profile);
            }
            None => {
                log::debug!("Profile saved to new path.");
                self.save_profile(None, &profile);
            }
        }
    }

    /// Write `profile` to `path`, or to a location minted by the writer.
    ///
    /// A freshly minted location is recorded on the profile. Failures are
    /// logged and otherwise ignored.
    fn save_profile(&self, path: Option<&Path>, profile: &ProfileRef) {
        let target = match path {
            Some(path) => path.to_path_buf(),
            None => self.mint_location(profile),
        };

        match self.writer.write_profile(&target, profile) {
            Ok(()) => {
                if profile.path().is_none() {
                    profile.set_property(Property::Path, target.to_string_lossy().into_owned());
                }
            }
            Err(e) => log::warn!("Failed to save profile {:?}: {}", profile.name(), e),
        }
    }

    /// Pick a file for a profile that has none yet.
    ///
    /// Starts from the writer's suggestion and appends `-1`, `-2`, ... to the
    /// file stem while the candidate exists on disk or belongs to another
    /// registered profile.
    fn mint_location(&self, profile: &ProfileRef) -> PathBuf {
        let base = self.writer.get_path(profile);
        let claimed = |candidate: &Path| {
            candidate.exists()
                || self.profiles.values().any(|other| {
                    !Arc::ptr_eq(other, profile)
                        && other.path().is_some_and(|p| Path::new(&p) == candidate)
                })
        };

        if !claimed(&base) {
            return base;
        }

        let stem = base
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = base
            .extension()
            .map(|e| e.to_string_lossy().into_owned());
        let minted = (1u32..)
            .map(|n| match &extension {
                Some(ext) => base.with_file_name(format!("{stem}-{n}.{ext}")),
                None => base.with_file_name(format!("{stem}-{n}")),
            })
            .find(|candidate| !claimed(candidate));

        log::debug!("{:?} is taken, minted {:?}", base, minted);
        minted.unwrap_or(base)
    }

    /// Create a session from the profile stored under `key` (empty = default).
    ///
    /// Returns `None` if `key` names no profile.
    pub fn create_session(&mut self, key: &str) -> Option<SessionRef> {
        let Some(profile) = self.profile(key) else {
            log::warn!("Cannot create session: profile {:?} not found", key);
            return None;
        };

        let mut session = Session::new();
        session.set_profile_key(key);
        self.apply_profile_to_session(&mut session, &profile, ApplyMode::Full);
        session.notify_on_termination(self.terminated_tx.clone());

        log::info!(
            "Created session {} from profile {:?}",
            session.id(),
            session.profile_key()
        );

        let session = Arc::new(Mutex::new(session));
        self.sessions.push(Arc::clone(&session));
        Some(session)
    }

    /// Stop tracking the session with `id`.
    ///
    /// Returns `false` if it was not tracked (unknown or already removed).
    pub fn session_terminated(&mut self, id: SessionId) -> bool {
        let Some(index) = self.sessions.iter().position(|s| s.lock().id() == id) else {
            log::debug!("Session {} is not tracked", id);
            return false;
        };

        // Dropping our handle releases the registry's reference; the session
        // finishes its own teardown once its last holder lets go.
        let session = self.sessions.remove(index);
        drop(session);
        log::info!("Session {} removed", id);
        true
    }

    /// Handle every termination reported since the last call.
    ///
    /// Returns how many sessions were removed.
    pub fn process_terminations(&mut self) -> usize {
        let ids: Vec<SessionId> = self.terminated_rx.try_iter().collect();
        ids.into_iter()
            .filter(|id| self.session_terminated(*id))
            .count()
    }

    /// Live sessions in creation order
    pub fn sessions(&self) -> &[SessionRef] {
        &self.sessions
    }

    pub fn session(&self, id: SessionId) -> Option<SessionRef> {
        self.sessions.iter().find(|s| s.lock().id() == id).cloned()
    }
}
