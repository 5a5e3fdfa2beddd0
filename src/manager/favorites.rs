//! Favorite profiles.
//!
//! Favorites are tracked in memory by key but persisted by location, since
//! keys do not survive a restart. The persisted list is read lazily, once,
//! before the favorite set is first consulted or changed.

use std::collections::BTreeSet;

use super::{ProfileEvent, SessionManager};

impl SessionManager {
    /// Keys of all favorite profiles
    pub fn find_favorites(&mut self) -> BTreeSet<String> {
        self.ensure_favorites_loaded();
        self.favorites.clone()
    }

    pub fn is_favorite(&mut self, key: &str) -> bool {
        self.ensure_favorites_loaded();
        self.favorites.contains(key)
    }

    /// Mark or unmark `key` as favorite.
    ///
    /// Listeners are told and the list is persisted only when the state
    /// actually changes. Only registered keys can be marked.
    pub fn set_favorite(&mut self, key: &str, favorite: bool) {
        self.ensure_favorites_loaded();

        let changed = if favorite {
            if !self.profiles.contains_key(key) {
                log::warn!("Cannot mark unknown profile {:?} as favorite", key);
                return;
            }
            self.favorites.insert(key.to_string())
        } else {
            self.favorites.remove(key)
        };

        if !changed {
            return;
        }

        self.events.emit(ProfileEvent::FavoriteStatusChanged {
            key: key.to_string(),
            favorite,
        });
        self.save_favorites();
    }

    fn ensure_favorites_loaded(&mut self) {
        if !self.favorites_loaded {
            self.favorites_loaded = true;
            self.load_favorites();
        }
    }

    /// Restore favorites from the persisted location list.
    ///
    /// Locations already registered are matched first; the rest are loaded.
    /// Locations that fail to load are dropped.
    fn load_favorites(&mut self) {
        let Some(locations) = self.state.favorites() else {
            return;
        };

        let mut remaining: BTreeSet<String> = locations.into_iter().collect();

        let matched: Vec<(String, String)> = self
            .profiles
            .iter()
            .filter_map(|(key, profile)| {
                profile
                    .path()
                    .filter(|path| remaining.contains(path))
                    .map(|path| (key.clone(), path))
            })
            .collect();
        for (key, path) in matched {
            remaining.remove(&path);
            self.favorites.insert(key);
        }

        for path in remaining {
            match self.load_profile(&path) {
                Some(key) => {
                    self.favorites.insert(key);
                }
                None => log::debug!("Favorite profile {:?} could not be loaded", path),
            }
        }
        log::debug!("Loaded {} favorite profiles", self.favorites.len());
    }

    /// Persist the favorite set as a list of locations
    fn save_favorites(&mut self) {
        let mut locations = Vec::with_capacity(self.favorites.len());
        for key in &self.favorites {
            debug_assert!(
                self.profiles.contains_key(key),
                "favorite key {key:?} is not registered"
            );
            match self.profiles.get(key).and_then(|p| p.path()) {
                Some(path) => locations.push(path),
                None => log::warn!("Favorite profile {:?} has no location and is not saved", key),
            }
        }

        if let Err(e) = self.state.set_favorites(&locations) {
            log::warn!("Failed to save favorite profiles: {}", e);
        }
    }
}
