//! Name ↔ property mapping.
//!
//! An append-only store mapping human-readable names (as they appear in
//! profile files and on the command line) to [`Property`] identifiers.
//! Several names may alias one property. Registering an existing name
//! overwrites its target; there is no removal.
//!
//! [`PropertyNames::global`] is the process-wide instance, seeded with the
//! canonical name of every property. Independent instances can be built
//! with [`PropertyNames::new`] or [`PropertyNames::with_defaults`].

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::OnceLock;

use super::property::Property;

/// Thread-safe name → property store
#[derive(Debug, Default)]
pub struct PropertyNames {
    names: RwLock<HashMap<String, Property>>,
}

static GLOBAL_NAMES: OnceLock<PropertyNames> = OnceLock::new();

impl PropertyNames {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the canonical name of every property
    pub fn with_defaults() -> Self {
        let names = Self::new();
        for property in Property::variants() {
            names.register_name(*property, property.canonical_name());
        }
        names
    }

    /// The process-wide store, created with defaults on first use
    pub fn global() -> &'static PropertyNames {
        GLOBAL_NAMES.get_or_init(Self::with_defaults)
    }

    /// Map `name` to `property`, replacing any previous mapping of `name`
    pub fn register_name(&self, property: Property, name: impl Into<String>) {
        let name = name.into();
        log::trace!("Registering property name {:?} -> {}", name, property);
        self.names.write().insert(name, property);
    }

    /// Look up the property registered under `name`
    pub fn lookup_by_name(&self, name: &str) -> Option<Property> {
        self.names.read().get(name).copied()
    }

    pub fn is_name_registered(&self, name: &str) -> bool {
        self.names.read().contains_key(name)
    }

    /// Every name currently mapped to `property`, sorted
    pub fn names_for_property(&self, property: Property) -> Vec<String> {
        let mut names: Vec<String> = self
            .names
            .read()
            .iter()
            .filter(|(_, p)| **p == property)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// All registered names, sorted
    pub fn all_names(&self) -> Vec<(String, Property)> {
        let mut names: Vec<(String, Property)> = self
            .names
            .read()
            .iter()
            .map(|(name, p)| (name.clone(), *p))
            .collect();
        names.sort_by(|a, b| a.0.cmp(&b.0));
        names
    }
}
