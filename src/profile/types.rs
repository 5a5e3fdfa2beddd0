//! Core `Profile` type.
//!
//! A profile stores only the properties explicitly set on it. Lookups that
//! miss the local map continue into the parent profile. The parent link is
//! a non-owning [`Weak`] reference: a profile never keeps its parent alive,
//! and several children may share one parent.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use super::property::{FontDescriptor, Property, PropertyValue};

/// Shared handle to a registered profile
pub type ProfileRef = Arc<Profile>;

/// Upper bound on parent links followed during a lookup
const MAX_PARENT_DEPTH: usize = 8;

/// Name given to the built-in fallback profile
pub const FALLBACK_PROFILE_NAME: &str = "Shell";

/// Shell used by the fallback profile when `$SHELL` is not set
const FALLBACK_SHELL: &str = "/bin/sh";

/// A set of explicitly-set properties with an optional parent for fallback lookup
#[derive(Debug, Default)]
pub struct Profile {
    values: RwLock<HashMap<Property, PropertyValue>>,
    parent: RwLock<Option<Weak<Profile>>>,
    hidden: AtomicBool,
}

impl Profile {
    /// Create an empty profile that inherits from `parent`
    pub fn new(parent: Option<&ProfileRef>) -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            parent: RwLock::new(parent.map(Arc::downgrade)),
            hidden: AtomicBool::new(false),
        }
    }

    /// Build the built-in fallback profile.
    ///
    /// It has no parent, is hidden from listings and runs the user's login shell.
    pub fn fallback() -> Self {
        let shell = std::env::var("SHELL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_SHELL.to_string());

        let profile = Self::new(None);
        profile.set_property(Property::Name, FALLBACK_PROFILE_NAME);
        profile.set_property(Property::Command, shell.clone());
        profile.set_property(Property::Arguments, vec![shell]);
        profile.set_property(Property::Font, FontDescriptor::new("Monospace"));
        profile.set_hidden(true);
        profile
    }

    /// Resolve `property`, walking the parent chain on a local miss.
    ///
    /// Returns `None` when no profile in the chain sets it.
    pub fn property(&self, property: Property) -> Option<PropertyValue> {
        if let Some(value) = self.values.read().get(&property) {
            return Some(value.clone());
        }

        let mut next = self.parent();
        let mut depth = 0;
        while let Some(profile) = next {
            if let Some(value) = profile.values.read().get(&property) {
                return Some(value.clone());
            }
            depth += 1;
            if depth >= MAX_PARENT_DEPTH {
                log::warn!(
                    "Profile parent chain deeper than {} while resolving {}",
                    MAX_PARENT_DEPTH,
                    property
                );
                return None;
            }
            next = profile.parent();
        }
        None
    }

    /// Set `property` on this profile only. The parent is never touched.
    pub fn set_property(&self, property: Property, value: impl Into<PropertyValue>) {
        let value = value.into();
        if value.kind() != property.kind() {
            log::warn!(
                "Property {} expects {:?} but was given {:?}",
                property,
                property.kind(),
                value.kind()
            );
        }
        self.values.write().insert(property, value);
    }

    /// Whether `property` is set locally (the parent is not consulted)
    pub fn is_property_set(&self, property: Property) -> bool {
        self.values.read().contains_key(&property)
    }

    /// Snapshot of the locally set properties
    pub fn set_properties(&self) -> HashMap<Property, PropertyValue> {
        self.values.read().clone()
    }

    /// True if no property is set locally
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    /// The parent profile, if one was given and is still alive
    pub fn parent(&self) -> Option<ProfileRef> {
        self.parent.read().as_ref().and_then(Weak::upgrade)
    }

    pub fn set_parent(&self, parent: Option<&ProfileRef>) {
        *self.parent.write() = parent.map(Arc::downgrade);
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.load(Ordering::Relaxed)
    }

    pub fn set_hidden(&self, hidden: bool) {
        self.hidden.store(hidden, Ordering::Relaxed);
    }

    fn text(&self, property: Property) -> Option<String> {
        self.property(property)
            .and_then(|v| v.as_text().map(str::to_string))
    }

    fn list(&self, property: Property) -> Vec<String> {
        self.property(property)
            .and_then(|v| v.as_list().map(<[String]>::to_vec))
            .unwrap_or_default()
    }

    /// Display name (empty if unset)
    pub fn name(&self) -> String {
        self.text(Property::Name).unwrap_or_default()
    }

    /// Source location, if set on this profile.
    ///
    /// Unlike other accessors this never consults the parent: a location
    /// identifies exactly one profile.
    pub fn path(&self) -> Option<String> {
        self.values
            .read()
            .get(&Property::Path)
            .and_then(PropertyValue::as_text)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
    }

    pub fn command(&self) -> String {
        self.text(Property::Command).unwrap_or_default()
    }

    pub fn arguments(&self) -> Vec<String> {
        self.list(Property::Arguments)
    }

    pub fn icon(&self) -> String {
        self.text(Property::Icon).unwrap_or_default()
    }

    pub fn font(&self) -> Option<FontDescriptor> {
        self.property(Property::Font)
            .and_then(|v| v.as_font().cloned())
    }

    pub fn color_scheme(&self) -> String {
        self.text(Property::ColorScheme).unwrap_or_default()
    }

    pub fn key_bindings(&self) -> String {
        self.text(Property::KeyBindings).unwrap_or_default()
    }

    pub fn environment(&self) -> Vec<String> {
        self.list(Property::Environment)
    }

    /// Initial working directory (empty means "inherit from the launcher")
    pub fn default_working_directory(&self) -> String {
        self.text(Property::Directory).unwrap_or_default()
    }

    pub fn local_tab_title_format(&self) -> String {
        self.text(Property::LocalTabTitleFormat).unwrap_or_default()
    }

    pub fn remote_tab_title_format(&self) -> String {
        self.text(Property::RemoteTabTitleFormat)
            .unwrap_or_default()
    }
}
