//! Binding resolved profile properties onto sessions.

use super::SessionManager;
use crate::profile::{ProfileRef, Property};
use crate::session::{Session, TabTitleContext};

/// Which properties get pushed into a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// Every bindable property, resolved through the parent chain
    Full,
    /// Only properties set on the profile itself
    ModifiedOnly,
}

impl ApplyMode {
    fn should_apply(self, profile: &ProfileRef, property: Property) -> bool {
        match self {
            ApplyMode::Full => true,
            ApplyMode::ModifiedOnly => profile.is_property_set(property),
        }
    }
}

impl SessionManager {
    /// Re-apply the profile under `key` to every live session bound to it.
    ///
    /// Returns the number of sessions updated.
    pub fn apply_profile(&self, key: &str, mode: ApplyMode) -> usize {
        let Some(profile) = self.profiles.get(key).cloned() else {
            return 0;
        };

        let mut applied = 0;
        for session in &self.sessions {
            let mut session = session.lock();
            if session.profile_key() == key {
                self.apply_profile_to_session(&mut session, &profile, mode);
                applied += 1;
            }
        }
        log::debug!("Applied profile {} to {} sessions", key, applied);
        applied
    }

    /// Push `profile`'s properties into `session`.
    ///
    /// The session is rebound to the key `profile` is registered under.
    /// Command and arguments always travel together.
    pub fn apply_profile_to_session(
        &self,
        session: &mut Session,
        profile: &ProfileRef,
        mode: ApplyMode,
    ) {
        match self.key_of(profile) {
            Some(key) => session.set_profile_key(key),
            None => log::debug!("Applying unregistered profile {:?}", profile.name()),
        }

        if mode.should_apply(profile, Property::Command)
            || mode.should_apply(profile, Property::Arguments)
        {
            session.set_program(profile.command());
            session.set_arguments(profile.arguments());
        }

        if mode.should_apply(profile, Property::Directory) {
            session.set_initial_working_directory(profile.default_working_directory());
        }

        if mode.should_apply(profile, Property::Icon) {
            session.set_icon_name(profile.icon());
        }

        if mode.should_apply(profile, Property::KeyBindings) {
            session.set_keymap(profile.key_bindings());
        }

        if mode.should_apply(profile, Property::LocalTabTitleFormat) {
            session.set_tab_title_format(TabTitleContext::Local, profile.local_tab_title_format());
        }

        if mode.should_apply(profile, Property::RemoteTabTitleFormat) {
            session.set_tab_title_format(
                TabTitleContext::Remote,
                profile.remote_tab_title_format(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::profile::{Profile, PropertyValue};
    use crate::state::MemoryStateStore;
    use std::sync::Arc;
    use tempfile::{TempDir, tempdir};

    fn manager_with_profile() -> (SessionManager, String, TempDir) {
        let temp = tempdir().unwrap();
        let mut manager = SessionManager::with_state(
            Config::in_dir(temp.path()),
            Box::new(MemoryStateStore::new()),
        );
        let fallback = manager.default_profile().unwrap();
        let profile = Profile::new(Some(&fallback));
        profile.set_property(Property::Name, "Dev");
        profile.set_property(Property::Icon, "dev-icon");
        profile.set_property(Property::Directory, "/work");
        let key = manager.add_profile(Arc::new(profile));
        (manager, key, temp)
    }

    #[test]
    fn test_full_apply_resolves_inherited_values() {
        let (mut manager, key, _temp) = manager_with_profile();
        let fallback = manager.default_profile().unwrap();

        let session = manager.create_session(&key).unwrap();
        let session = session.lock();

        assert_eq!(session.profile_key(), key);
        assert_eq!(session.program(), fallback.command());
        assert_eq!(session.arguments(), fallback.arguments().as_slice());
        assert_eq!(session.icon_name(), "dev-icon");
        assert_eq!(session.initial_working_directory(), "/work");
    }

    #[test]
    fn test_modified_only_skips_inherited_values() {
        let (manager, key, _temp) = manager_with_profile();
        let profile = manager.profile(&key).unwrap();
        let mut session = Session::new();
        session.set_program("custom");
        session.set_keymap("vi");

        manager.apply_profile_to_session(&mut session, &profile, ApplyMode::ModifiedOnly);

        assert_eq!(session.program(), "custom");
        assert_eq!(session.keymap(), "vi");
        assert_eq!(session.icon_name(), "dev-icon");
        assert_eq!(session.profile_key(), key);
    }

    #[test]
    fn test_arguments_alone_rebinds_command_too() {
        let (manager, key, _temp) = manager_with_profile();
        let profile = manager.profile(&key).unwrap();
        profile.set_property(Property::Arguments, PropertyValue::from(vec!["-l".to_string()]));
        let mut session = Session::new();
        session.set_program("custom");

        manager.apply_profile_to_session(&mut session, &profile, ApplyMode::ModifiedOnly);

        assert_eq!(session.program(), manager.default_profile().unwrap().command());
        assert_eq!(session.arguments(), ["-l".to_string()]);
    }

    #[test]
    fn test_apply_profile_reaches_only_bound_sessions() {
        let (mut manager, key, _temp) = manager_with_profile();
        let bound = manager.create_session(&key).unwrap();
        let other = manager.create_session("").unwrap();

        manager.profile(&key).unwrap().set_property(Property::Icon, "new-icon");
        let applied = manager.apply_profile(&key, ApplyMode::ModifiedOnly);

        assert_eq!(applied, 1);
        assert_eq!(bound.lock().icon_name(), "new-icon");
        assert_eq!(other.lock().icon_name(), "");
    }

    #[test]
    fn test_empty_key_session_is_bound_to_default_key() {
        let (mut manager, _key, _temp) = manager_with_profile();
        let session = manager.create_session("").unwrap();
        assert_eq!(session.lock().profile_key(), manager.default_profile_key());
    }
}
