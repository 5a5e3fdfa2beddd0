//! Shared integration test helpers for termprof.
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::TestContext;
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a
//! subset of helpers is used per file.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use termprof::config::Config;
use termprof::manager::SessionManager;
use termprof::state::{MemoryStateStore, StateStore, YamlStateStore};

/// A temporary profile directory plus a config pointing into it.
///
/// Keep the context alive for the whole test; dropping it removes the files.
pub struct TestContext {
    pub temp_dir: TempDir,
    pub config: Config,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = Config::in_dir(temp_dir.path());
        fs::create_dir_all(&config.profile_dirs[0]).expect("Failed to create profile dir");
        Self { temp_dir, config }
    }

    pub fn profile_dir(&self) -> PathBuf {
        self.config.profile_dirs[0].clone()
    }

    /// Write a native profile file and return its path
    pub fn write_profile(&self, file: &str, yaml: &str) -> PathBuf {
        let path = self.profile_dir().join(file);
        fs::write(&path, yaml).expect("Failed to write profile");
        path
    }

    /// Write a native profile with just a name
    pub fn write_named_profile(&self, file: &str, name: &str) -> PathBuf {
        self.write_profile(file, &format!("general:\n  name: {name}\n"))
    }

    /// A registry over in-memory state shared with `state`
    pub fn manager_with(&self, state: &MemoryStateStore) -> SessionManager {
        SessionManager::with_state(self.config.clone(), Box::new(state.clone()))
    }

    /// A registry over fresh in-memory state
    pub fn manager(&self) -> SessionManager {
        self.manager_with(&MemoryStateStore::new())
    }

    /// A registry persisting its state to the config's YAML state file
    pub fn yaml_manager(&self) -> SessionManager {
        SessionManager::new(self.config.clone())
    }

    pub fn state_file(&self) -> YamlStateStore {
        YamlStateStore::open(&self.config.state_file)
    }
}

/// In-memory state that already names a default profile file
pub fn state_with_default(file: &str) -> MemoryStateStore {
    let mut state = MemoryStateStore::new();
    state
        .set_default_profile(Some(file))
        .expect("Memory state never fails");
    state
}
