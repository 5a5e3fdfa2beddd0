//! Running terminal sessions as seen by the profile registry.
//!
//! A [`Session`] carries the fields a profile is bound onto: program,
//! argument list, initial working directory, icon, key-binding map and the
//! two tab-title formats. Spawning and I/O live elsewhere; this type only
//! records what the session should run with and reports termination.

use std::sync::Arc;
use std::sync::mpsc::Sender;

use parking_lot::Mutex;
use uuid::Uuid;

/// Unique identifier for a session
pub type SessionId = Uuid;

/// Shared handle to a live session
pub type SessionRef = Arc<Mutex<Session>>;

/// Which tab title a format applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabTitleContext {
    /// The session runs a local program
    Local,
    /// The session is connected to a remote host
    Remote,
}

/// A terminal session bound to a profile
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    /// Key of the profile this session was created from
    profile_key: String,
    program: String,
    arguments: Vec<String>,
    initial_working_directory: String,
    icon_name: String,
    keymap: String,
    local_tab_title_format: String,
    remote_tab_title_format: String,
    /// Taken on first termination so the notification fires at most once
    done: Option<Sender<SessionId>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            profile_key: String::new(),
            program: String::new(),
            arguments: Vec::new(),
            initial_working_directory: String::new(),
            icon_name: String::new(),
            keymap: String::new(),
            local_tab_title_format: String::new(),
            remote_tab_title_format: String::new(),
            done: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Ask to be told (once) when this session terminates
    pub fn notify_on_termination(&mut self, done: Sender<SessionId>) {
        self.done = Some(done);
    }

    /// Report that the session has finished.
    ///
    /// Only the first call notifies; later calls are ignored.
    pub fn terminate(&mut self) {
        if let Some(done) = self.done.take() {
            log::debug!("Session {} terminated", self.id);
            if done.send(self.id).is_err() {
                log::debug!("Session {} outlived its registry", self.id);
            }
        }
    }

    pub fn profile_key(&self) -> &str {
        &self.profile_key
    }

    pub fn set_profile_key(&mut self, key: impl Into<String>) {
        self.profile_key = key.into();
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn set_program(&mut self, program: impl Into<String>) {
        self.program = program.into();
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn set_arguments(&mut self, arguments: Vec<String>) {
        self.arguments = arguments;
    }

    pub fn initial_working_directory(&self) -> &str {
        &self.initial_working_directory
    }

    pub fn set_initial_working_directory(&mut self, dir: impl Into<String>) {
        self.initial_working_directory = dir.into();
    }

    pub fn icon_name(&self) -> &str {
        &self.icon_name
    }

    pub fn set_icon_name(&mut self, icon: impl Into<String>) {
        self.icon_name = icon.into();
    }

    pub fn keymap(&self) -> &str {
        &self.keymap
    }

    pub fn set_keymap(&mut self, keymap: impl Into<String>) {
        self.keymap = keymap.into();
    }

    pub fn tab_title_format(&self, context: TabTitleContext) -> &str {
        match context {
            TabTitleContext::Local => &self.local_tab_title_format,
            TabTitleContext::Remote => &self.remote_tab_title_format,
        }
    }

    pub fn set_tab_title_format(&mut self, context: TabTitleContext, format: impl Into<String>) {
        match context {
            TabTitleContext::Local => self.local_tab_title_format = format.into(),
            TabTitleContext::Remote => self.remote_tab_title_format = format.into(),
        }
    }
}
