//! Profile model for terminal sessions
//!
//! A profile is a set of explicitly-set properties (command, icon, tab title
//! formats, ...) with an optional parent used for fallback lookup.
//! Profiles are read from and written to disk by format-specific readers
//! and writers:
//! - native `*.profile` files (YAML)
//! - legacy `*.desktop` session entries (read only)

pub mod document;
pub mod names;
pub mod property;
pub mod reader;
pub mod shell_command;
pub mod types;
pub mod writer;

pub use document::ProfileDocument;
pub use names::PropertyNames;
pub use property::{FontDescriptor, Property, PropertyValue, ValueKind};
pub use reader::{DesktopProfileReader, NativeProfileReader, ProfileFormat, ProfileReader};
pub use shell_command::ShellCommand;
pub use types::{FALLBACK_PROFILE_NAME, Profile, ProfileRef};
pub use writer::{NativeProfileWriter, ProfileWriter};
