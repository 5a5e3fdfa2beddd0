// Library exports for testing and potential library use
//
// Profiles and sessions are shared through `Arc`; interior state uses
// `parking_lot` locks (`RwLock` for profile properties, `Mutex` for
// sessions). The registry itself is single-owner and mutated through
// `&mut SessionManager`.

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod debug;
pub mod error;
pub mod manager;
pub mod profile;
pub mod session;
pub mod state;

pub use config::Config;
pub use error::{ConfigError, ProfileError};
pub use manager::{ApplyMode, EventBus, ProfileEvent, SessionManager};
pub use profile::{Profile, ProfileRef, Property, PropertyNames, PropertyValue};
pub use session::{Session, SessionId, SessionRef, TabTitleContext};
pub use state::{MemoryStateStore, StateStore, YamlStateStore};
