//! Command-line interface for termprof.
//!
//! Each subcommand builds a [`SessionManager`] from the configuration,
//! loads every profile and then performs one registry operation.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

use crate::config::Config;
use crate::manager::SessionManager;
use crate::profile::{ProfileRef, Property, PropertyNames, PropertyValue};

/// termprof - Manage terminal profiles and their inheritance
#[derive(Parser)]
#[command(name = "termprof")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file to use instead of ~/.config/termprof/config.yaml
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set log level (overrides RUST_LOG)
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevelArg::Off => LevelFilter::Off,
            LogLevelArg::Error => LevelFilter::Error,
            LogLevelArg::Warn => LevelFilter::Warn,
            LogLevelArg::Info => LevelFilter::Info,
            LogLevelArg::Debug => LevelFilter::Debug,
            LogLevelArg::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List profiles, marking the default (*) and favorites (+)
    List {
        /// Include hidden profiles
        #[arg(short, long)]
        all: bool,
    },

    /// Show every property of a profile, marking locally set ones (=)
    Show {
        /// Profile key as printed by `list`
        key: String,
    },

    /// Change properties of a profile
    Set {
        key: String,

        /// Assignments such as `Icon=utilities-terminal`
        #[arg(value_name = "NAME=VALUE", required = true)]
        assignments: Vec<String>,
    },

    /// Make a profile the default
    Default { key: String },

    /// Mark a profile as favorite
    Favorite {
        key: String,

        /// Unmark instead
        #[arg(short, long)]
        remove: bool,
    },

    /// Delete a profile and its file
    Delete { key: String },

    /// List the recognised property names
    Names,
}

/// Load the configuration named on the command line, or the default one
fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Parse `NAME=VALUE` into a property update
pub fn parse_assignment(
    names: &PropertyNames,
    assignment: &str,
) -> Result<(Property, PropertyValue)> {
    let Some((name, value)) = assignment.split_once('=') else {
        bail!("Expected NAME=VALUE, got {:?}", assignment);
    };
    let Some(property) = names.lookup_by_name(name.trim()) else {
        bail!("Unknown property name {:?}", name.trim());
    };
    let value = PropertyValue::parse(property, value)
        .with_context(|| format!("Invalid value for {}: {:?}", property, value))?;
    Ok((property, value))
}

fn require_profile(manager: &SessionManager, key: &str) -> Result<ProfileRef> {
    manager
        .profile(key)
        .with_context(|| format!("No profile with key {:?} (see `termprof list --all`)", key))
}

/// Run the parsed command line
pub fn run(cli: Cli) -> Result<()> {
    if let Commands::Names = cli.command {
        for (name, property) in PropertyNames::global().all_names() {
            println!("{name:<24} {property}");
        }
        return Ok(());
    }

    let config = load_config(cli.config.as_ref())?;
    let mut manager = SessionManager::new(config);
    manager.load_all_profiles();

    match cli.command {
        Commands::List { all } => {
            let favorites = manager.find_favorites();
            for key in manager.available_profiles() {
                let Some(profile) = manager.profile(&key) else {
                    continue;
                };
                if profile.is_hidden() && !all {
                    continue;
                }
                let default = if key == manager.default_profile_key() { '*' } else { ' ' };
                let favorite = if favorites.contains(&key) { '+' } else { ' ' };
                println!("{default}{favorite} {:<20} {key}", profile.name());
            }
        }
        Commands::Show { key } => {
            let profile = require_profile(&manager, &key)?;
            for property in Property::variants() {
                if let Some(value) = profile.property(*property) {
                    let local = if profile.is_property_set(*property) { '=' } else { ' ' };
                    println!("{local} {:<24} {value}", property.canonical_name());
                }
            }
        }
        Commands::Set { key, assignments } => {
            require_profile(&manager, &key)?;
            let names = PropertyNames::global();
            let updates = assignments
                .iter()
                .map(|a| parse_assignment(names, a))
                .collect::<Result<Vec<_>>>()?;
            manager.change_profile(&key, updates);
        }
        Commands::Default { key } => {
            require_profile(&manager, &key)?;
            manager.set_default_profile(&key);
        }
        Commands::Favorite { key, remove } => {
            require_profile(&manager, &key)?;
            manager.set_favorite(&key, !remove);
        }
        Commands::Delete { key } => {
            require_profile(&manager, &key)?;
            manager.delete_profile(&key);
        }
        Commands::Names => {}
    }

    Ok(())
}
