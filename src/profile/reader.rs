//! Profile readers.
//!
//! A reader discovers profile locations in its search directories and
//! populates a [`Profile`] from one location. Two formats are understood:
//!
//! - native `*.profile` files (YAML, see [`ProfileDocument`])
//! - legacy `*.desktop` entries (`[Desktop Entry]` key=value pairs)

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::document::ProfileDocument;
use super::property::{FontDescriptor, Property};
use super::shell_command::ShellCommand;
use super::types::Profile;
use crate::error::ProfileError;

/// Source of profiles in one on-disk format
pub trait ProfileReader {
    /// Every location in the search directories this reader understands.
    ///
    /// Order is stable for a given directory state.
    fn find_profiles(&self) -> Vec<PathBuf>;

    /// Populate `profile` from `path`, setting only the properties present there.
    fn read_profile(&self, path: &Path, profile: &Profile) -> Result<(), ProfileError>;
}

/// Profile file formats, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFormat {
    Native,
    Desktop,
}

impl ProfileFormat {
    pub const NATIVE_EXTENSION: &'static str = "profile";
    pub const DESKTOP_EXTENSION: &'static str = "desktop";

    /// `*.desktop` is the legacy format; everything else is read as native
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(Self::DESKTOP_EXTENSION) => ProfileFormat::Desktop,
            _ => ProfileFormat::Native,
        }
    }
}

/// List files with `extension` in each of `dirs`, sorted per directory
fn scan_dirs(dirs: &[PathBuf], extension: &str) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for dir in dirs {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("Skipping profile directory {:?}: {}", dir, e);
                continue;
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(extension))
            .collect();
        paths.sort();
        found.extend(paths);
    }
    found
}

fn read_file(path: &Path) -> Result<String, ProfileError> {
    std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reader for native `*.profile` files
#[derive(Debug, Clone, Default)]
pub struct NativeProfileReader {
    search_dirs: Vec<PathBuf>,
}

impl NativeProfileReader {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }
}

impl ProfileReader for NativeProfileReader {
    fn find_profiles(&self) -> Vec<PathBuf> {
        scan_dirs(&self.search_dirs, ProfileFormat::NATIVE_EXTENSION)
    }

    fn read_profile(&self, path: &Path, profile: &Profile) -> Result<(), ProfileError> {
        log::debug!("Native profile reader: {:?}", path);

        let contents = read_file(path)?;
        let document: ProfileDocument = if contents.trim().is_empty() {
            ProfileDocument::default()
        } else {
            serde_yaml_ng::from_str(&contents).map_err(|source| ProfileError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        };

        if document.general.name.is_none() {
            return Err(ProfileError::MissingName {
                path: path.to_path_buf(),
            });
        }

        document.apply_to(profile)
    }
}

/// Reader for legacy `*.desktop` session entries
#[derive(Debug, Clone, Default)]
pub struct DesktopProfileReader {
    search_dirs: Vec<PathBuf>,
}

impl DesktopProfileReader {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    /// Collect the unlocalized keys of the `[Desktop Entry]` group.
    ///
    /// Lines before the first group header are treated as part of it.
    fn parse_entries(contents: &str) -> HashMap<String, String> {
        let mut entries = HashMap::new();
        let mut in_entry_group = true;

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') && line.ends_with(']') {
                in_entry_group = line == "[Desktop Entry]";
                continue;
            }
            if !in_entry_group {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                // Localized variants such as `Name[de]` are ignored
                if key.contains('[') {
                    continue;
                }
                entries.insert(key.to_string(), value.trim().to_string());
            }
        }
        entries
    }
}

impl ProfileReader for DesktopProfileReader {
    fn find_profiles(&self) -> Vec<PathBuf> {
        scan_dirs(&self.search_dirs, ProfileFormat::DESKTOP_EXTENSION)
    }

    fn read_profile(&self, path: &Path, profile: &Profile) -> Result<(), ProfileError> {
        let contents = read_file(path)?;
        let entries = Self::parse_entries(&contents);

        if let Some(name) = entries.get("Name") {
            profile.set_property(Property::Name, name.as_str());
        }
        log::debug!("Reading desktop profile {:?} ({})", path, profile.name());

        if let Some(icon) = entries.get("Icon") {
            profile.set_property(Property::Icon, icon.as_str());
        }
        if let Some(exec) = entries.get("Exec") {
            let command = ShellCommand::parse(exec)?;
            profile.set_property(Property::Command, command.command);
            profile.set_property(Property::Arguments, command.arguments);
        }
        if let Some(schema) = entries.get("Schema") {
            profile.set_property(Property::ColorScheme, schema.replace(".schema", ""));
        }
        if let Some(font) = entries.get("defaultfont") {
            profile.set_property(Property::Font, FontDescriptor::parse(font));
        }
        if let Some(keytab) = entries.get("KeyTab") {
            profile.set_property(Property::KeyBindings, keytab.as_str());
        }
        if let Some(term) = entries.get("Term") {
            profile.set_property(Property::Environment, vec![format!("TERM={term}")]);
        }
        if let Some(cwd) = entries.get("Cwd") {
            profile.set_property(Property::Directory, cwd.as_str());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ProfileFormat::from_path(Path::new("/a/b.desktop")),
            ProfileFormat::Desktop
        );
        assert_eq!(
            ProfileFormat::from_path(Path::new("/a/b.profile")),
            ProfileFormat::Native
        );
        assert_eq!(ProfileFormat::from_path(Path::new("/a/b")), ProfileFormat::Native);
    }

    #[test]
    fn test_find_profiles_filters_and_sorts() {
        let temp = tempdir().unwrap();
        for name in ["b.profile", "a.profile", "c.desktop", "notes.txt"] {
            std::fs::write(temp.path().join(name), "").unwrap();
        }
        let missing = temp.path().join("missing");

        let native = NativeProfileReader::new(vec![temp.path().to_path_buf(), missing.clone()]);
        assert_eq!(
            native.find_profiles(),
            vec![temp.path().join("a.profile"), temp.path().join("b.profile")]
        );

        let desktop = DesktopProfileReader::new(vec![missing, temp.path().to_path_buf()]);
        assert_eq!(desktop.find_profiles(), vec![temp.path().join("c.desktop")]);
    }

    #[test]
    fn test_native_read() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("work.profile");
        std::fs::write(
            &path,
            concat!(
                "general:\n",
                "  name: Work\n",
                "  command: \"ssh 'build box'\"\n",
                "  local_tab_title_format: '%n'\n",
                "appearance:\n",
                "  color_scheme: Solarized\n",
            ),
        )
        .unwrap();

        let profile = Profile::new(None);
        NativeProfileReader::default()
            .read_profile(&path, &profile)
            .unwrap();

        assert_eq!(profile.name(), "Work");
        assert_eq!(profile.command(), "ssh");
        assert_eq!(profile.arguments(), vec!["ssh", "build box"]);
        assert_eq!(profile.local_tab_title_format(), "%n");
        assert_eq!(profile.color_scheme(), "Solarized");
        assert!(!profile.is_property_set(Property::Icon));
    }

    #[test]
    fn test_native_read_requires_name() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nameless.profile");
        std::fs::write(&path, "general:\n  icon: x\n").unwrap();

        let result = NativeProfileReader::default().read_profile(&path, &Profile::new(None));
        assert!(matches!(result, Err(ProfileError::MissingName { .. })));
    }

    #[test]
    fn test_native_read_corrupt_and_missing() {
        let temp = tempdir().unwrap();
        let corrupt = temp.path().join("corrupt.profile");
        std::fs::write(&corrupt, "general: [[[").unwrap();

        let reader = NativeProfileReader::default();
        assert!(matches!(
            reader.read_profile(&corrupt, &Profile::new(None)),
            Err(ProfileError::Parse { .. })
        ));
        assert!(matches!(
            reader.read_profile(&temp.path().join("nope.profile"), &Profile::new(None)),
            Err(ProfileError::Io { .. })
        ));
    }

    #[test]
    fn test_desktop_read() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("mc.desktop");
        std::fs::write(
            &path,
            "# legacy session\n[Desktop Entry]\nName=Midnight Commander\nName[de]=Mitternacht\n\
             Icon=mc\nExec=mc -c\nSchema=Linux.schema\ndefaultfont=Fixed,10\nKeyTab=vt100\n\
             Term=xterm\nCwd=/tmp\n\n[Other]\nIcon=ignored\n",
        )
        .unwrap();

        let profile = Profile::new(None);
        DesktopProfileReader::default()
            .read_profile(&path, &profile)
            .unwrap();

        assert_eq!(profile.name(), "Midnight Commander");
        assert_eq!(profile.icon(), "mc");
        assert_eq!(profile.command(), "mc");
        assert_eq!(profile.arguments(), vec!["mc", "-c"]);
        assert_eq!(profile.color_scheme(), "Linux");
        assert_eq!(
            profile.font(),
            Some(FontDescriptor::new("Fixed").point_size(10.0))
        );
        assert_eq!(profile.key_bindings(), "vt100");
        assert_eq!(profile.environment(), vec!["TERM=xterm"]);
        assert_eq!(profile.default_working_directory(), "/tmp");
    }

    #[test]
    fn test_desktop_read_missing_file_fails() {
        let result = DesktopProfileReader::default()
            .read_profile(Path::new("/definitely/not/here.desktop"), &Profile::new(None));
        assert!(result.is_err());
    }
}
