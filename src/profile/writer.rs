//! Profile writers.

use std::path::{Path, PathBuf};

use super::document::ProfileDocument;
use super::reader::ProfileFormat;
use super::types::Profile;
use crate::error::ProfileError;

/// Destination for profiles in one on-disk format
pub trait ProfileWriter {
    /// Location a profile should be written to.
    ///
    /// Uses the profile's own Path when set, otherwise derives one from its name.
    fn get_path(&self, profile: &Profile) -> PathBuf;

    /// Write the properties set locally on `profile` to `path`
    fn write_profile(&self, path: &Path, profile: &Profile) -> Result<(), ProfileError>;
}

/// Writer for native `*.profile` files
#[derive(Debug, Clone)]
pub struct NativeProfileWriter {
    save_dir: PathBuf,
}

impl NativeProfileWriter {
    /// `save_dir` receives profiles whose location is missing or relative
    pub fn new(save_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: save_dir.into(),
        }
    }

    /// Replace characters that cannot appear in a file name
    fn file_stem_for(name: &str) -> String {
        let stem: String = name
            .trim()
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
            .collect();
        if stem.is_empty() {
            "Unnamed".to_string()
        } else {
            stem
        }
    }
}

impl ProfileWriter for NativeProfileWriter {
    fn get_path(&self, profile: &Profile) -> PathBuf {
        let mut path = profile.path().map(PathBuf::from).unwrap_or_default();

        if path.as_os_str().is_empty() {
            path = PathBuf::from(format!(
                "{}.{}",
                Self::file_stem_for(&profile.name()),
                ProfileFormat::NATIVE_EXTENSION
            ));
        }

        if path.is_relative() {
            path = self.save_dir.join(path);
        }

        log::debug!("Saving profile under name: {:?}", path);
        path
    }

    fn write_profile(&self, path: &Path, profile: &Profile) -> Result<(), ProfileError> {
        let io_err = |source: std::io::Error| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let document = ProfileDocument::from_profile(profile);
        let yaml = serde_yaml_ng::to_string(&document).map_err(|source| ProfileError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;

        // Atomic save: write to temp file then rename
        let temp_path = path.with_extension("profile.tmp");
        std::fs::write(&temp_path, &yaml).map_err(io_err)?;
        std::fs::rename(&temp_path, path).map_err(io_err)?;

        log::info!("Saved profile {:?} to {:?}", profile.name(), path);
        Ok(())
    }
}
