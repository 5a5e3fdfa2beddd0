//! On-disk shape of a native `*.profile` file.
//!
//! ```yaml
//! general:
//!   name: Work
//!   command: ssh -t build tmux
//!   icon: network-server
//! appearance:
//!   color_scheme: Solarized
//!   font: Hack,11
//! ```
//!
//! Only properties set locally on a profile are written; every field is
//! optional when reading. A profile that sets only its program or only its
//! arguments is written with `program:` or `arguments:` instead of `command:`,
//! so the inherited half stays inherited.

use serde::{Deserialize, Serialize};

use super::property::{FontDescriptor, Property};
use super::shell_command::ShellCommand;
use super::types::Profile;
use crate::error::ProfileError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Full command line, program first. Sets both program and arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Program alone, for profiles that inherit their arguments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,

    /// Argument list alone, for profiles that inherit their program
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_bindings: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_tab_title_format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_tab_title_format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppearanceSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<String>,

    /// `Family` or `Family,size`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

/// A native profile file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDocument {
    #[serde(default)]
    pub general: GeneralSection,

    #[serde(default)]
    pub appearance: AppearanceSection,
}

impl ProfileDocument {
    /// Capture the properties set locally on `profile`.
    ///
    /// Inherited values are never captured, so a child profile file only
    /// records its overrides.
    pub fn from_profile(profile: &Profile) -> Self {
        let local = |property: Property| -> Option<String> {
            if profile.is_property_set(property) {
                profile
                    .property(property)
                    .map(|value| value.to_string())
            } else {
                None
            }
        };

        let local_list = |property: Property| -> Option<Vec<String>> {
            if profile.is_property_set(property) {
                profile
                    .property(property)
                    .and_then(|value| value.as_list().map(<[String]>::to_vec))
            } else {
                None
            }
        };

        // Only a locally complete command is joined into one line
        let (command, program, arguments) =
            match (local(Property::Command), local_list(Property::Arguments)) {
                (Some(program), Some(arguments)) => (
                    Some(ShellCommand::new(program, arguments).full_command()),
                    None,
                    None,
                ),
                (program, arguments) => (None, program, arguments),
            };

        let environment = local_list(Property::Environment);

        Self {
            general: GeneralSection {
                name: local(Property::Name),
                command,
                program,
                arguments,
                icon: local(Property::Icon),
                directory: local(Property::Directory),
                environment,
                key_bindings: local(Property::KeyBindings),
                local_tab_title_format: local(Property::LocalTabTitleFormat),
                remote_tab_title_format: local(Property::RemoteTabTitleFormat),
            },
            appearance: AppearanceSection {
                color_scheme: local(Property::ColorScheme),
                font: local(Property::Font),
            },
        }
    }

    /// Set every property present in the document on `profile`, leaving the
    /// others untouched.
    pub fn apply_to(&self, profile: &Profile) -> Result<(), ProfileError> {
        let general = &self.general;

        if let Some(name) = &general.name {
            profile.set_property(Property::Name, name.as_str());
        }
        if let Some(command) = &general.command {
            let command = ShellCommand::parse(command)?;
            profile.set_property(Property::Command, command.command);
            profile.set_property(Property::Arguments, command.arguments);
        }
        if let Some(program) = &general.program {
            profile.set_property(Property::Command, program.as_str());
        }
        if let Some(arguments) = &general.arguments {
            profile.set_property(Property::Arguments, arguments.clone());
        }
        if let Some(icon) = &general.icon {
            profile.set_property(Property::Icon, icon.as_str());
        }
        if let Some(directory) = &general.directory {
            profile.set_property(Property::Directory, directory.as_str());
        }
        if let Some(environment) = &general.environment {
            profile.set_property(Property::Environment, environment.clone());
        }
        if let Some(key_bindings) = &general.key_bindings {
            profile.set_property(Property::KeyBindings, key_bindings.as_str());
        }
        if let Some(format) = &general.local_tab_title_format {
            profile.set_property(Property::LocalTabTitleFormat, format.as_str());
        }
        if let Some(format) = &general.remote_tab_title_format {
            profile.set_property(Property::RemoteTabTitleFormat, format.as_str());
        }

        if let Some(scheme) = &self.appearance.color_scheme {
            profile.set_property(Property::ColorScheme, scheme.as_str());
        }
        if let Some(font) = &self.appearance.font {
            profile.set_property(Property::Font, FontDescriptor::parse(font));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_from_profile_skips_inherited_values() {
        let parent = Arc::new(Profile::new(None));
        parent.set_property(Property::Icon, "terminal");
        parent.set_property(Property::ColorScheme, "Linux");

        let child = Profile::new(Some(&parent));
        child.set_property(Property::Name, "Child");
        child.set_property(Property::Font, FontDescriptor::new("Hack").point_size(11.0));

        let doc = ProfileDocument::from_profile(&child);
        assert_eq!(doc.general.name.as_deref(), Some("Child"));
        assert_eq!(doc.general.icon, None);
        assert_eq!(doc.general.command, None);
        assert_eq!(doc.appearance.color_scheme, None);
        assert_eq!(doc.appearance.font.as_deref(), Some("Hack,11"));
    }

    #[test]
    fn test_apply_to_only_sets_present_fields() {
        let profile = Profile::new(None);
        profile.set_property(Property::Icon, "keep-me");

        let doc: ProfileDocument =
            serde_yaml_ng::from_str("general:\n  name: Work\n  command: zsh -l\n").unwrap();
        doc.apply_to(&profile).unwrap();

        assert_eq!(profile.name(), "Work");
        assert_eq!(profile.command(), "zsh");
        assert_eq!(profile.arguments(), vec!["zsh", "-l"]);
        assert_eq!(profile.icon(), "keep-me");
        assert!(!profile.is_property_set(Property::ColorScheme));
    }

    #[test]
    fn test_program_alone_does_not_capture_inherited_arguments() {
        let parent = Arc::new(Profile::new(None));
        parent.set_property(Property::Command, "bash");
        parent.set_property(Property::Arguments, vec!["bash".to_string()]);

        let child = Profile::new(Some(&parent));
        child.set_property(Property::Command, "zsh");

        let doc = ProfileDocument::from_profile(&child);
        assert_eq!(doc.general.command, None);
        assert_eq!(doc.general.program.as_deref(), Some("zsh"));
        assert_eq!(doc.general.arguments, None);

        let reloaded = Profile::new(Some(&parent));
        doc.apply_to(&reloaded).unwrap();
        assert_eq!(reloaded.command(), "zsh");
        assert!(!reloaded.is_property_set(Property::Arguments));
        assert_eq!(reloaded.arguments(), vec!["bash"]);
    }

    #[test]
    fn test_arguments_alone_are_written_as_list() {
        let parent = Arc::new(Profile::new(None));
        parent.set_property(Property::Command, "bash");

        let child = Profile::new(Some(&parent));
        child.set_property(Property::Arguments, vec!["bash".to_string(), "-l".to_string()]);

        let doc = ProfileDocument::from_profile(&child);
        assert_eq!(doc.general.command, None);
        assert_eq!(doc.general.program, None);
        assert_eq!(
            doc.general.arguments,
            Some(vec!["bash".to_string(), "-l".to_string()])
        );
    }

    #[test]
    fn test_local_command_and_arguments_join_into_one_line() {
        let profile = Profile::new(None);
        profile.set_property(Property::Command, "ssh");
        profile.set_property(
            Property::Arguments,
            vec!["ssh".to_string(), "build host".to_string()],
        );

        let doc = ProfileDocument::from_profile(&profile);
        assert_eq!(doc.general.command.as_deref(), Some("ssh 'build host'"));
        assert_eq!(doc.general.program, None);
        assert_eq!(doc.general.arguments, None);
    }

    #[test]
    fn test_empty_document_is_valid_yaml() {
        let doc: ProfileDocument = serde_yaml_ng::from_str("{}").unwrap();
        assert_eq!(doc, ProfileDocument::default());
    }
}
