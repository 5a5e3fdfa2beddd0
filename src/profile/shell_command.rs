//! Splitting a full command line into program + arguments and back.

use crate::error::ProfileError;

/// A program with its argument list.
///
/// `arguments` follows argv conventions: the first entry is the program
/// itself, so a command line `"bash -l"` yields
/// `command = "bash"`, `arguments = ["bash", "-l"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub command: String,
    pub arguments: Vec<String>,
}

impl ShellCommand {
    /// Parse a full command line using shell-word quoting rules
    pub fn parse(full_command: &str) -> Result<Self, ProfileError> {
        let arguments =
            shell_words::split(full_command).map_err(|source| ProfileError::InvalidCommand {
                command: full_command.to_string(),
                source,
            })?;
        let command = arguments.first().cloned().unwrap_or_default();
        Ok(Self { command, arguments })
    }

    pub fn new(command: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            command: command.into(),
            arguments,
        }
    }

    /// Join back into one quoted command line.
    ///
    /// When the argument list does not start with the program, the program
    /// is prepended so the line stays runnable.
    pub fn full_command(&self) -> String {
        if self.arguments.first() == Some(&self.command) || self.command.is_empty() {
            shell_words::join(&self.arguments)
        } else {
            let mut parts = Vec::with_capacity(self.arguments.len() + 1);
            parts.push(self.command.as_str());
            parts.extend(self.arguments.iter().map(String::as_str));
            shell_words::join(parts)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let cmd = ShellCommand::parse("bash -l").unwrap();
        assert_eq!(cmd.command, "bash");
        assert_eq!(cmd.arguments, vec!["bash", "-l"]);
    }

    #[test]
    fn test_parse_quoted() {
        let cmd = ShellCommand::parse("ssh -t 'build host' \"tmux attach\"").unwrap();
        assert_eq!(cmd.command, "ssh");
        assert_eq!(cmd.arguments, vec!["ssh", "-t", "build host", "tmux attach"]);
    }

    #[test]
    fn test_parse_empty() {
        let cmd = ShellCommand::parse("   ").unwrap();
        assert_eq!(cmd.command, "");
        assert!(cmd.arguments.is_empty());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            ShellCommand::parse("echo 'oops"),
            Err(ProfileError::InvalidCommand { .. })
        ));
    }

    #[test]
    fn test_full_command_quotes_arguments() {
        let cmd = ShellCommand::new("ssh", vec!["ssh".into(), "my host".into()]);
        assert_eq!(cmd.full_command(), "ssh 'my host'");
    }

    #[test]
    fn test_full_command_prepends_missing_program() {
        let cmd = ShellCommand::new("zsh", vec!["-l".into()]);
        assert_eq!(cmd.full_command(), "zsh -l");
    }
}
