//! Profile property identifiers and their dynamically-typed values.
//!
//! Every configurable attribute of a profile is named by a [`Property`].
//! Values are stored type-erased as a [`PropertyValue`], but each property
//! has a known expected shape reported by [`Property::kind`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one configurable profile attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Property {
    /// Display name of the profile
    Name,
    /// Source location the profile was read from / is written to
    Path,
    /// Program to run
    Command,
    /// Argument list passed to the program (argv, including argv\[0\])
    Arguments,
    /// Icon name shown next to the session
    Icon,
    /// Terminal font
    Font,
    /// Name of the color scheme
    ColorScheme,
    /// Name of the key-binding map
    KeyBindings,
    /// Extra environment entries in `NAME=value` form
    Environment,
    /// Initial working directory
    Directory,
    /// Tab title format used while the session runs locally
    LocalTabTitleFormat,
    /// Tab title format used while the session is connected to a remote host
    RemoteTabTitleFormat,
}

/// Expected shape of a property's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    TextList,
    Font,
}

impl Property {
    /// Returns all variants of `Property`
    pub fn variants() -> &'static [Property] {
        &[
            Property::Name,
            Property::Path,
            Property::Command,
            Property::Arguments,
            Property::Icon,
            Property::Font,
            Property::ColorScheme,
            Property::KeyBindings,
            Property::Environment,
            Property::Directory,
            Property::LocalTabTitleFormat,
            Property::RemoteTabTitleFormat,
        ]
    }

    /// Canonical human-readable name, registered with the name store at startup
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Property::Name => "Name",
            Property::Path => "Path",
            Property::Command => "Command",
            Property::Arguments => "Arguments",
            Property::Icon => "Icon",
            Property::Font => "Font",
            Property::ColorScheme => "ColorScheme",
            Property::KeyBindings => "KeyBindings",
            Property::Environment => "Environment",
            Property::Directory => "Directory",
            Property::LocalTabTitleFormat => "LocalTabTitleFormat",
            Property::RemoteTabTitleFormat => "RemoteTabTitleFormat",
        }
    }

    /// The value shape this property is expected to hold
    pub fn kind(&self) -> ValueKind {
        match self {
            Property::Arguments | Property::Environment => ValueKind::TextList,
            Property::Font => ValueKind::Font,
            _ => ValueKind::Text,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Font family plus optional point size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontDescriptor {
    pub family: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_size: Option<f32>,
}

impl FontDescriptor {
    /// Create a descriptor with no explicit size
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            point_size: None,
        }
    }

    /// Builder method to set the point size
    pub fn point_size(mut self, size: f32) -> Self {
        self.point_size = Some(size);
        self
    }

    /// Parse `"Family"` or `"Family,12"`.
    ///
    /// A trailing component that is not a number is kept as part of the family.
    pub fn parse(text: &str) -> Self {
        if let Some((family, size)) = text.rsplit_once(',')
            && let Ok(size) = size.trim().parse::<f32>()
        {
            return Self::new(family.trim()).point_size(size);
        }
        Self::new(text.trim())
    }
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.point_size {
            Some(size) => write!(f, "{},{}", self.family, size),
            None => f.write_str(&self.family),
        }
    }
}

/// A type-erased property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    TextList(Vec<String>),
    Font(FontDescriptor),
}

impl PropertyValue {
    /// Shape of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            PropertyValue::Text(_) => ValueKind::Text,
            PropertyValue::TextList(_) => ValueKind::TextList,
            PropertyValue::Font(_) => ValueKind::Font,
        }
    }

    /// Borrow the value as text, if it is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the value as a list, if it is a list
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            PropertyValue::TextList(list) => Some(list),
            _ => None,
        }
    }

    /// Borrow the value as a font, if it is a font
    pub fn as_font(&self) -> Option<&FontDescriptor> {
        match self {
            PropertyValue::Font(font) => Some(font),
            _ => None,
        }
    }

    /// Parse user-supplied text into the shape `property` expects.
    ///
    /// Lists are split with shell-word rules so quoted entries may contain spaces.
    pub fn parse(property: Property, text: &str) -> Result<Self, shell_words::ParseError> {
        Ok(match property.kind() {
            ValueKind::Text => PropertyValue::Text(text.to_string()),
            ValueKind::TextList => PropertyValue::TextList(shell_words::split(text)?),
            ValueKind::Font => PropertyValue::Font(FontDescriptor::parse(text)),
        })
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(s) => f.write_str(s),
            PropertyValue::TextList(list) => f.write_str(&shell_words::join(list)),
            PropertyValue::Font(font) => font.fmt(f),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        PropertyValue::TextList(value)
    }
}

impl From<FontDescriptor> for PropertyValue {
    fn from(value: FontDescriptor) -> Self {
        PropertyValue::Font(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_kinds() {
        assert_eq!(Property::Name.kind(), ValueKind::Text);
        assert_eq!(Property::Arguments.kind(), ValueKind::TextList);
        assert_eq!(Property::Environment.kind(), ValueKind::TextList);
        assert_eq!(Property::Font.kind(), ValueKind::Font);
    }

    #[test]
    fn test_variants_have_unique_names() {
        let mut names: Vec<_> = Property::variants()
            .iter()
            .map(|p| p.canonical_name())
            .collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Property::variants().len());
    }

    #[test]
    fn test_font_parse() {
        assert_eq!(
            FontDescriptor::parse("Hack,11.5"),
            FontDescriptor::new("Hack").point_size(11.5)
        );
        assert_eq!(FontDescriptor::parse("Monospace"), FontDescriptor::new("Monospace"));
        assert_eq!(
            FontDescriptor::parse("Noto Sans, Mono"),
            FontDescriptor::new("Noto Sans, Mono")
        );
    }

    #[test]
    fn test_parse_list_uses_shell_words() {
        let value = PropertyValue::parse(Property::Arguments, "ssh 'my host' -p 22").unwrap();
        assert_eq!(
            value.as_list().unwrap(),
            &["ssh".to_string(), "my host".to_string(), "-p".to_string(), "22".to_string()]
        );
        assert!(PropertyValue::parse(Property::Arguments, "unterminated 'quote").is_err());
    }

    #[test]
    fn test_accessors_reject_wrong_shape() {
        let text = PropertyValue::from("x");
        assert_eq!(text.as_text(), Some("x"));
        assert!(text.as_list().is_none());
        assert!(text.as_font().is_none());
    }
}
