//! Application command schema, serialized in the platform's bulk
//! registration format.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Maximum length of a command or option name.
pub const MAX_NAME_LENGTH: usize = 32;
/// Maximum length of a description.
pub const MAX_DESCRIPTION_LENGTH: usize = 100;
/// Maximum number of options (or choices) per level.
pub const MAX_OPTIONS: usize = 25;

/// Errors raised when a schema violates platform constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The name is empty.
    #[error("missing name")]
    MissingName,

    /// The description is empty.
    #[error("missing description for '{0}'")]
    MissingDescription(String),

    /// The name has invalid characters or length.
    #[error("invalid name '{0}': expected 1-32 lowercase letters, digits, '-' or '_'")]
    InvalidName(String),

    /// The description is too long.
    #[error("description of '{0}' exceeds 100 characters")]
    DescriptionTooLong(String),

    /// Too many options or choices at one level.
    #[error("'{0}' has more than 25 options or choices")]
    TooManyOptions(String),

    /// Two options at the same level share a name.
    #[error("duplicate option '{option}' in '{parent}'")]
    DuplicateOption { parent: String, option: String },

    /// A schema with nested subcommands was used where a leaf is required.
    #[error("'{0}' declares its own subcommands and cannot be nested")]
    NotALeaf(String),
}

/// Option type, serialized as the platform's integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OptionKind {
    Subcommand = 1,
    SubcommandGroup = 2,
    String = 3,
    Integer = 4,
    Boolean = 5,
}

impl OptionKind {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Subcommand),
            2 => Some(Self::SubcommandGroup),
            3 => Some(Self::String),
            4 => Some(Self::Integer),
            5 => Some(Self::Boolean),
            _ => None,
        }
    }

    /// Whether this kind introduces a nesting level.
    pub fn is_nesting(self) -> bool {
        matches!(self, Self::Subcommand | Self::SubcommandGroup)
    }
}

impl Serialize for OptionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for OptionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u8::deserialize(deserializer)?;
        Self::from_code(code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown option type {code}")))
    }
}

/// A fixed choice offered for a string option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionChoice {
    pub name: String,
    pub value: String,
}

impl OptionChoice {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// An option, subcommand, or subcommand group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOption {
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<OptionChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u16>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

impl CommandOption {
    fn with_kind(kind: OptionKind, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: description.into(),
            required: false,
            choices: Vec::new(),
            min_length: None,
            max_length: None,
            options: Vec::new(),
        }
    }

    /// A string input option.
    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_kind(OptionKind::String, name, description)
    }

    /// An empty subcommand group.
    pub fn subcommand_group(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_kind(OptionKind::SubcommandGroup, name, description)
    }

    /// Mark the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Restrict the option to fixed choices.
    pub fn with_choices(mut self, choices: impl IntoIterator<Item = OptionChoice>) -> Self {
        self.choices.extend(choices);
        self
    }

    pub fn min_length(mut self, len: u16) -> Self {
        self.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: u16) -> Self {
        self.max_length = Some(len);
        self
    }

    /// Attach a leaf command under this subcommand group.
    pub fn add_subcommand(&mut self, subcommand: CommandSchema) -> Result<(), SchemaError> {
        self.options.push(subcommand.into_subcommand()?);
        Ok(())
    }

    fn validate(&self) -> Result<(), SchemaError> {
        validate_header(&self.name, &self.description)?;
        if self.choices.len() > MAX_OPTIONS {
            return Err(SchemaError::TooManyOptions(self.name.clone()));
        }
        validate_options(&self.name, &self.options)
    }
}

/// A top-level command schema (or a leaf about to become a subcommand).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSchema {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

impl CommandSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    /// Add an input option.
    pub fn with_option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }

    /// Whether this schema has no nested subcommands.
    pub fn is_leaf(&self) -> bool {
        self.options.iter().all(|opt| !opt.kind.is_nesting())
    }

    /// Attach a leaf command as a subcommand.
    pub fn add_subcommand(&mut self, subcommand: CommandSchema) -> Result<(), SchemaError> {
        self.options.push(subcommand.into_subcommand()?);
        Ok(())
    }

    /// Attach a subcommand group built with [`CommandOption::subcommand_group`].
    pub fn add_subcommand_group(&mut self, group: CommandOption) {
        self.options.push(group);
    }

    /// Convert a leaf schema into a subcommand option.
    pub fn into_subcommand(self) -> Result<CommandOption, SchemaError> {
        if !self.is_leaf() {
            return Err(SchemaError::NotALeaf(self.name));
        }
        let mut option = CommandOption::with_kind(OptionKind::Subcommand, self.name, self.description);
        option.options = self.options;
        Ok(option)
    }

    /// Check the schema tree against platform constraints.
    pub fn validate(&self) -> Result<(), SchemaError> {
        validate_header(&self.name, &self.description)?;
        validate_options(&self.name, &self.options)
    }
}

fn validate_header(name: &str, description: &str) -> Result<(), SchemaError> {
    if name.is_empty() {
        return Err(SchemaError::MissingName);
    }
    let valid_name = name.chars().count() <= MAX_NAME_LENGTH
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !valid_name {
        return Err(SchemaError::InvalidName(name.to_string()));
    }
    if description.trim().is_empty() {
        return Err(SchemaError::MissingDescription(name.to_string()));
    }
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(SchemaError::DescriptionTooLong(name.to_string()));
    }
    Ok(())
}

fn validate_options(parent: &str, options: &[CommandOption]) -> Result<(), SchemaError> {
    if options.len() > MAX_OPTIONS {
        return Err(SchemaError::TooManyOptions(parent.to_string()));
    }
    let mut names = HashSet::new();
    for option in options {
        if !names.insert(option.name.as_str()) {
            return Err(SchemaError::DuplicateOption {
                parent: parent.to_string(),
                option: option.name.clone(),
            });
        }
        option.validate()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn leaf(name: &str) -> CommandSchema {
        CommandSchema::new(name, format!("Runs {name}"))
            .with_option(CommandOption::string("types", "Types to use").required())
    }

    #[test]
    fn test_serialize_group_tree() {
        let mut root = CommandSchema::new("integral", "Commands for integral");
        root.add_subcommand(leaf("calculate")).unwrap();
        let mut group = CommandOption::subcommand_group("combinations", "combinations group");
        group
            .add_subcommand(
                CommandSchema::new("get", "Gets").with_option(
                    CommandOption::string("target", "Target")
                        .required()
                        .with_choices([OptionChoice::new("ILE", "ILE")]),
                ),
            )
            .unwrap();
        root.add_subcommand_group(group);

        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "integral",
                "description": "Commands for integral",
                "options": [
                    {
                        "type": 1,
                        "name": "calculate",
                        "description": "Runs calculate",
                        "options": [
                            {"type": 3, "name": "types", "description": "Types to use", "required": true}
                        ]
                    },
                    {
                        "type": 2,
                        "name": "combinations",
                        "description": "combinations group",
                        "options": [
                            {
                                "type": 1,
                                "name": "get",
                                "description": "Gets",
                                "options": [
                                    {
                                        "type": 3,
                                        "name": "target",
                                        "description": "Target",
                                        "required": true,
                                        "choices": [{"name": "ILE", "value": "ILE"}]
                                    }
                                ]
                            }
                        ]
                    }
                ]
            })
        );
        root.validate().unwrap();
    }

    #[test]
    fn test_leaf_without_options_omits_field() {
        let json = serde_json::to_value(CommandSchema::new("help", "Help")).unwrap();
        assert_eq!(json, serde_json::json!({"name": "help", "description": "Help"}));
    }

    #[test]
    fn test_nested_schema_is_not_a_leaf() {
        let mut profiles = CommandSchema::new("profiles", "Profiles");
        profiles.add_subcommand(leaf("shs")).unwrap();
        assert!(!profiles.is_leaf());

        let mut group = CommandSchema::new("utility", "Commands for utility");
        assert_eq!(
            group.add_subcommand(profiles),
            Err(SchemaError::NotALeaf("profiles".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_bad_headers() {
        assert_eq!(
            CommandSchema::new("", "x").validate(),
            Err(SchemaError::MissingName)
        );
        assert_eq!(
            CommandSchema::new("Help", "x").validate(),
            Err(SchemaError::InvalidName("Help".to_string()))
        );
        assert_eq!(
            CommandSchema::new("help", "").validate(),
            Err(SchemaError::MissingDescription("help".to_string()))
        );
        assert_eq!(
            CommandSchema::new("help", "x".repeat(101)).validate(),
            Err(SchemaError::DescriptionTooLong("help".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_options() {
        let schema = CommandSchema::new("calc", "Calc")
            .with_option(CommandOption::string("types", "a"))
            .with_option(CommandOption::string("types", "b"));
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::DuplicateOption { .. })
        ));
    }

    #[test]
    fn test_option_kind_codes() {
        for code in 1..=5 {
            let kind = OptionKind::from_code(code).unwrap();
            assert_eq!(kind as u8, code);
        }
        assert!(OptionKind::from_code(9).is_none());
        let kind: OptionKind = serde_json::from_str("2").unwrap();
        assert_eq!(kind, OptionKind::SubcommandGroup);
    }
}
