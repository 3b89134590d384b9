//! Incoming application command interactions.
//!
//! The platform delivers the selected subcommand group and subcommand as
//! nested options. [`InteractionPayload::resolve`] flattens that nesting into
//! the (command, group, subcommand, options) shape the dispatcher works with.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::OptionKind;

/// Application command interaction as delivered by the platform.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionPayload {
    /// Interaction ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Guild where the command was invoked (absent in DMs).
    #[serde(default)]
    pub guild_id: Option<String>,
    /// Channel where the command was invoked.
    #[serde(default)]
    pub channel_id: Option<String>,
    /// Invoking member (guild invocations).
    #[serde(default)]
    pub member: Option<InteractionMember>,
    /// Invoking user (DM invocations).
    #[serde(default)]
    pub user: Option<InteractionUser>,
    /// Command data.
    pub data: ApplicationCommandData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionMember {
    pub user: InteractionUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionUser {
    pub id: String,
}

/// The invoked command and its options.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationCommandData {
    /// Top-level command name.
    pub name: String,
    #[serde(default)]
    pub options: Vec<InteractionOption>,
}

/// One level of the option tree.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionOption {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: OptionKind,
    #[serde(default)]
    pub value: Option<OptionValue>,
    #[serde(default)]
    pub options: Vec<InteractionOption>,
}

/// Value of a leaf option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Boolean(bool),
    Integer(i64),
    String(String),
}

impl OptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Boolean(b) => write!(f, "{b}"),
            OptionValue::Integer(i) => write!(f, "{i}"),
            OptionValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::String(value)
    }
}

impl InteractionPayload {
    /// ID of the invoking user, whichever way the platform reported it.
    pub fn user_id(&self) -> Option<&str> {
        self.member
            .as_ref()
            .map(|m| m.user.id.as_str())
            .or_else(|| self.user.as_ref().map(|u| u.id.as_str()))
    }

    /// Flatten the nested group/subcommand selection.
    pub fn resolve(self) -> ResolvedInteraction {
        let mut resolved = ResolvedInteraction::new(self.data.name.clone());
        resolved.user_id = self.user_id().map(str::to_string);
        resolved.guild_id = self.guild_id;

        let mut level = self.data.options;

        if let Some(group) = take_nesting(&mut level, OptionKind::SubcommandGroup) {
            resolved.group = Some(group.name);
            level = group.options;
        }
        if let Some(sub) = take_nesting(&mut level, OptionKind::Subcommand) {
            resolved.subcommand = Some(sub.name);
            level = sub.options;
        }

        resolved.options = level
            .into_iter()
            .filter_map(|opt| opt.value.map(|value| (opt.name, value)))
            .collect();
        resolved
    }
}

fn take_nesting(level: &mut Vec<InteractionOption>, kind: OptionKind) -> Option<InteractionOption> {
    let index = level.iter().position(|opt| opt.kind == kind)?;
    Some(level.swap_remove(index))
}

/// An interaction reduced to what the dispatcher needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedInteraction {
    pub command: String,
    pub group: Option<String>,
    pub subcommand: Option<String>,
    pub options: HashMap<String, OptionValue>,
    pub user_id: Option<String>,
    pub guild_id: Option<String>,
}

impl ResolvedInteraction {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_subcommand(mut self, subcommand: impl Into<String>) -> Self {
        self.subcommand = Some(subcommand.into());
        self
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    /// Readable path such as `/integral combinations get`.
    pub fn path(&self) -> String {
        let mut path = format!("/{}", self.command);
        for part in [&self.group, &self.subcommand].into_iter().flatten() {
            path.push(' ');
            path.push_str(part);
        }
        path
    }
}
