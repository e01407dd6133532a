//! JSON command-tree definitions.
//!
//! A command tree can be declared as JSON and lowered onto the builder
//! API. Definitions describe structure only; handlers are attached in
//! code through [`CommandBuilder`](crate::command::CommandBuilder).

use crate::argument::{Argument, Flag};
use crate::command::{BuildError, Command, CommandBuilder};
use crate::value::{Value, ValueKind};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading a JSON definition.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse JSON definition: {0}")]
    Json(#[from] serde_json::Error),

    #[error("default value for argument '{0}' does not match its declared type")]
    DefaultTypeMismatch(String),

    #[error("default value for argument '{0}' must be a scalar")]
    UnsupportedDefault(String),

    #[error("'default' cannot be combined with 'flag' on argument '{0}'")]
    DefaultOnFlag(String),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Definition of a single argument.
#[derive(Debug, Clone, Deserialize)]
pub struct ArgumentDef {
    /// Long option name, unique within its command.
    pub name: String,
    /// Value type accepted by the argument.
    #[serde(rename = "type", default)]
    pub kind: ValueKind,
    /// Short option character (e.g. 'v' for -v).
    pub short: Option<char>,
    /// Help text for this argument.
    pub description: Option<String>,
    /// Default value if not provided; must match the declared type.
    pub default: Option<serde_json::Value>,
    /// Whether this argument is required.
    #[serde(default)]
    pub required: bool,
    /// Shorthand for a boolean argument defaulting to false, toggled by
    /// presence alone.
    #[serde(default)]
    pub flag: bool,
}

/// Definition of a command and its subtree.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandDef {
    /// The command name.
    pub name: String,
    /// Help text for this command.
    pub description: Option<String>,
    /// Arguments accepted by this command.
    #[serde(default)]
    pub arguments: Vec<ArgumentDef>,
    /// Nested subcommand definitions.
    #[serde(default)]
    pub commands: Vec<CommandDef>,
}

impl CommandDef {
    /// Parse a JSON string into a definition.
    pub fn from_json(json: &str) -> Result<CommandDef, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Lower the definition into a built command tree.
    ///
    /// Builder violations (duplicate names, invalid short options)
    /// surface unchanged through [`ConfigError::Build`].
    pub fn into_command(self) -> Result<Command, ConfigError> {
        let builder = self.into_builder()?;
        Ok(builder.build()?)
    }

    fn into_builder(self) -> Result<CommandBuilder, ConfigError> {
        let mut builder = Command::new(self.name);
        if let Some(description) = self.description {
            builder = builder.description(description);
        }
        for def in self.arguments {
            builder = builder.argument(def.into_argument()?);
        }
        for def in self.commands {
            builder = builder.subcommand(def.into_builder()?);
        }
        Ok(builder)
    }
}

impl ArgumentDef {
    fn into_argument(self) -> Result<Argument, ConfigError> {
        if self.flag {
            if self.default.is_some() {
                return Err(ConfigError::DefaultOnFlag(self.name));
            }
            let mut argument = Flag::new(self.name);
            if let Some(short) = self.short {
                argument = argument.short(short);
            }
            if let Some(description) = self.description {
                argument = argument.description(description);
            }
            return Ok(argument);
        }

        let mut argument = Argument::new(self.name.clone(), self.kind);
        if let Some(short) = self.short {
            argument = argument.short(short);
        }
        if let Some(description) = self.description {
            argument = argument.description(description);
        }
        if let Some(default) = &self.default {
            let value = convert_default(&self.name, self.kind, default)?;
            argument = argument.default_value(value);
        }
        Ok(argument.required(self.required))
    }
}

/// Convert a JSON scalar default into a typed value of the declared
/// kind.
fn convert_default(
    name: &str,
    kind: ValueKind,
    default: &serde_json::Value,
) -> Result<Value, ConfigError> {
    if default.is_array() || default.is_object() {
        return Err(ConfigError::UnsupportedDefault(name.to_string()));
    }
    let converted = match kind {
        ValueKind::Integer => default.as_i64().map(Value::Integer),
        ValueKind::Float => default.as_f64().map(Value::Float),
        ValueKind::String => default.as_str().map(|s| Value::String(s.to_string())),
        ValueKind::Boolean => default.as_bool().map(Value::Boolean),
        ValueKind::Array | ValueKind::Object => None,
    };
    converted.ok_or_else(|| ConfigError::DefaultTypeMismatch(name.to_string()))
}
