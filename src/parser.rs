//! Recursive parse and dispatch against a command tree.

use crate::command::Command;
use crate::console;
use crate::help::generate_usage;
use crate::value::{Value, ValueError};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Errors raised while matching an argument vector against the tree.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("program name does not match the application name: {0}")]
    AppNameMismatch(String),

    #[error("not enough input")]
    NotEnoughInput,

    #[error("unexpected command: {0}")]
    UnexpectedCommand(String),

    #[error("unknown argument: {0}")]
    UnknownArgument(String),

    #[error("expected a value for argument --{0}")]
    ExpectedArgumentValue(String),

    #[error("missing required argument: --{0}")]
    RequiredArgument(String),

    #[error("invalid value for argument --{name}")]
    InvalidValue {
        name: String,
        #[source]
        source: ValueError,
    },

    #[error("command handler failed")]
    Handler(#[source] anyhow::Error),
}

/// Parsed parameters of one command invocation, keyed by long name.
///
/// Owned by a single parse invocation, lent to the handler, and
/// discarded when the handler returns.
#[derive(Debug, Default)]
pub struct Matches {
    values: HashMap<String, Value>,
}

impl Matches {
    fn insert(&mut self, name: String, value: Value) {
        self.values.insert(name, value);
    }

    /// Look up the raw value captured for an argument.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Typed shortcut; `None` when absent or of another kind.
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(|v| v.as_integer())
    }

    /// Typed shortcut; `None` when absent or of another kind.
    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|v| v.as_float())
    }

    /// Typed shortcut; `None` when absent or of another kind.
    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.as_str())
    }

    /// Typed shortcut; `None` when absent or of another kind.
    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(|v| v.as_boolean())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Command {
    /// Match the remaining tokens against this command, descending into
    /// subcommands until a non-command token is reached, then parse the
    /// rest as options against this command's own arguments.
    ///
    /// The literal token `help` prints this command's usage text and
    /// succeeds without invoking any handler. Every failure renders the
    /// usage text into `diagnostics` before returning, so the caller
    /// always has a complete diagnostic alongside the error kind.
    pub fn parse(&self, args: &[String], diagnostics: &mut String) -> Result<(), ParseError> {
        if args.is_empty() && self.required_argument_count() > 0 {
            diagnostics.push_str(&generate_usage(self));
            return Err(ParseError::NotEnoughInput);
        }

        if let Some(first) = args.first() {
            if !first.starts_with('-') {
                if first == "help" {
                    console::print(&generate_usage(self));
                    return Ok(());
                }
                return match self.subcommand(first) {
                    Some(sub) => {
                        debug!(command = %self.name, subcommand = %first, "descending into subcommand");
                        sub.parse(&args[1..], diagnostics)
                    }
                    None => {
                        diagnostics.push_str(&generate_usage(self));
                        Err(ParseError::UnexpectedCommand(first.clone()))
                    }
                };
            }
        }

        let mut matches = Matches::default();
        let mut index = 0;
        while index < args.len() {
            let token = &args[index];
            let key = token
                .strip_prefix("--")
                .or_else(|| token.strip_prefix('-'))
                .unwrap_or(token);

            let argument = match self.arguments.iter().find(|a| a.matches(key)) {
                Some(argument) => argument,
                None => {
                    diagnostics.push_str(&generate_usage(self));
                    return Err(ParseError::UnknownArgument(token.clone()));
                }
            };

            if argument.is_toggle() {
                // Presence stores the negation of the default; no value
                // token is consumed.
                let default = argument.default.as_ref().and_then(|v| v.as_boolean());
                matches.insert(
                    argument.long.clone(),
                    Value::Boolean(!default.unwrap_or(false)),
                );
                debug!(argument = %argument.long, "toggled presence flag");
                index += 1;
                continue;
            }

            let Some(raw) = args.get(index + 1) else {
                diagnostics.push_str(&generate_usage(self));
                return Err(ParseError::ExpectedArgumentValue(argument.long.clone()));
            };
            match Value::parse(argument.kind, raw) {
                Ok(value) => {
                    debug!(argument = %argument.long, "captured value");
                    matches.insert(argument.long.clone(), value);
                    index += 2;
                }
                Err(source) => {
                    diagnostics.push_str(&generate_usage(self));
                    return Err(ParseError::InvalidValue {
                        name: argument.long.clone(),
                        source,
                    });
                }
            }
        }

        for argument in &self.arguments {
            if matches.contains(&argument.long) {
                continue;
            }
            if let Some(default) = &argument.default {
                debug!(argument = %argument.long, "filled default value");
                matches.insert(argument.long.clone(), default.clone());
            } else if argument.required {
                diagnostics.push_str(&generate_usage(self));
                return Err(ParseError::RequiredArgument(argument.long.clone()));
            }
        }

        if let Some(handler) = &self.handler {
            handler(&matches).map_err(ParseError::Handler)?;
        }
        Ok(())
    }
}
