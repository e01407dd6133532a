//! Argument and flag descriptors.

use crate::value::{Value, ValueKind};

/// Describes one named parameter a command accepts.
///
/// Built through chained by-value setters, registered on a command, and
/// immutable afterwards.
#[derive(Debug, Clone)]
pub struct Argument {
    pub(crate) long: String,
    pub(crate) kind: ValueKind,
    pub(crate) short: Option<char>,
    pub(crate) description: Option<String>,
    pub(crate) default: Option<Value>,
    pub(crate) required: bool,
}

impl Argument {
    /// Create a descriptor with the given long name and value kind.
    pub fn new(long: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            long: long.into(),
            kind,
            short: None,
            description: None,
            default: None,
            required: false,
        }
    }

    /// Set a single-character short alias (e.g. 'n' for `-n`).
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Set the help text shown in usage listings.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the value used when the argument is absent from the input.
    ///
    /// A boolean argument with a default becomes a presence toggle: the
    /// bare option stores the negation of the default and never consumes
    /// a following token. Combining a default with
    /// [`required`](Self::required) is unsupported; the default always
    /// back-fills the slot, so the required check can never fire.
    ///
    /// # Panics
    ///
    /// Panics if the value's kind does not match the declared kind.
    pub fn default_value(mut self, value: Value) -> Self {
        assert_eq!(
            value.kind(),
            self.kind,
            "default value kind must match the declared argument kind"
        );
        self.default = Some(value);
        self
    }

    /// Mark the argument as mandatory.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// The long name, unique within the owning command.
    pub fn long(&self) -> &str {
        &self.long
    }

    /// The kind of value this argument accepts.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Whether a stripped option key refers to this argument.
    pub(crate) fn matches(&self, key: &str) -> bool {
        if self.long == key {
            return true;
        }
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.short == Some(c),
            _ => false,
        }
    }

    /// A boolean argument with a default is toggled by presence alone.
    pub(crate) fn is_toggle(&self) -> bool {
        self.kind == ValueKind::Boolean && self.default.is_some()
    }
}

/// Construction convenience for boolean presence flags.
pub struct Flag;

impl Flag {
    /// Create a boolean argument defaulting to false, toggled by
    /// presence. Not a distinct runtime entity: the result is a plain
    /// [`Argument`] and accepts the same chained setters.
    pub fn new(long: impl Into<String>) -> Argument {
        Argument::new(long, ValueKind::Boolean).default_value(Value::Boolean(false))
    }
}
