//! Command tree nodes and their builder.

use crate::argument::Argument;
use crate::parser::Matches;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Callback invoked with the parsed parameters of a matched command.
pub type Handler = Box<dyn Fn(&Matches) -> anyhow::Result<()> + Send + Sync>;

/// Errors that can occur while assembling a command tree.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("argument long name cannot be empty")]
    EmptyArgumentName,

    #[error("duplicate argument name: {0}")]
    DuplicateArgument(String),

    #[error("duplicate short option '{0}'")]
    DuplicateShort(char),

    #[error("invalid short option '{0}': must be an ASCII letter")]
    InvalidShortOption(char),

    #[error("duplicate subcommand name: {0}")]
    DuplicateCommand(String),

    #[error("'{0}' is reserved for the usage pseudo-command")]
    ReservedCommandName(String),
}

/// A node in the command tree.
///
/// Owns its subcommands and argument descriptors exclusively; the tree
/// is strictly hierarchical and dropped top-down.
pub struct Command {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) subcommands: BTreeMap<String, Command>,
    pub(crate) arguments: Vec<Argument>,
    pub(crate) handler: Option<Handler>,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("subcommands", &self.subcommands)
            .field("arguments", &self.arguments)
            .field("handler", &self.handler.as_ref().map(|_| ".."))
            .finish()
    }
}

impl Command {
    /// Start building a command with the given name.
    pub fn new(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder {
            command: Command {
                name: name.into(),
                description: None,
                subcommands: BTreeMap::new(),
                arguments: Vec::new(),
                handler: None,
            },
            error: None,
        }
    }

    /// The command name, unique among its siblings.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The help text shown in usage listings, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Look up a direct subcommand by name.
    pub fn subcommand(&self, name: &str) -> Option<&Command> {
        self.subcommands.get(name)
    }

    /// Direct subcommands, sorted by name.
    pub fn subcommands(&self) -> impl Iterator<Item = &Command> {
        self.subcommands.values()
    }

    /// Own argument descriptors, in declaration order.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn has_subcommands(&self) -> bool {
        !self.subcommands.is_empty()
    }

    pub(crate) fn required_argument_count(&self) -> usize {
        self.arguments.iter().filter(|a| a.required).count()
    }
}

/// Fluent builder for a [`Command`].
///
/// Every call first checks whether an earlier call already recorded a
/// failure; if so the call is a no-op returning the builder unchanged.
/// A whole chain can therefore be written without intermediate error
/// checks and inspected once at [`build`](Self::build), which surfaces
/// the first failure encountered anywhere in the chain.
pub struct CommandBuilder {
    command: Command,
    error: Option<BuildError>,
}

impl CommandBuilder {
    /// Set the help text shown in usage listings.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        if self.error.is_none() {
            self.command.description = Some(description.into());
        }
        self
    }

    /// Attach the callback invoked when this command is matched.
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Matches) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        if self.error.is_none() {
            self.command.handler = Some(Box::new(handler));
        }
        self
    }

    /// Register an argument (or a flag built with
    /// [`Flag::new`](crate::argument::Flag::new)). Long and short names
    /// must be unique within this command; the namespace is not shared
    /// with ancestors or descendants.
    pub fn argument(mut self, argument: Argument) -> Self {
        if self.error.is_some() {
            return self;
        }
        match self.check_argument(&argument) {
            Ok(()) => self.command.arguments.push(argument),
            Err(err) => self.error = Some(err),
        }
        self
    }

    fn check_argument(&self, argument: &Argument) -> Result<(), BuildError> {
        if argument.long.is_empty() {
            return Err(BuildError::EmptyArgumentName);
        }
        if self.command.arguments.iter().any(|a| a.long == argument.long) {
            return Err(BuildError::DuplicateArgument(argument.long.clone()));
        }
        if let Some(short) = argument.short {
            if !short.is_ascii_alphabetic() {
                return Err(BuildError::InvalidShortOption(short));
            }
            if self.command.arguments.iter().any(|a| a.short == Some(short)) {
                return Err(BuildError::DuplicateShort(short));
            }
        }
        Ok(())
    }

    /// Register a subcommand built by a nested chain.
    ///
    /// A failure recorded inside the nested chain propagates here, so a
    /// single `build()` at the root reports the first failure anywhere
    /// in the declaration.
    pub fn subcommand(mut self, child: CommandBuilder) -> Self {
        if self.error.is_some() {
            return self;
        }
        let child = match child.build() {
            Ok(child) => child,
            Err(err) => {
                self.error = Some(err);
                return self;
            }
        };
        if child.name == "help" {
            self.error = Some(BuildError::ReservedCommandName(child.name));
            return self;
        }
        if self.command.subcommands.contains_key(&child.name) {
            self.error = Some(BuildError::DuplicateCommand(child.name));
            return self;
        }
        self.command.subcommands.insert(child.name.clone(), child);
        self
    }

    /// Finish the chain, surfacing the first recorded failure if any.
    pub fn build(self) -> Result<Command, BuildError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.command),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::Flag;
    use crate::value::ValueKind;

    #[test]
    fn test_build_minimal_command() {
        let command = Command::new("greet").build().unwrap();
        assert_eq!(command.name(), "greet");
        assert!(command.description().is_none());
        assert!(!command.has_subcommands());
        assert!(command.arguments().is_empty());
    }

    #[test]
    fn test_build_full_tree() {
        let command = Command::new("math")
            .description("Integer arithmetic")
            .subcommand(
                Command::new("add")
                    .description("Add two numbers")
                    .argument(Argument::new("lhs", ValueKind::Integer).required(true))
                    .argument(Argument::new("rhs", ValueKind::Integer).required(true))
                    .argument(Flag::new("verbose").short('v')),
            )
            .subcommand(Command::new("neg"))
            .build()
            .unwrap();

        assert!(command.has_subcommands());
        let add = command.subcommand("add").unwrap();
        assert_eq!(add.arguments().len(), 3);
        assert_eq!(add.required_argument_count(), 2);
        assert!(command.subcommand("neg").is_some());
        assert!(command.subcommand("sub").is_none());
    }

    #[test]
    fn test_error_on_empty_argument_name() {
        let result = Command::new("test")
            .argument(Argument::new("", ValueKind::String))
            .build();
        assert!(matches!(result, Err(BuildError::EmptyArgumentName)));
    }

    #[test]
    fn test_error_on_duplicate_argument_name() {
        let result = Command::new("test")
            .argument(Argument::new("dup", ValueKind::String))
            .argument(Argument::new("dup", ValueKind::Integer))
            .build();
        assert!(matches!(result, Err(BuildError::DuplicateArgument(name)) if name == "dup"));
    }

    #[test]
    fn test_error_on_duplicate_short_option() {
        let result = Command::new("test")
            .argument(Argument::new("alpha", ValueKind::String).short('a'))
            .argument(Argument::new("all", ValueKind::String).short('a'))
            .build();
        assert!(matches!(result, Err(BuildError::DuplicateShort('a'))));
    }

    #[test]
    fn test_error_on_invalid_short_option() {
        let result = Command::new("test")
            .argument(Argument::new("one", ValueKind::String).short('1'))
            .build();
        assert!(matches!(result, Err(BuildError::InvalidShortOption('1'))));
    }

    #[test]
    fn test_error_on_duplicate_subcommand_name() {
        let result = Command::new("test")
            .subcommand(Command::new("init"))
            .subcommand(Command::new("init"))
            .build();
        assert!(matches!(result, Err(BuildError::DuplicateCommand(name)) if name == "init"));
    }

    #[test]
    fn test_error_on_reserved_help_subcommand() {
        let result = Command::new("test").subcommand(Command::new("help")).build();
        assert!(matches!(result, Err(BuildError::ReservedCommandName(name)) if name == "help"));
    }

    #[test]
    fn test_first_error_wins_and_chain_short_circuits() {
        let result = Command::new("test")
            .argument(Argument::new("dup", ValueKind::String))
            .argument(Argument::new("dup", ValueKind::String))
            .argument(Argument::new("", ValueKind::String))
            .subcommand(Command::new("help"))
            .build();
        // The duplicate is hit first; later violations are never recorded.
        assert!(matches!(result, Err(BuildError::DuplicateArgument(name)) if name == "dup"));
    }

    #[test]
    fn test_no_mutation_after_failure() {
        let result = Command::new("test")
            .argument(Argument::new("dup", ValueKind::String))
            .argument(Argument::new("dup", ValueKind::String))
            .description("set after the failure")
            .subcommand(Command::new("extra"))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_nested_builder_failure_propagates() {
        let result = Command::new("root")
            .subcommand(
                Command::new("child")
                    .argument(Argument::new("dup", ValueKind::String))
                    .argument(Argument::new("dup", ValueKind::String)),
            )
            .subcommand(Command::new("ok"))
            .build();
        assert!(matches!(result, Err(BuildError::DuplicateArgument(name)) if name == "dup"));
    }

    #[test]
    fn test_same_argument_names_allowed_across_commands() {
        // Argument namespaces are per-command.
        let command = Command::new("root")
            .subcommand(Command::new("a").argument(Argument::new("name", ValueKind::String)))
            .subcommand(Command::new("b").argument(Argument::new("name", ValueKind::String)))
            .argument(Argument::new("name", ValueKind::String))
            .build()
            .unwrap();
        assert_eq!(command.arguments().len(), 1);
    }

    #[test]
    fn test_subcommands_iterate_sorted_by_name() {
        let command = Command::new("root")
            .subcommand(Command::new("zeta"))
            .subcommand(Command::new("alpha"))
            .build()
            .unwrap();
        let names: Vec<&str> = command.subcommands().map(Command::name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
