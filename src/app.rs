//! Application root: program-name validation, dispatch, error routing.

use crate::command::Command;
use crate::console;
use crate::help::{generate_usage, generate_version};
use crate::parser::ParseError;
use tracing::debug;

/// Callback receiving a structural error and the rendered diagnostic
/// text; the error it returns becomes the result of [`App::run`].
pub type ErrorHandler = Box<dyn Fn(ParseError, &str) -> ParseError + Send + Sync>;

/// The root of an application: pairs the command tree with version
/// metadata and an error-handler callback.
pub struct App {
    root: Command,
    version: Option<String>,
    error_handler: ErrorHandler,
}

impl App {
    /// Wrap a built command tree. The root command's name is the
    /// program name validated by [`run`](Self::run).
    pub fn new(root: Command) -> Self {
        Self {
            root,
            version: None,
            error_handler: Box::new(default_error_handler),
        }
    }

    /// Set the application version reported by `--version`.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Replace the default error handler.
    ///
    /// The callback receives the structural error together with the
    /// fully rendered diagnostic text; whatever error it returns is
    /// what `run` reports. The default handler writes the diagnostic to
    /// stderr and returns the error unchanged.
    pub fn error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(ParseError, &str) -> ParseError + Send + Sync + 'static,
    {
        self.error_handler = Box::new(handler);
        self
    }

    /// The program name expected as the first token.
    pub fn name(&self) -> &str {
        self.root.name()
    }

    /// The root of the command tree.
    pub fn root(&self) -> &Command {
        &self.root
    }

    /// Match a raw argument vector, program name first, against the
    /// tree. Any failure, structural or from a handler, is routed
    /// through the error-handler callback together with the rendered
    /// diagnostic text.
    pub fn run(&self, args: &[String]) -> Result<(), ParseError> {
        let mut diagnostics = String::new();
        self.dispatch(args, &mut diagnostics)
            .map_err(|err| (self.error_handler)(err, &diagnostics))
    }

    fn dispatch(&self, args: &[String], diagnostics: &mut String) -> Result<(), ParseError> {
        if args.len() < 2 {
            diagnostics.push_str(&generate_usage(&self.root));
            return Err(ParseError::NotEnoughInput);
        }
        let program = &args[0];
        if !program.ends_with(self.root.name()) {
            return Err(ParseError::AppNameMismatch(program.clone()));
        }
        if args.len() == 2 && matches!(args[1].as_str(), "--version" | "-V") {
            console::print(&generate_version(self.root.name(), self.version.as_deref()));
            return Ok(());
        }
        debug!(program = %program, "dispatching argument vector");
        self.root.parse(&args[1..], diagnostics)
    }
}

/// Print the diagnostic to stderr and return the error unchanged.
fn default_error_handler(error: ParseError, diagnostics: &str) -> ParseError {
    if !diagnostics.is_empty() {
        console::eprint(diagnostics);
    }
    error
}
