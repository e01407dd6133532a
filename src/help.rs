//! Usage and version text generation.

use crate::argument::Argument;
use crate::command::Command;

/// Generate the usage text for a command.
///
/// Commands with subcommands list them; leaf commands list their own
/// arguments in declaration order. Both layouts carry the synthetic
/// `help` entry recognized at every tree level.
pub fn generate_usage(command: &Command) -> String {
    let mut out = String::new();

    if let Some(description) = &command.description {
        out.push_str(description);
        out.push_str("\n\n");
    }
    out.push_str("Usage: ");
    out.push_str(&command.name);
    out.push_str(" [SUBCOMMAND] [OPTIONS]\n\nCommands:\n");

    if command.has_subcommands() {
        for sub in command.subcommands() {
            match &sub.description {
                Some(description) => {
                    out.push_str(&format!("  {}: {}\n", sub.name, description));
                }
                None => out.push_str(&format!("  {}\n", sub.name)),
            }
        }
        out.push_str("  help: Print this help message\n");
    } else {
        out.push_str("  help: Print this help message\n");
        if !command.arguments.is_empty() {
            out.push_str("\nOptions:\n");
            for argument in &command.arguments {
                push_argument_line(&mut out, argument);
            }
        }
    }

    out
}

fn push_argument_line(out: &mut String, argument: &Argument) {
    out.push_str("  ");
    if let Some(short) = argument.short {
        out.push('-');
        out.push(short);
        out.push_str(", ");
    }
    out.push_str("--");
    out.push_str(&argument.long);
    if let Some(description) = &argument.description {
        out.push_str(": ");
        out.push_str(description);
    }
    out.push('\n');
}

/// Generate the version line for an application.
pub fn generate_version(name: &str, version: Option<&str>) -> String {
    let mut out = name.to_string();
    if let Some(version) = version {
        out.push(' ');
        out.push_str(version);
    }
    out.push('\n');
    out
}
