//! Translation of command specs into `clap` schemas
//!
//! The table is validated up front; the `clap::Command` for a single command
//! is only built once that command has been selected.

use crate::{
    core::table::{CommandSpec, CommandTable},
    error::{DispatchError, Result},
};
use clap::{Arg, ArgAction, Command as ClapCommand};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Argument id holding positionals; cannot collide with a valid option name
pub(crate) const POSITIONALS_ID: &str = "[positionals]";

const HELP_ID: &str = "help";
const VERSION_ID: &str = "version";

/// Validate every command of a table
#[instrument(skip(table), fields(commands = table.len()))]
pub fn validate_table(table: &CommandTable) -> Result<()> {
    for (name, spec) in table.iter() {
        validate_command(name, spec)?;
    }
    debug!("Command table is valid");
    Ok(())
}

/// Check that every option of a command maps onto a distinct flag
pub fn validate_command(command: &str, spec: &CommandSpec) -> Result<()> {
    let mut letters: HashMap<char, &str> = HashMap::new();

    for (name, option) in &spec.options {
        validate_option_name(command, name)?;

        if !option.letter.is_ascii_alphanumeric() {
            return Err(DispatchError::invalid_option(
                name,
                command,
                format!("letter '{}' is not ASCII alphanumeric", option.letter),
            ));
        }

        if letters.insert(option.letter, name).is_some() {
            return Err(DispatchError::duplicate_letter(option.letter, command));
        }
    }

    Ok(())
}

fn validate_option_name(command: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DispatchError::invalid_option(name, command, "name is empty"));
    }

    if name.starts_with('-') {
        return Err(DispatchError::invalid_option(
            name,
            command,
            "name must not start with '-'",
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(DispatchError::invalid_option(
            name,
            command,
            "name may only contain ASCII letters, digits, '-' and '_'",
        ));
    }

    if name == HELP_ID {
        return Err(DispatchError::invalid_option(
            name,
            command,
            "name is reserved for --help",
        ));
    }

    Ok(())
}

/// Build the top-level schema used before a command has been selected
pub fn top_level_command(program: &str, version: &str, table: &CommandTable) -> ClapCommand {
    let mut cmd = ClapCommand::new(program.to_string())
        .version(version.to_string())
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .disable_help_subcommand(true)
        .arg(help_arg())
        .arg(
            Arg::new(VERSION_ID)
                .long(VERSION_ID)
                .action(ArgAction::Version)
                .help("Show version number"),
        )
        .override_usage(format!("{program} <command> [options]"))
        .after_help("Supply <command> for more help");

    for (name, spec) in table.iter() {
        cmd = cmd.subcommand(ClapCommand::new(name.to_string()).about(spec.short.clone()));
    }

    cmd
}

/// Build the schema of a selected command
///
/// The returned command parses the tokens following the command name.
pub fn command_schema(program: &str, name: &str, spec: &CommandSpec) -> ClapCommand {
    let mut cmd = ClapCommand::new(name.to_string())
        .bin_name(format!("{program} {name}"))
        .about(spec.short.clone())
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(help_arg())
        .override_usage(format!("{program} {name} {}", spec.usage));

    for (option_name, option) in &spec.options {
        let mut arg = Arg::new(option_name.clone())
            .short(option.letter)
            .long(option_name.clone())
            .help(option.describe.clone())
            .required(option.demand);

        arg = if option.is_flag() {
            arg.action(ArgAction::SetTrue)
                .overrides_with(option_name.clone())
        } else {
            arg.action(ArgAction::Append)
                .num_args(option.arity)
                .allow_negative_numbers(true)
                .value_name("VALUE")
        };

        cmd = cmd.arg(arg);
    }

    // bounds apply to the total count, checked after parsing
    cmd = cmd.arg(
        Arg::new(POSITIONALS_ID)
            .value_name("ARGS")
            .action(ArgAction::Append)
            .num_args(0..)
            .allow_negative_numbers(true),
    );

    if let Some(epilogue) = epilogue(program, name, spec) {
        cmd = cmd.after_help(epilogue);
    }

    cmd
}

/// Help text shown after the option list: examples, then the long description
fn epilogue(program: &str, name: &str, spec: &CommandSpec) -> Option<String> {
    let mut text = String::new();

    if !spec.examples.is_empty() {
        text.push_str("Examples:\n");
        for example in &spec.examples {
            text.push_str(&format!("  {program} {name} {example}\n"));
        }
    }

    if let Some(long) = &spec.long {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(long);
    }

    (!text.is_empty()).then(|| text.trim_end().to_string())
}

fn help_arg() -> Arg {
    Arg::new(HELP_ID)
        .long(HELP_ID)
        .action(ArgAction::Help)
        .help("Show help")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::table::OptionSpec;

    fn spec() -> CommandSpec {
        CommandSpec::new("Copy files", |_| async { Ok(()) })
    }

    #[test]
    fn test_duplicate_letter_is_rejected() {
        let spec = spec()
            .option("force", OptionSpec::flag('f'))
            .option("file", OptionSpec::value('f'));
        let err = validate_command("copy", &spec).unwrap_err();
        assert_eq!(err, DispatchError::duplicate_letter('f', "copy"));
    }

    #[test]
    fn test_same_letter_in_different_commands_is_allowed() {
        let table = CommandTable::new()
            .command("copy", spec().option("force", OptionSpec::flag('f')))
            .command("move", spec().option("file", OptionSpec::value('f')));
        assert!(validate_table(&table).is_ok());
    }

    #[test]
    fn test_invalid_option_names_are_rejected() {
        for name in ["", "-force", "two words", "help", "a=b"] {
            let spec = spec().option(name, OptionSpec::flag('f'));
            let err = validate_command("copy", &spec).unwrap_err();
            assert!(
                matches!(err, DispatchError::InvalidOption { .. }),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_non_alphanumeric_letter_is_rejected() {
        let spec = spec().option("force", OptionSpec::flag('-'));
        assert!(validate_command("copy", &spec).is_err());
    }

    #[test]
    fn test_letter_h_is_available() {
        let spec = spec().option("host", OptionSpec::value('h'));
        validate_command("copy", &spec).unwrap();
        let matches = command_schema("tool", "copy", &spec)
            .try_get_matches_from(["-h", "example.org"])
            .unwrap();
        let hosts: Vec<&String> = matches.get_many::<String>("host").unwrap().collect();
        assert_eq!(hosts, ["example.org"]);
    }

    #[test]
    fn test_command_help_lists_usage_examples_and_epilogue() {
        let spec = spec()
            .usage("[options] <src> <dst>")
            .example("-f a b")
            .long("Copies <src> to <dst>.")
            .option("force", OptionSpec::flag('f').describe("Overwrite existing files"));
        let help = command_schema("tool", "copy", &spec).render_help().to_string();
        assert!(help.contains("tool copy [options] <src> <dst>"));
        assert!(help.contains("-f, --force"));
        assert!(help.contains("Overwrite existing files"));
        assert!(help.contains("Examples:\n  tool copy -f a b"));
        assert!(help.contains("Copies <src> to <dst>."));
    }

    #[test]
    fn test_top_level_help_lists_commands() {
        let table = CommandTable::new().command("copy", spec());
        let help = top_level_command("tool", "1.2.3", &table)
            .render_help()
            .to_string();
        assert!(help.contains("tool <command> [options]"));
        assert!(help.contains("copy"));
        assert!(help.contains("Copy files"));
        assert!(help.contains("Supply <command> for more help"));
    }

    #[test]
    fn test_repeated_flag_is_accepted() {
        let spec = spec().option("force", OptionSpec::flag('f'));
        let matches = command_schema("tool", "copy", &spec)
            .try_get_matches_from(["x", "-f", "y", "-f", "--force"])
            .unwrap();
        assert!(matches.get_flag("force"));
    }

    #[test]
    fn test_negative_numbers_are_values() {
        let spec = spec().option("offset", OptionSpec::value('o'));
        let matches = command_schema("tool", "copy", &spec)
            .try_get_matches_from(["-5", "-o", "-2.5", "-1"])
            .unwrap();
        let offsets: Vec<&String> = matches.get_many::<String>("offset").unwrap().collect();
        assert_eq!(offsets, ["-2.5"]);
        let rest: Vec<&String> = matches.get_many::<String>(POSITIONALS_ID).unwrap().collect();
        assert_eq!(rest, ["-5", "-1"]);
    }

    #[test]
    fn test_arity_two_consumes_pairs() {
        let spec = spec().option("pair", OptionSpec::new('p', 2));
        let matches = command_schema("tool", "copy", &spec)
            .try_get_matches_from(["-p", "k1", "v1", "--pair", "k2", "v2", "rest"])
            .unwrap();
        let pairs: Vec<&String> = matches.get_many::<String>("pair").unwrap().collect();
        assert_eq!(pairs, ["k1", "v1", "k2", "v2"]);
        let rest: Vec<&String> = matches.get_many::<String>(POSITIONALS_ID).unwrap().collect();
        assert_eq!(rest, ["rest"]);
    }
}
