//! Command implementations for the demo CLI

use crate::core::{CommandSpec, CommandTable, OptionSpec, Options};
use anyhow::Context;
use tracing::{debug, instrument};

/// Build the command table of the `subcmd` binary
pub fn command_table() -> CommandTable {
    CommandTable::new()
        .command(
            "greet",
            CommandSpec::new("Print a greeting", greet)
                .usage("-n <name> [-l]")
                .example("-n World")
                .example("-n World -l")
                .most(0)
                .option(
                    "name",
                    OptionSpec::value('n')
                        .once()
                        .demand()
                        .describe("Who to greet"),
                )
                .option("loud", OptionSpec::flag('l').describe("Shout the greeting")),
        )
        .command(
            "sum",
            CommandSpec::new("Add numbers", sum)
                .long("Prints the sum of all arguments. Fails on anything that is not a number.")
                .usage("<number>...")
                .example("1 2 3")
                .example("-1.5 4")
                .least(1),
        )
        .command(
            "inspect",
            CommandSpec::new("Print the parsed options as JSON", inspect)
                .usage("[options] [args...]")
                .example("-t a -t b -p key value -v rest")
                .option("tag", OptionSpec::value('t').describe("Add a tag; repeatable"))
                .option("pair", OptionSpec::new('p', 2).describe("Add a key and a value"))
                .option("verbose", OptionSpec::flag('v').describe("Verbose output")),
        )
}

#[instrument(skip(options))]
async fn greet(options: Options) -> anyhow::Result<()> {
    let name = options.value("name").context("missing --name")?;
    println!("{}", greeting(name, options.flag("loud")));
    Ok(())
}

#[instrument(skip(options))]
async fn sum(options: Options) -> anyhow::Result<()> {
    let total = add_numbers(options.positionals())?;
    println!("{total}");
    Ok(())
}

#[instrument(skip(options))]
async fn inspect(options: Options) -> anyhow::Result<()> {
    debug!("Inspecting {} positionals", options.positionals().len());
    let json = serde_json::to_string(&options).context("Failed to serialize options")?;
    println!("{json}");
    Ok(())
}

fn greeting(name: &str, loud: bool) -> String {
    let text = format!("Hello, {name}!");
    if loud { text.to_uppercase() } else { text }
}

fn add_numbers(values: &[String]) -> anyhow::Result<f64> {
    values.iter().try_fold(0.0, |total, value| {
        let number: f64 = value
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid number: {value}"))?;
        Ok(total + number)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::validate_table;

    #[test]
    fn test_command_table_is_valid() {
        let table = command_table();
        validate_table(&table).unwrap();
        let names: Vec<_> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["greet", "sum", "inspect"]);
    }

    #[test]
    fn test_greeting() {
        assert_eq!(greeting("World", false), "Hello, World!");
        assert_eq!(greeting("World", true), "HELLO, WORLD!");
    }

    #[test]
    fn test_add_numbers() {
        let values = vec!["1".to_string(), "2.5".to_string(), "-0.5".to_string()];
        assert_eq!(add_numbers(&values).unwrap(), 3.0);
    }

    #[test]
    fn test_add_numbers_rejects_text() {
        let values = vec!["1".to_string(), "two".to_string()];
        let err = add_numbers(&values).unwrap_err();
        assert_eq!(err.to_string(), "invalid number: two");
    }
}
