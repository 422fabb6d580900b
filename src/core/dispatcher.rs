//! Command resolution and handler invocation
//!
//! The first token selects the command. Only that command's option schema is
//! built, and the remaining tokens are parsed against it. Help, version and
//! rejected input are written to the configured output sinks; nothing about
//! user input or handler failures is reported back to the caller.

use crate::{
    config::DispatchConfig,
    core::{
        options::{OptionValue, Options},
        schema::{self, POSITIONALS_ID},
        table::{CommandSpec, CommandTable},
    },
    error::{Result, UsageError},
    utils::output::OutputSink,
};
use clap::{ArgMatches, Command as ClapCommand, error::ErrorKind};
use tokio::{
    runtime::{Builder, Handle},
    task::JoinHandle,
};
use tracing::{debug, instrument};

/// Outcome of resolving an argument vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Run the handler of `command` with `options`
    Invoke { command: String, options: Options },
    /// Help or version was requested; print it to stdout
    Display(String),
    /// Input rejected; print help and the diagnostic to stderr
    Rejected(Rejection),
}

/// Help text and optional diagnostic for rejected input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub help: String,
    /// `None` when there was no input at all
    pub error: Option<UsageError>,
}

/// Dispatcher over a validated command table
#[derive(Debug)]
pub struct Dispatcher {
    config: DispatchConfig,
    table: CommandTable,
    stdout: OutputSink,
    stderr: OutputSink,
}

impl Dispatcher {
    /// Create a dispatcher, validating the configuration and every command
    pub fn new(config: DispatchConfig, table: CommandTable) -> Result<Self> {
        config.validate()?;
        schema::validate_table(&table)?;

        Ok(Self {
            config,
            table,
            stdout: OutputSink::stdout(),
            stderr: OutputSink::stderr(),
        })
    }

    /// Replace the standard output streams
    #[must_use]
    pub fn with_output(mut self, stdout: OutputSink, stderr: OutputSink) -> Self {
        self.stdout = stdout;
        self.stderr = stderr;
        self
    }

    pub const fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub const fn table(&self) -> &CommandTable {
        &self.table
    }

    /// Work out what an argument vector asks for, without side effects
    ///
    /// `argv` excludes the program name.
    pub fn resolve<I, T>(&self, argv: I) -> Resolution
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();

        let Some(first) = argv.first() else {
            debug!("No arguments given");
            return Resolution::Rejected(Rejection {
                help: render_help(&mut self.top_level()),
                error: None,
            });
        };

        if first.starts_with('-') {
            return self.resolve_top_level(&argv);
        }

        let Some(spec) = self.table.get(first) else {
            debug!("Unknown command {}", first);
            return Resolution::Rejected(Rejection {
                help: render_help(&mut self.top_level()),
                error: Some(UsageError::UnknownCommand(first.clone())),
            });
        };

        debug!("Selected command {}", first);
        let mut cmd = schema::command_schema(&self.config.program, first, spec);
        let matches = match cmd.try_get_matches_from_mut(&argv[1..]) {
            Ok(matches) => matches,
            Err(err) => return parse_failure(&err, &mut cmd),
        };

        match extract_options(spec, &matches) {
            Ok(options) => Resolution::Invoke {
                command: first.clone(),
                options,
            },
            Err(error) => Resolution::Rejected(Rejection {
                help: render_help(&mut cmd),
                error: Some(error),
            }),
        }
    }

    /// Resolve `argv` and start the selected handler
    ///
    /// Inside a Tokio runtime the handler is spawned and its task handle
    /// returned. The task resolves to `()` whether or not the handler failed;
    /// failures are written to stderr. Outside a runtime the handler is run to
    /// completion on a current-thread runtime and `None` is returned.
    #[instrument(skip(self, argv), fields(program = %self.config.program))]
    pub fn dispatch<I, T>(&self, argv: I) -> Option<JoinHandle<()>>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        match self.resolve(argv) {
            Resolution::Invoke { command, options } => {
                let spec = self.table.get(&command)?;
                debug!("Invoking handler of {}", command);
                let future = (spec.handler)(options);
                let stderr = self.stderr.clone();
                let task = async move {
                    if let Err(err) = future.await {
                        debug!("Handler of {} failed", command);
                        stderr.write_block(&format!("{err:?}"));
                    }
                };

                if let Ok(handle) = Handle::try_current() {
                    return Some(handle.spawn(task));
                }

                debug!("No Tokio runtime, running handler on a current-thread runtime");
                match Builder::new_current_thread().enable_all().build() {
                    Ok(runtime) => runtime.block_on(task),
                    Err(err) => self
                        .stderr
                        .write_block(&format!("Failed to create runtime: {err}")),
                }
                None
            }
            Resolution::Display(text) => {
                self.stdout.write_block(&text);
                None
            }
            Resolution::Rejected(rejection) => {
                self.stderr.write_block(&rejection.help);
                if let Some(error) = rejection.error {
                    self.stderr.write_block(&error.to_string());
                }
                None
            }
        }
    }

    /// Dispatch and wait for the handler to finish
    pub async fn run<I, T>(&self, argv: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        if let Some(handle) = self.dispatch(argv) {
            if let Err(err) = handle.await {
                self.stderr.write_block(&err.to_string());
            }
        }
    }

    fn top_level(&self) -> ClapCommand {
        schema::top_level_command(&self.config.program, &self.config.version, &self.table)
    }

    fn resolve_top_level(&self, argv: &[String]) -> Resolution {
        let mut cmd = self.top_level();
        match cmd.try_get_matches_from_mut(argv) {
            Err(err) => parse_failure(&err, &mut cmd),
            Ok(_) => Resolution::Rejected(Rejection {
                help: render_help(&mut cmd),
                error: None,
            }),
        }
    }
}

/// Dispatch once over the process arguments or an explicit argument vector
///
/// Only configuration errors are returned.
pub fn dispatch(
    config: DispatchConfig,
    table: CommandTable,
    argv: Option<Vec<String>>,
) -> Result<Option<JoinHandle<()>>> {
    let dispatcher = Dispatcher::new(config, table)?;
    let argv = argv.unwrap_or_else(process_args);
    Ok(dispatcher.dispatch(argv))
}

/// Process arguments without the program name
pub fn process_args() -> Vec<String> {
    std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

fn extract_options(spec: &CommandSpec, matches: &ArgMatches) -> std::result::Result<Options, UsageError> {
    let positionals: Vec<String> = matches
        .try_get_many::<String>(POSITIONALS_ID)
        .ok()
        .flatten()
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    check_positional_bounds(spec, &positionals)?;
    let mut options = Options::new(positionals);

    for (name, option) in &spec.options {
        if option.is_flag() {
            options.insert(name.clone(), OptionValue::Flag(matches.get_flag(name)));
            continue;
        }

        let Some(values) = matches.get_many::<String>(name) else {
            continue;
        };
        let mut values: Vec<String> = values.cloned().collect();

        if option.once && values.len() > option.arity {
            return Err(UsageError::TooManyOptions(name.clone()));
        }

        let value = if option.is_scalar() && values.len() == 1 {
            OptionValue::Single(values.remove(0))
        } else {
            OptionValue::Multiple(values)
        };
        options.insert(name.clone(), value);
    }

    Ok(options)
}

fn check_positional_bounds(
    spec: &CommandSpec,
    positionals: &[String],
) -> std::result::Result<(), UsageError> {
    let Some((least, most)) = spec.positional_bounds() else {
        return Ok(());
    };
    let given = positionals.len();

    if given < least {
        return Err(UsageError::NotEnoughArguments { given, least });
    }
    match most {
        Some(most) if given > most => Err(UsageError::TooManyArguments { given, most }),
        _ => Ok(()),
    }
}

fn parse_failure(err: &clap::Error, cmd: &mut ClapCommand) -> Resolution {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            Resolution::Display(err.render().to_string())
        }
        _ => Resolution::Rejected(Rejection {
            help: render_help(cmd),
            error: Some(UsageError::from_clap(err)),
        }),
    }
}

fn render_help(cmd: &mut ClapCommand) -> String {
    cmd.render_help().to_string()
}
