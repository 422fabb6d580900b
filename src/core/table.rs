//! Declarative command table
//!
//! A [`CommandTable`] maps command names to [`CommandSpec`]s. Each spec lists
//! its options by long name, together with their short letter and arity, and
//! owns the asynchronous handler run when the command is selected.

use crate::core::options::Options;
use futures::future::{BoxFuture, FutureExt};
use std::{fmt, future::Future, sync::Arc};

/// Future returned by a command handler
pub type HandlerFuture = BoxFuture<'static, anyhow::Result<()>>;

/// Shared command handler
pub type Handler = Arc<dyn Fn(Options) -> HandlerFuture + Send + Sync>;

/// Shape of one command-line option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    /// Short form, used as `-<letter>`
    pub letter: char,
    /// Values consumed per occurrence; 0 makes a boolean flag
    pub arity: usize,
    /// Option must be supplied
    pub demand: bool,
    /// Help text
    pub describe: String,
    /// At most `arity` values in total
    pub once: bool,
}

impl OptionSpec {
    /// Create an option consuming `arity` values per occurrence
    pub const fn new(letter: char, arity: usize) -> Self {
        Self {
            letter,
            arity,
            demand: false,
            describe: String::new(),
            once: false,
        }
    }

    /// Create a boolean flag
    pub const fn flag(letter: char) -> Self {
        Self::new(letter, 0)
    }

    /// Create an option taking a single value
    pub const fn value(letter: char) -> Self {
        Self::new(letter, 1)
    }

    /// Mark the option as required
    #[must_use]
    pub const fn demand(mut self) -> Self {
        self.demand = true;
        self
    }

    /// Restrict the option to at most `arity` values
    #[must_use]
    pub const fn once(mut self) -> Self {
        self.once = true;
        self
    }

    #[must_use]
    pub fn describe(mut self, describe: impl Into<String>) -> Self {
        self.describe = describe.into();
        self
    }

    /// Check if the option is a boolean flag
    pub const fn is_flag(&self) -> bool {
        self.arity == 0
    }

    /// Check if the option is stored as a single string
    pub const fn is_scalar(&self) -> bool {
        self.once && self.arity == 1
    }
}

/// Declaration of one command
#[derive(Clone)]
pub struct CommandSpec {
    pub short: String,
    pub long: Option<String>,
    /// Usage text following `<program> <command>`
    pub usage: String,
    /// Argument strings following `<program> <command>` in help examples
    pub examples: Vec<String>,
    /// Minimum number of positional arguments
    pub least: usize,
    /// Maximum number of positional arguments, `None` when unbounded
    pub most: Option<usize>,
    /// Options in declaration order
    pub options: Vec<(String, OptionSpec)>,
    pub handler: Handler,
}

impl CommandSpec {
    /// Create a command with no options and unbounded positionals
    pub fn new<F, Fut>(short: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Options) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            short: short.into(),
            long: None,
            usage: "[options]".to_string(),
            examples: Vec::new(),
            least: 0,
            most: None,
            options: Vec::new(),
            handler: Arc::new(move |options| handler(options).boxed()),
        }
    }

    /// Set the long description, shown at the end of the command help
    #[must_use]
    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long = Some(long.into());
        self
    }

    #[must_use]
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    #[must_use]
    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }

    #[must_use]
    pub const fn least(mut self, least: usize) -> Self {
        self.least = least;
        self
    }

    #[must_use]
    pub const fn most(mut self, most: usize) -> Self {
        self.most = Some(most);
        self
    }

    /// Declare an option; redeclaring a name replaces the earlier spec
    #[must_use]
    pub fn option(mut self, name: impl Into<String>, spec: OptionSpec) -> Self {
        let name = name.into();
        match self.options.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = spec,
            None => self.options.push((name, spec)),
        }
        self
    }

    /// Look up an option by name
    pub fn get_option(&self, name: &str) -> Option<&OptionSpec> {
        self.options
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, spec)| spec)
    }

    /// Positional bounds to enforce, or `None` when they carry no information
    ///
    /// A `most` below `least` is ignored.
    pub fn positional_bounds(&self) -> Option<(usize, Option<usize>)> {
        let most = self.most.filter(|most| *most >= self.least);
        (self.least > 0 || most.is_some()).then_some((self.least, most))
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("short", &self.short)
            .field("long", &self.long)
            .field("usage", &self.usage)
            .field("examples", &self.examples)
            .field("least", &self.least)
            .field("most", &self.most)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Commands known to a dispatcher, in declaration order
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    commands: Vec<(String, CommandSpec)>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command; redeclaring a name replaces the earlier spec
    #[must_use]
    pub fn command(mut self, name: impl Into<String>, spec: CommandSpec) -> Self {
        let name = name.into();
        match self.commands.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = spec,
            None => self.commands.push((name, spec)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, spec)| spec)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandSpec)> {
        self.commands.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
