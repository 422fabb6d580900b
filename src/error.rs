//! Error types for the dispatcher
//!
//! Configuration mistakes in a command table are returned to the caller as
//! [`DispatchError`]. Problems with the user's input are [`UsageError`]s: they
//! are rendered as a diagnostic line next to the help text and never leave the
//! dispatcher.

use thiserror::Error;

/// Errors caused by the caller's command table or dispatcher configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DispatchError {
    /// Two options of one command share a short letter
    #[error("Duplicate letter {letter} in configuration of command {command}")]
    DuplicateLetter { letter: char, command: String },

    /// An option cannot be expressed as a command-line flag
    #[error("Invalid option {option} in configuration of command {command}: {message}")]
    InvalidOption {
        option: String,
        command: String,
        message: String,
    },

    /// Dispatcher configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl DispatchError {
    /// Create a new duplicate letter error
    pub fn duplicate_letter(letter: char, command: impl Into<String>) -> Self {
        Self::DuplicateLetter {
            letter,
            command: command.into(),
        }
    }

    /// Create a new invalid option error
    pub fn invalid_option(
        option: impl Into<String>,
        command: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidOption {
            option: option.into(),
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Errors in the user's input; `Display` is the diagnostic line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// A `once` option received more values than its arity
    #[error("Too many options: {0}")]
    TooManyOptions(String),

    #[error("Not enough non-option arguments: got {given}, need at least {least}")]
    NotEnoughArguments { given: usize, least: usize },

    #[error("Too many non-option arguments: got {given}, maximum of {most}")]
    TooManyArguments { given: usize, most: usize },

    /// Rejected by the argument parser
    #[error("{0}")]
    Parse(String),
}

impl UsageError {
    /// Condense a parser error to its first paragraph, without the `error:` prefix
    ///
    /// Usage and tips that follow are dropped; the caller prints full help.
    pub fn from_clap(err: &clap::Error) -> Self {
        let rendered = err.to_string();
        let paragraph = rendered.split("\n\n").next().unwrap_or_default();
        let message = paragraph.strip_prefix("error: ").unwrap_or(paragraph);
        Self::Parse(message.trim_end().to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, DispatchError>;
