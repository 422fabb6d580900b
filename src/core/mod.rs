//! Core dispatching functionality
//!
//! Contains the command table, the normalized options handed to handlers,
//! the translation into `clap` schemas, and the dispatcher itself.

pub mod dispatcher;
pub mod options;
pub mod schema;
pub mod table;

pub use dispatcher::{Dispatcher, Rejection, Resolution, dispatch};
pub use options::{OptionValue, Options};
pub use table::{CommandSpec, CommandTable, Handler, HandlerFuture, OptionSpec};
