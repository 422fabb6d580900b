//! Command-line interface of the `subcmd` binary
//!
//! A small command table exercising the dispatcher.

pub mod commands;

pub use commands::command_table;
