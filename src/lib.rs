//! # subcmd
//!
//! A declarative subcommand dispatcher. Callers describe their commands in a
//! table (descriptions, option letters, arities, examples and an async
//! handler); the dispatcher parses the command line against that table,
//! normalizes the options and runs the matching handler.
//!
//! ## Features
//!
//! - Option schemas built per selected command on top of `clap`
//! - Table validation before any argument is parsed
//! - Help, usage and examples generated from the table
//! - Handler failures reported on stderr, never propagated
//!
//! ## Example
//!
//! ```no_run
//! use subcmd::{config::DispatchConfig, core::{CommandSpec, CommandTable, Dispatcher, OptionSpec}};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let table = CommandTable::new().command(
//!     "build",
//!     CommandSpec::new("Build the project", |options| async move {
//!         println!("force: {}", options.flag("force"));
//!         Ok(())
//!     })
//!     .option("force", OptionSpec::flag('f').describe("Rebuild everything")),
//! );
//!
//! let dispatcher = Dispatcher::new(DispatchConfig::new("tool", "1.0.0"), table)?;
//! dispatcher.run(["build", "-f"]).await;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with appropriate verbosity
pub fn setup_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
