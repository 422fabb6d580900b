#![allow(clippy::cargo_common_metadata)]
use anyhow::Result;
use subcmd::{cli, config::DispatchConfig, core::{Dispatcher, dispatcher::process_args}, setup_logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize configuration from the running process
    let config = DispatchConfig::from_env(env!("CARGO_PKG_VERSION"))?;

    // Setup logging based on debug flag
    setup_logging(config.debug)?;

    // Dispatch and wait for the selected handler
    let dispatcher = Dispatcher::new(config, cli::command_table())?;
    dispatcher.run(process_args()).await;

    Ok(())
}
