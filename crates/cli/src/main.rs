//! Kunafa operator CLI
//!
//! Prints the menu, prices order files into WhatsApp messages and resolves
//! delivery addresses.

use std::{io, process::ExitCode};

use tracing::error;

use crate::config::CliConfig;

mod commands;
mod config;
mod observability;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match CliConfig::load() {
        Ok(config) => config,
        Err(error) => {
            // clap renders help and usage errors itself
            _ = error.print();

            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(error) = observability::init(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("{error}");
        }

        return ExitCode::FAILURE;
    }

    let store = match config.store.load() {
        Ok(store) => store,
        Err(source) => {
            error!("failed to load store configuration: {source}");

            return ExitCode::FAILURE;
        }
    };

    let mut stdout = io::stdout().lock();

    match commands::run(config.command, &store, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(source) => {
            error!("{source}");

            ExitCode::FAILURE
        }
    }
}
