//! Boostforge CLI - dependency-ordered build orchestrator for modular Boost packages
//!
//! Entry point for the boostforge command-line application.

use anyhow::Result;
use clap::Parser;

use boostforge::cli::output::{display_error, init_tracing};
use boostforge::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    // Run the command and handle errors
    match cli.run().await {
        Ok(()) => Ok(()),
        Err(e) => {
            display_error(&e);
            std::process::exit(1);
        }
    }
}
