mod cli;
mod clipboard;
mod config;
mod tui;
mod workflow;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    // A clipboard holder exits here without touching the CLI.
    if clipboard::run_holder_if_requested()? {
        return Ok(());
    }

    let cli_args = cli::Cli::parse();

    workflow::run_filepicker(cli_args)
}
