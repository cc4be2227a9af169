#![warn(clippy::pedantic)]

mod cli;
mod command;
mod log;
mod settings;

use anyhow::Result;
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    cli::run(cli::Cli::parse()).await
}
