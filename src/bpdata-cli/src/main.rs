mod cli;
mod commands;
mod config;
mod file_io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "bpdata=debug" } else { "bpdata=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Build { args } => {
            commands::build::handle(&args, true)?;
        }

        Commands::Crafting { args } => {
            commands::build::handle(&args, false)?;
        }

        Commands::Travelers {
            game_data,
            crafting_data,
            output,
        } => {
            commands::travelers::handle(&game_data, &crafting_data, &output)?;
        }

        Commands::Config { show, init, config } => {
            commands::configure::handle(show, init, config.as_deref())?;
        }
    }

    Ok(())
}
