//! Configuration command handlers
//!
//! Handles the `config` subcommand for inspecting and creating the build config.

use crate::config::Config;
use anyhow::Result;
use std::path::Path;

/// Handle the config command
///
/// # Arguments
/// * `show` - Print the effective configuration as TOML
/// * `init` - Write the defaults to the config file
/// * `path` - Config file, defaults to the user config directory
pub fn handle(show: bool, init: bool, path: Option<&Path>) -> Result<()> {
    if init {
        init_config(path)?;
    }

    if show {
        show_config(path)?;
    }

    if !show && !init {
        show_usage();
    }

    Ok(())
}

/// Display the effective configuration
fn show_config(path: Option<&Path>) -> Result<()> {
    let config = Config::load(path)?;

    match Config::resolve_path(path) {
        Ok(config_path) if config_path.exists() => {
            println!("# Config file: {}", config_path.display());
        }
        Ok(config_path) => {
            println!("# Built-in defaults ({} not found)", config_path.display());
        }
        Err(_) => println!("# Built-in defaults (no config directory)"),
    }
    print!("{}", config.to_toml()?);

    Ok(())
}

/// Write the default configuration
fn init_config(path: Option<&Path>) -> Result<()> {
    let config_path = Config::resolve_path(path)?;
    Config::default().save_new(&config_path)?;

    println!("Config saved to: {}", config_path.display());
    Ok(())
}

/// Show usage help for the config command
fn show_usage() {
    println!("Usage: bpdata config --show");
    println!("   or: bpdata config --init [--config PATH]");
    println!();
    println!("The config controls ignored item tags and recipe ordering.");
}
