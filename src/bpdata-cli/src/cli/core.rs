//! Core CLI definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bpdata")]
#[command(about = "BitPlanner game data generator", long_about = None)]
pub struct Cli {
    /// Log per-item details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Inputs shared by the commands that build the crafting graph
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Directory holding the exported `*_desc.json` tables
    #[arg(short, long, env = "BPDATA_GAME_DATA")]
    pub game_data: PathBuf,

    /// Directory the JSON documents are written to
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Icon asset directory, enables missing icon checks
    #[arg(short, long)]
    pub assets: Option<PathBuf>,

    /// Config file (defaults to the user config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate crafting_data.json and travelers_data.json
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        args: BuildArgs,
    },

    /// Generate crafting_data.json only
    Crafting {
        #[command(flatten)]
        args: BuildArgs,
    },

    /// Generate travelers_data.json from an existing crafting document
    #[command(visible_alias = "t")]
    Travelers {
        /// Directory holding the exported `*_desc.json` tables
        #[arg(short, long, env = "BPDATA_GAME_DATA")]
        game_data: PathBuf,

        /// Previously generated crafting_data.json
        #[arg(long)]
        crafting_data: PathBuf,

        /// Directory the JSON document is written to
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Show or initialize the build configuration
    #[command(visible_alias = "c")]
    Config {
        /// Show the effective configuration
        #[arg(long)]
        show: bool,

        /// Write the default configuration to the config file
        #[arg(long)]
        init: bool,

        /// Config file (defaults to the user config directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
