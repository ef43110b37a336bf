//! CLI argument definitions for bpdata
//!
//! This module contains all clap-derived structs and enums for CLI parsing.

mod core;

pub use core::{BuildArgs, Cli, Commands};
