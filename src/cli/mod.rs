//! CLI module - Command-line interface for dbroster
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// dbroster - Dragon Ball character and planet browser
#[derive(Parser)]
#[command(name = "dbroster")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show every character with its origin planet, then the planets
    #[command(alias = "list", alias = "ls")]
    Roster {
        /// Walk every page instead of the first one
        #[arg(long)]
        all: bool,
        /// Treat an empty but successful response as arrived
        #[arg(long)]
        explicit_readiness: bool,
    },

    /// List planets
    Planets {
        /// Walk every page instead of the first one
        #[arg(long)]
        all: bool,
    },

    /// Show details about one character
    #[command(alias = "info", alias = "i")]
    Character {
        /// Character ID
        id: i32,
    },

    /// Create default config file
    Init,
}

pub use commands::*;
