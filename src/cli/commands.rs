//! Command definitions for the Pomodoro Clock CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::{DEFAULT_BREAK_MINUTES, DEFAULT_SESSION_MINUTES};

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodoro Clock CLI - a 25+5 clock for the terminal
#[derive(Parser, Debug)]
#[command(
    name = "pomoclock",
    version,
    about = "A 25+5 Pomodoro clock for the terminal",
    long_about = "Counts down a work session, sounds an alert, counts down a break, \
                  and repeats until you stop it.\n\
                  Session and break lengths can be set from 1 to 60 minutes.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the interactive clock
    Run(RunArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Work session length in minutes (1-60)
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_SESSION_MINUTES,
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub session: u32,

    /// Break length in minutes (1-60)
    #[arg(
        short,
        long = "break",
        default_value_t = DEFAULT_BREAK_MINUTES,
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub break_minutes: u32,

    /// Disable the alert sound
    #[arg(long, conflicts_with = "sound")]
    pub no_sound: bool,

    /// Sound file to play when a phase ends (wav, mp3, flac, ogg)
    #[arg(long, value_name = "PATH")]
    pub sound: Option<PathBuf>,

    /// Start the countdown immediately
    #[arg(short, long)]
    pub autostart: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            session: DEFAULT_SESSION_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
            no_sound: false,
            sound: None,
            autostart: false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
