//! pomoclock - a 25+5 Pomodoro clock for the terminal
//!
//! Alternates a work session and a break:
//! - 25 minutes of focused work (1-60 configurable)
//! - 5 minutes of break (1-60 configurable)
//! - an alert sound at every switch

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::debug;

use pomoclock::cli::{run_session, Cli, Commands, Display, RunArgs};
use pomoclock::clock::{ClockController, TimerEngine};
use pomoclock::sound::{try_create_player, Alert, SilentSoundPlayer, SoundSource};
use pomoclock::types::SessionConfig;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    let code = match execute(cli).await {
        Ok(()) => 0,
        Err(e) => {
            Display::show_error(&format!("{:#}", e));
            1
        }
    };

    // The blocking stdin reader would otherwise keep the runtime alive.
    std::process::exit(code);
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins when set; otherwise `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Run(args)) => {
            run_clock(args).await?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Runs the interactive clock until the user quits.
async fn run_clock(args: RunArgs) -> Result<()> {
    let config = SessionConfig::new(i64::from(args.session), i64::from(args.break_minutes))?;
    let alert = build_alert(&args)?;

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let controller = ClockController::new(TimerEngine::with_config(config, alert, event_tx));

    if args.autostart {
        controller.start().await;
    }

    let live = std::io::stdout().is_terminal();
    if live {
        println!("Type 'help' for commands, <enter> to start or pause.");
    }

    let input = BufReader::new(tokio::io::stdin());
    let mut output = std::io::stdout();

    tokio::select! {
        result = run_session(&controller, event_rx, input, &mut output, live) => {
            result?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for Ctrl-C")?;
            debug!("Interrupted");
            println!();
        }
    }

    controller.reset().await;
    Ok(())
}

/// Builds the phase-complete alert from the run flags.
///
/// Without an audio device the alert stays silent.
fn build_alert(args: &RunArgs) -> Result<Alert> {
    if args.no_sound {
        debug!("Sound disabled by --no-sound");
        return Ok(Alert::silent());
    }

    let source = alert_source(args)?;
    let alert = match try_create_player() {
        Some(player) => Alert::new(player, source),
        None => Alert::new(Arc::new(SilentSoundPlayer), source),
    };
    debug!("Alert ready: {:?}", alert);
    Ok(alert)
}

/// Resolves the sound to play, checking a `--sound` file before the clock
/// starts.
fn alert_source(args: &RunArgs) -> Result<SoundSource> {
    match &args.sound {
        Some(path) => SoundSource::file_validated(path)
            .with_context(|| format!("cannot use sound file {}", path.display())),
        None => Ok(SoundSource::default()),
    }
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
