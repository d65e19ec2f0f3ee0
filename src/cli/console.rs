//! Interactive console for the clock.
//!
//! Reads one command per line and forwards it to a [`ClockController`],
//! while printing timer events as they arrive.

use std::io::Write;
use std::str::FromStr;

use anyhow::{Context, Result};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::debug;

use super::display::Display;
use crate::clock::{ClockController, TimerEvent};
use crate::types::{checked_minutes, RunStatus};

// ============================================================================
// ConsoleCommand
// ============================================================================

/// Requested change to a session or break length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthChange {
    /// Set to an exact number of minutes
    Set(i64),
    /// One minute more
    Increase,
    /// One minute less
    Decrease,
}

/// A parsed console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Start,
    Pause,
    Toggle,
    Reset,
    Session(LengthChange),
    Break(LengthChange),
    Status,
    Json,
    Help,
    Quit,
}

/// Errors produced while parsing a console line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("'{0}' needs a value: a number of minutes, + or -")]
    MissingLength(&'static str),

    #[error("'{0}' is not a number of minutes")]
    InvalidLength(String),

    #[error("'{command}' takes no argument, got '{argument}'")]
    UnexpectedArgument {
        command: String,
        argument: String,
    },
}

impl FromStr for ConsoleCommand {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim().to_lowercase();
        let mut words = line.split_whitespace();

        let Some(name) = words.next() else {
            return Ok(ConsoleCommand::Toggle);
        };
        let argument = words.next();
        if let Some(extra) = words.next() {
            return Err(CommandParseError::UnexpectedArgument {
                command: name.to_string(),
                argument: extra.to_string(),
            });
        }

        let command = match name {
            "session" => return parse_length("session", argument).map(ConsoleCommand::Session),
            "break" => return parse_length("break", argument).map(ConsoleCommand::Break),
            "start" | "s" => ConsoleCommand::Start,
            "pause" | "p" => ConsoleCommand::Pause,
            "toggle" | "t" => ConsoleCommand::Toggle,
            "reset" | "r" => ConsoleCommand::Reset,
            "status" => ConsoleCommand::Status,
            "json" => ConsoleCommand::Json,
            "help" | "h" | "?" => ConsoleCommand::Help,
            "quit" | "q" | "exit" => ConsoleCommand::Quit,
            other => return Err(CommandParseError::Unknown(other.to_string())),
        };

        match argument {
            Some(argument) => Err(CommandParseError::UnexpectedArgument {
                command: name.to_string(),
                argument: argument.to_string(),
            }),
            None => Ok(command),
        }
    }
}

fn parse_length(
    command: &'static str,
    argument: Option<&str>,
) -> Result<LengthChange, CommandParseError> {
    match argument {
        None => Err(CommandParseError::MissingLength(command)),
        Some("+") => Ok(LengthChange::Increase),
        Some("-") => Ok(LengthChange::Decrease),
        Some(value) => value
            .parse::<i64>()
            .map(LengthChange::Set)
            .map_err(|_| CommandParseError::InvalidLength(value.to_string())),
    }
}

// ============================================================================
// Session loop
// ============================================================================

/// Runs the console until `quit` or end of input.
///
/// With `live` set, tick events redraw the status line in place; otherwise
/// only phase completions are printed between commands.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub async fn run_session<R, W>(
    controller: &ClockController,
    mut events: mpsc::UnboundedReceiver<TimerEvent>,
    input: R,
    out: &mut W,
    live: bool,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    writeln!(out, "{}", Display::status_line(&controller.snapshot().await))?;
    out.flush()?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read console input")? else {
                    debug!("Console input closed");
                    break;
                };
                match line.parse::<ConsoleCommand>() {
                    Ok(ConsoleCommand::Quit) => break,
                    Ok(command) => execute(controller, command, out, live).await?,
                    Err(e) => print_line(out, live, &Display::input_error(&e.to_string()))?,
                }
            }
            Some(event) = events.recv() => {
                show_event(controller, &event, out, live).await?;
            }
        }
        out.flush()?;
    }

    if live {
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

async fn execute<W: Write>(
    controller: &ClockController,
    command: ConsoleCommand,
    out: &mut W,
    live: bool,
) -> Result<()> {
    debug!("Console command: {:?}", command);

    let snapshot = match command {
        ConsoleCommand::Start => controller.start().await,
        ConsoleCommand::Pause => controller.pause().await,
        ConsoleCommand::Toggle => controller.toggle().await,
        ConsoleCommand::Reset => controller.reset().await,
        ConsoleCommand::Session(change) => {
            return change_length(controller, change, LengthTarget::Session, out, live).await;
        }
        ConsoleCommand::Break(change) => {
            return change_length(controller, change, LengthTarget::Break, out, live).await;
        }
        ConsoleCommand::Status => controller.snapshot().await,
        ConsoleCommand::Json => {
            let snapshot = controller.snapshot().await;
            let json = serde_json::to_string_pretty(&snapshot)
                .context("failed to serialize clock state")?;
            return print_line(out, live, &json);
        }
        ConsoleCommand::Help => return print_line(out, live, Display::help_text()),
        ConsoleCommand::Quit => return Ok(()),
    };

    print_line(out, live, &Display::status_line(&snapshot))
}

#[derive(Debug, Clone, Copy)]
enum LengthTarget {
    Session,
    Break,
}

async fn change_length<W: Write>(
    controller: &ClockController,
    change: LengthChange,
    target: LengthTarget,
    out: &mut W,
    live: bool,
) -> Result<()> {
    let before = controller.snapshot().await;
    let current = match target {
        LengthTarget::Session => before.session_minutes,
        LengthTarget::Break => before.break_minutes,
    };
    let requested = match change {
        LengthChange::Set(m) => m,
        LengthChange::Increase => i64::from(current) + 1,
        LengthChange::Decrease => i64::from(current) - 1,
    };
    let locked = before.run_status == RunStatus::Running;

    let after = match (target, change) {
        (LengthTarget::Session, LengthChange::Set(m)) => controller.set_session_length(m).await,
        (LengthTarget::Session, LengthChange::Increase) => {
            controller.adjust_session_length(1).await
        }
        (LengthTarget::Session, LengthChange::Decrease) => {
            controller.adjust_session_length(-1).await
        }
        (LengthTarget::Break, LengthChange::Set(m)) => controller.set_break_length(m).await,
        (LengthTarget::Break, LengthChange::Increase) => controller.adjust_break_length(1).await,
        (LengthTarget::Break, LengthChange::Decrease) => controller.adjust_break_length(-1).await,
    };

    print_line(out, live, &Display::status_line(&after))?;
    if locked {
        writeln!(out, "{}", Display::locked_note())?;
    } else if checked_minutes(requested).is_none() {
        writeln!(out, "{}", Display::out_of_range_note(requested))?;
    }
    Ok(())
}

async fn show_event<W: Write>(
    controller: &ClockController,
    event: &TimerEvent,
    out: &mut W,
    live: bool,
) -> Result<()> {
    match event {
        TimerEvent::Tick { .. } if live => {
            write!(out, "{}", Display::redraw(&controller.snapshot().await))?;
        }
        TimerEvent::PhaseCompleted { finished, .. } => {
            let snapshot = controller.snapshot().await;
            print_line(out, live, &Display::phase_completed_line(*finished, &snapshot))?;
            if live {
                write!(out, "{}", Display::redraw(&snapshot))?;
            }
        }
        // Command results are printed by the command handler.
        _ => {}
    }
    Ok(())
}

fn print_line<W: Write>(out: &mut W, live: bool, line: &str) -> Result<()> {
    if live {
        write!(out, "{}", Display::clear_line())?;
    }
    writeln!(out, "{}", line)?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TimerEngine;
    use crate::sound::{Alert, MockSoundPlayer, SoundSource};
    use crate::types::SessionConfig;
    use std::sync::Arc;
    use std::time::Duration;

    // ------------------------------------------------------------------------
    // Parse Tests
    // ------------------------------------------------------------------------

    mod parse_tests {
        use super::*;

        fn parse(line: &str) -> Result<ConsoleCommand, CommandParseError> {
            line.parse()
        }

        #[test]
        fn test_parse_aliases() {
            let cases = [
                ("start", ConsoleCommand::Start),
                ("s", ConsoleCommand::Start),
                ("pause", ConsoleCommand::Pause),
                ("p", ConsoleCommand::Pause),
                ("toggle", ConsoleCommand::Toggle),
                ("t", ConsoleCommand::Toggle),
                ("", ConsoleCommand::Toggle),
                ("   ", ConsoleCommand::Toggle),
                ("reset", ConsoleCommand::Reset),
                ("r", ConsoleCommand::Reset),
                ("status", ConsoleCommand::Status),
                ("json", ConsoleCommand::Json),
                ("help", ConsoleCommand::Help),
                ("h", ConsoleCommand::Help),
                ("?", ConsoleCommand::Help),
                ("quit", ConsoleCommand::Quit),
                ("q", ConsoleCommand::Quit),
                ("exit", ConsoleCommand::Quit),
            ];
            for (input, expected) in cases {
                assert_eq!(parse(input), Ok(expected), "input = {:?}", input);
            }
        }

        #[test]
        fn test_parse_is_case_insensitive_and_trims() {
            assert_eq!(parse("  START \n"), Ok(ConsoleCommand::Start));
            assert_eq!(
                parse("Session 30"),
                Ok(ConsoleCommand::Session(LengthChange::Set(30)))
            );
        }

        #[test]
        fn test_parse_lengths() {
            assert_eq!(
                parse("session 30"),
                Ok(ConsoleCommand::Session(LengthChange::Set(30)))
            );
            assert_eq!(
                parse("session +"),
                Ok(ConsoleCommand::Session(LengthChange::Increase))
            );
            assert_eq!(
                parse("break -"),
                Ok(ConsoleCommand::Break(LengthChange::Decrease))
            );
            assert_eq!(
                parse("break -3"),
                Ok(ConsoleCommand::Break(LengthChange::Set(-3)))
            );
        }

        #[test]
        fn test_parse_errors() {
            assert_eq!(
                parse("launch"),
                Err(CommandParseError::Unknown("launch".to_string()))
            );
            assert_eq!(
                parse("session"),
                Err(CommandParseError::MissingLength("session"))
            );
            assert_eq!(
                parse("break ten"),
                Err(CommandParseError::InvalidLength("ten".to_string()))
            );
            assert!(matches!(
                parse("start now"),
                Err(CommandParseError::UnexpectedArgument { .. })
            ));
            assert!(matches!(
                parse("session 1 2"),
                Err(CommandParseError::UnexpectedArgument { .. })
            ));
        }

        #[test]
        fn test_error_messages() {
            let err = parse("launch").unwrap_err();
            assert_eq!(err.to_string(), "unknown command 'launch'");
            let err = parse("break").unwrap_err();
            assert!(err.to_string().contains("'break' needs a value"));
        }
    }

    // ------------------------------------------------------------------------
    // Session Loop Tests
    // ------------------------------------------------------------------------

    mod session_tests {
        use super::*;

        fn create_controller() -> (
            ClockController,
            mpsc::UnboundedReceiver<TimerEvent>,
            Arc<MockSoundPlayer>,
        ) {
            let (tx, rx) = mpsc::unbounded_channel();
            let mock = Arc::new(MockSoundPlayer::new());
            let alert = Alert::new(mock.clone(), SoundSource::default());
            let engine = TimerEngine::with_config(SessionConfig::default(), alert, tx);
            (ClockController::new(engine), rx, mock)
        }

        async fn run_script(script: &str) -> (String, ClockController) {
            let (controller, events, _mock) = create_controller();
            let mut out = Vec::new();
            run_session(&controller, events, script.as_bytes(), &mut out, false)
                .await
                .unwrap();
            (String::from_utf8(out).unwrap(), controller)
        }

        #[tokio::test(start_paused = true)]
        async fn test_status_and_quit() {
            let (output, _controller) = run_script("status\nquit\n").await;
            let lines: Vec<&str> = output.lines().collect();
            assert_eq!(
                lines,
                vec![
                    "Session 25:00 [stopped] (session 25 min / break 5 min)",
                    "Session 25:00 [stopped] (session 25 min / break 5 min)",
                ]
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_quit_stops_reading() {
            let (output, controller) = run_script("quit\nstart\n").await;
            assert_eq!(output.lines().count(), 1);
            assert!(!controller.is_ticking().await);
        }

        #[tokio::test(start_paused = true)]
        async fn test_eof_ends_session() {
            let (output, controller) = run_script("session 30\nbreak +").await;
            assert!(output.contains("Session 30:00 [stopped] (session 30 min / break 5 min)"));
            assert!(output.contains("(session 30 min / break 6 min)"));
            let snapshot = controller.snapshot().await;
            assert_eq!(snapshot.session_minutes, 30);
            assert_eq!(snapshot.break_minutes, 6);
        }

        #[tokio::test(start_paused = true)]
        async fn test_start_pause_reset() {
            let (output, controller) = run_script("start\npause\nreset\n").await;
            assert!(output.contains("[running]"));
            assert!(output.contains("[paused]"));
            assert!(output.trim_end().ends_with("[stopped] (session 25 min / break 5 min)"));
            assert!(!controller.is_ticking().await);
        }

        #[tokio::test(start_paused = true)]
        async fn test_unknown_command_continues() {
            let (output, _controller) = run_script("dance\nstatus\n").await;
            assert!(output.contains("error: unknown command 'dance'"));
            assert_eq!(output.matches("[stopped]").count(), 2);
        }

        #[tokio::test(start_paused = true)]
        async fn test_out_of_range_length_is_reported() {
            let (output, controller) = run_script("session 61\nbreak 0\n").await;
            assert!(output.contains("61 is outside 1-60 minutes"));
            assert!(output.contains("0 is outside 1-60 minutes"));
            assert!(!output.contains("while counting down"));
            let snapshot = controller.snapshot().await;
            assert_eq!(snapshot.session_minutes, 25);
            assert_eq!(snapshot.break_minutes, 5);
        }

        #[tokio::test(start_paused = true)]
        async fn test_adjust_past_bound_is_reported() {
            let (output, controller) = run_script("break 1\nbreak -\n").await;
            assert!(output.contains("0 is outside 1-60 minutes"));
            assert_eq!(controller.snapshot().await.break_minutes, 1);
        }

        #[tokio::test(start_paused = true)]
        async fn test_length_change_while_running_is_reported() {
            let (output, controller) = run_script("start\nsession 30\n").await;
            assert!(output.contains("cannot change while counting down"));
            assert!(!output.contains("outside 1-60"));
            assert_eq!(controller.snapshot().await.session_minutes, 25);
        }

        #[tokio::test(start_paused = true)]
        async fn test_same_length_is_accepted_silently() {
            let (output, controller) = run_script("session 25\nbreak 5\nsession +\n").await;
            assert!(!output.contains("unchanged"));
            assert_eq!(controller.snapshot().await.session_minutes, 26);
        }

        #[tokio::test(start_paused = true)]
        async fn test_json_output() {
            let (output, _controller) = run_script("json\n").await;
            let json_start = output.find('{').unwrap();
            let json: serde_json::Value = serde_json::from_str(&output[json_start..]).unwrap();
            assert_eq!(json["remainingSeconds"], 1500);
            assert_eq!(json["timeLeft"], "25:00");
            assert_eq!(json["state"], "initial");
        }

        #[tokio::test(start_paused = true)]
        async fn test_phase_completion_is_announced() {
            let (controller, events, mock) = create_controller();
            controller.set_session_length(1).await;

            let (mut writer, reader) = tokio::io::duplex(64);
            let session = {
                let controller = controller.clone();
                tokio::spawn(async move {
                    let mut out = Vec::new();
                    run_session(
                        &controller,
                        events,
                        tokio::io::BufReader::new(reader),
                        &mut out,
                        false,
                    )
                    .await
                    .map(|()| out)
                })
            };

            use tokio::io::AsyncWriteExt;
            writer.write_all(b"start\n").await.unwrap();
            tokio::time::sleep(Duration::from_millis(60_500)).await;
            writer.write_all(b"quit\n").await.unwrap();

            let out = session.await.unwrap().unwrap();
            let output = String::from_utf8(out).unwrap();
            assert!(output.contains("* Session complete. Break 05:00 starts now."));
            assert!(!output.contains("\x1b[2K"));
            assert_eq!(mock.play_count(), 1);
        }
    }
}
