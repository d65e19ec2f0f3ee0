//! Display utilities for the Pomodoro Clock CLI.
//!
//! This module provides formatted output for:
//! - The one-line clock status
//! - Phase completion announcements
//! - Error messages
//! - The console command list

use crate::types::{Phase, TimerSnapshot};

/// Moves the cursor to column 0 and clears the line.
const CLEAR_LINE: &str = "\r\x1b[2K";

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Renders the clock as a single status line.
    ///
    /// `Session 25:00 [stopped] (session 25 min / break 5 min)`
    pub fn status_line(snapshot: &TimerSnapshot) -> String {
        format!(
            "{} {} [{}] (session {} min / break {} min)",
            snapshot.phase.label(),
            snapshot.time_left,
            snapshot.state.as_str(),
            snapshot.session_minutes,
            snapshot.break_minutes
        )
    }

    /// Renders the status line prefixed so it overwrites the current
    /// terminal line.
    pub fn redraw(snapshot: &TimerSnapshot) -> String {
        format!("{}{}", CLEAR_LINE, Self::status_line(snapshot))
    }

    /// Prefix that clears a redrawn line before regular output.
    pub fn clear_line() -> &'static str {
        CLEAR_LINE
    }

    /// Announces the end of a phase and the start of the next one.
    pub fn phase_completed_line(finished: Phase, snapshot: &TimerSnapshot) -> String {
        format!(
            "* {} complete. {} {} starts now.",
            finished.label(),
            snapshot.phase.label(),
            snapshot.time_left
        )
    }

    /// Note shown when a length command arrives while the clock runs.
    pub fn locked_note() -> &'static str {
        "  (unchanged: lengths cannot change while counting down)"
    }

    /// Note shown when a length command asks for an unsupported value.
    pub fn out_of_range_note(requested: i64) -> String {
        format!("  (unchanged: {} is outside 1-60 minutes)", requested)
    }

    /// The console command list.
    pub fn help_text() -> &'static str {
        "Commands:\n\
         \x20 start, s            start or resume the countdown\n\
         \x20 pause, p            pause the countdown\n\
         \x20 toggle, t, <enter>  start if stopped, pause if running\n\
         \x20 reset, r            stop and restore 25/5\n\
         \x20 session <n>|+|-     set the session length (1-60 minutes)\n\
         \x20 break <n>|+|-       set the break length (1-60 minutes)\n\
         \x20 status              show the clock\n\
         \x20 json                show the clock as JSON\n\
         \x20 help, h, ?          show this list\n\
         \x20 quit, q, exit       leave"
    }

    /// Formats a console input error.
    pub fn input_error(message: &str) -> String {
        format!("error: {} (type 'help' for the list)", message)
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SessionConfig, TimerState};

    fn snapshot_of(config: SessionConfig, mutate: impl FnOnce(&mut TimerState)) -> TimerSnapshot {
        let mut state = TimerState::new(&config);
        mutate(&mut state);
        TimerSnapshot::new(&state, &config)
    }

    mod status_line_tests {
        use super::*;
        use crate::types::RunStatus;

        #[test]
        fn test_initial_status_line() {
            let snapshot = snapshot_of(SessionConfig::default(), |_| {});
            assert_eq!(
                Display::status_line(&snapshot),
                "Session 25:00 [stopped] (session 25 min / break 5 min)"
            );
        }

        #[test]
        fn test_running_status_line() {
            let snapshot = snapshot_of(SessionConfig::default(), |s| {
                s.run_status = RunStatus::Running;
                s.remaining_seconds = 65;
            });
            assert_eq!(
                Display::status_line(&snapshot),
                "Session 01:05 [running] (session 25 min / break 5 min)"
            );
        }

        #[test]
        fn test_break_paused_status_line() {
            let config = SessionConfig::new(50, 10).unwrap();
            let snapshot = snapshot_of(config, |s| {
                s.enter_phase(Phase::Break, &config);
                s.run_status = RunStatus::Paused;
                s.remaining_seconds = 3;
            });
            assert_eq!(
                Display::status_line(&snapshot),
                "Break 00:03 [break paused] (session 50 min / break 10 min)"
            );
        }

        #[test]
        fn test_redraw_clears_line() {
            let snapshot = snapshot_of(SessionConfig::default(), |_| {});
            let line = Display::redraw(&snapshot);
            assert!(line.starts_with(Display::clear_line()));
            assert!(line.ends_with("(session 25 min / break 5 min)"));
        }
    }

    mod message_tests {
        use super::*;

        #[test]
        fn test_phase_completed_line() {
            let config = SessionConfig::default();
            let snapshot = snapshot_of(config, |s| s.enter_phase(Phase::Break, &config));
            assert_eq!(
                Display::phase_completed_line(Phase::Work, &snapshot),
                "* Session complete. Break 05:00 starts now."
            );
        }

        #[test]
        fn test_help_lists_every_command() {
            let help = Display::help_text();
            for word in [
                "start", "pause", "toggle", "reset", "session", "break", "status", "json",
                "help", "quit",
            ] {
                assert!(help.contains(word), "missing {}", word);
            }
        }

        #[test]
        fn test_length_notes() {
            assert_eq!(
                Display::out_of_range_note(61),
                "  (unchanged: 61 is outside 1-60 minutes)"
            );
            assert!(Display::locked_note().contains("while counting down"));
        }

        #[test]
        fn test_input_error() {
            let message = Display::input_error("unknown command 'foo'");
            assert!(message.starts_with("error: unknown command 'foo'"));
            assert!(message.contains("help"));
        }

        #[test]
        fn test_show_error() {
            // This test verifies the function doesn't panic
            Display::show_error("Test error message");
        }
    }
}
