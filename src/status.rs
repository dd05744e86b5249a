//! Live terminal status line, overwritten in place once per tick.

use chrono::Local;
use crossterm::cursor;
use crossterm::execute;
use crossterm::style::{Print, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::tty::IsTty;
use std::io::{stdout, Stdout};

use crate::config::{Config, Mode};
use crate::engine::{Outcome, TickReport};

/// Single-line status display.
///
/// Disabled entirely in quiet mode or when stdout is not a terminal, so pipes
/// never see escape sequences. While enabled the terminal cursor is hidden;
/// `finish` (or drop) restores it.
pub struct StatusLine {
    out: Stdout,
    enabled: bool,
}

impl StatusLine {
    pub fn new(quiet: bool) -> Self {
        let out = stdout();
        let enabled = !quiet && out.is_tty();
        let mut status = Self { out, enabled };
        if status.enabled {
            let _ = execute!(status.out, cursor::Hide);
        }
        status
    }

    /// Redraw the status line for this tick.
    pub fn render(&mut self, report: &TickReport, config: &Config) {
        if !self.enabled {
            return;
        }

        let clock = Local::now().format("%H:%M:%S");
        let text = status_text(report, config);

        let result = match config.mode {
            Mode::Reactive => {
                let state = if report.is_idle {
                    "idle  ".yellow()
                } else {
                    "active".green()
                };
                execute!(
                    self.out,
                    cursor::MoveToColumn(0),
                    Clear(ClearType::CurrentLine),
                    Print(format!("{} ", clock)),
                    Print(state),
                    Print(format!("  {}", text)),
                )
            }
            Mode::Proactive => execute!(
                self.out,
                cursor::MoveToColumn(0),
                Clear(ClearType::CurrentLine),
                Print(format!("{}  {}", clock, text)),
            ),
        };

        // A failed terminal write is not worth stopping the loop for.
        let _ = result;
    }

    /// Clear the line so a log record can be printed without interleaving.
    pub fn make_room(&mut self) {
        if !self.enabled {
            return;
        }
        let _ = execute!(self.out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine));
    }

    /// Clear the status line and restore the terminal cursor.
    pub fn finish(&mut self) {
        if !self.enabled {
            return;
        }
        let _ = execute!(
            self.out,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            cursor::Show,
        );
        self.enabled = false;
    }
}

impl Drop for StatusLine {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Uncolored body of the status line.
fn status_text(report: &TickReport, config: &Config) -> String {
    match (&report.outcome, config.mode) {
        (Outcome::Pending { seconds_until_move }, _) => format!(
            "next nudge in {}s | moves: {}",
            seconds_until_move, report.moves
        ),
        (Outcome::Moved { to, .. }, Mode::Proactive) => {
            format!("nudged to {} | moves: {}", to, report.moves)
        }
        (Outcome::Faulted, _) => format!("os call failed, retrying | moves: {}", report.moves),
        (_, _) => format!(
            "idle {}s / {}s | moves: {}",
            report.idle_seconds, config.interval_seconds, report.moves
        ),
    }
}
