use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::migration::{RunChange, RunObserver, RunState};

pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

pub(crate) fn transfer_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.green/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .progress_chars("=> "),
    );
    pb
}

/// Renders run state changes on a progress bar, printing log lines above it.
pub struct TerminalProgress {
    pb: ProgressBar,
}

impl TerminalProgress {
    pub fn new(pb: ProgressBar) -> Self {
        TerminalProgress { pb }
    }
}

impl RunObserver for TerminalProgress {
    fn on_change(&self, state: &RunState, change: RunChange) {
        match change {
            RunChange::Reset => {
                self.pb.set_length(state.total as u64);
                self.pb.set_position(0);
            }
            RunChange::Action => self.pb.set_message(state.current_action.clone()),
            RunChange::Progress => {
                self.pb.set_position(state.completed as u64);
                if state.is_finished() {
                    self.pb.disable_steady_tick();
                }
            }
            RunChange::Log => {
                if let Some(line) = state.log.last() {
                    self.pb.println(format_log_line(line));
                }
            }
            RunChange::Phase(_) => {}
        }
    }
}

fn format_log_line(line: &str) -> String {
    if line.starts_with("ERROR") {
        format!("  {} {}", "│".red(), line.red())
    } else if line.starts_with("Starting") {
        format!("{} {}", "┌".bright_black(), line.bold())
    } else {
        format!("  {} {}", "│".bright_black(), line)
    }
}
