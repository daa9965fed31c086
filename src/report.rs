use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::{OwoColorize, Stream};

/// Progress messages on stderr, so they never end up in piped output.
pub struct Reporter {
    quiet: bool,
}

impl Reporter {
    pub fn new(quiet: bool) -> Self {
        Reporter { quiet }
    }

    pub fn step(&self, msg: &str) {
        if !self.quiet {
            eprintln!("{} {msg}", "::".if_supports_color(Stream::Stderr, |t| t.cyan()));
        }
    }

    /// Warnings are printed even when quiet.
    pub fn warn(&self, msg: &str) {
        eprintln!(
            "{} {msg}",
            "warning:".if_supports_color(Stream::Stderr, |t| t.yellow())
        );
    }

    /// Spinner shown while waiting on the network. Hidden when quiet or not on a terminal.
    pub fn spinner(&self, msg: String) -> ProgressBar {
        let bar = ProgressBar::new_spinner();
        if self.quiet {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(msg);
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }

    /// Final tally of publications kept and dropped by the filter.
    pub fn summary(&self, kept: usize, total: usize) {
        if !self.quiet {
            eprintln!(
                "{} {kept}  {} {}",
                "✓".if_supports_color(Stream::Stderr, |t| t.green()),
                "✗".if_supports_color(Stream::Stderr, |t| t.red()),
                total - kept
            );
        }
    }
}
