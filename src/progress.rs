//! Progress display while scanning and querying registries
//!
//! Drawn on stderr by indicatif; hidden in quiet and JSON modes.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";
const BAR_TEMPLATE: &str = "{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}";

/// Progress reporter for the inspection workflow
pub struct Progress {
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Create a new progress reporter
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    /// Create a disabled progress reporter
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Returns true if anything will be drawn
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Show a spinner for an indeterminate step
    pub fn spinner(&mut self, message: &str) {
        if !self.enabled {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template(SPINNER_TEMPLATE) {
            spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.replace(spinner);
    }

    /// Start a bar for a known number of registry lookups
    pub fn start(&mut self, total: u64, message: &str) {
        if !self.enabled {
            return;
        }

        let bar = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("█▓▒░"));
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        self.replace(bar);
    }

    /// Increment progress by one
    pub fn inc(&self) {
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    /// Update the message
    pub fn set_message(&self, message: &str) {
        if let Some(ref bar) = self.bar {
            bar.set_message(message.to_string());
        }
    }

    /// Finish and clear the current bar
    pub fn finish_and_clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn replace(&mut self, bar: ProgressBar) {
        self.finish_and_clear();
        self.bar = Some(bar);
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_disabled() {
        let mut progress = Progress::disabled();
        assert!(!progress.is_enabled());
        progress.spinner("scanning");
        progress.start(10, "checking");
        progress.inc();
        progress.set_message("lodash");
        progress.finish_and_clear();
        assert!(progress.bar.is_none());
    }

    #[test]
    fn test_progress_enabled() {
        let mut progress = Progress::new(true);
        progress.spinner("scanning");
        progress.start(3, "checking");
        assert!(progress.bar.is_some());
        progress.inc();
        progress.set_message("lodash");
        progress.inc();
        progress.finish_and_clear();
        assert!(progress.bar.is_none());
    }
}
