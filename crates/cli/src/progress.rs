//! Spinners for steps that wait on the billing backend

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// A single waiting step backed by an indicatif spinner.
///
/// Create with [`Step::new`], then end it with [`Step::finish`], [`Step::note`]
/// or [`Step::fail`]. On a non-TTY the spinner draws nothing, but the closing
/// line is still emitted via `eprintln!`.
pub struct Step {
    pb: ProgressBar,
    label: String,
}

impl Step {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("{}...", label));
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { pb, label }
    }

    /// `"  label... done: {summary}"`
    pub fn finish(&self, summary: &str) {
        self.pb.finish_and_clear();
        eprintln!("  {}... {}: {}", self.label, "done".green(), summary);
    }

    /// Neutral ending, e.g. a cancelled purchase: `"  label... {msg}"`
    pub fn note(&self, msg: &str) {
        self.pb.finish_and_clear();
        eprintln!("  {}... {}", self.label, msg.yellow());
    }

    /// `"  label... failed"` followed by the reason
    pub fn fail(&self, reason: &str) {
        self.pb.finish_and_clear();
        eprintln!("  {}... {}", self.label, "failed".red());
        eprintln!("  {}", reason);
    }
}

impl Drop for Step {
    fn drop(&mut self) {
        if !self.pb.is_finished() {
            self.pb.finish_and_clear();
        }
    }
}
