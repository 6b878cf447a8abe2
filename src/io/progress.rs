//! Per-phase progress bars for the generation pipeline

use crate::algorithm::executor::Phase;
use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;
use std::time::Duration;

static PHASE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template = format!(
        "{{prefix:>10}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static SPINNER_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_spinner()
        .template("{prefix:>10} {spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
});

/// Shows one progress bar at a time, one per pipeline phase
#[derive(Default)]
pub struct ProgressManager {
    current: Option<ProgressBar>,
    finished_phases: usize,
}

impl ProgressManager {
    /// Create a manager with no active bar
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any active bar with one counting `total` steps of `phase`
    ///
    /// A total of zero shows a spinner instead.
    pub fn start_phase(&mut self, phase: Phase, total: usize) {
        self.finish_phase();

        let bar = if total == 0 {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(SPINNER_STYLE.clone());
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        } else {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(PHASE_STYLE.clone());
            bar
        };
        bar.set_prefix(phase.to_string());
        self.current = Some(bar);
    }

    /// Move the active bar to `position` steps
    pub fn set_position(&self, position: usize) {
        if let Some(ref bar) = self.current {
            bar.set_position(position as u64);
        }
    }

    /// Attach a short status message to the active bar
    pub fn set_message(&self, message: impl Into<String>) {
        if let Some(ref bar) = self.current {
            bar.set_message(message.into());
        }
    }

    /// Complete the active bar, if any
    pub fn finish_phase(&mut self) {
        if let Some(bar) = self.current.take() {
            bar.finish();
            self.finished_phases += 1;
        }
    }

    /// Number of phases completed so far
    pub const fn finished_phases(&self) -> usize {
        self.finished_phases
    }

    /// Whether a phase bar is currently shown
    pub const fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Complete the active bar and clear it from the terminal
    pub fn finish(&mut self) {
        if let Some(bar) = self.current.take() {
            bar.finish_and_clear();
            self.finished_phases += 1;
        }
    }
}
