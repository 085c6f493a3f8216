use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// A terminal spinner for indicating progress.
///
/// Automatically clears itself when dropped (RAII pattern).
pub struct Spinner {
    progress_bar: ProgressBar,
}

impl Spinner {
    /// Creates and starts a new spinner with the given message.
    ///
    /// A hidden spinner draws nothing, which is what quiet mode uses.
    #[allow(clippy::unwrap_used)]
    pub fn new(message: &str, visible: bool) -> Self {
        let progress_bar = if visible {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        // unwrap is safe: template string is a compile-time constant
        progress_bar.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
                .template("{spinner} {msg}")
                .unwrap(),
        );
        progress_bar.set_message(message.to_string());
        progress_bar.enable_steady_tick(Duration::from_millis(80));

        Self { progress_bar }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.progress_bar.finish_and_clear();
    }
}

/// A bar counting finished files, for multi-file transfers.
#[derive(Clone)]
pub struct TransferBar {
    progress_bar: ProgressBar,
}

impl TransferBar {
    #[allow(clippy::unwrap_used)]
    pub fn new(total: u64, visible: bool) -> Self {
        let progress_bar = if visible {
            ProgressBar::new(total)
        } else {
            ProgressBar::hidden()
        };
        // unwrap is safe: template string is a compile-time constant
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{bar:30} {pos}/{len} {msg}")
                .unwrap(),
        );
        Self { progress_bar }
    }

    /// Prints a line above the bar without tearing it.
    pub fn println(&self, line: &str) {
        self.progress_bar.suspend(|| println!("{line}"));
    }

    pub fn eprintln(&self, line: &str) {
        self.progress_bar.suspend(|| eprintln!("{line}"));
    }

    pub fn inc(&self) {
        self.progress_bar.inc(1);
    }

    pub fn finish(&self) {
        self.progress_bar.finish_and_clear();
    }
}
