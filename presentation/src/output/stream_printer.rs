//! Streams reading chunks to the terminal

use arcana_application::ReadingProgress;
use arcana_domain::DivinationKind;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

/// Prints chunks to stdout as they arrive.
///
/// A spinner runs from the start of the reading until the first chunk (or
/// the sentinel) shows up.
pub struct StreamPrinter {
    show_spinner: bool,
    spinner: Mutex<Option<ProgressBar>>,
}

impl StreamPrinter {
    pub fn new() -> Self {
        Self {
            show_spinner: true,
            spinner: Mutex::new(None),
        }
    }

    /// Set whether to show the waiting spinner
    pub fn with_spinner(mut self, show: bool) -> Self {
        self.show_spinner = show;
        self
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.magenta} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn clear_spinner(&self) {
        if let Ok(mut spinner) = self.spinner.lock() {
            if let Some(pb) = spinner.take() {
                pb.finish_and_clear();
            }
        }
    }

    fn write(text: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "{}", text);
        let _ = stdout.flush();
    }
}

impl Default for StreamPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingProgress for StreamPrinter {
    fn on_reading_start(&self, kind: DivinationKind) {
        if !self.show_spinner {
            return;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_message(format!("{} 正在连接灵能网络...", kind.display_name()));
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut spinner) = self.spinner.lock() {
            *spinner = Some(pb);
        }
    }

    fn on_chunk(&self, chunk: &str) {
        self.clear_spinner();
        Self::write(chunk);
    }

    fn on_interrupted(&self, sentinel: &str) {
        self.clear_spinner();
        Self::write(&sentinel.red().to_string());
    }

    fn on_reading_end(&self) {
        self.clear_spinner();
        Self::write("\n");
    }
}
