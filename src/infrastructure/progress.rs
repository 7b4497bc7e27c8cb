//! Progress sinks for batch scoring

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::info;

use crate::domain::services::ProgressSink;

/// Logs each percentage change at info level
#[derive(Debug, Default)]
pub struct LogProgressSink {
    last: Option<u8>,
}

impl LogProgressSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressSink for LogProgressSink {
    fn report(&mut self, percent: u8) {
        if self.last == Some(percent) {
            return;
        }
        self.last = Some(percent);
        info!("📊 Scoring progress: {}%", percent);
    }
}

/// Percentage bar on stderr
pub struct TerminalProgressSink {
    bar: ProgressBar,
}

impl TerminalProgressSink {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(12));
        bar.set_message("scoring recalls");
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}

impl Default for TerminalProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for TerminalProgressSink {
    fn report(&mut self, percent: u8) {
        self.bar.set_position(u64::from(percent.min(100)));
    }
}
