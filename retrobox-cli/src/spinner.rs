//! Progress display for a refresh or execute batch.
//!
//! Driven from the foreground by the [`ProgressEvent`]s a worker sends; the
//! worker never touches the bar.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use retrobox_lib::ProgressEvent;

pub(crate) struct BatchProgress {
    bar: ProgressBar,
    label: String,
}

impl BatchProgress {
    /// When `quiet` is true, the bar is hidden.
    pub(crate) fn new(quiet: bool, label: impl Into<String>) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template("  {spinner:.cyan} [{pos}/{len}] {msg}")
                    .expect("static pattern")
                    .tick_chars("/-\\|"),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        Self {
            bar,
            label: label.into(),
        }
    }

    pub(crate) fn handle(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { total } => {
                self.bar.set_length(*total as u64);
                self.bar.set_position(0);
                self.bar.set_message(self.label.clone());
            }
            ProgressEvent::Item {
                name,
                current,
                total,
            } => {
                self.bar.set_length(*total as u64);
                self.bar.set_position(current.saturating_sub(1) as u64);
                self.bar.set_message(format!("{}: {}", self.label, name));
            }
            ProgressEvent::Finished => {
                if let Some(len) = self.bar.length() {
                    self.bar.set_position(len);
                }
            }
            ProgressEvent::Interrupted => {
                self.bar
                    .suspend(|| log::warn!("{} interrupted", self.label));
            }
            ProgressEvent::Failed { message } => {
                self.bar
                    .suspend(|| log::error!("{} failed: {}", self.label, message));
            }
        }
    }

    /// Stop ticking and clear the line.
    pub(crate) fn finish(&self) {
        self.bar.disable_steady_tick();
        self.bar.finish_and_clear();
    }
}
