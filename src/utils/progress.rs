use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Receiver of human-readable progress lines from an import.
pub trait ProgressOutput {
    fn println(&self, message: &str);

    fn set_message(&self, _message: &str) {}

    fn increment(&self, _delta: u64) {}
}

pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    silent: bool,
}

impl ProgressReporter {
    pub fn new(total: u64, message: &str, silent: bool) -> Self {
        if silent {
            Self {
                progress_bar: None,
                silent: true,
            }
        } else {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb.set_message(message.to_string());
            pb.enable_steady_tick(Duration::from_millis(100));

            Self {
                progress_bar: Some(pb),
                silent: false,
            }
        }
    }

    /// Reporter that prints lines but draws no bar
    pub fn plain() -> Self {
        Self {
            progress_bar: None,
            silent: false,
        }
    }

    pub fn increment(&self, delta: u64) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(delta);
        }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(message.to_string());
        }
    }

    pub fn finish_with_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_with_message(message.to_string());
        }
    }

    pub fn println(&self, message: &str) {
        if !self.silent {
            match self.progress_bar {
                Some(ref pb) if !pb.is_hidden() => pb.println(message),
                _ => println!("{}", message),
            }
        }
    }
}

impl ProgressOutput for ProgressReporter {
    fn println(&self, message: &str) {
        ProgressReporter::println(self, message);
    }

    fn set_message(&self, message: &str) {
        ProgressReporter::set_message(self, message);
    }

    fn increment(&self, delta: u64) {
        ProgressReporter::increment(self, delta);
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish();
        }
    }
}
