//! Human-readable progress narration shared by every download worker.
//!
//! A [`Logger`] wraps a [`LogSink`] behind a mutex so lines emitted from concurrent track
//! workers never interleave. Sinks decide where lines end up: the console, an `indicatif`
//! progress bar, a UI callback, or nowhere at all.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex, PoisonError};

/// Destination for narration lines.
pub trait LogSink: Send + Sync {
    fn emit(&self, line: &str);

    /// Called once an album run knows how many tracks it will process.
    fn run_started(&self, _tracks: usize) {}

    /// Called each time a track reaches a terminal state.
    fn track_finished(&self) {}
}

/// Clonable, thread-safe handle to a [`LogSink`].
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    lock: Arc<Mutex<()>>,
}

impl Logger {
    pub fn new(sink: impl LogSink + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn console() -> Self {
        Self::new(ConsoleSink)
    }

    pub fn silent() -> Self {
        Self::new(SilentSink)
    }

    /// Emits one line. Callers on other threads wait until the line is fully written.
    pub fn out(&self, line: impl AsRef<str>) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.sink.emit(line.as_ref());
    }

    pub(crate) fn run_started(&self, tracks: usize) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.sink.run_started(tracks);
    }

    pub(crate) fn track_finished(&self) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.sink.track_finished();
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::console()
    }
}

/// Prints every line to stdout.
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn emit(&self, line: &str) {
        println!("{line}");
    }
}

/// Discards everything.
pub struct SilentSink;

impl LogSink for SilentSink {
    fn emit(&self, _line: &str) {}
}

/// Forwards lines to a callback, e.g. a UI event channel.
pub struct FnSink<F>(pub F);

impl<F> LogSink for FnSink<F>
where
    F: Fn(&str) + Send + Sync,
{
    fn emit(&self, line: &str) {
        (self.0)(line)
    }
}

/// Prints lines above a progress bar that counts finished tracks.
pub struct ProgressSink {
    bar: ProgressBar,
}

impl ProgressSink {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{elapsed_precise} [{bar:40.cyan/blue}] {pos}/{len} tracks")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        Self { bar }
    }
}

impl Default for ProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for ProgressSink {
    fn emit(&self, line: &str) {
        // A hidden bar swallows println output, e.g. when stderr is not a terminal.
        if self.bar.is_hidden() {
            println!("{line}");
        } else {
            self.bar.println(line);
        }
    }

    fn run_started(&self, tracks: usize) {
        self.bar.reset();
        self.bar.set_length(tracks as u64);
    }

    fn track_finished(&self) {
        self.bar.inc(1);
        if self.bar.length() == Some(self.bar.position()) {
            self.bar.finish();
        }
    }
}
