pub mod logger;
pub mod utils;

pub use logger::{ConsoleSink, FnSink, LogSink, Logger, ProgressSink, SilentSink};
