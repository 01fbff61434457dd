use crate::download::TrackStage;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("downloader exited with {0}")]
    ExitStatus(ExitStatus),

    #[error("downloader timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum CoverError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("cover server returned status {0}")]
    Status(u16),
}

/// Failure of a single track; never escapes the track's worker.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error("no audio file was produced at {}", .0.display())]
    MissingAudio(PathBuf),

    #[error("failed to move track into place: {0}")]
    Relocate(#[source] io::Error),
}

impl TrackError {
    /// Stage the track was in when it failed.
    pub fn stage(&self) -> TrackStage {
        match self {
            TrackError::Retrieval(_) | TrackError::MissingAudio(_) => TrackStage::Downloading,
            TrackError::Relocate(_) => TrackStage::Relocating,
        }
    }
}
