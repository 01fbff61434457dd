//! Hand-off to the external program that turns a track identifier into an audio file.

use crate::download::RetrievalError;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AudioRetriever: Send + Sync {
    /// Fetches the audio for `track_id` and writes it to `output`.
    async fn retrieve(&self, track_id: &str, output: &Path) -> Result<(), RetrievalError>;
}

/// Runs `yt-dlp` once per track, extracting the best audio stream transcoded to MP3.
#[derive(Debug, Clone)]
pub struct YtDlpRetriever {
    program: PathBuf,
    ffmpeg_location: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl YtDlpRetriever {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ffmpeg_location: None,
            timeout: None,
        }
    }

    pub fn with_ffmpeg_location(mut self, location: Option<PathBuf>) -> Self {
        self.ffmpeg_location = location;
        self
    }

    /// Kills the downloader if it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn arguments(&self, track_id: &str, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-x",
            "--audio-quality",
            "0",
            "--no-check-certificates",
            "-f",
            "ba[acodec^=mp3]/ba/b",
            "--audio-format",
            "mp3",
        ]
        .into_iter()
        .map(OsString::from)
        .collect();

        if let Some(location) = &self.ffmpeg_location {
            args.push("--ffmpeg-location".into());
            args.push(location.into());
        }

        // yt-dlp picks the extension itself; the template makes it land on `output`.
        args.push("-o".into());
        args.push(output.with_extension("%(ext)s").into());
        args.push(format!("{WATCH_URL}{track_id}").into());
        args
    }
}

#[async_trait]
impl AudioRetriever for YtDlpRetriever {
    async fn retrieve(&self, track_id: &str, output: &Path) -> Result<(), RetrievalError> {
        let mut command = Command::new(&self.program);
        command
            .args(self.arguments(track_id, output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        #[cfg(windows)]
        {
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        let mut child = command.spawn().map_err(|source| RetrievalError::Launch {
            program: self.program.display().to_string(),
            source,
        })?;

        let waited = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(waited) => waited,
                Err(_) => {
                    if let Err(e) = child.kill().await {
                        log::warn!("Failed to kill downloader for {track_id}: {e}");
                    }
                    return Err(RetrievalError::Timeout(limit));
                }
            },
            None => child.wait().await,
        };

        let status = waited.map_err(|e| RetrievalError::Other(e.to_string()))?;
        if !status.success() {
            return Err(RetrievalError::ExitStatus(status));
        }

        Ok(())
    }
}
