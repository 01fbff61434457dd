//! Per-track pipeline: skip if present, download, tag, move into place.
//!
//! Every failure is contained here. A track that fails is reported through its
//! [`DownloadOutcome`] and the log; it never affects sibling tracks.

use crate::catalog::{AlbumMetadata, TrackMetadata};
use crate::configuration::RunConfig;
use crate::download::layout::{final_track_path, temp_track_path};
use crate::download::tagger::{write_tags, TrackTags};
use crate::download::{AudioRetriever, CoverImage, TrackError};
use crate::foundation::Logger;
use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// Stages a track moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackStage {
    Pending,
    Downloading,
    Tagging,
    Relocating,
    Done,
}

impl fmt::Display for TrackStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TrackStage::Pending => "pending",
            TrackStage::Downloading => "downloading",
            TrackStage::Tagging => "tagging",
            TrackStage::Relocating => "relocating",
            TrackStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Terminal state of one track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Skipped,
    Succeeded,
    Failed { stage: TrackStage, reason: String },
}

/// Everything a worker needs to process tracks of one album run.
#[derive(Clone)]
pub struct TrackProcessor {
    album: Arc<AlbumMetadata>,
    config: Arc<RunConfig>,
    cover: Option<CoverImage>,
    retriever: Arc<dyn AudioRetriever>,
    logger: Logger,
}

impl TrackProcessor {
    pub fn new(
        album: Arc<AlbumMetadata>,
        config: Arc<RunConfig>,
        cover: Option<CoverImage>,
        retriever: Arc<dyn AudioRetriever>,
        logger: Logger,
    ) -> Self {
        Self {
            album,
            config,
            cover,
            retriever,
            logger,
        }
    }

    pub async fn process(&self, track: &TrackMetadata) -> DownloadOutcome {
        let final_path = final_track_path(&self.config.output_dir, &self.album, track);
        if final_path.exists() {
            self.logger.out(format!("Skipping (Exists): {}", track.title));
            return DownloadOutcome::Skipped;
        }

        match self.run_stages(track, &final_path).await {
            Ok(()) => {
                self.logger.out(format!("Finished: {}", track.title));
                DownloadOutcome::Succeeded
            }
            Err(e) => {
                self.logger
                    .out(format!("Error processing {}: {}", track.title, e));
                DownloadOutcome::Failed {
                    stage: e.stage(),
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn run_stages(&self, track: &TrackMetadata, final_path: &Path) -> Result<(), TrackError> {
        let temp_path = temp_track_path(&self.config.temp_dir, &track.id);

        self.logger.out(format!("Downloading: {}", track.title));
        self.retriever.retrieve(&track.id, &temp_path).await?;
        if !temp_path.is_file() {
            return Err(TrackError::MissingAudio(temp_path));
        }

        self.logger.out(format!("Tagging: {}", track.title));
        self.tag(track, &temp_path).await;

        relocate(&temp_path, final_path)
            .await
            .map_err(TrackError::Relocate)
    }

    /// Tagging problems are logged; the file is delivered either way.
    async fn tag(&self, track: &TrackMetadata, path: &Path) {
        let tags = TrackTags::new(&self.album, track);
        let cover = self.cover.clone();
        let path = path.to_path_buf();

        let tagged = tokio::task::spawn_blocking(move || {
            write_tags(&path, &tags, cover.as_ref().map(CoverImage::as_bytes))
        })
        .await;

        let error = match tagged {
            Ok(Ok(())) => return,
            Ok(Err(e)) => e.to_string(),
            Err(e) => e.to_string(),
        };
        self.logger
            .out(format!("Tagging Error on {}: {}", track.title, error));
    }
}

/// Moves `from` to `to`, copying when a rename is impossible (e.g. across filesystems).
async fn relocate(from: &Path, to: &Path) -> io::Result<()> {
    if let Err(e) = tokio::fs::rename(from, to).await {
        log::debug!("Rename of {} failed ({e}), copying instead", from.display());
        tokio::fs::copy(from, to).await?;
        tokio::fs::remove_file(from).await?;
    }
    Ok(())
}
