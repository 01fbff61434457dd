//! Album-level driver.
//!
//! Prepares the directory tree, clears leftovers from interrupted runs, saves the cover once
//! and then runs every track through a bounded pool of workers, waiting until each one has
//! reached a terminal state.

use crate::catalog::AlbumMetadata;
use crate::configuration::RunConfig;
use crate::download::cover::{fetch_cover, save_cover, CoverSave};
use crate::download::layout::album_dir;
use crate::download::{AudioRetriever, CoverImage, DownloadOutcome, TrackProcessor, TrackStage};
use crate::foundation::Logger;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use std::{fs, io};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use walkdir::WalkDir;

/// Tally of one album run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumReport {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl AlbumReport {
    fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Succeeded => self.succeeded += 1,
            DownloadOutcome::Skipped => self.skipped += 1,
            DownloadOutcome::Failed { .. } => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }
}

pub struct AlbumDownloader {
    http: Client,
    retriever: Arc<dyn AudioRetriever>,
    logger: Logger,
}

impl AlbumDownloader {
    pub fn new(http: Client, retriever: Arc<dyn AudioRetriever>, logger: Logger) -> Self {
        Self {
            http,
            retriever,
            logger,
        }
    }

    /// Fetches the album cover, returning `None` when there is no URL or the fetch fails.
    pub async fn fetch_cover(&self, url: Option<&str>) -> Option<CoverImage> {
        let url = url?;
        self.logger.out("Getting Album Cover...");

        match fetch_cover(&self.http, url).await {
            Ok(cover) => Some(cover),
            Err(e) => {
                log::warn!("Could not fetch cover from {url}: {e}");
                None
            }
        }
    }

    /// Downloads every track of `album`.
    ///
    /// Only failing to create the output directories is an error; individual tracks that fail
    /// are counted in the returned [`AlbumReport`]. A `cover` fetched earlier (for a preview,
    /// say) is reused, otherwise the cover is fetched here.
    pub async fn download_album(
        &self,
        album: &AlbumMetadata,
        config: &RunConfig,
        cover: Option<CoverImage>,
    ) -> io::Result<AlbumReport> {
        let album_dir = album_dir(&config.output_dir, album);
        for dir in [&config.output_dir, &album_dir, &config.cover_dir, &config.temp_dir] {
            tokio::fs::create_dir_all(dir).await?;
        }

        let temp_dir = config.temp_dir.clone();
        match tokio::task::spawn_blocking(move || purge_dir(&temp_dir)).await {
            Ok(removed) => log::debug!("Purged {removed} leftover entries from the temp directory"),
            Err(e) => log::warn!("Temp directory purge was interrupted: {e}"),
        }

        self.logger
            .out(format!("Starting Download: {} - {}", album.artist, album.title));

        let cover = match cover {
            Some(cover) => Some(cover),
            None => self.fetch_cover(album.cover_url.as_deref()).await,
        };
        match save_cover(cover.as_ref(), &album.artist, &album.title, &config.cover_dir).await {
            Ok(CoverSave::NoCover) => {}
            Ok(_) => self.logger.out("Cover Saved..."),
            Err(e) => log::warn!("Could not save cover: {e}"),
        }

        let started = Instant::now();
        let mut report = self.run_tracks(album, config, cover).await;
        report.elapsed = started.elapsed();

        self.logger
            .out(format!("Stopped after {}", format_elapsed(report.elapsed)));
        self.logger
            .out(format!("{}\nFINISHED DOWNLOADING ALBUM", "=".repeat(10)));

        Ok(report)
    }

    async fn run_tracks(
        &self,
        album: &AlbumMetadata,
        config: &RunConfig,
        cover: Option<CoverImage>,
    ) -> AlbumReport {
        let processor = TrackProcessor::new(
            Arc::new(album.clone()),
            Arc::new(config.clone()),
            cover,
            Arc::clone(&self.retriever),
            self.logger.clone(),
        );
        let permits = Arc::new(Semaphore::new(config.max_concurrency.max(1)));
        let mut workers = JoinSet::new();

        self.logger.run_started(album.tracks.len());
        for track in album.tracks.iter().cloned() {
            let processor = processor.clone();
            let permits = Arc::clone(&permits);

            workers.spawn(async move {
                let Ok(_permit) = permits.acquire().await else {
                    return DownloadOutcome::Failed {
                        stage: TrackStage::Pending,
                        reason: "worker pool closed".into(),
                    };
                };
                processor.process(&track).await
            });
        }

        let mut report = AlbumReport::default();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(outcome) => report.record(&outcome),
                Err(e) => {
                    self.logger.out(format!("Error processing track: {e}"));
                    report.failed += 1;
                }
            }
            self.logger.track_finished();
        }

        report
    }
}

/// Removes every entry directly under `dir`, ignoring entries that cannot be removed.
fn purge_dir(dir: &Path) -> usize {
    let entries: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .map(|entry| entry.into_path())
        .collect();

    entries
        .into_iter()
        .filter(|path| {
            let removed = if path.is_dir() {
                fs::remove_dir_all(path)
            } else {
                fs::remove_file(path)
            };
            if let Err(e) = &removed {
                log::debug!("Could not remove {}: {e}", path.display());
            }
            removed.is_ok()
        })
        .count()
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{} minutes and {} seconds", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "0 minutes and 0 seconds");
        assert_eq!(format_elapsed(Duration::from_millis(125_900)), "2 minutes and 5 seconds");
    }

    #[test]
    fn test_purge_dir_removes_files_and_directories() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("old.mp3")).unwrap();
        File::create(dir.path().join("old.webm.part")).unwrap();
        fs::create_dir_all(dir.path().join("nested/deeper")).unwrap();
        File::create(dir.path().join("nested/deeper/x")).unwrap();

        assert_eq!(purge_dir(dir.path()), 3);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
        assert!(dir.path().exists());
    }

    #[test]
    fn test_purge_missing_dir_is_noop() {
        let dir = TempDir::new().unwrap();
        assert_eq!(purge_dir(&dir.path().join("missing")), 0);
    }

    #[test]
    fn test_report_record() {
        let mut report = AlbumReport::default();
        report.record(&DownloadOutcome::Succeeded);
        report.record(&DownloadOutcome::Skipped);
        report.record(&DownloadOutcome::Failed {
            stage: TrackStage::Downloading,
            reason: "x".into(),
        });

        assert_eq!((report.succeeded, report.skipped, report.failed), (1, 1, 1));
        assert_eq!(report.total(), 3);
    }
}
