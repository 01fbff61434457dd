mod cover;
mod download_error;
pub mod layout;
mod orchestrator;
mod retriever;
mod tagger;
mod track;

pub use cover::{fetch_cover, save_cover, shrink_cover, CoverImage, CoverSave, MAX_COVER_BYTES};
pub use download_error::{CoverError, RetrievalError, TrackError};
pub use orchestrator::{AlbumDownloader, AlbumReport};
pub use retriever::{AudioRetriever, YtDlpRetriever};
pub use tagger::{write_tags, TrackTags};
pub use track::{DownloadOutcome, TrackProcessor, TrackStage};

#[cfg(test)]
pub use retriever::MockAudioRetriever;
