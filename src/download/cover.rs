//! Album cover retrieval and persistence. Both are best effort: callers log failures and carry
//! on without a cover.

use crate::download::layout::cover_path;
use crate::download::CoverError;
use image::codecs::jpeg::JpegEncoder;
use reqwest::Client;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Largest cover embedded as-is; anything bigger is re-encoded.
pub const MAX_COVER_BYTES: usize = 500 * 1024;

const JPEG_QUALITY: u8 = 85;

/// Cover image bytes, shared read-only by every track worker.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverImage(Arc<[u8]>);

impl CoverImage {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Downloads the cover at `url`, shrinking it when it exceeds [`MAX_COVER_BYTES`].
pub async fn fetch_cover(client: &Client, url: &str) -> Result<CoverImage, CoverError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CoverError::Status(status.as_u16()));
    }

    let original: Arc<[u8]> = response.bytes().await?.to_vec().into();
    if original.len() <= MAX_COVER_BYTES {
        return Ok(CoverImage(original));
    }

    let input = Arc::clone(&original);
    match tokio::task::spawn_blocking(move || shrink_cover(input.to_vec())).await {
        Ok(shrunk) => Ok(CoverImage::new(shrunk)),
        Err(e) => {
            log::warn!("Cover re-encoding was interrupted: {e}");
            Ok(CoverImage(original))
        }
    }
}

/// Re-encodes an oversized cover as an RGB JPEG at quality 85.
///
/// Covers within budget, and covers that cannot be decoded or encoded, come back unchanged.
/// The re-encoded cover is only used when it is smaller than the original.
pub fn shrink_cover(bytes: Vec<u8>) -> Vec<u8> {
    if bytes.len() <= MAX_COVER_BYTES {
        return bytes;
    }

    match reencode_jpeg(&bytes) {
        Ok(encoded) => keep_smaller(bytes, encoded),
        Err(e) => {
            log::debug!("Keeping oversized cover, re-encoding failed: {e}");
            bytes
        }
    }
}

fn keep_smaller(original: Vec<u8>, encoded: Vec<u8>) -> Vec<u8> {
    if encoded.len() >= original.len() {
        log::debug!(
            "Keeping original cover, re-encoding grew it from {} to {} bytes",
            original.len(),
            encoded.len()
        );
        return original;
    }

    log::debug!("Re-encoded cover from {} to {} bytes", original.len(), encoded.len());
    if encoded.len() > MAX_COVER_BYTES {
        log::debug!("Re-encoded cover is still over the {MAX_COVER_BYTES} byte budget");
    }
    encoded
}

fn reencode_jpeg(bytes: &[u8]) -> image::ImageResult<Vec<u8>> {
    let rgb = image::load_from_memory(bytes)?.to_rgb8();
    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY).encode_image(&rgb)?;
    Ok(encoded)
}

/// Result of [`save_cover`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverSave {
    Written(PathBuf),
    AlreadyExists(PathBuf),
    NoCover,
}

/// Writes the cover to `{dir}/{artist} - {album}.jpg` unless that file already exists.
pub async fn save_cover(
    cover: Option<&CoverImage>,
    artist: &str,
    album_title: &str,
    dir: &Path,
) -> io::Result<CoverSave> {
    let Some(cover) = cover.filter(|cover| !cover.is_empty()) else {
        return Ok(CoverSave::NoCover);
    };

    let path = cover_path(dir, artist, album_title);
    if tokio::fs::try_exists(&path).await? {
        return Ok(CoverSave::AlreadyExists(path));
    }

    tokio::fs::write(&path, cover.as_bytes()).await?;
    Ok(CoverSave::Written(path))
}
