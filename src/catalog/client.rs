//! Metadata lookup against the streaming catalog.
//!
//! The catalog is an external service: given an album browse id it returns the album JSON
//! (title, artists, year, type, thumbnails and the track list). This module turns that
//! response into [`AlbumMetadata`] and hides the transport behind [`CatalogClient`] so the
//! download pipeline never depends on a concrete service handle.

use crate::catalog::{parse_source, AlbumMetadata, CatalogError, CatalogSource, TrackMetadata};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::sync::OnceLock;

/// Size requested for cover art when the catalog serves sized thumbnails.
const COVER_DIMENSIONS: &str = "w1200-h1200";

#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Resolves a user-supplied URL or album id into album metadata.
    async fn lookup(&self, input: &str) -> Result<AlbumMetadata, CatalogError>;
}

/// [`CatalogClient`] backed by an HTTP metadata service.
///
/// Endpoints, relative to `base_url`:
///
/// * `GET /album_browse_id/{playlist_id}` returns `{"browseId": "MPREb_..."}`
/// * `GET /album/{browse_id}` returns the album JSON
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value, CatalogError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.json().await?)
    }

    async fn resolve_browse_id(&self, playlist_id: &str) -> Result<String, CatalogError> {
        let url = format!("{}/album_browse_id/{}", self.base_url, playlist_id);
        let response = self.get_json(&url).await?;

        response["browseId"]
            .as_str()
            .map(str::to_string)
            .ok_or(CatalogError::MissingField("browseId"))
    }
}

#[async_trait]
impl CatalogClient for HttpCatalog {
    async fn lookup(&self, input: &str) -> Result<AlbumMetadata, CatalogError> {
        let browse_id = match parse_source(input)? {
            CatalogSource::AlbumBrowse(id) => id,
            CatalogSource::AlbumPlaylist(id) => self.resolve_browse_id(&id).await?,
            CatalogSource::Playlist(id) => return Err(CatalogError::PlaylistUnsupported(id)),
        };

        log::debug!("Fetching album {browse_id} from {}", self.base_url);
        let url = format!("{}/album/{}", self.base_url, browse_id);
        parse_album(self.get_json(&url).await?)
    }
}

/// Reads album JSON, in the same shape the catalog serves, from a local file.
pub fn load_album_file(path: &Path) -> Result<AlbumMetadata, CatalogError> {
    let contents = std::fs::read_to_string(path)?;
    parse_album(serde_json::from_str(&contents)?)
}

#[derive(Debug, Deserialize)]
struct RawAlbum {
    title: Option<String>,
    artists: Option<Vec<RawArtist>>,
    year: Option<Value>,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(rename = "trackCount")]
    track_count: Option<usize>,
    thumbnails: Option<Vec<RawThumbnail>>,
    tracks: Option<Vec<RawTrack>>,
}

#[derive(Debug, Deserialize)]
struct RawArtist {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawThumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
    title: Option<String>,
    artists: Option<Vec<RawArtist>>,
    #[serde(rename = "isAvailable")]
    is_available: Option<bool>,
    #[serde(rename = "trackNumber")]
    track_number: Option<u32>,
}

/// Maps a catalog album response onto [`AlbumMetadata`].
pub fn parse_album(value: Value) -> Result<AlbumMetadata, CatalogError> {
    let raw: RawAlbum = serde_json::from_value(value)?;
    let title = raw.title.ok_or(CatalogError::MissingField("title"))?;

    let tracks: Vec<TrackMetadata> = raw
        .tracks
        .unwrap_or_default()
        .into_iter()
        .filter_map(|track| {
            let Some(id) = track.video_id.filter(|id| !id.is_empty()) else {
                log::warn!(
                    "Dropping track without an identifier: {}",
                    track.title.as_deref().unwrap_or("<untitled>")
                );
                return None;
            };
            Some(TrackMetadata {
                id,
                title: track.title.unwrap_or_default(),
                artists: artist_names(track.artists),
                is_available: track.is_available.unwrap_or(true),
                track_number: track.track_number,
            })
        })
        .collect();

    Ok(AlbumMetadata {
        title,
        artist: artist_names(raw.artists).join(", "),
        year: raw.year.and_then(year_text),
        kind: raw.kind.unwrap_or_default().to_lowercase(),
        cover_url: raw
            .thumbnails
            .and_then(|thumbs| thumbs.into_iter().next())
            .map(|thumb| upscale_cover_url(&thumb.url)),
        track_count: raw.track_count.unwrap_or(tracks.len()),
        tracks,
    })
}

fn artist_names(artists: Option<Vec<RawArtist>>) -> Vec<String> {
    artists
        .unwrap_or_default()
        .into_iter()
        .filter_map(|artist| artist.name)
        .collect()
}

fn year_text(year: Value) -> Option<String> {
    match year {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Rewrites the size segment of a thumbnail URL so the full-size cover is requested.
fn upscale_cover_url(url: &str) -> String {
    static SIZE: OnceLock<Regex> = OnceLock::new();
    let size = SIZE.get_or_init(|| Regex::new(r"w\d+-h\d+").unwrap());
    size.replace_all(url, COVER_DIMENSIONS).into_owned()
}
