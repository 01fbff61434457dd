//! Where an album run puts things on disk.

use crate::catalog::{AlbumMetadata, TrackMetadata};
use crate::foundation::utils::sanitize;
use std::path::{Path, PathBuf};

pub const AUDIO_EXTENSION: &str = "mp3";

/// `"{artist} - {album}"`, sanitized. Names both the album directory and the cover file.
pub fn album_stem(album: &AlbumMetadata) -> String {
    format!("{} - {}", sanitize(album.artist.as_str()), sanitize(album.title.as_str()))
}

pub fn album_dir(output_dir: &Path, album: &AlbumMetadata) -> PathBuf {
    output_dir.join(album_stem(album))
}

/// `"{number}. {artists} - {title}.mp3"`, each part sanitized on its own.
pub fn track_file_name(track: &TrackMetadata) -> String {
    format!(
        "{}. {} - {}.{}",
        sanitize(track.track_number_text().as_str()),
        sanitize(track.artist_display().as_str()),
        sanitize(track.title.as_str()),
        AUDIO_EXTENSION
    )
}

pub fn final_track_path(output_dir: &Path, album: &AlbumMetadata, track: &TrackMetadata) -> PathBuf {
    album_dir(output_dir, album).join(track_file_name(track))
}

/// Working file for a track, keyed by its identifier so workers never share a path.
pub fn temp_track_path(temp_dir: &Path, track_id: &str) -> PathBuf {
    temp_dir.join(format!("{track_id}.{AUDIO_EXTENSION}"))
}

pub fn cover_path(cover_dir: &Path, artist: &str, album_title: &str) -> PathBuf {
    cover_dir.join(format!("{} - {}.jpg", sanitize(artist), sanitize(album_title)))
}
