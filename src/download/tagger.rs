use crate::catalog::{AlbumMetadata, TrackMetadata};
use id3::frame::{Picture, PictureType};
use id3::{Error, ErrorKind, Frame, Tag, TagLike, Version};
use image::ImageFormat;
use std::path::Path;

/// Text frames written to every downloaded track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackTags {
    pub title: String,
    pub artist: String,
    pub album_artist: String,
    pub album: String,
    pub year: Option<String>,
    pub track_number: Option<u32>,
}

impl TrackTags {
    pub fn new(album: &AlbumMetadata, track: &TrackMetadata) -> Self {
        Self {
            title: track.title.clone(),
            artist: track.artist_tag(),
            album_artist: track.artist_display(),
            album: album.title.clone(),
            year: album.year.clone(),
            track_number: track.track_number,
        }
    }
}

/// Writes `tags` into the ID3v2.3 tag of the file at `path`, creating the tag if needed.
///
/// The year goes into both `TYER` and `TDRC` so players reading either version find it.
/// When `cover` is given it becomes the only attached picture.
pub fn write_tags(path: &Path, tags: &TrackTags, cover: Option<&[u8]>) -> Result<(), Error> {
    let mut tag = match Tag::read_from_path(path) {
        Ok(tag) => tag,
        Err(Error {
            kind: ErrorKind::NoTag,
            ..
        }) => Tag::new(),
        Err(err) => return Err(err),
    };

    tag.set_title(tags.title.as_str());
    tag.set_artist(tags.artist.as_str());
    tag.set_album_artist(tags.album_artist.as_str());
    tag.set_album(tags.album.as_str());
    if let Some(year) = &tags.year {
        tag.add_frame(Frame::text("TYER", year.as_str()));
        tag.add_frame(Frame::text("TDRC", year.as_str()));
    }
    if let Some(number) = tags.track_number {
        tag.set_track(number);
    }

    if let Some(cover) = cover {
        tag.remove_all_pictures();
        tag.add_frame(Picture {
            mime_type: cover_mime_type(cover).to_string(),
            picture_type: PictureType::CoverFront,
            description: String::new(),
            data: cover.to_vec(),
        });
    }

    tag.write_to_path(path, Version::Id3v23)
}

fn cover_mime_type(cover: &[u8]) -> &'static str {
    match image::guess_format(cover) {
        Ok(ImageFormat::Png) => "image/png",
        _ => "image/jpeg",
    }
}
