use crate::catalog::CatalogError;
use regex::Regex;
use std::sync::OnceLock;

/// What a user-supplied URL or identifier points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Album addressed through its public playlist id (`OLAK5uy_...`); must be resolved to a
    /// browse id before the album can be fetched.
    AlbumPlaylist(String),
    /// Album addressed directly by its browse id (`MPREb_...`).
    AlbumBrowse(String),
    Playlist(String),
}

struct Patterns {
    album_playlist: Regex,
    album_browse: Regex,
    playlist: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        album_playlist: Regex::new(r"(?:^|list=)(OLAK5uy_[\w-]+)").unwrap(),
        album_browse: Regex::new(r"(?:^|list=|browse/)(MPREb_[\w-]+)").unwrap(),
        playlist: Regex::new(r"list=(PL[\w-]+)").unwrap(),
    })
}

/// Classifies a catalog URL, or a bare album id, into a [`CatalogSource`].
///
/// ```
/// use musicdl::catalog::{parse_source, CatalogSource};
///
/// let source = parse_source("https://music.youtube.com/playlist?list=OLAK5uy_abc123").unwrap();
/// assert_eq!(source, CatalogSource::AlbumPlaylist("OLAK5uy_abc123".into()));
/// ```
pub fn parse_source(input: &str) -> Result<CatalogSource, CatalogError> {
    let input = input.trim();
    let patterns = patterns();

    if let Some(cap) = patterns.album_browse.captures(input) {
        return Ok(CatalogSource::AlbumBrowse(cap[1].to_string()));
    }
    if let Some(cap) = patterns.album_playlist.captures(input) {
        return Ok(CatalogSource::AlbumPlaylist(cap[1].to_string()));
    }
    if let Some(cap) = patterns.playlist.captures(input) {
        return Ok(CatalogSource::Playlist(cap[1].to_string()));
    }

    Err(CatalogError::UnparseableUrl(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_playlist_url() {
        let source =
            parse_source("https://music.youtube.com/playlist?list=OLAK5uy_kQz-9x&si=share").unwrap();
        assert_eq!(source, CatalogSource::AlbumPlaylist("OLAK5uy_kQz-9x".into()));
    }

    #[test]
    fn test_album_browse_url_and_bare_id() {
        assert_eq!(
            parse_source("https://music.youtube.com/playlist?list=MPREb_Abc").unwrap(),
            CatalogSource::AlbumBrowse("MPREb_Abc".into())
        );
        assert_eq!(
            parse_source("https://music.youtube.com/browse/MPREb_Xyz_1").unwrap(),
            CatalogSource::AlbumBrowse("MPREb_Xyz_1".into())
        );
        assert_eq!(
            parse_source("  MPREb_Bare  ").unwrap(),
            CatalogSource::AlbumBrowse("MPREb_Bare".into())
        );
    }

    #[test]
    fn test_playlist_url() {
        assert_eq!(
            parse_source("https://music.youtube.com/playlist?list=PLfoo123").unwrap(),
            CatalogSource::Playlist("PLfoo123".into())
        );
    }

    #[test]
    fn test_unparseable_url() {
        let err = parse_source("https://example.com/watch?v=abc").unwrap_err();
        assert!(matches!(err, CatalogError::UnparseableUrl(_)));
        assert!(parse_source("").is_err());
    }
}
