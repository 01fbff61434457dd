/// Album-level metadata for one download run.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumMetadata {
    pub title: String,
    /// Display string of every album artist, joined with `", "`.
    pub artist: String,
    pub year: Option<String>,
    /// Release type as reported by the catalog, lowercased (`album`, `single`, `ep`, ...).
    pub kind: String,
    pub cover_url: Option<String>,
    pub track_count: usize,
    pub tracks: Vec<TrackMetadata>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackMetadata {
    /// Opaque identifier handed to the audio retriever.
    pub id: String,
    pub title: String,
    pub artists: Vec<String>,
    pub is_available: bool,
    pub track_number: Option<u32>,
}

impl TrackMetadata {
    /// Artist names joined for display and file names.
    pub fn artist_display(&self) -> String {
        self.artists.join(", ")
    }

    /// Artist names joined the way multi-value ID3 text frames expect.
    pub fn artist_tag(&self) -> String {
        self.artists.join("; ")
    }

    /// Track number as text; empty when the catalog did not provide one.
    pub fn track_number_text(&self) -> String {
        self.track_number.map(|n| n.to_string()).unwrap_or_default()
    }
}
