use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot parse URL: {0}")]
    UnparseableUrl(String),

    #[error("playlist downloads are not supported: {0}")]
    PlaylistUnsupported(String),

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("catalog returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog response is missing `{0}`")]
    MissingField(&'static str),
}
