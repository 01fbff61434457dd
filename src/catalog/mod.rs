mod catalog_error;
mod client;
mod models;
mod source_url;

pub use catalog_error::CatalogError;
pub use client::{load_album_file, parse_album, CatalogClient, HttpCatalog};
pub use models::{AlbumMetadata, TrackMetadata};
pub use source_url::{parse_source, CatalogSource};
