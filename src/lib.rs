pub mod catalog;
pub mod configuration;
pub mod download;
pub mod foundation;
pub mod startup;

pub use catalog::{AlbumMetadata, CatalogClient, HttpCatalog, TrackMetadata};
pub use configuration::*;
pub use download::{AlbumDownloader, AlbumReport, AudioRetriever, DownloadOutcome};
pub use foundation::utils::sanitize;
pub use foundation::{LogSink, Logger};
