mod common;

use common::{album, capturing_logger, http_client, serve, FakeRetriever};
use id3::{Tag, TagLike};
use image::{ImageBuffer, ImageFormat, Rgb};
use musicdl::catalog::{CatalogClient, CatalogError, HttpCatalog};
use musicdl::download::layout::final_track_path;
use musicdl::download::{fetch_cover, AlbumDownloader, CoverError, MAX_COVER_BYTES};
use musicdl::RunConfig;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use tempfile::TempDir;

fn large_bmp() -> Vec<u8> {
    let img = ImageBuffer::from_fn(600, 400, |x, y| Rgb([(x / 3) as u8, (y / 2) as u8, 64]));
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Bmp).unwrap();
    bytes.into_inner()
}

#[tokio::test]
async fn test_fetch_small_cover_is_unchanged() {
    let base = serve(vec![("/cover.jpg", 200, b"tiny jpeg bytes".to_vec())]).await;

    let cover = fetch_cover(&http_client(), &format!("{base}/cover.jpg"))
        .await
        .unwrap();

    assert_eq!(cover.as_bytes(), b"tiny jpeg bytes");
}

#[tokio::test]
async fn test_fetch_large_cover_is_reencoded() {
    let bmp = large_bmp();
    assert!(bmp.len() > MAX_COVER_BYTES);
    let base = serve(vec![("/big.bmp", 200, bmp)]).await;

    let cover = fetch_cover(&http_client(), &format!("{base}/big.bmp"))
        .await
        .unwrap();

    assert!(cover.len() <= MAX_COVER_BYTES);
    assert_eq!(image::guess_format(cover.as_bytes()).unwrap(), ImageFormat::Jpeg);
}

#[tokio::test]
async fn test_fetch_cover_non_success_status() {
    let base = serve(vec![]).await;

    let err = fetch_cover(&http_client(), &format!("{base}/missing.jpg"))
        .await
        .unwrap_err();

    assert!(matches!(err, CoverError::Status(404)));
}

#[tokio::test]
async fn test_fetch_cover_transport_failure() {
    let err = fetch_cover(&http_client(), "http://127.0.0.1:1/cover.jpg")
        .await
        .unwrap_err();

    assert!(matches!(err, CoverError::Request(_)));
}

fn album_body() -> Vec<u8> {
    json!({
        "title": "High Voltage",
        "artists": [{"name": "AC/DC"}],
        "year": "1976",
        "type": "Album",
        "trackCount": 1,
        "thumbnails": [{"url": "https://img.example/x=w60-h60"}],
        "tracks": [
            {"videoId": "hv1", "title": "It's a Long Way to the Top", "artists": [{"name": "AC/DC"}],
             "isAvailable": true, "trackNumber": 1}
        ]
    })
    .to_string()
    .into_bytes()
}

#[tokio::test]
async fn test_catalog_resolves_album_playlist_url() {
    let base = serve(vec![
        (
            "/album_browse_id/OLAK5uy_hv",
            200,
            br#"{"browseId": "MPREb_hv"}"#.to_vec(),
        ),
        ("/album/MPREb_hv", 200, album_body()),
    ])
    .await;
    let catalog = HttpCatalog::new(http_client(), &format!("{base}/"));

    let album = catalog
        .lookup("https://music.youtube.com/playlist?list=OLAK5uy_hv")
        .await
        .unwrap();

    assert_eq!(album.title, "High Voltage");
    assert_eq!(album.artist, "AC/DC");
    assert_eq!(album.kind, "album");
    assert_eq!(album.cover_url.as_deref(), Some("https://img.example/x=w1200-h1200"));
    assert_eq!(album.tracks[0].id, "hv1");
}

#[tokio::test]
async fn test_catalog_reports_server_errors() {
    let base = serve(vec![("/album/MPREb_broken", 500, Vec::new())]).await;
    let catalog = HttpCatalog::new(http_client(), &base);

    let err = catalog.lookup("MPREb_broken").await.unwrap_err();

    assert!(matches!(err, CatalogError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_catalog_rejects_playlists_and_garbage() {
    let catalog = HttpCatalog::new(http_client(), "http://127.0.0.1:1");

    let playlist = catalog
        .lookup("https://music.youtube.com/playlist?list=PLabc")
        .await
        .unwrap_err();
    assert!(matches!(playlist, CatalogError::PlaylistUnsupported(_)));

    let garbage = catalog.lookup("not a url").await.unwrap_err();
    assert!(matches!(garbage, CatalogError::UnparseableUrl(_)));
}

#[tokio::test]
async fn test_cover_from_catalog_url_is_saved_and_embedded() {
    let base = serve(vec![("/art.jpg", 200, vec![0xFF, 0xD8, 0xFF, 0xE0, 42])]).await;
    let root = TempDir::new().unwrap();
    let config = RunConfig::in_dir(root.path());
    let mut album = album(1);
    album.cover_url = Some(format!("{base}/art.jpg"));
    let (logger, _lines) = capturing_logger();
    let downloader = AlbumDownloader::new(http_client(), Arc::new(FakeRetriever::default()), logger);

    downloader.download_album(&album, &config, None).await.unwrap();

    let saved = std::fs::read(config.cover_dir.join("ACDC - The Razors Edge.jpg")).unwrap();
    assert_eq!(saved, vec![0xFF, 0xD8, 0xFF, 0xE0, 42]);

    let tag = Tag::read_from_path(final_track_path(&config.output_dir, &album, &album.tracks[0])).unwrap();
    assert_eq!(tag.pictures().next().unwrap().data, saved);
}
