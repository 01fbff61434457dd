#![allow(dead_code)]

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use musicdl::catalog::{AlbumMetadata, TrackMetadata};
use musicdl::download::RetrievalError;
use musicdl::foundation::FnSink;
use musicdl::{AudioRetriever, Logger};
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Retriever that writes a small fake MP3 instead of launching a downloader.
#[derive(Default)]
pub struct FakeRetriever {
    pub delay: Duration,
    /// Ids for which nothing is written, like a downloader that silently fails.
    pub silent_ids: HashSet<String>,
    pub panic_ids: HashSet<String>,
    pub calls: AtomicUsize,
    pub active: AtomicUsize,
    pub peak: AtomicUsize,
}

impl FakeRetriever {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioRetriever for FakeRetriever {
    async fn retrieve(&self, track_id: &str, output: &Path) -> Result<(), RetrievalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;
        self.active.fetch_sub(1, Ordering::SeqCst);

        if self.panic_ids.contains(track_id) {
            panic!("retriever blew up on {track_id}");
        }
        if !self.silent_ids.contains(track_id) {
            tokio::fs::write(output, vec![0u8; 512]).await.unwrap();
        }
        Ok(())
    }
}

pub fn album(track_count: u32) -> AlbumMetadata {
    let tracks: Vec<TrackMetadata> = (1..=track_count)
        .map(|n| TrackMetadata {
            id: format!("t{n}"),
            title: format!("Track {n}"),
            artists: vec!["AC/DC".to_string()],
            is_available: true,
            track_number: Some(n),
        })
        .collect();

    AlbumMetadata {
        title: "The Razor's Edge".into(),
        artist: "AC/DC".into(),
        year: Some("1990".into()),
        kind: "album".into(),
        cover_url: None,
        track_count: tracks.len(),
        tracks,
    }
}

pub fn capturing_logger() -> (Logger, Arc<Mutex<Vec<String>>>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink_lines = Arc::clone(&lines);
    let logger = Logger::new(FnSink(move |line: &str| {
        sink_lines.lock().unwrap().push(line.to_string())
    }));
    (logger, lines)
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Serves fixed `(path, status, body)` responses and returns the base URL. Unknown paths get 404.
pub async fn serve(routes: Vec<(&'static str, u16, Vec<u8>)>) -> String {
    let app = routes
        .into_iter()
        .fold(Router::new(), |app, (path, status, body)| {
            let status = StatusCode::from_u16(status).unwrap();
            app.route(path, get(move || async move { (status, body) }))
        });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}
