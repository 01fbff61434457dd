/// # Entry points behind the command line
///
/// `run_download` drives one album run:
/// 1. Loads the configuration
/// 2. Looks the album up in the catalog (or reads it from a metadata file)
/// 3. Narrates what was found
/// 4. Downloads, tags and files every track
///
/// `run_info` stops after step 3.
///
use crate::catalog::{load_album_file, AlbumMetadata, CatalogClient, CatalogError, HttpCatalog};
use crate::configuration::{self, clamp_threads, ConfigFolder, Settings};
use crate::download::{AlbumDownloader, YtDlpRetriever};
use crate::foundation::{Logger, ProgressSink};
use anyhow::Context;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;

/// Options of the `download` subcommand.
#[derive(Debug, Default)]
pub struct DownloadArgs {
    pub url: Option<String>,
    pub verbose: bool,
    pub metadata_file: Option<PathBuf>,
    pub threads: Option<usize>,
}

pub async fn run_download(cfg_folder: ConfigFolder, args: DownloadArgs) -> anyhow::Result<()> {
    let settings = load_settings(&cfg_folder)?;
    let logger = if args.verbose {
        Logger::new(ProgressSink::new())
    } else {
        Logger::silent()
    };
    let http = Client::new();

    let album = match (&args.metadata_file, &args.url) {
        (Some(path), _) => load_album_file(path)
            .with_context(|| format!("Unable to read album metadata from {}", path.display()))?,
        (None, Some(url)) => {
            let catalog = HttpCatalog::new(http.clone(), &settings.catalog_url);
            lookup_album(&catalog, url, &logger).await?
        }
        (None, None) => anyhow::bail!("Either a URL or a metadata file is required"),
    };
    for line in album_summary(&album) {
        logger.out(line);
    }

    let mut run = settings.run.clone();
    if let Some(threads) = args.threads {
        run.max_concurrency = clamp_threads(threads);
    }

    let retriever = YtDlpRetriever::new(&settings.downloader)
        .with_ffmpeg_location(settings.ffmpeg_location.clone())
        .with_timeout(settings.retrieval_timeout);
    let downloader = AlbumDownloader::new(http, Arc::new(retriever), logger);

    if args.verbose {
        println!(
            "\x1b[1m\x1b[34mDownloading: {} - {}...\x1b[0m",
            album.artist, album.title
        );
    }
    let report = downloader
        .download_album(&album, &run, None)
        .await
        .context("Unable to prepare the output directories")?;

    if report.failed > 0 {
        eprintln!(
            "\x1b[31m{} of {} tracks failed to download\x1b[0m",
            report.failed,
            report.total()
        );
    } else if args.verbose {
        println!("\x1b[32mDownload Finished!\x1b[0m");
    }

    Ok(())
}

/// Prints what the catalog knows about `url` without downloading anything.
pub async fn run_info(cfg_folder: ConfigFolder, url: &str) -> anyhow::Result<()> {
    let settings = load_settings(&cfg_folder)?;
    let logger = Logger::console();
    let catalog = HttpCatalog::new(Client::new(), &settings.catalog_url);

    let album = lookup_album(&catalog, url, &logger).await?;
    for line in album_summary(&album) {
        logger.out(line);
    }
    logger.out(format!("Year: {}", album.year.as_deref().unwrap_or("Unknown")));
    logger.out(format!(
        "Cover: {}",
        album.cover_url.as_deref().unwrap_or("none")
    ));

    let unavailable = album.tracks.iter().filter(|t| !t.is_available).count();
    if unavailable > 0 {
        logger.out(format!("{unavailable} tracks are marked unavailable"));
    }

    Ok(())
}

fn load_settings(cfg_folder: &ConfigFolder) -> anyhow::Result<Settings> {
    configuration::get_configuration(&cfg_folder.config_file, &cfg_folder.base_dir)
        .context("Unable to parse configuration file")
}

async fn lookup_album(
    catalog: &dyn CatalogClient,
    url: &str,
    logger: &Logger,
) -> anyhow::Result<AlbumMetadata> {
    match catalog.lookup(url).await {
        Ok(album) => Ok(album),
        Err(e) => {
            if matches!(e, CatalogError::UnparseableUrl(_)) {
                logger.out("ERROR: CANT PARSE URL");
            }
            Err(e).context("Album lookup failed")
        }
    }
}

/// Lines describing an album the way the run narrates it before downloading.
pub fn album_summary(album: &AlbumMetadata) -> Vec<String> {
    let tracks = album
        .tracks
        .iter()
        .map(|t| format!("   {}. {}", t.track_number_text(), t.title))
        .collect::<Vec<_>>()
        .join("\n");

    vec![
        format!("Found: {} - {}", album.title, album.artist),
        format!("Type: {}", album.kind),
        format!("{} tracks found:", album.track_count),
        tracks,
    ]
}
