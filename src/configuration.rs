use config::{ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};

/// Name of the settings file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "MusicDownloader.cfg";

pub const DEFAULT_MAX_THREADS: usize = 32;
const MAX_THREADS_LIMIT: usize = 128;
const DEFAULT_RETRIEVAL_TIMEOUT_SECS: u64 = 600;
const DEFAULT_CATALOG_URL: &str = "http://127.0.0.1:8765";
const DEFAULT_DOWNLOADER: &str = "yt-dlp";

/// Directories and parallelism for one album run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub output_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub cover_dir: PathBuf,
    pub max_concurrency: usize,
}

impl RunConfig {
    /// Default layout rooted at `base`: `out/`, `temp/` and `covers/`.
    pub fn in_dir(base: &Path) -> Self {
        Self {
            output_dir: base.join("out"),
            temp_dir: base.join("temp"),
            cover_dir: base.join("covers"),
            max_concurrency: DEFAULT_MAX_THREADS,
        }
    }
}

/// Fully resolved application settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub run: RunConfig,
    /// Kept for compatibility with older settings files; the pipeline ignores it.
    pub starting_index: u32,
    pub catalog_url: String,
    pub downloader: PathBuf,
    pub ffmpeg_location: Option<PathBuf>,
    pub retrieval_timeout: Option<Duration>,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default, alias = "Settings")]
    settings: RawSettings,
}

#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    out_dir: Option<String>,
    temp_dir: Option<String>,
    cover_dir: Option<String>,
    starting_index: Option<u32>,
    max_threads: Option<usize>,
    catalog_url: Option<String>,
    downloader: Option<String>,
    ffmpeg_location: Option<String>,
    retrieval_timeout_secs: Option<u64>,
}

/// Loads settings from the INI file at `cfg_file` (if it exists) and from
/// `MUSICDL_SETTINGS__*` environment variables. Relative defaults resolve against `base_dir`.
pub fn get_configuration(cfg_file: &Path, base_dir: &Path) -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(File::from(cfg_file).format(FileFormat::Ini).required(false))
        .add_source(
            Environment::with_prefix("MUSICDL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let file: SettingsFile = settings.try_deserialize()?;
    Ok(resolve(file.settings, base_dir))
}

fn resolve(raw: RawSettings, base_dir: &Path) -> Settings {
    let defaults = RunConfig::in_dir(base_dir);
    let dir = |value: Option<String>, default: PathBuf| {
        value
            .map(|v| unquote(&v).to_string())
            .filter(|v| !v.is_empty())
            .map(|v| base_dir.join(v))
            .unwrap_or(default)
    };

    Settings {
        run: RunConfig {
            output_dir: dir(raw.out_dir, defaults.output_dir),
            temp_dir: dir(raw.temp_dir, defaults.temp_dir),
            cover_dir: dir(raw.cover_dir, defaults.cover_dir),
            max_concurrency: clamp_threads(raw.max_threads.unwrap_or(DEFAULT_MAX_THREADS)),
        },
        starting_index: raw.starting_index.unwrap_or(0),
        catalog_url: raw
            .catalog_url
            .map(|v| unquote(&v).to_string())
            .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string()),
        downloader: PathBuf::from(
            raw.downloader
                .as_deref()
                .map(unquote)
                .unwrap_or(DEFAULT_DOWNLOADER),
        ),
        ffmpeg_location: raw
            .ffmpeg_location
            .as_deref()
            .map(unquote)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from),
        retrieval_timeout: match raw.retrieval_timeout_secs {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(Duration::from_secs(DEFAULT_RETRIEVAL_TIMEOUT_SECS)),
        },
    }
}

/// Strips one layer of matching surrounding quotes, as users often paste quoted paths.
fn unquote(value: &str) -> &str {
    let value = value.trim();
    ['"', '\'']
        .into_iter()
        .find_map(|quote| value.strip_prefix(quote)?.strip_suffix(quote))
        .unwrap_or(value)
}

pub fn clamp_threads(threads: usize) -> usize {
    threads.clamp(1, MAX_THREADS_LIMIT)
}

/// Location of the settings file, defaulting to the working directory.
pub struct ConfigFolder {
    pub base_dir: PathBuf,
    pub config_file: PathBuf,
}

impl ConfigFolder {
    pub fn new(config_override: Option<PathBuf>) -> io::Result<Self> {
        let base_dir = env::current_dir()?;
        let config_file = config_override.unwrap_or_else(|| base_dir.join(CONFIG_FILE_NAME));
        Ok(Self {
            base_dir,
            config_file,
        })
    }
}

pub fn create_config(cfg_folder: ConfigFolder) -> anyhow::Result<()> {
    println!("\x1b[1m\x1b[32mCreating configuration...\x1b[0m");

    if cfg_folder.config_file.exists() && !confirm_overwrite()? {
        println!("\x1b[33mOperation cancelled.\x1b[0m");
        return Ok(());
    }

    if let Some(parent) = cfg_folder.config_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&cfg_folder.config_file, include_str!("config_template.cfg"))?;

    println!("\x1b[32mConfiguration file created at:");
    println!("  -> {}", cfg_folder.config_file.display());
    println!("\x1b[0mPlease edit the configuration file with your specific settings.");

    Ok(())
}

fn confirm_overwrite() -> Result<bool, io::Error> {
    println!("\x1b[31mThe configuration file already exists.");
    println!("Do you want to overwrite it? (y/N)\x1b[0m");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y"))
}
