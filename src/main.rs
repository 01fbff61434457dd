use clap::{value_parser, Arg, ArgAction, Command};
use musicdl::configuration::{create_config, ConfigFolder};
use musicdl::startup::{run_download, run_info, DownloadArgs};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let url_arg = Arg::new("url").help("Album URL or album browse id");
    let args = Command::new("musicdl")
        .about("🎵 Download albums from a streaming catalog, tagged and organized 🎵")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Settings file (defaults to ./MusicDownloader.cfg)"),
        )
        .subcommand(
            Command::new("download")
                .about("⬇️ Download every track of an album")
                .arg(url_arg.clone().required_unless_present("metadata"))
                .arg(
                    Arg::new("verbose")
                        .long("verbose")
                        .short('v')
                        .action(ArgAction::SetTrue)
                        .help("Narrate progress"),
                )
                .arg(
                    Arg::new("metadata")
                        .long("metadata")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .help("Read album metadata from a JSON file instead of the catalog"),
                )
                .arg(
                    Arg::new("threads")
                        .long("threads")
                        .short('t')
                        .value_parser(value_parser!(usize))
                        .help("Number of tracks downloaded in parallel"),
                ),
        )
        .subcommand(
            Command::new("info")
                .about("🔎 Show album metadata without downloading")
                .arg(url_arg.required(true)),
        )
        .subcommand(Command::new("config").about("🛠️ Create or update the settings file"))
        .get_matches();

    let cfg_folder = ConfigFolder::new(args.get_one::<PathBuf>("config").cloned())?;

    match args.subcommand() {
        Some(("download", sub)) => {
            let download_args = DownloadArgs {
                url: sub.get_one::<String>("url").cloned(),
                verbose: sub.get_flag("verbose"),
                metadata_file: sub.get_one::<PathBuf>("metadata").cloned(),
                threads: sub.get_one::<usize>("threads").copied(),
            };
            run_download(cfg_folder, download_args).await
        }
        Some(("info", sub)) => {
            let url = sub.get_one::<String>("url").cloned().unwrap_or_default();
            run_info(cfg_folder, &url).await
        }
        Some(("config", _)) => {
            println!("\x1b[1m\x1b[34mConfiguring musicdl...\x1b[0m");
            create_config(cfg_folder)
        }
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn print_usage() {
    println!("\x1b[1m\x1b[31mInvalid command!\x1b[0m\n");
    println!("📖 Available Commands:");
    println!("  \x1b[1m\x1b[32mmusicdl download <URL>\x1b[0m - ⬇️  Download an album");
    println!("  \x1b[1m\x1b[32mmusicdl info <URL>\x1b[0m     - 🔎 Preview album metadata");
    println!("  \x1b[1m\x1b[32mmusicdl config\x1b[0m         - 🛠️  Create or update the settings file");
}
