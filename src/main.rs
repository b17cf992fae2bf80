use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use telegram_export_config::config::{self, Config};
use telegram_export_config::filter::ChatFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Write an annotated config.ini to fill in
    Init {
        #[arg(default_value = "config.ini")]
        path: PathBuf,
    },
    /// Validate a config file and report what the exporter would do
    Check {
        #[arg(default_value = "config.ini")]
        path: PathBuf,
    },
    /// Print the effective configuration, defaults included
    Show {
        #[arg(default_value = "config.ini")]
        path: PathBuf,

        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Setup default logger level:
    // - If RUST_LOG is set info
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    let args = Args::parse();
    match args.cmd {
        Commands::Init { path } => {
            config::write_template(&path)
                .with_context(|| format!("cannot write {}", path.display()))?;
        }
        Commands::Check { path } => check(&path)?,
        Commands::Show { path, json } => show(&path, json)?,
    }
    Ok(())
}

fn check(path: &Path) -> Result<()> {
    let config = Config::load(path)?;
    info!("config OK: {}", path.display());
    info!(
        "exporting as {} (session {})",
        config.telegram.phone_number, config.telegram.session_name
    );

    match config.chat_filter() {
        ChatFilter::All => info!("exporting every dialog"),
        ChatFilter::Whitelist(entries) => {
            info!("exporting only: {}", join(&entries));
        }
        ChatFilter::Blacklist(entries) => {
            info!("exporting every dialog except: {}", join(&entries));
        }
    }

    let media = config.media_filter();
    if media.enabled() {
        info!(
            "downloading media up to {}, chat photos {}",
            media.max_size(),
            if media.wants_chat_photos() {
                "included"
            } else {
                "not included"
            }
        );
        info!(
            "media saved under {} as {}",
            config.dumper.output_directory.display(),
            config.dumper.media_filename_fmt
        );
    } else {
        info!("media downloads are disabled (MaxSize = 0)");
    }

    info!("database at {}", config.database_path().display());
    info!(
        "log levels: dumper {} ({}), library {}",
        config.dumper.log_level,
        config.dumper.log_level.to_level_filter(),
        config.dumper.library_log_level
    );
    Ok(())
}

fn show(path: &Path, json: bool) -> Result<()> {
    let config = Config::load(path)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("[TelegramAPI]");
    println!("ApiId = {}", config.telegram.api_id);
    println!("ApiHash = {}", config.telegram.api_hash);
    println!("PhoneNumber = {}", config.telegram.phone_number);
    println!("SessionName = {}", config.telegram.session_name);
    println!();

    let d = &config.dumper;
    println!("[Dumper]");
    println!("OutputDirectory = {}", d.output_directory.display());
    println!("Whitelist = {}", join(&d.whitelist));
    println!("Blacklist = {}", join(&d.blacklist));
    println!(
        "MediaWhitelist = {}",
        d.media_whitelist
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("MaxSize = {}", d.max_size);
    println!("LogLevel = {}", d.log_level);
    println!("LibraryLogLevel = {}", d.library_log_level);
    println!("DBFileName = {}", d.db_file_name);
    println!("MediaFilenameFmt = {}", d.media_filename_fmt);
    println!("InvalidationTime = {}", d.invalidation_time);
    println!("ChunkSize = {}", d.chunk_size);
    println!("MaxChunks = {}", d.max_chunks);
    Ok(())
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
