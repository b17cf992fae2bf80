use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::Duration;
use serde::Serialize;

use super::level::LogLevel;
use super::size::ByteSize;
use crate::filename::{FilenameFormat, MediaInfo};
use crate::filter::{ChatFilter, Entry};
use crate::media::{MediaFilter, MediaKind};

// Documented defaults, written exactly as they appear in config.ini.example
// so they go through the same parsing as user values.
pub(crate) const DEFAULT_SESSION_NAME: &str = "exporter";
pub(crate) const DEFAULT_OUTPUT_DIRECTORY: &str = ".";
pub(crate) const DEFAULT_MAX_SIZE: &str = "1MB";
pub(crate) const DEFAULT_LOG_LEVEL: &str = "INFO";
pub(crate) const DEFAULT_LIBRARY_LOG_LEVEL: &str = "WARNING";
pub(crate) const DEFAULT_DB_FILE_NAME: &str = "export";
pub(crate) const DEFAULT_MEDIA_FILENAME_FMT: &str =
    "usermedia/{name}-{context_id}/{type}-{filename}-{id}";
pub(crate) const DEFAULT_INVALIDATION_TIME: &str = "7200";
pub(crate) const DEFAULT_CHUNK_SIZE: &str = "100";
pub(crate) const DEFAULT_MAX_CHUNKS: &str = "0";

/// The [TelegramAPI] section: credentials and session identity.
#[derive(Clone, Debug, Serialize)]
pub struct TelegramSettings {
    pub api_id: i32,
    pub api_hash: String,
    /// Canonical +digits form.
    pub phone_number: String,
    pub session_name: String,
}

/// The [Dumper] section: output, filtering and media-download rules.
#[derive(Clone, Debug, Serialize)]
pub struct DumperSettings {
    pub output_directory: PathBuf,
    pub whitelist: Vec<Entry>,
    pub blacklist: Vec<Entry>,
    pub media_whitelist: BTreeSet<MediaKind>,
    pub max_size: ByteSize,
    pub log_level: LogLevel,
    pub library_log_level: LogLevel,
    pub db_file_name: String,
    pub media_filename_fmt: FilenameFormat,
    /// Minutes before stored chat information goes stale.
    pub invalidation_time: u64,
    pub chunk_size: u32,
    pub max_chunks: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct Config {
    pub telegram: TelegramSettings,
    pub dumper: DumperSettings,
}

impl Config {
    pub fn chat_filter(&self) -> ChatFilter {
        ChatFilter::new(self.dumper.whitelist.clone(), self.dumper.blacklist.clone())
    }

    pub fn media_filter(&self) -> MediaFilter {
        MediaFilter::new(self.dumper.media_whitelist.clone(), self.dumper.max_size)
    }

    /// The database lands next to the media, named after DBFileName.
    pub fn database_path(&self) -> PathBuf {
        self.dumper
            .output_directory
            .join(format!("{}.db", self.dumper.db_file_name))
    }

    /// Full path a piece of media would be saved under.
    pub fn media_destination(&self, info: &MediaInfo) -> PathBuf {
        self.dumper
            .output_directory
            .join(self.dumper.media_filename_fmt.expand(info))
    }

    pub fn invalidation(&self) -> Duration {
        Duration::minutes(self.dumper.invalidation_time as i64)
    }

    /// MaxChunks = 0 means no limit.
    pub fn chunk_limit(&self) -> Option<u32> {
        match self.dumper.max_chunks {
            0 => None,
            n => Some(n),
        }
    }
}
