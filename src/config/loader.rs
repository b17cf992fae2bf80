use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::{Ini, ParseOption, Properties};
use log::warn;
use thiserror::Error;

use super::schema::{self, Config, DumperSettings, TelegramSettings};
use crate::filename::FilenameFormat;
use crate::filter::entry::{normalize_phone, parse_entry_list};
use crate::media::parse_media_list;

const API_SECTION: &str = "TelegramAPI";
const DUMPER_SECTION: &str = "Dumper";

const API_KEYS: [&str; 4] = ["ApiId", "ApiHash", "PhoneNumber", "SessionName"];
const DUMPER_KEYS: [&str; 12] = [
    "OutputDirectory",
    "Whitelist",
    "Blacklist",
    "MediaWhitelist",
    "MaxSize",
    "LogLevel",
    "LibraryLogLevel",
    "DBFileName",
    "MediaFilenameFmt",
    "InvalidationTime",
    "ChunkSize",
    "MaxChunks",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid INI syntax: {0}")]
    Syntax(#[from] ini::ParseError),
    #[error("missing section [{0}]")]
    MissingSection(&'static str),
    #[error("missing key {key} in section [{section}]")]
    MissingKey {
        section: &'static str,
        key: &'static str,
    },
    #[error("bad value for {key} in [{section}]: {reason}")]
    BadValue {
        section: &'static str,
        key: &'static str,
        reason: String,
    },
}

/// Case-insensitive view of one INI section. Keys in the file are matched
/// the way Python's configparser matches them, and empty values count as
/// unset (the original does `config.get(...) or ''` everywhere).
struct SectionReader<'a> {
    name: &'static str,
    props: &'a Properties,
}

impl<'a> SectionReader<'a> {
    fn get(&self, key: &str) -> Option<&'a str> {
        self.props
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &'static str) -> Result<&'a str, ConfigError> {
        self.get(key).ok_or(ConfigError::MissingKey {
            section: self.name,
            key,
        })
    }

    /// Parses the key, or the documented default when the key is absent.
    fn parse_or<T>(&self, key: &'static str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.get(key)
            .unwrap_or(default)
            .parse()
            .map_err(|e: T::Err| self.bad(key, e))
    }

    fn bad(&self, key: &'static str, reason: impl Display) -> ConfigError {
        ConfigError::BadValue {
            section: self.name,
            key,
            reason: reason.to_string(),
        }
    }

    fn warn_unknown(&self, known: &[&str]) {
        for (key, _) in self.props.iter() {
            if !known.iter().any(|k| k.eq_ignore_ascii_case(key)) {
                warn!("ignoring unknown key {key} in [{}]", self.name);
            }
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_ini_str(&text)
    }

    pub fn from_ini_str(text: &str) -> Result<Config, ConfigError> {
        // No escape processing: Windows paths and literal backslashes must
        // come through exactly as written, like configparser keeps them.
        let ini = Ini::load_from_str_opt(
            text,
            ParseOption {
                enabled_escape: false,
                ..Default::default()
            },
        )?;

        for (section, props) in ini.iter() {
            match section {
                Some(API_SECTION) | Some(DUMPER_SECTION) => {}
                Some(other) => warn!("ignoring unknown section [{other}]"),
                None => {
                    if props.iter().next().is_some() {
                        warn!("ignoring keys outside any section");
                    }
                }
            }
        }

        let telegram = read_telegram(&ini)?;
        let dumper = read_dumper(&ini)?;
        Ok(Config { telegram, dumper })
    }
}

fn read_telegram(ini: &Ini) -> Result<TelegramSettings, ConfigError> {
    let props = ini
        .section(Some(API_SECTION))
        .ok_or(ConfigError::MissingSection(API_SECTION))?;
    let sec = SectionReader {
        name: API_SECTION,
        props,
    };
    sec.warn_unknown(&API_KEYS);

    let api_id: i32 = sec
        .required("ApiId")?
        .parse()
        .map_err(|_| sec.bad("ApiId", "expected an integer"))?;

    let api_hash = sec.required("ApiHash")?;
    if api_hash.len() != 32 || !api_hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(sec.bad("ApiHash", "expected 32 hexadecimal characters"));
    }

    let raw_phone = sec.required("PhoneNumber")?;
    let digits = normalize_phone(raw_phone.strip_prefix('+').unwrap_or(raw_phone))
        .ok_or_else(|| sec.bad("PhoneNumber", "expected an international phone number"))?;

    let session_name = sec
        .get("SessionName")
        .unwrap_or(schema::DEFAULT_SESSION_NAME);
    if session_name.contains(['/', '\\']) {
        return Err(sec.bad("SessionName", "must not contain path separators"));
    }

    Ok(TelegramSettings {
        api_id,
        api_hash: api_hash.to_lowercase(),
        phone_number: format!("+{digits}"),
        session_name: session_name.to_string(),
    })
}

fn read_dumper(ini: &Ini) -> Result<DumperSettings, ConfigError> {
    // A missing [Dumper] section simply means all defaults
    let empty = Properties::new();
    let props = ini.section(Some(DUMPER_SECTION)).unwrap_or(&empty);
    let sec = SectionReader {
        name: DUMPER_SECTION,
        props,
    };
    sec.warn_unknown(&DUMPER_KEYS);

    let output_directory = expand_user(
        sec.get("OutputDirectory")
            .unwrap_or(schema::DEFAULT_OUTPUT_DIRECTORY),
    );

    let whitelist = match sec.get("Whitelist") {
        Some(v) => parse_entry_list(v).map_err(|e| sec.bad("Whitelist", e))?,
        None => Vec::new(),
    };
    let blacklist = match sec.get("Blacklist") {
        Some(v) => parse_entry_list(v).map_err(|e| sec.bad("Blacklist", e))?,
        None => Vec::new(),
    };
    if !whitelist.is_empty() && !blacklist.is_empty() {
        warn!("both Whitelist and Blacklist are set, the blacklist will be ignored");
    }

    let media_whitelist = match sec.get("MediaWhitelist") {
        Some(v) => parse_media_list(v).map_err(|e| sec.bad("MediaWhitelist", e))?,
        None => Default::default(),
    };

    let db_file_name = sec
        .get("DBFileName")
        .unwrap_or(schema::DEFAULT_DB_FILE_NAME);
    if db_file_name.contains(['/', '\\']) {
        return Err(sec.bad("DBFileName", "must not contain path separators"));
    }

    let media_filename_fmt: FilenameFormat = sec.parse_or(
        "MediaFilenameFmt",
        schema::DEFAULT_MEDIA_FILENAME_FMT,
    )?;

    let chunk_size: u32 = sec.parse_or("ChunkSize", schema::DEFAULT_CHUNK_SIZE)?;
    if chunk_size == 0 {
        return Err(sec.bad("ChunkSize", "must be at least 1"));
    }
    if chunk_size > 100 {
        warn!("ChunkSize {chunk_size} is above the API maximum of 100, requests will be capped");
    }

    Ok(DumperSettings {
        output_directory,
        whitelist,
        blacklist,
        media_whitelist,
        max_size: sec.parse_or("MaxSize", schema::DEFAULT_MAX_SIZE)?,
        log_level: sec.parse_or("LogLevel", schema::DEFAULT_LOG_LEVEL)?,
        library_log_level: sec.parse_or("LibraryLogLevel", schema::DEFAULT_LIBRARY_LOG_LEVEL)?,
        db_file_name: db_file_name.to_string(),
        media_filename_fmt,
        invalidation_time: sec.parse_or("InvalidationTime", schema::DEFAULT_INVALIDATION_TIME)?,
        chunk_size,
        max_chunks: sec.parse_or("MaxChunks", schema::DEFAULT_MAX_CHUNKS)?,
    })
}

/// Leading ~ means the home directory, like os.path.expanduser. Left alone
/// when no home directory is known.
fn expand_user(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
