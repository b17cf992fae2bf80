use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::config::size::ByteSize;

/// Media classification used both in the MediaWhitelist key and when
/// deciding what to do with a message.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Document,
    Video,
    Audio,
    Sticker,
    Voice,
    ChatPhoto,
    /// Anything the exporter cannot classify. Not configurable.
    Unknown,
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "photo" => Ok(MediaKind::Photo),
            "document" => Ok(MediaKind::Document),
            "video" => Ok(MediaKind::Video),
            "audio" => Ok(MediaKind::Audio),
            "sticker" => Ok(MediaKind::Sticker),
            "voice" => Ok(MediaKind::Voice),
            "chatphoto" => Ok(MediaKind::ChatPhoto),
            other => Err(format!(
                "unknown media type {other:?}, expected photo, document, video, \
                 audio, sticker, voice or chatphoto"
            )),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            MediaKind::Photo => "photo",
            MediaKind::Document => "document",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Sticker => "sticker",
            MediaKind::Voice => "voice",
            MediaKind::ChatPhoto => "chatphoto",
            MediaKind::Unknown => "unknown",
        };
        f.write_str(tag)
    }
}

/// Parses the MediaWhitelist value. An empty value yields an empty set,
/// which stands for "all message media".
pub fn parse_media_list(s: &str) -> Result<BTreeSet<MediaKind>, String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(MediaKind::from_str)
        .collect()
}

/// Download decisions derived from MediaWhitelist and MaxSize.
#[derive(Clone, Debug, Serialize)]
pub struct MediaFilter {
    allowed: BTreeSet<MediaKind>,
    max_size: ByteSize,
}

impl MediaFilter {
    pub fn new(allowed: BTreeSet<MediaKind>, max_size: ByteSize) -> MediaFilter {
        MediaFilter { allowed, max_size }
    }

    /// MaxSize = 0 turns media downloading off altogether.
    pub fn enabled(&self) -> bool {
        !self.max_size.is_zero()
    }

    pub fn max_size(&self) -> ByteSize {
        self.max_size
    }

    /// Whether a piece of message media should be downloaded. Pass the size
    /// when it is known; oversized media is skipped. An empty whitelist
    /// allows every kind, a non-empty one also lets unclassified media
    /// through.
    pub fn allows(&self, kind: MediaKind, size: Option<u64>) -> bool {
        if !self.enabled() {
            return false;
        }
        if size.is_some_and(|s| s > self.max_size.bytes()) {
            return false;
        }
        if self.allowed.is_empty() {
            return true;
        }
        kind == MediaKind::Unknown || self.allowed.contains(&kind)
    }

    /// Chat photos are only saved when explicitly whitelisted.
    pub fn wants_chat_photos(&self) -> bool {
        self.enabled() && self.allowed.contains(&MediaKind::ChatPhoto)
    }
}
