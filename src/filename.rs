use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::media::MediaKind;

/// The tokens MediaFilenameFmt may use. Anything else is rejected when the
/// config is loaded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Placeholder {
    Id,
    SenderId,
    ContextId,
    Name,
    Filename,
    SenderName,
    Type,
    Ext,
}

const PLACEHOLDER_NAMES: [(&str, Placeholder); 8] = [
    ("id", Placeholder::Id),
    ("sender_id", Placeholder::SenderId),
    ("context_id", Placeholder::ContextId),
    ("name", Placeholder::Name),
    ("filename", Placeholder::Filename),
    ("sender_name", Placeholder::SenderName),
    ("type", Placeholder::Type),
    ("ext", Placeholder::Ext),
];

impl Placeholder {
    fn from_name(name: &str) -> Option<Placeholder> {
        PLACEHOLDER_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, p)| *p)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// What a piece of media looks like to the filename template. Optional
/// fields fall back the way the exporter always has: unknown names,
/// a .bin extension and a type-plus-date filename.
#[derive(Clone, Debug)]
pub struct MediaInfo {
    pub id: i64,
    pub context_id: i64,
    pub sender_id: i64,
    pub kind: MediaKind,
    pub date: DateTime<Utc>,
    pub name: Option<String>,
    pub sender_name: Option<String>,
    pub filename: Option<String>,
    pub ext: Option<String>,
}

/// A validated MediaFilenameFmt value. The message date is applied to the
/// literal parts with strftime, then the placeholders are substituted.
#[derive(Clone, Debug)]
pub struct FilenameFormat {
    raw: String,
    segments: Vec<Segment>,
}

impl FilenameFormat {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn expand(&self, info: &MediaInfo) -> String {
        let ext = info.ext.as_deref().unwrap_or(".bin");
        let name = non_empty(info.name.as_deref()).unwrap_or("unknown");
        let sender_name = non_empty(info.sender_name.as_deref()).unwrap_or("unknown");
        let filename = match non_empty(info.filename.as_deref()) {
            Some(f) => f.to_string(),
            None => format!("{}_{}", info.kind, info.date.format("%Y-%m-%d_%H-%M-%S")),
        };

        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => {
                    // Validated at parse time, cannot fail here
                    let _ = write!(out, "{}", info.date.format(text));
                }
                Segment::Placeholder(p) => {
                    let _ = match p {
                        Placeholder::Id => write!(out, "{}", info.id),
                        Placeholder::SenderId => write!(out, "{}", info.sender_id),
                        Placeholder::ContextId => write!(out, "{}", info.context_id),
                        Placeholder::Name => write!(out, "{name}"),
                        Placeholder::Filename => write!(out, "{filename}"),
                        Placeholder::SenderName => write!(out, "{sender_name}"),
                        Placeholder::Type => write!(out, "{}", info.kind),
                        Placeholder::Ext => write!(out, "{ext}"),
                    };
                }
            }
        }

        // Make sure the name carries the extension exactly once
        if !out.ends_with(ext) {
            if out.ends_with('.') {
                out.pop();
            }
            out.push_str(ext);
        }
        out
    }
}

impl FromStr for FilenameFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = raw.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(c) => name.push(c),
                            None => return Err(format!("unclosed placeholder {{{name}")),
                        }
                    }
                    let placeholder = Placeholder::from_name(&name).ok_or_else(|| {
                        let known = PLACEHOLDER_NAMES.map(|(n, _)| n).join(", ");
                        format!("unknown placeholder {{{name}}}, expected one of {known}")
                    })?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(placeholder));
                }
                '}' => return Err("single '}' in filename format".to_string()),
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        for segment in &segments {
            if let Segment::Literal(text) = segment {
                if StrftimeItems::new(text).any(|item| matches!(item, Item::Error)) {
                    return Err(format!("invalid strftime code in {text:?}"));
                }
            }
        }

        Ok(FilenameFormat {
            raw: raw.to_string(),
            segments,
        })
    }
}

impl fmt::Display for FilenameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for FilenameFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
