use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// One way of naming a chat: a numeric id, a @username or a phone number.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Peer {
    Id(i64),
    /// Lowercase, without the leading @.
    Username(String),
    /// Digits only, without the leading +.
    Phone(String),
}

impl Peer {
    pub fn username(name: &str) -> Peer {
        Peer::Username(name.trim_start_matches('@').to_lowercase())
    }

    pub fn phone(number: &str) -> Peer {
        Peer::Phone(number.chars().filter(|c| c.is_ascii_digit()).collect())
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Peer::Id(id) => write!(f, "{id}"),
            Peer::Username(name) => write!(f, "{name}"),
            Peer::Phone(digits) => write!(f, "+{digits}"),
        }
    }
}

/// A whitelist/blacklist item: the peer plus the free-text note the user
/// may leave after a colon. The note never takes part in matching.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    pub peer: Peer,
    pub label: Option<String>,
}

impl Entry {
    pub fn matches(&self, peer: &Peer) -> bool {
        self.peer == *peer
    }
}

impl FromStr for Entry {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        // Anything after the first ':' is a label
        let (who, label) = match raw.split_once(':') {
            Some((who, label)) => (who.trim(), Some(label.trim())),
            None => (raw.trim(), None),
        };
        let label = label.filter(|l| !l.is_empty()).map(str::to_string);

        if who.is_empty() {
            return Err("empty chat entry".to_string());
        }

        let peer = if who.starts_with('-') || who.chars().all(|c| c.is_ascii_digit()) {
            let id: i64 = who
                .parse()
                .map_err(|_| format!("invalid chat id {who:?}"))?;
            Peer::Id(id)
        } else if let Some(rest) = who.strip_prefix('+') {
            let digits = normalize_phone(rest)
                .ok_or_else(|| format!("invalid phone number {who:?}"))?;
            Peer::Phone(digits)
        } else {
            let name = who.trim_start_matches('@');
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(format!("invalid username {who:?}"));
            }
            Peer::Username(name.to_lowercase())
        };

        Ok(Entry { peer, label })
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}: {}", self.peer, label),
            None => write!(f, "{}", self.peer),
        }
    }
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parses a comma-separated chat list. Empty items are skipped so
/// trailing commas do no harm.
pub fn parse_entry_list(s: &str) -> Result<Vec<Entry>, String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(Entry::from_str)
        .collect()
}

/// Returns the bare digits of an E.164-like phone number (7 to 15 digits,
/// spaces and dashes tolerated), or None if it does not look like one.
pub(crate) fn normalize_phone(s: &str) -> Option<String> {
    let mut digits = String::new();
    for c in s.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' => {}
            _ => return None,
        }
    }
    if (7..=15).contains(&digits.len()) {
        Some(digits)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_username() {
        let entry: Entry = "ExampleUser".parse().unwrap();
        assert_eq!(entry.peer, Peer::Username("exampleuser".to_string()));
        assert_eq!(entry.label, None);

        let entry: Entry = "@someone_else".parse().unwrap();
        assert_eq!(entry.peer, Peer::Username("someone_else".to_string()));
    }

    #[test]
    fn test_parse_ids() {
        let entry: Entry = "1234567".parse().unwrap();
        assert_eq!(entry.peer, Peer::Id(1234567));

        let entry: Entry = "-1001132836667".parse().unwrap();
        assert_eq!(entry.peer, Peer::Id(-1001132836667));

        assert!("-12x3".parse::<Entry>().is_err());
    }

    #[test]
    fn test_parse_phone() {
        let entry: Entry = "+34 600 000 000".parse().unwrap();
        assert_eq!(entry.peer, Peer::Phone("34600000000".to_string()));

        assert!("+12".parse::<Entry>().is_err());
        assert!("+34abc".parse::<Entry>().is_err());
    }

    #[test]
    fn test_labels_are_kept_but_ignored_for_matching() {
        let entry: Entry = "1234567: some chat I like".parse().unwrap();
        assert_eq!(entry.peer, Peer::Id(1234567));
        assert_eq!(entry.label.as_deref(), Some("some chat I like"));
        assert!(entry.matches(&Peer::Id(1234567)));
    }

    #[test]
    fn test_parse_entry_list() {
        let entries = parse_entry_list("exampleuser, +34600000000, 1234567: note,").unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].peer, Peer::Username("exampleuser".to_string()));
        assert_eq!(entries[1].peer, Peer::Phone("34600000000".to_string()));
        assert_eq!(entries[2].peer, Peer::Id(1234567));

        assert!(parse_entry_list("good, bad username!").is_err());
    }

    #[test]
    fn test_username_matching_is_case_insensitive() {
        let entry: Entry = "ExampleUser".parse().unwrap();
        assert!(entry.matches(&Peer::username("@EXAMPLEUSER")));
    }
}
