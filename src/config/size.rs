use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Serializer};

lazy_static! {
    static ref SIZE_RE: Regex = Regex::new(r"^(\d+(?:\.\d*)?)\s*([A-Za-z]+)?$").unwrap();
}

/// A byte quantity parsed from strings like "1MB", "200KB" or "8".
/// A bare number means megabytes.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct ByteSize(u64);

impl ByteSize {
    pub const fn from_bytes(bytes: u64) -> Self {
        ByteSize(bytes)
    }

    pub fn bytes(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl FromStr for ByteSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty size".to_string());
        }

        let caps = SIZE_RE
            .captures(s)
            .ok_or_else(|| format!("not a size: {s:?}"))?;
        let num: f64 = caps[1]
            .parse()
            .map_err(|e| format!("invalid number: {e}"))?;

        let multiplier: u64 = match caps.get(2).map(|m| m.as_str().to_uppercase()) {
            Some(u) => match u.as_str() {
                "B" => 1,
                "KB" => 1024,
                "MB" => 1024 * 1024,
                "GB" => 1024 * 1024 * 1024,
                other => return Err(format!("unknown unit {other:?}, expected B, KB, MB or GB")),
            },
            // No unit means megabytes
            None => 1024 * 1024,
        };

        Ok(ByteSize((num * multiplier as f64) as u64))
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const UNITS: [(u64, &str); 3] = [
            (1024 * 1024 * 1024, "GB"),
            (1024 * 1024, "MB"),
            (1024, "KB"),
        ];
        for (factor, unit) in UNITS {
            if self.0 >= factor {
                return if self.0 % factor == 0 {
                    write!(f, "{}{}", self.0 / factor, unit)
                } else {
                    write!(f, "{:.2}{}", self.0 as f64 / factor as f64, unit)
                };
            }
        }
        write!(f, "{}B", self.0)
    }
}

impl Serialize for ByteSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_units() {
        assert_eq!("1MB".parse::<ByteSize>().unwrap().bytes(), 1024 * 1024);
        assert_eq!("200B".parse::<ByteSize>().unwrap().bytes(), 200);
        assert_eq!("16kb".parse::<ByteSize>().unwrap().bytes(), 16 * 1024);
        assert_eq!(
            "2GB".parse::<ByteSize>().unwrap().bytes(),
            2 * 1024 * 1024 * 1024
        );
    }

    #[test]
    fn test_bare_number_is_megabytes() {
        assert_eq!("8".parse::<ByteSize>().unwrap().bytes(), 8 * 1024 * 1024);
    }

    #[test]
    fn test_decimal_sizes() {
        assert_eq!(
            "1.5GB".parse::<ByteSize>().unwrap().bytes(),
            (1.5 * 1024.0 * 1024.0 * 1024.0) as u64
        );
        // Trailing dot is fine, bare dot is not
        assert!("1.MB".parse::<ByteSize>().is_ok());
        assert!(".5MB".parse::<ByteSize>().is_err());
    }

    #[test]
    fn test_zero_disables() {
        assert!("0".parse::<ByteSize>().unwrap().is_zero());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!("".parse::<ByteSize>().is_err());
        assert!("12TB".parse::<ByteSize>().is_err());
        assert!("big".parse::<ByteSize>().is_err());
        assert!("-1MB".parse::<ByteSize>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!("1MB".parse::<ByteSize>().unwrap().to_string(), "1MB");
        assert_eq!(ByteSize::from_bytes(512).to_string(), "512B");
        assert_eq!(ByteSize::from_bytes(1536).to_string(), "1.50KB");
    }
}
