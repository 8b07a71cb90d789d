//! Short digest
//!
//! A lossy positional summary of a record: the first character of each
//! lower-cased value in record order, then the signal count, then the plugin
//! count. Not a hash; different records may collide.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::record::FingerprintRecord;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortDigest(String);

impl ShortDigest {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ShortDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive the short digest of a sealed record. Pure: depends only on the
/// record's ordered values and keys.
pub fn generate_short_digest(record: &FingerprintRecord) -> ShortDigest {
    let mut digest = String::with_capacity(record.len() + 6);

    for signal in record {
        // empty display form contributes nothing
        if let Some(first) = signal.value.to_string().to_lowercase().chars().next() {
            digest.push(first);
        }
    }

    digest.push_str(&record.len().to_string());
    digest.push_str(&record.plugin_count().to_string());
    ShortDigest(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_protocol::{Primitive, Signal};

    fn record(signals: Vec<Signal>) -> FingerprintRecord {
        FingerprintRecord::from_signals(signals).unwrap()
    }

    #[test]
    fn test_first_characters_lowercased() {
        let r = record(vec![
            Signal::new("user_agent", "Mozilla/5.0"),
            Signal::new("language", "EN-us"),
            Signal::new("cookie_enabled", true),
            Signal::new("open_database", false),
            Signal::new("pixel_ratio", 1.5),
        ]);
        assert_eq!(generate_short_digest(&r).as_str(), "metf150");
    }

    #[test]
    fn test_plugin_suffix() {
        let r = record(vec![
            Signal::new("navigator_plugin_0", "PDF Viewer"),
            Signal::new("navigator_plugin_1", "Chrome PDF Viewer"),
            Signal::new("cookie_enabled", true),
        ]);
        assert_eq!(generate_short_digest(&r).as_str(), "pct32");
    }

    #[test]
    fn test_empty_values_contribute_nothing() {
        let r = record(vec![
            Signal::new("font_family", ""),
            Signal::new("resolution", Vec::<Primitive>::new()),
            Signal::new("touch_support", 0),
        ]);
        assert_eq!(generate_short_digest(&r).as_str(), "030");
    }

    #[test]
    fn test_negative_and_list_values() {
        let r = record(vec![
            Signal::new("timezone_offset", -120),
            Signal::new("resolution", vec![Primitive::Integer(1920), Primitive::Integer(1080)]),
        ]);
        assert_eq!(generate_short_digest(&r).as_str(), "-120");
    }

    #[test]
    fn test_tiny_number_uses_exponent_digit() {
        let r = record(vec![Signal::new("pixel_ratio", 1e-7)]);
        assert_eq!(generate_short_digest(&r).as_str(), "110");
    }

    #[test]
    fn test_empty_record() {
        assert_eq!(generate_short_digest(&record(Vec::new())).as_str(), "00");
    }

    #[test]
    fn test_deterministic() {
        let r = record(vec![Signal::new("language", "de-DE"), Signal::new("mem", 8.0)]);
        assert_eq!(generate_short_digest(&r), generate_short_digest(&r.clone()));
        assert_eq!(generate_short_digest(&r).to_string(), "d820");
    }
}
