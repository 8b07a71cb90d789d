//! Fingerprint record
//!
//! An ordered, sealed sequence of signals. Records are only created through
//! [`RecordBuilder`], which enforces key validity and uniqueness; once sealed
//! a record cannot be modified.

use bp_protocol::{validate_signal_key, Signal, SignalValue};
use serde::Serialize;
use std::collections::HashSet;

use crate::constants::keys;
use crate::error::{BrowserprintError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FingerprintRecord {
    signals: Vec<Signal>,
}

impl FingerprintRecord {
    /// Rebuild a record from signals received elsewhere, e.g. a stored payload
    pub fn from_signals(signals: Vec<Signal>) -> Result<Self> {
        let mut builder = RecordBuilder::with_capacity(signals.len());
        builder.extend(signals)?;
        Ok(builder.seal())
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Signal> {
        self.signals.iter()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&SignalValue> {
        self.signals.iter().find(|s| s.key == key).map(|s| &s.value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.signals.iter().map(|s| s.key.as_str())
    }

    /// Number of signals emitted by plugin enumeration
    pub fn plugin_count(&self) -> usize {
        self.keys().filter(|k| keys::is_navigator_plugin(k)).count()
    }

    pub fn into_signals(self) -> Vec<Signal> {
        self.signals
    }

    /// Hex of the first 8 bytes of a SHA-256 over the record's JSON form,
    /// in digest byte order. JSON keeps `true` and `"true"` apart.
    pub fn canonical_hash(&self) -> Result<String> {
        use sha2::{Digest, Sha256};

        let json = serde_json::to_vec(&self.signals)?;
        let digest = Sha256::digest(&json);
        Ok(digest[..8].iter().map(|b| format!("{:02x}", b)).collect())
    }
}

impl<'a> IntoIterator for &'a FingerprintRecord {
    type Item = &'a Signal;
    type IntoIter = std::slice::Iter<'a, Signal>;

    fn into_iter(self) -> Self::IntoIter {
        self.signals.iter()
    }
}

/// Accumulates signals in arrival order
#[derive(Debug, Default)]
pub struct RecordBuilder {
    signals: Vec<Signal>,
    seen: HashSet<String>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            signals: Vec::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
        }
    }

    /// Append one signal. A repeated or malformed key is a collection defect.
    pub fn push(&mut self, signal: Signal) -> Result<()> {
        validate_signal_key(&signal.key).map_err(|reason| BrowserprintError::InvalidSignalKey {
            key: signal.key.clone(),
            reason,
        })?;
        if !self.seen.insert(signal.key.clone()) {
            return Err(BrowserprintError::DuplicateSignal(signal.key));
        }
        self.signals.push(signal);
        Ok(())
    }

    pub fn extend(&mut self, signals: impl IntoIterator<Item = Signal>) -> Result<()> {
        for signal in signals {
            self.push(signal)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn seal(self) -> FingerprintRecord {
        FingerprintRecord {
            signals: self.signals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_order() {
        let mut builder = RecordBuilder::new();
        builder.push(Signal::new("user_agent", "Test/1.0")).unwrap();
        builder.push(Signal::new("language", "en-US")).unwrap();
        builder.push(Signal::new("cookie_enabled", true)).unwrap();

        let record = builder.seal();
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["user_agent", "language", "cookie_enabled"]);
        assert_eq!(record.get("language"), Some(&SignalValue::Text("en-US".into())));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_duplicate_key_is_defect() {
        let mut builder = RecordBuilder::new();
        builder.push(Signal::new("language", "en-US")).unwrap();
        let err = builder.push(Signal::new("language", "fr-FR")).unwrap_err();
        assert!(err.is_defect());
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_invalid_key_is_defect() {
        let mut builder = RecordBuilder::new();
        let err = builder.push(Signal::new("bad key", 1)).unwrap_err();
        assert!(matches!(err, BrowserprintError::InvalidSignalKey { .. }));
    }

    #[test]
    fn test_plugin_count() {
        let record = FingerprintRecord::from_signals(vec![
            Signal::new("navigator_platform", "Linux"),
            Signal::new("navigator_plugin_0", "A"),
            Signal::new("navigator_plugin_1", "B"),
        ])
        .unwrap();
        assert_eq!(record.plugin_count(), 2);
    }

    #[test]
    fn test_canonical_hash_is_type_sensitive() {
        let as_bool = FingerprintRecord::from_signals(vec![Signal::new("k", true)]).unwrap();
        let as_text = FingerprintRecord::from_signals(vec![Signal::new("k", "true")]).unwrap();
        assert_ne!(as_bool.canonical_hash().unwrap(), as_text.canonical_hash().unwrap());
        assert_eq!(as_bool.canonical_hash().unwrap(), as_bool.clone().canonical_hash().unwrap());
        assert_eq!(as_bool.canonical_hash().unwrap().len(), 16);
    }

    #[test]
    fn test_canonical_hash_is_order_sensitive() {
        let ab = FingerprintRecord::from_signals(vec![Signal::new("a", 1), Signal::new("b", 2)])
            .unwrap();
        let ba = FingerprintRecord::from_signals(vec![Signal::new("b", 2), Signal::new("a", 1)])
            .unwrap();
        assert_ne!(ab.canonical_hash().unwrap(), ba.canonical_hash().unwrap());
    }

    #[test]
    fn test_canonical_hash_is_json_digest_prefix() {
        let empty = RecordBuilder::new().seal();
        assert_eq!(empty.canonical_hash().unwrap(), "4f53cda18c2baa0c");

        let record =
            FingerprintRecord::from_signals(vec![Signal::new("touch_support", 0)]).unwrap();
        assert_eq!(record.canonical_hash().unwrap(), "72bdf806ef072791");
    }

    #[test]
    fn test_serializes_as_signal_array() {
        let record =
            FingerprintRecord::from_signals(vec![Signal::new("touch_support", 0)]).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"[{"key":"touch_support","value":0}]"#);
    }
}
