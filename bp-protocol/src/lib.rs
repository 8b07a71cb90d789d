use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum serialized size of an upload payload (64KB)
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024;

/// Maximum length of a signal key
const MAX_KEY_LENGTH: usize = 64;

/// Maximum number of signals accepted in one payload
const MAX_SIGNAL_COUNT: usize = 512;

/// A scalar observation. Serialized as the bare JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Primitive {
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
}

/// The value half of a [`Signal`]: a primitive or a short list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignalValue {
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    List(Vec<Primitive>),
}

/// One key/value observation made by a probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub key: String,
    pub value: SignalValue,
}

impl Signal {
    pub fn new(key: impl Into<String>, value: impl Into<SignalValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

// ============================================================================
// Display form
// ============================================================================

/// Format a number the way a script runtime stringifies it: integral values
/// carry no fractional part, non-finite values use their named forms, and
/// magnitudes below 1e-6 or from 1e21 up switch to exponent form (`1e-7`,
/// `1.5e+21`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        // covers -0.0
        return "0".to_string();
    }
    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        return exponent_form(value);
    }
    if value.fract() == 0.0 {
        return format!("{:.0}", value);
    }
    format!("{}", value)
}

/// Shortest round-trip digits with an explicitly signed exponent
fn exponent_form(value: f64) -> String {
    let formatted = format!("{:e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Bool(b) => write!(f, "{}", b),
            Primitive::Integer(i) => write!(f, "{}", i),
            Primitive::Number(n) => f.write_str(&format_number(*n)),
            Primitive::Text(s) => f.write_str(s),
        }
    }
}

impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalValue::Bool(b) => write!(f, "{}", b),
            SignalValue::Integer(i) => write!(f, "{}", i),
            SignalValue::Number(n) => f.write_str(&format_number(*n)),
            SignalValue::Text(s) => f.write_str(s),
            SignalValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for SignalValue {
    fn from(v: bool) -> Self {
        SignalValue::Bool(v)
    }
}

impl From<i64> for SignalValue {
    fn from(v: i64) -> Self {
        SignalValue::Integer(v)
    }
}

impl From<i32> for SignalValue {
    fn from(v: i32) -> Self {
        SignalValue::Integer(v as i64)
    }
}

impl From<u32> for SignalValue {
    fn from(v: u32) -> Self {
        SignalValue::Integer(v as i64)
    }
}

impl From<f64> for SignalValue {
    fn from(v: f64) -> Self {
        SignalValue::Number(v)
    }
}

impl From<String> for SignalValue {
    fn from(v: String) -> Self {
        SignalValue::Text(v)
    }
}

impl From<&str> for SignalValue {
    fn from(v: &str) -> Self {
        SignalValue::Text(v.to_string())
    }
}

impl From<Vec<Primitive>> for SignalValue {
    fn from(v: Vec<Primitive>) -> Self {
        SignalValue::List(v)
    }
}

impl From<u32> for Primitive {
    fn from(v: u32) -> Self {
        Primitive::Integer(v as i64)
    }
}

impl From<f64> for Primitive {
    fn from(v: f64) -> Self {
        Primitive::Number(v)
    }
}

impl From<&str> for Primitive {
    fn from(v: &str) -> Self {
        Primitive::Text(v.to_string())
    }
}

// ============================================================================
// Upload payload
// ============================================================================

/// Body posted to a collection endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerprintPayload {
    /// Ordered signals exactly as collected
    pub fingerprint: Vec<Signal>,
    /// Short digest derived from `fingerprint`
    pub short_id: String,
    /// Probe catalog version the record was collected with
    #[serde(default)]
    pub schema_version: u32,
}

impl FingerprintPayload {
    pub fn new(fingerprint: Vec<Signal>, short_id: impl Into<String>, schema_version: u32) -> Self {
        Self {
            fingerprint,
            short_id: short_id.into(),
            schema_version,
        }
    }

    /// Validate payload contents before it is sent anywhere
    pub fn validate(&self) -> Result<(), String> {
        if self.fingerprint.len() > MAX_SIGNAL_COUNT {
            return Err(format!(
                "Too many signals: {} > {}",
                self.fingerprint.len(),
                MAX_SIGNAL_COUNT
            ));
        }
        if self.short_id.is_empty() {
            return Err("Short id cannot be empty".into());
        }
        let mut seen = std::collections::HashSet::with_capacity(self.fingerprint.len());
        for signal in &self.fingerprint {
            validate_signal_key(&signal.key)?;
            if !seen.insert(signal.key.as_str()) {
                return Err(format!("Duplicate signal key: {}", signal.key));
            }
        }
        Ok(())
    }

    /// Serialize to JSON, enforcing [`MAX_PAYLOAD_SIZE`]
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, PayloadError> {
        self.validate().map_err(PayloadError::Invalid)?;
        let bytes = serde_json::to_vec(self)
            .map_err(|e| PayloadError::Invalid(format!("Failed to serialize payload: {}", e)))?;
        if bytes.len() > MAX_PAYLOAD_SIZE {
            return Err(PayloadError::TooLarge {
                size: bytes.len(),
                max_size: MAX_PAYLOAD_SIZE,
            });
        }
        Ok(bytes)
    }
}

/// Why a payload cannot be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// Contents fail validation
    Invalid(String),
    /// Serialized form exceeds the size limit
    TooLarge { size: usize, max_size: usize },
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadError::Invalid(reason) => write!(f, "Invalid payload: {}", reason),
            PayloadError::TooLarge { size, max_size } => {
                write!(f, "Payload too large: {} > {} bytes", size, max_size)
            }
        }
    }
}

impl std::error::Error for PayloadError {}

/// Signal keys are short snake_case-ish identifiers. Mixed case is allowed
/// because `navigator_buildID` is part of the established key set.
pub fn validate_signal_key(key: &str) -> Result<(), String> {
    if key.is_empty() {
        return Err("Signal key cannot be empty".into());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(format!(
            "Signal key too long: {} > {} chars",
            key.len(),
            MAX_KEY_LENGTH
        ));
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("Signal key contains invalid characters: {:?}", key));
    }
    if key.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(format!("Signal key cannot start with a digit: {:?}", key));
    }
    Ok(())
}
