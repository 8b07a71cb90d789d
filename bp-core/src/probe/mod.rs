//! Probes
//!
//! A probe reads one attribute or a small attribute group from the
//! [`Environment`] and reports zero or more [`Signal`]s. Probes that touch a
//! capability the runtime may refuse recover from that refusal themselves
//! and report a [`ProbeOutcome::Degraded`] carrying sentinel signals.

mod audio;
mod canvas;
mod descriptors;
mod plugins;
mod storage;
mod webgl;

pub use audio::AudioProbe;
pub use canvas::{encode_canvas_sample, sample_data_url, CanvasProbe};
pub use descriptors::{
    CookieProbe, FontProbe, NavigatorProbe, OptionalDescriptorProbe, PlatformProbe, ScreenProbe,
    TimezoneProbe, TouchProbe,
};
pub use plugins::PluginProbe;
pub use storage::StorageProbe;
pub use webgl::WebGlProbe;

use bp_protocol::{Signal, SignalValue};

use crate::constants::sentinel;
use crate::env::Environment;
use crate::error::CapabilityError;

/// Result of running one probe
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// The probe observed its attributes normally
    Collected(Vec<Signal>),
    /// The runtime refused a capability; `signals` hold the sentinels
    Degraded {
        signals: Vec<Signal>,
        reason: CapabilityError,
    },
}

impl ProbeOutcome {
    pub fn signals(&self) -> &[Signal] {
        match self {
            Self::Collected(signals) | Self::Degraded { signals, .. } => signals,
        }
    }

    pub fn into_signals(self) -> Vec<Signal> {
        match self {
            Self::Collected(signals) | Self::Degraded { signals, .. } => signals,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// A unit of collection. Must not panic or block on its own account.
pub trait Probe: Send + Sync {
    /// Stable name used in reports and logs
    fn name(&self) -> &'static str;

    fn collect(&self, env: &dyn Environment) -> ProbeOutcome;
}

/// Text value, or the `"unknown"` sentinel when absent
pub(crate) fn text_or_unknown(value: Option<String>) -> SignalValue {
    match value {
        Some(v) => SignalValue::Text(v),
        None => SignalValue::Text(sentinel::UNKNOWN.to_string()),
    }
}

pub(crate) fn blocked() -> SignalValue {
    SignalValue::Text(sentinel::BLOCKED.to_string())
}

pub(crate) fn unknown() -> SignalValue {
    SignalValue::Text(sentinel::UNKNOWN.to_string())
}
