//! Error types
//!
//! Crate-wide errors come from `bp-error`. [`CapabilityError`] is the
//! probe-local failure raised by an environment capability; probes convert it
//! into sentinel signals and it never crosses the pipeline boundary.

pub use bp_error::{BrowserprintError, Result};

/// Failure raised by a runtime capability (surface, context, attribute read)
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    /// The runtime refused access, typically a privacy protection
    #[error("capability denied: {0}")]
    Denied(String),

    /// A handle (audio context, drawing surface) could not be constructed
    #[error("failed to acquire {0}")]
    ResourceAcquisition(String),

    /// An operation on an acquired handle failed
    #[error("operation failed: {0}")]
    Operation(String),
}

impl CapabilityError {
    pub fn denied(msg: impl Into<String>) -> Self {
        Self::Denied(msg.into())
    }

    pub fn acquisition(msg: impl Into<String>) -> Self {
        Self::ResourceAcquisition(msg.into())
    }

    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }
}
