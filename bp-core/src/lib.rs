//! Browserprint Core Library
//!
//! Collects ambient signals from a browser runtime and condenses them into a
//! fingerprint record and a short digest.
//!
//! # Module Structure
//!
//! - `env/` - Environment provider trait, capability handles, snapshot environment
//! - `probe/` - Individual probes and their failure handling
//! - `catalog` - The ordered probe list
//! - `pipeline` - Sequential collection into a sealed record
//! - `digest` - Short digest derivation
//! - `sink` - Output sink seam
//!
//! # Example
//!
//! ```
//! use bp_core::{CollectionPipeline, SnapshotEnvironment};
//!
//! let env = SnapshotEnvironment::default();
//! let collection = CollectionPipeline::default().collect(&env).unwrap();
//! println!("{} -> {}", collection.record.len(), collection.digest);
//! ```

pub mod catalog;
pub mod constants;
pub mod digest;
pub mod env;
pub mod error;
pub mod pipeline;
pub mod probe;
pub mod record;
pub mod sink;

pub use bp_protocol::{FingerprintPayload, Primitive, Signal, SignalValue};

pub use catalog::ProbeCatalog;
pub use digest::{generate_short_digest, ShortDigest};
pub use env::{
    AudioContext, Canvas2d, DebugRendererInfo, DoNotTrack, Environment, GpuDescriptor,
    ScreenMetrics, SnapshotEnvironment, StorageAvailability, WebGlContext,
};
pub use error::{BrowserprintError, CapabilityError, Result};
pub use pipeline::{Collection, CollectionPipeline, ProbeReport, ProbeStatus};
pub use probe::{Probe, ProbeOutcome};
pub use record::{FingerprintRecord, RecordBuilder};
pub use sink::{deliver, OutputSink};
