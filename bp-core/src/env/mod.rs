//! Environment provider
//!
//! Every ambient read a probe performs goes through [`Environment`]. A real
//! host binds it to the browser runtime; [`SnapshotEnvironment`] replays a
//! static description loaded from JSON.

mod snapshot;

pub use snapshot::{
    AudioSnapshot, CanvasMode, CanvasSnapshot, SnapshotEnvironment, WebGlMode, WebGlSnapshot,
};

use serde::{Deserialize, Serialize};

use crate::error::CapabilityError;

/// Screen dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScreenMetrics {
    pub width: u32,
    pub height: u32,
    pub avail_width: u32,
    pub avail_height: u32,
}

/// Presence of each storage API (true = present)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageAvailability {
    pub session_storage: bool,
    pub local_storage: bool,
    pub indexed_db: bool,
    pub open_database: bool,
}

impl Default for StorageAvailability {
    fn default() -> Self {
        Self {
            session_storage: true,
            local_storage: true,
            indexed_db: true,
            open_database: false,
        }
    }
}

/// GPU adapter descriptor, present only when the runtime exposes a GPU API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GpuDescriptor {
    /// Number of shading-language features advertised
    pub wgsl_feature_count: Option<u32>,
}

/// State of the do-not-track preference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DoNotTrack {
    /// The runtime has no such attribute
    Unsupported,
    /// The attribute exists but the user never set it
    #[default]
    Unset,
    /// The user's declared preference, verbatim
    Value(String),
}

/// Unmasked GPU strings exposed by the debug renderer extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugRendererInfo {
    pub vendor: String,
    pub renderer: String,
}

/// A 2D drawing surface
#[cfg_attr(test, mockall::automock)]
pub trait Canvas2d {
    fn set_text_baseline(&mut self, baseline: &str) -> Result<(), CapabilityError>;
    fn set_font(&mut self, font: &str) -> Result<(), CapabilityError>;
    fn set_fill_style(&mut self, style: &str) -> Result<(), CapabilityError>;
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), CapabilityError>;
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), CapabilityError>;

    /// Encode the surface as a `data:` URL
    fn to_data_url(&self) -> Result<String, CapabilityError>;
}

/// A hardware-accelerated 3D drawing context
#[cfg_attr(test, mockall::automock)]
pub trait WebGlContext {
    /// `Ok(None)` when the debug renderer extension is unavailable
    fn debug_renderer_info(&self) -> Result<Option<DebugRendererInfo>, CapabilityError>;
}

/// An audio processing context. Must be closed once acquired.
#[cfg_attr(test, mockall::automock)]
pub trait AudioContext {
    fn sample_rate(&self) -> f64;
    fn close(&mut self) -> Result<(), CapabilityError>;
}

/// Source of every ambient value the probes read
#[cfg_attr(test, mockall::automock)]
pub trait Environment {
    fn user_agent(&self) -> Option<String>;
    fn language(&self) -> Option<String>;
    fn device_pixel_ratio(&self) -> f64;
    /// `None` or zero when the runtime does not say
    fn hardware_concurrency(&self) -> Option<u32>;
    fn screen(&self) -> ScreenMetrics;
    /// Minutes behind UTC, same sign convention as the runtime
    fn timezone_offset_minutes(&self) -> i32;
    fn storage(&self) -> StorageAvailability;
    fn platform(&self) -> Option<String>;
    /// Whether the navigator exposes a `buildID` attribute
    fn has_build_id(&self) -> bool;
    /// Approximate RAM in GiB
    fn device_memory(&self) -> Option<f64>;
    fn java_enabled(&self) -> bool;
    /// Computed `font-family` of the document body, unprocessed
    fn computed_font_family(&self) -> Option<String>;
    fn gpu(&self) -> Option<GpuDescriptor>;
    /// Legacy OS/CPU string, only on some engines
    fn oscpu(&self) -> Option<String>;
    fn do_not_track(&self) -> DoNotTrack;
    fn max_touch_points(&self) -> u32;
    /// Plugin display names in installation order
    fn plugins(&self) -> Vec<String>;
    fn cookie_enabled(&self) -> bool;

    fn create_canvas_2d(&self) -> Result<Box<dyn Canvas2d>, CapabilityError>;
    /// `Ok(None)` when the runtime returns no context without raising
    fn create_webgl_context(&self) -> Result<Option<Box<dyn WebGlContext>>, CapabilityError>;
    fn create_audio_context(&self) -> Result<Box<dyn AudioContext>, CapabilityError>;
}
