//! Static environment replayed from a JSON description

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

use super::{
    AudioContext, Canvas2d, DebugRendererInfo, DoNotTrack, Environment, GpuDescriptor,
    ScreenMetrics, StorageAvailability, WebGlContext,
};
use crate::constants;
use crate::error::{BrowserprintError, CapabilityError, Result};

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Maximum snapshot file size accepted (1MB)
const MAX_SNAPSHOT_SIZE: u64 = 1024 * 1024;

/// How the simulated drawing surface behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CanvasMode {
    #[default]
    Available,
    /// Surface creation raises
    Blocked,
    /// Drawing works but encoding the surface raises
    ReadBackDenied,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSnapshot {
    #[serde(default)]
    pub mode: CanvasMode,
    /// Returned verbatim by `to_data_url`
    #[serde(default = "default_canvas_data_url")]
    pub data_url: String,
}

impl Default for CanvasSnapshot {
    fn default() -> Self {
        Self {
            mode: CanvasMode::Available,
            data_url: default_canvas_data_url(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WebGlMode {
    #[default]
    Available,
    /// Context creation raises
    Blocked,
    /// The runtime silently returns no context
    NoContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WebGlSnapshot {
    #[serde(default)]
    pub mode: WebGlMode,
    /// `None` when the debug renderer extension is unavailable
    #[serde(default)]
    pub debug_info: Option<DebugRendererInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSnapshot {
    /// False simulates a runtime that refuses to construct the context
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,
}

impl Default for AudioSnapshot {
    fn default() -> Self {
        Self {
            available: true,
            sample_rate: constants::audio::DEFAULT_SAMPLE_RATE,
        }
    }
}

/// A fully static environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEnvironment {
    pub user_agent: Option<String>,
    pub language: Option<String>,
    pub device_pixel_ratio: f64,
    pub hardware_concurrency: Option<u32>,
    pub screen: ScreenMetrics,
    pub timezone_offset_minutes: i32,
    pub storage: StorageAvailability,
    pub platform: Option<String>,
    #[serde(default)]
    pub has_build_id: bool,
    pub device_memory: Option<f64>,
    #[serde(default)]
    pub java_enabled: bool,
    pub font_family: Option<String>,
    #[serde(default)]
    pub gpu: Option<GpuDescriptor>,
    #[serde(default)]
    pub oscpu: Option<String>,
    #[serde(default)]
    pub do_not_track: DoNotTrack,
    #[serde(default)]
    pub max_touch_points: u32,
    #[serde(default)]
    pub plugins: Vec<String>,
    #[serde(default = "default_true")]
    pub cookie_enabled: bool,
    #[serde(default)]
    pub canvas: CanvasSnapshot,
    #[serde(default)]
    pub webgl: WebGlSnapshot,
    #[serde(default)]
    pub audio: AudioSnapshot,

    /// Audio contexts handed out and not yet closed
    #[serde(skip)]
    pub(crate) live_audio: Arc<AtomicUsize>,
}

fn default_true() -> bool {
    true
}

fn default_sample_rate() -> f64 {
    constants::audio::DEFAULT_SAMPLE_RATE
}

/// A deterministic PNG-looking data URL long enough to be sampled
pub fn default_canvas_data_url() -> String {
    const BODY: &str = "iVBORw0KGgoAAAANSUhEUgAAASwAAACWCAYAAABkW7XSAAAgAElEQVR4Xu2dB3hUVdrH";
    let mut url = String::from(constants::canvas::DATA_URL_PREFIX);
    while url.len() < constants::canvas::DATA_URL_PREFIX.len() + 1200 {
        url.push_str(BODY);
    }
    url
}

impl Default for SnapshotEnvironment {
    fn default() -> Self {
        Self {
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
            language: Some("en-US".to_string()),
            device_pixel_ratio: 1.0,
            hardware_concurrency: Some(8),
            screen: ScreenMetrics {
                width: 1920,
                height: 1080,
                avail_width: 1920,
                avail_height: 1050,
            },
            timezone_offset_minutes: 0,
            storage: StorageAvailability::default(),
            platform: Some("Linux x86_64".to_string()),
            has_build_id: true,
            device_memory: None,
            java_enabled: false,
            font_family: Some("\"DejaVu Serif\", serif".to_string()),
            gpu: None,
            oscpu: Some("Linux x86_64".to_string()),
            do_not_track: DoNotTrack::Unset,
            max_touch_points: 0,
            plugins: vec![
                "PDF Viewer".to_string(),
                "Chrome PDF Viewer".to_string(),
            ],
            cookie_enabled: true,
            canvas: CanvasSnapshot::default(),
            webgl: WebGlSnapshot {
                mode: WebGlMode::Available,
                debug_info: Some(DebugRendererInfo {
                    vendor: "Mozilla".to_string(),
                    renderer: "Mozilla".to_string(),
                }),
            },
            audio: AudioSnapshot::default(),
            live_audio: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl SnapshotEnvironment {
    /// Load a snapshot from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let meta = fs::metadata(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BrowserprintError::FileNotFound(path.to_path_buf())
            } else {
                BrowserprintError::FileRead {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        if meta.len() > MAX_SNAPSHOT_SIZE {
            return Err(BrowserprintError::PayloadTooLarge {
                size: meta.len() as usize,
                max_size: MAX_SNAPSHOT_SIZE as usize,
            });
        }
        let content = fs::read_to_string(path).map_err(|e| BrowserprintError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let env = Self::from_json(&content)?;
        debug!(path = %path.display(), plugins = env.plugins.len(), "Loaded environment snapshot");
        Ok(env)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Audio contexts created through this environment and not yet closed
    pub fn live_audio_contexts(&self) -> usize {
        self.live_audio.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Simulated capability handles
// ============================================================================

struct SnapshotCanvas {
    data_url: String,
    read_back_denied: bool,
    drawn: bool,
}

impl Canvas2d for SnapshotCanvas {
    fn set_text_baseline(&mut self, _baseline: &str) -> std::result::Result<(), CapabilityError> {
        Ok(())
    }

    fn set_font(&mut self, _font: &str) -> std::result::Result<(), CapabilityError> {
        Ok(())
    }

    fn set_fill_style(&mut self, _style: &str) -> std::result::Result<(), CapabilityError> {
        Ok(())
    }

    fn fill_rect(
        &mut self,
        _x: f64,
        _y: f64,
        _width: f64,
        _height: f64,
    ) -> std::result::Result<(), CapabilityError> {
        self.drawn = true;
        Ok(())
    }

    fn fill_text(
        &mut self,
        _text: &str,
        _x: f64,
        _y: f64,
    ) -> std::result::Result<(), CapabilityError> {
        self.drawn = true;
        Ok(())
    }

    fn to_data_url(&self) -> std::result::Result<String, CapabilityError> {
        if self.read_back_denied {
            return Err(CapabilityError::denied("surface read-back"));
        }
        // A blank surface encodes differently from a drawn one
        if !self.drawn {
            return Ok(constants::canvas::DATA_URL_PREFIX.to_string());
        }
        Ok(self.data_url.clone())
    }
}

struct SnapshotWebGl {
    debug_info: Option<DebugRendererInfo>,
}

impl WebGlContext for SnapshotWebGl {
    fn debug_renderer_info(
        &self,
    ) -> std::result::Result<Option<DebugRendererInfo>, CapabilityError> {
        Ok(self.debug_info.clone())
    }
}

struct SnapshotAudio {
    sample_rate: f64,
    live: Arc<AtomicUsize>,
    closed: bool,
}

impl AudioContext for SnapshotAudio {
    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn close(&mut self) -> std::result::Result<(), CapabilityError> {
        if self.closed {
            return Err(CapabilityError::operation("audio context already closed"));
        }
        self.closed = true;
        self.live.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Environment for SnapshotEnvironment {
    fn user_agent(&self) -> Option<String> {
        self.user_agent.clone()
    }

    fn language(&self) -> Option<String> {
        self.language.clone()
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    fn hardware_concurrency(&self) -> Option<u32> {
        self.hardware_concurrency
    }

    fn screen(&self) -> ScreenMetrics {
        self.screen
    }

    fn timezone_offset_minutes(&self) -> i32 {
        self.timezone_offset_minutes
    }

    fn storage(&self) -> StorageAvailability {
        self.storage
    }

    fn platform(&self) -> Option<String> {
        self.platform.clone()
    }

    fn has_build_id(&self) -> bool {
        self.has_build_id
    }

    fn device_memory(&self) -> Option<f64> {
        self.device_memory
    }

    fn java_enabled(&self) -> bool {
        self.java_enabled
    }

    fn computed_font_family(&self) -> Option<String> {
        self.font_family.clone()
    }

    fn gpu(&self) -> Option<GpuDescriptor> {
        self.gpu
    }

    fn oscpu(&self) -> Option<String> {
        self.oscpu.clone()
    }

    fn do_not_track(&self) -> DoNotTrack {
        self.do_not_track.clone()
    }

    fn max_touch_points(&self) -> u32 {
        self.max_touch_points
    }

    fn plugins(&self) -> Vec<String> {
        self.plugins.clone()
    }

    fn cookie_enabled(&self) -> bool {
        self.cookie_enabled
    }

    fn create_canvas_2d(&self) -> std::result::Result<Box<dyn Canvas2d>, CapabilityError> {
        match self.canvas.mode {
            CanvasMode::Blocked => Err(CapabilityError::denied("2d context")),
            mode => Ok(Box::new(SnapshotCanvas {
                data_url: self.canvas.data_url.clone(),
                read_back_denied: mode == CanvasMode::ReadBackDenied,
                drawn: false,
            })),
        }
    }

    fn create_webgl_context(
        &self,
    ) -> std::result::Result<Option<Box<dyn WebGlContext>>, CapabilityError> {
        match self.webgl.mode {
            WebGlMode::Blocked => Err(CapabilityError::denied("webgl context")),
            WebGlMode::NoContext => Ok(None),
            WebGlMode::Available => Ok(Some(Box::new(SnapshotWebGl {
                debug_info: self.webgl.debug_info.clone(),
            }))),
        }
    }

    fn create_audio_context(&self) -> std::result::Result<Box<dyn AudioContext>, CapabilityError> {
        if !self.audio.available {
            return Err(CapabilityError::acquisition("audio context"));
        }
        self.live_audio.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(SnapshotAudio {
            sample_rate: self.audio.sample_rate,
            live: Arc::clone(&self.live_audio),
            closed: false,
        }))
    }
}
