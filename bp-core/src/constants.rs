//! Constants for Browserprint
//!
//! Centralizes signal keys, sentinel values and the fixed canvas scene.
//! Changing anything in `keys` or `canvas` changes every digest produced
//! afterwards; bump `catalog::VERSION` when that happens.

/// Probe catalog versioning
pub mod catalog {
    /// Version of the probe catalog layout (order and key set)
    pub const VERSION: u32 = 1;
}

/// Sentinel values recorded in place of an observation
pub mod sentinel {
    /// The runtime refused access to a capability
    pub const BLOCKED: &str = "blocked";

    /// The value is missing or falsy
    pub const UNKNOWN: &str = "unknown";
}

/// Signal keys, grouped by the probe that emits them
pub mod keys {
    // Rendering surface
    pub const CANVAS_ID: &str = "canvas_id";
    pub const POSSIBLE_BLOCKING: &str = "possible_blocking";

    // Navigator descriptors
    pub const USER_AGENT: &str = "user_agent";
    pub const LANGUAGE: &str = "language";
    pub const PIXEL_RATIO: &str = "pixel_ratio";
    pub const HARDWARE_CONCURRENCY: &str = "hardware_concurrency";

    // Screen
    pub const RESOLUTION: &str = "resolution";
    pub const AVAILABLE_RESOLUTION: &str = "available_resolution";

    pub const TIMEZONE_OFFSET: &str = "timezone_offset";

    // Storage (true = capability absent)
    pub const SESSION_STORAGE: &str = "session_storage";
    pub const LOCAL_STORAGE: &str = "local_storage";
    pub const INDEXED_DB: &str = "indexed_db";
    pub const OPEN_DATABASE: &str = "open_database";

    // Platform and hardware
    pub const NAVIGATOR_PLATFORM: &str = "navigator_platform";
    pub const NAVIGATOR_BUILD_ID: &str = "navigator_buildID";
    pub const DEVICE_MEMORY: &str = "mem";
    pub const JAVA_ENABLED: &str = "java_enabled";

    pub const FONT_FAMILY: &str = "font_family";

    // Optional descriptors
    pub const GPU_SIZE: &str = "gpu_size";
    pub const NAVIGATOR_OSCPU: &str = "navigator_oscpu";
    pub const DO_NOT_TRACK: &str = "do_not_track";

    pub const TOUCH_SUPPORT: &str = "touch_support";

    /// Prefix for per-plugin keys, followed by the zero-based index
    pub const NAVIGATOR_PLUGIN_PREFIX: &str = "navigator_plugin_";

    pub const COOKIE_ENABLED: &str = "cookie_enabled";

    // 3D rendering context
    pub const WEBGL_VENDOR: &str = "webgl_vendor";
    pub const WEBGL_RENDERER: &str = "webgl_renderer";
    pub const WEBGL_SUPPORT: &str = "webgl_support";

    // Audio
    pub const AUDIO_SAMPLE_RATE: &str = "audio_sample_rate";
    pub const AUDIO_SUPPORT: &str = "audio_support";

    /// Key for the plugin at `index`
    pub fn navigator_plugin(index: usize) -> String {
        format!("{}{}", NAVIGATOR_PLUGIN_PREFIX, index)
    }

    /// True if `key` was produced by the plugin enumeration probe
    pub fn is_navigator_plugin(key: &str) -> bool {
        key.strip_prefix(NAVIGATOR_PLUGIN_PREFIX)
            .map(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false)
    }
}

/// Fixed drawing used by the rendering-surface probe
pub mod canvas {
    /// Text drawn twice onto the surface
    pub const TEXT: &str = "BrowserLeaks,com <canvas> 1.0";

    pub const FONT: &str = "14px 'Arial'";

    pub const BASELINE_INITIAL: &str = "top";
    pub const BASELINE_DRAW: &str = "alphabetic";

    pub const RECT_FILL: &str = "#f60";
    /// x, y, width, height
    pub const RECT: (f64, f64, f64, f64) = (125.0, 1.0, 62.0, 20.0);

    pub const TEXT_FILL_PRIMARY: &str = "#069";
    pub const TEXT_POS_PRIMARY: (f64, f64) = (2.0, 15.0);

    pub const TEXT_FILL_SHADOW: &str = "rgba(102, 204, 0, 0.7)";
    pub const TEXT_POS_SHADOW: (f64, f64) = (4.0, 17.0);

    /// Prefix stripped from the encoded surface before sampling
    pub const DATA_URL_PREFIX: &str = "data:image/png;base64,";

    /// Character offset sampled from the stripped payload
    pub const SAMPLE_OFFSET: usize = 999;

    /// Used when the payload is shorter than `SAMPLE_OFFSET + 1`
    pub const SAMPLE_PLACEHOLDER: char = 'x';
}

/// Audio defaults for simulated environments
pub mod audio {
    pub const DEFAULT_SAMPLE_RATE: f64 = 48_000.0;
}
