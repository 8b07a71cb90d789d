/*
 * This file is part of Browserprint.
 *
 * Copyright (C) 2025 Browserprint contributors
 *
 * Browserprint is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Browserprint is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Browserprint. If not, see <https://www.gnu.org/licenses/>.
 */

//! Settings
//!
//! Persistent settings stored as JSON in ~/.config/browserprint/settings.json.
//! A missing file means defaults; every field has its own default so older
//! files keep loading.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use bp_error::{BrowserprintError, Result};
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILENAME: &str = "settings.json";

/// Overrides the settings location when set
pub const CONFIG_ENV_VAR: &str = "BROWSERPRINT_CONFIG";

const MIN_UPLOAD_TIMEOUT_MS: u64 = 100;
const MAX_UPLOAD_TIMEOUT_MS: u64 = 60_000;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Headline lines only
    #[default]
    Summary,
    /// Every signal as an aligned key/value table
    Table,
    /// The upload payload as pretty JSON
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub general: GeneralSettings,

    #[serde(default)]
    pub output: OutputSettings,

    #[serde(default)]
    pub upload: UploadSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Default log filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadSettings {
    /// Transmission is off unless explicitly enabled
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_upload_timeout")]
    pub timeout_ms: u64,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_upload_timeout() -> u64 {
    5000
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            timeout_ms: default_upload_timeout(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.general.log_level.to_ascii_lowercase().as_str()) {
            return Err(BrowserprintError::invalid_config(
                "general.log_level",
                format!("expected one of {}", LOG_LEVELS.join(", ")),
            ));
        }

        if !(MIN_UPLOAD_TIMEOUT_MS..=MAX_UPLOAD_TIMEOUT_MS).contains(&self.upload.timeout_ms) {
            return Err(BrowserprintError::invalid_config(
                "upload.timeout_ms",
                format!(
                    "must be between {} and {}",
                    MIN_UPLOAD_TIMEOUT_MS, MAX_UPLOAD_TIMEOUT_MS
                ),
            ));
        }

        if let Some(endpoint) = &self.upload.endpoint {
            validate_endpoint(endpoint)?;
        } else if self.upload.enabled {
            return Err(BrowserprintError::invalid_config(
                "upload.endpoint",
                "required when upload is enabled",
            ));
        }

        Ok(())
    }

    /// Endpoint to upload to, if transmission is enabled
    pub fn upload_endpoint(&self) -> Option<&str> {
        if self.upload.enabled {
            self.upload.endpoint.as_deref()
        } else {
            None
        }
    }
}

/// Only absolute http(s) URLs are accepted
pub fn validate_endpoint(endpoint: &str) -> Result<()> {
    let url = reqwest::Url::parse(endpoint)
        .map_err(|e| BrowserprintError::invalid_config("upload.endpoint", e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(BrowserprintError::invalid_config(
            "upload.endpoint",
            format!("unsupported scheme {:?}, must be http or https", other),
        )),
    }
}

/// Resolve the settings file location
pub fn get_settings_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    let dir = dirs::config_dir()
        .ok_or_else(|| BrowserprintError::config("Could not determine config directory"))?;
    Ok(dir.join("browserprint").join(SETTINGS_FILENAME))
}

/// Load settings from `path`, falling back to defaults if it does not exist
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = fs::read_to_string(path).map_err(|e| BrowserprintError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let settings: Settings = serde_json::from_str(&content).map_err(|e| {
        BrowserprintError::config(format!("Failed to parse settings JSON: {}", e))
    })?;
    settings.validate()?;
    Ok(settings)
}

pub fn load_settings() -> Result<Settings> {
    load_settings_from(&get_settings_path()?)
}

/// Write settings atomically: temp file, sync, rename
pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    settings.validate()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BrowserprintError::FileWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let json = serde_json::to_string_pretty(settings)?;
    let temp_path = path.with_extension("json.tmp");

    let write_err = |e| BrowserprintError::FileWrite {
        path: temp_path.clone(),
        source: e,
    };
    let mut file = fs::File::create(&temp_path).map_err(write_err)?;
    file.write_all(json.as_bytes()).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|e| BrowserprintError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
