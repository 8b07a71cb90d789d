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

//! Tracing initialization
//!
//! Diagnostics go to stderr so stdout carries only the chosen output format.
//! `RUST_LOG` always wins over the configured level.

use tracing_subscriber::EnvFilter;

/// Pick the filter directive: verbose flag, then RUST_LOG, then settings
pub fn resolve_filter(configured: &str, verbose: bool, rust_log: Option<&str>) -> String {
    if verbose {
        return "debug".to_string();
    }
    match rust_log {
        Some(directive) if !directive.trim().is_empty() => directive.to_string(),
        _ => configured.to_string(),
    }
}

pub fn init_logging(configured: &str, verbose: bool) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let directive = resolve_filter(configured, verbose, rust_log.as_deref());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    // A subscriber may already be installed (tests, embedding); keep it
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_env_filter(filter)
        .try_init();
}
