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

//! Presentation sinks
//!
//! Renderers for a finished collection: headline summary, full key/value
//! table, JSON payload and tracing diagnostics.

use std::io::Write;

use bp_core::constants::keys;
use bp_core::{Collection, OutputSink, ProbeStatus};
use bp_error::{BrowserprintError, Result};
use tracing::{debug, info, warn};

use crate::config::OutputFormat;

fn io_err(e: std::io::Error) -> BrowserprintError {
    BrowserprintError::sink(e.to_string())
}

/// Headline lines: canvas id, digest, platform and user agent
pub struct SummarySink<W: Write> {
    out: W,
}

impl<W: Write> SummarySink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputSink for SummarySink<W> {
    fn name(&self) -> &str {
        "summary"
    }

    fn consume(&mut self, collection: &Collection) -> Result<()> {
        let record = &collection.record;

        if let Some(id) = record.get(keys::CANVAS_ID) {
            writeln!(self.out, "Canvas ID: {}", id).map_err(io_err)?;
        }
        writeln!(self.out, "Fingerprint ID: {}", collection.digest).map_err(io_err)?;
        if let Some(platform) = record.get(keys::NAVIGATOR_PLATFORM) {
            writeln!(self.out, "Device Platform: {}", platform).map_err(io_err)?;
        }
        if let Some(ua) = record.get(keys::USER_AGENT) {
            writeln!(self.out, "User Agent: {}", ua).map_err(io_err)?;
        }
        writeln!(self.out, "Record Hash: {}", record.canonical_hash()?).map_err(io_err)?;
        self.out.flush().map_err(io_err)
    }
}

/// Every signal in record order, keys left-aligned
pub struct TableSink<W: Write> {
    out: W,
}

impl<W: Write> TableSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputSink for TableSink<W> {
    fn name(&self) -> &str {
        "table"
    }

    fn consume(&mut self, collection: &Collection) -> Result<()> {
        let width = collection
            .record
            .keys()
            .map(str::len)
            .max()
            .unwrap_or(0)
            .max("KEY".len());

        writeln!(self.out, "{:<width$}  VALUE", "KEY", width = width).map_err(io_err)?;
        writeln!(self.out, "{}  {}", "-".repeat(width), "-".repeat(5)).map_err(io_err)?;
        for signal in &collection.record {
            writeln!(self.out, "{:<width$}  {}", signal.key, signal.value, width = width)
                .map_err(io_err)?;
        }
        writeln!(self.out).map_err(io_err)?;
        writeln!(self.out, "Fingerprint ID: {}", collection.digest).map_err(io_err)?;
        self.out.flush().map_err(io_err)
    }
}

/// The upload payload as pretty JSON
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputSink for JsonSink<W> {
    fn name(&self) -> &str {
        "json"
    }

    fn consume(&mut self, collection: &Collection) -> Result<()> {
        let json = serde_json::to_string_pretty(&collection.to_payload())?;
        writeln!(self.out, "{}", json).map_err(io_err)?;
        self.out.flush().map_err(io_err)
    }
}

/// Diagnostic entries through tracing
#[derive(Debug, Default)]
pub struct LogSink;

impl OutputSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    fn consume(&mut self, collection: &Collection) -> Result<()> {
        for signal in &collection.record {
            debug!(key = %signal.key, value = %signal.value, "Signal");
        }
        for report in &collection.report {
            match report.status {
                ProbeStatus::Collected => {}
                ProbeStatus::Degraded | ProbeStatus::Panicked => warn!(
                    probe = report.probe,
                    status = ?report.status,
                    reason = report.reason.as_deref().unwrap_or(""),
                    "Probe did not collect normally"
                ),
            }
        }
        let hash = collection.record.canonical_hash()?;
        info!(
            digest = %collection.digest,
            signals = collection.record.len(),
            hash = %hash,
            "Short fingerprint"
        );
        Ok(())
    }
}

/// Sinks for a run: the chosen stdout renderer plus diagnostics
pub fn sinks_for(format: OutputFormat) -> Vec<Box<dyn OutputSink>> {
    let stdout = std::io::stdout();
    let primary: Box<dyn OutputSink> = match format {
        OutputFormat::Summary => Box::new(SummarySink::new(stdout)),
        OutputFormat::Table => Box::new(TableSink::new(stdout)),
        OutputFormat::Json => Box::new(JsonSink::new(stdout)),
    };
    vec![primary, Box::new(LogSink)]
}
