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

//! Fingerprint upload
//!
//! Posts `{fingerprint, short_id, schema_version}` to a collection endpoint.
//! Transmission is best-effort: [`Uploader::spawn`] logs failures and never
//! reports them back to the collector.

use std::time::Duration;

use bp_error::{BrowserprintError, Result};
use bp_protocol::{FingerprintPayload, PayloadError};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::validate_endpoint;

#[derive(Debug, Clone)]
pub struct Uploader {
    client: Client,
    endpoint: Url,
}

impl Uploader {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        validate_endpoint(endpoint)?;
        let endpoint = Url::parse(endpoint)
            .map_err(|e| BrowserprintError::invalid_config("upload.endpoint", e.to_string()))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                BrowserprintError::upload(format!("Failed to build HTTP client: {}", e))
            })?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send one payload and report the outcome
    pub async fn send(&self, payload: &FingerprintPayload) -> Result<()> {
        let body = payload.to_json_bytes().map_err(payload_error)?;
        debug!(endpoint = %self.endpoint, bytes = body.len(), "Uploading fingerprint");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                BrowserprintError::upload(format!("Request to {} failed: {}", self.endpoint, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BrowserprintError::upload(format!(
                "{} returned {}",
                self.endpoint, status
            )));
        }

        info!(endpoint = %self.endpoint, short_id = %payload.short_id, "Fingerprint uploaded");
        Ok(())
    }

    /// Fire-and-forget upload. The returned handle resolves once the attempt
    /// is over; it carries no error.
    pub fn spawn(&self, payload: FingerprintPayload) -> JoinHandle<()> {
        let uploader = self.clone();
        tokio::spawn(async move {
            if let Err(e) = uploader.send(&payload).await {
                warn!(error = %e, "Fingerprint upload failed");
            }
        })
    }
}

fn payload_error(e: PayloadError) -> BrowserprintError {
    match e {
        PayloadError::TooLarge { size, max_size } => {
            BrowserprintError::PayloadTooLarge { size, max_size }
        }
        PayloadError::Invalid(reason) => BrowserprintError::upload(reason),
    }
}
