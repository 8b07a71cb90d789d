//! Collection pipeline
//!
//! Runs every probe of a catalog in order, one at a time, and seals the
//! result into a record plus its digest. Probe failures never abort a run;
//! only a defect in record assembly does.

use bp_protocol::FingerprintPayload;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, info, warn};

use crate::catalog::ProbeCatalog;
use crate::digest::{generate_short_digest, ShortDigest};
use crate::env::Environment;
use crate::error::{CapabilityError, Result};
use crate::probe::{Probe, ProbeOutcome};
use crate::record::{FingerprintRecord, RecordBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Collected,
    Degraded,
    /// The probe panicked; it contributed no signals
    Panicked,
}

/// Per-probe diagnostics for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub probe: &'static str,
    pub status: ProbeStatus,
    pub signal_count: usize,
    pub reason: Option<String>,
}

/// Everything one run produced
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub record: FingerprintRecord,
    pub digest: ShortDigest,
    pub report: Vec<ProbeReport>,
    pub catalog_version: u32,
}

impl Collection {
    pub fn degraded_probes(&self) -> impl Iterator<Item = &ProbeReport> {
        self.report
            .iter()
            .filter(|r| r.status != ProbeStatus::Collected)
    }

    /// Upload body for this collection
    pub fn to_payload(&self) -> FingerprintPayload {
        FingerprintPayload::new(
            self.record.signals().to_vec(),
            self.digest.as_str(),
            self.catalog_version,
        )
    }
}

#[derive(Debug, Default)]
pub struct CollectionPipeline {
    catalog: ProbeCatalog,
}

impl CollectionPipeline {
    pub fn new(catalog: ProbeCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ProbeCatalog {
        &self.catalog
    }

    /// Run the catalog once against `env`.
    ///
    /// Returns `Err` only for defects in record assembly (duplicate or
    /// malformed keys); these indicate a bug in a probe and are not retried.
    pub fn collect(&self, env: &dyn Environment) -> Result<Collection> {
        let mut builder = RecordBuilder::new();
        let mut report = Vec::with_capacity(self.catalog.len());

        for probe in self.catalog.iter() {
            let (outcome, status) = run_isolated(probe, env);
            let reason = match &outcome {
                ProbeOutcome::Degraded { reason, .. } => Some(reason.to_string()),
                ProbeOutcome::Collected(_) => None,
            };
            let signals = outcome.into_signals();

            debug!(
                probe = probe.name(),
                status = ?status,
                signals = signals.len(),
                "Probe finished"
            );

            report.push(ProbeReport {
                probe: probe.name(),
                status,
                signal_count: signals.len(),
                reason,
            });

            builder.extend(signals).map_err(|e| {
                error!(probe = probe.name(), error = %e, "Record assembly failed");
                e
            })?;
        }

        let record = builder.seal();
        let digest = generate_short_digest(&record);
        let degraded = report
            .iter()
            .filter(|r| r.status != ProbeStatus::Collected)
            .count();

        info!(
            signals = record.len(),
            degraded = degraded,
            digest = %digest,
            catalog_version = self.catalog.version(),
            "Fingerprint collected"
        );

        Ok(Collection {
            record,
            digest,
            report,
            catalog_version: self.catalog.version(),
        })
    }
}

fn run_isolated(probe: &dyn Probe, env: &dyn Environment) -> (ProbeOutcome, ProbeStatus) {
    match panic::catch_unwind(AssertUnwindSafe(|| probe.collect(env))) {
        Ok(outcome) => {
            let status = if outcome.is_degraded() {
                ProbeStatus::Degraded
            } else {
                ProbeStatus::Collected
            };
            (outcome, status)
        }
        Err(_) => {
            warn!(probe = probe.name(), "Probe panicked, recording no signals");
            let outcome = ProbeOutcome::Degraded {
                signals: Vec::new(),
                reason: CapabilityError::operation(format!("probe {} panicked", probe.name())),
            };
            (outcome, ProbeStatus::Panicked)
        }
    }
}
