//! 3D rendering context probe
//!
//! Unlike the canvas probe, a refused context yields a single
//! `webgl_support="blocked"` signal with no `possible_blocking` companion.

use bp_protocol::Signal;
use tracing::{debug, warn};

use super::{blocked, unknown, Probe, ProbeOutcome};
use crate::constants::keys;
use crate::env::Environment;

#[derive(Debug, Default, Clone, Copy)]
pub struct WebGlProbe;

impl Probe for WebGlProbe {
    fn name(&self) -> &'static str {
        "webgl"
    }

    fn collect(&self, env: &dyn Environment) -> ProbeOutcome {
        let attempt = env.create_webgl_context().and_then(|context| match context {
            Some(ctx) => ctx.debug_renderer_info().map(Some),
            None => Ok(None),
        });

        match attempt {
            Ok(Some(Some(info))) => ProbeOutcome::Collected(vec![
                Signal::new(keys::WEBGL_VENDOR, info.vendor),
                Signal::new(keys::WEBGL_RENDERER, info.renderer),
            ]),
            Ok(Some(None)) => {
                debug!("Debug renderer extension unavailable");
                ProbeOutcome::Collected(vec![
                    Signal::new(keys::WEBGL_VENDOR, unknown()),
                    Signal::new(keys::WEBGL_RENDERER, unknown()),
                ])
            }
            Ok(None) => {
                debug!("Runtime returned no 3D context");
                ProbeOutcome::Collected(Vec::new())
            }
            Err(reason) => {
                warn!(error = %reason, "WebGL probe blocked");
                ProbeOutcome::Degraded {
                    signals: vec![Signal::new(keys::WEBGL_SUPPORT, blocked())],
                    reason,
                }
            }
        }
    }
}
