//! Rendering-surface probe
//!
//! Draws a fixed scene onto a 2D surface, encodes it, and keeps one
//! base64-encoded character sampled from the encoded image.

use base64::Engine;
use bp_protocol::Signal;
use tracing::{debug, warn};

use super::{blocked, Probe, ProbeOutcome};
use crate::constants::{canvas, keys};
use crate::env::{Canvas2d, Environment};
use crate::error::CapabilityError;

#[derive(Debug, Default, Clone, Copy)]
pub struct CanvasProbe;

impl Probe for CanvasProbe {
    fn name(&self) -> &'static str {
        "canvas"
    }

    fn collect(&self, env: &dyn Environment) -> ProbeOutcome {
        match canvas_id(env) {
            Ok(id) => {
                debug!(canvas_id = %id, "Canvas fingerprint collected");
                ProbeOutcome::Collected(vec![Signal::new(keys::CANVAS_ID, id)])
            }
            Err(reason) => {
                warn!(error = %reason, "Canvas probe blocked");
                ProbeOutcome::Degraded {
                    signals: vec![
                        Signal::new(keys::CANVAS_ID, blocked()),
                        Signal::new(keys::POSSIBLE_BLOCKING, true),
                    ],
                    reason,
                }
            }
        }
    }
}

fn canvas_id(env: &dyn Environment) -> Result<String, CapabilityError> {
    let mut surface = env.create_canvas_2d()?;
    draw_scene(surface.as_mut())?;
    let data_url = surface.to_data_url()?;
    encode_canvas_sample(sample_data_url(&data_url))
}

fn draw_scene(surface: &mut dyn Canvas2d) -> Result<(), CapabilityError> {
    let (rx, ry, rw, rh) = canvas::RECT;
    let (px, py) = canvas::TEXT_POS_PRIMARY;
    let (sx, sy) = canvas::TEXT_POS_SHADOW;

    surface.set_text_baseline(canvas::BASELINE_INITIAL)?;
    surface.set_font(canvas::FONT)?;
    surface.set_text_baseline(canvas::BASELINE_DRAW)?;
    surface.set_fill_style(canvas::RECT_FILL)?;
    surface.fill_rect(rx, ry, rw, rh)?;
    surface.set_fill_style(canvas::TEXT_FILL_PRIMARY)?;
    surface.fill_text(canvas::TEXT, px, py)?;
    surface.set_fill_style(canvas::TEXT_FILL_SHADOW)?;
    surface.fill_text(canvas::TEXT, sx, sy)?;
    Ok(())
}

/// Character at the sample offset of the encoded payload, or the placeholder
/// when the payload is too short. Only the first occurrence of the data URL
/// prefix is removed.
pub fn sample_data_url(data_url: &str) -> char {
    let payload = data_url.replacen(canvas::DATA_URL_PREFIX, "", 1);
    payload
        .chars()
        .nth(canvas::SAMPLE_OFFSET)
        .unwrap_or(canvas::SAMPLE_PLACEHOLDER)
}

/// Base64 of the sampled character taken as a single Latin-1 byte.
/// Characters outside Latin-1 cannot be encoded this way.
pub fn encode_canvas_sample(sample: char) -> Result<String, CapabilityError> {
    let byte = u8::try_from(u32::from(sample)).map_err(|_| {
        CapabilityError::operation(format!("sample {:?} is outside Latin-1", sample))
    })?;
    Ok(base64::engine::general_purpose::STANDARD.encode([byte]))
}
