//! Audio subsystem probe
//!
//! Opens an audio context, reads its sample rate and closes it again. The
//! context is closed on every path once it exists; a context that could not
//! be constructed has nothing to release.

use bp_protocol::Signal;
use tracing::{debug, warn};

use super::{blocked, Probe, ProbeOutcome};
use crate::constants::keys;
use crate::env::{AudioContext, Environment};

#[derive(Debug, Default, Clone, Copy)]
pub struct AudioProbe;

/// Closes the wrapped context when dropped
struct AudioContextGuard {
    ctx: Box<dyn AudioContext>,
}

impl AudioContextGuard {
    fn sample_rate(&self) -> f64 {
        self.ctx.sample_rate()
    }
}

impl Drop for AudioContextGuard {
    fn drop(&mut self) {
        if let Err(e) = self.ctx.close() {
            debug!(error = %e, "Audio context close failed");
        }
    }
}

impl Probe for AudioProbe {
    fn name(&self) -> &'static str {
        "audio"
    }

    fn collect(&self, env: &dyn Environment) -> ProbeOutcome {
        match env.create_audio_context() {
            Ok(ctx) => {
                let guard = AudioContextGuard { ctx };
                let rate = guard.sample_rate();
                drop(guard);
                ProbeOutcome::Collected(vec![Signal::new(keys::AUDIO_SAMPLE_RATE, rate)])
            }
            Err(reason) => {
                warn!(error = %reason, "Audio probe blocked");
                ProbeOutcome::Degraded {
                    signals: vec![Signal::new(keys::AUDIO_SUPPORT, blocked())],
                    reason,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{MockAudioContext, MockEnvironment, SnapshotEnvironment};
    use crate::error::CapabilityError;

    #[test]
    fn test_sample_rate_and_close() {
        let mut env = MockEnvironment::new();
        env.expect_create_audio_context().returning(|| {
            let mut ctx = MockAudioContext::new();
            ctx.expect_sample_rate().return_const(44_100.0);
            ctx.expect_close().times(1).returning(|| Ok(()));
            Ok(Box::new(ctx))
        });

        let outcome = AudioProbe.collect(&env);
        assert_eq!(
            outcome,
            ProbeOutcome::Collected(vec![Signal::new(keys::AUDIO_SAMPLE_RATE, 44_100.0)])
        );
        assert_eq!(outcome.signals()[0].value.to_string(), "44100");
    }

    #[test]
    fn test_close_failure_is_swallowed() {
        let mut env = MockEnvironment::new();
        env.expect_create_audio_context().returning(|| {
            let mut ctx = MockAudioContext::new();
            ctx.expect_sample_rate().return_const(48_000.0);
            ctx.expect_close()
                .times(1)
                .returning(|| Err(CapabilityError::operation("already closing")));
            Ok(Box::new(ctx))
        });

        assert!(!AudioProbe.collect(&env).is_degraded());
    }

    #[test]
    fn test_acquisition_failure() {
        let mut env = MockEnvironment::new();
        env.expect_create_audio_context()
            .returning(|| Err(CapabilityError::acquisition("audio context")));

        let outcome = AudioProbe.collect(&env);
        assert!(outcome.is_degraded());
        assert_eq!(outcome.signals(), &[Signal::new(keys::AUDIO_SUPPORT, "blocked")][..]);
    }

    #[test]
    fn test_no_live_context_left_behind() {
        let env = SnapshotEnvironment::default();
        AudioProbe.collect(&env);
        assert_eq!(env.live_audio_contexts(), 0);
    }
}
