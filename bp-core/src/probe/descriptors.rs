//! Environment descriptor probes
//!
//! Static, low-risk attributes. None of these can fail; absent values become
//! the `"unknown"` sentinel, except the optional descriptors which are simply
//! left out when the runtime does not expose them.

use bp_protocol::{Primitive, Signal, SignalValue};

use super::{text_or_unknown, unknown, Probe, ProbeOutcome};
use crate::constants::keys;
use crate::env::{DoNotTrack, Environment};

/// User agent, language, pixel density and logical processor count
#[derive(Debug, Default, Clone, Copy)]
pub struct NavigatorProbe;

impl Probe for NavigatorProbe {
    fn name(&self) -> &'static str {
        "navigator"
    }

    fn collect(&self, env: &dyn Environment) -> ProbeOutcome {
        let concurrency = match env.hardware_concurrency() {
            Some(n) if n > 0 => SignalValue::from(n),
            _ => unknown(),
        };

        ProbeOutcome::Collected(vec![
            Signal::new(keys::USER_AGENT, text_or_unknown(env.user_agent())),
            Signal::new(keys::LANGUAGE, text_or_unknown(env.language())),
            Signal::new(keys::PIXEL_RATIO, env.device_pixel_ratio()),
            Signal::new(keys::HARDWARE_CONCURRENCY, concurrency),
        ])
    }
}

/// Full and available screen area
#[derive(Debug, Default, Clone, Copy)]
pub struct ScreenProbe;

impl Probe for ScreenProbe {
    fn name(&self) -> &'static str {
        "screen"
    }

    fn collect(&self, env: &dyn Environment) -> ProbeOutcome {
        let screen = env.screen();
        // available area is height-first
        ProbeOutcome::Collected(vec![
            Signal::new(
                keys::RESOLUTION,
                vec![Primitive::from(screen.width), Primitive::from(screen.height)],
            ),
            Signal::new(
                keys::AVAILABLE_RESOLUTION,
                vec![Primitive::from(screen.avail_height), Primitive::from(screen.avail_width)],
            ),
        ])
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TimezoneProbe;

impl Probe for TimezoneProbe {
    fn name(&self) -> &'static str {
        "timezone"
    }

    fn collect(&self, env: &dyn Environment) -> ProbeOutcome {
        ProbeOutcome::Collected(vec![Signal::new(
            keys::TIMEZONE_OFFSET,
            env.timezone_offset_minutes(),
        )])
    }
}

/// Platform string, build id presence, memory hint and applet support
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformProbe;

impl Probe for PlatformProbe {
    fn name(&self) -> &'static str {
        "platform"
    }

    fn collect(&self, env: &dyn Environment) -> ProbeOutcome {
        let memory = match env.device_memory() {
            Some(gib) if gib > 0.0 && !gib.is_nan() => SignalValue::from(gib),
            _ => unknown(),
        };

        ProbeOutcome::Collected(vec![
            Signal::new(keys::NAVIGATOR_PLATFORM, text_or_unknown(env.platform())),
            Signal::new(keys::NAVIGATOR_BUILD_ID, env.has_build_id()),
            Signal::new(keys::DEVICE_MEMORY, memory),
            Signal::new(keys::JAVA_ENABLED, env.java_enabled()),
        ])
    }
}

/// Computed body font family with double quotes removed
#[derive(Debug, Default, Clone, Copy)]
pub struct FontProbe;

impl Probe for FontProbe {
    fn name(&self) -> &'static str {
        "font"
    }

    fn collect(&self, env: &dyn Environment) -> ProbeOutcome {
        let family = env.computed_font_family().map(|f| f.replace('"', ""));
        ProbeOutcome::Collected(vec![Signal::new(keys::FONT_FAMILY, text_or_unknown(family))])
    }
}

/// GPU feature count, legacy OS string and do-not-track, each only when exposed
#[derive(Debug, Default, Clone, Copy)]
pub struct OptionalDescriptorProbe;

impl Probe for OptionalDescriptorProbe {
    fn name(&self) -> &'static str {
        "optional_descriptors"
    }

    fn collect(&self, env: &dyn Environment) -> ProbeOutcome {
        let mut signals = Vec::new();

        if let Some(gpu) = env.gpu() {
            let size = match gpu.wgsl_feature_count {
                Some(n) if n > 0 => SignalValue::from(n),
                _ => unknown(),
            };
            signals.push(Signal::new(keys::GPU_SIZE, size));
        }

        if let Some(oscpu) = env.oscpu().filter(|s| !s.is_empty()) {
            signals.push(Signal::new(keys::NAVIGATOR_OSCPU, oscpu));
        }

        match env.do_not_track() {
            DoNotTrack::Unset => {}
            DoNotTrack::Unsupported => signals.push(Signal::new(keys::DO_NOT_TRACK, unknown())),
            DoNotTrack::Value(v) => signals.push(Signal::new(keys::DO_NOT_TRACK, v)),
        }

        ProbeOutcome::Collected(signals)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TouchProbe;

impl Probe for TouchProbe {
    fn name(&self) -> &'static str {
        "touch"
    }

    fn collect(&self, env: &dyn Environment) -> ProbeOutcome {
        ProbeOutcome::Collected(vec![Signal::new(keys::TOUCH_SUPPORT, env.max_touch_points())])
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CookieProbe;

impl Probe for CookieProbe {
    fn name(&self) -> &'static str {
        "cookies"
    }

    fn collect(&self, env: &dyn Environment) -> ProbeOutcome {
        ProbeOutcome::Collected(vec![Signal::new(keys::COOKIE_ENABLED, env.cookie_enabled())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{GpuDescriptor, ScreenMetrics, SnapshotEnvironment};

    fn value_of<'a>(outcome: &'a ProbeOutcome, key: &str) -> Option<&'a SignalValue> {
        outcome.signals().iter().find(|s| s.key == key).map(|s| &s.value)
    }

    #[test]
    fn test_navigator_unknowns() {
        let env = SnapshotEnvironment {
            user_agent: None,
            hardware_concurrency: Some(0),
            ..SnapshotEnvironment::default()
        };
        let outcome = NavigatorProbe.collect(&env);
        assert_eq!(value_of(&outcome, keys::USER_AGENT), Some(&unknown()));
        assert_eq!(value_of(&outcome, keys::HARDWARE_CONCURRENCY), Some(&unknown()));
        assert_eq!(
            value_of(&outcome, keys::LANGUAGE),
            Some(&SignalValue::Text("en-US".into()))
        );
    }

    #[test]
    fn test_screen_order() {
        let env = SnapshotEnvironment {
            screen: ScreenMetrics {
                width: 2560,
                height: 1440,
                avail_width: 2500,
                avail_height: 1400,
            },
            ..SnapshotEnvironment::default()
        };
        let outcome = ScreenProbe.collect(&env);
        assert_eq!(
            value_of(&outcome, keys::RESOLUTION).map(|v| v.to_string()),
            Some("2560,1440".to_string())
        );
        assert_eq!(
            value_of(&outcome, keys::AVAILABLE_RESOLUTION).map(|v| v.to_string()),
            Some("1400,2500".to_string())
        );
    }

    #[test]
    fn test_memory_hint_falls_back() {
        let env = SnapshotEnvironment {
            device_memory: Some(0.0),
            ..SnapshotEnvironment::default()
        };
        let outcome = PlatformProbe.collect(&env);
        assert_eq!(value_of(&outcome, keys::DEVICE_MEMORY), Some(&unknown()));

        let env = SnapshotEnvironment {
            device_memory: Some(8.0),
            ..SnapshotEnvironment::default()
        };
        let outcome = PlatformProbe.collect(&env);
        assert_eq!(
            value_of(&outcome, keys::DEVICE_MEMORY),
            Some(&SignalValue::Number(8.0))
        );
    }

    #[test]
    fn test_font_quotes_stripped() {
        let env = SnapshotEnvironment {
            font_family: Some("\"Times New Roman\", serif".to_string()),
            ..SnapshotEnvironment::default()
        };
        let outcome = FontProbe.collect(&env);
        assert_eq!(
            value_of(&outcome, keys::FONT_FAMILY),
            Some(&SignalValue::Text("Times New Roman, serif".into()))
        );
    }

    #[test]
    fn test_optional_descriptors_skipped_when_absent() {
        let env = SnapshotEnvironment {
            gpu: None,
            oscpu: None,
            do_not_track: DoNotTrack::Unset,
            ..SnapshotEnvironment::default()
        };
        assert!(OptionalDescriptorProbe.collect(&env).signals().is_empty());
    }

    #[test]
    fn test_optional_descriptors_present() {
        let env = SnapshotEnvironment {
            gpu: Some(GpuDescriptor { wgsl_feature_count: None }),
            oscpu: Some("Windows NT 10.0; Win64; x64".to_string()),
            do_not_track: DoNotTrack::Value("1".to_string()),
            ..SnapshotEnvironment::default()
        };
        let outcome = OptionalDescriptorProbe.collect(&env);
        let emitted: Vec<&str> = outcome.signals().iter().map(|s| s.key.as_str()).collect();
        assert_eq!(emitted, vec![keys::GPU_SIZE, keys::NAVIGATOR_OSCPU, keys::DO_NOT_TRACK]);
        assert_eq!(value_of(&outcome, keys::GPU_SIZE), Some(&unknown()));
        assert_eq!(
            value_of(&outcome, keys::DO_NOT_TRACK),
            Some(&SignalValue::Text("1".into()))
        );
    }

    #[test]
    fn test_unsupported_do_not_track_is_unknown() {
        let env = SnapshotEnvironment {
            oscpu: None,
            do_not_track: DoNotTrack::Unsupported,
            ..SnapshotEnvironment::default()
        };
        let outcome = OptionalDescriptorProbe.collect(&env);
        assert_eq!(outcome.signals().len(), 1);
        assert_eq!(value_of(&outcome, keys::DO_NOT_TRACK), Some(&unknown()));
    }
}
