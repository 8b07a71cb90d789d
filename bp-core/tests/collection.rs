//! End-to-end collection tests against simulated environments

use bp_core::constants::keys;
use bp_core::env::{CanvasMode, WebGlMode};
use bp_core::{
    generate_short_digest, CollectionPipeline, DebugRendererInfo, DoNotTrack, ProbeStatus,
    ScreenMetrics, Signal, SignalValue, SnapshotEnvironment, StorageAvailability,
};

fn test_environment() -> SnapshotEnvironment {
    let mut env = SnapshotEnvironment::default();
    env.user_agent = Some("Test/1.0".to_string());
    env.language = Some("en-US".to_string());
    env.device_pixel_ratio = 1.0;
    env.hardware_concurrency = Some(4);
    env.screen = ScreenMetrics {
        width: 1920,
        height: 1080,
        avail_width: 1920,
        avail_height: 1040,
    };
    env.timezone_offset_minutes = 0;
    env.storage = StorageAvailability {
        session_storage: true,
        local_storage: true,
        indexed_db: true,
        open_database: true,
    };
    env.platform = Some("Linux x86_64".to_string());
    env.has_build_id = false;
    env.device_memory = Some(8.0);
    env.java_enabled = false;
    env.font_family = Some("\"Arial\"".to_string());
    env.gpu = None;
    env.oscpu = None;
    env.do_not_track = DoNotTrack::Unset;
    env.max_touch_points = 0;
    env.plugins = vec!["A".to_string(), "B".to_string()];
    env.cookie_enabled = true;
    env.canvas.data_url = "data:image/png;base64,iVBOR".to_string();
    env.webgl.debug_info = Some(DebugRendererInfo {
        vendor: "Intel".to_string(),
        renderer: "Mesa".to_string(),
    });
    env.audio.sample_rate = 44_100.0;
    env
}

fn keys_of(collection: &bp_core::Collection) -> Vec<String> {
    collection.record.keys().map(str::to_string).collect()
}

#[test]
fn test_end_to_end_scenario() {
    let env = test_environment();
    let collection = CollectionPipeline::default().collect(&env).unwrap();
    let record = &collection.record;

    assert_eq!(record.get(keys::CANVAS_ID), Some(&SignalValue::Text("eA==".into())));
    assert_eq!(record.get("navigator_plugin_0"), Some(&SignalValue::Text("A".into())));
    assert_eq!(record.get("navigator_plugin_1"), Some(&SignalValue::Text("B".into())));
    for key in [keys::SESSION_STORAGE, keys::LOCAL_STORAGE, keys::INDEXED_DB, keys::OPEN_DATABASE] {
        assert_eq!(record.get(key), Some(&SignalValue::Bool(false)), "{}", key);
    }

    assert_eq!(record.len(), 24);
    assert_eq!(collection.digest.as_str(), "ete14110fffflf8fa0abtim4242");
    assert!(collection.digest.as_str().ends_with(&format!("{}2", record.len())));
    assert_eq!(collection.degraded_probes().count(), 0);
    assert_eq!(env.live_audio_contexts(), 0);
}

#[test]
fn test_record_order_follows_catalog() {
    let collection = CollectionPipeline::default().collect(&test_environment()).unwrap();
    assert_eq!(
        keys_of(&collection),
        vec![
            "canvas_id",
            "user_agent",
            "language",
            "pixel_ratio",
            "hardware_concurrency",
            "resolution",
            "available_resolution",
            "timezone_offset",
            "session_storage",
            "local_storage",
            "indexed_db",
            "open_database",
            "navigator_platform",
            "navigator_buildID",
            "mem",
            "java_enabled",
            "font_family",
            "touch_support",
            "navigator_plugin_0",
            "navigator_plugin_1",
            "cookie_enabled",
            "webgl_vendor",
            "webgl_renderer",
            "audio_sample_rate",
        ]
    );
}

#[test]
fn test_collection_is_deterministic() {
    let pipeline = CollectionPipeline::default();
    let first = pipeline.collect(&test_environment()).unwrap();
    let second = pipeline.collect(&test_environment()).unwrap();

    assert_eq!(first.record, second.record);
    assert_eq!(first.digest, second.digest);
    assert_eq!(generate_short_digest(&first.record), first.digest);
    assert_eq!(
        first.record.canonical_hash().unwrap(),
        second.record.canonical_hash().unwrap()
    );
}

#[test]
fn test_blocked_canvas_emits_diagnostic_pair() {
    let mut env = test_environment();
    env.canvas.mode = CanvasMode::Blocked;
    let collection = CollectionPipeline::default().collect(&env).unwrap();

    let signals = collection.record.signals();
    assert_eq!(signals[0], Signal::new("canvas_id", "blocked"));
    assert_eq!(signals[1], Signal::new("possible_blocking", true));
    assert_eq!(signals[2].key, "user_agent");
    assert_eq!(collection.report[0].status, ProbeStatus::Degraded);
    assert_eq!(collection.record.len(), 25);
}

#[test]
fn test_read_back_denied_matches_blocked_surface() {
    let mut env = test_environment();
    env.canvas.mode = CanvasMode::ReadBackDenied;
    let denied = CollectionPipeline::default().collect(&env).unwrap();

    env.canvas.mode = CanvasMode::Blocked;
    let blocked = CollectionPipeline::default().collect(&env).unwrap();

    assert_eq!(denied.record, blocked.record);
}

#[test]
fn test_blocked_webgl_emits_single_signal() {
    let mut env = test_environment();
    env.webgl.mode = WebGlMode::Blocked;
    let collection = CollectionPipeline::default().collect(&env).unwrap();
    let record = &collection.record;

    assert_eq!(record.get(keys::WEBGL_SUPPORT), Some(&SignalValue::Text("blocked".into())));
    assert_eq!(record.get(keys::WEBGL_VENDOR), None);
    assert_eq!(record.get(keys::WEBGL_RENDERER), None);
    assert_eq!(record.get(keys::POSSIBLE_BLOCKING), None);
    assert_eq!(record.len(), 23);
}

#[test]
fn test_blocked_audio() {
    let mut env = test_environment();
    env.audio.available = false;
    let collection = CollectionPipeline::default().collect(&env).unwrap();

    let last = collection.record.signals().last().unwrap();
    assert_eq!(last, &Signal::new("audio_support", "blocked"));
    assert_eq!(env.live_audio_contexts(), 0);
}

#[test]
fn test_everything_blocked_still_completes() {
    let mut env = test_environment();
    env.canvas.mode = CanvasMode::Blocked;
    env.webgl.mode = WebGlMode::Blocked;
    env.audio.available = false;

    let collection = CollectionPipeline::default().collect(&env).unwrap();
    assert_eq!(collection.degraded_probes().count(), 3);
    assert_eq!(collection.report.len(), 13);
}

#[test]
fn test_storage_polarity() {
    let mut env = test_environment();
    env.storage = StorageAvailability {
        session_storage: false,
        local_storage: true,
        indexed_db: false,
        open_database: true,
    };
    let record = CollectionPipeline::default().collect(&env).unwrap().record;

    assert_eq!(record.get(keys::SESSION_STORAGE), Some(&SignalValue::Bool(true)));
    assert_eq!(record.get(keys::LOCAL_STORAGE), Some(&SignalValue::Bool(false)));
    assert_eq!(record.get(keys::INDEXED_DB), Some(&SignalValue::Bool(true)));
    assert_eq!(record.get(keys::OPEN_DATABASE), Some(&SignalValue::Bool(false)));
}

#[test]
fn test_plugin_enumeration_counts() {
    let mut env = test_environment();
    env.plugins.clear();
    let collection = CollectionPipeline::default().collect(&env).unwrap();
    assert!(collection.record.keys().all(|k| !k.starts_with("navigator_plugin_")));
    assert!(collection.digest.as_str().ends_with("220"));

    let names: Vec<String> = (0..5).map(|i| format!("Plugin {}", i)).collect();
    env.plugins = names.clone();
    let collection = CollectionPipeline::default().collect(&env).unwrap();
    let plugin_signals: Vec<&Signal> = collection
        .record
        .iter()
        .filter(|s| s.key.starts_with("navigator_plugin_"))
        .collect();
    assert_eq!(plugin_signals.len(), 5);
    for (i, signal) in plugin_signals.iter().enumerate() {
        assert_eq!(signal.key, format!("navigator_plugin_{}", i));
        assert_eq!(signal.value, SignalValue::Text(names[i].clone()));
    }
    assert!(collection.digest.as_str().ends_with("275"));
}

#[test]
fn test_snapshot_json_drives_collection() {
    let json = serde_json::to_string(&test_environment()).unwrap();
    let env = SnapshotEnvironment::from_json(&json).unwrap();
    let from_json = CollectionPipeline::default().collect(&env).unwrap();
    let direct = CollectionPipeline::default().collect(&test_environment()).unwrap();
    assert_eq!(from_json.digest, direct.digest);
}
