//! Integrationstests für Pointer-Skripte und Options-Dateien.

use portfolio_badge::shared::options::SETTLER_GAIN;
use portfolio_badge::{
    BadgeEvent, BadgeOptions, Camera3D, CurveType, PointerEvent, PointerScript, Simulation,
};

#[test]
fn test_fixture_script_replays_flick_and_capture_loss() {
    let json = include_str!("fixtures/drag_flick.json");
    let script = PointerScript::parse(json).expect("Fixture sollte gültig sein");
    assert_eq!(script.frame_count(), 30 + 1 + 5 + 120 + 1 + 1 + 60);

    let mut sim = Simulation::new(&BadgeOptions::new()).expect("Szene");
    let camera = Camera3D::new();
    let mut events = Vec::new();
    for frame in script.expanded_frames() {
        let report = sim.step(script.frame_dt, &frame, &camera);
        events.extend(report.events);
    }

    let grabs = events.iter().filter(|e| **e == BadgeEvent::Grabbed).count();
    let releases = events.iter().filter(|e| **e == BadgeEvent::Released).count();
    assert_eq!(grabs, releases, "Jeder Griff muss wieder gelöst werden: {events:?}");
    assert!(!events.contains(&BadgeEvent::Clicked));
    assert!(!sim.is_dragging());
    assert!(sim.card().expect("Karte").is_dynamic());
}

#[test]
fn test_script_events_use_snake_case_tags() {
    let script = PointerScript::parse(
        r#"{ "frames": [ { "events": [ { "type": "capture_lost", "pointer_id": 9 } ] } ] }"#,
    )
    .expect("gültig");
    let frames: Vec<_> = script.expanded_frames().collect();
    assert_eq!(frames[0], vec![PointerEvent::CaptureLost { pointer_id: 9 }]);
}

#[test]
fn test_options_file_roundtrip() {
    let dir = std::env::temp_dir().join(format!("portfolio_badge_it_{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("Temp-Verzeichnis");
    let path = dir.join("portfolio_badge.toml");

    let mut options = BadgeOptions::new();
    options.curve_type = CurveType::Centripetal;
    options.smoothing.max_speed = 70.0;
    options.chain.segment_length = 0.8;
    options.save_to_file(&path).expect("speicherbar");

    let loaded = BadgeOptions::load_from_file(&path);
    assert_eq!(loaded, options);
    assert_eq!(loaded.settler_gain, SETTLER_GAIN);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_missing_options_file_yields_defaults() {
    let path = std::env::temp_dir().join("portfolio_badge_does_not_exist.toml");
    assert_eq!(BadgeOptions::load_from_file(&path), BadgeOptions::new());
}

#[test]
fn test_custom_segment_length_changes_reach() {
    let mut options = BadgeOptions::new();
    options.chain.segment_length = 0.5;
    let sim = Simulation::new(&options).expect("Szene");
    assert_eq!(sim.chain().reach(), 1.5);
}
