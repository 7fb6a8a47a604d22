//! Integrationstests für die Frame-Schleife:
//! - Ketten-Grenze über ein komplettes Skript
//! - Konvergenz der Glättung
//! - Drag-Treue, Schwung beim Loslassen
//! - Kurven-Endpunkte und Stetigkeit

use approx::assert_relative_eq;
use glam::{Quat, Vec2, Vec3};
use portfolio_badge::{
    BadgeEvent, BadgeOptions, Camera3D, PointerEvent, PointerScript, Simulation, SmoothedJoint,
    RIBBON_SAMPLE_COUNT,
};

const DT: f32 = 1.0 / 60.0;

/// Hängt die Kette senkrecht unter den Anker, alle Geschwindigkeiten null.
fn hang_at_rest(sim: &mut Simulation) {
    let chain = sim.chain().clone();
    let anchor = chain.anchor_position(sim.world()).expect("Anker");
    let placements = [
        (chain.j1, anchor - Vec3::Y),
        (chain.j2, anchor - Vec3::Y * 2.0),
        (chain.j3, anchor - Vec3::Y * 3.0),
        (chain.card, anchor - Vec3::Y * 3.0 - chain.card_pivot_offset()),
    ];
    for (handle, position) in placements {
        sim.world_mut().teleport(handle, position, Quat::IDENTITY);
    }
}

fn card_ndc(sim: &Simulation, camera: &Camera3D) -> Vec2 {
    let card = sim.card_position().expect("Karte");
    camera.project(card).expect("Karte vor der Kamera").truncate()
}

fn resting_scene() -> (Simulation, Camera3D) {
    let mut sim = Simulation::new(&BadgeOptions::new()).expect("Szene");
    hang_at_rest(&mut sim);
    (sim, Camera3D::new())
}

#[test]
fn test_chain_bound_holds_for_demo_script() {
    let mut sim = Simulation::new(&BadgeOptions::new()).expect("Szene");
    let camera = Camera3D::new();
    let script = PointerScript::demo();
    let chain = sim.chain().clone();
    let bound = chain.max_card_distance() + 1e-3;

    let mut grabbed = false;
    for events in script.expanded_frames() {
        let report = sim.step(script.frame_dt, &events, &camera);
        grabbed |= report.events.contains(&BadgeEvent::Grabbed);

        let anchor = chain.anchor_position(sim.world()).expect("Anker");
        let pivot = sim.card_pivot().expect("Pivot");
        assert!(pivot.is_finite());
        assert!(
            pivot.distance(anchor) <= bound,
            "Pivot-Abstand {} > {}",
            pivot.distance(anchor),
            bound
        );
    }
    assert!(grabbed, "Demo-Skript sollte die Karte greifen");
}

#[test]
fn test_smoothing_converges_on_stationary_joint() {
    let (mut sim, camera) = resting_scene();
    let chain = sim.chain().clone();

    let mut last = [f32::MAX; 2];
    for _ in 0..120 {
        sim.step(DT, &[], &camera);
        for (i, (joint, handle)) in [(SmoothedJoint::J1, chain.j1), (SmoothedJoint::J2, chain.j2)]
            .into_iter()
            .enumerate()
        {
            let filtered = sim.smoothed_position(joint).expect("initialisiert");
            let physics = sim.body_position(handle).expect("Body");
            let distance = filtered.distance(physics);
            assert!(
                distance <= last[i] + 1e-4,
                "Abstand wächst: {} -> {}",
                last[i],
                distance
            );
            last[i] = distance;
        }
    }
    assert!(last.iter().all(|&d| d < 1e-3), "Rest-Abstände {last:?}");
}

#[test]
fn test_drag_places_card_under_pointer() {
    let (mut sim, camera) = resting_scene();
    let start = card_ndc(&sim, &camera);

    let report = sim.step(
        DT,
        &[PointerEvent::Down {
            pointer_id: 1,
            ndc: start,
        }],
        &camera,
    );
    assert_eq!(report.events, vec![BadgeEvent::Grabbed]);
    assert!(sim.is_dragging());
    let grab_offset = sim.drag().grab_offset().expect("Offset");

    let chain = sim.chain().clone();
    for i in 1..=20 {
        let ndc = start + Vec2::new(0.01 * i as f32, 0.15 + 0.005 * i as f32);
        sim.step(DT, &[PointerEvent::Move { pointer_id: 1, ndc }], &camera);

        let expected = camera.drag_point(ndc).expect("gültig") - grab_offset;
        let anchor = chain.anchor_position(sim.world()).expect("Anker");
        let pivot = expected + chain.card_pivot_offset();
        assert!(pivot.distance(anchor) < chain.reach(), "Ziel außerhalb der Reichweite");

        let card = sim.card_position().expect("Karte");
        assert_relative_eq!(card.distance(expected), 0.0, epsilon = 1e-4);
    }
}

#[test]
fn test_release_keeps_kinematic_velocity() {
    let (mut sim, camera) = resting_scene();
    let start = card_ndc(&sim, &camera);
    sim.step(
        DT,
        &[PointerEvent::Down {
            pointer_id: 1,
            ndc: start,
        }],
        &camera,
    );

    let mut ndc = start + Vec2::new(0.0, 0.2);
    sim.step(DT, &[PointerEvent::Move { pointer_id: 1, ndc }], &camera);
    for _ in 0..2 {
        ndc += Vec2::new(0.05, 0.0);
        sim.step(DT, &[PointerEvent::Move { pointer_id: 1, ndc }], &camera);
    }
    let previous = sim.card_position().expect("Karte");
    ndc += Vec2::new(0.05, 0.0);
    sim.step(DT, &[PointerEvent::Move { pointer_id: 1, ndc }], &camera);

    let card = sim.chain().card;
    let implied = (sim.card_position().expect("Karte") - previous) / DT;
    let before = sim.world().linvel(card).expect("Karte");
    assert_relative_eq!(before.distance(implied), 0.0, epsilon = 1e-2);
    assert!(before.x > 1.0, "Karte sollte seitlich bewegt worden sein");

    sim.handle_pointer(&PointerEvent::Up { pointer_id: 1, ndc }, &camera);
    assert!(sim.card().expect("Karte").is_dynamic());
    assert_eq!(
        sim.world().linvel(card),
        Some(before),
        "Loslassen darf den Schwung nicht nullen"
    );

    let report = sim.step(DT, &[], &camera);
    assert!(report.events.contains(&BadgeEvent::Released));
    let after = sim.world().linvel(card).expect("Karte");
    assert!(after.x > 0.0);
    assert!(after.length() > 0.25 * before.length());
}

#[test]
fn test_drag_beyond_reach_pins_pivot_to_rope_length() {
    let (mut sim, camera) = resting_scene();
    let chain = sim.chain().clone();
    let start = card_ndc(&sim, &camera);
    sim.step(
        DT,
        &[PointerEvent::Down {
            pointer_id: 1,
            ndc: start,
        }],
        &camera,
    );
    let grab_offset = sim.drag().grab_offset().expect("Offset");
    let anchor = chain.anchor_position(sim.world()).expect("Anker");

    // Weit nach rechts unten, deutlich außerhalb der Seil-Reichweite
    for i in 1..=10 {
        let ndc = start + Vec2::new(0.08 * i as f32, -0.03 * i as f32);
        sim.step(DT, &[PointerEvent::Move { pointer_id: 1, ndc }], &camera);

        let rotation = sim.world().rotation(chain.card).expect("Karte");
        let unclamped = camera.drag_point(ndc).expect("gültig") - grab_offset;
        let unclamped_pivot = unclamped + rotation * chain.card_pivot_offset();
        assert!(unclamped_pivot.distance(anchor) > chain.reach());

        let pivot = sim.card_pivot().expect("Pivot");
        assert_relative_eq!(pivot.distance(anchor), chain.reach(), epsilon = 1e-4);
        let expected_dir = (unclamped_pivot - anchor).normalize();
        let dir = (pivot - anchor).normalize();
        assert_relative_eq!(dir.dot(expected_dir), 1.0, epsilon = 1e-5);
        assert!(sim.card_position().expect("Karte").distance(unclamped) > 1e-3);
    }
}

#[test]
fn test_ribbon_endpoints_and_continuity() {
    let (mut sim, camera) = resting_scene();
    let chain = sim.chain().clone();
    let start = card_ndc(&sim, &camera);

    let mut frames: Vec<Vec<PointerEvent>> = vec![vec![PointerEvent::Down {
        pointer_id: 1,
        ndc: start,
    }]];
    for i in 1..=15 {
        frames.push(vec![PointerEvent::Move {
            pointer_id: 1,
            ndc: start + Vec2::new(0.04 * i as f32, 0.1),
        }]);
    }
    frames.push(vec![PointerEvent::Up {
        pointer_id: 1,
        ndc: start + Vec2::new(0.6, 0.1),
    }]);
    frames.extend(std::iter::repeat_with(Vec::new).take(90));

    for events in frames {
        sim.step(DT, &events, &camera);
        let points = sim.ribbon().points();
        assert_eq!(points.len(), RIBBON_SAMPLE_COUNT);
        assert_eq!(Some(points[0]), sim.body_position(chain.j3));
        assert_eq!(
            Some(points[RIBBON_SAMPLE_COUNT - 1]),
            chain.anchor_position(sim.world())
        );
        for pair in points.windows(2) {
            assert!(pair[0].is_finite() && pair[1].is_finite());
            assert!(pair[0].distance(pair[1]) < 0.5, "Sprung in der Kurve");
        }
    }
}

#[test]
fn test_click_without_travel_emits_clicked() {
    let (mut sim, camera) = resting_scene();
    let ndc = card_ndc(&sim, &camera);
    let report = sim.step(
        DT,
        &[
            PointerEvent::Down { pointer_id: 4, ndc },
            PointerEvent::Up { pointer_id: 4, ndc },
        ],
        &camera,
    );
    assert_eq!(
        report.events,
        vec![BadgeEvent::Grabbed, BadgeEvent::Released, BadgeEvent::Clicked]
    );
    assert!(!sim.is_dragging());
}

#[test]
fn test_lost_capture_returns_card_to_dynamic() {
    let (mut sim, camera) = resting_scene();
    let ndc = card_ndc(&sim, &camera);
    sim.step(DT, &[PointerEvent::Down { pointer_id: 2, ndc }], &camera);
    assert!(sim.card().expect("Karte").is_kinematic());

    let report = sim.step(DT, &[PointerEvent::CaptureLost { pointer_id: 2 }], &camera);
    assert_eq!(report.events, vec![BadgeEvent::Released]);
    assert!(sim.card().expect("Karte").is_dynamic());
}

#[test]
fn test_non_finite_pointer_never_reaches_bodies() {
    let (mut sim, camera) = resting_scene();
    let ndc = card_ndc(&sim, &camera);
    sim.step(DT, &[PointerEvent::Down { pointer_id: 1, ndc }], &camera);
    for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
        sim.step(
            DT,
            &[PointerEvent::Move {
                pointer_id: 1,
                ndc: Vec2::new(bad, 0.0),
            }],
            &camera,
        );
    }
    for (handle, _) in sim.world().bodies() {
        assert!(sim.world().translation(handle).expect("Body").is_finite());
        assert!(sim.world().linvel(handle).expect("Body").is_finite());
    }
    assert!(sim.ribbon().points().iter().all(|p| p.is_finite()));
}
