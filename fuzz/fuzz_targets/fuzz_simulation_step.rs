#![no_main]

use glam::Vec2;
use libfuzzer_sys::fuzz_target;
use portfolio_badge::{BadgeOptions, Camera3D, PointerEvent, Simulation};

// Je 9 Bytes: Event-Art, Pointer-ID-Bit, zwei f32-Koordinaten
fuzz_target!(|data: &[u8]| {
    let Ok(mut sim) = Simulation::new(&BadgeOptions::new()) else {
        return;
    };
    let camera = Camera3D::new();

    for chunk in data.chunks_exact(9).take(600) {
        let x = f32::from_le_bytes([chunk[1], chunk[2], chunk[3], chunk[4]]);
        let y = f32::from_le_bytes([chunk[5], chunk[6], chunk[7], chunk[8]]);
        let pointer_id = u32::from(chunk[0] >> 7);
        let ndc = Vec2::new(x, y);
        let event = match chunk[0] % 6 {
            0 => PointerEvent::Down { pointer_id, ndc },
            1 | 2 => PointerEvent::Move { pointer_id, ndc },
            3 => PointerEvent::Up { pointer_id, ndc },
            4 => PointerEvent::CaptureLost { pointer_id },
            _ => PointerEvent::Cancel,
        };
        sim.step(1.0 / 60.0, &[event], &camera);

        let world = sim.world();
        for (handle, _) in world.bodies() {
            let finite = world.translation(handle).is_some_and(|t| t.is_finite())
                && world.rotation(handle).is_some_and(|q| q.is_finite());
            assert!(finite, "NaN im Body-Zustand");
        }
    }
});
