//! Portfolio-Badge Runner.
//!
//! Headless: mountet die Badge-Szene, spielt ein Pointer-Skript ab und
//! protokolliert Ketten- und Ribbon-Statistiken.

use portfolio_badge::shared::spline_geometry::polyline_length;
use portfolio_badge::{BadgeEvent, BadgeOptions, PointerScript, Simulation};

fn main() -> anyhow::Result<()> {
    AppRunner::run()
}

struct AppRunner;

impl AppRunner {
    fn run() -> anyhow::Result<()> {
        // Logger initialisieren
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();

        log::info!("Portfolio-Badge v{} startet...", env!("CARGO_PKG_VERSION"));

        // Optionen aus TOML laden (oder Standardwerte)
        let config_path = BadgeOptions::config_path();
        let options = BadgeOptions::load_from_file(&config_path);

        let script = match std::env::args_os().nth(1) {
            Some(path) => PointerScript::load(std::path::Path::new(&path))?,
            None => {
                log::info!("Kein Pointer-Skript angegeben, verwende Demo");
                PointerScript::demo()
            }
        };

        let camera = options.camera.to_camera();
        let mut sim = Simulation::new(&options)?;

        let mut grabs = 0usize;
        let mut clicks = 0usize;
        for (frame, events) in script.expanded_frames().enumerate() {
            let report = sim.step(script.frame_dt, &events, &camera);
            for event in &report.events {
                match event {
                    BadgeEvent::Grabbed => grabs += 1,
                    BadgeEvent::Clicked => {
                        clicks += 1;
                        log::info!("Frame {frame}: Karten-Klick");
                    }
                    BadgeEvent::Released => {}
                }
            }

            if frame % 60 == 0 {
                Self::log_frame(&sim, frame);
            }
        }

        Self::log_frame(&sim, script.frame_count());
        log::info!(
            "Skript beendet: {} Frames, {} Griffe, {} Klicks, Kette in Ruhe: {}",
            script.frame_count(),
            grabs,
            clicks,
            sim.is_resting()
        );

        sim.unmount();
        Ok(())
    }

    fn log_frame(sim: &Simulation, frame: usize) {
        let chain = sim.chain();
        let (Some(pivot), Some(anchor)) = (sim.card_pivot(), chain.anchor_position(sim.world()))
        else {
            return;
        };
        log::info!(
            "Frame {frame}: Pivot-Abstand {:.3} / {:.3}, Band-Länge {:.3}, Drag: {}, Cursor: {}",
            pivot.distance(anchor),
            chain.reach(),
            polyline_length(sim.ribbon().points()),
            sim.is_dragging(),
            sim.cursor_hint().css_name(),
        );
    }
}
