//! Frame-Schleife der Badge: Drag → Physik → Glättung → Kurve → Settler.
//!
//! `Simulation` hält den gesamten Zustand zwischen Frames explizit; ein
//! Frame ist genau ein Aufruf von [`Simulation::step`].

use glam::Vec3;

use super::drag::{DragController, DragState};
use super::events::{BadgeEvent, CursorHint, PointerEvent};
use super::settler::AngularSettler;
use super::smoothing::SmoothedPosition;
use crate::core::physics::{to_vector, PhysicsWorld, RigidBody, RigidBodyHandle};
use crate::core::{BadgeChain, Camera3D, SmoothedJoint};
use crate::shared::{BadgeOptions, CatmullRomCurve3, RibbonBuffer};

/// Ergebnis eines Frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Anzahl der ausgeführten Physik-Steps
    pub steps: u32,
    /// Ausgaben an die umgebende Seite, in Auftrittsreihenfolge
    pub events: Vec<BadgeEvent>,
    pub cursor: CursorHint,
}

/// Die komplette Badge-Szene zwischen Mount und Unmount.
pub struct Simulation {
    world: PhysicsWorld,
    chain: BadgeChain,
    drag: DragController,
    /// Filter für J1 und J2 (in dieser Reihenfolge)
    smoothed: [SmoothedPosition; 2],
    settler: AngularSettler,
    curve: CatmullRomCurve3,
    ribbon: RibbonBuffer,
    options: BadgeOptions,
    accumulator: f32,
    pending_events: Vec<BadgeEvent>,
    frame: u64,
}

impl Simulation {
    /// Mountet die Szene: Welt, Kette und Ribbon-Puffer werden aufgebaut.
    pub fn new(options: &BadgeOptions) -> anyhow::Result<Self> {
        let mut world = PhysicsWorld::new(options.physics.clone());
        let chain = BadgeChain::spawn(&mut world, &options.chain)?;

        let anchor = options.chain.anchor;
        let mut sim = Self {
            world,
            chain,
            drag: DragController::new(options.drag),
            smoothed: [SmoothedPosition::new(); 2],
            settler: AngularSettler::new(options.settler_gain),
            curve: CatmullRomCurve3::new([anchor; 4], options.curve_type),
            ribbon: RibbonBuffer::new(),
            options: options.clone(),
            accumulator: 0.0,
            pending_events: Vec::new(),
            frame: 0,
        };
        sim.rebuild_curve(0.0);
        log::info!("Badge-Szene gemountet");
        Ok(sim)
    }

    /// Baut die Szene ab. Danach existieren keine Bodies oder Gelenke mehr.
    pub fn unmount(mut self) -> PhysicsWorld {
        let mut events = Vec::new();
        self.drag.release(&mut self.world, &self.chain, false, &mut events);
        self.chain.despawn(&mut self.world);
        log::info!("Badge-Szene nach {} Frames abgebaut", self.frame);
        self.world
    }

    /// Verarbeitet ein einzelnes Pointer-Event sofort (außerhalb von `step`).
    /// Entstehende Events werden beim nächsten `step` gemeldet.
    pub fn handle_pointer(&mut self, event: &PointerEvent, camera: &Camera3D) {
        self.drag.handle_event(
            event,
            &mut self.world,
            &self.chain,
            camera,
            &mut self.pending_events,
        );
    }

    /// Rückt die Szene um `dt` Sekunden vor.
    pub fn step(&mut self, dt: f32, input: &[PointerEvent], camera: &Camera3D) -> FrameReport {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            log::warn!("Ungültige Frame-Zeit {dt}, Frame ohne Zeitfortschritt");
            0.0
        };
        self.frame += 1;

        for event in input {
            self.handle_pointer(event, camera);
        }

        let steps = self.advance_physics(dt, camera);
        self.rebuild_curve(dt);

        FrameReport {
            steps,
            events: std::mem::take(&mut self.pending_events),
            cursor: self.drag.cursor_hint(),
        }
    }

    /// Feste Physik-Schritte aus dem Zeitakkumulator.
    fn advance_physics(&mut self, dt: f32, camera: &Camera3D) -> u32 {
        let time_step = self.world.config.time_step;
        if !time_step.is_finite() || time_step <= 0.0 {
            return 0;
        }

        self.accumulator += dt;
        // Rundungsfehler bei dt == time_step dürfen keinen Step verschlucken
        let tolerance = time_step * 1e-3;
        let available = ((self.accumulator + tolerance) / time_step).floor() as u32;
        let steps = available.min(self.options.max_steps_per_frame);
        if available > steps {
            log::debug!("{} Physik-Steps verworfen", available - steps);
            self.accumulator = 0.0;
        } else {
            self.accumulator = (self.accumulator - steps as f32 * time_step).max(0.0);
        }
        if steps == 0 {
            return 0;
        }

        // Kinematisches Ziel auf die Steps verteilen, damit die implizite
        // Geschwindigkeit pro Step stimmt
        let target = self.drag.frame_target(&mut self.world, &self.chain, camera);
        let start = self.card_position();

        for i in 0..steps {
            if let (Some(target), Some(start), Some(card)) =
                (target, start, self.world.body_mut(self.chain.card))
            {
                let fraction = (i + 1) as f32 / steps as f32;
                let sub_target = if i + 1 == steps {
                    target
                } else {
                    start.lerp(target, fraction)
                };
                card.set_next_kinematic_translation(to_vector(sub_target));
            }
            self.world.step();
        }

        if let Some(card) = self.world.body_mut(self.chain.card) {
            self.settler.apply(card);
        }
        steps
    }

    /// Glättet J1/J2 und tastet die Band-Kurve neu ab.
    fn rebuild_curve(&mut self, dt: f32) {
        let params = self.options.smoothing;
        let mut filtered = [Vec3::ZERO; 2];
        for (i, joint) in [SmoothedJoint::J1, SmoothedJoint::J2].into_iter().enumerate() {
            let handle = self.chain.smoothed_body(joint);
            let Some(position) = self.chain.position(&self.world, handle) else {
                continue;
            };
            filtered[i] = self.smoothed[i].update(position, dt, &params);
        }

        let (Some(j3), Some(anchor)) = (
            self.chain.position(&self.world, self.chain.j3),
            self.chain.anchor_position(&self.world),
        ) else {
            return;
        };
        self.curve.set_points([j3, filtered[1], filtered[0], anchor]);
        self.ribbon.update_from_curve(&self.curve);
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// Direkter Welt-Zugriff (Tests, Debug-Werkzeuge)
    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    pub fn chain(&self) -> &BadgeChain {
        &self.chain
    }

    pub fn options(&self) -> &BadgeOptions {
        &self.options
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn cursor_hint(&self) -> CursorHint {
        self.drag.cursor_hint()
    }

    pub fn ribbon(&self) -> &RibbonBuffer {
        &self.ribbon
    }

    pub fn curve(&self) -> &CatmullRomCurve3 {
        &self.curve
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Gefilterte Darstellungs-Position von J1 bzw. J2
    pub fn smoothed_position(&self, joint: SmoothedJoint) -> Option<Vec3> {
        match joint {
            SmoothedJoint::J1 => self.smoothed[0].value(),
            SmoothedJoint::J2 => self.smoothed[1].value(),
        }
    }

    pub fn card(&self) -> Option<&RigidBody> {
        self.world.body(self.chain.card)
    }

    pub fn card_position(&self) -> Option<Vec3> {
        self.world.translation(self.chain.card)
    }

    /// Physik-Position eines Bodies der Kette
    pub fn body_position(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.chain.position(&self.world, handle)
    }

    /// Aufhängepunkt der Karte in Weltkoordinaten
    pub fn card_pivot(&self) -> Option<Vec3> {
        self.chain.card_pivot(&self.world)
    }

    /// true, wenn alle beweglichen Bodies der Kette schlafen. Der feste
    /// Anker nimmt am Schlafen nicht teil.
    pub fn is_resting(&self) -> bool {
        self.chain
            .bodies()
            .iter()
            .filter_map(|&h| self.world.body(h))
            .filter(|body| !body.is_fixed())
            .all(RigidBody::is_sleeping)
    }
}
