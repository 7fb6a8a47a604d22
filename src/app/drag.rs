//! Drag-Zustandsmaschine für die Karte (Idle ↔ Dragging).
//!
//! Übersetzt Pointer-Events in ein kinematisches Ziel für den Karten-Body.
//! Während des Drags ist die Karte kinematisch; die Gelenke ziehen den Rest
//! der Kette normal mit.

use glam::{Quat, Vec2, Vec3};

use super::events::{BadgeEvent, CursorHint, PointerEvent};
use crate::core::physics::{PhysicsWorld, RayHit, RigidBodyType};
use crate::core::{BadgeChain, Camera3D};
use crate::shared::DragOptions;

/// Zustand des Drag-Controllers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// `grab_offset` = gegriffener Weltpunkt − Karten-Position beim Greifen,
    /// konstant für die Dauer des Drags
    Dragging { grab_offset: Vec3 },
}

/// Begrenzt das kinematische Karten-Ziel so, dass der Aufhängepunkt
/// höchstens `reach` vom Anker entfernt liegt.
pub fn clamp_to_reach(
    target: Vec3,
    card_rotation: Quat,
    pivot_offset: Vec3,
    anchor: Vec3,
    reach: f32,
) -> Vec3 {
    let pivot_arm = card_rotation * pivot_offset;
    let pivot = target + pivot_arm;
    let from_anchor = pivot - anchor;
    let distance = from_anchor.length();
    if distance <= reach || distance <= f32::EPSILON {
        return target;
    }
    anchor + from_anchor * (reach / distance) - pivot_arm
}

#[derive(Debug, Clone)]
pub struct DragController {
    state: DragState,
    options: DragOptions,
    captured_pointer: Option<u32>,
    pointer_ndc: Option<Vec2>,
    press_ndc: Vec2,
    /// Maximaler Pointer-Weg seit dem Greifen (NDC)
    travel: f32,
    hovered: bool,
    last_target: Option<Vec3>,
}

impl DragController {
    pub fn new(options: DragOptions) -> Self {
        Self {
            state: DragState::Idle,
            options,
            captured_pointer: None,
            pointer_ndc: None,
            press_ndc: Vec2::ZERO,
            travel: 0.0,
            hovered: false,
            last_target: None,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn grab_offset(&self) -> Option<Vec3> {
        match self.state {
            DragState::Dragging { grab_offset } => Some(grab_offset),
            DragState::Idle => None,
        }
    }

    /// Pointer, der das Capture hält
    pub fn captured_pointer(&self) -> Option<u32> {
        self.captured_pointer
    }

    /// Letzte bekannte Pointer-Position
    pub fn pointer_ndc(&self) -> Option<Vec2> {
        self.pointer_ndc
    }

    pub fn hovered(&self) -> bool {
        self.hovered
    }

    /// Zuletzt gesetztes kinematisches Ziel (nur während des Drags)
    pub fn last_target(&self) -> Option<Vec3> {
        self.last_target
    }

    pub fn cursor_hint(&self) -> CursorHint {
        match (self.hovered, self.is_dragging()) {
            (true, true) => CursorHint::Grabbing,
            (true, false) => CursorHint::Grab,
            (false, _) => CursorHint::Auto,
        }
    }

    /// Strahltest gegen den Karten-Collider.
    pub fn pick_card(
        world: &mut PhysicsWorld,
        chain: &BadgeChain,
        camera: &Camera3D,
        ndc: Vec2,
    ) -> Option<RayHit> {
        let ray = camera.ray_from_ndc(ndc)?;
        let card = chain.card;
        world.cast_ray(ray.origin, ray.dir, camera.far, |handle| handle == card)
    }

    /// Verarbeitet ein Pointer-Event. Ausgaben landen in `events`.
    pub fn handle_event(
        &mut self,
        event: &PointerEvent,
        world: &mut PhysicsWorld,
        chain: &BadgeChain,
        camera: &Camera3D,
        events: &mut Vec<BadgeEvent>,
    ) {
        if event.ndc().is_some_and(|ndc| !ndc.is_finite()) {
            log::warn!("Pointer-Event mit ungültigen Koordinaten ignoriert: {event:?}");
            return;
        }

        match *event {
            PointerEvent::Down { pointer_id, ndc } => {
                if self.is_dragging() {
                    return;
                }
                self.pointer_ndc = Some(ndc);
                self.begin(world, chain, camera, pointer_id, ndc, events);
            }
            PointerEvent::Move { pointer_id, ndc } => {
                let foreign = self
                    .captured_pointer
                    .is_some_and(|captured| captured != pointer_id);
                if foreign {
                    return;
                }
                self.pointer_ndc = Some(ndc);
                if self.is_dragging() {
                    self.travel = self.travel.max(ndc.distance(self.press_ndc));
                }
                self.hovered = Self::pick_card(world, chain, camera, ndc).is_some();
            }
            PointerEvent::Up { pointer_id, ndc } => {
                if !self.is_dragging() {
                    return;
                }
                // Globaler Fail-Safe: jedes Up beendet den Drag
                let own = self.captured_pointer == Some(pointer_id);
                if own {
                    self.travel = self.travel.max(ndc.distance(self.press_ndc));
                }
                let clicked = own && self.travel < self.options.click_tolerance;
                self.release(world, chain, clicked, events);
            }
            PointerEvent::CaptureLost { pointer_id } => {
                if self.is_dragging() {
                    log::debug!("Pointer-Capture verloren (Pointer {pointer_id})");
                    self.release(world, chain, false, events);
                }
            }
            PointerEvent::Cancel => {
                if self.is_dragging() {
                    self.release(world, chain, false, events);
                }
            }
        }
    }

    fn begin(
        &mut self,
        world: &mut PhysicsWorld,
        chain: &BadgeChain,
        camera: &Camera3D,
        pointer_id: u32,
        ndc: Vec2,
        events: &mut Vec<BadgeEvent>,
    ) {
        let Some(hit) = Self::pick_card(world, chain, camera, ndc) else {
            return;
        };
        let Some(card_position) = chain.position(world, chain.card) else {
            return;
        };

        let grab_offset = hit.point - card_position;
        chain.wake_all(world);
        if let Some(card) = world.body_mut(chain.card) {
            card.set_body_type(RigidBodyType::KinematicPositionBased, true);
            // Ohne Ziel bleibt die Karte im ersten Step stehen
            let pose = *card.position();
            card.set_next_kinematic_position(pose);
        }

        self.state = DragState::Dragging { grab_offset };
        self.captured_pointer = Some(pointer_id);
        self.press_ndc = ndc;
        self.travel = 0.0;
        self.hovered = true;
        self.last_target = None;
        events.push(BadgeEvent::Grabbed);
        log::debug!("Karte gegriffen (Pointer {pointer_id}, Offset {grab_offset:?})");
    }

    /// Beendet den Drag: Karte wird wieder dynamisch, die kinematische
    /// Geschwindigkeit geht als Schwung in die freie Simulation über.
    pub fn release(
        &mut self,
        world: &mut PhysicsWorld,
        chain: &BadgeChain,
        clicked: bool,
        events: &mut Vec<BadgeEvent>,
    ) {
        if !self.is_dragging() {
            return;
        }
        if let Some(card) = world.body_mut(chain.card) {
            card.set_body_type(RigidBodyType::Dynamic, true);
        }
        self.state = DragState::Idle;
        self.captured_pointer = None;
        self.last_target = None;
        events.push(BadgeEvent::Released);
        if clicked {
            events.push(BadgeEvent::Clicked);
        }
        log::debug!("Karte losgelassen (Klick: {clicked})");
    }

    /// Kinematisches Ziel für diesen Frame. Weckt alle Bodies der Kette.
    ///
    /// Ist der Drag-Punkt nicht berechenbar, bleibt das vorige Ziel stehen.
    pub fn frame_target(
        &mut self,
        world: &mut PhysicsWorld,
        chain: &BadgeChain,
        camera: &Camera3D,
    ) -> Option<Vec3> {
        let DragState::Dragging { grab_offset } = self.state else {
            return None;
        };
        chain.wake_all(world);

        let Some(point) = self.pointer_ndc.and_then(|ndc| camera.drag_point(ndc)) else {
            log::warn!("Drag-Punkt nicht berechenbar, vorheriges Ziel bleibt");
            return self.last_target;
        };

        let mut target = point - grab_offset;
        if self.options.clamp_to_reach {
            let rotation = world.rotation(chain.card)?;
            let anchor = chain.anchor_position(world)?;
            target = clamp_to_reach(
                target,
                rotation,
                chain.card_pivot_offset(),
                anchor,
                chain.reach(),
            );
        }
        self.last_target = Some(target);
        Some(target)
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(DragOptions::default())
    }
}
