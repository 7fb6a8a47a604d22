//! Eingabe- und Ausgabe-Events der Badge-Simulation.
//!
//! Pointer-Events kommen vom Input-Layer (NDC-Koordinaten), `BadgeEvent`s
//! gehen an die umgebende Seite (Szenenwechsel, Klick-Hook).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Rohes Pointer-Event in normalisierten Gerätekoordinaten (x, y ∈ [-1, 1]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    /// Taste gedrückt
    Down { pointer_id: u32, ndc: Vec2 },
    /// Pointer bewegt (mit oder ohne gedrückte Taste)
    Move { pointer_id: u32, ndc: Vec2 },
    /// Taste losgelassen, egal über welchem Element
    Up { pointer_id: u32, ndc: Vec2 },
    /// Plattform hat das Pointer-Capture entzogen
    CaptureLost { pointer_id: u32 },
    /// Eingabe abgebrochen (Fokuswechsel, Touch-Cancel)
    Cancel,
}

impl PointerEvent {
    /// Pointer-ID, falls das Event einem Pointer zugeordnet ist
    pub fn pointer_id(&self) -> Option<u32> {
        match *self {
            PointerEvent::Down { pointer_id, .. }
            | PointerEvent::Move { pointer_id, .. }
            | PointerEvent::Up { pointer_id, .. }
            | PointerEvent::CaptureLost { pointer_id } => Some(pointer_id),
            PointerEvent::Cancel => None,
        }
    }

    /// Pointer-Position, falls das Event eine trägt
    pub fn ndc(&self) -> Option<Vec2> {
        match *self {
            PointerEvent::Down { ndc, .. }
            | PointerEvent::Move { ndc, .. }
            | PointerEvent::Up { ndc, .. } => Some(ndc),
            PointerEvent::CaptureLost { .. } | PointerEvent::Cancel => None,
        }
    }
}

/// Ausgabe an die umgebende Seite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeEvent {
    /// Karte wurde gegriffen
    Grabbed,
    /// Drag beendet (Loslassen, Capture-Verlust oder Abbruch)
    Released,
    /// Drücken und Loslassen ohne nennenswerte Bewegung
    Clicked,
}

/// Cursor-Darstellung über der Szene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Auto,
    Grab,
    Grabbing,
}

impl CursorHint {
    /// CSS-Name des Cursors
    pub fn css_name(self) -> &'static str {
        match self {
            CursorHint::Auto => "auto",
            CursorHint::Grab => "grab",
            CursorHint::Grabbing => "grabbing",
        }
    }
}
