//! Application-Layer: Frame-Schleife, Drag, Glättung, Settler und Eingaben.

pub mod drag;
pub mod events;
pub mod replay;
pub mod settler;
/// Frame-Schleife der Badge-Szene
///
/// Hält Welt, Kette, Drag-Zustand und Glättungsfilter zwischen Frames.
pub mod simulation;
pub mod smoothing;

pub use drag::{DragController, DragState};
pub use events::{BadgeEvent, CursorHint, PointerEvent};
pub use replay::{PointerScript, ScriptFrame};
pub use settler::AngularSettler;
pub use simulation::{FrameReport, Simulation};
pub use smoothing::SmoothedPosition;
