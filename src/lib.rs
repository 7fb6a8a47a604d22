//! Portfolio-Badge: physikalisch simulierte Ausweis-Karte am Lanyard.
//! Core-Funktionalität als Library exportiert für Tests, Benches und Runner.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{
    AngularSettler, BadgeEvent, CursorHint, DragController, DragState, FrameReport,
    PointerEvent, PointerScript, SmoothedPosition, Simulation,
};
pub use core::{BadgeChain, Camera3D, ChainLayout, PhysicsConfig, PhysicsWorld, SmoothedJoint};
pub use shared::{BadgeOptions, CatmullRomCurve3, CurveType, RibbonBuffer, RIBBON_SAMPLE_COUNT};
