//! Core-Domänentypen: Kamera, rapier-Anbindung und Gelenk-Kette der Badge.

pub mod camera;
pub mod chain;
pub mod physics;

pub use camera::{Camera3D, Ray, DRAG_DEPTH_EPSILON};
pub use chain::{BadgeChain, ChainLayout, SmoothedJoint};
pub use physics::{PhysicsConfig, PhysicsWorld, RayHit};
