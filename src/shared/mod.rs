//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält Geometrie, Konfiguration und den Ribbon-Puffer, die zwischen
//! `app`, Runner und Renderer geteilt werden.

pub mod options;
pub mod ribbon;
pub mod spline_geometry;

pub use options::{BadgeOptions, CameraOptions, DragOptions, SmoothingOptions};
pub use ribbon::{RibbonBuffer, RibbonVertex, RIBBON_SAMPLE_COUNT};
pub use spline_geometry::{CatmullRomCurve3, CurveType};
