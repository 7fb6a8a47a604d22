//! Vertex-Puffer für das Lanyard-Band.
//!
//! Übergabevertrag an den Renderer: feste Anzahl Samples, jeden Frame
//! in-place überschrieben.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use super::spline_geometry::CatmullRomCurve3;

/// Anzahl der Kurven-Samples pro Frame.
pub const RIBBON_SAMPLE_COUNT: usize = 32;

/// Ein Punkt der Band-Mittellinie
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RibbonVertex {
    /// Position in Welt-Koordinaten
    pub position: [f32; 3],
}

/// Polyline mit genau `RIBBON_SAMPLE_COUNT` Punkten.
/// Index 0 = Aufhängepunkt der Karte, letzter Index = Anker.
#[derive(Debug, Clone)]
pub struct RibbonBuffer {
    vertices: [RibbonVertex; RIBBON_SAMPLE_COUNT],
    samples: [Vec3; RIBBON_SAMPLE_COUNT],
}

impl RibbonBuffer {
    pub fn new() -> Self {
        Self {
            vertices: [RibbonVertex::zeroed(); RIBBON_SAMPLE_COUNT],
            samples: [Vec3::ZERO; RIBBON_SAMPLE_COUNT],
        }
    }

    /// Tastet die Kurve ab und überschreibt alle Vertices.
    pub fn update_from_curve(&mut self, curve: &CatmullRomCurve3) {
        curve.sample_into(&mut self.samples);
        for (vertex, sample) in self.vertices.iter_mut().zip(self.samples.iter()) {
            vertex.position = sample.to_array();
        }
    }

    pub fn points(&self) -> &[Vec3; RIBBON_SAMPLE_COUNT] {
        &self.samples
    }

    pub fn vertices(&self) -> &[RibbonVertex] {
        &self.vertices
    }

    /// Rohdaten für den GPU-Upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

impl Default for RibbonBuffer {
    fn default() -> Self {
        Self::new()
    }
}
