//! Abstandsabhängige Positionsglättung für die Zwischengelenke J1/J2.
//!
//! Wirkt nur auf die Darstellung; die Physik-Positionen bleiben unberührt.

use glam::Vec3;

use crate::shared::SmoothingOptions;

/// Glättungs-Rate (pro Sekunde) für einen Abstand zwischen Filter und Physik.
pub fn smoothing_rate(distance: f32, params: &SmoothingOptions) -> f32 {
    let distance = distance.clamp(params.min_distance, params.max_distance);
    params.min_speed + distance * (params.max_speed - params.min_speed)
}

/// Gefilterte Position eines Gelenks. Wird beim ersten Update auf die
/// Physik-Position gesetzt und bleibt über Drags hinweg erhalten.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SmoothedPosition {
    filtered: Option<Vec3>,
}

impl SmoothedPosition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aktueller Filterwert, `None` vor dem ersten Update
    pub fn value(&self) -> Option<Vec3> {
        self.filtered
    }

    /// Zieht den Filterwert Richtung `physics_position` und gibt ihn zurück.
    ///
    /// Der Lerp-Faktor `rate · dt` wird auf [0, 1] begrenzt, damit große
    /// Frame-Zeiten nicht über das Ziel hinausschießen.
    pub fn update(&mut self, physics_position: Vec3, dt: f32, params: &SmoothingOptions) -> Vec3 {
        let Some(filtered) = self.filtered else {
            if physics_position.is_finite() {
                self.filtered = Some(physics_position);
            }
            return physics_position;
        };
        if !physics_position.is_finite() || !dt.is_finite() {
            return filtered;
        }

        let rate = smoothing_rate(filtered.distance(physics_position), params);
        let alpha = (rate * dt).clamp(0.0, 1.0);
        let next = filtered.lerp(physics_position, alpha);
        self.filtered = Some(next);
        next
    }
}
