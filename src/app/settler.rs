//! Weicher Yaw-Rücksteller für die Karte.
//!
//! Zieht pro Frame einen Anteil der Quaternion-Y-Komponente von `angvel.y` ab.
//! Kein Gelenk, nur ein Geschwindigkeits-Schubs: freies Drehen nach einem
//! Flick bleibt möglich.

use glam::{Quat, Vec3};

use crate::core::physics::{to_quat, to_vec3, to_vector, RigidBody};
use crate::shared::options::SETTLER_GAIN;

/// Ab diesem |rotation.y| gilt der Yaw als ausgeglichen. Darüber hält der
/// Settler die Karte wach, damit sie nicht verdreht einschläft.
pub const SETTLED_YAW: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularSettler {
    /// Anteil von `rotation.y`, der von `angvel.y` abgezogen wird
    pub gain: f32,
}

impl AngularSettler {
    pub fn new(gain: f32) -> Self {
        Self { gain }
    }

    /// Yaw-Komponente der kanonischen Quaternion (w ≥ 0).
    pub fn yaw_component(rotation: Quat) -> f32 {
        // q und -q beschreiben dieselbe Lage
        if rotation.w < 0.0 {
            -rotation.y
        } else {
            rotation.y
        }
    }

    /// Korrigierte Winkelgeschwindigkeit; x und z bleiben unverändert.
    pub fn corrected_angvel(&self, body: &RigidBody) -> Vec3 {
        let yaw = Self::yaw_component(to_quat(body.rotation()));
        let angvel = to_vec3(body.angvel());
        Vec3::new(angvel.x, angvel.y - yaw * self.gain, angvel.z)
    }

    /// Wendet die Korrektur an und gibt zurück, ob korrigiert wurde.
    ///
    /// Solange der Yaw nicht ausgeglichen ist, wird die Karte dabei geweckt,
    /// auch aus dem Schlaf. Danach läuft der Schubs ohne Wecken weiter, und
    /// eine schlafende Karte bleibt unberührt.
    pub fn apply(&self, body: &mut RigidBody) -> bool {
        if !body.is_dynamic() {
            return false;
        }
        let settled = Self::yaw_component(to_quat(body.rotation())).abs() <= SETTLED_YAW;
        if settled && body.is_sleeping() {
            return false;
        }
        let corrected = self.corrected_angvel(body);
        if !corrected.is_finite() {
            return false;
        }
        body.set_angvel(to_vector(corrected), !settled);
        true
    }
}

impl Default for AngularSettler {
    fn default() -> Self {
        Self::new(SETTLER_GAIN)
    }
}
