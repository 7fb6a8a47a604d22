//! Zentrale Konfiguration der Badge-Simulation.
//!
//! `BadgeOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::spline_geometry::CurveType;
use crate::core::{Camera3D, ChainLayout, PhysicsConfig};

// ── Glättung ────────────────────────────────────────────────────────

/// Glättungs-Rate bei kleinem Abstand (pro Sekunde).
pub const SMOOTHING_MIN_SPEED: f32 = 10.0;
/// Glättungs-Rate bei großem Abstand (pro Sekunde).
pub const SMOOTHING_MAX_SPEED: f32 = 50.0;
/// Untere Klemmgrenze des Abstands für die Raten-Interpolation.
pub const SMOOTHING_MIN_DISTANCE: f32 = 0.1;
/// Obere Klemmgrenze des Abstands für die Raten-Interpolation.
pub const SMOOTHING_MAX_DISTANCE: f32 = 1.0;

// ── Drag ────────────────────────────────────────────────────────────

/// Maximaler Pointer-Weg (NDC) zwischen Down und Up, der noch als Klick zählt.
pub const CLICK_TOLERANCE_NDC: f32 = 0.02;

// ── Settler ─────────────────────────────────────────────────────────

/// Anteil der Yaw-Komponente, der pro Step von `angvel.y` abgezogen wird.
pub const SETTLER_GAIN: f32 = 0.25;

// ── Simulation ──────────────────────────────────────────────────────

/// Obergrenze der Physik-Steps pro Frame (verhindert Aufholspiralen nach Hängern).
pub const MAX_STEPS_PER_FRAME: u32 = 4;

// ── Kamera ──────────────────────────────────────────────────────────

/// Vertikaler Öffnungswinkel der Szenen-Kamera in Grad.
pub const CAMERA_FOV_Y_DEGREES: f32 = 25.0;
/// Kamera-Abstand auf der Z-Achse.
pub const CAMERA_DISTANCE: f32 = 6.0;

/// Parameter der abstandsabhängigen Positionsglättung von J1/J2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingOptions {
    pub min_speed: f32,
    pub max_speed: f32,
    /// Abstands-Klemmung [min, max] vor der Raten-Interpolation
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for SmoothingOptions {
    fn default() -> Self {
        Self {
            min_speed: SMOOTHING_MIN_SPEED,
            max_speed: SMOOTHING_MAX_SPEED,
            min_distance: SMOOTHING_MIN_DISTANCE,
            max_distance: SMOOTHING_MAX_DISTANCE,
        }
    }
}

/// Drag-Verhalten.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragOptions {
    /// Klick-Toleranz in NDC
    pub click_tolerance: f32,
    /// Kinematisches Ziel auf die Seil-Reichweite begrenzen
    pub clamp_to_reach: bool,
}

impl Default for DragOptions {
    fn default() -> Self {
        Self {
            click_tolerance: CLICK_TOLERANCE_NDC,
            clamp_to_reach: true,
        }
    }
}

/// Kamera-Startwerte für den Runner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraOptions {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_degrees: f32,
    /// Viewport-Größe in Pixeln [Breite, Höhe]
    pub viewport_size: [f32; 2],
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, CAMERA_DISTANCE),
            target: Vec3::ZERO,
            fov_y_degrees: CAMERA_FOV_Y_DEGREES,
            viewport_size: [1280.0, 720.0],
        }
    }
}

impl CameraOptions {
    /// Baut die Szenen-Kamera aus den Optionen.
    pub fn to_camera(&self) -> Camera3D {
        let mut camera = Camera3D::new();
        camera.position = self.position;
        camera.target = self.target;
        camera.fov_y_degrees = self.fov_y_degrees;
        camera.set_viewport_size(self.viewport_size);
        camera
    }
}

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Badge-Optionen.
/// Wird als `portfolio_badge.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeOptions {
    /// Solver-Einstellungen (Schwerkraft, Zeitschritt, Schlaf-Schwellen)
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Geometrie der Kette
    #[serde(default)]
    pub chain: ChainLayout,
    #[serde(default)]
    pub smoothing: SmoothingOptions,
    #[serde(default)]
    pub drag: DragOptions,
    /// Verstärkung des Yaw-Rückstellers
    #[serde(default = "default_settler_gain")]
    pub settler_gain: f32,
    /// Parametrisierung der Band-Kurve
    #[serde(default)]
    pub curve_type: CurveType,
    /// Obergrenze Physik-Steps pro Frame
    #[serde(default = "default_max_steps_per_frame")]
    pub max_steps_per_frame: u32,
    #[serde(default)]
    pub camera: CameraOptions,
}

/// Serde-Default für `settler_gain`.
fn default_settler_gain() -> f32 {
    SETTLER_GAIN
}

/// Serde-Default für `max_steps_per_frame`.
fn default_max_steps_per_frame() -> u32 {
    MAX_STEPS_PER_FRAME
}

impl Default for BadgeOptions {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            chain: ChainLayout::default(),
            smoothing: SmoothingOptions::default(),
            drag: DragOptions::default(),
            settler_gain: SETTLER_GAIN,
            curve_type: CurveType::default(),
            max_steps_per_frame: MAX_STEPS_PER_FRAME,
            camera: CameraOptions::default(),
        }
    }
}

impl BadgeOptions {
    /// Standardwerte der Badge-Szene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {:#}", e);
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::new()
            }
        }
    }

    /// Parst Optionen aus einem TOML-String. Fehlende Felder bekommen Standardwerte.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("portfolio-badge"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("portfolio_badge.toml")
    }
}
