//! Reine Geometrie-Funktionen für Catmull-Rom-Splines in 3D.
//!
//! Layer-neutral: wird von `app::simulation` (Ribbon-Kurve) und den Benches
//! genutzt, ohne Abhängigkeit auf die Physik.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Mindestabstand zweier Kontrollpunkte, unter dem ein Segment als
/// entartet gilt (Knoten-Abstand wird dann ersetzt).
const MIN_KNOT_SPACING: f32 = 1e-4;

/// Parametrisierung der Catmull-Rom-Spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveType {
    /// Gleichmäßige Knoten (kann bei ungleichen Segmenten Schleifen bilden)
    Uniform,
    /// Knoten-Abstand = Wurzel der Sehnenlänge
    Centripetal,
    /// Knoten-Abstand = Sehnenlänge
    #[default]
    Chordal,
}

impl CurveType {
    /// Exponent auf das Abstandsquadrat für den Knoten-Abstand.
    fn knot_exponent(self) -> Option<f32> {
        match self {
            CurveType::Uniform => None,
            CurveType::Centripetal => Some(0.25),
            CurveType::Chordal => Some(0.5),
        }
    }
}

/// Berechnet einen Punkt auf einem uniformen Catmull-Rom-Segment (t ∈ [0, 1]).
///
/// p0, p1, p2, p3: vier aufeinanderfolgende Kontrollpunkte.
/// Die Kurve verläuft von p1 nach p2.
pub fn catmull_rom_point(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Punkt auf einem nicht-uniformen Catmull-Rom-Segment mit Knoten-Abständen
/// `dt0`, `dt1`, `dt2`. Tangenten werden auf das Intervall `dt1` normiert,
/// die Auswertung erfolgt als kubisches Hermite-Polynom in t ∈ [0, 1].
pub fn nonuniform_catmull_rom_point(
    [p0, p1, p2, p3]: [Vec3; 4],
    [dt0, dt1, dt2]: [f32; 3],
    t: f32,
) -> Vec3 {
    let m1 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
    let m2 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;

    let c0 = p1;
    let c1 = m1;
    let c2 = -3.0 * p1 + 3.0 * p2 - 2.0 * m1 - m2;
    let c3 = 2.0 * p1 - 2.0 * p2 + m1 + m2;
    ((c3 * t + c2) * t + c1) * t + c0
}

/// Offene Catmull-Rom-Kurve durch genau vier Kontrollpunkte.
///
/// Wird pro Frame neu befüllt (`set_points`) statt neu angelegt.
#[derive(Debug, Clone, PartialEq)]
pub struct CatmullRomCurve3 {
    points: [Vec3; 4],
    pub curve_type: CurveType,
}

impl CatmullRomCurve3 {
    /// Anzahl der Kontrollpunkte
    pub const CONTROL_POINTS: usize = 4;

    pub fn new(points: [Vec3; 4], curve_type: CurveType) -> Self {
        Self { points, curve_type }
    }

    /// Chordale Kurve (Standard für das Lanyard).
    pub fn chordal(points: [Vec3; 4]) -> Self {
        Self::new(points, CurveType::Chordal)
    }

    pub fn points(&self) -> &[Vec3; 4] {
        &self.points
    }

    /// Ersetzt die Kontrollpunkte in-place.
    pub fn set_points(&mut self, points: [Vec3; 4]) {
        self.points = points;
    }

    /// Punkt bei globalem Parameter `t` ∈ [0, 1] über alle drei Segmente.
    pub fn point_at(&self, t: f32) -> Vec3 {
        let last = Self::CONTROL_POINTS - 1;
        let scaled = last as f32 * t.clamp(0.0, 1.0);
        let mut segment = scaled.floor() as usize;
        let mut weight = scaled - segment as f32;
        if segment >= last {
            segment = last - 1;
            weight = 1.0;
        }

        let pts = &self.points;
        // Phantom-Punkte an den Rändern spiegeln
        let p0 = if segment > 0 {
            pts[segment - 1]
        } else {
            2.0 * pts[0] - pts[1]
        };
        let p1 = pts[segment];
        let p2 = pts[segment + 1];
        let p3 = if segment + 2 <= last {
            pts[segment + 2]
        } else {
            2.0 * pts[last] - pts[last - 1]
        };

        let Some(exponent) = self.curve_type.knot_exponent() else {
            return catmull_rom_point(p0, p1, p2, p3, weight);
        };

        let mut dt1 = p1.distance_squared(p2).powf(exponent);
        let mut dt0 = p0.distance_squared(p1).powf(exponent);
        let mut dt2 = p2.distance_squared(p3).powf(exponent);
        if dt1 < MIN_KNOT_SPACING {
            dt1 = 1.0;
        }
        if dt0 < MIN_KNOT_SPACING {
            dt0 = dt1;
        }
        if dt2 < MIN_KNOT_SPACING {
            dt2 = dt1;
        }

        nonuniform_catmull_rom_point([p0, p1, p2, p3], [dt0, dt1, dt2], weight)
    }

    /// Tastet die Kurve gleichmäßig im Parameter ab und schreibt in `out`.
    ///
    /// Erster und letzter Eintrag sind exakt der erste bzw. letzte
    /// Kontrollpunkt. Bei nur einem Slot wird der erste Punkt geschrieben.
    pub fn sample_into(&self, out: &mut [Vec3]) {
        let n = out.len();
        match n {
            0 => return,
            1 => {
                out[0] = self.points[0];
                return;
            }
            _ => {}
        }
        let denom = (n - 1) as f32;
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.point_at(i as f32 / denom);
        }
        out[0] = self.points[0];
        out[n - 1] = self.points[Self::CONTROL_POINTS - 1];
    }

    /// Allokierende Variante von `sample_into`.
    pub fn sample(&self, count: usize) -> Vec<Vec3> {
        let mut out = vec![Vec3::ZERO; count];
        self.sample_into(&mut out);
        out
    }
}

/// Approximierte Länge einer Polyline.
pub fn polyline_length(points: &[Vec3]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}
