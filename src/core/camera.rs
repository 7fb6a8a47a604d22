//! Perspektivische 3D-Kamera mit Unprojection für Pointer-Drag.

use glam::{Mat4, Vec2, Vec3};

/// Mindestabstand der Drag-Ebene; verhindert Division durch Null bei einer
/// Kamera im Ursprung.
pub const DRAG_DEPTH_EPSILON: f32 = 1e-4;

/// Strahl in Weltkoordinaten (Richtung normiert).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    /// Punkt im Abstand `t` entlang des Strahls
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Perspektivische Kamera (rechtshändig, OpenGL-Clipspace -1..1).
#[derive(Debug, Clone, PartialEq)]
pub struct Camera3D {
    /// Position der Kamera in Welt-Koordinaten
    pub position: Vec3,
    /// Blickziel
    pub target: Vec3,
    pub up: Vec3,
    /// Vertikaler Öffnungswinkel in Grad
    pub fov_y_degrees: f32,
    /// Seitenverhältnis Breite / Höhe
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera3D {
    /// Standard-Kamera der Badge-Szene: z = 6, 25° Öffnungswinkel.
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 6.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_degrees: 25.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Passt das Seitenverhältnis an die Viewport-Größe an.
    pub fn set_viewport_size(&mut self, size: [f32; 2]) {
        let height = size[1].max(1.0);
        self.aspect = (size[0] / height).max(f32::EPSILON);
    }

    /// Gibt die View-Matrix zurück
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Gibt die Projektions-Matrix zurück
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov_y_degrees.to_radians(),
            self.aspect.max(f32::EPSILON),
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Welt → NDC. `None` bei Punkten hinter der Kamera.
    pub fn project(&self, world: Vec3) -> Option<Vec3> {
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        ndc.is_finite().then_some(ndc)
    }

    /// NDC (x, y, z ∈ [-1, 1]) → Welt.
    /// `None`, wenn die Matrizen degeneriert sind.
    pub fn unproject(&self, ndc: Vec3) -> Option<Vec3> {
        let inverse = self.view_projection().inverse();
        let world = inverse.project_point3(ndc);
        world.is_finite().then_some(world)
    }

    /// Pick-Strahl durch eine Pointer-Position (Ursprung = Kamera).
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Option<Ray> {
        if !ndc.is_finite() {
            return None;
        }
        let through = self.unproject(ndc.extend(0.5))?;
        let dir = (through - self.position).normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }
        Some(Ray {
            origin: self.position,
            dir,
        })
    }

    /// Weltpunkt unter dem Pointer für den Drag.
    ///
    /// Unprojiziert bei NDC-Tiefe 0.5 und schiebt den Punkt entlang der
    /// Blickrichtung um den Kamera-Abstand zum Ursprung weiter. Das hält den
    /// gezogenen Punkt auf ungefähr konstanter Tiefe, ohne echten Ebenenschnitt.
    pub fn drag_point(&self, ndc: Vec2) -> Option<Vec3> {
        if !ndc.is_finite() {
            return None;
        }
        let near_point = self.unproject(ndc.extend(0.5))?;
        let dir = (near_point - self.position).normalize_or_zero();
        let depth = self.position.length().max(DRAG_DEPTH_EPSILON);
        let point = near_point + dir * depth;
        point.is_finite().then_some(point)
    }
}

impl Default for Camera3D {
    fn default() -> Self {
        Self::new()
    }
}
