//! Anbindung an rapier3d: Welt-Container, fester Step und Strahltests.
//!
//! Die restliche Crate rechnet in glam. Umrechnungen von und nach nalgebra
//! passieren nur in diesem Modul.

use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

pub use rapier3d::prelude::{
    ImpulseJointHandle, RigidBody, RigidBodyBuilder, RigidBodyHandle, RigidBodyType,
};

/// glam → nalgebra
pub fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

pub fn to_point(v: Vec3) -> Point<Real> {
    point![v.x, v.y, v.z]
}

/// nalgebra → glam
pub fn to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn to_quat(r: &Rotation<Real>) -> Quat {
    Quat::from_xyzw(r.i, r.j, r.k, r.w)
}

pub fn to_rotation(q: Quat) -> Rotation<Real> {
    UnitQuaternion::new_normalize(Quaternion::new(q.w, q.x, q.y, q.z))
}

fn is_finite_pose(pose: &Isometry<Real>) -> bool {
    pose.translation.vector.iter().all(|c| c.is_finite())
        && pose.rotation.coords.iter().all(|c| c.is_finite())
}

/// Solver- und Schlaf-Parameter der Welt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Schwerkraft-Beschleunigung
    pub gravity: Vec3,
    /// Fester Zeitschritt eines Steps in Sekunden
    pub time_step: f32,
    /// Solver-Iterationen pro Step
    pub solver_iterations: u32,
    /// Unterhalb dieser Geschwindigkeit darf ein Body einschlafen
    pub linear_sleep_threshold: f32,
    /// Unterhalb dieser Winkelgeschwindigkeit darf ein Body einschlafen
    pub angular_sleep_threshold: f32,
    /// Ruhezeit in Sekunden bis zum Einschlafen
    pub time_until_sleep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -40.0, 0.0),
            time_step: 1.0 / 60.0,
            solver_iterations: 4,
            linear_sleep_threshold: 0.4,
            angular_sleep_threshold: 0.5,
            time_until_sleep: 2.0,
        }
    }
}

/// Treffer eines Strahltests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub body: RigidBodyHandle,
    /// Strahlparameter des Treffers
    pub toi: f32,
    /// Trefferpunkt in Weltkoordinaten
    pub point: Vec3,
}

/// Die rapier-Welt der Szene. Besitzt alle Bodies, Collider und Gelenke;
/// die Szene hält nur Handles.
pub struct PhysicsWorld {
    pub config: PhysicsConfig,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    /// Posen vor dem letzten Step, für den NaN-Schutz
    pose_snapshot: Vec<(RigidBodyHandle, Isometry<Real>)>,
}

impl PhysicsWorld {
    pub fn new(config: PhysicsConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        if config.time_step.is_finite() && config.time_step > 0.0 {
            integration_parameters.dt = config.time_step;
        } else {
            log::warn!(
                "Ungültiger Zeitschritt {}, verwende {}",
                config.time_step,
                integration_parameters.dt
            );
        }
        if let Some(iterations) = std::num::NonZeroUsize::new(config.solver_iterations as usize) {
            integration_parameters.num_solver_iterations = iterations;
        }

        Self {
            config,
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            pose_snapshot: Vec::new(),
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }

    /// Fügt einen Body ein; Schlafschwellen kommen aus der Konfiguration.
    pub fn insert_body(&mut self, body: impl Into<RigidBody>) -> RigidBodyHandle {
        let mut body = body.into();
        let activation = body.activation_mut();
        activation.normalized_linear_threshold = self.config.linear_sleep_threshold;
        activation.angular_threshold = self.config.angular_sleep_threshold;
        activation.time_until_sleep = self.config.time_until_sleep;
        self.bodies.insert(body)
    }

    pub fn insert_collider(
        &mut self,
        collider: impl Into<Collider>,
        parent: RigidBodyHandle,
    ) -> ColliderHandle {
        self.colliders
            .insert_with_parent(collider, parent, &mut self.bodies)
    }

    pub fn insert_joint(
        &mut self,
        body_a: RigidBodyHandle,
        body_b: RigidBodyHandle,
        joint: impl Into<GenericJoint>,
    ) -> ImpulseJointHandle {
        self.impulse_joints.insert(body_a, body_b, joint, true)
    }

    /// Entfernt einen Body samt Collidern und Gelenken.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> Option<RigidBody> {
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        )
    }

    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (RigidBodyHandle, &RigidBody)> {
        self.bodies.iter()
    }

    pub fn translation(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.body(handle).map(|body| to_vec3(body.translation()))
    }

    pub fn rotation(&self, handle: RigidBodyHandle) -> Option<Quat> {
        self.body(handle).map(|body| to_quat(body.rotation()))
    }

    pub fn linvel(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.body(handle).map(|body| to_vec3(body.linvel()))
    }

    pub fn angvel(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.body(handle).map(|body| to_vec3(body.angvel()))
    }

    /// Lokaler Punkt eines Bodies in Weltkoordinaten.
    pub fn world_point(&self, handle: RigidBodyHandle, local: Vec3) -> Option<Vec3> {
        let body = self.body(handle)?;
        let p = body.position() * to_point(local);
        Some(Vec3::new(p.x, p.y, p.z))
    }

    /// Setzt Pose hart und nullt beide Geschwindigkeiten (weckt den Body).
    pub fn teleport(&mut self, handle: RigidBodyHandle, translation: Vec3, rotation: Quat) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_translation(to_vector(translation), true);
            body.set_rotation(to_rotation(rotation), true);
            body.set_linvel(vector![0.0, 0.0, 0.0], true);
            body.set_angvel(vector![0.0, 0.0, 0.0], true);
        }
    }

    /// Nächster Treffer entlang des Strahls, nur Collider deren Body `filter` erfüllt.
    ///
    /// Gleicht vorher die Collider-Posen mit extern versetzten Bodies ab,
    /// damit auch zwischen zwei Steps korrekt getroffen wird.
    pub fn cast_ray(
        &mut self,
        origin: Vec3,
        dir: Vec3,
        max_toi: f32,
        filter: impl Fn(RigidBodyHandle) -> bool,
    ) -> Option<RayHit> {
        if !origin.is_finite() || !dir.is_finite() || dir.length_squared() <= f32::EPSILON {
            return None;
        }
        self.bodies
            .propagate_modified_body_positions_to_colliders(&mut self.colliders);
        self.query_pipeline.update(&self.colliders);

        let ray = Ray::new(to_point(origin), to_vector(dir.normalize()));
        let predicate = |_: ColliderHandle, collider: &Collider| collider.parent().is_some_and(&filter);
        let query = QueryFilter::default().predicate(&predicate);

        let (collider, toi) =
            self.query_pipeline
                .cast_ray(&self.bodies, &self.colliders, &ray, max_toi, true, query)?;
        let body = self.colliders.get(collider)?.parent()?;
        let p = ray.point_at(toi);
        Some(RayHit {
            body,
            toi,
            point: Vec3::new(p.x, p.y, p.z),
        })
    }

    /// Ein fester Physik-Step.
    ///
    /// Liefert der Solver nicht-endliche Posen, wird der betroffene Body auf
    /// die Pose vor dem Step zurückgesetzt und angehalten.
    pub fn step(&mut self) {
        self.pose_snapshot.clear();
        self.pose_snapshot.extend(
            self.bodies
                .iter()
                .filter(|(_, body)| body.is_dynamic())
                .map(|(handle, body)| (handle, *body.position())),
        );

        let gravity = to_vector(self.config.gravity);
        self.pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        for &(handle, pose) in &self.pose_snapshot {
            let Some(body) = self.bodies.get_mut(handle) else {
                continue;
            };
            if is_finite_pose(body.position())
                && body.linvel().iter().all(|c| c.is_finite())
                && body.angvel().iter().all(|c| c.is_finite())
            {
                continue;
            }
            log::warn!("Nicht-endlicher Body-Zustand nach Step ({handle:?}), Pose zurückgesetzt");
            body.set_position(pose, false);
            body.set_linvel(vector![0.0, 0.0, 0.0], false);
            body.set_angvel(vector![0.0, 0.0, 0.0], false);
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}
