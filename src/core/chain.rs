//! Gelenk-Graph der Badge: Anker → J1 → J2 → J3 → Karte.
//!
//! Wird einmal beim Mounten der Szene aufgebaut und beim Unmount wieder
//! abgebaut. Die Kette hält nur Handles, nie Body-Zustand.

use glam::Vec3;
use rapier3d::prelude::{ColliderBuilder, RopeJointBuilder, SphericalJointBuilder};
use serde::{Deserialize, Serialize};

use super::physics::{
    to_point, to_vector, ImpulseJointHandle, PhysicsWorld, RigidBodyBuilder, RigidBodyHandle,
};

/// Geometrie und Dämpfung der Kette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainLayout {
    /// Weltposition des festen Ankers
    pub anchor: Vec3,
    /// Horizontaler Abstand der Bodies beim Aufbau
    pub spacing: f32,
    /// Maximale Länge eines Seilsegments
    pub segment_length: f32,
    /// Radius der Kugel-Collider von J1..J3
    pub joint_radius: f32,
    /// Halbe Kantenlängen des Karten-Colliders
    pub card_half_extents: Vec3,
    /// Aufhängepunkt der Karte in Karten-Koordinaten (Kugelgelenk zu J3)
    pub card_pivot_offset: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl Default for ChainLayout {
    fn default() -> Self {
        Self {
            anchor: Vec3::new(0.0, 4.0, 0.0),
            spacing: 0.5,
            segment_length: 1.0,
            joint_radius: 0.1,
            card_half_extents: Vec3::new(0.8, 1.125, 0.01),
            card_pivot_offset: Vec3::new(0.0, 1.45, 0.0),
            linear_damping: 2.0,
            angular_damping: 2.0,
        }
    }
}

/// Zwischengelenke, deren Positionen für das Rendering geglättet werden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmoothedJoint {
    J1,
    J2,
}

/// Handles der fünf Bodies und vier Gelenke.
#[derive(Debug, Clone)]
pub struct BadgeChain {
    pub anchor: RigidBodyHandle,
    pub j1: RigidBodyHandle,
    pub j2: RigidBodyHandle,
    pub j3: RigidBodyHandle,
    pub card: RigidBodyHandle,
    /// Seile Anker–J1, J1–J2, J2–J3 und Kugelgelenk J3–Karte
    pub joints: [ImpulseJointHandle; 4],
    segment_length: f32,
    card_pivot_offset: Vec3,
}

impl BadgeChain {
    /// Anzahl der Seilsegmente zwischen Anker und J3
    pub const ROPE_SEGMENTS: usize = 3;

    /// Baut Bodies, Collider und Gelenke in der Welt auf.
    ///
    /// Die Bodies starten waagrecht neben dem Anker und fallen in die Kette.
    pub fn spawn(world: &mut PhysicsWorld, layout: &ChainLayout) -> anyhow::Result<Self> {
        if !(layout.segment_length.is_finite() && layout.segment_length > 0.0) {
            anyhow::bail!("Ungültige Seillänge: {}", layout.segment_length);
        }
        if !layout.anchor.is_finite() || !layout.card_pivot_offset.is_finite() {
            anyhow::bail!("Anker und Aufhängepunkt müssen endlich sein");
        }

        let segment = |offset: f32| {
            RigidBodyBuilder::dynamic()
                .translation(to_vector(layout.anchor + Vec3::X * offset))
                .linear_damping(layout.linear_damping)
                .angular_damping(layout.angular_damping)
                .can_sleep(true)
        };

        let anchor = world.insert_body(
            RigidBodyBuilder::fixed().translation(to_vector(layout.anchor)),
        );
        let mut ball = |offset: f32| {
            let handle = world.insert_body(segment(offset));
            world.insert_collider(ColliderBuilder::ball(layout.joint_radius), handle);
            handle
        };
        let j1 = ball(layout.spacing);
        let j2 = ball(layout.spacing * 2.0);
        let j3 = ball(layout.spacing * 3.0);

        let card = world.insert_body(segment(layout.spacing * 4.0));
        let half = layout.card_half_extents;
        world.insert_collider(ColliderBuilder::cuboid(half.x, half.y, half.z), card);

        let mut rope = |a, b| world.insert_joint(a, b, RopeJointBuilder::new(layout.segment_length));
        let ropes = [rope(anchor, j1), rope(j1, j2), rope(j2, j3)];
        let pivot = world.insert_joint(
            j3,
            card,
            SphericalJointBuilder::new()
                .local_anchor1(to_point(Vec3::ZERO))
                .local_anchor2(to_point(layout.card_pivot_offset)),
        );

        log::info!(
            "Badge-Kette aufgebaut: {} Bodies, {} Gelenke",
            world.body_count(),
            world.joint_count()
        );

        Ok(Self {
            anchor,
            j1,
            j2,
            j3,
            card,
            joints: [ropes[0], ropes[1], ropes[2], pivot],
            segment_length: layout.segment_length,
            card_pivot_offset: layout.card_pivot_offset,
        })
    }

    /// Entfernt alle Bodies (und damit alle Gelenke) aus der Welt.
    pub fn despawn(self, world: &mut PhysicsWorld) {
        for handle in self.bodies() {
            world.remove_body(handle);
        }
        log::info!("Badge-Kette abgebaut");
    }

    /// Alle Bodies der Kette, Karte zuerst.
    pub fn bodies(&self) -> [RigidBodyHandle; 5] {
        [self.card, self.j1, self.j2, self.j3, self.anchor]
    }

    pub fn smoothed_body(&self, joint: SmoothedJoint) -> RigidBodyHandle {
        match joint {
            SmoothedJoint::J1 => self.j1,
            SmoothedJoint::J2 => self.j2,
        }
    }

    /// Weckt jeden Body der Kette. Nötig bevor die Karte extern bewegt wird,
    /// sonst folgt das schlafende Seil nicht.
    pub fn wake_all(&self, world: &mut PhysicsWorld) {
        for handle in self.bodies() {
            if let Some(body) = world.body_mut(handle) {
                body.wake_up(true);
            }
        }
    }

    /// Summe der Seilsegment-Längen (Reichweite des Aufhängepunkts).
    pub fn reach(&self) -> f32 {
        self.segment_length * Self::ROPE_SEGMENTS as f32
    }

    /// Maximaler Abstand des Karten-Schwerpunkts vom Anker.
    pub fn max_card_distance(&self) -> f32 {
        self.reach() + self.card_pivot_offset.length()
    }

    /// Aufhängepunkt in Karten-Koordinaten
    pub fn card_pivot_offset(&self) -> Vec3 {
        self.card_pivot_offset
    }

    /// Aufhängepunkt der Karte in Weltkoordinaten.
    pub fn card_pivot(&self, world: &PhysicsWorld) -> Option<Vec3> {
        world.world_point(self.card, self.card_pivot_offset)
    }

    /// Position des festen Ankers.
    pub fn anchor_position(&self, world: &PhysicsWorld) -> Option<Vec3> {
        world.translation(self.anchor)
    }

    /// Physik-Position eines Bodies (Kurzform für Lookups).
    pub fn position(&self, world: &PhysicsWorld, handle: RigidBodyHandle) -> Option<Vec3> {
        world.translation(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::physics::PhysicsConfig;

    #[test]
    fn test_spawn_builds_five_bodies_and_four_joints() {
        let mut world = PhysicsWorld::new(PhysicsConfig::default());
        let chain = BadgeChain::spawn(&mut world, &ChainLayout::default()).expect("Aufbau");
        assert_eq!(world.body_count(), 5);
        assert_eq!(world.joint_count(), 4);
        assert!(world.body(chain.anchor).expect("Anker").is_fixed());
        assert!(world.body(chain.card).expect("Karte").is_dynamic());
        assert_eq!(
            world.translation(chain.card),
            Some(Vec3::new(2.0, 4.0, 0.0))
        );
    }

    #[test]
    fn test_spawn_rejects_degenerate_rope() {
        let mut world = PhysicsWorld::new(PhysicsConfig::default());
        let layout = ChainLayout {
            segment_length: 0.0,
            ..ChainLayout::default()
        };
        assert!(BadgeChain::spawn(&mut world, &layout).is_err());
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_ropes_hold_chain_within_reach() {
        let mut world = PhysicsWorld::new(PhysicsConfig::default());
        let chain = BadgeChain::spawn(&mut world, &ChainLayout::default()).expect("Aufbau");
        for _ in 0..180 {
            world.step();
            let anchor = chain.anchor_position(&world).expect("Anker");
            let pivot = chain.card_pivot(&world).expect("Pivot");
            assert!(pivot.distance(anchor) <= chain.max_card_distance());
        }
    }

    #[test]
    fn test_reach_sums_rope_segments() {
        let mut world = PhysicsWorld::new(PhysicsConfig::default());
        let chain = BadgeChain::spawn(&mut world, &ChainLayout::default()).expect("Aufbau");
        assert_eq!(chain.reach(), 3.0);
        assert!((chain.max_card_distance() - 4.45).abs() < 1e-6);
    }

    #[test]
    fn test_despawn_invalidates_handles() {
        let mut world = PhysicsWorld::new(PhysicsConfig::default());
        let chain = BadgeChain::spawn(&mut world, &ChainLayout::default()).expect("Aufbau");
        let card = chain.card;
        chain.despawn(&mut world);
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.joint_count(), 0);
        assert!(world.body(card).is_none());
    }
}
