//! Planet configuration: the fixed world frame all radial math uses.
//!
//! The center sits at the origin for the whole session; only the radius
//! and surface material are configurable.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::physics::{PHYSICS_SCALE, PhysicsWorld};

/// Planet world-frame configuration, in render-space units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanetConfig {
    pub radius: f32,
    pub restitution: f32,
    pub friction: f32,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            radius: 400.0,
            restitution: 0.4,
            friction: 1.0,
        }
    }
}

impl PlanetConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.radius <= 0.0 {
            return Err(GameError::InvalidConfig(
                "planet radius must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Creates the fixed planet body and its ball collider in physics
    /// space. Returns the surface collider handle.
    pub fn apply_to_world(&self, world: &mut PhysicsWorld) -> ColliderHandle {
        let body = world.add_rigid_body(RigidBodyBuilder::fixed().can_sleep(true).build());
        world.add_collider(
            ColliderBuilder::ball(self.radius / PHYSICS_SCALE)
                .density(1.0)
                .friction(self.friction)
                .restitution(self.restitution)
                .build(),
            body,
        )
    }
}

/// Seeded placement generator for surface and sky spawn points.
///
/// Every point is at strictly positive distance from the center, which
/// the radial field and outward orientation rely on.
#[derive(Debug)]
pub struct PlanetPlacer {
    rng: ChaCha8Rng,
    radius: f32,
}

impl PlanetPlacer {
    pub fn new(seed: u64, radius: f32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            radius,
        }
    }

    /// A random render-space point `clearance` above the surface.
    pub fn surface_point(&mut self, clearance: f32) -> Vector {
        self.random_direction() * (self.radius + clearance)
    }

    /// A random render-space point between `min_altitude` and
    /// `max_altitude` above the surface, for sky-borne entities.
    pub fn sky_point(&mut self, min_altitude: f32, max_altitude: f32) -> Vector {
        let altitude = self.rng.random_range(min_altitude..max_altitude);
        self.random_direction() * (self.radius + altitude)
    }

    /// Uniformly distributed unit direction.
    fn random_direction(&mut self) -> Vector {
        let z: f32 = self.rng.random_range(-1.0..1.0_f32);
        let theta: f32 = self.rng.random_range(0.0..std::f32::consts::TAU);
        let planar = (1.0 - z * z).sqrt();
        Vector::new(planar * theta.cos(), planar * theta.sin(), z)
    }
}
