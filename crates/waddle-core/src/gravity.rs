//! Radial gravity: every body is pulled toward the world center.
//!
//! The pull is applied as an impulse rather than a force so the inward
//! momentum change per tick does not depend on step timing or body mass
//! assumptions.

use rapier3d::prelude::*;

use crate::entity::EntityRegistry;
use crate::physics::PhysicsWorld;

/// Default inward impulse magnitude per tick.
pub const DEFAULT_GRAVITY_MAGNITUDE: f32 = 9.81;

/// Applies the inward impulse to every registered entity.
///
/// Direction is computed from the entity's render position, which the
/// transform synchronizer refreshed earlier in the same tick. Entities at
/// the exact center (spawn rules forbid this) are skipped rather than
/// fed a NaN direction.
pub fn apply_radial_gravity(
    world: &mut PhysicsWorld,
    registry: &EntityRegistry,
    magnitude: f32,
) {
    for entity in registry.iter() {
        let Some(direction) = (-entity.transform.position).try_normalize() else {
            tracing::warn!(
                "[gravity] {} entity at world center, skipping impulse",
                entity.kind.name()
            );
            continue;
        };

        let Some(body) = world.get_rigid_body_mut(entity.body) else {
            continue;
        };
        body.apply_impulse(direction * magnitude, true);
    }
}
