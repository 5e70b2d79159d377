//! Transform synchronizer: copies physics poses onto render transforms.

use crate::entity::EntityRegistry;
use crate::physics::{PHYSICS_SCALE, PhysicsWorld};

/// Writes each awake body's pose to its entity's render transform.
///
/// Sleeping bodies are skipped: their render transforms already match.
/// Orientation is copied only for entities with `should_rotate`; the rest
/// keep whatever facing was set explicitly.
pub fn sync_transforms(world: &PhysicsWorld, registry: &mut EntityRegistry) {
    for entity in registry.iter_mut() {
        let Some(body) = world.get_rigid_body(entity.body) else {
            tracing::warn!(
                "[sync] {} entity has no body, skipping",
                entity.kind.name()
            );
            continue;
        };
        if body.is_sleeping() {
            continue;
        }

        entity.transform.position = body.translation() * PHYSICS_SCALE;
        if entity.should_rotate {
            entity.transform.rotation = *body.rotation();
        }
    }
}
