//! Game entities and the collider-handle registry.
//!
//! Every entity with a physics presence has exactly one registry entry,
//! keyed by the collider handle the engine assigned at spawn. The registry
//! uses a plain vector with linear lookup: the world holds a few dozen
//! entities at most and insertion order keeps iteration deterministic.

use rapier3d::prelude::*;
use std::fmt;

use crate::error::GameError;
use crate::physics::{PHYSICS_SCALE, PhysicsWorld};
use crate::util;

/// Callback invoked exactly once when a gift box opens, with the box's
/// render-space position (where the revealed content should appear).
pub type OpenCallback = Box<dyn FnMut(Vector)>;

/// Render-space pose of an entity, written by the transform synchronizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTransform {
    pub position: Vector,
    pub rotation: Rotation,
}

impl Default for RenderTransform {
    fn default() -> Self {
        Self {
            position: Vector::ZERO,
            rotation: Rotation::IDENTITY,
        }
    }
}

/// Closed set of entity variants.
pub enum EntityKind {
    /// The controllable penguin.
    Player,
    /// A collectable box; opening is idempotent via `opened`.
    GiftBox {
        opened: bool,
        on_open: Option<OpenCallback>,
    },
    /// Decorative drifting light, nudged periodically.
    Light,
    /// A thrown snowball, removed once `expires_at_frame` passes.
    Projectile { expires_at_frame: u64 },
    /// Scenery with physics presence but no gameplay behavior.
    StaticProp,
}

impl EntityKind {
    /// Discriminant name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::GiftBox { .. } => "gift_box",
            Self::Light => "light",
            Self::Projectile { .. } => "projectile",
            Self::StaticProp => "static_prop",
        }
    }
}

impl fmt::Debug for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GiftBox { opened, on_open } => f
                .debug_struct("GiftBox")
                .field("opened", opened)
                .field("has_callback", &on_open.is_some())
                .finish(),
            Self::Projectile { expires_at_frame } => f
                .debug_struct("Projectile")
                .field("expires_at_frame", expires_at_frame)
                .finish(),
            other => f.write_str(other.name()),
        }
    }
}

/// A game object with a physics body and a render transform.
#[derive(Debug)]
pub struct Entity {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    pub transform: RenderTransform,
    /// Whether the transform synchronizer copies the body's orientation.
    /// Entities that face outward explicitly (the player) keep this false.
    pub should_rotate: bool,
    pub kind: EntityKind,
}

impl Entity {
    /// True for a gift box whose open transition has not fired yet.
    pub fn is_unopened_gift(&self) -> bool {
        matches!(self.kind, EntityKind::GiftBox { opened: false, .. })
    }
}

/// Maps collider handles to entities.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity under its collider handle.
    pub fn register(&mut self, entity: Entity) {
        debug_assert!(
            self.get(entity.collider).is_none(),
            "duplicate registry entry for collider handle"
        );
        self.entities.push(entity);
    }

    /// Removes and returns the entity for `handle`. Unknown handles are a
    /// no-op, tolerating double-cleanup from stacked deferred removals.
    pub fn unregister(&mut self, handle: ColliderHandle) -> Option<Entity> {
        let pos = self.entities.iter().position(|e| e.collider == handle)?;
        Some(self.entities.remove(pos))
    }

    pub fn get(&self, handle: ColliderHandle) -> Option<&Entity> {
        self.entities.iter().find(|e| e.collider == handle)
    }

    pub fn get_mut(&mut self, handle: ColliderHandle) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.collider == handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Collider handles in registration order.
    pub fn handles(&self) -> Vec<ColliderHandle> {
        self.entities.iter().map(|e| e.collider).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Removes an entity from both the physics world and the registry.
    /// The two always detach together so no tick observes a dangling body.
    pub fn remove(&mut self, world: &mut PhysicsWorld, handle: ColliderHandle) -> bool {
        match self.unregister(handle) {
            Some(entity) => {
                world.remove_rigid_body(entity.body);
                true
            }
            None => false,
        }
    }

    /// Spawns the player at a render-space position on the planet surface.
    pub fn spawn_player(
        &mut self,
        world: &mut PhysicsWorld,
        position: Vector,
    ) -> Result<ColliderHandle, GameError> {
        let rotation = util::face_outward(position).ok_or(GameError::SpawnAtCenter)?;

        let body = world.add_rigid_body(
            RigidBodyBuilder::dynamic()
                .translation(position / PHYSICS_SCALE)
                .linear_damping(1.0)
                .ccd_enabled(true)
                .can_sleep(false)
                .gravity_scale(0.0)
                .build(),
        );
        let collider = world.add_collider(
            ColliderBuilder::ball(1.0)
                .friction(100.0)
                .density(1.0)
                .restitution(0.3)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .build(),
            body,
        );

        self.register(Entity {
            body,
            collider,
            transform: RenderTransform {
                position,
                rotation,
            },
            // The player faces outward explicitly each tick; copying the
            // body's tumbling orientation would fight that.
            should_rotate: false,
            kind: EntityKind::Player,
        });
        Ok(collider)
    }

    /// Spawns a gift box. `half_extents` is the render-space half-size of
    /// the model; the collider is shrunk slightly so boxes visually touch
    /// before they collide.
    pub fn spawn_gift_box(
        &mut self,
        world: &mut PhysicsWorld,
        half_extents: Vector,
        position: Vector,
        on_open: OpenCallback,
    ) -> Result<ColliderHandle, GameError> {
        let rotation = util::face_outward(position).ok_or(GameError::SpawnAtCenter)?;
        let hx = half_extents * 0.9 / PHYSICS_SCALE;

        let body = world.add_rigid_body(
            RigidBodyBuilder::dynamic()
                .translation(position / PHYSICS_SCALE)
                .rotation(rotation.to_scaled_axis())
                .additional_mass(10.0)
                .linear_damping(1.0)
                .can_sleep(true)
                .gravity_scale(0.0)
                .build(),
        );
        let collider = world.add_collider(
            ColliderBuilder::cuboid(hx.x, hx.y, hx.z)
                .friction(10.0)
                .density(1.0)
                .restitution(0.1)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .build(),
            body,
        );

        self.register(Entity {
            body,
            collider,
            transform: RenderTransform {
                position,
                rotation,
            },
            should_rotate: true,
            kind: EntityKind::GiftBox {
                opened: false,
                on_open: Some(on_open),
            },
        });
        Ok(collider)
    }

    /// Spawns a decorative light drifting in the sky.
    pub fn spawn_light(
        &mut self,
        world: &mut PhysicsWorld,
        position: Vector,
    ) -> Result<ColliderHandle, GameError> {
        if position == Vector::ZERO {
            return Err(GameError::SpawnAtCenter);
        }

        let body = world.add_rigid_body(
            RigidBodyBuilder::dynamic()
                .translation(position / PHYSICS_SCALE)
                .linear_damping(0.2)
                .can_sleep(true)
                .gravity_scale(0.0)
                .build(),
        );
        let collider = world.add_collider(
            ColliderBuilder::ball(1.0)
                .density(0.05)
                .restitution(0.05)
                .build(),
            body,
        );

        self.register(Entity {
            body,
            collider,
            transform: RenderTransform {
                position,
                rotation: Rotation::IDENTITY,
            },
            should_rotate: true,
            kind: EntityKind::Light,
        });
        Ok(collider)
    }

    /// Spawns a projectile due for removal once the world reaches
    /// `expires_at_frame`.
    pub fn spawn_projectile(
        &mut self,
        world: &mut PhysicsWorld,
        position: Vector,
        expires_at_frame: u64,
    ) -> Result<ColliderHandle, GameError> {
        if position == Vector::ZERO {
            return Err(GameError::SpawnAtCenter);
        }

        let body = world.add_rigid_body(
            RigidBodyBuilder::dynamic()
                .translation(position / PHYSICS_SCALE)
                .additional_mass(10.0)
                .linear_damping(1.0)
                .ccd_enabled(true)
                .can_sleep(false)
                .gravity_scale(0.0)
                .build(),
        );
        let collider = world.add_collider(
            ColliderBuilder::ball(1.0 / PHYSICS_SCALE)
                .friction(100.0)
                .density(20.0)
                .restitution(0.1)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .build(),
            body,
        );

        self.register(Entity {
            body,
            collider,
            transform: RenderTransform {
                position,
                rotation: Rotation::IDENTITY,
            },
            should_rotate: false,
            kind: EntityKind::Projectile { expires_at_frame },
        });
        Ok(collider)
    }

    /// Spawns scenery with a cylinder collider (trees and the like).
    pub fn spawn_prop(
        &mut self,
        world: &mut PhysicsWorld,
        half_height: f32,
        radius: f32,
        position: Vector,
    ) -> Result<ColliderHandle, GameError> {
        let rotation = util::face_outward(position).ok_or(GameError::SpawnAtCenter)?;

        let body = world.add_rigid_body(
            RigidBodyBuilder::dynamic()
                .translation(position / PHYSICS_SCALE)
                .rotation(rotation.to_scaled_axis())
                .additional_mass(10.0)
                .linear_damping(1.0)
                .ccd_enabled(true)
                .gravity_scale(0.0)
                .build(),
        );
        let collider = world.add_collider(
            ColliderBuilder::cylinder(half_height / PHYSICS_SCALE, radius / PHYSICS_SCALE)
                .friction(10.0)
                .density(1.0)
                .restitution(0.1)
                .build(),
            body,
        );

        self.register(Entity {
            body,
            collider,
            transform: RenderTransform {
                position,
                rotation,
            },
            should_rotate: true,
            kind: EntityKind::StaticProp,
        });
        Ok(collider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_position() -> Vector {
        Vector::new(402.0, 0.0, 0.0)
    }

    #[test]
    fn test_register_and_get() {
        let mut world = PhysicsWorld::new();
        let mut registry = EntityRegistry::new();

        let handle = registry
            .spawn_player(&mut world, spawn_position())
            .unwrap();

        assert_eq!(registry.len(), 1);
        let entity = registry.get(handle).unwrap();
        assert!(matches!(entity.kind, EntityKind::Player));
        assert!(!entity.should_rotate);
    }

    #[test]
    fn test_unregister_unknown_handle_is_noop() {
        let mut world = PhysicsWorld::new();
        let mut registry = EntityRegistry::new();

        let handle = registry
            .spawn_light(&mut world, Vector::new(0.0, 500.0, 0.0))
            .unwrap();

        assert!(registry.unregister(handle).is_some());
        assert!(registry.get(handle).is_none());
        // Second unregister must not panic or error.
        assert!(registry.unregister(handle).is_none());
    }

    #[test]
    fn test_remove_detaches_body_and_entry_together() {
        let mut world = PhysicsWorld::new();
        let mut registry = EntityRegistry::new();

        let handle = registry
            .spawn_projectile(&mut world, spawn_position(), 120)
            .unwrap();
        let body = registry.get(handle).unwrap().body;

        assert!(registry.remove(&mut world, handle));
        assert!(registry.get(handle).is_none());
        assert!(world.get_rigid_body(body).is_none());

        // Double-remove is a no-op.
        assert!(!registry.remove(&mut world, handle));
    }

    #[test]
    fn test_spawn_at_center_rejected() {
        let mut world = PhysicsWorld::new();
        let mut registry = EntityRegistry::new();

        let result = registry.spawn_player(&mut world, Vector::ZERO);
        assert!(matches!(result, Err(GameError::SpawnAtCenter)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_gift_box_starts_unopened() {
        let mut world = PhysicsWorld::new();
        let mut registry = EntityRegistry::new();

        let handle = registry
            .spawn_gift_box(
                &mut world,
                Vector::new(2.0, 2.0, 2.0),
                spawn_position(),
                Box::new(|_| {}),
            )
            .unwrap();

        assert!(registry.get(handle).unwrap().is_unopened_gift());
    }

    #[test]
    fn test_player_spawn_faces_outward() {
        let mut world = PhysicsWorld::new();
        let mut registry = EntityRegistry::new();

        let position = Vector::new(0.0, 350.0, 120.0);
        let handle = registry.spawn_player(&mut world, position).unwrap();

        let entity = registry.get(handle).unwrap();
        let up = entity.transform.rotation * Vector::Y;
        let outward = position.normalize();
        assert!((up.dot(outward) - 1.0).abs() < 1.0e-4);

        // Physics translation is the render position scaled down.
        let body_pos = world.get_rigid_body(entity.body).unwrap().translation();
        assert!((body_pos.y - position.y / PHYSICS_SCALE).abs() < 1.0e-5);
    }

    #[test]
    fn test_handles_follow_registration_order() {
        let mut world = PhysicsWorld::new();
        let mut registry = EntityRegistry::new();

        let a = registry.spawn_player(&mut world, spawn_position()).unwrap();
        let b = registry
            .spawn_light(&mut world, Vector::new(0.0, 500.0, 0.0))
            .unwrap();
        let c = registry
            .spawn_prop(&mut world, 10.0, 3.0, Vector::new(0.0, 402.0, 0.0))
            .unwrap();

        assert_eq!(registry.handles(), vec![a, b, c]);
    }
}
