//! Physics simulation using `Rapier3D` with deterministic behavior.
//!
//! Engine gravity is held at zero; the game supplies its own radial field
//! every tick (see [`crate::gravity`]).

use parking_lot::Mutex;
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Fixed timestep for physics simulation (60Hz).
pub const PHYSICS_DT: f32 = 1.0 / 60.0;

/// Render-space units per physics-space unit.
///
/// The solver runs on a scaled-down copy of the world so that coordinates
/// stay numerically well-conditioned at planet-sized radii. Render
/// positions are physics translations multiplied by this factor.
pub const PHYSICS_SCALE: f32 = 10.0;

/// Gravity vector handed to the engine. Always zero: bodies are created
/// with `gravity_scale(0.0)` as well, and the radial field replaces it.
pub fn zero_gravity() -> Vector {
    Vector::ZERO
}

/// Physics world containing all `Rapier3D` components for deterministic simulation.
#[derive(Serialize, Deserialize)]
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub integration_parameters: IntegrationParameters,
    #[serde(skip, default = "PhysicsPipeline::new")]
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub gravity: Vector,
    pub frame: u64,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("frame", &self.frame)
            .field("rigid_body_count", &self.rigid_body_set.len())
            .field("collider_count", &self.collider_set.len())
            .finish_non_exhaustive()
    }
}

impl PhysicsWorld {
    /// Creates a new physics world with engine gravity disabled.
    pub fn new() -> Self {
        let integration_parameters = IntegrationParameters {
            dt: PHYSICS_DT,
            ..Default::default()
        };

        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            gravity: zero_gravity(),
            frame: 0,
        }
    }

    /// Advances the simulation by one fixed timestep, discarding events.
    pub fn step(&mut self) {
        let _ = self.step_with_events();
    }

    /// Advances the simulation by one fixed timestep and returns the
    /// collision events generated during that step, in engine order.
    pub fn step_with_events(&mut self) -> Vec<CollisionEvent> {
        let collector = CollisionEventCollector::default();
        self.physics_pipeline.step(
            self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(),
            &collector,
        );
        self.frame += 1;
        collector.into_events()
    }

    /// Advances the physics simulation by multiple steps.
    pub fn step_n(&mut self, n: u32) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Adds a rigid body to the world and returns its handle.
    pub fn add_rigid_body(&mut self, rigid_body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(rigid_body)
    }

    /// Adds a collider attached to a rigid body.
    pub fn add_collider(
        &mut self,
        collider: Collider,
        parent: RigidBodyHandle,
    ) -> ColliderHandle {
        self.collider_set
            .insert_with_parent(collider, parent, &mut self.rigid_body_set)
    }

    /// Removes a rigid body and its attached colliders.
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    /// Gets an immutable reference to a rigid body.
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Gets a mutable reference to a rigid body.
    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    /// Computes a deterministic hash of the current physics state.
    /// Used by tests to verify identically-seeded runs stay in lockstep.
    pub fn compute_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.frame.hash(&mut hasher);

        for (handle, body) in self.rigid_body_set.iter() {
            let (index, generation) = handle.into_raw_parts();
            index.hash(&mut hasher);
            generation.hash(&mut hasher);

            let pos = body.translation();
            hash_f32(pos.x, &mut hasher);
            hash_f32(pos.y, &mut hasher);
            hash_f32(pos.z, &mut hasher);

            let rot = body.rotation();
            hash_f32(rot.x, &mut hasher);
            hash_f32(rot.y, &mut hasher);
            hash_f32(rot.z, &mut hasher);
            hash_f32(rot.w, &mut hasher);

            let linvel = body.linvel();
            hash_f32(linvel.x, &mut hasher);
            hash_f32(linvel.y, &mut hasher);
            hash_f32(linvel.z, &mut hasher);
        }

        hasher.finish()
    }

    /// Returns the current simulation frame number.
    pub fn current_frame(&self) -> u64 {
        self.frame
    }
}

/// Hashes a f32 value by converting to bits.
fn hash_f32(value: f32, hasher: &mut impl Hasher) {
    value.to_bits().hash(hasher);
}

/// Collects collision events emitted during a pipeline step.
///
/// Rapier's `EventHandler` takes `&self`, so the buffer sits behind a
/// mutex even though stepping is single-threaded here.
#[derive(Default)]
struct CollisionEventCollector {
    events: Mutex<Vec<CollisionEvent>>,
}

impl CollisionEventCollector {
    fn into_events(self) -> Vec<CollisionEvent> {
        self.events.into_inner()
    }
}

impl EventHandler for CollisionEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        self.events.lock().push(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physics_world_creation() {
        let world = PhysicsWorld::new();
        assert_eq!(world.frame, 0);
        assert_eq!(world.integration_parameters.dt, PHYSICS_DT);
        assert_eq!(world.gravity, Vector::ZERO);
    }

    #[test]
    fn test_step_advances_frame() {
        let mut world = PhysicsWorld::new();
        assert_eq!(world.current_frame(), 0);

        world.step();
        assert_eq!(world.current_frame(), 1);

        world.step_n(10);
        assert_eq!(world.current_frame(), 11);
    }

    #[test]
    fn test_zero_gravity_leaves_bodies_at_rest() {
        let mut world = PhysicsWorld::new();

        let body = RigidBodyBuilder::dynamic()
            .translation(Vector::new(0.0, 50.0, 0.0))
            .gravity_scale(0.0)
            .build();
        let handle = world.add_rigid_body(body);
        world.add_collider(ColliderBuilder::ball(1.0).build(), handle);

        world.step_n(60);

        let pos = world.get_rigid_body(handle).unwrap().translation();
        assert_eq!(pos.y, 50.0);
    }

    #[test]
    fn test_deterministic_simulation() {
        let mut world1 = PhysicsWorld::new();
        let mut world2 = PhysicsWorld::new();

        let body = RigidBodyBuilder::dynamic()
            .translation(Vector::new(10.0, 10.0, 10.0))
            .linvel(Vector::new(-1.0, 0.5, 0.0))
            .build();
        let collider = ColliderBuilder::ball(1.0).restitution(0.7).build();

        let handle1 = world1.add_rigid_body(body.clone());
        world1.add_collider(collider.clone(), handle1);

        let handle2 = world2.add_rigid_body(body);
        world2.add_collider(collider, handle2);

        for _ in 0..100 {
            world1.step();
            world2.step();
        }

        assert_eq!(world1.compute_hash(), world2.compute_hash());
    }

    #[test]
    fn test_collision_events_on_contact() {
        let mut world = PhysicsWorld::new();

        // A fixed floor and a ball dropped straight at it.
        let floor = world.add_rigid_body(RigidBodyBuilder::fixed().build());
        world.add_collider(ColliderBuilder::cuboid(10.0, 0.5, 10.0).build(), floor);

        let ball = world.add_rigid_body(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(0.0, 3.0, 0.0))
                .linvel(Vector::new(0.0, -20.0, 0.0))
                .ccd_enabled(true)
                .build(),
        );
        world.add_collider(
            ColliderBuilder::ball(0.5)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .build(),
            ball,
        );

        let mut started = Vec::new();
        for _ in 0..120 {
            for event in world.step_with_events() {
                if let CollisionEvent::Started(h1, h2, _) = event {
                    started.push((h1, h2));
                }
            }
        }

        assert!(!started.is_empty(), "ball never hit the floor");
    }

    #[test]
    fn test_add_and_remove_body() {
        let mut world = PhysicsWorld::new();

        let body = RigidBodyBuilder::dynamic()
            .translation(Vector::new(5.0, 5.0, 5.0))
            .build();
        let handle = world.add_rigid_body(body);

        assert!(world.get_rigid_body(handle).is_some());

        world.remove_rigid_body(handle);
        assert!(world.get_rigid_body(handle).is_none());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut world = PhysicsWorld::new();

        let body = RigidBodyBuilder::dynamic()
            .translation(Vector::new(10.0, 20.0, 30.0))
            .linvel(Vector::new(1.0, -0.5, 0.25))
            .build();
        let handle = world.add_rigid_body(body);
        world.add_collider(ColliderBuilder::ball(1.5).build(), handle);

        world.step_n(10);
        let hash_before = world.compute_hash();

        let serialized = serde_json::to_string(&world).expect("Failed to serialize");
        let mut deserialized: PhysicsWorld =
            serde_json::from_str(&serialized).expect("Failed to deserialize");

        assert_eq!(hash_before, deserialized.compute_hash());

        world.step_n(10);
        deserialized.step_n(10);
        assert_eq!(world.compute_hash(), deserialized.compute_hash());
    }
}
