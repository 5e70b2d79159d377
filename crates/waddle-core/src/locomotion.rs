//! Player locomotion: camera-relative impulses, double jump, outward facing.

use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

use crate::camera::CameraRig;
use crate::entity::EntityRegistry;
use crate::input::InputState;
use crate::physics::PhysicsWorld;
use crate::schedule::{Task, TaskQueue};
use crate::util;

/// Jump charge cap: one airborne jump on top of the grounded one.
pub const MAX_JUMP_CHARGE: u8 = 2;

/// Movement tuning, render-space units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementConfig {
    /// Impulse magnitude for held directions.
    pub speed: f32,
    /// Jump impulse = `speed * jump_multiplier`, applied outward.
    pub jump_multiplier: f32,
    /// Frames until a spent jump charge is restored.
    pub jump_cooldown_frames: u64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: 3.0,
            jump_multiplier: 150.0,
            jump_cooldown_frames: 60,
        }
    }
}

/// Per-player locomotion state.
#[derive(Debug, Default)]
pub struct Locomotion {
    /// Jump charges spent and not yet restored.
    pub jump_charge: u8,
    /// Rotation about the player's outward axis, driven by drag input.
    pub roll: f32,
}

impl Locomotion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulates drag-to-turn input into the roll channel.
    pub fn turn(&mut self, delta: f32) {
        self.roll += delta;
    }

    /// Gives back one jump charge (scheduled cooldown firing).
    pub fn restore_charge(&mut self) {
        self.jump_charge = self.jump_charge.saturating_sub(1);
    }
}

/// Drives the player entity for one tick: jump, held directions, then the
/// outward-facing correction that preserves the roll channel.
#[allow(clippy::too_many_arguments)]
pub fn drive_player(
    world: &mut PhysicsWorld,
    registry: &mut EntityRegistry,
    player: ColliderHandle,
    input: &mut InputState,
    locomotion: &mut Locomotion,
    camera: &CameraRig,
    queue: &mut TaskQueue,
    config: &MovementConfig,
) {
    let Some(entity) = registry.get(player) else {
        tracing::warn!("[locomotion] player entity missing, skipping tick");
        return;
    };
    let position = entity.transform.position;
    let body_handle = entity.body;

    // Jump: spend a charge if one is available; a request hitting the cap
    // is dropped, not queued.
    if input.jump_requested {
        if locomotion.jump_charge < MAX_JUMP_CHARGE {
            if let Some(outward) = util::outward_axis(position) {
                locomotion.jump_charge += 1;
                if let Some(body) = world.get_rigid_body_mut(body_handle) {
                    body.apply_impulse(
                        outward * config.speed * config.jump_multiplier,
                        true,
                    );
                }
                queue.push(
                    world.current_frame() + config.jump_cooldown_frames,
                    Task::RestoreJumpCharge,
                );
            }
        }
        input.jump_requested = false;
    }

    // Held directions, relative to the camera. Forward points from the
    // zoom-normalized camera position toward the player; strafing rotates
    // it about the up axis projected tangent to the sphere.
    let camera_ref = camera.position / camera.zoom;
    if let Some(forward) = (position - camera_ref).try_normalize() {
        let mut impulses: Vec<Vector> = Vec::new();
        if input.forward {
            impulses.push(forward);
        }
        if input.backward {
            impulses.push(-forward);
        }
        if input.left || input.right {
            let up = Vector::Y;
            let tangent_up = up - forward * up.dot(forward);
            if let Some(axis) = tangent_up.try_normalize() {
                if input.left {
                    impulses.push(
                        Rotation::from_axis_angle(axis, std::f32::consts::FRAC_PI_2) * forward,
                    );
                }
                if input.right {
                    impulses.push(
                        Rotation::from_axis_angle(axis, -std::f32::consts::FRAC_PI_2) * forward,
                    );
                }
            }
        }

        if let Some(body) = world.get_rigid_body_mut(body_handle) {
            for direction in impulses {
                body.apply_impulse(direction * config.speed, true);
            }
        }
    }

    // Face outward from the center, keeping the roll accumulated from
    // drag input so turning is not undone by the correction.
    if let Some(entity) = registry.get_mut(player) {
        if let Some(rotation) = util::orient_outward(position, locomotion.roll) {
            entity.transform.rotation = rotation;
        }
    }
}
