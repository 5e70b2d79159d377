//! Collision event dispatch: turns engine contact events into gameplay.
//!
//! Only gift pickup needs app-level handling; every other contact is
//! resolved physically by the engine and ignored here. Opening is
//! deferred by a fixed frame count so the bump visibly settles before the
//! box disappears.

use rapier3d::prelude::*;

use crate::entity::{EntityKind, EntityRegistry};
use crate::physics::PhysicsWorld;
use crate::schedule::{Task, TaskQueue};

/// Scans one tick's collision-start events and schedules an open for each
/// unopened gift box involved. Returns the number of opens scheduled.
///
/// Events referencing unregistered handles (stale after a removal) are
/// silently skipped. Duplicate schedules for the same gift are harmless:
/// the open transition itself is idempotent.
pub fn dispatch_collisions(
    events: &[CollisionEvent],
    registry: &EntityRegistry,
    queue: &mut TaskQueue,
    current_frame: u64,
    open_delay_frames: u64,
) -> u32 {
    let mut scheduled = 0;
    for event in events {
        let CollisionEvent::Started(h1, h2, _) = event else {
            continue;
        };
        for handle in [*h1, *h2] {
            let Some(entity) = registry.get(handle) else {
                continue;
            };
            if entity.is_unopened_gift() {
                tracing::info!(
                    "[collision] gift box bumped, opening in {open_delay_frames} frames"
                );
                queue.push(current_frame + open_delay_frames, Task::OpenGift(handle));
                scheduled += 1;
            }
        }
    }
    scheduled
}

/// Fires a gift box's open transition exactly once.
///
/// Invokes the box's `on_open` callback with its render position, then
/// removes it from the physics world and registry. Returns the position
/// on the first call; `None` if the handle is gone or already opened.
pub fn open_gift(
    world: &mut PhysicsWorld,
    registry: &mut EntityRegistry,
    handle: ColliderHandle,
) -> Option<Vector> {
    let entity = registry.get_mut(handle)?;
    let EntityKind::GiftBox { opened, on_open } = &mut entity.kind else {
        return None;
    };
    if *opened {
        return None;
    }
    *opened = true;

    let position = entity.transform.position;
    if let Some(callback) = on_open.as_mut() {
        callback(position);
    }
    registry.remove(world, handle);
    tracing::info!("[collision] gift box opened at distance {}", position.length());
    Some(position)
}
