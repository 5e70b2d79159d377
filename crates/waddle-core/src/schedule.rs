//! Deferred tasks with frame-based due times.
//!
//! Cooldowns, delayed gift opening and timed removals all go through this
//! queue instead of wall-clock timers, so tests advance simulated time by
//! ticking frames. Tasks run in a fixed slot at the start of each tick,
//! never in the middle of one, and every task tolerates its target having
//! been removed in the meantime.

use rapier3d::prelude::ColliderHandle;

/// The closed set of deferrable actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Give back one unit of jump charge after the cooldown window.
    RestoreJumpCharge,
    /// Fire a gift box's open transition (idempotent at execution time).
    OpenGift(ColliderHandle),
    /// Remove an entity (projectile timeout). No-op if already gone.
    RemoveEntity(ColliderHandle),
    /// Shove a random decorative light, then reschedule.
    NudgeLight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduledTask {
    due_frame: u64,
    task: Task,
}

/// Frame-ordered task queue.
#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: Vec<ScheduledTask>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `task` to run once the driver reaches `due_frame`.
    pub fn push(&mut self, due_frame: u64, task: Task) {
        self.tasks.push(ScheduledTask { due_frame, task });
    }

    /// Removes and returns every task due at `frame`, in scheduling order.
    pub fn take_due(&mut self, frame: u64) -> Vec<Task> {
        let mut due = Vec::new();
        self.tasks.retain(|entry| {
            if entry.due_frame <= frame {
                due.push(entry.task);
                false
            } else {
                true
            }
        });
        due
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
