//! Abstract input intents.
//!
//! Raw device events are normalized outside the core; only held movement
//! flags, discrete requests and already-raycast click hits arrive here.

use serde::{Deserialize, Serialize};

/// Directions the player can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
}

/// Held movement flags plus the pending jump request.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump_requested: bool,
}

impl InputState {
    /// Sets or clears a held movement flag.
    pub fn movement(&mut self, direction: MoveDirection, pressed: bool) {
        match direction {
            MoveDirection::Forward => self.forward = pressed,
            MoveDirection::Backward => self.backward = pressed,
            MoveDirection::Left => self.left = pressed,
            MoveDirection::Right => self.right = pressed,
        }
    }

    /// Registers a jump request, consumed by the locomotion controller.
    pub fn request_jump(&mut self) {
        self.jump_requested = true;
    }

    pub fn any_movement(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// A click already resolved to a world object by the external raycaster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The start-screen "Start" button.
    StartButton,
    /// The introduction story's next-page button.
    StoryForward,
    /// The introduction story's previous-page button.
    StoryBackward,
    /// The introduction story's picture frame itself.
    StoryFrame,
    /// A revealed gift's gallery frame.
    GalleryFrame(u32),
    /// Next-frame button shown while inspecting a gallery frame.
    GalleryForward,
    /// Previous-frame button shown while inspecting a gallery frame.
    GalleryBackward,
}
