//! Game-mode state machine.
//!
//! Exactly one mode is active per frame. Transitions are triggered by
//! click intents routed through [`crate::game::Game::handle_click`]; each
//! transition records an effect so the external UI can tear down or build
//! the matching presentation.

use rapier3d::prelude::{Rotation, Vector};
use serde::{Deserialize, Serialize};

/// State captured on entering object viewing and restored bit-for-bit on
/// exit, so repeated enter/exit cycles cannot drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavedView {
    pub position: Vector,
    pub rotation: Rotation,
    pub zoom: f32,
}

/// Pager over the introduction story's pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryPager {
    pub page: usize,
    pub page_count: usize,
}

impl StoryPager {
    pub fn new(page_count: usize) -> Self {
        Self {
            page: 0,
            page_count,
        }
    }

    /// Advances to the next page, saturating at the last one.
    pub fn forward(&mut self) {
        if self.page + 1 < self.page_count {
            self.page += 1;
        }
    }

    /// Goes back one page, saturating at the first.
    pub fn backward(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// The story can only be dismissed from its last page.
    pub fn at_last_page(&self) -> bool {
        self.page_count == 0 || self.page == self.page_count - 1
    }
}

/// The mutually-exclusive per-frame behaviors.
#[derive(Debug)]
pub enum GameMode {
    /// Orbiting title view, waiting for the start click.
    StartScreen { setup_done: bool },
    /// Story pages staged in front of the camera.
    Introduction {
        setup_done: bool,
        story: StoryPager,
    },
    /// Walking the planet, collecting gifts.
    MainGame { setup_done: bool },
    /// Close-up inspection of one gallery frame.
    ObjectViewing { frame: u32, saved: SavedView },
}

impl GameMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartScreen { .. } => "start_screen",
            Self::Introduction { .. } => "introduction",
            Self::MainGame { .. } => "main_game",
            Self::ObjectViewing { .. } => "object_viewing",
        }
    }

    /// Zoom handling is unconstrained while no player is being followed.
    pub fn zoom_unconstrained(&self) -> bool {
        matches!(
            self,
            Self::Introduction { .. } | Self::ObjectViewing { .. }
        )
    }
}

/// Side effects of a mode transition, reported to the embedding app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeEffect {
    /// Start-screen scenery (title text, button) should be disposed.
    StartScreenTornDown,
    /// The story frame should be disposed; main play begins.
    IntroductionDismissed,
    /// A gallery frame moves to the inspection staging area.
    ViewingEntered { frame: u32 },
    /// The gallery frame snapped back to its captured pose.
    ViewingExited { frame: u32 },
}
