//! Waddle Core Library
//!
//! Headless game core for a gift hunt on a spherical planet: `Rapier3D`
//! physics with radial gravity, a collider-keyed entity registry and a
//! fixed-order frame driver.
//!
//! Rendering, asset loading and raw input capture live in the embedding
//! app; this crate exposes per-frame transforms, camera state and event
//! reports for it to consume.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod camera;
pub mod collision;
pub mod entity;
pub mod error;
pub mod game;
pub mod gravity;
pub mod input;
pub mod locomotion;
pub mod mode;
pub mod physics;
pub mod planet;
pub mod schedule;
pub mod sync;
pub mod util;

pub use camera::{CameraRig, MAX_ZOOM, MIN_ZOOM};
pub use entity::{Entity, EntityKind, EntityRegistry, OpenCallback, RenderTransform};
pub use error::GameError;
pub use game::{FrameEvents, GalleryFrame, Game, GameConfig, GiftOpened};
pub use gravity::DEFAULT_GRAVITY_MAGNITUDE;
pub use input::{ClickTarget, InputState, MoveDirection};
pub use locomotion::{Locomotion, MAX_JUMP_CHARGE, MovementConfig};
pub use mode::{GameMode, ModeEffect, SavedView, StoryPager};
pub use physics::{PHYSICS_DT, PHYSICS_SCALE, PhysicsWorld, zero_gravity};
pub use planet::{PlanetConfig, PlanetPlacer};
