//! The frame driver: owns every subsystem and advances them in a fixed
//! order once per tick.
//!
//! `Game` is the crate's top-level type. The embedding app feeds it
//! normalized input, calls [`Game::update`] at the physics rate and reads
//! back [`FrameEvents`] plus the camera and entity transforms to render.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rapier3d::prelude::{ColliderHandle, Rotation, Vector};
use serde::{Deserialize, Serialize};

use crate::camera::CameraRig;
use crate::collision;
use crate::entity::{EntityKind, EntityRegistry, OpenCallback, RenderTransform};
use crate::error::GameError;
use crate::gravity::{self, DEFAULT_GRAVITY_MAGNITUDE};
use crate::input::{ClickTarget, InputState, MoveDirection};
use crate::locomotion::{self, Locomotion, MovementConfig};
use crate::mode::{GameMode, ModeEffect, SavedView, StoryPager};
use crate::physics::PhysicsWorld;
use crate::planet::{PlanetConfig, PlanetPlacer};
use crate::schedule::{Task, TaskQueue};
use crate::sync;
use crate::util::{self, Spherical};

/// Shared anchor for the off-planet staging area where the story frame
/// and inspected gallery frames are presented.
const STAGING_ANCHOR: f32 = 1000.0;

/// Azimuth step per tick of the start-screen orbit.
const ORBIT_STEP: f32 = 0.001;

/// Impulse magnitude for the periodic decorative-light shove.
const LIGHT_NUDGE_IMPULSE: f32 = 0.5;

/// Everything tunable at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub planet: PlanetConfig,
    /// Seed for gift/light/prop placement and the light nudger.
    pub seed: u64,
    pub gravity_magnitude: f32,
    pub movement: MovementConfig,
    /// Frames between a gift bump and its open transition.
    pub gift_open_delay_frames: u64,
    /// Frames a thrown projectile lives before removal.
    pub projectile_ttl_frames: u64,
    /// Frames between decorative-light shoves.
    pub light_nudge_interval_frames: u64,
    pub story_page_count: usize,
    /// Zoom applied when the introduction begins.
    pub intro_zoom: f32,
    /// Zoom applied when main play begins.
    pub main_zoom: f32,
    /// Zoom applied while inspecting a gallery frame.
    pub viewing_zoom: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            planet: PlanetConfig::default(),
            seed: 0,
            gravity_magnitude: DEFAULT_GRAVITY_MAGNITUDE,
            movement: MovementConfig::default(),
            gift_open_delay_frames: 60,
            projectile_ttl_frames: 120,
            light_nudge_interval_frames: 120,
            story_page_count: 5,
            intro_zoom: 50.0,
            main_zoom: 1.1,
            viewing_zoom: 2.0,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        self.planet.validate()?;
        if !self.gravity_magnitude.is_finite() || self.gravity_magnitude <= 0.0 {
            return Err(GameError::InvalidConfig(format!(
                "gravity magnitude must be positive, got {}",
                self.gravity_magnitude
            )));
        }
        if self.story_page_count == 0 {
            return Err(GameError::InvalidConfig(
                "story must have at least one page".to_owned(),
            ));
        }
        Ok(())
    }
}

/// One gift's revealed gallery frame, pinned where the box opened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalleryFrame {
    pub id: u32,
    pub transform: RenderTransform,
}

/// A gift box's open transition, reported the frame it fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GiftOpened {
    /// Id of the gallery frame created in the box's place.
    pub gallery: u32,
    pub position: Vector,
}

/// What one call to [`Game::update`] did, for the renderer/UI to react
/// to. Mode transitions are reported synchronously by
/// [`Game::handle_click`] instead.
#[derive(Debug, Default)]
pub struct FrameEvents {
    pub gifts_opened: Vec<GiftOpened>,
    /// Entities removed this frame (opened boxes, expired projectiles).
    pub removed: Vec<ColliderHandle>,
}

/// Owns the physics world, the entity registry and all per-mode state.
pub struct Game {
    config: GameConfig,
    physics: PhysicsWorld,
    registry: EntityRegistry,
    queue: TaskQueue,
    camera: CameraRig,
    input: InputState,
    locomotion: Locomotion,
    mode: GameMode,
    player: ColliderHandle,
    planet_collider: ColliderHandle,
    placer: PlanetPlacer,
    nudge_rng: ChaCha8Rng,
    gifts_total: u32,
    gifts_opened: u32,
    galleries: Vec<GalleryFrame>,
    next_gallery_id: u32,
    /// Pose of the introduction's story frame while staged.
    story_frame: RenderTransform,
}

impl Game {
    /// Builds the world: planet, player on the surface, first light-nudge
    /// scheduled. Construction failures are fatal.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;

        let mut physics = PhysicsWorld::new();
        let planet_collider = config.planet.apply_to_world(&mut physics);

        let mut registry = EntityRegistry::new();
        let spawn = Vector::new(config.planet.radius + 2.0, 0.0, 0.0);
        let player = registry.spawn_player(&mut physics, spawn)?;

        let mut queue = TaskQueue::new();
        queue.push(config.light_nudge_interval_frames, Task::NudgeLight);

        tracing::info!(
            "[game] world ready, planet radius {}, seed {}",
            config.planet.radius,
            config.seed
        );

        Ok(Self {
            placer: PlanetPlacer::new(config.seed, config.planet.radius),
            nudge_rng: ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(1)),
            config,
            physics,
            registry,
            queue,
            camera: CameraRig::new(),
            input: InputState::default(),
            locomotion: Locomotion::new(),
            mode: GameMode::StartScreen { setup_done: false },
            player,
            planet_collider,
            gifts_total: 0,
            gifts_opened: 0,
            galleries: Vec::new(),
            next_gallery_id: 0,
            story_frame: RenderTransform::default(),
        })
    }

    /// Advances the simulation by one tick.
    ///
    /// Fixed order: due tasks, physics step, collision dispatch, transform
    /// sync, radial gravity, then the active mode's own logic. A fault in
    /// one unit of work (stale handle, missing entity) skips that unit
    /// only.
    pub fn update(&mut self) -> FrameEvents {
        let mut events = FrameEvents::default();

        self.run_due_tasks(&mut events);

        let collisions = self.physics.step_with_events();
        collision::dispatch_collisions(
            &collisions,
            &self.registry,
            &mut self.queue,
            self.physics.current_frame(),
            self.config.gift_open_delay_frames,
        );

        sync::sync_transforms(&self.physics, &mut self.registry);
        gravity::apply_radial_gravity(
            &mut self.physics,
            &self.registry,
            self.config.gravity_magnitude,
        );

        self.tick_mode();
        events
    }

    fn run_due_tasks(&mut self, events: &mut FrameEvents) {
        for task in self.queue.take_due(self.physics.current_frame()) {
            match task {
                Task::RestoreJumpCharge => self.locomotion.restore_charge(),
                Task::OpenGift(handle) => {
                    let Some(position) =
                        collision::open_gift(&mut self.physics, &mut self.registry, handle)
                    else {
                        continue;
                    };
                    self.gifts_opened += 1;
                    let id = self.next_gallery_id;
                    self.next_gallery_id += 1;
                    let rotation =
                        util::face_outward(position).unwrap_or(Rotation::IDENTITY);
                    self.galleries.push(GalleryFrame {
                        id,
                        transform: RenderTransform { position, rotation },
                    });
                    events.removed.push(handle);
                    events.gifts_opened.push(GiftOpened {
                        gallery: id,
                        position,
                    });
                    tracing::info!(
                        "[game] gift found ({}/{})",
                        self.gifts_opened,
                        self.gifts_total
                    );
                }
                Task::RemoveEntity(handle) => {
                    if self.registry.remove(&mut self.physics, handle) {
                        events.removed.push(handle);
                    }
                }
                Task::NudgeLight => {
                    self.nudge_light();
                    self.queue.push(
                        self.physics.current_frame() + self.config.light_nudge_interval_frames,
                        Task::NudgeLight,
                    );
                }
            }
        }
    }

    /// Shoves one random decorative light so the sky keeps drifting.
    fn nudge_light(&mut self) {
        let lights: Vec<_> = self
            .registry
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::Light))
            .map(|e| e.body)
            .collect();
        if lights.is_empty() {
            return;
        }

        let body = lights[self.nudge_rng.random_range(0..lights.len())];
        let z: f32 = self.nudge_rng.random_range(-1.0..=1.0);
        let theta: f32 = self.nudge_rng.random_range(0.0..std::f32::consts::TAU);
        let planar = (1.0 - z * z).sqrt();
        let direction = Vector::new(planar * theta.cos(), z, planar * theta.sin());

        if let Some(body) = self.physics.get_rigid_body_mut(body) {
            body.apply_impulse(direction * LIGHT_NUDGE_IMPULSE, true);
        }
    }

    fn tick_mode(&mut self) {
        match &mut self.mode {
            GameMode::StartScreen { setup_done } => {
                if !*setup_done {
                    *setup_done = true;
                    let radius = self.config.planet.radius;
                    self.camera.position = Vector::new(radius * 3.0, radius, 0.0);
                    tracing::info!("[mode] start screen ready");
                }
                // Slow orbit around the planet until the start click.
                let mut spherical = Spherical::from_cartesian(self.camera.position);
                spherical.theta += ORBIT_STEP;
                self.camera.position = spherical.to_cartesian();
                self.camera.look_target = Vector::ZERO;
            }
            GameMode::Introduction { setup_done, .. } => {
                if !*setup_done {
                    *setup_done = true;
                    tracing::info!("[mode] introduction started");
                }
                let zoom = self.camera.zoom;
                let target = Vector::new(STAGING_ANCHOR, STAGING_ANCHOR, STAGING_ANCHOR);
                let staging =
                    Vector::new(STAGING_ANCHOR - 11.0 * zoom, STAGING_ANCHOR, STAGING_ANCHOR);

                self.story_frame.position =
                    self.story_frame.position.lerp(target, self.camera.staging_smoothing);
                self.story_frame.rotation =
                    face_toward(self.story_frame.position, self.camera.position);
                self.camera.stage(staging, target);
            }
            GameMode::MainGame { setup_done } => {
                if !*setup_done {
                    *setup_done = true;
                    tracing::info!("[mode] main game started");
                }
                locomotion::drive_player(
                    &mut self.physics,
                    &mut self.registry,
                    self.player,
                    &mut self.input,
                    &mut self.locomotion,
                    &self.camera,
                    &mut self.queue,
                    &self.config.movement,
                );
                if let Some(entity) = self.registry.get(self.player) {
                    let target = entity.transform.position;
                    self.camera.follow(target);
                }
            }
            GameMode::ObjectViewing { frame, .. } => {
                let frame = *frame;
                let zoom = self.camera.zoom;
                let target = Vector::new(STAGING_ANCHOR, STAGING_ANCHOR, STAGING_ANCHOR);
                let staging =
                    Vector::new(STAGING_ANCHOR - 10.0 * zoom, STAGING_ANCHOR, STAGING_ANCHOR);

                if let Some(gallery) = self.galleries.iter_mut().find(|g| g.id == frame) {
                    gallery.transform.position =
                        gallery.transform.position.lerp(target, self.camera.staging_smoothing);
                    gallery.transform.rotation =
                        face_toward(gallery.transform.position, self.camera.position);
                }
                self.camera.stage(staging, target);
            }
        }
    }

    /// Routes an already-raycast click through the active mode.
    pub fn handle_click(&mut self, target: ClickTarget) -> Vec<ModeEffect> {
        let mut effects = Vec::new();
        match (&mut self.mode, target) {
            (GameMode::StartScreen { .. }, ClickTarget::StartButton) => {
                self.camera.zoom = self.config.intro_zoom;
                // The story frame fades in from the camera's side.
                self.story_frame = RenderTransform {
                    position: self.camera.position,
                    rotation: Rotation::IDENTITY,
                };
                self.mode = GameMode::Introduction {
                    setup_done: false,
                    story: StoryPager::new(self.config.story_page_count),
                };
                effects.push(ModeEffect::StartScreenTornDown);
                tracing::info!("[mode] start screen dismissed");
            }
            (GameMode::Introduction { story, .. }, ClickTarget::StoryForward) => {
                story.forward();
            }
            (GameMode::Introduction { story, .. }, ClickTarget::StoryBackward) => {
                story.backward();
            }
            (GameMode::Introduction { story, .. }, ClickTarget::StoryFrame)
                if story.at_last_page() =>
            {
                self.camera.zoom = self.config.main_zoom;
                self.mode = GameMode::MainGame { setup_done: false };
                effects.push(ModeEffect::IntroductionDismissed);
                tracing::info!("[mode] introduction dismissed");
            }
            (GameMode::MainGame { .. }, ClickTarget::GalleryFrame(id)) => {
                self.enter_viewing(id, None, &mut effects);
            }
            (GameMode::ObjectViewing { frame, saved }, ClickTarget::GalleryFrame(id))
                if *frame == id =>
            {
                let (frame, saved) = (*frame, *saved);
                self.exit_viewing(frame, saved, &mut effects);
            }
            (GameMode::ObjectViewing { frame, saved }, ClickTarget::GalleryForward) => {
                let (frame, saved) = (*frame, *saved);
                self.cycle_viewing(frame, saved, 1, &mut effects);
            }
            (GameMode::ObjectViewing { frame, saved }, ClickTarget::GalleryBackward) => {
                let (frame, saved) = (*frame, *saved);
                self.cycle_viewing(frame, saved, -1, &mut effects);
            }
            _ => {}
        }
        effects
    }

    /// Captures the frame's pose and the current zoom, then switches in.
    /// `carried_zoom` keeps the pre-viewing zoom alive across frame cycling.
    fn enter_viewing(&mut self, id: u32, carried_zoom: Option<f32>, effects: &mut Vec<ModeEffect>) {
        let Some(gallery) = self.galleries.iter().find(|g| g.id == id) else {
            tracing::warn!("[mode] click on unknown gallery frame {id}");
            return;
        };
        let saved = SavedView {
            position: gallery.transform.position,
            rotation: gallery.transform.rotation,
            zoom: carried_zoom.unwrap_or(self.camera.zoom),
        };
        self.camera.zoom = self.config.viewing_zoom;
        self.mode = GameMode::ObjectViewing { frame: id, saved };
        effects.push(ModeEffect::ViewingEntered { frame: id });
        tracing::info!("[mode] viewing gallery frame {id}");
    }

    /// Snaps the frame back to its captured pose and resumes main play.
    fn exit_viewing(&mut self, frame: u32, saved: SavedView, effects: &mut Vec<ModeEffect>) {
        if let Some(gallery) = self.galleries.iter_mut().find(|g| g.id == frame) {
            gallery.transform.position = saved.position;
            gallery.transform.rotation = saved.rotation;
        }
        self.camera.zoom = saved.zoom;
        self.mode = GameMode::MainGame { setup_done: true };
        effects.push(ModeEffect::ViewingExited { frame });
        tracing::info!("[mode] left gallery frame {frame}");
    }

    /// Moves inspection to the neighboring frame, restoring the current
    /// one first so its pose cannot drift.
    fn cycle_viewing(
        &mut self,
        frame: u32,
        saved: SavedView,
        step: i64,
        effects: &mut Vec<ModeEffect>,
    ) {
        let Some(index) = self.galleries.iter().position(|g| g.id == frame) else {
            return;
        };
        if let Some(gallery) = self.galleries.get_mut(index) {
            gallery.transform.position = saved.position;
            gallery.transform.rotation = saved.rotation;
        }
        effects.push(ModeEffect::ViewingExited { frame });

        let count = self.galleries.len() as i64;
        let next = (index as i64 + step).rem_euclid(count) as usize;
        let next_id = self.galleries[next].id;
        self.enter_viewing(next_id, Some(saved.zoom), effects);
    }

    /// Applies a wheel delta, constrained unless the active mode lifts it.
    pub fn zoom_delta(&mut self, delta: f32) {
        let player_distance = self
            .registry
            .get(self.player)
            .map_or(0.0, |e| e.transform.position.length());
        let unconstrained = self.mode.zoom_unconstrained();
        self.camera.apply_zoom_delta(delta, player_distance, unconstrained);
    }

    pub fn movement(&mut self, direction: MoveDirection, pressed: bool) {
        self.input.movement(direction, pressed);
    }

    pub fn request_jump(&mut self) {
        self.input.request_jump();
    }

    /// Mouse-drag roll of the player about its outward axis.
    pub fn turn(&mut self, delta: f32) {
        self.locomotion.turn(delta);
    }

    /// Throws a snowball ahead of the player along its facing, removed
    /// after the configured lifetime.
    pub fn throw_projectile(&mut self) -> Result<ColliderHandle, GameError> {
        let entity = self.registry.get(self.player).ok_or(GameError::MissingPlayer)?;
        let position = entity.transform.position;
        let facing = entity.transform.rotation * Vector::Z;

        let expires_at = self.physics.current_frame() + self.config.projectile_ttl_frames;
        let handle =
            self.registry
                .spawn_projectile(&mut self.physics, position + facing * 3.0, expires_at)?;
        if let Some(projectile) = self.registry.get(handle) {
            if let Some(body) = self.physics.get_rigid_body_mut(projectile.body) {
                body.apply_impulse(facing * 100.0, true);
            }
        }
        self.queue.push(expires_at, Task::RemoveEntity(handle));
        Ok(handle)
    }

    /// Places a gift box on a seeded surface point.
    pub fn spawn_gift_box(
        &mut self,
        half_extents: Vector,
        on_open: OpenCallback,
    ) -> Result<ColliderHandle, GameError> {
        let position = self.placer.surface_point(half_extents.y);
        let handle = self
            .registry
            .spawn_gift_box(&mut self.physics, half_extents, position, on_open)?;
        self.gifts_total += 1;
        Ok(handle)
    }

    /// Places a decorative light on a seeded sky point.
    pub fn spawn_light(&mut self) -> Result<ColliderHandle, GameError> {
        let position = self.placer.sky_point(40.0, 120.0);
        self.registry.spawn_light(&mut self.physics, position)
    }

    /// Places scenery on a seeded surface point.
    pub fn spawn_prop(&mut self, half_height: f32, radius: f32) -> Result<ColliderHandle, GameError> {
        let position = self.placer.surface_point(half_height);
        self.registry
            .spawn_prop(&mut self.physics, half_height, radius, position)
    }

    /// Collection progress as `(opened, total)`.
    pub fn gifts_found(&self) -> (u32, u32) {
        (self.gifts_opened, self.gifts_total)
    }

    pub fn mode(&self) -> &GameMode {
        &self.mode
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn galleries(&self) -> &[GalleryFrame] {
        &self.galleries
    }

    pub fn story_frame(&self) -> &RenderTransform {
        &self.story_frame
    }

    pub fn planet_collider(&self) -> ColliderHandle {
        self.planet_collider
    }

    pub fn current_frame(&self) -> u64 {
        self.physics.current_frame()
    }

    /// Determinism fingerprint of the underlying physics state.
    pub fn state_hash(&self) -> u64 {
        self.physics.compute_hash()
    }
}

/// Orientation turning a frame's local +Z toward an observer.
fn face_toward(position: Vector, observer: Vector) -> Rotation {
    (observer - position)
        .try_normalize()
        .map(|direction| Rotation::from_rotation_arc(Vector::Z, direction))
        .unwrap_or(Rotation::IDENTITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn enter_main_game(game: &mut Game) {
        let effects = game.handle_click(ClickTarget::StartButton);
        assert_eq!(effects, vec![ModeEffect::StartScreenTornDown]);
        for _ in 1..game.config.story_page_count {
            game.handle_click(ClickTarget::StoryForward);
        }
        let effects = game.handle_click(ClickTarget::StoryFrame);
        assert_eq!(effects, vec![ModeEffect::IntroductionDismissed]);
    }

    fn open_one_gift(game: &mut Game) -> u32 {
        let handle = game
            .spawn_gift_box(Vector::new(2.0, 2.0, 2.0), Box::new(|_| {}))
            .unwrap();
        game.queue.push(game.current_frame(), Task::OpenGift(handle));
        let events = game.update();
        assert_eq!(events.gifts_opened.len(), 1);
        events.gifts_opened[0].gallery
    }

    #[test]
    fn test_new_game_starts_on_start_screen() {
        let game = Game::new(GameConfig::default()).unwrap();
        assert_eq!(game.mode().name(), "start_screen");
        assert_eq!(game.gifts_found(), (0, 0));
        assert!(game.registry().get(game.player).is_some());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig {
            gravity_magnitude: -1.0,
            ..GameConfig::default()
        };
        assert!(matches!(
            Game::new(config),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_mode_transition_chain() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        game.update();
        assert_eq!(game.mode().name(), "start_screen");

        game.handle_click(ClickTarget::StartButton);
        assert_eq!(game.mode().name(), "introduction");
        assert_eq!(game.camera().zoom, game.config.intro_zoom);

        // The story frame cannot be dismissed before its last page.
        let effects = game.handle_click(ClickTarget::StoryFrame);
        assert!(effects.is_empty());
        assert_eq!(game.mode().name(), "introduction");

        for _ in 1..game.config.story_page_count {
            game.handle_click(ClickTarget::StoryForward);
        }
        game.handle_click(ClickTarget::StoryFrame);
        assert_eq!(game.mode().name(), "main_game");
        assert_eq!(game.camera().zoom, game.config.main_zoom);
    }

    #[test]
    fn test_scheduled_gift_open_reports_progress() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        enter_main_game(&mut game);

        let counter = Rc::new(Cell::new(0));
        let hook = Rc::clone(&counter);
        let handle = game
            .spawn_gift_box(
                Vector::new(2.0, 2.0, 2.0),
                Box::new(move |_| hook.set(hook.get() + 1)),
            )
            .unwrap();
        assert_eq!(game.gifts_found(), (0, 1));

        game.queue.push(game.current_frame(), Task::OpenGift(handle));
        let events = game.update();

        assert_eq!(counter.get(), 1);
        assert_eq!(game.gifts_found(), (1, 1));
        assert_eq!(game.galleries().len(), 1);
        assert!(events.removed.contains(&handle));
        assert!(game.registry().get(handle).is_none());
    }

    #[test]
    fn test_viewing_round_trip_restores_exactly() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        enter_main_game(&mut game);
        let gallery = open_one_gift(&mut game);

        let before = game.galleries()[0].transform;
        let zoom_before = game.camera().zoom;

        let effects = game.handle_click(ClickTarget::GalleryFrame(gallery));
        assert_eq!(effects, vec![ModeEffect::ViewingEntered { frame: gallery }]);
        assert_eq!(game.camera().zoom, game.config.viewing_zoom);

        // Let the frame drift toward the staging area.
        for _ in 0..30 {
            game.update();
        }
        assert_ne!(game.galleries()[0].transform.position, before.position);

        let effects = game.handle_click(ClickTarget::GalleryFrame(gallery));
        assert_eq!(effects, vec![ModeEffect::ViewingExited { frame: gallery }]);
        assert_eq!(game.mode().name(), "main_game");

        // Bit-for-bit restore of the frame pose and the zoom.
        let after = game.galleries()[0].transform;
        assert_eq!(after.position, before.position);
        assert_eq!(after.rotation, before.rotation);
        assert_eq!(game.camera().zoom, zoom_before);
    }

    #[test]
    fn test_cycling_frames_keeps_saved_poses() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        enter_main_game(&mut game);
        let first = open_one_gift(&mut game);
        let second = open_one_gift(&mut game);
        let zoom_before = game.camera().zoom;
        let poses: Vec<_> = game.galleries().iter().map(|g| g.transform).collect();

        game.handle_click(ClickTarget::GalleryFrame(first));
        for _ in 0..20 {
            game.update();
        }
        let effects = game.handle_click(ClickTarget::GalleryForward);
        assert_eq!(
            effects,
            vec![
                ModeEffect::ViewingExited { frame: first },
                ModeEffect::ViewingEntered { frame: second },
            ]
        );
        // The first frame snapped back when inspection moved on.
        assert_eq!(game.galleries()[0].transform.position, poses[0].position);

        game.handle_click(ClickTarget::GalleryFrame(second));
        assert_eq!(game.camera().zoom, zoom_before);
        assert_eq!(game.galleries()[1].transform.position, poses[1].position);
    }

    #[test]
    fn test_projectile_expires_after_ttl() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        enter_main_game(&mut game);

        let handle = game.throw_projectile().unwrap();
        assert!(game.registry().get(handle).is_some());

        let mut removed = false;
        for _ in 0..=game.config.projectile_ttl_frames + 1 {
            removed |= game.update().removed.contains(&handle);
        }
        assert!(removed);
        assert!(game.registry().get(handle).is_none());
    }

    #[test]
    fn test_identical_seeds_produce_identical_states() {
        let run = || {
            let mut game = Game::new(GameConfig::default()).unwrap();
            enter_main_game(&mut game);
            game.spawn_gift_box(Vector::new(2.0, 2.0, 2.0), Box::new(|_| {}))
                .unwrap();
            game.spawn_light().unwrap();
            game.spawn_prop(5.0, 1.0).unwrap();
            game.movement(MoveDirection::Forward, true);
            for _ in 0..180 {
                game.update();
            }
            game.state_hash()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_zoom_constraint_lifted_in_introduction() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        game.handle_click(ClickTarget::StartButton);
        game.update();

        let before = game.camera().zoom;
        game.zoom_delta(-5.0);
        assert!(game.camera().zoom < before);
    }

    #[test]
    fn test_click_on_unknown_gallery_frame_is_ignored() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        enter_main_game(&mut game);
        let effects = game.handle_click(ClickTarget::GalleryFrame(99));
        assert!(effects.is_empty());
        assert_eq!(game.mode().name(), "main_game");
    }
}
