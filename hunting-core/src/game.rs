//! The game object handed to the application runtime.
//!
//! The runtime owns the window and the frame loop; it calls `create` once
//! the window exists, then `render` every frame with the elapsed time and
//! the current state of the player's controls.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::entity::ShotOutcome;
use crate::scene::{self, Camera, Scene};
use crate::settings::GameSettings;
use glam::Vec2;
use crate::world::{StepOutcome, World, WorldInfo};

/// Drawable area in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }
}

/// Player input for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Controls {
    /// -1 left, 1 right.
    pub horizontal: f32,
    /// -1 down, 1 up.
    pub vertical: f32,
    /// Fire button held.
    pub shooting: bool,
    /// Pointer in window pixels, origin top-left, y down.
    pub pointer: Vec2,
}

pub trait Game {
    fn create(&mut self, viewport: Viewport);

    fn resize(&mut self, _viewport: Viewport) {}

    fn render(&mut self, dt: f32, controls: &Controls) -> Scene;

    fn dispose(&mut self) {}
}

pub struct HuntingGame {
    settings: GameSettings,
    rng: StdRng,
    viewport: Option<Viewport>,
    world: Option<World>,
    camera: Camera,
    restarts: u32,
}

impl HuntingGame {
    pub fn new(settings: GameSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Deterministic game, for tests and replays.
    pub fn with_seed(settings: GameSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: GameSettings, rng: StdRng) -> Self {
        Self {
            settings,
            rng,
            viewport: None,
            world: None,
            camera: Camera::new(1.0, 1.0),
            restarts: 0,
        }
    }

    /// True once `create` has run.
    pub fn is_created(&self) -> bool {
        self.world.is_some()
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// How many times the game started over since `create`.
    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    fn initialize(&mut self, viewport: Viewport) {
        let (width, height) = (viewport.width as f32, viewport.height as f32);
        let info = WorldInfo::from_screen(width, height, self.settings.world_scale);
        let seed = StdRng::from_rng(&mut self.rng).unwrap_or_else(|_| StdRng::seed_from_u64(0));

        self.world = Some(World::new(info, &self.settings, seed));
        self.camera = Camera::new(
            width * self.settings.camera_scale,
            height * self.settings.camera_scale,
        );
        self.viewport = Some(viewport);
    }

    fn restart(&mut self, reason: &str) {
        let Some(viewport) = self.viewport else {
            return;
        };
        self.restarts += 1;
        tracing::info!(restarts = self.restarts, "Restarting: {}", reason);
        self.initialize(viewport);
    }

    /// Shoot, steer and aim the hunter, then follow it with the camera.
    /// Returns false when the hunter is out of ammunition.
    fn update_hunter(&mut self, dt: f32, controls: &Controls) -> bool {
        let Some(viewport) = self.viewport else {
            return true;
        };
        let Some(world) = self.world.as_mut() else {
            return true;
        };

        if controls.shooting && world.hunter_shoot() == ShotOutcome::OutOfAmmo {
            return false;
        }

        let scale = self.settings.camera_scale;
        let force = Vec2::new(
            controls.horizontal.clamp(-1.0, 1.0),
            controls.vertical.clamp(-1.0, 1.0),
        ) * self.settings.hunter_behaviour.moving_force;
        let pointer = world.translate_mouse_position(
            controls.pointer.x * scale,
            controls.pointer.y * scale,
            viewport.width as f32 * scale,
            viewport.height as f32 * scale,
        );

        if let Some(position) = world.move_hunter(force, dt, pointer) {
            self.camera.position = position;
        }
        true
    }
}

impl Game for HuntingGame {
    fn create(&mut self, viewport: Viewport) {
        tracing::info!(width = viewport.width, height = viewport.height, "Creating game");
        self.initialize(viewport);
    }

    fn resize(&mut self, viewport: Viewport) {
        // The world keeps its size; only the visible area follows the window.
        self.camera.viewport_width = viewport.width as f32 * self.settings.camera_scale;
        self.camera.viewport_height = viewport.height as f32 * self.settings.camera_scale;
        if self.viewport.is_some() {
            self.viewport = Some(viewport);
        }
    }

    fn render(&mut self, dt: f32, controls: &Controls) -> Scene {
        if !self.is_created() {
            return Scene::empty(self.camera);
        }

        if !self.update_hunter(dt, controls) {
            self.restart("out of ammunition");
        }

        let outcome = match self.world.as_mut() {
            Some(world) => world.step(dt),
            None => StepOutcome::Continue,
        };
        if outcome == StepOutcome::Restart {
            self.restart("hunter is dead");
        }

        match &self.world {
            Some(world) => scene::compose(world, self.camera),
            None => Scene::empty(self.camera),
        }
    }

    fn dispose(&mut self) {
        tracing::info!(restarts = self.restarts, "Disposing game");
        self.world = None;
    }
}
