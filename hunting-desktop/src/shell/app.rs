//! Window, GPU and game state plus the winit event loop.
//!
//! The window and the GPU surface are created on `resumed`. The game's
//! `create` runs right after, with the window's actual size; from then on
//! every redraw renders one frame and immediately asks for the next.

use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use hunting_core::{Game, Viewport};

use crate::gfx::GpuState;
use crate::input::InputTracker;
use crate::launcher::LaunchConfiguration;

pub const WINDOW_TITLE: &str = "Hunting";

/// Longest frame the game is told about.
pub const MAX_FRAME_DT: f32 = 0.1;

// ════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════

pub struct GameApp<G: Game> {
    pub game: G,
    pub config: LaunchConfiguration,

    // ── Window + GPU ──
    pub window: Option<Arc<Window>>,
    pub gpu: Option<GpuState>,

    // ── Frame loop ──
    pub input: InputTracker,
    pub last_frame: Option<Instant>,
    pub created: bool,

    /// First fatal error; returned from `run` once the loop exits.
    pub failure: Option<anyhow::Error>,
}

impl<G: Game> GameApp<G> {
    pub fn new(game: G, config: LaunchConfiguration) -> Self {
        Self {
            game,
            config,
            window: None,
            gpu: None,
            input: InputTracker::new(),
            last_frame: None,
            created: false,
            failure: None,
        }
    }

    /// Request a window redraw.
    pub fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Seconds since the previous frame, clamped to `MAX_FRAME_DT`.
    pub fn frame_dt(&mut self) -> f32 {
        let now = Instant::now();
        let dt = self
            .last_frame
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);
        dt.min(MAX_FRAME_DT)
    }

    /// Render one frame. A GPU failure stops the loop.
    pub fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if !self.created {
            return;
        }

        let dt = self.frame_dt();
        let controls = self.input.controls();
        let scene = self.game.render(dt, &controls);

        let result = match &mut self.gpu {
            Some(gpu) => gpu.render_frame(&scene),
            None => return,
        };
        if let Err(e) = result {
            tracing::error!("Render failed: {:#}", e);
            self.fail(event_loop, e);
        }
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(size);
        }
        if self.created && size.width > 0 && size.height > 0 {
            self.game.resize(Viewport::new(size.width, size.height));
        }
    }

    pub fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        if self.failure.is_none() {
            self.failure = Some(error);
        }
        event_loop.exit();
    }
}

// ════════════════════════════════════════════════════════════════════
// ApplicationHandler (winit 0.30)
// ════════════════════════════════════════════════════════════════════

impl<G: Game> ApplicationHandler for GameApp<G> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already created
        }

        let attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("Window creation failed: {}", e);
                self.fail(event_loop, e.into());
                return;
            }
        };

        match GpuState::new(window.clone()) {
            Ok(gpu) => {
                let size = gpu.size;
                self.gpu = Some(gpu);
                self.window = Some(window);
                tracing::info!("Window + GPU initialized");

                self.game.create(Viewport::new(size.width, size.height));
                self.created = true;
                self.last_frame = Some(Instant::now());
                self.request_redraw();
            }
            Err(e) => {
                tracing::error!("GPU init failed: {:#}", e);
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        super::events::handle_window_event(self, event_loop, event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // Continuous rendering
        self.request_redraw();
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if self.created {
            self.game.dispose();
            self.created = false;
        }
    }
}

// ════════════════════════════════════════════════════════════════════
// Entry Point
// ════════════════════════════════════════════════════════════════════

/// Open the window and run `game` until the window closes.
pub fn run<G: Game + 'static>(game: G, config: LaunchConfiguration) -> anyhow::Result<()> {
    // Tracing is initialized once in the binary entry point (src/main.rs).

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GameApp::new(game, config);
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
