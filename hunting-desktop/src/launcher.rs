//! Desktop entry point.
//!
//! Builds the window configuration, constructs the game and hands both to
//! the runtime, which keeps control for the rest of the process.

use hunting_core::{Game, GameSettings, HuntingGame};

pub const DESKTOP_WIDTH: u32 = 1450;
pub const DESKTOP_HEIGHT: u32 = 900;

/// Initial window size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchConfiguration {
    pub width: u32,
    pub height: u32,
}

impl LaunchConfiguration {
    pub fn desktop() -> Self {
        Self {
            width: DESKTOP_WIDTH,
            height: DESKTOP_HEIGHT,
        }
    }
}

impl Default for LaunchConfiguration {
    fn default() -> Self {
        Self::desktop()
    }
}

/// Something that can own a game and drive its frame loop.
pub trait Runtime {
    fn run<G: Game + 'static>(
        &mut self,
        game: G,
        config: LaunchConfiguration,
    ) -> anyhow::Result<()>;
}

/// The production runtime: a winit window rendered with wgpu.
#[derive(Debug, Default)]
pub struct WinitRuntime;

impl Runtime for WinitRuntime {
    fn run<G: Game + 'static>(
        &mut self,
        game: G,
        config: LaunchConfiguration,
    ) -> anyhow::Result<()> {
        crate::shell::run(game, config)
    }
}

/// Hand a fresh game to `runtime`. Process arguments are ignored.
pub fn launch(runtime: &mut impl Runtime, settings: GameSettings) -> anyhow::Result<()> {
    let config = LaunchConfiguration::desktop();
    tracing::info!(width = config.width, height = config.height, "Launching");
    runtime.run(HuntingGame::new(settings), config)
}
