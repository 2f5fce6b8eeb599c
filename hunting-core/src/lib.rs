pub mod box_search;
pub mod entity;
pub mod game;
pub mod scene;
pub mod settings;
pub mod steering;
pub mod world;

// Re-export the main types so the desktop shell can just use `hunting_core::HuntingGame`
pub use game::{Controls, Game, HuntingGame, Viewport};
pub use glam::Vec2;
pub use settings::{GameSettings, SettingsError};
pub use world::{World, WorldInfo};
