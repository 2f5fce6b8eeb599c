//! Application shell: winit lifecycle and event dispatch.
//!
//! The shell owns the winit event loop and the game handed to it by the
//! launcher. It translates platform events into input state, drives the
//! game's frame loop, and passes each scene to the GPU.

mod app;
mod events;

pub use app::run;
