//! Hunting desktop library target.
//!
//! The binary entry point is in `main.rs`; the modules live here so
//! `tests/` can reach the launcher, the input mapping and the tessellator
//! without opening a window.

pub mod config;
pub mod input;
pub mod launcher;
pub mod tessellate;

mod gfx;
mod shell;

pub use launcher::{LaunchConfiguration, Runtime, WinitRuntime, launch};
