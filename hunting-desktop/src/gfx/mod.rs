//! GPU Rendering Subsystem.
//!
//! Manages the wgpu device, surface, and the one pipeline the game needs.
//! Sub-modules:
//!   renderer: wgpu device/surface lifecycle, frame orchestration
//!   shapes:   coloured triangle pipeline behind every scene shape

mod renderer;
mod shapes;

pub use renderer::GpuState;
