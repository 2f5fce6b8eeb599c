//! Winit event handling.
//!
//! Translates WindowEvent into game actions. Keyboard and mouse events
//! only update the input tracker; the game reads it once per frame.

use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;

use hunting_core::Game;

use super::app::GameApp;

pub fn handle_window_event<G: Game>(
    app: &mut GameApp<G>,
    event_loop: &ActiveEventLoop,
    event: WindowEvent,
) {
    match event {
        // ── Window lifecycle ──────────────────────────────────────
        WindowEvent::CloseRequested => {
            tracing::info!("Window close requested");
            event_loop.exit();
        }

        WindowEvent::Destroyed => {
            tracing::info!("Window destroyed");
        }

        // ── Resize ───────────────────────────────────────────────
        WindowEvent::Resized(new_size) => {
            app.resize(new_size);
            app.request_redraw();
        }

        WindowEvent::Focused(false) => {
            app.input.release_all();
        }

        // ── Input ────────────────────────────────────────────────
        WindowEvent::KeyboardInput { event, .. } => {
            if !event.repeat {
                app.input.key(event.physical_key, event.state);
            }
        }

        WindowEvent::CursorMoved { position, .. } => {
            app.input.cursor_moved(position.x, position.y);
        }

        WindowEvent::MouseInput { state, button, .. } => {
            app.input.mouse_button(button, state);
        }

        // ── Frame ────────────────────────────────────────────────
        WindowEvent::RedrawRequested => {
            app.redraw(event_loop);
        }

        _ => {}
    }
}
