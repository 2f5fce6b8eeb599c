//! Player input tracking.
//!
//! winit reports input as a stream of press/release events; the game wants
//! a per-frame snapshot. `InputTracker` folds the events into the held set
//! and produces `Controls` on demand.
//!
//! Bindings:
//!   A / D        → left / right (A wins when both are held)
//!   W / S        → up / down (W wins when both are held)
//!   Left button  → shoot while held
//!   Cursor       → aim

use std::collections::HashSet;

use hunting_core::{Controls, Vec2};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

#[derive(Debug, Default)]
pub struct InputTracker {
    held: HashSet<KeyCode>,
    shooting: bool,
    pointer: Vec2,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&mut self, key: PhysicalKey, state: ElementState) {
        let PhysicalKey::Code(code) = key else {
            return;
        };
        match state {
            ElementState::Pressed => {
                self.held.insert(code);
            }
            ElementState::Released => {
                self.held.remove(&code);
            }
        }
    }

    pub fn mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.shooting = state.is_pressed();
        }
    }

    /// Cursor position in physical pixels, origin top-left.
    pub fn cursor_moved(&mut self, x: f64, y: f64) {
        self.pointer = Vec2::new(x as f32, y as f32);
    }

    /// Drop everything held, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
        self.shooting = false;
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.held.contains(&code)
    }

    pub fn controls(&self) -> Controls {
        Controls {
            horizontal: self.axis((KeyCode::KeyA, -1.0), (KeyCode::KeyD, 1.0)),
            vertical: self.axis((KeyCode::KeyW, 1.0), (KeyCode::KeyS, -1.0)),
            shooting: self.shooting,
            pointer: self.pointer,
        }
    }

    /// `first` wins when both keys are held.
    fn axis(&self, first: (KeyCode, f32), second: (KeyCode, f32)) -> f32 {
        if self.is_held(first.0) {
            first.1
        } else if self.is_held(second.0) {
            second.1
        } else {
            0.0
        }
    }
}
