//! Input handling for Stardrift scenes.
//!
//! Scenes never read window events directly. The event handler writes into an
//! [`InputState`] snapshot and each frame receives that snapshot by reference,
//! so tests can inject any pointer or scroll value without a window:
//!
//! ```ignore
//! let mut input = InputState::default();
//! input.set_pointer(Vec2::new(120.0, 80.0));
//! input.set_scroll_progress(0.5);
//! field.step_with(&input.pointer);
//! orbit.step(input.scroll_progress, 1.0 / 60.0);
//! ```

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Latest pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pointer {
    /// Position in surface pixels.
    pub position: Vec2,
    /// False once the pointer has left the tracked region.
    pub active: bool,
}

impl Pointer {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            active: true,
        }
    }
}

/// Ambient per-frame input. Last write wins.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputState {
    pub pointer: Pointer,
    /// Normalized scroll progress in `[0, 1]`.
    pub scroll_progress: f32,
}

impl InputState {
    pub fn set_pointer(&mut self, position: Vec2) {
        self.pointer = Pointer {
            position,
            active: true,
        };
    }

    /// The pointer left the tracked region. The last position is kept.
    pub fn leave(&mut self) {
        self.pointer.active = false;
    }

    /// Store scroll progress, clamped to `[0, 1]`. NaN is treated as 0.
    pub fn set_scroll_progress(&mut self, progress: f32) {
        self.scroll_progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
    }
}

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Space,
    Escape,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Other,
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::Escape => KeyCode::Escape,
            WinitKeyCode::ArrowUp => KeyCode::Up,
            WinitKeyCode::ArrowDown => KeyCode::Down,
            WinitKeyCode::PageUp => KeyCode::PageUp,
            WinitKeyCode::PageDown => KeyCode::PageDown,
            WinitKeyCode::Home => KeyCode::Home,
            WinitKeyCode::End => KeyCode::End,
            _ => KeyCode::Other,
        }
    }
}

/// Translates raw window events into per-frame input.
///
/// Tracks the pointer, accumulates wheel scrolling in pixels, and records
/// keys pressed since the last [`InputTracker::begin_frame`].
#[derive(Debug, Default)]
pub struct InputTracker {
    state: InputState,
    keys_pressed: HashSet<KeyCode>,
    keys_held: HashSet<KeyCode>,
    scroll_pixels: f32,
}

/// Pixels scrolled per wheel line.
const LINE_HEIGHT: f32 = 48.0;

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut InputState {
        &mut self.state
    }

    /// Check if a key was pressed this frame (just went down).
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Scroll requested this frame in pixels; positive scrolls down the page.
    pub fn scroll_pixels(&self) -> f32 {
        self.scroll_pixels
    }

    /// Called at the start of each frame to clear per-frame state.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.scroll_pixels = 0.0;
    }

    /// Record a key going down. Auto-repeat presses are ignored.
    pub fn press(&mut self, key: KeyCode) {
        if !self.keys_held.contains(&key) {
            self.keys_pressed.insert(key);
        }
        self.keys_held.insert(key);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    /// Queue `pixels` of page scroll for this frame.
    pub fn scroll(&mut self, pixels: f32) {
        if pixels.is_finite() {
            self.scroll_pixels += pixels;
        }
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.state
                    .set_pointer(Vec2::new(position.x as f32, position.y as f32));
            }

            WindowEvent::CursorLeft { .. } => {
                self.state.leave();
            }

            WindowEvent::MouseWheel { delta, .. } => {
                // Wheel up (positive y) scrolls toward the top of the page.
                self.scroll(-match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y * LINE_HEIGHT,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    let key = KeyCode::from(keycode);
                    match event.state {
                        ElementState::Pressed => self.press(key),
                        ElementState::Released => self.release(key),
                    }
                }
            }

            _ => {}
        }
    }
}
