//! Camera input backend for `minifb` windows

use minifb::{MouseMode, Window};

use crate::camera::{Input, Key, MouseButton};

impl Input for Window {
    fn cursor_position(&self) -> (i32, i32) {
        match self.get_mouse_pos(MouseMode::Clamp) {
            Some((x, y)) => (x as i32, y as i32),
            None => (-1, -1),
        }
    }

    fn key_pressed(&self, key: Key) -> bool {
        self.is_key_down(match key {
            Key::A => minifb::Key::A,
            Key::S => minifb::Key::S,
            Key::D => minifb::Key::D,
            Key::W => minifb::Key::W,
        })
    }

    fn button_pressed(&self, button: MouseButton) -> bool {
        self.get_mouse_down(match button {
            MouseButton::Left => minifb::MouseButton::Left,
            MouseButton::Right => minifb::MouseButton::Right,
        })
    }
}
