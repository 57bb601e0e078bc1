// Window + input glue for the canvas.
// Visual effects provided here:
// 1) A resizable window that shows the canvas over a dark backdrop.
// 2) Mouse position/button state for drawing.
// 3) Keyboard shortcuts mapped to toolbar actions.

use crate::app::Action;
use crate::error::Error;
use crate::types::Tool;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a resizable window of the given logical size.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let mut window = Window::new(
            title,
            width,
            height,
            WindowOptions { resize: true, ..WindowOptions::default() },
        )
        .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window })
    }

    /// Push the flattened 0x00RRGGBB pixels for this frame to the screen.
    /// A buffer larger than the window (device pixel ratio > 1) is scaled to fit.
    pub fn present(&mut self, pixels: &[u32], width: usize, height: usize) -> Result<(), Error> {
        self.window
            .update_with_buffer(pixels, width, height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    /// Pump events without a new frame (used while the canvas has no area).
    pub fn idle(&mut self) {
        self.window.update();
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (we'll exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Current client-area size in logical pixels.
    pub fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    pub fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    /// Mouse position in window coordinates; None while outside the window.
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Discard)
    }

    /// Visual: while true, moving the mouse paints (or erases) on the canvas.
    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    /// Toolbar actions requested by keys pressed since the last frame.
    pub fn shortcuts(&self) -> Vec<Action> {
        let ctrl = self.window.is_key_down(Key::LeftCtrl) || self.window.is_key_down(Key::RightCtrl);
        let shift =
            self.window.is_key_down(Key::LeftShift) || self.window.is_key_down(Key::RightShift);
        self.window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .filter_map(|key| shortcut(key, ctrl, shift))
            .collect()
    }
}

/// Key binding table.
pub fn shortcut(key: Key, ctrl: bool, shift: bool) -> Option<Action> {
    let action = match (key, ctrl) {
        (Key::Z, true) if shift => Action::Redo,
        (Key::Z, true) => Action::Undo,
        (Key::Y, true) => Action::Redo,
        (Key::S, true) => Action::Export,
        (Key::O, true) => Action::Import,
        (Key::B, false) => Action::SelectTool(Tool::Brush),
        (Key::E, false) => Action::SelectTool(Tool::Eraser),
        (Key::Delete, _) => Action::Clear,
        (Key::LeftBracket, false) => Action::ShrinkBrush,
        (Key::RightBracket, false) => Action::GrowBrush,
        (Key::Minus, false) => Action::LessOpaque,
        (Key::Equal, false) => Action::MoreOpaque,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_redo_bindings() {
        assert_eq!(shortcut(Key::Z, true, false), Some(Action::Undo));
        assert_eq!(shortcut(Key::Z, true, true), Some(Action::Redo));
        assert_eq!(shortcut(Key::Y, true, false), Some(Action::Redo));
        assert_eq!(shortcut(Key::Z, false, false), None);
    }

    #[test]
    fn tool_bindings_ignore_ctrl_combos() {
        assert_eq!(shortcut(Key::E, false, false), Some(Action::SelectTool(Tool::Eraser)));
        assert_eq!(shortcut(Key::E, true, false), None);
        assert_eq!(shortcut(Key::Delete, true, false), Some(Action::Clear));
    }
}
