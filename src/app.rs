// The host side of the canvas: owns the surface, the tool parameters and the
// file paths, and turns raw mouse state and toolbar actions into surface calls.
// Kept free of any window type so it can be driven from tests.

use crate::codec;
use crate::config::{clamp_brush_size, clamp_opacity, Settings};
use crate::error::Error;
use crate::handle::CanvasHandle;
use crate::input::{ClientRect, InputEvent, PointerEvent};
use crate::surface::DrawingSurface;
use crate::types::{StrokeStyle, Tool};
use std::path::PathBuf;
use tracing::{info, warn};

/// Toolbar buttons and shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SelectTool(Tool),
    Undo,
    Redo,
    Clear,
    Export,
    Import,
    GrowBrush,
    ShrinkBrush,
    MoreOpaque,
    LessOpaque,
}

/// Turns polled "button held + cursor position" into discrete events.
#[derive(Default)]
pub struct PointerTracker {
    was_down: bool,
    last: Option<(f32, f32)>,
}

impl PointerTracker {
    /// `pos` is None while the cursor is outside the surface.
    pub fn poll(&mut self, down: bool, pos: Option<(f32, f32)>) -> Vec<InputEvent> {
        let mouse = |(x, y): (f32, f32)| PointerEvent::Mouse { client_x: x, client_y: y };
        let mut events = Vec::new();

        match (self.was_down, down) {
            (false, true) => {
                if let Some(p) = pos {
                    events.push(InputEvent::MouseDown(mouse(p)));
                }
            }
            (true, true) => match pos {
                Some(p) if self.last != Some(p) => events.push(InputEvent::MouseMove(mouse(p))),
                None if self.last.is_some() => events.push(InputEvent::MouseLeave),
                _ => {}
            },
            (true, false) => events.push(InputEvent::MouseUp),
            (false, false) => {}
        }

        self.was_down = down;
        self.last = pos;
        events
    }
}

pub struct CanvasApp {
    surface: DrawingSurface,
    style: StrokeStyle,
    device_pixel_ratio: f32,
    export_path: PathBuf,
    import_path: Option<PathBuf>,
    pointer: PointerTracker,
}

impl CanvasApp {
    pub fn new(settings: &Settings) -> Self {
        let style = settings.stroke_style();
        let mut surface = DrawingSurface::new();
        surface.set_style(style);
        let mut app = Self {
            surface,
            style,
            device_pixel_ratio: settings.device_pixel_ratio(),
            export_path: settings.export_path.clone(),
            import_path: settings.import_path.clone(),
            pointer: PointerTracker::default(),
        };
        app.resize(settings.window_width, settings.window_height);
        app
    }

    /// Follow the container size. Only an actual change blanks the surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        let zero_area = width == 0 || height == 0;
        if self.surface.logical_size() == (width, height) && (self.surface.is_initialized() || zero_area) {
            return;
        }
        self.surface.resize(width, height, self.device_pixel_ratio);
    }

    /// Feed the current mouse state; the window is the client rect origin.
    pub fn pointer(&mut self, down: bool, pos: Option<(f32, f32)>) {
        let (w, h) = self.surface.logical_size();
        let rect = ClientRect { left: 0.0, top: 0.0, width: w as f32, height: h as f32 };
        for event in self.pointer.poll(down, pos) {
            self.surface.handle_input(&event, &rect);
        }
    }

    pub fn apply(&mut self, action: Action) -> Result<(), Error> {
        match action {
            Action::SelectTool(tool) => self.style.tool = tool,
            Action::GrowBrush => self.style.width = clamp_brush_size(self.style.width + 1.0),
            Action::ShrinkBrush => self.style.width = clamp_brush_size(self.style.width - 1.0),
            Action::MoreOpaque => self.style.opacity = clamp_opacity(self.style.opacity + 0.1),
            Action::LessOpaque => self.style.opacity = clamp_opacity(self.style.opacity - 0.1),
            Action::Undo => self.surface.undo(),
            Action::Redo => self.surface.redo(),
            Action::Clear => self.surface.clear_canvas(),
            Action::Export => self.export()?,
            Action::Import => self.import()?,
        }
        self.surface.set_style(self.style);
        Ok(())
    }

    fn export(&self) -> Result<(), Error> {
        let Some(png) = self.surface.export_as_image() else {
            warn!("nothing to export yet");
            return Ok(());
        };
        codec::save_file(&png, &self.export_path)?;
        info!(path = %self.export_path.display(), bytes = png.len(), "exported PNG");
        Ok(())
    }

    fn import(&mut self) -> Result<(), Error> {
        let Some(path) = self.import_path.as_ref() else {
            warn!("no import_path configured");
            return Ok(());
        };
        // Decode fully before touching the surface.
        let image = codec::load_image_file(path)?;
        self.surface.import_image(&image);
        info!(path = %path.display(), "imported image");
        Ok(())
    }

    /// One-line summary for the title bar.
    pub fn status(&self) -> String {
        let pos = self.surface.history_cursor().map(|c| c + 1).unwrap_or(0);
        format!(
            "Neon Canvas | {} {}px {:.0}% {} | {}/{}{}",
            self.style.tool,
            self.style.width,
            self.style.opacity * 100.0,
            self.style.color,
            pos,
            self.surface.history_len(),
            if self.surface.is_empty() { " | empty" } else { "" },
        )
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings { window_width: 40, window_height: 30, ..Settings::default() }
    }

    #[test]
    fn tracker_emits_down_move_up() {
        let mut t = PointerTracker::default();
        assert!(t.poll(false, Some((1.0, 1.0))).is_empty());
        assert!(matches!(t.poll(true, Some((1.0, 1.0))).as_slice(), [InputEvent::MouseDown(_)]));
        assert!(t.poll(true, Some((1.0, 1.0))).is_empty());
        assert!(matches!(t.poll(true, Some((2.0, 1.0))).as_slice(), [InputEvent::MouseMove(_)]));
        assert!(matches!(t.poll(true, None).as_slice(), [InputEvent::MouseLeave]));
        assert!(matches!(t.poll(false, None).as_slice(), [InputEvent::MouseUp]));
    }

    #[test]
    fn dragging_draws_and_records_history() {
        let mut app = CanvasApp::new(&settings());
        app.pointer(true, Some((5.0, 15.0)));
        app.pointer(true, Some((35.0, 15.0)));
        app.pointer(false, Some((35.0, 15.0)));
        assert!(!app.surface().is_empty());
        assert_eq!(app.surface().history_len(), 2);

        app.apply(Action::Undo).unwrap();
        assert!(app.surface().is_empty());
        app.apply(Action::Redo).unwrap();
        assert!(!app.surface().is_empty());
    }

    #[test]
    fn tool_actions_stay_in_range() {
        let mut app = CanvasApp::new(&Settings { brush_size: 50.0, opacity: 1.0, ..settings() });
        app.apply(Action::GrowBrush).unwrap();
        app.apply(Action::MoreOpaque).unwrap();
        assert_eq!(app.style().width, 50.0);
        assert_eq!(app.style().opacity, 1.0);
        app.apply(Action::ShrinkBrush).unwrap();
        app.apply(Action::LessOpaque).unwrap();
        assert_eq!(app.style().width, 49.0);
        assert_eq!(app.style().opacity, 0.9);
        app.apply(Action::SelectTool(Tool::Eraser)).unwrap();
        assert_eq!(app.surface().style().tool, Tool::Eraser);
    }

    #[test]
    fn same_size_resize_keeps_drawing() {
        let mut app = CanvasApp::new(&settings());
        app.pointer(true, Some((5.0, 15.0)));
        app.pointer(true, Some((35.0, 15.0)));
        app.pointer(false, None);
        app.resize(40, 30);
        assert_eq!(app.surface().history_len(), 2);

        app.resize(41, 30);
        assert_eq!(app.surface().history_len(), 3);
        assert!(app.surface().is_empty());
        app.apply(Action::Undo).unwrap();
        assert!(!app.surface().is_empty());
        assert_ne!(app.surface().buffer().and_then(|b| b.pixel(20, 15)), Some(0));
    }

    #[test]
    fn import_without_path_is_a_warning_not_an_error() {
        let mut app = CanvasApp::new(&settings());
        app.apply(Action::Import).unwrap();
        assert!(app.surface().is_empty());
    }

    #[test]
    fn status_mentions_tool_and_position() {
        let app = CanvasApp::new(&settings());
        let s = app.status();
        assert!(s.contains("Brush 10px 100%"), "{s}");
        assert!(s.contains("1/1 | empty"), "{s}");
    }
}
