use crate::color::Rgba;
use crate::error::Error;
use crate::types::{StrokeStyle, Tool};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MIN_BRUSH_SIZE: f32 = 1.0;
pub const MAX_BRUSH_SIZE: f32 = 50.0;
pub const MIN_OPACITY: f32 = 0.1;
pub const MAX_OPACITY: f32 = 1.0;

pub fn clamp_brush_size(size: f32) -> f32 {
    if size.is_finite() { size.round().clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE) } else { MIN_BRUSH_SIZE }
}

/// Opacity snaps to tenths, like the toolbar slider.
pub fn clamp_opacity(opacity: f32) -> f32 {
    if opacity.is_finite() {
        ((opacity * 10.0).round() / 10.0).clamp(MIN_OPACITY, MAX_OPACITY)
    } else {
        MAX_OPACITY
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Initial window size in logical pixels.
    pub window_width: u32,
    pub window_height: u32,
    /// Physical pixels per logical pixel. Anything not positive means 1.0.
    pub device_pixel_ratio: f32,
    pub tool: Tool,
    /// Brush color as "#RRGGBB".
    pub color: String,
    pub brush_size: f32,
    pub opacity: f32,
    /// Color shown behind transparent canvas pixels.
    pub backdrop: String,
    /// Where Ctrl+S writes the PNG.
    pub export_path: PathBuf,
    /// What Ctrl+O imports, if anything.
    pub import_path: Option<PathBuf>,
    /// When enabled the application initialises the logger at debug level.
    pub debug_logging: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: 960,
            window_height: 640,
            device_pixel_ratio: 1.0,
            tool: Tool::Brush,
            color: "#FF32F0".into(),
            brush_size: 10.0,
            opacity: 1.0,
            backdrop: "#141414".into(),
            export_path: PathBuf::from("neon-canvas-creation.png"),
            import_path: None,
            debug_logging: false,
        }
    }
}

impl Settings {
    /// Load settings; a missing or empty file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&content).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        }
    }

    /// The starting stroke parameters, clamped to the toolbar ranges.
    pub fn stroke_style(&self) -> StrokeStyle {
        let color = self.color.parse::<Rgba>().unwrap_or_else(|e| {
            tracing::warn!("{e}; using default brush color");
            StrokeStyle::default().color
        });
        StrokeStyle {
            tool: self.tool,
            color,
            width: clamp_brush_size(self.brush_size),
            opacity: clamp_opacity(self.opacity),
        }
    }

    pub fn backdrop(&self) -> Rgba {
        self.backdrop.parse::<Rgba>().unwrap_or_else(|e| {
            tracing::warn!("{e}; using default backdrop");
            Rgba::opaque(0x14, 0x14, 0x14)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let s: Settings = serde_json::from_str(r#"{ "tool": "eraser", "brush_size": 80 }"#).unwrap();
        assert_eq!(s.tool, Tool::Eraser);
        assert_eq!(s.window_width, 960);
        assert_eq!(s.stroke_style().width, MAX_BRUSH_SIZE);
    }

    #[test]
    fn clamps_follow_toolbar_ranges() {
        assert_eq!(clamp_brush_size(0.0), 1.0);
        assert_eq!(clamp_brush_size(12.4), 12.0);
        assert_eq!(clamp_opacity(0.0), 0.1);
        assert_eq!(clamp_opacity(0.44), 0.4);
        assert_eq!(clamp_opacity(3.0), 1.0);
        assert_eq!(clamp_opacity(f32::NAN), 1.0);
    }

    #[test]
    fn bad_color_falls_back() {
        let s = Settings { color: "neon".into(), ..Settings::default() };
        assert_eq!(s.stroke_style().color, Rgba::opaque(0xFF, 0x32, 0xF0));
    }

    #[test]
    fn non_positive_ratio_means_one() {
        let s = Settings { device_pixel_ratio: -2.0, ..Settings::default() };
        assert_eq!(s.device_pixel_ratio(), 1.0);
    }
}
