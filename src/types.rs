// Core types shared by the surface, the history and the window.

use crate::color::Rgba;
use serde::{Deserialize, Serialize};

/// A pixel grid at device resolution.
/// Each entry is 0xAARRGGBB with straight (not premultiplied) alpha;
/// 0x00000000 is a fully transparent pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    pub width: usize,     // device pixels across
    pub height: usize,    // device pixels down
    pub pixels: Vec<u32>, // length = width * height, row-major
}

impl Raster {
    /// A fully transparent raster.
    pub fn blank(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Wipe every pixel back to transparent.
    pub fn clear(&mut self) {
        for p in &mut self.pixels { *p = 0; }
    }

    /// True when no pixel carries any coverage.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| p >> 24 == 0)
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// A position in surface-local logical (CSS-style) pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Brush,
    Eraser,
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tool::Brush => write!(f, "Brush"),
            Tool::Eraser => write!(f, "Eraser"),
        }
    }
}

/// Everything the host hands the surface on each parameter change.
/// `width` is in logical pixels; `opacity` is the 0..1 blend factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub tool: Tool,
    pub color: Rgba,
    pub width: f32,
    pub opacity: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            tool: Tool::Brush,
            color: Rgba::opaque(0xFF, 0x32, 0xF0),
            width: 10.0,
            opacity: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_raster_is_transparent() {
        let r = Raster::blank(4, 3);
        assert_eq!(r.len(), 12);
        assert!(r.is_blank());
        assert_eq!(r.pixel(3, 2), Some(0));
        assert_eq!(r.pixel(4, 0), None);
    }

    #[test]
    fn clear_drops_all_coverage() {
        let mut r = Raster::blank(2, 2);
        r.pixels[1] = 0xFF_12_34_56;
        assert!(!r.is_blank());
        r.clear();
        assert!(r.is_blank());
    }

    #[test]
    fn tool_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Tool::Eraser).unwrap(), "\"eraser\"");
        let t: Tool = serde_json::from_str("\"brush\"").unwrap();
        assert_eq!(t, Tool::Brush);
    }
}
