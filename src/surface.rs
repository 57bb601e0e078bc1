// The drawing surface: a device-resolution pixel buffer that strokes are
// composited into, with a snapshot history behind it.
// Visual expectations:
// - Drag to draw; the line follows the pointer with round ends.
// - Undo/redo flip between whole saved canvases.
// - Resizing the surface shows a blank canvas; undo steps back to what was
//   there before, painted into the top-left corner.

use crate::codec;
use crate::handle::CanvasHandle;
use crate::history::{History, Snapshot};
use crate::input::{surface_point, ClientRect, InputEvent};
use crate::raster::{composite_region, stamp_segment, CoverageMask};
use crate::types::{Point, Raster, StrokeStyle};
use image::RgbaImage;
use tracing::{debug, warn};

/// A stroke between pointer-down and pointer-up.
struct ActiveStroke {
    last: Point,        // previous pointer position (logical px)
    mask: CoverageMask, // coverage laid down so far by this stroke
    base: Raster,       // the buffer as it was at pointer-down
}

pub struct DrawingSurface {
    logical_size: (u32, u32), // container size in logical px
    device_pixel_ratio: f32,
    buffer: Option<Raster>,   // None until the first non-empty resize
    history: History,
    style: StrokeStyle,
    stroke: Option<ActiveStroke>,
}

impl Default for DrawingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingSurface {
    /// An unsized surface. Every operation is a no-op until `resize`.
    pub fn new() -> Self {
        Self {
            logical_size: (0, 0),
            device_pixel_ratio: 1.0,
            buffer: None,
            history: History::new(),
            style: StrokeStyle::default(),
            stroke: None,
        }
    }

    /// Size the buffer to the container times the device pixel ratio.
    /// The new blank buffer is saved as a history entry on top of whatever
    /// came before, so a resize can be undone. A zero-area container leaves
    /// the surface uninitialized but keeps the history.
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f32) {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        self.logical_size = (width, height);
        self.device_pixel_ratio = dpr;
        self.stroke = None;

        let dw = (width as f32 * dpr) as usize;
        let dh = (height as f32 * dpr) as usize;
        if dw == 0 || dh == 0 {
            debug!(width, height, dpr, "surface has no area; staying uninitialized");
            self.buffer = None;
            return;
        }

        let blank = Raster::blank(dw, dh);
        self.buffer = Some(blank.clone());
        self.history.save(Snapshot { raster: blank, empty: true });
        debug!(
            width,
            height,
            dpr,
            device_width = dw,
            device_height = dh,
            entries = self.history.len(),
            "surface resized"
        );
    }

    /// Tool, color, width and opacity used by the next stroke segment.
    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Start a stroke at `point` (logical px, surface-local).
    pub fn begin_stroke(&mut self, point: Point) {
        // A second pointer-down without an up commits what is there first.
        if self.stroke.is_some() {
            self.end_stroke();
        }
        let Some(buffer) = self.buffer.as_ref() else { return };
        let mask = CoverageMask::new(buffer.width, buffer.height);
        self.stroke = Some(ActiveStroke { last: point, mask, base: buffer.clone() });
    }

    /// Draw a segment from the previous point to `point` with the current style.
    pub fn extend_stroke(&mut self, point: Point) {
        let dpr = self.device_pixel_ratio;
        let Some(stroke) = self.stroke.as_mut() else { return };
        let Some(buffer) = self.buffer.as_mut() else { return };

        let from = (stroke.last.x * dpr, stroke.last.y * dpr);
        let to = (point.x * dpr, point.y * dpr);
        stroke.last = point;

        let radius = self.style.width * dpr / 2.0;
        if let Some(region) = stamp_segment(&mut stroke.mask, from, to, radius) {
            // Re-compositing from the pre-stroke buffer never double-blends.
            composite_region(buffer, &stroke.base, &stroke.mask, region, &self.style);
        }
    }

    /// Finish the stroke and record the result in history.
    pub fn end_stroke(&mut self) {
        if self.stroke.take().is_none() {
            return;
        }
        let Some(buffer) = self.buffer.as_ref() else { return };
        self.history.save(Snapshot { raster: buffer.clone(), empty: false });
        debug!(entries = self.history.len(), "stroke committed");
    }

    /// Route a platform input event to begin/extend/end stroke.
    /// Events without a usable coordinate are ignored.
    pub fn handle_input(&mut self, event: &InputEvent, rect: &ClientRect) {
        match event {
            InputEvent::MouseDown(e) | InputEvent::TouchStart(e) => {
                if let Some(p) = surface_point(e, rect) {
                    self.begin_stroke(p);
                }
            }
            InputEvent::MouseMove(e) | InputEvent::TouchMove(e) => {
                if let Some(p) = surface_point(e, rect) {
                    self.extend_stroke(p);
                }
            }
            InputEvent::MouseUp | InputEvent::MouseLeave | InputEvent::TouchEnd => self.end_stroke(),
        }
    }

    /// The exported PNG as a data URL; empty when there is nothing to export.
    pub fn export_data_url(&self) -> String {
        self.export_as_image().map(|png| codec::to_data_url(&png)).unwrap_or_default()
    }

    pub fn is_initialized(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }

    pub fn buffer(&self) -> Option<&Raster> {
        self.buffer.as_ref()
    }

    pub fn logical_size(&self) -> (u32, u32) {
        self.logical_size
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_cursor(&self) -> Option<usize> {
        self.history.cursor()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // Repaint the buffer from the snapshot at the history cursor. The buffer
    // keeps its size; a snapshot taken at another size lands in the top-left
    // corner, cropped or with transparent margins.
    fn restore_current(&mut self) {
        let (Some(buffer), Some(snap)) = (self.buffer.as_mut(), self.history.current()) else {
            return;
        };
        let src = &snap.raster;
        if buffer.width == src.width && buffer.height == src.height {
            buffer.pixels.copy_from_slice(&src.pixels);
            return;
        }
        buffer.clear();
        let w = buffer.width.min(src.width);
        for y in 0..buffer.height.min(src.height) {
            let from = y * src.width;
            let to = y * buffer.width;
            buffer.pixels[to..to + w].copy_from_slice(&src.pixels[from..from + w]);
        }
    }
}

impl CanvasHandle for DrawingSurface {
    fn clear_canvas(&mut self) {
        let Some(buffer) = self.buffer.as_mut() else { return };
        self.stroke = None;
        buffer.clear();
        let raster = buffer.clone();
        self.history.save(Snapshot { raster, empty: true });
        debug!(entries = self.history.len(), "canvas cleared");
    }

    fn undo(&mut self) {
        if self.buffer.is_none() {
            return;
        }
        self.stroke = None;
        if self.history.undo().is_some() {
            self.restore_current();
            debug!(cursor = ?self.history.cursor(), "undo");
        }
    }

    fn redo(&mut self) {
        if self.buffer.is_none() {
            return;
        }
        self.stroke = None;
        if self.history.redo().is_some() {
            self.restore_current();
            debug!(cursor = ?self.history.cursor(), "redo");
        }
    }

    fn export_as_image(&self) -> Option<Vec<u8>> {
        let buffer = self.buffer.as_ref()?;
        match codec::encode_png(buffer) {
            Ok(png) => Some(png),
            Err(e) => {
                warn!("export failed: {e}");
                None
            }
        }
    }

    fn import_image(&mut self, image: &RgbaImage) {
        let Some(buffer) = self.buffer.as_mut() else { return };
        self.stroke = None;
        buffer.clear();

        // Drawing onto a cleared buffer is a straight copy of the scaled source.
        if image.width() > 0 && image.height() > 0 {
            let scaled = codec::scale_to_fill(image, buffer.width as u32, buffer.height as u32);
            *buffer = codec::raster_from_image(&scaled);
        }

        let raster = buffer.clone();
        self.history.save(Snapshot { raster, empty: false });
        debug!(
            src_width = image.width(),
            src_height = image.height(),
            entries = self.history.len(),
            "image imported"
        );
    }

    fn is_empty(&self) -> bool {
        self.history.current().map(|s| s.empty).unwrap_or(true)
    }
}
