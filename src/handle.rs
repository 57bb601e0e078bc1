// The imperative handle a host UI drives the drawing surface through.
use image::RgbaImage;

/// Operations a host may invoke on a drawing surface.
///
/// None of these fail: on a surface that has not been sized yet they do
/// nothing, and `export_as_image` returns `None`.
pub trait CanvasHandle {
    /// Wipe to transparent and record the blank state in history.
    fn clear_canvas(&mut self);

    /// Step back one history entry; no-op at the oldest state.
    fn undo(&mut self);

    /// Step forward one history entry; no-op at the newest state.
    fn redo(&mut self);

    /// The current buffer as PNG bytes.
    fn export_as_image(&self) -> Option<Vec<u8>>;

    /// Replace the content with `image` scaled to fill the surface.
    /// The image must already be decoded.
    fn import_image(&mut self, image: &RgbaImage);

    /// True until something is drawn or imported; true again after a clear.
    fn is_empty(&self) -> bool;
}
