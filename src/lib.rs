//! Freehand raster drawing surface with snapshot undo/redo and PNG
//! import/export, plus the small host that puts it in a window.

pub mod app;
pub mod codec;
pub mod color;
pub mod config;
pub mod credits;
pub mod error;
pub mod handle;
pub mod history;
pub mod input;
pub mod logging;
pub mod raster;
pub mod surface;
pub mod transform;
pub mod types;
pub mod window;

pub use color::Rgba;
pub use error::Error;
pub use handle::CanvasHandle;
pub use surface::DrawingSurface;
pub use types::{Point, Raster, StrokeStyle, Tool};
