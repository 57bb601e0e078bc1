// What you SEE:
// • A dark window; hold Left Mouse to paint with the brush.
// • B brush, E eraser, [ ] brush size, - = opacity.
// • Ctrl+Z undo, Ctrl+Y (or Ctrl+Shift+Z) redo, Delete clears.
// • Ctrl+S writes a PNG, Ctrl+O imports the configured image. ESC quits.
// • Resizing the window starts a fresh canvas.

use neon_canvas::app::CanvasApp;
use neon_canvas::config::Settings;
use neon_canvas::error::Error;
use neon_canvas::logging;
use neon_canvas::raster::flatten_onto;
use neon_canvas::window::Drawer;
use std::path::PathBuf;
use tracing::{info, warn};

fn main() -> Result<(), Error> {
    /* --- Settings + logging ---
       First argument may point at another settings file. */
    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("settings.json"));
    let settings = Settings::load(&settings_path)?;
    logging::init(settings.debug_logging);
    info!(path = %settings_path.display(), "settings loaded");

    /* --- Window + canvas ---
       Visual: window opens showing an empty canvas over the backdrop. */
    let mut drawer = Drawer::new(
        "Neon Canvas",
        settings.window_width as usize,
        settings.window_height as usize,
    )?;
    let mut app = CanvasApp::new(&settings);
    let backdrop = settings.backdrop();

    /* --- Reusable screen buffer ---
       Visual: this is the image you actually see each frame. */
    let mut screen: Vec<u32> = Vec::new();
    let mut last_title = String::new();

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        // 1) Follow the window size; a change wipes the canvas.
        let (w, h) = drawer.size();
        app.resize(w as u32, h as u32);

        // 2) Toolbar shortcuts. File errors are reported, not fatal.
        for action in drawer.shortcuts() {
            if let Err(e) = app.apply(action) {
                warn!("{action:?} failed: {e}");
            }
        }

        // 3) Mouse → strokes.
        app.pointer(drawer.left_mouse_down(), drawer.mouse_pos());

        // 4) Title shows tool + history position.
        let title = app.status();
        if title != last_title {
            drawer.set_title(&title);
            last_title = title;
        }

        // 5) Present (transparent pixels show the backdrop).
        match app.surface().buffer() {
            Some(buffer) => {
                flatten_onto(buffer, backdrop, &mut screen);
                drawer.present(&screen, buffer.width, buffer.height)?;
            }
            None => drawer.idle(),
        }
    }

    Ok(())
}
