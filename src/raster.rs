// Pixel compositing for strokes.
// Visual expectations:
// - Brush: the stroke color is alpha-blended OVER whatever is already there.
// - Eraser: coverage is REMOVED from the buffer (destination-out), leaving holes.
// - Strokes have round caps and joins, so thick lines look continuous.
use crate::color::Rgba;
use crate::types::{Raster, StrokeStyle, Tool};

/// Per-stroke coverage in [0,1] per device pixel.
/// Visual: unseen directly; it remembers how much of each pixel the current
/// stroke already covers, so overlapping segments don't darken the joints.
pub struct CoverageMask {
    pub width: usize,
    pub height: usize,
    pub alpha: Vec<f32>, // length = width * height, values clamped to [0.0, 1.0]
}

impl CoverageMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, alpha: vec![0.0; width * height] }
    }
}

/// Half-open pixel rectangle [x0,x1) × [y0,y1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl Region {
    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }
}

/// Accumulate the coverage of one round-capped segment from `a` to `b`
/// (device pixels) into `mask`, keeping the max per pixel.
/// Returns the pixel rectangle that may have changed, or None when the
/// segment lies entirely off the raster.
pub fn stamp_segment(
    mask: &mut CoverageMask,
    a: (f32, f32),
    b: (f32, f32),
    radius: f32,
) -> Option<Region> {
    if !(radius > 0.0) || mask.width == 0 || mask.height == 0 {
        return None;
    }

    // Bounding box of the capsule, one pixel of slack for the antialiased edge.
    let pad = radius + 1.0;
    let min_x = (a.0.min(b.0) - pad).floor().max(0.0);
    let min_y = (a.1.min(b.1) - pad).floor().max(0.0);
    let max_x = (a.0.max(b.0) + pad).ceil().min(mask.width as f32);
    let max_y = (a.1.max(b.1) + pad).ceil().min(mask.height as f32);
    if min_x >= max_x || min_y >= max_y {
        return None;
    }
    let region = Region {
        x0: min_x as usize,
        y0: min_y as usize,
        x1: max_x as usize,
        y1: max_y as usize,
    };

    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len2 = dx * dx + dy * dy;

    for y in region.y0..region.y1 {
        for x in region.x0..region.x1 {
            // Distance from the pixel center to the closest point on the segment.
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            let t = if len2 > 0.0 {
                (((px - a.0) * dx + (py - a.1) * dy) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
            let d = ((px - cx) * (px - cx) + (py - cy) * (py - cy)).sqrt();

            // One-pixel antialiased rim around the solid core.
            let cov = (radius - d + 0.5).clamp(0.0, 1.0);
            if cov <= 0.0 { continue; }
            let idx = y * mask.width + x;
            if cov > mask.alpha[idx] {
                mask.alpha[idx] = cov;
            }
        }
    }

    Some(region)
}

/// Rebuild `region` of `dst` from `base` plus the stroke described by `mask`
/// and `style`. Pixels the stroke never touched are copied from `base`.
pub fn composite_region(
    dst: &mut Raster,
    base: &Raster,
    mask: &CoverageMask,
    region: Region,
    style: &StrokeStyle,
) {
    if dst.width != base.width || dst.height != base.height || mask.width != dst.width {
        return;
    }
    let opacity = style.opacity.clamp(0.0, 1.0);

    for y in region.y0..region.y1.min(dst.height) {
        for x in region.x0..region.x1.min(dst.width) {
            let idx = y * dst.width + x;
            let cov = mask.alpha[idx];
            if cov <= 0.0 {
                dst.pixels[idx] = base.pixels[idx];
                continue;
            }
            let a = cov * opacity;
            dst.pixels[idx] = match style.tool {
                Tool::Brush => source_over(base.pixels[idx], style.color, a),
                Tool::Eraser => destination_out(base.pixels[idx], a),
            };
        }
    }
}

/// Blend `color` at `alpha` (times the color's own alpha) over packed pixel `dst`.
#[inline]
pub fn source_over(dst: u32, color: Rgba, alpha: f32) -> u32 {
    let sa = alpha.clamp(0.0, 1.0) * (color.a as f32 / 255.0);
    if sa <= 0.0 {
        return dst;
    }
    let d = Rgba::from_packed(dst);
    let da = d.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return 0;
    }

    let mix = |s: u8, d: u8| -> u8 {
        let v = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    Rgba {
        r: mix(color.r, d.r),
        g: mix(color.g, d.g),
        b: mix(color.b, d.b),
        a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    }
    .to_packed()
}

/// Remove `alpha` worth of coverage from packed pixel `dst`; color is kept.
#[inline]
pub fn destination_out(dst: u32, alpha: f32) -> u32 {
    let sa = alpha.clamp(0.0, 1.0);
    let mut d = Rgba::from_packed(dst);
    let out_a = d.a as f32 * (1.0 - sa);
    d.a = out_a.round().clamp(0.0, 255.0) as u8;
    d.to_packed()
}

/// Flatten `src` over an opaque `backdrop` into 0x00RRGGBB for the window.
/// Visual: transparent areas show the backdrop; strokes sit on top of it.
pub fn flatten_onto(src: &Raster, backdrop: Rgba, out: &mut Vec<u32>) {
    out.clear();
    out.reserve(src.pixels.len());
    let back = Rgba { a: 0xFF, ..backdrop };
    for &px in &src.pixels {
        let c = Rgba::from_packed(px);
        let flat = match c.a {
            0 => back.to_rgb24(),
            0xFF => c.to_rgb24(),
            a => Rgba::from_packed(source_over(back.to_packed(), c, a as f32 / 255.0)).to_rgb24(),
        };
        out.push(flat);
    }
}
