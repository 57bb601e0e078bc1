// Getting pixels in and out of the surface: PNG bytes, data URLs and files.
// Visual: an exported PNG reopened anywhere looks exactly like the canvas,
// with transparent areas still transparent.

use crate::error::Error;
use crate::types::Raster;
use crate::color::Rgba;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use std::path::Path;

pub const PNG_MIME: &str = "image/png";

/// Encode the raster losslessly as PNG.
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>, Error> {
    if raster.width == 0 || raster.height == 0 {
        return Err(Error::Encode("raster has no pixels".into()));
    }
    let img = raster_to_image(raster)
        .ok_or_else(|| Error::Encode("pixel count does not match dimensions".into()))?;

    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgba8)
        .map_err(|e| Error::Encode(format!("PNG: {e}")))?;
    Ok(out)
}

/// Decode any supported image format into RGBA8.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, Error> {
    let img = image::load_from_memory(bytes).map_err(|e| Error::Decode(format!("bytes: {e}")))?;
    Ok(img.to_rgba8())
}

/// Load and decode an image file from disk.
pub fn load_image_file(path: &Path) -> Result<RgbaImage, Error> {
    let img = image::open(path).map_err(|e| Error::Decode(format!("{}: {e}", path.display())))?;
    Ok(img.to_rgba8())
}

/// Write encoded bytes (usually from `encode_png`) to disk.
pub fn save_file(bytes: &[u8], path: &Path) -> Result<(), Error> {
    std::fs::write(path, bytes).map_err(|e| Error::Encode(format!("{}: {e}", path.display())))
}

/// Wrap PNG bytes as `data:image/png;base64,...`.
pub fn to_data_url(png: &[u8]) -> String {
    format!("data:{PNG_MIME};base64,{}", STANDARD.encode(png))
}

/// Split a base64 data URL into its MIME type and decoded payload.
pub fn parse_data_url(url: &str) -> Result<(String, Vec<u8>), Error> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| Error::Decode("data URL must start with 'data:'".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::Decode("data URL has no ',' separator".into()))?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| Error::Decode("only base64 data URLs are supported".into()))?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| Error::Decode(format!("data URL payload: {e}")))?;
    Ok((mime.to_string(), bytes))
}

/// Decode the image carried by a data URL.
pub fn decode_data_url(url: &str) -> Result<RgbaImage, Error> {
    let (mime, bytes) = parse_data_url(url)?;
    if !mime.starts_with("image/") {
        return Err(Error::Decode(format!("data URL is '{mime}', not an image")));
    }
    decode_image(&bytes)
}

/// Scale `src` to exactly `width` × `height`. Same-size input is copied
/// untouched so re-importing an export is pixel-exact.
pub fn scale_to_fill(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if src.dimensions() == (width, height) {
        return src.clone();
    }
    imageops::resize(src, width, height, FilterType::Triangle)
}

/// Copy an RGBA image into a raster of the same size.
pub fn raster_from_image(img: &RgbaImage) -> Raster {
    let pixels = img
        .pixels()
        .map(|p| Rgba { r: p[0], g: p[1], b: p[2], a: p[3] }.to_packed())
        .collect();
    Raster { width: img.width() as usize, height: img.height() as usize, pixels }
}

/// The raster as an RGBA image; None if its pixel count is inconsistent.
pub fn raster_to_image(raster: &Raster) -> Option<RgbaImage> {
    let mut bytes = Vec::with_capacity(raster.pixels.len() * 4);
    for &px in &raster.pixels {
        let c = Rgba::from_packed(px);
        bytes.extend_from_slice(&[c.r, c.g, c.b, c.a]);
    }
    RgbaImage::from_raw(raster.width as u32, raster.height as u32, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Raster {
        let mut r = Raster::blank(3, 2);
        r.pixels[0] = 0xFF_FF_00_FF;
        r.pixels[4] = 0x80_10_20_30;
        r
    }

    #[test]
    fn png_round_trip_is_lossless() {
        let r = sample();
        let png = encode_png(&r).unwrap();
        let back = raster_from_image(&decode_image(&png).unwrap());
        assert_eq!(back, r);
    }

    #[test]
    fn empty_raster_does_not_encode() {
        assert!(matches!(encode_png(&Raster::blank(0, 0)), Err(Error::Encode(_))));
    }

    #[test]
    fn data_url_round_trip() {
        let png = encode_png(&sample()).unwrap();
        let url = to_data_url(&png);
        assert!(url.starts_with("data:image/png;base64,"));
        let (mime, bytes) = parse_data_url(&url).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, png);
        assert_eq!(raster_from_image(&decode_data_url(&url).unwrap()), sample());
    }

    #[test]
    fn malformed_data_urls_are_rejected() {
        assert!(parse_data_url("image/png;base64,AAAA").is_err());
        assert!(parse_data_url("data:image/png;base64").is_err());
        assert!(parse_data_url("data:text/plain,hello").is_err());
        assert!(decode_data_url("data:text/plain;base64,aGVsbG8=").is_err());
    }

    #[test]
    fn scaling_hits_requested_size() {
        let img = RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
        let big = scale_to_fill(&img, 8, 6);
        assert_eq!(big.dimensions(), (8, 6));
        assert_eq!(big.get_pixel(4, 3).0, [255, 0, 0, 255]);
        assert_eq!(scale_to_fill(&img, 2, 2), img);
    }

    #[test]
    fn transparent_pixels_normalize_to_zero() {
        let img = RgbaImage::from_pixel(1, 1, image::Rgba([9, 9, 9, 0]));
        assert_eq!(raster_from_image(&img).pixels, vec![0]);
    }
}
