//! Image cropping for image elements.
//!
//! Images are displayed with object-cover semantics: scaled by
//! `s = max(w / W, h / H)` so the display box is filled, then centered, with
//! the overflow hidden. A crop rectangle is drawn by the user in display
//! coordinates; committing it maps the rectangle back into source pixels,
//! rasterizes exactly that region, and re-embeds it as a PNG data URI.

use crate::datauri::DataUri;
use crate::error::{Error, Result};
use image::{GenericImageView, ImageFormat};
use std::io::Cursor;

/// Rectangle in display (post object-cover) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Rectangle in source-image pixel coordinates (fractional).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SourceRect {
    /// Snap outward to whole pixels, staying inside a `src_w × src_h` image.
    /// Returns `(x, y, width, height)`.
    pub fn to_pixels(&self, src_w: u32, src_h: u32) -> (u32, u32, u32, u32) {
        let x0 = (self.x.floor().max(0.0) as u32).min(src_w);
        let y0 = (self.y.floor().max(0.0) as u32).min(src_h);
        let x1 = ((self.x + self.width).ceil().max(0.0) as u32).clamp(x0, src_w);
        let y1 = ((self.y + self.height).ceil().max(0.0) as u32).clamp(y0, src_h);
        (x0, y0, x1 - x0, y1 - y0)
    }
}

/// Object-cover scale factor for a `src` image shown in a `display` box.
pub fn cover_scale(src: (f32, f32), display: (f32, f32)) -> f32 {
    (display.0 / src.0).max(display.1 / src.1)
}

/// Map a display-space crop rectangle to source-image coordinates.
///
/// The result never reads outside `[0, src_w] × [0, src_h]`.
pub fn display_to_source(src_w: f32, src_h: f32, box_w: f32, box_h: f32, crop: CropRect) -> SourceRect {
    if src_w <= 0.0 || src_h <= 0.0 || box_w <= 0.0 || box_h <= 0.0 {
        return SourceRect {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        };
    }

    let s = cover_scale((src_w, src_h), (box_w, box_h));
    // Portion of the scaled image hidden on the left / top.
    let off_x = (src_w * s - box_w) / 2.0;
    let off_y = (src_h * s - box_h) / 2.0;

    let x = ((crop.x + off_x) / s).clamp(0.0, src_w);
    let y = ((crop.y + off_y) / s).clamp(0.0, src_h);
    let width = (crop.width.max(0.0) / s).min(src_w - x);
    let height = (crop.height.max(0.0) / s).min(src_h - y);

    SourceRect {
        x,
        y,
        width,
        height,
    }
}

/// Result of committing a crop.
#[derive(Debug, Clone, PartialEq)]
pub struct CroppedImage {
    /// PNG data URI of the cropped pixels.
    pub src: String,
    /// New element size (the crop rectangle's display size).
    pub width: f32,
    pub height: f32,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// Crop the image in `src` (a data URI) as displayed in a `display` box.
pub fn crop_image(src: &str, display: (f32, f32), crop: CropRect) -> Result<CroppedImage> {
    let data = DataUri::parse(src)?;
    if !data.is_image() {
        return Err(Error::InvalidDataUri(format!("not an image: {}", data.mime)));
    }
    let img = image::load_from_memory(&data.bytes)?;
    let (src_w, src_h) = img.dimensions();

    let rect = display_to_source(src_w as f32, src_h as f32, display.0, display.1, crop);
    let (x, y, w, h) = rect.to_pixels(src_w, src_h);
    if w == 0 || h == 0 {
        return Err(Error::EmptyCrop);
    }
    log::debug!("crop {src_w}x{src_h} → ({x}, {y}) {w}x{h}");

    let cropped = img.crop_imm(x, y, w, h);
    let mut buf = Vec::new();
    cropped.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;

    Ok(CroppedImage {
        src: DataUri::new("image/png", buf).encode(),
        width: crop.width.min(display.0).max(1.0),
        height: crop.height.min(display.1).max(1.0),
        pixel_width: w,
        pixel_height: h,
    })
}
