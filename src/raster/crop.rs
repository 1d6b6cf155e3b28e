//! Transparent-margin trimming
//!
//! Every layer is rendered on the full drawing area, so the position of the
//! trimmed image inside that canvas tells where the layer sits relative to
//! the others.

use std::path::Path;

use image::{GenericImageView, ImageFormat, ImageReader, Rgba};

use crate::error::{ExportError, Result};

/// Smallest rectangle enclosing the visible pixels; `right` and `bottom` are exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl BoundingBox {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    fn include(&mut self, x: u32, y: u32) {
        self.left = self.left.min(x);
        self.top = self.top.min(y);
        self.right = self.right.max(x + 1);
        self.bottom = self.bottom.max(y + 1);
    }
}

/// Geometry of a trimmed image, measured from the canvas center with y up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    pub fn from_bounds(bbox: &BoundingBox, canvas_width: u32, canvas_height: u32) -> Self {
        let width = bbox.width();
        let height = bbox.height();

        // Raster rows grow downward, Spine's y axis grows upward
        let x = 0.5 * width as f64 - 0.5 * canvas_width as f64 + bbox.left as f64;
        let y = 0.5 * canvas_height as f64 - 0.5 * (bbox.top + bbox.bottom) as f64;

        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Bounding box of all pixels with non-zero alpha, `None` for a fully transparent image
pub fn bounding_box<I>(img: &I) -> Option<BoundingBox>
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    let mut bbox: Option<BoundingBox> = None;

    for (x, y, pixel) in img.pixels() {
        if pixel[3] == 0 {
            continue;
        }
        match &mut bbox {
            Some(b) => b.include(x, y),
            None => bbox = Some(BoundingBox::new(x, y, x + 1, y + 1)),
        }
    }

    bbox
}

/// Trim the PNG at `path` to its visible pixels, overwriting it.
///
/// A fully transparent image is reported as [`ExportError::EmptyRaster`] and
/// the file is left as it was.
pub fn crop_in_place(path: &Path) -> Result<Placement> {
    let img = ImageReader::open(path)?.decode()?;
    let (canvas_width, canvas_height) = img.dimensions();

    let bbox = bounding_box(&img).ok_or_else(|| ExportError::EmptyRaster {
        path: path.to_path_buf(),
    })?;

    let cropped = img.crop_imm(bbox.left, bbox.top, bbox.width(), bbox.height());
    cropped.save_with_format(path, ImageFormat::Png)?;

    Ok(Placement::from_bounds(&bbox, canvas_width, canvas_height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn canvas_with_rect(w: u32, h: u32, rect: BoundingBox) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(w, h, CLEAR);
        for y in rect.top..rect.bottom {
            for x in rect.left..rect.right {
                img.put_pixel(x, y, RED);
            }
        }
        img
    }

    #[test]
    fn test_bounding_box_of_rect() {
        let img = canvas_with_rect(100, 100, BoundingBox::new(10, 20, 50, 80));
        assert_eq!(bounding_box(&img), Some(BoundingBox::new(10, 20, 50, 80)));
    }

    #[test]
    fn test_bounding_box_single_pixel() {
        let mut img = RgbaImage::from_pixel(5, 5, CLEAR);
        img.put_pixel(4, 0, Rgba([0, 0, 0, 1]));
        assert_eq!(bounding_box(&img), Some(BoundingBox::new(4, 0, 5, 1)));
    }

    #[test]
    fn test_bounding_box_transparent() {
        // Color without alpha is still invisible
        let img = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 0]));
        assert_eq!(bounding_box(&img), None);
    }

    #[test]
    fn test_placement_of_rect() {
        let bbox = BoundingBox::new(10, 20, 50, 80);
        let placement = Placement::from_bounds(&bbox, 100, 100);
        assert_eq!(placement.width, 40);
        assert_eq!(placement.height, 60);
        assert_eq!(placement.x, -20.0);
        assert_eq!(placement.y, 0.0);
    }

    #[test]
    fn test_placement_of_full_canvas() {
        let bbox = BoundingBox::new(0, 0, 64, 32);
        let placement = Placement::from_bounds(&bbox, 64, 32);
        assert_eq!(
            placement,
            Placement {
                x: 0.0,
                y: 0.0,
                width: 64,
                height: 32
            }
        );
    }

    #[test]
    fn test_placement_upper_right_is_positive() {
        let bbox = BoundingBox::new(90, 0, 100, 10);
        let placement = Placement::from_bounds(&bbox, 100, 100);
        assert_eq!(placement.x, 45.0);
        assert_eq!(placement.y, 45.0);
    }
}
