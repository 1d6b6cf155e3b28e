//! Layer rasterization and trimming
//!
//! The export process per layer:
//! 1. Render the layer alone on the full drawing area through a [`Rasterizer`]
//! 2. Find the bounding box of its visible pixels
//! 3. Crop the PNG in place and compute its offset from the canvas center

mod crop;
mod inkscape;

use std::path::Path;

use crate::error::Result;

pub use crop::{BoundingBox, Placement, bounding_box, crop_in_place};
pub use inkscape::{InkscapeCli, InkscapeRasterizer};

/// One layer to render
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub layer_id: &'a str,
    /// PNG file to write
    pub output: &'a Path,
    /// Resolution in dots per inch
    pub dpi: f64,
    /// SVG file on disk containing the layer
    pub source: &'a Path,
}

/// Produces a PNG for a single layer.
///
/// Implementations must render on the full drawing area with a transparent
/// background so that all layers of a document share one canvas.
pub trait Rasterizer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<()>;
}
