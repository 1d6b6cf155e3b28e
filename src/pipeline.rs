//! Export driver
//!
//! Runs the whole conversion in one sequential pass: enumerate the leaf
//! layers, render and trim each one, record it in the skeleton, then write
//! the descriptor.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::descriptor::{JsonStyle, SpineDescriptor};
use crate::document::{Document, Layer};
use crate::error::{ExportError, Result};
use crate::raster::{Placement, Rasterizer, RenderRequest, crop_in_place};

pub const IMAGES_DIR: &str = "images";
pub const DEFAULT_DPI: f64 = 90.0;

/// Options for a layer export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Export directory, a leading `~` is expanded (default: `~`)
    pub output_dir: PathBuf,
    /// Rendering resolution in dots per inch (default: 90)
    pub dpi: f64,
    /// Write `<document name>.json` next to the images
    pub emit_json: bool,
    /// Indent the JSON file, only meaningful with `emit_json`
    pub pretty_print: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("~"),
            dpi: DEFAULT_DPI,
            emit_json: false,
            pretty_print: false,
        }
    }
}

impl ExportOptions {
    pub fn resolve_output_dir(&self) -> Result<PathBuf> {
        expand_home(&self.output_dir)
    }

    pub fn json_style(&self) -> JsonStyle {
        if self.pretty_print {
            JsonStyle::Pretty
        } else {
            JsonStyle::Compact
        }
    }
}

/// Replace a leading `~` component with the user's home directory
pub fn expand_home(path: &Path) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => {
            let home = dirs::home_dir()
                .ok_or_else(|| ExportError::NoHomeDir(path.display().to_string()))?;
            Ok(home.join(rest))
        }
        Err(_) => Ok(path.to_path_buf()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportedLayer {
    pub layer: Layer,
    pub image: PathBuf,
    pub placement: Placement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The rendered layer has no visible pixels
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLayer {
    pub layer: Layer,
    pub reason: SkipReason,
}

/// Outcome of a successful export
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub images_dir: PathBuf,
    pub exported: Vec<ExportedLayer>,
    pub skipped: Vec<SkippedLayer>,
    pub skeleton: SpineDescriptor,
    /// Path of the written JSON file, if any
    pub descriptor: Option<PathBuf>,
}

/// Reject label sets that cannot map one-to-one onto image files
pub fn validate_labels(layers: &[Layer]) -> Result<()> {
    let mut seen: HashMap<&str, &str> = HashMap::new();

    for layer in layers {
        let label = layer.label.as_str();
        if label.is_empty() || label == "." || label == ".." || label.contains(['/', '\\']) {
            return Err(ExportError::InvalidLabel(layer.label.clone()));
        }

        if let Some(first) = seen.insert(label, &layer.id) {
            return Err(ExportError::DuplicateLabel {
                label: layer.label.clone(),
                first: first.to_string(),
                second: layer.id.clone(),
            });
        }
    }

    Ok(())
}

/// Pairs of labels that differ only by case; they share one image file on
/// case-insensitive file systems.
pub fn case_collisions(layers: &[Layer]) -> Vec<(String, String)> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut collisions = Vec::new();

    for layer in layers {
        if let Some(first) = seen.insert(layer.label.to_lowercase(), &layer.label) {
            collisions.push((first.to_string(), layer.label.clone()));
        }
    }

    collisions
}

/// Export every leaf layer of `document`.
///
/// `source` is the document's file on disk; the rasterizer reads it
/// independently of the parsed tree.
pub fn export<R>(
    document: &Document,
    source: &Path,
    options: &ExportOptions,
    rasterizer: &R,
) -> Result<ExportReport>
where
    R: Rasterizer + ?Sized,
{
    if !(options.dpi.is_finite() && options.dpi > 0.0) {
        return Err(ExportError::InvalidDpi(options.dpi));
    }

    let layers = document.leaf_layers();
    validate_labels(&layers)?;
    for (first, second) in case_collisions(&layers) {
        warn!(
            "Labels '{}' and '{}' only differ by case and may overwrite each other's image",
            first, second
        );
    }

    let descriptor_name = if options.emit_json {
        Some(document.friendly_name()?)
    } else {
        None
    };

    let output_dir = std::path::absolute(options.resolve_output_dir()?)?;
    let images_dir = output_dir.join(IMAGES_DIR);
    fs::create_dir_all(&images_dir)?;

    info!(
        "Exporting {} layers from {} to {}",
        layers.len(),
        source.display(),
        images_dir.display()
    );

    let mut skeleton = SpineDescriptor::new(&images_dir);
    let mut exported = Vec::new();
    let mut skipped = Vec::new();

    for layer in layers {
        let image = images_dir.join(format!("{}.png", layer.label));
        let request = RenderRequest {
            layer_id: &layer.id,
            output: &image,
            dpi: options.dpi,
            source,
        };
        rasterizer.render(&request)?;

        match crop_in_place(&image) {
            Ok(placement) => {
                debug!(
                    "{} -> {}x{} at ({}, {})",
                    layer.label, placement.width, placement.height, placement.x, placement.y
                );
                skeleton.push_layer(&layer.label, placement);
                exported.push(ExportedLayer {
                    layer,
                    image,
                    placement,
                });
            }
            Err(ExportError::EmptyRaster { .. }) => {
                warn!(
                    "Skipping layer '{}' ({}): nothing visible to export",
                    layer.label, layer.id
                );
                if let Err(e) = fs::remove_file(&image) {
                    warn!("Could not remove {}: {}", image.display(), e);
                }
                skipped.push(SkippedLayer {
                    layer,
                    reason: SkipReason::Empty,
                });
            }
            Err(e) => return Err(e),
        }
    }

    let descriptor = match descriptor_name {
        Some(name) => {
            let path = output_dir.join(format!("{}.json", name));
            skeleton.write_to(&path, options.json_style())?;
            info!("Wrote {}", path.display());
            Some(path)
        }
        None => None,
    };

    Ok(ExportReport {
        images_dir,
        exported,
        skipped,
        skeleton,
        descriptor,
    })
}

/// Load the SVG at `source` and export its layers
pub fn export_file<R>(source: &Path, options: &ExportOptions, rasterizer: &R) -> Result<ExportReport>
where
    R: Rasterizer + ?Sized,
{
    let document = Document::load(source)?;
    export(&document, source, options, rasterizer)
}
