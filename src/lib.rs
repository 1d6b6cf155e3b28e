//! # spine-exporter
//!
//! Exports the layers of an Inkscape drawing for the Spine skeletal
//! animation tool.
//!
//! ## Features
//!
//! - **Layer enumeration**: Walks the `inkscape:groupmode="layer"` tree and
//!   selects the innermost layers
//! - **Rasterization**: Renders each layer alone through Inkscape
//! - **Trimming**: Crops transparent margins and recovers the layer offset
//! - **Spine JSON**: One slot and one skin attachment per layer on a root bone
//!
//! ## Example
//!
//! ```rust,ignore
//! use spine_exporter::{ExportOptions, InkscapeRasterizer, export_file};
//!
//! let options = ExportOptions {
//!     output_dir: "~/spine/hero".into(),
//!     emit_json: true,
//!     ..Default::default()
//! };
//! let report = export_file("hero.svg".as_ref(), &options, &InkscapeRasterizer::new()).unwrap();
//! println!("{} layers exported", report.exported.len());
//! ```

pub mod descriptor;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod raster;

// Re-export commonly used items
pub use descriptor::{JsonStyle, SpineDescriptor};
pub use document::{Document, Layer, parse_document};
pub use error::{ExportError, Result};
pub use pipeline::{ExportOptions, ExportReport, export, export_file};
pub use raster::{InkscapeRasterizer, Placement, Rasterizer, RenderRequest};
