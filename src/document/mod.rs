//! SVG layer tree
//!
//! Reads an Inkscape document and exposes the layer hierarchy: every
//! `<g inkscape:groupmode="layer">` nested directly under the root or under
//! another layer. Ordinary groups, shapes and styling are ignored.

mod layers;
mod parser;
mod types;

pub use parser::{INKSCAPE_NS, SODIPODI_NS, SVG_NS, parse_document};
pub use types::{Document, Layer, LayerNode};
