use std::path::Path;

use crate::error::{ExportError, Result};

/// A `<g inkscape:groupmode="layer">` element and the layers nested directly in it
#[derive(Debug, Clone, PartialEq)]
pub struct LayerNode {
    pub id: String,
    /// `inkscape:label`, if the layer carries one
    pub label: Option<String>,
    pub sublayers: Vec<LayerNode>,
}

impl LayerNode {
    pub fn new(id: impl Into<String>, label: Option<&str>) -> Self {
        Self {
            id: id.into(),
            label: label.map(str::to_string),
            sublayers: Vec::new(),
        }
    }

    pub fn with_sublayers(mut self, sublayers: Vec<LayerNode>) -> Self {
        self.sublayers = sublayers;
        self
    }
}

/// A leaf layer selected for export
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: String,
    /// Display label, falls back to the id
    pub label: String,
    /// Position in traversal order
    pub index: usize,
}

/// The layer structure of an SVG document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// `id` of the root `<svg>` element
    pub id: Option<String>,
    /// `inkscape:label` of the root element
    pub label: Option<String>,
    /// First `sodipodi:docname` found in the document
    pub docname: Option<String>,
    /// Top-level layers in document order
    pub layers: Vec<LayerNode>,
}

impl Document {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let svg_data = std::fs::read_to_string(path.as_ref())?;
        super::parse_document(&svg_data)
    }

    /// Name used for the descriptor file: the declared file name without its
    /// extension, or the root id when the document was never saved.
    pub fn friendly_name(&self) -> Result<String> {
        if let Some(docname) = self.docname.as_deref().filter(|n| !n.is_empty()) {
            let stem = Path::new(docname)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| docname.to_string());
            return Ok(stem);
        }

        self.id.clone().ok_or(ExportError::UnnamedDocument)
    }
}
