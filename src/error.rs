use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid UTF-8 in output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("document has no <svg> root element")]
    MissingRoot,
    #[error("layer '{label}' has no id attribute and cannot be rendered")]
    MissingLayerId { label: String },
    #[error("document has neither a sodipodi:docname nor a root id")]
    UnnamedDocument,

    #[error("label '{label}' is used by layers '{first}' and '{second}'")]
    DuplicateLabel {
        label: String,
        first: String,
        second: String,
    },
    #[error("label '{0}' cannot be used as an image file name")]
    InvalidLabel(String),
    #[error("resolution must be a positive number, got {0}")]
    InvalidDpi(f64),
    #[error("cannot resolve the home directory for '{0}'")]
    NoHomeDir(String),

    #[error("failed to launch renderer '{program}': {source}")]
    RendererUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("rasterization failed for layer '{layer}' ({status}): {stderr}")]
    RenderFailed {
        layer: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("renderer produced no image for layer '{layer}' at {}", path.display())]
    RenderMissing { layer: String, path: PathBuf },

    #[error("no visible pixels in {}", path.display())]
    EmptyRaster { path: PathBuf },
}
