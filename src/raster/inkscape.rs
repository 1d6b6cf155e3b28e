use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::Command;

use log::debug;

use super::{Rasterizer, RenderRequest};
use crate::error::{ExportError, Result};

/// Command-line dialect of the installed Inkscape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InkscapeCli {
    /// Inkscape 0.92 and older (`--export-png`, `--file`)
    Legacy,
    /// Inkscape 1.x (`--export-filename`, source as positional argument)
    #[default]
    Modern,
}

/// Renders layers by running the `inkscape` executable once per layer
#[derive(Debug, Clone)]
pub struct InkscapeRasterizer {
    program: PathBuf,
    cli: InkscapeCli,
}

impl Default for InkscapeRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl InkscapeRasterizer {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("inkscape"),
            cli: InkscapeCli::default(),
        }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_cli(mut self, cli: InkscapeCli) -> Self {
        self.cli = cli;
        self
    }

    /// Arguments exporting only `request.layer_id`, sized to the whole drawing
    pub fn command_args(&self, request: &RenderRequest<'_>) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();

        match self.cli {
            InkscapeCli::Legacy => {
                args.push("--export-png".into());
                args.push(request.output.into());
            }
            InkscapeCli::Modern => {
                args.push("--export-type=png".into());
                args.push("--export-filename".into());
                args.push(request.output.into());
            }
        }

        args.push("--export-id-only".into());
        args.push("--export-area-drawing".into());
        args.push("--export-id".into());
        args.push(request.layer_id.into());
        args.push("--export-dpi".into());
        args.push(request.dpi.to_string().into());

        match self.cli {
            InkscapeCli::Legacy => {
                args.push("--file".into());
                args.push(request.source.into());
            }
            InkscapeCli::Modern => args.push(request.source.into()),
        }

        args
    }
}

impl Rasterizer for InkscapeRasterizer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<()> {
        // A leftover image from an earlier run must not pass for this render
        match fs::remove_file(request.output) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let args = self.command_args(request);
        debug!("{} {:?}", self.program.display(), args);

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| ExportError::RendererUnavailable {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExportError::RenderFailed {
                layer: request.layer_id.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        if !request.output.is_file() {
            return Err(ExportError::RenderMissing {
                layer: request.layer_id.to_string(),
                path: request.output.to_path_buf(),
            });
        }

        Ok(())
    }
}
