use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{error, info};

use spine_exporter::pipeline::{DEFAULT_DPI, ExportOptions, export_file};
use spine_exporter::raster::{InkscapeCli, InkscapeRasterizer};

/// Export each layer of an Inkscape SVG to a trimmed PNG and a Spine JSON file
#[derive(Debug, Parser)]
#[command(name = "spine-exporter", version)]
struct Cli {
    /// SVG document to export
    input: PathBuf,

    /// Path to the export directory
    #[arg(long, default_value = "~")]
    outdir: PathBuf,

    /// Resolution to export at
    #[arg(long, default_value_t = DEFAULT_DPI)]
    dpi: f64,

    /// Create a Spine JSON file
    #[arg(long)]
    json: bool,

    /// Pretty-print the JSON file
    #[arg(long)]
    pretty_print: bool,

    /// Inkscape executable
    #[arg(long, default_value = "inkscape")]
    inkscape: PathBuf,

    /// Use the Inkscape 0.92 command line
    #[arg(long)]
    legacy_cli: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let options = ExportOptions {
        output_dir: cli.outdir,
        dpi: cli.dpi,
        emit_json: cli.json,
        pretty_print: cli.pretty_print,
    };

    let rasterizer = InkscapeRasterizer::new()
        .with_program(cli.inkscape)
        .with_cli(if cli.legacy_cli {
            InkscapeCli::Legacy
        } else {
            InkscapeCli::Modern
        });

    match export_file(&cli.input, &options, &rasterizer) {
        Ok(report) => {
            info!(
                "Exported {} layers to {} ({} skipped)",
                report.exported.len(),
                report.images_dir.display(),
                report.skipped.len()
            );
        }
        Err(e) => {
            error!("Export of '{}' failed: {}", cli.input.display(), e);
            process::exit(1);
        }
    }
}
