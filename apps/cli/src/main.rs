// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! plan3d - turn floor plan images into extruded OBJ meshes.
//!
//! # Commands
//!
//! - `plan3d convert <IMAGES>...` - convert a batch, one OBJ per image
//! - `plan3d inspect <OBJ>` - print counts and footprint of a written mesh
//!
//! Logging goes to stderr and follows `RUST_LOG`.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use plan3d_geometry::load_obj;
use plan3d_processing::{run_batch, BatchConfig, BatchEvent, BatchReport};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc;
use tracing_subscriber::EnvFilter;

mod opener;

use opener::{open_last_output, SystemOpener};

/// Exit code when every image of a batch failed
const EXIT_ALL_FAILED: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "plan3d", version)]
#[command(about = "Extrude floor plan images into 3D OBJ meshes", long_about = None)]
struct Cli {
    /// Log at debug level when RUST_LOG is not set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert floor plan images to OBJ files
    Convert(ConvertArgs),
    /// Print vertex/face counts and footprint of an OBJ file
    Inspect {
        /// OBJ file to read
        obj: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input images (PNG, JPEG, BMP)
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Directory receiving the OBJ files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Side of the square cleaning kernel, rounded up
    #[arg(long)]
    kernel_size: Option<f64>,

    /// Erosion passes, rounded up
    #[arg(long)]
    erosion_iterations: Option<f64>,

    /// Dilation passes, rounded up
    #[arg(long)]
    dilation_iterations: Option<f64>,

    /// Wall height in pixels
    #[arg(long)]
    wall_height: Option<f64>,

    /// Canny low threshold
    #[arg(long)]
    canny_low: Option<f32>,

    /// Canny high threshold
    #[arg(long)]
    canny_high: Option<f32>,

    /// Output file name prefix
    #[arg(long)]
    prefix: Option<String>,

    /// Also save mask, cleaned mask and edge map PNGs
    #[arg(long)]
    debug_images: bool,

    /// Open the last converted mesh in the default viewer
    #[arg(long)]
    open: bool,

    /// Print batch events as JSON lines
    #[arg(long)]
    json: bool,
}

impl ConvertArgs {
    /// Flags win over everything else.
    fn apply_overrides(&self, config: &mut BatchConfig) {
        let detection = &mut config.pipeline.detection;
        if let Some(v) = self.kernel_size {
            detection.kernel_size = v;
        }
        if let Some(v) = self.erosion_iterations {
            detection.erosion_iterations = v;
        }
        if let Some(v) = self.dilation_iterations {
            detection.dilation_iterations = v;
        }
        if let Some(v) = self.canny_low {
            detection.canny_low = v;
        }
        if let Some(v) = self.canny_high {
            detection.canny_high = v;
        }
        if let Some(v) = self.wall_height {
            config.pipeline.wall_height = v;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.file_prefix = prefix.clone();
        }
        if self.debug_images {
            config.debug_images = true;
        }
    }

    /// Defaults, then the config file, then the environment, then flags.
    fn resolve_config(&self) -> Result<BatchConfig> {
        let mut config = match &self.config {
            Some(path) => BatchConfig::from_json_file(path)?,
            None => BatchConfig::default(),
        };
        config
            .apply_env()
            .context("Invalid environment override")?;
        self.apply_overrides(&mut config);
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Convert(args) => convert(&args),
        Command::Inspect { obj } => inspect(&obj).map(|()| ExitCode::SUCCESS),
    }
}

fn convert(args: &ConvertArgs) -> Result<ExitCode> {
    let config = args.resolve_config()?;
    tracing::debug!(?config, "Resolved configuration");

    let report = convert_batch(&args.images, &config, args.json)?;

    if args.open {
        open_last_output(&report, &SystemOpener);
    }

    if report.all_failed() {
        Ok(ExitCode::from(EXIT_ALL_FAILED))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Run the batch on a worker thread and print its events as they arrive.
fn convert_batch(images: &[PathBuf], config: &BatchConfig, json: bool) -> Result<BatchReport> {
    let (tx, rx) = mpsc::channel();

    std::thread::scope(|scope| -> Result<BatchReport> {
        // The sender moves into the worker, so the receiver loop ends with the batch.
        let worker = scope.spawn(move || run_batch(images, config, &tx));

        for event in rx {
            if json {
                print_json_event(&event);
            } else {
                print_event(&event);
            }
        }

        worker
            .join()
            .map_err(|_| anyhow!("Batch worker panicked"))
    })
}

/// One JSON object per line. An event that fails to serialize is logged and
/// skipped; the batch keeps running.
fn print_json_event(event: &BatchEvent) {
    match json_line(event) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::warn!(error = %e, ?event, "Cannot serialize batch event"),
    }
}

fn json_line(event: &BatchEvent) -> serde_json::Result<String> {
    serde_json::to_string(event)
}

fn print_event(event: &BatchEvent) {
    match event {
        BatchEvent::Started { total } => println!("Converting {total} image(s)"),
        BatchEvent::ImageConverted {
            index,
            input,
            output,
            stats,
        } => println!(
            "[{index}] {} -> {} ({} contours, {} faces)",
            input.display(),
            output.display(),
            stats.contours,
            stats.face_count
        ),
        BatchEvent::ImageFailed {
            index,
            input,
            reason,
        } => eprintln!("[{index}] {} failed: {reason}", input.display()),
        BatchEvent::Progress { .. } => {}
        BatchEvent::Completed(report) => {
            println!(
                "Converted {}/{} image(s) in {} ms",
                report.converted, report.total, report.elapsed_ms
            );
            if let Some(last) = &report.last_output {
                println!("Last output: {}", last.display());
            }
        }
    }
}

fn inspect(path: &Path) -> Result<()> {
    let mesh = load_obj(path).with_context(|| format!("Cannot read '{}'", path.display()))?;

    println!("{}", path.display());
    println!("  vertices: {}", mesh.vertex_count());
    println!("  faces:    {}", mesh.face_count());
    match mesh.bounds() {
        Some(b) => println!(
            "  footprint: x {}..{}, z {}..{} ({} x {})",
            b.min_x,
            b.max_x,
            b.min_z,
            b.max_z,
            b.width(),
            b.depth()
        ),
        None => println!("  footprint: none (empty mesh)"),
    }
    Ok(())
}
