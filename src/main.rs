//! n3d CLI - Command-line tool for N3D game asset containers.
//!
//! This is the main entry point for the n3d command-line application.

mod raster;
mod sink;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use n3d::prelude::*;

use crate::raster::PngEncoder;
use crate::sink::DirectorySink;

/// n3d - N3D container extraction tool
#[derive(Parser)]
#[command(name = "n3d")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log detected offsets and sizes
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and convert the segments of a container
    Extract {
        /// Path to the .n3dhdr or .n3ddta file, or the shared stem
        #[arg(short, long, env = "N3D_INPUT")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, env = "N3D_OUTPUT", default_value = "processed")]
        output: PathBuf,

        /// Write textures as PNG instead of DDS
        #[arg(long)]
        convert_images: bool,

        /// Do not write raw segment files
        #[arg(long)]
        no_segments: bool,

        /// Write manifest.json describing every segment
        #[arg(long)]
        manifest: bool,
    },

    /// List the segments of a container
    List {
        /// Path to the .n3dhdr or .n3ddta file, or the shared stem
        #[arg(short, long, env = "N3D_INPUT")]
        input: PathBuf,
    },

    /// Build a container from extracted segments
    Create {
        /// Output container path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Extract {
            input,
            output,
            convert_images,
            no_segments,
            manifest,
        } => {
            let options = ExtractOptions {
                format: if convert_images {
                    OutputFormat::Raster
                } else {
                    OutputFormat::Dds
                },
                archive_raw: !no_segments,
            };
            cmd_extract(&input, &output, options, manifest)?;
        }
        Commands::List { input } => {
            cmd_list(&input)?;
        }
        Commands::Create { output } => {
            cmd_create(&output)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn cmd_extract(
    input: &Path,
    output: &Path,
    options: ExtractOptions,
    manifest: bool,
) -> Result<()> {
    let start = Instant::now();
    let archive = N3dArchive::open(input)
        .with_context(|| format!("Failed to open container {}", input.display()))?;

    println!(
        "Loaded {} ({} segments) in {:?}",
        archive.name(),
        archive.segment_count(),
        start.elapsed()
    );

    let root = output.join(archive.name());
    let pb = ProgressBar::new(archive.segment_count() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let mut sink = DirectorySink::create(&root)
        .with_context(|| format!("Failed to create output directory {}", root.display()))?
        .with_progress(pb.clone());

    let mut extractor = Extractor::new(options);
    if options.format == OutputFormat::Raster {
        extractor = extractor.with_raster_encoder(Box::new(PngEncoder));
    }

    let start = Instant::now();
    let report = extractor
        .run(&archive, &mut sink)
        .context("Extraction failed")?;
    pb.finish_with_message("Done");

    if manifest {
        let path = root.join("manifest.json");
        let json = report.to_json().context("Failed to serialize manifest")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    println!(
        "Extracted {} segments to {} in {:?} ({} converted, {} with warnings, {} failed)",
        report.segments.len(),
        root.display(),
        start.elapsed(),
        report.converted(),
        report.warnings(),
        report.failed()
    );

    Ok(())
}

fn cmd_list(input: &Path) -> Result<()> {
    let archive = N3dArchive::open(input)
        .with_context(|| format!("Failed to open container {}", input.display()))?;

    let count = write_listing(&archive, &mut io::stdout().lock())?;
    println!("\nTotal: {} segments", count);

    Ok(())
}

/// Write one line per segment. Segments outside the data file are logged
/// and skipped; the returned count includes them.
fn write_listing<W: Write>(archive: &N3dArchive, out: &mut W) -> Result<usize> {
    let mut count = 0;
    for segment in archive.segments() {
        match segment {
            Ok(segment) => {
                let descriptor = segment.descriptor();
                writeln!(
                    out,
                    "{:>5} {} {:>#10x} {:>10} {}",
                    descriptor.index(),
                    segment.kind(),
                    descriptor.offset(),
                    descriptor.length(),
                    descriptor.name()
                )?;
            }
            Err(e) if !e.is_fatal() => {
                tracing::warn!(index = count, "skipping segment: {e}");
            }
            Err(e) => return Err(e).context("Failed to read segment table"),
        }
        count += 1;
    }

    Ok(count)
}

fn cmd_create(output: &Path) -> Result<()> {
    anyhow::bail!(
        "Creating containers is not implemented (requested {})",
        output.display()
    )
}
