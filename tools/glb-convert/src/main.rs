//! glb-convert - glTF resource converter
//!
//! Splits GLB containers into a .gltf document and an external .bin
//! resource, and packs them back into a single .glb.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use glb_convert::{convert, inspect, manifest};

#[derive(Parser)]
#[command(name = "glb-convert")]
#[command(about = "glTF binary container converter")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a .glb into a .gltf document and an external .bin resource
    Unpack {
        /// Input GLB file
        input: PathBuf,

        /// Output directory (default: next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Resource file name (default: <input stem>.bin)
        #[arg(long)]
        bin: Option<String>,

        /// Document file name (default: <input stem>.gltf)
        #[arg(long)]
        gltf: Option<String>,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Embed a .gltf document and its buffers into a single .glb
    Pack {
        /// Input glTF file
        input: PathBuf,

        /// Output .glb file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Show the chunks and buffers of a .glb
    Info {
        /// Input GLB file
        input: PathBuf,
    },

    /// Run all jobs from a manifest file
    Build {
        /// Path to glb-convert.toml manifest
        #[arg(default_value = manifest::MANIFEST_FILE)]
        manifest: PathBuf,

        /// Output directory for unpack jobs (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Validate manifest without building
    Check {
        /// Path to glb-convert.toml manifest
        #[arg(default_value = manifest::MANIFEST_FILE)]
        manifest: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Unpack {
            input,
            output,
            bin,
            gltf,
            force,
        } => {
            tracing::info!("Unpacking {:?}", input);
            let options = convert::UnpackOptions {
                output_dir: output,
                resource_name: bin,
                document_name: gltf,
                overwrite: force,
            };
            let report = convert::unpack(&input, &options)
                .with_context(|| format!("Failed to unpack {}", input.display()))?;
            match &report.resource {
                Some(resource) => tracing::info!(
                    "Done! {:?} references {:?} ({} bytes)",
                    report.document,
                    resource.uri,
                    resource.byte_length
                ),
                None => tracing::info!("Done! {:?} (no binary resource)", report.document),
            }
        }

        Commands::Pack {
            input,
            output,
            force,
        } => {
            tracing::info!("Packing {:?}", input);
            let report = convert::pack(&input, output.as_deref(), force)
                .with_context(|| format!("Failed to pack {}", input.display()))?;
            tracing::info!(
                "Done! {:?}: {} buffers merged, {} bytes",
                report.output,
                report.buffer_count,
                report.byte_length
            );
        }

        Commands::Info { input } => {
            let info = inspect::inspect(&input)
                .with_context(|| format!("Failed to inspect {}", input.display()))?;
            info.log(&input);
        }

        Commands::Build {
            manifest,
            output,
            force,
        } => {
            tracing::info!("Building from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::build_all(&config, output.as_deref(), force)?;
            tracing::info!("Build complete!");
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }
    }

    Ok(())
}
