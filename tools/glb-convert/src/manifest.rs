//! glb-convert.toml manifest parsing and batch builds
//!
//! ```toml
//! output = "out"
//!
//! [[unpack]]
//! input = "assets/pieces.glb"
//! bin = "BoxTextured.bin"
//! gltf = "BoxTextured.gltf"
//!
//! [[pack]]
//! input = "out/BoxTextured.gltf"
//! output = "out/BoxTextured.glb"
//! ```

use crate::convert::{self, UnpackOptions};
use crate::files;
use anyhow::{Context, Result, bail};
use hashbrown::HashSet;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default manifest file name
pub const MANIFEST_FILE: &str = "glb-convert.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Default output directory for unpack jobs
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub unpack: Vec<UnpackJob>,
    #[serde(default)]
    pub pack: Vec<PackJob>,

    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub root: PathBuf,
}

/// GLB -> .gltf + .bin
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnpackJob {
    pub input: PathBuf,
    /// Resource file name (default: `<stem>.bin`)
    #[serde(default)]
    pub bin: Option<String>,
    /// Document file name (default: `<stem>.gltf`)
    #[serde(default)]
    pub gltf: Option<String>,
    /// Output directory for this job (overrides the manifest default)
    #[serde(default)]
    pub output: Option<PathBuf>,
}

/// .gltf -> GLB
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackJob {
    pub input: PathBuf,
    /// Output .glb path (default: input with .glb extension)
    #[serde(default)]
    pub output: Option<PathBuf>,
}

/// A job with every path resolved
#[derive(Debug)]
enum PlannedJob {
    Unpack {
        input: PathBuf,
        options: UnpackOptions,
        outputs: Vec<PathBuf>,
    },
    Pack {
        input: PathBuf,
        output: PathBuf,
    },
}

/// Load manifest from file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
    parse_manifest(&content, &files::parent_dir(path))
}

/// Parse manifest from string, resolving relative paths against `root`
pub fn parse_manifest(content: &str, root: &Path) -> Result<Manifest> {
    let mut manifest: Manifest =
        toml::from_str(content).with_context(|| format!("Failed to parse {}", MANIFEST_FILE))?;
    manifest.root = root.to_path_buf();
    Ok(manifest)
}

impl Manifest {
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn plan(&self, output_override: Option<&Path>, overwrite: bool) -> Result<Vec<PlannedJob>> {
        let mut jobs = Vec::with_capacity(self.unpack.len() + self.pack.len());

        for (i, job) in self.unpack.iter().enumerate() {
            let input = self.resolve(&job.input);
            let output_dir = output_override
                .map(Path::to_path_buf)
                .or_else(|| job.output.as_deref().map(|p| self.resolve(p)))
                .or_else(|| self.output.as_deref().map(|p| self.resolve(p)));
            let options = UnpackOptions {
                output_dir,
                resource_name: job.bin.clone(),
                document_name: job.gltf.clone(),
                overwrite,
            };
            let targets = options
                .targets(&input)
                .with_context(|| format!("unpack job {} ({})", i, input.display()))?;

            jobs.push(PlannedJob::Unpack {
                input,
                options,
                outputs: vec![targets.document_path, targets.resource_path],
            });
        }

        for (i, job) in self.pack.iter().enumerate() {
            let input = self.resolve(&job.input);
            let requested = job.output.as_deref().map(|p| self.resolve(p));
            let output = convert::pack_target(&input, requested.as_deref())
                .with_context(|| format!("pack job {} ({})", i, input.display()))?;
            jobs.push(PlannedJob::Pack { input, output });
        }

        Ok(jobs)
    }
}

/// Validate manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    check_plan(&manifest.plan(None, false)?)
}

fn check_plan(jobs: &[PlannedJob]) -> Result<()> {
    if jobs.is_empty() {
        bail!("Manifest has no [[unpack]] or [[pack]] jobs");
    }

    let mut outputs: HashSet<&Path> = HashSet::new();
    let mut inputs: HashSet<&Path> = HashSet::new();
    for job in jobs {
        let (input, expected_ext, job_outputs) = match job {
            PlannedJob::Unpack {
                input,
                outputs: written,
                ..
            } => (input, "glb", written.as_slice()),
            PlannedJob::Pack { input, output } => (input, "gltf", std::slice::from_ref(output)),
        };

        if files::extension(input).as_deref() != Some(expected_ext) {
            bail!("Expected a .{} input: {}", expected_ext, input.display());
        }
        // Pack inputs may be produced by an earlier unpack job
        if !input.exists() && !outputs.contains(input.as_path()) {
            bail!("Input not found: {}", input.display());
        }

        inputs.insert(input.as_path());

        // Jobs run in order, so an output may only replace files no job has read yet
        for output in job_outputs {
            if inputs.contains(output.as_path()) {
                bail!("Output overwrites a job input: {}", output.display());
            }
            if !outputs.insert(output.as_path()) {
                bail!("Output written by more than one job: {}", output.display());
            }
        }
    }

    Ok(())
}

/// Run every job in manifest order, stopping at the first failure
pub fn build_all(
    manifest: &Manifest,
    output_override: Option<&Path>,
    overwrite: bool,
) -> Result<()> {
    let jobs = manifest.plan(output_override, overwrite)?;
    check_plan(&jobs)?;

    for job in &jobs {
        match job {
            PlannedJob::Unpack { input, options, .. } => {
                tracing::info!("Unpacking {:?}", input);
                let report = convert::unpack(input, options)
                    .with_context(|| format!("Failed to unpack {}", input.display()))?;
                tracing::info!("  -> {:?}", report.document);
            }
            PlannedJob::Pack { input, output } => {
                tracing::info!("Packing {:?}", input);
                convert::pack(input, Some(output), overwrite)
                    .with_context(|| format!("Failed to pack {}", input.display()))?;
                tracing::info!("  -> {:?}", output);
            }
        }
    }

    tracing::info!("Ran {} jobs", jobs.len());
    Ok(())
}
