//! Conversion pipelines
//!
//! `unpack` is the GLB -> glTF + .bin sequence (load, get-resource,
//! convert-to-file-resource, export). `pack` runs it in reverse.

use crate::asset::GlbAsset;
use crate::error::{Error, Result};
use crate::files;
use crate::resource::{FileResource, resource_uri};
use std::path::{Component, Path, PathBuf};

/// Options for [`unpack`]
#[derive(Debug, Clone, Default)]
pub struct UnpackOptions {
    /// Output directory (default: the input's directory)
    pub output_dir: Option<PathBuf>,
    /// Resource file name, relative to the output directory (default: `<stem>.bin`)
    pub resource_name: Option<String>,
    /// Document file name, relative to the output directory (default: `<stem>.gltf`)
    pub document_name: Option<String>,
    /// Replace existing output files
    pub overwrite: bool,
}

/// Resolved output locations of an unpack job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackTargets {
    pub output_dir: PathBuf,
    pub resource_name: String,
    pub resource_path: PathBuf,
    pub document_path: PathBuf,
}

impl UnpackOptions {
    /// Resolve default names and check them without touching the filesystem
    pub fn targets(&self, input: &Path) -> Result<UnpackTargets> {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model");

        let output_dir = self
            .output_dir
            .clone()
            .unwrap_or_else(|| files::parent_dir(input));
        let resource_name = self
            .resource_name
            .clone()
            .unwrap_or_else(|| format!("{stem}.bin"));
        let document_name = self
            .document_name
            .clone()
            .unwrap_or_else(|| format!("{stem}.gltf"));

        resource_uri(&resource_name)?;

        // The resource URI is relative to the document, so both share a directory
        let mut components = Path::new(&document_name).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            return Err(Error::InvalidDocumentName(document_name));
        }
        let document_path = output_dir.join(&document_name);
        if files::extension(&document_path).as_deref() != Some("gltf") {
            return Err(Error::UnsupportedExtension(document_path));
        }

        let resource_path = output_dir.join(&resource_name);
        if resource_path == document_path {
            return Err(Error::OutputCollision(resource_path));
        }

        Ok(UnpackTargets {
            resource_path,
            output_dir,
            resource_name,
            document_path,
        })
    }
}

/// Result of [`unpack`]
#[derive(Debug, Clone)]
pub struct UnpackReport {
    pub document: PathBuf,
    /// `None` when the container had no BIN chunk
    pub resource: Option<FileResource>,
}

/// Split a GLB container into a .gltf document and an external resource file
pub fn unpack(input: &Path, options: &UnpackOptions) -> Result<UnpackReport> {
    let targets = options.targets(input)?;
    let mut asset = GlbAsset::load(input)?;

    let has_resource = asset.glb_resource().is_some();
    if !options.overwrite {
        files::ensure_absent(&targets.document_path)?;
        if has_resource {
            files::ensure_absent(&targets.resource_path)?;
        }
    }

    let resource = if has_resource {
        Some(asset.convert_to_file_resource(&targets.resource_name, &targets.output_dir)?)
    } else {
        tracing::warn!("{:?} has no BIN chunk, exporting document only", input);
        None
    };

    warn_stale_uris(&asset, &targets.output_dir);
    asset.export(&targets.document_path)?;

    Ok(UnpackReport {
        document: targets.document_path,
        resource,
    })
}

/// Result of [`pack`]
#[derive(Debug, Clone)]
pub struct PackReport {
    pub output: PathBuf,
    /// Number of buffers merged into the BIN chunk
    pub buffer_count: usize,
    pub byte_length: usize,
}

/// Default output for [`pack`]: the input with a `.glb` extension
pub fn pack_target(input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("glb"));
    if files::extension(&output).as_deref() != Some("glb") {
        return Err(Error::UnsupportedExtension(output));
    }
    Ok(output)
}

/// Embed a .gltf document and its buffers into a single GLB container
pub fn pack(input: &Path, output: Option<&Path>, overwrite: bool) -> Result<PackReport> {
    let output = pack_target(input, output)?;
    if !overwrite {
        files::ensure_absent(&output)?;
    }

    let mut asset = GlbAsset::load_gltf(input)?;
    let buffer_count = asset.document.buffers.len();
    asset.embed_buffers()?;

    warn_stale_uris(&asset, &files::parent_dir(&output));
    asset.export(&output)?;

    Ok(PackReport {
        output,
        buffer_count,
        byte_length: asset.glb_resource().map_or(0, |r| r.len()),
    })
}

/// External references other than the converted buffer are kept verbatim and
/// break if the document lands in a different directory.
fn warn_stale_uris(asset: &GlbAsset, output_dir: &Path) {
    if asset.base_dir() == output_dir {
        return;
    }

    let buffer_uris = asset.document.buffers.iter().skip(1).filter_map(|b| b.uri.as_deref());
    let image_uris = asset.document.images.iter().filter_map(|i| i.uri.as_deref());
    for uri in buffer_uris.chain(image_uris) {
        if !uri.starts_with("data:") {
            tracing::warn!(
                "External reference {:?} is relative to {:?} and is not copied",
                uri,
                asset.base_dir()
            );
        }
    }
}
