//! GLB/glTF loading
//!
//! A [`GlbAsset`] owns the parsed glTF document together with the payload of
//! the container's BIN chunk, if there was one.

use crate::error::{Error, Result};
use crate::files;
use crate::resource::GlbResource;
use gltf::json;
use std::path::{Path, PathBuf};

/// A loaded glTF document and its embedded GLB resource
#[derive(Debug)]
pub struct GlbAsset {
    /// The glTF JSON document
    pub document: json::Root,
    pub(crate) resource: Option<GlbResource>,
    pub(crate) base_dir: PathBuf,
}

impl GlbAsset {
    /// Load a binary glTF container from disk
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = files::read(path)?;
        let asset = Self::from_slice(&bytes, files::parent_dir(path))?;
        tracing::debug!(
            "Loaded {:?}: {} buffers, {} bytes embedded",
            path,
            asset.document.buffers.len(),
            asset.resource.as_ref().map_or(0, GlbResource::len)
        );
        Ok(asset)
    }

    /// Split an in-memory GLB container
    ///
    /// `base_dir` is used to resolve relative URIs of any additional buffers.
    pub fn from_slice(bytes: &[u8], base_dir: impl Into<PathBuf>) -> Result<Self> {
        let glb = gltf::Glb::from_slice(bytes)?;
        let document: json::Root = json::deserialize::from_slice(&glb.json)?;
        Self::from_parts(document, glb.bin.as_deref(), base_dir)
    }

    /// Pair a document with the payload of its BIN chunk.
    ///
    /// A BIN chunk must back buffer 0, and a buffer 0 without `uri` must
    /// have a BIN chunk.
    pub fn from_parts(
        document: json::Root,
        bin: Option<&[u8]>,
        base_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let resource = match bin {
            Some(bin) => Some(GlbResource::from_chunk(&document, bin)?),
            None if document.buffers.first().is_some_and(|b| b.uri.is_none()) => {
                return Err(Error::UnbackedBuffer(0));
            }
            None => None,
        };

        Ok(Self {
            document,
            resource,
            base_dir: base_dir.into(),
        })
    }

    /// Load a plain `.gltf` JSON document (no embedded resource)
    pub fn load_gltf(path: &Path) -> Result<Self> {
        let bytes = files::read(path)?;
        let document: json::Root = json::deserialize::from_slice(&bytes)?;
        Ok(Self {
            document,
            resource: None,
            base_dir: files::parent_dir(path),
        })
    }

    /// Directory the asset was loaded from
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}
