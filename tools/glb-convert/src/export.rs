//! Document export (.gltf JSON or .glb container) and buffer embedding

use crate::asset::GlbAsset;
use crate::error::{Error, Result};
use crate::files;
use crate::resource::{GlbResource, load_buffer};
use gltf::json;
use std::path::Path;

/// GLB chunk type "JSON"
const CHUNK_JSON: u32 = 0x4E4F534A;
/// GLB chunk type "BIN\0"
const CHUNK_BIN: u32 = 0x004E4942;

impl GlbAsset {
    /// Export the document, choosing the format from the file extension.
    ///
    /// `.gltf` writes pretty-printed JSON and requires every buffer to be
    /// external. `.glb` writes a binary container carrying the embedded
    /// resource as its BIN chunk.
    pub fn export(&self, path: &Path) -> Result<()> {
        match files::extension(path).as_deref() {
            Some("gltf") => self.export_gltf(path),
            Some("glb") => self.export_glb(path),
            _ => Err(Error::UnsupportedExtension(path.to_path_buf())),
        }
    }

    fn export_gltf(&self, path: &Path) -> Result<()> {
        if self.resource.is_some() {
            return Err(Error::EmbeddedResource);
        }
        if let Some(index) = self.document.buffers.iter().position(|b| b.uri.is_none()) {
            return Err(Error::UnbackedBuffer(index));
        }

        let json = json::serialize::to_vec_pretty(&self.document)?;
        files::write(path, &json)?;
        tracing::info!("Exported glTF document -> {:?}", path);
        Ok(())
    }

    fn export_glb(&self, path: &Path) -> Result<()> {
        let glb = self.to_glb_vec()?;
        files::write(path, &glb)?;
        tracing::info!("Exported GLB container ({} bytes) -> {:?}", glb.len(), path);
        Ok(())
    }

    /// Serialize the asset as an in-memory GLB container.
    ///
    /// Only buffer 0 may lack a `uri`, and only while the asset holds a GLB
    /// resource to fill the BIN chunk.
    pub fn to_glb_vec(&self) -> Result<Vec<u8>> {
        let unbacked = self
            .document
            .buffers
            .iter()
            .enumerate()
            .find(|(index, buffer)| {
                buffer.uri.is_none() && (*index > 0 || self.resource.is_none())
            });
        if let Some((index, _)) = unbacked {
            return Err(Error::UnbackedBuffer(index));
        }

        assemble_glb(&self.document, self.resource.as_ref().map(GlbResource::data))
    }

    /// Merge every buffer into a single embedded GLB resource.
    ///
    /// Buffers are concatenated at 4-byte aligned offsets and every buffer
    /// view is rebased onto the merged buffer 0. On error the asset is left
    /// untouched.
    pub fn embed_buffers(&mut self) -> Result<()> {
        if self.document.buffers.is_empty() {
            return Ok(());
        }

        let mut blob = Vec::new();
        let mut offsets = Vec::with_capacity(self.document.buffers.len());
        for (index, buffer) in self.document.buffers.iter().enumerate() {
            let data = load_buffer(index, buffer, &self.base_dir, self.resource.as_ref())?;
            align_buffer(&mut blob);
            offsets.push(blob.len() as u64);
            tracing::debug!(
                "Embedding buffer {} ({} bytes) at offset {}",
                index,
                data.len(),
                blob.len()
            );
            blob.extend_from_slice(&data);
        }

        let rebased = self
            .document
            .buffer_views
            .iter()
            .enumerate()
            .map(|(view_index, view)| {
                let source = view.buffer.value();
                let base = offsets.get(source).ok_or(Error::MissingBuffer {
                    view: view_index,
                    buffer: source,
                })?;
                Ok(base + view.byte_offset.map_or(0, |o| o.0))
            })
            .collect::<Result<Vec<u64>>>()?;

        for (view, offset) in self.document.buffer_views.iter_mut().zip(rebased) {
            view.buffer = json::Index::new(0);
            view.byte_offset = Some(offset.into());
        }

        let name = self.document.buffers[0].name.clone();
        self.document.buffers = vec![json::Buffer {
            byte_length: blob.len().into(),
            extensions: Default::default(),
            extras: Default::default(),
            name,
            uri: None,
        }];
        self.resource = Some(GlbResource::new(blob));

        Ok(())
    }
}

/// Align buffer to 4-byte boundary
pub(crate) fn align_buffer(buffer: &mut Vec<u8>) {
    while !buffer.len().is_multiple_of(4) {
        buffer.push(0);
    }
}

/// Container length for the given padded chunk lengths
fn container_length(json_chunk_length: usize, bin_chunk_length: Option<usize>) -> Result<u32> {
    let total = json_chunk_length
        .saturating_add(12 + 8)
        .saturating_add(bin_chunk_length.map_or(0, |len| len.saturating_add(8)));
    u32::try_from(total).map_err(|_| Error::ContainerTooLarge(total))
}

/// Assemble GLB binary from JSON and optional BIN chunk data
pub(crate) fn assemble_glb(root: &json::Root, bin: Option<&[u8]>) -> Result<Vec<u8>> {
    let json_bytes = json::serialize::to_vec(root)?;

    // Pad JSON to 4-byte alignment
    let json_padding = (4 - (json_bytes.len() % 4)) % 4;
    let json_chunk_length = json_bytes.len() + json_padding;

    // Pad buffer to 4-byte alignment
    let bin_padding = bin.map_or(0, |b| (4 - (b.len() % 4)) % 4);
    let bin_chunk_length = bin.map(|b| b.len() + bin_padding);

    // Both chunk lengths are bounded by the total, so they fit in u32 too
    let total_length = container_length(json_chunk_length, bin_chunk_length)?;

    let mut glb = Vec::with_capacity(total_length as usize);

    // GLB header
    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes()); // version
    glb.extend_from_slice(&total_length.to_le_bytes());

    // JSON chunk
    glb.extend_from_slice(&(json_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    glb.extend_from_slice(&json_bytes);
    glb.extend(std::iter::repeat_n(0x20u8, json_padding)); // pad with spaces

    // Binary chunk
    if let (Some(bin), Some(bin_chunk_length)) = (bin, bin_chunk_length) {
        glb.extend_from_slice(&(bin_chunk_length as u32).to_le_bytes());
        glb.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        glb.extend_from_slice(bin);
        glb.extend(std::iter::repeat_n(0u8, bin_padding)); // pad with zeros
    }

    Ok(glb)
}
