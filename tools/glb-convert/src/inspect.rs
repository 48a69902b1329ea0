//! Container inspection (`glb-convert info`)

use crate::error::Result;
use crate::files;
use gltf::json;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    Json,
    Bin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkInfo {
    pub kind: ChunkKind,
    pub length: usize,
}

/// Where a buffer's bytes live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferSource {
    /// The container's BIN chunk
    Glb,
    DataUri,
    File(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferInfo {
    pub index: usize,
    pub byte_length: u64,
    pub source: BufferSource,
}

/// Summary of a GLB container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInfo {
    pub version: u32,
    pub length: u32,
    pub chunks: Vec<ChunkInfo>,
    pub buffers: Vec<BufferInfo>,
    pub meshes: usize,
    pub nodes: usize,
    pub materials: usize,
    pub images: usize,
    pub animations: usize,
    pub skins: usize,
    pub scenes: usize,
}

pub fn inspect(path: &Path) -> Result<ContainerInfo> {
    let bytes = files::read(path)?;
    inspect_slice(&bytes)
}

pub fn inspect_slice(bytes: &[u8]) -> Result<ContainerInfo> {
    let glb = gltf::Glb::from_slice(bytes)?;
    let document: json::Root = json::deserialize::from_slice(&glb.json)?;

    let mut chunks = vec![ChunkInfo {
        kind: ChunkKind::Json,
        length: glb.json.len(),
    }];
    if let Some(bin) = &glb.bin {
        chunks.push(ChunkInfo {
            kind: ChunkKind::Bin,
            length: bin.len(),
        });
    }

    let buffers = document
        .buffers
        .iter()
        .enumerate()
        .map(|(index, buffer)| BufferInfo {
            index,
            byte_length: buffer.byte_length.0,
            source: match buffer.uri.as_deref() {
                None => BufferSource::Glb,
                Some(uri) if uri.starts_with("data:") => BufferSource::DataUri,
                Some(uri) => BufferSource::File(uri.to_string()),
            },
        })
        .collect();

    Ok(ContainerInfo {
        version: glb.header.version,
        length: glb.header.length,
        chunks,
        buffers,
        meshes: document.meshes.len(),
        nodes: document.nodes.len(),
        materials: document.materials.len(),
        images: document.images.len(),
        animations: document.animations.len(),
        skins: document.skins.len(),
        scenes: document.scenes.len(),
    })
}

impl ContainerInfo {
    pub fn log(&self, path: &Path) {
        tracing::info!(
            "{:?}: GLB v{}, {} bytes",
            path,
            self.version,
            self.length
        );

        tracing::info!("Chunks:");
        for chunk in &self.chunks {
            tracing::info!("  {:?}: {} bytes", chunk.kind, chunk.length);
        }

        tracing::info!("Buffers:");
        for buffer in &self.buffers {
            let source = match &buffer.source {
                BufferSource::Glb => "GLB resource".to_string(),
                BufferSource::DataUri => "data uri".to_string(),
                BufferSource::File(uri) => format!("file {:?}", uri),
            };
            tracing::info!("  [{}] {} bytes, {}", buffer.index, buffer.byte_length, source);
        }

        tracing::info!(
            "{} meshes, {} nodes, {} materials, {} images, {} animations, {} skins, {} scenes",
            self.meshes,
            self.nodes,
            self.materials,
            self.images,
            self.animations,
            self.skins,
            self.scenes
        );
    }
}
