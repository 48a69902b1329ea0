//! Programmatic glTF/GLB generation for integration tests.
//!
//! Every fixture is the same indexed triangle:
//! - POSITION accessor (3 × vec3 f32, 36 bytes)
//! - u16 index accessor (3 × u16, 6 bytes)
//!
//! The combined buffer is 42 bytes, so GLB fixtures always carry BIN chunk
//! padding.

#![allow(dead_code)]

mod document;
mod mesh_data;

use base64::Engine;
use document::{BufferLayout, build_triangle_json};
use glb_convert::GlbAsset;
use std::path::{Path, PathBuf};

pub use mesh_data::{TRIANGLE_INDICES, TRIANGLE_POSITIONS, index_bytes, position_bytes};

/// Bytes of the single-buffer layout (positions followed by indices)
pub fn triangle_bin() -> Vec<u8> {
    let mut bin = position_bytes();
    bin.extend_from_slice(&index_bytes());
    bin
}

/// Triangle GLB with both accessors in the BIN chunk
pub fn generate_triangle_glb() -> Vec<u8> {
    let bin = triangle_bin();
    let root = build_triangle_json(BufferLayout::Embedded {
        byte_length: bin.len(),
    });
    GlbAsset::from_parts(root, Some(&bin), PathBuf::new())
        .and_then(|asset| asset.to_glb_vec())
        .expect("Failed to assemble GLB")
}

/// Triangle GLB without a BIN chunk, referencing `uri` instead
pub fn generate_external_triangle_glb(uri: &str) -> Vec<u8> {
    let root = build_triangle_json(BufferLayout::External {
        uri: uri.to_string(),
        byte_length: triangle_bin().len(),
    });
    GlbAsset::from_parts(root, None, PathBuf::new())
        .and_then(|asset| asset.to_glb_vec())
        .expect("Failed to assemble GLB")
}

/// Drop the BIN chunk of a GLB, keeping the JSON chunk as is
pub fn strip_bin_chunk(glb: &[u8]) -> Vec<u8> {
    let json_len = u32::from_le_bytes(glb[12..16].try_into().unwrap()) as usize;
    let mut stripped = glb[..20 + json_len].to_vec();
    let total = stripped.len() as u32;
    stripped[8..12].copy_from_slice(&total.to_le_bytes());
    stripped
}

/// Write a .gltf that keeps positions in `positions.bin` and indices in a
/// base64 data URI. Returns the document path.
pub fn write_split_triangle_gltf(dir: &Path, name: &str) -> PathBuf {
    let positions = position_bytes();
    let indices = index_bytes();
    std::fs::write(dir.join("positions.bin"), &positions).expect("Failed to write positions.bin");

    let encoded = base64::engine::general_purpose::STANDARD.encode(&indices);
    let root = build_triangle_json(BufferLayout::Split {
        positions_uri: "positions.bin".to_string(),
        positions_length: positions.len(),
        indices_uri: format!("data:application/octet-stream;base64,{encoded}"),
        indices_length: indices.len(),
    });

    let path = dir.join(name);
    let json = gltf_json::serialize::to_string_pretty(&root).expect("Failed to serialize glTF");
    std::fs::write(&path, json).expect("Failed to write glTF");
    path
}
