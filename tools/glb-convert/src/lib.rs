//! glb-convert library
//!
//! Moves glTF buffers between GLB containers and standalone files:
//! `unpack` turns a .glb into a .gltf document plus an external .bin
//! resource, `pack` embeds a .gltf and its buffers back into a .glb.

pub mod asset;
pub mod convert;
pub mod error;
mod export;
mod files;
pub mod inspect;
pub mod manifest;
pub mod resource;

pub use asset::GlbAsset;
pub use convert::{PackReport, UnpackOptions, UnpackReport, UnpackTargets, pack, unpack};
pub use error::{Error, Result};
pub use inspect::{ContainerInfo, inspect};
pub use resource::{FileResource, GlbResource, resource_uri};
