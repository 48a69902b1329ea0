//! Library error type

use std::path::{Path, PathBuf};

/// Errors produced while loading, converting or exporting glTF assets
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The container header or chunk layout is malformed
    #[error("invalid GLB container: {0}")]
    Container(#[from] gltf::Error),

    #[error("invalid glTF JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A BIN chunk is present but buffer 0 cannot own it
    #[error("GLB has a BIN chunk but buffer 0 {0}")]
    UnboundChunk(&'static str),

    /// A URI-less buffer with no BIN chunk behind it
    #[error("buffer {0} has no uri and no GLB resource backs it")]
    UnbackedBuffer(usize),

    #[error("document has no embedded GLB resource")]
    NoGlbResource,

    #[error("document still embeds a GLB resource; convert it to a file resource first")]
    EmbeddedResource,

    #[error("invalid resource name {0:?}: expected a relative path without '..'")]
    InvalidResourceName(String),

    #[error("invalid document name {0:?}: expected a plain file name")]
    InvalidDocumentName(String),

    #[error("resource and document would both be written to {}", .0.display())]
    OutputCollision(PathBuf),

    #[error("unsupported output extension for {} (use .gltf or .glb)", .0.display())]
    UnsupportedExtension(PathBuf),

    #[error("buffer {index} has unsupported uri {uri:?}")]
    UnsupportedUri { index: usize, uri: String },

    #[error("buffer view {view} references missing buffer {buffer}")]
    MissingBuffer { view: usize, buffer: usize },

    #[error("buffer {index} declares {expected} bytes but only {actual} are available")]
    BufferTooShort {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("buffer {index} has a malformed data uri: {source}")]
    InvalidDataUri {
        index: usize,
        #[source]
        source: base64::DecodeError,
    },

    #[error("GLB container of {0} bytes exceeds the 4 GiB format limit")]
    ContainerTooLarge(usize),

    #[error("refusing to overwrite {} (use --force)", .0.display())]
    OutputExists(PathBuf),
}

impl Error {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
