//! Buffer resources: the embedded GLB blob, external files and data URIs

use crate::asset::GlbAsset;
use crate::error::{Error, Result};
use crate::files;
use base64::Engine;
use gltf::json;
use std::fmt::Write;
use std::path::{Component, Path, PathBuf};

/// Payload of a GLB container's BIN chunk, backing buffer 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlbResource {
    data: Vec<u8>,
}

impl GlbResource {
    pub(crate) fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Bind a BIN chunk to buffer 0, dropping the chunk's alignment padding
    pub(crate) fn from_chunk(document: &json::Root, bin: &[u8]) -> Result<Self> {
        let buffer = document
            .buffers
            .first()
            .ok_or(Error::UnboundChunk("is missing"))?;
        if buffer.uri.is_some() {
            return Err(Error::UnboundChunk("has a uri"));
        }

        let expected = buffer.byte_length.0 as usize;
        if bin.len() < expected {
            return Err(Error::BufferTooShort {
                index: 0,
                expected,
                actual: bin.len(),
            });
        }

        Ok(Self::new(bin[..expected].to_vec()))
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A buffer that was written out as a standalone file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResource {
    /// URI stored in the document, relative to the exported .gltf
    pub uri: String,
    /// Location the bytes were written to
    pub path: PathBuf,
    pub byte_length: usize,
}

impl GlbAsset {
    /// The embedded GLB resource, if the container had a BIN chunk
    pub fn glb_resource(&self) -> Option<&GlbResource> {
        self.resource.as_ref()
    }

    /// Write the embedded resource to `out_dir/resource_name` and point buffer 0 at it.
    ///
    /// `resource_name` is stored as a URI relative to `out_dir`, so the
    /// document must be exported into the same directory.
    pub fn convert_to_file_resource(
        &mut self,
        resource_name: &str,
        out_dir: &Path,
    ) -> Result<FileResource> {
        let uri = resource_uri(resource_name)?;
        let resource = self.resource.as_ref().ok_or(Error::NoGlbResource)?;

        let path = out_dir.join(resource_name);
        files::write(&path, resource.data())?;
        let byte_length = resource.len();

        let buffer = self
            .document
            .buffers
            .first_mut()
            .ok_or(Error::NoGlbResource)?;
        buffer.uri = Some(uri.clone());
        self.resource = None;

        tracing::info!("Wrote GLB resource ({} bytes) -> {:?}", byte_length, path);

        Ok(FileResource {
            uri,
            path,
            byte_length,
        })
    }
}

/// Build the relative URI for a resource file name.
///
/// Path components are joined with `/` and everything outside the RFC 3986
/// unreserved set is percent-encoded.
pub fn resource_uri(name: &str) -> Result<String> {
    let invalid = || Error::InvalidResourceName(name.to_string());

    let mut segments = Vec::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(segment) => {
                let segment = segment.to_str().ok_or_else(invalid)?;
                segments.push(percent_encode(segment));
            }
            Component::CurDir => {}
            _ => return Err(invalid()),
        }
    }

    if segments.is_empty() {
        return Err(invalid());
    }
    Ok(segments.join("/"))
}

/// Resolve a relative file URI against `base_dir`.
///
/// Returns `None` for URIs with a scheme (`data:`, `http:`, ...) or with
/// malformed percent escapes.
pub fn resolve_uri(uri: &str, base_dir: &Path) -> Option<PathBuf> {
    if has_scheme(uri) || uri.starts_with('/') {
        return None;
    }
    let decoded = percent_decode(uri)?;
    Some(base_dir.join(decoded))
}

/// Read the bytes backing `buffer`, truncated to its declared length
pub fn load_buffer(
    index: usize,
    buffer: &json::Buffer,
    base_dir: &Path,
    embedded: Option<&GlbResource>,
) -> Result<Vec<u8>> {
    let mut data = match buffer.uri.as_deref() {
        None => embedded
            .filter(|_| index == 0)
            .map(|resource| resource.data().to_vec())
            .ok_or(Error::NoGlbResource)?,
        Some(uri) if uri.starts_with("data:") => decode_data_uri(index, uri)?,
        Some(uri) => {
            let path = resolve_uri(uri, base_dir).ok_or_else(|| Error::UnsupportedUri {
                index,
                uri: uri.to_string(),
            })?;
            files::read(&path)?
        }
    };

    let expected = buffer.byte_length.0 as usize;
    if data.len() < expected {
        return Err(Error::BufferTooShort {
            index,
            expected,
            actual: data.len(),
        });
    }
    data.truncate(expected);
    Ok(data)
}

fn decode_data_uri(index: usize, uri: &str) -> Result<Vec<u8>> {
    let unsupported = || Error::UnsupportedUri {
        index,
        uri: uri.to_string(),
    };

    let (header, payload) = uri.split_once(',').ok_or_else(unsupported)?;
    if !header.ends_with(";base64") {
        return Err(unsupported());
    }

    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|source| Error::InvalidDataUri { index, source })
}

fn has_scheme(uri: &str) -> bool {
    match uri.split_once(':') {
        Some((scheme, _)) => {
            scheme.len() > 1
                && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

fn percent_encode(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            encoded.push(byte as char);
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}

fn percent_decode(uri: &str) -> Option<String> {
    let bytes = uri.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            if !hex.iter().all(u8::is_ascii_hexdigit) {
                return None;
            }
            decoded.push(u8::from_str_radix(std::str::from_utf8(hex).ok()?, 16).ok()?);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(decoded).ok()
}
