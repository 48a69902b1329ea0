//! GLTF JSON structure building.

use super::mesh_data::{TRIANGLE_INDICES, TRIANGLE_POSITIONS, compute_bounds};
use gltf_json as json;
use json::validation::Checked::Valid;

/// Where the triangle's bytes live
pub(crate) enum BufferLayout {
    /// One URI-less buffer (GLB BIN chunk): positions then indices
    Embedded { byte_length: usize },
    /// One external buffer with the same layout as `Embedded`
    External { uri: String, byte_length: usize },
    /// Positions in buffer 0, indices in buffer 1
    Split {
        positions_uri: String,
        positions_length: usize,
        indices_uri: String,
        indices_length: usize,
    },
}

fn buffer(uri: Option<String>, byte_length: usize) -> json::Buffer {
    json::Buffer {
        byte_length: byte_length.into(),
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        uri,
    }
}

fn view(
    buffer: u32,
    offset: usize,
    length: usize,
    target: json::buffer::Target,
) -> json::buffer::View {
    json::buffer::View {
        buffer: json::Index::new(buffer),
        byte_length: length.into(),
        byte_offset: Some(offset.into()),
        byte_stride: None,
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        target: Some(Valid(target)),
    }
}

/// Build the triangle document for the given buffer layout
pub(crate) fn build_triangle_json(layout: BufferLayout) -> json::Root {
    const POSITIONS_LENGTH: usize = TRIANGLE_POSITIONS.len() * 12;
    const INDICES_LENGTH: usize = TRIANGLE_INDICES.len() * 2;

    let (buffers, buffer_views) = match layout {
        BufferLayout::Embedded { byte_length } => (
            vec![buffer(None, byte_length)],
            vec![
                view(0, 0, POSITIONS_LENGTH, json::buffer::Target::ArrayBuffer),
                view(
                    0,
                    POSITIONS_LENGTH,
                    INDICES_LENGTH,
                    json::buffer::Target::ElementArrayBuffer,
                ),
            ],
        ),
        BufferLayout::External { uri, byte_length } => (
            vec![buffer(Some(uri), byte_length)],
            vec![
                view(0, 0, POSITIONS_LENGTH, json::buffer::Target::ArrayBuffer),
                view(
                    0,
                    POSITIONS_LENGTH,
                    INDICES_LENGTH,
                    json::buffer::Target::ElementArrayBuffer,
                ),
            ],
        ),
        BufferLayout::Split {
            positions_uri,
            positions_length,
            indices_uri,
            indices_length,
        } => (
            vec![
                buffer(Some(positions_uri), positions_length),
                buffer(Some(indices_uri), indices_length),
            ],
            vec![
                view(0, 0, POSITIONS_LENGTH, json::buffer::Target::ArrayBuffer),
                view(1, 0, INDICES_LENGTH, json::buffer::Target::ElementArrayBuffer),
            ],
        ),
    };

    let (min, max) = compute_bounds(&TRIANGLE_POSITIONS);
    let accessors = vec![
        json::Accessor {
            buffer_view: Some(json::Index::new(0)),
            byte_offset: Some(0u64.into()),
            count: TRIANGLE_POSITIONS.len().into(),
            component_type: Valid(json::accessor::GenericComponentType(
                json::accessor::ComponentType::F32,
            )),
            extensions: Default::default(),
            extras: Default::default(),
            type_: Valid(json::accessor::Type::Vec3),
            min: Some(json::Value::Array(
                min.into_iter().map(json::Value::from).collect(),
            )),
            max: Some(json::Value::Array(
                max.into_iter().map(json::Value::from).collect(),
            )),
            name: None,
            normalized: false,
            sparse: None,
        },
        json::Accessor {
            buffer_view: Some(json::Index::new(1)),
            byte_offset: Some(0u64.into()),
            count: TRIANGLE_INDICES.len().into(),
            component_type: Valid(json::accessor::GenericComponentType(
                json::accessor::ComponentType::U16,
            )),
            extensions: Default::default(),
            extras: Default::default(),
            type_: Valid(json::accessor::Type::Scalar),
            min: None,
            max: None,
            name: None,
            normalized: false,
            sparse: None,
        },
    ];

    let mut attributes = std::collections::BTreeMap::new();
    attributes.insert(Valid(json::mesh::Semantic::Positions), json::Index::new(0));

    let meshes = vec![json::Mesh {
        extensions: Default::default(),
        extras: Default::default(),
        name: Some("Triangle".to_string()),
        primitives: vec![json::mesh::Primitive {
            attributes,
            extensions: Default::default(),
            extras: Default::default(),
            indices: Some(json::Index::new(1)),
            material: None,
            mode: Valid(json::mesh::Mode::Triangles),
            targets: None,
        }],
        weights: None,
    }];

    let nodes = vec![json::Node {
        camera: None,
        children: None,
        extensions: Default::default(),
        extras: Default::default(),
        matrix: None,
        mesh: Some(json::Index::new(0)),
        name: Some("Triangle".to_string()),
        rotation: None,
        scale: None,
        translation: None,
        skin: None,
        weights: None,
    }];

    let scenes = vec![json::Scene {
        extensions: Default::default(),
        extras: Default::default(),
        name: Some("TestScene".to_string()),
        nodes: vec![json::Index::new(0)],
    }];

    json::Root {
        accessors,
        animations: Vec::new(),
        asset: json::Asset {
            copyright: None,
            extensions: Default::default(),
            extras: Default::default(),
            generator: Some("glb-convert-test".to_string()),
            min_version: None,
            version: "2.0".to_string(),
        },
        buffers,
        buffer_views,
        cameras: Vec::new(),
        extensions: Default::default(),
        extras: Default::default(),
        extensions_required: Vec::new(),
        extensions_used: Vec::new(),
        images: Vec::new(),
        materials: Vec::new(),
        meshes,
        nodes,
        samplers: Vec::new(),
        scene: Some(json::Index::new(0)),
        scenes,
        skins: Vec::new(),
        textures: Vec::new(),
    }
}
