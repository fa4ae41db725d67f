//! glTF documents to scene nodes.
//!
//! Fetching is left to the caller: parse the document, ask it which buffers it
//! needs, load those, then convert. Each primitive becomes a mesh; a mesh with
//! a single primitive is stored directly on its node, otherwise the node gets
//! one child per primitive named `<mesh>_<i>`.

use crate::error::ImportError;
use crate::scene::{Material, Mesh, SceneNode, Transform};
use glam::{Quat, Vec3};

/// Where a buffer's bytes come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BufferSource {
    /// The GLB binary chunk.
    Blob,
    /// A URI relative to the document (may be a `data:` URI).
    Uri(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BufferRequest {
    pub index: usize,
    pub source: BufferSource,
    pub byte_length: usize,
}

pub struct GltfAsset {
    gltf: gltf::Gltf,
}

impl GltfAsset {
    /// Parse `.gltf` JSON or `.glb` binary.
    pub fn parse(bytes: &[u8]) -> Result<Self, ImportError> {
        Ok(Self {
            gltf: gltf::Gltf::from_slice(bytes)?,
        })
    }

    pub fn buffer_requests(&self) -> Vec<BufferRequest> {
        self.gltf
            .buffers()
            .map(|b| BufferRequest {
                index: b.index(),
                source: match b.source() {
                    gltf::buffer::Source::Bin => BufferSource::Blob,
                    gltf::buffer::Source::Uri(uri) => BufferSource::Uri(uri.to_string()),
                },
                byte_length: b.length(),
            })
            .collect()
    }

    pub fn blob(&self) -> Option<&[u8]> {
        self.gltf.blob.as_deref()
    }

    /// Convert the default scene (or the first one) into a node tree.
    /// `buffers[i]` holds the bytes of buffer `i`.
    pub fn to_scene_node(&self, buffers: &[Vec<u8>]) -> Result<SceneNode, ImportError> {
        for req in self.buffer_requests() {
            let data = buffers
                .get(req.index)
                .ok_or(ImportError::MissingBuffer { index: req.index })?;
            if data.len() < req.byte_length {
                return Err(ImportError::BufferTooShort {
                    index: req.index,
                    expected: req.byte_length,
                    actual: data.len(),
                });
            }
        }
        let doc = &self.gltf.document;
        let scene = doc
            .default_scene()
            .or_else(|| doc.scenes().next())
            .ok_or(ImportError::NoScene)?;
        let mut root = SceneNode::group(scene.name().unwrap_or(""));
        for node in scene.nodes() {
            root.add_child(convert_node(&node, buffers)?);
        }
        Ok(root)
    }
}

fn convert_node(node: &gltf::Node, buffers: &[Vec<u8>]) -> Result<SceneNode, ImportError> {
    let name = node.name().unwrap_or("");
    let (t, r, s) = node.transform().decomposed();
    let transform = Transform {
        translation: Vec3::from_array(t),
        rotation: Quat::from_array(r),
        scale: Vec3::from_array(s),
    };

    let mut out = match node.mesh() {
        Some(mesh) => {
            let mesh_name = mesh.name().unwrap_or("");
            let mut meshes = Vec::new();
            for (i, prim) in mesh.primitives().enumerate() {
                if prim.mode() != gltf::mesh::Mode::Triangles {
                    log::debug!("[gltf] skipping {:?} primitive in `{}`", prim.mode(), mesh_name);
                    continue;
                }
                meshes.push(convert_primitive(&prim, mesh_name, i, buffers)?);
            }
            if meshes.len() == 1 {
                SceneNode::mesh(name, meshes.remove(0))
            } else {
                let mut group = SceneNode::group(name);
                for (i, m) in meshes.into_iter().enumerate() {
                    group.add_child(SceneNode::mesh(format!("{mesh_name}_{i}"), m));
                }
                group
            }
        }
        None => SceneNode::group(name),
    };
    out.transform = transform;

    for child in node.children() {
        out.add_child(convert_node(&child, buffers)?);
    }
    Ok(out)
}

fn convert_primitive(
    prim: &gltf::Primitive,
    mesh_name: &str,
    index: usize,
    buffers: &[Vec<u8>],
) -> Result<Mesh, ImportError> {
    let reader = prim.reader(|b| buffers.get(b.index()).map(|d| d.as_slice()));
    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .ok_or_else(|| ImportError::MissingPositions {
            mesh: mesh_name.to_string(),
            primitive: index,
        })?
        .collect();
    let normals = reader.read_normals().map(|n| n.collect::<Vec<[f32; 3]>>());
    let indices = reader
        .read_indices()
        .map(|i| i.into_u32().collect::<Vec<u32>>());

    let pbr = prim.material().pbr_metallic_roughness();
    let [r, g, b, _a] = pbr.base_color_factor();
    let material = Material {
        color: [r, g, b],
        metalness: pbr.metallic_factor(),
        roughness: pbr.roughness_factor(),
    };
    Ok(Mesh::new(positions, normals, indices, material))
}
