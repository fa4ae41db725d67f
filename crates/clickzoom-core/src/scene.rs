//! Explicit scene tree: parents own their children, the `Scene` owns the root.
//!
//! Nodes are addressed by [`NodePath`] (child indices from the root), which is
//! stable for as long as the tree is not restructured. [`SceneIndex`] walks the
//! tree once in pre-order and records every node's world matrix plus a
//! name -> nodes map, so repeated name lookups never rescan the tree.

use crate::bounds::Aabb;
use crate::error::SceneError;
use fnv::FnvHashMap;
use glam::{Mat4, Quat, Vec3};
use smallvec::SmallVec;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Scene,
    Group,
    Mesh,
    HemisphereLight,
    DirectionalLight,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Scene => "Scene",
            NodeKind::Group => "Group",
            NodeKind::Mesh => "Mesh",
            NodeKind::HemisphereLight => "HemisphereLight",
            NodeKind::DirectionalLight => "DirectionalLight",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// sRGB-encoded channel in [0, 1] to linear.
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// `0xRRGGBB` (sRGB, as written in CSS) to linear RGB.
#[inline]
pub fn rgb_from_hex(hex: u32) -> [f32; 3] {
    let ch = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    [ch(16), ch(8), ch(0)]
}

/// Metallic-roughness surface; `color` is linear RGB.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            metalness: 0.0,
            roughness: 1.0,
        }
    }
}

impl Material {
    pub fn from_hex(hex: u32, metalness: f32, roughness: f32) -> Self {
        Self {
            color: rgb_from_hex(hex),
            metalness,
            roughness,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Light {
    Hemisphere {
        sky: [f32; 3],
        ground: [f32; 3],
        intensity: f32,
    },
    Directional {
        color: [f32; 3],
        intensity: f32,
    },
}

/// Identifies mesh geometry for GPU-side caching. Clones share the id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u64);

static NEXT_MESH_ID: AtomicU64 = AtomicU64::new(1);

impl MeshId {
    fn next() -> Self {
        MeshId(NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Indexed triangle geometry in node-local space.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub id: MeshId,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub material: Material,
    bounds: Aabb,
}

impl Mesh {
    /// Build a mesh. Missing indices become a plain triangle list; missing or
    /// mismatched normals are accumulated from face normals.
    pub fn new(
        positions: Vec<[f32; 3]>,
        normals: Option<Vec<[f32; 3]>>,
        indices: Option<Vec<u32>>,
        material: Material,
    ) -> Self {
        let indices = indices.unwrap_or_else(|| (0..positions.len() as u32).collect());
        let normals = match normals {
            Some(n) if n.len() == positions.len() => n,
            _ => vertex_normals(&positions, &indices),
        };
        let bounds = Aabb::from_points(positions.iter().map(|p| Vec3::from_array(*p)));
        Self {
            id: MeshId::next(),
            positions,
            normals,
            indices,
            material,
            bounds,
        }
    }

    /// Axis-aligned box of `size` centered on the local origin.
    pub fn cuboid(size: Vec3, material: Material) -> Self {
        let h = size * 0.5;
        // (normal, tangent u, tangent v) per face
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];
        let mut positions = Vec::with_capacity(24);
        let mut normals = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (n, u, v) in faces {
            let base = positions.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let p = (n + u * su + v * sv) * h;
                positions.push(p.to_array());
                normals.push(n.to_array());
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        Self::new(positions, Some(normals), Some(indices), material)
    }

    #[inline]
    pub fn local_bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Local-space triangles; a trailing partial triangle or out-of-range
    /// index is skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(move |tri| {
            let p = |i: u32| self.positions.get(i as usize).map(|v| Vec3::from_array(*v));
            Some([p(tri[0])?, p(tri[1])?, p(tri[2])?])
        })
    }
}

fn vertex_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let (ia, ib, ic) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        if ia >= positions.len() || ib >= positions.len() || ic >= positions.len() {
            continue;
        }
        let a = Vec3::from_array(positions[ia]);
        let b = Vec3::from_array(positions[ib]);
        let c = Vec3::from_array(positions[ic]);
        let n = (b - a).cross(c - a);
        acc[ia] += n;
        acc[ib] += n;
        acc[ic] += n;
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
    pub mesh: Option<Mesh>,
    pub light: Option<Light>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            transform: Transform::IDENTITY,
            mesh: None,
            light: None,
            cast_shadow: false,
            receive_shadow: false,
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        let mut n = Self::with_kind(name, NodeKind::Mesh);
        n.mesh = Some(mesh);
        n
    }

    pub fn light(name: impl Into<String>, light: Light) -> Self {
        let kind = match light {
            Light::Hemisphere { .. } => NodeKind::HemisphereLight,
            Light::Directional { .. } => NodeKind::DirectionalLight,
        };
        let mut n = Self::with_kind(name, kind);
        n.light = Some(light);
        n
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: SceneNode) -> usize {
        self.children.push(child);
        self.children.len() - 1
    }

    /// Pre-order, depth-first, children in stored order.
    pub fn traverse<F: FnMut(&SceneNode)>(&self, f: &mut F) {
        f(self);
        for c in &self.children {
            c.traverse(f);
        }
    }

    pub fn traverse_mut<F: FnMut(&mut SceneNode)>(&mut self, f: &mut F) {
        f(self);
        for c in &mut self.children {
            c.traverse_mut(f);
        }
    }

    /// Detach the first descendant (pre-order) called `name` and return it.
    /// The node itself is never a candidate.
    pub fn remove_descendant(&mut self, name: &str) -> Option<SceneNode> {
        for i in 0..self.children.len() {
            if self.children[i].name == name {
                return Some(self.children.remove(i));
            }
            if let Some(found) = self.children[i].remove_descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// World-space bounds of this subtree when the node sits under `parent_world`.
    pub fn bounds_under(&self, parent_world: Mat4) -> Aabb {
        let world = parent_world * self.transform.matrix();
        let mut b = self
            .mesh
            .as_ref()
            .map(|m| m.local_bounds().transformed(&world))
            .unwrap_or(Aabb::EMPTY);
        for c in &self.children {
            b.union(&c.bounds_under(world));
        }
        b
    }

    /// One line per node, `name [Kind]`, drawn as a tree.
    pub fn dump_tree(&self) -> Vec<String> {
        let mut lines = Vec::new();
        self.dump_into(&mut lines, true, "");
        lines
    }

    fn dump_into(&self, lines: &mut Vec<String>, is_last: bool, prefix: &str) {
        let branch = match (prefix.is_empty(), is_last) {
            (true, _) => "",
            (false, true) => "└─",
            (false, false) => "├─",
        };
        let name = if self.name.is_empty() {
            "*no-name*"
        } else {
            self.name.as_str()
        };
        lines.push(format!("{prefix}{branch}{name} [{}]", self.kind.as_str()));
        let child_prefix = format!("{prefix}{}", if is_last { "  " } else { "│ " });
        let last = self.children.len().saturating_sub(1);
        for (i, c) in self.children.iter().enumerate() {
            c.dump_into(lines, i == last, &child_prefix);
        }
    }
}

/// Child indices from the scene root. Lexicographic order equals pre-order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(SmallVec<[usize; 8]>);

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_indices(indices: &[usize]) -> Self {
        Self(SmallVec::from_slice(indices))
    }

    pub fn child(&self, index: usize) -> Self {
        let mut p = self.0.clone();
        p.push(index);
        Self(p)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_ancestor_or_self_of(&self, other: &NodePath) -> bool {
        other.0.starts_with(&self.0)
    }
}

pub struct Scene {
    root: SceneNode,
    revision: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            root: SceneNode::with_kind("", NodeKind::Scene),
            revision: 0,
        }
    }

    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    /// Bumped on every structural change; renderers use it to skip work.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn add(&mut self, node: SceneNode) -> NodePath {
        let i = self.root.add_child(node);
        self.revision += 1;
        NodePath::root().child(i)
    }

    pub fn node(&self, path: &NodePath) -> Result<&SceneNode, SceneError> {
        let mut n = &self.root;
        for &i in path.indices() {
            n = n
                .children
                .get(i)
                .ok_or_else(|| SceneError::InvalidPath(path.indices().to_vec()))?;
        }
        Ok(n)
    }

    pub fn node_mut(&mut self, path: &NodePath) -> Result<&mut SceneNode, SceneError> {
        self.revision += 1;
        let mut n = &mut self.root;
        for &i in path.indices() {
            n = n
                .children
                .get_mut(i)
                .ok_or_else(|| SceneError::InvalidPath(path.indices().to_vec()))?;
        }
        Ok(n)
    }

    pub fn index(&self) -> SceneIndex {
        SceneIndex::build(&self.root)
    }

    pub fn dump_tree(&self) -> Vec<String> {
        self.root.dump_tree()
    }
}

#[derive(Clone, Debug)]
pub struct IndexedNode {
    pub path: NodePath,
    pub world: Mat4,
}

/// Snapshot of the tree in pre-order: world matrices and a name map.
#[derive(Clone, Debug, Default)]
pub struct SceneIndex {
    entries: Vec<IndexedNode>,
    by_name: FnvHashMap<String, SmallVec<[usize; 2]>>,
}

impl SceneIndex {
    pub fn build(root: &SceneNode) -> Self {
        let mut index = SceneIndex::default();
        index.visit(root, NodePath::root(), Mat4::IDENTITY);
        index
    }

    fn visit(&mut self, node: &SceneNode, path: NodePath, parent_world: Mat4) {
        let world = parent_world * node.transform.matrix();
        let slot = self.entries.len();
        self.by_name.entry(node.name.clone()).or_default().push(slot);
        self.entries.push(IndexedNode {
            path: path.clone(),
            world,
        });
        for (i, c) in node.children.iter().enumerate() {
            self.visit(c, path.child(i), world);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IndexedNode] {
        &self.entries
    }

    /// Every node called `name`, in traversal order.
    pub fn find_all<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a IndexedNode> + 'a {
        self.by_name
            .get(name)
            .into_iter()
            .flat_map(move |slots| slots.iter().map(move |&s| &self.entries[s]))
    }

    pub fn find_first(&self, name: &str) -> Option<&IndexedNode> {
        self.find_all(name).next()
    }

    pub fn get(&self, path: &NodePath) -> Option<&IndexedNode> {
        self.entries
            .binary_search_by(|e| e.path.cmp(path))
            .ok()
            .map(|i| &self.entries[i])
    }

    /// The node at `path` followed by all of its descendants.
    pub fn subtree(&self, path: &NodePath) -> &[IndexedNode] {
        let Ok(start) = self.entries.binary_search_by(|e| e.path.cmp(path)) else {
            return &[];
        };
        let len = self.entries[start..]
            .iter()
            .take_while(|e| path.is_ancestor_or_self_of(&e.path))
            .count();
        &self.entries[start..start + len]
    }
}

/// World-space bounds of the subtree rooted at `path`.
pub fn world_bounds(scene: &Scene, index: &SceneIndex, path: &NodePath) -> Result<Aabb, SceneError> {
    let mut b = Aabb::EMPTY;
    let subtree = index.subtree(path);
    if subtree.is_empty() {
        return Err(SceneError::InvalidPath(path.indices().to_vec()));
    }
    for entry in subtree {
        if let Some(mesh) = &scene.node(&entry.path)?.mesh {
            b.union(&mesh.local_bounds().transformed(&entry.world));
        }
    }
    Ok(b)
}
