//! Mesh data and GLB model parsing.
//!
//! A loaded model becomes a `ModelFragment`: the glTF node hierarchy with
//! each node's local transform and its triangle primitives.
//! Only embedded (GLB binary chunk) buffers are supported.

use crate::error::LoadError;
use glam::{Quat, Vec3};

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Axis-aligned bounding box in a mesh's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let (min, max) = it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Slab test. `dir` need not be normalized; the returned parameter is in
    /// units of `dir`. Returns the entry parameter, or the exit parameter when
    /// the origin is inside the box. `None` when the box is behind the origin.
    pub fn intersect(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            if d.abs() < 1e-12 {
                if o < self.min[axis] || o > self.max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (self.min[axis] - o) * inv;
            let mut t1 = (self.max[axis] - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_max < t_min {
                return None;
            }
        }
        if t_max < 0.0 {
            return None;
        }
        Some(if t_min >= 0.0 { t_min } else { t_max })
    }
}

#[derive(Clone, Debug)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub bounds: Aabb,
    pub color: [f32; 4],
}

impl MeshData {
    /// Axis-aligned box centred on the origin with flat per-face normals.
    pub fn cuboid(size: Vec3, color: [f32; 4]) -> Self {
        let h = size * 0.5;
        // (normal, tangent u, tangent v) per face; u x v == normal keeps CCW winding.
        let faces: [(Vec3, Vec3, Vec3); 6] = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (n, u, v) in faces {
            let base = vertices.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let p = (n + u * su + v * sv) * h;
                vertices.push(Vertex {
                    position: p.to_array(),
                    normal: n.to_array(),
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        Self {
            vertices,
            indices,
            bounds: Aabb { min: -h, max: h },
            color,
        }
    }
}

/// One glTF node: its transform relative to `parent` (or the model root) and
/// the triangle primitives it carries.
#[derive(Clone, Debug)]
pub struct FragmentNode {
    pub name: String,
    /// Index into [`ModelFragment::nodes`]; always earlier than this node.
    pub parent: Option<usize>,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub meshes: Vec<MeshData>,
}

/// Everything a loaded model contributes to the scene: the node hierarchy in
/// pre-order, so parents precede their children.
#[derive(Clone, Debug, Default)]
pub struct ModelFragment {
    pub nodes: Vec<FragmentNode>,
}

impl ModelFragment {
    pub fn mesh_count(&self) -> usize {
        self.nodes.iter().map(|n| n.meshes.len()).sum()
    }
}

/// Parse a binary glTF (GLB) file into a fragment.
pub fn parse_glb(bytes: &[u8]) -> Result<ModelFragment, LoadError> {
    let gltf = gltf::Gltf::from_slice(bytes)?;
    let blob = gltf.blob.as_deref();
    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .ok_or(LoadError::EmptyScene)?;

    let mut fragment = ModelFragment::default();
    for node in scene.nodes() {
        visit_node(&node, None, blob, &mut fragment)?;
    }
    if fragment.mesh_count() == 0 {
        return Err(LoadError::EmptyScene);
    }
    Ok(fragment)
}

// glTF node transforms are TRS-decomposable by definition; shear only appears
// when composing, so each node keeps its own local transform.
fn visit_node(
    node: &gltf::Node<'_>,
    parent: Option<usize>,
    blob: Option<&[u8]>,
    out: &mut ModelFragment,
) -> Result<(), LoadError> {
    let (t, r, s) = node.transform().decomposed();
    let mut meshes = Vec::new();
    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::debug!(
                    "[load] skipping non-triangle primitive {} of mesh {}",
                    primitive.index(),
                    mesh.index()
                );
                continue;
            }
            meshes.push(read_primitive(&mesh, &primitive, blob)?);
        }
    }
    let index = out.nodes.len();
    out.nodes.push(FragmentNode {
        name: format!("node{}", node.index()),
        parent,
        translation: Vec3::from(t),
        rotation: Quat::from_array(r),
        scale: Vec3::from(s),
        meshes,
    });
    for child in node.children() {
        visit_node(&child, Some(index), blob, out)?;
    }
    Ok(())
}

fn read_primitive(
    mesh: &gltf::Mesh<'_>,
    primitive: &gltf::Primitive<'_>,
    blob: Option<&[u8]>,
) -> Result<MeshData, LoadError> {
    let reader = primitive.reader(|buffer| match buffer.source() {
        gltf::buffer::Source::Bin => blob,
        gltf::buffer::Source::Uri(_) => None,
    });
    let missing = || LoadError::MissingPositions {
        mesh: mesh.index(),
        primitive: primitive.index(),
    };
    let positions: Vec<[f32; 3]> = reader.read_positions().ok_or_else(missing)?.collect();
    let bounds = Aabb::from_points(positions.iter().copied().map(Vec3::from)).ok_or_else(missing)?;
    let normals: Vec<[f32; 3]> = reader
        .read_normals()
        .map(|n| n.collect())
        .unwrap_or_default();
    let indices: Vec<u32> = reader
        .read_indices()
        .map(|i| i.into_u32().collect())
        .unwrap_or_else(|| (0..positions.len() as u32).collect());
    let vertices = positions
        .iter()
        .enumerate()
        .map(|(i, p)| Vertex {
            position: *p,
            normal: normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
        })
        .collect();
    let color = primitive
        .material()
        .pbr_metallic_roughness()
        .base_color_factor();
    Ok(MeshData {
        vertices,
        indices,
        bounds,
        color,
    })
}
