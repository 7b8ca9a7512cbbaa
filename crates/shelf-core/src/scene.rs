//! Typed scene graph with ownership groups and ray picking.
//!
//! Nodes live in an arena for the lifetime of the page; nothing is ever
//! removed, so `NodeId`s stay valid. A node is either a `Group` (an ownership
//! container) or a `Mesh` referencing shared `MeshData`. Interactability is an
//! explicit tag, resolved through `Scene::owner` so that a hit on any sub-mesh
//! of a model resolves to the model's group.

use crate::model::{Aabb, MeshData};
use crate::state::Ray;
use crate::tween::{Animatable, Property, TweenTarget};
use fnv::FnvHashMap;
use glam::{EulerRot, Mat4, Quat, Vec3};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl MeshId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Description {
    pub title: String,
    pub body: String,
}

/// Capability attached to nodes the pointer may hover and click.
#[derive(Clone, Debug, PartialEq)]
pub struct Interactable {
    pub description: Option<Description>,
    /// Placement position recorded at creation; the camera focuses relative
    /// to this rather than the (levitating) live position.
    pub home: Vec3,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum NodeTag {
    #[default]
    Decoration,
    Interactable(Interactable),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Group,
    Mesh(MeshId),
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub position: Vec3,
    /// XYZ Euler angles in radians.
    pub rotation: Vec3,
    pub scale: Vec3,
    pub tag: NodeTag,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
}

impl Node {
    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name.into(), NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, mesh: MeshId) -> Self {
        Self::new(name.into(), NodeKind::Mesh(mesh))
    }

    fn new(name: String, kind: NodeKind) -> Self {
        Self {
            name,
            kind,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            tag: NodeTag::Decoration,
            parent: None,
            children: SmallVec::new(),
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotated(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn scaled(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn tagged(mut self, tag: NodeTag) -> Self {
        self.tag = tag;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn interactable(&self) -> Option<&Interactable> {
        match &self.tag {
            NodeTag::Interactable(i) => Some(i),
            NodeTag::Decoration => None,
        }
    }

    pub fn local_matrix(&self) -> Mat4 {
        let r = self.rotation;
        Mat4::from_scale_rotation_translation(
            self.scale,
            Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z),
            self.position,
        )
    }
}

/// Nearest intersection returned by [`Scene::raycast`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    pub distance: f32,
}

#[derive(Default)]
pub struct Scene {
    nodes: Vec<Node>,
    meshes: Vec<MeshData>,
    by_name: FnvHashMap<String, NodeId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: MeshData) -> MeshId {
        self.meshes.push(mesh);
        MeshId((self.meshes.len() - 1) as u32)
    }

    /// Insert `node` under `parent` (or at the root). The first node to claim a
    /// name is the one `find` returns.
    pub fn add_node(&mut self, mut node: Node, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        node.parent = parent.filter(|p| p.index() < self.nodes.len());
        node.children.clear();
        if let Some(p) = node.parent {
            self.nodes[p.index()].children.push(id);
        }
        self.by_name.entry(node.name.clone()).or_insert(id);
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn mesh(&self, id: MeshId) -> Option<&MeshData> {
        self.meshes.get(id.index())
    }

    pub fn meshes(&self) -> &[MeshData] {
        &self.meshes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn interactable(&self, id: NodeId) -> Option<&Interactable> {
        self.node(id).and_then(Node::interactable)
    }

    pub fn interactables(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids().filter(|id| self.interactable(*id).is_some())
    }

    /// Resolve a hit node to the interactable that owns it: the node itself
    /// or its nearest tagged ancestor.
    pub fn owner(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = Some(id);
        while let Some(n) = cur {
            let node = self.node(n)?;
            if node.interactable().is_some() {
                return Some(n);
            }
            cur = node.parent;
        }
        None
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        let mut cur = Some(id);
        while let Some(n) = cur {
            match self.node(n) {
                Some(node) => {
                    m = node.local_matrix() * m;
                    cur = node.parent;
                }
                None => break,
            }
        }
        m
    }

    /// Every mesh node with its world transform, in insertion order.
    pub fn mesh_instances(&self) -> impl Iterator<Item = (NodeId, MeshId, Mat4)> + '_ {
        self.ids().filter_map(|id| match self.nodes[id.index()].kind {
            NodeKind::Mesh(mesh) => Some((id, mesh, self.world_matrix(id))),
            NodeKind::Group => None,
        })
    }

    /// Nearest mesh node along `ray`, tested against each mesh's local bounds.
    pub fn raycast(&self, ray: &Ray) -> Option<Hit> {
        let mut best: Option<Hit> = None;
        for (node, mesh, world) in self.mesh_instances() {
            let Some(bounds) = self.mesh(mesh).map(|m| m.bounds) else {
                continue;
            };
            let Some(t) = intersect_transformed(&bounds, world, ray) else {
                continue;
            };
            match best {
                Some(b) if t >= b.distance => {}
                _ => best = Some(Hit { node, distance: t }),
            }
        }
        best
    }

    fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }
}

// An affine map preserves the ray parameter, so the local hit `t` is also the
// world distance along the (normalized) world ray.
fn intersect_transformed(bounds: &Aabb, world: Mat4, ray: &Ray) -> Option<f32> {
    let det = world.determinant();
    if !det.is_finite() || det.abs() < 1e-12 {
        return None;
    }
    let inv = world.inverse();
    let origin = inv.transform_point3(ray.origin);
    let dir = inv.transform_vector3(ray.dir);
    bounds.intersect(origin, dir)
}

impl Animatable for Scene {
    fn read(&self, target: TweenTarget) -> Option<Vec3> {
        match target {
            TweenTarget::Node(id, Property::Position) => self.node(id).map(|n| n.position),
            TweenTarget::Node(id, Property::Rotation) => self.node(id).map(|n| n.rotation),
            TweenTarget::Camera => None,
        }
    }

    fn write(&mut self, target: TweenTarget, value: Vec3) {
        match target {
            TweenTarget::Node(id, prop) => {
                if let Some(n) = self.node_mut(id) {
                    match prop {
                        Property::Position => n.position = value,
                        Property::Rotation => n.rotation = value,
                    }
                }
            }
            TweenTarget::Camera => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn unit_cube(scene: &mut Scene) -> MeshId {
        scene.add_mesh(MeshData::cuboid(Vec3::ONE, [1.0; 4]))
    }

    #[test]
    fn owner_walks_up_to_tagged_group() {
        let mut scene = Scene::new();
        let cube = unit_cube(&mut scene);
        let group = scene.add_node(
            Node::group("console").tagged(NodeTag::Interactable(Interactable {
                description: None,
                home: Vec3::ZERO,
            })),
            None,
        );
        let body = scene.add_node(Node::mesh("body", cube), Some(group));
        let button = scene.add_node(Node::mesh("button", cube), Some(body));
        let loose = scene.add_node(Node::mesh("loose", cube), None);
        assert_eq!(scene.owner(button), Some(group));
        assert_eq!(scene.owner(body), Some(group));
        assert_eq!(scene.owner(group), Some(group));
        assert_eq!(scene.owner(loose), None);
        assert_eq!(scene.node(group).unwrap().children(), &[body]);
    }

    #[test]
    fn world_matrix_composes_parent_transforms() {
        let mut scene = Scene::new();
        let parent = scene.add_node(
            Node::group("p")
                .at(Vec3::new(1.0, 0.0, 0.0))
                .scaled(Vec3::splat(2.0)),
            None,
        );
        let child = scene.add_node(Node::group("c").at(Vec3::new(0.0, 1.0, 0.0)), Some(parent));
        let p = scene.world_matrix(child).transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(1.0, 2.0, 0.0), 1e-5), "{p:?}");
    }

    #[test]
    fn raycast_returns_nearest_mesh() {
        let mut scene = Scene::new();
        let cube = unit_cube(&mut scene);
        let far = scene.add_node(Node::mesh("far", cube).at(Vec3::new(0.0, 0.0, -5.0)), None);
        let near = scene.add_node(Node::mesh("near", cube), None);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let hit = scene.raycast(&ray).unwrap();
        assert_eq!(hit.node, near);
        assert!((hit.distance - 4.5).abs() < 1e-4);
        assert_ne!(hit.node, far);
    }

    #[test]
    fn raycast_respects_scale_and_rotation() {
        let mut scene = Scene::new();
        let cube = unit_cube(&mut scene);
        let node = scene.add_node(
            Node::mesh("spun", cube)
                .rotated(Vec3::new(0.0, std::f32::consts::FRAC_PI_4, 0.0))
                .scaled(Vec3::splat(2.0)),
            None,
        );
        // A 2-unit cube turned 45 degrees about Y reaches sqrt(2) along X.
        let grazing = Ray::new(Vec3::new(1.3, 0.0, 5.0), Vec3::NEG_Z);
        assert_eq!(scene.raycast(&grazing).map(|h| h.node), Some(node));
        let outside = Ray::new(Vec3::new(1.5, 0.0, 5.0), Vec3::NEG_Z);
        assert!(scene.raycast(&outside).is_none());
    }

    #[test]
    fn find_returns_first_registered_name() {
        let mut scene = Scene::new();
        let a = scene.add_node(Node::group("dup"), None);
        let _b = scene.add_node(Node::group("dup"), None);
        assert_eq!(scene.find("dup"), Some(a));
        assert_eq!(scene.find("missing"), None);
    }
}
