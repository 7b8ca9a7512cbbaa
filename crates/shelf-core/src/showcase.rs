//! The whole page state: scene, camera, timeline and interaction controller.
//!
//! Front-ends own one `Showcase`, forward pointer input in normalized device
//! coordinates, call [`Showcase::tick`] once per frame, and read back the
//! camera, mesh instances, panel and cursor to present them.

use crate::config::{Exhibit, ShowcaseConfig};
use crate::constants::{CUBE_SIZE, SHELF_COLOR, SHELF_SIZE};
use crate::controller::{Cursor, InteractionController, InteractionState, PanelState};
use crate::levitation::levitate;
use crate::model::{MeshData, ModelFragment};
use crate::scene::{Description, Interactable, Node, NodeId, NodeTag, Scene};
use crate::state::Camera;
use crate::tween::{Animatable, Timeline, TweenTarget};
use glam::{EulerRot, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

pub struct Showcase {
    pub scene: Scene,
    pub camera: Camera,
    pub timeline: Timeline,
    controller: InteractionController,
    config: ShowcaseConfig,
    look_dir: Vec3,
    shelf: NodeId,
    rng: StdRng,
}

impl Showcase {
    pub fn new(config: ShowcaseConfig, seed: u64) -> Self {
        let mut scene = Scene::new();
        let shelf_mesh = scene.add_mesh(MeshData::cuboid(SHELF_SIZE, SHELF_COLOR));
        let shelf = scene.add_node(Node::mesh("shelf", shelf_mesh), None);

        let eye = config.interaction.initial_camera;
        let camera = Camera::looking_at(eye, Vec3::ZERO);
        let look_dir = (Vec3::ZERO - eye).normalize_or_zero();
        let controller = InteractionController::new(config.interaction.clone());

        Self {
            scene,
            camera,
            timeline: Timeline::new(),
            controller,
            config,
            look_dir,
            shelf,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &ShowcaseConfig {
        &self.config
    }

    pub fn shelf(&self) -> NodeId {
        self.shelf
    }

    /// Place a primitive cube for an exhibit without a model.
    pub fn add_primitive(&mut self, exhibit: &Exhibit) -> NodeId {
        let mesh = self
            .scene
            .add_mesh(MeshData::cuboid(Vec3::splat(CUBE_SIZE), exhibit.color));
        let node = Node::mesh(exhibit.name.clone(), mesh)
            .at(exhibit.position)
            .scaled(Vec3::splat(exhibit.scale))
            .tagged(interactable_tag(exhibit));
        let id = self.scene.add_node(node, None);
        self.adopt(id);
        id
    }

    /// Place a loaded model as an ownership group mirroring the model's node
    /// hierarchy, with one mesh child per primitive.
    pub fn add_model(&mut self, exhibit: &Exhibit, fragment: ModelFragment) -> NodeId {
        let group = Node::group(exhibit.name.clone())
            .at(exhibit.position)
            .scaled(Vec3::splat(exhibit.scale))
            .tagged(interactable_tag(exhibit));
        let group = self.scene.add_node(group, None);
        let mut placed: Vec<NodeId> = Vec::with_capacity(fragment.nodes.len());
        for part in fragment.nodes {
            let parent = part.parent.and_then(|i| placed.get(i).copied()).unwrap_or(group);
            let (x, y, z) = part.rotation.to_euler(EulerRot::XYZ);
            let node = Node::group(part.name.clone())
                .at(part.translation)
                .rotated(Vec3::new(x, y, z))
                .scaled(part.scale);
            let node = self.scene.add_node(node, Some(parent));
            for (i, data) in part.meshes.into_iter().enumerate() {
                let mesh = self.scene.add_mesh(data);
                self.scene
                    .add_node(Node::mesh(format!("{}.{}", part.name, i), mesh), Some(node));
            }
            placed.push(node);
        }
        self.adopt(group);
        group
    }

    fn adopt(&mut self, id: NodeId) {
        levitate(id, &self.config.levitation, &mut self.rng, &mut self.timeline);
        if let Some(node) = self.scene.node(id) {
            log::info!("[scene] added {}", node.name);
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.camera.aspect = aspect;
        }
    }

    /// Interactable under the pointer. The nearest hit wins even when it is not
    /// interactable (the shelf hides what is behind it).
    pub fn pick(&self, ndc: Vec2) -> Option<NodeId> {
        let ray = self.camera.ray_through_ndc(ndc);
        self.scene
            .raycast(&ray)
            .and_then(|hit| self.scene.owner(hit.node))
    }

    pub fn pointer_moved(&mut self, ndc: Vec2) {
        if self.controller.state().is_locked() {
            return;
        }
        let hit = self.pick(ndc);
        self.controller
            .pointer_moved(&self.scene, hit, &mut self.timeline);
    }

    pub fn clicked(&mut self, ndc: Vec2) {
        let hit = self.pick(ndc);
        self.controller.clicked(&self.scene, hit, &mut self.timeline);
    }

    pub fn tick(&mut self, dt: Duration) {
        let mut stage = Stage {
            scene: &mut self.scene,
            camera: &mut self.camera,
        };
        self.timeline.tick(dt, &mut stage);
        self.camera.target = self.camera.eye + self.look_dir;
    }

    pub fn state(&self) -> InteractionState {
        self.controller.state()
    }

    pub fn panel(&self) -> &PanelState {
        self.controller.panel()
    }

    pub fn cursor(&self) -> Cursor {
        self.controller.cursor()
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }
}

fn interactable_tag(exhibit: &Exhibit) -> NodeTag {
    NodeTag::Interactable(Interactable {
        description: exhibit.description.as_ref().map(|body| Description {
            title: exhibit.name.clone(),
            body: body.clone(),
        }),
        home: exhibit.position,
    })
}

// Tween sink spanning the scene graph and the camera.
struct Stage<'a> {
    scene: &'a mut Scene,
    camera: &'a mut Camera,
}

impl Animatable for Stage<'_> {
    fn read(&self, target: TweenTarget) -> Option<Vec3> {
        match target {
            TweenTarget::Camera => Some(self.camera.eye),
            _ => self.scene.read(target),
        }
    }

    fn write(&mut self, target: TweenTarget, value: Vec3) {
        match target {
            TweenTarget::Camera => self.camera.eye = value,
            _ => self.scene.write(target, value),
        }
    }
}
