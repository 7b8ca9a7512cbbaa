//! Hover/click interaction state machine.
//!
//! The controller owns the selection state and the two single-slot tween
//! handles (object spin and camera move). Starting a tween in a slot always
//! kills whatever occupied it first, so at most one spin and one camera move
//! are ever live. Hover handling is disabled while an object is locked.

use crate::config::InteractionConfig;
use crate::scene::{NodeId, Scene};
use crate::tween::{Ease, Motion, Property, Timeline, TweenHandle, TweenSpec, TweenTarget};
use glam::Vec3;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionState {
    #[default]
    Idle,
    Hovering(NodeId),
    Locked(NodeId),
}

impl InteractionState {
    pub fn active(self) -> Option<NodeId> {
        match self {
            InteractionState::Idle => None,
            InteractionState::Hovering(n) | InteractionState::Locked(n) => Some(n),
        }
    }

    pub fn is_locked(self) -> bool {
        matches!(self, InteractionState::Locked(_))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PanelState {
    #[default]
    Hidden,
    Visible { title: String, body: String },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

impl Cursor {
    pub fn css(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Pointer => "pointer",
        }
    }
}

pub struct InteractionController {
    config: InteractionConfig,
    state: InteractionState,
    spin: Option<TweenHandle>,
    camera_move: Option<TweenHandle>,
    camera_target: Vec3,
    panel: PanelState,
    cursor: Cursor,
}

impl InteractionController {
    pub fn new(config: InteractionConfig) -> Self {
        let camera_target = config.initial_camera;
        Self {
            config,
            state: InteractionState::Idle,
            spin: None,
            camera_move: None,
            camera_target,
            panel: PanelState::Hidden,
            cursor: Cursor::Default,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn panel(&self) -> &PanelState {
        &self.panel
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Where the camera is headed (or resting).
    pub fn camera_target(&self) -> Vec3 {
        self.camera_target
    }

    pub fn spin_handle(&self) -> Option<TweenHandle> {
        self.spin
    }

    pub fn camera_handle(&self) -> Option<TweenHandle> {
        self.camera_move
    }

    /// Pointer moved; `hit` is the interactable under the pointer, already
    /// resolved to its ownership group.
    pub fn pointer_moved(&mut self, scene: &Scene, hit: Option<NodeId>, timeline: &mut Timeline) {
        let hit = hit.filter(|n| scene.interactable(*n).is_some());
        match (self.state, hit) {
            (InteractionState::Locked(_), _) => {}
            (InteractionState::Hovering(current), Some(node)) if current == node => {}
            (_, Some(node)) => {
                log::debug!("[hover] enter {}", node_name(scene, node));
                self.start_spin(node, timeline);
                self.state = InteractionState::Hovering(node);
                self.cursor = Cursor::Pointer;
            }
            (InteractionState::Hovering(prev), None) => {
                log::debug!("[hover] leave {}", node_name(scene, prev));
                self.settle(prev, timeline);
                self.state = InteractionState::Idle;
                self.cursor = Cursor::Default;
            }
            (InteractionState::Idle, None) => {
                self.cursor = Cursor::Default;
            }
        }
    }

    /// Pointer clicked; `hit` as for [`Self::pointer_moved`].
    pub fn clicked(&mut self, scene: &Scene, hit: Option<NodeId>, timeline: &mut Timeline) {
        let picked = hit.and_then(|n| scene.interactable(n).map(|i| (n, i)));
        match picked {
            Some((node, interactable)) => match &interactable.description {
                Some(description) => {
                    log::info!("[click] focus {}", description.title);
                    self.panel = PanelState::Visible {
                        title: description.title.clone(),
                        body: description.body.clone(),
                    };
                    self.start_spin(node, timeline);
                    self.move_camera(interactable.home + self.config.focus_offset, timeline);
                    self.state = InteractionState::Locked(node);
                    self.cursor = Cursor::Pointer;
                }
                None => {
                    log::info!("[click] {} has no description", node_name(scene, node));
                    self.move_camera(self.config.initial_camera, timeline);
                }
            },
            None => {
                log::info!("[click] release");
                self.panel = PanelState::Hidden;
                self.move_camera(self.config.initial_camera, timeline);
                if let Some(prev) = self.state.active() {
                    self.settle(prev, timeline);
                }
                self.state = InteractionState::Idle;
                self.cursor = Cursor::Default;
            }
        }
    }

    fn start_spin(&mut self, node: NodeId, timeline: &mut Timeline) {
        let spec = TweenSpec::new(
            TweenTarget::Node(node, Property::Rotation),
            Motion::By(Vec3::Y * TAU),
            self.config.spin_period_sec,
        )
        .ease(Ease::Linear)
        .forever();
        self.spin = Some(timeline.replace(self.spin, spec));
    }

    fn settle(&mut self, node: NodeId, timeline: &mut Timeline) {
        let spec = TweenSpec::new(
            TweenTarget::Node(node, Property::Rotation),
            Motion::To(Vec3::ZERO),
            self.config.settle_sec,
        );
        self.spin = Some(timeline.replace(self.spin, spec));
    }

    fn move_camera(&mut self, to: Vec3, timeline: &mut Timeline) {
        self.camera_target = to;
        let spec = TweenSpec::new(TweenTarget::Camera, Motion::To(to), self.config.camera_move_sec);
        self.camera_move = Some(timeline.replace(self.camera_move, spec));
    }
}

fn node_name(scene: &Scene, node: NodeId) -> &str {
    scene.node(node).map(|n| n.name.as_str()).unwrap_or("?")
}
