// Host-side scenarios for the hover/click state machine driven through the
// full showcase (scene, picking, timeline).

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shelf_core::*;
use std::time::Duration;

const FRAME: Duration = Duration::from_micros(16_667);

// Every exhibit as a primitive; the cube loses its description so it can
// stand in for an undescribed interactable.
fn primitive_catalog() -> ShowcaseConfig {
    let mut config = ShowcaseConfig::default();
    for exhibit in &mut config.exhibits {
        exhibit.model = None;
        exhibit.scale = 0.4;
        if exhibit.name == "Cube" {
            exhibit.description = None;
        }
    }
    config
}

fn build() -> Showcase {
    let config = primitive_catalog();
    let mut showcase = Showcase::new(config.clone(), 42);
    for exhibit in &config.exhibits {
        showcase.add_primitive(exhibit);
    }
    showcase
}

fn id(showcase: &Showcase, name: &str) -> NodeId {
    showcase.scene.find(name).unwrap()
}

/// NDC of a node's current world-space origin.
fn ndc_of(showcase: &Showcase, node: NodeId) -> Vec2 {
    let center = showcase.scene.world_matrix(node).transform_point3(Vec3::ZERO);
    showcase
        .camera
        .view_projection()
        .project_point3(center)
        .truncate()
}

const EMPTY_SKY: Vec2 = Vec2::new(0.0, 0.95);

fn run(showcase: &mut Showcase, seconds: f32) {
    let frames = (seconds / FRAME.as_secs_f32()).ceil() as usize;
    for _ in 0..frames {
        showcase.tick(FRAME);
    }
}

fn live_rotation_tweens(showcase: &Showcase) -> usize {
    showcase
        .timeline
        .targets()
        .filter(|t| matches!(t, TweenTarget::Node(_, Property::Rotation)))
        .count()
}

fn rotation(showcase: &Showcase, node: NodeId) -> Vec3 {
    showcase.scene.node(node).unwrap().rotation
}

#[test]
fn hover_enters_and_leaves() {
    let mut sc = build();
    let zapper = id(&sc, "NES Zapper");

    sc.pointer_moved(ndc_of(&sc, zapper));
    assert_eq!(sc.state(), InteractionState::Hovering(zapper));
    assert_eq!(sc.cursor(), Cursor::Pointer);
    let spin = sc.controller().spin_handle().unwrap();
    assert_eq!(
        sc.timeline.spec(spin).map(|s| (s.ease, s.repeat, s.duration)),
        Some((Ease::Linear, Repeat::Forever, 10.0))
    );

    run(&mut sc, 2.5);
    assert!(rotation(&sc, zapper).y > 1.0);

    sc.pointer_moved(EMPTY_SKY);
    assert_eq!(sc.state(), InteractionState::Idle);
    assert_eq!(sc.cursor(), Cursor::Default);
    assert!(!sc.timeline.is_live(spin));
    run(&mut sc, 1.1);
    assert_eq!(rotation(&sc, zapper), Vec3::ZERO);
    assert_eq!(live_rotation_tweens(&sc), 0);
}

#[test]
fn hovering_the_same_object_keeps_its_spin() {
    let mut sc = build();
    let zapper = id(&sc, "NES Zapper");
    sc.pointer_moved(ndc_of(&sc, zapper));
    let spin = sc.controller().spin_handle();
    run(&mut sc, 0.5);
    sc.pointer_moved(ndc_of(&sc, zapper));
    assert_eq!(sc.controller().spin_handle(), spin);
}

#[test]
fn switching_hover_cancels_previous_spin_first() {
    let mut sc = build();
    let a = id(&sc, "NES Zapper");
    let b = id(&sc, "Cube");

    sc.pointer_moved(ndc_of(&sc, a));
    let spin_a = sc.controller().spin_handle().unwrap();
    run(&mut sc, 1.0);

    sc.pointer_moved(ndc_of(&sc, b));
    assert_eq!(sc.state(), InteractionState::Hovering(b));
    assert!(!sc.timeline.is_live(spin_a));
    assert_eq!(live_rotation_tweens(&sc), 1);

    let frozen = rotation(&sc, a);
    run(&mut sc, 3.0);
    assert_eq!(rotation(&sc, a), frozen);
    assert!(rotation(&sc, b).y > 0.0);
}

#[test]
fn shelf_blocks_picking_and_counts_as_miss() {
    let mut sc = build();
    let zapper = id(&sc, "NES Zapper");
    sc.pointer_moved(ndc_of(&sc, zapper));
    // Straight at the shelf's centre.
    sc.pointer_moved(ndc_of(&sc, sc.shelf()));
    assert_eq!(sc.state(), InteractionState::Idle);
    assert_eq!(sc.pick(ndc_of(&sc, sc.shelf())), None);
}

#[test]
fn random_hover_sequences_keep_a_single_rotation_tween() {
    let mut sc = build();
    let targets: Vec<NodeId> = sc.scene.interactables().collect();
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..400 {
        let ndc = if rng.gen_bool(0.3) {
            Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
        } else {
            ndc_of(&sc, targets[rng.gen_range(0..targets.len())])
        };
        sc.pointer_moved(ndc);
        assert!(live_rotation_tweens(&sc) <= 1);
        for _ in 0..rng.gen_range(0..20) {
            sc.tick(FRAME);
            assert!(live_rotation_tweens(&sc) <= 1);
        }
    }
}

#[test]
fn click_locks_and_suspends_hover() {
    let mut sc = build();
    let zapper = id(&sc, "NES Zapper");
    let cube = id(&sc, "Cube");

    sc.clicked(ndc_of(&sc, zapper));
    assert_eq!(sc.state(), InteractionState::Locked(zapper));
    let spin = sc.controller().spin_handle();

    for ndc in [ndc_of(&sc, cube), EMPTY_SKY, ndc_of(&sc, zapper)] {
        sc.pointer_moved(ndc);
        assert_eq!(sc.state(), InteractionState::Locked(zapper));
        assert_eq!(sc.controller().spin_handle(), spin);
    }
}

#[test]
fn zapper_click_then_release() {
    let mut sc = build();
    let zapper = id(&sc, "NES Zapper");
    let expected_body = default_exhibits()
        .into_iter()
        .find(|e| e.name == "NES Zapper")
        .and_then(|e| e.description)
        .unwrap();

    sc.pointer_moved(ndc_of(&sc, zapper));
    sc.clicked(ndc_of(&sc, zapper));
    assert_eq!(
        sc.panel(),
        &PanelState::Visible {
            title: "NES Zapper".into(),
            body: expected_body,
        }
    );
    let home = sc.scene.interactable(zapper).unwrap().home;
    assert_eq!(home, Vec3::new(-1.5, 0.3, 0.0));
    assert_eq!(sc.controller().camera_target(), home + Vec3::new(0.0, 0.0, 2.0));

    run(&mut sc, 1.5);
    assert_eq!(sc.camera.eye, home + Vec3::new(0.0, 0.0, 2.0));

    sc.clicked(EMPTY_SKY);
    assert_eq!(sc.panel(), &PanelState::Hidden);
    assert_eq!(sc.state(), InteractionState::Idle);
    assert_eq!(sc.controller().camera_target(), Vec3::new(0.0, 1.0, 3.0));

    run(&mut sc, 1.5);
    assert_eq!(sc.camera.eye, Vec3::new(0.0, 1.0, 3.0));
    assert_eq!(rotation(&sc, zapper), Vec3::ZERO);
}

#[test]
fn click_on_other_described_object_relocks() {
    let mut sc = build();
    let zapper = id(&sc, "NES Zapper");
    let game_boy = id(&sc, "Game Boy");

    sc.clicked(ndc_of(&sc, zapper));
    let first_spin = sc.controller().spin_handle().unwrap();
    run(&mut sc, 0.3);
    sc.clicked(ndc_of(&sc, game_boy));

    assert_eq!(sc.state(), InteractionState::Locked(game_boy));
    assert!(!sc.timeline.is_live(first_spin));
    assert_eq!(live_rotation_tweens(&sc), 1);
    match sc.panel() {
        PanelState::Visible { title, .. } => assert_eq!(title, "Game Boy"),
        other => panic!("panel should be visible, got {other:?}"),
    }
}

#[test]
fn undescribed_click_only_returns_camera() {
    let mut sc = build();
    let zapper = id(&sc, "NES Zapper");
    let cube = id(&sc, "Cube");

    sc.clicked(ndc_of(&sc, zapper));
    let panel = sc.panel().clone();
    run(&mut sc, 1.2);

    // The camera now sits in front of the zapper; aim at the cube from here.
    sc.clicked(ndc_of(&sc, cube));
    assert_eq!(sc.panel(), &panel);
    assert_eq!(sc.state(), InteractionState::Locked(zapper));
    assert_eq!(sc.controller().camera_target(), Vec3::new(0.0, 1.0, 3.0));
}

#[test]
fn levitation_stays_in_band_and_returns_to_baseline() {
    let mut sc = build();
    let amplitude = sc.config().levitation.amplitude;
    let nodes: Vec<(NodeId, f32)> = sc
        .scene
        .interactables()
        .map(|n| (n, sc.scene.interactable(n).unwrap().home.y))
        .collect();
    let zapper = id(&sc, "NES Zapper");
    sc.clicked(ndc_of(&sc, zapper));

    let mut lowest_late = vec![f32::MAX; nodes.len()];
    let mut highest = vec![f32::MIN; nodes.len()];
    let frames = (20.0 / FRAME.as_secs_f32()) as usize;
    for frame in 0..frames {
        sc.tick(FRAME);
        for (i, (node, base)) in nodes.iter().enumerate() {
            let y = sc.scene.node(*node).unwrap().position.y;
            assert!(y >= base - 1e-4 && y <= base + amplitude + 1e-4, "y={y} base={base}");
            highest[i] = highest[i].max(y);
            if frame > frames / 2 {
                lowest_late[i] = lowest_late[i].min(y);
            }
        }
    }
    for (i, (_, base)) in nodes.iter().enumerate() {
        assert!(lowest_late[i] - base < 1e-3, "never came back down");
        assert!(highest[i] - base > amplitude * 0.9, "never rose");
    }
}

#[test]
fn clicking_another_object_while_hovering_locks_it() {
    let mut sc = build();
    let zapper = id(&sc, "NES Zapper");
    let game_boy = id(&sc, "Game Boy");

    sc.pointer_moved(ndc_of(&sc, zapper));
    let hover_spin = sc.controller().spin_handle().unwrap();
    run(&mut sc, 0.5);

    sc.clicked(ndc_of(&sc, game_boy));
    assert_eq!(sc.state(), InteractionState::Locked(game_boy));
    assert!(!sc.timeline.is_live(hover_spin));
    assert_eq!(live_rotation_tweens(&sc), 1);
    assert!(matches!(
        sc.timeline.spec(sc.controller().spin_handle().unwrap()).map(|s| s.target),
        Some(TweenTarget::Node(n, Property::Rotation)) if n == game_boy
    ));
    match sc.panel() {
        PanelState::Visible { title, .. } => assert_eq!(title, "Game Boy"),
        other => panic!("panel should be visible, got {other:?}"),
    }

    let frozen = rotation(&sc, zapper);
    run(&mut sc, 1.0);
    assert_eq!(rotation(&sc, zapper), frozen);
}

#[test]
fn undescribed_click_from_idle_only_moves_camera() {
    let mut sc = build();
    let cube = id(&sc, "Cube");

    sc.clicked(ndc_of(&sc, cube));
    assert_eq!(sc.state(), InteractionState::Idle);
    assert_eq!(sc.panel(), &PanelState::Hidden);
    assert_eq!(sc.controller().spin_handle(), None);
    assert_eq!(live_rotation_tweens(&sc), 0);
    let camera_move = sc.controller().camera_handle().unwrap();
    assert!(sc.timeline.is_live(camera_move));
    assert_eq!(sc.controller().camera_target(), Vec3::new(0.0, 1.0, 3.0));
}

#[test]
fn undescribed_click_while_hovering_keeps_the_hover() {
    let mut sc = build();
    let zapper = id(&sc, "NES Zapper");
    let cube = id(&sc, "Cube");

    sc.pointer_moved(ndc_of(&sc, zapper));
    let spin = sc.controller().spin_handle();
    sc.clicked(ndc_of(&sc, cube));

    assert_eq!(sc.state(), InteractionState::Hovering(zapper));
    assert_eq!(sc.controller().spin_handle(), spin);
    assert_eq!(sc.panel(), &PanelState::Hidden);
    assert_eq!(sc.cursor(), Cursor::Pointer);
    assert!(sc.controller().camera_handle().is_some());
    assert_eq!(sc.controller().camera_target(), Vec3::new(0.0, 1.0, 3.0));
}
