// Host-side tests for GLB parsing and for placing loaded models on the shelf.

use glam::{Mat4, Quat, Vec2, Vec3};
use shelf_core::*;

const ONE_TRIANGLE_NODE: &str = r#"[ { "mesh": 0, "translation": [0.0, 1.0, 0.0] } ]"#;

/// Minimal GLB holding one indexed triangle, referenced from the given node
/// list; the scene's only root is node 0.
fn glb_with_nodes(nodes: &str) -> Vec<u8> {
    let json = format!(
        r#"{{
        "asset": {{ "version": "2.0" }},
        "scene": 0,
        "scenes": [ {{ "nodes": [0] }} ],
        "nodes": {nodes},
        "meshes": [ {{ "primitives": [ {{ "attributes": {{ "POSITION": 0 }}, "indices": 1, "material": 0 }} ] }} ],
        "materials": [ {{ "pbrMetallicRoughness": {{ "baseColorFactor": [0.2, 0.4, 0.6, 1.0] }} }} ],
        "buffers": [ {{ "byteLength": 42 }} ],
        "bufferViews": [
            {{ "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 }},
            {{ "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 }}
        ],
        "accessors": [
            {{ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] }},
            {{ "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }}
        ]
    }}"#
    );

    let mut bin = Vec::new();
    for p in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
        for c in p {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    for i in [0u16, 1, 2] {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    while bin.len() % 4 != 0 {
        bin.push(0);
    }
    let mut json = json.into_bytes();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json);
    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(b"BIN\0");
    out.extend_from_slice(&bin);
    out
}

fn triangle_glb() -> Vec<u8> {
    glb_with_nodes(ONE_TRIANGLE_NODE)
}

fn exhibit(name: &str) -> Exhibit {
    Exhibit {
        name: name.into(),
        description: Some("One face".into()),
        model: Some("triangle.glb".into()),
        position: Vec3::new(-1.5, 0.3, 0.0),
        scale: 0.4,
        color: [1.0; 4],
    }
}

/// Mesh nodes owned by `group`, with their world transforms.
fn owned_meshes(sc: &Showcase, group: NodeId) -> Vec<(NodeId, MeshId, Mat4)> {
    sc.scene
        .mesh_instances()
        .filter(|(n, _, _)| sc.scene.owner(*n) == Some(group))
        .collect()
}

#[test]
fn parses_triangle_glb() {
    let fragment = parse_glb(&triangle_glb()).unwrap();
    assert_eq!(fragment.nodes.len(), 1);
    assert_eq!(fragment.mesh_count(), 1);
    let node = &fragment.nodes[0];
    assert_eq!(node.parent, None);
    assert!(node.translation.abs_diff_eq(Vec3::Y, 1e-6));
    assert!(node.scale.abs_diff_eq(Vec3::ONE, 1e-6));
    let mesh = &node.meshes[0];
    assert_eq!(mesh.vertices.len(), 3);
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    assert_eq!(mesh.color, [0.2, 0.4, 0.6, 1.0]);
    assert_eq!(mesh.bounds.min, Vec3::ZERO);
    assert_eq!(mesh.bounds.max, Vec3::new(1.0, 1.0, 0.0));
    // No NORMAL attribute: up-facing fallback.
    assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
}

#[test]
fn node_hierarchy_is_kept_in_preorder() {
    let nodes = r#"[
        { "children": [1], "scale": [2.0, 1.0, 1.0] },
        { "mesh": 0, "rotation": [0.0, 0.0, 0.38268343, 0.9238795] }
    ]"#;
    let fragment = parse_glb(&glb_with_nodes(nodes)).unwrap();
    assert_eq!(fragment.nodes.len(), 2);
    assert_eq!(fragment.nodes[0].parent, None);
    assert!(fragment.nodes[0].meshes.is_empty());
    assert_eq!(fragment.nodes[1].parent, Some(0));
    assert_eq!(fragment.nodes[1].meshes.len(), 1);
}

#[test]
fn non_uniform_parent_scale_over_rotated_child_keeps_shear() {
    // Parent stretches x by 2; child turns 45 degrees about z. The product
    // is sheared, so it must not be squeezed back into a single TRS.
    let nodes = r#"[
        { "children": [1], "scale": [2.0, 1.0, 1.0] },
        { "mesh": 0, "rotation": [0.0, 0.0, 0.38268343, 0.9238795] }
    ]"#;
    let ex = exhibit("Sheared");
    let mut sc = Showcase::new(ShowcaseConfig::default(), 5);
    let group = sc.add_model(&ex, parse_glb(&glb_with_nodes(nodes)).unwrap());

    let meshes = owned_meshes(&sc, group);
    assert_eq!(meshes.len(), 1);
    let (_, _, world) = meshes[0];
    let placement =
        Mat4::from_scale_rotation_translation(Vec3::splat(ex.scale), Quat::IDENTITY, ex.position);
    let expected = placement
        * Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0))
        * Mat4::from_rotation_z(std::f32::consts::FRAC_PI_4);
    assert!(world.abs_diff_eq(expected, 1e-5), "{world:?} != {expected:?}");

    // The local x and y axes are no longer perpendicular.
    let x = world.transform_vector3(Vec3::X);
    let y = world.transform_vector3(Vec3::Y);
    assert!(x.dot(y).abs() > 0.1);
}

#[test]
fn truncated_glb_is_rejected() {
    let bytes = triangle_glb();
    assert!(parse_glb(&bytes[..bytes.len() / 2]).is_err());
}

#[test]
fn loaded_model_joins_as_ownership_group() {
    let ex = exhibit("Triangle");
    let mut sc = Showcase::new(ShowcaseConfig::default(), 3);
    let group = sc.add_model(&ex, parse_glb(&triangle_glb()).unwrap());

    let meshes = owned_meshes(&sc, group);
    assert_eq!(meshes.len(), 1);
    let (mesh_node, mesh, world) = meshes[0];
    assert!(matches!(sc.scene.node(mesh_node).unwrap().kind, NodeKind::Mesh(_)));
    assert_ne!(mesh_node, group);

    // Aim at the middle of the triangle's bounds in world space.
    let center = world.transform_point3(sc.scene.mesh(mesh).unwrap().bounds.center());
    let ndc: Vec2 = sc.camera.view_projection().project_point3(center).truncate();
    assert_eq!(sc.pick(ndc), Some(group));

    sc.clicked(ndc);
    assert_eq!(sc.state(), InteractionState::Locked(group));
    assert_eq!(
        sc.controller().camera_target(),
        ex.position + Vec3::new(0.0, 0.0, 2.0)
    );
}
