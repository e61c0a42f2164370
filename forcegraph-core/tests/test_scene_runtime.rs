//! Building and running simulations from scene files

use forcegraph_core::tests::test_helpers::{approx_eq, load_scene, point, run_scene_file, scalar};
use forcegraph_core::{
    build_simulation_from_source, parse_scene, run_parsed, run_scene, scene_config, Circle,
    SceneError, SimError,
};
use glam::DVec2;

#[test]
fn test_spring_pair_settles_at_rest_length() {
    let result = run_scene_file("spring_pair.graph").expect("Failed to run scene");
    assert_eq!(result.steps, 1000);

    let gap = scalar(&result, "gap").unwrap();
    assert!(approx_eq(gap, 1.0, 1e-4), "gap = {}", gap);

    let p1 = point(&result, "p1").unwrap();
    assert!(approx_eq(p1.x, 1.0, 1e-4));
    assert_eq!(p1.y, 0.0);
}

#[test]
fn test_cluster_leaves_settle_around_hub() {
    let result = run_scene_file("cluster.graph").expect("Failed to run scene");

    // Node 3 only feels its spring
    let r3 = scalar(&result, "r3").unwrap();
    assert!(approx_eq(r3, 1.0, 1e-4), "r3 = {}", r3);

    // Nodes 1 and 2 are also pulled together a little
    for name in ["r1", "r2"] {
        let r = scalar(&result, name).unwrap();
        assert!(r < 1.0 && r > 0.98, "{} = {}", name, r);
    }
}

#[test]
fn test_ring_nodes_stay_on_circle() {
    let source = load_scene("ring.graph").unwrap();
    let (scene, mut sim) = build_simulation_from_source(&source).unwrap();
    let circle = sim.config().circle.unwrap();
    assert_eq!(circle, Circle::new(0.3));
    assert_eq!(scene.seed, Some(42));
    assert_eq!(sim.node_by_name("east").unwrap().id, 3);
    assert_eq!(sim.node_by_name("north").unwrap().mass, 2e5);

    for _ in 0..scene.simulate.steps {
        sim.step();
    }
    for node in sim.nodes() {
        let r = node.pos.distance(circle.center);
        if node.is_static {
            assert_eq!(node.pos, circle.center);
        } else {
            assert!(node.is_constrained());
            assert!(approx_eq(r, 0.3, 1e-12), "node {} at r = {}", node.id, r);
        }
    }

    // Explicit link, link_to wiring and the four spring pairs
    assert_eq!(sim.links().len(), 6);
    let styled = sim.links().get(1, 3).unwrap();
    assert_eq!(styled.meta.get("linestyle").map(String::as_str), Some("--"));
    assert!(sim.links().get(0, 1).unwrap().meta.is_empty());
}

#[test]
fn test_ring_detectors() {
    let result = run_scene_file("ring.graph").unwrap();
    assert_eq!(point(&result, "center"), Some(DVec2::new(0.5, 0.5)));
    let d12 = scalar(&result, "d12").unwrap();
    assert!(d12 >= 0.0 && d12 <= 0.6 + 1e-12);
}

#[test]
fn test_scene_runs_are_deterministic() {
    for file in ["spring_pair.graph", "ring.graph", "cluster.graph"] {
        let first = run_scene_file(file).unwrap();
        let second = run_scene_file(file).unwrap();
        assert_eq!(first, second, "{} should replay identically", file);
    }
}

#[test]
fn test_seed_override_changes_random_layout() {
    let source = load_scene("ring.graph").unwrap();
    let scene = parse_scene(&source).unwrap();

    let seeded = run_parsed(&scene, scene_config(&scene), 0).unwrap();
    let again = run_parsed(&scene, scene_config(&scene), 0).unwrap();
    let other = run_parsed(&scene, scene_config(&scene).with_seed(43), 0).unwrap();

    assert_eq!(seeded.positions, again.positions);
    assert_ne!(seeded.positions, other.positions);
    assert_eq!(seeded.steps, 0);
}

#[test]
fn test_duplicate_node_surfaces_sim_error() {
    let source = r#"
simulate dt = 0.1 steps = 10
node 1 at (0.0, 0.0)
node 1 at (1.0, 0.0)
"#;
    let err = run_scene(source).unwrap_err();
    assert!(matches!(err, SceneError::Sim(SimError::DuplicateId(1))));
}

#[test]
fn test_angle_without_circle_surfaces_configuration_error() {
    let source = r#"
simulate dt = 0.1 steps = 10
node 1 angle 0.5
"#;
    let err = run_scene(source).unwrap_err();
    assert!(matches!(
        err,
        SceneError::Sim(SimError::ConfigurationMissing(_))
    ));
}

#[test]
fn test_anchor_without_circle() {
    let err = run_scene("simulate dt = 0.1 steps = 1\nanchor 0\n").unwrap_err();
    assert!(matches!(
        err,
        SceneError::Sim(SimError::ConfigurationMissing(_))
    ));
}

#[test]
fn test_force_on_unknown_node() {
    let source = r#"
simulate dt = 0.1 steps = 10
node 1 at (0.0, 0.0)
force spring(1, 2) k = 1.0 rest = 1.0
"#;
    let err = run_scene(source).unwrap_err();
    assert!(matches!(err, SceneError::Sim(SimError::NotFound(2))));
}

#[test]
fn test_detector_on_unknown_node() {
    let source = r#"
simulate dt = 0.1 steps = 1
node 1 at (0.0, 0.0)
detect lost = position(5)
"#;
    match run_scene(source).unwrap_err() {
        SceneError::UnknownDetectorNode { name, id } => {
            assert_eq!(name, "lost");
            assert_eq!(id, 5);
        }
        other => panic!("Expected unknown detector node, got {:?}", other),
    }
}

#[test]
fn test_parse_errors_pass_through() {
    let err = run_scene("node 1 at (0.0, 0.0)\n").unwrap_err();
    assert!(matches!(err, SceneError::Parse(_)));
    assert!(err.to_string().contains("Missing 'simulate'"));
}

#[test]
fn test_scene_config_uses_defaults() {
    let scene = parse_scene("simulate dt = 0.3 steps = 1").unwrap();
    let config = scene_config(&scene);
    assert_eq!(config.timestep, 0.3);
    assert_eq!(config.friction, 100.0);
    assert_eq!(config.default_mass, 1e5);
    assert!(config.seed.is_none());
    assert!(config.track_forces);
}

#[test]
fn test_duplicate_name_surfaces_as_sim_error() {
    let source = r#"
simulate dt = 0.2 steps = 1
node 1 "hub" at (0.0, 0.0)
node 2 "hub" at (1.0, 0.0)
"#;
    let err = build_simulation_from_source(source).unwrap_err();
    match err {
        SceneError::Sim(SimError::DuplicateName(name)) => assert_eq!(name, "hub"),
        other => panic!("Expected duplicate name, got {:?}", other),
    }
}
