//! Unit tests for the spring force law, evaluated through a simulation

use forcegraph_core::tests::test_helpers::{approx_eq, vec_approx_eq};
use forcegraph_core::{ForceLaw, NodeSpec, SimConfig, SimError, Simulation, Spring};
use glam::DVec2;

fn create_test_sim(b: DVec2) -> Simulation {
    let config = SimConfig::new().with_mass(1.0).with_friction(0.0);
    let mut sim = Simulation::new(config).unwrap();
    sim.add_node(NodeSpec::at(0, DVec2::ZERO)).unwrap();
    sim.add_node(NodeSpec::at(1, b)).unwrap();
    sim
}

#[test]
fn test_spring_force_at_rest_length() {
    let mut sim = create_test_sim(DVec2::new(5.0, 0.0));
    sim.add_force(0, 1, Spring::new(10.0, 5.0)).unwrap();

    let force = sim.force_on(0).unwrap();
    assert!(force.length() < 1e-12, "Spring at rest should exert no force");
}

#[test]
fn test_spring_force_extended() {
    let mut sim = create_test_sim(DVec2::new(2.0, 0.0));
    sim.add_force(0, 1, Spring::new(1.0, 1.0)).unwrap();

    // |1 * ((2,0)/2) * (2 - 1)| = 1, along +x
    let force = sim.force_on(0).unwrap();
    assert!(vec_approx_eq(force, DVec2::new(1.0, 0.0), 1e-12));
}

#[test]
fn test_spring_force_compressed() {
    let mut sim = create_test_sim(DVec2::new(2.0, 0.0));
    sim.add_force(0, 1, Spring::new(10.0, 5.0)).unwrap();

    // Compressed springs push apart
    let force = sim.force_on(0).unwrap();
    assert!(approx_eq(force.x, -30.0, 1e-9));
    assert_eq!(force.y, 0.0);
}

#[test]
fn test_spring_force_is_symmetric() {
    let mut sim = create_test_sim(DVec2::new(3.0, 4.0));
    sim.add_force(0, 1, Spring::new(10.0, 3.0)).unwrap();

    let on_a = sim.force_on(0).unwrap();
    let on_b = sim.force_on(1).unwrap();
    assert!(vec_approx_eq(on_a, -on_b, 1e-12));

    // Extension 2.0, magnitude 20.0 along (0.6, 0.8)
    assert!(vec_approx_eq(on_a, DVec2::new(12.0, 16.0), 1e-9));
}

#[test]
fn test_spring_registered_in_either_order() {
    let mut forward = create_test_sim(DVec2::new(3.0, 0.0));
    forward.add_force(0, 1, Spring::new(2.0, 1.0)).unwrap();
    let mut backward = create_test_sim(DVec2::new(3.0, 0.0));
    backward.add_force(1, 0, Spring::new(2.0, 1.0)).unwrap();

    assert_eq!(forward.force_on(0).unwrap(), backward.force_on(0).unwrap());
    assert_eq!(forward.force_on(1).unwrap(), backward.force_on(1).unwrap());
}

#[test]
fn test_spring_near_singular_separation() {
    let mut sim = create_test_sim(DVec2::new(0.005, 0.0));
    sim.add_force(0, 1, Spring::new(1e6, 2.0)).unwrap();

    assert_eq!(sim.force_on(0).unwrap(), DVec2::ZERO);
    assert_eq!(sim.force_on(1).unwrap(), DVec2::ZERO);
}

#[test]
fn test_zero_rest_length_spring() {
    let law = Spring::centering(2.0);
    let sim = create_test_sim(DVec2::new(3.0, 4.0));
    let a = sim.node(0).unwrap();
    let b = sim.node(1).unwrap();

    assert_eq!(law.force(b, a, b.pos - a.pos), DVec2::new(6.0, 8.0));
    // No singular cutoff for the linear variant
    assert_eq!(
        law.force(b, a, DVec2::new(0.001, 0.0)),
        DVec2::new(0.002, 0.0)
    );
}

#[test]
fn test_multiple_laws_on_one_pair_sum() {
    let mut sim = create_test_sim(DVec2::new(2.0, 0.0));
    sim.add_force(0, 1, Spring::new(1.0, 1.0)).unwrap();
    sim.add_force(0, 1, Spring::centering(0.5)).unwrap();

    // 1.0 from the rest-length spring, 0.5 * 2.0 from the centering spring
    let force = sim.force_on(0).unwrap();
    assert!(vec_approx_eq(force, DVec2::new(2.0, 0.0), 1e-12));
    assert_eq!(sim.registry().laws_for(1, 0).len(), 2);
}

#[test]
fn test_negative_rest_length_rejected() {
    let mut sim = create_test_sim(DVec2::new(2.0, 0.0));
    let err = sim.add_force(0, 1, Spring::new(1.0, -1.0)).unwrap_err();
    assert!(matches!(
        err,
        SimError::InvalidParameter {
            name: "rest length",
            ..
        }
    ));
    assert!(sim.registry().is_empty());
    assert!(sim.links().is_empty());
}
