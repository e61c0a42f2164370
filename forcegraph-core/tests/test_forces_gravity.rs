//! Unit tests for the gravity force law

use forcegraph_core::tests::test_helpers::{approx_eq, vec_approx_eq};
use forcegraph_core::{Gravity, NodeSpec, SimConfig, Simulation};
use glam::DVec2;

fn create_test_sim(b: DVec2, mass_b: f64) -> Simulation {
    let config = SimConfig::new().with_mass(1.0).with_friction(0.0);
    let mut sim = Simulation::new(config).unwrap();
    sim.add_node(NodeSpec::at(0, DVec2::ZERO)).unwrap();
    sim.add_node(NodeSpec::at(1, b).with_mass(mass_b)).unwrap();
    sim
}

#[test]
fn test_gravity_attracts() {
    let mut sim = create_test_sim(DVec2::new(2.0, 0.0), 1.0);
    sim.add_force(0, 1, Gravity::new(1.0)).unwrap();

    let on_a = sim.force_on(0).unwrap();
    let on_b = sim.force_on(1).unwrap();
    assert!(on_a.x > 0.0, "a should be pulled toward b");
    assert!(on_b.x < 0.0, "b should be pulled toward a");
    assert!(vec_approx_eq(on_a, -on_b, 1e-12));
}

#[test]
fn test_gravity_inverse_square() {
    let mut near = create_test_sim(DVec2::new(1.0, 0.0), 1.0);
    near.add_force(0, 1, Gravity::new(1.0)).unwrap();
    let mut far = create_test_sim(DVec2::new(2.0, 0.0), 1.0);
    far.add_force(0, 1, Gravity::new(1.0)).unwrap();

    let ratio = near.force_on(0).unwrap().x / far.force_on(0).unwrap().x;
    assert!(approx_eq(ratio, 4.0, 1e-9));
}

#[test]
fn test_gravity_scales_with_both_masses() {
    let mut sim = create_test_sim(DVec2::new(0.0, 2.0), 8.0);
    sim.add_force(0, 1, Gravity::new(0.5)).unwrap();

    // 0.5 * 1 * 8 / 2^2 = 1.0, along +y
    let force = sim.force_on(0).unwrap();
    assert!(vec_approx_eq(force, DVec2::new(0.0, 1.0), 1e-12));
}

#[test]
fn test_gravity_softened_at_short_range() {
    let mut sim = create_test_sim(DVec2::new(1e-6, 0.0), 1.0);
    sim.add_force(0, 1, Gravity::new(1.0)).unwrap();

    let force = sim.force_on(0).unwrap();
    assert!(force.is_finite());
    // d / 0.01^3 with |d| = 1e-6
    assert!(approx_eq(force.x, 1.0, 1e-6));
}
