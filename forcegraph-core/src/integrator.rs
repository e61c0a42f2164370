use crate::config::{Circle, SimConfig};
use crate::engine::{Node, NodeStore};
use crate::registry::ForceRegistry;
use glam::DVec2;

/// Next kinematic state of one node
#[derive(Debug, Clone, Copy)]
struct Update {
    pos: DVec2,
    vel: DVec2,
    angle: Option<f64>,
}

/// Net force on the node in `slot`: every registered law against every other
/// node, plus damping on the node's own velocity.
pub fn force_on(store: &NodeStore, registry: &ForceRegistry, friction: f64, slot: usize) -> DVec2 {
    let nodes = store.nodes();
    let target = &nodes[slot];
    let mut total = DVec2::ZERO;

    for (other_slot, source) in nodes.iter().enumerate() {
        if other_slot == slot {
            continue;
        }
        let displacement = source.pos - target.pos;
        for law in registry.laws_for(source.id, target.id) {
            total += law.force(source, target, displacement);
        }
    }

    total - target.vel * friction
}

/// Semi-implicit Euler in the plane
fn integrate_free(node: &Node, force: DVec2, dt: f64) -> Update {
    let vel = node.vel + force * dt / node.mass;
    Update {
        pos: node.pos + vel * dt,
        vel,
        angle: None,
    }
}

/// Tangential projection of the force, then advance the angle on the circle
fn integrate_on_circle(node: &Node, angle: f64, circle: &Circle, force: DVec2, dt: f64) -> Update {
    let tangential = -force.x * angle.sin() + force.y * angle.cos();
    let dv = tangential * dt / node.mass;
    let angle = angle + dv / circle.radius;
    Update {
        pos: circle.point_at(angle),
        vel: DVec2::new(node.vel.x, node.vel.y + dv),
        angle: Some(angle),
    }
}

/// Advance every non-static node by one timestep.
///
/// All forces are computed from the positions at the start of the step and
/// committed together afterwards.
pub fn step(store: &mut NodeStore, registry: &ForceRegistry, config: &SimConfig) {
    let dt = config.timestep;
    let snapshot: &NodeStore = store;

    // Compute phase: read-only over the store
    let updates: Vec<Option<Update>> = snapshot
        .nodes()
        .iter()
        .enumerate()
        .map(|(slot, node)| {
            if node.is_static {
                return None;
            }
            let force = force_on(snapshot, registry, config.friction, slot);
            let update = match (node.angle, config.circle.as_ref()) {
                (Some(angle), Some(circle)) => integrate_on_circle(node, angle, circle, force, dt),
                _ => integrate_free(node, force, dt),
            };
            Some(update)
        })
        .collect();

    // Commit phase; static nodes are left untouched
    for (slot, update) in updates.into_iter().enumerate() {
        if let Some(Update { pos, vel, angle }) = update {
            store.commit(slot, pos, vel, angle);
        }
    }
}
