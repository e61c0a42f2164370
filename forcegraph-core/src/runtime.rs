//! Turning scene files into running simulations

use crate::ast::{DetectorKind, ForceKind, Scene, SceneItem};
use crate::config::{Circle, SimConfig};
use crate::engine::NodeId;
use crate::error::SimError;
use crate::forces::{Gravity, Spring};
use crate::parser::{parse_scene, ParseError};
use crate::simulation::Simulation;
use glam::DVec2;
use log::debug;
use thiserror::Error;

/// Failure to load or run a scene
#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error("detector '{name}' refers to unknown node {id}")]
    UnknownDetectorNode { name: String, id: NodeId },
}

/// Value of a detector after the run
#[derive(Debug, Clone, PartialEq)]
pub enum DetectorValue {
    Scalar(f64),
    Point(DVec2),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectorResult {
    pub name: String,
    pub value: DetectorValue,
}

/// Final state of a headless run
#[derive(Debug, Clone, PartialEq)]
pub struct SceneResult {
    pub detectors: Vec<DetectorResult>,
    /// `(id, position)` in insertion order
    pub positions: Vec<(NodeId, DVec2)>,
    pub steps: u64,
}

/// Configuration described by a scene's `simulate`, `circle` and `seed` lines
pub fn scene_config(scene: &Scene) -> SimConfig {
    let defaults = SimConfig::default();
    let mut config = SimConfig::new()
        .with_timestep(scene.simulate.dt)
        .with_friction(scene.simulate.friction.unwrap_or(defaults.friction))
        .with_mass(scene.simulate.mass.unwrap_or(defaults.default_mass));
    if let Some(circle) = scene.circle {
        let mut c = Circle::new(circle.radius);
        if let Some(center) = circle.center {
            c = c.with_center(center);
        }
        config = config.with_circle(c);
    }
    if let Some(seed) = scene.seed {
        config = config.with_seed(seed);
    }
    if !scene.force_links {
        config = config.without_force_links();
    }
    config
}

/// Build a simulation from a parsed scene, applying declarations in order
pub fn build_simulation(scene: &Scene) -> Result<Simulation, SimError> {
    build_simulation_with(scene, scene_config(scene))
}

/// Build with an explicit configuration, e.g. one with an overridden seed
pub fn build_simulation_with(scene: &Scene, config: SimConfig) -> Result<Simulation, SimError> {
    let mut sim = Simulation::new(config)?;

    for item in &scene.items {
        match item {
            SceneItem::Node(spec) => {
                sim.add_node(spec.clone())?;
            }
            SceneItem::Anchor(id) => {
                sim.add_anchor(*id)?;
            }
            SceneItem::Link(link) => {
                sim.add_link(link.a, link.b, link.meta.clone())?;
            }
            SceneItem::Force(force) => match force.kind {
                ForceKind::Spring { k, rest } => {
                    sim.add_force(force.a, force.b, Spring::new(k, rest))?;
                }
                ForceKind::Gravity { g } => {
                    sim.add_force(force.a, force.b, Gravity::new(g))?;
                }
            },
        }
    }

    debug!(
        "built simulation: {} nodes, {} force pairs, {} links",
        sim.nodes().len(),
        sim.registry().pair_count(),
        sim.links().len()
    );
    Ok(sim)
}

/// Parse and build in one go
pub fn build_simulation_from_source(source: &str) -> Result<(Scene, Simulation), SceneError> {
    let scene = parse_scene(source)?;
    let sim = build_simulation(&scene)?;
    Ok((scene, sim))
}

/// Main headless entry point: parse, build, step `steps` times, evaluate detectors
pub fn run_scene(source: &str) -> Result<SceneResult, SceneError> {
    let scene = parse_scene(source)?;
    run_parsed(&scene, scene_config(&scene), scene.simulate.steps)
}

/// Run an already parsed scene with explicit configuration and step count
pub fn run_parsed(scene: &Scene, config: SimConfig, steps: usize) -> Result<SceneResult, SceneError> {
    let mut sim = build_simulation_with(scene, config)?;
    for _ in 0..steps {
        sim.step();
    }

    let detectors = evaluate_detectors(scene, &sim)?;
    let positions = sim.nodes().iter().map(|n| (n.id, n.pos)).collect();

    Ok(SceneResult {
        detectors,
        positions,
        steps: sim.steps(),
    })
}

/// Evaluate every detector against the current state
pub fn evaluate_detectors(scene: &Scene, sim: &Simulation) -> Result<Vec<DetectorResult>, SceneError> {
    let lookup = |name: &str, id: NodeId| {
        sim.position_of(id).map_err(|_| SceneError::UnknownDetectorNode {
            name: name.to_string(),
            id,
        })
    };

    scene
        .detectors
        .iter()
        .map(|detector| {
            let value = match detector.kind {
                DetectorKind::Distance { a, b } => {
                    let pa = lookup(&detector.name, a)?;
                    let pb = lookup(&detector.name, b)?;
                    DetectorValue::Scalar(pa.distance(pb))
                }
                DetectorKind::Position(id) => DetectorValue::Point(lookup(&detector.name, id)?),
            };
            Ok(DetectorResult {
                name: detector.name.clone(),
                value,
            })
        })
        .collect()
}
