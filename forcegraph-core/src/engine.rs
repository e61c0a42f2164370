//! Node state and the arena that owns it

use crate::config::{self, Circle};
use crate::error::SimError;
use glam::DVec2;
use rand::Rng;
use std::collections::HashMap;
use std::f64::consts::TAU;

/// Caller-assigned node identifier
pub type NodeId = u32;

/// A point mass in the graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    /// Display name, unique among named nodes
    pub name: Option<String>,
    pub pos: DVec2,
    pub vel: DVec2,
    pub mass: f64,
    pub is_static: bool,
    /// Angle on the shared circle, only set for circle-constrained nodes
    pub angle: Option<f64>,
}

impl Node {
    /// Whether the integrator moves this node along the circle
    pub fn is_constrained(&self) -> bool {
        self.angle.is_some()
    }

    /// Name if present, else the id
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.id.to_string(),
        }
    }
}

/// Where a new node starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Explicit position, free planar motion
    At(DVec2),
    /// Angle on the configured circle, constrained motion
    Angle(f64),
    /// Random angle on the configured circle, uniform over the full `[0, 2π)`
    Random,
}

/// Everything needed to add one node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub id: NodeId,
    pub name: Option<String>,
    pub placement: Placement,
    pub is_static: bool,
    pub mass: Option<f64>,
    /// Existing node to draw a plain link to
    pub link_to: Option<NodeId>,
}

impl NodeSpec {
    fn new(id: NodeId, placement: Placement) -> Self {
        Self {
            id,
            name: None,
            placement,
            is_static: false,
            mass: None,
            link_to: None,
        }
    }

    pub fn at(id: NodeId, pos: DVec2) -> Self {
        Self::new(id, Placement::At(pos))
    }

    pub fn on_circle(id: NodeId, angle: f64) -> Self {
        Self::new(id, Placement::Angle(angle))
    }

    pub fn random(id: NodeId) -> Self {
        Self::new(id, Placement::Random)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Mark the node static: it never moves
    pub fn fixed(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn linked_to(mut self, other: NodeId) -> Self {
        self.link_to = Some(other);
        self
    }
}

/// Arena of nodes: dense storage plus an id -> slot map.
///
/// Slots are assigned in insertion order and never reused, so iteration is
/// deterministic. `positions` is indexed by node id and mirrors each node's
/// `pos` for bulk export; ids with no node hold `DVec2::NAN`.
#[derive(Debug, Default)]
pub struct NodeStore {
    nodes: Vec<Node>,
    positions: Vec<DVec2>,
    index: HashMap<NodeId, usize>,
    names: HashMap<String, NodeId>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the requested placement and insert the node.
    ///
    /// Angle and random placement need `circle`; random placement draws from `rng`.
    /// The resolved mass must be positive and finite.
    pub fn add_node<R: Rng>(
        &mut self,
        spec: &NodeSpec,
        default_mass: f64,
        circle: Option<&Circle>,
        rng: &mut R,
    ) -> Result<Node, SimError> {
        if self.index.contains_key(&spec.id) {
            return Err(SimError::DuplicateId(spec.id));
        }
        if let Some(name) = &spec.name {
            if self.names.contains_key(name) {
                return Err(SimError::DuplicateName(name.clone()));
            }
        }
        let mass = config::positive("mass", spec.mass.unwrap_or(default_mass))?;

        let (pos, angle) = match spec.placement {
            Placement::At(pos) => (pos, None),
            Placement::Angle(angle) => {
                let circle = circle.ok_or(SimError::ConfigurationMissing("angle placement"))?;
                (circle.point_at(angle), Some(angle))
            }
            Placement::Random => {
                let circle = circle.ok_or(SimError::ConfigurationMissing("random placement"))?;
                let angle = rng.random_range(0.0..TAU);
                (circle.point_at(angle), Some(angle))
            }
        };

        let node = Node {
            id: spec.id,
            name: spec.name.clone(),
            pos,
            vel: DVec2::ZERO,
            mass,
            is_static: spec.is_static,
            angle,
        };

        let slot = self.nodes.len();
        let idx = node.id as usize;
        if idx >= self.positions.len() {
            self.positions.resize(idx + 1, DVec2::NAN);
        }
        self.positions[idx] = pos;
        self.index.insert(node.id, slot);
        if let Some(name) = &node.name {
            self.names.insert(name.clone(), node.id);
        }
        self.nodes.push(node.clone());
        Ok(node)
    }

    pub fn get(&self, id: NodeId) -> Result<&Node, SimError> {
        self.slot_of(id)
            .map(|slot| &self.nodes[slot])
            .ok_or(SimError::NotFound(id))
    }

    pub fn by_name(&self, name: &str) -> Result<&Node, SimError> {
        let id = self
            .names
            .get(name)
            .ok_or_else(|| SimError::NameNotFound(name.to_string()))?;
        self.get(*id)
    }

    /// Committed position of `id`, O(1)
    pub fn position(&self, id: NodeId) -> Option<DVec2> {
        if self.index.contains_key(&id) {
            self.positions.get(id as usize).copied()
        } else {
            None
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn slot_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in slot order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Dense position array indexed by node id, `len` is the largest id plus one
    pub fn positions(&self) -> &[DVec2] {
        &self.positions
    }

    /// Overwrite the kinematic state of one slot
    pub(crate) fn commit(&mut self, slot: usize, pos: DVec2, vel: DVec2, angle: Option<f64>) {
        let node = &mut self.nodes[slot];
        node.pos = pos;
        node.vel = vel;
        node.angle = angle;
        self.positions[node.id as usize] = pos;
    }
}
