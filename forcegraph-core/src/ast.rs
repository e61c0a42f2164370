//! Parsed form of a `.graph` scene file

use crate::engine::{NodeId, NodeSpec};
use crate::links::LinkMeta;
use glam::DVec2;

/// Simulation constants: `simulate dt = x friction = f mass = m steps = n`
#[derive(Debug, Clone, PartialEq)]
pub struct SimulateDecl {
    pub dt: f64,
    pub friction: Option<f64>,
    pub mass: Option<f64>,
    pub steps: usize,
}

/// `circle radius = r [center = (x, y)]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleDecl {
    pub radius: f64,
    pub center: Option<DVec2>,
}

/// `link a b [key = value]...`
#[derive(Debug, Clone, PartialEq)]
pub struct LinkDecl {
    pub a: NodeId,
    pub b: NodeId,
    pub meta: LinkMeta,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForceKind {
    Spring { k: f64, rest: f64 },
    Gravity { g: f64 },
}

/// `force spring(a, b) k = x rest = y` or `force gravity(a, b) G = x`
#[derive(Debug, Clone, PartialEq)]
pub struct ForceDecl {
    pub a: NodeId,
    pub b: NodeId,
    pub kind: ForceKind,
}

/// Declarations that populate the simulation, applied in file order
#[derive(Debug, Clone, PartialEq)]
pub enum SceneItem {
    Node(NodeSpec),
    Anchor(NodeId),
    Link(LinkDecl),
    Force(ForceDecl),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectorKind {
    Distance { a: NodeId, b: NodeId },
    Position(NodeId),
}

/// `detect name = distance(a, b)` or `detect name = position(a)`
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorDecl {
    pub name: String,
    pub kind: DetectorKind,
}

/// A whole scene file
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub simulate: SimulateDecl,
    pub circle: Option<CircleDecl>,
    pub seed: Option<u64>,
    pub force_links: bool,
    pub items: Vec<SceneItem>,
    pub detectors: Vec<DetectorDecl>,
}
