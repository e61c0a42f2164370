//! Pairwise force laws

use crate::config;
use crate::engine::Node;
use crate::error::SimError;
use glam::DVec2;
use std::fmt;

/// Separations shorter than this are treated as coincident
pub const MIN_SEPARATION: f64 = 0.01;

/// A force acting between two nodes.
///
/// `displacement` is `source.pos - target.pos`; the returned vector is the
/// force exerted on `target`.
pub trait ForceLaw: fmt::Debug {
    fn force(&self, source: &Node, target: &Node, displacement: DVec2) -> DVec2;

    /// Short name used in logs and scene files
    fn name(&self) -> &'static str;

    /// Checked once when the law is registered
    fn validate(&self) -> Result<(), SimError> {
        Ok(())
    }
}

/// Hooke spring toward a rest length.
///
/// A zero rest length degenerates to a linear attraction toward coincidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub k: f64,
    pub rest: f64,
}

impl Spring {
    pub fn new(k: f64, rest: f64) -> Self {
        Self { k, rest }
    }

    /// Zero rest length spring, used to pull nodes toward an anchor
    pub fn centering(k: f64) -> Self {
        Self { k, rest: 0.0 }
    }
}

impl ForceLaw for Spring {
    fn force(&self, _source: &Node, _target: &Node, displacement: DVec2) -> DVec2 {
        if self.rest == 0.0 {
            return self.k * displacement;
        }
        let dist = displacement.length();
        if dist < MIN_SEPARATION {
            return DVec2::ZERO;
        }
        self.k * (displacement / dist) * (dist - self.rest)
    }

    fn name(&self) -> &'static str {
        "spring"
    }

    fn validate(&self) -> Result<(), SimError> {
        config::non_negative("rest length", self.rest).map(|_| ())
    }
}

/// Newtonian attraction, softened below `MIN_SEPARATION`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    pub g: f64,
}

impl Gravity {
    pub fn new(g: f64) -> Self {
        Self { g }
    }
}

impl ForceLaw for Gravity {
    fn force(&self, source: &Node, target: &Node, displacement: DVec2) -> DVec2 {
        let dist = displacement.length().max(MIN_SEPARATION);
        self.g * source.mass * target.mass * displacement / dist.powi(3)
    }

    fn name(&self) -> &'static str {
        "gravity"
    }
}
