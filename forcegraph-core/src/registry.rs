//! Per-pair force registration

use crate::engine::NodeId;
use crate::forces::ForceLaw;
use std::collections::HashMap;

/// Unordered pair of node ids, stored as `(min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey(NodeId, NodeId);

impl PairKey {
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn low(&self) -> NodeId {
        self.0
    }

    pub fn high(&self) -> NodeId {
        self.1
    }
}

/// Force laws keyed by the pair of nodes they act between
#[derive(Debug, Default)]
pub struct ForceRegistry {
    forces: HashMap<PairKey, Vec<Box<dyn ForceLaw>>>,
}

impl ForceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a law to the pair's list
    pub fn register(&mut self, a: NodeId, b: NodeId, law: Box<dyn ForceLaw>) -> PairKey {
        let key = PairKey::new(a, b);
        self.forces.entry(key).or_default().push(law);
        key
    }

    /// Laws acting between `a` and `b`, empty if none
    pub fn laws_for(&self, a: NodeId, b: NodeId) -> &[Box<dyn ForceLaw>] {
        self.forces
            .get(&PairKey::new(a, b))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of pairs with at least one law
    pub fn pair_count(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }
}
