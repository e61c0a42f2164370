//! Link records handed to the renderer each frame

use crate::engine::{NodeId, NodeStore};
use crate::registry::PairKey;
use glam::DVec2;
use std::collections::btree_map::{self, Entry};
use std::collections::BTreeMap;

/// Display options for a link, opaque to the physics
pub type LinkMeta = BTreeMap<String, String>;

/// A tracked pair with its current endpoint positions
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub key: PairKey,
    pub meta: LinkMeta,
    /// Positions of `key.low()` and `key.high()`
    pub endpoints: [DVec2; 2],
}

/// Tracked pairs, iterated in `PairKey` order
#[derive(Debug, Default)]
pub struct LinkTable {
    links: BTreeMap<PairKey, Link>,
}

impl LinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a pair, replacing any metadata it already had
    pub fn track(&mut self, a: NodeId, b: NodeId, meta: LinkMeta) -> PairKey {
        let key = PairKey::new(a, b);
        match self.links.entry(key) {
            Entry::Occupied(mut entry) => entry.get_mut().meta = meta,
            Entry::Vacant(entry) => {
                entry.insert(Link {
                    key,
                    meta,
                    endpoints: [DVec2::ZERO; 2],
                });
            }
        }
        key
    }

    /// Track a pair only if it is not tracked yet
    pub fn track_if_absent(&mut self, a: NodeId, b: NodeId, meta: LinkMeta) -> PairKey {
        let key = PairKey::new(a, b);
        self.links.entry(key).or_insert_with(|| Link {
            key,
            meta,
            endpoints: [DVec2::ZERO; 2],
        });
        key
    }

    pub fn get(&self, a: NodeId, b: NodeId) -> Option<&Link> {
        self.links.get(&PairKey::new(a, b))
    }

    /// Recompute every endpoint from the committed node positions.
    ///
    /// Pairs naming an unknown node keep their previous endpoints.
    pub fn refresh(&mut self, store: &NodeStore) {
        for link in self.links.values_mut() {
            let ends = (store.position(link.key.low()), store.position(link.key.high()));
            if let (Some(lo), Some(hi)) = ends {
                link.endpoints = [lo, hi];
            }
        }
    }

    pub fn iter(&self) -> btree_map::Values<'_, PairKey, Link> {
        self.links.values()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl<'a> IntoIterator for &'a LinkTable {
    type Item = &'a Link;
    type IntoIter = btree_map::Values<'a, PairKey, Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
