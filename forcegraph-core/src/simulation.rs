//! The simulation instance: owns nodes, forces and links

use crate::config::SimConfig;
use crate::engine::{Node, NodeId, NodeSpec, NodeStore};
use crate::error::SimError;
use crate::forces::ForceLaw;
use crate::integrator;
use crate::links::{LinkMeta, LinkTable};
use crate::registry::{ForceRegistry, PairKey};
use glam::DVec2;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Read-only view of the state after a step
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Positions indexed by node id; ids without a node hold `DVec2::NAN`
    pub positions: &'a [DVec2],
    pub links: &'a LinkTable,
}

impl Frame<'_> {
    pub fn position_of(&self, id: NodeId) -> Option<DVec2> {
        self.positions
            .get(id as usize)
            .copied()
            .filter(|pos| !pos.is_nan())
    }
}

/// Metadata for links that only exist because a force was registered
fn force_link_meta() -> LinkMeta {
    LinkMeta::from([
        ("linestyle".to_string(), "-.".to_string()),
        ("color".to_string(), "green".to_string()),
    ])
}

/// A self-contained force-directed graph simulation
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    store: NodeStore,
    registry: ForceRegistry,
    links: LinkTable,
    rng: StdRng,
    steps: u64,
}

impl Simulation {
    /// Fails with `InvalidParameter` for a non-positive timestep, mass or
    /// radius, or a negative friction.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            config,
            store: NodeStore::new(),
            registry: ForceRegistry::new(),
            links: LinkTable::new(),
            rng,
            steps: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Add a node. Fails if the id or name is taken, if `link_to` is unknown,
    /// if the mass is not positive, or if the placement needs a circle and
    /// none is configured.
    pub fn add_node(&mut self, spec: NodeSpec) -> Result<Node, SimError> {
        if let Some(other) = spec.link_to {
            if !self.store.contains(other) {
                return Err(SimError::NotFound(other));
            }
        }

        let node = self.store.add_node(
            &spec,
            self.config.default_mass,
            self.config.circle.as_ref(),
            &mut self.rng,
        )?;
        debug!(
            "added node {} at ({:.4}, {:.4}) static={} constrained={}",
            node.label(),
            node.pos.x,
            node.pos.y,
            node.is_static,
            node.is_constrained()
        );

        if let Some(other) = spec.link_to {
            self.links.track(node.id, other, LinkMeta::new());
            self.links.refresh(&self.store);
        }
        Ok(node)
    }

    /// Add a static node at the circle's center
    pub fn add_anchor(&mut self, id: NodeId) -> Result<Node, SimError> {
        let circle = self
            .config
            .circle
            .ok_or(SimError::ConfigurationMissing("center anchor"))?;
        self.add_node(NodeSpec::at(id, circle.center).fixed())
    }

    /// Track a pair for drawing. Replaces metadata of an existing link.
    pub fn add_link(&mut self, a: NodeId, b: NodeId, meta: LinkMeta) -> Result<PairKey, SimError> {
        self.require(a)?;
        self.require(b)?;
        let key = self.links.track(a, b, meta);
        self.links.refresh(&self.store);
        debug!("linked {} and {}", key.low(), key.high());
        Ok(key)
    }

    /// Register a force law between two nodes
    pub fn add_force<F>(&mut self, a: NodeId, b: NodeId, law: F) -> Result<PairKey, SimError>
    where
        F: ForceLaw + 'static,
    {
        self.require(a)?;
        self.require(b)?;
        law.validate()?;
        debug!("{} between {} and {}", law.name(), a, b);
        let key = self.registry.register(a, b, Box::new(law));
        if self.config.track_forces {
            self.links.track_if_absent(a, b, force_link_meta());
            self.links.refresh(&self.store);
        }
        Ok(key)
    }

    /// Advance one timestep and return the committed state
    pub fn step(&mut self) -> Frame<'_> {
        integrator::step(&mut self.store, &self.registry, &self.config);
        self.links.refresh(&self.store);
        self.steps += 1;
        trace!("step {}", self.steps);
        self.frame()
    }

    /// Run `count` steps, handing each frame to `observer`
    pub fn run_with<F>(&mut self, count: usize, mut observer: F)
    where
        F: FnMut(u64, Frame<'_>),
    {
        for _ in 0..count {
            let step = self.steps + 1;
            observer(step, self.step());
        }
    }

    /// Current state without stepping
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            positions: self.store.positions(),
            links: &self.links,
        }
    }

    /// Net force the next step would apply to `id`
    pub fn force_on(&self, id: NodeId) -> Result<DVec2, SimError> {
        let slot = self.store.slot_of(id).ok_or(SimError::NotFound(id))?;
        Ok(integrator::force_on(
            &self.store,
            &self.registry,
            self.config.friction,
            slot,
        ))
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, SimError> {
        self.store.get(id)
    }

    /// Lookup by the optional display name
    pub fn node_by_name(&self, name: &str) -> Result<&Node, SimError> {
        self.store.by_name(name)
    }

    pub fn position_of(&self, id: NodeId) -> Result<DVec2, SimError> {
        self.store.position(id).ok_or(SimError::NotFound(id))
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> &[Node] {
        self.store.nodes()
    }

    pub fn links(&self) -> &LinkTable {
        &self.links
    }

    pub fn registry(&self) -> &ForceRegistry {
        &self.registry
    }

    /// Number of completed steps
    pub fn steps(&self) -> u64 {
        self.steps
    }

    fn require(&self, id: NodeId) -> Result<(), SimError> {
        self.store.get(id).map(|_| ())
    }
}
