pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod links;
pub mod parser;
pub mod registry;
pub mod runtime;
pub mod simulation;

pub use config::{Circle, SimConfig};
pub use diagnostics::{format_parse_error, SourceLocation, Span};
pub use engine::{Node, NodeId, NodeSpec, NodeStore, Placement};
pub use error::SimError;
pub use forces::{ForceLaw, Gravity, Spring};
pub use links::{Link, LinkMeta, LinkTable};
pub use parser::{parse_scene, ParseError};
pub use registry::{ForceRegistry, PairKey};
pub use runtime::{
    build_simulation, build_simulation_from_source, build_simulation_with, evaluate_detectors,
    run_parsed, run_scene, scene_config, DetectorResult, DetectorValue, SceneError, SceneResult,
};
pub use simulation::{Frame, Simulation};

// Test helpers module (public for integration tests)
pub mod tests;
