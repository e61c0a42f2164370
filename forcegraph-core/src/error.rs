use crate::engine::NodeId;
use thiserror::Error;

/// Errors raised while building or querying a simulation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("node {0} already exists")]
    DuplicateId(NodeId),
    #[error("node {0} not found")]
    NotFound(NodeId),
    #[error("{0} requires a configured circle (radius and center)")]
    ConfigurationMissing(&'static str),
    #[error("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("node name '{0}' is already taken")]
    DuplicateName(String),
    #[error("no node named '{0}'")]
    NameNotFound(String),
}
