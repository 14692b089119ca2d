//! Error types
//!
//! Simulation errors are programmer-invariant violations; they abort the
//! current frame and are logged at the frame boundary. Configuration errors
//! come from reading tuning or high-score files.

use crate::sim::entity::{EntityId, ModuleKind};

/// Simulation errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A required capability module was never attached to the entity
    #[error("module {module:?} not found on entity {entity}")]
    ModuleNotFound {
        /// Entity that was queried
        entity: EntityId,
        /// Module that was requested
        module: ModuleKind,
    },

    /// No live entity with this id
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),
}

/// Configuration and storage errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
