//! Routing error types

use spacenet_core::{CommsError, CoreError};
use thiserror::Error;

/// Errors from path search, chain construction and routed sends
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    /// No chain of in-range hops connects the endpoints
    #[error("No path from {from} to {to} within range {max_range}")]
    NoPath {
        from: String,
        to: String,
        max_range: f64,
    },

    /// A relay chain needs at least one hop
    #[error("Path needs at least two nodes, got {0}")]
    PathTooShort(usize),

    /// The path could not be turned into a valid relay chain
    #[error("Invalid relay chain: {0}")]
    Chain(#[from] CoreError),

    /// The routed transmission failed
    #[error("Transmission failed: {0}")]
    Comms(#[from] CommsError),
}

/// Result type for routing operations
pub type RoutingResult<T> = Result<T, RoutingError>;
