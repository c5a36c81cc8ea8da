//! # SpaceNet Routing
//!
//! Multi-hop routing over the SpaceNet link layer.
//!
//! ## Core Components
//!
//! - [`PathFinder`]: Breadth-first minimum-hop search over nodes whose
//!   distance difference is within range
//! - [`build_relay_chain`]: Wraps a payload into nested relay packets along
//!   a path
//! - [`RelayRouter`]: Finds, builds and sends in one call
//!
//! ## Example
//!
//! ```rust
//! use spacenet_core::Node;
//! use spacenet_routing::{PathFinder, build_relay_chain};
//!
//! let nodes: Vec<Node> = [0.0, 100.0, 200.0]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, d)| Node::new(format!("n{}", i), *d).unwrap())
//!     .collect();
//!
//! let path = PathFinder::default()
//!     .find_path(&nodes, &nodes[0], &nodes[2])
//!     .unwrap();
//! let chain = build_relay_chain(&path, "Hello").unwrap();
//! assert_eq!(chain.hop_count(), 2);
//! ```

pub mod chain;
pub mod error;
pub mod pathfinder;
pub mod router;

// Re-export main types
pub use chain::build_relay_chain;
pub use error::{RoutingError, RoutingResult};
pub use pathfinder::{DEFAULT_RANGE, PathFinder};
pub use router::RelayRouter;
