//! Routed sends
//!
//! [`RelayRouter`] ties path search to transmission: find a minimum-hop
//! path, wrap the payload into a relay chain along it, and drive the chain
//! through a [`TransmissionController`].

use spacenet_core::{Node, Payload};
use spacenet_link::{NoiseSource, TransmissionController};
use tracing::{info, warn};

use crate::chain::build_relay_chain;
use crate::error::RoutingError;
use crate::pathfinder::PathFinder;

/// Routes payloads over multi-hop relay chains
pub struct RelayRouter<'c, N: NoiseSource> {
    controller: &'c TransmissionController<N>,
    finder: PathFinder,
}

impl<'c, N: NoiseSource> RelayRouter<'c, N> {
    /// Create a router whose adjacency threshold matches the link range
    pub fn new(controller: &'c TransmissionController<N>) -> Self {
        let finder = PathFinder::new(controller.link().config().max_range);
        Self { controller, finder }
    }

    /// Create a router with a custom path finder
    pub fn with_finder(controller: &'c TransmissionController<N>, finder: PathFinder) -> Self {
        Self { controller, finder }
    }

    pub fn finder(&self) -> &PathFinder {
        &self.finder
    }

    /// Find a path from `start` to `end` and deliver `payload` along it
    ///
    /// Returns the names of the nodes the payload travelled through.
    pub fn route_and_send(
        &self,
        nodes: &[Node],
        start: &Node,
        end: &Node,
        payload: impl Into<Payload>,
    ) -> Result<Vec<String>, RoutingError> {
        let Some(path) = self.finder.find_path(nodes, start, end) else {
            warn!(start = %start, end = %end, "No route");
            return Err(RoutingError::NoPath {
                from: start.name().to_string(),
                to: end.name().to_string(),
                max_range: self.finder.max_range(),
            });
        };

        let envelope = build_relay_chain(&path, payload)?;
        info!(
            start = %start,
            end = %end,
            hops = envelope.hop_count(),
            "Sending along relay chain"
        );
        self.controller.send(&envelope)?;

        Ok(path.iter().map(|n| n.name().to_string()).collect())
    }
}
