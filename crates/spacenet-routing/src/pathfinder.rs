//! Minimum-hop path search
//!
//! Two distinct nodes are adjacent when their distance difference is within
//! the range threshold. [`PathFinder::find_path`] runs a breadth-first search
//! over that implicit graph, so the first path to reach the destination has
//! the fewest hops. Total distance is not minimized.
//!
//! Neighbours are expanded in the order the caller lists the nodes, which
//! decides between equally short paths.

use std::collections::{HashSet, VecDeque};

use spacenet_core::Node;
use tracing::{debug, trace};

/// Default adjacency threshold
pub const DEFAULT_RANGE: f64 = 150.0;

/// Breadth-first path search over nodes within range of each other
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathFinder {
    max_range: f64,
}

impl Default for PathFinder {
    fn default() -> Self {
        Self::new(DEFAULT_RANGE)
    }
}

impl PathFinder {
    pub fn new(max_range: f64) -> Self {
        Self { max_range }
    }

    pub fn max_range(&self) -> f64 {
        self.max_range
    }

    /// Whether a direct hop between `a` and `b` exists
    pub fn in_range(&self, a: &Node, b: &Node) -> bool {
        !a.same_as(b) && a.distance_to(b) <= self.max_range
    }

    /// Nodes adjacent to `node`, in caller order
    pub fn neighbors<'a>(&self, nodes: &'a [Node], node: &Node) -> Vec<&'a Node> {
        nodes.iter().filter(|n| self.in_range(node, n)).collect()
    }

    /// Find a minimum-hop path `[start, ..., end]`
    ///
    /// Returns `None` when either endpoint is missing from `nodes` or no
    /// chain of in-range hops connects them. `start == end` yields `[start]`.
    pub fn find_path<'a>(
        &self,
        nodes: &'a [Node],
        start: &Node,
        end: &Node,
    ) -> Option<Vec<&'a Node>> {
        let start = nodes.iter().find(|n| n.same_as(start))?;
        if !nodes.iter().any(|n| n.same_as(end)) {
            debug!(end = %end, "Destination not among nodes");
            return None;
        }

        let mut visited: HashSet<&'a str> = HashSet::from([start.name()]);
        let mut frontier: VecDeque<Vec<&'a Node>> = VecDeque::from([vec![start]]);

        while let Some(path) = frontier.pop_front() {
            let Some(&last) = path.last() else {
                continue;
            };
            if last.same_as(end) {
                debug!(
                    start = %start,
                    end = %end,
                    hops = path.len() - 1,
                    "Path found"
                );
                return Some(path);
            }

            for next in self.neighbors(nodes, last) {
                if visited.insert(next.name()) {
                    trace!(from = %last, to = %next, "Expanding frontier");
                    let mut extended = path.clone();
                    extended.push(next);
                    frontier.push_back(extended);
                }
            }
        }

        debug!(start = %start, end = %end, "No path within range");
        None
    }
}
