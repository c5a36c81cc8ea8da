//! Network nodes
//!
//! A [`Node`] is an addressable endpoint sitting at a fixed distance from the
//! origin. Nodes are immutable and owned by whatever collection the caller
//! builds; messages only borrow them.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// An endpoint identified by name, placed at a scalar distance from origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NodeRecord")]
pub struct Node {
    name: String,
    distance: f64,
}

/// Unvalidated wire form of a [`Node`]
#[derive(Deserialize)]
struct NodeRecord {
    name: String,
    distance: f64,
}

impl TryFrom<NodeRecord> for Node {
    type Error = CoreError;

    fn try_from(record: NodeRecord) -> Result<Self, Self::Error> {
        Node::new(record.name, record.distance)
    }
}

impl Node {
    /// Create a node
    ///
    /// The name must be non-empty and the distance finite and non-negative.
    pub fn new(name: impl Into<String>, distance: f64) -> Result<Self, CoreError> {
        let name = name.into();
        if name.is_empty() {
            return Err(CoreError::EmptyName);
        }
        if !distance.is_finite() || distance < 0.0 {
            return Err(CoreError::InvalidDistance { name, distance });
        }
        Ok(Self { name, distance })
    }

    /// Unique identifier of this node
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Distance from origin
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Separation between two nodes along the distance axis
    pub fn distance_to(&self, other: &Node) -> f64 {
        (self.distance - other.distance).abs()
    }

    /// Whether two nodes are the same endpoint
    pub fn same_as(&self, other: &Node) -> bool {
        self.name == other.name
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
