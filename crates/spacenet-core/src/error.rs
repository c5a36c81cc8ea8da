//! Error types for SpaceNet
//!
//! Failures are split by where they can be observed:
//!
//! - [`LinkError`]: the outcome of a single hop attempt, transient or permanent
//! - [`CommsError`]: what a caller of `send` sees once retries are exhausted
//!   or a permanent failure was hit
//! - [`CoreError`]: invalid nodes or malformed relay chains

use thiserror::Error;

/// Errors raised while building nodes and messages
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("Invalid distance for node {name}: {distance}")]
    InvalidDistance { name: String, distance: f64 },

    #[error("Node name must not be empty")]
    EmptyName,

    #[error("Relay hop ends at {receiver} but the inner packet starts at {inner_sender}")]
    BrokenChain {
        receiver: String,
        inner_sender: String,
    },

    #[error("Hop from {0} to itself")]
    SelfHop(String),

    #[error("Node {0} appears twice in relay chain")]
    RevisitedNode(String),

    #[error("Route needs at least two nodes, got {0}")]
    RouteTooShort(usize),
}

/// Failure of a single hop attempt
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinkError {
    #[error("Temporary interference, please retry")]
    TemporalInterference,

    #[error("Data corrupted during transmission")]
    DataCorrupted,

    #[error("Link has been permanently terminated")]
    LinkTerminated,

    #[error("Distance {distance} exceeds max range of {max_range}")]
    OutOfRange { distance: f64, max_range: f64 },
}

impl LinkError {
    /// Transient failures never change link state and clear on retry
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TemporalInterference | Self::DataCorrupted)
    }

    /// Permanent failures abort the transmission
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }
}

/// Terminal failure of a transmission, surfaced by `send`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommsError {
    /// A hop hit a permanent failure (terminated link or out of range)
    #[error("Broken connection from {sender} to {receiver}: {reason}")]
    BrokenConnection {
        sender: String,
        receiver: String,
        #[source]
        reason: LinkError,
    },

    /// An opt-in retry bound fired while the hop kept failing transiently
    #[error("Gave up on {sender} -> {receiver} after {attempts} attempts")]
    RetriesExhausted {
        sender: String,
        receiver: String,
        attempts: u32,
        #[source]
        last: LinkError,
    },
}

impl CommsError {
    /// Whether this is the permanent-failure kind
    pub fn is_broken_connection(&self) -> bool {
        matches!(self, Self::BrokenConnection { .. })
    }

    /// The hop-level error that ended the transmission
    pub fn reason(&self) -> &LinkError {
        match self {
            Self::BrokenConnection { reason, .. } => reason,
            Self::RetriesExhausted { last, .. } => last,
        }
    }

    /// The (sender, receiver) pair of the hop that failed
    pub fn link(&self) -> (&str, &str) {
        match self {
            Self::BrokenConnection {
                sender, receiver, ..
            }
            | Self::RetriesExhausted {
                sender, receiver, ..
            } => (sender, receiver),
        }
    }
}

/// Result type alias for transmissions
pub type CommsResult<T> = Result<T, CommsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_core_error_display() {
        let err = CoreError::InvalidDistance {
            name: "sat1".to_string(),
            distance: -4.0,
        };
        assert!(format!("{}", err).contains("sat1"));
        assert!(format!("{}", err).contains("-4"));

        let err = CoreError::BrokenChain {
            receiver: "b".to_string(),
            inner_sender: "c".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("ends at b"));
        assert!(msg.contains("starts at c"));
    }

    #[test]
    fn test_link_error_classification() {
        assert!(LinkError::TemporalInterference.is_transient());
        assert!(LinkError::DataCorrupted.is_transient());
        assert!(LinkError::LinkTerminated.is_permanent());
        assert!(
            LinkError::OutOfRange {
                distance: 200.0,
                max_range: 150.0
            }
            .is_permanent()
        );
    }

    #[test]
    fn test_link_error_display() {
        let err = LinkError::OutOfRange {
            distance: 300.0,
            max_range: 150.0,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("300"));
        assert!(msg.contains("150"));
        assert!(format!("{}", LinkError::LinkTerminated).contains("permanently"));
    }

    #[test]
    fn test_comms_error_carries_reason() {
        let err = CommsError::BrokenConnection {
            sender: "a".to_string(),
            receiver: "b".to_string(),
            reason: LinkError::LinkTerminated,
        };
        assert!(err.is_broken_connection());
        assert_eq!(err.reason(), &LinkError::LinkTerminated);
        assert_eq!(err.link(), ("a", "b"));
        assert!(err.source().is_some());
        assert!(format!("{}", err).contains("Broken connection from a to b"));

        let err = CommsError::RetriesExhausted {
            sender: "a".to_string(),
            receiver: "b".to_string(),
            attempts: 7,
            last: LinkError::DataCorrupted,
        };
        assert!(!err.is_broken_connection());
        assert!(format!("{}", err).contains("7 attempts"));
    }
}
