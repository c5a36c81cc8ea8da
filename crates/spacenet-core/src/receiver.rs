//! Stock [`SignalReceiver`] implementations

use parking_lot::Mutex;
use tracing::info;

use crate::message::{Envelope, Payload};
use crate::node::Node;
use crate::traits::SignalReceiver;

/// Logs every reception at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReceiver;

impl SignalReceiver for TracingReceiver {
    fn receive_signal(&self, node: &Node, envelope: &Envelope<'_>) {
        info!(node = %node, hops_left = envelope.depth(), "[{}] Received: {}", node, envelope);
    }
}

/// One accepted envelope as seen by a [`RecordingReceiver`]
#[derive(Debug, Clone, PartialEq)]
pub struct Reception {
    /// Node that accepted the envelope
    pub node: String,
    /// Sender of the hop that was delivered
    pub from: String,
    /// Whether the envelope still had relay layers to forward
    pub relay: bool,
    /// Innermost payload
    pub payload: Payload,
}

/// Records receptions in order, for tests and scenario reports
#[derive(Debug, Default)]
pub struct RecordingReceiver {
    receptions: Mutex<Vec<Reception>>,
}

impl RecordingReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All receptions so far
    pub fn receptions(&self) -> Vec<Reception> {
        self.receptions.lock().clone()
    }

    /// Names of the accepting nodes, in order
    pub fn nodes(&self) -> Vec<String> {
        self.receptions
            .lock()
            .iter()
            .map(|r| r.node.clone())
            .collect()
    }

    /// Receptions that ended a chain
    pub fn terminal(&self) -> Vec<Reception> {
        self.receptions
            .lock()
            .iter()
            .filter(|r| !r.relay)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.receptions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.receptions.lock().is_empty()
    }
}

impl SignalReceiver for RecordingReceiver {
    fn receive_signal(&self, node: &Node, envelope: &Envelope<'_>) {
        self.receptions.lock().push(Reception {
            node: node.name().to_string(),
            from: envelope.sender().name().to_string(),
            relay: !envelope.is_plain(),
            payload: envelope.payload().clone(),
        });
    }
}
