//! Transmissible units
//!
//! A plain [`Message`] carries a payload across one hop. A [`RelayMessage`]
//! wraps another envelope together with the (sender, receiver) pair of the
//! hop in front of it, so a chain of depth `k` describes a `k + 1` hop route:
//!
//! ```text
//! Relay(a -> b, Relay(b -> c, Plain(c -> d, payload)))
//! ```
//!
//! Unwrapping one layer exposes the next hop. Every layer's receiver is the
//! sender of the layer inside it, and no node appears twice.

use std::collections::HashSet;
use std::fmt::Display;

use bytes::Bytes;

use crate::error::CoreError;
use crate::node::Node;

/// Opaque message data
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Payload(Bytes);

impl Payload {
    /// Create a payload from raw bytes
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self(data.into())
    }

    /// Get the payload data
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Get the payload length
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if payload is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Self::new(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(v: Vec<u8>) -> Self {
        Self::new(v)
    }
}

impl Display for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Single-hop message; the innermost layer of every relay chain
#[derive(Debug, Clone, PartialEq)]
pub struct Message<'a> {
    payload: Payload,
    sender: &'a Node,
    receiver: &'a Node,
}

impl<'a> Message<'a> {
    /// Create a message from `sender` to `receiver`
    pub fn new(
        payload: impl Into<Payload>,
        sender: &'a Node,
        receiver: &'a Node,
    ) -> Result<Self, CoreError> {
        if sender.same_as(receiver) {
            return Err(CoreError::SelfHop(sender.name().to_string()));
        }
        Ok(Self {
            payload: payload.into(),
            sender,
            receiver,
        })
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn sender(&self) -> &'a Node {
        self.sender
    }

    pub fn receiver(&self) -> &'a Node {
        self.receiver
    }
}

/// A message forwarded through a proxy
///
/// `sender -> receiver` is the hop this layer travels; `inner` is what the
/// receiver transmits next.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayMessage<'a> {
    inner: Box<Envelope<'a>>,
    sender: &'a Node,
    receiver: &'a Node,
}

impl<'a> RelayMessage<'a> {
    /// Wrap `inner` behind the hop `sender -> receiver`
    ///
    /// `receiver` must be the node that sends `inner`, and `sender` must not
    /// already appear further down the chain.
    pub fn new(
        inner: Envelope<'a>,
        sender: &'a Node,
        receiver: &'a Node,
    ) -> Result<Self, CoreError> {
        if sender.same_as(receiver) {
            return Err(CoreError::SelfHop(sender.name().to_string()));
        }
        if !receiver.same_as(inner.sender()) {
            return Err(CoreError::BrokenChain {
                receiver: receiver.name().to_string(),
                inner_sender: inner.sender().name().to_string(),
            });
        }
        let revisits = inner
            .layers()
            .any(|layer| layer.sender().same_as(sender) || layer.receiver().same_as(sender));
        if revisits {
            return Err(CoreError::RevisitedNode(sender.name().to_string()));
        }
        Ok(Self::linked(inner, sender, receiver))
    }

    /// Wrap without checking; the caller has validated the whole route
    fn linked(inner: Envelope<'a>, sender: &'a Node, receiver: &'a Node) -> Self {
        Self {
            inner: Box::new(inner),
            sender,
            receiver,
        }
    }

    /// The envelope the receiver forwards next
    pub fn inner(&self) -> &Envelope<'a> {
        &self.inner
    }

    /// Take the inner envelope out of this layer
    pub fn into_inner(self) -> Envelope<'a> {
        *self.inner
    }

    pub fn sender(&self) -> &'a Node {
        self.sender
    }

    pub fn receiver(&self) -> &'a Node {
        self.receiver
    }
}

/// Either a plain message or a relay layer
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<'a> {
    Plain(Message<'a>),
    Relay(RelayMessage<'a>),
}

impl<'a> Envelope<'a> {
    /// Build a single-hop envelope
    pub fn direct(
        payload: impl Into<Payload>,
        sender: &'a Node,
        receiver: &'a Node,
    ) -> Result<Self, CoreError> {
        Message::new(payload, sender, receiver).map(Self::Plain)
    }

    /// Build the chain that carries `payload` along `route`
    ///
    /// `route` lists every node from the first sender to the destination.
    /// The route is validated once up front, so building a chain is linear
    /// in its length.
    pub fn along_route(payload: impl Into<Payload>, route: &[&'a Node]) -> Result<Self, CoreError> {
        let mut seen = HashSet::with_capacity(route.len());
        for (i, node) in route.iter().enumerate() {
            if i > 0 && route[i - 1].same_as(node) {
                return Err(CoreError::SelfHop(node.name().to_string()));
            }
            if !seen.insert(node.name()) {
                return Err(CoreError::RevisitedNode(node.name().to_string()));
            }
        }

        let mut hops = route.windows(2).rev();
        let Some(last) = hops.next() else {
            return Err(CoreError::RouteTooShort(route.len()));
        };
        let mut envelope = Self::direct(payload, last[0], last[1])?;
        for hop in hops {
            envelope = Self::Relay(RelayMessage::linked(envelope, hop[0], hop[1]));
        }
        Ok(envelope)
    }

    /// Origin of the hop this layer travels
    pub fn sender(&self) -> &'a Node {
        match self {
            Self::Plain(m) => m.sender(),
            Self::Relay(r) => r.sender(),
        }
    }

    /// Target of the hop this layer travels
    pub fn receiver(&self) -> &'a Node {
        match self {
            Self::Plain(m) => m.receiver(),
            Self::Relay(r) => r.receiver(),
        }
    }

    /// Next layer, if this is a relay
    pub fn inner(&self) -> Option<&Envelope<'a>> {
        match self {
            Self::Plain(_) => None,
            Self::Relay(r) => Some(r.inner()),
        }
    }

    /// Every layer from this one inwards, ending with the plain message
    pub fn layers(&self) -> impl Iterator<Item = &Envelope<'a>> {
        std::iter::successors(Some(self), |&layer| layer.inner())
    }

    /// Whether this is the final layer
    pub fn is_plain(&self) -> bool {
        matches!(self, Self::Plain(_))
    }

    /// The innermost plain message
    pub fn innermost(&self) -> &Message<'a> {
        let mut current = self;
        loop {
            match current {
                Self::Plain(m) => return m,
                Self::Relay(r) => current = r.inner(),
            }
        }
    }

    /// Payload carried by the innermost message
    pub fn payload(&self) -> &Payload {
        self.innermost().payload()
    }

    /// Ultimate receiver
    pub fn destination(&self) -> &'a Node {
        self.innermost().receiver()
    }

    /// Number of relay layers around the innermost message
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let Self::Relay(r) = current {
            depth += 1;
            current = r.inner();
        }
        depth
    }

    /// Number of hops the chain travels
    pub fn hop_count(&self) -> usize {
        self.depth() + 1
    }

    /// Each hop as a (sender, receiver) pair, outermost first
    pub fn hops(&self) -> Vec<(&'a Node, &'a Node)> {
        self.layers()
            .map(|layer| (layer.sender(), layer.receiver()))
            .collect()
    }

    /// Nodes visited in order, from first sender to destination
    pub fn route(&self) -> Vec<&'a Node> {
        let mut route = vec![self.sender()];
        route.extend(self.hops().into_iter().map(|(_, receiver)| receiver));
        route
    }
}

impl<'a> From<Message<'a>> for Envelope<'a> {
    fn from(m: Message<'a>) -> Self {
        Self::Plain(m)
    }
}

impl<'a> From<RelayMessage<'a>> for Envelope<'a> {
    fn from(r: RelayMessage<'a>) -> Self {
        Self::Relay(r)
    }
}

impl Display for Message<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Packet(data='{}', sender='{}', receiver='{}')",
            self.payload,
            self.sender.name(),
            self.receiver.name()
        )
    }
}

impl RelayMessage<'_> {
    fn fmt_open(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RelayPacket(sender='{}', receiver='{}', inner=",
            self.sender.name(),
            self.receiver.name()
        )
    }
}

impl Display for RelayMessage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_open(f)?;
        write!(f, "{})", self.inner)
    }
}

impl Display for Envelope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Written layer by layer so deep chains do not recurse
        let mut open = 0;
        for layer in self.layers() {
            match layer {
                Self::Plain(m) => m.fmt(f)?,
                Self::Relay(r) => {
                    r.fmt_open(f)?;
                    open += 1;
                }
            }
        }
        for _ in 0..open {
            f.write_str(")")?;
        }
        Ok(())
    }
}
