//! Single-hop link simulation
//!
//! [`LinkSimulator::attempt`] decides the fate of one hop:
//!
//! 1. **BROKEN**: the directed link was permanently terminated earlier
//! 2. **RANGE**: the endpoints are too far apart (level 3 and up)
//! 3. **NOISE**: a random roll may inject interference, corruption, or a
//!    permanent termination (termination only from level 3)
//! 4. **DELIVER**: otherwise the receiver accepts the envelope
//!
//! Only the termination branch of step 3 changes state: the broken-link set
//! grows monotonically for the lifetime of the simulator.

use std::fmt::Display;
use std::sync::Arc;

use dashmap::DashSet;
use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use spacenet_core::{Envelope, LinkError, Node, SignalReceiver};
use tracing::{info, trace, warn};

use crate::config::{ConfigError, NetworkConfig};
use crate::noise::{FailureKind, NoiseSource};

/// Directed link between two named nodes
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkKey {
    pub sender: String,
    pub receiver: String,
}

impl LinkKey {
    pub fn new(sender: &Node, receiver: &Node) -> Self {
        Self {
            sender: sender.name().to_string(),
            receiver: receiver.name().to_string(),
        }
    }
}

impl Display for LinkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.sender, self.receiver)
    }
}

/// Simulated lossy network between distance-separated nodes
pub struct LinkSimulator<N: NoiseSource = StdRng> {
    config: NetworkConfig,
    /// Permanently terminated links
    broken_links: DashSet<LinkKey>,
    /// Held only while drawing, never across delivery
    noise: Mutex<N>,
    receiver: Arc<dyn SignalReceiver>,
}

impl LinkSimulator<StdRng> {
    /// Create a simulator seeded from OS entropy
    pub fn new(
        config: NetworkConfig,
        receiver: Arc<dyn SignalReceiver>,
    ) -> Result<Self, ConfigError> {
        Self::with_noise(config, receiver, StdRng::from_os_rng())
    }

    /// Create a simulator whose failure sequence is reproducible
    pub fn seeded(
        config: NetworkConfig,
        receiver: Arc<dyn SignalReceiver>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::with_noise(config, receiver, StdRng::seed_from_u64(seed))
    }
}

impl<N: NoiseSource> LinkSimulator<N> {
    /// Create a simulator drawing randomness from `noise`
    pub fn with_noise(
        config: NetworkConfig,
        receiver: Arc<dyn SignalReceiver>,
        noise: N,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            broken_links: DashSet::new(),
            noise: Mutex::new(noise),
            receiver,
        })
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Attempt to carry `envelope` across its outermost hop
    ///
    /// On success the receiver has accepted the envelope. Relay layers are
    /// not unwrapped here.
    pub fn attempt(&self, envelope: &Envelope<'_>) -> Result<(), LinkError> {
        let sender = envelope.sender();
        let receiver = envelope.receiver();
        let key = LinkKey::new(sender, receiver);

        trace!(link = %key, "Attempting hop");

        if self.broken_links.contains(&key) {
            trace!(link = %key, "Link already terminated");
            return Err(LinkError::LinkTerminated);
        }

        let distance = sender.distance_to(receiver);
        if self.config.range_gating() && distance > self.config.max_range {
            trace!(link = %key, distance, "Out of range");
            return Err(LinkError::OutOfRange {
                distance,
                max_range: self.config.max_range,
            });
        }

        if let Some(kind) = self.draw_noise() {
            return Err(self.apply_noise(kind, key));
        }

        info!("[Network] Transmitting from {} to {}...", sender, receiver);
        self.receiver.receive_signal(receiver, envelope);
        Ok(())
    }

    /// Roll for noise and, if hit, choose a failure kind
    fn draw_noise(&self) -> Option<FailureKind> {
        let mut noise = self.noise.lock();
        if noise.roll() < self.config.effective_noise() {
            Some(self.config.failure_weights.choose(&mut *noise))
        } else {
            None
        }
    }

    fn apply_noise(&self, kind: FailureKind, key: LinkKey) -> LinkError {
        match kind {
            FailureKind::LinkTerminated if self.config.permanent_breaks() => {
                warn!(link = %key, "Link permanently terminated");
                self.broken_links.insert(key);
                LinkError::LinkTerminated
            }
            FailureKind::TemporalInterference => LinkError::TemporalInterference,
            FailureKind::DataCorrupted | FailureKind::LinkTerminated => LinkError::DataCorrupted,
        }
    }

    /// Whether the directed link `sender -> receiver` is permanently broken
    pub fn is_broken(&self, sender: &Node, receiver: &Node) -> bool {
        self.broken_links.contains(&LinkKey::new(sender, receiver))
    }

    /// Snapshot of all broken links, sorted
    pub fn broken_links(&self) -> Vec<LinkKey> {
        let mut links: Vec<LinkKey> = self.broken_links.iter().map(|k| k.key().clone()).collect();
        links.sort();
        links
    }
}

impl<N: NoiseSource> std::fmt::Debug for LinkSimulator<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkSimulator")
            .field("config", &self.config)
            .field("broken_links", &self.broken_links.len())
            .finish()
    }
}
