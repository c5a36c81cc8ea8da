//! # SpaceNet Link
//!
//! Lossy link simulation and retrying transmission for SpaceNet.
//!
//! ## Core Components
//!
//! - [`LinkSimulator`]: Decides the outcome of a single hop from link state,
//!   range and random noise, and hands delivered envelopes to the receiver
//! - [`TransmissionController`]: Retries transient failures, turns permanent
//!   ones into a single [`CommsError`](spacenet_core::CommsError), and
//!   forwards relay layers hop by hop
//! - [`NoiseSource`]: Injectable randomness (any `rand::Rng`, or
//!   [`ScriptedNoise`] for exact replays)
//!
//! ## Failure Levels
//!
//! 1. **Level 1**: no noise, every attempt delivers
//! 2. **Level 2**: noise produces transient interference and corruption
//! 3. **Level 3+**: noise can permanently terminate a link, and hops longer
//!    than the range threshold are refused
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use spacenet_core::{Envelope, Node, RecordingReceiver};
//! use spacenet_link::{LinkSimulator, NetworkConfig, TransmissionController};
//!
//! let rx = Arc::new(RecordingReceiver::new());
//! let link = LinkSimulator::seeded(NetworkConfig::for_level(1), rx.clone(), 7).unwrap();
//! let controller = TransmissionController::new(link);
//!
//! let sat1 = Node::new("sat1", 100.0).unwrap();
//! let sat2 = Node::new("sat2", 200.0).unwrap();
//! let packet = Envelope::direct("Hi", &sat1, &sat2).unwrap();
//!
//! controller.send(&packet).unwrap();
//! assert_eq!(rx.nodes(), vec!["sat2".to_string()]);
//! ```

pub mod config;
pub mod link;
pub mod noise;
pub mod stats;
pub mod transmission;

// Re-export main types
pub use config::{ConfigError, NetworkConfig, RetryPolicy};
pub use link::{LinkKey, LinkSimulator};
pub use noise::{FailureKind, FailureWeights, NoiseSource, ScriptedNoise};
pub use stats::{StatsSnapshot, TransmissionStats};
pub use transmission::TransmissionController;
