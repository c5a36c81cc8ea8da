//! # SpaceNet Core
//!
//! Core types, traits, and errors for the SpaceNet relay simulation.
//!
//! ## Key Types
//!
//! - [`Node`]: An addressable endpoint at a fixed distance from origin
//! - [`Envelope`]: Either a plain [`Message`] or a [`RelayMessage`] wrapping
//!   the rest of a multi-hop route
//! - [`LinkError`] / [`CommsError`]: Hop-level and caller-visible failures
//!
//! ## Key Traits
//!
//! - [`SignalReceiver`]: Accept capability invoked on each delivered hop
//! - [`Clock`]: Time abstraction for testable retry backoff

pub mod error;
pub mod message;
pub mod node;
pub mod receiver;
pub mod traits;

// Re-export main types
pub use error::*;
pub use message::*;
pub use node::*;
pub use receiver::*;
pub use traits::*;
