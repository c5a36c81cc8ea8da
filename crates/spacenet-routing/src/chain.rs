//! Path materialization
//!
//! Turns a path `[n0, n1, ..., nk]` into nested relay packets. The last hop
//! becomes the plain message and every earlier hop wraps it:
//!
//! ```text
//! [a, b, c, d]  =>  Relay(a -> b, Relay(b -> c, Plain(c -> d, payload)))
//! ```

use spacenet_core::{Envelope, Node, Payload};

use crate::error::RoutingError;

/// Build the relay chain that carries `payload` along `path`
pub fn build_relay_chain<'a>(
    path: &[&'a Node],
    payload: impl Into<Payload>,
) -> Result<Envelope<'a>, RoutingError> {
    if path.len() < 2 {
        return Err(RoutingError::PathTooShort(path.len()));
    }
    Ok(Envelope::along_route(payload, path)?)
}
