//! Retrying transmission and relay unwrapping
//!
//! [`TransmissionController::send`] drives one envelope to completion:
//!
//! ```text
//! Attempting --ok--------------------------> Delivered
//!     |  \--TemporalInterference--> wait --> Attempting
//!     |   \-DataCorrupted ----------------> Attempting
//!     \--LinkTerminated / OutOfRange------> Fatal (BrokenConnection)
//! ```
//!
//! Once a hop is delivered, a relay layer is unwrapped and its inner envelope
//! is sent as a fresh transmission from the node that just accepted it. Any
//! failure further down the chain surfaces once, at the outermost call site.
//!
//! Transient failures are retried without limit unless the configured
//! [`RetryPolicy`](crate::config::RetryPolicy) sets a bound.

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use spacenet_core::{Clock, CommsError, Envelope, LinkError, SystemClock};
use tracing::{debug, info, warn};

use crate::link::LinkSimulator;
use crate::noise::NoiseSource;
use crate::stats::TransmissionStats;

/// Caller-side retry state machine around a [`LinkSimulator`]
pub struct TransmissionController<N: NoiseSource = StdRng> {
    link: LinkSimulator<N>,
    clock: Arc<dyn Clock>,
    stats: TransmissionStats,
}

impl<N: NoiseSource> TransmissionController<N> {
    /// Create a controller that waits on the system clock
    pub fn new(link: LinkSimulator<N>) -> Self {
        Self::with_clock(link, Arc::new(SystemClock))
    }

    /// Create a controller that waits on `clock`
    pub fn with_clock(link: LinkSimulator<N>, clock: Arc<dyn Clock>) -> Self {
        Self {
            link,
            clock,
            stats: TransmissionStats::new(),
        }
    }

    pub fn link(&self) -> &LinkSimulator<N> {
        &self.link
    }

    pub fn stats(&self) -> &TransmissionStats {
        &self.stats
    }

    /// Deliver `envelope`, following every relay layer to the destination
    ///
    /// Layers are unwrapped in a loop, so chain depth is bounded by memory
    /// rather than by the stack.
    pub fn send(&self, envelope: &Envelope<'_>) -> Result<(), CommsError> {
        let mut current = envelope;
        loop {
            self.transmit(current)?;
            match current.inner() {
                None => {
                    debug!(
                        destination = %current.receiver(),
                        "Relay chain terminated at destination"
                    );
                    return Ok(());
                }
                Some(inner) => {
                    // The node that accepted the relay sends the inner envelope
                    debug!(
                        via = %current.receiver(),
                        next = %inner.receiver(),
                        "Unwrapping relay packet"
                    );
                    self.stats.record_relay();
                    current = inner;
                }
            }
        }
    }

    /// Retry one hop until it is delivered or fails permanently
    fn transmit(&self, envelope: &Envelope<'_>) -> Result<(), CommsError> {
        let started = self.clock.now();
        let mut attempts: u32 = 0;

        loop {
            attempts = attempts.saturating_add(1);
            self.stats.record_attempt();

            let err = match self.link.attempt(envelope) {
                Ok(()) => {
                    self.stats.record_delivery();
                    info!(
                        sender = %envelope.sender(),
                        receiver = %envelope.receiver(),
                        attempts,
                        "Hop delivered"
                    );
                    return Ok(());
                }
                Err(err) => err,
            };
            self.stats.record_failure(&err);

            if err.is_permanent() {
                warn!(
                    sender = %envelope.sender(),
                    receiver = %envelope.receiver(),
                    reason = %err,
                    "Broken connection"
                );
                self.stats.record_broken_connection();
                return Err(CommsError::BrokenConnection {
                    sender: envelope.sender().name().to_string(),
                    receiver: envelope.receiver().name().to_string(),
                    reason: err,
                });
            }

            debug!(attempts, reason = %err, "Transient failure, retrying");
            self.check_budget(envelope, attempts, started, &err)?;
            if err == LinkError::TemporalInterference {
                // Only interference waits before the next attempt
                self.clock.sleep(self.link.config().interference_backoff);
                self.check_budget(envelope, attempts, started, &err)?;
            }
        }
    }

    /// Fail once the retry policy's attempt or time budget is spent
    fn check_budget(
        &self,
        envelope: &Envelope<'_>,
        attempts: u32,
        started: Instant,
        last: &LinkError,
    ) -> Result<(), CommsError> {
        let policy = &self.link.config().retry;
        let out_of_attempts = policy.max_attempts.is_some_and(|max| attempts >= max);
        let out_of_time = policy
            .deadline
            .is_some_and(|deadline| self.clock.now().saturating_duration_since(started) >= deadline);

        if out_of_attempts || out_of_time {
            warn!(
                sender = %envelope.sender(),
                receiver = %envelope.receiver(),
                attempts,
                "Retry budget exhausted"
            );
            self.stats.record_retries_exhausted();
            return Err(CommsError::RetriesExhausted {
                sender: envelope.sender().name().to_string(),
                receiver: envelope.receiver().name().to_string(),
                attempts,
                last: last.clone(),
            });
        }
        Ok(())
    }
}

impl<N: NoiseSource> std::fmt::Debug for TransmissionController<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransmissionController")
            .field("link", &self.link)
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}
