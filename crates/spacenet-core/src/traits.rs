//! Seams between the core and its callers
//!
//! - [`SignalReceiver`]: the accept capability invoked on every successful hop
//! - [`Clock`]: time abstraction so retry backoff can be tested without waiting

use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::message::Envelope;
use crate::node::Node;

/// Accept capability for delivered messages
///
/// Called by the link layer after a hop succeeds, with the node that received
/// the envelope. Implementations render or record the message; forwarding of
/// relay layers is handled by the transmission layer afterwards.
pub trait SignalReceiver: Send + Sync {
    fn receive_signal(&self, node: &Node, envelope: &Envelope<'_>);
}

/// Time abstraction for testability
///
/// This trait allows tests to control time, enabling deterministic
/// testing of the retry backoff.
pub trait Clock: Send + Sync {
    /// Get the current instant (monotonic time)
    fn now(&self) -> Instant;

    /// Block the current transmission for a duration
    fn sleep(&self, duration: Duration);
}

/// Real clock implementation using system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual clock that advances only when slept on or told to
#[derive(Debug)]
pub struct ManualClock {
    start: Instant,
    elapsed: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// Move virtual time forward without recording a sleep
    pub fn advance(&self, duration: Duration) {
        *self.elapsed.lock() += duration;
    }

    /// Virtual time since creation
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }

    /// Every sleep requested so far, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }

    /// Sum of all requested sleeps
    pub fn total_slept(&self) -> Duration {
        self.sleeps.lock().iter().sum()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().push(duration);
        self.advance(duration);
    }
}
