//! Transmission counters

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use spacenet_core::LinkError;

/// Counters updated by the transmission controller
#[derive(Debug, Default)]
pub struct TransmissionStats {
    attempts: AtomicU64,
    deliveries: AtomicU64,
    interference: AtomicU64,
    corruption: AtomicU64,
    terminated: AtomicU64,
    out_of_range: AtomicU64,
    broken_connections: AtomicU64,
    retries_exhausted: AtomicU64,
    relays_forwarded: AtomicU64,
}

/// Point-in-time copy of [`TransmissionStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatsSnapshot {
    pub attempts: u64,
    pub deliveries: u64,
    pub interference: u64,
    pub corruption: u64,
    pub terminated: u64,
    pub out_of_range: u64,
    pub broken_connections: u64,
    pub retries_exhausted: u64,
    pub relays_forwarded: u64,
}

impl StatsSnapshot {
    /// Transient failures absorbed by retries
    pub fn transient_failures(&self) -> u64 {
        self.interference + self.corruption
    }
}

impl TransmissionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_attempt(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delivery(&self) {
        self.deliveries.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self, err: &LinkError) {
        let counter = match err {
            LinkError::TemporalInterference => &self.interference,
            LinkError::DataCorrupted => &self.corruption,
            LinkError::LinkTerminated => &self.terminated,
            LinkError::OutOfRange { .. } => &self.out_of_range,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_broken_connection(&self) {
        self.broken_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_retries_exhausted(&self) {
        self.retries_exhausted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_relay(&self) {
        self.relays_forwarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            attempts: self.attempts.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
            interference: self.interference.load(Ordering::Relaxed),
            corruption: self.corruption.load(Ordering::Relaxed),
            terminated: self.terminated.load(Ordering::Relaxed),
            out_of_range: self.out_of_range.load(Ordering::Relaxed),
            broken_connections: self.broken_connections.load(Ordering::Relaxed),
            retries_exhausted: self.retries_exhausted.load(Ordering::Relaxed),
            relays_forwarded: self.relays_forwarded.load(Ordering::Relaxed),
        }
    }
}
