//! Link and transmission configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::noise::FailureWeights;

/// Default range threshold for a direct hop
pub const DEFAULT_MAX_RANGE: f64 = 150.0;

/// Default noise probability once noise is enabled (level 2 and up)
pub const DEFAULT_NOISE: f64 = 0.7;

/// Default wait after temporal interference
pub const DEFAULT_INTERFERENCE_BACKOFF: Duration = Duration::from_secs(2);

/// Invalid configuration values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Level must be at least 1, got {0}")]
    InvalidLevel(u8),

    #[error("Noise probability must be within [0, 1], got {0}")]
    InvalidNoise(f64),

    #[error("Max range must be positive and finite, got {0}")]
    InvalidRange(f64),

    #[error("Failure weights must not all be zero")]
    ZeroWeights,

    #[error("Retry policy must allow at least one attempt")]
    ZeroAttempts,
}

/// Optional ceiling on the retry loop
///
/// Both bounds are off by default: transient failures are retried for as
/// long as they keep occurring.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Stop after this many attempts on a single hop; must be at least 1
    pub max_attempts: Option<u32>,
    /// Stop once a single hop has been retried for this long
    pub deadline: Option<Duration>,
}

impl RetryPolicy {
    /// Retry transient failures forever
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Give up after `max` attempts per hop
    pub fn max_attempts(max: u32) -> Self {
        Self {
            max_attempts: Some(max),
            deadline: None,
        }
    }

    /// Give up once a hop has been retried for `deadline`
    pub fn deadline(deadline: Duration) -> Self {
        Self {
            max_attempts: None,
            deadline: Some(deadline),
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.max_attempts.is_some() || self.deadline.is_some()
    }
}

/// Configuration for a simulated network
///
/// `level` selects which failure modes are active:
///
/// | level | noise | permanent link breaks | range gating |
/// |-------|-------|-----------------------|--------------|
/// | 1     | off   | no                    | no           |
/// | 2     | on    | no                    | no           |
/// | 3+    | on    | yes                   | yes          |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Failure-mode level, at least 1
    pub level: u8,
    /// Probability that an attempt is hit by noise (ignored at level 1)
    pub noise: f64,
    /// Maximum distance difference for a direct hop
    pub max_range: f64,
    /// Relative weights of the failure kinds noise can produce
    pub failure_weights: FailureWeights,
    /// Wait after temporal interference before retrying
    pub interference_backoff: Duration,
    /// Optional retry ceiling
    pub retry: RetryPolicy,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            level: 1,
            noise: DEFAULT_NOISE,
            max_range: DEFAULT_MAX_RANGE,
            failure_weights: FailureWeights::default(),
            interference_backoff: DEFAULT_INTERFERENCE_BACKOFF,
            retry: RetryPolicy::unbounded(),
        }
    }
}

impl NetworkConfig {
    /// Default configuration for the given level
    pub fn for_level(level: u8) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Set the noise probability used from level 2 upwards
    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    /// Set the wait after temporal interference
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.interference_backoff = backoff;
        self
    }

    /// Set the retry ceiling
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Noise probability actually applied to attempts
    pub fn effective_noise(&self) -> f64 {
        if self.level >= 2 { self.noise } else { 0.0 }
    }

    /// Whether noise can permanently break a link
    pub fn permanent_breaks(&self) -> bool {
        self.level > 2
    }

    /// Whether hops longer than `max_range` are refused
    pub fn range_gating(&self) -> bool {
        self.level > 2
    }

    /// Check all values are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.level == 0 {
            return Err(ConfigError::InvalidLevel(self.level));
        }
        if !(0.0..=1.0).contains(&self.noise) {
            return Err(ConfigError::InvalidNoise(self.noise));
        }
        if !self.max_range.is_finite() || self.max_range <= 0.0 {
            return Err(ConfigError::InvalidRange(self.max_range));
        }
        if self.failure_weights.total() == 0 {
            return Err(ConfigError::ZeroWeights);
        }
        if self.retry.max_attempts == Some(0) {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(())
    }
}
