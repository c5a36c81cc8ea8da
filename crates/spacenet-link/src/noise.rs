//! Randomized link noise
//!
//! An attempt first rolls against the configured noise probability. If the
//! roll hits, a failure kind is chosen from a cumulative weight table:
//!
//! ```text
//! weights   interference=50 | corruption=60 | termination=20
//! buckets   [0, 50)         | [50, 110)     | [110, 130)
//! ```
//!
//! Randomness is injected through [`NoiseSource`]. Every [`rand::Rng`] is a
//! noise source, so a seeded `StdRng` reproduces a run exactly;
//! [`ScriptedNoise`] replays hand-written rolls for tests.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Failure kinds noise can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    TemporalInterference,
    DataCorrupted,
    LinkTerminated,
}

/// Relative weights of the failure kinds
///
/// Weights are normalized by their total and need not sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailureWeights {
    pub interference: u32,
    pub corruption: u32,
    pub termination: u32,
}

impl Default for FailureWeights {
    fn default() -> Self {
        Self {
            interference: 50,
            corruption: 60,
            termination: 20,
        }
    }
}

impl FailureWeights {
    pub fn new(interference: u32, corruption: u32, termination: u32) -> Self {
        Self {
            interference,
            corruption,
            termination,
        }
    }

    /// Sum of all weights
    pub fn total(&self) -> u32 {
        self.table().last().map(|(bound, _)| *bound).unwrap_or(0)
    }

    /// Cumulative upper bounds paired with their kind
    pub fn table(&self) -> [(u32, FailureKind); 3] {
        let interference = self.interference;
        let corruption = interference.saturating_add(self.corruption);
        let termination = corruption.saturating_add(self.termination);
        [
            (interference, FailureKind::TemporalInterference),
            (corruption, FailureKind::DataCorrupted),
            (termination, FailureKind::LinkTerminated),
        ]
    }

    /// Map a point in `[0, total)` to its failure kind
    ///
    /// Points past the end fall into the last non-empty bucket.
    pub fn kind_at(&self, point: u32) -> FailureKind {
        let point = point.min(self.total().saturating_sub(1));
        self.table()
            .iter()
            .find(|(bound, _)| point < *bound)
            .map(|(_, kind)| *kind)
            .unwrap_or(FailureKind::DataCorrupted)
    }

    /// Draw a failure kind from `noise`
    pub fn choose<N: NoiseSource + ?Sized>(&self, noise: &mut N) -> FailureKind {
        let total = self.total();
        if total == 0 {
            return FailureKind::DataCorrupted;
        }
        self.kind_at(noise.pick(total))
    }
}

/// Source of randomness for link attempts
pub trait NoiseSource: Send {
    /// Uniform value in `[0, 1)`
    fn roll(&mut self) -> f64;

    /// Uniform integer in `[0, total)`; `total` is never zero
    fn pick(&mut self, total: u32) -> u32;
}

impl<R: Rng + Send> NoiseSource for R {
    fn roll(&mut self) -> f64 {
        self.random::<f64>()
    }

    fn pick(&mut self, total: u32) -> u32 {
        self.random_range(0..total)
    }
}

#[derive(Debug, Default)]
struct Script {
    rolls: VecDeque<f64>,
    picks: VecDeque<u32>,
    consumed: usize,
}

/// Replays a fixed sequence of rolls and picks
///
/// Clones share the same script, so a test can keep a handle after moving
/// one into a simulator. Once the script runs out every roll returns `1.0`
/// (never noisy) and every pick returns `0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedNoise {
    script: Arc<Mutex<Script>>,
}

impl ScriptedNoise {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an attempt that passes the noise check
    pub fn clear(self) -> Self {
        self.script.lock().rolls.push_back(1.0);
        self
    }

    /// Queue `n` attempts that pass the noise check
    pub fn clear_n(self, n: usize) -> Self {
        (0..n).fold(self, |s, _| s.clear())
    }

    /// Queue a noisy attempt that lands on `point` in the weight table
    pub fn noisy(self, point: u32) -> Self {
        {
            let mut script = self.script.lock();
            script.rolls.push_back(0.0);
            script.picks.push_back(point);
        }
        self
    }

    /// Queue a raw roll value
    pub fn roll_value(self, value: f64) -> Self {
        self.script.lock().rolls.push_back(value);
        self
    }

    /// Number of rolls and picks drawn so far
    pub fn consumed(&self) -> usize {
        self.script.lock().consumed
    }

    /// Number of rolls left in the script
    pub fn remaining(&self) -> usize {
        self.script.lock().rolls.len()
    }
}

impl NoiseSource for ScriptedNoise {
    fn roll(&mut self) -> f64 {
        let mut script = self.script.lock();
        script.consumed += 1;
        script.rolls.pop_front().unwrap_or(1.0)
    }

    fn pick(&mut self, total: u32) -> u32 {
        let mut script = self.script.lock();
        script.consumed += 1;
        script.picks.pop_front().unwrap_or(0).min(total.saturating_sub(1))
    }
}
