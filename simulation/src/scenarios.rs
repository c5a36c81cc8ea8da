//! Pre-defined SpaceNet scenarios
//!
//! Each scenario builds its own link simulator, runs a fixed workload and
//! returns a [`ScenarioReport`]. Receptions are logged through `tracing` as
//! they happen and recorded for the report.

use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use spacenet_core::{Envelope, Node, RecordingReceiver, SignalReceiver, TracingReceiver};
use spacenet_link::{LinkSimulator, StatsSnapshot, TransmissionController};
use spacenet_routing::{PathFinder, RelayRouter, RoutingError};
use tracing::{info, warn};

use crate::settings::ScenarioOptions;

/// Outcome of a scenario run
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub level: u8,
    /// Sends started
    pub sends: u64,
    /// Sends that reached their destination
    pub delivered: u64,
    /// Sends that ended in an error
    pub failed: u64,
    /// Nodes that accepted a packet, in order
    pub accepted_by: Vec<String>,
    /// Links permanently broken during the run
    pub broken_links: Vec<String>,
    /// Error messages of failed sends
    pub errors: Vec<String>,
    pub stats: StatsSnapshot,
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} (level {}) ===", self.name, self.level)?;
        writeln!(
            f,
            "  Sends: {}  Delivered: {}  Failed: {}",
            self.sends, self.delivered, self.failed
        )?;
        writeln!(
            f,
            "  Attempts: {}  Interference: {}  Corruption: {}  Relays forwarded: {}",
            self.stats.attempts,
            self.stats.interference,
            self.stats.corruption,
            self.stats.relays_forwarded
        )?;
        if !self.broken_links.is_empty() {
            writeln!(f, "  Broken links: {}", self.broken_links.join(", "))?;
        }
        for error in &self.errors {
            writeln!(f, "  Error: {}", error)?;
        }
        Ok(())
    }
}

/// Logs receptions and records them for the report
#[derive(Debug, Default)]
struct ScenarioReceiver {
    recorded: RecordingReceiver,
}

impl SignalReceiver for ScenarioReceiver {
    fn receive_signal(&self, node: &Node, envelope: &Envelope<'_>) {
        TracingReceiver.receive_signal(node, envelope);
        self.recorded.receive_signal(node, envelope);
    }
}

/// A controller wired to a fresh receiver
struct Harness {
    controller: TransmissionController,
    receiver: Arc<ScenarioReceiver>,
    level: u8,
}

impl Harness {
    fn new(options: &ScenarioOptions) -> anyhow::Result<Self> {
        let receiver = Arc::new(ScenarioReceiver::default());
        let link = match options.seed {
            Some(seed) => LinkSimulator::seeded(options.config.clone(), receiver.clone(), seed)?,
            None => LinkSimulator::new(options.config.clone(), receiver.clone())?,
        };
        Ok(Self {
            controller: TransmissionController::with_clock(link, options.clock.clone()),
            receiver,
            level: options.config.level,
        })
    }

    fn report(&self, name: &str, sends: u64, errors: Vec<String>) -> ScenarioReport {
        let failed = errors.len() as u64;
        ScenarioReport {
            name: name.to_string(),
            level: self.level,
            sends,
            delivered: sends.saturating_sub(failed),
            failed,
            accepted_by: self.receiver.recorded.nodes(),
            broken_links: self
                .controller
                .link()
                .broken_links()
                .iter()
                .map(|k| k.to_string())
                .collect(),
            errors,
            stats: self.controller.stats().snapshot(),
        }
    }
}

/// Evenly spaced satellites `sat0..`
pub fn satellite_line(count: usize, spacing: f64) -> anyhow::Result<Vec<Node>> {
    (0..count)
        .map(|i| Ok(Node::new(format!("sat{}", i), i as f64 * spacing)?))
        .collect()
}

/// Two satellites 100 apart exchange a single greeting
pub fn run_direct(options: &ScenarioOptions) -> anyhow::Result<ScenarioReport> {
    info!("=== Running Direct Scenario ===");

    let harness = Harness::new(options)?;
    let sat1 = Node::new("sat1", 100.0)?;
    let sat2 = Node::new("sat2", 200.0)?;
    let packet = Envelope::direct("Hi", &sat1, &sat2)?;

    let mut errors = Vec::new();
    if let Err(err) = harness.controller.send(&packet) {
        warn!(error = %err, "Direct send failed");
        errors.push(err.to_string());
    }
    Ok(harness.report("direct", 1, errors))
}

/// Route one message from the first to the last node of a line
pub fn run_relay(
    options: &ScenarioOptions,
    count: usize,
    spacing: f64,
    message: &str,
) -> anyhow::Result<ScenarioReport> {
    info!(count, spacing, "=== Running Relay Scenario ===");
    anyhow::ensure!(count >= 2, "A relay needs at least two nodes, got {}", count);

    let harness = Harness::new(options)?;
    let nodes = satellite_line(count, spacing)?;
    let router = RelayRouter::new(&harness.controller);

    let mut errors = Vec::new();
    match router.route_and_send(&nodes, &nodes[0], &nodes[count - 1], message) {
        Ok(route) => info!(route = %route.join(" -> "), "Relay complete"),
        Err(err) => {
            warn!(error = %err, "Relay failed");
            errors.push(err.to_string());
        }
    }
    Ok(harness.report("relay", 1, errors))
}

/// Route many messages between random endpoints on a line
///
/// Broken links accumulate across sends, so at level 3 later sends are more
/// likely to fail.
pub fn run_chaos(
    options: &ScenarioOptions,
    count: usize,
    spacing: f64,
    sends: u64,
) -> anyhow::Result<ScenarioReport> {
    info!(count, spacing, sends, "=== Running Chaos Scenario ===");
    anyhow::ensure!(count >= 2, "Chaos needs at least two nodes, got {}", count);

    let harness = Harness::new(options)?;
    let nodes = satellite_line(count, spacing)?;
    let router = RelayRouter::new(&harness.controller);
    let mut picker = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_os_rng(),
    };

    let mut errors = Vec::new();
    for i in 0..sends {
        let from = picker.random_range(0..count);
        let mut to = picker.random_range(0..count - 1);
        if to >= from {
            to += 1;
        }
        let payload = format!("chaos #{}", i);

        if let Err(err) = router.route_and_send(&nodes, &nodes[from], &nodes[to], payload) {
            match &err {
                RoutingError::NoPath { .. } => warn!(error = %err, "Unroutable send"),
                _ => warn!(error = %err, "Send failed"),
            }
            errors.push(err.to_string());
        }
    }
    Ok(harness.report("chaos", sends, errors))
}

/// Minimum-hop path between two nodes given by distance
pub fn find_route(
    distances: &[f64],
    from: usize,
    to: usize,
    max_range: f64,
) -> anyhow::Result<Option<Vec<String>>> {
    let nodes = distances
        .iter()
        .enumerate()
        .map(|(i, d)| Node::new(format!("sat{}", i), *d))
        .collect::<Result<Vec<_>, _>>()?;
    let (Some(start), Some(end)) = (nodes.get(from), nodes.get(to)) else {
        anyhow::bail!("Endpoints {} and {} must be below {}", from, to, nodes.len());
    };

    let path = PathFinder::new(max_range).find_path(&nodes, start, end);
    Ok(path.map(|p| {
        p.iter()
            .map(|n| format!("{}({})", n.name(), n.distance()))
            .collect()
    }))
}
