//! Relay Chain Integration Tests
//!
//! End-to-end routing over the link layer:
//! - Chains found by the path finder are accepted hop by hop, in path order
//! - Only the destination sees the payload as a plain packet
//! - An interior failure surfaces once and stops the chain
//! - Noisy levels still deliver along long chains

use std::sync::Arc;

use spacenet_core::{CommsError, LinkError, ManualClock, Node, RecordingReceiver};
use spacenet_link::{LinkSimulator, NetworkConfig, ScriptedNoise, TransmissionController};
use spacenet_routing::{PathFinder, RelayRouter, RoutingError, build_relay_chain};

const TERMINATION: u32 = 120;

// ============================================================================
// Helper functions for test setup
// ============================================================================

fn line(count: usize, step: f64) -> Vec<Node> {
    (0..count)
        .map(|i| Node::new(format!("sat{}", i), i as f64 * step).unwrap())
        .collect()
}

fn scripted(
    level: u8,
    noise: ScriptedNoise,
) -> (TransmissionController<ScriptedNoise>, Arc<RecordingReceiver>) {
    let rx = Arc::new(RecordingReceiver::new());
    let link =
        LinkSimulator::with_noise(NetworkConfig::for_level(level), rx.clone(), noise).unwrap();
    let controller = TransmissionController::with_clock(link, Arc::new(ManualClock::new()));
    (controller, rx)
}

fn names(nodes: &[&Node]) -> Vec<String> {
    nodes.iter().map(|n| n.name().to_string()).collect()
}

// ============================================================================
// Successful chains
// ============================================================================

#[test]
fn test_receivers_accept_in_path_order() {
    let nodes = line(6, 120.0);
    let path = PathFinder::default()
        .find_path(&nodes, &nodes[0], &nodes[5])
        .unwrap();
    let chain = build_relay_chain(&path, "telemetry").unwrap();
    assert_eq!(chain.hop_count(), 5);

    let (controller, rx) = scripted(3, ScriptedNoise::new());
    controller.send(&chain).unwrap();

    // Every node after the first accepts exactly once, in order
    assert_eq!(rx.nodes(), names(&path[1..]));

    let receptions = rx.receptions();
    for (reception, hop) in receptions.iter().zip(path.windows(2)) {
        assert_eq!(reception.from, hop[0].name());
        assert_eq!(reception.node, hop[1].name());
        assert_eq!(reception.payload.to_string(), "telemetry");
    }

    // Only the last reception is a plain packet
    let terminal = rx.terminal();
    assert_eq!(terminal.len(), 1);
    assert_eq!(terminal[0].node, "sat5");
    assert!(receptions[..4].iter().all(|r| r.relay));

    let stats = controller.stats().snapshot();
    assert_eq!(stats.deliveries, 5);
    assert_eq!(stats.relays_forwarded, 4);
}

#[test]
fn test_router_prefers_fewest_hops() {
    // sat0 reaches sat2 directly, skipping sat1
    let nodes = vec![
        Node::new("sat0", 0.0).unwrap(),
        Node::new("sat1", 60.0).unwrap(),
        Node::new("sat2", 140.0).unwrap(),
        Node::new("sat3", 260.0).unwrap(),
    ];
    let (controller, rx) = scripted(3, ScriptedNoise::new());
    let router = RelayRouter::new(&controller);

    let route = router
        .route_and_send(&nodes, &nodes[0], &nodes[3], "shortcut")
        .unwrap();
    assert_eq!(route, vec!["sat0", "sat2", "sat3"]);
    assert_eq!(rx.nodes(), vec!["sat2", "sat3"]);
}

#[test]
fn test_noisy_level_still_completes_chain() {
    for seed in 0..50 {
        let rx = Arc::new(RecordingReceiver::new());
        let link = LinkSimulator::seeded(NetworkConfig::for_level(2), rx.clone(), seed).unwrap();
        let controller = TransmissionController::with_clock(link, Arc::new(ManualClock::new()));
        let router = RelayRouter::new(&controller);

        let nodes = line(5, 100.0);
        router
            .route_and_send(&nodes, &nodes[0], &nodes[4], "persistent")
            .unwrap();

        assert_eq!(rx.nodes(), vec!["sat1", "sat2", "sat3", "sat4"]);
        assert_eq!(controller.stats().snapshot().deliveries, 4);
    }
}

#[test]
fn test_long_line_routes_without_overflow() {
    // One relay layer per hop, thousands deep
    let nodes = line(3_000, 100.0);
    let (controller, rx) = scripted(1, ScriptedNoise::new());
    let router = RelayRouter::new(&controller);

    let route = router
        .route_and_send(&nodes, &nodes[0], &nodes[2_999], "far side")
        .unwrap();
    assert_eq!(route.len(), 3_000);
    assert_eq!(rx.len(), 2_999);
    assert_eq!(rx.nodes().last().map(String::as_str), Some("sat2999"));

    let terminal = rx.terminal();
    assert_eq!(terminal.len(), 1);
    assert_eq!(terminal[0].payload.to_string(), "far side");

    let stats = controller.stats().snapshot();
    assert_eq!(stats.deliveries, 2_999);
    assert_eq!(stats.relays_forwarded, 2_998);
}

#[test]
fn test_long_line_fails_deep_inside() {
    // Hop 2000 terminates; nothing beyond it accepts
    let script = ScriptedNoise::new().clear_n(1_999).noisy(TERMINATION);
    let (controller, rx) = scripted(3, script);
    let nodes = line(3_000, 100.0);
    let path: Vec<&Node> = nodes.iter().collect();
    let chain = build_relay_chain(&path, "cut off").unwrap();

    let err = controller.send(&chain).unwrap_err();
    assert_eq!(err.link(), ("sat1999", "sat2000"));
    assert_eq!(rx.len(), 1_999);
    assert!(rx.terminal().is_empty());
}

// ============================================================================
// Failing chains
// ============================================================================

#[test]
fn test_interior_failure_surfaces_once() {
    // sat0 -> sat1 and sat1 -> sat2 deliver, sat2 -> sat3 terminates
    let script = ScriptedNoise::new().clear_n(2).noisy(TERMINATION);
    let (controller, rx) = scripted(3, script);
    let router = RelayRouter::new(&controller);
    let nodes = line(5, 100.0);

    let err = router
        .route_and_send(&nodes, &nodes[0], &nodes[4], "interrupted")
        .unwrap_err();
    assert_eq!(
        err,
        RoutingError::Comms(CommsError::BrokenConnection {
            sender: "sat2".to_string(),
            receiver: "sat3".to_string(),
            reason: LinkError::LinkTerminated,
        })
    );

    // Nothing past the failing hop accepted anything
    assert_eq!(rx.nodes(), vec!["sat1", "sat2"]);
    let stats = controller.stats().snapshot();
    assert_eq!(stats.broken_connections, 1);
    assert!(rx.terminal().is_empty());

    // The break persists for the next routed send
    let err = router
        .route_and_send(&nodes, &nodes[0], &nodes[4], "again")
        .unwrap_err();
    match err {
        RoutingError::Comms(comms) => {
            assert!(comms.is_broken_connection());
            assert_eq!(comms.link(), ("sat2", "sat3"));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_unreachable_destination() {
    let mut nodes = line(3, 100.0);
    nodes.push(Node::new("deep-space", 10_000.0).unwrap());
    let (controller, rx) = scripted(3, ScriptedNoise::new());
    let router = RelayRouter::new(&controller);

    let err = router
        .route_and_send(&nodes, &nodes[0], &nodes[3], "hello?")
        .unwrap_err();
    assert_eq!(
        err,
        RoutingError::NoPath {
            from: "sat0".to_string(),
            to: "deep-space".to_string(),
            max_range: 150.0,
        }
    );
    assert!(rx.is_empty());
}

#[test]
fn test_hand_built_chain_out_of_range() {
    // A chain that ignores range fails at the long hop
    let nodes = line(3, 100.0);
    let far = Node::new("far", 500.0).unwrap();
    let path = [&nodes[0], &nodes[1], &far];
    let chain = build_relay_chain(&path, "overreach").unwrap();

    let (controller, rx) = scripted(3, ScriptedNoise::new());
    let err = controller.send(&chain).unwrap_err();
    assert_eq!(err.link(), ("sat1", "far"));
    assert!(matches!(err.reason(), LinkError::OutOfRange { .. }));
    assert_eq!(rx.nodes(), vec!["sat1"]);
}
