//! # SpaceNet Simulation
//!
//! Canned scenarios for the SpaceNet relay simulation, driven by the
//! `spacenet` binary.
//!
//! ## Scenarios
//!
//! - **direct**: `sat1` at 100 sends "Hi" to `sat2` at 200
//! - **relay**: one message routed across a line of evenly spaced satellites
//! - **chaos**: many routed sends between random endpoints, with statistics
//! - **path**: print the minimum-hop path for a set of distances
//!
//! ## Example
//!
//! ```rust
//! use spacenet_link::NetworkConfig;
//! use spacenet_simulation::{ScenarioOptions, scenarios};
//!
//! let options = ScenarioOptions::virtual_time(NetworkConfig::for_level(1), Some(7));
//! let report = scenarios::run_direct(&options).unwrap();
//! assert_eq!(report.delivered, 1);
//! ```

pub mod scenarios;
pub mod settings;

pub use scenarios::ScenarioReport;
pub use settings::ScenarioOptions;
