//! Scenario settings
//!
//! Network configuration comes from an optional JSON file. Every field is
//! optional; missing fields take their defaults. A `--level` given on the
//! command line overrides the file.
//!
//! ```json
//! {
//!   "level": 3,
//!   "noise": 0.5,
//!   "max_range": 150.0,
//!   "failure_weights": { "interference": 50, "corruption": 60, "termination": 20 },
//!   "interference_backoff": { "secs": 2, "nanos": 0 },
//!   "retry": { "max_attempts": 20 }
//! }
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use spacenet_core::{Clock, ManualClock, SystemClock};
use spacenet_link::NetworkConfig;

/// Everything a scenario needs besides its own parameters
#[derive(Clone)]
pub struct ScenarioOptions {
    pub config: NetworkConfig,
    /// Seed for link noise and endpoint selection; `None` draws from the OS
    pub seed: Option<u64>,
    /// Clock used for interference backoff
    pub clock: Arc<dyn Clock>,
}

impl ScenarioOptions {
    /// Options waiting on real time
    pub fn new(config: NetworkConfig, seed: Option<u64>) -> Self {
        Self {
            config,
            seed,
            clock: Arc::new(SystemClock),
        }
    }

    /// Options whose backoff only advances a virtual clock
    pub fn virtual_time(config: NetworkConfig, seed: Option<u64>) -> Self {
        Self {
            config,
            seed,
            clock: Arc::new(ManualClock::new()),
        }
    }
}

impl std::fmt::Debug for ScenarioOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioOptions")
            .field("config", &self.config)
            .field("seed", &self.seed)
            .finish()
    }
}

/// Parse a JSON network configuration
pub fn parse_config(json: &str) -> anyhow::Result<NetworkConfig> {
    let config: NetworkConfig =
        serde_json::from_str(json).context("Invalid network configuration")?;
    config.validate()?;
    Ok(config)
}

/// Load a JSON network configuration from `path`
pub fn load_config(path: &Path) -> anyhow::Result<NetworkConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_config(&json).with_context(|| format!("In config file {}", path.display()))
}

/// Combine an optional config file with an optional level override
pub fn resolve_config(path: Option<&Path>, level: Option<u8>) -> anyhow::Result<NetworkConfig> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => NetworkConfig::default(),
    };
    if let Some(level) = level {
        config.level = level;
    }
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacenet_link::RetryPolicy;
    use std::time::Duration;

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config(r#"{ "level": 3, "retry": { "max_attempts": 5 } }"#).unwrap();
        assert_eq!(config.level, 3);
        assert_eq!(config.max_range, 150.0);
        assert_eq!(config.interference_backoff, Duration::from_secs(2));
        assert_eq!(config.retry, RetryPolicy::max_attempts(5));
    }

    #[test]
    fn test_parse_rejects_invalid_values() {
        assert!(parse_config(r#"{ "level": 0 }"#).is_err());
        assert!(parse_config(r#"{ "noise": 1.5 }"#).is_err());
        assert!(parse_config("not json").is_err());
    }

    #[test]
    fn test_level_override() {
        let config = resolve_config(None, Some(2)).unwrap();
        assert_eq!(config.level, 2);
        assert_eq!(resolve_config(None, None).unwrap().level, 1);
        assert!(resolve_config(None, Some(0)).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/spacenet.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
