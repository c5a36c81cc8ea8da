//! SpaceNet - Relay Network Simulation
//!
//! Sends packets between distance-separated satellites over a lossy,
//! level-configurable network.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use spacenet_routing::DEFAULT_RANGE;
use spacenet_simulation::settings::{ScenarioOptions, resolve_config};
use spacenet_simulation::{ScenarioReport, scenarios};

#[derive(Parser)]
#[command(
    name = "spacenet",
    about = "Relay packets between satellites over a lossy network",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Seed for reproducible noise
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// JSON network configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Skip real waits after interference
    #[arg(long, global = true)]
    virtual_time: bool,

    /// Print the report as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send "Hi" from sat1 to sat2
    Direct {
        /// Failure level
        #[arg(short, long)]
        level: Option<u8>,
    },

    /// Route one message across a line of satellites
    Relay {
        /// Failure level
        #[arg(short, long)]
        level: Option<u8>,

        /// Number of satellites
        #[arg(short, long, default_value = "5")]
        nodes: usize,

        /// Distance between neighbouring satellites
        #[arg(long, default_value = "100")]
        spacing: f64,

        /// Message to relay
        #[arg(short, long, default_value = "Hello from sat0")]
        message: String,
    },

    /// Route many messages between random satellites (always virtual time)
    Chaos {
        /// Failure level
        #[arg(short, long, default_value = "3")]
        level: u8,

        /// Number of satellites
        #[arg(short, long, default_value = "8")]
        nodes: usize,

        /// Distance between neighbouring satellites
        #[arg(long, default_value = "100")]
        spacing: f64,

        /// Number of sends
        #[arg(long, default_value = "100")]
        sends: u64,
    },

    /// Print the minimum-hop path between two satellites
    Path {
        /// Comma-separated distances from Earth
        #[arg(short, long, value_delimiter = ',', default_value = "0,100,200,300,400")]
        distances: Vec<f64>,

        /// Index of the start node
        #[arg(long, default_value = "0")]
        from: usize,

        /// Index of the end node (defaults to the last)
        #[arg(long)]
        to: Option<usize>,

        /// Adjacency threshold
        #[arg(short, long, default_value_t = DEFAULT_RANGE)]
        range: f64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let options = |level: Option<u8>, virtual_time: bool| -> anyhow::Result<ScenarioOptions> {
        let config = resolve_config(cli.config.as_deref(), level)?;
        Ok(if virtual_time || cli.virtual_time {
            ScenarioOptions::virtual_time(config, cli.seed)
        } else {
            ScenarioOptions::new(config, cli.seed)
        })
    };

    let report = match &cli.command {
        Commands::Direct { level } => scenarios::run_direct(&options(*level, false)?)?,
        Commands::Relay {
            level,
            nodes,
            spacing,
            message,
        } => scenarios::run_relay(&options(*level, false)?, *nodes, *spacing, message)?,
        Commands::Chaos {
            level,
            nodes,
            spacing,
            sends,
        } => scenarios::run_chaos(&options(Some(*level), true)?, *nodes, *spacing, *sends)?,
        Commands::Path {
            distances,
            from,
            to,
            range,
        } => {
            let to = to.unwrap_or_else(|| distances.len().saturating_sub(1));
            match scenarios::find_route(distances, *from, to, *range)? {
                Some(route) => println!("{} hops: {}", route.len() - 1, route.join(" -> ")),
                None => println!("No path from {} to {} within range {}", from, to, range),
            }
            return Ok(());
        }
    };

    print_report(&report, cli.json)
}

fn print_report(report: &ScenarioReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}
