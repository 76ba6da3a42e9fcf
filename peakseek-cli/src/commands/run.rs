//! Run command - search for a local peak in a simulated elevation field.

use std::time::Duration;

use clap::Args;
use tokio::runtime::Runtime;

use peakseek::coord::MapPoint;
use peakseek::goal::{GoalState, SearchRequest, SearchServer};
use peakseek::search::{SearchConfig, DEFAULT_PROBE_COUNT, DEFAULT_PROBE_RADIUS};
use peakseek::sim::{Hill, SimConfig, SimWorld};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the run command.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Agent start position, map x in meters
    #[arg(long, default_value_t = 0.0)]
    pub start_x: f64,

    /// Agent start position, map y in meters
    #[arg(long, default_value_t = 0.0)]
    pub start_y: f64,

    /// Gaussian hill as "X,Y,AMPLITUDE,SPREAD"; repeat for more hills
    #[arg(long = "hill", value_parser = parse_hill)]
    pub hills: Vec<Hill>,

    /// Delay before each elevation sample is answered, in milliseconds
    #[arg(long, default_value_t = 20)]
    pub sample_latency_ms: u64,

    /// Duration of each simulated move, in milliseconds
    #[arg(long, default_value_t = 250)]
    pub move_ms: u64,

    /// Number of probe positions on the candidate ring
    #[arg(long, default_value_t = DEFAULT_PROBE_COUNT)]
    pub probes: usize,

    /// Probe ring radius in meters
    #[arg(long, default_value_t = DEFAULT_PROBE_RADIUS)]
    pub radius: f64,

    /// Poll quantum for cancellation checks, in milliseconds
    #[arg(long, default_value_t = 100)]
    pub poll_ms: u64,
}

/// Parse a hill description of the form "X,Y,AMPLITUDE,SPREAD".
pub fn parse_hill(s: &str) -> Result<Hill, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 4 {
        return Err(format!("expected \"X,Y,AMPLITUDE,SPREAD\", got '{}'", s));
    }

    let mut values = [0.0f64; 4];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a number", part.trim()))?;
    }

    if values[3] <= 0.0 {
        return Err("hill spread must be positive".to_string());
    }

    Ok(Hill {
        center: MapPoint::new(values[0], values[1]),
        amplitude: values[2],
        spread: values[3],
    })
}

/// Run the run command.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("run");

    let hills = if args.hills.is_empty() {
        // A default hill a couple of meters away makes a visible climb.
        vec![Hill {
            center: MapPoint::new(2.0, 1.5),
            amplitude: 10.0,
            spread: 2.0,
        }]
    } else {
        args.hills
    };

    let start = MapPoint::new(args.start_x, args.start_y);
    let config = SearchConfig {
        probe_count: args.probes,
        probe_radius: args.radius,
        poll_interval: Duration::from_millis(args.poll_ms),
    };

    // Print banner
    println!("Peakseek Search v{}", peakseek::VERSION);
    println!("======================");
    println!();
    println!("Start:      {}", start);
    for hill in &hills {
        println!(
            "Hill:       {} amplitude {:.1}, spread {:.1}",
            hill.center, hill.amplitude, hill.spread
        );
    }
    println!(
        "Probes:     {} at radius {:.2} m",
        config.probe_count, config.probe_radius
    );
    println!(
        "Latency:    sample {} ms, move {} ms",
        args.sample_latency_ms, args.move_ms
    );
    println!();
    println!("Press Ctrl+C to cancel the search");
    println!();

    let world = SimWorld::new(SimConfig {
        start,
        hills,
        sample_latency: Duration::from_millis(args.sample_latency_ms),
        move_duration: Duration::from_millis(args.move_ms),
    });

    let runtime = Runtime::new().map_err(|e| CliError::Runtime(e.to_string()))?;
    runtime.block_on(async {
        let server = SearchServer::new(world.clone(), world.clone(), world.clone(), config);
        let mut handle = server.submit(SearchRequest);

        // Wire Ctrl+C to cooperative cancellation
        let cancel_handle = handle.clone();
        ctrlc::set_handler(move || {
            println!();
            println!("Received shutdown signal, cancelling search...");
            cancel_handle.cancel();
        })
        .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

        match handle.wait_terminal().await {
            GoalState::Succeeded => {
                let peak = world.agent_position();
                println!();
                println!("Peak reached at {}", peak);
                println!("  Elevation: {:.3}", world.field_value(peak.x, peak.y));
                println!("  Moves:     {}", world.move_count());
                println!("  Samples:   {}", world.sample_count());
                Ok(())
            }
            GoalState::Cancelled => Err(CliError::Cancelled),
            _ => Err(CliError::Aborted),
        }
    })
}
