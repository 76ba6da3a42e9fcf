//! Ring command - print the candidate ring used by the search.

use clap::Args;

use peakseek::coord::MapPoint;
use peakseek::search::{probe_ring, DEFAULT_PROBE_COUNT, DEFAULT_PROBE_RADIUS};

use crate::error::CliError;

/// Arguments for the ring command.
#[derive(Debug, Args)]
pub struct RingArgs {
    /// Ring center, map x in meters
    #[arg(long, default_value_t = 0.0)]
    pub x: f64,

    /// Ring center, map y in meters
    #[arg(long, default_value_t = 0.0)]
    pub y: f64,

    /// Number of probe positions
    #[arg(long, default_value_t = DEFAULT_PROBE_COUNT)]
    pub count: usize,

    /// Ring radius in meters
    #[arg(long, default_value_t = DEFAULT_PROBE_RADIUS)]
    pub radius: f64,
}

/// Run the ring command.
pub fn run(args: RingArgs) -> Result<(), CliError> {
    if args.count == 0 {
        return Err(CliError::Config(
            "probe count must be at least 1".to_string(),
        ));
    }

    let center = MapPoint::new(args.x, args.y);
    println!(
        "Candidate ring around {} ({} probes, radius {:.3} m)",
        center, args.count, args.radius
    );

    for (index, candidate) in probe_ring(center, args.count, args.radius).iter().enumerate() {
        println!("  [{}] {}", index, candidate);
    }

    Ok(())
}
