//! courier — plan a delivery round trip over a street map file.
//!
//! ```text
//! courier --map data/town.txt --deliveries data/deliveries.csv --depot "34.0600000 -118.4500000"
//! ```
//!
//! Logging goes to stderr and honours `RUST_LOG` (default `info`); the plan
//! itself goes to stdout.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use courier_core::{Coordinate, TableConfig};
use courier_map::{load_map_with_config, RouteSearch};
use courier_plan::{load_deliveries_csv, DeliveryPlanner, PlannerConfig};

#[derive(Debug, Parser)]
#[command(name = "courier", version, about = "Plan a delivery round trip over a street map")]
struct Args {
    /// Street map in the block text format.
    #[arg(long)]
    map: PathBuf,

    /// Deliveries CSV with columns latitude,longitude,item.
    #[arg(long)]
    deliveries: PathBuf,

    /// Depot coordinate as "lat lon" or "lat,lon"; must be on the map.
    #[arg(long)]
    depot: Coordinate,

    /// Deliver in the order given instead of nearest-first.
    #[arg(long)]
    no_optimize: bool,

    /// Turns within this many degrees of straight ahead are not announced.
    #[arg(long, default_value_t = PlannerConfig::default().straight_tolerance_deg)]
    straight_tolerance: f64,

    /// Load factor limit for the map index's coordinate table.
    #[arg(long, default_value_t = TableConfig::DEFAULT_MAX_LOAD_FACTOR)]
    max_load_factor: f64,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let table = TableConfig { max_load_factor: args.max_load_factor, ..TableConfig::default() };
    table.validate().context("invalid --max-load-factor")?;

    let t_load = Instant::now();
    let file = File::open(&args.map).with_context(|| format!("opening map {}", args.map.display()))?;
    let index = load_map_with_config(BufReader::new(file), table)
        .with_context(|| format!("loading map {}", args.map.display()))?;
    let deliveries = load_deliveries_csv(&args.deliveries)
        .with_context(|| format!("loading deliveries {}", args.deliveries.display()))?;
    tracing::info!(
        coordinates = index.coordinate_count(),
        buckets = index.bucket_count(),
        deliveries = deliveries.len(),
        secs = t_load.elapsed().as_secs_f64(),
        "inputs loaded"
    );

    let config = PlannerConfig {
        optimize_order:         !args.no_optimize,
        straight_tolerance_deg: args.straight_tolerance,
    };
    let planner = DeliveryPlanner::with_config(RouteSearch::new(&index), config)?;

    let t_plan = Instant::now();
    let plan = planner
        .plan(&args.depot, &deliveries)
        .context("no delivery plan could be produced")?;

    println!("=== courier — {} deliveries from {} ===", plan.order.len(), args.depot);
    println!();
    for command in &plan.commands {
        println!("{command}");
    }
    println!();
    println!("Total travel distance: {:.2} miles", plan.distance_miles);
    if let Some(summary) = plan.summary {
        println!(
            "Crow distance: {:.2} miles as listed, {:.2} miles reordered",
            summary.old_crow_miles, summary.new_crow_miles
        );
    }
    println!("Planned in {:.3} s", t_plan.elapsed().as_secs_f64());

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
