//! Launch-vehicle sensitivity sweep.
//!
//! Prices each catalog system under every vehicle class in the rate table and
//! prints one table per system.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use orbcost::catalog::Catalog;
use orbcost::config::RateTable;
use orbcost::estimate::vehicle_sensitivity;
use orbcost::format::{format_cost_compact, format_mass};
use orbcost::bom::MassCost;

/// Compare launch-vehicle classes for every system in a catalog.
#[derive(Debug, Parser)]
#[command(name = "vehicle_sweep", version)]
struct Args {
    /// Rate table JSON. Defaults to the built-in reference pricing.
    rates: Option<PathBuf>,
    /// Catalog JSON. Defaults to the built-in sample systems.
    catalog: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let rates = match &args.rates {
        Some(path) => RateTable::load(path)
            .with_context(|| format!("loading rate table {}", path.display()))?,
        None => RateTable::canonical(),
    };
    let catalog = match &args.catalog {
        Some(path) => {
            Catalog::load(path).with_context(|| format!("loading catalog {}", path.display()))?
        }
        None => Catalog::canonical()?,
    };

    if rates.vehicles().next().is_none() {
        eprintln!("vehicle_sweep: rate table {:?} lists no vehicles", rates.version);
        return Ok(());
    }

    for system in catalog.systems() {
        let totals = system.totals()?;
        let quotes = vehicle_sensitivity(system, &rates)
            .with_context(|| format!("pricing {}", system.slug))?;

        println!("\n=== {} ({}) ===", system.name, format_mass(totals.mass_kg));
        println!("{:<20} | {:>9} | {:>9} | {:>9} | {:>7}", "Vehicle", "Launch", "Insurance", "Total", "Launch%");
        for q in &quotes {
            let share = if q.total_usd == 0 { 0.0 } else { q.launch_usd as f64 / q.total_usd as f64 };
            println!(
                "{:<20} | {:>9} | {:>9} | {:>9} | {:>6.1}%",
                q.vehicle.0,
                format_cost_compact(q.launch_usd as f64),
                format_cost_compact(q.insurance_usd as f64),
                format_cost_compact(q.total_usd as f64),
                share * 100.0,
            );
        }
    }
    Ok(())
}
