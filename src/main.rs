use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use orbcost::catalog::Catalog;
use orbcost::classify::CatalogSummary;
use orbcost::config::RateTable;
use orbcost::estimate::{SystemEstimate, estimate_catalog};
use orbcost::format::{format_cost_compact, format_mass};
use orbcost::types::LaunchVehicle;
use orbcost::validate::Tolerance;

/// Estimate lifecycle cost and insurance for every system in a catalog.
#[derive(Debug, Parser)]
#[command(name = "orbcost", version)]
struct Args {
    /// Rate table JSON. Defaults to the built-in reference pricing.
    #[arg(long)]
    rates: Option<PathBuf>,
    /// Catalog JSON (`{"systems": [...]}`). Defaults to the built-in sample systems.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Launch-vehicle class to price every system under.
    #[arg(long, default_value = "falcon_heavy")]
    vehicle: String,
    /// NDJSON file receiving one estimate per line.
    #[arg(long, default_value = "estimates.ndjson")]
    output: PathBuf,
    /// Relative tolerance for declared-vs-recomputed totals.
    #[arg(long, default_value_t = 0.005)]
    tolerance: f64,
    /// Also print per-category and per-risk-tier counts.
    #[arg(long)]
    summary: bool,
    #[arg(long)]
    quiet: bool,
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
    let vehicle = LaunchVehicle::new(args.vehicle.as_str());
    let tolerance = Tolerance { relative: args.tolerance, ..Tolerance::default() };

    let results = estimate_catalog(catalog.systems(), &vehicle, &rates, &tolerance);

    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut writer = BufWriter::new(file);
    let mut estimates: Vec<&SystemEstimate> = Vec::new();
    let mut failed = 0usize;
    for (system, result) in catalog.systems().iter().zip(&results) {
        match result {
            Ok(est) => {
                serde_json::to_writer(&mut writer, est)?;
                writeln!(writer)?;
                estimates.push(est);
            }
            Err(e) => {
                failed += 1;
                eprintln!("error: {}: {e}", system.slug);
            }
        }
    }
    writer.flush()?;

    if !args.quiet {
        println!(
            "Estimated {} system(s) under {vehicle} (rates {}) → {}",
            estimates.len(),
            rates.version,
            args.output.display()
        );
        print_estimates(&estimates);
        if args.summary {
            print_summary(&CatalogSummary::from_systems(catalog.systems())?);
        }
    }

    if failed > 0 {
        bail!("{failed} system(s) could not be estimated");
    }
    Ok(())
}

fn print_estimates(estimates: &[&SystemEstimate]) {
    println!(
        "\n{:<28} | {:>9} | {:>11} | {:>9} | {:>9} | {:>9} | {:>3} | {:<6} | {:>5}",
        "System", "Mass", "Procurement", "Launch", "Insurance", "Total", "TRL", "Risk", "Warn#"
    );
    println!("{}", "-".repeat(28 + 3 + 9 + 3 + 11 + 3 + 9 + 3 + 9 + 3 + 9 + 3 + 3 + 3 + 6 + 3 + 5));

    for est in estimates {
        let b = &est.cost_breakdown;
        println!(
            "{:<28} | {:>9} | {:>11} | {:>9} | {:>9} | {:>9} | {:>3} | {:<6} | {:>5}",
            est.slug.0,
            format_mass(est.totals.mass_kg),
            format_cost_compact(b.procurement as f64),
            format_cost_compact(b.launch as f64),
            format_cost_compact(b.insurance as f64),
            format_cost_compact(b.total as f64),
            est.tech_readiness_level,
            est.risk_tier,
            est.violations.len(),
        );
    }

    let flagged: Vec<_> = estimates.iter().flat_map(|e| &e.violations).collect();
    if !flagged.is_empty() {
        println!("\n  {} consistency warning(s):", flagged.len());
        for v in flagged {
            println!("    {v}");
        }
    }
}

fn print_summary(summary: &CatalogSummary) {
    println!("\n=== Catalog summary ({} systems) ===", summary.system_count);
    for (category, count) in &summary.by_category {
        println!("  {category:<16} {count:>3}");
    }
    println!();
    for (tier, count) in &summary.by_risk_tier {
        println!("  {tier:<16} {count:>3}");
    }
    println!(
        "\n  Total BOM mass {}  procurement {}",
        format_mass(summary.totals.mass_kg),
        format_cost_compact(summary.totals.cost_usd)
    );
}
