use rayon::prelude::*;
use serde::Serialize;

use crate::bom::{MassCost, OrbitalSystem, Totals};
use crate::breakdown::{BreakdownInputs, CostBreakdown, compose_breakdown};
use crate::classify::{RiskTier, trl_label, trl_risk_tier};
use crate::config::RateTable;
use crate::error::Result;
use crate::insurance::{InsuranceEstimate, estimate_insurance};
use crate::types::{LaunchVehicle, Slug, SystemCategory};
use crate::validate::{Tolerance, Violation, validate};

/// Everything a presentation layer needs for one system under one launch
/// assumption. Violations ride alongside the totals; they never suppress them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemEstimate {
    pub slug: Slug,
    pub name: String,
    pub category: SystemCategory,
    pub vehicle: LaunchVehicle,
    pub rate_table_version: String,
    /// Recomputed from the BOM leaves.
    pub totals: Totals,
    pub cost_breakdown: CostBreakdown,
    pub insurance: InsuranceEstimate,
    pub tech_readiness_level: u8,
    pub trl_label: &'static str,
    pub risk_tier: RiskTier,
    pub violations: Vec<Violation>,
}

fn breakdown_inputs(system: &OrbitalSystem, totals: Totals) -> BreakdownInputs {
    BreakdownInputs {
        procurement_usd: totals.cost_usd,
        total_mass_kg: totals.mass_kg,
        assembly_factor: system.cost_drivers.assembly_factor,
        testing_factor: system.cost_drivers.testing_factor,
        annual_operations_usd: system.annual_operating_cost_usd,
        contingency_rate: None,
    }
}

/// Aggregate, validate, price and annotate one system.
///
/// Aggregation runs first; breakdown and insurance consume its mass and
/// procurement totals. The insurance figure reported here is the same one the
/// breakdown carries, priced on `procurement + launch`.
pub fn estimate_system(
    system: &OrbitalSystem,
    vehicle: &LaunchVehicle,
    rates: &RateTable,
    tolerance: &Tolerance,
) -> Result<SystemEstimate> {
    let totals = system.totals()?;
    let violations = validate(system, tolerance);
    for v in &violations {
        tracing::warn!(system = %system.slug, violation = %v, "declared figure disagrees with BOM");
    }

    let cost_breakdown = compose_breakdown(&breakdown_inputs(system, totals), rates, vehicle)?;
    let insurance = estimate_insurance(
        cost_breakdown.procurement.saturating_add(cost_breakdown.launch) as f64,
        rates,
        Some("insured value = procurement + launch"),
    )?;

    let trl = system.tech_readiness_level;
    tracing::debug!(
        system = %system.slug,
        %vehicle,
        mass_kg = totals.mass_kg,
        total_usd = cost_breakdown.total,
        "estimated system"
    );

    Ok(SystemEstimate {
        slug: system.slug.clone(),
        name: system.name.clone(),
        category: system.category,
        vehicle: vehicle.clone(),
        rate_table_version: rates.version.clone(),
        totals,
        cost_breakdown,
        insurance,
        tech_readiness_level: trl.level(),
        trl_label: trl_label(trl),
        risk_tier: trl_risk_tier(trl),
        violations,
    })
}

/// Estimate every system independently and in parallel. Output order matches
/// input order; one failing system does not affect the others.
pub fn estimate_catalog(
    systems: &[OrbitalSystem],
    vehicle: &LaunchVehicle,
    rates: &RateTable,
    tolerance: &Tolerance,
) -> Vec<Result<SystemEstimate>> {
    systems
        .par_iter()
        .map(|system| estimate_system(system, vehicle, rates, tolerance))
        .collect()
}

/// One row of a launch-vehicle sensitivity sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleQuote {
    pub vehicle: LaunchVehicle,
    pub launch_usd: u64,
    pub insurance_usd: u64,
    pub total_usd: u64,
}

/// Price `system` under every vehicle class in `rates`, in vehicle-name order.
pub fn vehicle_sensitivity(system: &OrbitalSystem, rates: &RateTable) -> Result<Vec<VehicleQuote>> {
    let inputs = breakdown_inputs(system, system.totals()?);
    rates
        .vehicles()
        .map(|vehicle| {
            let b = compose_breakdown(&inputs, rates, vehicle)?;
            Ok(VehicleQuote {
                vehicle: vehicle.clone(),
                launch_usd: b.launch,
                insurance_usd: b.insurance,
                total_usd: b.total,
            })
        })
        .collect()
}
