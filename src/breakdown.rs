use serde::{Deserialize, Serialize};

use crate::config::RateTable;
use crate::error::{Result, ensure_fraction, ensure_non_negative, sum_usd, whole_usd};
use crate::insurance::estimate_insurance;
use crate::launch::launch_cost;
use crate::types::LaunchVehicle;

/// Lifecycle cost estimate, whole USD.
///
/// `total` is the exact sum of the eight other fields, and
/// `contingency == round(subtotal × contingency_rate)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub procurement: u64,
    pub launch: u64,
    pub assembly: u64,
    pub testing: u64,
    /// First-year operations.
    pub operations: u64,
    pub insurance: u64,
    pub regulatory: u64,
    pub contingency: u64,
    pub total: u64,
}

impl CostBreakdown {
    /// Everything except contingency. `None` if the parts overflow `u64`.
    pub fn subtotal(&self) -> Option<u64> {
        [
            self.procurement,
            self.launch,
            self.assembly,
            self.testing,
            self.operations,
            self.insurance,
            self.regulatory,
        ]
        .into_iter()
        .try_fold(0u64, u64::checked_add)
    }

    /// Whether the displayed parts add up to the displayed total.
    pub fn is_additive(&self) -> bool {
        self.subtotal().and_then(|s| s.checked_add(self.contingency)) == Some(self.total)
    }
}

/// Per-system inputs to [`compose_breakdown`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakdownInputs {
    pub procurement_usd: f64,
    pub total_mass_kg: f64,
    pub assembly_factor: f64,
    pub testing_factor: f64,
    pub annual_operations_usd: f64,
    /// Falls back to the rate table's default when `None`.
    pub contingency_rate: Option<f64>,
}

impl BreakdownInputs {
    fn validate(&self) -> Result<()> {
        ensure_non_negative("procurement_usd", self.procurement_usd)?;
        ensure_non_negative("total_mass_kg", self.total_mass_kg)?;
        ensure_fraction("assembly_factor", self.assembly_factor)?;
        ensure_fraction("testing_factor", self.testing_factor)?;
        ensure_non_negative("annual_operations_usd", self.annual_operations_usd)?;
        if let Some(rate) = self.contingency_rate {
            ensure_fraction("contingency_rate", rate)?;
        }
        Ok(())
    }
}

/// Compile a full cost breakdown for one system under one launch vehicle.
///
/// Insured value is `procurement + launch`: hardware replacement plus re-launch.
/// Assembly, testing and operations are excluded because they are not re-incurred
/// identically if the asset is lost before it becomes operational.
pub fn compose_breakdown(
    inputs: &BreakdownInputs,
    rates: &RateTable,
    vehicle: &LaunchVehicle,
) -> Result<CostBreakdown> {
    inputs.validate()?;
    rates.validate()?;
    let contingency_rate = inputs.contingency_rate.unwrap_or(rates.default_contingency_rate);
    ensure_fraction("contingency_rate", contingency_rate)?;

    let procurement = whole_usd("procurement_usd", inputs.procurement_usd)?;
    let launch = whole_usd("launch_cost", launch_cost(inputs.total_mass_kg, vehicle, rates)?)?;
    let assembly = whole_usd("assembly", inputs.procurement_usd * inputs.assembly_factor)?;
    let testing = whole_usd("testing", inputs.procurement_usd * inputs.testing_factor)?;
    let operations = whole_usd("annual_operations_usd", inputs.annual_operations_usd)?;
    let insured_value = sum_usd("insured_value", [procurement, launch])?;
    let insurance = estimate_insurance(insured_value as f64, rates, None)?.total_first_year_usd;
    let regulatory = whole_usd("regulatory_baseline_usd", rates.regulatory_baseline_usd)?;

    let subtotal = sum_usd(
        "subtotal",
        [procurement, launch, assembly, testing, operations, insurance, regulatory],
    )?;
    let contingency = whole_usd("contingency", subtotal as f64 * contingency_rate)?;
    let total = sum_usd("total", [subtotal, contingency])?;

    Ok(CostBreakdown {
        procurement,
        launch,
        assembly,
        testing,
        operations,
        insurance,
        regulatory,
        contingency,
        total,
    })
}
