use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ensure_fraction, ensure_non_negative};
use crate::types::LaunchVehicle;

/// Premium rates, each a fraction of insured value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InsuranceRates {
    /// One-off launch-and-early-operations premium.
    pub launch_rate: f64,
    /// Annual in-orbit premium.
    pub in_orbit_annual_rate: f64,
    /// Annual third-party liability premium.
    pub liability_rate: f64,
}

/// Pricing assumptions for one era / market view.
///
/// Always passed in by the caller; the engine holds no rates of its own. Maps are
/// ordered so that anything derived from a table serializes deterministically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    /// Free-form label, e.g. "2025-reference".
    #[serde(default)]
    pub version: String,
    /// USD per kilogram to orbit, keyed by vehicle class. May be empty.
    pub launch_cost_per_kg_by_vehicle: BTreeMap<LaunchVehicle, f64>,
    pub insurance: InsuranceRates,
    pub default_contingency_rate: f64,
    pub regulatory_baseline_usd: f64,
}

impl RateTable {
    /// Range-check every rate and price in the table.
    pub fn validate(&self) -> Result<()> {
        for (vehicle, per_kg) in &self.launch_cost_per_kg_by_vehicle {
            ensure_non_negative(&format!("launch_cost_per_kg_by_vehicle.{vehicle}"), *per_kg)?;
        }
        ensure_fraction("insurance.launch_rate", self.insurance.launch_rate)?;
        ensure_fraction("insurance.in_orbit_annual_rate", self.insurance.in_orbit_annual_rate)?;
        ensure_fraction("insurance.liability_rate", self.insurance.liability_rate)?;
        ensure_fraction("default_contingency_rate", self.default_contingency_rate)?;
        ensure_non_negative("regulatory_baseline_usd", self.regulatory_baseline_usd)?;
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let table: RateTable = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Vehicle classes known to this table, in name order.
    pub fn vehicles(&self) -> impl Iterator<Item = &LaunchVehicle> {
        self.launch_cost_per_kg_by_vehicle.keys()
    }

    pub fn with_vehicle(mut self, vehicle: LaunchVehicle, usd_per_kg: f64) -> Self {
        self.launch_cost_per_kg_by_vehicle.insert(vehicle, usd_per_kg);
        self
    }

    /// Reference pricing: current commercial launch market plus a projected
    /// fully-reusable super-heavy class.
    pub fn canonical() -> Self {
        // ── Launch: USD per kg to LEO ─────────────────────────────────────────
        let launch = BTreeMap::from([
            (LaunchVehicle::new("falcon_9"), 2_720.0),
            (LaunchVehicle::new("falcon_heavy"), 1_500.0),
            (LaunchVehicle::new("heavy_expendable"), 10_000.0),
            (LaunchVehicle::new("starship"), 200.0),
        ]);

        RateTable {
            version: "2025-reference".to_string(),
            launch_cost_per_kg_by_vehicle: launch,
            // ── Insurance: launch 8.5%, in-orbit 4.4%/yr, liability 1.8%/yr ──
            insurance: InsuranceRates {
                launch_rate: 0.085,
                in_orbit_annual_rate: 0.044,
                liability_rate: 0.018,
            },
            default_contingency_rate: 0.20,
            // Licensing, spectrum filings, debris-mitigation compliance.
            regulatory_baseline_usd: 15_000_000.0,
        }
    }
}
