use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::breakdown::CostBreakdown;
use crate::error::{Result, ensure_fraction, ensure_non_negative};
use crate::insurance::InsuranceEstimate;
use crate::types::{BomCategory, Slug, SystemCategory, Trl};

/// Rolled-up mass and cost of any node in the BOM tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub mass_kg: f64,
    pub cost_usd: f64,
}

impl Add for Totals {
    type Output = Totals;

    fn add(self, rhs: Totals) -> Totals {
        Totals { mass_kg: self.mass_kg + rhs.mass_kg, cost_usd: self.cost_usd + rhs.cost_usd }
    }
}

impl Sum for Totals {
    fn sum<I: Iterator<Item = Totals>>(iter: I) -> Totals {
        iter.fold(Totals::default(), Add::add)
    }
}

/// Anything that rolls up to a mass and a cost.
///
/// Implementations recompute from their own inputs; declared totals stored on
/// the record are never trusted here (that comparison is the validator's job).
pub trait MassCost {
    fn totals(&self) -> Result<Totals>;
}

/// Sum the recomputed totals of `parts`.
///
/// Used identically for items → subsystem and subsystems → system. Fails on the
/// first negative or non-finite input rather than clamping.
pub fn aggregate<T: MassCost>(parts: &[T]) -> Result<Totals> {
    parts.iter().map(MassCost::totals).sum()
}

/// A BOM line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomItem {
    pub name: String,
    pub category: BomCategory,
    pub quantity: u32,
    pub unit_mass_kg: f64,
    pub unit_cost_usd: f64,
    /// Declared `quantity × unit_mass_kg`, as published in the source catalog.
    pub total_mass_kg: f64,
    /// Declared `quantity × unit_cost_usd`, as published in the source catalog.
    pub total_cost_usd: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl BomItem {
    /// Build an item whose declared totals agree with its unit figures.
    pub fn new(
        name: impl Into<String>,
        category: BomCategory,
        quantity: u32,
        unit_mass_kg: f64,
        unit_cost_usd: f64,
    ) -> Self {
        BomItem {
            name: name.into(),
            category,
            quantity,
            unit_mass_kg,
            unit_cost_usd,
            total_mass_kg: quantity as f64 * unit_mass_kg,
            total_cost_usd: quantity as f64 * unit_cost_usd,
            supplier: None,
            notes: None,
        }
    }

    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    /// `quantity × unit` figures with no range checks. The validator reads
    /// these so a bad unit value is still reported rather than aborting.
    pub fn raw_totals(&self) -> Totals {
        let qty = self.quantity as f64;
        Totals { mass_kg: qty * self.unit_mass_kg, cost_usd: qty * self.unit_cost_usd }
    }
}

impl MassCost for BomItem {
    fn totals(&self) -> Result<Totals> {
        ensure_non_negative(&format!("{}.unit_mass_kg", self.name), self.unit_mass_kg)?;
        ensure_non_negative(&format!("{}.unit_cost_usd", self.name), self.unit_cost_usd)?;
        Ok(self.raw_totals())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subsystem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Declared subsystem mass.
    pub mass_kg: f64,
    /// Declared subsystem cost.
    pub cost_usd: f64,
    pub items: Vec<BomItem>,
}

impl Subsystem {
    /// Build a subsystem whose declared totals are the sum of `items`.
    pub fn from_items(
        name: impl Into<String>,
        description: impl Into<String>,
        items: Vec<BomItem>,
    ) -> Result<Self> {
        let totals = aggregate(&items)?;
        Ok(Subsystem {
            name: name.into(),
            description: description.into(),
            mass_kg: totals.mass_kg,
            cost_usd: totals.cost_usd,
            items,
        })
    }
}

impl MassCost for Subsystem {
    fn totals(&self) -> Result<Totals> {
        aggregate(&self.items)
    }
}

/// Where the system operates. Descriptive only; not priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    /// Regime label such as "LEO", "GEO", "NRHO" or "EML1".
    pub regime: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inclination_deg: Option<f64>,
}

/// Complexity-dependent multipliers on procurement cost.
///
/// Small for a single-launch uncrewed platform, larger for a multi-module crewed
/// station assembled in space. Both must lie in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostDrivers {
    pub assembly_factor: f64,
    pub testing_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalSystem {
    pub slug: Slug,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    pub category: SystemCategory,
    pub orbit: Orbit,
    /// Declared system mass.
    pub total_mass_kg: f64,
    pub crew_capacity: u32,
    pub power_kw: f64,
    pub design_life_years: f64,
    pub timeline_years: f64,
    pub tech_readiness_level: Trl,
    pub subsystems: Vec<Subsystem>,
    pub cost_drivers: CostDrivers,
    pub annual_operating_cost_usd: f64,
    /// Breakdown as published alongside the source data, if any. Checked for
    /// additivity by the validator; never reused as a computed value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_breakdown: Option<CostBreakdown>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_insurance: Option<InsuranceEstimate>,
}

impl OrbitalSystem {
    /// Scalar range checks for fields outside the BOM tree.
    pub fn check_scalars(&self) -> Result<()> {
        let field = |f: &str| format!("{}.{f}", self.slug);
        ensure_non_negative(&field("power_kw"), self.power_kw)?;
        ensure_non_negative(&field("annual_operating_cost_usd"), self.annual_operating_cost_usd)?;
        ensure_fraction(&field("assembly_factor"), self.cost_drivers.assembly_factor)?;
        ensure_fraction(&field("testing_factor"), self.cost_drivers.testing_factor)?;
        for (name, years) in
            [("design_life_years", self.design_life_years), ("timeline_years", self.timeline_years)]
        {
            if !years.is_finite() || years <= 0.0 {
                return Err(crate::error::Error::invalid(
                    field(name),
                    format!("must be positive, got {years}"),
                ));
            }
        }
        Ok(())
    }
}

impl MassCost for OrbitalSystem {
    fn totals(&self) -> Result<Totals> {
        aggregate(&self.subsystems)
    }
}
