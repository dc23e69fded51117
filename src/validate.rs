use serde::Serialize;

use crate::bom::{BomItem, OrbitalSystem, Totals};
use crate::breakdown::CostBreakdown;
use crate::insurance::InsuranceEstimate;

/// What a [`Violation`] compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Quantity {
    MassKg,
    CostUsd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViolationKind {
    /// Item total differs from quantity × unit figure.
    ItemTotal,
    /// Declared subsystem total differs from the sum of its items.
    SubsystemTotal,
    /// Declared system total differs from the sum over all leaves.
    SystemTotal,
    /// Published breakdown parts do not add up to its total.
    BreakdownNotAdditive,
    /// Published insurance premiums do not add up to the first-year total.
    InsuranceNotAdditive,
    /// A published premium differs from insured value × its rate.
    InsurancePremium,
}

/// A declared figure that disagrees with the value recomputed from below.
///
/// `delta = actual − expected`: positive means the catalog over-states.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Slash-separated location, e.g. `lunar-gateway/Power/Solar wing`.
    pub path: String,
    pub quantity: Quantity,
    /// Recomputed value.
    pub expected: f64,
    /// Declared value.
    pub actual: f64,
    pub delta: f64,
}

impl Violation {
    pub fn delta_kg(&self) -> Option<f64> {
        (self.quantity == Quantity::MassKg).then_some(self.delta)
    }

    pub fn delta_usd(&self) -> Option<f64> {
        (self.quantity == Quantity::CostUsd).then_some(self.delta)
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let unit = match self.quantity {
            Quantity::MassKg => "kg",
            Quantity::CostUsd => "usd",
        };
        write!(
            f,
            "{:?} {}: expected={:.2} actual={:.2} delta_{unit}={:+.2}",
            self.kind, self.path, self.expected, self.actual, self.delta
        )
    }
}

/// Allowed drift between declared and recomputed figures.
///
/// A pair matches when `|actual − expected| ≤ max(relative × |expected|, absolute)`.
/// The absolute floor keeps values near zero from flagging on rounding alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tolerance {
    pub relative: f64,
    pub absolute: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance { relative: 0.005, absolute: 1.0 }
    }
}

impl Tolerance {
    pub fn accepts(&self, expected: f64, actual: f64) -> bool {
        let limit = (self.relative * expected.abs()).max(self.absolute);
        // Written so NaN on either side is never accepted.
        (actual - expected).abs() <= limit
    }
}

struct Checker<'a> {
    tolerance: &'a Tolerance,
    found: Vec<Violation>,
}

impl Checker<'_> {
    fn check(&mut self, kind: ViolationKind, path: &str, quantity: Quantity, expected: f64, actual: f64) {
        if !self.tolerance.accepts(expected, actual) {
            self.found.push(Violation {
                kind,
                path: path.to_string(),
                quantity,
                expected,
                actual,
                delta: actual - expected,
            });
        }
    }

    fn check_breakdown(&mut self, path: &str, b: &CostBreakdown) {
        let parts: u128 = [
            b.procurement,
            b.launch,
            b.assembly,
            b.testing,
            b.operations,
            b.insurance,
            b.regulatory,
            b.contingency,
        ]
        .iter()
        .map(|&v| v as u128)
        .sum();
        if parts != b.total as u128 {
            self.found.push(Violation {
                kind: ViolationKind::BreakdownNotAdditive,
                path: format!("{path}/published_breakdown.total"),
                quantity: Quantity::CostUsd,
                expected: parts as f64,
                actual: b.total as f64,
                delta: b.total as f64 - parts as f64,
            });
        }
    }

    fn check_insurance(&mut self, path: &str, ins: &InsuranceEstimate) {
        let parts = ins.launch_premium_usd as u128
            + ins.in_orbit_annual_usd as u128
            + ins.liability_annual_usd as u128;
        if parts != ins.total_first_year_usd as u128 {
            self.found.push(Violation {
                kind: ViolationKind::InsuranceNotAdditive,
                path: format!("{path}/published_insurance.total_first_year_usd"),
                quantity: Quantity::CostUsd,
                expected: parts as f64,
                actual: ins.total_first_year_usd as f64,
                delta: ins.total_first_year_usd as f64 - parts as f64,
            });
        }

        let insured = ins.insured_value as f64;
        for (field, rate, premium) in [
            ("launch_premium_usd", ins.launch_premium_rate, ins.launch_premium_usd),
            ("in_orbit_annual_usd", ins.in_orbit_premium_rate, ins.in_orbit_annual_usd),
        ] {
            self.check(
                ViolationKind::InsurancePremium,
                &format!("{path}/published_insurance.{field}"),
                Quantity::CostUsd,
                (insured * rate).round(),
                premium as f64,
            );
        }
    }
}

/// Recompute every aggregate of `system` bottom-up and compare with its declared
/// figures. Empty on a consistent tree.
///
/// Each level is compared with the truth recomputed from the leaves, so one
/// drifted declaration yields exactly one violation at its own path.
pub fn validate(system: &OrbitalSystem, tolerance: &Tolerance) -> Vec<Violation> {
    let mut checker = Checker { tolerance, found: Vec::new() };
    let root = system.slug.0.as_str();
    let mut sub_truths = Vec::with_capacity(system.subsystems.len());

    for sub in &system.subsystems {
        let sub_path = format!("{root}/{}", sub.name);
        for item in &sub.items {
            let truth = item.raw_totals();
            let item_path = format!("{sub_path}/{}", item.name);
            checker.check(ViolationKind::ItemTotal, &item_path, Quantity::MassKg, truth.mass_kg, item.total_mass_kg);
            checker.check(ViolationKind::ItemTotal, &item_path, Quantity::CostUsd, truth.cost_usd, item.total_cost_usd);
        }
        let sub_truth: Totals = sub.items.iter().map(BomItem::raw_totals).sum();
        checker.check(ViolationKind::SubsystemTotal, &sub_path, Quantity::MassKg, sub_truth.mass_kg, sub.mass_kg);
        checker.check(ViolationKind::SubsystemTotal, &sub_path, Quantity::CostUsd, sub_truth.cost_usd, sub.cost_usd);
        sub_truths.push(sub_truth);
    }
    let system_truth: Totals = sub_truths.into_iter().sum();

    checker.check(ViolationKind::SystemTotal, root, Quantity::MassKg, system_truth.mass_kg, system.total_mass_kg);

    if let Some(b) = &system.published_breakdown {
        checker.check(
            ViolationKind::SystemTotal,
            &format!("{root}/published_breakdown.procurement"),
            Quantity::CostUsd,
            system_truth.cost_usd,
            b.procurement as f64,
        );
        checker.check_breakdown(root, b);
    }
    if let Some(ins) = &system.published_insurance {
        checker.check_insurance(root, ins);
    }

    checker.found
}
