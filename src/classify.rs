use std::collections::BTreeMap;

use serde::Serialize;

use crate::bom::{MassCost, OrbitalSystem, Totals};
use crate::error::Result;
use crate::types::{SystemCategory, Trl};

/// Maturity risk band for display, ordered from lowest to highest risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Green,
    Yellow,
    Orange,
    Red,
}

impl RiskTier {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskTier::Green => "green",
            RiskTier::Yellow => "yellow",
            RiskTier::Orange => "orange",
            RiskTier::Red => "red",
        }
    }

    /// Hex colour used by presentation layers.
    pub fn color(self) -> &'static str {
        match self {
            RiskTier::Green => "#22c55e",
            RiskTier::Yellow => "#eab308",
            RiskTier::Orange => "#f97316",
            RiskTier::Red => "#ef4444",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

pub fn trl_label(trl: Trl) -> &'static str {
    match trl.level() {
        1 => "Basic principles observed",
        2 => "Technology concept formulated",
        3 => "Experimental proof of concept",
        4 => "Technology validated in lab",
        5 => "Technology validated in relevant environment",
        6 => "Technology demonstrated in relevant environment",
        7 => "System prototype demonstrated in space",
        8 => "System complete and flight qualified",
        _ => "Actual system flight proven",
    }
}

/// Lower bounds are inclusive: 7+ green, 5–6 yellow, 3–4 orange, 1–2 red.
pub fn trl_risk_tier(trl: Trl) -> RiskTier {
    match trl.level() {
        7..=u8::MAX => RiskTier::Green,
        5..=6 => RiskTier::Yellow,
        3..=4 => RiskTier::Orange,
        _ => RiskTier::Red,
    }
}

/// Count systems per category. Every category is present, zero-filled, so a
/// missing key can never be mistaken for "none".
pub fn categorize(systems: &[OrbitalSystem]) -> BTreeMap<SystemCategory, usize> {
    let mut counts: BTreeMap<SystemCategory, usize> =
        SystemCategory::ALL.into_iter().map(|c| (c, 0)).collect();
    for system in systems {
        *counts.entry(system.category).or_insert(0) += 1;
    }
    counts
}

/// Count raw category labels, e.g. from an external listing. Any label that is
/// not a known category fails the whole call rather than being dropped.
pub fn categorize_labels<'a>(
    labels: impl IntoIterator<Item = &'a str>,
) -> Result<BTreeMap<SystemCategory, usize>> {
    let mut counts: BTreeMap<SystemCategory, usize> =
        SystemCategory::ALL.into_iter().map(|c| (c, 0)).collect();
    for label in labels {
        *counts.entry(label.parse()?).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Population-level rollup for summary display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSummary {
    pub system_count: usize,
    pub by_category: BTreeMap<SystemCategory, usize>,
    pub by_risk_tier: BTreeMap<RiskTier, usize>,
    /// Sum of recomputed BOM totals across every system.
    pub totals: Totals,
}

impl CatalogSummary {
    pub fn from_systems(systems: &[OrbitalSystem]) -> Result<Self> {
        let mut by_risk_tier = BTreeMap::new();
        for system in systems {
            *by_risk_tier.entry(trl_risk_tier(system.tech_readiness_level)).or_insert(0) += 1;
        }
        let totals = systems.iter().map(MassCost::totals).sum::<Result<Totals>>()?;
        Ok(CatalogSummary {
            system_count: systems.len(),
            by_category: categorize(systems),
            by_risk_tier,
            totals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::error::Error;

    fn tier(level: u8) -> RiskTier {
        trl_risk_tier(Trl::new(level).unwrap())
    }

    #[test]
    fn risk_tier_boundaries_are_exact() {
        assert_eq!(tier(9), RiskTier::Green);
        assert_eq!(tier(7), RiskTier::Green);
        assert_eq!(tier(6), RiskTier::Yellow);
        assert_eq!(tier(5), RiskTier::Yellow);
        assert_eq!(tier(4), RiskTier::Orange);
        assert_eq!(tier(3), RiskTier::Orange);
        assert_eq!(tier(2), RiskTier::Red);
        assert_eq!(tier(1), RiskTier::Red);
    }

    #[test]
    fn every_level_has_a_distinct_label() {
        let labels: std::collections::HashSet<&str> =
            (1..=9).map(|l| trl_label(Trl::new(l).unwrap())).collect();
        assert_eq!(labels.len(), 9);
        assert_eq!(trl_label(Trl::new(9).unwrap()), "Actual system flight proven");
    }

    #[test]
    fn categorize_zero_fills_missing_categories() {
        let counts = categorize(&[]);
        assert_eq!(counts.len(), SystemCategory::ALL.len());
        assert!(counts.values().all(|&n| n == 0));
    }

    #[test]
    fn categorize_counts_canonical_catalog() {
        let catalog = Catalog::canonical().unwrap();
        let counts = categorize(catalog.systems());
        assert_eq!(counts.values().sum::<usize>(), catalog.systems().len());
        assert!(counts[&SystemCategory::Habitat] >= 1);
    }

    #[test]
    fn unknown_label_fails_instead_of_dropping() {
        let err = categorize_labels(["habitat", "casino", "power"]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn known_labels_are_counted() {
        let counts = categorize_labels(["habitat", "power", "habitat"]).unwrap();
        assert_eq!(counts[&SystemCategory::Habitat], 2);
        assert_eq!(counts[&SystemCategory::Power], 1);
        assert_eq!(counts[&SystemCategory::Science], 0);
    }

    #[test]
    fn summary_totals_match_individual_rollups() {
        let catalog = Catalog::canonical().unwrap();
        let summary = CatalogSummary::from_systems(catalog.systems()).unwrap();
        let mass: f64 = catalog.systems().iter().map(|s| s.totals().unwrap().mass_kg).sum();
        assert_eq!(summary.system_count, catalog.systems().len());
        assert_eq!(summary.totals.mass_kg, mass);
        assert_eq!(summary.by_risk_tier.values().sum::<usize>(), summary.system_count);
    }
}
