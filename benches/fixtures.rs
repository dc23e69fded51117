use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, LogNormal};

use orbcost::bom::{BomItem, CostDrivers, Orbit, OrbitalSystem, Subsystem};
use orbcost::types::{BomCategory, Slug, SystemCategory, Trl};

pub struct Scenario {
    pub systems: usize,
    pub subsystems_per_system: usize,
    pub items_per_subsystem: usize,
}

pub const SMALL: Scenario = Scenario { systems: 10, subsystems_per_system: 4, items_per_subsystem: 5 };

pub const MEDIUM: Scenario = Scenario { systems: 100, subsystems_per_system: 8, items_per_subsystem: 12 };

pub const LARGE: Scenario = Scenario { systems: 1_000, subsystems_per_system: 12, items_per_subsystem: 25 };

const CATEGORIES: [BomCategory; 6] = [
    BomCategory::Structure,
    BomCategory::Power,
    BomCategory::Thermal,
    BomCategory::Avionics,
    BomCategory::Payload,
    BomCategory::Shielding,
];

/// Random but reproducible BOM tree. Unit mass and cost are log-normal so a few
/// items dominate each subsystem, as in real hardware.
pub fn make_system(idx: usize, scenario: &Scenario, rng: &mut ChaCha20Rng) -> OrbitalSystem {
    // mu=5, sigma=1.2 → median ≈ 150 kg; mu=15, sigma=1.5 → median ≈ $3.3M.
    let mass = LogNormal::new(5.0, 1.2).expect("valid LogNormal params");
    let cost = LogNormal::new(15.0, 1.5).expect("valid LogNormal params");

    let subsystems: Vec<Subsystem> = (0..scenario.subsystems_per_system)
        .map(|s| {
            let items = (0..scenario.items_per_subsystem)
                .map(|i| {
                    BomItem::new(
                        format!("item-{i}"),
                        CATEGORIES[i % CATEGORIES.len()],
                        rng.random_range(1..=8),
                        mass.sample(rng).round(),
                        cost.sample(rng).round(),
                    )
                })
                .collect();
            Subsystem::from_items(format!("subsystem-{s}"), "", items).expect("non-negative samples")
        })
        .collect();

    OrbitalSystem {
        slug: Slug(format!("synthetic-{idx}")),
        name: format!("Synthetic system {idx}"),
        variant: None,
        category: SystemCategory::ALL[idx % SystemCategory::ALL.len()],
        orbit: Orbit { regime: "LEO".to_string(), altitude_km: Some(500.0), inclination_deg: None },
        total_mass_kg: subsystems.iter().map(|s| s.mass_kg).sum(),
        crew_capacity: 0,
        power_kw: 10.0,
        design_life_years: 10.0,
        timeline_years: 4.0,
        tech_readiness_level: Trl::new(rng.random_range(1..=9)).expect("level in 1..=9"),
        subsystems,
        cost_drivers: CostDrivers { assembly_factor: 0.15, testing_factor: 0.1 },
        annual_operating_cost_usd: 20_000_000.0,
        published_breakdown: None,
        published_insurance: None,
    }
}

pub fn make_catalog(scenario: &Scenario, seed: u64) -> Vec<OrbitalSystem> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    (0..scenario.systems).map(|i| make_system(i, scenario, &mut rng)).collect()
}
