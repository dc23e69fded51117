use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bom::{BomItem, CostDrivers, Orbit, OrbitalSystem, Subsystem, aggregate};
use crate::error::{Error, Result};
use crate::types::{BomCategory, Slug, SystemCategory, Trl};

/// A set of systems with unique slugs and range-checked scalar fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CatalogFile", into = "CatalogFile")]
pub struct Catalog {
    systems: Vec<OrbitalSystem>,
}

#[derive(Serialize, Deserialize)]
struct CatalogFile {
    systems: Vec<OrbitalSystem>,
}

impl TryFrom<CatalogFile> for Catalog {
    type Error = Error;

    fn try_from(file: CatalogFile) -> Result<Self> {
        Catalog::new(file.systems)
    }
}

impl From<Catalog> for CatalogFile {
    fn from(catalog: Catalog) -> Self {
        CatalogFile { systems: catalog.systems }
    }
}

impl Catalog {
    pub fn new(systems: Vec<OrbitalSystem>) -> Result<Self> {
        let mut seen = HashSet::new();
        for system in &systems {
            if !seen.insert(&system.slug) {
                return Err(Error::DuplicateSlug { slug: system.slug.0.clone() });
            }
            system.check_scalars()?;
        }
        Ok(Catalog { systems })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn systems(&self) -> &[OrbitalSystem] {
        &self.systems
    }

    pub fn get(&self, slug: &str) -> Option<&OrbitalSystem> {
        self.systems.iter().find(|s| s.slug.0 == slug)
    }

    /// Sample systems spanning every category. Figures are illustrative
    /// order-of-magnitude estimates, internally consistent at every level.
    /// Built through the same checks as a loaded catalog.
    pub fn canonical() -> Result<Self> {
        Catalog::new(vec![
            commercial_station()?,
            microgravity_foundry()?,
            propellant_depot()?,
            solar_power_demo()?,
            servicing_tug()?,
            infrared_observatory()?,
        ])
    }
}

// ── Fixture builders ──────────────────────────────────────────────────────────

fn item(name: &str, category: BomCategory, qty: u32, unit_mass_kg: f64, unit_cost_usd: f64) -> BomItem {
    BomItem::new(name, category, qty, unit_mass_kg, unit_cost_usd)
}

fn sub(name: &str, description: &str, items: Vec<BomItem>) -> Result<Subsystem> {
    Subsystem::from_items(name, description, items)
}

struct Profile {
    slug: &'static str,
    name: &'static str,
    category: SystemCategory,
    orbit: Orbit,
    crew_capacity: u32,
    power_kw: f64,
    design_life_years: f64,
    timeline_years: f64,
    trl: u8,
    assembly_factor: f64,
    testing_factor: f64,
    annual_operating_cost_usd: f64,
}

fn system(p: Profile, subsystems: Vec<Result<Subsystem>>) -> Result<OrbitalSystem> {
    let subsystems = subsystems.into_iter().collect::<Result<Vec<_>>>()?;
    Ok(OrbitalSystem {
        slug: Slug(p.slug.to_string()),
        name: p.name.to_string(),
        variant: None,
        category: p.category,
        orbit: p.orbit,
        total_mass_kg: aggregate(&subsystems)?.mass_kg,
        crew_capacity: p.crew_capacity,
        power_kw: p.power_kw,
        design_life_years: p.design_life_years,
        timeline_years: p.timeline_years,
        tech_readiness_level: Trl::new(p.trl)?,
        subsystems,
        cost_drivers: CostDrivers { assembly_factor: p.assembly_factor, testing_factor: p.testing_factor },
        annual_operating_cost_usd: p.annual_operating_cost_usd,
        published_breakdown: None,
        published_insurance: None,
    })
}

fn leo(altitude_km: f64, inclination_deg: f64) -> Orbit {
    Orbit { regime: "LEO".to_string(), altitude_km: Some(altitude_km), inclination_deg: Some(inclination_deg) }
}

fn commercial_station() -> Result<OrbitalSystem> {
    use BomCategory::*;
    system(
        Profile {
            slug: "leo-commercial-station",
            name: "LEO Commercial Station",
            category: SystemCategory::Habitat,
            orbit: leo(420.0, 51.6),
            crew_capacity: 4,
            power_kw: 90.0,
            design_life_years: 15.0,
            timeline_years: 6.0,
            trl: 6,
            assembly_factor: 0.35,
            testing_factor: 0.15,
            annual_operating_cost_usd: 410_000_000.0,
        },
        vec![
            sub("Pressurized modules", "Core and node modules", vec![
                item("Core module shell", Structure, 1, 18_000.0, 420_000_000.0),
                item("Node module", Structure, 2, 6_500.0, 95_000_000.0),
                item("MMOD shielding panels", Shielding, 48, 85.0, 350_000.0),
            ]),
            sub("Power", "Solar arrays and storage", vec![
                item("Roll-out solar array wing", Power, 4, 1_100.0, 38_000_000.0),
                item("Li-ion battery ORU", Power, 12, 190.0, 2_400_000.0),
                item("Power distribution unit", Power, 4, 120.0, 6_500_000.0),
            ]),
            sub("Life support", "Closed-loop ECLSS", vec![
                item("Oxygen generation assembly", LifeSupport, 2, 680.0, 55_000_000.0),
                item("Water recovery system", LifeSupport, 2, 1_450.0, 70_000_000.0),
                item("CO2 removal assembly", LifeSupport, 2, 520.0, 32_000_000.0),
            ]),
            sub("Thermal", "Active thermal control", vec![
                item("Deployable radiator", Thermal, 6, 410.0, 9_000_000.0),
                item("Pump module", Thermal, 2, 240.0, 7_500_000.0),
            ]),
            sub("Docking & avionics", "Ports, GNC and comms", vec![
                item("International docking adapter", Docking, 2, 520.0, 28_000_000.0),
                item("Flight computer string", Avionics, 3, 45.0, 4_200_000.0),
                item("Ka-band relay terminal", Communications, 2, 60.0, 8_000_000.0),
                item("Station robotic arm", Robotics, 1, 1_500.0, 110_000_000.0),
                item("Flight software", Software, 1, 0.0, 65_000_000.0),
            ]),
        ],
    )
}

fn microgravity_foundry() -> Result<OrbitalSystem> {
    use BomCategory::*;
    system(
        Profile {
            slug: "microgravity-foundry",
            name: "Microgravity Fiber Foundry",
            category: SystemCategory::Manufacturing,
            orbit: leo(500.0, 45.0),
            crew_capacity: 0,
            power_kw: 25.0,
            design_life_years: 8.0,
            timeline_years: 4.0,
            trl: 5,
            assembly_factor: 0.08,
            testing_factor: 0.12,
            annual_operating_cost_usd: 35_000_000.0,
        },
        vec![
            sub("Bus", "Free-flyer spacecraft bus", vec![
                item("Primary structure", Structure, 1, 1_800.0, 22_000_000.0),
                item("Solar array", Power, 2, 160.0, 6_000_000.0),
                item("Hall thruster", Propulsion, 2, 30.0, 3_500_000.0),
                item("Avionics suite", Avionics, 1, 90.0, 12_000_000.0),
            ]),
            sub("Production payload", "ZBLAN draw towers", vec![
                item("Fiber draw tower", Payload, 3, 240.0, 14_000_000.0),
                item("Preform magazine", Payload, 6, 35.0, 900_000.0),
                item("Process control software", Software, 1, 0.0, 7_500_000.0),
            ]),
            sub("Return", "Product return capsule", vec![
                item("Return capsule", Structure, 2, 160.0, 5_000_000.0),
                item("Heat shield", Thermal, 2, 45.0, 1_800_000.0),
            ]),
        ],
    )
}

fn propellant_depot() -> Result<OrbitalSystem> {
    use BomCategory::*;
    system(
        Profile {
            slug: "cislunar-propellant-depot",
            name: "Cislunar Propellant Depot",
            category: SystemCategory::Infrastructure,
            orbit: Orbit { regime: "EML1".to_string(), altitude_km: None, inclination_deg: None },
            crew_capacity: 0,
            power_kw: 40.0,
            design_life_years: 20.0,
            timeline_years: 8.0,
            trl: 4,
            assembly_factor: 0.15,
            testing_factor: 0.10,
            annual_operating_cost_usd: 60_000_000.0,
        },
        vec![
            sub("Tankage", "Cryogenic storage", vec![
                item("LOX tank", Structure, 2, 4_200.0, 48_000_000.0),
                item("LH2 tank", Structure, 2, 3_100.0, 52_000_000.0),
                item("Multi-layer insulation", Thermal, 1, 900.0, 15_000_000.0),
                item("Cryocooler", Thermal, 4, 180.0, 11_000_000.0),
            ]),
            sub("Transfer", "Propellant transfer hardware", vec![
                item("Transfer coupling", Docking, 2, 260.0, 19_000_000.0),
                item("Transfer pump", Propulsion, 2, 140.0, 8_500_000.0),
            ]),
            sub("Bus", "Station-keeping bus", vec![
                item("Solar array", Power, 2, 350.0, 9_000_000.0),
                item("Attitude control thrusters", Propulsion, 12, 6.0, 400_000.0),
                item("Avionics", Avionics, 2, 70.0, 6_000_000.0),
                item("S-band transponder", Communications, 2, 8.0, 1_200_000.0),
            ]),
        ],
    )
}

fn solar_power_demo() -> Result<OrbitalSystem> {
    use BomCategory::*;
    system(
        Profile {
            slug: "geo-solar-power-demo",
            name: "GEO Space Solar Power Demonstrator",
            category: SystemCategory::Power,
            orbit: Orbit { regime: "GEO".to_string(), altitude_km: Some(35_786.0), inclination_deg: Some(0.0) },
            crew_capacity: 0,
            power_kw: 1_000.0,
            design_life_years: 10.0,
            timeline_years: 7.0,
            trl: 3,
            assembly_factor: 0.25,
            testing_factor: 0.20,
            annual_operating_cost_usd: 45_000_000.0,
        },
        vec![
            sub("Collector", "Modular photovoltaic tiles", vec![
                item("PV sandwich tile", Power, 400, 12.0, 85_000.0),
                item("Tile deployment truss", Structure, 20, 150.0, 1_100_000.0),
            ]),
            sub("Transmitter", "Microwave phased array", vec![
                item("RF transmit panel", Communications, 80, 18.0, 260_000.0),
                item("Beam control computer", Avionics, 2, 25.0, 9_000_000.0),
                item("Beam steering software", Software, 1, 0.0, 14_000_000.0),
            ]),
            sub("Assembly robotics", "In-space assembly", vec![
                item("Walking manipulator", Robotics, 2, 320.0, 24_000_000.0),
            ]),
        ],
    )
}

fn servicing_tug() -> Result<OrbitalSystem> {
    use BomCategory::*;
    system(
        Profile {
            slug: "geo-servicing-tug",
            name: "GEO Life-Extension Tug",
            category: SystemCategory::Services,
            orbit: Orbit { regime: "GEO".to_string(), altitude_km: Some(35_786.0), inclination_deg: Some(0.0) },
            crew_capacity: 0,
            power_kw: 5.0,
            design_life_years: 15.0,
            timeline_years: 3.0,
            trl: 7,
            assembly_factor: 0.05,
            testing_factor: 0.10,
            annual_operating_cost_usd: 12_000_000.0,
        },
        vec![
            sub("Bus", "Servicer bus", vec![
                item("Structure", Structure, 1, 700.0, 18_000_000.0),
                item("Xenon tank", Propulsion, 2, 55.0, 1_400_000.0),
                item("Hall thruster", Propulsion, 4, 25.0, 3_000_000.0),
                item("Solar array", Power, 2, 75.0, 4_000_000.0),
            ]),
            sub("Capture", "Docking and proximity ops", vec![
                item("Capture mechanism", Docking, 1, 90.0, 12_000_000.0),
                item("Rendezvous lidar", Avionics, 2, 14.0, 2_500_000.0),
                item("Manipulator arm", Robotics, 2, 60.0, 9_000_000.0),
            ]),
        ],
    )
}

fn infrared_observatory() -> Result<OrbitalSystem> {
    use BomCategory::*;
    system(
        Profile {
            slug: "l2-infrared-observatory",
            name: "L2 Infrared Observatory",
            category: SystemCategory::Science,
            orbit: Orbit { regime: "SEL2".to_string(), altitude_km: None, inclination_deg: None },
            crew_capacity: 0,
            power_kw: 2.0,
            design_life_years: 10.0,
            timeline_years: 9.0,
            trl: 8,
            assembly_factor: 0.10,
            testing_factor: 0.30,
            annual_operating_cost_usd: 90_000_000.0,
        },
        vec![
            sub("Optical telescope", "Segmented primary and secondary", vec![
                item("Mirror segment", Payload, 18, 40.0, 28_000_000.0),
                item("Secondary mirror assembly", Payload, 1, 60.0, 45_000_000.0),
                item("Backplane", Structure, 1, 2_100.0, 160_000_000.0),
            ]),
            sub("Instruments", "Cryogenic science instruments", vec![
                item("Near-IR camera", Payload, 1, 160.0, 210_000_000.0),
                item("Mid-IR spectrograph", Payload, 1, 200.0, 240_000_000.0),
                item("Cryocooler", Thermal, 1, 120.0, 60_000_000.0),
            ]),
            sub("Spacecraft", "Bus and sunshield", vec![
                item("Sunshield layer", Thermal, 5, 60.0, 35_000_000.0),
                item("Bus structure", Structure, 1, 1_800.0, 140_000_000.0),
                item("High-gain antenna", Communications, 1, 40.0, 22_000_000.0),
                item("Flight software", Software, 1, 0.0, 80_000_000.0),
            ]),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bom::MassCost;
    use crate::validate::{Tolerance, validate};

    #[test]
    fn canonical_catalog_passes_catalog_checks() {
        let catalog = Catalog::canonical().unwrap();
        Catalog::new(catalog.systems().to_vec()).unwrap();
    }

    #[test]
    fn canonical_catalog_is_internally_consistent() {
        for system in Catalog::canonical().unwrap().systems() {
            let violations = validate(system, &Tolerance::default());
            assert!(violations.is_empty(), "{}: {violations:?}", system.slug);
        }
    }

    #[test]
    fn canonical_catalog_covers_every_category() {
        let catalog = Catalog::canonical().unwrap();
        for category in SystemCategory::ALL {
            assert!(
                catalog.systems().iter().any(|s| s.category == category),
                "no sample system for {category}"
            );
        }
    }

    #[test]
    fn duplicate_slug_is_rejected() {
        let station = commercial_station().unwrap();
        let err = Catalog::new(vec![station.clone(), station]).unwrap_err();
        assert!(matches!(err, Error::DuplicateSlug { .. }), "got {err:?}");
    }

    #[test]
    fn out_of_range_factor_is_rejected() {
        let mut tug = servicing_tug().unwrap();
        tug.cost_drivers.assembly_factor = 1.2;
        assert!(matches!(Catalog::new(vec![tug]), Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn json_round_trip_preserves_rollups() {
        let catalog = Catalog::canonical().unwrap();
        let json = serde_json::to_string(&catalog).unwrap();
        let back = Catalog::from_json_str(&json).unwrap();
        assert_eq!(back.systems().len(), catalog.systems().len());
        let tug = back.get("geo-servicing-tug").unwrap();
        assert_eq!(tug.totals().unwrap(), servicing_tug().unwrap().totals().unwrap());
    }

    #[test]
    fn unknown_category_in_json_is_rejected() {
        let json = serde_json::to_string(&Catalog::canonical().unwrap())
            .unwrap()
            .replacen(r#""category":"habitat""#, r#""category":"casino""#, 1);
        let err = Catalog::from_json_str(&json).unwrap_err();
        assert!(matches!(err, Error::Json(_)), "got {err:?}");
        assert!(err.to_string().contains(r#"unknown system category "casino""#), "got {err}");
    }

    #[test]
    fn duplicate_slug_in_json_is_rejected() {
        let tug = servicing_tug().unwrap();
        let json = serde_json::json!({ "systems": [tug.clone(), tug] }).to_string();
        assert!(Catalog::from_json_str(&json).is_err());
    }

    #[test]
    fn fixture_subsystem_totals_come_from_aggregate() {
        for system in Catalog::canonical().unwrap().systems() {
            for sub in &system.subsystems {
                let totals = aggregate(&sub.items).unwrap();
                assert_eq!((sub.mass_kg, sub.cost_usd), (totals.mass_kg, totals.cost_usd));
            }
            assert_eq!(system.total_mass_kg, system.totals().unwrap().mass_kg);
        }
    }

    #[test]
    fn fixture_trl_out_of_range_is_an_error() {
        let profile = Profile {
            slug: "typo",
            name: "Typo",
            category: SystemCategory::Science,
            orbit: leo(500.0, 97.0),
            crew_capacity: 0,
            power_kw: 1.0,
            design_life_years: 5.0,
            timeline_years: 2.0,
            trl: 12,
            assembly_factor: 0.1,
            testing_factor: 0.1,
            annual_operating_cost_usd: 1_000_000.0,
        };
        let err = system(profile, Vec::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }), "got {err:?}");
    }
}
