use crate::config::RateTable;
use crate::error::{Error, Result, ensure_non_negative};
use crate::types::LaunchVehicle;

/// Launch cost in USD: `total_mass_kg × price-per-kg` for `vehicle`.
///
/// Unrounded, so the result is exactly linear in mass. Vehicles are looked up,
/// not pre-validated: a miss is `UnknownVehicle`. A negative price or a product
/// that overflows `f64` is `InvalidInput`.
pub fn launch_cost(total_mass_kg: f64, vehicle: &LaunchVehicle, rates: &RateTable) -> Result<f64> {
    ensure_non_negative("total_mass_kg", total_mass_kg)?;
    let per_kg = rates
        .launch_cost_per_kg_by_vehicle
        .get(vehicle)
        .ok_or_else(|| Error::UnknownVehicle { vehicle: vehicle.0.clone() })?;
    ensure_non_negative(&format!("launch_cost_per_kg_by_vehicle.{vehicle}"), *per_kg)?;
    let cost = total_mass_kg * per_kg;
    ensure_non_negative("launch_cost", cost)?;
    Ok(cost)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn mass_times_price_per_kg() {
        let rates = RateTable::canonical().with_vehicle(LaunchVehicle::new("test"), 1_000.0);
        assert_eq!(launch_cost(250.0, &LaunchVehicle::new("test"), &rates).unwrap(), 250_000.0);
    }

    #[test]
    fn cheaper_vehicle_gives_cheaper_launch() {
        let rates = RateTable::canonical();
        let f9 = launch_cost(20_000.0, &LaunchVehicle::new("falcon_9"), &rates).unwrap();
        let ss = launch_cost(20_000.0, &LaunchVehicle::new("starship"), &rates).unwrap();
        assert!(ss < f9, "starship {ss} should undercut falcon_9 {f9}");
    }

    #[test]
    fn unknown_vehicle_names_the_vehicle() {
        let err = launch_cost(1.0, &LaunchVehicle::new("saturn_v"), &RateTable::canonical())
            .unwrap_err();
        match err {
            Error::UnknownVehicle { vehicle } => assert_eq!(vehicle, "saturn_v"),
            other => panic!("expected UnknownVehicle, got {other:?}"),
        }
    }

    #[test]
    fn empty_table_misses_every_vehicle() {
        let mut rates = RateTable::canonical();
        rates.launch_cost_per_kg_by_vehicle.clear();
        let err = launch_cost(1.0, &LaunchVehicle::new("falcon_9"), &rates).unwrap_err();
        assert!(matches!(err, Error::UnknownVehicle { .. }));
    }

    #[test]
    fn negative_mass_is_invalid_input() {
        let err = launch_cost(-5.0, &LaunchVehicle::new("falcon_9"), &RateTable::canonical())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn negative_price_per_kg_is_invalid_input() {
        let rates = RateTable::canonical().with_vehicle(LaunchVehicle::new("bargain"), -1_000.0);
        let err = launch_cost(250.0, &LaunchVehicle::new("bargain"), &rates).unwrap_err();
        match err {
            Error::InvalidInput { field, .. } => assert!(field.contains("bargain"), "field {field}"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn overflowing_product_is_invalid_input() {
        let rates = RateTable::canonical().with_vehicle(LaunchVehicle::new("pricey"), 1.0e300);
        let err = launch_cost(1.0e300, &LaunchVehicle::new("pricey"), &rates).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }), "got {err:?}");
    }

    proptest! {
        #[test]
        fn doubling_mass_doubles_cost(mass in 0.0f64..1.0e7, idx in 0usize..4) {
            let rates = RateTable::canonical();
            let vehicle = rates.vehicles().nth(idx).cloned().unwrap();
            let single = launch_cost(mass, &vehicle, &rates).unwrap();
            let double = launch_cost(2.0 * mass, &vehicle, &rates).unwrap();
            prop_assert_eq!(double, 2.0 * single);
        }
    }
}
