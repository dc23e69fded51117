use serde::{Deserialize, Serialize};

use crate::config::RateTable;
use crate::error::{Result, ensure_fraction, ensure_non_negative, sum_usd, whole_usd};

/// First-year insurance quote for one system. All amounts whole USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceEstimate {
    pub insured_value: u64,
    pub launch_premium_rate: f64,
    pub launch_premium_usd: u64,
    pub in_orbit_premium_rate: f64,
    pub in_orbit_annual_usd: u64,
    pub liability_annual_usd: u64,
    /// Launch + in-orbit + liability, summed after each is rounded.
    pub total_first_year_usd: u64,
    #[serde(default)]
    pub notes: String,
}

/// Premium = rate × insured value, rounded to the nearest dollar.
fn premium(field: &str, rate: f64, insured_value: f64) -> Result<u64> {
    ensure_fraction(field, rate)?;
    whole_usd(field, rate * insured_value)
}

/// Price launch, in-orbit and liability cover against `insured_value`.
///
/// Each premium is rounded on its own so the displayed parts always add up to
/// the displayed first-year total. Every rate must lie in `[0, 1]`, whether or not
/// the table went through [`RateTable::validate`].
pub fn estimate_insurance(
    insured_value: f64,
    rates: &RateTable,
    notes: Option<&str>,
) -> Result<InsuranceEstimate> {
    ensure_non_negative("insured_value", insured_value)?;
    let r = &rates.insurance;

    let launch_premium_usd = premium("insurance.launch_rate", r.launch_rate, insured_value)?;
    let in_orbit_annual_usd =
        premium("insurance.in_orbit_annual_rate", r.in_orbit_annual_rate, insured_value)?;
    let liability_annual_usd = premium("insurance.liability_rate", r.liability_rate, insured_value)?;
    let total_first_year_usd = sum_usd(
        "total_first_year_usd",
        [launch_premium_usd, in_orbit_annual_usd, liability_annual_usd],
    )?;

    Ok(InsuranceEstimate {
        insured_value: whole_usd("insured_value", insured_value)?,
        launch_premium_rate: r.launch_rate,
        launch_premium_usd,
        in_orbit_premium_rate: r.in_orbit_annual_rate,
        in_orbit_annual_usd,
        liability_annual_usd,
        total_first_year_usd,
        notes: notes.unwrap_or_default().to_string(),
    })
}

impl InsuranceEstimate {
    /// Whether the displayed premiums add up to the displayed total.
    pub fn is_additive(&self) -> bool {
        self.launch_premium_usd
            .checked_add(self.in_orbit_annual_usd)
            .and_then(|s| s.checked_add(self.liability_annual_usd))
            == Some(self.total_first_year_usd)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::error::Error;

    #[test]
    fn premiums_on_reference_insured_value() {
        let est = estimate_insurance(252_500.0, &RateTable::canonical(), None).unwrap();
        assert_eq!(est.insured_value, 252_500);
        assert_eq!(est.in_orbit_annual_usd, 11_110);
        assert_eq!(est.liability_annual_usd, 4_545);
        // 21_462.5 sits on a rounding boundary; either neighbour is acceptable.
        assert!(
            (21_462..=21_463).contains(&est.launch_premium_usd),
            "launch premium {}",
            est.launch_premium_usd
        );
        assert_eq!(
            est.total_first_year_usd,
            est.launch_premium_usd + est.in_orbit_annual_usd + est.liability_annual_usd
        );
    }

    #[test]
    fn zero_value_gives_zero_premiums() {
        let est = estimate_insurance(0.0, &RateTable::canonical(), None).unwrap();
        assert_eq!(est.total_first_year_usd, 0);
        assert!(est.is_additive());
    }

    #[test]
    fn rates_and_notes_are_carried_into_the_estimate() {
        let rates = RateTable::canonical();
        let est = estimate_insurance(1_000_000.0, &rates, Some("crewed station")).unwrap();
        assert_eq!(est.launch_premium_rate, rates.insurance.launch_rate);
        assert_eq!(est.in_orbit_premium_rate, rates.insurance.in_orbit_annual_rate);
        assert_eq!(est.notes, "crewed station");
    }

    #[test]
    fn negative_insured_value_is_invalid_input() {
        let err = estimate_insurance(-1.0, &RateTable::canonical(), None).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn negative_rate_is_rejected_not_floored() {
        let mut rates = RateTable::canonical();
        rates.insurance.launch_rate = -0.5;
        let err = estimate_insurance(1_000_000.0, &rates, None).unwrap_err();
        match err {
            Error::InvalidInput { field, .. } => assert_eq!(field, "insurance.launch_rate"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn rate_above_one_is_rejected() {
        let mut rates = RateTable::canonical();
        rates.insurance.liability_rate = 1.5;
        assert!(matches!(
            estimate_insurance(1_000_000.0, &rates, None),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn insured_value_beyond_whole_usd_range_is_rejected() {
        let err = estimate_insurance(1.0e30, &RateTable::canonical(), None).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }), "got {err:?}");
    }

    #[test]
    fn tampered_total_is_not_additive() {
        let mut est = estimate_insurance(5_000_000.0, &RateTable::canonical(), None).unwrap();
        est.total_first_year_usd += 1;
        assert!(!est.is_additive());
    }

    proptest! {
        #[test]
        fn first_year_total_is_exact_sum_of_parts(value in 0.0f64..5.0e11) {
            let est = estimate_insurance(value, &RateTable::canonical(), None).unwrap();
            prop_assert!(est.is_additive());
        }
    }
}
