use thiserror::Error;

/// Convenient result alias for the estimation engine.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised by aggregation, pricing and configuration loading.
///
/// Consistency findings are not errors; see [`crate::validate::Violation`].
#[derive(Debug, Error)]
pub enum Error {
    /// Negative or non-finite mass/cost, out-of-range factor, rate or TRL, unknown
    /// category, or an amount too large for whole-USD arithmetic.
    ///
    /// Raised while deserializing (TRL, system category) these surface as
    /// [`Error::Json`], whose message carries the same field and reason.
    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Launch-cost lookup missed the rate table.
    #[error("unknown launch vehicle: {vehicle}")]
    UnknownVehicle { vehicle: String },

    /// Two systems in one catalog share a slug.
    #[error("duplicate system slug in catalog: {slug}")]
    DuplicateSlug { slug: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidInput { field: field.into(), reason: reason.into() }
    }
}

/// Reject negative or non-finite quantities. Used at every input boundary.
pub(crate) fn ensure_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::invalid(field, format!("must be finite and non-negative, got {value}")));
    }
    Ok(())
}

/// Reject values outside the closed unit interval.
pub(crate) fn ensure_fraction(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(Error::invalid(field, format!("must lie in [0, 1], got {value}")));
    }
    Ok(())
}

/// Round `amount` to whole USD. Rejects anything `u64` cannot hold instead of
/// saturating.
pub(crate) fn whole_usd(field: &str, amount: f64) -> Result<u64> {
    ensure_non_negative(field, amount)?;
    let rounded = amount.round();
    if rounded >= u64::MAX as f64 {
        return Err(Error::invalid(field, format!("{amount} exceeds whole-USD range")));
    }
    Ok(rounded as u64)
}

/// Exact sum of whole-USD parts, failing on overflow.
pub(crate) fn sum_usd(field: &str, parts: impl IntoIterator<Item = u64>) -> Result<u64> {
    parts
        .into_iter()
        .try_fold(0u64, u64::checked_add)
        .ok_or_else(|| Error::invalid(field, "sum exceeds whole-USD range"))
}
