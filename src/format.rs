//! Compact, locale-agnostic display strings for money and mass.
//!
//! `parse_*` inverts `format_*` to within half of the last displayed digit.

use crate::error::{Error, Result};

const COST_SCALES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

/// `1_400_000_000.0` → `"$1.4B"`, `950.0` → `"$950"`.
pub fn format_cost_compact(usd: f64) -> String {
    let sign = if usd < 0.0 { "-" } else { "" };
    let abs = usd.abs();
    for (scale, suffix) in COST_SCALES {
        if abs >= scale {
            return format!("{sign}${:.1}{suffix}", abs / scale);
        }
    }
    format!("{sign}${abs:.0}")
}

/// `22_000.0` → `"22.0t"`, `850.0` → `"850kg"`.
pub fn format_mass(kg: f64) -> String {
    if kg.abs() >= 1_000.0 {
        format!("{:.1}t", kg / 1_000.0)
    } else {
        format!("{kg:.0}kg")
    }
}

fn parse_number(field: &str, text: &str) -> Result<f64> {
    text.parse::<f64>()
        .map_err(|_| Error::invalid(field, format!("not a number: {text:?}")))
}

pub fn parse_cost_compact(text: &str) -> Result<f64> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let body = rest
        .strip_prefix('$')
        .ok_or_else(|| Error::invalid("cost", format!("missing '$' in {text:?}")))?;
    let (digits, scale) = COST_SCALES
        .iter()
        .find_map(|(scale, suffix)| body.strip_suffix(*suffix).map(|d| (d, *scale)))
        .unwrap_or((body, 1.0));
    let value = parse_number("cost", digits)? * scale;
    Ok(if negative { -value } else { value })
}

pub fn parse_mass(text: &str) -> Result<f64> {
    if let Some(kg) = text.strip_suffix("kg") {
        return parse_number("mass", kg);
    }
    if let Some(t) = text.strip_suffix('t') {
        return Ok(parse_number("mass", t)? * 1_000.0);
    }
    Err(Error::invalid("mass", format!("expected 't' or 'kg' suffix in {text:?}")))
}
