//! Lenient numeric coercion for form-entered values.
//!
//! Two policies apply across every entry path (HTTP bodies, CLI input files):
//! price-like fields coerce empty or invalid text to the unset sentinel,
//! while accumulation fields (counts, rates, expense line items) coerce to
//! zero. Both accept JSON numbers, numeric strings, empty strings, and null.

use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum NumberOrText {
    Number(f64),
    Text(String),
}

pub(crate) fn amount_from_repr(repr: Option<NumberOrText>) -> Option<f64> {
    match repr {
        Some(NumberOrText::Number(value)) if value.is_finite() => Some(value),
        Some(NumberOrText::Text(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
        }
        _ => None,
    }
}

/// Accumulation-field policy: anything unusable reads as zero.
pub(crate) fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(amount_from_repr(repr).unwrap_or(0.0))
}

/// Count policy: fractional entries truncate, anything unusable reads as zero.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<NumberOrText>::deserialize(deserializer)?;
    let value = amount_from_repr(repr).unwrap_or(0.0);
    if value <= 0.0 {
        return Ok(0);
    }
    Ok(value.trunc() as u32)
}
