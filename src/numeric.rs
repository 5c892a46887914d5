//! Parse-or-default numeric handling for calculator inputs
//!
//! Form state arrives with numbers, numeric strings, blanks and nulls mixed
//! together. Every numeric field is coerced here, at the input boundary, so the
//! engines never see a NaN or a parse failure.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Parse a decimal value, falling back to `default` on blank, garbage or non-finite input
pub fn parse_numeric_or_default(raw: &str, default: f64) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => default,
    }
}

/// Parse an integer value, falling back to `default`
///
/// Decimal input is truncated toward zero (`"12.9"` -> 12).
pub fn parse_int_or_default(raw: &str, default: i64) -> i64 {
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return v;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => v.trunc() as i64,
        _ => default,
    }
}

/// Replace NaN and infinities with `default`
pub fn finite_or(value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        default
    }
}

/// Round a currency amount to the nearest whole unit
pub fn round_currency(value: f64) -> f64 {
    let rounded = value.round();
    // Avoid emitting -0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Convert a percentage (4.5) into a rate (0.045)
pub fn percent_to_rate(percent: f64) -> f64 {
    finite_or(percent, 0.0) / 100.0
}

/// Coerce a loosely typed JSON value into a finite f64
pub fn value_to_f64(value: Option<&Value>, default: f64) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().map(|v| finite_or(v, default)).unwrap_or(default),
        Some(Value::String(s)) => parse_numeric_or_default(s, default),
        _ => default,
    }
}

/// Serde helper: accepts numbers, numeric strings, blanks and nulls; anything else becomes 0
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    if let Some(v @ (Value::Bool(_) | Value::Array(_) | Value::Object(_))) = &value {
        log::warn!("non-numeric input {} coerced to 0", v);
    }
    Ok(value_to_f64(value.as_ref(), 0.0))
}

/// Serde helper for optional amounts: blanks and garbage become `None`
pub fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

/// Serde helper for counts and ages: negative or unparseable values become 0
pub fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let parsed = match &value {
        Some(Value::String(s)) => parse_int_or_default(s, 0),
        other => value_to_f64(other.as_ref(), 0.0).trunc() as i64,
    };
    Ok(u32::try_from(parsed).unwrap_or(0))
}

/// Serde helper for optional ages/years
pub fn lenient_opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_opt_f64(deserializer)?;
    Ok(value.and_then(|v| u32::try_from(v.trunc() as i64).ok()))
}

/// Serde helper for calendar years
pub fn lenient_opt_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_opt_f64(deserializer)?;
    Ok(value.map(|v| v.trunc() as i32))
}

/// Parse a year-offset map key; negative or non-numeric keys are rejected
fn parse_offset_key(key: &str) -> Option<u32> {
    let offset = u32::try_from(parse_int_or_default(key, -1)).ok();
    if offset.is_none() {
        log::warn!("dropping override with invalid year offset {:?}", key);
    }
    offset
}

/// Serde helper for sparse per-year amount maps keyed by year offset
///
/// Keys are parsed explicitly rather than relying on map-key coercion.
pub fn lenient_offset_map<'de, D>(deserializer: D) -> Result<BTreeMap<u32, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| parse_offset_key(&key).map(|offset| (offset, value_to_f64(Some(&value), 0.0))))
        .collect())
}

/// Serde helper for sparse per-year override records keyed by year offset
pub fn offset_keyed<'de, D, T>(deserializer: D) -> Result<BTreeMap<u32, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let raw = Option::<BTreeMap<String, T>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| parse_offset_key(&key).map(|offset| (offset, value)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "lenient_f64")]
        amount: f64,
        #[serde(default, deserialize_with = "lenient_u32")]
        years: u32,
        #[serde(default, deserialize_with = "lenient_opt_f64")]
        rate: Option<f64>,
    }

    #[test]
    fn test_parse_numeric_or_default() {
        assert_eq!(parse_numeric_or_default("12.5", 0.0), 12.5);
        assert_eq!(parse_numeric_or_default("  7 ", 0.0), 7.0);
        assert_eq!(parse_numeric_or_default("", 3.0), 3.0);
        assert_eq!(parse_numeric_or_default("abc", 0.0), 0.0);
        assert_eq!(parse_numeric_or_default("NaN", 1.0), 1.0);
        assert_eq!(parse_numeric_or_default("inf", 0.0), 0.0);
    }

    #[test]
    fn test_parse_int_truncates() {
        assert_eq!(parse_int_or_default("25", 0), 25);
        assert_eq!(parse_int_or_default("12.9", 0), 12);
        assert_eq!(parse_int_or_default("x", 4), 4);
    }

    #[test]
    fn test_round_currency_no_negative_zero() {
        assert_eq!(round_currency(1234.5), 1235.0);
        assert_eq!(round_currency(-0.2).to_bits(), 0.0f64.to_bits());
    }

    #[test]
    fn test_lenient_form_fields() {
        let form: Form = serde_json::from_str(r#"{"amount": "1500.25", "years": "25", "rate": ""}"#).unwrap();
        assert_eq!(form.amount, 1500.25);
        assert_eq!(form.years, 25);
        assert_eq!(form.rate, None);

        let form: Form = serde_json::from_str(r#"{"amount": null, "years": -3, "rate": 4}"#).unwrap();
        assert_eq!(form.amount, 0.0);
        assert_eq!(form.years, 0);
        assert_eq!(form.rate, Some(4.0));

        let form: Form = serde_json::from_str(r#"{"amount": true}"#).unwrap();
        assert_eq!(form.amount, 0.0);
        assert_eq!(form.years, 0);
    }

    #[derive(Deserialize)]
    struct Sparse {
        #[serde(default, deserialize_with = "lenient_offset_map")]
        sales: BTreeMap<u32, f64>,
    }

    #[test]
    fn test_offset_map_keys_are_parsed_explicitly() {
        let sparse: Sparse =
            serde_json::from_str(r#"{"sales": {"3": "450000", "07": 10, "-1": 5, "x": 1}}"#).unwrap();
        assert_eq!(sparse.sales.len(), 2);
        assert_eq!(sparse.sales[&3], 450_000.0);
        assert_eq!(sparse.sales[&7], 10.0);
    }
}
